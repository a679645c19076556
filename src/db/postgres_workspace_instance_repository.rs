use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::workspace_instance::WorkspaceInstance;

use super::workspace_instance_repository::WorkspaceInstanceRepository;

pub struct PostgresWorkspaceInstanceRepository {
    pub pool: PgPool,
}

#[async_trait]
impl WorkspaceInstanceRepository for PostgresWorkspaceInstanceRepository {
    async fn find_running_instances(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<WorkspaceInstance>, sqlx::Error> {
        sqlx::query_as::<_, WorkspaceInstance>(
            r#"
            SELECT i.id, i.workspace_id, i.owner_id, i.phase, i.created_at
            FROM workspace_instances i
            WHERE i.owner_id = $1
              AND i.phase <> 'stopped'::workspace_phase
            ORDER BY i.created_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
    }
}
