use async_trait::async_trait;
use uuid::Uuid;

use crate::models::workspace_instance::WorkspaceInstance;

/// Running-instance source. Supplies the live instances for a user; the
/// entitlement engine only counts them.
#[async_trait]
pub trait WorkspaceInstanceRepository: Send + Sync {
    async fn find_running_instances(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<WorkspaceInstance>, sqlx::Error>;
}
