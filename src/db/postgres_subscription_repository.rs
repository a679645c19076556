use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::attribution::AttributionId;

use super::subscription_repository::SubscriptionRepository;

pub struct PostgresSubscriptionRepository {
    pub pool: PgPool,
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn find_active_uncancelled_subscription(
        &self,
        attribution_id: &AttributionId,
        at: OffsetDateTime,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM subscriptions
            WHERE attribution_id = $1
              AND started_at <= $2
              AND (ended_at IS NULL OR ended_at > $2)
              AND cancelled_at IS NULL
            ORDER BY started_at DESC
            LIMIT 1
            "#,
        )
        .bind(attribution_id.to_string())
        .bind(at)
        .fetch_optional(&self.pool)
        .await
    }
}
