use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::attribution::AttributionId;

/// Subscription-lookup port. Only answers the one question the entitlement
/// engine asks: does an active, uncancelled subscription exist for this
/// attribution right now?
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn find_active_uncancelled_subscription(
        &self,
        attribution_id: &AttributionId,
        at: OffsetDateTime,
    ) -> Result<Option<Uuid>, sqlx::Error>;
}
