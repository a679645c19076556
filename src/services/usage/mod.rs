use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::attribution::AttributionId;
use crate::models::billing::BillingStrategy;
use crate::models::user::User;

#[derive(Debug, thiserror::Error)]
pub enum UsageServiceError {
    #[error("usage api error: {0}")]
    Api(String),
    #[error("usage api request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("usage api returned a malformed payload: {0}")]
    Serde(String),
}

/// Result of the account-level usage-limit check. When the limit is reached,
/// `attribution_id` names the cost center whose cap was exceeded, which may
/// be an organization the requesting user merely belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageLimitCheck {
    pub reached: bool,
    pub attribution_id: Option<AttributionId>,
}

impl UsageLimitCheck {
    pub fn under_limit() -> Self {
        UsageLimitCheck {
            reached: false,
            attribution_id: None,
        }
    }

    pub fn reached_on(attribution_id: AttributionId) -> Self {
        UsageLimitCheck {
            reached: true,
            attribution_id: Some(attribution_id),
        }
    }
}

/// Usage/billing backend port. Reports how an attribution is currently
/// billed and whether its spending cap has been hit.
#[async_trait]
pub trait UsageService: Send + Sync {
    async fn get_current_billing_strategy(
        &self,
        attribution_id: &AttributionId,
    ) -> Result<Option<BillingStrategy>, UsageServiceError>;

    /// Scoped by `organization_id` when given, by the user otherwise.
    async fn check_usage_limit_reached(
        &self,
        user: &User,
        organization_id: Option<Uuid>,
    ) -> Result<UsageLimitCheck, UsageServiceError>;
}

mod live;
mod mock;

pub use live::LiveUsageService;
#[allow(unused_imports)]
pub use mock::MockUsageService;
