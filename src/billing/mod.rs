use uuid::Uuid;

use crate::services::usage::UsageServiceError;

pub mod billing_mode;
pub mod entitlement;

pub use billing_mode::BillingModeResolver;
pub use entitlement::{EntitlementService, MayStartWorkspaceResult, ParallelWorkspaceLimit};

/// Errors surfaced by billing-mode resolution and entitlement checks.
/// Upstream failures are passed through untranslated: an error here means
/// "undetermined", never "free tier".
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("organization {0} not found")]
    OrganizationNotFound(Uuid),
    #[error("unsupported attribution kind: {0}")]
    UnsupportedAttribution(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("usage service error: {0}")]
    Usage(#[from] UsageServiceError),
    #[error("billing lookup task failed: {0}")]
    Lookup(#[from] tokio::task::JoinError),
}
