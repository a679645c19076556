use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::task::JoinSet;
use tracing::warn;
use uuid::Uuid;

use crate::db::organization_repository::OrganizationRepository;
use crate::db::subscription_repository::SubscriptionRepository;
use crate::models::attribution::AttributionId;
use crate::models::billing::{BillingStrategy, BillingTier, WorkspaceDuration};
use crate::models::user::User;
use crate::models::workspace_instance::{WorkspaceInstance, WorkspacePhase};
use crate::services::usage::{UsageService, UsageServiceError};

use super::BillingError;

const MAX_PARALLEL_WORKSPACES_FREE: usize = 4;
const MAX_PARALLEL_WORKSPACES_PAID: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelWorkspaceLimit {
    pub current: usize,
    pub max: usize,
}

/// Admission facts for a workspace start. Both fields are independent
/// signals; combining them into an allow/deny decision is the caller's job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MayStartWorkspaceResult {
    /// The cost center whose usage cap is exhausted, if any. May name an
    /// organization the user belongs to rather than the user themselves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit_reached_on_cost_center: Option<AttributionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_parallel_workspace_limit: Option<ParallelWorkspaceLimit>,
}

/// Answers the entitlement questions workspace orchestration asks before
/// admitting or configuring a workspace. Stateless: every answer is derived
/// from live collaborator state.
pub struct EntitlementService {
    organizations: Arc<dyn OrganizationRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    usage: Arc<dyn UsageService>,
}

impl EntitlementService {
    pub fn new(
        organizations: Arc<dyn OrganizationRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        usage: Arc<dyn UsageService>,
    ) -> Self {
        EntitlementService {
            organizations,
            subscriptions,
            usage,
        }
    }

    /// Runs the usage-limit check and the parallel-workspace count at the
    /// same time; total latency is bounded by the slower of the two.
    /// `running_instances` is accepted as a future so a fetch the caller
    /// already started can overlap with the usage-limit round-trip.
    pub async fn may_start_workspace<F>(
        &self,
        user: &User,
        organization_id: Option<Uuid>,
        now: OffsetDateTime,
        running_instances: F,
    ) -> Result<MayStartWorkspaceResult, BillingError>
    where
        F: Future<Output = Result<Vec<WorkspaceInstance>, sqlx::Error>> + Send,
    {
        let usage_check = async {
            self.usage
                .check_usage_limit_reached(user, organization_id)
                .await
                .map_err(BillingError::from)
        };
        let parallel_check = async {
            let max = self.get_max_parallel_workspaces(user, now).await?;
            let instances = running_instances.await?;
            // Instances still preparing have not claimed capacity yet.
            let current = instances
                .iter()
                .filter(|instance| instance.phase != WorkspacePhase::Preparing)
                .count();
            if current >= max {
                Ok(Some(ParallelWorkspaceLimit { current, max }))
            } else {
                Ok(None)
            }
        };
        let (limit, parallel) = tokio::try_join!(usage_check, parallel_check)?;

        let scope = organization_id
            .map(AttributionId::for_team)
            .unwrap_or_else(|| user.attribution_id());
        Ok(MayStartWorkspaceResult {
            usage_limit_reached_on_cost_center: limit
                .reached
                .then(|| limit.attribution_id.unwrap_or(scope)),
            hit_parallel_workspace_limit: parallel,
        })
    }

    pub async fn may_set_timeout(
        &self,
        user: &User,
        now: OffsetDateTime,
    ) -> Result<bool, BillingError> {
        self.has_paid_subscription(user, now).await
    }

    pub async fn get_default_workspace_timeout(
        &self,
        user: &User,
        now: OffsetDateTime,
    ) -> Result<WorkspaceDuration, BillingError> {
        if self.has_paid_subscription(user, now).await? {
            Ok(WorkspaceDuration::Long)
        } else {
            Ok(WorkspaceDuration::Short)
        }
    }

    pub async fn get_default_workspace_lifetime(
        &self,
        user: &User,
        now: OffsetDateTime,
    ) -> Result<WorkspaceDuration, BillingError> {
        if self.has_paid_subscription(user, now).await? {
            Ok(WorkspaceDuration::Long)
        } else {
            Ok(WorkspaceDuration::Short)
        }
    }

    /// Disabled. Kept so callers compile against a stable contract.
    pub async fn user_gets_more_resources(
        &self,
        _user: &User,
        _now: OffsetDateTime,
    ) -> Result<bool, BillingError> {
        Ok(false)
    }

    /// Restricted for everyone, paid or not. Temporary blanket policy for
    /// abuse mitigation; not tied to the entitlement tier.
    pub async fn limit_network_connections(
        &self,
        _user: &User,
        _now: OffsetDateTime,
    ) -> Result<bool, BillingError> {
        Ok(true)
    }

    pub async fn get_billing_tier(&self, user: &User) -> Result<BillingTier, BillingError> {
        if self
            .has_paid_subscription(user, OffsetDateTime::now_utc())
            .await?
        {
            Ok(BillingTier::Paid)
        } else {
            Ok(BillingTier::Free)
        }
    }

    pub async fn get_max_parallel_workspaces(
        &self,
        user: &User,
        now: OffsetDateTime,
    ) -> Result<usize, BillingError> {
        if self.has_paid_subscription(user, now).await? {
            Ok(MAX_PARALLEL_WORKSPACES_PAID)
        } else {
            Ok(MAX_PARALLEL_WORKSPACES_FREE)
        }
    }

    /// A user is paid if they hold an active, uncancelled individual
    /// subscription, or if any organization they belong to is billed through
    /// Stripe. Organization lookups fan out concurrently and the first
    /// Stripe answer wins; `false` requires every lookup to have settled.
    /// A single failed lookup never converts a pending Stripe answer into
    /// `false` — but without any Stripe answer it poisons the result, since
    /// guessing "free" would grant or deny entitlements on incomplete data.
    async fn has_paid_subscription(
        &self,
        user: &User,
        now: OffsetDateTime,
    ) -> Result<bool, BillingError> {
        let subscription = self
            .subscriptions
            .find_active_uncancelled_subscription(&user.attribution_id(), now)
            .await?;
        if subscription.is_some() {
            return Ok(true);
        }

        let organizations = self.organizations.list_organizations_for_user(user.id).await?;
        if organizations.is_empty() {
            return Ok(false);
        }

        let mut lookups = JoinSet::new();
        for organization in organizations {
            let usage = Arc::clone(&self.usage);
            lookups.spawn(async move {
                usage
                    .get_current_billing_strategy(&organization.attribution_id())
                    .await
            });
        }

        let mut first_failure: Option<UsageServiceError> = None;
        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok(Ok(Some(BillingStrategy::Stripe))) => {
                    lookups.abort_all();
                    return Ok(true);
                }
                Ok(Ok(_)) => {}
                Ok(Err(err)) => {
                    warn!(user_id = %user.id, error = %err, "billing strategy lookup failed during paid-subscription check");
                    first_failure.get_or_insert(err);
                }
                Err(join_err) if join_err.is_cancelled() => {}
                Err(join_err) => return Err(BillingError::Lookup(join_err)),
            }
        }
        match first_failure {
            Some(err) => Err(BillingError::Usage(err)),
            None => Ok(false),
        }
    }
}
