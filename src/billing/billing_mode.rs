use std::sync::Arc;

use time::OffsetDateTime;
use tracing::debug;

use crate::config::Config;
use crate::db::organization_repository::OrganizationRepository;
use crate::models::attribution::AttributionId;
use crate::models::billing::{BillingMode, BillingStrategy};
use crate::models::organization::Organization;
use crate::models::user::User;
use crate::services::usage::UsageService;

use super::BillingError;

/// Classifies an account's billing mode at a point in time. The global
/// payment switch takes precedence over everything: when it is off, no
/// usage-backend call is made and every subject is `none`.
pub struct BillingModeResolver {
    config: Arc<Config>,
    organizations: Arc<dyn OrganizationRepository>,
    usage: Arc<dyn UsageService>,
}

impl BillingModeResolver {
    pub fn new(
        config: Arc<Config>,
        organizations: Arc<dyn OrganizationRepository>,
        usage: Arc<dyn UsageService>,
    ) -> Self {
        BillingModeResolver {
            config,
            organizations,
            usage,
        }
    }

    /// Resolves by attribution id. Only team attributions are supported
    /// here; user-level resolution is reachable only through
    /// [`BillingModeResolver::resolve_for_user`], which is kept for callers
    /// that predate the org migration.
    pub async fn resolve(
        &self,
        attribution_id: &AttributionId,
        now: OffsetDateTime,
    ) -> Result<BillingMode, BillingError> {
        match attribution_id {
            AttributionId::Team { team_id } => {
                let organization = self
                    .organizations
                    .find_organization_by_id(*team_id)
                    .await?
                    .ok_or(BillingError::OrganizationNotFound(*team_id))?;
                self.resolve_for_organization(&organization, now).await
            }
            other => Err(BillingError::UnsupportedAttribution(other.kind())),
        }
    }

    /// Legacy path for individual users, pending the org migration: it never
    /// distinguishes paid from free, so `paid` stays unset.
    pub async fn resolve_for_user(
        &self,
        _user: &User,
        _now: OffsetDateTime,
    ) -> Result<BillingMode, BillingError> {
        if !self.config.enable_payment {
            // Payment is not enabled. E.g. self-hosted.
            return Ok(BillingMode::None);
        }
        Ok(BillingMode::UsageBased { paid: None })
    }

    pub async fn resolve_for_organization(
        &self,
        organization: &Organization,
        _now: OffsetDateTime,
    ) -> Result<BillingMode, BillingError> {
        if !self.config.enable_payment {
            // Payment is not enabled. E.g. self-hosted.
            return Ok(BillingMode::None);
        }

        let strategy = self
            .usage
            .get_current_billing_strategy(&organization.attribution_id())
            .await?;
        let paid = matches!(strategy, Some(BillingStrategy::Stripe));
        debug!(organization_id = %organization.id, ?strategy, paid, "resolved billing mode");
        Ok(BillingMode::UsageBased { paid: Some(paid) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mock_db::MockDb;
    use crate::services::usage::MockUsageService;
    use uuid::Uuid;

    fn test_config(enable_payment: bool) -> Arc<Config> {
        Arc::new(Config {
            database_url: "postgres://localhost/nimbus_test".into(),
            enable_payment,
            usage_api_url: None,
        })
    }

    fn organization(name: &str) -> Organization {
        let now = OffsetDateTime::now_utc();
        Organization {
            id: Uuid::new_v4(),
            name: name.into(),
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "dev@example.test".into(),
            display_name: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn resolver(
        enable_payment: bool,
        db: Arc<MockDb>,
        usage: Arc<MockUsageService>,
    ) -> BillingModeResolver {
        BillingModeResolver::new(test_config(enable_payment), db, usage)
    }

    #[tokio::test]
    async fn payment_disabled_is_none_without_a_strategy_lookup() {
        let org = organization("acme");
        let db = Arc::new(MockDb::new().with_organization(org.clone()));
        let usage = Arc::new(MockUsageService::new());
        let resolver = resolver(false, db, usage.clone());
        let now = OffsetDateTime::now_utc();

        let mode = resolver
            .resolve(&org.attribution_id(), now)
            .await
            .unwrap();
        assert_eq!(mode, BillingMode::None);

        let mode = resolver.resolve_for_user(&test_user(), now).await.unwrap();
        assert_eq!(mode, BillingMode::None);

        assert_eq!(usage.strategy_call_count(), 0);
    }

    #[tokio::test]
    async fn stripe_organization_is_paid_usage_based() {
        let org = organization("acme");
        let db = Arc::new(MockDb::new().with_organization(org.clone()));
        let usage = Arc::new(
            MockUsageService::new().with_strategy(org.attribution_id(), BillingStrategy::Stripe),
        );
        let resolver = resolver(true, db, usage);

        let mode = resolver
            .resolve(&org.attribution_id(), OffsetDateTime::now_utc())
            .await
            .unwrap();
        assert_eq!(mode, BillingMode::UsageBased { paid: Some(true) });
        assert!(mode.is_paid());
    }

    #[tokio::test]
    async fn other_or_missing_strategy_is_unpaid() {
        let on_other = organization("acme");
        let no_record = organization("globex");
        let db = Arc::new(
            MockDb::new()
                .with_organization(on_other.clone())
                .with_organization(no_record.clone()),
        );
        let usage = Arc::new(
            MockUsageService::new().with_strategy(on_other.attribution_id(), BillingStrategy::Other),
        );
        let resolver = resolver(true, db, usage);
        let now = OffsetDateTime::now_utc();

        let mode = resolver.resolve(&on_other.attribution_id(), now).await.unwrap();
        assert_eq!(mode, BillingMode::UsageBased { paid: Some(false) });

        let mode = resolver.resolve(&no_record.attribution_id(), now).await.unwrap();
        assert_eq!(mode, BillingMode::UsageBased { paid: Some(false) });
    }

    #[tokio::test]
    async fn unknown_organization_is_a_hard_error() {
        let db = Arc::new(MockDb::new());
        let usage = Arc::new(MockUsageService::new());
        let resolver = resolver(true, db, usage.clone());
        let missing = Uuid::new_v4();

        let result = resolver
            .resolve(&AttributionId::for_team(missing), OffsetDateTime::now_utc())
            .await;
        assert!(
            matches!(result, Err(BillingError::OrganizationNotFound(id)) if id == missing)
        );
        assert_eq!(usage.strategy_call_count(), 0);
    }

    #[tokio::test]
    async fn user_attribution_is_rejected() {
        let db = Arc::new(MockDb::new());
        let usage = Arc::new(MockUsageService::new());
        let resolver = resolver(true, db, usage);

        let result = resolver
            .resolve(
                &AttributionId::for_user(Uuid::new_v4()),
                OffsetDateTime::now_utc(),
            )
            .await;
        assert!(matches!(
            result,
            Err(BillingError::UnsupportedAttribution("user"))
        ));
    }

    #[tokio::test]
    async fn legacy_user_path_never_sets_paid() {
        let db = Arc::new(MockDb::new());
        let usage = Arc::new(MockUsageService::new());
        let resolver = resolver(true, db, usage.clone());

        let mode = resolver
            .resolve_for_user(&test_user(), OffsetDateTime::now_utc())
            .await
            .unwrap();
        assert_eq!(mode, BillingMode::UsageBased { paid: None });
        assert_eq!(usage.strategy_call_count(), 0);
    }

    #[tokio::test]
    async fn usage_backend_failure_propagates() {
        let org = organization("acme");
        let db = Arc::new(MockDb::new().with_organization(org.clone()));
        let usage = Arc::new(MockUsageService::new().with_failing_strategy(org.attribution_id()));
        let resolver = resolver(true, db, usage);

        let result = resolver
            .resolve(&org.attribution_id(), OffsetDateTime::now_utc())
            .await;
        assert!(matches!(result, Err(BillingError::Usage(_))));
    }
}
