use std::sync::Arc;

use crate::billing::{BillingModeResolver, EntitlementService};
use crate::config::Config;
use crate::db::organization_repository::OrganizationRepository;
use crate::db::subscription_repository::SubscriptionRepository;
use crate::db::workspace_instance_repository::WorkspaceInstanceRepository;
use crate::services::usage::UsageService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub organizations: Arc<dyn OrganizationRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub workspace_instances: Arc<dyn WorkspaceInstanceRepository>,
    pub usage: Arc<dyn UsageService>,
    pub billing_modes: Arc<BillingModeResolver>,
    pub entitlements: Arc<EntitlementService>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        organizations: Arc<dyn OrganizationRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        workspace_instances: Arc<dyn WorkspaceInstanceRepository>,
        usage: Arc<dyn UsageService>,
    ) -> Self {
        let billing_modes = Arc::new(BillingModeResolver::new(
            config.clone(),
            organizations.clone(),
            usage.clone(),
        ));
        let entitlements = Arc::new(EntitlementService::new(
            organizations.clone(),
            subscriptions.clone(),
            usage.clone(),
        ));
        AppState {
            config,
            organizations,
            subscriptions,
            workspace_instances,
            usage,
            billing_modes,
            entitlements,
        }
    }
}
