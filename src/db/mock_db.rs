#![allow(dead_code)]
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::attribution::AttributionId;
use crate::models::organization::Organization;
use crate::models::subscription::Subscription;
use crate::models::workspace_instance::WorkspaceInstance;

use super::organization_repository::OrganizationRepository;
use super::subscription_repository::SubscriptionRepository;
use super::workspace_instance_repository::WorkspaceInstanceRepository;

/// In-memory stand-in for the account store, subscription lookup, and
/// running-instance source. Tests seed it through the `with_*` helpers and
/// inspect the call counters afterwards.
#[derive(Default)]
pub struct MockDb {
    pub organizations: Mutex<Vec<Organization>>,
    pub memberships: Mutex<Vec<(Uuid, Uuid)>>,
    pub subscriptions: Mutex<Vec<Subscription>>,
    pub running_instances: Mutex<Vec<WorkspaceInstance>>,
    pub should_fail: bool,
    pub list_organizations_calls: Mutex<usize>,
    pub subscription_lookup_calls: Mutex<usize>,
}

impl MockDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        MockDb {
            should_fail: true,
            ..Default::default()
        }
    }

    pub fn with_organization(self, organization: Organization) -> Self {
        self.organizations.lock().unwrap().push(organization);
        self
    }

    /// Adds the organization and makes `user_id` a member of it.
    pub fn with_membership(self, user_id: Uuid, organization: Organization) -> Self {
        self.memberships
            .lock()
            .unwrap()
            .push((user_id, organization.id));
        self.organizations.lock().unwrap().push(organization);
        self
    }

    pub fn with_subscription(self, subscription: Subscription) -> Self {
        self.subscriptions.lock().unwrap().push(subscription);
        self
    }

    pub fn with_running_instances(self, instances: Vec<WorkspaceInstance>) -> Self {
        self.running_instances.lock().unwrap().extend(instances);
        self
    }
}

#[async_trait]
impl OrganizationRepository for MockDb {
    async fn find_organization_by_id(
        &self,
        organization_id: Uuid,
    ) -> Result<Option<Organization>, sqlx::Error> {
        if self.should_fail {
            return Err(sqlx::Error::Protocol("mock db failure".into()));
        }
        Ok(self
            .organizations
            .lock()
            .unwrap()
            .iter()
            .find(|org| org.id == organization_id)
            .cloned())
    }

    async fn list_organizations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Organization>, sqlx::Error> {
        *self.list_organizations_calls.lock().unwrap() += 1;
        if self.should_fail {
            return Err(sqlx::Error::Protocol("mock db failure".into()));
        }
        let memberships = self.memberships.lock().unwrap();
        let organizations = self.organizations.lock().unwrap();
        Ok(organizations
            .iter()
            .filter(|org| {
                memberships
                    .iter()
                    .any(|(member, org_id)| *member == user_id && *org_id == org.id)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SubscriptionRepository for MockDb {
    async fn find_active_uncancelled_subscription(
        &self,
        attribution_id: &AttributionId,
        at: OffsetDateTime,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        *self.subscription_lookup_calls.lock().unwrap() += 1;
        if self.should_fail {
            return Err(sqlx::Error::Protocol("mock db failure".into()));
        }
        let key = attribution_id.to_string();
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|sub| sub.attribution_id == key && sub.is_active(at) && !sub.is_cancelled())
            .map(|sub| sub.id))
    }
}

#[async_trait]
impl WorkspaceInstanceRepository for MockDb {
    async fn find_running_instances(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<WorkspaceInstance>, sqlx::Error> {
        if self.should_fail {
            return Err(sqlx::Error::Protocol("mock db failure".into()));
        }
        Ok(self
            .running_instances
            .lock()
            .unwrap()
            .iter()
            .filter(|instance| instance.owner_id == owner_id && !instance.phase.is_stopped())
            .cloned()
            .collect())
    }
}
