use async_trait::async_trait;
use uuid::Uuid;

use crate::models::organization::Organization;

/// Account-store port: resolves organizations and a user's memberships.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn find_organization_by_id(
        &self,
        organization_id: Uuid,
    ) -> Result<Option<Organization>, sqlx::Error>;

    async fn list_organizations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Organization>, sqlx::Error>;
}
