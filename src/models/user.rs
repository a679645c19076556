use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::attribution::AttributionId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    /// The attribution key used when cost is billed to this user directly
    /// rather than to one of their organizations.
    pub fn attribution_id(&self) -> AttributionId {
        AttributionId::for_user(self.id)
    }
}
