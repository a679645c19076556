use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A paid individual subscription. Keyed by the rendered attribution id so
/// the same table can hold user- and team-scoped records.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub attribution_id: String,
    pub plan: String,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
    /// Set when the holder has cancelled, even if the paid period has not
    /// run out yet. A cancelled subscription never grants entitlements.
    #[serde(with = "time::serde::rfc3339::option")]
    pub cancelled_at: Option<OffsetDateTime>,
}

impl Subscription {
    pub fn is_active(&self, at: OffsetDateTime) -> bool {
        self.started_at <= at && self.ended_at.map_or(true, |ended| ended > at)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled_at.is_some()
    }
}
