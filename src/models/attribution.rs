use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies the billable entity a cost is attributed to: an individual
/// user or a team (organization). The rendered string form (`user:<id>`,
/// `team:<id>`) is the stable key used for usage-backend and subscription
/// lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AttributionId {
    User { user_id: Uuid },
    Team { team_id: Uuid },
}

impl AttributionId {
    pub fn for_user(user_id: Uuid) -> Self {
        AttributionId::User { user_id }
    }

    pub fn for_team(team_id: Uuid) -> Self {
        AttributionId::Team { team_id }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AttributionId::User { .. } => "user",
            AttributionId::Team { .. } => "team",
        }
    }
}

impl fmt::Display for AttributionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributionId::User { user_id } => write!(f, "user:{}", user_id),
            AttributionId::Team { team_id } => write!(f, "team:{}", team_id),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid attribution id: {0}")]
pub struct ParseAttributionIdError(pub String);

impl FromStr for AttributionId {
    type Err = ParseAttributionIdError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (kind, id) = raw
            .split_once(':')
            .ok_or_else(|| ParseAttributionIdError(raw.to_string()))?;
        let id = Uuid::parse_str(id).map_err(|_| ParseAttributionIdError(raw.to_string()))?;
        match kind {
            "user" => Ok(AttributionId::for_user(id)),
            "team" => Ok(AttributionId::for_team(id)),
            _ => Err(ParseAttributionIdError(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_and_parses_canonical_form() {
        let user_id = Uuid::new_v4();
        let rendered = AttributionId::for_user(user_id).to_string();
        assert_eq!(rendered, format!("user:{}", user_id));
        assert_eq!(
            rendered.parse::<AttributionId>().unwrap(),
            AttributionId::for_user(user_id)
        );

        let team_id = Uuid::new_v4();
        let rendered = AttributionId::for_team(team_id).to_string();
        assert_eq!(
            rendered.parse::<AttributionId>().unwrap(),
            AttributionId::for_team(team_id)
        );
    }

    #[test]
    fn rejects_unknown_kind_and_garbage() {
        assert!("project:whatever".parse::<AttributionId>().is_err());
        assert!("user:not-a-uuid".parse::<AttributionId>().is_err());
        assert!("no-separator".parse::<AttributionId>().is_err());
    }

    #[test]
    fn equality_requires_matching_kind_and_id() {
        let id = Uuid::new_v4();
        assert_eq!(AttributionId::for_user(id), AttributionId::for_user(id));
        assert_ne!(AttributionId::for_user(id), AttributionId::for_team(id));
        assert_ne!(
            AttributionId::for_user(id),
            AttributionId::for_user(Uuid::new_v4())
        );
    }
}
