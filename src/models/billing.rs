use serde::{Deserialize, Serialize};

/// Coarse billing regime an account is governed by. `None` means payment is
/// disabled for the whole installation (self-hosted/dedicated), in which case
/// no billing lookups happen at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum BillingMode {
    None,
    UsageBased {
        /// Present for organization subjects once a billing strategy is
        /// known. Unset on the legacy single-user path, which does not
        /// distinguish paid from free.
        #[serde(skip_serializing_if = "Option::is_none")]
        paid: Option<bool>,
    },
}

impl BillingMode {
    pub fn is_paid(&self) -> bool {
        matches!(
            self,
            BillingMode::UsageBased { paid: Some(true) }
        )
    }
}

/// How the usage backend bills a given attribution. `Stripe` means an active
/// card-on-file subscription; `Other` covers free and trial accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingStrategy {
    Stripe,
    Other,
}

impl BillingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingStrategy::Stripe => "stripe",
            BillingStrategy::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingTier {
    Free,
    Paid,
}

impl BillingTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingTier::Free => "free",
            BillingTier::Paid => "paid",
        }
    }
}

/// Default duration class for workspace timeouts and lifetimes. The concrete
/// durations live with the orchestrator; the engine only picks the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceDuration {
    Short,
    Long,
}

impl WorkspaceDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceDuration::Short => "short",
            WorkspaceDuration::Long => "long",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn billing_mode_wire_shape_is_stable() {
        assert_eq!(
            serde_json::to_value(BillingMode::None).unwrap(),
            json!({"mode": "none"})
        );
        assert_eq!(
            serde_json::to_value(BillingMode::UsageBased { paid: Some(true) }).unwrap(),
            json!({"mode": "usage-based", "paid": true})
        );
        // The legacy user path leaves `paid` out entirely.
        assert_eq!(
            serde_json::to_value(BillingMode::UsageBased { paid: None }).unwrap(),
            json!({"mode": "usage-based"})
        );
    }

    #[test]
    fn only_explicitly_paid_usage_based_counts_as_paid() {
        assert!(BillingMode::UsageBased { paid: Some(true) }.is_paid());
        assert!(!BillingMode::UsageBased { paid: Some(false) }.is_paid());
        assert!(!BillingMode::UsageBased { paid: None }.is_paid());
        assert!(!BillingMode::None.is_paid());
    }

    #[test]
    fn billing_strategy_round_trips() {
        let parsed: BillingStrategy = serde_json::from_str("\"stripe\"").unwrap();
        assert_eq!(parsed, BillingStrategy::Stripe);
        assert_eq!(BillingStrategy::Other.as_str(), "other");
    }
}
