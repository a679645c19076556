#![allow(dead_code)]
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::attribution::AttributionId;
use crate::models::billing::BillingStrategy;
use crate::models::user::User;

use super::{UsageLimitCheck, UsageService, UsageServiceError};

/// Scriptable usage backend for tests. Strategies, artificial latency, and
/// failures are keyed by the rendered attribution id; calls are captured so
/// tests can assert on lookup counts and scoping.
#[derive(Default)]
pub struct MockUsageService {
    pub strategies: Mutex<HashMap<String, BillingStrategy>>,
    pub delays: Mutex<HashMap<String, Duration>>,
    pub failing: Mutex<HashSet<String>>,
    pub usage_limit: Mutex<Option<UsageLimitCheck>>,
    pub strategy_calls: Mutex<Vec<AttributionId>>,
    pub usage_limit_calls: Mutex<Vec<AttributionId>>,
}

impl MockUsageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(self, attribution_id: AttributionId, strategy: BillingStrategy) -> Self {
        self.strategies
            .lock()
            .unwrap()
            .insert(attribution_id.to_string(), strategy);
        self
    }

    pub fn with_delayed_strategy(
        self,
        attribution_id: AttributionId,
        strategy: BillingStrategy,
        delay: Duration,
    ) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(attribution_id.to_string(), delay);
        self.with_strategy(attribution_id, strategy)
    }

    pub fn with_failing_strategy(self, attribution_id: AttributionId) -> Self {
        self.failing
            .lock()
            .unwrap()
            .insert(attribution_id.to_string());
        self
    }

    pub fn with_failing_strategy_after(
        self,
        attribution_id: AttributionId,
        delay: Duration,
    ) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(attribution_id.to_string(), delay);
        self.with_failing_strategy(attribution_id)
    }

    pub fn with_usage_limit(self, check: UsageLimitCheck) -> Self {
        *self.usage_limit.lock().unwrap() = Some(check);
        self
    }

    pub fn strategy_call_count(&self) -> usize {
        self.strategy_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl UsageService for MockUsageService {
    async fn get_current_billing_strategy(
        &self,
        attribution_id: &AttributionId,
    ) -> Result<Option<BillingStrategy>, UsageServiceError> {
        let key = attribution_id.to_string();
        self.strategy_calls.lock().unwrap().push(*attribution_id);

        let delay = self.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(&key) {
            return Err(UsageServiceError::Api(format!(
                "strategy lookup for {} failed",
                key
            )));
        }
        Ok(self.strategies.lock().unwrap().get(&key).copied())
    }

    async fn check_usage_limit_reached(
        &self,
        user: &User,
        organization_id: Option<Uuid>,
    ) -> Result<UsageLimitCheck, UsageServiceError> {
        let scope = organization_id
            .map(AttributionId::for_team)
            .unwrap_or_else(|| user.attribution_id());
        self.usage_limit_calls.lock().unwrap().push(scope);

        let configured = self.usage_limit.lock().unwrap().clone();
        Ok(configured.unwrap_or_else(UsageLimitCheck::under_limit))
    }
}
