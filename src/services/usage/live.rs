use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::attribution::AttributionId;
use crate::models::billing::BillingStrategy;
use crate::models::user::User;

use super::{UsageLimitCheck, UsageService, UsageServiceError};

/// HTTP client for the usage API.
pub struct LiveUsageService {
    client: Client,
    base_url: String,
}

impl LiveUsageService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        LiveUsageService { client, base_url }
    }

    fn cost_center_url(&self, attribution_id: &AttributionId, suffix: &str) -> String {
        format!(
            "{}/v1/cost-centers/{}/{}",
            self.base_url, attribution_id, suffix
        )
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BillingStrategyResponse {
    billing_strategy: Option<BillingStrategy>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageLimitResponse {
    reached: bool,
    attribution_id: Option<String>,
}

#[async_trait]
impl UsageService for LiveUsageService {
    async fn get_current_billing_strategy(
        &self,
        attribution_id: &AttributionId,
    ) -> Result<Option<BillingStrategy>, UsageServiceError> {
        let url = self.cost_center_url(attribution_id, "billing-strategy");
        let res = self.client.get(&url).send().await?;

        // No cost center on record yet: treated as "not paid" by callers.
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !res.status().is_success() {
            return Err(UsageServiceError::Api(format!(
                "billing strategy lookup for {} returned {}",
                attribution_id,
                res.status()
            )));
        }

        let body: BillingStrategyResponse = res
            .json()
            .await
            .map_err(|err| UsageServiceError::Serde(err.to_string()))?;
        Ok(body.billing_strategy)
    }

    async fn check_usage_limit_reached(
        &self,
        user: &User,
        organization_id: Option<Uuid>,
    ) -> Result<UsageLimitCheck, UsageServiceError> {
        let scope = organization_id
            .map(AttributionId::for_team)
            .unwrap_or_else(|| user.attribution_id());
        let url = self.cost_center_url(&scope, "usage-limit");
        let res = self.client.get(&url).send().await?;

        if res.status() == StatusCode::NOT_FOUND {
            return Ok(UsageLimitCheck::under_limit());
        }
        if !res.status().is_success() {
            return Err(UsageServiceError::Api(format!(
                "usage limit check for {} returned {}",
                scope,
                res.status()
            )));
        }

        let body: UsageLimitResponse = res
            .json()
            .await
            .map_err(|err| UsageServiceError::Serde(err.to_string()))?;
        let attribution_id = body
            .attribution_id
            .map(|raw| {
                raw.parse::<AttributionId>()
                    .map_err(|err| UsageServiceError::Serde(err.to_string()))
            })
            .transpose()?;
        Ok(UsageLimitCheck {
            reached: body.reached,
            attribution_id,
        })
    }
}
