use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use super::{Decision, DecisionProvider, ProtectError, RequestDetails};
use crate::config::ProtectionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleMode {
    Live,
    DryRun,
}

/// Rule set evaluated by the decision service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    Shield {
        mode: RuleMode,
    },
    DetectBot {
        mode: RuleMode,
        allow: Vec<String>,
    },
    TokenBucket {
        mode: RuleMode,
        refill_rate: u32,
        interval: u32,
        capacity: u32,
    },
}

impl RuleMode {
    fn from_config(config: &ProtectionConfig) -> Self {
        if config.dry_run {
            RuleMode::DryRun
        } else {
            RuleMode::Live
        }
    }
}

impl Rule {
    pub fn from_config(config: &ProtectionConfig) -> Vec<Rule> {
        let mode = RuleMode::from_config(config);
        vec![
            Rule::Shield { mode },
            Rule::DetectBot {
                mode,
                allow: config.allowed_bots.clone(),
            },
            Rule::TokenBucket {
                mode,
                refill_rate: config.refill_rate,
                interval: config.interval_secs,
                capacity: config.capacity,
            },
        ]
    }
}

#[derive(Debug, Serialize)]
struct DecideRequest<'a> {
    request_id: String,
    fingerprint: String,
    requested: u32,
    characteristics: &'a [String],
    request: &'a RequestDetails,
    rules: &'a [Rule],
}

/// Decision provider speaking this service's gateway contract:
/// `POST {url}/v1/decide` with a bearer key, JSON in and out.
/// The gateway is expected to front whatever vendor evaluates the rules.
pub struct RemoteDecisionProvider {
    client: reqwest::Client,
    endpoint: Url,
    key: String,
    characteristics: Vec<String>,
    rules: Vec<Rule>,
}

impl RemoteDecisionProvider {
    pub fn new(config: &ProtectionConfig) -> Result<Self, ProtectError> {
        if config.url.is_empty() {
            return Err(ProtectError::MissingUrl);
        }
        let endpoint = Url::parse(&config.url)
            .and_then(|base| base.join("/v1/decide"))
            .map_err(|e| ProtectError::InvalidUrl(format!("{}: {}", config.url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("catalog-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            key: config.key.clone(),
            characteristics: config.characteristics.clone(),
            rules: Rule::from_config(config),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl DecisionProvider for RemoteDecisionProvider {
    async fn protect(&self, request: &RequestDetails, requested: u32) -> Result<Decision, ProtectError> {
        if self.key.is_empty() {
            return Err(ProtectError::MissingKey);
        }

        let body = DecideRequest {
            request_id: request.id.to_string(),
            fingerprint: request.fingerprint(&self.characteristics),
            requested,
            characteristics: &self.characteristics,
            request,
            rules: &self.rules,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProtectError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let decision = response.json::<Decision>().await?;
        tracing::debug!(
            "decision {} for {} {}: {:?}",
            decision.id,
            request.method,
            request.path,
            decision.conclusion
        );
        Ok(decision)
    }
}
