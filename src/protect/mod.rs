//! Request protection backed by an external decision service.
//!
//! The service owns the actual rate-limit, bot and shield logic. This module
//! describes the request to it, decodes the returned decision and reduces it
//! to a [`Verdict`].

pub mod decision;
pub mod remote;
pub mod request;

use async_trait::async_trait;
use thiserror::Error;

pub use decision::{Conclusion, Decision, Reason, RuleResult, Verdict};
pub use remote::RemoteDecisionProvider;
pub use request::RequestDetails;

/// Tokens each request draws from the bucket
pub const REQUESTED_TOKENS: u32 = 1;

#[derive(Debug, Error)]
pub enum ProtectError {
    #[error("Protection key is not configured")]
    MissingKey,

    #[error("PROTECT_URL is required when protection is enabled")]
    MissingUrl,

    #[error("Invalid decision service URL: {0}")]
    InvalidUrl(String),

    #[error("Decision service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Source of verdicts for inbound requests
#[async_trait]
pub trait DecisionProvider: Send + Sync {
    async fn protect(&self, request: &RequestDetails, requested: u32) -> Result<Decision, ProtectError>;
}
