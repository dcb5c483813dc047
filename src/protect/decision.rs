use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Conclusion {
    Allow,
    Deny,
    Challenge,
    Error,
}

/// Why a rule (or the decision as a whole) concluded the way it did
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    RateLimit {
        #[serde(default)]
        max: u32,
        #[serde(default)]
        remaining: u32,
        #[serde(default)]
        reset: u64,
    },
    Bot {
        #[serde(default)]
        allowed: Vec<String>,
        #[serde(default)]
        denied: Vec<String>,
        #[serde(default)]
        spoofed: bool,
        #[serde(default)]
        verified: bool,
    },
    Shield {
        #[serde(default)]
        shield_triggered: bool,
    },
    #[default]
    #[serde(other)]
    Other,
}

impl Reason {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Reason::RateLimit { .. })
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, Reason::Bot { .. })
    }

    pub fn is_spoofed(&self) -> bool {
        matches!(self, Reason::Bot { spoofed: true, .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    #[serde(default)]
    pub rule: String,
    pub conclusion: Conclusion,
    #[serde(default)]
    pub reason: Reason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    #[serde(default)]
    pub id: String,
    pub conclusion: Conclusion,
    #[serde(default)]
    pub reason: Reason,
    #[serde(default)]
    pub results: Vec<RuleResult>,
}

/// Outcome of the protective check for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    DenyRateLimit,
    DenyBot,
    DenySpoofedBot,
    DenyOther,
}

impl Decision {
    pub fn is_denied(&self) -> bool {
        self.conclusion == Conclusion::Deny
    }

    /// Deny reasons first, then the spoofed-bot check over allowed decisions
    pub fn verdict(&self) -> Verdict {
        if self.is_denied() {
            return match &self.reason {
                Reason::RateLimit { .. } => Verdict::DenyRateLimit,
                Reason::Bot { .. } => Verdict::DenyBot,
                Reason::Shield { .. } | Reason::Other => Verdict::DenyOther,
            };
        }

        if self
            .results
            .iter()
            .any(|result| result.reason.is_bot() && result.reason.is_spoofed())
        {
            return Verdict::DenySpoofedBot;
        }

        Verdict::Allow
    }
}

impl Verdict {
    /// The error response for a denial, `None` when the request may proceed
    pub fn rejection(&self) -> Option<ApiError> {
        match self {
            Verdict::Allow => None,
            Verdict::DenyRateLimit => Some(ApiError::too_many_requests("Too Many Requests")),
            Verdict::DenyBot => Some(ApiError::forbidden("Bot access denied")),
            Verdict::DenySpoofedBot => Some(ApiError::forbidden("Spoofed bot detected")),
            Verdict::DenyOther => Some(ApiError::forbidden("Forbidden")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    fn decision(v: serde_json::Value) -> Decision {
        serde_json::from_value(v).unwrap()
    }

    fn spoofed_bot_result() -> serde_json::Value {
        json!({ "rule": "detect_bot", "conclusion": "ALLOW",
                "reason": { "type": "BOT", "spoofed": true } })
    }

    #[test]
    fn rate_limit_wins_over_everything_else() {
        let d = decision(json!({
            "id": "d1",
            "conclusion": "DENY",
            "reason": { "type": "RATE_LIMIT", "max": 10, "remaining": 0, "reset": 4 },
            "results": [spoofed_bot_result()]
        }));
        assert_eq!(d.verdict(), Verdict::DenyRateLimit);
        let err = d.verdict().rejection().unwrap();
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn denied_bot_is_forbidden_with_bot_message() {
        let d = decision(json!({
            "conclusion": "DENY",
            "reason": { "type": "BOT", "denied": ["CURL"], "spoofed": false }
        }));
        assert_eq!(d.verdict(), Verdict::DenyBot);
        let err = d.verdict().rejection().unwrap();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_json(), json!({ "error": "Bot access denied" }));
    }

    #[test]
    fn other_deny_reasons_are_generic() {
        let shield = decision(json!({ "conclusion": "DENY", "reason": { "type": "SHIELD", "shield_triggered": true } }));
        assert_eq!(shield.verdict(), Verdict::DenyOther);

        let unknown = decision(json!({ "conclusion": "DENY", "reason": { "type": "EMAIL" } }));
        assert_eq!(unknown.reason, Reason::Other);
        assert_eq!(unknown.verdict(), Verdict::DenyOther);
        assert_eq!(unknown.verdict().rejection().unwrap().to_json(), json!({ "error": "Forbidden" }));
    }

    #[test]
    fn allowed_decision_with_spoofed_bot_result_is_denied() {
        let d = decision(json!({
            "conclusion": "ALLOW",
            "reason": { "type": "RATE_LIMIT", "remaining": 9 },
            "results": [
                { "rule": "token_bucket", "conclusion": "ALLOW", "reason": { "type": "RATE_LIMIT", "remaining": 9 } },
                spoofed_bot_result()
            ]
        }));
        assert_eq!(d.verdict(), Verdict::DenySpoofedBot);
        assert_eq!(
            d.verdict().rejection().unwrap().to_json(),
            json!({ "error": "Spoofed bot detected" })
        );
    }

    #[test]
    fn verified_bot_and_missing_fields_are_allowed() {
        let d = decision(json!({
            "conclusion": "ALLOW",
            "results": [{ "conclusion": "ALLOW", "reason": { "type": "BOT", "allowed": ["GOOGLE_CRAWLER"], "verified": true } }]
        }));
        assert_eq!(d.verdict(), Verdict::Allow);
        assert!(d.verdict().rejection().is_none());
    }

    #[test]
    fn error_conclusion_fails_open() {
        let d = decision(json!({ "conclusion": "ERROR" }));
        assert_eq!(d.verdict(), Verdict::Allow);
    }
}
