use serde::{Deserialize, Serialize};

use crate::config::ValidationMode;

/// Identity AWS STS reported for the signer of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// ARN of the IAM user or assumed role
    pub arn: String,
    pub account: Option<String>,
    pub user_id: Option<String>,
}

/// Decision reached for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// No `aws-fed-id` authorization header was present
    NoToken,
    /// Google Cloud STS accepted the token
    VerifiedByGoogle,
    /// AWS STS accepted the replayed request
    VerifiedAwsPrincipal(CallerIdentity),
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AuthOutcome::NoToken)
    }

    pub fn validated_by(&self) -> Option<ValidationMode> {
        match self {
            AuthOutcome::NoToken => None,
            AuthOutcome::VerifiedByGoogle => Some(ValidationMode::Gcp),
            AuthOutcome::VerifiedAwsPrincipal(_) => Some(ValidationMode::Aws),
        }
    }

    pub fn principal(&self) -> Option<&CallerIdentity> {
        match self {
            AuthOutcome::VerifiedAwsPrincipal(identity) => Some(identity),
            _ => None,
        }
    }

    /// Human-readable description shown on the page
    pub fn message(&self) -> String {
        match self {
            AuthOutcome::NoToken => "There was no authentication token".to_string(),
            AuthOutcome::VerifiedByGoogle => {
                "The request contained a valid AWS authentication token according to google"
                    .to_string()
            }
            AuthOutcome::VerifiedAwsPrincipal(identity) => format!(
                "The request contained a valid AWS authentication token for role ARN: {}",
                identity.arn
            ),
        }
    }
}
