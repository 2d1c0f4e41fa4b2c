use serde::{Deserialize, Serialize};

use super::{AuthOutcome, CallerIdentity};
use crate::config::ValidationMode;

/// JSON rendering of an authentication decision
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub authenticated: bool,
    /// Which identity provider accepted the token
    pub validated_by: Option<ValidationMode>,
    pub principal: Option<CallerIdentity>,
    pub message: String,
}

impl From<&AuthOutcome> for AuthResponse {
    fn from(outcome: &AuthOutcome) -> Self {
        AuthResponse {
            authenticated: outcome.is_authenticated(),
            validated_by: outcome.validated_by(),
            principal: outcome.principal().cloned(),
            message: outcome.message(),
        }
    }
}

/// General API response status
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Standard error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status will always be Error for this type
    pub status: Status,
    pub error: String,
}
