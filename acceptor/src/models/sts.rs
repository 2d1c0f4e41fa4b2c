use serde::Deserialize;

/// Successful Google Cloud STS token exchange.
///
/// The access token itself is never read, logged or returned.
#[derive(Debug, Deserialize)]
pub struct GcpTokenResponse {
    pub issued_token_type: Option<String>,
    /// Lifetime in seconds
    pub expires_in: Option<u64>,
}

/// OAuth error body of a failed exchange
#[derive(Debug, Deserialize)]
pub struct GcpErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

/// `GetCallerIdentity` XML response from AWS STS
#[derive(Debug, Deserialize)]
pub struct GetCallerIdentityResponse {
    #[serde(rename = "GetCallerIdentityResult")]
    pub result: Option<GetCallerIdentityResult>,
}

#[derive(Debug, Deserialize)]
pub struct GetCallerIdentityResult {
    #[serde(rename = "Arn")]
    pub arn: Option<String>,
    #[serde(rename = "UserId")]
    pub user_id: Option<String>,
    #[serde(rename = "Account")]
    pub account: Option<String>,
}
