//! Wire format shared by the token issuer and the token acceptor.
//!
//! A subject token is an AWS STS `GetCallerIdentity` request that has already
//! been signed with SigV4. Whoever holds it can replay the request once to
//! learn the signer's identity, but cannot derive the signer's credentials.
//! The JSON layout is the one Google Cloud STS accepts for the
//! `urn:ietf:params:aws:token-type:aws4_request` subject token type.

pub mod authorization;
pub mod errors;
pub mod token;

pub use authorization::{authorization_value, parse_authorization};
pub use errors::TokenError;
pub use token::{SubjectToken, TokenHeader};

/// Result type for token operations
pub type Result<T> = std::result::Result<T, TokenError>;

/// Scheme of the `Authorization` header carrying a subject token.
pub const AUTH_SCHEME: &str = "aws-fed-id";

/// Workload identity pool provider the tokens are minted for.
pub const DEFAULT_AUDIENCE: &str = "//iam.googleapis.com/projects/252090236040/locations/global/workloadIdentityPools/nnoare/providers/nnoare";

pub const DEFAULT_REGION: &str = "us-east-1";

pub const GCP_STS_URL: &str = "https://sts.googleapis.com/v1/token";

/// Signed header binding the token to a single audience.
pub const TARGET_RESOURCE_HEADER: &str = "x-goog-cloud-target-resource";

pub const STS_ACTION: &str = "GetCallerIdentity";
pub const STS_VERSION: &str = "2011-06-15";
pub const STS_SIGNING_NAME: &str = "sts";

// RFC 8693 token exchange parameters
pub const GRANT_TYPE_TOKEN_EXCHANGE: &str = "urn:ietf:params:oauth:grant-type:token-exchange";
pub const TOKEN_TYPE_ACCESS_TOKEN: &str = "urn:ietf:params:oauth:token-type:access_token";
pub const TOKEN_TYPE_AWS4_REQUEST: &str = "urn:ietf:params:aws:token-type:aws4_request";
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Host name of the regional STS endpoint
pub fn sts_host(region: &str) -> String {
    format!("sts.{region}.amazonaws.com")
}

/// Full `GetCallerIdentity` URL of the regional STS endpoint
pub fn sts_url(region: &str) -> String {
    format!(
        "https://{}/?Action={}&Version={}",
        sts_host(region),
        STS_ACTION,
        STS_VERSION
    )
}

/// Value of the target resource header for an audience.
pub fn target_resource(audience: &str) -> &str {
    audience.trim_start_matches("https://")
}
