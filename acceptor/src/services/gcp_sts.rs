use aws_subject_token::{
    CLOUD_PLATFORM_SCOPE, GRANT_TYPE_TOKEN_EXCHANGE, TOKEN_TYPE_ACCESS_TOKEN,
    TOKEN_TYPE_AWS4_REQUEST,
};
use reqwest::{Client, StatusCode};
use tracing::{info, warn};

use crate::{
    config::Config,
    errors::ApiError,
    models::{GcpErrorResponse, GcpTokenResponse},
    Result,
};

const SERVICE: &str = "GCP";

/// Form fields of the RFC 8693 token exchange request
pub fn exchange_form<'a>(audience: &'a str, subject_token: &'a str) -> [(&'static str, &'a str); 6] {
    [
        ("audience", audience),
        ("grant_type", GRANT_TYPE_TOKEN_EXCHANGE),
        ("requested_token_type", TOKEN_TYPE_ACCESS_TOKEN),
        ("scope", CLOUD_PLATFORM_SCOPE),
        ("subject_token_type", TOKEN_TYPE_AWS4_REQUEST),
        ("subject_token", subject_token),
    ]
}

/// Exchanges the subject token for a federated access token.
///
/// A 200 from Google means the AWS signature checked out and the signer is
/// allowed by the workload identity pool. The subject token is forwarded
/// exactly as received.
pub async fn exchange_token(
    http: &Client,
    config: &Config,
    subject_token: &str,
) -> Result<GcpTokenResponse> {
    let response = http
        .post(config.gcp_sts_url.clone())
        .form(&exchange_form(&config.audience, subject_token))
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if status != StatusCode::OK {
        match serde_json::from_str::<GcpErrorResponse>(&body) {
            Ok(err) => warn!(
                "GCP STS rejected token: {} ({})",
                err.error,
                err.error_description.as_deref().unwrap_or("no description")
            ),
            Err(_) => warn!("GCP STS returned status {}", status),
        }
        return Err(ApiError::Rejected {
            service: SERVICE,
            status: status.as_u16(),
            body,
        });
    }

    let exchanged: GcpTokenResponse =
        serde_json::from_str(&body).map_err(|e| ApiError::UnexpectedResponse {
            service: SERVICE,
            reason: format!("Failed to parse token response: {e}"),
        })?;

    info!(
        "GCP STS issued a {} valid for {}s",
        exchanged.issued_token_type.as_deref().unwrap_or("token"),
        exchanged.expires_in.unwrap_or_default()
    );

    Ok(exchanged)
}
