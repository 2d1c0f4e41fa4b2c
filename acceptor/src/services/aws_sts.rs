use aws_subject_token::{SubjectToken, TokenError};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, Method, StatusCode,
};
use tracing::{info, warn};
use url::Url;

use crate::{
    config::Config,
    errors::ApiError,
    models::{CallerIdentity, GetCallerIdentityResponse},
    Result,
};

const SERVICE: &str = "AWS";

fn unexpected(reason: impl Into<String>) -> ApiError {
    ApiError::UnexpectedResponse {
        service: SERVICE,
        reason: reason.into(),
    }
}

/// Moves the token's path and query onto the configured endpoint.
///
/// The endpoint's own path is kept as a prefix.
pub fn rebase(endpoint: &Url, target: &Url) -> Url {
    let mut url = endpoint.clone();
    let path = format!("{}{}", endpoint.path().trim_end_matches('/'), target.path());
    url.set_path(&path);
    url.set_query(target.query());
    url
}

fn token_headers(token: &SubjectToken) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for header in &token.headers {
        let name = HeaderName::from_bytes(header.key.as_bytes())
            .map_err(|_| TokenError::InvalidHeader(header.key.clone()))?;
        let value = HeaderValue::from_str(&header.value)
            .map_err(|_| TokenError::InvalidHeader(header.key.clone()))?;
        headers.append(name, value);
    }
    Ok(headers)
}

/// Replays the signed `GetCallerIdentity` request and returns the signer.
///
/// AWS only answers 200 when the signature is valid and fresh, so a parsed
/// identity proves the caller held the credentials when the token was made.
pub async fn replay_token(
    http: &Client,
    config: &Config,
    subject_token: &str,
) -> Result<CallerIdentity> {
    let token = SubjectToken::decode(subject_token)?;
    let target = token.validate_target()?;
    let url = match &config.aws_sts_endpoint {
        Some(endpoint) => rebase(endpoint, &target),
        None => target,
    };
    let method = Method::from_bytes(token.method.as_bytes())
        .map_err(|_| TokenError::DisallowedTarget(format!("method {} is not allowed", token.method)))?;

    let response = http
        .request(method, url)
        .headers(token_headers(&token)?)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if status != StatusCode::OK {
        warn!("AWS STS returned status {}", status);
        return Err(ApiError::Rejected {
            service: SERVICE,
            status: status.as_u16(),
            body,
        });
    }

    let identity = parse_caller_identity(&body)?;
    info!("AWS STS confirmed identity {}", identity.arn);
    Ok(identity)
}

/// Reads the ARN, account and user id out of a `GetCallerIdentityResponse`
pub fn parse_caller_identity(xml: &str) -> Result<CallerIdentity> {
    let response: GetCallerIdentityResponse = quick_xml::de::from_str(xml)
        .map_err(|e| unexpected(format!("Failed to parse AWS STS response: {e}")))?;

    let result = response
        .result
        .ok_or_else(|| unexpected("GetCallerIdentityResult not found in AWS STS response"))?;

    let arn = result
        .arn
        .filter(|arn| !arn.is_empty())
        .ok_or_else(|| unexpected("Arn not found under GetCallerIdentityResult in AWS STS response"))?;

    Ok(CallerIdentity {
        arn,
        account: result.account,
        user_id: result.user_id,
    })
}
