use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::{errors::TokenError, Result, STS_ACTION};

const ALLOWED_METHODS: [&str; 2] = ["POST", "GET"];

/// A single header of the signed request, keyed by lowercase name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    pub key: String,
    pub value: String,
}

/// Signed STS request in the layout Google Cloud STS expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectToken {
    /// Target URL including the `Action` and `Version` query
    pub url: String,
    /// HTTP method the request was signed for
    pub method: String,
    pub headers: Vec<TokenHeader>,
}

impl SubjectToken {
    pub fn new(
        url: impl Into<String>,
        method: impl Into<String>,
        headers: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            headers: headers
                .into_iter()
                .map(|(key, value)| TokenHeader {
                    key: key.to_lowercase(),
                    value,
                })
                .collect(),
        }
    }

    /// JSON document of the token
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Form-urlencodes the JSON document so it fits in a header value.
    pub fn encode(&self) -> Result<String> {
        let json = self.to_json()?;
        Ok(form_urlencoded::byte_serialize(json.as_bytes()).collect())
    }

    /// Reverses [`SubjectToken::encode`].
    pub fn decode(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(TokenError::Empty);
        }
        let unplussed = text.replace('+', " ");
        let json = urlencoding::decode(&unplussed)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// First value of a header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.key.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Ensures the token can only be replayed against AWS STS.
    pub fn validate_target(&self) -> Result<Url> {
        if !ALLOWED_METHODS.contains(&self.method.as_str()) {
            return Err(TokenError::DisallowedTarget(format!(
                "method {} is not allowed",
                self.method
            )));
        }

        let url = Url::parse(&self.url)?;

        if url.scheme() != "https" {
            return Err(TokenError::DisallowedTarget(format!(
                "scheme must be https, got {}",
                url.scheme()
            )));
        }
        if url.port().is_some() || !url.username().is_empty() || url.password().is_some() {
            return Err(TokenError::DisallowedTarget(
                "port and user info are not allowed".to_string(),
            ));
        }

        let host = url.host_str().unwrap_or_default();
        if !is_sts_host(host) {
            return Err(TokenError::DisallowedTarget(format!(
                "{host} is not an AWS STS endpoint"
            )));
        }

        let has_action = url
            .query_pairs()
            .any(|(key, value)| key == "Action" && value == STS_ACTION);
        if !has_action {
            return Err(TokenError::DisallowedTarget(format!(
                "only the {STS_ACTION} action is allowed"
            )));
        }

        Ok(url)
    }
}

/// `sts.amazonaws.com`, `sts.<region>.amazonaws.com` or the `.com.cn` variants
fn is_sts_host(host: &str) -> bool {
    let Some(prefix) = host
        .strip_suffix(".amazonaws.com.cn")
        .or_else(|| host.strip_suffix(".amazonaws.com"))
    else {
        return false;
    };

    match prefix.strip_prefix("sts") {
        Some("") => true,
        Some(rest) => rest.strip_prefix('.').is_some_and(|region| {
            !region.is_empty()
                && region
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        }),
        None => false,
    }
}
