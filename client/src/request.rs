use std::fmt::Write as _;
use std::time::Duration;

use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode, Url};

use crate::errors::{ClientError, Result};

/// A single outbound request as described on the command line
#[derive(Debug)]
pub struct OutboundRequest {
    pub url: Url,
    pub method: Method,
    pub body: Option<String>,
    /// Full `Authorization` header value
    pub authorization: Option<String>,
}

impl OutboundRequest {
    pub fn new(url: &str, method: &str, body: Option<&str>) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| ClientError::InvalidUrl(url.to_owned(), e))?;
        let method = Method::from_bytes(method.to_uppercase().as_bytes())
            .map_err(|_| ClientError::InvalidMethod(method.to_owned()))?;

        Ok(Self {
            url,
            method,
            body: body.map(ToOwned::to_owned),
            authorization: None,
        })
    }
}

/// What the server answered
#[derive(Debug)]
pub struct ReceivedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ReceivedResponse {
    /// Status line, header block, blank line, then the body.
    pub fn render(&self) -> String {
        let mut out = format!("Status: {}\nHeaders:\n", self.status.as_u16());
        for (name, value) in &self.headers {
            let _ = writeln!(out, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
        }
        out.push('\n');
        out.push_str(&self.body);
        out
    }
}

pub fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Sends the request. Any HTTP status counts as a response.
pub async fn send(client: &Client, outbound: OutboundRequest) -> Result<ReceivedResponse> {
    let mut builder = client.request(outbound.method, outbound.url);
    if let Some(authorization) = outbound.authorization {
        builder = builder.header(AUTHORIZATION, authorization);
    }
    if let Some(body) = outbound.body {
        builder = builder.body(body);
    }
    let request = builder.build()?;

    tracing::info!("Request headers:");
    for (name, value) in request.headers() {
        tracing::info!("  {}: {}", name, redact(*name == AUTHORIZATION, value.as_bytes()));
    }

    let response = client.execute(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.text().await?;

    Ok(ReceivedResponse {
        status,
        headers,
        body,
    })
}

fn redact(secret: bool, value: &[u8]) -> String {
    let value = String::from_utf8_lossy(value);
    if !secret {
        return value.into_owned();
    }
    match value.split_once(' ') {
        Some((scheme, token)) => format!("{scheme} <redacted, {} bytes>", token.len()),
        None => "<redacted>".to_string(),
    }
}
