use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::{
    errors::ApiError,
    models::{AuthOutcome, AuthResponse, ErrorResponse, Status},
};

const TITLE: &str = "AWS Token to GCP Auth Server";

/// Response format negotiated from the `Accept` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
}

impl Format {
    pub fn negotiate(headers: &HeaderMap) -> Self {
        let wants_json = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .any(|media| {
                media
                    .split(';')
                    .next()
                    .is_some_and(|m| m.trim().eq_ignore_ascii_case("application/json"))
            });

        if wants_json {
            Format::Json
        } else {
            Format::Html
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Full HTML document carrying a single message paragraph
pub fn html_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{TITLE}</title>
</head>
<body>
    <h1>{TITLE}</h1>
    <p>{}</p>
</body>
</html>
"#,
        escape_html(message)
    )
}

fn html_response(status: StatusCode, message: &str) -> Response {
    let mut response = (status, Html(html_page(message))).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    response
}

pub fn render_outcome(format: Format, outcome: &AuthOutcome) -> Response {
    match format {
        Format::Html => html_response(StatusCode::OK, &outcome.message()),
        Format::Json => (StatusCode::OK, Json(AuthResponse::from(outcome))).into_response(),
    }
}

/// Renders an error without leaking upstream detail
pub fn render_error(format: Format, err: &ApiError) -> Response {
    let status = err.status_code();
    let message = err.public_message().to_string();
    match format {
        Format::Html => html_response(status, &message),
        Format::Json => (
            status,
            Json(ErrorResponse {
                status: Status::Error,
                error: message,
            }),
        )
            .into_response(),
    }
}
