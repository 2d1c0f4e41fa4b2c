use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token is empty")]
    Empty,

    #[error("Failed decoding token text: {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error("Token is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token target is not a valid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Token target not allowed: {0}")]
    DisallowedTarget(String),

    #[error("Token carries an invalid header: {0}")]
    InvalidHeader(String),
}
