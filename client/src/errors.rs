use aws_credential_types::provider::error::CredentialsError;
use aws_subject_token::TokenError;
use thiserror::Error;

// ClientErrors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid URL {0}: {1}")]
    InvalidUrl(String, url::ParseError),
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("No AWS credentials provider is configured")]
    NoCredentialsProvider,
    #[error("Failed to resolve AWS credentials: {0}")]
    Credentials(#[from] CredentialsError),
    #[error("Failed to sign the STS request: {0}")]
    Signing(String),
    #[error("Failed to encode subject token: {0}")]
    Token(#[from] TokenError),
    #[error("Failed to generate subject token: {0}")]
    SubjectToken(Box<ClientError>),
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
