use aws_subject_token::TokenError;
use axum::http::StatusCode;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Malformed subject token: {0}")]
    MalformedToken(#[from] TokenError),

    #[error("{service} STS returned status {status}: {body}")]
    Rejected {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unexpected {service} STS response: {reason}")]
    UnexpectedResponse {
        service: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Upstream(#[from] reqwest::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedToken(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected { .. } => StatusCode::UNAUTHORIZED,
            ApiError::UnexpectedResponse { .. } | ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Text safe to show to the caller
    pub fn public_message(&self) -> ErrorMessages {
        match self {
            ApiError::MalformedToken(_) => ErrorMessages::MalformedToken,
            ApiError::Rejected { .. } => ErrorMessages::Rejected,
            ApiError::UnexpectedResponse { .. } => ErrorMessages::UnexpectedResponse,
            ApiError::Upstream(_) => ErrorMessages::Unreachable,
        }
    }
}

/// Error messages for the API Responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMessages {
    MalformedToken,
    Rejected,
    UnexpectedResponse,
    Unreachable,
}

impl fmt::Display for ErrorMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ErrorMessages::MalformedToken => "The AWS authentication token is malformed",
            ErrorMessages::Rejected => "The AWS authentication token was rejected",
            ErrorMessages::UnexpectedResponse => {
                "The identity provider returned an unexpected response"
            }
            ErrorMessages::Unreachable => "The identity provider could not be reached",
        };
        write!(f, "{message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let malformed = ApiError::from(TokenError::DisallowedTarget("x".to_string()));
        assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            malformed.public_message().to_string(),
            "The AWS authentication token is malformed"
        );

        let rejected = ApiError::Rejected {
            service: "AWS",
            status: 403,
            body: "<ErrorResponse/>".to_string(),
        };
        assert_eq!(rejected.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            rejected.to_string(),
            "AWS STS returned status 403: <ErrorResponse/>"
        );

        let unexpected = ApiError::UnexpectedResponse {
            service: "AWS",
            reason: "Arn not found".to_string(),
        };
        assert_eq!(unexpected.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            unexpected.public_message(),
            ErrorMessages::UnexpectedResponse
        );
    }
}
