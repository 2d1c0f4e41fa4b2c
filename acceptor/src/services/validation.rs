use aws_subject_token::{parse_authorization, TokenError};

use crate::{
    config::ValidationMode,
    models::AuthOutcome,
    services::{aws_sts, gcp_sts},
    state::AppState,
    Result,
};

/// Decides the outcome for an `Authorization` header value.
///
/// Headers using another scheme are treated as if no token was sent.
pub async fn authenticate(state: &AppState, authorization: Option<&str>) -> Result<AuthOutcome> {
    let Some(token) = authorization.and_then(parse_authorization) else {
        return Ok(AuthOutcome::NoToken);
    };
    if token.is_empty() {
        return Err(TokenError::Empty.into());
    }

    match state.config.validation_mode {
        ValidationMode::Gcp => {
            gcp_sts::exchange_token(&state.http, &state.config, token).await?;
            Ok(AuthOutcome::VerifiedByGoogle)
        }
        ValidationMode::Aws => {
            let identity = aws_sts::replay_token(&state.http, &state.config, token).await?;
            Ok(AuthOutcome::VerifiedAwsPrincipal(identity))
        }
    }
}
