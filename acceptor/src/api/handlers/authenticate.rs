use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Method, Uri},
    response::Response,
};
use tracing::{info, warn};

use crate::{
    api::page::{render_error, render_outcome, Format},
    logging::audit,
    services::authenticate,
    state::AppState,
};

/// Handler for every path and method not routed elsewhere.
///
/// Checks the `aws-fed-id` authorization header, if any, and renders the
/// decision as an HTML page or as JSON when the caller accepts it.
pub async fn authenticate_request(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let format = Format::negotiate(&headers);
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match authenticate(&state, authorization).await {
        Ok(outcome) => {
            info!("{} {}: {}", method, uri.path(), outcome.message());
            let principal = outcome.principal().map(|identity| identity.arn.as_str());
            let label = match outcome.validated_by() {
                Some(mode) => format!("verified by {mode}"),
                None => "no token".to_string(),
            };
            audit(method.as_str(), uri.path(), 200, &label, principal);
            render_outcome(format, &outcome)
        }
        Err(err) => {
            warn!("{} {}: {}", method, uri.path(), err);
            let response = render_error(format, &err);
            audit(
                method.as_str(),
                uri.path(),
                response.status().as_u16(),
                &err.public_message().to_string(),
                None,
            );
            response
        }
    }
}
