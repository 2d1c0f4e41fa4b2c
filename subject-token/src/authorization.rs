use crate::AUTH_SCHEME;

/// Extracts the subject token from an `Authorization` header value.
///
/// Returns `None` unless the value uses the `aws-fed-id` scheme. The scheme
/// match is case-sensitive and expects a single separating space.
pub fn parse_authorization(value: &str) -> Option<&str> {
    value
        .strip_prefix(AUTH_SCHEME)
        .and_then(|rest| rest.strip_prefix(' '))
        .map(str::trim)
}

/// Builds the `Authorization` header value for a subject token
pub fn authorization_value(token: &str) -> String {
    format!("{AUTH_SCHEME} {token}")
}
