use aws_config::BehaviorVersion;
use aws_credential_types::{provider::ProvideCredentials, Credentials};
use aws_types::region::Region;

use crate::errors::{ClientError, Result};

/// Resolves credentials through the AWS default provider chain.
///
/// The chain covers environment variables, shared profiles (including SSO
/// sessions cached by `aws sso login`), web identity, and container or
/// instance metadata.
pub async fn resolve_credentials(region: &str) -> Result<Credentials> {
    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_owned()))
        .load()
        .await;

    let provider = aws_config
        .credentials_provider()
        .ok_or(ClientError::NoCredentialsProvider)?;

    let credentials = provider.provide_credentials().await?;
    tracing::debug!(
        "Resolved AWS credentials for access key {}",
        credentials.access_key_id()
    );

    Ok(credentials)
}
