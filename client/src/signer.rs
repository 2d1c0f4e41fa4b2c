use std::collections::BTreeMap;
use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningParams, SigningSettings};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use aws_subject_token::{
    sts_host, sts_url, target_resource, SubjectToken, STS_SIGNING_NAME, TARGET_RESOURCE_HEADER,
};

use crate::errors::{ClientError, Result};

const SIGNED_METHOD: &str = "POST";

/// Signs an STS `GetCallerIdentity` request bound to `audience`.
///
/// The returned token lists every header of the signed request, lowercased
/// and sorted by name.
pub fn generate_subject_token(
    audience: &str,
    region: &str,
    credentials: Credentials,
    time: SystemTime,
) -> Result<SubjectToken> {
    let url = sts_url(region);
    let host = sts_host(region);
    let unsigned_headers = [
        ("host", host.as_str()),
        (TARGET_RESOURCE_HEADER, target_resource(audience)),
    ];

    let identity: Identity = credentials.into();
    let signing_params: SigningParams<'_> = v4::SigningParams::builder()
        .identity(&identity)
        .region(region)
        .name(STS_SIGNING_NAME)
        .time(time)
        .settings(SigningSettings::default())
        .build()
        .map_err(|e| ClientError::Signing(e.to_string()))?
        .into();

    let signable = SignableRequest::new(
        SIGNED_METHOD,
        url.as_str(),
        unsigned_headers.iter().copied(),
        SignableBody::Bytes(&[]),
    )
    .map_err(|e| ClientError::Signing(e.to_string()))?;

    let (instructions, _signature) = sign(signable, &signing_params)
        .map_err(|e| ClientError::Signing(e.to_string()))?
        .into_parts();

    let mut headers: BTreeMap<String, String> = unsigned_headers
        .iter()
        .map(|(name, value)| (name.to_lowercase(), (*value).to_owned()))
        .collect();
    // First value wins
    for (name, value) in instructions.headers() {
        headers
            .entry(name.to_lowercase())
            .or_insert_with(|| value.to_owned());
    }

    let token = SubjectToken::new(url, SIGNED_METHOD, headers);
    tracing::debug!("Subject token: {}", token.to_json()?);
    Ok(token)
}
