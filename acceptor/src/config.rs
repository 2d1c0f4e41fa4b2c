use aws_subject_token::{DEFAULT_AUDIENCE, GCP_STS_URL};
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};
use url::Url;

/// How an incoming subject token is checked
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Exchange the token at Google Cloud STS
    #[default]
    Gcp,
    /// Replay the signed request against AWS STS
    Aws,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Gcp => write!(f, "gcp"),
            ValidationMode::Aws => write!(f, "aws"),
        }
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gcp" => Ok(ValidationMode::Gcp),
            "aws" => Ok(ValidationMode::Aws),
            other => Err(format!("unknown validation mode: {other}")),
        }
    }
}

/// Configuration for the acceptor
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Port to run the server on
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub validation_mode: ValidationMode,
    /// Workload identity pool provider used in gcp mode
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_gcp_sts_url")]
    pub gcp_sts_url: Url,
    /// Base URL replayed requests are sent to instead of the host named in
    /// the token. The token must still target AWS STS. A path on the
    /// endpoint is kept as a prefix of the token's path.
    pub aws_sts_endpoint: Option<Url>,
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
    /// Requests per second across all clients
    #[serde(default = "default_global_rate_limit")]
    pub global_rate_limit: u64,
    /// Burst size of the per-IP limiter
    #[serde(default = "default_per_ip_burst")]
    pub per_ip_burst: u32,
    /// Directory for the audit log. No file logging when unset.
    pub log_dir: Option<PathBuf>,
}

fn default_port() -> u16 {
    8080
}

fn default_audience() -> String {
    DEFAULT_AUDIENCE.to_string()
}

fn default_gcp_sts_url() -> Url {
    Url::parse(GCP_STS_URL).expect("GCP_STS_URL is a valid URL")
}

fn default_upstream_timeout_secs() -> u64 {
    30
}

fn default_global_rate_limit() -> u64 {
    100
}

fn default_per_ip_burst() -> u32 {
    20
}

impl Config {
    /// Loads `.env` then reads the process environment
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenv::dotenv().ok();
        envy::from_env::<Config>()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            validation_mode: ValidationMode::default(),
            audience: default_audience(),
            gcp_sts_url: default_gcp_sts_url(),
            aws_sts_endpoint: None,
            upstream_timeout_secs: default_upstream_timeout_secs(),
            global_rate_limit: default_global_rate_limit(),
            per_ip_burst: default_per_ip_burst(),
            log_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config: Config = envy::from_iter(vars(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.validation_mode, ValidationMode::Gcp);
        assert_eq!(config.audience, DEFAULT_AUDIENCE);
        assert_eq!(config.gcp_sts_url.as_str(), GCP_STS_URL);
        assert!(config.aws_sts_endpoint.is_none());
        assert!(config.log_dir.is_none());
        assert_eq!(config.upstream_timeout_secs, 30);
    }

    #[test]
    fn test_overrides() {
        let config: Config = envy::from_iter(vars(&[
            ("PORT", "9000"),
            ("VALIDATION_MODE", "aws"),
            ("AWS_STS_ENDPOINT", "http://127.0.0.1:4566"),
            ("LOG_DIR", "/tmp/logs"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.validation_mode, ValidationMode::Aws);
        assert_eq!(
            config.aws_sts_endpoint.as_ref().map(Url::as_str),
            Some("http://127.0.0.1:4566/")
        );
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
    }

    #[test]
    fn test_invalid_endpoints_fail_to_load() {
        let result: Result<Config, _> = envy::from_iter(vars(&[("AWS_STS_ENDPOINT", "not a url")]));
        assert!(result.is_err());

        let result: Result<Config, _> = envy::from_iter(vars(&[("GCP_STS_URL", "sts.googleapis.com")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_mode() {
        let result: Result<Config, _> = envy::from_iter(vars(&[("VALIDATION_MODE", "azure")]));
        assert!(result.is_err());
        assert!("azure".parse::<ValidationMode>().is_err());
        assert_eq!("AWS".parse::<ValidationMode>(), Ok(ValidationMode::Aws));
    }
}
