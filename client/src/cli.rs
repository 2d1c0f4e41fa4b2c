use aws_subject_token::{DEFAULT_AUDIENCE, DEFAULT_REGION};
use clap::Parser;

/// HTTP client with AWS authentication support
#[derive(Parser, Debug, Clone)]
#[command(name = "auth-with-aws-token", version, about)]
pub struct Cli {
    /// The URL to request
    pub url: String,

    /// HTTP method
    #[arg(short, long, default_value = "GET")]
    pub method: String,

    /// Request body for POST/PUT requests
    #[arg(short, long)]
    pub body: Option<String>,

    /// Add AWS federated identity authorization header
    #[arg(long)]
    pub add_auth: bool,

    /// Workload identity pool audience the token is bound to
    #[arg(long, env = "AWS_FED_ID_AUDIENCE", default_value = DEFAULT_AUDIENCE)]
    pub audience: String,

    /// Region of the STS endpoint the token targets
    #[arg(long, env = "AWS_FED_ID_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Print the decoded subject token to stderr
    #[arg(long)]
    pub print_token: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

impl Cli {
    /// Body to send, if any. Empty bodies are dropped.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref().filter(|body| !body.is_empty())
    }
}
