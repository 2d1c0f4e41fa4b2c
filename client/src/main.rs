use std::process::ExitCode;
use std::time::{Duration, SystemTime};

use aws_subject_token::authorization_value;
use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

mod cli;
mod credentials;
mod errors;
mod request;
mod signer;

use cli::Cli;
use errors::{ClientError, Result};
use request::{OutboundRequest, ReceivedResponse};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    // Logs go to stderr, stdout carries the response
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(response) => {
            println!("{}", response.render());
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<ReceivedResponse> {
    let mut outbound = OutboundRequest::new(&cli.url, &cli.method, cli.body())?;

    // Add AWS federated identity authorization header if requested
    if cli.add_auth {
        let token = subject_token(cli)
            .await
            .map_err(|err| ClientError::SubjectToken(Box::new(err)))?;
        outbound.authorization = Some(authorization_value(&token));
        tracing::info!("Added AWS federated identity authorization header");
    }

    let client = request::build_client(Duration::from_secs(cli.timeout))?;
    request::send(&client, outbound).await
}

/// Resolves credentials and returns the encoded subject token
async fn subject_token(cli: &Cli) -> Result<String> {
    let credentials = credentials::resolve_credentials(&cli.region).await?;
    let token =
        signer::generate_subject_token(&cli.audience, &cli.region, credentials, SystemTime::now())?;

    if cli.print_token {
        eprintln!("JSON: {}", token.to_json()?);
    }

    Ok(token.encode()?)
}
