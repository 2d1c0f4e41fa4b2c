use anyhow::Context;
use chrono::Utc;
use std::{fs, path::Path};
use tracing::info;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::filter::{EnvFilter, LevelFilter, Targets};
use tracing_subscriber::{fmt, layer::SubscriberExt, Layer, Registry};

/// Target of the per-request audit events written to the log file
pub const AUDIT_TARGET: &str = "auth_audit";

const AUDIT_FILE_PREFIX: &str = "auth-audit.log";

/// Installs the global subscriber.
///
/// Everything goes to stdout, filtered by `RUST_LOG`. When `log_dir` is set,
/// audit events are also appended to a daily rotating file there. The
/// returned guard must be held until shutdown so buffered lines get flushed.
pub fn setup_logging(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_filter(env_filter);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let (layer, guard) = audit_file_layer(dir)?;
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = Registry::default().with(stdout_layer).with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global default subscriber")?;

    Ok(guard)
}

fn audit_file_layer<S>(
    dir: &Path,
) -> anyhow::Result<(Box<dyn Layer<S> + Send + Sync + 'static>, WorkerGuard)>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, AUDIT_FILE_PREFIX));

    // Only audit events reach the file
    let target_filter = Targets::new().with_target(AUDIT_TARGET, LevelFilter::TRACE);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(target_filter)
        .boxed();

    Ok((layer, guard))
}

/// Records the decision taken for one request
pub fn audit(method: &str, path: &str, status: u16, outcome: &str, principal: Option<&str>) {
    let timestamp = Utc::now().to_rfc3339();

    match principal {
        Some(principal) => {
            info!(
                target: AUDIT_TARGET,
                method = method,
                uri = path,
                status = status,
                principal = principal,
                "{} {} {} {} {} {}", timestamp, method, path, status, outcome, principal
            );
        }
        None => {
            info!(
                target: AUDIT_TARGET,
                method = method,
                uri = path,
                status = status,
                "{} {} {} {} {}", timestamp, method, path, status, outcome
            );
        }
    }
}
