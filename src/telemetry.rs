use crate::error::{Result, ScoreError};
use tracing_subscriber::EnvFilter;

/// Default filter for the CLI verbosity flags. `RUST_LOG` wins when set.
pub fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn init(verbose: u8, quiet: bool) -> Result<()> {
    let level = level_for(verbose, quiet);
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| ScoreError::Telemetry(format!("invalid log level '{level}': {e}")))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| ScoreError::Telemetry(e.to_string()))
}
