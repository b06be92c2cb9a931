use log::info;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{Error, Result};

const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Installs the global subscriber and routes `log` records into it.
///
/// `RUST_LOG` overrides the default filter. Calling this twice is an error.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = fmt().with_env_filter(filter).with_target(true).finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("failed to set tracing subscriber: {e}")))?;
    tracing_log::LogTracer::init()
        .map_err(|e| Error::Other(format!("failed to bridge log records: {e}")))?;
    info!("Logger initialized");
    Ok(())
}
