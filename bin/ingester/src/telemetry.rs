use anyhow::Result;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber. `-v` repeated raises the
/// default level; `RUST_LOG` overrides it per-module when set, the same
/// precedence `tracing_subscriber::EnvFilter` gives every other binary in
/// this workspace.
pub fn init(v: u8) -> Result<()> {
    let default_level = match v {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().map_err(|e| anyhow::anyhow!(e))
}
