//! Tracing initialization: fmt subscriber with env-filter control.
//!
//! Log verbosity is driven by `RUST_LOG` (default `info`), e.g.
//! `RUST_LOG=sklsvc=debug` for handler-level detail.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize tracing with a console fmt layer and env-based filtering.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
