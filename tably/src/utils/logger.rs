//! Logging setup
//!
//! Console logging for development, plus an optional daily-rotated file
//! for deployments. `RUST_LOG` overrides the default level.

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber. Call once at startup; a second call
/// fails because a global subscriber is already set.
pub fn init_logger(level: &str, log_dir: Option<&str>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let console_layer = fmt::layer().with_target(true);

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(dir) = log_dir {
        let dir = Path::new(dir);
        fs::create_dir_all(dir)?;
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "tably");
        let file_layer = fmt::layer().with_ansi(false).with_writer(file_appender);
        registry.with(file_layer).try_init()?;
    } else {
        registry.try_init()?;
    }

    tracing::info!(level, "logger initialized");
    Ok(())
}
