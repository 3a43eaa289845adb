//! Service configuration

use shared::{AppError, AppResult};

/// Configuration for the callable-function service, loaded from the
/// environment. Missing values fall back to development defaults; a
/// malformed port is a terminal startup error.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the purge router binds to
    pub http_port: u16,
    /// Documents deleted per purge batch
    pub purge_batch_size: usize,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        let http_port = match std::env::var("HTTP_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::invalid_argument("HTTP_PORT must be a port number"))?,
            Err(_) => 8080,
        };
        let purge_batch_size = match std::env::var("PURGE_BATCH_SIZE") {
            Ok(raw) => raw.parse().map_err(|_| {
                AppError::invalid_argument("PURGE_BATCH_SIZE must be a positive integer")
            })?,
            Err(_) => super::purge::PURGE_BATCH_SIZE,
        };
        Ok(Self {
            http_port,
            purge_batch_size,
        })
    }
}
