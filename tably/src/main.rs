//! tably - callable-function service
//!
//! Serves the server-side callables (bulk purge) over HTTP against the
//! in-process store and identity provider.

use std::sync::Arc;
use tably::auth::MockIdentityProvider;
use tably::functions::{router, Config, FunctionsState};
use tably::store::DocumentStore;
use tably::utils::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("tably=info,tower_http=info", std::env::var("LOG_DIR").ok().as_deref())?;

    let config = Config::from_env()?;
    let state = Arc::new(FunctionsState {
        store: DocumentStore::new(),
        provider: Arc::new(MockIdentityProvider::new()),
        purge_batch_size: config.purge_batch_size,
    });
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("tably functions listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
