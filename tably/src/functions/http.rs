//! Callable HTTP surface

use super::purge::{purge_old_data, PurgeOutcome, PurgeRequest};
use crate::auth::IdentityProvider;
use crate::store::DocumentStore;
use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use shared::{AppError, AppResult};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state for the callable router
pub struct FunctionsState {
    pub store: DocumentStore,
    pub provider: Arc<dyn IdentityProvider>,
    pub purge_batch_size: usize,
}

/// Build the callable router. One route today; more callables mount
/// beside it.
pub fn router(state: Arc<FunctionsState>) -> Router {
    Router::new()
        .route("/purgeOldData", post(purge_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn purge_handler(
    State(state): State<Arc<FunctionsState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<PurgeOutcome>, AppError> {
    let token = bearer_token(&headers)?;
    let caller = state.provider.verify_token(token).await?;
    // Deserialize by hand so a missing field comes back as a categorized
    // error body, not the extractor's plain-text rejection.
    let req: PurgeRequest =
        serde_json::from_value(body).map_err(|err| AppError::invalid_argument(err.to_string()))?;
    let outcome = purge_old_data(
        &state.store,
        &caller.uid,
        &req.cafe_id,
        req.days_to_keep,
        state.purge_batch_size,
    )
    .await?;
    Ok(Json(outcome))
}

fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(AppError::not_authenticated)
}
