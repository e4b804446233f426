use axum::{Json, body::Bytes, extract::State};
use stargazer_core::StarMetrics;
use stargazer_model::{RepoStars, StarsRequest, StarsResponse};
use tracing::{debug, info};

use crate::{
    errors::{AppError, AppResult},
    infra::app_state::AppState,
};

/// `POST /stars`: resolves every listed repository and answers with one row
/// per input, in input order.
pub async fn stars_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<StarsResponse>> {
    state.metrics().stars_request_received();

    let request: StarsRequest =
        serde_json::from_slice(&body).map_err(|err| {
            debug!(error = %err, "rejecting malformed stars request");
            AppError::malformed_request()
        })?;

    let names = request.names();
    info!(repos = names.len(), "resolving star counts");

    let repos = state
        .aggregator()
        .resolve_all(names)
        .await
        .into_iter()
        .map(RepoStars::from)
        .collect();

    state.metrics().stars_request_completed();
    Ok(Json(StarsResponse { repos }))
}

/// Any method other than `POST` on `/stars`. Still counted as a stars
/// request.
pub async fn stars_method_not_supported(
    State(state): State<AppState>,
) -> AppError {
    state.metrics().stars_request_received();
    AppError::method_not_supported()
}
