use axum::{
    Router,
    routing::{get, post},
};
use stargazer_model::routes;
use tower_http::trace::TraceLayer;

use crate::{handlers, infra::app_state::AppState};

/// Builds the complete application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            routes::STARS,
            post(handlers::stars_handler)
                .fallback(handlers::stars_method_not_supported),
        )
        .route(
            routes::HEALTH,
            get(handlers::health_handler)
                .fallback(handlers::method_not_supported),
        )
        .route(
            routes::METRICS,
            get(handlers::metrics_handler)
                .fallback(handlers::method_not_supported),
        )
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
