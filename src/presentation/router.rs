// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_environment, health_check, stream_fix_active_power, tou_discharge_chart,
};
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    // JSON bodies are compressed by the handlers themselves, so no CompressionLayer here
    Router::new()
        .route("/healthz", get(health_check))
        .route("/environment", get(get_environment))
        .route(
            "/edges/:edge_id/history/timeofusetariffdischarge/:component_id",
            get(tou_discharge_chart),
        )
        .route(
            "/edges/:edge_id/live/fixactivepower/:component_id",
            get(stream_fix_active_power),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
