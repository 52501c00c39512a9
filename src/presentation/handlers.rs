// HTTP request handlers
use crate::domain::timeseries::HistoryPeriod;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub from: NaiveDate,
    /// Defaults to `from`, i.e. a single day
    pub to: Option<NaiveDate>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// The environment record of this deployment
pub async fn get_environment(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.environment.clone())
}

/// Time-of-use tariff discharge history chart of one component
pub async fn tou_discharge_chart(
    Path((edge_id, component_id)): Path<(String, String)>,
    Query(query): Query<PeriodQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let compress = accepts_brotli(&headers);

    let period = match HistoryPeriod::from_dates(query.from, query.to.unwrap_or(query.from)) {
        Ok(period) => period,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.edge_config.get_component(&edge_id, &component_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                format!("unknown component '{component_id}'"),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Error fetching config for {}: {:#}", edge_id, e);
            let view = state.chart_session(&edge_id, &component_id).reset().await;
            return into_response(json_response(&view, compress).await);
        }
    }

    let view = state
        .chart_session(&edge_id, &component_id)
        .refresh(period)
        .await;
    into_response(json_response(&view, compress).await)
}

/// Live frames of the fixed active-power controller widget
pub async fn stream_fix_active_power(
    Path((edge_id, component_id)): Path<(String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let component = match state
        .live_service
        .resolve_component(&edge_id, &component_id)
        .await
    {
        Ok(component) => component,
        Err(e) => {
            tracing::warn!("Cannot stream widget {}/{}: {:#}", edge_id, component_id, e);
            return (StatusCode::NOT_FOUND, e.to_string()).into_response();
        }
    };

    let rx = state.live_service.stream_fix_active_power(&edge_id, component);
    stream_from_receiver(rx, accepts_brotli(&headers)).into_response()
}

fn into_response(result: Result<Response, StatusCode>) -> Response {
    result.unwrap_or_else(IntoResponse::into_response)
}
