// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use ems_dashboard::application::live_widget_service::LiveWidgetService;
use ems_dashboard::application::tou_discharge_chart::TouDischargeChartService;
use ems_dashboard::infrastructure::config::load_dashboard_config;
use ems_dashboard::infrastructure::influx_repository::InfluxRepository;
use ems_dashboard::infrastructure::static_edge_config::StaticEdgeConfig;
use ems_dashboard::presentation::app_state::AppState;
use ems_dashboard::presentation::router::build_router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    let environment = config.environment()?;
    let language = config.dashboard.language;
    tracing::info!(
        "Environment '{}' ({}), backend url {}",
        config.environment.target,
        environment.backend,
        environment.url
    );

    // Create repositories (infrastructure layer)
    let repository = Arc::new(InfluxRepository::new(
        config.influx.host.clone(),
        config.influx.token.clone(),
        config.influx.database.clone(),
        config.influx.retention_policy.clone(),
    ));
    let edge_config = Arc::new(StaticEdgeConfig::new(config.components.clone()));

    // Create services (application layer)
    let chart_service =
        TouDischargeChartService::new(repository.clone(), edge_config.clone(), language);
    let live_service = LiveWidgetService::new(
        repository,
        edge_config.clone(),
        language,
        config.live_poll_interval(),
    );

    let state = Arc::new(AppState::new(
        environment,
        edge_config,
        chart_service,
        live_service,
    ));

    // Build router (presentation layer)
    let router = build_router(state);

    let addr: SocketAddr = config
        .server
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.server.bind_address))?;
    tracing::info!("Starting ems-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
