// Application state for HTTP handlers
use crate::application::chart_session::ChartSession;
use crate::application::edge_config::EdgeConfigSource;
use crate::application::live_widget_service::LiveWidgetService;
use crate::application::tou_discharge_chart::TouDischargeChartService;
use crate::domain::environment::Environment;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct AppState {
    pub environment: Environment,
    pub edge_config: Arc<dyn EdgeConfigSource>,
    pub chart_service: TouDischargeChartService,
    pub live_service: LiveWidgetService,
    chart_sessions: Mutex<HashMap<(String, String), Arc<ChartSession>>>,
}

impl AppState {
    pub fn new(
        environment: Environment,
        edge_config: Arc<dyn EdgeConfigSource>,
        chart_service: TouDischargeChartService,
        live_service: LiveWidgetService,
    ) -> Self {
        Self {
            environment,
            edge_config,
            chart_service,
            live_service,
            chart_sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The chart session of one component, created on first use
    pub fn chart_session(&self, edge_id: &str, component_id: &str) -> Arc<ChartSession> {
        let mut sessions = self
            .chart_sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        sessions
            .entry((edge_id.to_string(), component_id.to_string()))
            .or_insert_with(|| {
                Arc::new(ChartSession::new(
                    edge_id.to_string(),
                    component_id.to_string(),
                    self.chart_service.clone(),
                ))
            })
            .clone()
    }
}
