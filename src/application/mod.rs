// Application layer - Use cases over the repository seams
pub mod chart_options;
pub mod chart_session;
pub mod edge_config;
pub mod flat_widget;
pub mod historic_repository;
pub mod live_widget_service;
pub mod tou_discharge_chart;
