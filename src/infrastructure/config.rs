use crate::application::edge_config::ComponentMetadata;
use crate::domain::environment::{DeploymentTarget, Environment};
use crate::domain::error::DashboardError;
use crate::domain::i18n::Language;
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::time::Duration;

const ENV_PREFIX: &str = "EMS_DASHBOARD";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub influx: InfluxSettings,
    pub environment: EnvironmentSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct InfluxSettings {
    pub host: String,
    pub token: String,
    pub database: String,
    pub retention_policy: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EnvironmentSettings {
    /// One of `backend-prod`, `edge-prod`, `edge-dev`, `gitpod`
    pub target: String,
    /// Host name the UI is served from
    pub public_host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_live_poll_seconds")]
    pub live_poll_seconds: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            live_poll_seconds: default_live_poll_seconds(),
        }
    }
}

fn default_live_poll_seconds() -> u64 {
    2
}

/// A configured component; without `edge` it exists on every edge.
#[derive(Debug, Deserialize, Clone)]
pub struct ComponentEntry {
    pub edge: Option<String>,
    pub id: String,
    #[serde(default)]
    pub alias: String,
    pub factory_id: String,
}

impl ComponentEntry {
    pub fn metadata(&self) -> ComponentMetadata {
        ComponentMetadata {
            id: self.id.clone(),
            alias: self.alias.clone(),
            factory_id: self.factory_id.clone(),
        }
    }
}

impl DashboardConfig {
    /// The environment record selected for this deployment.
    pub fn environment(&self) -> Result<Environment, DashboardError> {
        let target: DeploymentTarget = self.environment.target.parse()?;
        Ok(Environment::resolve(target, &self.environment.public_host))
    }

    pub fn live_poll_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard.live_poll_seconds.max(1))
    }
}

fn build_config(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<DashboardConfig> {
    let settings = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    build_config(config::Config::builder().add_source(config::File::with_name("config/dashboard")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    const SAMPLE: &str = r#"
        [influx]
        host = "http://localhost:8086/"
        token = "secret"
        database = "openems"
        retention_policy = "autogen"

        [environment]
        target = "edge-prod"
        public_host = "ems.local"

        [dashboard]
        language = "en"

        [[components]]
        id = "ctrlEssTimeOfUseTariffDischarge0"
        factory_id = "Controller.Ess.Time-Of-Use-Tariff.Discharge"

        [[components]]
        edge = "edge7"
        id = "ctrlFixActivePower0"
        alias = "Fix power"
        factory_id = "Controller.Ess.FixActivePower"
    "#;

    fn sample() -> DashboardConfig {
        build_config(config::Config::builder().add_source(File::from_str(SAMPLE, FileFormat::Toml)))
            .unwrap()
    }

    #[test]
    fn test_load_from_toml() {
        let config = sample();

        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.influx.database, "openems");
        assert_eq!(config.dashboard.language, Language::En);
        assert_eq!(config.live_poll_interval(), Duration::from_secs(2));
        assert_eq!(config.components.len(), 2);
        assert_eq!(config.components[1].edge.as_deref(), Some("edge7"));
        assert_eq!(config.components[0].metadata().alias, "");
    }

    #[test]
    fn test_environment_selection() {
        let mut config = sample();
        assert_eq!(config.environment().unwrap().url, "ws://ems.local:9080");

        config.environment.target = "nightly".to_string();
        assert_eq!(
            config.environment(),
            Err(DashboardError::UnknownDeploymentTarget("nightly".to_string()))
        );
    }
}
