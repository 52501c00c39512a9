// Static per-deployment environment records
use super::error::DashboardError;
use serde::Serialize;
use std::str::FromStr;

/// How the backend connection URL is derived from the host the UI is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlTemplate {
    /// `<scheme>://<host>:<port>`
    HostPort { scheme: &'static str, port: u16 },
    /// `<scheme>://<port>-<host without its first dash-separated label>`,
    /// for sandboxes that put the port in front of the host name.
    PortPrefixedHost { scheme: &'static str, port: u16 },
}

impl UrlTemplate {
    pub fn materialize(&self, host: &str) -> String {
        match *self {
            Self::HostPort { scheme, port } => format!("{scheme}://{host}:{port}"),
            Self::PortPrefixedHost { scheme, port } => {
                let rest = host.split_once('-').map_or(host, |(_, rest)| rest);
                format!("{scheme}://{port}-{rest}")
            }
        }
    }
}

/// Immutable description of one deployment target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentRecord {
    pub theme: &'static str,
    pub ui_title: &'static str,
    pub edge_short_name: &'static str,
    pub edge_long_name: &'static str,
    pub backend: &'static str,
    pub url: UrlTemplate,
    pub production: bool,
    pub debug_mode: bool,
}

const OPENEMS_BACKEND: &str = "OpenEMS Backend";
const OPENEMS_EDGE: &str = "OpenEMS Edge";

const fn openems(backend: &'static str, url: UrlTemplate, production: bool) -> EnvironmentRecord {
    EnvironmentRecord {
        theme: "OpenEMS",
        ui_title: "EMS UI",
        edge_short_name: "EMS",
        edge_long_name: "Energy Management System",
        backend,
        url,
        production,
        debug_mode: !production,
    }
}

pub const BACKEND_PROD: EnvironmentRecord = openems(
    OPENEMS_BACKEND,
    UrlTemplate::HostPort { scheme: "ws", port: 9079 },
    true,
);

pub const EDGE_PROD: EnvironmentRecord = openems(
    OPENEMS_EDGE,
    UrlTemplate::HostPort { scheme: "ws", port: 9080 },
    true,
);

pub const EDGE_DEV: EnvironmentRecord = openems(
    OPENEMS_EDGE,
    UrlTemplate::HostPort { scheme: "ws", port: 8085 },
    false,
);

pub const GITPOD: EnvironmentRecord = openems(
    OPENEMS_BACKEND,
    UrlTemplate::PortPrefixedHost { scheme: "wss", port: 8082 },
    false,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentTarget {
    BackendProd,
    EdgeProd,
    EdgeDev,
    Gitpod,
}

impl DeploymentTarget {
    pub fn record(self) -> &'static EnvironmentRecord {
        match self {
            Self::BackendProd => &BACKEND_PROD,
            Self::EdgeProd => &EDGE_PROD,
            Self::EdgeDev => &EDGE_DEV,
            Self::Gitpod => &GITPOD,
        }
    }
}

impl FromStr for DeploymentTarget {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backend-prod" => Ok(Self::BackendProd),
            "edge-prod" => Ok(Self::EdgeProd),
            "edge-dev" => Ok(Self::EdgeDev),
            "gitpod" => Ok(Self::Gitpod),
            other => Err(DashboardError::UnknownDeploymentTarget(other.to_string())),
        }
    }
}

/// The environment record active for this process, with its URL resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub theme: &'static str,
    pub ui_title: &'static str,
    pub edge_short_name: &'static str,
    pub edge_long_name: &'static str,
    pub backend: &'static str,
    pub url: String,
    pub production: bool,
    pub debug_mode: bool,
}

impl Environment {
    pub fn resolve(target: DeploymentTarget, host: &str) -> Self {
        let record = target.record();
        Self {
            theme: record.theme,
            ui_title: record.ui_title,
            edge_short_name: record.edge_short_name,
            edge_long_name: record.edge_long_name,
            backend: record.backend,
            url: record.url.materialize(host),
            production: record.production,
            debug_mode: record.debug_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets() {
        let env = Environment::resolve("backend-prod".parse().unwrap(), "ems.local");
        assert_eq!(env.url, "ws://ems.local:9079");
        assert_eq!(env.backend, "OpenEMS Backend");
        assert!(env.production && !env.debug_mode);

        let env = Environment::resolve(DeploymentTarget::EdgeProd, "192.168.1.5");
        assert_eq!(env.url, "ws://192.168.1.5:9080");
        assert_eq!(env.backend, "OpenEMS Edge");

        let env = Environment::resolve(DeploymentTarget::EdgeDev, "localhost");
        assert_eq!(env.url, "ws://localhost:8085");
        assert!(!env.production && env.debug_mode);
    }

    #[test]
    fn test_gitpod_url_replaces_port_label() {
        let env = Environment::resolve(
            DeploymentTarget::Gitpod,
            "4200-openems-openems-abc123.ws-eu01.gitpod.io",
        );
        assert_eq!(env.url, "wss://8082-openems-openems-abc123.ws-eu01.gitpod.io");
        assert_eq!(env.ui_title, "EMS UI");
    }

    #[test]
    fn test_unknown_target() {
        assert_eq!(
            "staging".parse::<DeploymentTarget>(),
            Err(DashboardError::UnknownDeploymentTarget("staging".to_string()))
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(Environment::resolve(DeploymentTarget::EdgeDev, "h")).unwrap();
        assert_eq!(json["uiTitle"], "EMS UI");
        assert_eq!(json["edgeLongName"], "Energy Management System");
        assert_eq!(json["debugMode"], true);
    }
}
