// Domain errors
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DashboardError {
    #[error("invalid channel address '{0}': expected 'component/channel'")]
    InvalidChannelAddress(String),

    #[error("unknown component '{0}'")]
    UnknownComponent(String),

    #[error("invalid history period: {0}")]
    InvalidPeriod(String),

    #[error("unknown deployment target '{0}'")]
    UnknownDeploymentTarget(String),
}
