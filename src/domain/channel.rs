// Channel addressing
use super::error::DashboardError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Component id of the virtual "sum" component aggregating the whole system.
pub const SUM_COMPONENT: &str = "_sum";

/// Identifies one channel of one component, written as `component/channel`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelAddress {
    pub component_id: String,
    pub channel_id: String,
}

impl ChannelAddress {
    pub fn new(component_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            channel_id: channel_id.into(),
        }
    }
}

impl fmt::Display for ChannelAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.component_id, self.channel_id)
    }
}

impl FromStr for ChannelAddress {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((component, channel))
                if !component.is_empty() && !channel.is_empty() && !channel.contains('/') =>
            {
                Ok(Self::new(component, channel))
            }
            _ => Err(DashboardError::InvalidChannelAddress(s.to_string())),
        }
    }
}

impl Serialize for ChannelAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChannelAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
