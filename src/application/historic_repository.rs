// Repository trait for historic and live channel data
use crate::domain::channel::ChannelAddress;
use crate::domain::timeseries::HistoricTimeseries;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

#[async_trait]
pub trait HistoricDataRepository: Send + Sync {
    /// Query channel values in `[from, to)` aggregated to `resolution_secs` buckets.
    /// Channels without any data in the range are absent from the result.
    async fn query_historic_timeseries_data(
        &self,
        edge_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        channels: &[ChannelAddress],
        resolution_secs: u32,
    ) -> anyhow::Result<HistoricTimeseries>;

    /// Query the most recent value of each channel (for live widgets)
    async fn query_latest_values(
        &self,
        edge_id: &str,
        channels: &[ChannelAddress],
    ) -> anyhow::Result<HashMap<ChannelAddress, Value>>;
}
