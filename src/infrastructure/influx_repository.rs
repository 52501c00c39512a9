// InfluxDB repository implementation
use crate::application::historic_repository::HistoricDataRepository;
use crate::domain::channel::ChannelAddress;
use crate::domain::timeseries::HistoricTimeseries;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Measurement the EMS edge writes all channel values into, tagged by edge id.
const MEASUREMENT: &str = "data";
const EDGE_TAG: &str = "edge";

#[derive(Debug, Clone)]
pub struct InfluxRepository {
    host: String,
    token: String,
    database: String,
    retention_policy: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResponse {
    results: Vec<InfluxQLResult>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResult {
    #[serde(default)]
    series: Option<Vec<InfluxQLSeries>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLSeries {
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl InfluxRepository {
    pub fn new(host: String, token: String, database: String, retention_policy: String) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            token,
            database,
            retention_policy,
            client: reqwest::Client::new(),
        }
    }

    fn build_query_url(&self, query: &str) -> String {
        format!(
            "{}/query?db={}&rp={}&q={}",
            self.host,
            urlencoding::encode(&self.database),
            urlencoding::encode(&self.retention_policy),
            urlencoding::encode(query)
        )
    }

    async fn execute_query(&self, query: &str) -> Result<InfluxQLResponse> {
        tracing::debug!("Executing InfluxQL: {}", query);
        let response = self
            .client
            .get(self.build_query_url(query))
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to InfluxDB")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("InfluxDB query failed with status {}: {}", status, body);
        }

        let data = response
            .json::<InfluxQLResponse>()
            .await
            .context("Failed to parse InfluxDB response")?;

        if let Some(error) = data.results.first().and_then(|r| r.error.as_ref()) {
            anyhow::bail!("InfluxDB query error: {}", error);
        }

        Ok(data)
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn select_list(function: &str, channels: &[ChannelAddress]) -> String {
    channels
        .iter()
        .map(|c| {
            let field = quote_identifier(&c.to_string());
            format!("{function}({field}) AS {field}")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn historic_query(
    edge_id: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    channels: &[ChannelAddress],
    resolution_secs: u32,
) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = {} AND time >= {} AND time < {} GROUP BY time({}s) fill(null)",
        select_list("mean", channels),
        quote_identifier(MEASUREMENT),
        quote_identifier(EDGE_TAG),
        quote_literal(edge_id),
        quote_literal(&from.to_rfc3339_opts(SecondsFormat::Secs, true)),
        quote_literal(&to.to_rfc3339_opts(SecondsFormat::Secs, true)),
        resolution_secs
    )
}

fn latest_query(edge_id: &str, channels: &[ChannelAddress]) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_list("last", channels),
        quote_identifier(MEASUREMENT),
        quote_identifier(EDGE_TAG),
        quote_literal(edge_id)
    )
}

fn first_series(response: &InfluxQLResponse) -> Option<&InfluxQLSeries> {
    response
        .results
        .first()
        .and_then(|r| r.series.as_ref())
        .and_then(|s| s.first())
}

/// Columns are parsed back into channel addresses; a channel whose column is
/// missing or entirely null is left out of the result.
fn parse_historic(response: &InfluxQLResponse) -> HistoricTimeseries {
    let Some(series) = first_series(response) else {
        return HistoricTimeseries::default();
    };
    let time_idx = series.columns.iter().position(|c| c == "time").unwrap_or(0);

    let timestamps = series
        .values
        .iter()
        .filter_map(|row| row.get(time_idx).and_then(Value::as_str))
        .filter_map(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.with_timezone(&Utc))
        .collect();
    let mut result = HistoricTimeseries::new(timestamps);

    for (idx, column) in series.columns.iter().enumerate() {
        if idx == time_idx {
            continue;
        }
        let Ok(address) = column.parse::<ChannelAddress>() else {
            tracing::warn!("Ignoring unexpected InfluxDB column {}", column);
            continue;
        };
        let values: Vec<Option<f64>> = series
            .values
            .iter()
            .map(|row| row.get(idx).and_then(Value::as_f64))
            .collect();
        if values.iter().any(Option::is_some) {
            result.insert(address, values);
        }
    }

    result
}

fn parse_latest(response: &InfluxQLResponse) -> HashMap<ChannelAddress, Value> {
    let Some(series) = first_series(response) else {
        return HashMap::new();
    };
    let Some(row) = series.values.first() else {
        return HashMap::new();
    };

    series
        .columns
        .iter()
        .zip(row)
        .filter(|(column, value)| column.as_str() != "time" && !value.is_null())
        .filter_map(|(column, value)| {
            column
                .parse::<ChannelAddress>()
                .ok()
                .map(|address| (address, value.clone()))
        })
        .collect()
}

#[async_trait]
impl HistoricDataRepository for InfluxRepository {
    async fn query_historic_timeseries_data(
        &self,
        edge_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        channels: &[ChannelAddress],
        resolution_secs: u32,
    ) -> Result<HistoricTimeseries> {
        if channels.is_empty() {
            return Ok(HistoricTimeseries::default());
        }
        let query = historic_query(edge_id, from, to, channels, resolution_secs);
        let response = self.execute_query(&query).await?;
        let result = parse_historic(&response);

        tracing::debug!(
            "Got {} of {} channels from InfluxDB for edge {}",
            result.channel_count(),
            channels.len(),
            edge_id
        );
        Ok(result)
    }

    async fn query_latest_values(
        &self,
        edge_id: &str,
        channels: &[ChannelAddress],
    ) -> Result<HashMap<ChannelAddress, Value>> {
        if channels.is_empty() {
            return Ok(HashMap::new());
        }
        let response = self.execute_query(&latest_query(edge_id, channels)).await?;
        Ok(parse_latest(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn response(body: Value) -> InfluxQLResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_historic_query() {
        let from = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let query = historic_query(
            "edge0",
            from,
            to,
            &[ChannelAddress::new("_sum", "EssSoc")],
            900,
        );
        assert_eq!(
            query,
            "SELECT mean(\"_sum/EssSoc\") AS \"_sum/EssSoc\" FROM \"data\" WHERE \"edge\" = 'edge0' \
             AND time >= '2024-05-01T00:00:00Z' AND time < '2024-05-02T00:00:00Z' \
             GROUP BY time(900s) fill(null)"
        );
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote_literal("it's"), "'it\\'s'");
        assert_eq!(quote_identifier("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_build_query_url_encodes() {
        let repository = InfluxRepository::new(
            "http://influx:8086/".to_string(),
            "t".to_string(),
            "openems".to_string(),
            "autogen".to_string(),
        );
        let url = repository.build_query_url("SELECT 1");
        assert_eq!(url, "http://influx:8086/query?db=openems&rp=autogen&q=SELECT%201");
    }

    #[test]
    fn test_parse_historic() {
        let parsed = parse_historic(&response(json!({
            "results": [{
                "series": [{
                    "name": "data",
                    "columns": ["time", "ctrl0/QuarterlyPrices", "ctrl0/StateMachine", "_sum/EssSoc"],
                    "values": [
                        ["2024-05-01T00:00:00Z", 231.5, 0, null],
                        ["2024-05-01T00:15:00Z", null, 1, null]
                    ]
                }]
            }]
        })));

        assert_eq!(parsed.timestamps.len(), 2);
        assert_eq!(
            parsed.timestamps[1],
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 15, 0).unwrap()
        );
        assert_eq!(
            parsed.channel(&ChannelAddress::new("ctrl0", "QuarterlyPrices")),
            Some(&[Some(231.5), None][..])
        );
        assert_eq!(
            parsed.channel(&ChannelAddress::new("ctrl0", "StateMachine")),
            Some(&[Some(0.0), Some(1.0)][..])
        );
        assert_eq!(parsed.channel(&ChannelAddress::new("_sum", "EssSoc")), None);
    }

    #[test]
    fn test_parse_empty_result() {
        let parsed = parse_historic(&response(json!({ "results": [{}] })));
        assert_eq!(parsed, HistoricTimeseries::default());
    }

    #[test]
    fn test_parse_latest() {
        let latest = parse_latest(&response(json!({
            "results": [{
                "series": [{
                    "name": "data",
                    "columns": ["time", "ctrl1/_PropertyPower", "ctrl1/_PropertyMode"],
                    "values": [["1970-01-01T00:00:00Z", -2000, "MANUAL_ON"]]
                }]
            }]
        })));

        assert_eq!(latest.len(), 2);
        assert_eq!(latest[&ChannelAddress::new("ctrl1", "_PropertyPower")], json!(-2000));
        assert_eq!(latest[&ChannelAddress::new("ctrl1", "_PropertyMode")], json!("MANUAL_ON"));
    }
}
