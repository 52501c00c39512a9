// Time-of-use tariff discharge history chart - Use case for building the chart view
use crate::application::chart_options::{build_chart_options, tooltip_labels};
use crate::application::edge_config::EdgeConfigSource;
use crate::application::historic_repository::HistoricDataRepository;
use crate::domain::channel::{ChannelAddress, SUM_COMPONENT};
use crate::domain::chart::{ChartView, Dataset, PERCENT_AXIS_ID};
use crate::domain::error::DashboardError;
use crate::domain::i18n::{Label, Language};
use crate::domain::tariff::{clamp_soc, classify_quarterly_prices};
use crate::domain::timeseries::{HistoricTimeseries, HistoryPeriod};
use std::sync::Arc;

/// Quarter-hour sampling.
pub const RESOLUTION_SECS: u32 = 900;

pub const QUARTERLY_PRICES: &str = "QuarterlyPrices";
pub const STATE_MACHINE: &str = "StateMachine";
pub const DELAYED: &str = "Delayed";
pub const ESS_SOC: &str = "EssSoc";

pub fn channel_addresses(component_id: &str) -> Vec<ChannelAddress> {
    vec![
        ChannelAddress::new(component_id, DELAYED),
        ChannelAddress::new(component_id, QUARTERLY_PRICES),
        ChannelAddress::new(component_id, STATE_MACHINE),
        ChannelAddress::new(SUM_COMPONENT, ESS_SOC),
    ]
}

/// Turns a historic query result into the chart datasets.
///
/// Price bars are only produced when both the price and the state channel are
/// present; the state-of-charge line only when `_sum/EssSoc` is present.
pub fn build_datasets(
    result: &HistoricTimeseries,
    component_id: &str,
    language: Language,
) -> Vec<Dataset> {
    let mut datasets = Vec::with_capacity(4);

    let prices = result.channel(&ChannelAddress::new(component_id, QUARTERLY_PRICES));
    let states = result.channel(&ChannelAddress::new(component_id, STATE_MACHINE));

    if let (Some(prices), Some(states)) = (prices, states) {
        let classified = classify_quarterly_prices(prices, states);
        for (index, code) in &classified.unrecognized {
            tracing::warn!(
                "Unrecognized state code {} at quarter {} for {}",
                code,
                index,
                component_id
            );
        }

        datasets.push(
            Dataset::bar(language.translate(Label::StorageDischarge), classified.discharge, 3)
                .colors("rgba(51,102,0,0.8)", "rgba(51,102,0,1)"),
        );
        datasets.push(
            Dataset::bar(language.translate(Label::GridBuy), classified.delayed, 4)
                .colors("rgba(0,0,0,0.8)", "rgba(0,0,0,0.9)"),
        );
        datasets.push(
            Dataset::bar(language.translate(Label::Standby), classified.standby, 3)
                .colors("rgba(0,0,200,0.7)", "rgba(0,0,200,0.9)"),
        );
    } else {
        tracing::debug!("Price or state channel missing for {}", component_id);
    }

    if let Some(soc) = result.channel(&ChannelAddress::new(SUM_COMPONENT, ESS_SOC)) {
        let data = soc.iter().copied().map(clamp_soc).collect();
        datasets.push(
            Dataset::line(language.translate(Label::StateOfCharge), data, 1)
                .on_axis(PERCENT_AXIS_ID)
                .dashed([10, 10])
                .colors("rgba(189, 195, 199,0.2)", "rgba(189, 195, 199,1)"),
        );
    }

    for dataset in &mut datasets {
        dataset.tooltip_labels = tooltip_labels(dataset, language);
    }
    datasets
}

#[derive(Clone)]
pub struct TouDischargeChartService {
    repository: Arc<dyn HistoricDataRepository>,
    edge_config: Arc<dyn EdgeConfigSource>,
    language: Language,
}

impl TouDischargeChartService {
    pub fn new(
        repository: Arc<dyn HistoricDataRepository>,
        edge_config: Arc<dyn EdgeConfigSource>,
        language: Language,
    ) -> Self {
        Self {
            repository,
            edge_config,
            language,
        }
    }

    pub async fn load(
        &self,
        edge_id: &str,
        component_id: &str,
        period: &HistoryPeriod,
    ) -> anyhow::Result<ChartView> {
        let component = self
            .edge_config
            .get_component(edge_id, component_id)
            .await?
            .ok_or_else(|| DashboardError::UnknownComponent(component_id.to_string()))?;

        let (from, to) = period.query_range();
        let result = self
            .repository
            .query_historic_timeseries_data(
                edge_id,
                from,
                to,
                &channel_addresses(&component.id),
                RESOLUTION_SECS,
            )
            .await?;

        tracing::debug!(
            "Loaded {} channels, {} timestamps for {}",
            result.channel_count(),
            result.timestamps.len(),
            component.id
        );

        let datasets = build_datasets(&result, &component.id, self.language);
        let options = build_chart_options(period, self.language);

        Ok(ChartView {
            labels: result.timestamps,
            datasets,
            options: Some(options),
            loading: false,
        })
    }
}
