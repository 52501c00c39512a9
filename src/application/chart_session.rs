// Chart session - Holds the displayed view and applies only the newest refresh
use crate::application::tou_discharge_chart::TouDischargeChartService;
use crate::domain::chart::ChartView;
use crate::domain::timeseries::HistoryPeriod;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Hands out monotonically increasing request numbers.
#[derive(Debug, Default)]
pub struct RefreshSequencer {
    issued: AtomicU64,
}

impl RefreshSequencer {
    pub fn next(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket
    }
}

/// One displayed time-of-use tariff chart.
pub struct ChartSession {
    edge_id: String,
    component_id: String,
    service: TouDischargeChartService,
    sequencer: RefreshSequencer,
    view: RwLock<ChartView>,
}

impl ChartSession {
    pub fn new(edge_id: String, component_id: String, service: TouDischargeChartService) -> Self {
        Self {
            edge_id,
            component_id,
            service,
            sequencer: RefreshSequencer::default(),
            view: RwLock::new(ChartView::initial()),
        }
    }

    /// Reloads the chart for `period` and returns the view as displayed afterwards.
    ///
    /// A result is applied only if no newer refresh was started meanwhile. A failed
    /// load resets the chart to its initial empty state.
    pub async fn refresh(&self, period: HistoryPeriod) -> ChartView {
        let ticket = self.sequencer.next();
        let outcome = self
            .service
            .load(&self.edge_id, &self.component_id, &period)
            .await;

        let mut view = self.view.write().await;
        if !self.sequencer.is_latest(ticket) {
            tracing::debug!(
                "Discarding stale refresh {} for {}/{}",
                ticket,
                self.edge_id,
                self.component_id
            );
            return view.clone();
        }

        match outcome {
            Ok(loaded) => *view = loaded,
            Err(e) => {
                tracing::error!(
                    "Error loading chart for {}/{}: {:#}",
                    self.edge_id,
                    self.component_id,
                    e
                );
                *view = ChartView::initial();
            }
        }
        view.clone()
    }

    /// Drops the displayed chart back to its initial state and discards
    /// refreshes still in flight.
    pub async fn reset(&self) -> ChartView {
        self.sequencer.next();
        let mut view = self.view.write().await;
        *view = ChartView::initial();
        view.clone()
    }

    pub async fn snapshot(&self) -> ChartView {
        self.view.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tou_discharge_chart::tests::{FakeEdgeConfig, FakeRepository, day_of_data};
    use crate::application::historic_repository::HistoricDataRepository;
    use crate::domain::channel::ChannelAddress;
    use crate::domain::i18n::Language;
    use crate::domain::timeseries::HistoricTimeseries;
    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, Utc};
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn period() -> HistoryPeriod {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        HistoryPeriod::from_dates(day, day).unwrap()
    }

    fn session(repository: Arc<FakeRepository>) -> ChartSession {
        let service =
            TouDischargeChartService::new(repository, Arc::new(FakeEdgeConfig), Language::En);
        ChartSession::new("edge0".to_string(), "ctrl0".to_string(), service)
    }

    #[test]
    fn test_sequencer() {
        let sequencer = RefreshSequencer::default();
        let first = sequencer.next();
        let second = sequencer.next();
        assert!(second > first);
        assert!(!sequencer.is_latest(first));
        assert!(sequencer.is_latest(second));
    }

    #[tokio::test]
    async fn test_refresh_applies_result() {
        let session = session(Arc::new(FakeRepository::with_result(Some(day_of_data("ctrl0")))));
        assert!(session.snapshot().await.loading);

        let view = session.refresh(period()).await;

        assert_eq!(view.datasets.len(), 4);
        assert_eq!(session.snapshot().await, view);
    }

    #[tokio::test]
    async fn test_failed_refresh_resets_chart() {
        let repository = Arc::new(FakeRepository::with_result(Some(day_of_data("ctrl0"))));
        let session = session(repository.clone());
        session.refresh(period()).await;

        *repository.result.lock().unwrap() = None;
        let view = session.refresh(period()).await;

        assert_eq!(view, ChartView::initial());
    }

    /// First query blocks until the second one has been answered.
    struct GatedRepository {
        gate: Notify,
        calls: AtomicU64,
    }

    #[async_trait]
    impl HistoricDataRepository for GatedRepository {
        async fn query_historic_timeseries_data(
            &self,
            _edge_id: &str,
            from: DateTime<Utc>,
            _to: DateTime<Utc>,
            _channels: &[ChannelAddress],
            _resolution_secs: u32,
        ) -> anyhow::Result<HistoricTimeseries> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.gate.notified().await;
                Ok(HistoricTimeseries::new(vec![from]))
            } else {
                self.gate.notify_one();
                Ok(HistoricTimeseries::new(vec![from, from]))
            }
        }

        async fn query_latest_values(
            &self,
            _edge_id: &str,
            _channels: &[ChannelAddress],
        ) -> anyhow::Result<HashMap<ChannelAddress, Value>> {
            Ok(HashMap::new())
        }
    }

    #[tokio::test]
    async fn test_stale_refresh_is_discarded() {
        let repository = Arc::new(GatedRepository {
            gate: Notify::new(),
            calls: AtomicU64::new(0),
        });
        let service =
            TouDischargeChartService::new(repository, Arc::new(FakeEdgeConfig), Language::En);
        let session = ChartSession::new("edge0".to_string(), "ctrl0".to_string(), service);

        let (older, newer) = tokio::join!(session.refresh(period()), session.refresh(period()));

        assert_eq!(newer.labels.len(), 2);
        // the older response arrived last but did not overwrite the newer one
        assert_eq!(older.labels.len(), 2);
        assert_eq!(session.snapshot().await.labels.len(), 2);
    }

    #[tokio::test]
    async fn test_reset_discards_pending_refresh() {
        let repository = Arc::new(GatedRepository {
            gate: Notify::new(),
            calls: AtomicU64::new(0),
        });
        let service = TouDischargeChartService::new(
            repository.clone(),
            Arc::new(FakeEdgeConfig),
            Language::En,
        );
        let session = ChartSession::new("edge0".to_string(), "ctrl0".to_string(), service);

        let (refreshed, reset) = tokio::join!(session.refresh(period()), async {
            let view = session.reset().await;
            repository.gate.notify_one();
            view
        });

        assert_eq!(reset, ChartView::initial());
        assert_eq!(refreshed, ChartView::initial());
        assert_eq!(session.snapshot().await, ChartView::initial());
    }
}
