// Live widget service - Polls latest channel values and pushes widget frames
use crate::application::edge_config::{ComponentMetadata, EdgeConfigSource};
use crate::application::flat_widget::{FixActivePowerWidget, WidgetFrame};
use crate::application::historic_repository::HistoricDataRepository;
use crate::domain::error::DashboardError;
use crate::domain::i18n::Language;
use crate::domain::widget::CurrentData;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

#[derive(Clone)]
pub struct LiveWidgetService {
    repository: Arc<dyn HistoricDataRepository>,
    edge_config: Arc<dyn EdgeConfigSource>,
    language: Language,
    poll_interval: Duration,
}

impl LiveWidgetService {
    pub fn new(
        repository: Arc<dyn HistoricDataRepository>,
        edge_config: Arc<dyn EdgeConfigSource>,
        language: Language,
        poll_interval: Duration,
    ) -> Self {
        Self {
            repository,
            edge_config,
            language,
            poll_interval,
        }
    }

    pub async fn resolve_component(
        &self,
        edge_id: &str,
        component_id: &str,
    ) -> anyhow::Result<ComponentMetadata> {
        self.edge_config
            .get_component(edge_id, component_id)
            .await?
            .ok_or_else(|| DashboardError::UnknownComponent(component_id.to_string()).into())
    }

    /// Starts streaming frames of the fixed active-power widget.
    ///
    /// Polling stops once the receiver is dropped.
    pub fn stream_fix_active_power(
        &self,
        edge_id: &str,
        component: ComponentMetadata,
    ) -> mpsc::Receiver<WidgetFrame> {
        let (tx, rx) = mpsc::channel(16);
        let repository = self.repository.clone();
        let edge_id = edge_id.to_string();
        let mut widget = FixActivePowerWidget::new(component, self.language);
        let mut ticks = IntervalStream::new(tokio::time::interval(self.poll_interval));

        tokio::spawn(async move {
            let channels = widget.channel_addresses();
            while ticks.next().await.is_some() {
                let latest = match repository.query_latest_values(&edge_id, &channels).await {
                    Ok(latest) => latest,
                    Err(e) => {
                        tracing::error!("Error fetching live values for {}: {:#}", edge_id, e);
                        continue;
                    }
                };

                let data = CurrentData {
                    this_component: latest
                        .into_iter()
                        .map(|(address, value)| (address.channel_id, value))
                        .collect(),
                };
                let frame = widget.on_current_data(&data);
                if tx.send(frame).await.is_err() {
                    tracing::debug!("Live widget client for {} disconnected", edge_id);
                    break;
                }
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::flat_widget::{PROPERTY_MODE, PROPERTY_POWER, WidgetState};
    use crate::application::tou_discharge_chart::tests::{FakeEdgeConfig, FakeRepository};
    use crate::domain::channel::ChannelAddress;
    use crate::domain::widget::PowerDirection;
    use serde_json::json;

    #[tokio::test]
    async fn test_stream_pushes_frames() {
        let repository = Arc::new(FakeRepository::with_result(None));
        {
            let mut latest = repository.latest.lock().unwrap();
            latest.insert(ChannelAddress::new("ctrlFix0", PROPERTY_POWER), json!(1500));
            latest.insert(ChannelAddress::new("ctrlFix0", PROPERTY_MODE), json!("MANUAL_ON"));
        }
        let service = LiveWidgetService::new(
            repository,
            Arc::new(FakeEdgeConfig),
            Language::De,
            Duration::from_millis(10),
        );

        let component = service.resolve_component("edge0", "ctrlFix0").await.unwrap();
        let mut rx = service.stream_fix_active_power("edge0", component);

        let frame = rx.recv().await.unwrap();
        assert_eq!(frame.state, WidgetState::Initialized);
        assert_eq!(frame.component_id, "ctrlFix0");
        assert_eq!(
            frame.charge_discharge_power.unwrap().direction,
            PowerDirection::Discharge
        );
        assert_eq!(frame.power_text, "1,5 kW");
        assert_eq!(frame.mode_text, "An");

        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_unknown_component() {
        let service = LiveWidgetService::new(
            Arc::new(FakeRepository::with_result(None)),
            Arc::new(FakeEdgeConfig),
            Language::De,
            Duration::from_secs(1),
        );
        let err = service.resolve_component("edge0", "ess0").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DashboardError>(),
            Some(DashboardError::UnknownComponent(_))
        ));
    }
}
