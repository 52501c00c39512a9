// Fixed active-power controller flat widget
use crate::application::edge_config::ComponentMetadata;
use crate::domain::channel::ChannelAddress;
use crate::domain::i18n::Language;
use crate::domain::widget::{ChargeDischargePower, CurrentData, manual_on_off, watt_to_kilowatt};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::oneshot;

pub const PROPERTY_POWER: &str = "_PropertyPower";
pub const PROPERTY_MODE: &str = "_PropertyMode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetState {
    Uninitialized,
    Initialized,
    ModalOpen,
    ModalClosed,
}

/// Request to show the detail dialog of a component.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalRequest {
    pub component: ComponentMetadata,
}

/// Something able to show a modal dialog.
///
/// `present` returns once the dialog is shown; the receiver resolves when the
/// user dismisses it.
#[async_trait]
pub trait ModalPresenter: Send + Sync {
    async fn present(&self, request: ModalRequest) -> anyhow::Result<oneshot::Receiver<()>>;
}

/// Completion signal of a presented modal.
#[derive(Debug)]
pub struct ModalHandle {
    dismissed: oneshot::Receiver<()>,
}

impl ModalHandle {
    /// Waits for the dialog to be dismissed. A presenter that went away counts as dismissed.
    pub async fn dismissed(self) {
        let _ = self.dismissed.await;
    }
}

/// Values shown by the widget after a refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetFrame {
    pub component_id: String,
    pub state: WidgetState,
    pub charge_discharge_power: Option<ChargeDischargePower>,
    pub property_mode: Value,
    pub power_text: String,
    pub mode_text: String,
}

#[derive(Debug)]
pub struct FixActivePowerWidget {
    component: ComponentMetadata,
    language: Language,
    state: WidgetState,
    charge_discharge_power: Option<ChargeDischargePower>,
    property_mode: Value,
}

impl FixActivePowerWidget {
    pub fn new(component: ComponentMetadata, language: Language) -> Self {
        Self {
            component,
            language,
            state: WidgetState::Uninitialized,
            charge_discharge_power: None,
            property_mode: Value::Null,
        }
    }

    pub fn channel_addresses(&self) -> Vec<ChannelAddress> {
        vec![
            ChannelAddress::new(&self.component.id, PROPERTY_POWER),
            ChannelAddress::new(&self.component.id, PROPERTY_MODE),
        ]
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn on_current_data(&mut self, data: &CurrentData) -> WidgetFrame {
        if self.state == WidgetState::Uninitialized {
            self.state = WidgetState::Initialized;
        }
        self.charge_discharge_power = data
            .number(PROPERTY_POWER)
            .map(|power| ChargeDischargePower::from_power(power, self.language));
        self.property_mode = data.raw(PROPERTY_MODE);
        self.frame()
    }

    pub fn frame(&self) -> WidgetFrame {
        WidgetFrame {
            component_id: self.component.id.clone(),
            state: self.state,
            charge_discharge_power: self.charge_discharge_power.clone(),
            property_mode: self.property_mode.clone(),
            power_text: watt_to_kilowatt(
                self.charge_discharge_power.as_ref().map(|p| p.value),
                self.language,
            ),
            mode_text: manual_on_off(&self.property_mode, self.language),
        }
    }

    /// Opens the detail dialog. Does nothing until the first data arrived.
    pub async fn present_modal(
        &mut self,
        presenter: &dyn ModalPresenter,
    ) -> anyhow::Result<Option<ModalHandle>> {
        if self.state == WidgetState::Uninitialized {
            return Ok(None);
        }
        let dismissed = presenter
            .present(ModalRequest {
                component: self.component.clone(),
            })
            .await?;
        self.state = WidgetState::ModalOpen;
        Ok(Some(ModalHandle { dismissed }))
    }

    pub fn modal_closed(&mut self) {
        if self.state == WidgetState::ModalOpen {
            self.state = WidgetState::ModalClosed;
        }
    }
}
