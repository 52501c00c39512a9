// Live widget domain models
use super::i18n::{Label, Language};
use super::number_format::format_number;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Latest values of one component's channels, keyed by channel id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentData {
    pub this_component: HashMap<String, Value>,
}

impl CurrentData {
    pub fn number(&self, channel_id: &str) -> Option<f64> {
        self.this_component.get(channel_id).and_then(Value::as_f64)
    }

    pub fn raw(&self, channel_id: &str) -> Value {
        self.this_component.get(channel_id).cloned().unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerDirection {
    Charge,
    Discharge,
}

/// Battery power split into direction and magnitude for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeDischargePower {
    pub name: String,
    pub direction: PowerDirection,
    pub value: f64,
}

impl ChargeDischargePower {
    /// Positive power discharges the battery, negative power charges it.
    pub fn from_power(power: f64, language: Language) -> Self {
        if power >= 0.0 {
            Self {
                name: language.translate(Label::DischargePower),
                direction: PowerDirection::Discharge,
                value: power,
            }
        } else {
            Self {
                name: language.translate(Label::ChargePower),
                direction: PowerDirection::Charge,
                value: -power,
            }
        }
    }
}

/// Watt value rendered as kilowatt text, `-` when missing.
pub fn watt_to_kilowatt(value: Option<f64>, language: Language) -> String {
    match value {
        Some(w) => format!("{} kW", format_number(w / 1000.0, language, 0, 1)),
        None => "-".to_string(),
    }
}

/// Manual on/off mode rendered as text, `-` for anything else.
pub fn manual_on_off(mode: &Value, language: Language) -> String {
    match mode.as_str() {
        Some("MANUAL_ON") => language.translate(Label::On),
        Some("MANUAL_OFF") => language.translate(Label::Off),
        _ => "-".to_string(),
    }
}
