// Chart domain models, serialized in the shape the charting front-end consumes
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const PRIMARY_AXIS_ID: &str = "yAxis1";
pub const PERCENT_AXIS_ID: &str = "yAxis2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(rename = "type")]
    pub kind: DatasetKind,
    pub label: String,
    pub data: Vec<Option<f64>>,
    pub order: u8,
    #[serde(rename = "yAxisID")]
    pub y_axis_id: &'static str,
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<[u8; 2]>,
    pub background_color: &'static str,
    pub border_color: &'static str,
    /// Tooltip line per data point, `None` where no line is shown.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tooltip_labels: Vec<Option<String>>,
}

impl Dataset {
    pub fn bar(label: impl Into<String>, data: Vec<Option<f64>>, order: u8) -> Self {
        Self {
            kind: DatasetKind::Bar,
            label: label.into(),
            data,
            order,
            y_axis_id: PRIMARY_AXIS_ID,
            hidden: false,
            border_dash: None,
            background_color: "rgba(0,0,0,0.2)",
            border_color: "rgba(0,0,0,1)",
            tooltip_labels: Vec::new(),
        }
    }

    pub fn line(label: impl Into<String>, data: Vec<Option<f64>>, order: u8) -> Self {
        Self {
            kind: DatasetKind::Line,
            ..Self::bar(label, data, order)
        }
    }

    pub fn colors(mut self, background: &'static str, border: &'static str) -> Self {
        self.background_color = background;
        self.border_color = border;
        self
    }

    pub fn on_axis(mut self, axis_id: &'static str) -> Self {
        self.y_axis_id = axis_id;
        self
    }

    pub fn dashed(mut self, dash: [u8; 2]) -> Self {
        self.border_dash = Some(dash);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Hour,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleLabel {
    pub display: bool,
    pub label_string: String,
    pub padding: i32,
    pub font_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticks {
    pub begin_at_zero: bool,
    pub padding: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_size: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLines {
    pub display: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueAxis {
    pub id: &'static str,
    pub position: AxisPosition,
    pub scale_label: ScaleLabel,
    pub ticks: Ticks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_lines: Option<GridLines>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOptions {
    pub unit: TimeUnit,
    pub min_unit: TimeUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAxis {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub stacked: bool,
    pub bounds: &'static str,
    pub time: TimeOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scales {
    pub x_axes: Vec<TimeAxis>,
    pub y_axes: Vec<ValueAxis>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Padding {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub padding: Padding,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltips {
    pub mode: &'static str,
    pub intersect: bool,
    pub axis: &'static str,
    pub locale: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub maintain_aspect_ratio: bool,
    pub layout: Layout,
    pub scales: Scales,
    pub tooltips: Tooltips,
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub labels: Vec<DateTime<Utc>>,
    pub datasets: Vec<Dataset>,
    pub options: Option<ChartOptions>,
    pub loading: bool,
}

impl ChartView {
    /// Empty chart shown before the first load and after a failed one.
    pub fn initial() -> Self {
        Self {
            labels: Vec::new(),
            datasets: Vec::new(),
            options: None,
            loading: true,
        }
    }
}
