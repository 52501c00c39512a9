// Chart option builder for the time-of-use tariff chart
use crate::domain::chart::{
    AxisPosition, ChartOptions, Dataset, GridLines, Layout, PERCENT_AXIS_ID, PRIMARY_AXIS_ID,
    Padding, ScaleLabel, Scales, Ticks, TimeAxis, TimeOptions, TimeUnit, Tooltips, ValueAxis,
};
use crate::domain::i18n::{Label, Language};
use crate::domain::number_format::format_number;
use crate::domain::timeseries::HistoryPeriod;

pub const PRICE_UNIT_LABEL: &str = "Cent / kWh";
const PRICE_SUFFIX: &str = "Cent/kWh";
const PERCENT_SUFFIX: &str = "%";

/// Periods spanning at least this many whole days are bucketed by day.
const DAY_BUCKET_THRESHOLD_DAYS: i64 = 5;

pub fn time_unit_for(period: &HistoryPeriod) -> TimeUnit {
    if period.whole_days() >= DAY_BUCKET_THRESHOLD_DAYS {
        TimeUnit::Day
    } else {
        TimeUnit::Hour
    }
}

struct TooltipFormat {
    suffix: &'static str,
    min_fraction_digits: usize,
    max_fraction_digits: usize,
}

fn tooltip_format_for(label: &str, language: Language) -> TooltipFormat {
    if label == language.translate(Label::StateOfCharge) {
        TooltipFormat {
            suffix: PERCENT_SUFFIX,
            min_fraction_digits: 0,
            max_fraction_digits: 0,
        }
    } else {
        TooltipFormat {
            suffix: PRICE_SUFFIX,
            min_fraction_digits: 0,
            max_fraction_digits: 4,
        }
    }
}

fn render_tooltip(
    label: &str,
    value: Option<f64>,
    format: &TooltipFormat,
    language: Language,
) -> Option<String> {
    let value = value.filter(|v| *v != 0.0 && !v.is_nan())?;
    let number = format_number(
        value,
        language,
        format.min_fraction_digits,
        format.max_fraction_digits,
    );
    Some(format!("{label}: {number} {}", format.suffix))
}

/// Tooltip lines for every data point of `dataset`; empty and zero values get
/// no tooltip line.
pub fn tooltip_labels(dataset: &Dataset, language: Language) -> Vec<Option<String>> {
    let format = tooltip_format_for(&dataset.label, language);
    dataset
        .data
        .iter()
        .map(|value| render_tooltip(&dataset.label, *value, &format, language))
        .collect()
}

fn price_axis() -> ValueAxis {
    ValueAxis {
        id: PRIMARY_AXIS_ID,
        position: AxisPosition::Left,
        scale_label: ScaleLabel {
            display: true,
            label_string: PRICE_UNIT_LABEL.to_string(),
            padding: -2,
            font_size: 11,
        },
        ticks: Ticks {
            begin_at_zero: true,
            padding: -5,
            max: None,
            step_size: None,
        },
        grid_lines: None,
    }
}

fn percent_axis() -> ValueAxis {
    ValueAxis {
        id: PERCENT_AXIS_ID,
        position: AxisPosition::Right,
        scale_label: ScaleLabel {
            display: true,
            label_string: PERCENT_SUFFIX.to_string(),
            padding: -2,
            font_size: 11,
        },
        ticks: Ticks {
            begin_at_zero: true,
            padding: -5,
            max: Some(100.0),
            step_size: Some(20.0),
        },
        grid_lines: Some(GridLines { display: false }),
    }
}

pub fn build_chart_options(period: &HistoryPeriod, language: Language) -> ChartOptions {
    ChartOptions {
        maintain_aspect_ratio: false,
        layout: Layout {
            padding: Padding {
                left: 2,
                right: 2,
                top: 0,
                bottom: 0,
            },
        },
        scales: Scales {
            x_axes: vec![TimeAxis {
                kind: "time",
                stacked: true,
                bounds: "ticks",
                time: TimeOptions {
                    unit: time_unit_for(period),
                    min_unit: TimeUnit::Hour,
                },
            }],
            y_axes: vec![price_axis(), percent_axis()],
        },
        tooltips: Tooltips {
            mode: "index",
            intersect: false,
            axis: "x",
            locale: language.code(),
        },
    }
}
