// Renderer-agnostic chart descriptors and summary tiles

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Which of a chart's up-to-three scales a series is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AxisSlot {
    Primary,
    Secondary,
    Tertiary,
}

/// Numeric domain of one y scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AxisDomain {
    /// Explicit fixed bounds regardless of the plotted values.
    Fixed { min: f64, max: f64 },
    /// Percentage scale, always 0..100.
    Percent,
    /// Zero-anchored scale up to the given maximum.
    ZeroToMax { max: f64 },
    /// Bounds taken from the plotted values; may go negative.
    Observed { min: f64, max: f64 },
}

impl AxisDomain {
    /// Zero-anchored domain over whatever values are present. Collapses to
    /// 0..0 when nothing is plotted.
    pub fn zero_to_max(values: impl Iterator<Item = f64>) -> AxisDomain {
        let max = values.fold(0.0_f64, f64::max);
        AxisDomain::ZeroToMax { max }
    }

    /// Value-following domain; collapses to 0..0 when nothing is plotted.
    pub fn observed(values: impl Iterator<Item = f64>) -> AxisDomain {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            min = min.min(value);
            max = max.max(value);
        }
        if min > max {
            AxisDomain::Observed { min: 0.0, max: 0.0 }
        } else {
            AxisDomain::Observed { min, max }
        }
    }

    /// Rainfall scale: the maximum rounded up to the next 0.2 mm step, plus
    /// 0.2 mm of headroom so the tallest point never touches the frame.
    pub fn rainfall(values: impl Iterator<Item = f64>) -> AxisDomain {
        let max = values.fold(0.0_f64, f64::max);
        AxisDomain::ZeroToMax {
            max: (max * 5.0).ceil() / 5.0 + 0.2,
        }
    }
}

/// One y scale of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxis {
    pub slot: AxisSlot,
    pub label: String,
    pub domain: AxisDomain,
}

/// Values along the x axis, shared by every series of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum XDomain {
    Dates(Vec<NaiveDate>),
    Timestamps(Vec<NaiveDateTime>),
    Numbers(Vec<f64>),
    Categories(Vec<String>),
}

/// How a series is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Encoding {
    Line,
    /// Line filled down to zero.
    Area,
    /// Bars. Series sharing a stack id pile up; distinct ids sit side by
    /// side within each x slot.
    Bar { stack: Option<String> },
}

/// One display series. `values` is parallel to the x domain; `None` is a
/// gap, never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub axis: AxisSlot,
    pub encoding: Encoding,
    pub color: Option<String>,
    pub values: Vec<Option<f64>>,
    /// Optional per-point annotations, e.g. sample sizes on analysis bars.
    pub labels: Option<Vec<String>>,
}

/// Complete description of one chart, produced fresh on every render and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub title: String,
    pub x_label: String,
    pub x: XDomain,
    pub y_axes: Vec<YAxis>,
    pub series: Vec<Series>,
}

/// One summary card value. `None` renders as a placeholder, never as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub value: Option<f64>,
    pub precision: i32,
    pub accent: Option<String>,
}

impl Tile {
    pub fn new(id: String, title: String, unit: String, value: Option<f64>, precision: i32) -> Self {
        Self {
            id,
            title,
            unit,
            value,
            precision,
            accent: None,
        }
    }
}
