// Metric catalog and per-field absent-value policy

use std::collections::BTreeMap;

/// Environmental metrics the dashboard can plot or overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Temperature,
    Humidity,
    CloudCover,
    Rainfall,
    MoonPhase,
}

/// How an absent numeric field is presented.
///
/// | field              | absent value means | policy    |
/// |--------------------|--------------------|-----------|
/// | moth size counts   | zero captures      | zero-fill |
/// | temperature        | not measured       | gap       |
/// | humidity           | not measured       | gap       |
/// | cloud cover        | not measured       | gap       |
/// | rainfall           | not measured       | gap       |
/// | moon illumination  | not measured       | gap       |
///
/// Zero-fill applies only to count fields absent within a present record.
/// A date absent from a whole series is always a gap on the aligned axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapPolicy {
    ZeroFill,
    Gap,
}

impl GapPolicy {
    /// Resolves one possibly-absent reading. `ZeroFill` reads absence as a
    /// real zero; `Gap` keeps the hole for the renderer to break on.
    pub fn resolve(&self, value: Option<f64>) -> Option<f64> {
        match self {
            GapPolicy::ZeroFill => value.or(Some(0.0)),
            GapPolicy::Gap => value,
        }
    }
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature (°C)",
            Metric::Humidity => "Humidity (%)",
            Metric::CloudCover => "Cloud Cover (%)",
            Metric::Rainfall => "Rainfall (mm)",
            Metric::MoonPhase => "Moon Phase",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Rainfall => "mm",
            Metric::Humidity | Metric::CloudCover | Metric::MoonPhase => "%",
        }
    }

    /// Percent metrics share the fixed 0..100 scale.
    pub fn is_percent(&self) -> bool {
        matches!(
            self,
            Metric::Humidity | Metric::CloudCover | Metric::MoonPhase
        )
    }

    pub fn color(&self) -> &'static str {
        match self {
            Metric::Temperature => "rgb(255, 99, 132)",
            Metric::Humidity => "rgb(54, 162, 235)",
            Metric::CloudCover => "rgb(75, 192, 192)",
            Metric::Rainfall => "rgb(153, 102, 255)",
            Metric::MoonPhase => "rgb(255, 206, 86)",
        }
    }

    pub fn gap_policy(&self) -> GapPolicy {
        GapPolicy::Gap
    }
}

/// Per-metric display toggles for one widget instance.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityConfig {
    flags: BTreeMap<Metric, bool>,
}

impl VisibilityConfig {
    pub fn new(defaults: &[(Metric, bool)]) -> Self {
        Self {
            flags: defaults.iter().copied().collect(),
        }
    }

    /// Idempotent: setting a flag to its current position changes nothing.
    pub fn set(&mut self, metric: Metric, visible: bool) {
        self.flags.insert(metric, visible);
    }

    /// Metrics without an entry are hidden.
    pub fn is_visible(&self, metric: Metric) -> bool {
        self.flags.get(&metric).copied().unwrap_or(false)
    }
}
