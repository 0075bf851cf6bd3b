// Moth-trap observation domain model

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::metric::{GapPolicy, Metric};

/// One hourly weather reading from the trap site. Absent fields mean the
/// sensor did not report, not that the value was zero.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub timestamp: NaiveDateTime,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub rainfall: Option<f64>,
}

impl WeatherObservation {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn field(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::CloudCover => self.cloud_cover,
            Metric::Rainfall => self.rainfall,
            Metric::MoonPhase => None,
        }
    }
}

/// Trap sessions. Dawn empties the overnight catch, dusk the evening one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Dawn,
    Dusk,
}

impl Session {
    pub const ALL: [Session; 2] = [Session::Dawn, Session::Dusk];

    pub fn label(&self) -> &'static str {
        match self {
            Session::Dawn => "Dawn",
            Session::Dusk => "Dusk",
        }
    }
}

/// Moth size classes used by the trap's camera classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Mini,
    Medium,
    Large,
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [SizeClass::Mini, SizeClass::Medium, SizeClass::Large];

    pub fn label(&self) -> &'static str {
        match self {
            SizeClass::Mini => "Mini",
            SizeClass::Medium => "Medium",
            SizeClass::Large => "Large",
        }
    }
}

/// Captures per size class, kept as the service reported them. An
/// unreported class resolves to zero captures through [`Self::GAP_POLICY`],
/// unlike weather fields which stay unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeCounts {
    pub mini: Option<u32>,
    pub medium: Option<u32>,
    pub large: Option<u32>,
}

impl SizeCounts {
    /// Count fields take the zero-fill row of the absent-value table.
    pub const GAP_POLICY: GapPolicy = GapPolicy::ZeroFill;

    pub fn class(&self, class: SizeClass) -> Option<u32> {
        match class {
            SizeClass::Mini => self.mini,
            SizeClass::Medium => self.medium,
            SizeClass::Large => self.large,
        }
    }

    /// The class count as charted, absence resolved by [`Self::GAP_POLICY`].
    pub fn resolved(&self, class: SizeClass) -> Option<f64> {
        Self::GAP_POLICY.resolve(self.class(class).map(f64::from))
    }

    /// Captures across all classes, each class resolved first.
    pub fn total(&self) -> Option<f64> {
        SizeClass::ALL
            .into_iter()
            .map(|class| self.resolved(class))
            .sum()
    }
}

/// Moth captures for one night, split by session and size class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MothNight {
    pub date: NaiveDate,
    pub dawn: SizeCounts,
    pub dusk: SizeCounts,
}

impl MothNight {
    pub fn session(&self, session: Session) -> &SizeCounts {
        match session {
            Session::Dawn => &self.dawn,
            Session::Dusk => &self.dusk,
        }
    }
}

/// Nightly moon illumination, as a percentage of full.
#[derive(Debug, Clone, PartialEq)]
pub struct MoonReading {
    pub date: NaiveDate,
    pub illumination: Option<f64>,
}

/// The departure-timing study computed by the trap service.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartureStudy {
    pub time_distribution: TimeDistribution,
    pub temperature_analysis: TemperatureAnalysis,
    pub stats: DepartureStats,
}

/// Moths departed per minutes-after-activation bucket. `times` and
/// `counts` are parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDistribution {
    pub times: Vec<f64>,
    pub counts: Vec<f64>,
}

/// Mean departure time and sample size per light-temperature range.
/// `ranges`, `avg_times` and `counts` are parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureAnalysis {
    pub ranges: Vec<String>,
    pub avg_times: Vec<f64>,
    pub counts: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartureStats {
    pub total_moths: u64,
    pub avg_departure_time: f64,
    pub temp_correlation: f64,
}

/// Trap light modes exposed by the control endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightMode {
    Warm,
    Off,
}

impl LightMode {
    pub fn as_path_segment(&self) -> &'static str {
        match self {
            LightMode::Warm => "warm",
            LightMode::Off => "off",
        }
    }

    pub fn parse(raw: &str) -> Option<LightMode> {
        match raw {
            "warm" => Some(LightMode::Warm),
            "off" => Some(LightMode::Off),
            _ => None,
        }
    }
}
