// Observation source trait for moth-trap data access

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::observation::{
    DepartureStudy, LightMode, MothNight, MoonReading, WeatherObservation,
};

/// Failure classes a fetch can settle into. Widgets treat both the same
/// way (error card plus retry) but report them distinctly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The request never completed, or the endpoint answered with a non-OK
    /// HTTP status.
    #[error("network failure: {0}")]
    Network(String),
    /// A payload arrived but violated the wire contract: error envelope,
    /// missing or empty data, or a malformed field.
    #[error("data shape failure: {0}")]
    DataShape(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::Network(e.to_string())
    }
}

/// Read and control surface of the trap service. One method per endpoint.
/// Implementations validate envelopes and field structure, so widgets only
/// ever see domain types.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// `GET /api/weather/hourly`. Hourly readings, at least one.
    async fn weather_hourly(&self) -> Result<Vec<WeatherObservation>, SourceError>;

    /// `GET /api/moths/daily`. One record per observed night.
    async fn moth_nights(&self) -> Result<Vec<MothNight>, SourceError>;

    /// `GET /api/moon/monthly`. Nightly illumination percentages.
    async fn moon_phases(&self) -> Result<Vec<MoonReading>, SourceError>;

    /// `GET /api/moths/departures`. The full departure-timing study.
    async fn departures(&self) -> Result<DepartureStudy, SourceError>;

    /// `GET /api/lights/{warm|off}`. Returns the service's acknowledgement
    /// message.
    async fn set_light(&self, mode: LightMode) -> Result<String, SourceError>;
}
