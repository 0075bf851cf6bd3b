// REST implementation of the observation source

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::application::source::{ObservationSource, SourceError};
use crate::domain::observation::{
    DepartureStats, DepartureStudy, LightMode, MothNight, MoonReading, SizeCounts,
    TemperatureAnalysis, TimeDistribution, WeatherObservation,
};
use crate::infrastructure::config::ApiSettings;

const WEATHER_HOURLY: &str = "/api/weather/hourly";
const MOTHS_DAILY: &str = "/api/moths/daily";
const MOON_MONTHLY: &str = "/api/moon/monthly";
const MOTHS_DEPARTURES: &str = "/api/moths/departures";

/// Timestamps arrive as plain calendar strings, spaced or ISO 8601 `T`
/// separated, seconds optional.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub struct RestObservationSource {
    client: Client,
    base_url: String,
}

impl RestObservationSource {
    pub fn new(settings: &ApiSettings) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches one endpoint and unwraps its `{status, data, message}`
    /// envelope.
    async fn get_payload<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("fetching {}", url);

        let response = self.client.get(&url).send().await?;
        check_status(path, response.status())?;
        let body = response.text().await?;
        decode_payload(path, &body)
    }
}

#[async_trait]
impl ObservationSource for RestObservationSource {
    async fn weather_hourly(&self) -> Result<Vec<WeatherObservation>, SourceError> {
        let records: Vec<WeatherRecord> = self.get_payload(WEATHER_HOURLY).await?;
        require_non_empty(&records, WEATHER_HOURLY)?;
        records
            .into_iter()
            .map(|record| record.into_domain(WEATHER_HOURLY))
            .collect()
    }

    async fn moth_nights(&self) -> Result<Vec<MothNight>, SourceError> {
        let records: Vec<MothNightRecord> = self.get_payload(MOTHS_DAILY).await?;
        require_non_empty(&records, MOTHS_DAILY)?;
        records
            .into_iter()
            .map(|record| record.into_domain(MOTHS_DAILY))
            .collect()
    }

    async fn moon_phases(&self) -> Result<Vec<MoonReading>, SourceError> {
        let records: Vec<MoonRecord> = self.get_payload(MOON_MONTHLY).await?;
        require_non_empty(&records, MOON_MONTHLY)?;
        records
            .into_iter()
            .map(|record| record.into_domain(MOON_MONTHLY))
            .collect()
    }

    async fn departures(&self) -> Result<DepartureStudy, SourceError> {
        let payload: DeparturesPayload = self.get_payload(MOTHS_DEPARTURES).await?;
        payload.into_domain(MOTHS_DEPARTURES)
    }

    async fn set_light(&self, mode: LightMode) -> Result<String, SourceError> {
        let path = format!("/api/lights/{}", mode.as_path_segment());
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.get(&url).send().await?;
        check_status(&path, response.status())?;
        let body = response.text().await?;
        let ack: LightAck = serde_json::from_str(&body)
            .map_err(|e| SourceError::DataShape(format!("{path}: {e}")))?;
        if ack.status != "success" {
            let detail = ack
                .message
                .unwrap_or_else(|| "light control failed".to_string());
            return Err(SourceError::DataShape(format!("{path}: {detail}")));
        }
        Ok(ack.message.unwrap_or_default())
    }
}

/// Common `{status, data, message}` wrapper around every data endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

/// The lights endpoints acknowledge without a data field.
#[derive(Debug, Deserialize)]
struct LightAck {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Non-OK statuses never carry a usable payload, so they classify as
/// network failures before any decoding happens.
fn check_status(path: &str, status: StatusCode) -> Result<(), SourceError> {
    if !status.is_success() {
        return Err(SourceError::Network(format!("{path}: HTTP {status}")));
    }
    Ok(())
}

/// Everything past the transport is a data shape failure: malformed JSON,
/// an error envelope, or missing data.
fn decode_payload<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, SourceError> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| SourceError::DataShape(format!("{path}: {e}")))?;
    unwrap_envelope(envelope, path)
}

fn unwrap_envelope<T>(envelope: Envelope<T>, path: &str) -> Result<T, SourceError> {
    if envelope.status != "success" {
        let detail = envelope
            .message
            .unwrap_or_else(|| format!("status {:?}", envelope.status));
        return Err(SourceError::DataShape(format!("{path}: {detail}")));
    }
    envelope
        .data
        .ok_or_else(|| SourceError::DataShape(format!("{path}: missing data")))
}

fn require_non_empty<T>(records: &[T], path: &str) -> Result<(), SourceError> {
    if records.is_empty() {
        return Err(SourceError::DataShape(format!("{path}: empty data array")));
    }
    Ok(())
}

fn parse_timestamp(raw: &str, path: &str) -> Result<NaiveDateTime, SourceError> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed);
        }
    }
    Err(SourceError::DataShape(format!(
        "{path}: unparseable timestamp {raw:?}"
    )))
}

/// Dates arrive as `%Y-%m-%d`, except the moon feed, whose serializer emits
/// RFC 2822 datetimes for plain dates. Both reduce to a calendar date.
fn parse_date(raw: &str, path: &str) -> Result<NaiveDate, SourceError> {
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Ok(parsed.date_naive());
    }
    if let Ok(parsed) = parse_timestamp(raw, path) {
        return Ok(parsed.date());
    }
    Err(SourceError::DataShape(format!(
        "{path}: unparseable date {raw:?}"
    )))
}

#[derive(Debug, Deserialize)]
struct WeatherRecord {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Temperature", default)]
    temperature: Option<f64>,
    #[serde(rename = "Humidity", default)]
    humidity: Option<f64>,
    #[serde(rename = "Cloud_Cover", default)]
    cloud_cover: Option<f64>,
    #[serde(rename = "Rainfall", default)]
    rainfall: Option<f64>,
}

impl WeatherRecord {
    fn into_domain(self, path: &str) -> Result<WeatherObservation, SourceError> {
        Ok(WeatherObservation {
            timestamp: parse_timestamp(&self.timestamp, path)?,
            temperature: self.temperature,
            humidity: self.humidity,
            cloud_cover: self.cloud_cover,
            rainfall: self.rainfall,
        })
    }
}

#[derive(Debug, Deserialize)]
struct MothNightRecord {
    date: String,
    morning: SizeCountsRecord,
    afternoon: SizeCountsRecord,
}

/// Size classes decode as reported; [`SizeCounts::GAP_POLICY`] resolves
/// absent ones to zero captures in the domain, not here.
#[derive(Debug, Deserialize)]
struct SizeCountsRecord {
    #[serde(default)]
    mini: Option<u32>,
    #[serde(default)]
    medium: Option<u32>,
    #[serde(default)]
    large: Option<u32>,
}

impl SizeCountsRecord {
    fn into_domain(self) -> SizeCounts {
        SizeCounts {
            mini: self.mini,
            medium: self.medium,
            large: self.large,
        }
    }
}

impl MothNightRecord {
    fn into_domain(self, path: &str) -> Result<MothNight, SourceError> {
        Ok(MothNight {
            date: parse_date(&self.date, path)?,
            dawn: self.morning.into_domain(),
            dusk: self.afternoon.into_domain(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct MoonRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Moon Phase (%)", default)]
    illumination: Option<f64>,
}

impl MoonRecord {
    fn into_domain(self, path: &str) -> Result<MoonReading, SourceError> {
        Ok(MoonReading {
            date: parse_date(&self.date, path)?,
            illumination: self.illumination,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DeparturesPayload {
    time_distribution: TimeDistributionRecord,
    temperature_analysis: TemperatureAnalysisRecord,
    stats: StatsRecord,
}

#[derive(Debug, Deserialize)]
struct TimeDistributionRecord {
    times: Vec<f64>,
    counts: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct TemperatureAnalysisRecord {
    ranges: Vec<String>,
    avg_times: Vec<f64>,
    counts: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct StatsRecord {
    total_moths: u64,
    avg_departure_time: f64,
    temp_correlation: f64,
}

impl DeparturesPayload {
    fn into_domain(self, path: &str) -> Result<DepartureStudy, SourceError> {
        if self.time_distribution.times.len() != self.time_distribution.counts.len() {
            return Err(SourceError::DataShape(format!(
                "{path}: time_distribution arrays differ in length"
            )));
        }
        let analysis = &self.temperature_analysis;
        if analysis.ranges.len() != analysis.avg_times.len()
            || analysis.ranges.len() != analysis.counts.len()
        {
            return Err(SourceError::DataShape(format!(
                "{path}: temperature_analysis arrays differ in length"
            )));
        }

        Ok(DepartureStudy {
            time_distribution: TimeDistribution {
                times: self.time_distribution.times,
                counts: self.time_distribution.counts,
            },
            temperature_analysis: TemperatureAnalysis {
                ranges: self.temperature_analysis.ranges,
                avg_times: self.temperature_analysis.avg_times,
                counts: self.temperature_analysis.counts,
            },
            stats: DepartureStats {
                total_moths: self.stats.total_moths,
                avg_departure_time: self.stats.avg_departure_time,
                temp_correlation: self.stats.temp_correlation,
            },
        })
    }
}
