// Summary card widgets: latest weather conditions and last night's tally

use std::sync::Arc;

use crate::application::source::{ObservationSource, SourceError};
use crate::application::widget::WidgetState;
use crate::domain::chart::Tile;
use crate::domain::metric::Metric;
use crate::domain::observation::{MothNight, Session, SizeClass, WeatherObservation};
use crate::presentation::render::RenderTarget;

pub struct LatestConditionsWidget {
    source: Arc<dyn ObservationSource>,
    target: Box<dyn RenderTarget>,
    state: WidgetState<WeatherObservation>,
}

impl LatestConditionsWidget {
    pub fn new(source: Arc<dyn ObservationSource>, target: Box<dyn RenderTarget>) -> Self {
        Self {
            source,
            target,
            state: WidgetState::Uninitialized,
        }
    }

    pub async fn reload(&mut self) {
        self.state = WidgetState::Loading;
        self.target.show_loading();

        match self.fetch().await {
            Ok(latest) => {
                self.state = WidgetState::Ready(latest);
                self.redraw();
            }
            Err(e) => {
                tracing::warn!("latest conditions load failed: {}", e);
                self.target.show_error(&e.to_string());
                self.state = WidgetState::Error(e);
            }
        }
    }

    async fn fetch(&self) -> Result<WeatherObservation, SourceError> {
        let mut observations = self.source.weather_hourly().await?;
        observations.sort_by_key(|observation| observation.timestamp);
        observations
            .pop()
            .ok_or_else(|| SourceError::DataShape("empty weather history".to_string()))
    }

    pub fn tiles(&self) -> Option<Vec<Tile>> {
        self.state.data().map(condition_tiles)
    }

    pub fn state(&self) -> &WidgetState<WeatherObservation> {
        &self.state
    }

    fn redraw(&mut self) {
        let Some(tiles) = self.tiles() else { return };
        if let Err(e) = self.target.render_tiles(&tiles) {
            tracing::error!("latest conditions render failed: {}", e);
        }
    }
}

fn condition_tiles(latest: &WeatherObservation) -> Vec<Tile> {
    let mut temperature = Tile::new(
        "temperature".to_string(),
        "Temperature".to_string(),
        Metric::Temperature.unit().to_string(),
        latest.temperature,
        1,
    );
    temperature.accent = latest.temperature.map(temperature_ramp);

    vec![
        temperature,
        Tile::new(
            "humidity".to_string(),
            "Humidity".to_string(),
            Metric::Humidity.unit().to_string(),
            latest.humidity,
            1,
        ),
        Tile::new(
            "cloud-cover".to_string(),
            "Cloud Cover".to_string(),
            Metric::CloudCover.unit().to_string(),
            latest.cloud_cover,
            1,
        ),
        Tile::new(
            "rainfall".to_string(),
            "Rainfall".to_string(),
            Metric::Rainfall.unit().to_string(),
            latest.rainfall,
            2,
        ),
    ]
}

/// Continuous blue-to-red ramp over -10..40 °C, clamped outside that range.
fn temperature_ramp(temperature: f64) -> String {
    let level = (((temperature + 10.0) / 50.0) * 255.0).clamp(0.0, 255.0);
    let red = level.round() as u8;
    format!("rgb({red}, 0, {})", 255 - red)
}

/// Last night's captures per session and size class, plus session totals.
#[derive(Debug, Clone)]
pub struct TallySnapshot {
    night: MothNight,
    latest_weather: WeatherObservation,
}

pub struct NightTallyWidget {
    source: Arc<dyn ObservationSource>,
    target: Box<dyn RenderTarget>,
    state: WidgetState<TallySnapshot>,
}

impl NightTallyWidget {
    pub fn new(source: Arc<dyn ObservationSource>, target: Box<dyn RenderTarget>) -> Self {
        Self {
            source,
            target,
            state: WidgetState::Uninitialized,
        }
    }

    pub async fn reload(&mut self) {
        self.state = WidgetState::Loading;
        self.target.show_loading();

        // Both fetches settle before validation; the moth feed is reported
        // first when both fail.
        let (nights, weather) = tokio::join!(
            self.source.moth_nights(),
            self.source.weather_hourly(),
        );

        match assemble(nights, weather) {
            Ok(snapshot) => {
                self.state = WidgetState::Ready(snapshot);
                self.redraw();
            }
            Err(e) => {
                tracing::warn!("night tally load failed: {}", e);
                self.target.show_error(&e.to_string());
                self.state = WidgetState::Error(e);
            }
        }
    }

    pub fn tiles(&self) -> Option<Vec<Tile>> {
        self.state.data().map(tally_tiles)
    }

    pub fn state(&self) -> &WidgetState<TallySnapshot> {
        &self.state
    }

    fn redraw(&mut self) {
        let Some(tiles) = self.tiles() else { return };
        if let Err(e) = self.target.render_tiles(&tiles) {
            tracing::error!("night tally render failed: {}", e);
        }
    }
}

fn assemble(
    nights: Result<Vec<MothNight>, SourceError>,
    weather: Result<Vec<WeatherObservation>, SourceError>,
) -> Result<TallySnapshot, SourceError> {
    let mut nights = nights?;
    let mut weather = weather?;

    nights.sort_by_key(|night| night.date);
    let night = nights
        .pop()
        .ok_or_else(|| SourceError::DataShape("empty moth history".to_string()))?;

    weather.sort_by_key(|observation| observation.timestamp);
    let latest_weather = weather
        .pop()
        .ok_or_else(|| SourceError::DataShape("empty weather history".to_string()))?;

    Ok(TallySnapshot {
        night,
        latest_weather,
    })
}

fn tally_tiles(snapshot: &TallySnapshot) -> Vec<Tile> {
    let accent = banded_accent(snapshot.latest_weather.temperature);
    let mut tiles = Vec::new();

    for session in Session::ALL {
        let counts = snapshot.night.session(session);
        let prefix = session.label().to_lowercase();

        let mut total = Tile::new(
            format!("{prefix}-total"),
            format!("{} Total", session.label()),
            "moths".to_string(),
            counts.total(),
            0,
        );
        total.accent = Some(accent.clone());
        tiles.push(total);

        for class in SizeClass::ALL {
            tiles.push(Tile::new(
                format!("{prefix}-{}", class.label().to_lowercase()),
                format!("{} {}", session.label(), class.label()),
                "moths".to_string(),
                counts.resolved(class),
                0,
            ));
        }
    }

    tiles
}

/// Banded accent for the tally card. Unknown temperature gets a neutral
/// gray; zero degrees is a real reading and lands in the coldest band.
fn banded_accent(temperature: Option<f64>) -> String {
    let color = match temperature {
        None => "#808080",
        Some(t) if t <= 0.0 => "#00ffff",
        Some(t) if t <= 10.0 => "#00bfff",
        Some(t) if t <= 20.0 => "#ffa500",
        Some(_) => "#ff4500",
    };
    color.to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::application::source::testing::StaticSource;
    use crate::application::widget::Phase;
    use crate::domain::observation::SizeCounts;
    use crate::presentation::render::testing::CapturingTarget;

    use super::*;

    fn observation(raw: &str, temperature: Option<f64>) -> WeatherObservation {
        WeatherObservation {
            timestamp: NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").unwrap(),
            temperature,
            humidity: Some(61.2),
            cloud_cover: None,
            rainfall: Some(0.25),
        }
    }

    fn night(raw: &str) -> MothNight {
        MothNight {
            date: NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap(),
            dawn: SizeCounts {
                mini: Some(3),
                medium: Some(2),
                large: Some(1),
            },
            dusk: SizeCounts {
                mini: None,
                medium: Some(4),
                large: Some(0),
            },
        }
    }

    #[test]
    fn test_condition_tiles_keep_gaps_as_gaps() {
        let tiles = condition_tiles(&observation("2024-01-01T08:00", None));

        let temperature = &tiles[0];
        assert_eq!(temperature.value, None);
        assert_eq!(temperature.accent, None);

        let clouds = tiles.iter().find(|t| t.id == "cloud-cover").unwrap();
        assert_eq!(clouds.value, None);
    }

    #[test]
    fn test_temperature_ramp_is_clamped() {
        assert_eq!(temperature_ramp(-40.0), "rgb(0, 0, 255)");
        assert_eq!(temperature_ramp(90.0), "rgb(255, 0, 0)");
        assert_eq!(temperature_ramp(15.0), "rgb(128, 0, 127)");
    }

    #[test]
    fn test_zero_degrees_is_a_reading_not_a_gap() {
        assert_eq!(banded_accent(Some(0.0)), "#00ffff");
        assert_eq!(banded_accent(None), "#808080");
        assert_eq!(banded_accent(Some(10.0)), "#00bfff");
        assert_eq!(banded_accent(Some(20.5)), "#ff4500");
    }

    #[test]
    fn test_tally_tiles_cover_totals_and_every_class() {
        let snapshot = TallySnapshot {
            night: night("2024-01-02"),
            latest_weather: observation("2024-01-02T21:00", Some(14.0)),
        };

        let tiles = tally_tiles(&snapshot);

        assert_eq!(tiles.len(), 8);
        let dawn_total = tiles.iter().find(|t| t.id == "dawn-total").unwrap();
        assert_eq!(dawn_total.value, Some(6.0));
        assert_eq!(dawn_total.accent.as_deref(), Some("#ffa500"));
        let dusk_medium = tiles.iter().find(|t| t.id == "dusk-medium").unwrap();
        assert_eq!(dusk_medium.value, Some(4.0));
        let dusk_mini = tiles.iter().find(|t| t.id == "dusk-mini").unwrap();
        assert_eq!(dusk_mini.value, Some(0.0));
    }

    #[tokio::test]
    async fn test_latest_conditions_picks_the_newest_observation() {
        let source = Arc::new(StaticSource {
            weather: Ok(vec![
                observation("2024-01-01T09:00", Some(9.0)),
                observation("2024-01-01T08:00", Some(8.0)),
            ]),
            ..StaticSource::default()
        });
        let (target, events) = CapturingTarget::new();
        let mut widget = LatestConditionsWidget::new(source, Box::new(target));

        widget.reload().await;

        assert_eq!(widget.state().phase(), Phase::Ready);
        assert_eq!(widget.state().data().unwrap().temperature, Some(9.0));
        assert_eq!(
            *events.lock().unwrap(),
            vec!["loading".to_string(), "tiles: 4".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_weather_history_is_a_data_shape_failure() {
        let source = Arc::new(StaticSource {
            weather: Ok(Vec::new()),
            ..StaticSource::default()
        });
        let (target, _events) = CapturingTarget::new();
        let mut widget = LatestConditionsWidget::new(source, Box::new(target));

        widget.reload().await;

        assert_eq!(
            widget.state().error(),
            Some(&SourceError::DataShape("empty weather history".to_string()))
        );
    }

    #[tokio::test]
    async fn test_tally_reports_the_moth_failure_first() {
        let source = Arc::new(StaticSource {
            nights: Err(SourceError::Network("moth feed down".to_string())),
            weather: Err(SourceError::Network("weather feed down".to_string())),
            ..StaticSource::default()
        });
        let (target, _events) = CapturingTarget::new();
        let mut widget = NightTallyWidget::new(source, Box::new(target));

        widget.reload().await;

        assert_eq!(
            widget.state().error(),
            Some(&SourceError::Network("moth feed down".to_string()))
        );
    }

    #[tokio::test]
    async fn test_tally_uses_the_most_recent_night() {
        let source = Arc::new(StaticSource {
            nights: Ok(vec![night("2024-01-02"), night("2024-01-01")]),
            weather: Ok(vec![observation("2024-01-02T21:00", Some(3.0))]),
            ..StaticSource::default()
        });
        let (target, events) = CapturingTarget::new();
        let mut widget = NightTallyWidget::new(source, Box::new(target));

        widget.reload().await;

        let snapshot = widget.state().data().unwrap();
        assert_eq!(
            snapshot.night.date,
            NaiveDate::parse_from_str("2024-01-02", "%Y-%m-%d").unwrap()
        );
        assert_eq!(
            *events.lock().unwrap(),
            vec!["loading".to_string(), "tiles: 8".to_string()]
        );
    }
}
