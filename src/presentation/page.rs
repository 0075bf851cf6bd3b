// Page wiring: one instance of every widget over one shared source

use std::sync::Arc;

use crate::application::conditions::{LatestConditionsWidget, NightTallyWidget};
use crate::application::departures::DeparturesWidget;
use crate::application::night_activity::NightActivityWidget;
use crate::application::source::ObservationSource;
use crate::application::weather_trends::WeatherTrendsWidget;
use crate::presentation::render::RenderTarget;

/// The dashboard page. Each widget owns its own source handle and drawing
/// surface; nothing is shared between them but the source itself.
pub struct DashboardPage {
    pub weather_trends: WeatherTrendsWidget,
    pub latest_conditions: LatestConditionsWidget,
    pub night_activity: NightActivityWidget,
    pub night_tally: NightTallyWidget,
    pub departures: DeparturesWidget,
}

impl DashboardPage {
    /// Pure construction: nothing is fetched or drawn until `init`.
    pub fn new(
        source: Arc<dyn ObservationSource>,
        mut target_for: impl FnMut(&str) -> Box<dyn RenderTarget>,
    ) -> Self {
        Self {
            weather_trends: WeatherTrendsWidget::new(
                source.clone(),
                target_for("weather-trends"),
            ),
            latest_conditions: LatestConditionsWidget::new(
                source.clone(),
                target_for("latest-conditions"),
            ),
            night_activity: NightActivityWidget::new(
                source.clone(),
                target_for("night-activity"),
            ),
            night_tally: NightTallyWidget::new(source.clone(), target_for("night-tally")),
            departures: DeparturesWidget::new(source, target_for("departures")),
        }
    }

    /// First load. Widgets are independent, so they load concurrently and
    /// each settles into ready or error on its own; one failing feed never
    /// blanks the others.
    pub async fn init(&mut self) {
        tokio::join!(
            self.weather_trends.reload(),
            self.latest_conditions.reload(),
            self.night_activity.reload(),
            self.night_tally.reload(),
            self.departures.reload(),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::application::source::testing::StaticSource;
    use crate::application::source::SourceError;
    use crate::application::widget::Phase;
    use crate::domain::observation::{
        DepartureStats, DepartureStudy, LightMode, MothNight, MoonReading, SizeCounts,
        TemperatureAnalysis, TimeDistribution, WeatherObservation,
    };
    use crate::presentation::render::testing::CapturingTarget;

    use super::*;

    fn full_source() -> StaticSource {
        StaticSource {
            weather: Ok(vec![WeatherObservation {
                timestamp: NaiveDateTime::parse_from_str("2024-01-01T21:00", "%Y-%m-%dT%H:%M")
                    .unwrap(),
                temperature: Some(8.0),
                humidity: Some(60.0),
                cloud_cover: Some(40.0),
                rainfall: Some(0.0),
            }]),
            nights: Ok(vec![MothNight {
                date: NaiveDate::parse_from_str("2024-01-01", "%Y-%m-%d").unwrap(),
                dawn: SizeCounts {
                    mini: Some(1),
                    medium: Some(0),
                    large: Some(0),
                },
                dusk: SizeCounts::default(),
            }]),
            moon: Ok(vec![MoonReading {
                date: NaiveDate::parse_from_str("2024-01-01", "%Y-%m-%d").unwrap(),
                illumination: Some(50.0),
            }]),
            study: Ok(DepartureStudy {
                time_distribution: TimeDistribution {
                    times: vec![0.0, 1.0],
                    counts: vec![2.0, 4.0],
                },
                temperature_analysis: TemperatureAnalysis {
                    ranges: vec!["5-10".to_string()],
                    avg_times: vec![3.0],
                    counts: vec![6.0],
                },
                stats: DepartureStats {
                    total_moths: 6,
                    avg_departure_time: 2.5,
                    temp_correlation: 0.1,
                },
            }),
            ..StaticSource::default()
        }
    }

    #[tokio::test]
    async fn test_init_settles_every_widget_independently() {
        let source = Arc::new(full_source());
        let mut page = DashboardPage::new(source, |_| Box::new(CapturingTarget::new().0));

        page.init().await;

        assert_eq!(page.weather_trends.state().phase(), Phase::Ready);
        assert_eq!(page.latest_conditions.state().phase(), Phase::Ready);
        assert_eq!(page.night_activity.state().phase(), Phase::Ready);
        assert_eq!(page.night_tally.state().phase(), Phase::Ready);
        assert_eq!(page.departures.state().phase(), Phase::Ready);
    }

    #[tokio::test]
    async fn test_one_failing_feed_only_fails_its_widgets() {
        let source = Arc::new(StaticSource {
            study: Err(SourceError::Network("departures endpoint down".to_string())),
            ..full_source()
        });
        let mut page = DashboardPage::new(source, |_| Box::new(CapturingTarget::new().0));

        page.init().await;

        assert_eq!(page.departures.state().phase(), Phase::Error);
        assert_eq!(page.weather_trends.state().phase(), Phase::Ready);
        assert_eq!(page.night_activity.state().phase(), Phase::Ready);
    }

    /// Fails every endpoint on the first attempt, then answers like the
    /// wrapped source.
    struct FlakySource {
        attempts: AtomicUsize,
        good: StaticSource,
    }

    impl FlakySource {
        fn new(good: StaticSource) -> Self {
            Self {
                attempts: AtomicUsize::new(0),
                good,
            }
        }

        fn cold(&self) -> Option<SourceError> {
            if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                Some(SourceError::Network("cold start".to_string()))
            } else {
                None
            }
        }
    }

    #[async_trait]
    impl ObservationSource for FlakySource {
        async fn weather_hourly(&self) -> Result<Vec<WeatherObservation>, SourceError> {
            match self.cold() {
                Some(e) => Err(e),
                None => self.good.weather_hourly().await,
            }
        }

        async fn moth_nights(&self) -> Result<Vec<MothNight>, SourceError> {
            self.good.moth_nights().await
        }

        async fn moon_phases(&self) -> Result<Vec<MoonReading>, SourceError> {
            self.good.moon_phases().await
        }

        async fn departures(&self) -> Result<DepartureStudy, SourceError> {
            self.good.departures().await
        }

        async fn set_light(&self, mode: LightMode) -> Result<String, SourceError> {
            self.good.set_light(mode).await
        }
    }

    #[tokio::test]
    async fn test_manual_retry_moves_error_back_through_loading_to_ready() {
        let source = Arc::new(FlakySource::new(full_source()));
        let (target, events) = CapturingTarget::new();
        let mut widget = WeatherTrendsWidget::new(source, Box::new(target));

        widget.reload().await;
        assert_eq!(widget.state().phase(), Phase::Error);

        widget.reload().await;
        assert_eq!(widget.state().phase(), Phase::Ready);

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "loading".to_string(),
                "error: network failure: cold start".to_string(),
                "loading".to_string(),
                "chart: 4 series".to_string(),
            ]
        );
    }
}
