// Weather trends widget: hourly multi-scale line chart with metric toggles

use std::sync::Arc;

use crate::application::source::{ObservationSource, SourceError};
use crate::application::widget::WidgetState;
use crate::domain::chart::{
    AxisDomain, AxisSlot, ChartDescriptor, Encoding, Series, XDomain, YAxis,
};
use crate::domain::metric::{Metric, VisibilityConfig};
use crate::domain::observation::WeatherObservation;
use crate::presentation::render::RenderTarget;

const TREND_METRICS: [Metric; 4] = [
    Metric::Temperature,
    Metric::Humidity,
    Metric::CloudCover,
    Metric::Rainfall,
];

pub struct WeatherTrendsWidget {
    source: Arc<dyn ObservationSource>,
    target: Box<dyn RenderTarget>,
    visibility: VisibilityConfig,
    state: WidgetState<Vec<WeatherObservation>>,
}

impl WeatherTrendsWidget {
    /// All four metrics start visible.
    pub fn new(source: Arc<dyn ObservationSource>, target: Box<dyn RenderTarget>) -> Self {
        let visibility = VisibilityConfig::new(&TREND_METRICS.map(|metric| (metric, true)));
        Self {
            source,
            target,
            visibility,
            state: WidgetState::Uninitialized,
        }
    }

    /// Initial load, manual retry, and refresh all take this transition.
    pub async fn reload(&mut self) {
        self.state = WidgetState::Loading;
        self.target.show_loading();

        match self.fetch().await {
            Ok(observations) => {
                self.state = WidgetState::Ready(observations);
                self.redraw();
            }
            Err(e) => {
                tracing::warn!("weather trends load failed: {}", e);
                self.target.show_error(&e.to_string());
                self.state = WidgetState::Error(e);
            }
        }
    }

    async fn fetch(&self) -> Result<Vec<WeatherObservation>, SourceError> {
        let mut observations = self.source.weather_hourly().await?;
        observations.sort_by_key(|observation| observation.timestamp);
        Ok(observations)
    }

    /// Ready self-loop: flips one toggle and recomposes from the cached
    /// series without fetching. A no-op flip redraws the same chart.
    pub fn set_metric_visible(&mut self, metric: Metric, visible: bool) {
        self.visibility.set(metric, visible);
        self.redraw();
    }

    pub fn descriptor(&self) -> Option<ChartDescriptor> {
        self.state
            .data()
            .map(|observations| compose(observations, &self.visibility))
    }

    pub fn state(&self) -> &WidgetState<Vec<WeatherObservation>> {
        &self.state
    }

    fn redraw(&mut self) {
        let Some(chart) = self.descriptor() else { return };
        if let Err(e) = self.target.render_chart(&chart) {
            tracing::error!("weather trends render failed: {}", e);
        }
    }
}

/// Builds the descriptor from the cached series and the current toggles.
/// Hidden metrics are dropped entirely, along with any scale no remaining
/// series uses.
fn compose(observations: &[WeatherObservation], visibility: &VisibilityConfig) -> ChartDescriptor {
    let x = XDomain::Timestamps(
        observations
            .iter()
            .map(|observation| observation.timestamp)
            .collect(),
    );

    let mut series = Vec::new();
    for metric in TREND_METRICS {
        if !visibility.is_visible(metric) {
            continue;
        }
        series.push(Series {
            name: metric.label().to_string(),
            axis: trend_axis(metric),
            encoding: Encoding::Line,
            color: Some(metric.color().to_string()),
            values: observations
                .iter()
                .map(|observation| observation.field(metric))
                .collect(),
            labels: None,
        });
    }

    let mut y_axes = Vec::new();
    for slot in [AxisSlot::Primary, AxisSlot::Secondary, AxisSlot::Tertiary] {
        if !series.iter().any(|s| s.axis == slot) {
            continue;
        }
        y_axes.push(match slot {
            AxisSlot::Primary => YAxis {
                slot,
                label: "Temperature (°C)".to_string(),
                domain: AxisDomain::Fixed {
                    min: -1.0,
                    max: 20.0,
                },
            },
            AxisSlot::Secondary => YAxis {
                slot,
                label: "Percentage (%)".to_string(),
                domain: AxisDomain::Percent,
            },
            AxisSlot::Tertiary => YAxis {
                slot,
                label: "Rainfall (mm)".to_string(),
                domain: AxisDomain::rainfall(
                    observations.iter().filter_map(|observation| observation.rainfall),
                ),
            },
        });
    }

    ChartDescriptor {
        title: "Weather Data".to_string(),
        x_label: "Time".to_string(),
        x,
        y_axes,
        series,
    }
}

fn trend_axis(metric: Metric) -> AxisSlot {
    if metric == Metric::Temperature {
        AxisSlot::Primary
    } else if metric.is_percent() {
        AxisSlot::Secondary
    } else {
        AxisSlot::Tertiary
    }
}
