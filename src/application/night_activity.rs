// Night activity widget: stacked dawn and dusk capture bars with moon and
// weather overlays on one shared date axis

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::source::{ObservationSource, SourceError};
use crate::application::widget::WidgetState;
use crate::domain::aggregate::daily_mean;
use crate::domain::align::align;
use crate::domain::chart::{
    AxisDomain, AxisSlot, ChartDescriptor, Encoding, Series, XDomain, YAxis,
};
use crate::domain::metric::{Metric, VisibilityConfig};
use crate::domain::observation::{
    MothNight, MoonReading, Session, SizeClass, WeatherObservation,
};
use crate::presentation::render::RenderTarget;

/// Everything one load caches. Weather is reduced to daily means once at
/// fetch time; alignment and composition run again per render.
#[derive(Debug, Clone)]
pub struct NightData {
    nights: Vec<MothNight>,
    moon: BTreeMap<NaiveDate, f64>,
    temperature: BTreeMap<NaiveDate, f64>,
    humidity: BTreeMap<NaiveDate, f64>,
    cloud_cover: BTreeMap<NaiveDate, f64>,
}

pub struct NightActivityWidget {
    source: Arc<dyn ObservationSource>,
    target: Box<dyn RenderTarget>,
    visibility: VisibilityConfig,
    state: WidgetState<NightData>,
}

/// The moon overlay starts visible, the weather overlays hidden.
fn default_visibility() -> VisibilityConfig {
    VisibilityConfig::new(&[
        (Metric::MoonPhase, true),
        (Metric::Temperature, false),
        (Metric::Humidity, false),
        (Metric::CloudCover, false),
    ])
}

impl NightActivityWidget {
    pub fn new(source: Arc<dyn ObservationSource>, target: Box<dyn RenderTarget>) -> Self {
        Self {
            source,
            target,
            visibility: default_visibility(),
            state: WidgetState::Uninitialized,
        }
    }

    pub async fn reload(&mut self) {
        self.state = WidgetState::Loading;
        self.target.show_loading();

        // Let every fetch settle before validating, so the reported failure
        // is the first in declaration order rather than completion order.
        let (nights, moon, weather) = tokio::join!(
            self.source.moth_nights(),
            self.source.moon_phases(),
            self.source.weather_hourly(),
        );

        match assemble(nights, moon, weather) {
            Ok(data) => {
                self.state = WidgetState::Ready(data);
                self.redraw();
            }
            Err(e) => {
                tracing::warn!("night activity load failed: {}", e);
                self.target.show_error(&e.to_string());
                self.state = WidgetState::Error(e);
            }
        }
    }

    /// Ready self-loop: recomposes from the cached series without fetching.
    pub fn set_metric_visible(&mut self, metric: Metric, visible: bool) {
        self.visibility.set(metric, visible);
        self.redraw();
    }

    pub fn descriptor(&self) -> Option<ChartDescriptor> {
        self.state.data().map(|data| compose(data, &self.visibility))
    }

    pub fn state(&self) -> &WidgetState<NightData> {
        &self.state
    }

    fn redraw(&mut self) {
        let Some(chart) = self.descriptor() else { return };
        if let Err(e) = self.target.render_chart(&chart) {
            tracing::error!("night activity render failed: {}", e);
        }
    }
}

fn assemble(
    nights: Result<Vec<MothNight>, SourceError>,
    moon: Result<Vec<MoonReading>, SourceError>,
    weather: Result<Vec<WeatherObservation>, SourceError>,
) -> Result<NightData, SourceError> {
    let mut nights = nights?;
    let moon = moon?;
    let weather = weather?;

    nights.sort_by_key(|night| night.date);

    // The feed carries one record per night; if a date ever repeats, the
    // first reading wins.
    let mut moon_by_date = BTreeMap::new();
    for reading in &moon {
        if let Some(illumination) = reading.illumination {
            moon_by_date.entry(reading.date).or_insert(illumination);
        }
    }

    Ok(NightData {
        nights,
        moon: moon_by_date,
        temperature: daily_mean(&weather, |o| o.date(), |o| o.temperature),
        humidity: daily_mean(&weather, |o| o.date(), |o| o.humidity),
        cloud_cover: daily_mean(&weather, |o| o.date(), |o| o.cloud_cover),
    })
}

/// Overlay order is fixed; the aligned columns after the six bar columns
/// follow it.
fn overlay_sources(data: &NightData) -> [(Metric, &BTreeMap<NaiveDate, f64>); 4] {
    [
        (Metric::MoonPhase, &data.moon),
        (Metric::Temperature, &data.temperature),
        (Metric::Humidity, &data.humidity),
        (Metric::CloudCover, &data.cloud_cover),
    ]
}

fn compose(data: &NightData, visibility: &VisibilityConfig) -> ChartDescriptor {
    let mut count_maps: Vec<BTreeMap<NaiveDate, f64>> = Vec::new();
    for session in Session::ALL {
        for class in SizeClass::ALL {
            count_maps.push(
                data.nights
                    .iter()
                    .filter_map(|night| {
                        let count = night.session(session).resolved(class)?;
                        Some((night.date, count))
                    })
                    .collect(),
            );
        }
    }

    let overlays = overlay_sources(data);
    let sources: Vec<&BTreeMap<NaiveDate, f64>> = count_maps
        .iter()
        .chain(overlays.iter().map(|(_, map)| *map))
        .collect();
    let frame = align(&sources);

    // The count scale tops out at the tallest session stack, not at the
    // tallest single bar.
    let mut stack_peak = 0.0_f64;
    for i in 0..frame.dates.len() {
        let dawn: f64 = frame.columns[0..3].iter().filter_map(|col| col[i]).sum();
        let dusk: f64 = frame.columns[3..6].iter().filter_map(|col| col[i]).sum();
        stack_peak = stack_peak.max(dawn).max(dusk);
    }

    let mut series = Vec::new();
    let mut column = 0;
    for session in Session::ALL {
        for class in SizeClass::ALL {
            series.push(Series {
                name: format!("{} - {}", session.label(), class.label()),
                axis: AxisSlot::Primary,
                encoding: Encoding::Bar {
                    stack: Some(session.label().to_lowercase()),
                },
                color: Some(bar_color(session, class).to_string()),
                values: frame.columns[column].clone(),
                labels: None,
            });
            column += 1;
        }
    }
    for (metric, _) in overlays {
        if visibility.is_visible(metric) {
            let values = frame.columns[column]
                .iter()
                .map(|&value| metric.gap_policy().resolve(value))
                .collect();
            series.push(Series {
                name: metric.label().to_string(),
                axis: overlay_axis(metric),
                encoding: Encoding::Line,
                color: Some(metric.color().to_string()),
                values,
                labels: None,
            });
        }
        column += 1;
    }

    let mut y_axes = vec![YAxis {
        slot: AxisSlot::Primary,
        label: "Number of Moths".to_string(),
        domain: AxisDomain::ZeroToMax { max: stack_peak },
    }];
    if series.iter().any(|s| s.axis == AxisSlot::Secondary) {
        y_axes.push(YAxis {
            slot: AxisSlot::Secondary,
            label: "Percentage (%)".to_string(),
            domain: AxisDomain::Percent,
        });
    }
    if series.iter().any(|s| s.axis == AxisSlot::Tertiary) {
        let observed = series
            .iter()
            .filter(|s| s.axis == AxisSlot::Tertiary)
            .flat_map(|s| s.values.iter().flatten().copied());
        y_axes.push(YAxis {
            slot: AxisSlot::Tertiary,
            label: "Temperature (°C)".to_string(),
            domain: AxisDomain::observed(observed),
        });
    }

    ChartDescriptor {
        title: "Moth Activity at Dawn and Dusk".to_string(),
        x_label: "Date".to_string(),
        x: XDomain::Dates(frame.dates),
        y_axes,
        series,
    }
}

/// Percent overlays share the secondary scale; temperature gets its own.
fn overlay_axis(metric: Metric) -> AxisSlot {
    if metric.is_percent() {
        AxisSlot::Secondary
    } else {
        AxisSlot::Tertiary
    }
}

fn bar_color(session: Session, class: SizeClass) -> &'static str {
    match (session, class) {
        (Session::Dawn, SizeClass::Mini) => "rgb(255, 205, 86)",
        (Session::Dawn, SizeClass::Medium) => "rgb(255, 159, 64)",
        (Session::Dawn, SizeClass::Large) => "rgb(255, 99, 132)",
        (Session::Dusk, SizeClass::Mini) => "rgb(153, 102, 255)",
        (Session::Dusk, SizeClass::Medium) => "rgb(54, 162, 235)",
        (Session::Dusk, SizeClass::Large) => "rgb(75, 192, 192)",
    }
}
