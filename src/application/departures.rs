// Departure timing widget: smoothed time distribution and per-temperature
// analysis views over one cached study

use std::sync::Arc;

use crate::application::source::ObservationSource;
use crate::application::widget::WidgetState;
use crate::domain::chart::{
    AxisDomain, AxisSlot, ChartDescriptor, Encoding, Series, Tile, XDomain, YAxis,
};
use crate::domain::observation::{
    DepartureStats, DepartureStudy, TemperatureAnalysis, TimeDistribution,
};
use crate::domain::smoothing::moving_average;
use crate::presentation::render::RenderTarget;

const SMOOTHING_HALF_WINDOW: usize = 3;

/// Which projection of the study is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureView {
    Time,
    Temperature,
}

pub struct DeparturesWidget {
    source: Arc<dyn ObservationSource>,
    target: Box<dyn RenderTarget>,
    view: DepartureView,
    state: WidgetState<DepartureStudy>,
}

impl DeparturesWidget {
    pub fn new(source: Arc<dyn ObservationSource>, target: Box<dyn RenderTarget>) -> Self {
        Self {
            source,
            target,
            view: DepartureView::Time,
            state: WidgetState::Uninitialized,
        }
    }

    pub async fn reload(&mut self) {
        self.state = WidgetState::Loading;
        self.target.show_loading();

        match self.source.departures().await {
            Ok(study) => {
                self.state = WidgetState::Ready(study);
                self.redraw();
            }
            Err(e) => {
                tracing::warn!("departures load failed: {}", e);
                self.target.show_error(&e.to_string());
                self.state = WidgetState::Error(e);
            }
        }
    }

    /// Ready self-loop: swaps the projection over the cached study without
    /// fetching. Selecting the current view redraws the same chart.
    pub fn set_view(&mut self, view: DepartureView) {
        self.view = view;
        self.redraw();
    }

    pub fn descriptor(&self) -> Option<ChartDescriptor> {
        self.state.data().map(|study| compose(study, self.view))
    }

    pub fn stat_tiles(&self) -> Option<Vec<Tile>> {
        self.state.data().map(|study| stat_tiles(&study.stats))
    }

    pub fn state(&self) -> &WidgetState<DepartureStudy> {
        &self.state
    }

    fn redraw(&mut self) {
        let Some(chart) = self.descriptor() else { return };
        if let Err(e) = self.target.render_chart(&chart) {
            tracing::error!("departures render failed: {}", e);
        }
        let Some(tiles) = self.stat_tiles() else { return };
        if let Err(e) = self.target.render_tiles(&tiles) {
            tracing::error!("departures tiles failed: {}", e);
        }
    }
}

fn compose(study: &DepartureStudy, view: DepartureView) -> ChartDescriptor {
    match view {
        DepartureView::Time => time_chart(&study.time_distribution),
        DepartureView::Temperature => temperature_chart(&study.temperature_analysis),
    }
}

fn time_chart(distribution: &TimeDistribution) -> ChartDescriptor {
    let smoothed = moving_average(&distribution.counts, SMOOTHING_HALF_WINDOW);

    ChartDescriptor {
        title: "Time to Departure Distribution".to_string(),
        x_label: "Minutes After Red Light Activation".to_string(),
        x: XDomain::Numbers(distribution.times.clone()),
        y_axes: vec![YAxis {
            slot: AxisSlot::Primary,
            label: "Number of Moths".to_string(),
            domain: AxisDomain::zero_to_max(smoothed.iter().copied()),
        }],
        series: vec![Series {
            name: "Departure Distribution".to_string(),
            axis: AxisSlot::Primary,
            encoding: Encoding::Area,
            color: Some("rgb(75, 192, 192)".to_string()),
            values: smoothed.into_iter().map(Some).collect(),
            labels: None,
        }],
    }
}

fn temperature_chart(analysis: &TemperatureAnalysis) -> ChartDescriptor {
    ChartDescriptor {
        title: "Average Departure Time by Light Temperature".to_string(),
        x_label: "Temperature Range (°C)".to_string(),
        x: XDomain::Categories(analysis.ranges.clone()),
        y_axes: vec![YAxis {
            slot: AxisSlot::Primary,
            label: "Average Time to Departure (minutes)".to_string(),
            domain: AxisDomain::zero_to_max(analysis.avg_times.iter().copied()),
        }],
        series: vec![Series {
            name: "Average Departure Time".to_string(),
            axis: AxisSlot::Primary,
            encoding: Encoding::Bar { stack: None },
            color: None,
            values: analysis.avg_times.iter().copied().map(Some).collect(),
            labels: Some(
                analysis
                    .counts
                    .iter()
                    .map(|count| format!("{count} moths"))
                    .collect(),
            ),
        }],
    }
}

fn stat_tiles(stats: &DepartureStats) -> Vec<Tile> {
    vec![
        Tile::new(
            "total-moths".to_string(),
            "Total Moths".to_string(),
            "moths".to_string(),
            Some(stats.total_moths as f64),
            0,
        ),
        Tile::new(
            "avg-departure".to_string(),
            "Average Departure Time".to_string(),
            "min".to_string(),
            Some(stats.avg_departure_time),
            1,
        ),
        Tile::new(
            "temp-correlation".to_string(),
            "Temperature Correlation".to_string(),
            String::new(),
            Some(stats.temp_correlation),
            3,
        ),
    ]
}
