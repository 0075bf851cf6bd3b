// Render target trait for the charting collaborator

use thiserror::Error;

use crate::domain::chart::{ChartDescriptor, Tile};

/// Raised when the rendering collaborator rejects a draw call. Widgets log
/// the failure and keep their cached data; only fetch and validation
/// failures move a widget into its error state.
#[derive(Debug, Error)]
#[error("render failure: {0}")]
pub struct RenderError(pub String);

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError(e.to_string())
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        RenderError(e.to_string())
    }
}

/// One drawing surface owned by one widget, mirroring the page's
/// one-container-per-widget layout.
pub trait RenderTarget: Send {
    /// Loading placeholder shown while fetches are in flight. Best effort.
    fn show_loading(&mut self);

    /// Error card with the host's retry affordance. Best effort.
    fn show_error(&mut self, message: &str);

    fn render_chart(&mut self, chart: &ChartDescriptor) -> Result<(), RenderError>;

    fn render_tiles(&mut self, tiles: &[Tile]) -> Result<(), RenderError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records one line per render call so tests can assert on the exact
    /// sequence a widget produced.
    pub struct CapturingTarget {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl CapturingTarget {
        pub fn new() -> (CapturingTarget, Arc<Mutex<Vec<String>>>) {
            let events = Arc::new(Mutex::new(Vec::new()));
            let target = CapturingTarget {
                events: events.clone(),
            };
            (target, events)
        }

        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl RenderTarget for CapturingTarget {
        fn show_loading(&mut self) {
            self.push("loading".to_string());
        }

        fn show_error(&mut self, message: &str) {
            self.push(format!("error: {message}"));
        }

        fn render_chart(&mut self, chart: &ChartDescriptor) -> Result<(), RenderError> {
            self.push(format!("chart: {} series", chart.series.len()));
            Ok(())
        }

        fn render_tiles(&mut self, tiles: &[Tile]) -> Result<(), RenderError> {
            self.push(format!("tiles: {}", tiles.len()));
            Ok(())
        }
    }
}
