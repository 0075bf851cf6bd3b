// JSON-lines render target for the snapshot binary

use std::io::{self, Write};

use crate::domain::chart::{ChartDescriptor, Tile};
use crate::presentation::render::{RenderError, RenderTarget};

/// Writes one JSON object per render event, tagged with the owning widget,
/// so a charting host can replay the stream in order.
pub struct JsonLinesTarget<W: Write + Send> {
    widget: String,
    out: W,
}

impl JsonLinesTarget<io::Stdout> {
    pub fn stdout(widget: &str) -> Self {
        Self::new(widget, io::stdout())
    }
}

impl<W: Write + Send> JsonLinesTarget<W> {
    pub fn new(widget: &str, out: W) -> Self {
        Self {
            widget: widget.to_string(),
            out,
        }
    }

    fn emit(&mut self, event: &str, payload: Option<serde_json::Value>) -> Result<(), RenderError> {
        let line = serde_json::json!({
            "widget": self.widget,
            "event": event,
            "payload": payload,
        });
        writeln!(self.out, "{line}")?;
        Ok(())
    }
}

impl<W: Write + Send> RenderTarget for JsonLinesTarget<W> {
    fn show_loading(&mut self) {
        if let Err(e) = self.emit("loading", None) {
            tracing::error!("{} loading event lost: {}", self.widget, e);
        }
    }

    fn show_error(&mut self, message: &str) {
        let payload = serde_json::Value::String(message.to_string());
        if let Err(e) = self.emit("error", Some(payload)) {
            tracing::error!("{} error event lost: {}", self.widget, e);
        }
    }

    fn render_chart(&mut self, chart: &ChartDescriptor) -> Result<(), RenderError> {
        self.emit("chart", Some(serde_json::to_value(chart)?))
    }

    fn render_tiles(&mut self, tiles: &[Tile]) -> Result<(), RenderError> {
        self.emit("tiles", Some(serde_json::to_value(tiles)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::chart::Tile;

    use super::*;

    #[test]
    fn test_each_event_is_one_tagged_json_line() {
        let mut target = JsonLinesTarget::new("night-tally", Vec::new());

        target.show_loading();
        target
            .render_tiles(&[Tile::new(
                "dawn-total".to_string(),
                "Dawn Total".to_string(),
                "moths".to_string(),
                Some(6.0),
                0,
            )])
            .unwrap();

        let written = String::from_utf8(target.out).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["widget"], "night-tally");
        assert_eq!(first["event"], "loading");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "tiles");
        assert_eq!(second["payload"][0]["id"], "dawn-total");
    }

    #[test]
    fn test_error_events_carry_the_message() {
        let mut target = JsonLinesTarget::new("departures", Vec::new());

        target.show_error("network failure: connection refused");

        let written = String::from_utf8(target.out).unwrap();
        let line: serde_json::Value = serde_json::from_str(written.trim()).unwrap();
        assert_eq!(line["payload"], "network failure: connection refused");
    }
}
