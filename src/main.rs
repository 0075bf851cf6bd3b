// Main entry point - Dependency injection and snapshot run
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use crate::application::departures::DepartureView;
use crate::application::lights::LightSwitch;
use crate::application::widget::Phase;
use crate::domain::metric::Metric;
use crate::domain::observation::LightMode;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::rest_source::RestObservationSource;
use crate::presentation::json_lines::JsonLinesTarget;
use crate::presentation::page::DashboardPage;
use crate::presentation::render::RenderTarget;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create observation source (infrastructure layer)
    let source = Arc::new(RestObservationSource::new(&config.api)?);

    // `mothtrap-dashboard lights <warm|off>` drives the trap light instead
    // of rendering the page.
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(command) = args.first() {
        if command == "lights" {
            let mode = args
                .get(1)
                .and_then(|raw| LightMode::parse(raw))
                .ok_or_else(|| anyhow::anyhow!("usage: mothtrap-dashboard lights <warm|off>"))?;
            let message = LightSwitch::new(source).switch(mode).await?;
            println!("{message}");
            return Ok(());
        }
        anyhow::bail!("unknown command {command:?}");
    }

    // Build the page (presentation layer)
    println!(
        "Rendering moth-trap dashboard snapshot from {}",
        config.api.base_url
    );
    let mut page = DashboardPage::new(source, |widget: &str| -> Box<dyn RenderTarget> {
        Box::new(JsonLinesTarget::stdout(widget))
    });

    // A static snapshot wants every overlay, not the interactive default;
    // flipping them before the first load draws the full chart once.
    page.night_activity.set_metric_visible(Metric::Temperature, true);
    page.night_activity.set_metric_visible(Metric::Humidity, true);
    page.night_activity.set_metric_visible(Metric::CloudCover, true);

    page.init().await;

    // Emit the second departure projection; the cached study is reused.
    page.departures.set_view(DepartureView::Temperature);

    let mut failures = Vec::new();
    let settled = [
        ("weather-trends", page.weather_trends.state().phase()),
        ("latest-conditions", page.latest_conditions.state().phase()),
        ("night-activity", page.night_activity.state().phase()),
        ("night-tally", page.night_tally.state().phase()),
        ("departures", page.departures.state().phase()),
    ];
    for (widget, phase) in settled {
        tracing::info!("{} settled in {:?}", widget, phase);
        if phase == Phase::Error {
            failures.push(widget);
        }
    }
    if !failures.is_empty() {
        anyhow::bail!("widgets failed to load: {}", failures.join(", "));
    }

    Ok(())
}
