// Trap light control

use std::sync::Arc;

use crate::application::source::{ObservationSource, SourceError};
use crate::domain::observation::LightMode;

/// Drives the trap light endpoints. Stateless: feedback and any reload of
/// affected widgets belong to the caller.
#[derive(Clone)]
pub struct LightSwitch {
    source: Arc<dyn ObservationSource>,
}

impl LightSwitch {
    pub fn new(source: Arc<dyn ObservationSource>) -> Self {
        Self { source }
    }

    /// Returns the service's acknowledgement message.
    pub async fn switch(&self, mode: LightMode) -> Result<String, SourceError> {
        let message = self.source.set_light(mode).await?;
        tracing::info!("trap light set to {}", mode.as_path_segment());
        Ok(message)
    }
}
