use std::path::Path;
use std::time::Duration;

use crate::config::FaceFusionMode;
use crate::error::FaceFusionError;
use crate::{ensure_inputs, FaceSwapper};

/// Stand-in engine: waits `delay`, then copies the target image to the
/// output path. Requests run concurrently.
#[derive(Debug, Clone)]
pub struct MockEngine {
    delay: Duration,
}

impl MockEngine {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait::async_trait]
impl FaceSwapper for MockEngine {
    async fn generate(
        &self,
        source: &Path,
        target: &Path,
        output: &Path,
    ) -> Result<(), FaceFusionError> {
        ensure_inputs(source, target).await?;

        tracing::debug!(delay_ms = self.delay.as_millis() as u64, "Simulating face fusion");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(target, output).await?;

        tracing::info!(output = %output.display(), "Mock face fusion complete");
        Ok(())
    }

    fn mode(&self) -> FaceFusionMode {
        FaceFusionMode::Mock
    }
}
