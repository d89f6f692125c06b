//! Face-fusion adapter.
//!
//! [`FaceSwapper`] swaps the face in a source photo onto a target image
//! and writes the composite to an output path. Two engines implement it:
//! [`MockEngine`] for kiosks without the model installed, and
//! [`CommandEngine`], which drives the face-fusion CLI from a single
//! worker task.

use std::path::Path;
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod mock;
pub mod runner;

pub use config::{FaceFusionConfig, FaceFusionMode};
pub use error::FaceFusionError;
pub use mock::MockEngine;
pub use runner::CommandEngine;

#[async_trait::async_trait]
pub trait FaceSwapper: Send + Sync {
    /// Produce `output` from the face in `source` and the scene in `target`.
    ///
    /// Succeeds only if `output` exists afterwards.
    async fn generate(&self, source: &Path, target: &Path, output: &Path)
        -> Result<(), FaceFusionError>;

    /// Engine name for logs and the service info endpoint.
    fn mode(&self) -> FaceFusionMode;
}

/// Build the engine selected by `config.mode`.
///
/// Real mode validates the project checkout up front and starts the
/// worker task, so it must be called from within a tokio runtime.
pub fn build(config: &FaceFusionConfig) -> Result<Arc<dyn FaceSwapper>, FaceFusionError> {
    match config.mode {
        FaceFusionMode::Mock => Ok(Arc::new(MockEngine::new(config.mock_delay))),
        FaceFusionMode::Real => Ok(Arc::new(CommandEngine::spawn(config)?)),
    }
}

/// Both inputs must exist before any engine work starts.
pub(crate) async fn ensure_inputs(source: &Path, target: &Path) -> Result<(), FaceFusionError> {
    if !tokio::fs::try_exists(source).await? {
        return Err(FaceFusionError::SourceNotFound(source.to_path_buf()));
    }
    if !tokio::fs::try_exists(target).await? {
        return Err(FaceFusionError::TargetNotFound(target.to_path_buf()));
    }
    Ok(())
}
