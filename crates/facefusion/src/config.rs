use std::path::PathBuf;
use std::time::Duration;

use crate::error::FaceFusionError;

/// Artificial processing time of the mock engine.
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(3500);

/// Which engine backs generation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceFusionMode {
    /// Copy the target image to the output after a delay.
    Mock,
    /// Run the face-fusion CLI as a child process.
    Real,
}

impl FaceFusionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Real => "real",
        }
    }

    pub fn parse(value: &str) -> Result<Self, FaceFusionError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "real" => Ok(Self::Real),
            _ => Err(FaceFusionError::InvalidMode(value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FaceFusionConfig {
    pub mode: FaceFusionMode,
    /// Checkout of the face-fusion project; must contain `facefusion.py`.
    pub project_path: PathBuf,
    /// Interpreter used to launch the entrypoint.
    pub python: String,
    pub face_swapper_model: String,
    pub execution_providers: Vec<String>,
    pub mock_delay: Duration,
}

impl Default for FaceFusionConfig {
    fn default() -> Self {
        Self {
            mode: FaceFusionMode::Mock,
            project_path: PathBuf::from("../facefusion"),
            python: "python3".to_string(),
            face_swapper_model: "inswapper_128".to_string(),
            execution_providers: vec!["cpu".to_string()],
            mock_delay: DEFAULT_MOCK_DELAY,
        }
    }
}
