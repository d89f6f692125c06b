use std::path::PathBuf;

/// Failures raised while validating or running the face-fusion engine.
#[derive(Debug, thiserror::Error)]
pub enum FaceFusionError {
    #[error("Source image not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Target image not found: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error("FaceFusion project directory not found: {}", .0.display())]
    ProjectNotFound(PathBuf),

    #[error("FaceFusion entrypoint not found: {}", .0.display())]
    EntrypointNotFound(PathBuf),

    #[error("Unknown FaceFusion mode '{0}'. Must be 'mock' or 'real'")]
    InvalidMode(String),

    #[error("Failed to launch FaceFusion: {0}")]
    Spawn(std::io::Error),

    #[error("FaceFusion exited with code {code}: {stderr}")]
    EngineFailed { code: i32, stderr: String },

    #[error("FaceFusion reported success but produced no output at {}", .0.display())]
    OutputMissing(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("FaceFusion worker is not running")]
    WorkerClosed,
}
