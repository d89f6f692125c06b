//! Command-line face-fusion engine.
//!
//! The engine is validated once when spawned (project directory and
//! entrypoint must exist), then a single worker task owns it and serves
//! requests from a bounded channel. At most one face-fusion process runs
//! at a time per server. No timeout is applied to a run.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};

use crate::config::{FaceFusionConfig, FaceFusionMode};
use crate::error::FaceFusionError;
use crate::{ensure_inputs, FaceSwapper};

/// Script inside the project checkout that runs the CLI.
pub const ENTRYPOINT: &str = "facefusion.py";

/// Pending requests allowed to queue behind the running one.
const QUEUE_DEPTH: usize = 16;

/// Maximum stderr captured for an error message (64 KiB).
const MAX_STDERR_BYTES: u64 = 64 * 1024;

struct Job {
    source: PathBuf,
    target: PathBuf,
    output: PathBuf,
    reply: oneshot::Sender<Result<(), FaceFusionError>>,
}

/// Everything needed to build a face-fusion invocation.
#[derive(Debug, Clone)]
struct Invocation {
    python: String,
    entrypoint: PathBuf,
    project_path: PathBuf,
    face_swapper_model: String,
    execution_providers: Vec<String>,
}

impl Invocation {
    fn args(&self, source: &Path, target: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            self.entrypoint.clone().into(),
            "headless-run".into(),
            "--processors".into(),
            "face_swapper".into(),
            "--face-swapper-model".into(),
            self.face_swapper_model.clone().into(),
            "--execution-providers".into(),
        ];
        args.extend(self.execution_providers.iter().map(OsString::from));
        args.extend([
            "-s".into(),
            source.as_os_str().to_owned(),
            "-t".into(),
            target.as_os_str().to_owned(),
            "-o".into(),
            output.as_os_str().to_owned(),
        ]);
        args
    }

    async fn run(&self, source: &Path, target: &Path, output: &Path) -> Result<(), FaceFusionError> {
        // The child runs inside the project checkout, so relative paths
        // must be resolved against our own working directory first.
        let source = &absolute(source)?;
        let target = &absolute(target)?;
        let output = &absolute(output)?;
        ensure_inputs(source, target).await?;

        let mut cmd = Command::new(&self.python);
        cmd.args(self.args(source, target, output))
            .current_dir(&self.project_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(FaceFusionError::Spawn)?;

        let stderr_task = tokio::spawn(read_capped(child.stderr.take()));
        let status = child.wait().await?;
        let stderr = stderr_task.await.unwrap_or_default();

        let duration_ms = start.elapsed().as_millis() as u64;
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
            tracing::warn!(code = status.code(), duration_ms, %stderr, "FaceFusion run failed");
            return Err(FaceFusionError::EngineFailed {
                code: status.code().unwrap_or(-1),
                stderr,
            });
        }

        if !tokio::fs::try_exists(output).await? {
            return Err(FaceFusionError::OutputMissing(output.to_path_buf()));
        }

        tracing::info!(output = %output.display(), duration_ms, "FaceFusion run complete");
        Ok(())
    }
}

/// Resolve `path` against the server's working directory.
fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Read a stream to the end, keeping at most [`MAX_STDERR_BYTES`].
async fn read_capped<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h).take(MAX_STDERR_BYTES).read_to_end(&mut buf).await;
    }
    buf
}

/// Clone-safe handle to the face-fusion worker task.
#[derive(Clone)]
pub struct CommandEngine {
    tx: mpsc::Sender<Job>,
}

impl CommandEngine {
    /// Validate the project checkout and start the worker task.
    ///
    /// Fails fast if the project directory or its entrypoint is missing.
    pub fn spawn(config: &FaceFusionConfig) -> Result<Self, FaceFusionError> {
        if !config.project_path.is_dir() {
            return Err(FaceFusionError::ProjectNotFound(config.project_path.clone()));
        }
        let entrypoint = config.project_path.join(ENTRYPOINT);
        if !entrypoint.is_file() {
            return Err(FaceFusionError::EntrypointNotFound(entrypoint));
        }

        let invocation = Invocation {
            python: config.python.clone(),
            entrypoint,
            project_path: config.project_path.clone(),
            face_swapper_model: config.face_swapper_model.clone(),
            execution_providers: config.execution_providers.clone(),
        };
        tracing::info!(
            project = %invocation.project_path.display(),
            model = %invocation.face_swapper_model,
            providers = ?invocation.execution_providers,
            "FaceFusion engine ready"
        );

        let (tx, mut rx) = mpsc::channel::<Job>(QUEUE_DEPTH);
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let result = invocation.run(&job.source, &job.target, &job.output).await;
                let _ = job.reply.send(result);
            }
            tracing::info!("FaceFusion worker exiting");
        });

        Ok(Self { tx })
    }
}

#[async_trait::async_trait]
impl FaceSwapper for CommandEngine {
    async fn generate(
        &self,
        source: &Path,
        target: &Path,
        output: &Path,
    ) -> Result<(), FaceFusionError> {
        let (reply, reply_rx) = oneshot::channel();
        self.tx
            .send(Job {
                source: source.to_path_buf(),
                target: target.to_path_buf(),
                output: output.to_path_buf(),
                reply,
            })
            .await
            .map_err(|_| FaceFusionError::WorkerClosed)?;
        reply_rx.await.map_err(|_| FaceFusionError::WorkerClosed)?
    }

    fn mode(&self) -> FaceFusionMode {
        FaceFusionMode::Real
    }
}
