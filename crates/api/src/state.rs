use std::sync::Arc;

use kiosk_facefusion::FaceSwapper;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: kiosk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Face-fusion engine selected at startup.
    pub face_swapper: Arc<dyn FaceSwapper>,
}
