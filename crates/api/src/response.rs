//! Success envelope for API handlers.
//!
//! Every `/api/v1` success body is `{ "success": true, "data": ..., "message": ... }`.
//! Errors use the matching envelope built in [`crate::error`].

use axum::Json;
use serde::Serialize;

/// Standard success envelope.
///
/// # Example
///
/// ```ignore
/// Ok(ApiResponse::ok(payload, "Gender updated"))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            message: message.into(),
        })
    }
}
