//! Development-mode error detail.
//!
//! 5xx responses built from [`AppError`](crate::error::AppError) carry the
//! underlying error text as an [`ErrorDetail`] extension. In `development`
//! this middleware copies it into the envelope's `details.error`; in every
//! other environment the extension is dropped unseen.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ErrorDetail;
use crate::state::AppState;

/// Upper bound on an error body we are willing to re-read.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

pub async fn expose_error_detail(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !state.config.is_development() {
        return response;
    }
    let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Could not re-read error body");
            return parts.status.into_response();
        }
    };

    let body = match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(mut json) => {
            if let Some(details) = json.get_mut("details").and_then(|d| d.as_object_mut()) {
                details.insert("error".to_string(), serde_json::Value::String(detail));
            }
            serde_json::to_vec(&json).unwrap_or_else(|_| bytes.to_vec())
        }
        Err(_) => bytes.to_vec(),
    };

    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(body))
}
