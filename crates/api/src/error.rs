use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kiosk_core::error::CoreError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the error envelope
/// `{ "success": false, "message", "code", "details" }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `kiosk_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A malformed request (bad JSON, bad path segment, missing field).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Internal error text attached to 5xx responses as an extension.
///
/// Only surfaced to clients by the development-mode error detail middleware.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut internal: Option<String> = None;

        let (status, code, message, details) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => {
                let details = core.details();
                match core {
                    CoreError::NotFound { entity, .. } => {
                        let code = if *entity == "Session" {
                            "SESSION_NOT_FOUND"
                        } else {
                            "NOT_FOUND"
                        };
                        (StatusCode::NOT_FOUND, code, core.to_string(), details)
                    }
                    CoreError::ConsentRequired => (
                        StatusCode::BAD_REQUEST,
                        "CONSENT_REQUIRED",
                        core.to_string(),
                        details,
                    ),
                    CoreError::InvalidGender(_) => (
                        StatusCode::BAD_REQUEST,
                        "INVALID_GENDER",
                        core.to_string(),
                        details,
                    ),
                    CoreError::InvalidImageKind(_) => (
                        StatusCode::BAD_REQUEST,
                        "INVALID_IMAGE_TYPE",
                        core.to_string(),
                        details,
                    ),
                    CoreError::Validation(msg) => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), details)
                    }
                    CoreError::ImageNotGenerated(_) => (
                        StatusCode::NOT_FOUND,
                        "IMAGE_NOT_FOUND",
                        core.to_string(),
                        details,
                    ),
                    CoreError::NoTargets { .. } => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "TARGET_NOT_FOUND",
                        core.to_string(),
                        details,
                    ),
                    CoreError::GenerationFailed(reason) => {
                        tracing::error!(%reason, "Image generation failed");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "GENERATION_FAILED",
                            core.to_string(),
                            details,
                        )
                    }
                    CoreError::InvalidFileType { .. } => (
                        StatusCode::UNSUPPORTED_MEDIA_TYPE,
                        "INVALID_FILE_TYPE",
                        core.to_string(),
                        details,
                    ),
                    CoreError::FileTooLarge { .. } => (
                        StatusCode::PAYLOAD_TOO_LARGE,
                        "FILE_TOO_LARGE",
                        core.to_string(),
                        details,
                    ),
                    CoreError::FileUpload(reason) => {
                        tracing::error!(%reason, "File upload failed");
                        internal = Some(reason.clone());
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "FILE_UPLOAD_FAILED",
                            "File upload failed".to_string(),
                            json!({}),
                        )
                    }
                }
            }

            // --- Database errors ---
            AppError::Database(err) => {
                let (status, code, message) = classify_sqlx_error(err);
                if status.is_server_error() {
                    internal = Some(err.to_string());
                }
                (status, code, message, json!({}))
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), json!({}))
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal = Some(msg.clone());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                    json!({}),
                )
            }
        };

        let mut response = (status, axum::Json(error_body(&message, code, details))).into_response();
        if let Some(detail) = internal {
            response.extensions_mut().insert(ErrorDetail(detail));
        }
        response
    }
}

/// The error envelope shared by [`AppError`] and the extractor rejections.
pub fn error_body(message: &str, code: &str, details: Value) -> Value {
    json!({
        "success": false,
        "message": message,
        "code": code,
        "details": details,
    })
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Foreign key violations (the parent row vanished mid-request) map to 404.
/// - Unique constraint violations map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.is_foreign_key_violation() {
                return (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "Referenced resource not found".to_string(),
                );
            }
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                );
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}
