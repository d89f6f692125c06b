use serde_json::{json, Value};

use crate::session::{Gender, ImageKind};

/// Domain errors raised by the session, generation, print and tracking flows.
///
/// Every variant renders a human-readable message through `Display` and a
/// structured payload through [`CoreError::details`]; the HTTP layer decides
/// status codes.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Consent must be agreed before starting a session")]
    ConsentRequired,

    #[error("Invalid gender value: '{0}'. Must be 'male' or 'female'")]
    InvalidGender(String),

    #[error("Invalid image_type: '{0}'. Must be 'profile' or 'talent'")]
    InvalidImageKind(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{} image not found or not yet generated", .0.title())]
    ImageNotGenerated(ImageKind),

    #[error("No {kind} targets found for gender: {gender}")]
    NoTargets { kind: ImageKind, gender: Gender },

    #[error("Image generation failed: {0}")]
    GenerationFailed(String),

    #[error("Invalid file type: '{file_type}'. Allowed types: {}", .allowed.join(", "))]
    InvalidFileType {
        file_type: String,
        allowed: Vec<String>,
    },

    #[error("File size ({size} bytes) exceeds maximum allowed size ({max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("File upload failed: {0}")]
    FileUpload(String),
}

impl CoreError {
    /// Shorthand for a missing participation looked up by id or download UUID.
    pub fn session_not_found(key: impl ToString) -> Self {
        Self::NotFound {
            entity: "Session",
            key: key.to_string(),
        }
    }

    /// Structured context for the error envelope's `details` field.
    pub fn details(&self) -> Value {
        match self {
            Self::NotFound { entity, key } => json!({ "entity": entity, "key": key }),
            Self::ConsentRequired => json!({ "consent_agreed": false }),
            Self::InvalidGender(gender) => json!({
                "gender": gender,
                "allowed_values": Gender::ALL.map(Gender::as_str),
            }),
            Self::InvalidImageKind(image_type) => json!({
                "image_type": image_type,
                "allowed_values": ImageKind::ALL.map(ImageKind::as_str),
            }),
            Self::Validation(_) => json!({}),
            Self::ImageNotGenerated(kind) => json!({ "image_type": kind.as_str() }),
            Self::NoTargets { kind, gender } => json!({
                "kind": kind.as_str(),
                "gender": gender.as_str(),
            }),
            Self::GenerationFailed(reason) | Self::FileUpload(reason) => {
                json!({ "reason": reason })
            }
            Self::InvalidFileType { file_type, allowed } => json!({
                "file_type": file_type,
                "allowed_types": allowed,
            }),
            Self::FileTooLarge { size, max } => json!({
                "file_size": size,
                "max_size": max,
            }),
        }
    }
}
