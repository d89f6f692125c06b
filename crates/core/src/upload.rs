//! Upload validation and stored-file naming.
//!
//! Uploaded photos are checked three ways before they touch the disk:
//! extension against the configured allow-list, byte size against the
//! configured maximum, and sniffed content format against the same
//! allow-list (so a renamed text file is rejected).

use crate::error::CoreError;
use crate::session::ImageKind;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default upload size cap (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default accepted upload extensions.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Filename prefix for visitor uploads.
pub const ORIGINAL_PREFIX: &str = "original";

/// Extension of every generated composite.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Length of the random suffix appended to stored filenames.
const UNIQUE_SUFFIX_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Lowercased text after the last `.` of `filename`, or `""` when absent.
pub fn file_extension(filename: Option<&str>) -> String {
    match filename {
        Some(name) => match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => String::new(),
        },
        None => String::new(),
    }
}

/// Validate the upload's extension and return it lowercased.
pub fn validate_extension(filename: Option<&str>, allowed: &[String]) -> Result<String, CoreError> {
    let ext = file_extension(filename);
    if allowed.iter().any(|a| a == &ext) {
        Ok(ext)
    } else {
        Err(CoreError::InvalidFileType {
            file_type: ext,
            allowed: allowed.to_vec(),
        })
    }
}

/// Reject uploads strictly larger than `max` bytes.
pub fn validate_size(size: u64, max: u64) -> Result<(), CoreError> {
    if size > max {
        Err(CoreError::FileTooLarge { size, max })
    } else {
        Ok(())
    }
}

/// Sniff the image format from the leading bytes and require that one of its
/// conventional extensions is on the allow-list.
pub fn validate_content(bytes: &[u8], allowed: &[String]) -> Result<(), CoreError> {
    let format = image::guess_format(bytes).map_err(|_| CoreError::InvalidFileType {
        file_type: "unrecognized".to_string(),
        allowed: allowed.to_vec(),
    })?;

    let accepted = format
        .extensions_str()
        .iter()
        .any(|ext| allowed.iter().any(|a| a == ext));

    if accepted {
        Ok(())
    } else {
        Err(CoreError::InvalidFileType {
            file_type: format
                .extensions_str()
                .first()
                .copied()
                .unwrap_or("unknown")
                .to_string(),
            allowed: allowed.to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// `{prefix}_{YYYYMMDD_HHMMSS}_{8 hex}.{ext}`
pub fn stored_file_name(prefix: &str, ext: &str, now: Timestamp) -> String {
    let unique = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{prefix}_{}_{}.{ext}",
        now.format("%Y%m%d_%H%M%S"),
        &unique[..UNIQUE_SUFFIX_LEN]
    )
}

/// Filename for a freshly generated composite of `kind`.
pub fn output_file_name(kind: ImageKind, now: Timestamp) -> String {
    stored_file_name(kind.as_str(), OUTPUT_EXTENSION, now)
}

/// Final path component of a stored path (`/` separated).
pub fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Public URL under the static `/images` mount for a generated file.
pub fn image_url(public_base_url: &str, file_name: &str) -> String {
    format!("{}/images/{file_name}", public_base_url.trim_end_matches('/'))
}
