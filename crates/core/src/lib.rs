//! Domain rules for the photo-booth kiosk: session vocabulary, upload
//! validation, target selection, statistics and retention.
//!
//! Nothing in this crate touches the database or the filesystem.

pub mod error;
pub mod retention;
pub mod selection;
pub mod session;
pub mod statistics;
pub mod types;
pub mod upload;
