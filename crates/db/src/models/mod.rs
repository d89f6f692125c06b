//! Row models.
//!
//! Each submodule holds a `FromRow` + `Serialize` struct matching a table
//! row. Gender and image kind are stored as lowercase text and exposed
//! through typed accessors.

pub mod participation;
pub mod participation_history;
pub mod print_log;
pub mod target;
