use kiosk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `print_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PrintLog {
    pub id: DbId,
    pub participation_id: DbId,
    pub image_type: String,
    pub printed_at: Timestamp,
}
