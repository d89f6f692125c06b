//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Writes that touch both a
//! participation and its history row open their own transaction.

pub mod participation_history_repo;
pub mod participation_repo;
pub mod print_log_repo;
pub mod target_repo;

pub use participation_history_repo::ParticipationHistoryRepo;
pub use participation_repo::ParticipationRepo;
pub use print_log_repo::PrintLogRepo;
pub use target_repo::TargetRepo;
