pub mod catalog;
pub mod dashboard;
pub mod generation;
pub mod print;
pub mod session;
pub mod tracking;
