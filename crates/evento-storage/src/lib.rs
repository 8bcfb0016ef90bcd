// Postgres storage layer with sqlx
//
// This crate provides database implementations for core traits:
// - DbEventStore / DbStudentStore / DbAttendanceStore back the
//   registration engine with version-checked event saves

pub mod models;
pub mod repositories;
pub mod stores;

pub use models::*;
pub use repositories::Database;
pub use stores::{DbAttendanceStore, DbEventStore, DbStudentStore};
