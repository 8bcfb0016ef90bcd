// Public API contracts for Evento
// DTOs and request/response types for the HTTP surface; internal row models
// live in evento-storage and may differ.

pub mod attendance;
pub mod common;
pub mod coordinator;
pub mod event;
pub mod notification;
pub mod registration;
pub mod stats;
pub mod student;

pub use attendance::*;
pub use common::*;
pub use coordinator::*;
pub use event::*;
pub use notification::*;
pub use registration::*;
pub use stats::*;
pub use student::*;
