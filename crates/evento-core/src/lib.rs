// Core abstractions for the Evento backend
//
// This crate is storage- and transport-agnostic. The registration engine
// talks to its collaborators (persistence, pub/sub fan-out, outbound email,
// clock) through the traits in `traits`, with in-memory implementations in
// `memory` for tests and examples.

pub mod domain;
pub mod email;
pub mod engine;
pub mod error;
pub mod memory;
pub mod notice;
pub mod traits;

pub use domain::{AttendanceRecord, EventRecord, EventStatus, FeedbackEntry, StudentRecord};
pub use email::OutboundEmail;
pub use engine::{RegistrationEngine, RegisterOutcome, UnregisterOutcome};
pub use error::{Conflict, EventoError, Result};
pub use notice::{Notice, Topic};
pub use traits::{
    AttendanceStore, Clock, EventStore, Notifier, Outbox, SaveOutcome, StudentStore, SystemClock,
};
