//! Outbound email delivery.
//!
//! Engine code hands [`evento_core::OutboundEmail`] values to an
//! [`evento_core::Outbox`] and moves on; this crate owns the slow part.
//! A dispatcher task drains a queue and pushes each message through a
//! [`MailTransport`], retrying transient failures a bounded number of
//! times before giving up and logging the loss.

mod dispatcher;
mod transport;

pub use dispatcher::{spawn_dispatcher, MailerHandle, RetryPolicy};
pub use transport::{MailTransport, MockTransport, SmtpConfig, SmtpTransport};
