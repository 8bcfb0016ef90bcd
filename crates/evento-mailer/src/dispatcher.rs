//! Queue-draining dispatcher task.
//!
//! [`spawn_dispatcher`] starts a background loop that owns the transport;
//! callers keep a cheap [`MailerHandle`] that enqueues without blocking.
//! Each message gets a bounded number of delivery attempts with growing
//! delays between them, then the loop logs the loss and moves on.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use evento_core::{Outbox, OutboundEmail};

use crate::transport::MailTransport;

/// How hard the dispatcher tries before dropping a message.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    fn delay_after(&self, attempt: u32) -> Duration {
        // 1x, 2x, 4x, ...
        self.base_delay * 2u32.saturating_pow(attempt - 1)
    }
}

/// Enqueue side of the dispatcher. Clone freely; dropping every clone
/// lets the background task drain and exit.
#[derive(Clone)]
pub struct MailerHandle {
    tx: mpsc::UnboundedSender<OutboundEmail>,
}

impl Outbox for MailerHandle {
    fn deliver(&self, email: OutboundEmail) {
        if let Err(err) = self.tx.send(email) {
            tracing::error!(to = %err.0.to, "mail dispatcher is gone, dropping email");
        }
    }
}

/// Spawn the dispatcher task and return its handle.
pub fn spawn_dispatcher(transport: Arc<dyn MailTransport>, policy: RetryPolicy) -> MailerHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run(transport, policy, rx));
    MailerHandle { tx }
}

async fn run(
    transport: Arc<dyn MailTransport>,
    policy: RetryPolicy,
    mut rx: mpsc::UnboundedReceiver<OutboundEmail>,
) {
    while let Some(email) = rx.recv().await {
        send_with_retry(transport.as_ref(), &policy, &email).await;
    }
    tracing::debug!("mail dispatcher shutting down");
}

async fn send_with_retry(transport: &dyn MailTransport, policy: &RetryPolicy, email: &OutboundEmail) {
    for attempt in 1..=policy.max_attempts {
        match transport.send(email).await {
            Ok(()) => {
                tracing::info!(to = %email.to, subject = %email.subject, attempt, "email sent");
                return;
            }
            Err(err) if attempt < policy.max_attempts => {
                tracing::warn!(to = %email.to, attempt, error = %err, "email attempt failed, retrying");
                tokio::time::sleep(policy.delay_after(attempt)).await;
            }
            Err(err) => {
                tracing::error!(
                    to = %email.to,
                    subject = %email.subject,
                    attempts = policy.max_attempts,
                    error = %err,
                    "giving up on email"
                );
            }
        }
    }
}
