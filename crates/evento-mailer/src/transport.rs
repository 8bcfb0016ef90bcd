//! Transports the dispatcher pushes messages through.

use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use evento_core::OutboundEmail;

/// A single delivery attempt. Implementations report transient failures
/// through `Err`; the dispatcher decides whether to retry.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> anyhow::Result<()>;
}

/// SMTP connection settings, usually read from the environment.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

/// Real SMTP delivery via lettre.
pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    from_name: String,
}

impl SmtpTransport {
    pub fn new(config: SmtpConfig) -> anyhow::Result<Self> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.server)
            .with_context(|| format!("smtp relay {}", config.server))?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();
        Ok(Self {
            mailer,
            from_email: config.from_email,
            from_name: config.from_name,
        })
    }

    fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, email: &OutboundEmail) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from_header().parse().context("invalid from address")?)
            .to(format!("{} <{}>", email.to_name, email.to)
                .parse()
                .with_context(|| format!("invalid recipient {}", email.to))?)
            .subject(&email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .context("failed to build message")?;

        self.mailer
            .send(message)
            .await
            .with_context(|| format!("smtp send to {}", email.to))?;
        Ok(())
    }
}

/// Logs instead of sending. Used when `MOCK_EMAIL=true` so local
/// environments do not need SMTP credentials.
pub struct MockTransport;

#[async_trait]
impl MailTransport for MockTransport {
    async fn send(&self, email: &OutboundEmail) -> anyhow::Result<()> {
        tracing::info!(to = %email.to, subject = %email.subject, "mock email delivery");
        Ok(())
    }
}
