// Environment-driven configuration

use anyhow::{Context, Result};
use axum::http::HeaderValue;

use evento_mailer::SmtpConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_origins: Vec<HeaderValue>,
    /// Log emails instead of sending them (MOCK_EMAIL=true)
    pub mock_email: bool,
    /// Present only when every SMTP_* variable is set
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a number")?,
            Err(_) => 8080,
        };

        let cors_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        let mock_email = std::env::var("MOCK_EMAIL")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            port,
            cors_origins,
            mock_email,
            smtp: smtp_from_env()?,
        })
    }
}

fn smtp_from_env() -> Result<Option<SmtpConfig>> {
    let Ok(server) = std::env::var("SMTP_SERVER") else {
        return Ok(None);
    };
    let port = match std::env::var("SMTP_PORT") {
        Ok(raw) => raw.parse().context("SMTP_PORT must be a number")?,
        Err(_) => 587,
    };
    Ok(Some(SmtpConfig {
        server,
        port,
        username: std::env::var("SMTP_USERNAME").unwrap_or_default(),
        password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
        from_email: std::env::var("EMAIL_FROM")
            .unwrap_or_else(|_| "noreply@evento.edu".to_string()),
        from_name: std::env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| "Evento".to_string()),
    }))
}

/// Comma-separated origin list; malformed entries are skipped
fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .filter_map(|s| s.trim().parse().ok())
        .filter(|v: &HeaderValue| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_split_and_trim() {
        let origins = parse_origins("https://app.evento.edu, https://admin.evento.edu");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "https://app.evento.edu");
    }

    #[test]
    fn empty_origin_string_yields_nothing() {
        assert!(parse_origins("").is_empty());
    }
}
