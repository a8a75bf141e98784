use anyhow::{Context, Result};

/// SMTP settings for inquiry notifications. Absent when mail is disabled.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub from_address: String,
    pub notify_address: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound applied to the `limit` query parameter on listings.
    pub max_page_size: i64,
    /// Allowed CORS origins. Empty means permissive (development default).
    pub cors_allowed_origins: Vec<String>,
    pub mail: Option<MailConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_page_size: std::env::var("MAX_PAGE_SIZE")
                .unwrap_or_else(|_| "100".to_string())
                .parse::<i64>()
                .context("MAX_PAGE_SIZE must be a positive integer")?,
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            mail: mail_from_env()?,
        })
    }
}

/// Mail is optional: configured only when SMTP_HOST is set.
fn mail_from_env() -> Result<Option<MailConfig>> {
    let Ok(smtp_host) = std::env::var("SMTP_HOST") else {
        return Ok(None);
    };

    Ok(Some(MailConfig {
        smtp_host,
        smtp_port: std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .context("SMTP_PORT must be a valid port number")?,
        smtp_user: require_env("SMTP_USER")?,
        smtp_pass: require_env("SMTP_PASS")?,
        from_address: require_env("MAIL_FROM")?,
        notify_address: require_env("MAIL_TO")?,
    }))
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
