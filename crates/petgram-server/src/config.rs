use std::path::PathBuf;

use anyhow::{Context, Result};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

/// Everything the server reads from the environment, loaded once at
/// startup. Handlers only ever see values carried in state.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    /// Public base URL baked into the mailed activation/reset links.
    pub api_url: String,
    /// Frontend origin allowed by CORS; unset means allow any origin.
    pub app_url: Option<String>,
    pub uploads_dir: PathBuf,
    pub smtp: SmtpConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        let host = env_or("PETGRAM_HOST", "0.0.0.0");
        let port: u16 = env_or("PETGRAM_PORT", "3000")
            .parse()
            .context("PETGRAM_PORT is not a valid port number")?;

        let smtp_port: u16 = env_or("PETGRAM_SMTP_PORT", "465")
            .parse()
            .context("PETGRAM_SMTP_PORT is not a valid port number")?;
        let smtp_username = env_or("PETGRAM_SMTP_USERNAME", "");
        let smtp_from = std::env::var("PETGRAM_SMTP_FROM").unwrap_or_else(|_| smtp_username.clone());

        Ok(Self {
            host,
            port,
            db_path: env_or("PETGRAM_DB_PATH", "petgram.db").into(),
            jwt_secret: std::env::var("PETGRAM_JWT_SECRET").unwrap_or_default(),
            api_url: env_or("PETGRAM_API_URL", &format!("http://localhost:{port}")),
            app_url: std::env::var("PETGRAM_APP_URL").ok(),
            uploads_dir: env_or("PETGRAM_UPLOADS_DIR", "uploads").into(),
            smtp: SmtpConfig {
                host: env_or("PETGRAM_SMTP_HOST", "smtp.gmail.com"),
                port: smtp_port,
                username: smtp_username,
                password: env_or("PETGRAM_SMTP_PASSWORD", ""),
                from: smtp_from,
            },
        })
    }
}
