//! Configuration management
//!
//! This module handles loading configuration from environment variables,
//! with per-variable defaults suitable for development and guard rails for
//! production.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Remote record store / object storage endpoint
    pub gateway: GatewayConfig,
    /// File storage conventions
    pub storage: StorageConfig,
    /// Invitation email delivery
    pub email: EmailSettings,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
}

/// Remote backend endpoint and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the hosted backend
    pub base_url: String,
    /// API key sent with every request
    pub api_key: String,
}

/// File storage conventions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket holding user files
    pub bucket: String,
    /// Validity window for download links, in seconds
    pub signed_url_ttl_secs: u64,
    /// Whether an admin upload must target an existing user. Off by
    /// default: the upload form accepts any namespace.
    pub verify_upload_target: bool,
}

/// SMTP settings for invitation email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSettings {
    /// SMTP relay host; empty puts the email service in no-op mode
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    /// From mailbox, e.g. "FitClub <noreply@fitclub.example>"
    pub smtp_from: String,
    pub use_starttls: bool,
    /// Base URL used to build the login link in invitation emails
    pub login_base_url: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = env_or("APP_ENV", "development");

        let api_key = env_or("GATEWAY_API_KEY", "");
        if app_env.eq_ignore_ascii_case("production") && api_key.trim().is_empty() {
            return Err("GATEWAY_API_KEY must be set in production".to_string());
        }

        Ok(Config {
            app: AppConfig { env: app_env },
            gateway: GatewayConfig {
                base_url: env_or("GATEWAY_BASE_URL", "http://localhost:54321"),
                api_key,
            },
            storage: StorageConfig {
                bucket: env_or("STORAGE_BUCKET", "files"),
                signed_url_ttl_secs: env_parse_or("SIGNED_URL_TTL_SECS", 60),
                verify_upload_target: env_parse_or("VERIFY_UPLOAD_TARGET", false),
            },
            email: EmailSettings {
                smtp_host: env_or("SMTP_HOST", ""),
                smtp_port: env_parse_or("SMTP_PORT", 587),
                smtp_username: std::env::var("SMTP_USERNAME").ok(),
                smtp_password: std::env::var("SMTP_PASSWORD").ok(),
                smtp_from: env_or("SMTP_FROM", "FitClub <noreply@fitclub.example>"),
                use_starttls: env_parse_or("SMTP_STARTTLS", true),
                login_base_url: env_or("LOGIN_BASE_URL", "http://localhost:3000"),
            },
        })
    }
}
