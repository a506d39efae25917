use anyhow::{bail, Context, Result};

use crate::models::user::Role;

const DEFAULT_ML_SERVICE_URL: &str = "http://localhost:8000";
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub ml_service_url: String,
    pub default_role: Role,
    /// Email allowed to self-register as admin.
    pub bootstrap_admin_email: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            token_ttl_hours: parse_token_ttl(
                &std::env::var("TOKEN_TTL_HOURS").unwrap_or_else(|_| "24".to_string()),
            )?,
            ml_service_url: std::env::var("ML_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_ML_SERVICE_URL.to_string()),
            default_role: std::env::var("DEFAULT_ROLE")
                .unwrap_or_else(|_| "student".to_string())
                .parse::<Role>()
                .context("DEFAULT_ROLE must be 'student' or 'admin'")?,
            bootstrap_admin_email: std::env::var("BOOTSTRAP_ADMIN_EMAIL")
                .ok()
                .map(|email| email.trim().to_string())
                .filter(|email| !email.is_empty()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_token_ttl(raw: &str) -> Result<i64> {
    let hours = raw
        .trim()
        .parse::<i64>()
        .context("TOKEN_TTL_HOURS must be a whole number of hours")?;
    if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        bail!("TOKEN_TTL_HOURS must be between 1 and {MAX_TOKEN_TTL_HOURS}, got {hours}");
    }
    Ok(hours)
}
