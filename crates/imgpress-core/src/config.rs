//! Configuration module
//!
//! Environment-driven configuration for the imgpress service. Every knob has
//! a default so a bare `cargo run` starts a working instance against a local
//! SQLite file; `JWT_SECRET` is the one required variable.

use std::env;

const SERVER_PORT: u16 = 5000;
const MAX_BODY_MB: usize = 16;
const JPEG_QUALITY: u8 = 90;
const JWT_EXPIRY_HOURS: i64 = 24;
const HISTORY_DEFAULT_LIMIT: i64 = 50;
const HISTORY_MAX_LIMIT: i64 = 100;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub storage_path: String,
    /// Total request body cap applied by the HTTP layer.
    pub max_body_bytes: usize,
    /// Quality passed to the JPEG encoder on the batch path.
    pub jpeg_quality: u8,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub history_default_limit: i64,
    pub history_max_limit: i64,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let max_body_mb = env::var("MAX_BODY_MB")
            .unwrap_or_else(|_| MAX_BODY_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_BODY_MB);

        Ok(Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:imgpress.db?mode=rwc".to_string()),
            storage_path: env::var("STORAGE_PATH").unwrap_or_else(|_| "data".to_string()),
            max_body_bytes: max_body_mb * 1024 * 1024,
            jpeg_quality: env::var("JPEG_QUALITY")
                .unwrap_or_else(|_| JPEG_QUALITY.to_string())
                .parse()
                .unwrap_or(JPEG_QUALITY),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| JWT_EXPIRY_HOURS.to_string())
                .parse()
                .unwrap_or(JWT_EXPIRY_HOURS),
            history_default_limit: env::var("HISTORY_DEFAULT_LIMIT")
                .unwrap_or_else(|_| HISTORY_DEFAULT_LIMIT.to_string())
                .parse()
                .unwrap_or(HISTORY_DEFAULT_LIMIT),
            history_max_limit: HISTORY_MAX_LIMIT,
            environment,
        })
    }
}
