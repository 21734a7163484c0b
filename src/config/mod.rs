use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub billing: BillingConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// Billing engine knobs
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Days between an invoice's create date and its due date
    pub invoice_due_days: i64,
    /// Seconds between penalty sweep runs
    pub penalty_sweep_interval_secs: u64,
    /// Fixed UTC offset (hours) the property's billing day runs on
    pub timezone_offset_hours: i32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            billing: BillingConfig {
                invoice_due_days: env::var("INVOICE_DUE_DAYS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .map_err(|_| AppError::Configuration("Invalid INVOICE_DUE_DAYS".to_string()))?,
                penalty_sweep_interval_secs: env::var("PENALTY_SWEEP_INTERVAL_SECS")
                    .unwrap_or_else(|_| "3600".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid PENALTY_SWEEP_INTERVAL_SECS".to_string())
                    })?,
                timezone_offset_hours: env::var("BILLING_TIMEZONE_OFFSET_HOURS")
                    .unwrap_or_else(|_| "7".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration(
                            "Invalid BILLING_TIMEZONE_OFFSET_HOURS".to_string(),
                        )
                    })?,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.billing.invoice_due_days <= 0 {
            return Err(AppError::Configuration(
                "Invoice due days must be greater than 0".to_string(),
            ));
        }

        if self.billing.penalty_sweep_interval_secs == 0 {
            return Err(AppError::Configuration(
                "Penalty sweep interval must be greater than 0".to_string(),
            ));
        }

        if !(-12..=14).contains(&self.billing.timezone_offset_hours) {
            return Err(AppError::Configuration(
                "Billing timezone offset must be between -12 and +14 hours".to_string(),
            ));
        }

        Ok(())
    }
}
