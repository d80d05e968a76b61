//! Runtime configuration, parsed from CLI flags with environment fallbacks.

use crate::error::DatagenError;
use crate::retry::RetryPolicy;
use clap::{Parser, ValueEnum};
use std::time::Duration;

/// Entity categories that can be enabled independently.
///
/// This is a closed set: category names coming from configuration are parsed
/// into this enum, so nothing outside it can ever reach DDL or gating logic.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// Customer rows
    #[value(name = "customers")]
    Customers,
    /// Product rows
    #[value(name = "products")]
    Products,
    /// Order and order-item rows
    #[value(name = "orders")]
    Orders,
}

/// Generator configuration.
#[derive(Parser, Clone, Debug)]
#[command(name = "pg-datagen")]
#[command(about = "Continuously inserts randomized e-commerce rows into PostgreSQL")]
pub struct Config {
    /// PostgreSQL host
    #[arg(long, default_value = "localhost", env = "POSTGRES_HOST")]
    pub host: String,

    /// PostgreSQL port
    #[arg(long, default_value = "5432", env = "POSTGRES_PORT")]
    pub port: u16,

    /// PostgreSQL user
    #[arg(long, default_value = "postgres", env = "POSTGRES_USER")]
    pub user: String,

    /// PostgreSQL password
    #[arg(long, default_value = "postgres", env = "POSTGRES_PASSWORD")]
    pub password: String,

    /// Target database to bootstrap and populate
    #[arg(long, default_value = "inventory", env = "POSTGRES_DB")]
    pub database: String,

    /// Administrative database used to create the target database
    #[arg(long, default_value = "postgres", env = "POSTGRES_ADMIN_DB")]
    pub admin_database: String,

    /// Entity categories to generate (comma-separated)
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_value = "customers,orders,products",
        env = "TABLE_CATEGORIES"
    )]
    pub categories: Vec<Category>,

    /// Minimum pause between generator iterations, in seconds
    #[arg(long, default_value = "1", env = "INSERT_INTERVAL_MIN_SECS")]
    pub insert_interval_min_secs: u64,

    /// Maximum pause between generator iterations, in seconds
    #[arg(long, default_value = "5", env = "INSERT_INTERVAL_MAX_SECS")]
    pub insert_interval_max_secs: u64,

    /// Maximum attempts for retried operations
    #[arg(long, default_value = "5", env = "MAX_RETRIES")]
    pub max_retries: u32,

    /// Base delay between retry attempts, in seconds (doubles per attempt)
    #[arg(long, default_value = "5", env = "RETRY_BASE_DELAY_SECS")]
    pub retry_base_delay_secs: u64,

    /// Random seed for deterministic generation (default: OS entropy)
    #[arg(long, env = "SEED")]
    pub seed: Option<u64>,
}

impl Config {
    /// Connection string for the target database.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, self.password, self.database
        )
    }

    /// Connection string for the administrative database, used before the
    /// target database exists.
    pub fn admin_connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, self.password, self.admin_database
        )
    }

    pub fn category_enabled(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries,
            base_delay: Duration::from_secs(self.retry_base_delay_secs),
        }
    }

    /// Check cross-field constraints that clap cannot express.
    pub fn validate(&self) -> Result<(), DatagenError> {
        if self.insert_interval_min_secs > self.insert_interval_max_secs {
            return Err(DatagenError::Config(format!(
                "insert interval min ({}) must not exceed max ({})",
                self.insert_interval_min_secs, self.insert_interval_max_secs
            )));
        }
        if self.max_retries == 0 {
            return Err(DatagenError::Config(
                "max retries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
