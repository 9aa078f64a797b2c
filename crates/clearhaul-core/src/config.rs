//! Application configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Configuration can be loaded from environment variables and config files.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pricing: PricingConfig,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_timeout() -> u64 {
    30
}

/// Database configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Idle connection timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

/// Pricing configuration
///
/// Whole-dollar prices for the service catalog. The catalog is built from
/// these values once at process start and never re-priced at runtime.
/// Prices are unsigned integers so a negative price is unrepresentable.
#[derive(Debug, Deserialize, Clone)]
pub struct PricingConfig {
    /// Quarter truck load base price
    #[serde(default = "default_load_quarter")]
    pub load_quarter: u32,

    /// Half truck load base price
    #[serde(default = "default_load_half")]
    pub load_half: u32,

    /// Three-quarter truck load base price
    #[serde(default = "default_load_three_quarter")]
    pub load_three_quarter: u32,

    /// Full truck load base price
    #[serde(default = "default_load_full")]
    pub load_full: u32,

    /// Small furniture piece, per unit
    #[serde(default = "default_item_furniture_small")]
    pub item_furniture_small: u32,

    /// Large furniture piece, per unit
    #[serde(default = "default_item_furniture_large")]
    pub item_furniture_large: u32,

    /// Small appliance, per unit
    #[serde(default = "default_item_appliance_small")]
    pub item_appliance_small: u32,

    /// Large appliance, per unit
    #[serde(default = "default_item_appliance_large")]
    pub item_appliance_large: u32,

    /// Electronics, per unit
    #[serde(default = "default_item_electronics")]
    pub item_electronics: u32,

    /// Mattress or box spring, per unit
    #[serde(default = "default_item_mattress")]
    pub item_mattress: u32,

    /// Tire, per unit
    #[serde(default = "default_item_tire")]
    pub item_tire: u32,

    /// Hazardous material, per unit
    #[serde(default = "default_item_hazardous")]
    pub item_hazardous: u32,

    /// Yard waste, per cubic yard
    #[serde(default = "default_item_yard_waste")]
    pub item_yard_waste: u32,

    /// Construction debris, per cubic yard
    #[serde(default = "default_item_construction_debris")]
    pub item_construction_debris: u32,

    /// Stairs surcharge, per flight
    #[serde(default = "default_labor_stairs")]
    pub labor_stairs: u32,

    /// Heavy item surcharge, per item
    #[serde(default = "default_labor_heavy_item")]
    pub labor_heavy_item: u32,

    /// Disassembly surcharge, per item
    #[serde(default = "default_labor_disassembly")]
    pub labor_disassembly: u32,
}

fn default_load_quarter() -> u32 {
    150
}

fn default_load_half() -> u32 {
    250
}

fn default_load_three_quarter() -> u32 {
    350
}

fn default_load_full() -> u32 {
    450
}

fn default_item_furniture_small() -> u32 {
    45
}

fn default_item_furniture_large() -> u32 {
    75
}

fn default_item_appliance_small() -> u32 {
    50
}

fn default_item_appliance_large() -> u32 {
    90
}

fn default_item_electronics() -> u32 {
    35
}

fn default_item_mattress() -> u32 {
    60
}

fn default_item_tire() -> u32 {
    15
}

fn default_item_hazardous() -> u32 {
    100
}

fn default_item_yard_waste() -> u32 {
    55
}

fn default_item_construction_debris() -> u32 {
    65
}

fn default_labor_stairs() -> u32 {
    25
}

fn default_labor_heavy_item() -> u32 {
    50
}

fn default_labor_disassembly() -> u32 {
    40
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("server.timeout_secs", 30)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.idle_timeout_secs", 600)?
            .set_default("pricing.load_quarter", 150)?
            .set_default("pricing.load_half", 250)?
            .set_default("pricing.load_three_quarter", 350)?
            .set_default("pricing.load_full", 450)?
            .set_default("pricing.item_furniture_small", 45)?
            .set_default("pricing.item_furniture_large", 75)?
            .set_default("pricing.item_appliance_small", 50)?
            .set_default("pricing.item_appliance_large", 90)?
            .set_default("pricing.item_electronics", 35)?
            .set_default("pricing.item_mattress", 60)?
            .set_default("pricing.item_tire", 15)?
            .set_default("pricing.item_hazardous", 100)?
            .set_default("pricing.item_yard_waste", 55)?
            .set_default("pricing.item_construction_debris", 65)?
            .set_default("pricing.labor_stairs", 25)?
            .set_default("pricing.labor_heavy_item", 50)?
            .set_default("pricing.labor_disassembly", 40)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with CLEARHAUL_ prefix
            .add_source(
                Environment::with_prefix("CLEARHAUL")
                    .separator("__")
                    .try_parsing(true),
            )
            // Support legacy environment variables
            .add_source(Environment::default().try_parsing(true))
            // DATABASE_URL wins over file and prefixed sources
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("CLEARHAUL").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/clearhaul".to_string(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            load_quarter: 150,
            load_half: 250,
            load_three_quarter: 350,
            load_full: 450,
            item_furniture_small: 45,
            item_furniture_large: 75,
            item_appliance_small: 50,
            item_appliance_large: 90,
            item_electronics: 35,
            item_mattress: 60,
            item_tire: 15,
            item_hazardous: 100,
            item_yard_waste: 55,
            item_construction_debris: 65,
            labor_stairs: 25,
            labor_heavy_item: 50,
            labor_disassembly: 40,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pricing_config() {
        let config = PricingConfig::default();
        assert_eq!(config.load_half, 250);
        assert_eq!(config.load_full, 450);
        assert_eq!(config.item_furniture_large, 75);
        assert_eq!(config.item_tire, 15);
    }
}
