// Rust guideline compliant 2026-10-12

//! Configuration management for Slotwise.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// Human-readable table format.
    #[default]
    Table,
    /// Plain text format.
    Plain,
}

/// Configuration for scheduling behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Radius used when a search gives a location but no radius.
    #[serde(default = "default_search_radius")]
    pub default_search_radius_km: f64,

    /// Result limit used when a search gives none.
    #[serde(default = "default_search_limit")]
    pub default_search_limit: usize,

    /// Booking length for services without a declared duration.
    #[serde(default = "default_booking_duration")]
    pub default_booking_duration_minutes: u32,

    /// Longest date range accepted by bulk slot generation.
    #[serde(default = "default_max_bulk_days")]
    pub max_bulk_days: u32,

    /// Window for upcoming availability queries.
    #[serde(default = "default_upcoming_window")]
    pub upcoming_window_days: u32,

    /// Default output format for commands.
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_search_radius() -> f64 {
    20.0
}

fn default_search_limit() -> usize {
    50
}

fn default_booking_duration() -> u32 {
    60
}

fn default_max_bulk_days() -> u32 {
    366
}

fn default_upcoming_window() -> u32 {
    7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_search_radius_km: default_search_radius(),
            default_search_limit: default_search_limit(),
            default_booking_duration_minutes: default_booking_duration(),
            max_bulk_days: default_max_bulk_days(),
            upcoming_window_days: default_upcoming_window(),
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Loads configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file at `.slotwise/config.toml`
    /// 3. Environment variables with `SLOTWISE_` prefix
    ///
    /// # Arguments
    ///
    /// * `slotwise_dir` - Path to the `.slotwise` directory
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file exists but cannot be read
    /// - Configuration file contains invalid TOML
    /// - An environment override cannot be parsed
    /// - Configuration values fail validation
    pub fn load(slotwise_dir: &Path) -> Result<Self> {
        let mut config = Self::default();

        let config_path = slotwise_dir.join("config.toml");
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            config = toml::from_str(&content)
                .map_err(|e| Error::Validation(format!("Invalid config file: {}", e)))?;
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Applies overrides looked up by variable name.
    ///
    /// Supported variables:
    /// - `SLOTWISE_DEFAULT_SEARCH_RADIUS_KM`
    /// - `SLOTWISE_DEFAULT_SEARCH_LIMIT`
    /// - `SLOTWISE_DEFAULT_BOOKING_DURATION_MINUTES`
    /// - `SLOTWISE_MAX_BULK_DAYS`
    /// - `SLOTWISE_UPCOMING_WINDOW_DAYS`
    /// - `SLOTWISE_OUTPUT_FORMAT` (json/table/plain)
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the variable if a value does not parse.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(key: &str, val: &str, expected: &str) -> Result<T> {
            val.trim()
                .parse()
                .map_err(|_| Error::Validation(format!("{} must be {}", key, expected)))
        }

        if let Some(val) = lookup("SLOTWISE_DEFAULT_SEARCH_RADIUS_KM") {
            self.default_search_radius_km =
                parse("SLOTWISE_DEFAULT_SEARCH_RADIUS_KM", &val, "a number of kilometers")?;
        }
        if let Some(val) = lookup("SLOTWISE_DEFAULT_SEARCH_LIMIT") {
            self.default_search_limit =
                parse("SLOTWISE_DEFAULT_SEARCH_LIMIT", &val, "a positive number")?;
        }
        if let Some(val) = lookup("SLOTWISE_DEFAULT_BOOKING_DURATION_MINUTES") {
            self.default_booking_duration_minutes = parse(
                "SLOTWISE_DEFAULT_BOOKING_DURATION_MINUTES",
                &val,
                "a positive number of minutes",
            )?;
        }
        if let Some(val) = lookup("SLOTWISE_MAX_BULK_DAYS") {
            self.max_bulk_days = parse("SLOTWISE_MAX_BULK_DAYS", &val, "a positive number of days")?;
        }
        if let Some(val) = lookup("SLOTWISE_UPCOMING_WINDOW_DAYS") {
            self.upcoming_window_days =
                parse("SLOTWISE_UPCOMING_WINDOW_DAYS", &val, "a positive number of days")?;
        }
        if let Some(val) = lookup("SLOTWISE_OUTPUT_FORMAT") {
            self.output_format = match val.trim() {
                "json" => OutputFormat::Json,
                "table" => OutputFormat::Table,
                "plain" => OutputFormat::Plain,
                _ => {
                    return Err(Error::Validation(
                        "SLOTWISE_OUTPUT_FORMAT must be json, table, or plain".to_string(),
                    ))
                }
            };
        }

        Ok(())
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive or any count is zero.
    pub fn validate(&self) -> Result<()> {
        crate::geo::validate_radius(self.default_search_radius_km)?;

        let counts = [
            ("default_search_limit", self.default_search_limit as u64),
            (
                "default_booking_duration_minutes",
                u64::from(self.default_booking_duration_minutes),
            ),
            ("max_bulk_days", u64::from(self.max_bulk_days)),
            ("upcoming_window_days", u64::from(self.upcoming_window_days)),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(Error::Validation(format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Saves the configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, slotwise_dir: &Path) -> Result<()> {
        let config_path = slotwise_dir.join("config.toml");
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Validation(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}
