//! Environment-driven configuration for the vocabulary core and its storage backend.

use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

fn parse_var<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
{
    match env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { key: key.to_string(), value }),
        Err(_) => Ok(default),
    }
}

/// Thresholds governing the placement engine, SM-2 scheduler, lifecycle machine,
/// and daily activity tracker. All fields are overridable per deployment via
/// environment variables; defaults match the canonical values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreConfig {
    pub max_questions: u32,
    pub min_range: u32,
    pub regression_interval: u32,
    pub regression_factor: f64,
    pub mastery_threshold: u32,
    pub mastery_seed: u32,
    pub daily_goal: u32,
    pub ef_min: f64,
    pub ef_max: f64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            max_questions: 20,
            min_range: 5,
            regression_interval: 5,
            regression_factor: 0.80,
            mastery_threshold: 21,
            mastery_seed: 21,
            daily_goal: 15,
            ef_min: 1.3,
            ef_max: 2.5,
        }
    }
}

impl CoreConfig {
    /// Loads configuration from environment variables, falling back to the
    /// canonical defaults for anything unset. Reads a `.env` file first, if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        Ok(Self {
            max_questions: parse_var("VOCAB_MAX_QUESTIONS", defaults.max_questions)?,
            min_range: parse_var("VOCAB_MIN_RANGE", defaults.min_range)?,
            regression_interval: parse_var("VOCAB_REGRESSION_INTERVAL", defaults.regression_interval)?,
            regression_factor: parse_var("VOCAB_REGRESSION_FACTOR", defaults.regression_factor)?,
            mastery_threshold: parse_var("VOCAB_MASTERY_THRESHOLD", defaults.mastery_threshold)?,
            mastery_seed: parse_var("VOCAB_MASTERY_SEED", defaults.mastery_seed)?,
            daily_goal: parse_var("VOCAB_DAILY_GOAL", defaults.daily_goal)?,
            ef_min: parse_var("VOCAB_EF_MIN", defaults.ef_min)?,
            ef_max: parse_var("VOCAB_EF_MAX", defaults.ef_max)?,
        })
    }
}

/// Storage-level configuration (connection string only; the core never sees this).
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    pub database_url: String,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let database_url = env::var("VOCAB_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://vocab.db".to_string());
        Ok(Self { database_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_constants() {
        let cfg = CoreConfig::default();
        assert_eq!(cfg.max_questions, 20);
        assert_eq!(cfg.min_range, 5);
        assert_eq!(cfg.regression_interval, 5);
        assert_eq!(cfg.mastery_threshold, 21);
        assert_eq!(cfg.mastery_seed, 21);
        assert_eq!(cfg.daily_goal, 15);
        assert_eq!(cfg.ef_min, 1.3);
        assert_eq!(cfg.ef_max, 2.5);
    }

    #[test]
    fn rejects_unparseable_override() {
        std::env::set_var("VOCAB_MAX_QUESTIONS", "not-a-number");
        let err = CoreConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "VOCAB_MAX_QUESTIONS"));
        std::env::remove_var("VOCAB_MAX_QUESTIONS");
    }
}
