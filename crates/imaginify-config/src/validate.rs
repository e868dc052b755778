//! Configuration validation logic.

use crate::Config;
use crate::loader::ConfigError;

const VALID_OVERDRAFT: [&str; 2] = ["allow", "reject"];
const VALID_LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];
const VALID_LOG_OUTPUTS: [&str; 2] = ["stdout", "stderr"];

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.database.url.trim().is_empty() {
        return Err(ConfigError::Validation("database.url is empty".into()));
    }
    if config.database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be > 0".into(),
        ));
    }
    if config.database.min_connections > config.database.max_connections {
        return Err(ConfigError::Validation(
            "database.min_connections cannot exceed max_connections".into(),
        ));
    }
    if !VALID_OVERDRAFT.contains(&config.ledger.overdraft.as_str()) {
        return Err(ConfigError::Validation(format!(
            "ledger.overdraft must be one of: {:?}",
            VALID_OVERDRAFT
        )));
    }
    if config.ledger.event_capacity == 0 {
        return Err(ConfigError::Validation(
            "ledger.event_capacity must be > 0".into(),
        ));
    }
    if config.retry.max_attempts == 0 {
        return Err(ConfigError::Validation(
            "retry.max_attempts must be > 0".into(),
        ));
    }
    if !config.retry.multiplier.is_finite() || config.retry.multiplier < 1.0 {
        return Err(ConfigError::Validation(
            "retry.multiplier must be >= 1.0".into(),
        ));
    }
    if !(0.0..=1.0).contains(&config.retry.jitter) {
        return Err(ConfigError::Validation(
            "retry.jitter must be within 0.0..=1.0".into(),
        ));
    }
    if config.retry.max_delay_ms < config.retry.base_delay_ms {
        return Err(ConfigError::Validation(
            "retry.max_delay_ms must be >= base_delay_ms".into(),
        ));
    }
    if let Some(ref format) = config.logging.format
        && !VALID_LOG_FORMATS.contains(&format.as_str())
    {
        return Err(ConfigError::Validation(format!(
            "logging.format must be one of: {:?}",
            VALID_LOG_FORMATS
        )));
    }
    if let Some(ref output) = config.logging.output
        && !VALID_LOG_OUTPUTS.contains(&output.as_str())
    {
        return Err(ConfigError::Validation(format!(
            "logging.output must be one of: {:?}",
            VALID_LOG_OUTPUTS
        )));
    }
    Ok(())
}
