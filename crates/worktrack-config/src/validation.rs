// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as bind addresses, non-zero ports, and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::WorktrackConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &WorktrackConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.server.port == 0 {
        errors.push(ConfigError::Validation {
            message: "server.port must be between 1 and 65535".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let level = config.service.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level `{}` is not one of: {}",
                config.service.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&WorktrackConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_failure() {
        let mut config = WorktrackConfig::default();
        config.server.host = "   ".to_string();
        config.server.port = 0;
        config.storage.database_path = String::new();
        config.service.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn rejects_host_with_invalid_characters() {
        let mut config = WorktrackConfig::default();
        config.server.host = "not a host!".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("not a valid IP"));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = WorktrackConfig::default();
        config.service.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
