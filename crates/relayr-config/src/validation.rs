// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: configured chats must exist and parse as identifiers,
//! the forward mode must be a known value, and numeric knobs must be
//! in range. A failure here is fatal at startup -- the ingestion loop
//! is never started with an unusable configuration.

use relayr_core::ChatRef;

use crate::diagnostic::ConfigError;
use crate::lists::parse_word_list;
use crate::model::RelayrConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RelayrConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    validate_chat_list(
        "forwarding.source_chat",
        &config.forwarding.source_chat,
        &mut errors,
    );
    validate_chat_list(
        "forwarding.target_chat",
        &config.forwarding.target_chat,
        &mut errors,
    );

    let mode = config.forwarding.forward_mode.as_str();
    if mode != "forward" && mode != "copy" {
        errors.push(ConfigError::Validation {
            message: format!(
                "forwarding.forward_mode must be `forward` or `copy`, got `{mode}`"
            ),
        });
    }

    if !config.forwarding.forward_delay.is_finite() || config.forwarding.forward_delay < 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "forwarding.forward_delay must be a non-negative number of seconds, got {}",
                config.forwarding.forward_delay
            ),
        });
    }

    if config.forwarding.max_retries < 1 {
        errors.push(ConfigError::Validation {
            message: "forwarding.max_retries must be at least 1".to_string(),
        });
    }

    if config.app.rate_limit_burst < 1 {
        errors.push(ConfigError::Validation {
            message: "app.rate_limit_burst must be at least 1".to_string(),
        });
    }

    if !config.app.rate_limit_min_interval.is_finite() || config.app.rate_limit_min_interval < 0.0
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.rate_limit_min_interval must be a non-negative number of seconds, got {}",
                config.app.rate_limit_min_interval
            ),
        });
    }

    if config.app.dedup_capacity < 1 {
        errors.push(ConfigError::Validation {
            message: "app.dedup_capacity must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Require a non-empty chat list where every element parses as a numeric id
/// or `@handle`.
fn validate_chat_list(key: &str, raw: &str, errors: &mut Vec<ConfigError>) {
    let entries = parse_word_list(raw);
    if entries.is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{key} must list at least one chat id or @handle"),
        });
        return;
    }

    for entry in &entries {
        if let Err(e) = entry.parse::<ChatRef>() {
            errors.push(ConfigError::Validation {
                message: format!("{key}: {e}"),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> RelayrConfig {
        toml::from_str(
            r#"
            [forwarding]
            source_chat = "-1001"
            target_chat = "@mirror,2002"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn minimal_config_validates() {
        assert!(validate_config(&minimal_config()).is_ok());
    }

    #[test]
    fn missing_source_and_target_are_fatal() {
        let config = RelayrConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::Validation { message } if message.contains("source_chat")
        )));
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::Validation { message } if message.contains("target_chat")
        )));
    }

    #[test]
    fn malformed_chat_identifier_fails() {
        let mut config = minimal_config();
        config.forwarding.target_chat = "not a chat".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::Validation { message } if message.contains("target_chat")
        )));
    }

    #[test]
    fn unknown_forward_mode_fails() {
        let mut config = minimal_config();
        config.forwarding.forward_mode = "broadcast".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::Validation { message } if message.contains("forward_mode")
        )));
    }

    #[test]
    fn negative_delay_fails() {
        let mut config = minimal_config();
        config.forwarding.forward_delay = -1.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn zero_max_retries_fails() {
        let mut config = minimal_config();
        config.forwarding.max_retries = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn collects_all_errors_not_just_first() {
        let mut config = RelayrConfig::default();
        config.forwarding.forward_mode = "broadcast".to_string();
        config.forwarding.max_retries = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 4, "expected several errors, got {errors:?}");
    }
}
