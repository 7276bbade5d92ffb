// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the relayr configuration system.

use relayr_config::diagnostic::{ConfigError, suggest_key};
use relayr_config::model::RelayrConfig;
use relayr_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with the full forwarding key set deserializes successfully.
#[test]
fn valid_toml_deserializes_into_relayr_config() {
    let toml = r#"
[app]
log_level = "debug"
dedup_capacity = 128
rate_limit_burst = 10
rate_limit_min_interval = 0.5

[telegram]
bot_token = "123:ABC"

[forwarding]
source_chat = "-1001, @news"
target_chat = "-2002"
forward_delay = 2.0
max_retries = 5
forward_mode = "copy"
forward_text = true
forward_photos = false
forward_links = false
header_enabled = true
header_text = "My Channel"
footer_enabled = true
footer_text = "Join us"
blacklist_enabled = true
blacklist_words = "spam, ads"
clean_links = true
clean_hashtags = true
buttons_enabled = true
button1_text = "Visit"
button1_url = "https://example.com"

[text_replacer]
replacer_enabled = true
replacements = "old->new, promo->"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.app.dedup_capacity, 128);
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.forwarding.source_chat, "-1001, @news");
    assert_eq!(config.forwarding.forward_delay, 2.0);
    assert_eq!(config.forwarding.max_retries, 5);
    assert_eq!(config.forwarding.forward_mode, "copy");
    assert!(!config.forwarding.forward_photos);
    assert!(!config.forwarding.forward_links);
    assert!(config.forwarding.header_enabled);
    assert_eq!(config.forwarding.header_text, "My Channel");
    assert!(config.forwarding.blacklist_enabled);
    assert_eq!(config.forwarding.blacklist_words, "spam, ads");
    assert!(config.forwarding.buttons_enabled);
    assert_eq!(config.forwarding.button1_url, "https://example.com");
    assert!(config.text_replacer.replacer_enabled);
    assert_eq!(config.text_replacer.replacements, "old->new, promo->");
}

/// Absent filter keys resolve to the documented fail-open defaults.
#[test]
fn absent_filter_keys_default_to_allow() {
    let toml = r#"
[forwarding]
source_chat = "-1"
target_chat = "-2"
"#;
    let config = load_config_from_str(toml).expect("should parse");
    assert!(config.forwarding.forward_text);
    assert!(config.forwarding.forward_photos);
    assert!(config.forwarding.forward_videos);
    assert!(config.forwarding.forward_gif);
    assert!(config.forwarding.forward_gifs);
    assert!(config.forwarding.forward_stickers);
    assert!(config.forwarding.forward_links);
    // Admission filters and the transformer default to disabled.
    assert!(!config.forwarding.blacklist_enabled);
    assert!(!config.forwarding.whitelist_enabled);
    assert!(!config.text_replacer.replacer_enabled);
}

/// Unknown field in [forwarding] section produces an error.
#[test]
fn unknown_field_in_forwarding_produces_error() {
    let toml = r#"
[forwarding]
forwad_mode = "copy"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("forwad_mode"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[statistics]
enabled = true
"#;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("statistics"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Env-style dotted override maps to forwarding.source_chat
/// (NOT forwarding.source.chat).
#[test]
fn dotted_override_reaches_forwarding_source_chat() {
    use figment::{Figment, providers::Serialized};

    let config: RelayrConfig = Figment::new()
        .merge(Serialized::defaults(RelayrConfig::default()))
        .merge(("forwarding.source_chat", "-42"))
        .extract()
        .expect("should set source_chat via dot notation");

    assert_eq!(config.forwarding.source_chat, "-42");
}

/// Validation: defaults alone are NOT a runnable config (no chats).
#[test]
fn defaults_fail_validation_without_chats() {
    let errors = load_and_validate_str("").expect_err("no chats configured");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::Validation { message } if message.contains("source_chat")
    )));
}

/// Validation passes once source and target are present.
#[test]
fn validation_passes_with_chats() {
    let toml = r#"
[forwarding]
source_chat = "@news"
target_chat = "-1002, @mirror"
"#;
    let config = load_and_validate_str(toml).expect("should validate");
    assert_eq!(config.forwarding.target_chat, "-1002, @mirror");
}

/// Diagnostic: typo in a forwarding key suggests the correct one.
#[test]
fn diagnostic_typo_suggests_correct_key() {
    let toml = r#"
[forwarding]
source_chat = "-1"
target_chat = "-2"
blaclist_words = "spam"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_suggestion = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, .. } if {
            key == "blaclist_words" && suggestion.as_deref() == Some("blacklist_words")
        })
    });
    assert!(
        has_suggestion,
        "should suggest blacklist_words for blaclist_words, got: {errors:?}"
    );
}

/// Diagnostic: valid key listing accompanies unknown-key errors.
#[test]
fn diagnostic_error_lists_valid_keys() {
    let toml = r#"
[forwarding]
forwad_mode = "copy"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_valid_keys = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { valid_keys, .. } if {
            valid_keys.contains("forward_mode") && valid_keys.contains("max_retries")
        })
    });
    assert!(has_valid_keys, "error should list valid forwarding keys");
}

/// Invalid type (string where number expected) produces a clear message.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[forwarding]
max_retries = "three"
"#;

    let err = load_config_from_str(toml).expect_err("should reject invalid type");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("max_retries"),
        "error should mention type mismatch, got: {err_str}"
    );
}

/// ConfigError renders through miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::GraphicalReportHandler;

    let error = ConfigError::UnknownKey {
        key: "forwad_mode".to_string(),
        suggestion: Some("forward_mode".to_string()),
        valid_keys: "forward_mode, forward_delay, max_retries".to_string(),
        span: None,
        src: None,
    };

    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    handler
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("forwad_mode"));
    assert!(buf.contains("did you mean `forward_mode`"));
}

/// suggest_key works across the forwarding key space.
#[test]
fn suggest_key_over_forwarding_keys() {
    let valid = &["forward_photos", "forward_videos", "forward_voice"];
    assert_eq!(
        suggest_key("forward_fotos", valid),
        Some("forward_photos".to_string())
    );
    assert_eq!(suggest_key("qqqq", valid), None);
}
