// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./relayr.toml` > `~/.config/relayr/relayr.toml`
//! > `/etc/relayr/relayr.toml` with environment variable overrides via the
//! `RELAYR_` prefix. The forwarding pipeline re-reads the file before each
//! processed message via [`load_config_from_path`], so edits made by the
//! external control UI take effect without a restart.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RelayrConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/relayr/relayr.toml` (system-wide)
/// 3. `~/.config/relayr/relayr.toml` (user XDG config)
/// 4. `./relayr.toml` (local directory)
/// 5. `RELAYR_*` environment variables
pub fn load_config() -> Result<RelayrConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayrConfig::default()))
        .merge(Toml::file("/etc/relayr/relayr.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("relayr/relayr.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("relayr.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<RelayrConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayrConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
///
/// This is the per-message reload entry point: the ingestion loop calls it
/// before processing each message to pick up live config changes.
pub fn load_config_from_path(path: &Path) -> Result<RelayrConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayrConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `RELAYR_FORWARDING_SOURCE_CHAT` must map
/// to `forwarding.source_chat`, not `forwarding.source.chat`.
fn env_provider() -> Env {
    Env::prefixed("RELAYR_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: RELAYR_FORWARDING_SOURCE_CHAT -> "forwarding_source_chat"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("app_", "app.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("forwarding_", "forwarding.", 1)
            .replacen("text_replacer_", "text_replacer.", 1);
        mapped.into()
    })
}
