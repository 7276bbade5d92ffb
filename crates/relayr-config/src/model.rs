// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the relayr forwarding bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.
//!
//! List-valued keys (`source_chat`, `blacklist_words`, `replacements`, ...)
//! stay comma-separated strings here; the [`crate::lists`] module is the
//! only place they are parsed into typed values. Every `forward_*` filter
//! flag defaults to `true` (fail-open), while blacklist/whitelist, cleaning,
//! header/footer, buttons and the replacer default to disabled.

use serde::{Deserialize, Serialize};

/// Top-level relayr configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values; the
/// only keys without a usable default are `forwarding.source_chat` and
/// `forwarding.target_chat`, which validation enforces at startup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayrConfig {
    /// Process-level settings (logging, dedup horizon, rate limiting).
    #[serde(default)]
    pub app: AppConfig,

    /// Telegram client settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Forwarding pipeline settings.
    #[serde(default)]
    pub forwarding: ForwardingConfig,

    /// Text replacement rules.
    #[serde(default)]
    pub text_replacer: ReplacerConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum number of (chat, message) keys remembered for duplicate
    /// suppression; the oldest entries are evicted beyond this horizon.
    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: usize,

    /// Maximum dispatch attempts per sliding 60-second window.
    #[serde(default = "default_rate_limit_burst")]
    pub rate_limit_burst: u32,

    /// Minimum interval between outbound platform calls, in seconds.
    #[serde(default = "default_rate_limit_min_interval")]
    pub rate_limit_min_interval: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dedup_capacity: default_dedup_capacity(),
            rate_limit_burst: default_rate_limit_burst(),
            rate_limit_min_interval: default_rate_limit_min_interval(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_dedup_capacity() -> usize {
    4096
}

fn default_rate_limit_burst() -> u32 {
    20
}

fn default_rate_limit_min_interval() -> f64 {
    1.0
}

/// Telegram client configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required to start the client.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// Forwarding pipeline configuration.
///
/// Reloaded from disk before each processed message so edits from the
/// external control UI take effect live.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ForwardingConfig {
    /// Source chats to monitor: comma-separated ids or @handles.
    #[serde(default)]
    pub source_chat: String,

    /// Target chats to deliver into: comma-separated ids or @handles.
    #[serde(default)]
    pub target_chat: String,

    /// Base pacing delay after each successful send, in seconds.
    #[serde(default = "default_forward_delay")]
    pub forward_delay: f64,

    /// Maximum delivery attempts per target for non-rate-limit errors.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delivery mode: "forward" (keeps attribution) or "copy" (re-renders
    /// content through the transformation chain).
    #[serde(default = "default_forward_mode")]
    pub forward_mode: String,

    // Media-type filters. All fail-open: an absent key allows the type.
    #[serde(default = "default_true")]
    pub forward_text: bool,
    #[serde(default = "default_true")]
    pub forward_photos: bool,
    #[serde(default = "default_true")]
    pub forward_videos: bool,
    #[serde(default = "default_true")]
    pub forward_music: bool,
    #[serde(default = "default_true")]
    pub forward_audio: bool,
    #[serde(default = "default_true")]
    pub forward_voice: bool,
    #[serde(default = "default_true")]
    pub forward_video_messages: bool,
    #[serde(default = "default_true")]
    pub forward_files: bool,
    #[serde(default = "default_true")]
    pub forward_links: bool,
    /// Historical alias pair: either flag enables GIF forwarding.
    #[serde(default = "default_true")]
    pub forward_gif: bool,
    #[serde(default = "default_true")]
    pub forward_gifs: bool,
    #[serde(default = "default_true")]
    pub forward_contacts: bool,
    #[serde(default = "default_true")]
    pub forward_locations: bool,
    #[serde(default = "default_true")]
    pub forward_polls: bool,
    #[serde(default = "default_true")]
    pub forward_stickers: bool,
    #[serde(default = "default_true")]
    pub forward_round: bool,
    #[serde(default = "default_true")]
    pub forward_games: bool,

    #[serde(default)]
    pub header_enabled: bool,
    #[serde(default)]
    pub header_text: String,
    #[serde(default)]
    pub footer_enabled: bool,
    #[serde(default)]
    pub footer_text: String,

    #[serde(default)]
    pub blacklist_enabled: bool,
    /// Comma-separated blocked words (case-insensitive substrings).
    #[serde(default)]
    pub blacklist_words: String,
    #[serde(default)]
    pub whitelist_enabled: bool,
    /// Comma-separated required words (at least one must match).
    #[serde(default)]
    pub whitelist_words: String,

    #[serde(default)]
    pub clean_links: bool,
    #[serde(default)]
    pub clean_hashtags: bool,
    #[serde(default)]
    pub clean_formatting: bool,
    #[serde(default)]
    pub clean_empty_lines: bool,
    #[serde(default)]
    pub clean_lines_with_words: bool,
    /// Comma-separated words whose presence removes the whole line.
    #[serde(default)]
    pub clean_words_list: String,

    #[serde(default)]
    pub buttons_enabled: bool,
    #[serde(default)]
    pub button1_text: String,
    #[serde(default)]
    pub button1_url: String,
    #[serde(default)]
    pub button2_text: String,
    #[serde(default)]
    pub button2_url: String,
    #[serde(default)]
    pub button3_text: String,
    #[serde(default)]
    pub button3_url: String,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            source_chat: String::new(),
            target_chat: String::new(),
            forward_delay: default_forward_delay(),
            max_retries: default_max_retries(),
            forward_mode: default_forward_mode(),
            forward_text: true,
            forward_photos: true,
            forward_videos: true,
            forward_music: true,
            forward_audio: true,
            forward_voice: true,
            forward_video_messages: true,
            forward_files: true,
            forward_links: true,
            forward_gif: true,
            forward_gifs: true,
            forward_contacts: true,
            forward_locations: true,
            forward_polls: true,
            forward_stickers: true,
            forward_round: true,
            forward_games: true,
            header_enabled: false,
            header_text: String::new(),
            footer_enabled: false,
            footer_text: String::new(),
            blacklist_enabled: false,
            blacklist_words: String::new(),
            whitelist_enabled: false,
            whitelist_words: String::new(),
            clean_links: false,
            clean_hashtags: false,
            clean_formatting: false,
            clean_empty_lines: false,
            clean_lines_with_words: false,
            clean_words_list: String::new(),
            buttons_enabled: false,
            button1_text: String::new(),
            button1_url: String::new(),
            button2_text: String::new(),
            button2_url: String::new(),
            button3_text: String::new(),
            button3_url: String::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_forward_delay() -> f64 {
    1.0
}

fn default_max_retries() -> u32 {
    3
}

fn default_forward_mode() -> String {
    "forward".to_string()
}

/// Text replacer configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReplacerConfig {
    #[serde(default)]
    pub replacer_enabled: bool,

    /// Comma-separated `old->new` rules, applied in order. An empty `new`
    /// deletes occurrences of `old`. Malformed entries are skipped.
    #[serde(default)]
    pub replacements: String,
}
