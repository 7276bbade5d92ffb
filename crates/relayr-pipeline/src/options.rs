// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed per-message snapshot of the forwarding configuration.
//!
//! The config file is re-read before each processed message; this module
//! converts the raw string-keyed model into the typed options the pipeline
//! consumes. All comma-separated lists and `old->new` rules are parsed here,
//! once per snapshot.

use std::time::Duration;

use relayr_config::lists::{ReplaceRule, parse_replacements, parse_word_list};
use relayr_config::model::RelayrConfig;
use relayr_core::{ChatRef, LinkButton};

/// Delivery mode for accepted messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForwardMode {
    /// Relay preserving source attribution; no transformation applied.
    #[default]
    Forward,
    /// Re-render content through the transformation chain.
    Copy,
}

/// Media-type filter flags, all fail-open.
#[derive(Debug, Clone)]
pub struct MediaFilters {
    pub text: bool,
    pub photos: bool,
    pub videos: bool,
    pub music: bool,
    pub audio: bool,
    pub voice: bool,
    pub video_messages: bool,
    pub files: bool,
    pub links: bool,
    /// Merged from the historical `forward_gif` / `forward_gifs` alias pair.
    pub gif: bool,
    pub contacts: bool,
    pub locations: bool,
    pub polls: bool,
    pub stickers: bool,
    pub round: bool,
    pub games: bool,
}

impl Default for MediaFilters {
    fn default() -> Self {
        Self {
            text: true,
            photos: true,
            videos: true,
            music: true,
            audio: true,
            voice: true,
            video_messages: true,
            files: true,
            links: true,
            gif: true,
            contacts: true,
            locations: true,
            polls: true,
            stickers: true,
            round: true,
            games: true,
        }
    }
}

/// Toggles for the cleaning sub-steps, applied in declaration order.
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    pub links: bool,
    pub hashtags: bool,
    pub formatting: bool,
    pub empty_lines: bool,
    pub lines_with_words: bool,
    /// Lowercased words whose presence removes the whole line.
    pub words: Vec<String>,
}

impl CleanOptions {
    /// True when at least one cleaning sub-step is enabled.
    pub fn any_enabled(&self) -> bool {
        self.links
            || self.hashtags
            || self.formatting
            || self.empty_lines
            || self.lines_with_words
    }
}

/// The full typed snapshot consumed by the decision, transformation, and
/// delivery stages for one message.
#[derive(Debug, Clone, Default)]
pub struct ForwardOptions {
    pub sources: Vec<ChatRef>,
    pub targets: Vec<ChatRef>,
    /// Base pacing delay after each successful send.
    pub delay: Duration,
    pub max_retries: u32,
    pub mode: ForwardMode,
    pub filters: MediaFilters,
    pub header: Option<String>,
    pub footer: Option<String>,
    /// Lowercased for case-insensitive substring matching.
    pub blacklist: Vec<String>,
    pub whitelist: Vec<String>,
    pub clean: CleanOptions,
    pub replacements: Vec<ReplaceRule>,
    pub buttons: Vec<LinkButton>,
}

impl ForwardOptions {
    /// Builds the typed snapshot from a validated configuration.
    ///
    /// Malformed chat identifiers are skipped here rather than failing the
    /// snapshot; startup validation already rejected them, and a reloaded
    /// file that fails validation never reaches this function.
    pub fn from_config(config: &RelayrConfig) -> Self {
        let f = &config.forwarding;

        Self {
            sources: parse_chat_list(&f.source_chat),
            targets: parse_chat_list(&f.target_chat),
            delay: Duration::from_secs_f64(f.forward_delay.max(0.0)),
            max_retries: f.max_retries,
            mode: if f.forward_mode == "copy" {
                ForwardMode::Copy
            } else {
                ForwardMode::Forward
            },
            filters: MediaFilters {
                text: f.forward_text,
                photos: f.forward_photos,
                videos: f.forward_videos,
                music: f.forward_music,
                audio: f.forward_audio,
                voice: f.forward_voice,
                video_messages: f.forward_video_messages,
                files: f.forward_files,
                links: f.forward_links,
                gif: f.forward_gif || f.forward_gifs,
                contacts: f.forward_contacts,
                locations: f.forward_locations,
                polls: f.forward_polls,
                stickers: f.forward_stickers,
                round: f.forward_round,
                games: f.forward_games,
            },
            header: enabled_text(f.header_enabled, &f.header_text),
            footer: enabled_text(f.footer_enabled, &f.footer_text),
            blacklist: if f.blacklist_enabled {
                lowercased_word_list(&f.blacklist_words)
            } else {
                Vec::new()
            },
            whitelist: if f.whitelist_enabled {
                lowercased_word_list(&f.whitelist_words)
            } else {
                Vec::new()
            },
            clean: CleanOptions {
                links: f.clean_links,
                hashtags: f.clean_hashtags,
                formatting: f.clean_formatting,
                empty_lines: f.clean_empty_lines,
                lines_with_words: f.clean_lines_with_words,
                words: lowercased_word_list(&f.clean_words_list),
            },
            replacements: if config.text_replacer.replacer_enabled {
                parse_replacements(&config.text_replacer.replacements)
            } else {
                Vec::new()
            },
            buttons: if f.buttons_enabled {
                build_buttons(&[
                    (&f.button1_text, &f.button1_url),
                    (&f.button2_text, &f.button2_url),
                    (&f.button3_text, &f.button3_url),
                ])
            } else {
                Vec::new()
            },
        }
    }
}

fn parse_chat_list(raw: &str) -> Vec<ChatRef> {
    parse_word_list(raw)
        .iter()
        .filter_map(|entry| entry.parse().ok())
        .collect()
}

fn enabled_text(enabled: bool, text: &str) -> Option<String> {
    let trimmed = text.trim();
    (enabled && !trimmed.is_empty()).then(|| trimmed.to_string())
}

fn lowercased_word_list(raw: &str) -> Vec<String> {
    parse_word_list(raw)
        .into_iter()
        .map(|w| w.to_lowercase())
        .collect()
}

/// Builds the ordered button row, skipping any slot where the label or URL
/// is blank.
fn build_buttons(slots: &[(&str, &str)]) -> Vec<LinkButton> {
    slots
        .iter()
        .filter(|(label, url)| !label.trim().is_empty() && !url.trim().is_empty())
        .map(|(label, url)| LinkButton {
            label: label.trim().to_string(),
            url: url.trim().to_string(),
        })
        .collect()
}
