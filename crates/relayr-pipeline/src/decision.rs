// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Forwarding decision engine.
//!
//! Check order, first matching exclusion wins: blacklist, whitelist,
//! media-type dispatch, link gate, default allow. The blacklist always
//! wins over the whitelist. The link gate is ANDed with the media-type
//! decision: a message must pass both to be forwarded.

use relayr_core::{MediaKind, Message};
use tracing::debug;

use crate::options::ForwardOptions;

/// Substrings recognized as links for the `forward_links` gate.
const LINK_MARKERS: [&str; 4] = ["http://", "https://", "www.", "t.me/"];

/// Decides whether a message passes the configured filters.
pub fn should_forward(message: &Message, options: &ForwardOptions) -> bool {
    let text = message.text_or_caption().to_lowercase();

    if let Some(word) = options.blacklist.iter().find(|w| text.contains(w.as_str())) {
        debug!(message_id = message.id.0, word = %word, "rejected by blacklist");
        return false;
    }

    if !options.whitelist.is_empty()
        && !options.whitelist.iter().any(|w| text.contains(w.as_str()))
    {
        debug!(message_id = message.id.0, "rejected by whitelist");
        return false;
    }

    if !media_allowed(&message.media, options) {
        debug!(
            message_id = message.id.0,
            media = ?message.media,
            "rejected by media-type filter"
        );
        return false;
    }

    if !options.filters.links && contains_link(&text) {
        debug!(message_id = message.id.0, "rejected by link filter");
        return false;
    }

    true
}

/// Media-type dispatch: exactly one filter flag governs each media kind.
fn media_allowed(media: &MediaKind, options: &ForwardOptions) -> bool {
    let f = &options.filters;
    match media {
        MediaKind::None => f.text,
        MediaKind::Photo => f.photos,
        MediaKind::Video { gif: true } => f.gif,
        MediaKind::Video { gif: false } => f.videos,
        MediaKind::Sticker => f.stickers,
        MediaKind::Voice => f.voice,
        MediaKind::RoundVideo => f.round,
        MediaKind::Audio { title: Some(_) } => f.music,
        MediaKind::Audio { title: None } => f.audio,
        MediaKind::Document { mime_type } => {
            if mime_type.as_deref().is_some_and(|m| m.starts_with("video/")) {
                f.video_messages
            } else {
                f.files
            }
        }
        MediaKind::Contact => f.contacts,
        MediaKind::Location => f.locations,
        MediaKind::Poll => f.polls,
        MediaKind::Game => f.games,
    }
}

/// True when lowercased text contains a recognizable URL pattern.
pub fn contains_link(lowered_text: &str) -> bool {
    LINK_MARKERS.iter().any(|m| lowered_text.contains(m))
}
