// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Copy-mode content composition.
//!
//! Runs the transformation chain in its fixed order: replacement rules,
//! cleaning sub-steps, header/footer framing, buttons. Forward mode never
//! goes through this module.

use relayr_core::{MediaRef, Message, OutboundContent, StatsSink};

use crate::clean::clean_text;
use crate::options::ForwardOptions;
use crate::replace::apply_replacements;

/// Builds the outbound content for copy-mode delivery of `message`.
///
/// Link previews are always suppressed so re-rendered text stays compact.
pub fn build_outbound(
    message: &Message,
    options: &ForwardOptions,
    stats: &dyn StatsSink,
) -> OutboundContent {
    let mut body = message.text_or_caption().to_string();

    if !options.replacements.is_empty() {
        body = apply_replacements(&body, &options.replacements, stats);
    }

    if options.clean.any_enabled() {
        body = clean_text(&body, &options.clean, stats);
    }

    let text = compose_frame(&body, options.header.as_deref(), options.footer.as_deref());
    let media = message.has_media().then_some(MediaRef {
        chat_id: message.chat_id,
        message_id: message.id,
    });

    OutboundContent {
        // Copying keeps the source caption unless one is supplied, so media
        // always carries an explicit caption; empty means "clear it".
        text: if media.is_some() {
            Some(text)
        } else {
            (!text.is_empty()).then_some(text)
        },
        media,
        buttons: options.buttons.clone(),
        disable_link_preview: true,
    }
}

/// Joins header, body, and footer as paragraphs separated by blank lines.
/// Empty parts are dropped; header/footer may stand alone.
pub fn compose_frame(body: &str, header: Option<&str>, footer: Option<&str>) -> String {
    [header, Some(body).filter(|b| !b.trim().is_empty()), footer]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use relayr_core::{LinkButton, MediaKind, MessageId, NoopStats};

    fn message(text: &str, media: MediaKind) -> Message {
        Message {
            id: MessageId(10),
            chat_id: -500,
            sender_id: None,
            text: (!text.is_empty()).then(|| text.to_string()),
            media,
        }
    }

    #[test]
    fn frame_joins_with_blank_lines() {
        assert_eq!(
            compose_frame("body", Some("H"), Some("F")),
            "H\n\nbody\n\nF"
        );
        assert_eq!(compose_frame("body", None, Some("F")), "body\n\nF");
        assert_eq!(compose_frame("body", Some("H"), None), "H\n\nbody");
        assert_eq!(compose_frame("body", None, None), "body");
    }

    #[test]
    fn frame_stands_alone_when_body_is_empty() {
        assert_eq!(compose_frame("", Some("H"), Some("F")), "H\n\nF");
        assert_eq!(compose_frame("  ", Some("H"), None), "H");
        assert_eq!(compose_frame("", None, None), "");
    }

    #[test]
    fn chain_order_replace_then_clean_then_frame() {
        let mut options = ForwardOptions::default();
        options.replacements = relayr_config::parse_replacements("old->#tag");
        options.clean.hashtags = true;
        options.header = Some("HDR".into());

        // Replacement introduces a hashtag that cleaning then removes,
        // observable only if replace runs before clean.
        let out = build_outbound(&message("old news", MediaKind::None), &options, &NoopStats);
        assert_eq!(out.text.as_deref(), Some("HDR\n\nnews"));
    }

    #[test]
    fn media_ref_points_at_the_original_message() {
        let out = build_outbound(
            &message("caption", MediaKind::Photo),
            &ForwardOptions::default(),
            &NoopStats,
        );
        let media = out.media.unwrap();
        assert_eq!(media.chat_id, -500);
        assert_eq!(media.message_id, MessageId(10));
        assert!(out.disable_link_preview);
    }

    #[test]
    fn text_only_message_has_no_media_ref() {
        let out = build_outbound(
            &message("hello", MediaKind::None),
            &ForwardOptions::default(),
            &NoopStats,
        );
        assert!(out.media.is_none());
        assert_eq!(out.text.as_deref(), Some("hello"));
    }

    #[test]
    fn buttons_are_attached_from_options() {
        let mut options = ForwardOptions::default();
        options.buttons = vec![LinkButton {
            label: "Visit".into(),
            url: "https://example.com".into(),
        }];
        let out = build_outbound(&message("x", MediaKind::None), &options, &NoopStats);
        assert_eq!(out.buttons.len(), 1);
    }

    #[test]
    fn emptied_media_caption_is_cleared_not_dropped() {
        let mut options = ForwardOptions::default();
        options.clean.links = true;
        let out = build_outbound(
            &message("https://spam.example/offer", MediaKind::Photo),
            &options,
            &NoopStats,
        );
        // An explicit empty caption replaces the spammy original; `None`
        // would let the copy keep it.
        assert_eq!(out.text.as_deref(), Some(""));
        assert!(out.media.is_some());
        assert!(!out.is_empty());
    }

    #[test]
    fn fully_cleaned_text_yields_empty_content() {
        let mut options = ForwardOptions::default();
        options.clean.links = true;
        let out = build_outbound(
            &message("https://only-a-link.example", MediaKind::None),
            &options,
            &NoopStats,
        );
        assert!(out.is_empty());
    }
}
