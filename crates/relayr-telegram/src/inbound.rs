// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Converts inbound Telegram updates into the pipeline's message model.

use relayr_core::{MediaKind, Message, MessageId};
use teloxide::types::Message as TgMessage;

/// Maps a Telegram message to the channel-agnostic [`Message`].
///
/// Text and caption collapse into one field; the media descriptor keeps
/// just what the decision engine dispatches on.
pub fn to_message(msg: &TgMessage) -> Message {
    Message {
        id: MessageId(msg.id.0),
        chat_id: msg.chat.id.0,
        sender_id: msg.from.as_ref().map(|u| u.id.0 as i64),
        text: msg
            .text()
            .or_else(|| msg.caption())
            .map(str::to_string),
        media: media_kind(msg),
    }
}

/// Media descriptor for the decision engine's dispatch table.
///
/// Animations are checked before documents: Telegram attaches a document
/// to every animation, and the GIF classification must win.
fn media_kind(msg: &TgMessage) -> MediaKind {
    if msg.photo().is_some() {
        MediaKind::Photo
    } else if msg.animation().is_some() {
        MediaKind::Video { gif: true }
    } else if msg.video().is_some() {
        MediaKind::Video { gif: false }
    } else if msg.sticker().is_some() {
        MediaKind::Sticker
    } else if msg.voice().is_some() {
        MediaKind::Voice
    } else if msg.video_note().is_some() {
        MediaKind::RoundVideo
    } else if let Some(audio) = msg.audio() {
        MediaKind::Audio {
            title: audio.title.clone(),
        }
    } else if let Some(doc) = msg.document() {
        MediaKind::Document {
            mime_type: doc.mime_type.as_ref().map(|m| m.to_string()),
        }
    } else if msg.contact().is_some() {
        MediaKind::Contact
    } else if msg.location().is_some() || msg.venue().is_some() {
        MediaKind::Location
    } else if msg.poll().is_some() {
        MediaKind::Poll
    } else if msg.game().is_some() {
        MediaKind::Game
    } else {
        MediaKind::None
    }
}
