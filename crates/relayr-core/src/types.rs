// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message and chat types shared across the forwarding pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RelayrError;

/// Identifier of a message, unique within its conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub i32);

/// Reference to a chat: a numeric id (negative for groups/channels) or a
/// `@handle` string. Resolution to a concrete entity happens at the
/// platform boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChatRef {
    Id(i64),
    Handle(String),
}

impl ChatRef {
    /// Numeric id if this reference is already resolved.
    pub fn id(&self) -> Option<i64> {
        match self {
            ChatRef::Id(id) => Some(*id),
            ChatRef::Handle(_) => None,
        }
    }
}

impl FromStr for ChatRef {
    type Err = RelayrError;

    /// Parses a chat identifier: `@handle` (alphanumeric/underscore) or a
    /// possibly negative numeric id. Anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RelayrError::Config("empty chat identifier".into()));
        }

        if let Some(handle) = s.strip_prefix('@') {
            if !handle.is_empty() && handle.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Ok(ChatRef::Handle(handle.to_string()));
            }
            return Err(RelayrError::Config(format!(
                "invalid chat handle `{s}`"
            )));
        }

        s.parse::<i64>().map(ChatRef::Id).map_err(|_| {
            RelayrError::Config(format!(
                "invalid chat identifier `{s}` (expected numeric id or @handle)"
            ))
        })
    }
}

impl fmt::Display for ChatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRef::Id(id) => write!(f, "{id}"),
            ChatRef::Handle(h) => write!(f, "@{h}"),
        }
    }
}

/// The media payload of a message. A message carries at most one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MediaKind {
    /// Plain text message, no media attached.
    #[default]
    None,
    Photo,
    /// A video; `gif` marks animated/GIF-style videos.
    Video { gif: bool },
    Sticker,
    Voice,
    /// Round video note.
    RoundVideo,
    /// Audio file; a present title marks it as music.
    Audio { title: Option<String> },
    /// Generic document with an optional MIME type.
    Document { mime_type: Option<String> },
    Contact,
    /// Location or venue.
    Location,
    Poll,
    Game,
}

/// A message observed in a source conversation.
///
/// Read-only to the pipeline: it is never mutated, only transformed into
/// derivative outbound content.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    /// Conversation the message arrived in.
    pub chat_id: i64,
    /// Sender identity, when the platform exposes one.
    pub sender_id: Option<i64>,
    /// Text body or media caption. At most one of the two exists upstream.
    pub text: Option<String>,
    pub media: MediaKind,
}

impl Message {
    pub fn has_media(&self) -> bool {
        !matches!(self.media, MediaKind::None)
    }

    /// Composite key used for duplicate suppression.
    pub fn dedup_key(&self) -> (i64, MessageId) {
        (self.chat_id, self.id)
    }

    /// Text body or caption, defaulting to empty.
    pub fn text_or_caption(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

/// An inline link button attached to outbound messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
}

/// Reference to the media of an already-delivered platform message, used
/// to re-publish it under a new caption in copy mode.
#[derive(Debug, Clone, Copy)]
pub struct MediaRef {
    pub chat_id: i64,
    pub message_id: MessageId,
}

/// Freshly composed content for copy-mode delivery.
#[derive(Debug, Clone, Default)]
pub struct OutboundContent {
    /// Transformed text (message body or media caption).
    pub text: Option<String>,
    /// Original media to re-publish, if any.
    pub media: Option<MediaRef>,
    pub buttons: Vec<LinkButton>,
    /// Copy mode suppresses link previews so re-rendered text stays compact.
    pub disable_link_preview: bool,
}

impl OutboundContent {
    /// True when there is neither text nor media to deliver.
    pub fn is_empty(&self) -> bool {
        self.media.is_none() && self.text.as_deref().is_none_or(|t| t.trim().is_empty())
    }
}
