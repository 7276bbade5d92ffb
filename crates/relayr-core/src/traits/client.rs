// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat platform capability consumed by the forwarding core.
//!
//! The pipeline treats the underlying client library as a capability:
//! subscribe to a message stream, deliver messages, resolve chat handles.
//! Connection and authentication are the implementation's concern.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{RelayrError, SendError};
use crate::types::{ChatRef, Message, OutboundContent};

/// Bidirectional chat platform boundary.
///
/// Send-side calls surface the [`SendError`] taxonomy so the delivery
/// engine can apply its per-variant retry policy.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Identity of this client, used to suppress self-originated messages.
    fn self_id(&self) -> Option<i64>;

    /// Starts listening to the given source chats and returns the inbound
    /// message stream. Called once at startup.
    async fn subscribe(
        &self,
        sources: &[ChatRef],
    ) -> Result<mpsc::Receiver<Message>, RelayrError>;

    /// Sends freshly composed content (copy mode) to a target chat.
    async fn send(&self, target: &ChatRef, content: &OutboundContent) -> Result<(), SendError>;

    /// Relays a message preserving source attribution (forward mode).
    async fn forward_as_is(&self, target: &ChatRef, message: &Message) -> Result<(), SendError>;

    /// Resolves a chat reference to a human-readable title, verifying access.
    async fn resolve_chat(&self, chat: &ChatRef) -> Result<String, RelayrError>;
}
