// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the relayr forwarding bot.
//!
//! Defines the message model, the error taxonomy, and the two collaborator
//! boundaries the pipeline depends on: the chat platform capability
//! ([`ChatClient`]) and the statistics sink ([`StatsSink`]).

pub mod error;
pub mod traits;
pub mod types;

pub use error::{RelayrError, SendError};
pub use traits::{ChatClient, NoopStats, StatsSink};
pub use types::{
    ChatRef, LinkButton, MediaKind, MediaRef, Message, MessageId, OutboundContent,
};
