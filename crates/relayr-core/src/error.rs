// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the relayr forwarding bot.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across relayr traits and core operations.
#[derive(Debug, Error)]
pub enum RelayrError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Chat platform errors outside the per-send taxonomy (connection,
    /// subscription, entity resolution).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Per-send error taxonomy surfaced by the chat platform boundary.
///
/// The delivery engine dispatches its retry policy on these variants:
/// rate limits retry after a computed wait without consuming an attempt,
/// permission denial is terminal for the target, everything else retries
/// with exponential backoff up to the configured maximum.
#[derive(Debug, Error)]
pub enum SendError {
    /// The platform demanded a mandatory wait before the next call.
    #[error("rate limited, platform requested a {}s wait", wait.as_secs())]
    RateLimited { wait: Duration },

    /// The bot cannot write to the target chat. Never retried.
    #[error("permission denied writing to target chat")]
    PermissionDenied,

    /// A transient RPC-level failure worth retrying.
    #[error("transient platform error: {0}")]
    Transient(String),

    /// Anything unclassified. Treated as transient by the retry policy.
    #[error("unknown platform error: {0}")]
    Unknown(String),
}

impl SendError {
    /// Whether the retry policy may attempt this send again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SendError::PermissionDenied)
    }
}
