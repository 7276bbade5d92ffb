// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Statistics sink boundary.
//!
//! The pipeline emits fire-and-forget counter events to an injected
//! collaborator instead of a process-wide singleton, so tests can
//! substitute a recording or no-op sink.

/// Receiver for pipeline counter events.
pub trait StatsSink: Send + Sync {
    /// A delivery attempt for one target finished.
    fn record_message(&self, success: bool, has_media: bool);

    /// A replacement rule matched and was applied.
    fn record_replacement(&self);

    /// The cleaner stripped at least one link from a message.
    fn record_link_cleaned(&self);

    /// A processing or delivery error occurred.
    fn record_error(&self, message: &str);
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStats;

impl StatsSink for NoopStats {
    fn record_message(&self, _success: bool, _has_media: bool) {}
    fn record_replacement(&self) {}
    fn record_link_cleaned(&self) {}
    fn record_error(&self, _message: &str) {}
}
