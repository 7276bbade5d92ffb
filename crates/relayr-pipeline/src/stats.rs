// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Atomic delivery counters.

use std::sync::atomic::{AtomicU64, Ordering};

use relayr_core::StatsSink;
use tracing::debug;

/// In-process statistics recorder backed by atomic counters.
///
/// Counter updates are fire-and-forget from the pipeline's point of view;
/// derived values (success rate) are computed on read.
#[derive(Debug, Default)]
pub struct CounterStats {
    messages_total: AtomicU64,
    messages_failed: AtomicU64,
    media_forwarded: AtomicU64,
    text_forwarded: AtomicU64,
    replacements_made: AtomicU64,
    links_cleaned: AtomicU64,
    errors: AtomicU64,
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub messages_total: u64,
    pub messages_failed: u64,
    pub media_forwarded: u64,
    pub text_forwarded: u64,
    pub replacements_made: u64,
    pub links_cleaned: u64,
    pub errors: u64,
    /// Fraction of total messages delivered successfully, 1.0 when idle.
    pub success_rate: f64,
}

impl CounterStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let total = self.messages_total.load(Ordering::Relaxed);
        let failed = self.messages_failed.load(Ordering::Relaxed);
        let success_rate = if total == 0 {
            1.0
        } else {
            (total - failed) as f64 / total as f64
        };
        StatsSnapshot {
            messages_total: total,
            messages_failed: failed,
            media_forwarded: self.media_forwarded.load(Ordering::Relaxed),
            text_forwarded: self.text_forwarded.load(Ordering::Relaxed),
            replacements_made: self.replacements_made.load(Ordering::Relaxed),
            links_cleaned: self.links_cleaned.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            success_rate,
        }
    }
}

impl StatsSink for CounterStats {
    fn record_message(&self, success: bool, has_media: bool) {
        self.messages_total.fetch_add(1, Ordering::Relaxed);
        if success {
            if has_media {
                self.media_forwarded.fetch_add(1, Ordering::Relaxed);
            } else {
                self.text_forwarded.fetch_add(1, Ordering::Relaxed);
            }
        } else {
            self.messages_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_replacement(&self) {
        self.replacements_made.fetch_add(1, Ordering::Relaxed);
    }

    fn record_link_cleaned(&self) {
        self.links_cleaned.fetch_add(1, Ordering::Relaxed);
    }

    fn record_error(&self, message: &str) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        debug!(error = message, "recorded pipeline error");
    }
}
