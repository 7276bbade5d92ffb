// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-target delivery with retry, backoff, and flood control.
//!
//! Each (message, target) pair runs its own retry state machine. Rate-limit
//! signals wait a tiered fraction of the platform-requested duration and do
//! not consume a retry attempt; transient errors back off exponentially up
//! to `max_retries`; permission denial is terminal for the target. A failure
//! on one target never blocks delivery to the others.

use std::sync::Arc;
use std::time::Duration;

use relayr_core::{ChatClient, ChatRef, Message, OutboundContent, SendError, StatsSink};
use tracing::{debug, error, info, warn};

use crate::compose::build_outbound;
use crate::options::{ForwardMode, ForwardOptions};

/// Rate-limit waits are never longer than this, whatever the platform asks.
const FLOOD_WAIT_CEILING: Duration = Duration::from_secs(300);

/// Self-throttle delay cap once the platform keeps rate-limiting us.
const THROTTLE_CAP: Duration = Duration::from_secs(5);

/// Consecutive rate limits tolerated before the engine raises its own delay.
const FLOOD_TOLERANCE: u32 = 3;

/// Outcome of one message's fan-out across all targets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl DeliveryReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Delivers accepted messages to all configured targets.
///
/// The engine is long-lived: flood-control state (consecutive rate limits,
/// the raised inter-message delay) persists across messages.
pub struct DeliveryEngine {
    client: Arc<dyn ChatClient>,
    stats: Arc<dyn StatsSink>,
    consecutive_floods: u32,
    /// Persistently raised pacing delay after sustained rate limiting.
    raised_delay: Option<Duration>,
}

impl DeliveryEngine {
    pub fn new(client: Arc<dyn ChatClient>, stats: Arc<dyn StatsSink>) -> Self {
        Self {
            client,
            stats,
            consecutive_floods: 0,
            raised_delay: None,
        }
    }

    /// Fans one accepted message out to every target sequentially.
    pub async fn deliver(&mut self, message: &Message, options: &ForwardOptions) -> DeliveryReport {
        let content = match options.mode {
            ForwardMode::Copy => Some(build_outbound(message, options, self.stats.as_ref())),
            ForwardMode::Forward => None,
        };

        let mut report = DeliveryReport::default();
        for target in &options.targets {
            let delivered = self
                .deliver_to_target(message, content.as_ref(), target, options)
                .await;
            if delivered {
                report.succeeded += 1;
            } else {
                report.failed += 1;
            }
        }

        info!(
            message_id = message.id.0,
            chat_id = message.chat_id,
            succeeded = report.succeeded,
            total = report.total(),
            "delivery complete"
        );
        report
    }

    /// Runs the retry state machine for one (message, target) pair.
    async fn deliver_to_target(
        &mut self,
        message: &Message,
        content: Option<&OutboundContent>,
        target: &ChatRef,
        options: &ForwardOptions,
    ) -> bool {
        // Copy mode with nothing left after transformation: skip silently.
        if let Some(content) = content
            && content.is_empty()
        {
            debug!(
                message_id = message.id.0,
                %target,
                "empty content after transformation, skipping"
            );
            return true;
        }

        let mut attempt: u32 = 0;
        loop {
            let result = match content {
                Some(content) => self.client.send(target, content).await,
                None => self.client.forward_as_is(target, message).await,
            };

            match result {
                Ok(()) => {
                    self.consecutive_floods = 0;
                    self.stats.record_message(true, message.has_media());
                    self.pace(message, options).await;
                    return true;
                }
                Err(SendError::RateLimited { wait }) => {
                    self.note_flood(options);
                    let actual = flood_wait(wait);
                    warn!(
                        message_id = message.id.0,
                        %target,
                        requested_secs = wait.as_secs(),
                        waiting_secs = actual.as_secs(),
                        "rate limited, waiting"
                    );
                    tokio::time::sleep(actual).await;
                    // Does not consume a retry attempt.
                }
                Err(SendError::PermissionDenied) => {
                    error!(message_id = message.id.0, %target, "cannot write to target");
                    self.fail(message, target, &SendError::PermissionDenied);
                    return false;
                }
                Err(err) => {
                    attempt += 1;
                    if attempt >= options.max_retries {
                        error!(
                            message_id = message.id.0,
                            %target,
                            attempts = attempt,
                            %err,
                            "delivery failed, retries exhausted"
                        );
                        self.fail(message, target, &err);
                        return false;
                    }
                    let backoff = Duration::from_secs(1u64 << (attempt - 1).min(16));
                    debug!(
                        message_id = message.id.0,
                        %target,
                        attempt,
                        backoff_secs = backoff.as_secs(),
                        %err,
                        "transient delivery error, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    /// Tracks consecutive rate limits and raises the engine's own delay
    /// once the platform keeps pushing back.
    fn note_flood(&mut self, options: &ForwardOptions) {
        self.consecutive_floods += 1;
        if self.consecutive_floods > FLOOD_TOLERANCE {
            let raised = self
                .effective_delay(options)
                .mul_f64(1.5)
                .min(THROTTLE_CAP);
            warn!(
                consecutive = self.consecutive_floods,
                delay_secs = raised.as_secs_f64(),
                "sustained rate limiting, self-throttling"
            );
            self.raised_delay = Some(raised);
        }
    }

    fn fail(&self, message: &Message, target: &ChatRef, err: &SendError) {
        self.stats.record_message(false, message.has_media());
        self.stats
            .record_error(&format!("delivery to {target} failed: {err}"));
    }

    /// Base pacing delay, accounting for any self-throttle raise.
    fn effective_delay(&self, options: &ForwardOptions) -> Duration {
        match self.raised_delay {
            Some(raised) => raised.max(options.delay),
            None => options.delay,
        }
    }

    /// Pacing after a successful send: scaled down for pure text, up for
    /// media.
    async fn pace(&self, message: &Message, options: &ForwardOptions) {
        let base = self.effective_delay(options);
        let wait = if message.has_media() {
            base.mul_f64(1.5)
        } else {
            base.mul_f64(0.3).max(Duration::from_millis(100))
        };
        tokio::time::sleep(wait).await;
    }
}

/// Tiered flood wait: short waits honored in full, medium waits at 80%,
/// anything longer waits half the requested time capped at five minutes.
pub fn flood_wait(requested: Duration) -> Duration {
    if requested <= Duration::from_secs(10) {
        requested
    } else if requested <= Duration::from_secs(60) {
        requested.mul_f64(0.8)
    } else {
        requested.mul_f64(0.5).min(FLOOD_WAIT_CEILING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flood_wait_tiers() {
        assert_eq!(flood_wait(Duration::from_secs(5)), Duration::from_secs(5));
        assert_eq!(flood_wait(Duration::from_secs(10)), Duration::from_secs(10));
        assert_eq!(flood_wait(Duration::from_secs(30)), Duration::from_secs(24));
        assert_eq!(flood_wait(Duration::from_secs(100)), Duration::from_secs(50));
        // Half of a huge wait still hits the ceiling.
        assert_eq!(flood_wait(Duration::from_secs(3600)), FLOOD_WAIT_CEILING);
    }

    #[test]
    fn report_totals() {
        let report = DeliveryReport {
            succeeded: 2,
            failed: 1,
        };
        assert_eq!(report.total(), 3);
    }
}
