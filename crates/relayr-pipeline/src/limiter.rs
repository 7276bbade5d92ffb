// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide dispatch rate limiter.
//!
//! Two constraints are enforced together: a sliding 60-second window caps
//! total dispatch attempts, and a minimum interval is kept between
//! consecutive calls regardless of window state. Waiting here suspends the
//! ingestion loop, never individual deliveries.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Default)]
struct LimiterState {
    /// Timestamps of dispatches inside the sliding window, oldest first.
    calls: VecDeque<Instant>,
    last_call: Option<Instant>,
}

/// Sliding-window rate limiter with a minimum inter-call interval.
#[derive(Debug)]
pub struct RateLimiter {
    burst_limit: usize,
    min_interval: Duration,
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    pub fn new(burst_limit: u32, min_interval_secs: f64) -> Self {
        Self {
            burst_limit: burst_limit.max(1) as usize,
            min_interval: Duration::from_secs_f64(min_interval_secs.max(0.0)),
            state: Mutex::new(LimiterState::default()),
        }
    }

    /// Waits until a dispatch slot is available, then claims it.
    pub async fn acquire(&self) {
        loop {
            let wait = self.try_claim();
            match wait {
                None => return,
                Some(wait) => tokio::time::sleep(wait).await,
            }
        }
    }

    /// Claims a slot now, or returns how long to wait before retrying.
    fn try_claim(&self) -> Option<Duration> {
        // Lock is never held across an await point.
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();

        while let Some(front) = state.calls.front() {
            if now.duration_since(*front) >= WINDOW {
                state.calls.pop_front();
            } else {
                break;
            }
        }

        let mut wait = Duration::ZERO;
        if let Some(last) = state.last_call {
            let since = now.duration_since(last);
            if since < self.min_interval {
                wait = self.min_interval - since;
            }
        }
        if state.calls.len() >= self.burst_limit
            && let Some(front) = state.calls.front()
        {
            let window_free = WINDOW - now.duration_since(*front);
            wait = wait.max(window_free);
        }

        if wait.is_zero() {
            state.calls.push_back(now);
            state.last_call = Some(now);
            None
        } else {
            Some(wait)
        }
    }
}
