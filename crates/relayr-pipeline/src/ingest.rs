// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingestion loop: subscribe, deduplicate, dispatch.
//!
//! One message at a time, to completion, before the next is accepted.
//! The dedup key is inserted before dispatch so redelivery from the
//! subscription layer can never double-dispatch. Configuration is re-read
//! before each message; a file that fails to load or validate keeps the
//! last good snapshot. Shutdown happens only through the cancellation
//! token, letting the in-flight message finish.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;

use relayr_core::{ChatClient, Message, MessageId, RelayrError, StatsSink};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::decision::should_forward;
use crate::delivery::DeliveryEngine;
use crate::limiter::RateLimiter;
use crate::options::ForwardOptions;

/// Bounded insertion-order set of already-dispatched (chat, message) keys.
///
/// Message ids are monotonic per conversation, so the oldest entries are
/// never queried again; eviction past the horizon is safe.
#[derive(Debug)]
pub struct DedupSet {
    capacity: usize,
    order: VecDeque<(i64, MessageId)>,
    seen: HashSet<(i64, MessageId)>,
}

impl DedupSet {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Inserts the key, returning `false` if it was already present.
    /// Evicts the oldest key once past capacity.
    pub fn insert(&mut self, key: (i64, MessageId)) -> bool {
        if !self.seen.insert(key) {
            return false;
        }
        self.order.push_back(key);
        if self.order.len() > self.capacity
            && let Some(evicted) = self.order.pop_front()
        {
            self.seen.remove(&evicted);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// The long-running ingestion loop.
pub struct IngestLoop {
    client: Arc<dyn ChatClient>,
    limiter: RateLimiter,
    engine: DeliveryEngine,
    dedup: DedupSet,
    /// Last good configuration snapshot; replaced on each successful reload.
    options: ForwardOptions,
    /// Explicit config file to re-read per message, when the operator gave
    /// one. Without it the standard lookup hierarchy is re-read instead.
    config_path: Option<PathBuf>,
    cancel: CancellationToken,
}

impl IngestLoop {
    pub fn new(
        client: Arc<dyn ChatClient>,
        stats: Arc<dyn StatsSink>,
        limiter: RateLimiter,
        options: ForwardOptions,
        cancel: CancellationToken,
        dedup_capacity: usize,
    ) -> Self {
        let engine = DeliveryEngine::new(Arc::clone(&client), stats);
        Self {
            client,
            limiter,
            engine,
            dedup: DedupSet::new(dedup_capacity),
            options,
            config_path: None,
            cancel,
        }
    }

    /// Re-read this file before each processed message.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Runs until the cancellation token fires or the inbound stream closes.
    pub async fn run(mut self) -> Result<(), RelayrError> {
        let mut inbound = self.client.subscribe(&self.options.sources).await?;
        info!(
            sources = self.options.sources.len(),
            targets = self.options.targets.len(),
            "listening for messages"
        );

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("shutdown requested, stopping ingestion");
                    return Ok(());
                }
                received = inbound.recv() => {
                    match received {
                        Some(message) => self.process(message).await,
                        None => {
                            warn!("inbound message stream closed");
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Processes one inbound message to completion. Never propagates
    /// errors; a failed stage is logged and the loop moves on.
    async fn process(&mut self, message: Message) {
        if let (Some(sender), Some(own)) = (message.sender_id, self.client.self_id())
            && sender == own
        {
            debug!(message_id = message.id.0, "skipping self-originated message");
            return;
        }

        // Inserted before dispatch: at-most-once even under redelivery.
        if !self.dedup.insert(message.dedup_key()) {
            debug!(
                message_id = message.id.0,
                chat_id = message.chat_id,
                "duplicate message, dropping"
            );
            return;
        }

        self.reload_options();
        self.limiter.acquire().await;

        if !should_forward(&message, &self.options) {
            debug!(
                message_id = message.id.0,
                chat_id = message.chat_id,
                "message filtered out"
            );
            return;
        }

        // Failed targets are counted inside the delivery engine; the report
        // is only logged here so one failure is not recorded twice.
        let report = self.engine.deliver(&message, &self.options).await;
        if report.failed > 0 {
            warn!(
                message_id = message.id.0,
                succeeded = report.succeeded,
                total = report.total(),
                "message delivered to a subset of targets"
            );
        }
    }

    /// Picks up live configuration edits. A load or validation failure
    /// keeps the last good snapshot.
    fn reload_options(&mut self) {
        let loaded = match &self.config_path {
            Some(path) => relayr_config::load_and_validate_path(path),
            None => relayr_config::load_and_validate(),
        };
        match loaded {
            Ok(config) => self.options = ForwardOptions::from_config(&config),
            Err(errors) => {
                warn!(
                    errors = errors.len(),
                    "config reload failed, keeping last good configuration"
                );
            }
        }
    }
}
