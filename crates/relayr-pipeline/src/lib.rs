// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The relayr forwarding pipeline.
//!
//! Stages, in processing order: ingestion with duplicate suppression
//! ([`ingest`]), the forwarding decision ([`decision`]), the copy-mode
//! transformation chain ([`replace`], [`clean`], [`compose`]), and delivery
//! with retry and flood control ([`delivery`]). The [`limiter`] paces
//! dispatch process-wide and [`stats`] counts what happened.
//!
//! The pipeline talks to the platform only through the
//! [`relayr_core::ChatClient`] trait.

pub mod clean;
pub mod compose;
pub mod decision;
pub mod delivery;
pub mod ingest;
pub mod limiter;
pub mod options;
pub mod replace;
pub mod stats;

pub use decision::should_forward;
pub use delivery::{DeliveryEngine, DeliveryReport};
pub use ingest::{DedupSet, IngestLoop};
pub use limiter::RateLimiter;
pub use options::{CleanOptions, ForwardMode, ForwardOptions, MediaFilters};
pub use stats::{CounterStats, StatsSnapshot};
