// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the forwarding core.

pub mod client;
pub mod stats;

pub use client::ChatClient;
pub use stats::{NoopStats, StatsSink};
