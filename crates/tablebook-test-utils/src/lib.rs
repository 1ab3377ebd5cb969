// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tablebook integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic tests without a Telegram connection or a CSV file.
//!
//! # Components
//!
//! - [`MockGateway`] - Mock messaging gateway with event injection and capture
//! - [`MemoryLog`] - In-memory durable log with failure injection
//! - [`TestHarness`] - Full dialogue stack over the mocks and a manual clock

pub mod harness;
pub mod memory_log;
pub mod mock_gateway;

pub use harness::{TestHarness, TestHarnessBuilder, default_now};
pub use memory_log::MemoryLog;
pub use mock_gateway::MockGateway;
