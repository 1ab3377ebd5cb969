// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the dialogue core and its collaborators.
//!
//! Async traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod gateway;
pub mod log;
pub mod repository;

pub use adapter::PluginAdapter;
pub use gateway::MessageGateway;
pub use log::ReservationLog;
pub use repository::ReservationRepository;
