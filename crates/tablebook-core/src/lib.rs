// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tablebook reservation assistant.
//!
//! This crate provides the domain types, the booking calendar, the error type,
//! and the trait seams (gateway, repository, durable log) used throughout the
//! Tablebook workspace. Adapters implement traits defined here.

pub mod calendar;
pub mod clock;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use calendar::BookingCalendar;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TablebookError;
pub use types::{
    AdapterType, EventKind, HealthStatus, InboundEvent, InlineButton, Markup, MessageId,
    OutboundMessage, OwnerId, Reservation, ReservationId,
};

// Re-export all adapter traits at crate root.
pub use traits::{MessageGateway, PluginAdapter, ReservationLog, ReservationRepository};
