// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for Tablebook.
//!
//! Provides the CSV durable log and the in-memory [`ReservationStore`] that
//! writes through to it.

pub mod csv_log;
pub mod store;

pub use csv_log::CsvReservationLog;
pub use store::ReservationStore;
