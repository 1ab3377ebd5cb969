// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable reservation log trait (append / rewrite-all semantics).

use crate::error::TablebookError;
use crate::types::{Reservation, ReservationId};

/// Row-oriented durable storage for reservations.
///
/// Calls are synchronous and bounded by local I/O. The in-memory store calls
/// them while holding its write lock.
pub trait ReservationLog: Send + Sync + 'static {
    /// Reads every well-formed record. Malformed rows are skipped with a
    /// warning; a missing store is empty.
    fn load(&self) -> Result<Vec<Reservation>, TablebookError>;

    /// Appends one record.
    fn append(&self, reservation: &Reservation) -> Result<(), TablebookError>;

    /// Rewrites the store with the record matching `reservation.id` replaced.
    fn replace(&self, reservation: &Reservation) -> Result<(), TablebookError>;

    /// Rewrites the store without the record matching `id`.
    fn remove(&self, id: &ReservationId) -> Result<(), TablebookError>;
}
