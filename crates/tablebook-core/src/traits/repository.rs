// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reservation repository trait: the canonical reservation collection.

use async_trait::async_trait;

use crate::types::{OwnerId, Reservation, ReservationId};

/// Owner of the canonical reservation collection.
///
/// Every mutation is mirrored to durable storage before it returns. Durable
/// failures are logged by the implementation and never undo the in-memory
/// change, so these methods do not return errors.
#[async_trait]
pub trait ReservationRepository: Send + Sync + 'static {
    /// Inserts by ID and appends one durable record.
    async fn create(&self, reservation: Reservation);

    async fn get(&self, id: &ReservationId) -> Option<Reservation>;

    /// Confirmed reservations of `owner` that have not yet expired.
    async fn active_for_owner(&self, owner: OwnerId) -> Vec<Reservation>;

    /// Short-circuiting form of [`active_for_owner`](Self::active_for_owner).
    async fn has_active_for_owner(&self, owner: OwnerId) -> bool;

    /// Replaces the entry with the same ID. Returns `false` (and writes
    /// nothing) when no such entry exists.
    async fn update(&self, reservation: Reservation) -> bool;

    /// Removes the entry and its durable record. Unknown IDs are a no-op.
    async fn delete(&self, id: &ReservationId) -> Option<Reservation>;

    /// Snapshot of every stored reservation.
    async fn all(&self) -> Vec<Reservation>;
}
