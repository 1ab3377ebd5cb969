// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory reservation store with write-through to a durable log.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use tablebook_core::{
    BookingCalendar, Clock, OwnerId, Reservation, ReservationId, ReservationLog,
    ReservationRepository, TablebookError,
};

/// The canonical reservation collection.
///
/// Each mutation holds the write lock across both the map change and the
/// durable write, so readers (including the expiry sweeper) never observe a
/// half-applied change. Durable failures are logged and the in-memory change
/// stands.
pub struct ReservationStore {
    reservations: RwLock<HashMap<ReservationId, Reservation>>,
    log: Arc<dyn ReservationLog>,
    calendar: BookingCalendar,
    clock: Arc<dyn Clock>,
}

impl ReservationStore {
    /// Creates an empty store without touching the log.
    pub fn new(
        log: Arc<dyn ReservationLog>,
        calendar: BookingCalendar,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reservations: RwLock::new(HashMap::new()),
            log,
            calendar,
            clock,
        }
    }

    /// Creates a store populated from the durable log.
    ///
    /// Later rows with a duplicate ID replace earlier ones.
    pub fn load(
        log: Arc<dyn ReservationLog>,
        calendar: BookingCalendar,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TablebookError> {
        let loaded = log.load()?;
        let count = loaded.len();
        let reservations = loaded
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect::<HashMap<_, _>>();
        info!(rows = count, reservations = reservations.len(), "reservations loaded");
        Ok(Self {
            reservations: RwLock::new(reservations),
            log,
            calendar,
            clock,
        })
    }

    pub fn calendar(&self) -> &BookingCalendar {
        &self.calendar
    }

    pub async fn len(&self) -> usize {
        self.reservations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.reservations.read().await.is_empty()
    }

    /// Runs one durable write on the blocking pool.
    async fn write_through<F>(&self, op: F) -> Result<(), TablebookError>
    where
        F: FnOnce(&dyn ReservationLog) -> Result<(), TablebookError> + Send + 'static,
    {
        let log = Arc::clone(&self.log);
        tokio::task::spawn_blocking(move || op(log.as_ref()))
            .await
            .map_err(|e| TablebookError::Internal(format!("durable write task failed: {e}")))?
    }
}

#[async_trait]
impl ReservationRepository for ReservationStore {
    async fn create(&self, reservation: Reservation) {
        let mut map = self.reservations.write().await;
        let row = reservation.clone();
        if let Err(e) = self.write_through(move |log| log.append(&row)).await {
            error!(reservation_id = %reservation.id, error = %e, "failed to append reservation");
        }
        debug!(reservation_id = %reservation.id, owner = %reservation.owner, "reservation created");
        map.insert(reservation.id.clone(), reservation);
    }

    async fn get(&self, id: &ReservationId) -> Option<Reservation> {
        self.reservations.read().await.get(id).cloned()
    }

    /// Sorted by start instant, then ID.
    async fn active_for_owner(&self, owner: OwnerId) -> Vec<Reservation> {
        let now = self.clock.now();
        let mut active = self
            .reservations
            .read()
            .await
            .values()
            .filter(|r| r.owner == owner && self.calendar.is_active(r, now))
            .cloned()
            .collect::<Vec<_>>();
        active.sort_by_cached_key(|r| (self.calendar.instant_of(&r.date, &r.time), r.id.clone()));
        active
    }

    async fn has_active_for_owner(&self, owner: OwnerId) -> bool {
        let now = self.clock.now();
        self.reservations
            .read()
            .await
            .values()
            .any(|r| r.owner == owner && self.calendar.is_active(r, now))
    }

    async fn update(&self, reservation: Reservation) -> bool {
        let mut map = self.reservations.write().await;
        let Some(slot) = map.get_mut(&reservation.id) else {
            debug!(reservation_id = %reservation.id, "update of unknown reservation ignored");
            return false;
        };
        *slot = reservation.clone();
        let id = reservation.id.clone();
        if let Err(e) = self.write_through(move |log| log.replace(&reservation)).await {
            error!(reservation_id = %id, error = %e, "failed to rewrite reservation file");
        }
        true
    }

    async fn delete(&self, id: &ReservationId) -> Option<Reservation> {
        let mut map = self.reservations.write().await;
        let removed = map.remove(id);
        let target = id.clone();
        if let Err(e) = self.write_through(move |log| log.remove(&target)).await {
            error!(reservation_id = %id, error = %e, "failed to rewrite reservation file");
        }
        removed
    }

    async fn all(&self) -> Vec<Reservation> {
        self.reservations.read().await.values().cloned().collect()
    }
}
