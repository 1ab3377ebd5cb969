// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory durable log with failure injection.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tablebook_core::{Reservation, ReservationId, ReservationLog, TablebookError};

/// Stands in for the CSV file. Rows are kept in write order.
#[derive(Debug, Default)]
pub struct MemoryLog {
    rows: Mutex<Vec<Reservation>>,
    failing: AtomicBool,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `rows` already persisted.
    pub fn with_rows(rows: Vec<Reservation>) -> Self {
        Self {
            rows: Mutex::new(rows),
            failing: AtomicBool::new(false),
        }
    }

    /// While set, every write fails and leaves the rows untouched.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of the persisted rows.
    pub fn rows(&self) -> Vec<Reservation> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    fn write<F>(&self, op: F) -> Result<(), TablebookError>
    where
        F: FnOnce(&mut Vec<Reservation>),
    {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TablebookError::storage(std::io::Error::other(
                "injected write failure",
            )));
        }
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| TablebookError::Internal("memory log poisoned".into()))?;
        op(&mut rows);
        Ok(())
    }
}

impl ReservationLog for MemoryLog {
    fn load(&self) -> Result<Vec<Reservation>, TablebookError> {
        Ok(self.rows())
    }

    fn append(&self, reservation: &Reservation) -> Result<(), TablebookError> {
        self.write(|rows| rows.push(reservation.clone()))
    }

    fn replace(&self, reservation: &Reservation) -> Result<(), TablebookError> {
        self.write(|rows| {
            for row in rows.iter_mut().filter(|r| r.id == reservation.id) {
                *row = reservation.clone();
            }
        })
    }

    fn remove(&self, id: &ReservationId) -> Result<(), TablebookError> {
        self.write(|rows| rows.retain(|r| &r.id != id))
    }
}
