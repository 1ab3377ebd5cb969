// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV implementation of the durable reservation log.
//!
//! One row per reservation under a fixed 10-column header. Creates append a
//! row; updates and deletes rewrite the whole file through a temp file in the
//! same directory followed by an atomic rename.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, warn};

use tablebook_core::{
    AdapterType, HealthStatus, OwnerId, PluginAdapter, Reservation, ReservationId,
    ReservationLog, TablebookError,
};

/// Column names, in file order.
pub const HEADER: [&str; 10] = [
    "ID",
    "ChatID",
    "Name",
    "Phone",
    "Guests",
    "Date",
    "Time",
    "Comment",
    "Confirmed",
    "CreatedAt",
];

/// CSV file holding every stored reservation.
///
/// Not internally synchronized: callers serialize writes (the store does so
/// under its write lock).
#[derive(Debug, Clone)]
pub struct CsvReservationLog {
    path: PathBuf,
}

impl CsvReservationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn create_with_header(&self) -> Result<(), TablebookError> {
        let mut writer = WriterBuilder::new().from_path(&self.path).map_err(TablebookError::storage)?;
        writer.write_record(HEADER).map_err(TablebookError::storage)?;
        writer.flush()?;
        Ok(())
    }

    /// Every data row as stored, malformed ones included.
    fn raw_rows(&self) -> Result<Vec<StringRecord>, TablebookError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(TablebookError::storage)?;
        reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(TablebookError::storage)
    }

    /// Writes header plus `rows` to a sibling temp file, then renames it over
    /// the log.
    fn rewrite(&self, rows: &[StringRecord]) -> Result<(), TablebookError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = WriterBuilder::new().flexible(true).from_writer(tmp.as_file_mut());
            writer.write_record(HEADER).map_err(TablebookError::storage)?;
            for row in rows {
                writer.write_record(row).map_err(TablebookError::storage)?;
            }
            writer.flush()?;
        }
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.path).map_err(|e| TablebookError::storage(e.error))?;
        Ok(())
    }
}

/// Serializes one reservation into file column order.
pub fn to_record(reservation: &Reservation) -> StringRecord {
    StringRecord::from(vec![
        reservation.id.to_string(),
        reservation.owner.0.to_string(),
        reservation.name.clone(),
        reservation.phone.clone(),
        reservation.guests.to_string(),
        reservation.date.clone(),
        reservation.time.clone(),
        reservation.comment.clone(),
        reservation.confirmed.to_string(),
        reservation
            .created_at
            .to_rfc3339_opts(SecondsFormat::AutoSi, false),
    ])
}

/// Why a stored row could not be turned back into a reservation.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("expected 10 fields, found {0}")]
    FieldCount(usize),
    #[error("bad chat id `{0}`")]
    Owner(String),
    #[error("empty name")]
    EmptyName,
    #[error("bad guest count `{0}`")]
    Guests(String),
    #[error("bad confirmed flag `{0}`")]
    Confirmed(String),
    #[error("bad created-at timestamp `{0}`")]
    CreatedAt(String),
}

/// Parses one row back into a reservation.
pub fn from_record(record: &StringRecord) -> Result<Reservation, RowError> {
    if record.len() < HEADER.len() {
        return Err(RowError::FieldCount(record.len()));
    }
    let field = |i: usize| record.get(i).unwrap_or_default();

    let owner = field(1)
        .trim()
        .parse::<i64>()
        .map_err(|_| RowError::Owner(field(1).to_string()))?;
    if field(2).is_empty() {
        return Err(RowError::EmptyName);
    }
    let guests = field(4)
        .trim()
        .parse::<u32>()
        .map_err(|_| RowError::Guests(field(4).to_string()))?;
    let confirmed = field(8)
        .trim()
        .parse::<bool>()
        .map_err(|_| RowError::Confirmed(field(8).to_string()))?;
    let created_at = DateTime::parse_from_rfc3339(field(9).trim())
        .map_err(|_| RowError::CreatedAt(field(9).to_string()))?
        .with_timezone(&Utc);

    Ok(Reservation {
        id: ReservationId::from(field(0)),
        owner: OwnerId(owner),
        name: field(2).to_string(),
        phone: field(3).to_string(),
        guests,
        date: field(5).to_string(),
        time: field(6).to_string(),
        comment: field(7).to_string(),
        confirmed,
        created_at,
    })
}

impl ReservationLog for CsvReservationLog {
    fn load(&self) -> Result<Vec<Reservation>, TablebookError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "reservation file missing, creating");
            self.create_with_header()?;
            return Ok(Vec::new());
        }

        let mut reservations = Vec::new();
        for (index, row) in self.raw_rows()?.iter().enumerate() {
            match from_record(row) {
                Ok(reservation) => reservations.push(reservation),
                Err(reason) => warn!(
                    path = %self.path.display(),
                    row = index + 2,
                    id = row.get(0).unwrap_or_default(),
                    %reason,
                    "skipping malformed reservation row"
                ),
            }
        }
        Ok(reservations)
    }

    fn append(&self, reservation: &Reservation) -> Result<(), TablebookError> {
        let needs_header = std::fs::metadata(&self.path).map_or(true, |m| m.len() == 0);
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = WriterBuilder::new().from_writer(file);
        if needs_header {
            writer.write_record(HEADER).map_err(TablebookError::storage)?;
        }
        writer
            .write_record(&to_record(reservation))
            .map_err(TablebookError::storage)?;
        writer.flush()?;
        Ok(())
    }

    fn replace(&self, reservation: &Reservation) -> Result<(), TablebookError> {
        let rows = self
            .raw_rows()?
            .into_iter()
            .map(|row| {
                if row.get(0) == Some(reservation.id.as_str()) {
                    to_record(reservation)
                } else {
                    row
                }
            })
            .collect::<Vec<_>>();
        self.rewrite(&rows)
    }

    fn remove(&self, id: &ReservationId) -> Result<(), TablebookError> {
        let rows = self
            .raw_rows()?
            .into_iter()
            .filter(|row| row.get(0) != Some(id.as_str()))
            .collect::<Vec<_>>();
        self.rewrite(&rows)
    }
}

#[async_trait]
impl PluginAdapter for CsvReservationLog {
    fn name(&self) -> &str {
        "csv"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TablebookError> {
        Ok(match std::fs::metadata(&self.path) {
            Ok(meta) if meta.is_file() && meta.permissions().readonly() => {
                HealthStatus::Degraded(format!("{} is read-only", self.path.display()))
            }
            Ok(meta) if meta.is_file() => HealthStatus::Healthy,
            Ok(_) => HealthStatus::Unhealthy(format!("{} is not a file", self.path.display())),
            Err(e) => HealthStatus::Unhealthy(format!("{}: {e}", self.path.display())),
        })
    }

    async fn shutdown(&self) -> Result<(), TablebookError> {
        Ok(())
    }
}
