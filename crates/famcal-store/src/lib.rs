//! famcal Storage Layer
//!
//! Implements the `EventStore` trait on a flat CSV file.
//!
//! # Format
//!
//! One header row, then one event per row:
//!
//! ```text
//! id,date,time,title,person,location,notes,recurring,created_at
//! 1,2026-01-17,0900,Yoga,Sarah,,,none,2026-01-14 08:12:44
//! ```
//!
//! Ids are positive and monotonic: the next id is one past the largest id in
//! the file. Rows that cannot be read as events are skipped when listing but
//! survive rewrites untouched.
//!
//! # Examples
//!
//! ```no_run
//! use famcal_store::CsvStore;
//!
//! let store = CsvStore::open("calendar.csv").unwrap();
//! // Store is now ready for event operations
//! ```

#![warn(missing_docs)]

use chrono::{Local, NaiveDate, NaiveDateTime};
use famcal_domain::traits::EventStore;
use famcal_domain::{
    EventId, EventTime, ExtractedEvent, PersistedEvent, Recurrence, CREATED_AT_FORMAT,
};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Column order of the calendar file
pub const CSV_COLUMNS: [&str; 9] = [
    "id",
    "date",
    "time",
    "title",
    "person",
    "location",
    "notes",
    "recurring",
    "created_at",
];

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No event with this id
    #[error("Event not found: {0}")]
    NotFound(EventId),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// One row exactly as it sits in the file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct CsvRow {
    id: String,
    date: String,
    time: String,
    title: String,
    person: String,
    location: String,
    notes: String,
    recurring: String,
    created_at: String,
}

impl CsvRow {
    fn new(
        id: EventId,
        event: &ExtractedEvent,
        notes: &str,
        recurring: Recurrence,
        created_at: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            date: event.date.to_string(),
            time: event.time.to_string(),
            title: event.title.clone(),
            person: event.person.clone(),
            location: event.location.clone(),
            notes: notes.to_string(),
            recurring: recurring.as_str().to_string(),
            created_at: created_at.to_string(),
        }
    }

    fn id(&self) -> Option<EventId> {
        self.id.parse().ok()
    }

    fn to_persisted(&self) -> Result<PersistedEvent, StoreError> {
        let invalid = |field: &str, value: &str| {
            StoreError::InvalidData(format!("row {}: bad {} '{}'", self.id, field, value))
        };

        let id = self.id().ok_or_else(|| invalid("id", &self.id))?;
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|_| invalid("date", &self.date))?;
        let time: EventTime = self.time.parse().map_err(|_| invalid("time", &self.time))?;
        let recurring =
            Recurrence::parse(&self.recurring).ok_or_else(|| invalid("recurring", &self.recurring))?;
        let created_at = NaiveDateTime::parse_from_str(&self.created_at, CREATED_AT_FORMAT)
            .map_err(|_| invalid("created_at", &self.created_at))?;

        Ok(PersistedEvent {
            id,
            event: ExtractedEvent {
                title: self.title.clone(),
                date,
                time,
                person: self.person.clone(),
                location: self.location.clone(),
            },
            notes: self.notes.clone(),
            recurring,
            created_at,
        })
    }
}

/// CSV-file implementation of EventStore
///
/// Every operation re-reads the file, so edits made by hand between calls
/// are picked up. Writes assume a single writer.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Open the store at `path`, creating the file (and its directory) with a
    /// header row if it does not exist yet
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.create_if_missing()?;
        Ok(store)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The id the next append will receive
    pub fn next_id(&self) -> Result<EventId, StoreError> {
        let max = self
            .read_rows()?
            .iter()
            .filter_map(CsvRow::id)
            .max();
        match max {
            None => Ok(EventId::new(1)),
            Some(id) => id
                .next()
                .ok_or_else(|| StoreError::InvalidData(format!("no id follows {}", id))),
        }
    }

    /// Look up one event
    pub fn get(&self, id: EventId) -> Result<Option<PersistedEvent>, StoreError> {
        Ok(self.list_all()?.into_iter().find(|e| e.id == id))
    }

    fn create_if_missing(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(CSV_COLUMNS)?;
        writer.flush()?;
        info!("Created calendar file {}", self.path.display());
        Ok(())
    }

    fn read_rows(&self) -> Result<Vec<CsvRow>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }

    /// Replace the file contents; written to a sibling file first, then renamed
    fn write_rows(&self, rows: &[CsvRow]) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp)?;
            writer.write_record(CSV_COLUMNS)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl EventStore for CsvStore {
    type Error = StoreError;

    fn append(
        &mut self,
        event: &ExtractedEvent,
        notes: &str,
        recurring: Recurrence,
    ) -> Result<EventId, Self::Error> {
        self.create_if_missing()?;
        let id = self.next_id()?;
        let created_at = Local::now().format(CREATED_AT_FORMAT).to_string();

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(CsvRow::new(id, event, notes, recurring, &created_at))?;
        writer.flush()?;

        info!(
            "Created event {}: {} on {} at {}",
            id, event.title, event.date, event.time
        );
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<PersistedEvent>, Self::Error> {
        let events = self
            .read_rows()?
            .iter()
            .filter_map(|row| match row.to_persisted() {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!("Skipping unreadable row in {}: {}", self.path.display(), e);
                    None
                }
            })
            .collect();
        Ok(events)
    }

    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<PersistedEvent>, Self::Error> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|e| e.event.date == date)
            .collect())
    }

    fn update(
        &mut self,
        id: EventId,
        event: &ExtractedEvent,
        notes: &str,
        recurring: Recurrence,
    ) -> Result<(), Self::Error> {
        let mut rows = self.read_rows()?;
        let row = rows
            .iter_mut()
            .find(|row| row.id() == Some(id))
            .ok_or(StoreError::NotFound(id))?;

        let created_at = if row.created_at.is_empty() {
            Local::now().format(CREATED_AT_FORMAT).to_string()
        } else {
            row.created_at.clone()
        };
        *row = CsvRow::new(id, event, notes, recurring, &created_at);

        self.write_rows(&rows)?;
        info!("Edited event {}: {}", id, event.title);
        Ok(())
    }

    fn delete(&mut self, id: EventId) -> Result<(), Self::Error> {
        let mut rows = self.read_rows()?;
        let before = rows.len();
        rows.retain(|row| row.id() != Some(id));
        if rows.len() == before {
            return Err(StoreError::NotFound(id));
        }

        self.write_rows(&rows)?;
        info!("Deleted event {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_to_persisted() {
        let row = CsvRow {
            id: "3".to_string(),
            date: "2026-01-17".to_string(),
            time: "0900".to_string(),
            title: "Yoga".to_string(),
            person: "Sarah".to_string(),
            location: String::new(),
            notes: String::new(),
            recurring: "weekly".to_string(),
            created_at: "2026-01-14 08:12:44".to_string(),
        };
        let event = row.to_persisted().unwrap();
        assert_eq!(event.id, EventId::new(3));
        assert_eq!(event.recurring, Recurrence::Weekly);
        assert_eq!(event.event.time.to_string(), "0900");
    }

    #[test]
    fn test_blank_recurring_reads_as_none() {
        let row = CsvRow {
            id: "1".to_string(),
            date: "2026-01-17".to_string(),
            time: "0900".to_string(),
            created_at: "2026-01-14 08:12:44".to_string(),
            ..CsvRow::default()
        };
        assert_eq!(row.to_persisted().unwrap().recurring, Recurrence::None);
    }

    #[test]
    fn test_bad_row_is_invalid_data() {
        let row = CsvRow {
            id: "x".to_string(),
            ..CsvRow::default()
        };
        assert!(matches!(row.to_persisted(), Err(StoreError::InvalidData(_))));

        let row = CsvRow {
            id: "2".to_string(),
            date: "2026-01-17".to_string(),
            time: "2500".to_string(),
            ..CsvRow::default()
        };
        assert!(matches!(row.to_persisted(), Err(StoreError::InvalidData(_))));
    }
}
