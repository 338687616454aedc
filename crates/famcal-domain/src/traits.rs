//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction core and its
//! collaborators. Infrastructure implementations live in other crates.

use crate::{EventId, ExtractedEvent, PersistedEvent, RawEmail, Recurrence};
use chrono::NaiveDate;

/// Trait for text-generation backends
///
/// Implemented by the infrastructure layer (famcal-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion in the backend's JSON output mode
    fn generate_json(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Trait for the flat event store
///
/// Implemented by the infrastructure layer (famcal-store). Assumes a single
/// writer; ids are monotonically increasing within a store.
pub trait EventStore {
    /// Error type for store operations
    type Error;

    /// Append an event and return its new id
    fn append(
        &mut self,
        event: &ExtractedEvent,
        notes: &str,
        recurring: Recurrence,
    ) -> Result<EventId, Self::Error>;

    /// All stored events in insertion order
    fn list_all(&self) -> Result<Vec<PersistedEvent>, Self::Error>;

    /// Events on a given date
    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<PersistedEvent>, Self::Error>;

    /// Replace an event's fields, keeping its id and creation time
    fn update(
        &mut self,
        id: EventId,
        event: &ExtractedEvent,
        notes: &str,
        recurring: Recurrence,
    ) -> Result<(), Self::Error>;

    /// Remove an event
    fn delete(&mut self, id: EventId) -> Result<(), Self::Error>;
}

/// Trait for mailboxes supplying unseen messages
///
/// Implemented by the infrastructure layer (famcal-mail)
pub trait MailSource {
    /// Error type for mailbox operations
    type Error;

    /// Fetch all currently unseen messages
    fn fetch_unseen(&mut self) -> Result<Vec<RawEmail>, Self::Error>;

    /// Acknowledge a message so it is not fetched again
    fn mark_seen(&mut self, email: &RawEmail) -> Result<(), Self::Error>;
}
