//! famcal Domain Layer
//!
//! This crate contains the shared vocabulary of the email-to-calendar system.
//! It carries only the primitives every other layer needs (calendar dates and
//! serialization) and defines the value objects and trait interfaces that the
//! infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **RawEmail**: An unseen message handed over by the mail source, consumed once
//! - **ExtractedEvent**: A normalized calendar event (date, HHMM time, title, person, location)
//! - **PersistedEvent**: An extracted event plus store bookkeeping (id, notes, recurrence)
//! - **SenderDirectory**: Read-only address → display-name mapping loaded at startup
//!
//! ## Architecture
//!
//! - Pure value types only, no I/O
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod email;
pub mod event;
pub mod recurrence;
pub mod sender;
pub mod traits;

// Re-exports for convenience
pub use email::RawEmail;
pub use event::{
    EventId, EventTime, ExtractedEvent, PersistedEvent, TimeError, CREATED_AT_FORMAT,
};
pub use recurrence::Recurrence;
pub use sender::{normalize_address, SenderDirectory};
