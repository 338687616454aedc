//! famcal Extractor
//!
//! Turns one unstructured email into at most one calendar event.
//!
//! # Overview
//!
//! Two paths, tried in order:
//!
//! 1. **Rule extraction**: explicit `Event:` / `Date:` / `Time:` /
//!    `Person:` / `Location:` lines. Deterministic and free.
//! 2. **Model extraction**: the cleaned body goes into a fixed prompt, the
//!    model's JSON reply is sliced out of any surrounding prose, repaired if
//!    truncated, and normalized.
//!
//! # Architecture
//!
//! ```text
//! RawEmail → rules ─────────────────────────────→ EventDraft → normalize → ExtractedEvent
//!          ↘ clean → prompt → LLM → slice/repair ↗
//! ```
//!
//! Date and time phrases are normalized by a best-effort resolver that
//! always yields a value, so every accepted event satisfies the
//! `ExtractedEvent` invariants.
//!
//! # Example Usage
//!
//! ```
//! use famcal_extractor::{Extractor, ExtractorConfig};
//! use famcal_domain::{RawEmail, SenderDirectory};
//! use famcal_llm::MockProvider;
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//!
//! let directory = Arc::new(SenderDirectory::new([("sarah@example.com", "Sarah")]));
//! let extractor = Extractor::new(MockProvider::default(), directory, ExtractorConfig::default());
//!
//! let email = RawEmail::new("Event: Yoga\nDate: this saturday\nTime: 9am", "sarah@example.com");
//! let today = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
//!
//! let event = extractor.extract_at(&email, today).unwrap();
//! assert_eq!(event.date.to_string(), "2026-01-17");
//! assert_eq!(event.person, "Sarah");
//! ```

#![warn(missing_docs)]

mod cleaner;
mod config;
mod datetime;
mod error;
mod extractor;
mod parser;
mod prompt;
mod repair;
mod rules;
mod types;


pub use cleaner::{clean_email_body, CLEAN_LIMIT, RAW_LIMIT};
pub use config::ExtractorConfig;
pub use datetime::{
    parse_weekday, resolve_date, resolve_time, try_resolve_date, try_resolve_time, weekday_date,
    weekday_name, WEEKDAYS,
};
pub use error::{ExtractorError, SoftFailure};
pub use extractor::Extractor;
pub use parser::{parse_model_reply, slice_json_object};
pub use prompt::PromptBuilder;
pub use repair::{repair_truncated_json, repair_with_limit, MAX_REPAIRS};
pub use rules::{scan_markers, try_rules};
pub use types::EventDraft;
