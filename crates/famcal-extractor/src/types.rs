//! Intermediate types for event extraction

use crate::config::ExtractorConfig;
use crate::datetime::{resolve_date, resolve_time};
use crate::error::ExtractorError;
use chrono::NaiveDate;
use famcal_domain::{EventTime, ExtractedEvent};
use serde_json::Value;

/// An event as found in the source, before normalization
///
/// Every field is optional; [`EventDraft::normalize`] fills each one with a
/// defined default. Both extraction paths produce a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    /// Event title
    pub title: Option<String>,

    /// Date phrase, free-form
    pub date: Option<String>,

    /// Time phrase, free-form
    pub time: Option<String>,

    /// Person named in the source
    pub person: Option<String>,

    /// Location named in the source
    pub location: Option<String>,
}

impl EventDraft {
    /// Read a draft from a parsed model reply
    ///
    /// Values may be strings or numbers (`"time": 1830`); `null` and other
    /// kinds count as absent. Unknown keys such as `recurring` are ignored.
    pub fn from_json(json: &Value) -> Result<Self, ExtractorError> {
        let obj = json.as_object().ok_or_else(|| {
            ExtractorError::InvalidFormat(format!("Expected JSON object, got {}", kind(json)))
        })?;

        let field = |key: &str| match obj.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        Ok(Self {
            title: field("title"),
            date: field("date"),
            time: field("time"),
            person: field("person"),
            location: field("location"),
        })
    }

    /// Whether the rule path found enough to skip the model
    pub fn has_title_and_date(&self) -> bool {
        self.title.is_some() && self.date.is_some()
    }

    /// Fill every field with its default and normalize date and time
    ///
    /// Date and time are re-resolved even when already well-formed, which is
    /// a no-op on `YYYY-MM-DD` and `HHMM`. A blank person falls back to
    /// `sender_name`; a missing title becomes the configured placeholder.
    pub fn normalize(
        self,
        today: NaiveDate,
        sender_name: &str,
        config: &ExtractorConfig,
    ) -> ExtractedEvent {
        let date = match self.date {
            Some(text) => resolve_date(&text, today),
            None => today,
        };
        let time = match self.time {
            Some(text) => resolve_time(&text),
            None => EventTime::DEFAULT,
        };
        let person = self
            .person
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| sender_name.to_string());

        ExtractedEvent {
            title: self
                .title
                .unwrap_or_else(|| config.untitled_event.clone()),
            date,
            time,
            person,
            location: self.location.unwrap_or_default(),
        }
    }
}

impl From<&ExtractedEvent> for EventDraft {
    fn from(event: &ExtractedEvent) -> Self {
        Self {
            title: Some(event.title.clone()),
            date: Some(event.date.to_string()),
            time: Some(event.time.to_string()),
            person: Some(event.person.clone()),
            location: Some(event.location.clone()),
        }
    }
}

fn kind(json: &Value) -> &'static str {
    match json {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
