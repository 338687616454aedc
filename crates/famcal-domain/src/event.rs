//! Event module - the unit the whole pipeline produces

use crate::recurrence::Recurrence;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp layout used for `created_at` in the store
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Error returned when a value cannot be an [`EventTime`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// Hour outside 0..=23
    HourOutOfRange(u32),
    /// Minute outside 0..=59
    MinuteOutOfRange(u32),
    /// Text is not exactly four ASCII digits
    NotHhmm(String),
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeError::HourOutOfRange(h) => write!(f, "hour {} out of range [0, 23]", h),
            TimeError::MinuteOutOfRange(m) => write!(f, "minute {} out of range [0, 59]", m),
            TimeError::NotHhmm(s) => write!(f, "'{}' is not a 4-digit HHMM time", s),
        }
    }
}

impl std::error::Error for TimeError {}

/// Time of day in 24-hour form, rendered as four digits (`HHMM`)
///
/// The constructor is the only way in, so every value satisfies
/// hour in `[0, 23]` and minute in `[0, 59]`.
///
/// # Examples
///
/// ```
/// use famcal_domain::EventTime;
///
/// let t = EventTime::new(18, 30).unwrap();
/// assert_eq!(t.to_string(), "1830");
/// assert!(EventTime::new(24, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventTime {
    hour: u32,
    minute: u32,
}

impl EventTime {
    /// The time used whenever nothing better is known
    pub const DEFAULT: EventTime = EventTime { hour: 9, minute: 0 };

    /// Create a time, rejecting out-of-range components
    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(TimeError::MinuteOutOfRange(minute));
        }
        Ok(Self { hour, minute })
    }

    /// Hour component (0-23)
    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Minute component (0-59)
    pub fn minute(&self) -> u32 {
        self.minute
    }
}

impl Default for EventTime {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.hour, self.minute)
    }
}

impl FromStr for EventTime {
    type Err = TimeError;

    /// Parse strict `HHMM` text
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimeError::NotHhmm(s.to_string()));
        }
        let hour = s[..2].parse().map_err(|_| TimeError::NotHhmm(s.to_string()))?;
        let minute = s[2..].parse().map_err(|_| TimeError::NotHhmm(s.to_string()))?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for EventTime {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EventTime> for String {
    fn from(time: EventTime) -> Self {
        time.to_string()
    }
}

/// A calendar event extracted from an email
///
/// Produced by exactly one of the two extraction paths. There is deliberately
/// no confidence field: every accepted event is treated the same downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEvent {
    /// Short event title
    pub title: String,

    /// Calendar date (serialized as `YYYY-MM-DD`)
    pub date: NaiveDate,

    /// Start time (serialized as `HHMM`)
    pub time: EventTime,

    /// Who the event is for; never empty
    pub person: String,

    /// Where it happens; may be empty
    pub location: String,
}

impl ExtractedEvent {
    /// Whether the event carries enough to be written to the store
    ///
    /// The date is typed and therefore always present; only the title can be
    /// missing.
    pub fn is_persistable(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Identifier of a stored event: a positive integer, monotonic within a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(u64);

impl EventId {
    /// Wrap a raw id value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The id following this one, or `None` once the id space is exhausted
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u64>() {
            Ok(0) => Err("event id must be positive".to_string()),
            Ok(v) => Ok(Self(v)),
            Err(e) => Err(format!("Invalid event id '{}': {}", s, e)),
        }
    }
}

/// An event as it lives in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedEvent {
    /// Store-assigned identifier
    pub id: EventId,

    /// The event itself
    #[serde(flatten)]
    pub event: ExtractedEvent,

    /// Free-form notes
    pub notes: String,

    /// Recurrence rule
    pub recurring: Recurrence,

    /// When the row was first written (local clock)
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> ExtractedEvent {
        ExtractedEvent {
            title: "Yoga".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 17).unwrap(),
            time: EventTime::new(9, 0).unwrap(),
            person: "Sarah".to_string(),
            location: String::new(),
        }
    }

    #[test]
    fn test_event_time_display_pads() {
        assert_eq!(EventTime::new(0, 5).unwrap().to_string(), "0005");
        assert_eq!(EventTime::new(23, 59).unwrap().to_string(), "2359");
        assert_eq!(EventTime::DEFAULT.to_string(), "0900");
    }

    #[test]
    fn test_event_time_rejects_out_of_range() {
        assert_eq!(EventTime::new(24, 0), Err(TimeError::HourOutOfRange(24)));
        assert_eq!(EventTime::new(12, 60), Err(TimeError::MinuteOutOfRange(60)));
    }

    #[test]
    fn test_event_time_parse() {
        assert_eq!("1830".parse::<EventTime>().unwrap(), EventTime::new(18, 30).unwrap());
        assert!("830".parse::<EventTime>().is_err());
        assert!("18:30".parse::<EventTime>().is_err());
        assert!("2500".parse::<EventTime>().is_err());
    }

    #[test]
    fn test_event_serializes_as_strings() {
        let json = serde_json::to_value(sample_event()).unwrap();
        assert_eq!(json["date"], "2026-01-17");
        assert_eq!(json["time"], "0900");
        assert!(json.get("confidence").is_none());
    }

    #[test]
    fn test_is_persistable() {
        let mut event = sample_event();
        assert!(event.is_persistable());
        event.title = "   ".to_string();
        assert!(!event.is_persistable());
    }

    #[test]
    fn test_event_id_parse() {
        assert_eq!("7".parse::<EventId>().unwrap(), EventId::new(7));
        assert!("0".parse::<EventId>().is_err());
        assert!("abc".parse::<EventId>().is_err());
        assert_eq!(EventId::new(7).next(), Some(EventId::new(8)));
        assert_eq!(EventId::new(u64::MAX).next(), None);
    }
}
