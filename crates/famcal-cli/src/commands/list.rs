//! List command implementation.

use crate::cli::ListArgs;
use crate::commands::{open_store, parse_date};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use chrono::Local;
use famcal_domain::traits::EventStore;
use famcal_domain::PersistedEvent;

/// Execute the list command.
pub fn execute_list(args: ListArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = open_store(config)?;
    let events = match &args.date {
        Some(text) => store.list_by_date(parse_date(text, Local::now().date_naive())?)?,
        None => store.list_all()?,
    };

    let events = filter_events(events, args.person.as_deref(), args.limit);
    println!("{}", formatter.format_events(&events)?);
    Ok(())
}

/// Keep events for `person` (case-insensitive), sorted by date and time.
fn filter_events(
    mut events: Vec<PersistedEvent>,
    person: Option<&str>,
    limit: Option<usize>,
) -> Vec<PersistedEvent> {
    if let Some(person) = person {
        let wanted = person.trim().to_lowercase();
        events.retain(|e| e.event.person.to_lowercase() == wanted);
    }
    events.sort_by_key(|e| (e.event.date, e.event.time, e.id));
    if let Some(limit) = limit {
        events.truncate(limit);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use famcal_domain::{EventId, EventTime, ExtractedEvent, Recurrence};

    fn stored(id: u64, day: u32, hour: u32, person: &str) -> PersistedEvent {
        PersistedEvent {
            id: EventId::new(id),
            event: ExtractedEvent {
                title: format!("Event {}", id),
                date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
                time: EventTime::new(hour, 0).unwrap(),
                person: person.to_string(),
                location: String::new(),
            },
            notes: String::new(),
            recurring: Recurrence::None,
            created_at: NaiveDateTime::parse_from_str("2026-01-01 00:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
        }
    }

    #[test]
    fn test_sorted_chronologically() {
        let events = vec![
            stored(1, 20, 9, "Sarah"),
            stored(2, 18, 15, "Emma"),
            stored(3, 18, 8, "Sarah"),
        ];
        let ids: Vec<u64> = filter_events(events, None, None)
            .iter()
            .map(|e| e.id.value())
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_person_filter_and_limit() {
        let events = vec![
            stored(1, 20, 9, "Sarah"),
            stored(2, 18, 15, "Emma"),
            stored(3, 18, 8, "Sarah"),
        ];
        let filtered = filter_events(events, Some(" sarah "), Some(1));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, EventId::new(3));
    }
}
