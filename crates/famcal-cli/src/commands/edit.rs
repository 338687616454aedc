//! Edit command implementation.

use crate::cli::EditArgs;
use crate::commands::{open_store, parse_date, parse_id, parse_time};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chrono::{Local, NaiveDate};
use famcal_domain::traits::EventStore;
use famcal_domain::PersistedEvent;
use famcal_store::StoreError;

/// Execute the edit command.
pub fn execute_edit(args: EditArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let id = parse_id(&args.id)?;
    let mut store = open_store(config)?;
    let existing = store.get(id)?.ok_or(StoreError::NotFound(id))?;

    let updated = apply_edit(existing, &args, Local::now().date_naive())?;
    store.update(id, &updated.event, &updated.notes, updated.recurring)?;

    println!("{}", formatter.success(&format!("Event updated: {}", id)));
    println!("{}", formatter.format_events(&[updated])?);
    Ok(())
}

/// Overwrite the fields that were given on the command line.
fn apply_edit(mut stored: PersistedEvent, args: &EditArgs, today: NaiveDate) -> Result<PersistedEvent> {
    if let Some(title) = &args.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(CliError::InvalidInput("Title must not be empty".to_string()));
        }
        stored.event.title = title.to_string();
    }
    if let Some(date) = &args.date {
        stored.event.date = parse_date(date, today)?;
    }
    if let Some(time) = &args.time {
        stored.event.time = parse_time(time)?;
    }
    if let Some(person) = &args.person {
        let person = person.trim();
        if person.is_empty() {
            return Err(CliError::InvalidInput("Person must not be empty".to_string()));
        }
        stored.event.person = person.to_string();
    }
    if let Some(location) = &args.location {
        stored.event.location = location.trim().to_string();
    }
    if let Some(notes) = &args.notes {
        stored.notes = notes.clone();
    }
    if let Some(recurring) = args.recurring {
        stored.recurring = recurring.into();
    }
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RecurrenceArg;
    use chrono::NaiveDateTime;
    use famcal_domain::{EventId, EventTime, ExtractedEvent, Recurrence};

    fn stored() -> PersistedEvent {
        PersistedEvent {
            id: EventId::new(4),
            event: ExtractedEvent {
                title: "Dentist".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
                time: EventTime::new(15, 0).unwrap(),
                person: "Emma".to_string(),
                location: "Main St".to_string(),
            },
            notes: "bring card".to_string(),
            recurring: Recurrence::None,
            created_at: NaiveDateTime::parse_from_str("2026-01-10 12:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
        }
    }

    fn no_changes() -> EditArgs {
        EditArgs {
            id: "4".to_string(),
            title: None,
            date: None,
            time: None,
            person: None,
            location: None,
            notes: None,
            recurring: None,
        }
    }

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 14).unwrap()
    }

    #[test]
    fn test_no_flags_no_changes() {
        assert_eq!(apply_edit(stored(), &no_changes(), wednesday()).unwrap(), stored());
    }

    #[test]
    fn test_only_given_fields_change() {
        let args = EditArgs {
            time: Some("4:30pm".to_string()),
            recurring: Some(RecurrenceArg::Monthly),
            ..no_changes()
        };
        let edited = apply_edit(stored(), &args, wednesday()).unwrap();
        assert_eq!(edited.event.time.to_string(), "1630");
        assert_eq!(edited.recurring, Recurrence::Monthly);
        assert_eq!(edited.event.title, "Dentist");
        assert_eq!(edited.notes, "bring card");
        assert_eq!(edited.created_at, stored().created_at);
    }

    #[test]
    fn test_blank_person_rejected() {
        let args = EditArgs {
            person: Some(" ".to_string()),
            ..no_changes()
        };
        assert!(apply_edit(stored(), &args, wednesday()).is_err());
    }
}
