//! Add command implementation.

use crate::cli::AddArgs;
use crate::commands::{open_store, parse_date, parse_time};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chrono::{Local, NaiveDate};
use famcal_domain::traits::EventStore;
use famcal_domain::{EventTime, ExtractedEvent};

/// Execute the add command.
pub fn execute_add(args: AddArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let event = build_event(&args, config, Local::now().date_naive())?;
    let mut store = open_store(config)?;
    let id = store.append(&event, &args.notes, args.recurring.into())?;
    println!("{}", formatter.event_saved(&id));
    Ok(())
}

/// Turn the arguments into an event, resolving phrases against `today`.
fn build_event(args: &AddArgs, config: &Config, today: NaiveDate) -> Result<ExtractedEvent> {
    let title = args.title.trim();
    if title.is_empty() {
        return Err(CliError::InvalidInput("Title must not be empty".to_string()));
    }

    let time = match &args.time {
        Some(text) => parse_time(text)?,
        None => EventTime::DEFAULT,
    };
    let person = args
        .person
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(&config.extractor.default_person);

    Ok(ExtractedEvent {
        title: title.to_string(),
        date: parse_date(&args.date, today)?,
        time,
        person: person.to_string(),
        location: args.location.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RecurrenceArg;

    fn args(title: &str) -> AddArgs {
        AddArgs {
            title: title.to_string(),
            date: "today".to_string(),
            time: None,
            person: None,
            location: String::new(),
            notes: String::new(),
            recurring: RecurrenceArg::None,
        }
    }

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 14).unwrap()
    }

    #[test]
    fn test_defaults() {
        let event = build_event(&args("Yoga"), &Config::default(), wednesday()).unwrap();
        assert_eq!(event.date, wednesday());
        assert_eq!(event.time.to_string(), "0900");
        assert_eq!(event.person, "Family");
        assert_eq!(event.location, "");
    }

    #[test]
    fn test_phrases_resolved() {
        let add = AddArgs {
            date: "friday".to_string(),
            time: Some("7pm".to_string()),
            person: Some("Emma".to_string()),
            location: " Gym ".to_string(),
            ..args("Recital")
        };
        let event = build_event(&add, &Config::default(), wednesday()).unwrap();
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2026, 1, 16).unwrap());
        assert_eq!(event.time.to_string(), "1900");
        assert_eq!(event.person, "Emma");
        assert_eq!(event.location, "Gym");
    }

    #[test]
    fn test_blank_title_rejected() {
        let result = build_event(&args("  "), &Config::default(), wednesday());
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_bad_time_rejected() {
        let add = AddArgs {
            time: Some("31:15".to_string()),
            ..args("Yoga")
        };
        assert!(build_event(&add, &Config::default(), wednesday()).is_err());
    }
}
