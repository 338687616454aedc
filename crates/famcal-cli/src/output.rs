//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use famcal_domain::{EventId, ExtractedEvent, PersistedEvent};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format stored events.
    pub fn format_events(&self, events: &[PersistedEvent]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(events)?),
            OutputFormat::Table => Ok(self.format_events_table(events)),
            OutputFormat::Quiet => Ok(events
                .iter()
                .map(|e| e.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a freshly extracted (not yet stored) event.
    pub fn format_extracted(&self, event: &ExtractedEvent) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(event)?),
            OutputFormat::Quiet => Ok(format!("{} {} {}", event.date, event.time, event.title)),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (field, value) in [
                    ("Title", event.title.clone()),
                    ("Date", event.date.to_string()),
                    ("Time", event.time.to_string()),
                    ("Person", event.person.clone()),
                    ("Location", event.location.clone()),
                ] {
                    builder.push_record([field.to_string(), value]);
                }

                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
        }
    }

    fn format_events_table(&self, events: &[PersistedEvent]) -> String {
        if events.is_empty() {
            return self.colorize("No events found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record([
            "ID", "Date", "Time", "Title", "Person", "Location", "Recurring", "Notes",
        ]);

        for stored in events {
            let event = &stored.event;
            builder.push_record([
                stored.id.to_string(),
                event.date.format("%a %Y-%m-%d").to_string(),
                event.time.to_string(),
                event.title.clone(),
                event.person.clone(),
                event.location.clone(),
                stored.recurring.to_string(),
                stored.notes.clone(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format the result of storing an event.
    pub fn event_saved(&self, id: &EventId) -> String {
        match self.format {
            OutputFormat::Quiet => id.to_string(),
            _ => self.success(&format!("Event saved: {}", id)),
        }
    }

    /// Format bulk operation result.
    pub fn bulk_result(&self, operation: &str, count: usize) -> String {
        self.success(&format!("{} {} event(s)", operation, count))
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use famcal_domain::{EventTime, Recurrence};

    fn create_test_event() -> PersistedEvent {
        PersistedEvent {
            id: EventId::new(7),
            event: ExtractedEvent {
                title: "Soccer practice".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 1, 17).unwrap(),
                time: EventTime::new(16, 0).unwrap(),
                person: "Emma".to_string(),
                location: "Field 3".to_string(),
            },
            notes: String::new(),
            recurring: Recurrence::Weekly,
            created_at: NaiveDateTime::parse_from_str("2026-01-14 08:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
        }
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_events(&[create_test_event()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["title"], "Soccer practice");
        assert_eq!(value[0]["date"], "2026-01-17");
        assert_eq!(value[0]["time"], "1600");
        assert_eq!(value[0]["recurring"], "weekly");
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_events(&[create_test_event()]).unwrap();
        assert_eq!(output, "7");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_events(&[create_test_event()]).unwrap();
        assert!(output.contains("Title"));
        assert!(output.contains("Sat 2026-01-17"));
        assert!(output.contains("Field 3"));
    }

    #[test]
    fn test_empty_events() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_events(&[]).unwrap();
        assert!(output.contains("No events found"));
    }

    #[test]
    fn test_extracted_event_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_extracted(&create_test_event().event)
            .unwrap();
        assert!(output.contains("Person"));
        assert!(output.contains("Emma"));
        assert!(output.contains("1600"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.event_saved(&EventId::new(3)), "✓ Event saved: 3");
    }
}
