//! Parse command implementation.

use crate::cli::ParseArgs;
use crate::commands::open_store;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chrono::{Local, NaiveDate};
use famcal_domain::traits::EventStore;
use famcal_domain::{RawEmail, Recurrence};
use famcal_extractor::Extractor;
use famcal_mail::parse_message;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Execute the parse command.
pub fn execute_parse(args: ParseArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let email = read_email(&args)?;
    let today = match &args.today {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| {
            CliError::InvalidInput(format!("Invalid --today '{}': {}", text, e))
        })?,
        None => Local::now().date_naive(),
    };

    let extractor = Extractor::new(
        config.ollama.provider()?,
        config.sender_directory(),
        config.extractor.clone(),
    );
    let event = if args.rules_only {
        extractor.try_rules(&email, today)
    } else {
        extractor.extract_at(&email, today)
    };

    let Some(event) = event else {
        println!("{}", formatter.warning("No event found"));
        return Ok(());
    };
    println!("{}", formatter.format_extracted(&event)?);

    if args.save {
        if !event.is_persistable() {
            println!("{}", formatter.warning("Event has no title, not saved"));
            return Ok(());
        }
        let mut store = open_store(config)?;
        let id = store.append(&event, "", Recurrence::None)?;
        println!("{}", formatter.event_saved(&id));
    }

    Ok(())
}

/// Build the email from a message file or from plain text on stdin.
fn read_email(args: &ParseArgs) -> Result<RawEmail> {
    let mut email = match &args.file {
        Some(path) => read_message_file(Path::new(path))?,
        None => {
            let mut body = String::new();
            io::stdin().read_to_string(&mut body)?;
            RawEmail::new(body, "")
        }
    };

    if !args.from.is_empty() {
        email.sender_address = args.from.clone();
    }
    if let Some(subject) = &args.subject {
        email.subject = Some(subject.clone());
    }
    Ok(email)
}

/// Parse an RFC 5322 message file; the file name serves as the uid.
fn read_message_file(path: &Path) -> Result<RawEmail> {
    let bytes = fs::read(path)?;
    let uid = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(parse_message(uid, &bytes)?)
}
