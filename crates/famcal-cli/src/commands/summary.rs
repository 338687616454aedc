//! Summary command implementation.

use crate::cli::SummaryArgs;
use crate::commands::{open_store, parse_date};
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use chrono::Local;
use famcal_domain::traits::EventStore;
use famcal_mail::{compose_summary, SmtpSender};

/// Execute the summary command.
pub fn execute_summary(args: SummaryArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let today = Local::now().date_naive();
    let date = match &args.date {
        Some(text) => parse_date(text, today)?,
        None => today,
    };

    let store = open_store(config)?;
    let events = store.list_by_date(date)?;
    let Some(summary) = compose_summary(&events, date) else {
        println!("{}", formatter.info(&format!("No events on {}", date)));
        return Ok(());
    };

    if args.send {
        SmtpSender::new(config.smtp.clone()).send(&summary)?;
        println!(
            "{}",
            formatter.success(&format!(
                "Summary sent to {}",
                config.smtp.recipients.join(", ")
            ))
        );
    } else if formatter.format() == OutputFormat::Json {
        println!("{}", formatter.format_events(&events)?);
    } else {
        println!("Subject: {}\n", summary.subject);
        print!("{}", summary.body);
    }

    Ok(())
}
