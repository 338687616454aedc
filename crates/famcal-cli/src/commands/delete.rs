//! Delete command implementation.

use crate::cli::DeleteArgs;
use crate::commands::{open_store, parse_id};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use famcal_domain::traits::EventStore;
use famcal_domain::EventId;
use std::io::{self, Write};

/// Execute the delete command.
pub fn execute_delete(args: DeleteArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let ids = args
        .ids
        .iter()
        .map(|id| parse_id(id))
        .collect::<Result<Vec<EventId>>>()?;

    let mut store = open_store(config)?;

    // Confirm deletion unless --yes is specified
    if !args.yes {
        println!("About to delete {} event(s):", ids.len());
        for id in &ids {
            match store.get(*id)? {
                Some(stored) => println!(
                    "  - {}: {} on {}",
                    id, stored.event.title, stored.event.date
                ),
                None => println!("  - {} (not found)", id),
            }
        }
        print!("Continue? [y/N] ");
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !response.trim().eq_ignore_ascii_case("y") {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    let mut deleted = 0;
    for id in ids {
        match store.delete(id) {
            Ok(()) => deleted += 1,
            Err(e) => println!("{}", formatter.error(&e.to_string())),
        }
    }

    println!("{}", formatter.bulk_result("Deleted", deleted));
    Ok(())
}
