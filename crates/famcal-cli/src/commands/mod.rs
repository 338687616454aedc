//! Command implementations.

pub mod add;
pub mod configure;
pub mod delete;
pub mod edit;
pub mod list;
pub mod parse;
pub mod run;
pub mod summary;

pub use self::add::execute_add;
pub use self::configure::execute_config;
pub use self::delete::execute_delete;
pub use self::edit::execute_edit;
pub use self::list::execute_list;
pub use self::parse::execute_parse;
pub use self::run::execute_run;
pub use self::summary::execute_summary;

use crate::config::Config;
use crate::error::{CliError, Result};
use chrono::NaiveDate;
use famcal_domain::{EventId, EventTime};
use famcal_extractor::{try_resolve_date, try_resolve_time};
use famcal_store::CsvStore;

/// Open the configured event store, creating it if needed.
pub(crate) fn open_store(config: &Config) -> Result<CsvStore> {
    Ok(CsvStore::open(config.events_path())?)
}

/// Parse a user-supplied date with the same resolver the extractor uses.
pub(crate) fn parse_date(text: &str, today: NaiveDate) -> Result<NaiveDate> {
    try_resolve_date(text, today)
        .map_err(|e| CliError::InvalidInput(format!("Invalid date '{}': {}", text, e)))
}

/// Parse a user-supplied time (`1830`, `6:30pm`, ...).
pub(crate) fn parse_time(text: &str) -> Result<EventTime> {
    try_resolve_time(text)
        .map_err(|e| CliError::InvalidInput(format!("Invalid time '{}': {}", text, e)))
}

/// Parse an event id.
pub(crate) fn parse_id(text: &str) -> Result<EventId> {
    text.parse::<EventId>().map_err(CliError::InvalidInput)
}
