//! CLI command definitions and argument parsing.

use crate::config::Overrides;
use clap::{Parser, Subcommand};

/// famcal - Turn family emails into calendar events.
#[derive(Debug, Parser)]
#[command(name = "famcal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Ollama API endpoint
    #[arg(long, global = true, env = "FAMCAL_OLLAMA_ENDPOINT")]
    pub ollama_endpoint: Option<String>,

    /// Ollama model name
    #[arg(long, global = true, env = "FAMCAL_OLLAMA_MODEL")]
    pub ollama_model: Option<String>,

    /// Mail account user (IMAP and SMTP)
    #[arg(long, global = true, env = "FAMCAL_MAIL_USER")]
    pub mail_user: Option<String>,

    /// Mail account password (IMAP and SMTP)
    #[arg(long, global = true, env = "FAMCAL_MAIL_PASSWORD", hide_env_values = true)]
    pub mail_password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Config overrides carried by the global flags.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            ollama_endpoint: self.ollama_endpoint.clone(),
            ollama_model: self.ollama_model.clone(),
            mail_user: self.mail_user.clone(),
            mail_password: self.mail_password.clone(),
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll the mailbox and send the daily summary until interrupted
    Run(RunArgs),

    /// Extract an event from a single email
    Parse(ParseArgs),

    /// List stored events
    List(ListArgs),

    /// Add an event by hand
    Add(AddArgs),

    /// Change fields of a stored event
    Edit(EditArgs),

    /// Delete stored events
    Delete(DeleteArgs),

    /// Show or send the daily summary
    Summary(SummaryArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Poll once, send the summary if due, then exit
    #[arg(long)]
    pub once: bool,

    /// Override the poll interval in seconds
    #[arg(short, long)]
    pub interval: Option<u64>,
}

/// Arguments for the parse command.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// RFC 5322 message file (.eml); reads plain body text from stdin when omitted
    pub file: Option<String>,

    /// Sender address when reading plain text
    #[arg(long, default_value = "")]
    pub from: String,

    /// Subject when reading plain text
    #[arg(short, long)]
    pub subject: Option<String>,

    /// Reference date for relative phrases (YYYY-MM-DD, default today)
    #[arg(long)]
    pub today: Option<String>,

    /// Only try the line rules, never call the model
    #[arg(long)]
    pub rules_only: bool,

    /// Append the extracted event to the store
    #[arg(long)]
    pub save: bool,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Only events on this date (e.g. "2026-01-17", "tomorrow", "next friday")
    #[arg(short, long)]
    pub date: Option<String>,

    /// Filter by person (case-insensitive)
    #[arg(short, long)]
    pub person: Option<String>,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the add command.
#[derive(Debug, Parser)]
pub struct AddArgs {
    /// Event title
    pub title: String,

    /// Date (e.g. "2026-01-17", "tomorrow", "next friday")
    #[arg(short, long, default_value = "today")]
    pub date: String,

    /// Time (e.g. "1830", "6:30pm")
    #[arg(short, long)]
    pub time: Option<String>,

    /// Who the event is for
    #[arg(short, long)]
    pub person: Option<String>,

    /// Where it happens
    #[arg(short = 'L', long, default_value = "")]
    pub location: String,

    /// Free-form notes
    #[arg(short, long, default_value = "")]
    pub notes: String,

    /// Recurrence
    #[arg(short, long, value_enum, default_value = "none")]
    pub recurring: RecurrenceArg,
}

/// Arguments for the edit command.
#[derive(Debug, Parser)]
pub struct EditArgs {
    /// Event ID
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New date
    #[arg(short, long)]
    pub date: Option<String>,

    /// New time
    #[arg(short, long)]
    pub time: Option<String>,

    /// New person
    #[arg(short, long)]
    pub person: Option<String>,

    /// New location
    #[arg(short = 'L', long)]
    pub location: Option<String>,

    /// New notes
    #[arg(short, long)]
    pub notes: Option<String>,

    /// New recurrence
    #[arg(short, long, value_enum)]
    pub recurring: Option<RecurrenceArg>,
}

/// Arguments for the delete command.
#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// Event IDs to delete
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the summary command.
#[derive(Debug, Parser)]
pub struct SummaryArgs {
    /// Day to summarize (default today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Send by SMTP instead of printing
    #[arg(long)]
    pub send: bool,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Add or replace a known sender
    Sender {
        /// Sender address
        address: String,
        /// Display name used as the event person
        name: String,
    },
}

/// Recurrence argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum RecurrenceArg {
    /// One-off event
    None,
    /// Every day
    Daily,
    /// Every week
    Weekly,
    /// Every month
    Monthly,
    /// Every year
    Yearly,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<RecurrenceArg> for famcal_domain::Recurrence {
    fn from(recurring: RecurrenceArg) -> Self {
        match recurring {
            RecurrenceArg::None => famcal_domain::Recurrence::None,
            RecurrenceArg::Daily => famcal_domain::Recurrence::Daily,
            RecurrenceArg::Weekly => famcal_domain::Recurrence::Weekly,
            RecurrenceArg::Monthly => famcal_domain::Recurrence::Monthly,
            RecurrenceArg::Yearly => famcal_domain::Recurrence::Yearly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from(["famcal", "run", "--once"]);
        match cli.command {
            Command::Run(args) => assert!(args.once),
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_add_command_defaults() {
        let cli = Cli::parse_from(["famcal", "add", "Yoga", "--time", "6:30pm"]);
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.title, "Yoga");
                assert_eq!(args.date, "today");
                assert_eq!(args.time.as_deref(), Some("6:30pm"));
                assert!(matches!(args.recurring, RecurrenceArg::None));
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_delete_requires_ids() {
        assert!(Cli::try_parse_from(["famcal", "delete"]).is_err());
        let cli = Cli::parse_from(["famcal", "delete", "3", "4", "-y"]);
        match cli.command {
            Command::Delete(args) => {
                assert_eq!(args.ids, vec!["3", "4"]);
                assert!(args.yes);
            }
            _ => panic!("Expected Delete command"),
        }
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::parse_from([
            "famcal",
            "list",
            "--ollama-model",
            "llama3",
            "--mail-user",
            "family@example.com",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.ollama_model.as_deref(), Some("llama3"));
        assert_eq!(overrides.mail_user.as_deref(), Some("family@example.com"));
    }

    #[test]
    fn test_recurrence_conversion() {
        let recurring: famcal_domain::Recurrence = RecurrenceArg::Weekly.into();
        assert_eq!(recurring, famcal_domain::Recurrence::Weekly);
    }
}
