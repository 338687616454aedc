//! famcal - Turn family emails into calendar events.

use clap::Parser;
use famcal_cli::commands;
use famcal_cli::{logging, Cli, Command, Config, Formatter};
use tracing::debug;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> famcal_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load config, then let flags and environment win
    let config_path = Config::path(cli.config.as_deref())?;
    let mut config = Config::load(&config_path)?;
    config.apply_overrides(&cli.overrides());

    // The config command must still run when values are out of range
    let managing_config = matches!(cli.command, Command::Config(_));
    if !managing_config {
        config.validate()?;
    }

    let log_dir = (!managing_config).then(|| config.log_dir());
    let log_file = logging::init(&config.settings.log_level, log_dir.as_deref())?;
    debug!("Configuration loaded from {}", config_path.display());
    if let Some(path) = log_file {
        debug!("Logging to {}", path.display());
    }

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Run(args) => commands::execute_run(args, &config, &formatter),
        Command::Parse(args) => commands::execute_parse(args, &config, &formatter),
        Command::List(args) => commands::execute_list(args, &config, &formatter),
        Command::Add(args) => commands::execute_add(args, &config, &formatter),
        Command::Edit(args) => commands::execute_edit(args, &config, &formatter),
        Command::Delete(args) => commands::execute_delete(args, &config, &formatter),
        Command::Summary(args) => commands::execute_summary(args, &config, &formatter),
        Command::Config(args) => {
            commands::execute_config(args, &config_path, &config, &formatter)
        }
    }
}
