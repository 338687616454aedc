//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use famcal_domain::normalize_address;
use std::path::Path;

const MASK: &str = "********";

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    path: &Path,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            print!("{}", masked(config).to_toml()?);
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init { force } => {
            init_file(path, force)?;
            println!(
                "{}",
                formatter.success(&format!("Wrote default configuration to {}", path.display()))
            );
        }
        ConfigAction::Sender { address, name } => {
            let key = add_sender(path, &address, &name)?;
            println!("{}", formatter.success(&format!("{} is now known as {}", key, name)));
        }
    }
    Ok(())
}

/// Copy of `config` with passwords hidden.
fn masked(config: &Config) -> Config {
    let mut shown = config.clone();
    for password in [&mut shown.imap.password, &mut shown.smtp.password] {
        if !password.is_empty() {
            *password = MASK.to_string();
        }
    }
    shown
}

/// Write a default file, refusing to clobber one unless `force`.
fn init_file(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::default().save(path)
}

/// Record a sender in the file (not the overridden in-memory config).
fn add_sender(path: &Path, address: &str, name: &str) -> Result<String> {
    let key = normalize_address(address);
    if key.is_empty() || name.trim().is_empty() {
        return Err(CliError::InvalidInput(
            "Sender address and name must not be empty".to_string(),
        ));
    }

    let mut file_config = Config::load(path)?;
    file_config.senders.insert(key.clone(), name.trim().to_string());
    file_config.save(path)?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_masked_hides_passwords_only_when_set() {
        let mut config = Config::default();
        config.imap.password = "hunter2".to_string();
        let shown = masked(&config);
        assert_eq!(shown.imap.password, MASK);
        assert_eq!(shown.smtp.password, "");
        assert!(!shown.to_toml().unwrap().contains("hunter2"));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("famcal.toml");

        init_file(&path, false).unwrap();
        assert!(path.exists());
        assert!(matches!(init_file(&path, false), Err(CliError::InvalidInput(_))));
        assert!(init_file(&path, true).is_ok());
    }

    #[test]
    fn test_add_sender_normalizes_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("famcal.toml");

        let key = add_sender(&path, "Grandma <GRANDMA@Example.com>", "Grandma").unwrap();
        assert_eq!(key, "grandma@example.com");

        let loaded = Config::load(&path).unwrap();
        assert_eq!(
            loaded.senders.get("grandma@example.com").map(String::as_str),
            Some("Grandma")
        );
        assert_eq!(
            loaded.sender_directory().lookup("grandma@example.com"),
            Some("Grandma")
        );
    }

    #[test]
    fn test_add_sender_rejects_blank() {
        let dir = TempDir::new().unwrap();
        assert!(add_sender(&dir.path().join("c.toml"), " ", "X").is_err());
    }
}
