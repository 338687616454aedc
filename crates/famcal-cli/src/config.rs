//! Configuration management for the CLI.
//!
//! Everything lives in one TOML file (`~/.famcal/famcal.toml` by default).
//! Every section is optional; a missing file means all defaults.

use crate::error::{CliError, Result};
use famcal_domain::SenderDirectory;
use famcal_extractor::ExtractorConfig;
use famcal_llm::ollama::{DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use famcal_llm::{GenerationOptions, LlmError, OllamaProvider};
use famcal_mail::{ImapConfig, SmtpConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name of the configuration file inside the config directory.
pub const CONFIG_FILE: &str = "famcal.toml";

/// File name of the event store inside the data directory.
pub const EVENTS_FILE: &str = "events.csv";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Language model backend
    #[serde(default)]
    pub ollama: OllamaSettings,

    /// Extraction defaults
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Where events and logs are written
    #[serde(default)]
    pub storage: StorageSettings,

    /// Incoming mailbox
    #[serde(default)]
    pub imap: ImapConfig,

    /// Outgoing mail for the daily summary
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Polling daemon
    #[serde(default)]
    pub daemon: DaemonSettings,

    /// Output and logging
    #[serde(default)]
    pub settings: Settings,

    /// Known senders: address -> display name
    #[serde(default)]
    pub senders: BTreeMap<String, String>,
}

/// Ollama connection and sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    /// API base URL
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per request
    pub max_retries: u32,

    /// Maximum tokens to generate
    pub num_predict: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Top-k sampling cutoff
    pub top_k: u32,
}

/// Storage locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding `events.csv` and `logs/`
    pub data_dir: PathBuf,
}

/// Polling daemon settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonSettings {
    /// Seconds between mailbox polls
    pub poll_interval_secs: u64,

    /// Local hour (0-23) from which the daily summary is sent
    pub summary_hour: u32,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replaces `ollama.endpoint`
    pub ollama_endpoint: Option<String>,
    /// Replaces `ollama.model`
    pub ollama_model: Option<String>,
    /// Replaces both `imap.user` and `smtp.user`
    pub mail_user: Option<String>,
    /// Replaces both `imap.password` and `smtp.password`
    pub mail_password: Option<String>,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".famcal").join(CONFIG_FILE))
    }

    /// Resolve the configuration path, honoring an explicit override.
    pub fn path(explicit: Option<&str>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(PathBuf::from(path)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from file, or defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = self.to_toml()?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply command-line and environment overrides.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(endpoint) = &overrides.ollama_endpoint {
            self.ollama.endpoint = endpoint.clone();
        }
        if let Some(model) = &overrides.ollama_model {
            self.ollama.model = model.clone();
        }
        if let Some(user) = &overrides.mail_user {
            self.imap.user = user.clone();
            self.smtp.user = user.clone();
        }
        if let Some(password) = &overrides.mail_password {
            self.imap.password = password.clone();
            self.smtp.password = password.clone();
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.ollama.validate().map_err(CliError::Config)?;
        self.extractor.validate().map_err(CliError::Config)?;
        self.imap.validate().map_err(CliError::Config)?;
        self.smtp.validate().map_err(CliError::Config)?;
        self.daemon.validate().map_err(CliError::Config)?;
        Ok(())
    }

    /// Build the shared sender directory from `[senders]`.
    pub fn sender_directory(&self) -> Arc<SenderDirectory> {
        Arc::new(SenderDirectory::new(
            self.senders.iter().map(|(addr, name)| (addr, name.clone())),
        ))
    }

    /// Path of the CSV event store.
    pub fn events_path(&self) -> PathBuf {
        self.storage.data_dir.join(EVENTS_FILE)
    }

    /// Directory for daily log files.
    pub fn log_dir(&self) -> PathBuf {
        self.storage.data_dir.join("logs")
    }
}

impl OllamaSettings {
    /// Validate the settings
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("ollama endpoint must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("ollama model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("ollama timeout_secs must be greater than 0".to_string());
        }
        if self.num_predict == 0 {
            return Err("ollama num_predict must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "ollama temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(format!(
                "ollama top_p must be between 0.0 and 1.0, got {}",
                self.top_p
            ));
        }
        Ok(())
    }

    /// Sampling options sent with each request
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            num_predict: self.num_predict,
        }
    }

    /// Build the provider these settings describe
    pub fn provider(&self) -> std::result::Result<OllamaProvider, LlmError> {
        Ok(
            OllamaProvider::with_timeout(&self.endpoint, &self.model, self.timeout_secs)?
                .with_options(self.generation_options())
                .with_max_retries(self.max_retries),
        )
    }
}

impl DaemonSettings {
    /// Validate the settings
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.poll_interval_secs == 0 {
            return Err("daemon poll_interval_secs must be greater than 0".to_string());
        }
        if self.summary_hour > 23 {
            return Err(format!(
                "daemon summary_hour must be between 0 and 23, got {}",
                self.summary_hour
            ));
        }
        Ok(())
    }
}

impl Default for OllamaSettings {
    fn default() -> Self {
        let options = GenerationOptions::default();
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            num_predict: options.num_predict,
            temperature: options.temperature,
            top_p: options.top_p,
            top_k: options.top_k,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .map(|home| home.join(".famcal"))
            .unwrap_or_else(|| PathBuf::from(".famcal"));
        Self { data_dir }
    }
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 900,
            summary_hour: 7,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            log_level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ollama.endpoint, "http://localhost:11434");
        assert_eq!(config.ollama.num_predict, 150);
        assert_eq!(config.daemon.poll_interval_secs, 900);
        assert_eq!(config.imap.host, "imap.gmail.com");
        assert_eq!(config.smtp.port, 587);
        assert!(config.settings.color);
        assert!(config.senders.is_empty());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [extractor]
            default_person = "The Smiths"

            [daemon]
            summary_hour = 6

            [senders]
            "sarah@example.com" = "Sarah"
            "Dad <DAD@example.com>" = "Dad"
            "#,
        )
        .unwrap();

        assert_eq!(config.extractor.default_person, "The Smiths");
        assert_eq!(config.extractor.untitled_event, "Unnamed Event");
        assert_eq!(config.daemon.summary_hour, 6);
        assert_eq!(config.daemon.poll_interval_secs, 900);
        assert_eq!(config.ollama.model, DEFAULT_MODEL);

        let directory = config.sender_directory();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.lookup("SARAH@example.com"), Some("Sarah"));
        assert_eq!(directory.lookup("dad@example.com"), Some("Dad"));
    }

    #[test]
    fn test_overrides_apply_to_both_mail_sections() {
        let mut config = Config::default();
        config.apply_overrides(&Overrides {
            ollama_model: Some("llama3".to_string()),
            mail_user: Some("family@example.com".to_string()),
            mail_password: Some("secret".to_string()),
            ..Overrides::default()
        });

        assert_eq!(config.ollama.model, "llama3");
        assert_eq!(config.ollama.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.imap.user, "family@example.com");
        assert_eq!(config.smtp.user, "family@example.com");
        assert_eq!(config.imap.password, "secret");
        assert_eq!(config.smtp.password, "secret");
    }

    #[test]
    fn test_invalid_sections_rejected() {
        let mut config = Config::default();
        config.daemon.summary_hour = 24;
        assert!(matches!(config.validate(), Err(CliError::Config(_))));

        let mut config = Config::default();
        config.daemon.poll_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.ollama.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.extractor.default_person = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = Config::default();
        config.storage.data_dir = dir.path().join("data");
        config.senders.insert("mom@example.com".to_string(), "Mom".to_string());
        config.smtp.recipients = vec!["family@example.com".to_string()];
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.events_path(), dir.path().join("data").join("events.csv"));
        assert_eq!(loaded.log_dir(), dir.path().join("data").join("logs"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = Config::path(Some("/tmp/custom.toml")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.toml"));
    }

    #[test]
    fn test_provider_from_settings() {
        let provider = OllamaSettings {
            model: "llama3".to_string(),
            ..OllamaSettings::default()
        }
        .provider()
        .unwrap();
        assert_eq!(provider.model(), "llama3");
    }
}
