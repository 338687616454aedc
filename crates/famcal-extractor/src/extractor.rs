//! Core Extractor implementation

use crate::cleaner::clean_email_body;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_model_reply;
use crate::prompt::PromptBuilder;
use crate::rules;
use chrono::{Local, NaiveDate};
use famcal_domain::traits::LlmProvider;
use famcal_domain::{normalize_address, ExtractedEvent, RawEmail, SenderDirectory};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error, info};

/// The Extractor turns one email into at most one calendar event
///
/// Explicit `key: value` markers are tried first; only when they are
/// missing is the model consulted. Extraction is total: every failure is
/// logged and reported as `None`.
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    directory: Arc<SenderDirectory>,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, directory: Arc<SenderDirectory>, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            directory,
            config,
        }
    }

    /// The configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract an event relative to the local date
    pub fn extract(&self, email: &RawEmail) -> Option<ExtractedEvent> {
        self.extract_at(email, Local::now().date_naive())
    }

    /// Extract an event relative to `today`
    pub fn extract_at(&self, email: &RawEmail, today: NaiveDate) -> Option<ExtractedEvent> {
        info!(
            "Extracting from {} ({})",
            normalize_address(&email.sender_address),
            if email.sender_display_name.is_empty() {
                "no display name"
            } else {
                email.sender_display_name.as_str()
            }
        );

        if let Some(event) = self.try_rules(email, today) {
            return Some(event);
        }
        self.try_model(email, today)
    }

    /// Rule path only
    pub fn try_rules(&self, email: &RawEmail, today: NaiveDate) -> Option<ExtractedEvent> {
        let draft = rules::try_rules(email)?;
        let event = draft.normalize(today, self.sender_name(&email.sender_address), &self.config);
        info!(
            "Parsed via rules: {} on {} at {}",
            event.title, event.date, event.time
        );
        Some(event)
    }

    /// Model path only
    pub fn try_model(&self, email: &RawEmail, today: NaiveDate) -> Option<ExtractedEvent> {
        match self.model_extract(email, today) {
            Ok(event) => {
                info!(
                    "Parsed via model: {} on {} at {}",
                    event.title, event.date, event.time
                );
                Some(event)
            }
            Err(e) => {
                error!("Model extraction failed: {}", e);
                None
            }
        }
    }

    /// Display name for a sender: directory entry, else the configured default
    pub fn sender_name(&self, sender_address: &str) -> &str {
        match self.directory.lookup(sender_address) {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.config.default_person,
        }
    }

    fn model_extract(&self, email: &RawEmail, today: NaiveDate) -> Result<ExtractedEvent, ExtractorError> {
        let sender_address = normalize_address(&email.sender_address);
        let sender_name = self.sender_name(&sender_address);

        let cleaned = clean_email_body(&email.body, email.subject.as_deref());
        let prompt = PromptBuilder::new(cleaned, sender_address.as_str(), sender_name, today).build();
        debug!("Prompt length: {} chars", prompt.len());

        let reply = self
            .llm_provider
            .generate_json(&prompt)
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;
        debug!("Model reply ({} chars): {}", reply.len(), preview(&reply));

        let draft = parse_model_reply(&reply, self.config.max_repairs)?;
        Ok(draft.normalize(today, sender_name, &self.config))
    }
}

fn preview(text: &str) -> String {
    text.chars().take(150).collect()
}
