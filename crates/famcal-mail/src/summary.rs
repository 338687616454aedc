//! Daily summary composition and SMTP delivery via `lettre`

use crate::error::MailError;
use chrono::NaiveDate;
use famcal_domain::PersistedEvent;
use lettre::message::{header::ContentType, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Outgoing mail settings for the daily summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// Relay host (STARTTLS)
    pub host: String,

    /// Relay port
    pub port: u16,

    /// Login user, also used as the From address
    pub user: String,

    /// Login password
    pub password: String,

    /// Summary recipients
    pub recipients: Vec<String>,

    /// Connection timeout in seconds
    pub timeout_secs: u64,
}

impl SmtpConfig {
    /// Whether a summary can be sent at all
    pub fn is_configured(&self) -> bool {
        !self.user.is_empty() && !self.password.is_empty() && !self.recipients.is_empty()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("smtp host must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("smtp port must be non-zero".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("smtp timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            user: String::new(),
            password: String::new(),
            recipients: Vec::new(),
            timeout_secs: 10,
        }
    }
}

/// A rendered daily summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Subject line
    pub subject: String,

    /// Plain-text body
    pub body: String,
}

/// Render the summary for `today`, or `None` when there is nothing on
///
/// ```text
/// Family Calendar - Saturday, January 17, 2026
///
/// EVENTS TODAY (1):
/// 1. 0900 Yoga
///    Person: Sarah
///    Location: Studio 5
/// ```
pub fn compose_summary(events: &[PersistedEvent], today: NaiveDate) -> Option<Summary> {
    if events.is_empty() {
        return None;
    }

    let heading = format!("Family Calendar - {}", today.format("%A, %B %d, %Y"));
    let mut body = format!("{}\n\nEVENTS TODAY ({}):\n", heading, events.len());
    for (idx, stored) in events.iter().enumerate() {
        let event = &stored.event;
        body.push_str(&format!("{}. {} {}\n", idx + 1, event.time, event.title));
        body.push_str(&format!("   Person: {}\n", event.person));
        if !event.location.is_empty() {
            body.push_str(&format!("   Location: {}\n", event.location));
        }
    }

    Some(Summary {
        subject: heading,
        body,
    })
}

/// Build the MIME message for a summary
pub fn build_message(summary: &Summary, from: &str, to: &[String]) -> Result<Message, MailError> {
    let from: Mailbox = from
        .parse()
        .map_err(|e| MailError::Send(format!("invalid From address \"{}\": {}", from, e)))?;

    let mut builder = Message::builder().from(from).subject(&summary.subject);
    for addr in to {
        let mailbox: Mailbox = addr
            .trim()
            .parse()
            .map_err(|e| MailError::Send(format!("invalid To address \"{}\": {}", addr, e)))?;
        builder = builder.to(mailbox);
    }

    Ok(builder
        .header(ContentType::TEXT_PLAIN)
        .body(summary.body.clone())?)
}

/// Sends summaries through an authenticated STARTTLS relay
pub struct SmtpSender {
    config: SmtpConfig,
}

impl SmtpSender {
    /// Create a sender (does not connect yet)
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Whether credentials and recipients are present
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Deliver a summary to every configured recipient
    pub fn send(&self, summary: &Summary) -> Result<(), MailError> {
        if !self.is_configured() {
            return Err(MailError::Config(
                "SMTP user, password and recipients are required".to_string(),
            ));
        }

        let message = build_message(summary, &self.config.user, &self.config.recipients)?;
        let transport = SmtpTransport::starttls_relay(&self.config.host)?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.user.clone(),
                self.config.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(self.config.timeout_secs)))
            .build();

        transport.send(&message)?;
        info!(
            "Daily summary sent to {} recipients",
            self.config.recipients.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use famcal_domain::{EventId, EventTime, ExtractedEvent, Recurrence};

    fn stored(id: u64, title: &str, time: (u32, u32), location: &str) -> PersistedEvent {
        PersistedEvent {
            id: EventId::new(id),
            event: ExtractedEvent {
                title: title.to_string(),
                date: NaiveDate::from_ymd_opt(2026, 1, 17).unwrap(),
                time: EventTime::new(time.0, time.1).unwrap(),
                person: "Sarah".to_string(),
                location: location.to_string(),
            },
            notes: String::new(),
            recurring: Recurrence::None,
            created_at: NaiveDateTime::parse_from_str("2026-01-14 08:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
        }
    }

    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 17).unwrap()
    }

    #[test]
    fn test_no_events_no_summary() {
        assert!(compose_summary(&[], saturday()).is_none());
    }

    #[test]
    fn test_summary_layout() {
        let events = [
            stored(1, "Yoga", (9, 0), "Studio 5"),
            stored(2, "Dinner", (18, 30), ""),
        ];
        let summary = compose_summary(&events, saturday()).unwrap();

        assert_eq!(summary.subject, "Family Calendar - Saturday, January 17, 2026");
        assert_eq!(
            summary.body,
            "Family Calendar - Saturday, January 17, 2026\n\n\
             EVENTS TODAY (2):\n\
             1. 0900 Yoga\n   Person: Sarah\n   Location: Studio 5\n\
             2. 1830 Dinner\n   Person: Sarah\n"
        );
    }

    #[test]
    fn test_build_message_headers() {
        let summary = compose_summary(&[stored(1, "Yoga", (9, 0), "")], saturday()).unwrap();
        let message = build_message(
            &summary,
            "calendar@example.com",
            &["a@example.com".to_string(), " b@example.com".to_string()],
        )
        .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("From: calendar@example.com"));
        assert!(raw.contains("a@example.com"));
        assert!(raw.contains("b@example.com"));
        assert!(raw.contains("Subject: Family Calendar - Saturday, January 17, 2026"));
    }

    #[test]
    fn test_build_message_rejects_bad_address() {
        let summary = compose_summary(&[stored(1, "Yoga", (9, 0), "")], saturday()).unwrap();
        let result = build_message(&summary, "not an address", &[]);
        assert!(matches!(result, Err(MailError::Send(_))));
    }

    #[test]
    fn test_unconfigured_sender_refuses() {
        let sender = SmtpSender::new(SmtpConfig::default());
        assert!(!sender.is_configured());
        let summary = compose_summary(&[stored(1, "Yoga", (9, 0), "")], saturday()).unwrap();
        assert!(matches!(sender.send(&summary), Err(MailError::Config(_))));
    }
}
