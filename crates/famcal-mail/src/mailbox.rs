//! IMAP mailbox over TLS using the `imap` crate

use crate::error::MailError;
use crate::parse::parse_message;
use famcal_domain::traits::MailSource;
use famcal_domain::RawEmail;
use native_tls::{TlsConnector, TlsStream};
use serde::{Deserialize, Serialize};
use std::net::TcpStream;
use tracing::{debug, info, warn};

type ImapSession = imap::Session<TlsStream<TcpStream>>;

/// Connection settings for the polled mailbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImapConfig {
    /// Server host name
    pub host: String,

    /// TLS port
    pub port: u16,

    /// Folder to poll
    pub mailbox: String,

    /// Login user
    pub user: String,

    /// Login password (an app password for most providers)
    pub password: String,
}

impl ImapConfig {
    /// Whether a user and password are set
    pub fn has_credentials(&self) -> bool {
        !self.user.is_empty() && !self.password.is_empty()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("imap host must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("imap port must be non-zero".to_string());
        }
        if self.mailbox.trim().is_empty() {
            return Err("imap mailbox must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ImapConfig {
    fn default() -> Self {
        Self {
            host: "imap.gmail.com".to_string(),
            port: 993,
            mailbox: "INBOX".to_string(),
            user: String::new(),
            password: String::new(),
        }
    }
}

/// IMAP mailbox that hands out unseen messages
///
/// Messages are fetched with `BODY.PEEK[]`, so fetching alone leaves them
/// unseen; [`MailSource::mark_seen`] sets `\Seen` explicitly. The session is
/// opened lazily and dropped after any protocol error so the next call
/// reconnects.
pub struct ImapMailbox {
    config: ImapConfig,
    session: Option<ImapSession>,
}

impl ImapMailbox {
    /// Create a mailbox (does not connect yet)
    pub fn new(config: ImapConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Log out and drop the session, if one is open
    pub fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.logout() {
                debug!("IMAP logout failed: {}", e);
            }
        }
    }

    fn connect(&self) -> Result<ImapSession, MailError> {
        if !self.config.has_credentials() {
            return Err(MailError::Config("IMAP user and password are required".to_string()));
        }

        let tls = TlsConnector::builder()
            .build()
            .map_err(|e| MailError::Connection(format!("TLS connector build failed: {}", e)))?;

        let client = imap::connect(
            (self.config.host.as_str(), self.config.port),
            &self.config.host,
            &tls,
        )
        .map_err(|e| MailError::Connection(format!("IMAP connection failed: {}", e)))?;

        let mut session = client
            .login(&self.config.user, &self.config.password)
            .map_err(|(e, _)| MailError::Authentication(format!("IMAP login failed: {}", e)))?;

        session.select(&self.config.mailbox).map_err(|e| {
            MailError::Connection(format!("IMAP SELECT {} failed: {}", self.config.mailbox, e))
        })?;

        info!("Connected to {} ({})", self.config.host, self.config.mailbox);
        Ok(session)
    }

    /// Run `op` on the open session, connecting first if needed
    fn with_session<T>(
        &mut self,
        op: impl FnOnce(&mut ImapSession) -> Result<T, MailError>,
    ) -> Result<T, MailError> {
        let mut session = match self.session.take() {
            Some(session) => session,
            None => self.connect()?,
        };
        let result = op(&mut session);
        if result.is_ok() {
            self.session = Some(session);
        } else {
            warn!("Dropping IMAP session after error");
        }
        result
    }
}

impl MailSource for ImapMailbox {
    type Error = MailError;

    fn fetch_unseen(&mut self) -> Result<Vec<RawEmail>, Self::Error> {
        self.with_session(|session| {
            let mut uids: Vec<u32> = session
                .uid_search("UNSEEN")
                .map_err(|e| MailError::Connection(format!("IMAP UID SEARCH failed: {}", e)))?
                .into_iter()
                .collect();
            uids.sort_unstable();
            info!("Found {} unseen emails", uids.len());

            if uids.is_empty() {
                return Ok(Vec::new());
            }

            let uid_set = uids
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(",");
            let fetches = session
                .uid_fetch(&uid_set, "BODY.PEEK[]")
                .map_err(|e| MailError::Connection(format!("IMAP UID FETCH failed: {}", e)))?;

            let mut emails = Vec::new();
            for fetch in fetches.iter() {
                let (Some(uid), Some(body)) = (fetch.uid, fetch.body()) else {
                    continue;
                };
                match parse_message(uid.to_string(), body) {
                    Ok(email) => emails.push(email),
                    Err(e) => {
                        warn!("Skipping message {}: {}", uid, e);
                        // Unparseable mail would otherwise come back every poll
                        if let Err(e) = session.uid_store(uid.to_string(), "+FLAGS (\\Seen)") {
                            warn!("Failed to mark message {} as seen: {}", uid, e);
                        }
                    }
                }
            }
            Ok(emails)
        })
    }

    fn mark_seen(&mut self, email: &RawEmail) -> Result<(), Self::Error> {
        self.with_session(|session| {
            session
                .uid_store(&email.uid, "+FLAGS (\\Seen)")
                .map_err(|e| MailError::Connection(format!("IMAP UID STORE failed: {}", e)))?;
            Ok(())
        })
    }
}

impl Drop for ImapMailbox {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ImapConfig::default();
        assert_eq!(config.port, 993);
        assert_eq!(config.mailbox, "INBOX");
        assert!(config.validate().is_ok());
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_invalid_config() {
        let config = ImapConfig {
            host: String::new(),
            ..ImapConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fetch_without_credentials_fails_before_connecting() {
        let mut mailbox = ImapMailbox::new(ImapConfig::default());
        assert!(matches!(mailbox.fetch_unseen(), Err(MailError::Config(_))));
    }
}
