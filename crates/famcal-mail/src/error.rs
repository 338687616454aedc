//! Error types for mailbox access and summary delivery

use thiserror::Error;

/// Errors that can occur while talking to mail servers
#[derive(Error, Debug)]
pub enum MailError {
    /// Server unreachable, TLS failure, or a protocol command failed
    #[error("Mail connection failed: {0}")]
    Connection(String),

    /// Login rejected
    #[error("Mail authentication failed: {0}")]
    Authentication(String),

    /// Message bytes could not be parsed
    #[error("Mail parsing failed: {0}")]
    Parse(String),

    /// Composing or delivering a message failed
    #[error("Mail send failed: {0}")]
    Send(String),

    /// Configuration error
    #[error("Mail configuration invalid: {0}")]
    Config(String),
}

impl From<imap::Error> for MailError {
    fn from(e: imap::Error) -> Self {
        MailError::Connection(e.to_string())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(e: lettre::error::Error) -> Self {
        MailError::Send(e.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        MailError::Send(e.to_string())
    }
}
