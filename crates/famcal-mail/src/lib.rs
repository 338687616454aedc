//! famcal Mail Layer
//!
//! Everything that talks to mail servers:
//!
//! - `ImapMailbox`: the `MailSource` polled for unseen messages (IMAP over TLS)
//! - `parse_message`: RFC 5322 bytes to `RawEmail`
//! - `compose_summary` / `SmtpSender`: the once-a-day event digest
//! - `MockMailbox`: deterministic in-memory source for tests
//!
//! All network calls are blocking; async callers should run them on a
//! blocking thread.

#![warn(missing_docs)]

mod error;
mod mailbox;
mod mock;
mod parse;
mod summary;

pub use error::MailError;
pub use mailbox::{ImapConfig, ImapMailbox};
pub use mock::MockMailbox;
pub use parse::parse_message;
pub use summary::{build_message, compose_summary, SmtpConfig, SmtpSender, Summary};
