//! Raw email as handed over by the mail source

/// An unseen message, consumed once by the extraction pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEmail {
    /// Mailbox-specific identifier used to acknowledge the message
    pub uid: String,

    /// Plain-text body
    pub body: String,

    /// Sender address as it appeared in the `From` header
    /// (either `user@host` or `Name <user@host>`)
    pub sender_address: String,

    /// Display name from the `From` header, if any
    pub sender_display_name: String,

    /// Subject line
    pub subject: Option<String>,
}

impl RawEmail {
    /// Build a message from a body and sender address only
    pub fn new(body: impl Into<String>, sender_address: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            sender_address: sender_address.into(),
            ..Self::default()
        }
    }

    /// Attach a subject line
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}
