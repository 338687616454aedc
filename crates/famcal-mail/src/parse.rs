//! RFC 5322 message parsing via `mail-parser`

use crate::error::MailError;
use famcal_domain::RawEmail;
use mail_parser::MessageParser;

/// Turn raw message bytes into a [`RawEmail`]
///
/// The plain-text body is preferred; for HTML-only messages mail-parser
/// renders the HTML part as text. A message without a `From` address keeps
/// an empty sender and is attributed to the default person downstream.
pub fn parse_message(uid: impl Into<String>, data: &[u8]) -> Result<RawEmail, MailError> {
    let uid = uid.into();
    let message = MessageParser::default().parse(data).ok_or_else(|| {
        MailError::Parse(format!(
            "failed to parse MIME message (uid: {}, {} bytes)",
            uid,
            data.len()
        ))
    })?;

    let (sender_address, sender_display_name) = message
        .from()
        .and_then(|from| from.first())
        .map(|addr| {
            (
                addr.address().unwrap_or_default().to_string(),
                addr.name().unwrap_or_default().to_string(),
            )
        })
        .unwrap_or_default();

    let subject = message
        .subject()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let body = message
        .body_text(0)
        .map(|text| text.into_owned())
        .unwrap_or_default();

    Ok(RawEmail {
        uid,
        body,
        sender_address,
        sender_display_name,
        subject,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &[u8] = b"From: Sarah Smith <Sarah@Example.com>\r\n\
To: family@example.com\r\n\
Subject: Yoga\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
Event: Yoga\r\n\
Date: this saturday\r\n";

    const MULTIPART: &[u8] = b"From: dad@example.com\r\n\
Subject: Dinner\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/alternative; boundary=\"b1\"\r\n\
\r\n\
--b1\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
Dinner at 6pm\r\n\
--b1\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<p>Dinner at <b>6pm</b></p>\r\n\
--b1--\r\n";

    #[test]
    fn test_parse_plain_message() {
        let email = parse_message("42", PLAIN).unwrap();
        assert_eq!(email.uid, "42");
        assert_eq!(email.sender_address, "Sarah@Example.com");
        assert_eq!(email.sender_display_name, "Sarah Smith");
        assert_eq!(email.subject.as_deref(), Some("Yoga"));
        assert!(email.body.contains("Event: Yoga"));
        assert!(email.body.contains("Date: this saturday"));
    }

    #[test]
    fn test_parse_prefers_plain_part() {
        let email = parse_message("7", MULTIPART).unwrap();
        assert_eq!(email.sender_address, "dad@example.com");
        assert_eq!(email.sender_display_name, "");
        assert!(email.body.contains("Dinner at 6pm"));
        assert!(!email.body.contains("<b>"));
    }
}
