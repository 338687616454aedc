//! Email body cleanup before prompting

use regex::Regex;
use std::sync::LazyLock;

/// Characters of raw text considered before stripping
pub const RAW_LIMIT: usize = 500;

/// Characters of cleaned text handed to the prompt
pub const CLEAN_LIMIT: usize = 350;

// Applied in order, case-insensitive, `.` matches newlines.
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)--+").unwrap());
static QUOTE_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)On .+? wrote:|Sent from .+").unwrap());
static SIGN_OFFS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)Best regards|Thanks|Regards").unwrap());
static DATE_STAMPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\d{1,2},\s*20\d{2}").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\n+").unwrap());

/// Reduce an email body to the part worth sending to the model
///
/// Prefixes the subject (when non-empty), truncates to [`RAW_LIMIT`]
/// characters, strips separators, reply/quote markers, sign-offs and
/// "D, 20YY" date stamps, removes runs of blank lines outright (the lines
/// on either side are joined), trims, and truncates to
/// [`CLEAN_LIMIT`] characters. Stripping is heuristic: words such as
/// "Thanksgiving" lose their matching prefix.
pub fn clean_email_body(body: &str, subject: Option<&str>) -> String {
    let text = match subject.filter(|s| !s.trim().is_empty()) {
        Some(subject) => format!("Subject: {}\n{}", subject, body),
        None => body.to_string(),
    };
    let mut text = truncate_chars(&text, RAW_LIMIT);

    for pattern in [&*SEPARATORS, &*QUOTE_MARKERS, &*SIGN_OFFS, &*DATE_STAMPS, &*BLANK_LINES] {
        text = pattern.replace_all(&text, "").into_owned();
    }

    truncate_chars(text.trim(), CLEAN_LIMIT)
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
