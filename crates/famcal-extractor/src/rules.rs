//! Deterministic extraction from `key: value` lines

use crate::types::EventDraft;
use famcal_domain::RawEmail;

/// Collect `event:`, `date:`, `time:`, `person:` and `location:` lines
///
/// Keys match case-insensitively anywhere in the line and the value is the
/// trimmed text after the line's first colon. A line can set several
/// fields, and a later line overwrites an earlier one.
pub fn scan_markers(body: &str) -> EventDraft {
    let mut draft = EventDraft::default();

    for line in body.lines() {
        let lowered = line.to_lowercase();
        let Some((_, rest)) = line.split_once(':') else {
            continue;
        };
        let value = || Some(rest.trim().to_string());

        if lowered.contains("event:") {
            draft.title = value();
        }
        if lowered.contains("date:") {
            draft.date = value();
        }
        if lowered.contains("time:") {
            draft.time = value();
        }
        if lowered.contains("person:") {
            draft.person = value();
        }
        if lowered.contains("location:") {
            draft.location = value();
        }
    }

    draft
}

/// Scan the email body for explicit markers
///
/// Returns the draft only when both a title and a date were found; the
/// caller normalizes it. `None` means "fall through to the model".
pub fn try_rules(email: &RawEmail) -> Option<EventDraft> {
    let draft = scan_markers(&email.body);
    draft.has_title_and_date().then_some(draft)
}
