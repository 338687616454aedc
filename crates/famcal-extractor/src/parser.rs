//! Parse model output into an event draft

use crate::error::ExtractorError;
use crate::repair::repair_with_limit;
use crate::types::EventDraft;
use serde_json::Value;
use tracing::{info, warn};

/// Cut the JSON object out of a reply that may carry prose around it
///
/// Runs from the first `{` to the last `}`. When no `}` follows the first
/// `{` the slice runs to the end of the text, so a truncated object is
/// still handed to repair. Returns `None` if there is no `{` at all.
pub fn slice_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = match reply.rfind('}') {
        Some(end) if end > start => end + 1,
        _ => reply.len(),
    };
    Some(&reply[start..end])
}

/// Parse a model reply, repairing truncated JSON once
///
/// # Errors
///
/// - [`ExtractorError::NoJson`] if the reply contains no object at all
/// - [`ExtractorError::JsonParse`] if the slice is still invalid after repair
/// - [`ExtractorError::InvalidFormat`] if the JSON is not an object
pub fn parse_model_reply(reply: &str, max_repairs: usize) -> Result<EventDraft, ExtractorError> {
    let json_str = slice_json_object(reply).ok_or(ExtractorError::NoJson)?;

    let json: Value = match serde_json::from_str(json_str) {
        Ok(json) => json,
        Err(e) => {
            warn!("JSON parse error: {}; attempting repair", e);
            let (repaired, added) = repair_with_limit(json_str, max_repairs);
            let json = serde_json::from_str(&repaired)?;
            info!("JSON repair succeeded, {} closing symbols added", added);
            json
        }
    };

    EventDraft::from_json(&json)
}
