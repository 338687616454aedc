//! Sender directory - who a known address belongs to

use std::collections::HashMap;

/// Normalize a sender address for directory lookup
///
/// Strips `Display Name <...>` formatting, trims and lower-cases.
///
/// # Examples
///
/// ```
/// use famcal_domain::normalize_address;
///
/// assert_eq!(normalize_address("Sarah <Sarah@Example.com>"), "sarah@example.com");
/// assert_eq!(normalize_address("  BOB@example.com "), "bob@example.com");
/// ```
pub fn normalize_address(raw: &str) -> String {
    let trimmed = raw.trim();
    let bare = match (trimmed.find('<'), trimmed.rfind('>')) {
        (Some(open), Some(close)) if open < close => &trimmed[open + 1..close],
        _ => trimmed,
    };
    bare.trim().to_lowercase()
}

/// Read-only mapping from normalized email address to display name
///
/// Loaded once at startup and shared (behind an `Arc`) with every extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderDirectory {
    names: HashMap<String, String>,
}

impl SenderDirectory {
    /// Build a directory; keys are normalized on the way in
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let names = entries
            .into_iter()
            .map(|(addr, name)| (normalize_address(addr.as_ref()), name.into()))
            .collect();
        Self { names }
    }

    /// Look up the display name for a raw sender address
    pub fn lookup(&self, sender_address: &str) -> Option<&str> {
        self.names
            .get(&normalize_address(sender_address))
            .map(String::as_str)
    }

    /// Number of known senders
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_address() {
        assert_eq!(normalize_address("sarah@example.com"), "sarah@example.com");
    }

    #[test]
    fn test_normalize_display_form() {
        assert_eq!(
            normalize_address("\"Sarah M\" <SARAH@example.com>"),
            "sarah@example.com"
        );
    }

    #[test]
    fn test_normalize_unbalanced_brackets_kept() {
        assert_eq!(normalize_address("<sarah@example.com"), "<sarah@example.com");
    }

    #[test]
    fn test_lookup_normalizes_both_sides() {
        let dir = SenderDirectory::new([("Sarah@Example.com", "Sarah")]);
        assert_eq!(dir.lookup("Sarah <sarah@example.com>"), Some("Sarah"));
        assert_eq!(dir.lookup("other@example.com"), None);
    }

    #[test]
    fn test_empty_directory_knows_nobody() {
        let dir = SenderDirectory::default();
        assert!(dir.is_empty());
        assert_eq!(dir.lookup("x@example.com"), None);
    }
}
