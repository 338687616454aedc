//! Recurrence module - how often a stored event repeats

use serde::{Deserialize, Serialize};
use std::fmt;

/// Recurrence rule attached to a stored event
///
/// Extraction never infers recurrence; every new event starts as `None` and
/// the rule can be changed later through an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// One-off event
    #[default]
    None,

    /// Every day
    Daily,

    /// Same weekday every week
    Weekly,

    /// Same day every month
    Monthly,

    /// Same date every year
    Yearly,
}

impl Recurrence {
    /// Get the rule name as stored in the CSV
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
        }
    }

    /// Parse a rule name; blank text means `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Some(Recurrence::None),
            "daily" => Some(Recurrence::Daily),
            "weekly" => Some(Recurrence::Weekly),
            "monthly" => Some(Recurrence::Monthly),
            "yearly" => Some(Recurrence::Yearly),
            _ => None,
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurrence_as_str() {
        assert_eq!(Recurrence::None.as_str(), "none");
        assert_eq!(Recurrence::Weekly.as_str(), "weekly");
    }

    #[test]
    fn test_recurrence_parse() {
        assert_eq!(Recurrence::parse("WEEKLY"), Some(Recurrence::Weekly));
        assert_eq!(Recurrence::parse(""), Some(Recurrence::None));
        assert_eq!(Recurrence::parse("fortnightly"), None);
    }

    #[test]
    fn test_recurrence_default_is_none() {
        assert_eq!(Recurrence::default(), Recurrence::None);
    }
}
