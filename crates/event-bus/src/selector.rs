//! Subscription selectors.

use regex::Regex;

use crate::error::{BusError, Result};

/// Key a handler is subscribed under.
///
/// Selectors are evaluated uniformly at emission time against the emitted
/// event name.
#[derive(Debug, Clone)]
pub enum Selector {
    /// Matches one event name exactly.
    Exact(String),

    /// Matches every event name the expression finds a match in.
    Pattern(Regex),

    /// Matches every event.
    All,
}

impl Selector {
    /// Creates an exact-name selector.
    pub fn exact(name: impl Into<String>) -> Self {
        Selector::Exact(name.into())
    }

    /// Compiles a pattern selector.
    ///
    /// A malformed expression is rejected here so emission never fails.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Selector::Pattern)
            .map_err(|source| BusError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Returns true if an event with this name should reach the subscriber.
    pub fn matches(&self, event: &str) -> bool {
        match self {
            Selector::Exact(name) => name == event,
            Selector::Pattern(regex) => regex.is_match(event),
            Selector::All => true,
        }
    }
}

impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Selector::Exact(a), Selector::Exact(b)) => a == b,
            (Selector::Pattern(a), Selector::Pattern(b)) => a.as_str() == b.as_str(),
            (Selector::All, Selector::All) => true,
            _ => false,
        }
    }
}

impl Eq for Selector {}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::exact(name)
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::Exact(name)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Exact(name) => write!(f, "{name}"),
            Selector::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
            Selector::All => write!(f, "*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matches_only_same_name() {
        let selector = Selector::exact("card:add");
        assert!(selector.matches("card:add"));
        assert!(!selector.matches("card:added"));
        assert!(!selector.matches("card"));
    }

    #[test]
    fn test_pattern_matches_field_change_events() {
        let selector = Selector::pattern(r"^order\..*:change").unwrap();
        assert!(selector.matches("order.address:change"));
        assert!(selector.matches("order.payment:change"));
        assert!(!selector.matches("contacts.email:change"));
        assert!(!selector.matches("order:submit"));
    }

    #[test]
    fn test_malformed_pattern_is_rejected() {
        let err = Selector::pattern(r"^order\.(").unwrap_err();
        assert!(matches!(err, BusError::InvalidPattern { ref pattern, .. } if pattern == r"^order\.("));
    }

    #[test]
    fn test_all_matches_everything() {
        assert!(Selector::All.matches("items:changed"));
        assert!(Selector::All.matches(""));
    }

    #[test]
    fn test_equality_by_kind_and_source() {
        assert_eq!(Selector::exact("a"), Selector::from("a"));
        assert_ne!(Selector::exact("a"), Selector::exact("b"));
        assert_eq!(
            Selector::pattern("^a").unwrap(),
            Selector::pattern("^a").unwrap()
        );
        assert_ne!(Selector::exact("^a"), Selector::pattern("^a").unwrap());
        assert_eq!(Selector::All, Selector::All);
    }

    #[test]
    fn test_display() {
        assert_eq!(Selector::exact("card:add").to_string(), "card:add");
        assert_eq!(Selector::pattern("^a").unwrap().to_string(), "/^a/");
        assert_eq!(Selector::All.to_string(), "*");
    }
}
