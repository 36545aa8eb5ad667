//! Output symbols.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The symbol shown when nothing was recognized.
pub const DEFAULT_SENTINEL: &str = "-";

/// A recognized sign: one printable character or a short label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidSymbol {
    #[error("symbol is empty")]
    Empty,
    #[error("symbol {0:?} contains whitespace or control characters")]
    Unprintable(String),
}

impl Symbol {
    pub fn new(text: impl Into<String>) -> Result<Self, InvalidSymbol> {
        let text = text.into();
        if text.is_empty() {
            return Err(InvalidSymbol::Empty);
        }
        if text.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(InvalidSymbol::Unprintable(text));
        }
        Ok(Symbol(text))
    }

    /// For compile-time tables whose text is known to be valid.
    pub(crate) fn from_static(text: &'static str) -> Self {
        debug_assert!(Symbol::new(text).is_ok());
        Symbol(text.to_string())
    }

    pub fn default_sentinel() -> Self {
        Symbol(DEFAULT_SENTINEL.to_string())
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = InvalidSymbol;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Symbol::new(s) }
}

impl TryFrom<String> for Symbol {
    type Error = InvalidSymbol;
    fn try_from(s: String) -> Result<Self, Self::Error> { Symbol::new(s) }
}

impl From<Symbol> for String {
    fn from(s: Symbol) -> String { s.0 }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool { self.0 == other }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool { self.0 == *other }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_letters_and_labels() {
        assert_eq!(Symbol::new("A").unwrap(), "A");
        assert_eq!(Symbol::new("OK").unwrap().as_str(), "OK");
        assert_eq!(Symbol::new("5").unwrap().to_string(), "5");
    }

    #[test]
    fn rejects_empty_and_blank() {
        assert_eq!(Symbol::new(""), Err(InvalidSymbol::Empty));
        assert!(matches!(Symbol::new("a b"), Err(InvalidSymbol::Unprintable(_))));
        assert!(matches!(Symbol::new("\n"), Err(InvalidSymbol::Unprintable(_))));
    }

    #[test]
    fn default_sentinel_is_dash() {
        assert_eq!(Symbol::default_sentinel(), "-");
    }
}
