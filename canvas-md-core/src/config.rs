//! Conversion settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Title written under the document front-matter by default.
pub const DEFAULT_TITLE: &str = "Canvas Document";

/// How the deserializer treats input it cannot fully understand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Degrade gracefully: missing or unreadable values become empty
    /// defaults and a warning is logged.
    #[default]
    Lenient,
    /// Reject anything the serializer would not have produced.
    Strict,
}

impl Strictness {
    /// Whether this is [`Strictness::Strict`].
    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lenient => f.write_str("lenient"),
            Self::Strict => f.write_str("strict"),
        }
    }
}

impl FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown strictness `{other}` (expected `lenient` or `strict`)"
            )),
        }
    }
}

/// Settings for serializing and deserializing documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Top-level heading written after the document front-matter.
    pub title: String,
    /// Error policy for the deserializer.
    pub strictness: Strictness,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            strictness: Strictness::Lenient,
        }
    }

    /// Shorthand for a strict configuration.
    #[must_use]
    pub fn strict() -> Self {
        Self::new().with_strictness(Strictness::Strict)
    }

    /// Set the document title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the error policy.
    #[must_use]
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FormatConfig::default();
        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.strictness, Strictness::Lenient);
        assert!(FormatConfig::strict().strictness.is_strict());
    }

    #[test]
    fn test_strictness_parse_and_display() {
        assert_eq!("strict".parse::<Strictness>(), Ok(Strictness::Strict));
        assert_eq!(" Lenient ".parse::<Strictness>(), Ok(Strictness::Lenient));
        assert!("paranoid".parse::<Strictness>().is_err());
        assert_eq!(Strictness::Strict.to_string(), "strict");
    }

    #[test]
    fn test_partial_json_config_uses_defaults() {
        let config: FormatConfig =
            serde_json::from_str(r#"{"strictness":"strict"}"#).expect("parse");
        assert_eq!(config.title, DEFAULT_TITLE);
        assert!(config.strictness.is_strict());
    }
}
