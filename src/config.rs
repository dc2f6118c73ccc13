//! Configuration snapshot consumed by the reveal engine.
//!
//! The host owns persistence of these settings; the engine only reads a
//! copy at scan time and when a unit is built.

use serde::{Deserialize, Serialize};

use crate::error::RevealError;

/// Default marker prefix
pub const DEFAULT_PREFIX: &str = "re:";

// =============================================================================
// Enums
// =============================================================================

/// Cosmetic style of a reveal unit, fixed when the unit is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RevealStyle {
    #[default]
    Blur,
    Underline,
}

impl RevealStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealStyle::Blur => "blur",
            RevealStyle::Underline => "underline",
        }
    }

    /// CSS class carried by the unit's outer element
    pub fn css_class(&self) -> &'static str {
        match self {
            RevealStyle::Blur => "reveal-blur",
            RevealStyle::Underline => "reveal-underline",
        }
    }
}

/// Which characters count as "word" characters after the prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WordSyntax {
    /// `[0-9A-Za-z_]`
    #[default]
    Ascii,
    /// Unicode word characters; tokens split into grapheme clusters
    Unicode,
}

// =============================================================================
// RevealConfig
// =============================================================================

/// Immutable configuration snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub reveal_style: RevealStyle,
    #[serde(default)]
    pub word_syntax: WordSyntax,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            reveal_style: RevealStyle::default(),
            word_syntax: WordSyntax::default(),
        }
    }
}

impl RevealConfig {
    pub fn new(prefix: impl Into<String>, reveal_style: RevealStyle) -> Self {
        Self {
            prefix: prefix.into(),
            reveal_style,
            ..Self::default()
        }
    }

    pub fn with_word_syntax(mut self, word_syntax: WordSyntax) -> Self {
        self.word_syntax = word_syntax;
        self
    }

    /// Reject configurations the scanner cannot run with
    pub fn validate(&self) -> Result<(), RevealError> {
        if self.prefix.is_empty() {
            return Err(RevealError::InvalidConfiguration(
                "prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON settings object and validate it
    pub fn from_json(json: &str) -> Result<Self, RevealError> {
        let config: RevealConfig = serde_json::from_str(json)
            .map_err(|e| RevealError::InvalidConfiguration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}
