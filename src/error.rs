//! Error type shared by the scanner, builder, session and transformers.

use crate::reveal::UnitId;

/// Reveal engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealError {
    /// Prefix is empty or could not be compiled into a matcher
    InvalidConfiguration(String),
    /// Builder received an empty token
    MalformedToken,
    /// Pointer event routed to a unit the session no longer holds
    UnknownUnit(UnitId),
    /// The session has handed out every unit or region id it can represent
    IdsExhausted,
}

impl std::fmt::Display for RevealError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevealError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            RevealError::MalformedToken => write!(f, "Malformed token: token must not be empty"),
            RevealError::UnknownUnit(id) => write!(f, "Unknown reveal unit: {}", id.0),
            RevealError::IdsExhausted => write!(f, "Reveal session ran out of ids"),
        }
    }
}

impl std::error::Error for RevealError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = RevealError::InvalidConfiguration("prefix must not be empty".into());
        assert_eq!(err.to_string(), "Invalid configuration: prefix must not be empty");
        assert_eq!(RevealError::UnknownUnit(UnitId(7)).to_string(), "Unknown reveal unit: 7");
        assert_eq!(RevealError::IdsExhausted.to_string(), "Reveal session ran out of ids");
    }
}
