//! Error types for typegate with categorization:
//!
//! - **Declaration errors**: a signature is malformed ([`TypeSignatureError`])
//! - **Call errors**: an argument or a result failed its declared behavior
//!   ([`ArgumentTypeError`], [`ReturnTypeError`])
//! - **Ambient errors**: configuration, IO and registry state
//!
//! The three validation kinds are structured values; the top-level [`Error`]
//! wraps them so callers can propagate everything with `?`.

use std::fmt;

use thiserror::Error;

use crate::checker::ordinalize;

/// A declaration is malformed: wrong shape, illegal key type or an
/// unrecognized behavior. Raised eagerly when a signature is defined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid type signature: {reason}")]
pub struct TypeSignatureError {
    reason: String,
}

impl TypeSignatureError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Error for a leaf that is not any known behavior.
    pub fn unknown_behavior(inspected: impl fmt::Display) -> Self {
        Self::new(format!("Unknown type behavior {inspected}"))
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Which argument of a call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentPosition {
    /// 1-based ordinal of a positional argument
    Positional(usize),
    /// Name of a keyword argument
    Keyword(String),
}

impl fmt::Display for ArgumentPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional(ordinal) => write!(f, "{}", ordinalize(*ordinal)),
            Self::Keyword(key) => write!(f, "'{key}'"),
        }
    }
}

/// A positional or keyword argument failed its declared behavior.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("for {position} argument:\n{explanation}")]
pub struct ArgumentTypeError {
    position: ArgumentPosition,
    explanation: String,
}

impl ArgumentTypeError {
    pub fn new(position: ArgumentPosition, explanation: impl Into<String>) -> Self {
        Self {
            position,
            explanation: explanation.into(),
        }
    }

    pub const fn position(&self) -> &ArgumentPosition {
        &self.position
    }

    /// The structural explanation, without the `for ... argument:` prefix.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

/// A call result failed its declared return behavior.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("for return:\n{explanation}")]
pub struct ReturnTypeError {
    explanation: String,
}

impl ReturnTypeError {
    pub fn new(explanation: impl Into<String>) -> Self {
        Self {
            explanation: explanation.into(),
        }
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

/// Top-level error type for everything typegate can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    TypeSignature(#[from] TypeSignatureError),

    #[error(transparent)]
    ArgumentType(#[from] ArgumentTypeError),

    #[error(transparent)]
    ReturnType(#[from] ReturnTypeError),

    /// Caller passed something unusable, such as an empty method name
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(String),

    /// Registry state is unusable (poisoned lock)
    #[error("Registry error: {0}")]
    Registry(String),
}

impl Error {
    /// True for the declaration-time error kind.
    pub const fn is_declaration_error(&self) -> bool {
        matches!(self, Self::TypeSignature(_))
    }

    /// True for the two call-time validation kinds.
    pub const fn is_validation_failure(&self) -> bool {
        matches!(self, Self::ArgumentType(_) | Self::ReturnType(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::ParseError(format!("Failed to parse config: {err}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

/// Result type alias for typegate operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_signature_error_display() {
        let err = TypeSignatureError::new("type signature is empty hash");
        assert_eq!(
            err.to_string(),
            "Invalid type signature: type signature is empty hash"
        );
    }

    #[test]
    fn test_unknown_behavior_display() {
        let err = TypeSignatureError::unknown_behavior(123);
        assert_eq!(
            err.to_string(),
            "Invalid type signature: Unknown type behavior 123"
        );
    }

    #[test]
    fn test_argument_error_positional_display() {
        let err = ArgumentTypeError::new(
            ArgumentPosition::Positional(2),
            "Expected 1 to be a String",
        );
        assert_eq!(
            err.to_string(),
            "for 2nd argument:\nExpected 1 to be a String"
        );
        assert_eq!(err.explanation(), "Expected 1 to be a String");
    }

    #[test]
    fn test_argument_error_keyword_display() {
        let err = ArgumentTypeError::new(
            ArgumentPosition::Keyword("name".to_string()),
            "Expected 1 to be a String",
        );
        assert_eq!(
            err.to_string(),
            "for 'name' argument:\nExpected 1 to be a String"
        );
    }

    #[test]
    fn test_return_error_display() {
        let err = ReturnTypeError::new("Expected \"x\" to be nil");
        assert_eq!(err.to_string(), "for return:\nExpected \"x\" to be nil");
    }

    #[test]
    fn test_error_wraps_transparently() {
        let err: Error = ReturnTypeError::new("Expected 1 to be nil").into();
        assert_eq!(err.to_string(), "for return:\nExpected 1 to be nil");
        assert!(err.is_validation_failure());
        assert!(!err.is_declaration_error());
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::IoError(_)));
    }

    #[test]
    fn test_declaration_error_kind() {
        let err: Error = TypeSignatureError::new("bad").into();
        assert!(err.is_declaration_error());
        assert!(!err.is_validation_failure());
    }
}
