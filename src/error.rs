//! Error types for document decoding and traversal

use thiserror::Error;

/// A decoded record that violates a cross-field or cross-record invariant.
///
/// Carries the record's type name and a printable identity key so the
/// offending record can be located in the source document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{type_name} {key}: {message}")]
pub struct IntegrityError {
    pub type_name: &'static str,
    pub key: String,
    pub message: String,
}

impl IntegrityError {
    pub fn new(type_name: &'static str, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name,
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Main error type for musx operations.
#[derive(Error, Debug)]
pub enum MusxError {
    /// Malformed or structurally unparsable input
    #[error("Decode error: {0}")]
    Decode(String),

    /// Parsed record that violates an invariant
    #[error("Integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    /// Caller supplied an out-of-domain parameter
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Arithmetic outside its domain (zero denominator)
    #[error("Domain error: {0}")]
    Domain(String),

    /// Programming defect in the host application
    #[error("Logic error: {0}")]
    Logic(String),

    /// Unreadable or invalid decode configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MusxError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    pub fn logic(msg: impl Into<String>) -> Self {
        Self::Logic(msg.into())
    }
}

impl From<roxmltree::Error> for MusxError {
    fn from(e: roxmltree::Error) -> Self {
        Self::Decode(format!("XML parse error: {}", e))
    }
}

impl From<quick_xml::Error> for MusxError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Decode(format!("XML parse error: {}", e))
    }
}

impl From<serde_yaml::Error> for MusxError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<serde_json::Error> for MusxError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result type alias for musx operations.
pub type Result<T> = std::result::Result<T, MusxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_error_display() {
        let e = IntegrityError::new("GFrameHold", "[3, 915]", "has both clef and clef list");
        let text = e.to_string();
        assert!(text.contains("GFrameHold"));
        assert!(text.contains("915"));
        assert!(text.contains("both clef"));
    }

    #[test]
    fn test_integrity_converts_into_crate_error() {
        let err: MusxError = IntegrityError::new("Entry", "7", "bad").into();
        assert!(matches!(err, MusxError::Integrity(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: MusxError = io_err.into();
        assert!(matches!(err, MusxError::Io(_)));
    }

    #[test]
    fn test_error_from_xml() {
        let xml_err = roxmltree::Document::parse("<a>").unwrap_err();
        let err: MusxError = xml_err.into();
        assert!(matches!(err, MusxError::Decode(_)));
    }
}
