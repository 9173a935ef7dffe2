//! Decode configuration
//!
//! Policies that control how strictly a document is decoded. A configuration
//! is threaded through [`crate::factory::DocumentFactory`] and kept on the
//! resulting [`crate::dom::Document`]. It can be written by hand or loaded
//! from YAML or JSON:
//!
//! ```yaml
//! strict_unknown_fields: false
//! enum_policy: lenient
//! integrity_policy: strict
//! scope_fallback: score_fallback
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dom::{Cmper, SCORE_PARTID};
use crate::error::{MusxError, Result};

/// What to do with an enum code that has no mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumPolicy {
    /// Fail the whole decode with a decode error
    #[default]
    Strict,
    /// Log a warning and use the enum's default variant
    Lenient,
}

/// What to do with a record that fails its integrity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityPolicy {
    /// Abort document construction
    #[default]
    Strict,
    /// Log the failure and keep the record
    Lenient,
}

/// Decides which scopes a part-scoped lookup consults, in order.
///
/// Only the part id is consulted. A record's [`ShareMode`](crate::dom::ShareMode)
/// records how it was stored in the file and never changes which scope
/// answers: any record present in an earlier scope wins, whatever its sharing.
pub trait ScopeFallback: fmt::Debug + Send + Sync {
    fn lookup_order(&self, part_id: Cmper) -> Vec<Cmper>;
}

/// Built-in scope fallback rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Try the requested part, then the score
    #[default]
    ScoreFallback,
    /// Only the requested part
    PartOnly,
}

impl ScopeFallback for FallbackPolicy {
    fn lookup_order(&self, part_id: Cmper) -> Vec<Cmper> {
        match self {
            FallbackPolicy::ScoreFallback if part_id != SCORE_PARTID => vec![part_id, SCORE_PARTID],
            _ => vec![part_id],
        }
    }
}

/// Runtime decode options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Report unknown child fields as decode errors (for record types that
    /// require all their fields to be known)
    pub strict_unknown_fields: bool,
    pub enum_policy: EnumPolicy,
    pub integrity_policy: IntegrityPolicy,
    pub scope_fallback: FallbackPolicy,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            strict_unknown_fields: false,
            enum_policy: EnumPolicy::Strict,
            integrity_policy: IntegrityPolicy::Strict,
            scope_fallback: FallbackPolicy::ScoreFallback,
        }
    }
}

impl DecodeConfig {
    /// Every policy relaxed: unknown enums and broken invariants are logged.
    pub fn lenient() -> Self {
        Self {
            strict_unknown_fields: false,
            enum_policy: EnumPolicy::Lenient,
            integrity_policy: IntegrityPolicy::Lenient,
            scope_fallback: FallbackPolicy::ScoreFallback,
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(MusxError::Config(format!(
                "unrecognized config file extension: {}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecodeConfig::default();
        assert!(!config.strict_unknown_fields);
        assert_eq!(config.enum_policy, EnumPolicy::Strict);
        assert_eq!(config.integrity_policy, IntegrityPolicy::Strict);
        assert_eq!(config.scope_fallback, FallbackPolicy::ScoreFallback);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = DecodeConfig::from_yaml_str("enum_policy: lenient\n").unwrap();
        assert_eq!(config.enum_policy, EnumPolicy::Lenient);
        assert_eq!(config.integrity_policy, IntegrityPolicy::Strict);
    }

    #[test]
    fn test_json_config() {
        let config = DecodeConfig::from_json_str(
            r#"{"strict_unknown_fields": true, "scope_fallback": "part_only"}"#,
        )
        .unwrap();
        assert!(config.strict_unknown_fields);
        assert_eq!(config.scope_fallback, FallbackPolicy::PartOnly);
    }

    #[test]
    fn test_bad_config_value() {
        let err = DecodeConfig::from_yaml_str("enum_policy: sometimes\n").unwrap_err();
        assert!(matches!(err, MusxError::Config(_)));
    }

    #[test]
    fn test_lookup_order() {
        assert_eq!(FallbackPolicy::ScoreFallback.lookup_order(3), vec![3, SCORE_PARTID]);
        assert_eq!(FallbackPolicy::ScoreFallback.lookup_order(SCORE_PARTID), vec![SCORE_PARTID]);
        assert_eq!(FallbackPolicy::PartOnly.lookup_order(3), vec![3]);
    }
}
