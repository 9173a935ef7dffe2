//! Enum translation tables
//!
//! Enumerated fields arrive either as strings (`<vertMeasExprAlign>aboveStaff`)
//! or as integer codes (`<sides>1`). Each enum carries a static table, and an
//! unmapped value is handled according to [`EnumPolicy`].

use std::fmt;

use crate::config::EnumPolicy;
use crate::error::{MusxError, Result};

/// Enum written as a string value in XML.
pub trait XmlEnum: Copy + Default + fmt::Debug + 'static {
    const XML_VALUES: &'static [(&'static str, Self)];

    fn from_xml(value: &str) -> Option<Self> {
        Self::XML_VALUES
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, variant)| *variant)
    }

    /// XML name of a variant, if it has one.
    fn xml_name(self) -> Option<&'static str>
    where
        Self: PartialEq,
    {
        Self::XML_VALUES
            .iter()
            .find(|(_, variant)| *variant == self)
            .map(|(name, _)| *name)
    }
}

/// Enum written as an integer code in XML.
pub trait XmlCodeEnum: Copy + Default + fmt::Debug + 'static {
    const CODES: &'static [(i32, Self)];

    fn from_code(code: i32) -> Option<Self> {
        Self::CODES
            .iter()
            .find(|(value, _)| *value == code)
            .map(|(_, variant)| *variant)
    }
}

fn unmapped<E: Default + fmt::Debug>(value: &dyn fmt::Display, policy: EnumPolicy) -> Result<E> {
    let type_name = std::any::type_name::<E>().rsplit("::").next().unwrap_or("enum");
    match policy {
        EnumPolicy::Strict => Err(MusxError::decode(format!(
            "invalid {} value from xml: {}",
            type_name, value
        ))),
        EnumPolicy::Lenient => {
            let fallback = E::default();
            log::warn!("invalid {} value from xml: {}; using {:?}", type_name, value, fallback);
            Ok(fallback)
        }
    }
}

pub fn to_enum<E: XmlEnum>(value: &str, policy: EnumPolicy) -> Result<E> {
    match E::from_xml(value) {
        Some(variant) => Ok(variant),
        None => unmapped(&value, policy),
    }
}

pub fn code_to_enum<E: XmlCodeEnum>(code: i32, policy: EnumPolicy) -> Result<E> {
    match E::from_code(code) {
        Some(variant) => Ok(variant),
        None => unmapped(&code, policy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    enum Corner {
        #[default]
        None,
        Round,
        Square,
    }

    impl XmlEnum for Corner {
        const XML_VALUES: &'static [(&'static str, Self)] = &[("round", Corner::Round), ("square", Corner::Square)];
    }

    impl XmlCodeEnum for Corner {
        const CODES: &'static [(i32, Self)] = &[(0, Corner::None), (1, Corner::Round), (2, Corner::Square)];
    }

    #[test]
    fn test_string_lookup() {
        assert_eq!(to_enum::<Corner>("square", EnumPolicy::Strict).unwrap(), Corner::Square);
        assert_eq!(Corner::Round.xml_name(), Some("round"));
        assert_eq!(Corner::None.xml_name(), None);
    }

    #[test]
    fn test_code_lookup() {
        assert_eq!(code_to_enum::<Corner>(1, EnumPolicy::Strict).unwrap(), Corner::Round);
    }

    #[test]
    fn test_strict_policy_rejects_unknown() {
        let err = to_enum::<Corner>("oval", EnumPolicy::Strict).unwrap_err();
        assert!(matches!(err, MusxError::Decode(_)));
        assert!(err.to_string().contains("Corner"));
        assert!(code_to_enum::<Corner>(9, EnumPolicy::Strict).is_err());
    }

    #[test]
    fn test_lenient_policy_substitutes_default() {
        assert_eq!(to_enum::<Corner>("oval", EnumPolicy::Lenient).unwrap(), Corner::None);
        assert_eq!(code_to_enum::<Corner>(9, EnumPolicy::Lenient).unwrap(), Corner::None);
    }
}
