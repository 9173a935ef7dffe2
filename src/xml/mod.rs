//! XML capability layer
//!
//! The decoder never touches a parser directly. It sees elements through
//! [`XmlElement`]: a tag name, attributes, text and child elements. Any
//! parser that can provide those four things is a backend.
//!
//! Two backends ship with the crate:
//! - [`RoxmlBackend`] (default) borrows from the input with roxmltree
//! - [`QuickXmlBackend`] builds an owned element tree from quick-xml events

mod quick;
mod roxml;

pub use quick::{OwnedElement, QuickXmlBackend};
pub use roxml::RoxmlBackend;

use crate::error::{MusxError, Result};

// ============================================================================
// ELEMENT CONTRACT
// ============================================================================

/// Read-only view of one XML element.
pub trait XmlElement {
    /// Local tag name
    fn tag_name(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Text content, or an empty string for an empty element
    fn text(&self) -> &str;

    /// Child elements in document order (text and comments excluded)
    fn child_elements(&self) -> Vec<Box<dyn XmlElement + '_>>;
}

impl<T: XmlElement + ?Sized> XmlElement for &T {
    fn tag_name(&self) -> &str {
        (**self).tag_name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        (**self).attribute(name)
    }

    fn text(&self) -> &str {
        (**self).text()
    }

    fn child_elements(&self) -> Vec<Box<dyn XmlElement + '_>> {
        (**self).child_elements()
    }
}

impl<'e> dyn XmlElement + 'e {
    /// First child element with the given tag name
    pub fn first_child(&self, name: &str) -> Option<Box<dyn XmlElement + '_>> {
        self.child_elements().into_iter().find(|c| c.tag_name() == name)
    }

    /// All child elements with the given tag name
    pub fn children_named(&self, name: &str) -> Vec<Box<dyn XmlElement + '_>> {
        self.child_elements()
            .into_iter()
            .filter(|c| c.tag_name() == name)
            .collect()
    }

    pub fn text_trimmed(&self) -> &str {
        self.text().trim()
    }

    /// Convert this element's text to `T`.
    pub fn text_as<T: FromXmlText>(&self) -> Result<T> {
        T::from_xml_text(self.text_trimmed())
            .map_err(|e| MusxError::decode(format!("<{}>: {}", self.tag_name(), e)))
    }

    /// Convert this element's text and store it in `target`.
    pub fn text_into<T: FromXmlText>(&self, target: &mut T) -> Result<()> {
        *target = self.text_as()?;
        Ok(())
    }

    /// Convert an attribute to `T`, `None` when the attribute is absent.
    pub fn attribute_as<T: FromXmlText>(&self, name: &str) -> Result<Option<T>> {
        match self.attribute(name) {
            None => Ok(None),
            Some(value) => T::from_xml_text(value.trim()).map(Some).map_err(|e| {
                MusxError::decode(format!("<{} {}=\"{}\">: {}", self.tag_name(), name, value, e))
            }),
        }
    }

    /// Like [`attribute_as`](Self::attribute_as) but the attribute must exist.
    pub fn required_attribute<T: FromXmlText>(&self, name: &str) -> Result<T> {
        self.attribute_as(name)?.ok_or_else(|| {
            MusxError::decode(format!("<{}> is missing required attribute \"{}\"", self.tag_name(), name))
        })
    }

    /// Text of the named child converted to `T`, `None` when the child is absent.
    pub fn child_text_as<T: FromXmlText>(&self, name: &str) -> Result<Option<T>> {
        match self.first_child(name) {
            Some(child) => child.text_as().map(Some),
            None => Ok(None),
        }
    }
}

// ============================================================================
// SCALAR CONVERSION
// ============================================================================

/// Scalar types that can be read from element text or attribute values.
///
/// Empty text converts to the type's zero value. For `bool` the presence of
/// an empty element means `true`.
pub trait FromXmlText: Sized {
    fn from_xml_text(text: &str) -> std::result::Result<Self, String>;
}

macro_rules! impl_from_xml_text_number {
    ($($t:ty),*) => {
        $(
            impl FromXmlText for $t {
                fn from_xml_text(text: &str) -> std::result::Result<Self, String> {
                    if text.is_empty() {
                        return Ok(<$t>::default());
                    }
                    text.parse::<$t>().map_err(|e| {
                        format!("cannot convert \"{}\" to {}: {}", text, stringify!($t), e)
                    })
                }
            }
        )*
    };
}

impl_from_xml_text_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl FromXmlText for bool {
    fn from_xml_text(text: &str) -> std::result::Result<Self, String> {
        match text {
            "" | "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(format!("cannot convert \"{}\" to bool", other)),
        }
    }
}

impl FromXmlText for String {
    fn from_xml_text(text: &str) -> std::result::Result<Self, String> {
        Ok(text.to_string())
    }
}

/// Characters are stored as numeric code points.
impl FromXmlText for char {
    fn from_xml_text(text: &str) -> std::result::Result<Self, String> {
        let code = u32::from_xml_text(text)?;
        char::from_u32(code).ok_or_else(|| format!("{} is not a valid character code", code))
    }
}

// ============================================================================
// BACKENDS
// ============================================================================

/// A parser that can expose a document's root element.
pub trait XmlBackend {
    /// Parse `xml` and hand its root element to `f`.
    fn with_root<R, F>(xml: &str, f: F) -> Result<R>
    where
        F: FnOnce(&dyn XmlElement) -> Result<R>;
}
