//! quick-xml backend
//!
//! quick-xml is a pull parser, so the events are collected into an owned
//! element tree before the decoder sees them. Text is kept untrimmed, and an
//! element's text is the run of text and CDATA before its first child
//! element, matching the roxmltree backend.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{XmlBackend, XmlElement};
use crate::error::{MusxError, Result};

/// Parses with quick-xml into [`OwnedElement`]s.
pub struct QuickXmlBackend;

/// An element that owns its name, attributes, text and children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnedElement {
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub children: Vec<OwnedElement>,
}

impl OwnedElement {
    fn from_start(start: &BytesStart) -> Result<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = HashMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| MusxError::decode(format!("bad attribute on <{}>: {}", name, e)))?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.insert(key, value);
        }
        Ok(OwnedElement {
            name,
            attributes,
            ..Default::default()
        })
    }

    /// Parse a complete document and return its root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut buf = Vec::new();
        let mut stack: Vec<OwnedElement> = Vec::new();
        let mut root: Option<OwnedElement> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => stack.push(Self::from_start(e)?),
                Event::Empty(ref e) => {
                    let element = Self::from_start(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| MusxError::decode("unbalanced closing tag"))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
                Event::Text(e) => {
                    if let Some(current) = stack.last_mut().filter(|c| c.children.is_empty()) {
                        current.text.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = stack.last_mut().filter(|c| c.children.is_empty()) {
                        current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(MusxError::decode(format!("unclosed element <{}>", stack[0].name)));
        }
        root.ok_or_else(|| MusxError::decode("document has no root element"))
    }
}

impl XmlElement for OwnedElement {
    fn tag_name(&self) -> &str {
        &self.name
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn child_elements(&self) -> Vec<Box<dyn XmlElement + '_>> {
        self.children
            .iter()
            .map(|c| Box::new(c) as Box<dyn XmlElement + '_>)
            .collect()
    }
}

impl XmlBackend for QuickXmlBackend {
    fn with_root<R, F>(xml: &str, f: F) -> Result<R>
    where
        F: FnOnce(&dyn XmlElement) -> Result<R>,
    {
        let root = OwnedElement::parse(xml.trim_start_matches('\u{FEFF}'))?;
        f(&root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_tree_shape() {
        let root = OwnedElement::parse(r#"<a x="1"><b>t &amp; u</b><c/></a>"#).unwrap();
        assert_eq!(root.name, "a");
        assert_eq!(root.attributes.get("x").map(String::as_str), Some("1"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].text, "t & u");
        assert_eq!(root.children[1].name, "c");
    }

    #[test]
    fn test_unclosed_document_fails() {
        assert!(OwnedElement::parse("<a><b></b>").is_err());
    }
}
