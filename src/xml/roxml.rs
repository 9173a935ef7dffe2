//! roxmltree backend (zero-copy, default)

use roxmltree::{Document, Node, ParsingOptions};

use super::{XmlBackend, XmlElement};
use crate::error::{MusxError, Result};

/// Parses with roxmltree and borrows every element from the input.
pub struct RoxmlBackend;

struct RoxmlElement<'a, 'input>(Node<'a, 'input>);

impl<'a, 'input> XmlElement for RoxmlElement<'a, 'input> {
    fn tag_name(&self) -> &str {
        self.0.tag_name().name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.0.attribute(name)
    }

    fn text(&self) -> &str {
        self.0.text().unwrap_or("")
    }

    fn child_elements(&self) -> Vec<Box<dyn XmlElement + '_>> {
        self.0
            .children()
            .filter(|n| n.is_element())
            .map(|n| Box::new(RoxmlElement(n)) as Box<dyn XmlElement + '_>)
            .collect()
    }
}

impl XmlBackend for RoxmlBackend {
    fn with_root<R, F>(xml: &str, f: F) -> Result<R>
    where
        F: FnOnce(&dyn XmlElement) -> Result<R>,
    {
        // Payloads sometimes carry a BOM or whitespace before the declaration
        let xml = xml.trim_start_matches(|c: char| c == '\u{FEFF}' || c.is_whitespace());
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(xml, options)
            .map_err(|e| MusxError::decode(format!("XML parse error: {}", e)))?;
        f(&RoxmlElement(doc.root_element()))
    }
}
