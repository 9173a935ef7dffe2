//! Texts: raw Enigma strings keyed by text number.
//!
//! The element content is the whole record, so these types have no child
//! fields. The factory stores the text in the identity.

use super::{pooled_record, Cmper, Document, FontInfo, Record, TextsBase};
use crate::error::Result;
use crate::factory::populator::{FieldPopulator, FieldTable};

macro_rules! text_record {
    ($(#[$doc:meta])* $name:ident, $tag:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            base: TextsBase,
        }

        pooled_record!($name, TextsBase);

        impl Record for $name {
            const XML_NODE_NAME: &'static str = $tag;
        }

        impl FieldPopulator for $name {
            const XML_MAPPING: FieldTable<Self> = &[];
        }

        impl $name {
            pub fn text_number(&self) -> Cmper {
                self.base.text_number
            }

            /// The raw Enigma string, tags included.
            pub fn text(&self) -> &str {
                &self.base.text
            }

            pub fn first_font_info(&self, document: &Document) -> Result<Option<FontInfo>> {
                self.base.parse_first_font_info(document)
            }
        }
    };
}

text_record!(
    /// Text of a text block.
    BlockText,
    "blockText"
);

text_record!(
    /// Text of a text expression.
    ExpressionText,
    "expression"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{PooledRecord, ShareMode};

    #[test]
    fn test_text_comes_from_identity() {
        let text = BlockText::from_identity(TextsBase::new(0, ShareMode::All, 4, "^fontTxt(Times)Hello"));
        assert_eq!(text.text_number(), 4);
        assert_eq!(text.text(), "^fontTxt(Times)Hello");
    }
}
