//! Identity bases shared by every record of a pool category, and the
//! embedded font description used across categories.

use super::others::FontDefinition;
use super::pool::ObjectKey;
use super::{Cmper, Document, EntryNumber, Inci, RecordIdentity, ShareMode, SCORE_PARTID};
use crate::error::{IntegrityError, MusxError, Result};
use crate::factory::populator::{FieldPopulator, FieldTable};
use crate::utils::enigma_string;

fn check_inci(inci: Inci, type_name: &'static str, key: String) -> std::result::Result<(), IntegrityError> {
    if inci < 0 {
        return Err(IntegrityError::new(type_name, key, format!("negative incident {}", inci)));
    }
    Ok(())
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Identity of an options record: one per type and scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsBase {
    pub part_id: Cmper,
    pub share_mode: ShareMode,
}

impl OptionsBase {
    pub fn new(part_id: Cmper, share_mode: ShareMode) -> Self {
        Self { part_id, share_mode }
    }
}

impl RecordIdentity for OptionsBase {
    fn object_key(&self, node_id: &'static str) -> ObjectKey {
        ObjectKey::new(node_id, self.part_id, None, None, None)
    }

    fn part_id(&self) -> Cmper {
        self.part_id
    }

    fn share_mode(&self) -> ShareMode {
        self.share_mode
    }

    fn describe(&self) -> String {
        format!("part {}", self.part_id)
    }
}

// ============================================================================
// OTHERS
// ============================================================================

/// Identity of an others record: `cmper` plus incident.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OthersBase {
    pub part_id: Cmper,
    pub share_mode: ShareMode,
    pub cmper: Cmper,
    pub inci: Inci,
}

impl OthersBase {
    pub fn new(part_id: Cmper, share_mode: ShareMode, cmper: Cmper, inci: Inci) -> Self {
        Self { part_id, share_mode, cmper, inci }
    }
}

impl RecordIdentity for OthersBase {
    fn object_key(&self, node_id: &'static str) -> ObjectKey {
        ObjectKey::new(node_id, self.part_id, Some(i32::from(self.cmper)), None, Some(self.inci))
    }

    fn part_id(&self) -> Cmper {
        self.part_id
    }

    fn share_mode(&self) -> ShareMode {
        self.share_mode
    }

    fn describe(&self) -> String {
        format!("part {} cmper {} inci {}", self.part_id, self.cmper, self.inci)
    }

    fn integrity_check(&self, type_name: &'static str) -> std::result::Result<(), IntegrityError> {
        check_inci(self.inci, type_name, self.describe())
    }
}

// ============================================================================
// DETAILS
// ============================================================================

/// Identity of a details record keyed by two cmpers (e.g. staff and measure).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsBase {
    pub part_id: Cmper,
    pub share_mode: ShareMode,
    pub cmper1: Cmper,
    pub cmper2: Cmper,
    pub inci: Inci,
}

impl DetailsBase {
    pub fn new(part_id: Cmper, share_mode: ShareMode, cmper1: Cmper, cmper2: Cmper, inci: Inci) -> Self {
        Self { part_id, share_mode, cmper1, cmper2, inci }
    }
}

impl RecordIdentity for DetailsBase {
    fn object_key(&self, node_id: &'static str) -> ObjectKey {
        ObjectKey::new(
            node_id,
            self.part_id,
            Some(i32::from(self.cmper1)),
            Some(i32::from(self.cmper2)),
            Some(self.inci),
        )
    }

    fn part_id(&self) -> Cmper {
        self.part_id
    }

    fn share_mode(&self) -> ShareMode {
        self.share_mode
    }

    fn describe(&self) -> String {
        format!(
            "part {} cmpers [{}, {}] inci {}",
            self.part_id, self.cmper1, self.cmper2, self.inci
        )
    }

    fn integrity_check(&self, type_name: &'static str) -> std::result::Result<(), IntegrityError> {
        check_inci(self.inci, type_name, self.describe())
    }
}

/// Identity of a details record attached to an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDetailsBase {
    pub part_id: Cmper,
    pub share_mode: ShareMode,
    pub entnum: EntryNumber,
    pub inci: Inci,
}

impl EntryDetailsBase {
    pub fn new(part_id: Cmper, share_mode: ShareMode, entnum: EntryNumber, inci: Inci) -> Self {
        Self { part_id, share_mode, entnum, inci }
    }
}

impl RecordIdentity for EntryDetailsBase {
    fn object_key(&self, node_id: &'static str) -> ObjectKey {
        ObjectKey::new(node_id, self.part_id, Some(self.entnum), None, Some(self.inci))
    }

    fn part_id(&self) -> Cmper {
        self.part_id
    }

    fn share_mode(&self) -> ShareMode {
        self.share_mode
    }

    fn describe(&self) -> String {
        format!("part {} entry {} inci {}", self.part_id, self.entnum, self.inci)
    }

    fn integrity_check(&self, type_name: &'static str) -> std::result::Result<(), IntegrityError> {
        check_inci(self.inci, type_name, self.describe())
    }
}

// ============================================================================
// TEXTS
// ============================================================================

/// Identity and content of a text record. The content is the element's
/// raw Enigma string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextsBase {
    pub part_id: Cmper,
    pub share_mode: ShareMode,
    pub text_number: Cmper,
    pub text: String,
}

impl TextsBase {
    pub fn new(part_id: Cmper, share_mode: ShareMode, text_number: Cmper, text: impl Into<String>) -> Self {
        Self {
            part_id,
            share_mode,
            text_number,
            text: text.into(),
        }
    }

    /// Font described by the run of font commands at the start of the text.
    ///
    /// `Ok(None)` when the text does not begin with a font command, or a
    /// command in the leading run cannot be applied.
    pub fn parse_first_font_info(&self, document: &Document) -> Result<Option<FontInfo>> {
        let mut search = self.text.as_str();
        let mut font_info = FontInfo::default();
        let mut found = false;

        while enigma_string::starts_with_font_command(search) {
            let end = match enigma_string::command_len(search) {
                Some(len) => len,
                None => break,
            };
            if !enigma_string::parse_font_command(&search[..end], &mut font_info, document)? {
                return Ok(None);
            }
            search = &search[end..];
            found = true;
        }

        Ok(found.then_some(font_info))
    }
}

impl RecordIdentity for TextsBase {
    fn object_key(&self, node_id: &'static str) -> ObjectKey {
        ObjectKey::new(node_id, self.part_id, Some(i32::from(self.text_number)), None, None)
    }

    fn part_id(&self) -> Cmper {
        self.part_id
    }

    fn share_mode(&self) -> ShareMode {
        self.share_mode
    }

    fn describe(&self) -> String {
        format!("text {}", self.text_number)
    }
}

// ============================================================================
// FONT INFO
// ============================================================================

/// A font reference with size and style flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontInfo {
    /// Cmper of the [`FontDefinition`] naming the font
    pub font_id: Cmper,
    pub font_size: i32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
    /// Size does not scale with the staff
    pub absolute: bool,
    pub hidden: bool,
}

impl FontInfo {
    const BOLD: u16 = 0x01;
    const ITALIC: u16 = 0x02;
    const UNDERLINE: u16 = 0x04;
    const STRIKEOUT: u16 = 0x20;
    const ABSOLUTE: u16 = 0x40;
    const HIDDEN: u16 = 0x80;

    /// Name of the font from the document's font definitions.
    pub fn font_name(&self, document: &Document) -> Result<String> {
        document
            .others()
            .get::<FontDefinition>(SCORE_PARTID, self.font_id)
            .map(|def| def.name.clone())
            .ok_or_else(|| {
                MusxError::invalid_argument(format!("font definition not found for font id {}", self.font_id))
            })
    }

    /// Point `font_id` at the definition with the given name.
    pub fn set_font_id_by_name(&mut self, name: &str, document: &Document) -> Result<()> {
        let def = document
            .others()
            .get_all::<FontDefinition>(SCORE_PARTID)
            .into_iter()
            .find(|def| def.name == name)
            .ok_or_else(|| {
                MusxError::invalid_argument(format!("font definition not found for font \"{}\"", name))
            })?;
        self.font_id = def.cmper();
        Ok(())
    }

    /// Style flags packed the way `^nfx` commands carry them.
    pub fn enigma_styles(&self) -> u16 {
        [
            (self.bold, Self::BOLD),
            (self.italic, Self::ITALIC),
            (self.underline, Self::UNDERLINE),
            (self.strikeout, Self::STRIKEOUT),
            (self.absolute, Self::ABSOLUTE),
            (self.hidden, Self::HIDDEN),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .fold(0, |acc, (_, bit)| acc | bit)
    }

    pub fn set_enigma_styles(&mut self, efx: u16) {
        self.bold = efx & Self::BOLD != 0;
        self.italic = efx & Self::ITALIC != 0;
        self.underline = efx & Self::UNDERLINE != 0;
        self.strikeout = efx & Self::STRIKEOUT != 0;
        self.absolute = efx & Self::ABSOLUTE != 0;
        self.hidden = efx & Self::HIDDEN != 0;
    }
}

impl FieldPopulator for FontInfo {
    const XML_MAPPING: FieldTable<Self> = &[
        ("fontID", |e, i, _| e.text_into(&mut i.font_id)),
        ("fontSize", |e, i, _| e.text_into(&mut i.font_size)),
        // one empty child per style flag
        ("efx", |e, i, _| {
            for effect in e.child_elements() {
                match effect.tag_name() {
                    "bold" => i.bold = true,
                    "italic" => i.italic = true,
                    "underline" => i.underline = true,
                    "strikeout" => i.strikeout = true,
                    "absolute" => i.absolute = true,
                    "hidden" => i.hidden = true,
                    other => log::debug!("ignoring unknown font effect <{}>", other),
                }
            }
            Ok(())
        }),
    ];
}
