//! Options records: document-wide settings, one record per type and scope.

use std::collections::HashMap;

use lazy_static::lazy_static;

use super::{pooled_record, ClefIndex, Document, Efix, Evpu, FontInfo, OptionsBase, Record};
use crate::error::{IntegrityError, MusxError, Result};
use crate::factory::enums::XmlEnum;
use crate::factory::populator::{FieldPopulator, FieldTable};

// ============================================================================
// FONT OPTIONS
// ============================================================================

/// Which notation element a default font applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontType {
    #[default]
    Music,
    Key,
    Clef,
    Time,
    Chord,
    ChordAcci,
    Ending,
    Tuplet,
    TextBlock,
    LyricVerse,
    LyricChorus,
    LyricSection,
    MultiMeasRest,
    Tablature,
    ChordSuffix,
    Expression,
    Repeat,
    Fretboard,
    Flags,
    Accis,
    AltNotSlash,
    AltNotNum,
    Rests,
    ReptDots,
    Noteheads,
    AugDots,
    TimePlus,
    Articulation,
    Percussion,
    SmartShape8va,
    MeasNumb,
    StaffNames,
    AbbrvStaffNames,
    GroupNames,
    SmartShape8vb,
    SmartShape15ma,
    SmartShape15mb,
    SmartShapeTrill,
    SmartShapeWiggle,
    AbbrvGroupNames,
    BendCurveFull,
    BendCurveWhole,
    BendCurveFrac,
    TimeParts,
    TimePlusParts,
}

lazy_static! {
    static ref FONT_TYPES_BY_NAME: HashMap<&'static str, FontType> =
        FontType::XML_VALUES.iter().copied().collect();
}

impl XmlEnum for FontType {
    const XML_VALUES: &'static [(&'static str, Self)] = &[
        ("music", FontType::Music),
        ("key", FontType::Key),
        ("clef", FontType::Clef),
        ("time", FontType::Time),
        ("chord", FontType::Chord),
        ("chordAcci", FontType::ChordAcci),
        ("ending", FontType::Ending),
        ("tuplet", FontType::Tuplet),
        ("textBlock", FontType::TextBlock),
        ("lyricVerse", FontType::LyricVerse),
        ("lyricChorus", FontType::LyricChorus),
        ("lyricSection", FontType::LyricSection),
        ("multiMeasRest", FontType::MultiMeasRest),
        ("tablature", FontType::Tablature),
        ("chordSuffix", FontType::ChordSuffix),
        ("expression", FontType::Expression),
        ("repeat", FontType::Repeat),
        ("fretboard", FontType::Fretboard),
        ("flags", FontType::Flags),
        ("accis", FontType::Accis),
        ("altNotSlash", FontType::AltNotSlash),
        ("altNotNum", FontType::AltNotNum),
        ("rests", FontType::Rests),
        ("reptDots", FontType::ReptDots),
        ("noteheads", FontType::Noteheads),
        ("augDots", FontType::AugDots),
        ("timePlus", FontType::TimePlus),
        ("articulation", FontType::Articulation),
        ("percussion", FontType::Percussion),
        ("smartShape8va", FontType::SmartShape8va),
        ("measNumb", FontType::MeasNumb),
        ("staffNames", FontType::StaffNames),
        ("abbrvStaffNames", FontType::AbbrvStaffNames),
        ("groupNames", FontType::GroupNames),
        ("smartShape8vb", FontType::SmartShape8vb),
        ("smartShape15ma", FontType::SmartShape15ma),
        ("smartShape15mb", FontType::SmartShape15mb),
        ("smartShapeTrill", FontType::SmartShapeTrill),
        ("smartShapeWiggle", FontType::SmartShapeWiggle),
        ("abbrvGroupNames", FontType::AbbrvGroupNames),
        ("bendCurveFull", FontType::BendCurveFull),
        ("bendCurveWhole", FontType::BendCurveWhole),
        ("bendCurveFrac", FontType::BendCurveFrac),
        ("timeParts", FontType::TimeParts),
        ("timePlusParts", FontType::TimePlusParts),
    ];

    fn from_xml(value: &str) -> Option<Self> {
        FONT_TYPES_BY_NAME.get(value).copied()
    }
}

/// Default fonts for each kind of notation element.
#[derive(Debug, Clone, Default)]
pub struct FontOptions {
    base: OptionsBase,
    pub fonts: HashMap<FontType, FontInfo>,
}

pooled_record!(FontOptions, OptionsBase);

impl Record for FontOptions {
    const XML_NODE_NAME: &'static str = "fontOptions";
}

impl FieldPopulator for FontOptions {
    const XML_MAPPING: FieldTable<Self> = &[("font", |e, i, c| c.keyed_into(e, &mut i.fonts))];
}

impl FontOptions {
    pub fn font_info(&self, font_type: FontType) -> Result<&FontInfo> {
        self.fonts.get(&font_type).ok_or_else(|| {
            MusxError::invalid_argument(format!("font type {:?} not found in document", font_type))
        })
    }

    /// Look up a default font through the document's score options.
    pub fn font_info_for(document: &Document, font_type: FontType) -> Result<FontInfo> {
        let options = document
            .options()
            .get::<FontOptions>()
            .ok_or_else(|| MusxError::invalid_argument("default fonts not found in document"))?;
        options.font_info(font_type).cloned()
    }
}

// ============================================================================
// CLEF OPTIONS
// ============================================================================

/// One entry of the document's clef table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClefDef {
    /// Staff position of middle C relative to the top line
    pub middle_c_pos: i32,
    pub clef_char: char,
    pub staff_position: i32,
    pub baseline_adjust: Efix,
    pub shape_id: i32,
    pub is_shape: bool,
    pub scale_to_staff_height: bool,
    pub use_own_font: bool,
    pub font: Option<FontInfo>,
}

impl FieldPopulator for ClefDef {
    const XML_MAPPING: FieldTable<Self> = &[
        ("adjust", |e, i, _| e.text_into(&mut i.middle_c_pos)),
        ("clefChar", |e, i, _| e.text_into(&mut i.clef_char)),
        ("clefYDisp", |e, i, _| e.text_into(&mut i.staff_position)),
        ("baseAdjust", |e, i, _| e.text_into(&mut i.baseline_adjust)),
        ("shapeID", |e, i, _| e.text_into(&mut i.shape_id)),
        ("isShape", |e, i, _| e.text_into(&mut i.is_shape)),
        ("scaleToStaffHeight", |e, i, _| e.text_into(&mut i.scale_to_staff_height)),
        ("useOwnFont", |e, i, _| e.text_into(&mut i.use_own_font)),
        ("font", |e, i, c| c.populated(e).map(|font| i.font = Some(font))),
    ];
}

#[derive(Debug, Clone, Default)]
pub struct ClefOptions {
    base: OptionsBase,
    pub default_clef: ClefIndex,
    /// Size of mid-measure clef changes, in percent
    pub clef_change_percent: i32,
    pub clef_change_offset: Evpu,
    pub clef_front_separ: Evpu,
    pub clef_back_separ: Evpu,
    pub show_clef_first_system_only: bool,
    pub clef_key_separ: Evpu,
    pub clef_time_separ: Evpu,
    pub cautionary_clef_changes: bool,
    pub clef_defs: Vec<ClefDef>,
}

pooled_record!(ClefOptions, OptionsBase);

impl Record for ClefOptions {
    const XML_NODE_NAME: &'static str = "clefOptions";

    fn integrity_check(&self) -> std::result::Result<(), IntegrityError> {
        match self.clef_defs.iter().position(|def| def.use_own_font && def.font.is_none()) {
            Some(index) => Err(IntegrityError::new(
                Self::XML_NODE_NAME,
                format!("clefDef {}", index),
                "uses its own font but has no font",
            )),
            None => Ok(()),
        }
    }
}

impl FieldPopulator for ClefOptions {
    const XML_MAPPING: FieldTable<Self> = &[
        ("defaultClef", |e, i, _| e.text_into(&mut i.default_clef)),
        ("endMeasClefPercent", |e, i, _| e.text_into(&mut i.clef_change_percent)),
        ("endMeasClefPosAdd", |e, i, _| e.text_into(&mut i.clef_change_offset)),
        ("clefFront", |e, i, _| e.text_into(&mut i.clef_front_separ)),
        ("clefBack", |e, i, _| e.text_into(&mut i.clef_back_separ)),
        ("showClefFirstSystemOnly", |e, i, _| e.text_into(&mut i.show_clef_first_system_only)),
        ("clefKey", |e, i, _| e.text_into(&mut i.clef_key_separ)),
        ("clefTime", |e, i, _| e.text_into(&mut i.clef_time_separ)),
        ("cautionaryClefChanges", |e, i, _| e.text_into(&mut i.cautionary_clef_changes)),
        ("clefDef", |e, i, c| c.indexed_into(e, &mut i.clef_defs)),
    ];
}
