//! Others records: keyed by `cmper` and incident.
//!
//! Several of these records are only complete once the whole document is
//! decoded. Their populators register resolvers that fill in back-links
//! (staff membership, category contents) and validate cross-record rules.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::details::StaffGroup;
use super::texts::{BlockText, ExpressionText};
use super::{
    pooled_record, ClefIndex, Cmper, Document, Edu, Efix, EntryNumber, Evpu, FontInfo, Inci, OthersBase, PooledRecord,
    Record, RecordIdentity, BASE_SYSTEM_ID, MAX_LAYERS, SCORE_PARTID,
};
use crate::error::{IntegrityError, Result};
use crate::factory::enums::{XmlCodeEnum, XmlEnum};
use crate::factory::populator::{FieldPopulator, FieldTable, PopulateContext, ResolverFn};
use crate::utils::enigma_string;
use crate::xml::XmlElement;

// ============================================================================
// ENCLOSURES
// ============================================================================

/// Outline drawn around a text expression or repeat marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnclosureShape {
    #[default]
    NoEnclosure,
    Rectangle,
    Ellipse,
    Triangle,
    Diamond,
    Pentagon,
    Hexagon,
    Heptagon,
    Octogon,
}

impl XmlCodeEnum for EnclosureShape {
    const CODES: &'static [(i32, Self)] = &[
        (0, EnclosureShape::NoEnclosure),
        (1, EnclosureShape::Rectangle),
        (2, EnclosureShape::Ellipse),
        (3, EnclosureShape::Triangle),
        (4, EnclosureShape::Diamond),
        (5, EnclosureShape::Pentagon),
        (6, EnclosureShape::Hexagon),
        (7, EnclosureShape::Heptagon),
        (8, EnclosureShape::Octogon),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enclosure {
    pub x_add: Evpu,
    pub y_add: Evpu,
    pub x_margin: Evpu,
    pub y_margin: Evpu,
    pub line_width: Efix,
    pub shape: EnclosureShape,
    pub corner_radius: Efix,
    pub fixed_size: bool,
    pub equal_aspect: bool,
    pub not_tall: bool,
    pub opaque: bool,
    pub round_corners: bool,
}

impl Enclosure {
    fn check(&self, type_name: &'static str, key: String) -> std::result::Result<(), IntegrityError> {
        if self.line_width < 0 {
            return Err(IntegrityError::new(
                type_name,
                key,
                format!("negative enclosure line width {}", self.line_width),
            ));
        }
        Ok(())
    }
}

impl FieldPopulator for Enclosure {
    const XML_MAPPING: FieldTable<Self> = &[
        ("xAdd", |e, i, _| e.text_into(&mut i.x_add)),
        ("yAdd", |e, i, _| e.text_into(&mut i.y_add)),
        ("xMargin", |e, i, _| e.text_into(&mut i.x_margin)),
        ("yMargin", |e, i, _| e.text_into(&mut i.y_margin)),
        ("lineWidth", |e, i, _| e.text_into(&mut i.line_width)),
        ("sides", |e, i, c| c.code_enum_into(e, &mut i.shape)),
        ("cornerRadius", |e, i, _| e.text_into(&mut i.corner_radius)),
        ("fixedSize", |e, i, _| e.text_into(&mut i.fixed_size)),
        ("equalAspect", |e, i, _| e.text_into(&mut i.equal_aspect)),
        ("notTall", |e, i, _| e.text_into(&mut i.not_tall)),
        ("opaque", |e, i, _| e.text_into(&mut i.opaque)),
        ("roundCorners", |e, i, _| e.text_into(&mut i.round_corners)),
    ];
}

/// Records that are nothing but an [`Enclosure`] under an identity.
macro_rules! enclosure_record {
    ($(#[$doc:meta])* $name:ident, $tag:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            base: OthersBase,
            pub enclosure: Enclosure,
        }

        pooled_record!($name, OthersBase);

        impl Record for $name {
            const XML_NODE_NAME: &'static str = $tag;

            fn integrity_check(&self) -> std::result::Result<(), IntegrityError> {
                self.enclosure.check(Self::XML_NODE_NAME, self.base.describe())
            }
        }

        impl FieldPopulator for $name {
            const XML_MAPPING: FieldTable<Self> = &[];

            // fields sit directly under the record element
            fn populate(&mut self, element: &dyn XmlElement, ctx: &mut PopulateContext<'_>) -> Result<()> {
                self.enclosure.populate(element, ctx)
            }
        }
    };
}

enclosure_record!(
    /// Enclosure of the text expression with the same cmper.
    TextExpressionEnclosure,
    "textExpressionEnclosure"
);

enclosure_record!(
    /// Enclosure of the text repeat with the same cmper.
    TextRepeatEnclosure,
    "textRepeatEnclosure"
);

// ============================================================================
// FONTS AND FRAMES
// ============================================================================

/// A font name and its platform charset; `cmper` is the font id.
#[derive(Debug, Clone, Default)]
pub struct FontDefinition {
    base: OthersBase,
    pub charset_bank: String,
    pub charset_val: i32,
    pub pitch: i32,
    pub family: i32,
    pub name: String,
}

pooled_record!(FontDefinition, OthersBase);

impl Record for FontDefinition {
    const XML_NODE_NAME: &'static str = "fontName";
}

impl FieldPopulator for FontDefinition {
    const XML_MAPPING: FieldTable<Self> = &[
        ("charsetBank", |e, i, _| e.text_into(&mut i.charset_bank)),
        ("charsetVal", |e, i, _| e.text_into(&mut i.charset_val)),
        ("pitch", |e, i, _| e.text_into(&mut i.pitch)),
        ("family", |e, i, _| e.text_into(&mut i.family)),
        ("name", |e, i, _| e.text_into(&mut i.name)),
    ];
}

impl FontDefinition {
    pub fn cmper(&self) -> Cmper {
        self.base.cmper
    }
}

/// Where one layer's entries start and end within a measure.
///
/// A frame may be spread over several incidents; only one of them carries
/// the start entry.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    base: OthersBase,
    pub start_entry: EntryNumber,
    pub end_entry: EntryNumber,
    /// Offset of the first entry from the start of the measure
    pub start_time: Edu,
}

pooled_record!(Frame, OthersBase);

impl Record for Frame {
    const XML_NODE_NAME: &'static str = "frameSpec";
}

impl FieldPopulator for Frame {
    const XML_MAPPING: FieldTable<Self> = &[
        ("startEntry", |e, i, _| e.text_into(&mut i.start_entry)),
        ("endEntry", |e, i, _| e.text_into(&mut i.end_entry)),
        ("startTime", |e, i, _| e.text_into(&mut i.start_time)),
    ];
}

impl Frame {
    pub fn cmper(&self) -> Cmper {
        self.base.cmper
    }

    pub fn inci(&self) -> Inci {
        self.base.inci
    }
}

// ============================================================================
// INSTRUMENT LISTS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MusicRange {
    pub start_meas: Cmper,
    pub start_edu: Edu,
    pub end_meas: Cmper,
    pub end_edu: Edu,
}

impl FieldPopulator for MusicRange {
    const XML_MAPPING: FieldTable<Self> = &[
        ("startMeas", |e, i, _| e.text_into(&mut i.start_meas)),
        ("startEdu", |e, i, _| e.text_into(&mut i.start_edu)),
        ("endMeas", |e, i, _| e.text_into(&mut i.end_meas)),
        ("endEdu", |e, i, _| e.text_into(&mut i.end_edu)),
    ];
}

/// One slot of a system's instrument list. `cmper` is the list id and the
/// incidents give the staff order.
#[derive(Debug, Clone, Default)]
pub struct InstrumentUsed {
    base: OthersBase,
    pub staff_id: Cmper,
    pub dist_from_top: Evpu,
    pub range: Option<MusicRange>,
}

pooled_record!(InstrumentUsed, OthersBase);

impl Record for InstrumentUsed {
    const XML_NODE_NAME: &'static str = "instUsed";
}

impl FieldPopulator for InstrumentUsed {
    const XML_MAPPING: FieldTable<Self> = &[
        ("inst", |e, i, _| e.text_into(&mut i.staff_id)),
        ("trackType", |_, _, _| Ok(())),
        ("distFromTop", |e, i, _| e.text_into(&mut i.dist_from_top)),
        ("range", |e, i, c| c.populated(e).map(|range| i.range = Some(range))),
    ];
}

impl InstrumentUsed {
    /// Staff in slot `index` of an instrument list.
    pub fn staff_at_index(document: &Document, list: &[Arc<InstrumentUsed>], index: usize) -> Option<Arc<Staff>> {
        let slot = list.get(index)?;
        document.others().get::<Staff>(slot.part_id(), slot.staff_id)
    }

    /// Position of `staff_id` in an instrument list.
    pub fn index_for_staff(list: &[Arc<InstrumentUsed>], staff_id: Cmper) -> Option<usize> {
        list.iter().position(|slot| slot.staff_id == staff_id)
    }
}

// ============================================================================
// LAYERS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct LayerAttributes {
    base: OthersBase,
    pub rest_offset: i32,
    pub freeze_ties_to_stems: bool,
    pub only_if_other_layers_have_notes: bool,
    pub use_rest_offset: bool,
    pub freeze_stems_up: bool,
    pub freeze_layer: bool,
    pub playback: bool,
    pub affect_spacing: bool,
    pub ignore_hidden_notes_only: bool,
    pub ignore_hidden_layers: bool,
    pub hide_layer: bool,
}

pooled_record!(LayerAttributes, OthersBase);

impl Record for LayerAttributes {
    const XML_NODE_NAME: &'static str = "layerAtts";
}

impl FieldPopulator for LayerAttributes {
    const XML_MAPPING: FieldTable<Self> = &[
        ("restOffset", |e, i, _| e.text_into(&mut i.rest_offset)),
        ("flipTies", |e, i, _| e.text_into(&mut i.freeze_ties_to_stems)),
        ("floatLayer", |e, i, _| e.text_into(&mut i.only_if_other_layers_have_notes)),
        ("useRestOff", |e, i, _| e.text_into(&mut i.use_rest_offset)),
        ("freezeLayUp", |e, i, _| e.text_into(&mut i.freeze_stems_up)),
        ("freezeLayer", |e, i, _| e.text_into(&mut i.freeze_layer)),
        ("playback", |e, i, _| e.text_into(&mut i.playback)),
        ("spacing", |e, i, _| e.text_into(&mut i.affect_spacing)),
        ("ignoreHidden", |e, i, _| e.text_into(&mut i.ignore_hidden_notes_only)),
        ("ignoreHiddenLayers", |e, i, _| e.text_into(&mut i.ignore_hidden_layers)),
        ("hideLayer", |e, i, _| e.text_into(&mut i.hide_layer)),
    ];

    const RESOLVERS: &'static [(&'static str, ResolverFn)] =
        &[("layerAtts", resolve_layer_attributes)];
}

/// The score must define exactly one record per layer, in layer order.
fn resolve_layer_attributes(document: &mut Document) -> Result<()> {
    let cmpers: Vec<Cmper> = document
        .others()
        .get_all::<LayerAttributes>(SCORE_PARTID)
        .iter()
        .map(|layer| layer.base.cmper)
        .collect();
    let result = if cmpers.len() != MAX_LAYERS {
        Err(IntegrityError::new(
            LayerAttributes::XML_NODE_NAME,
            "score",
            format!("expected exactly {} layer records, found {}", MAX_LAYERS, cmpers.len()),
        ))
    } else if cmpers.iter().enumerate().any(|(index, cmper)| usize::from(*cmper) != index) {
        Err(IntegrityError::new(
            LayerAttributes::XML_NODE_NAME,
            "score",
            format!("expected cmpers 0, 1, 2, 3 in order, found {:?}", cmpers),
        ))
    } else {
        Ok(())
    };
    document.report_integrity(result)
}

// ============================================================================
// MARKING CATEGORIES AND TEXT EXPRESSIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryType {
    /// Not set; never valid in a finished document
    #[default]
    Invalid,
    Dynamics,
    TempoMarks,
    TempoAlterations,
    ExpressiveText,
    TechniqueText,
    RehearsalMarks,
    Misc,
}

impl XmlEnum for CategoryType {
    const XML_VALUES: &'static [(&'static str, Self)] = &[
        ("dynamics", CategoryType::Dynamics),
        ("tempoMarks", CategoryType::TempoMarks),
        ("tempoAlts", CategoryType::TempoAlterations),
        ("expressiveText", CategoryType::ExpressiveText),
        ("techniqueText", CategoryType::TechniqueText),
        ("rehearsalMarks", CategoryType::RehearsalMarks),
        ("misc", CategoryType::Misc),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalMeasExprAlign {
    Manual,
    LeftOfAllNoteheads,
    LeftOfPrimaryNotehead,
    Stem,
    CenterPrimaryNotehead,
    CenterAllNoteheads,
    RightOfAllNoteheads,
    #[default]
    LeftBarline,
    StartTimeSig,
    AfterClefKeyTime,
    StartOfMusic,
    CenterOverBarlines,
    CenterOverMusic,
    RightBarline,
}

impl XmlEnum for HorizontalMeasExprAlign {
    const XML_VALUES: &'static [(&'static str, Self)] = &[
        ("manual", HorizontalMeasExprAlign::Manual),
        ("leftOfAllNoteheads", HorizontalMeasExprAlign::LeftOfAllNoteheads),
        ("leftOfPrimaryNotehead", HorizontalMeasExprAlign::LeftOfPrimaryNotehead),
        ("stem", HorizontalMeasExprAlign::Stem),
        ("centerPrimaryNotehead", HorizontalMeasExprAlign::CenterPrimaryNotehead),
        ("centerAllNoteheads", HorizontalMeasExprAlign::CenterAllNoteheads),
        ("rightOfAllNoteheads", HorizontalMeasExprAlign::RightOfAllNoteheads),
        ("leftEdge", HorizontalMeasExprAlign::LeftBarline),
        ("startTimeSig", HorizontalMeasExprAlign::StartTimeSig),
        ("afterClefKeyTime", HorizontalMeasExprAlign::AfterClefKeyTime),
        ("startOfMusic", HorizontalMeasExprAlign::StartOfMusic),
        ("centerOverBarlines", HorizontalMeasExprAlign::CenterOverBarlines),
        ("centerOverMusic", HorizontalMeasExprAlign::CenterOverMusic),
        ("rightEdge", HorizontalMeasExprAlign::RightBarline),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalMeasExprAlign {
    Manual,
    RefLine,
    #[default]
    AboveStaff,
    BelowStaff,
    TopNote,
    BottomNote,
    AboveEntry,
    BelowEntry,
    AboveStaffOrEntry,
    BelowStaffOrEntry,
}

impl XmlEnum for VerticalMeasExprAlign {
    const XML_VALUES: &'static [(&'static str, Self)] = &[
        ("manual", VerticalMeasExprAlign::Manual),
        ("refLine", VerticalMeasExprAlign::RefLine),
        ("aboveStaff", VerticalMeasExprAlign::AboveStaff),
        ("belowStaff", VerticalMeasExprAlign::BelowStaff),
        ("topNote", VerticalMeasExprAlign::TopNote),
        ("bottomNote", VerticalMeasExprAlign::BottomNote),
        ("aboveEntry", VerticalMeasExprAlign::AboveEntry),
        ("belowEntry", VerticalMeasExprAlign::BelowEntry),
        ("aboveStaffOrEntry", VerticalMeasExprAlign::AboveStaffOrEntry),
        ("belowStaffOrEntry", VerticalMeasExprAlign::BelowStaffOrEntry),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalExprJustification {
    #[default]
    Left,
    Center,
    Right,
}

impl XmlEnum for HorizontalExprJustification {
    const XML_VALUES: &'static [(&'static str, Self)] = &[
        ("left", HorizontalExprJustification::Left),
        ("center", HorizontalExprJustification::Center),
        ("right", HorizontalExprJustification::Right),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RehearsalMarkStyle {
    #[default]
    None,
    Letters,
    LetterNumbers,
    LettersLowerCase,
    LettersNumbersLowerCase,
    Numbers,
    MeasureNumber,
}

impl XmlEnum for RehearsalMarkStyle {
    const XML_VALUES: &'static [(&'static str, Self)] = &[
        ("letters", RehearsalMarkStyle::Letters),
        ("letNum", RehearsalMarkStyle::LetterNumbers),
        ("lettersLc", RehearsalMarkStyle::LettersLowerCase),
        ("letNumLc", RehearsalMarkStyle::LettersNumbersLowerCase),
        ("numbers", RehearsalMarkStyle::Numbers),
        ("measNum", RehearsalMarkStyle::MeasureNumber),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackType {
    #[default]
    None,
    Tempo,
    MidiController,
    KeyVelocity,
    Transpose,
    Channel,
    MidiPatchChange,
    PercussionMidiMap,
    MidiPitchWheel,
    ChannelPressure,
    RestrikeKeys,
    Dump,
    PlayTempoToolChanges,
    IgnoreTempoToolChanges,
    Swing,
    SmartPlaybackOn,
    SmartPlaybackOff,
}

impl XmlEnum for PlaybackType {
    const XML_VALUES: &'static [(&'static str, Self)] = &[
        ("none", PlaybackType::None),
        ("time", PlaybackType::Tempo),
        ("midiController", PlaybackType::MidiController),
        ("amplitude", PlaybackType::KeyVelocity),
        ("transpose", PlaybackType::Transpose),
        ("channel", PlaybackType::Channel),
        ("midiPatchChange", PlaybackType::MidiPatchChange),
        ("percMidiMap", PlaybackType::PercussionMidiMap),
        ("midiPitchwheel", PlaybackType::MidiPitchWheel),
        ("midiPressure", PlaybackType::ChannelPressure),
        ("rekey", PlaybackType::RestrikeKeys),
        ("dump", PlaybackType::Dump),
        ("startTempo", PlaybackType::PlayTempoToolChanges),
        ("stopTempo", PlaybackType::IgnoreTempoToolChanges),
        ("swing", PlaybackType::Swing),
        ("hpOn", PlaybackType::SmartPlaybackOn),
        ("hpOff", PlaybackType::SmartPlaybackOff),
    ];
}

/// Shared defaults for a group of markings (dynamics, tempo marks, ...).
#[derive(Debug, Clone, Default)]
pub struct MarkingCategory {
    base: OthersBase,
    pub category_type: CategoryType,
    pub text_font: Option<FontInfo>,
    pub music_font: Option<FontInfo>,
    pub number_font: Option<FontInfo>,
    pub horz_align: HorizontalMeasExprAlign,
    pub vert_align: VerticalMeasExprAlign,
    pub justification: HorizontalExprJustification,
    pub horz_offset: Evpu,
    pub vert_offset_baseline: Evpu,
    pub vert_offset_entry: Evpu,
    pub uses_text_font: bool,
    pub uses_music_font: bool,
    pub uses_number_font: bool,
    pub uses_positioning: bool,
    pub uses_staff_list: bool,
    pub uses_break_mm_rests: bool,
    pub break_mm_rest: bool,
    pub user_created: bool,
    pub staff_list: Cmper,
    /// Cmpers of the text expressions in this category, filled after decode
    pub text_expressions: BTreeSet<Cmper>,
}

pooled_record!(MarkingCategory, OthersBase);

impl Record for MarkingCategory {
    const XML_NODE_NAME: &'static str = "markingsCategory";
}

impl FieldPopulator for MarkingCategory {
    const XML_MAPPING: FieldTable<Self> = &[
        ("categoryType", |e, i, c| c.enum_into(e, &mut i.category_type)),
        ("textFont", |e, i, c| c.populated(e).map(|font| i.text_font = Some(font))),
        ("musicFont", |e, i, c| c.populated(e).map(|font| i.music_font = Some(font))),
        ("numberFont", |e, i, c| c.populated(e).map(|font| i.number_font = Some(font))),
        ("horzAlign", |e, i, c| c.enum_into(e, &mut i.horz_align)),
        ("vertAlign", |e, i, c| c.enum_into(e, &mut i.vert_align)),
        ("justification", |e, i, c| c.enum_into(e, &mut i.justification)),
        ("horzOffset", |e, i, _| e.text_into(&mut i.horz_offset)),
        ("vertOffsetBaseline", |e, i, _| e.text_into(&mut i.vert_offset_baseline)),
        ("vertOffsetEntry", |e, i, _| e.text_into(&mut i.vert_offset_entry)),
        ("usesTextFont", |e, i, _| e.text_into(&mut i.uses_text_font)),
        ("usesMusicFont", |e, i, _| e.text_into(&mut i.uses_music_font)),
        ("usesNumberFont", |e, i, _| e.text_into(&mut i.uses_number_font)),
        ("usesPositioning", |e, i, _| e.text_into(&mut i.uses_positioning)),
        ("usesStaffList", |e, i, _| e.text_into(&mut i.uses_staff_list)),
        ("usesBreakMmRests", |e, i, _| e.text_into(&mut i.uses_break_mm_rests)),
        ("breakMmRest", |e, i, _| e.text_into(&mut i.break_mm_rest)),
        ("userCreated", |e, i, _| e.text_into(&mut i.user_created)),
        ("staffList", |e, i, _| e.text_into(&mut i.staff_list)),
    ];

    const RESOLVERS: &'static [(&'static str, ResolverFn)] =
        &[("markingsCategory", resolve_marking_categories)];
}

fn resolve_marking_categories(document: &mut Document) -> Result<()> {
    let untyped: Vec<String> = document
        .others()
        .get_all::<MarkingCategory>(SCORE_PARTID)
        .iter()
        .filter(|cat| cat.category_type == CategoryType::Invalid)
        .map(|cat| cat.base.describe())
        .collect();
    for key in untyped {
        document.report_integrity(Err(IntegrityError::new(
            MarkingCategory::XML_NODE_NAME,
            key,
            "has no categoryType",
        )))?;
    }
    Ok(())
}

impl MarkingCategory {
    pub fn cmper(&self) -> Cmper {
        self.base.cmper
    }

    /// User-visible name, empty when the category has none.
    pub fn name(&self, document: &Document) -> String {
        document
            .others()
            .get::<MarkingCategoryName>(self.base.part_id, self.base.cmper)
            .map(|name| name.name.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarkingCategoryName {
    base: OthersBase,
    pub name: String,
}

pooled_record!(MarkingCategoryName, OthersBase);

impl Record for MarkingCategoryName {
    const XML_NODE_NAME: &'static str = "markingsCategoryName";
}

impl FieldPopulator for MarkingCategoryName {
    const XML_MAPPING: FieldTable<Self> = &[("name", |e, i, _| e.text_into(&mut i.name))];
}

/// Text expression definition. `cmper` is the expression id.
#[derive(Debug, Clone, Default)]
pub struct TextExpressionDef {
    base: OthersBase,
    /// Id of the [`TextBlock`] holding the expression text
    pub text_id_key: Cmper,
    /// Owning [`MarkingCategory`], 0 for none
    pub category_id: Cmper,
    pub rehearsal_mark_style: RehearsalMarkStyle,
    pub value: i32,
    pub aux_data1: i32,
    pub play_pass: i32,
    pub hide_measure_num: bool,
    pub match_playback: bool,
    pub use_aux_data: bool,
    pub has_enclosure: bool,
    pub break_mm_rest: bool,
    pub created_by_hp: bool,
    pub playback_type: PlaybackType,
    pub horz_meas_expr_align: HorizontalMeasExprAlign,
    pub horz_expr_justification: HorizontalExprJustification,
    pub vert_meas_expr_align: VerticalMeasExprAlign,
    pub meas_x_adjust: Evpu,
    pub y_adjust_entry: Evpu,
    pub y_adjust_baseline: Evpu,
    pub use_category_fonts: bool,
    pub use_category_pos: bool,
    pub description: String,
}

pooled_record!(TextExpressionDef, OthersBase);

impl Record for TextExpressionDef {
    const XML_NODE_NAME: &'static str = "textExprDef";
}

impl FieldPopulator for TextExpressionDef {
    const XML_MAPPING: FieldTable<Self> = &[
        ("textIDKey", |e, i, _| e.text_into(&mut i.text_id_key)),
        ("categoryID", |e, i, _| e.text_into(&mut i.category_id)),
        ("rehearsalMarkStyle", |e, i, c| c.enum_into(e, &mut i.rehearsal_mark_style)),
        ("value", |e, i, _| e.text_into(&mut i.value)),
        ("auxdata1", |e, i, _| e.text_into(&mut i.aux_data1)),
        ("playPass", |e, i, _| e.text_into(&mut i.play_pass)),
        ("hideMeasureNum", |e, i, _| e.text_into(&mut i.hide_measure_num)),
        ("matchPlayback", |e, i, _| e.text_into(&mut i.match_playback)),
        ("useAuxData", |e, i, _| e.text_into(&mut i.use_aux_data)),
        ("newEnclosure", |e, i, _| e.text_into(&mut i.has_enclosure)),
        ("breakMmRest", |e, i, _| e.text_into(&mut i.break_mm_rest)),
        ("createdByHp", |e, i, _| e.text_into(&mut i.created_by_hp)),
        ("playType", |e, i, c| c.enum_into(e, &mut i.playback_type)),
        ("horzMeasExprAlign", |e, i, c| c.enum_into(e, &mut i.horz_meas_expr_align)),
        ("horzExprAlign", |e, i, c| c.enum_into(e, &mut i.horz_expr_justification)),
        ("vertMeasExprAlign", |e, i, c| c.enum_into(e, &mut i.vert_meas_expr_align)),
        ("measXAdjust", |e, i, _| e.text_into(&mut i.meas_x_adjust)),
        ("yAdjustEntry", |e, i, _| e.text_into(&mut i.y_adjust_entry)),
        ("yAdjustBaseline", |e, i, _| e.text_into(&mut i.y_adjust_baseline)),
        ("useCategoryFonts", |e, i, _| e.text_into(&mut i.use_category_fonts)),
        ("useCategoryPos", |e, i, _| e.text_into(&mut i.use_category_pos)),
        ("descStr", |e, i, _| e.text_into(&mut i.description)),
    ];

    const RESOLVERS: &'static [(&'static str, ResolverFn)] =
        &[("textExprDef", resolve_text_expressions)];
}

/// Link each expression into its category's expression set.
fn resolve_text_expressions(document: &mut Document) -> Result<()> {
    let links: Vec<(Cmper, Cmper, Cmper)> = document
        .others()
        .get_all::<TextExpressionDef>(SCORE_PARTID)
        .iter()
        .filter(|expr| expr.category_id != 0)
        .map(|expr| (expr.base.part_id, expr.base.cmper, expr.category_id))
        .collect();
    for (part_id, expr_id, category_id) in links {
        let linked = match document.others.get_mut::<MarkingCategory>(part_id, category_id, 0)? {
            Some(category) => {
                category.text_expressions.insert(expr_id);
                true
            }
            None => false,
        };
        if !linked {
            document.report_integrity(Err(IntegrityError::new(
                TextExpressionDef::XML_NODE_NAME,
                format!("cmper {}", expr_id),
                format!("marking category {} does not exist", category_id),
            )))?;
        }
    }
    Ok(())
}

impl TextExpressionDef {
    pub fn cmper(&self) -> Cmper {
        self.base.cmper
    }

    /// The expression's enclosure, if it has one.
    pub fn enclosure(&self, document: &Document) -> Option<Arc<TextExpressionEnclosure>> {
        if !self.has_enclosure {
            return None;
        }
        document
            .others()
            .get::<TextExpressionEnclosure>(self.base.part_id, self.base.cmper)
    }

    pub fn category(&self, document: &Document) -> Option<Arc<MarkingCategory>> {
        if self.category_id == 0 {
            return None;
        }
        document.others().get::<MarkingCategory>(self.base.part_id, self.category_id)
    }
}

// ============================================================================
// MULTI-STAFF INSTRUMENTS
// ============================================================================

/// Maps a multi-staff instrument to the [`StaffGroup`] that brackets it.
/// `cmper` matches the [`MultiStaffInstrumentGroup`].
#[derive(Debug, Clone, Default)]
pub struct MultiStaffGroupId {
    base: OthersBase,
    pub staff_group_id: Cmper,
}

pooled_record!(MultiStaffGroupId, OthersBase);

impl Record for MultiStaffGroupId {
    const XML_NODE_NAME: &'static str = "multiStaffGroupID";
}

impl FieldPopulator for MultiStaffGroupId {
    const XML_MAPPING: FieldTable<Self> = &[("staffGroupID", |e, i, _| e.text_into(&mut i.staff_group_id))];

    const RESOLVERS: &'static [(&'static str, ResolverFn)] =
        &[("multiStaffGroupID", resolve_multi_staff_group_ids)];
}

fn resolve_multi_staff_group_ids(document: &mut Document) -> Result<()> {
    let links: Vec<(Cmper, Cmper)> = document
        .others()
        .get_all::<MultiStaffGroupId>(SCORE_PARTID)
        .iter()
        .map(|id| (id.base.cmper, id.staff_group_id))
        .collect();
    for (inst_id, group_id) in links {
        let linked = match document
            .details
            .get_mut::<StaffGroup>(SCORE_PARTID, BASE_SYSTEM_ID, group_id, 0)?
        {
            Some(group) => {
                group.multi_staff_group_id = inst_id;
                true
            }
            None => false,
        };
        if !linked {
            document.report_integrity(Err(IntegrityError::new(
                MultiStaffGroupId::XML_NODE_NAME,
                format!("cmper {}", inst_id),
                format!("staff group {} does not exist", group_id),
            )))?;
        }
    }
    Ok(())
}

/// Staves that make up one multi-staff instrument (e.g. piano).
#[derive(Debug, Clone, Default)]
pub struct MultiStaffInstrumentGroup {
    base: OthersBase,
    /// Zero slots are omitted from the file, so this holds only real staves.
    pub staff_nums: Vec<Cmper>,
}

pooled_record!(MultiStaffInstrumentGroup, OthersBase);

impl Record for MultiStaffInstrumentGroup {
    const XML_NODE_NAME: &'static str = "multiStaffInstGroup";
}

fn push_staff_num(e: &dyn XmlElement, i: &mut MultiStaffInstrumentGroup, _: &mut PopulateContext<'_>) -> Result<()> {
    i.staff_nums.push(e.text_as()?);
    Ok(())
}

impl FieldPopulator for MultiStaffInstrumentGroup {
    const XML_MAPPING: FieldTable<Self> = &[
        ("staffNum1", push_staff_num),
        ("staffNum2", push_staff_num),
        ("staffNum3", push_staff_num),
    ];

    const RESOLVERS: &'static [(&'static str, ResolverFn)] =
        &[("multiStaffInstGroup", resolve_multi_staff_instruments)];
}

/// Point each member staff back at its instrument group.
fn resolve_multi_staff_instruments(document: &mut Document) -> Result<()> {
    let groups: Vec<(Cmper, Vec<Cmper>)> = document
        .others()
        .get_all::<MultiStaffInstrumentGroup>(SCORE_PARTID)
        .iter()
        .map(|group| (group.base.cmper, group.staff_nums.clone()))
        .collect();
    for (group_id, staff_nums) in groups {
        for staff_id in staff_nums {
            let claimed_by = match document.others.get_mut::<Staff>(SCORE_PARTID, staff_id, 0)? {
                Some(staff) if staff.multi_staff_inst_id != 0 => Some(staff.multi_staff_inst_id),
                Some(staff) => {
                    staff.multi_staff_inst_id = group_id;
                    None
                }
                None => None,
            };
            if let Some(other) = claimed_by {
                document.report_integrity(Err(IntegrityError::new(
                    Staff::XML_NODE_NAME,
                    format!("cmper {}", staff_id),
                    format!("appears in multi-staff groups {} and {}", other, group_id),
                )))?;
            }
        }
    }
    Ok(())
}

impl MultiStaffInstrumentGroup {
    pub fn cmper(&self) -> Cmper {
        self.base.cmper
    }

    pub fn staff_at_index(&self, document: &Document, index: usize) -> Option<Arc<Staff>> {
        let staff_id = *self.staff_nums.get(index)?;
        document.others().get::<Staff>(self.base.part_id, staff_id)
    }

    pub fn index_of(&self, staff_id: Cmper) -> Option<usize> {
        self.staff_nums.iter().position(|num| *num == staff_id)
    }

    /// The staff group bracketing this instrument, through its
    /// [`MultiStaffGroupId`].
    pub fn staff_group(&self, document: &Document) -> Option<Arc<StaffGroup>> {
        let id = document
            .others()
            .get::<MultiStaffGroupId>(self.base.part_id, self.base.cmper)?;
        document
            .details()
            .get::<StaffGroup>(self.base.part_id, BASE_SYSTEM_ID, id.staff_group_id)
    }
}

// ============================================================================
// PARTS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct PartDefinition {
    base: OthersBase,
    /// [`TextBlock`] holding the part name
    pub name_id: Cmper,
    pub part_order: i32,
    pub copies: i32,
    pub extract_part: bool,
    pub needs_recalc: bool,
    pub use_as_smp_inst: bool,
    pub smart_music_inst: i32,
    pub default_name_staff: Cmper,
    pub default_name_group: Cmper,
}

pooled_record!(PartDefinition, OthersBase);

impl Record for PartDefinition {
    const XML_NODE_NAME: &'static str = "partDef";
}

impl FieldPopulator for PartDefinition {
    const XML_MAPPING: FieldTable<Self> = &[
        ("nameID", |e, i, _| e.text_into(&mut i.name_id)),
        ("partOrder", |e, i, _| e.text_into(&mut i.part_order)),
        ("copies", |e, i, _| e.text_into(&mut i.copies)),
        ("extractPart", |e, i, _| e.text_into(&mut i.extract_part)),
        ("needsRecalc", |e, i, _| e.text_into(&mut i.needs_recalc)),
        ("useAsSmpInst", |e, i, _| e.text_into(&mut i.use_as_smp_inst)),
        ("smartMusicInst", |e, i, _| e.text_into(&mut i.smart_music_inst)),
        ("defaultNameStaff", |e, i, _| e.text_into(&mut i.default_name_staff)),
        ("defaultNameGroup", |e, i, _| e.text_into(&mut i.default_name_group)),
    ];
}

impl PartDefinition {
    /// The part id this definition describes.
    pub fn cmper(&self) -> Cmper {
        self.base.cmper
    }

    /// Part name with Enigma tags removed.
    pub fn name(&self, document: &Document) -> String {
        TextBlock::text_for_id(document, self.name_id, true)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PartGlobals {
    base: OthersBase,
    pub show_transposed: bool,
    pub scroll_view_iu_list: Cmper,
    pub studio_view_iu_list: Cmper,
    pub special_part_extraction_iu_list: Cmper,
}

pooled_record!(PartGlobals, OthersBase);

impl Record for PartGlobals {
    const XML_NODE_NAME: &'static str = "partGlobals";
}

impl FieldPopulator for PartGlobals {
    const XML_MAPPING: FieldTable<Self> = &[
        ("showTransposed", |e, i, _| e.text_into(&mut i.show_transposed)),
        ("scrollViewIUlist", |e, i, _| e.text_into(&mut i.scroll_view_iu_list)),
        ("studioViewIUlist", |e, i, _| e.text_into(&mut i.studio_view_iu_list)),
        ("pageViewIUlist", |e, i, _| e.text_into(&mut i.special_part_extraction_iu_list)),
    ];
}

// ============================================================================
// STAVES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoNumberingStyle {
    #[default]
    ArabicSuffix,
    RomanSuffix,
    OrdinalPrefix,
    AlphaSuffix,
    ArabicPrefix,
}

impl XmlEnum for AutoNumberingStyle {
    const XML_VALUES: &'static [(&'static str, Self)] = &[
        ("arabicSuffix", AutoNumberingStyle::ArabicSuffix),
        ("romanSuffix", AutoNumberingStyle::RomanSuffix),
        ("ordinalPrefix", AutoNumberingStyle::OrdinalPrefix),
        ("alphaSuffix", AutoNumberingStyle::AlphaSuffix),
        ("arabicPrefix", AutoNumberingStyle::ArabicPrefix),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StemDirection {
    #[default]
    Default,
    AlwaysUp,
    AlwaysDown,
}

impl XmlEnum for StemDirection {
    const XML_VALUES: &'static [(&'static str, Self)] = &[
        ("alwaysUp", StemDirection::AlwaysUp),
        ("alwaysDown", StemDirection::AlwaysDown),
    ];
}

#[derive(Debug, Clone, Default)]
pub struct Staff {
    base: OthersBase,
    pub default_clef: ClefIndex,
    pub transposed_clef: ClefIndex,
    pub staff_lines: i32,
    /// Line positions of a custom staff
    pub custom_staff: Vec<i32>,
    pub line_space: Evpu,
    pub inst_uuid: String,
    pub has_styles: bool,
    pub show_name_in_parts: bool,
    pub hide_name_in_score: bool,
    pub top_barline_offset: Evpu,
    pub bot_barline_offset: Evpu,
    pub dw_rest_offset: Evpu,
    pub w_rest_offset: Evpu,
    pub h_rest_offset: Evpu,
    pub other_rest_offset: Evpu,
    pub stem_reversal: i32,
    pub full_name_text_id: Cmper,
    pub abbrv_name_text_id: Cmper,
    pub bot_repeat_dot_off: Evpu,
    pub top_repeat_dot_off: Evpu,
    pub vert_tab_num_off: Evpu,
    pub hide_stems: bool,
    pub stem_direction: StemDirection,
    pub auto_numbering: AutoNumberingStyle,
    pub use_auto_numbering: bool,
    /// Owning [`MultiStaffInstrumentGroup`], 0 for none. Set after decode.
    pub multi_staff_inst_id: Cmper,
}

pooled_record!(Staff, OthersBase);

impl Record for Staff {
    const XML_NODE_NAME: &'static str = "staffSpec";
}

impl FieldPopulator for Staff {
    const XML_MAPPING: FieldTable<Self> = &[
        ("defaultClef", |e, i, _| e.text_into(&mut i.default_clef)),
        ("transposedClef", |e, i, _| e.text_into(&mut i.transposed_clef)),
        ("staffLines", |e, i, _| e.text_into(&mut i.staff_lines)),
        ("customStaff", |e, i, _| {
            i.custom_staff = e
                .children_named("staffLine")
                .iter()
                .map(|line| line.text_as())
                .collect::<Result<Vec<i32>>>()?;
            Ok(())
        }),
        ("lineSpace", |e, i, _| e.text_into(&mut i.line_space)),
        ("instUuid", |e, i, _| {
            i.inst_uuid = e.text_trimmed().to_string();
            Ok(())
        }),
        ("hasStyles", |e, i, _| e.text_into(&mut i.has_styles)),
        ("showNameParts", |e, i, _| e.text_into(&mut i.show_name_in_parts)),
        ("hideStfNameInScore", |e, i, _| e.text_into(&mut i.hide_name_in_score)),
        ("topBarlineOffset", |e, i, _| e.text_into(&mut i.top_barline_offset)),
        ("botBarlineOffset", |e, i, _| e.text_into(&mut i.bot_barline_offset)),
        ("dwRestOffset", |e, i, _| e.text_into(&mut i.dw_rest_offset)),
        ("wRestOffset", |e, i, _| e.text_into(&mut i.w_rest_offset)),
        ("hRestOffset", |e, i, _| e.text_into(&mut i.h_rest_offset)),
        ("otherRestOffset", |e, i, _| e.text_into(&mut i.other_rest_offset)),
        ("stemReversal", |e, i, _| e.text_into(&mut i.stem_reversal)),
        ("fullName", |e, i, _| e.text_into(&mut i.full_name_text_id)),
        ("abbrvName", |e, i, _| e.text_into(&mut i.abbrv_name_text_id)),
        ("botRepeatDotOff", |e, i, _| e.text_into(&mut i.bot_repeat_dot_off)),
        ("topRepeatDotOff", |e, i, _| e.text_into(&mut i.top_repeat_dot_off)),
        ("vertTabNumOff", |e, i, _| e.text_into(&mut i.vert_tab_num_off)),
        ("hideStems", |e, i, _| e.text_into(&mut i.hide_stems)),
        ("stemDir", |e, i, c| c.enum_into(e, &mut i.stem_direction)),
        ("autoNum", |e, i, c| c.enum_into(e, &mut i.auto_numbering)),
        ("useAutoNum", |e, i, _| e.text_into(&mut i.use_auto_numbering)),
    ];
}

impl Staff {
    pub fn cmper(&self) -> Cmper {
        self.base.cmper
    }

    /// Full staff name with Enigma tags removed.
    pub fn full_name(&self, document: &Document) -> String {
        TextBlock::text_for_id(document, self.full_name_text_id, true)
    }

    pub fn abbreviated_name(&self, document: &Document) -> String {
        TextBlock::text_for_id(document, self.abbrv_name_text_id, true)
    }

    pub fn multi_staff_instrument_group(&self, document: &Document) -> Option<Arc<MultiStaffInstrumentGroup>> {
        if self.multi_staff_inst_id == 0 {
            return None;
        }
        document
            .others()
            .get::<MultiStaffInstrumentGroup>(SCORE_PARTID, self.multi_staff_inst_id)
    }
}

// ============================================================================
// TEXT BLOCKS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextType {
    #[default]
    Block,
    Expression,
}

impl XmlEnum for TextType {
    const XML_VALUES: &'static [(&'static str, Self)] =
        &[("block", TextType::Block), ("expression", TextType::Expression)];
}

/// Layout wrapper around a text record; `text_type` picks which texts
/// category `text_id` refers to.
#[derive(Debug, Clone, Default)]
pub struct TextBlock {
    base: OthersBase,
    pub text_id: Cmper,
    pub line_spacing_percentage: i32,
    pub new_pos36: bool,
    pub show_shape: bool,
    pub no_expand_single_word: bool,
    pub word_wrap: bool,
    pub width: Evpu,
    pub height: Evpu,
    pub round_corners: bool,
    pub corner_radius: Efix,
    pub text_type: TextType,
}

pooled_record!(TextBlock, OthersBase);

impl Record for TextBlock {
    const XML_NODE_NAME: &'static str = "textBlock";
}

impl FieldPopulator for TextBlock {
    const XML_MAPPING: FieldTable<Self> = &[
        ("textID", |e, i, _| e.text_into(&mut i.text_id)),
        ("lineSpacingPercent", |e, i, _| e.text_into(&mut i.line_spacing_percentage)),
        ("newPos36", |e, i, _| e.text_into(&mut i.new_pos36)),
        ("showShape", |e, i, _| e.text_into(&mut i.show_shape)),
        ("noExpandSingleWord", |e, i, _| e.text_into(&mut i.no_expand_single_word)),
        ("wordWrap", |e, i, _| e.text_into(&mut i.word_wrap)),
        ("width", |e, i, _| e.text_into(&mut i.width)),
        ("height", |e, i, _| e.text_into(&mut i.height)),
        ("roundCorners", |e, i, _| e.text_into(&mut i.round_corners)),
        ("cornerRadius", |e, i, _| e.text_into(&mut i.corner_radius)),
        ("textTag", |e, i, c| c.enum_into(e, &mut i.text_type)),
    ];
}

impl TextBlock {
    /// Raw Enigma text, or plain text when `trim_tags` is set. Empty when
    /// the referenced text record does not exist.
    pub fn text(&self, document: &Document, trim_tags: bool) -> String {
        let raw = match self.text_type {
            TextType::Block => document.texts().get::<BlockText>(self.text_id).map(|t| t.text().to_string()),
            TextType::Expression => document
                .texts()
                .get::<ExpressionText>(self.text_id)
                .map(|t| t.text().to_string()),
        };
        match raw {
            Some(text) if trim_tags => enigma_string::trim_tags(&enigma_string::replace_accidental_tags(&text)),
            Some(text) => text,
            None => String::new(),
        }
    }

    /// Text of the score's text block `text_id`, empty if there is none.
    pub fn text_for_id(document: &Document, text_id: Cmper, trim_tags: bool) -> String {
        document
            .others()
            .get::<TextBlock>(SCORE_PARTID, text_id)
            .map(|block| block.text(document, trim_tags))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DecodeConfig, EnumPolicy};
    use crate::factory::linker::ElementLinker;
    use crate::xml::{RoxmlBackend, XmlBackend};

    fn populate<T: FieldPopulator + Default>(xml: &str, config: &DecodeConfig) -> Result<T> {
        let mut linker = ElementLinker::new();
        RoxmlBackend::with_root(xml, |root| {
            let mut ctx = PopulateContext::new(config, &mut linker);
            ctx.populated::<T>(root)
        })
    }

    #[test]
    fn test_enclosure_record_reads_fields_from_its_own_element() {
        let xml = r#"<textExpressionEnclosure cmper="3">
            <xAdd>4</xAdd><lineWidth>256</lineWidth><sides>2</sides><opaque/>
        </textExpressionEnclosure>"#;
        let record: TextExpressionEnclosure = populate(xml, &DecodeConfig::default()).unwrap();
        assert_eq!(record.enclosure.x_add, 4);
        assert_eq!(record.enclosure.line_width, 256);
        assert_eq!(record.enclosure.shape, EnclosureShape::Ellipse);
        assert!(record.enclosure.opaque);
        assert!(!record.enclosure.round_corners);
    }

    #[test]
    fn test_enclosure_shape_code_out_of_range() {
        let xml = "<textRepeatEnclosure><sides>9</sides></textRepeatEnclosure>";
        assert!(populate::<TextRepeatEnclosure>(xml, &DecodeConfig::default()).is_err());
        let lenient = DecodeConfig {
            enum_policy: EnumPolicy::Lenient,
            ..DecodeConfig::default()
        };
        let record: TextRepeatEnclosure = populate(xml, &lenient).unwrap();
        assert_eq!(record.enclosure.shape, EnclosureShape::NoEnclosure);
    }

    #[test]
    fn test_negative_line_width_fails_integrity() {
        let mut record = TextExpressionEnclosure::default();
        assert!(record.integrity_check().is_ok());
        record.enclosure.line_width = -1;
        assert!(record.integrity_check().is_err());
    }

    #[test]
    fn test_multi_staff_group_skips_missing_slots() {
        let xml = "<multiStaffInstGroup><staffNum1>3</staffNum1><staffNum3>5</staffNum3></multiStaffInstGroup>";
        let group: MultiStaffInstrumentGroup = populate(xml, &DecodeConfig::default()).unwrap();
        assert_eq!(group.staff_nums, vec![3, 5]);
        assert_eq!(group.index_of(5), Some(1));
        assert_eq!(group.index_of(4), None);
    }

    #[test]
    fn test_staff_custom_lines_and_enums() {
        let xml = r#"<staffSpec>
            <customStaff><staffLine>2</staffLine><staffLine>4</staffLine></customStaff>
            <stemDir>alwaysDown</stemDir><autoNum>romanSuffix</autoNum><fullName>7</fullName>
        </staffSpec>"#;
        let staff: Staff = populate(xml, &DecodeConfig::default()).unwrap();
        assert_eq!(staff.custom_staff, vec![2, 4]);
        assert_eq!(staff.stem_direction, StemDirection::AlwaysDown);
        assert_eq!(staff.auto_numbering, AutoNumberingStyle::RomanSuffix);
        assert_eq!(staff.full_name_text_id, 7);
    }

    #[test]
    fn test_text_expression_enum_defaults() {
        let expr: TextExpressionDef =
            populate("<textExprDef><categoryID>2</categoryID></textExprDef>", &DecodeConfig::default()).unwrap();
        assert_eq!(expr.category_id, 2);
        assert_eq!(expr.horz_meas_expr_align, HorizontalMeasExprAlign::LeftBarline);
        assert_eq!(expr.vert_meas_expr_align, VerticalMeasExprAlign::AboveStaff);
        assert_eq!(expr.playback_type, PlaybackType::None);
        assert_eq!(HorizontalMeasExprAlign::RightBarline.xml_name(), Some("rightEdge"));
    }
}
