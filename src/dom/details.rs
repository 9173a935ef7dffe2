//! Details records: keyed by two cmpers (or an entry number) and incident.

use std::collections::BTreeSet;

use super::others::InstrumentUsed;
use super::{
    pooled_record, ClefIndex, Cmper, DetailsBase, Document, Edu, EntryDetailsBase, EntryNumber, Evpu, Inci, Record,
    RecordIdentity, BASE_SYSTEM_ID, MAX_LAYERS, SCORE_PARTID,
};
use crate::error::{IntegrityError, Result};
use crate::factory::enums::{XmlCodeEnum, XmlEnum};
use crate::factory::populator::{FieldPopulator, FieldTable, ResolverFn};
use crate::utils::Fraction;

// ============================================================================
// GFRAMEHOLD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowClefMode {
    #[default]
    WhenNeeded,
    Never,
    Always,
}

impl XmlEnum for ShowClefMode {
    const XML_VALUES: &'static [(&'static str, Self)] =
        &[("hidden", ShowClefMode::Never), ("forced", ShowClefMode::Always)];
}

/// Contents of one staff in one measure: the clef and the frame of each
/// layer. `cmper1` is the staff and `cmper2` the measure.
#[derive(Debug, Clone, Default)]
pub struct GFrameHold {
    base: DetailsBase,
    /// Clef when there is no mid-measure clef change
    pub clef_id: Option<ClefIndex>,
    /// Clef list when there are mid-measure clef changes, 0 otherwise
    pub clef_list_id: Cmper,
    pub show_clef_mode: ShowClefMode,
    pub mirror_frame: bool,
    pub clef_percent: i32,
    /// [`Frame`](super::others::Frame) cmper per layer, 0 for an empty layer
    pub frames: [Cmper; MAX_LAYERS],
}

pooled_record!(GFrameHold, DetailsBase);

impl Record for GFrameHold {
    const XML_NODE_NAME: &'static str = "gfhold";

    fn integrity_check(&self) -> std::result::Result<(), IntegrityError> {
        match (self.clef_id, self.clef_list_id) {
            (Some(_), list) if list != 0 => Err(IntegrityError::new(
                Self::XML_NODE_NAME,
                self.base.describe(),
                "has both clef and clef list",
            )),
            (None, 0) => Err(IntegrityError::new(
                Self::XML_NODE_NAME,
                self.base.describe(),
                "has neither clef nor clef list",
            )),
            _ => Ok(()),
        }
    }
}

impl FieldPopulator for GFrameHold {
    const XML_MAPPING: FieldTable<Self> = &[
        ("clefID", |e, i, _| {
            i.clef_id = Some(e.text_as()?);
            Ok(())
        }),
        ("clefListID", |e, i, _| e.text_into(&mut i.clef_list_id)),
        ("clefMode", |e, i, c| c.enum_into(e, &mut i.show_clef_mode)),
        ("mirrorFrame", |e, i, _| e.text_into(&mut i.mirror_frame)),
        ("clefPercent", |e, i, _| e.text_into(&mut i.clef_percent)),
        ("frame1", |e, i, _| e.text_into(&mut i.frames[0])),
        ("frame2", |e, i, _| e.text_into(&mut i.frames[1])),
        ("frame3", |e, i, _| e.text_into(&mut i.frames[2])),
        ("frame4", |e, i, _| e.text_into(&mut i.frames[3])),
    ];
}

impl GFrameHold {
    pub fn staff(&self) -> Cmper {
        self.base.cmper1
    }

    pub fn measure(&self) -> Cmper {
        self.base.cmper2
    }
}

// ============================================================================
// TUPLETS
// ============================================================================

/// A tuplet starting at an entry: `display_number` notes of
/// `display_duration` in the time of `reference_number` notes of
/// `reference_duration`.
#[derive(Debug, Clone, Default)]
pub struct TupletDef {
    base: EntryDetailsBase,
    pub display_number: i32,
    pub display_duration: Edu,
    pub reference_number: i32,
    pub reference_duration: Edu,
    pub always_flat: bool,
    pub full_dura: bool,
    pub metric_center: bool,
    pub avoid_staff: bool,
    pub tup_off_x: Evpu,
    pub tup_off_y: Evpu,
    pub brack_off_x: Evpu,
    pub brack_off_y: Evpu,
    pub allow_horz: bool,
    pub ignore_horz_num_offset: bool,
    pub break_bracket: bool,
    pub match_hooks: bool,
    pub use_bottom_note: bool,
    pub smart_tuplet: bool,
    pub left_hook_len: Evpu,
    pub left_hook_ext: Evpu,
    pub right_hook_len: Evpu,
    pub right_hook_ext: Evpu,
    pub manual_slope_adj: Evpu,
}

pooled_record!(TupletDef, EntryDetailsBase);

impl Record for TupletDef {
    const XML_NODE_NAME: &'static str = "tupletDef";
}

impl FieldPopulator for TupletDef {
    const XML_MAPPING: FieldTable<Self> = &[
        ("symbolicNum", |e, i, _| e.text_into(&mut i.display_number)),
        ("symbolicDur", |e, i, _| e.text_into(&mut i.display_duration)),
        ("refNum", |e, i, _| e.text_into(&mut i.reference_number)),
        ("refDur", |e, i, _| e.text_into(&mut i.reference_duration)),
        ("flat", |e, i, _| e.text_into(&mut i.always_flat)),
        ("fullDura", |e, i, _| e.text_into(&mut i.full_dura)),
        ("metricCenter", |e, i, _| e.text_into(&mut i.metric_center)),
        ("avoidStaff", |e, i, _| e.text_into(&mut i.avoid_staff)),
        ("tupOffX", |e, i, _| e.text_into(&mut i.tup_off_x)),
        ("tupOffY", |e, i, _| e.text_into(&mut i.tup_off_y)),
        ("brackOffX", |e, i, _| e.text_into(&mut i.brack_off_x)),
        ("brackOffY", |e, i, _| e.text_into(&mut i.brack_off_y)),
        ("allowHorz", |e, i, _| e.text_into(&mut i.allow_horz)),
        ("ignoreGlOffs", |e, i, _| e.text_into(&mut i.ignore_horz_num_offset)),
        ("breakBracket", |e, i, _| e.text_into(&mut i.break_bracket)),
        ("matchHooks", |e, i, _| e.text_into(&mut i.match_hooks)),
        ("noteBelow", |e, i, _| e.text_into(&mut i.use_bottom_note)),
        ("smartTuplet", |e, i, _| e.text_into(&mut i.smart_tuplet)),
        ("leftHookLen", |e, i, _| e.text_into(&mut i.left_hook_len)),
        ("leftHookExt", |e, i, _| e.text_into(&mut i.left_hook_ext)),
        ("rightHookLen", |e, i, _| e.text_into(&mut i.right_hook_len)),
        ("rightHookExt", |e, i, _| e.text_into(&mut i.right_hook_ext)),
        ("slope", |e, i, _| e.text_into(&mut i.manual_slope_adj)),
    ];

    // style enums (bracket, number, positioning) are not modelled
    fn require_all_fields(&self) -> bool {
        false
    }
}

impl TupletDef {
    pub fn entry_number(&self) -> EntryNumber {
        self.base.entnum
    }

    pub fn inci(&self) -> Inci {
        self.base.inci
    }

    /// Total displayed duration, as a fraction of a whole note.
    pub fn calc_display_duration(&self) -> Fraction {
        Fraction::from_edu_count(self.display_number, self.display_duration)
    }

    /// Total duration the tuplet occupies, as a fraction of a whole note.
    pub fn calc_reference_duration(&self) -> Fraction {
        Fraction::from_edu_count(self.reference_number, self.reference_duration)
    }
}

// ============================================================================
// STAFF GROUPS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BracketStyle {
    #[default]
    None,
    ThickLine,
    BracketStraightHooks,
    PianoBrace,
    BracketCurvedHooks,
    DeskBracket,
}

// codes 4, 5 and 7 are unused by the writing application
impl XmlCodeEnum for BracketStyle {
    const CODES: &'static [(i32, Self)] = &[
        (0, BracketStyle::None),
        (1, BracketStyle::ThickLine),
        (2, BracketStyle::BracketStraightHooks),
        (3, BracketStyle::PianoBrace),
        (6, BracketStyle::BracketCurvedHooks),
        (8, BracketStyle::DeskBracket),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bracket {
    pub style: BracketStyle,
    pub horz_adjust_left: Evpu,
    pub vert_adjust_top: Evpu,
    pub vert_adjust_bottom: Evpu,
    pub show_on_single_staff: bool,
}

impl FieldPopulator for Bracket {
    const XML_MAPPING: FieldTable<Self> = &[
        ("id", |e, i, c| c.code_enum_into(e, &mut i.style)),
        ("bracPos", |e, i, _| e.text_into(&mut i.horz_adjust_left)),
        ("bracTop", |e, i, _| e.text_into(&mut i.vert_adjust_top)),
        ("bracBot", |e, i, _| e.text_into(&mut i.vert_adjust_bottom)),
        ("onSingle", |e, i, _| e.text_into(&mut i.show_on_single_staff)),
    ];
}

/// A bracketed range of staves. `cmper1` is the system's instrument list
/// ([`BASE_SYSTEM_ID`] for the default list) and `cmper2` the group id.
#[derive(Debug, Clone, Default)]
pub struct StaffGroup {
    base: DetailsBase,
    pub start_inst: Cmper,
    pub end_inst: Cmper,
    pub start_meas: Cmper,
    pub end_meas: Cmper,
    pub full_name_id: Cmper,
    pub abbrv_name_id: Cmper,
    pub bracket: Option<Bracket>,
    pub hide_name: bool,
    /// Member staves, filled after decode from the instrument list
    pub staves: BTreeSet<Cmper>,
    /// Multi-staff instrument this group belongs to, 0 for none
    pub multi_staff_group_id: Cmper,
}

pooled_record!(StaffGroup, DetailsBase);

impl Record for StaffGroup {
    const XML_NODE_NAME: &'static str = "staffGroup";
}

impl FieldPopulator for StaffGroup {
    const XML_MAPPING: FieldTable<Self> = &[
        ("startInst", |e, i, _| e.text_into(&mut i.start_inst)),
        ("endInst", |e, i, _| e.text_into(&mut i.end_inst)),
        ("startMeas", |e, i, _| e.text_into(&mut i.start_meas)),
        ("endMeas", |e, i, _| e.text_into(&mut i.end_meas)),
        ("fullID", |e, i, _| e.text_into(&mut i.full_name_id)),
        ("abbrvID", |e, i, _| e.text_into(&mut i.abbrv_name_id)),
        ("bracket", |e, i, c| c.populated(e).map(|bracket| i.bracket = Some(bracket))),
        ("hideName", |e, i, _| e.text_into(&mut i.hide_name)),
    ];

    const RESOLVERS: &'static [(&'static str, ResolverFn)] = &[("staffGroup", resolve_staff_groups)];

    fn require_all_fields(&self) -> bool {
        false
    }
}

/// Fill each base-system group's staves from the default instrument list.
fn resolve_staff_groups(document: &mut Document) -> Result<()> {
    let base_list: Vec<Cmper> = document
        .others()
        .get_array::<InstrumentUsed>(SCORE_PARTID, BASE_SYSTEM_ID)
        .iter()
        .map(|slot| slot.staff_id)
        .collect();
    let groups: Vec<(Cmper, Inci, Cmper, Cmper, String)> = document
        .details()
        .all::<StaffGroup>()
        .iter()
        .filter(|group| group.base.part_id == SCORE_PARTID && group.base.cmper1 == BASE_SYSTEM_ID)
        .map(|group| {
            (
                group.base.cmper2,
                group.base.inci,
                group.start_inst,
                group.end_inst,
                group.base.describe(),
            )
        })
        .collect();

    for (group_id, inci, start_inst, end_inst, key) in groups {
        let start = base_list.iter().position(|staff| *staff == start_inst);
        let end = base_list.iter().position(|staff| *staff == end_inst);
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                document.report_integrity(Err(IntegrityError::new(
                    StaffGroup::XML_NODE_NAME,
                    key,
                    format!("start staff {} or end staff {} is not in the instrument list", start_inst, end_inst),
                )))?;
                continue;
            }
        };
        if let Some(group) = document
            .details
            .get_mut::<StaffGroup>(SCORE_PARTID, BASE_SYSTEM_ID, group_id, inci)?
        {
            group.staves = base_list.iter().skip(start).take(end.saturating_sub(start) + 1).copied().collect();
        }
    }
    Ok(())
}

impl StaffGroup {
    pub fn group_id(&self) -> Cmper {
        self.base.cmper2
    }

    pub fn contains(&self, staff_id: Cmper) -> bool {
        self.staves.contains(&staff_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecodeConfig;
    use crate::dom::{PooledRecord, ShareMode};
    use crate::factory::linker::ElementLinker;
    use crate::factory::populator::PopulateContext;
    use crate::xml::{RoxmlBackend, XmlBackend};

    fn gfhold(xml: &str) -> GFrameHold {
        let config = DecodeConfig::default();
        let mut linker = ElementLinker::new();
        let mut hold = GFrameHold::from_identity(DetailsBase::new(0, ShareMode::All, 3, 1, 0));
        RoxmlBackend::with_root(xml, |root| {
            let mut ctx = PopulateContext::new(&config, &mut linker);
            hold.populate(root, &mut ctx)
        })
        .unwrap();
        hold
    }

    #[test]
    fn test_gfhold_fields() {
        let hold = gfhold("<gfhold><clefID>0</clefID><clefMode>forced</clefMode><frame1>5</frame1><frame3>7</frame3></gfhold>");
        assert_eq!(hold.clef_id, Some(0));
        assert_eq!(hold.show_clef_mode, ShowClefMode::Always);
        assert_eq!(hold.frames, [5, 0, 7, 0]);
        assert_eq!(hold.staff(), 3);
        assert_eq!(hold.measure(), 1);
        assert!(hold.integrity_check().is_ok());
    }

    #[test]
    fn test_gfhold_clef_integrity() {
        let both = gfhold("<gfhold><clefID>1</clefID><clefListID>2</clefListID></gfhold>");
        assert!(both.integrity_check().is_err());
        let neither = gfhold("<gfhold><frame1>1</frame1></gfhold>");
        let err = neither.integrity_check().unwrap_err();
        assert!(err.message.contains("neither"));
        let list_only = gfhold("<gfhold><clefListID>2</clefListID></gfhold>");
        assert!(list_only.integrity_check().is_ok());
    }

    #[test]
    fn test_bracket_codes() {
        assert_eq!(BracketStyle::from_code(6), Some(BracketStyle::BracketCurvedHooks));
        assert_eq!(BracketStyle::from_code(4), None);
    }
}
