// Test cross-record links completed after decode

use std::collections::BTreeSet;

use musx_dom::dom::details::{BracketStyle, StaffGroup};
use musx_dom::dom::others::{
    CategoryType, EnclosureShape, InstrumentUsed, LayerAttributes, MarkingCategory, MultiStaffInstrumentGroup, Staff,
    TextBlock, TextExpressionDef,
};
use musx_dom::dom::{BASE_SYSTEM_ID, SCORE_PARTID};
use musx_dom::{DecodeConfig, DocumentFactory, MusxError};

const ORCHESTRA: &str = r#"<finale>
  <others>
    <staffSpec cmper="1"><staffLines>5</staffLines></staffSpec>
    <staffSpec cmper="2"><staffLines>5</staffLines></staffSpec>
    <staffSpec cmper="3"><staffLines>5</staffLines></staffSpec>
    <staffSpec cmper="4"><staffLines>5</staffLines></staffSpec>
    <instUsed cmper="0" inci="0"><inst>1</inst></instUsed>
    <instUsed cmper="0" inci="1"><inst>2</inst><distFromTop>-288</distFromTop></instUsed>
    <instUsed cmper="0" inci="2"><inst>3</inst><distFromTop>-576</distFromTop></instUsed>
    <instUsed cmper="0" inci="3"><inst>4</inst><distFromTop>-864</distFromTop></instUsed>
    <layerAtts cmper="0"><restOffset>0</restOffset><playback/></layerAtts>
    <layerAtts cmper="1"><restOffset>4</restOffset><playback/></layerAtts>
    <layerAtts cmper="2"><playback/></layerAtts>
    <layerAtts cmper="3"><hideLayer/></layerAtts>
    <markingsCategory cmper="1"><categoryType>dynamics</categoryType><usesTextFont/></markingsCategory>
    <markingsCategoryName cmper="1"><name>Dynamics</name></markingsCategoryName>
    <textExprDef cmper="5"><textIDKey>1</textIDKey><categoryID>1</categoryID><newEnclosure/></textExprDef>
    <textExprDef cmper="6"><textIDKey>2</textIDKey><categoryID>1</categoryID></textExprDef>
    <textExprDef cmper="7"><textIDKey>2</textIDKey></textExprDef>
    <textExpressionEnclosure cmper="5"><sides>1</sides><lineWidth>256</lineWidth></textExpressionEnclosure>
    <textBlock cmper="1"><textID>1</textID><textTag>expression</textTag></textBlock>
    <textBlock cmper="2"><textID>2</textID><textTag>expression</textTag></textBlock>
    <multiStaffInstGroup cmper="1"><staffNum1>2</staffNum1><staffNum2>3</staffNum2></multiStaffInstGroup>
    <multiStaffGroupID cmper="1"><staffGroupID>2</staffGroupID></multiStaffGroupID>
  </others>
  <details>
    <staffGroup cmper1="0" cmper2="1">
      <startInst>1</startInst><endInst>4</endInst><startMeas>1</startMeas><endMeas>32767</endMeas>
      <bracket><id>1</id><bracPos>-12</bracPos><bracBot>-4</bracBot></bracket>
    </staffGroup>
    <staffGroup cmper1="0" cmper2="2">
      <startInst>2</startInst><endInst>3</endInst><startMeas>1</startMeas><endMeas>32767</endMeas>
      <bracket><id>3</id><onSingle/></bracket>
    </staffGroup>
  </details>
  <texts>
    <expression number="1">^fontid(13)^size(24)^nfx(0)ff</expression>
    <expression number="2">^fontTxt(Font1,4096)dolce</expression>
  </texts>
</finale>"#;

#[test]
fn test_staff_groups_collect_their_staves() {
    let document = DocumentFactory::create(ORCHESTRA).expect("orchestra should decode");
    let outer = document.details().get::<StaffGroup>(SCORE_PARTID, BASE_SYSTEM_ID, 1).unwrap();
    assert_eq!(outer.staves, BTreeSet::from([1, 2, 3, 4]));
    let bracket = outer.bracket.as_ref().expect("outer bracket");
    assert_eq!(bracket.style, BracketStyle::ThickLine);
    assert_eq!(bracket.horz_adjust_left, -12);
    assert_eq!(bracket.vert_adjust_bottom, -4);
    assert_eq!(outer.multi_staff_group_id, 0);

    let piano = document.details().get::<StaffGroup>(SCORE_PARTID, BASE_SYSTEM_ID, 2).unwrap();
    assert_eq!(piano.staves, BTreeSet::from([2, 3]));
    assert!(piano.contains(3));
    assert!(!piano.contains(4));
    assert_eq!(piano.bracket.as_ref().map(|b| b.style), Some(BracketStyle::PianoBrace));
    assert!(piano.bracket.as_ref().unwrap().show_on_single_staff);
    // linked from the multi-staff group id
    assert_eq!(piano.multi_staff_group_id, 1);
}

#[test]
fn test_multi_staff_instrument_links() {
    let document = DocumentFactory::create(ORCHESTRA).unwrap();
    let upper = document.others().get::<Staff>(SCORE_PARTID, 2).unwrap();
    assert_eq!(upper.multi_staff_inst_id, 1);
    let solo = document.others().get::<Staff>(SCORE_PARTID, 1).unwrap();
    assert_eq!(solo.multi_staff_inst_id, 0);
    assert!(solo.multi_staff_instrument_group(&document).is_none());

    let group = upper.multi_staff_instrument_group(&document).expect("piano group");
    assert_eq!(group.cmper(), 1);
    assert_eq!(group.staff_nums, vec![2, 3]);
    assert_eq!(group.staff_at_index(&document, 1).map(|s| s.cmper()), Some(3));
    assert!(group.staff_at_index(&document, 2).is_none());
    assert_eq!(group.staff_group(&document).map(|g| g.group_id()), Some(2));
}

#[test]
fn test_instrument_list_order() {
    let document = DocumentFactory::create(ORCHESTRA).unwrap();
    let list = document.others().get_array::<InstrumentUsed>(SCORE_PARTID, BASE_SYSTEM_ID);
    assert_eq!(list.iter().map(|slot| slot.staff_id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert_eq!(list[3].dist_from_top, -864);
    assert_eq!(InstrumentUsed::staff_at_index(&document, &list, 2).map(|s| s.cmper()), Some(3));
    assert_eq!(InstrumentUsed::index_for_staff(&list, 4), Some(3));
    assert_eq!(InstrumentUsed::index_for_staff(&list, 9), None);
}

#[test]
fn test_layer_attributes() {
    let document = DocumentFactory::create(ORCHESTRA).unwrap();
    let layers = document.others().get_all::<LayerAttributes>(SCORE_PARTID);
    assert_eq!(layers.len(), 4);
    assert_eq!(layers[1].rest_offset, 4);
    assert!(layers[3].hide_layer);
    assert!(!layers[3].playback);
}

#[test]
fn test_marking_categories_and_expressions() {
    let document = DocumentFactory::create(ORCHESTRA).unwrap();
    let category = document.others().get::<MarkingCategory>(SCORE_PARTID, 1).unwrap();
    assert_eq!(category.category_type, CategoryType::Dynamics);
    assert!(category.uses_text_font);
    assert_eq!(category.name(&document), "Dynamics");
    // expression 7 has no category
    assert_eq!(category.text_expressions, BTreeSet::from([5, 6]));

    let ff = document.others().get::<TextExpressionDef>(SCORE_PARTID, 5).unwrap();
    let enclosure = ff.enclosure(&document).expect("ff is enclosed");
    assert_eq!(enclosure.enclosure.shape, EnclosureShape::Rectangle);
    assert_eq!(enclosure.enclosure.line_width, 256);
    assert_eq!(ff.category(&document).map(|c| c.cmper()), Some(1));
    assert_eq!(TextBlock::text_for_id(&document, ff.text_id_key, true), "ff");

    let dolce = document.others().get::<TextExpressionDef>(SCORE_PARTID, 6).unwrap();
    assert!(dolce.enclosure(&document).is_none());
    let block = document.others().get::<TextBlock>(SCORE_PARTID, dolce.text_id_key).unwrap();
    assert_eq!(block.text(&document, true), "dolce");

    let uncategorized = document.others().get::<TextExpressionDef>(SCORE_PARTID, 7).unwrap();
    assert!(uncategorized.category(&document).is_none());
}

/// Decode strictly (expecting an integrity error) and leniently.
fn strict_fails_lenient_passes(xml: &str) -> musx_dom::dom::Document {
    match DocumentFactory::create(xml) {
        Err(MusxError::Integrity(_)) => {}
        other => panic!("expected an integrity error, got {:?}", other.map(|_| ())),
    }
    DocumentFactory::create_with_config(xml, &DecodeConfig::lenient()).expect("lenient decode should succeed")
}

#[test]
fn test_wrong_layer_count() {
    let xml = r#"<finale><others>
        <layerAtts cmper="0"/><layerAtts cmper="1"/><layerAtts cmper="2"/>
    </others></finale>"#;
    let document = strict_fails_lenient_passes(xml);
    assert_eq!(document.others().get_all::<LayerAttributes>(SCORE_PARTID).len(), 3);
}

#[test]
fn test_layer_gap() {
    let xml = r#"<finale><others>
        <layerAtts cmper="0"/><layerAtts cmper="1"/><layerAtts cmper="2"/><layerAtts cmper="5"/>
    </others></finale>"#;
    strict_fails_lenient_passes(xml);
}

#[test]
fn test_staff_claimed_by_two_groups() {
    let xml = r#"<finale><others>
        <staffSpec cmper="2"/>
        <multiStaffInstGroup cmper="1"><staffNum1>2</staffNum1></multiStaffInstGroup>
        <multiStaffInstGroup cmper="2"><staffNum1>2</staffNum1></multiStaffInstGroup>
    </others></finale>"#;
    let document = strict_fails_lenient_passes(xml);
    // the first claim stands
    let staff = document.others().get::<Staff>(SCORE_PARTID, 2).unwrap();
    assert_eq!(staff.multi_staff_inst_id, 1);
}

#[test]
fn test_expression_with_missing_category() {
    let xml = r#"<finale><others>
        <textExprDef cmper="5"><categoryID>9</categoryID></textExprDef>
    </others></finale>"#;
    let document = strict_fails_lenient_passes(xml);
    let expr = document.others().get::<TextExpressionDef>(SCORE_PARTID, 5).unwrap();
    assert!(expr.category(&document).is_none());
}

#[test]
fn test_category_without_type() {
    let xml = r#"<finale><others>
        <markingsCategory cmper="3"><usesTextFont/></markingsCategory>
    </others></finale>"#;
    let document = strict_fails_lenient_passes(xml);
    let category = document.others().get::<MarkingCategory>(SCORE_PARTID, 3).unwrap();
    assert_eq!(category.category_type, CategoryType::Invalid);
}

#[test]
fn test_staff_group_outside_instrument_list() {
    let xml = r#"<finale>
      <others><instUsed cmper="0" inci="0"><inst>1</inst></instUsed></others>
      <details><staffGroup cmper1="0" cmper2="1"><startInst>1</startInst><endInst>7</endInst></staffGroup></details>
    </finale>"#;
    let document = strict_fails_lenient_passes(xml);
    let group = document.details().get::<StaffGroup>(SCORE_PARTID, BASE_SYSTEM_ID, 1).unwrap();
    assert!(group.staves.is_empty());
}

#[test]
fn test_group_id_pointing_nowhere() {
    let xml = r#"<finale><others>
        <multiStaffGroupID cmper="1"><staffGroupID>4</staffGroupID></multiStaffGroupID>
    </others></finale>"#;
    let document = strict_fails_lenient_passes(xml);
    let group = MultiStaffInstrumentGroup::default();
    assert!(group.staff_group(&document).is_none());
}
