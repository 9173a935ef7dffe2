// Test gfhold decoding: clef variants, default frames and the clef integrity rule

use musx_dom::dom::details::{GFrameHold, ShowClefMode};
use musx_dom::dom::{PooledRecord, ShareMode, SCORE_PARTID};
use musx_dom::xml::QuickXmlBackend;
use musx_dom::{DecodeConfig, DocumentFactory, MusxError};

const THREE_MEASURES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<finale>
  <details>
    <gfhold cmper1="3" cmper2="915">
      <clefID>0</clefID>
      <clefMode>forced</clefMode>
      <clefPercent>75</clefPercent>
      <frame1>21240</frame1>
    </gfhold>
    <gfhold cmper1="3" cmper2="1083">
      <clefID>3</clefID>
      <clefMode>hidden</clefMode>
      <clefPercent>75</clefPercent>
      <frame1>22464</frame1>
      <frame3>22465</frame3>
    </gfhold>
    <gfhold cmper1="3" cmper2="1129">
      <clefListID>1234</clefListID>
      <clefPercent>75</clefPercent>
      <mirrorFrame/>
      <frame4>22911</frame4>
    </gfhold>
  </details>
</finale>"#;

#[test]
fn test_three_clef_variants() {
    let document = DocumentFactory::create(THREE_MEASURES).expect("gfholds should decode");
    let details = document.details();
    assert_eq!(details.len(), 3);

    // direct clef, forced display
    let forced = details.get::<GFrameHold>(SCORE_PARTID, 3, 915).unwrap();
    assert_eq!(forced.clef_id, Some(0));
    assert_eq!(forced.clef_list_id, 0);
    assert_eq!(forced.show_clef_mode, ShowClefMode::Always);
    assert_eq!(forced.clef_percent, 75);
    assert!(!forced.mirror_frame);
    assert_eq!(forced.frames, [21240, 0, 0, 0]);

    // direct clef, hidden
    let hidden = details.get::<GFrameHold>(SCORE_PARTID, 3, 1083).unwrap();
    assert_eq!(hidden.clef_id, Some(3));
    assert_eq!(hidden.show_clef_mode, ShowClefMode::Never);
    assert_eq!(hidden.frames, [22464, 0, 22465, 0]);

    // clef list with a mirrored frame
    let listed = details.get::<GFrameHold>(SCORE_PARTID, 3, 1129).unwrap();
    assert_eq!(listed.clef_id, None);
    assert_eq!(listed.clef_list_id, 1234);
    assert_eq!(listed.show_clef_mode, ShowClefMode::WhenNeeded);
    assert!(listed.mirror_frame);
    assert_eq!(listed.frames, [0, 0, 0, 22911]);
    assert_eq!(listed.staff(), 3);
    assert_eq!(listed.measure(), 1129);
    assert_eq!(listed.share_mode(), ShareMode::All);
}

#[test]
fn test_three_clef_variants_quick_xml() {
    let document = DocumentFactory::create_with::<QuickXmlBackend>(THREE_MEASURES, &DecodeConfig::default()).unwrap();
    let listed = document.details().get::<GFrameHold>(SCORE_PARTID, 3, 1129).unwrap();
    assert!(listed.mirror_frame);
    assert_eq!(listed.clef_list_id, 1234);
}

#[test]
fn test_part_lookup_falls_back_to_score() {
    let document = DocumentFactory::create(THREE_MEASURES).unwrap();
    let from_part = document.details().get::<GFrameHold>(2, 3, 915).unwrap();
    assert_eq!(from_part.part_id(), SCORE_PARTID);
    assert!(document.details().get::<GFrameHold>(SCORE_PARTID, 4, 915).is_none());
}

const BOTH_CLEFS: &str = r#"<finale><details>
    <gfhold cmper1="3" cmper2="915">
      <clefID>0</clefID>
      <clefListID>123</clefListID>
      <frame1>21240</frame1>
    </gfhold>
</details></finale>"#;

const NO_CLEF: &str = r#"<finale><details>
    <gfhold cmper1="3" cmper2="915">
      <clefMode>forced</clefMode>
      <frame1>21240</frame1>
    </gfhold>
</details></finale>"#;

#[test]
fn test_clef_integrity_is_strict_by_default() {
    for (xml, message) in [(BOTH_CLEFS, "both"), (NO_CLEF, "neither")] {
        match DocumentFactory::create(xml) {
            Err(MusxError::Integrity(err)) => {
                assert_eq!(err.type_name, "gfhold");
                assert!(err.message.contains(message), "unexpected message: {}", err.message);
                assert!(err.key.contains("915"));
            }
            other => panic!("expected an integrity error, got {:?}", other.map(|_| ())),
        }
    }
}

#[test]
fn test_clef_integrity_lenient_keeps_record() {
    let document = DocumentFactory::create_with_config(BOTH_CLEFS, &DecodeConfig::lenient()).unwrap();
    let hold = document.details().get::<GFrameHold>(SCORE_PARTID, 3, 915).unwrap();
    assert_eq!(hold.clef_id, Some(0));
    assert_eq!(hold.clef_list_id, 123);
}

#[test]
fn test_unknown_clef_mode() {
    let xml = r#"<finale><details>
        <gfhold cmper1="1" cmper2="1"><clefID>0</clefID><clefMode>sometimes</clefMode></gfhold>
    </details></finale>"#;
    assert!(matches!(DocumentFactory::create(xml), Err(MusxError::Decode(_))));

    let config = DecodeConfig {
        enum_policy: musx_dom::EnumPolicy::Lenient,
        ..DecodeConfig::default()
    };
    let document = DocumentFactory::create_with_config(xml, &config).unwrap();
    let hold = document.details().get::<GFrameHold>(SCORE_PARTID, 1, 1).unwrap();
    assert_eq!(hold.show_clef_mode, ShowClefMode::WhenNeeded);
}
