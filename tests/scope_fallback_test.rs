// Test part/score scope resolution and pluggable fallback rules

use musx_dom::dom::details::GFrameHold;
use musx_dom::dom::options::FontOptions;
use musx_dom::dom::others::{Frame, Staff};
use musx_dom::dom::{Cmper, PooledRecord, ShareMode, SCORE_PARTID};
use musx_dom::{DecodeConfig, DocumentFactory, FallbackPolicy, ScopeFallback};

const SCOPED: &str = r#"<finale>
  <options>
    <fontOptions><font type="music"><fontID>13</fontID><fontSize>24</fontSize></font></fontOptions>
    <fontOptions part="1" shared="false"><font type="music"><fontID>13</fontID><fontSize>20</fontSize></font></fontOptions>
  </options>
  <others>
    <staffSpec cmper="1"><staffLines>5</staffLines></staffSpec>
    <staffSpec cmper="1" part="1" shared="true"><staffLines>1</staffLines></staffSpec>
    <staffSpec cmper="2"><staffLines>5</staffLines></staffSpec>
    <frameSpec cmper="1" inci="0"><startTime>512</startTime></frameSpec>
    <frameSpec cmper="1" inci="1"><startEntry>1</startEntry><endEntry>1</endEntry></frameSpec>
    <frameSpec cmper="1" inci="0" part="2" shared="false"><startEntry>1</startEntry><endEntry>1</endEntry></frameSpec>
  </others>
  <details>
    <gfhold cmper1="1" cmper2="1" part="3" shared="false"><clefID>0</clefID><frame1>1</frame1></gfhold>
  </details>
  <entries>
    <entry entnum="1" prev="0" next="0"><dura>1024</dura></entry>
  </entries>
</finale>"#;

#[test]
fn test_part_record_wins_over_score() {
    let document = DocumentFactory::create(SCOPED).unwrap();
    let part_staff = document.others().get::<Staff>(1, 1).unwrap();
    assert_eq!(part_staff.staff_lines, 1);
    assert_eq!(part_staff.part_id(), 1);
    assert_eq!(part_staff.share_mode(), ShareMode::Partial);

    let score_staff = document.others().get::<Staff>(SCORE_PARTID, 1).unwrap();
    assert_eq!(score_staff.staff_lines, 5);

    // no part record for staff 2, so the score's is used
    let inherited = document.others().get::<Staff>(1, 2).unwrap();
    assert_eq!(inherited.part_id(), SCORE_PARTID);

    let part_fonts = document.options().get_for_part::<FontOptions>(1).unwrap();
    assert_eq!(part_fonts.fonts.values().next().map(|f| f.font_size), Some(20));
    let other_part_fonts = document.options().get_for_part::<FontOptions>(5).unwrap();
    assert_eq!(other_part_fonts.part_id(), SCORE_PARTID);
}

#[test]
fn test_part_only_policy() {
    let config = DecodeConfig {
        scope_fallback: FallbackPolicy::PartOnly,
        ..DecodeConfig::default()
    };
    let document = DocumentFactory::create_with_config(SCOPED, &config).unwrap();
    assert!(document.others().get::<Staff>(1, 1).is_some());
    assert!(document.others().get::<Staff>(1, 2).is_none());
    assert!(document.options().get_for_part::<FontOptions>(5).is_none());
    assert!(document.others().get::<Staff>(SCORE_PARTID, 2).is_some());
}

#[test]
fn test_array_lookup_uses_first_scope_with_matches() {
    let document = DocumentFactory::create(SCOPED).unwrap();
    // part 2 has its own single incident
    let part_frames = document.others().get_array::<Frame>(2, 1);
    assert_eq!(part_frames.len(), 1);
    assert_eq!(part_frames[0].part_id(), 2);

    // part 4 has none, so both score incidents come back in order
    let score_frames = document.others().get_array::<Frame>(4, 1);
    let incis: Vec<_> = score_frames.iter().map(|frame| frame.inci()).collect();
    assert_eq!(incis, vec![0, 1]);

    assert_eq!(document.others().all::<Frame>().len(), 3);
}

#[test]
fn test_iteration_from_part_gfhold_uses_score_frames() {
    let document = DocumentFactory::create(SCOPED).unwrap();
    assert!(document.details().get::<GFrameHold>(SCORE_PARTID, 1, 1).is_none());

    let mut elapsed = Vec::new();
    document
        .iterate_entries(3, 1, 1, 0, |info| {
            elapsed.push(info.elapsed_duration);
            true
        })
        .unwrap();
    // the score frame carries a start time of an eighth
    assert_eq!(elapsed, vec![musx_dom::Fraction::new(1, 8).unwrap()]);
}

#[test]
fn test_share_mode_does_not_change_lookup() {
    let xml = r#"<finale><others>
        <staffSpec cmper="1"><staffLines>5</staffLines></staffSpec>
        <staffSpec cmper="1" part="1"><staffLines>1</staffLines></staffSpec>
        <staffSpec cmper="1" part="2" shared="true"><staffLines>2</staffLines></staffSpec>
        <staffSpec cmper="1" part="3" shared="false"><staffLines>3</staffLines></staffSpec>
    </others></finale>"#;
    let document = DocumentFactory::create(xml).unwrap();
    let expected = [(1, ShareMode::All), (2, ShareMode::Partial), (3, ShareMode::None)];
    for (part, mode) in expected {
        let staff = document.others().get::<Staff>(part, 1).unwrap();
        assert_eq!(staff.share_mode(), mode);
        assert_eq!(staff.staff_lines, part as i32, "part {} should see its own staff", part);
    }
}

/// Parts 10 and up are grouped under part 10 before the score.
#[derive(Debug)]
struct GroupedParts;

impl ScopeFallback for GroupedParts {
    fn lookup_order(&self, part_id: Cmper) -> Vec<Cmper> {
        match part_id {
            SCORE_PARTID => vec![SCORE_PARTID],
            10 => vec![10, SCORE_PARTID],
            id if id > 10 => vec![id, 10, SCORE_PARTID],
            id => vec![id, SCORE_PARTID],
        }
    }
}

#[test]
fn test_custom_scope_fallback() {
    let xml = r#"<finale><others>
        <staffSpec cmper="1"><staffLines>5</staffLines></staffSpec>
        <staffSpec cmper="1" part="10" shared="false"><staffLines>3</staffLines></staffSpec>
    </others></finale>"#;
    let factory = DocumentFactory::new(DecodeConfig::default()).with_scope_fallback(GroupedParts);
    let document = factory.decode(xml).unwrap();

    assert_eq!(document.others().get::<Staff>(12, 1).map(|s| s.staff_lines), Some(3));
    assert_eq!(document.others().get::<Staff>(4, 1).map(|s| s.staff_lines), Some(5));

    // the default rule skips the grouping
    let plain = DocumentFactory::create(xml).unwrap();
    assert_eq!(plain.others().get::<Staff>(12, 1).map(|s| s.staff_lines), Some(5));
}
