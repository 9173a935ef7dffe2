// Test decode configuration files and how each policy changes a decode

use musx_dom::dom::others::{Staff, StemDirection};
use musx_dom::dom::SCORE_PARTID;
use musx_dom::{DecodeConfig, DocumentFactory, EnumPolicy, FallbackPolicy, IntegrityPolicy, MusxError};

#[test]
fn test_yaml_and_json_files() {
    let dir = tempfile::tempdir().unwrap();

    let yaml_path = dir.path().join("decode.yaml");
    std::fs::write(
        &yaml_path,
        "enum_policy: lenient\nintegrity_policy: lenient\nscope_fallback: part_only\n",
    )
    .unwrap();
    let yaml = DecodeConfig::from_file(&yaml_path).expect("yaml config should load");
    assert_eq!(yaml.enum_policy, EnumPolicy::Lenient);
    assert_eq!(yaml.integrity_policy, IntegrityPolicy::Lenient);
    assert_eq!(yaml.scope_fallback, FallbackPolicy::PartOnly);
    assert!(!yaml.strict_unknown_fields);

    let json_path = dir.path().join("decode.json");
    std::fs::write(&json_path, r#"{"strict_unknown_fields": true}"#).unwrap();
    let json = DecodeConfig::from_file(&json_path).expect("json config should load");
    assert!(json.strict_unknown_fields);
    assert_eq!(json.enum_policy, EnumPolicy::Strict);
}

#[test]
fn test_bad_config_files() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("decode.toml");
    std::fs::write(&toml_path, "enum_policy = \"lenient\"\n").unwrap();
    assert!(matches!(DecodeConfig::from_file(&toml_path), Err(MusxError::Config(_))));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(DecodeConfig::from_file(&broken), Err(MusxError::Config(_))));

    let missing = dir.path().join("missing.yml");
    assert!(matches!(DecodeConfig::from_file(&missing), Err(MusxError::Io(_))));
}

const ODD_STAFF: &str = r#"<finale><others>
    <staffSpec cmper="1"><stemDir>sideways</stemDir><staffLines>5</staffLines></staffSpec>
</others></finale>"#;

#[test]
fn test_enum_policy() {
    let err = DocumentFactory::create(ODD_STAFF).unwrap_err();
    assert!(matches!(err, MusxError::Decode(_)));
    assert!(err.to_string().contains("sideways"));

    let lenient = DecodeConfig {
        enum_policy: EnumPolicy::Lenient,
        ..DecodeConfig::default()
    };
    let document = DocumentFactory::create_with_config(ODD_STAFF, &lenient).unwrap();
    let staff = document.others().get::<Staff>(SCORE_PARTID, 1).unwrap();
    assert_eq!(staff.stem_direction, StemDirection::Default);
    assert_eq!(staff.staff_lines, 5);
}

#[test]
fn test_strict_unknown_fields() {
    let xml = r#"<finale><others>
        <staffSpec cmper="1"><staffLines>5</staffLines><hologram>on</hologram></staffSpec>
    </others></finale>"#;
    assert!(DocumentFactory::create(xml).is_ok());

    let strict = DecodeConfig {
        strict_unknown_fields: true,
        ..DecodeConfig::default()
    };
    let err = DocumentFactory::create_with_config(xml, &strict).unwrap_err();
    assert!(err.to_string().contains("hologram"));
}

#[test]
fn test_document_keeps_its_config() {
    let config = DecodeConfig::lenient();
    let document = DocumentFactory::create_with_config("<finale/>", &config).unwrap();
    assert_eq!(document.config(), &config);
}
