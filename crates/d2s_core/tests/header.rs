mod common;

use d2s_core::character_class::CharacterClass;
use d2s_core::d2s::header::{Difficulty, Header};
use d2s_core::error::DecodeError;

use common::{SaveSpec, build_save, test_data};

#[test]
fn short_buffer_is_invalid_format() {
    let bytes = vec![0u8; 100];
    assert!(matches!(
        Header::parse(&bytes),
        Err(DecodeError::InvalidFormat(_))
    ));
}

#[test]
fn wrong_magic_is_invalid_format() {
    let mut bytes = build_save(&test_data(), &SaveSpec::default());
    bytes[0] = 0;
    assert!(matches!(
        Header::parse(&bytes),
        Err(DecodeError::InvalidFormat(_))
    ));
}

#[test]
fn reads_identity_fields() {
    let spec = SaveSpec {
        name: "Gandalfine".to_string(),
        status: 0x20 | 0x04 | 0x40,
        level: 42,
        mercenary_id: 7,
        ..SaveSpec::default()
    };
    let header = Header::parse(&build_save(&test_data(), &spec)).expect("valid header");

    assert_eq!(header.version, 96);
    assert_eq!(header.name, "Gandalfine");
    assert_eq!(header.class, CharacterClass::Sorceress);
    assert_eq!(header.level, 42);
    assert!(header.status.hardcore);
    assert!(header.status.expansion);
    assert!(header.status.ladder);
    assert!(!header.status.died);
    assert_eq!(header.last_played, Some(1_700_000_000));
    assert_eq!(header.mercenary_id, Some(7));
}

#[test]
fn never_played_and_no_mercenary_are_absent() {
    let spec = SaveSpec {
        last_played: 0,
        ..SaveSpec::default()
    };
    let header = Header::parse(&build_save(&test_data(), &spec)).expect("valid header");
    assert_eq!(header.last_played, None);
    assert_eq!(header.mercenary_id, None);
}

#[test]
fn unknown_class_byte_is_preserved() {
    let spec = SaveSpec {
        class: 9,
        ..SaveSpec::default()
    };
    let header = Header::parse(&build_save(&test_data(), &spec)).expect("valid header");
    assert_eq!(header.class, CharacterClass::Unknown(9));
    assert_eq!(header.class.to_string(), "Class 9");
}

#[test]
fn hell_beats_nightmare() {
    assert_eq!(Difficulty::from_progress([0x80, 0x80, 0x80]), Difficulty::Hell);
    assert_eq!(
        Difficulty::from_progress([0x80, 0x80, 0x00]),
        Difficulty::Nightmare
    );
    assert_eq!(Difficulty::from_progress([0x00, 0x00, 0x00]), Difficulty::Normal);
    assert_eq!(Difficulty::from_progress([0x80, 0x00, 0x00]), Difficulty::Normal);
}
