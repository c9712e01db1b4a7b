mod common;

use std::sync::Arc;

use d2s_core::core_api::{CoreErrorCode, Engine, ParseMethod};
use d2s_core::d2s::DecodeOptions;
use d2s_core::d2s::attributes::encode_attributes;
use d2s_core::d2s::skills::Ruleset;
use d2s_core::layout::SectionId;
use d2s_core::reader::BitWriter;
use d2s_core::tables::{GameData, TableStore};

use common::{ItemSpec, SaveSpec, build_save, test_data};

fn engine() -> Engine {
    Engine::new().with_tables(Arc::new(TableStore::new(test_data())))
}

fn geared_save() -> SaveSpec {
    let mut skills = vec![0u8; 33];
    skills[0] = 1;
    skills[8] = 3;
    SaveSpec {
        mercenary_id: 5,
        skills: Some(skills),
        items: vec![
            ItemSpec::extended("cap")
                .equipped(1)
                .armor(0)
                .with_attr(0, &[5])
                .with_attr(16, &[10]),
            ItemSpec::extended("rin").equipped(6).with_attr(39, &[20]),
            ItemSpec::extended("cm1").in_inventory(0, 0).with_attr(2, &[3]),
            ItemSpec::extended("hax").in_inventory(4, 0).weapon(),
        ],
        mercenary_items: vec![ItemSpec::extended("cap").equipped(1).armor(7)],
        ..SaveSpec::default()
    }
}

/// Zeroed header with only the magic and version set.
fn bare_header(version: u32) -> Vec<u8> {
    let mut bytes = vec![0u8; 765];
    bytes[0..4].copy_from_slice(&0xAA55_AA55u32.to_le_bytes());
    bytes[4..8].copy_from_slice(&version.to_le_bytes());
    bytes
}

#[test]
fn full_decode_builds_character_sheet() {
    let data = test_data();
    let bytes = build_save(&data, &geared_save());

    let session = engine().open_bytes(&bytes).expect("decode");
    assert_eq!(session.parse_method(), ParseMethod::Full);
    let character = session.character();

    assert_eq!(character.name, "Tester");
    assert_eq!(character.class, "Sorceress");
    assert_eq!(character.class_id, 1);
    assert_eq!(character.level, 10);
    assert!(character.expansion);
    assert!(character.notices.is_empty(), "{:?}", character.notices);

    let skills: Vec<(&str, u8)> = character
        .skills
        .iter()
        .map(|s| (s.name.as_str(), s.points))
        .collect();
    assert_eq!(skills, vec![("Fire Bolt", 1), ("Frost Nova", 3)]);

    let slots: Vec<&str> = character.equipped.iter().map(|e| e.slot.as_str()).collect();
    assert_eq!(slots, vec!["head", "rRing"]);
    let cap = character.equipped_item("head").expect("helm");
    assert_eq!(cap.name, "Cap");
    assert_eq!(cap.defense, Some(100));
    assert_eq!(cap.durability, Some((10, 12)));
    assert_eq!(cap.req_level, 1);
    let props: Vec<&str> = cap.properties.iter().map(|p| p.description.as_str()).collect();
    assert_eq!(props, vec!["+5 to Strength", "+10% Enhanced Defense"]);

    assert_eq!(character.inventory.len(), 2);
    let axe = &character.inventory[1];
    assert_eq!(axe.min_damage, Some(3));
    let position = axe.position.expect("grid position");
    assert_eq!((position.x, position.y, position.w, position.h), (4, 0, 1, 3));

    assert_eq!(character.mercenary.len(), 1);
    assert_eq!(character.mercenary[0].item.defense, Some(7));

    let derived = character.derived.as_ref().expect("derived stats");
    assert_eq!(derived.total_strength, 25);
    assert_eq!(derived.total_dexterity, 28);
    assert_eq!(derived.defense, 28 / 4 + 110);
    assert_eq!(derived.fire_resist, 20);
}

#[test]
fn layout_covers_whole_file() {
    let data = test_data();
    let bytes = build_save(&data, &geared_save());

    let session = engine().open_bytes(&bytes).expect("decode");
    let layout = session.layout().expect("layout after full decode");
    assert_eq!(layout.file_len, bytes.len());
    layout.validate().expect("contiguous layout");

    let ids: Vec<SectionId> = layout.sections.iter().map(|s| s.id).collect();
    assert_eq!(
        ids,
        vec![
            SectionId::Header,
            SectionId::Attributes,
            SectionId::Skills,
            SectionId::Items,
            SectionId::Corpse,
            SectionId::Mercenary,
            SectionId::Golem,
        ]
    );
    let save = session.save().expect("decoded save");
    assert_eq!(save.items.len(), 4);
    assert!(save.golem.is_none());
}

#[test]
fn golem_item_is_decoded() {
    let data = test_data();
    let spec = SaveSpec {
        golem: Some(ItemSpec::extended("hax").weapon()),
        ..SaveSpec::default()
    };
    let bytes = build_save(&data, &spec);

    let session = engine().open_bytes(&bytes).expect("decode");
    let golem = session.save().and_then(|s| s.golem.as_ref()).expect("golem");
    assert_eq!(golem.code, "hax");
}

#[test]
fn classic_ruleset_reads_thirty_skill_bytes() {
    let data = test_data();
    let mut skills = vec![0u8; 30];
    skills[29] = 2;
    let spec = SaveSpec {
        status: 0,
        skills: Some(skills),
        ..SaveSpec::default()
    };
    let bytes = build_save(&data, &spec);

    let engine = engine().with_options(DecodeOptions {
        ruleset: Ruleset::Classic,
    });
    let session = engine.open_bytes(&bytes).expect("decode");
    assert_eq!(session.parse_method(), ParseMethod::Full);
    let skills = &session.character().skills;
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0].id, 65);
    assert_eq!(skills[0].name, "Skill 65");
}

#[test]
fn damaged_item_list_keeps_full_decode() {
    let data = test_data();
    let spec = SaveSpec {
        items: vec![
            ItemSpec::extended("rin").equipped(6),
            ItemSpec::extended("zzz"),
        ],
        ..SaveSpec::default()
    };
    let bytes = build_save(&data, &spec);

    let session = engine().open_bytes(&bytes).expect("decode");
    assert_eq!(session.parse_method(), ParseMethod::Full);
    let character = session.character();
    assert_eq!(character.equipped.len(), 1);
    assert_eq!(character.notices.len(), 1);
    assert!(character.notices[0].contains("zzz"));
    session.layout().expect("layout").validate().expect("tail recorded");
}

#[test]
fn truncated_skill_section_keeps_full_decode() {
    let data = test_data();
    let spec = SaveSpec {
        skills: Some(vec![2, 0, 0, 0, 1]),
        ..SaveSpec::default()
    };
    let mut bytes = build_save(&data, &spec);
    let skills_end = 765 + 2 + encode_attributes(&spec.attributes).len() + 2 + 5;
    bytes.truncate(skills_end);

    let session = engine().open_bytes(&bytes).expect("decode");
    assert_eq!(session.parse_method(), ParseMethod::Full);
    let character = session.character();
    let skills: Vec<(u16, &str, u8)> = character
        .skills
        .iter()
        .map(|s| (s.id, s.name.as_str(), s.points))
        .collect();
    assert_eq!(skills, vec![(36, "Fire Bolt", 2), (40, "Skill 40", 1)]);
    assert!(character.derived.is_some());
    assert!(
        character
            .notices
            .iter()
            .any(|n| n == "skill section truncated")
    );
    session.layout().expect("layout").validate().expect("layout tiles");
}

#[test]
fn without_tables_falls_back_to_scan() {
    let data = test_data();
    let bytes = build_save(&data, &geared_save());

    let session = Engine::new().open_bytes(&bytes).expect("decode");
    assert_eq!(session.parse_method(), ParseMethod::Basic);
    assert!(session.layout().is_none());

    let character = session.character();
    assert_eq!(character.attributes.strength(), 20);
    assert!(character.equipped.is_empty());
    assert!(character.derived.is_none());
    assert_eq!(character.notices[0], "no balance tables loaded");

    let skills: Vec<(u16, &str, u8)> = character
        .skills
        .iter()
        .map(|s| (s.id, s.name.as_str(), s.points))
        .collect();
    assert_eq!(skills, vec![(36, "Fire Bolt", 1), (44, "Frost Nova", 3)]);
}

#[test]
fn scan_reads_attributes_from_minimal_buffer() {
    let mut bytes = bare_header(96);
    bytes.extend_from_slice(b"gf");
    let mut w = BitWriter::new();
    w.write_bits(0, 9);
    w.write_bits(30, 10);
    w.write_bits(0x1FF, 9);
    bytes.extend(w.into_bytes());

    let session = Engine::new().open_bytes(&bytes).expect("decode");
    let character = session.character();
    assert_eq!(character.parse_method, ParseMethod::Basic);
    assert_eq!(character.attributes.strength(), 30);
    assert!(character.skills.is_empty());
    assert!(
        character
            .notices
            .iter()
            .any(|n| n == "skill section not found")
    );
}

#[test]
fn unsupported_version_falls_back() {
    let data = test_data();
    let spec = SaveSpec {
        version: 97,
        ..SaveSpec::default()
    };
    let bytes = build_save(&data, &spec);

    let session = engine().open_bytes(&bytes).expect("decode");
    assert_eq!(session.parse_method(), ParseMethod::Basic);
    assert!(session.character().notices[0].contains("unsupported save version 97"));
    assert_eq!(session.character().attributes.strength(), 20);
}

#[test]
fn invalid_header_is_an_error() {
    let err = engine().open_bytes([0u8; 64]).expect_err("short buffer");
    assert_eq!(err.code, CoreErrorCode::InvalidFormat);

    let mut bytes = bare_header(96);
    bytes[0] = 0x12;
    let err = Engine::new().open_bytes(&bytes).expect_err("bad magic");
    assert_eq!(err.code, CoreErrorCode::InvalidFormat);
}

#[test]
fn table_swap_does_not_affect_held_snapshot() {
    let data = test_data();
    let bytes = build_save(&data, &geared_save());
    let store = Arc::new(TableStore::new(data));
    let held = store.snapshot();
    let engine = Engine::new().with_tables(Arc::clone(&store));

    let previous = store.replace(GameData::default());
    assert!(Arc::ptr_eq(&previous, &held));
    assert!(held.item_type("cap").is_some());
    assert!(store.snapshot().item_type("cap").is_none());

    // Without item types the first list entry cannot be sized.
    let session = engine.open_bytes(&bytes).expect("decode");
    assert_eq!(session.parse_method(), ParseMethod::Full);
    assert!(session.character().equipped.is_empty());
    assert!(!session.character().notices.is_empty());
}

#[test]
fn stats_are_zero_filled_in_stream_order() {
    let data = test_data();
    let bytes = build_save(&data, &SaveSpec::default());

    let session = engine().open_bytes(&bytes).expect("decode");
    let stats = session.character().stats();
    assert_eq!(stats.len(), 16);
    assert_eq!(stats[0].name, "strength");
    assert_eq!(stats[0].value, 20);
    assert_eq!(stats[13].name, "experience");
    assert_eq!(stats[13].value, 0);
}
