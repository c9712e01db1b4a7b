mod common;

use d2s_core::character_class::CharacterClass;
use d2s_core::d2s::attributes::AttributeSet;
use d2s_core::d2s::header::Difficulty;
use d2s_core::d2s::items::{Item, MagicAttribute};
use d2s_core::derived::{DerivedInputs, DerivedStats, ItemContribution, compute_derived_stats};

use common::test_data;

fn equipped(code: &str, slot: u8, attrs: &[(u16, i64)]) -> Item {
    Item {
        code: code.to_string(),
        location: 1,
        equipped_slot: slot,
        magic_attributes: attrs
            .iter()
            .map(|&(id, v)| MagicAttribute::new(id, vec![v]))
            .collect(),
        ..Item::default()
    }
}

fn stored(code: &str, attrs: &[(u16, i64)]) -> Item {
    Item {
        location: 0,
        equipped_slot: 0,
        panel: 1,
        ..equipped(code, 0, attrs)
    }
}

fn base_attributes() -> AttributeSet {
    [(0, 20), (1, 35), (2, 20), (3, 10), (7, 60), (9, 80), (11, 80), (12, 2)]
        .into_iter()
        .collect()
}

#[test]
fn totals_defense_and_pools() {
    let data = test_data();
    let attrs = base_attributes();
    let items = vec![
        equipped("cap", 1, &[(0, 5), (16, 10), (3, 5)]),
        equipped("rin", 6, &[(0, 5), (39, 30)]),
    ];
    let inputs = DerivedInputs {
        attributes: &attrs,
        class: CharacterClass::Sorceress,
        header_level: 2,
        difficulty: Difficulty::Nightmare,
        items: ItemContribution::collect(&items, &data),
    };
    let stats = compute_derived_stats(&inputs, &data);

    assert_eq!(stats.item_strength, 10);
    assert_eq!(stats.total_strength, 30);
    assert_eq!(stats.total_dexterity, 20);
    assert_eq!(stats.total_vitality, 15);
    // dexterity / 4 + cap 100 with 10% enhanced defense
    assert_eq!(stats.defense, 115);
    assert_eq!(stats.life, 70);
    assert_eq!(stats.mana, 80);
    assert_eq!(stats.stamina, 85);
    assert_eq!(stats.attack_rating, 50);
    assert_eq!(stats.fire_resist, -10);
    assert_eq!(stats.cold_resist, -40);
    assert_eq!(stats.difficulty, Difficulty::Nightmare);
    assert_eq!(stats.next_level_experience, Some(1500));
}

#[test]
fn inventory_counts_charms_only() {
    let data = test_data();
    let attrs = base_attributes();
    let items = vec![stored("cm1", &[(2, 3)]), stored("rin", &[(2, 50)])];
    let contributions = ItemContribution::collect(&items, &data);
    assert_eq!(contributions.len(), 1);
    assert!(!contributions[0].equipped);

    let inputs = DerivedInputs {
        attributes: &attrs,
        class: CharacterClass::Sorceress,
        header_level: 2,
        difficulty: Difficulty::Normal,
        items: contributions,
    };
    let stats = compute_derived_stats(&inputs, &data);
    assert_eq!(stats.total_dexterity, 23);
    assert_eq!(stats.fire_resist, 0);
}

#[test]
fn hell_applies_full_penalty() {
    let data = test_data();
    let attrs = base_attributes();
    let inputs = DerivedInputs {
        attributes: &attrs,
        class: CharacterClass::Sorceress,
        header_level: 2,
        difficulty: Difficulty::Hell,
        items: Vec::new(),
    };
    let stats = compute_derived_stats(&inputs, &data);
    assert_eq!(stats.fire_resist, -100);
    assert_eq!(stats.poison_resist, -100);
    assert_eq!(stats.defense, 5);
}

#[test]
fn percent_bonus_applies_after_flat_bonus() {
    let data = test_data();
    let attrs = base_attributes();
    let items = vec![equipped("rin", 7, &[(7, 10), (76, 10)])];
    let inputs = DerivedInputs {
        attributes: &attrs,
        class: CharacterClass::Sorceress,
        header_level: 2,
        difficulty: Difficulty::Normal,
        items: ItemContribution::collect(&items, &data),
    };
    let stats = compute_derived_stats(&inputs, &data);
    // (60 + 10) * 1.1
    assert_eq!(stats.life, 77);
}

#[test]
fn unknown_class_uses_zero_constants() {
    let data = test_data();
    let attrs: AttributeSet = [(2, 27)].into_iter().collect();
    let inputs = DerivedInputs {
        attributes: &attrs,
        class: CharacterClass::Unknown(9),
        header_level: 1,
        difficulty: Difficulty::Normal,
        items: Vec::new(),
    };
    let stats = compute_derived_stats(&inputs, &data);
    assert_eq!(stats.attack_rating, 100);
    assert_eq!(stats.next_level_experience, Some(500));
}

fn at_level(level: i64) -> AttributeSet {
    let mut attrs = base_attributes();
    attrs.insert(12, level);
    attrs
}

fn sorceress_stats(attrs: &AttributeSet, items: &[Item]) -> DerivedStats {
    let data = test_data();
    let inputs = DerivedInputs {
        attributes: attrs,
        class: CharacterClass::Sorceress,
        header_level: 1,
        difficulty: Difficulty::Normal,
        items: ItemContribution::collect(items, &data),
    };
    compute_derived_stats(&inputs, &data)
}

#[test]
fn per_level_bonuses_scale_with_character_level() {
    let items = vec![equipped(
        "rin",
        6,
        &[(214, 10), (215, 12), (216, 5), (217, 20), (224, 3)],
    )];
    let stats = sorceress_stats(&at_level(10), &items);

    // 20 dexterity / 4 + floor(10 * 10 / 8)
    assert_eq!(stats.defense, 17);
    // 80 + floor(12 * 10 / 8)
    assert_eq!(stats.stamina, 95);
    // 60 + floor(5 * 10 / 8)
    assert_eq!(stats.life, 66);
    // 80 + floor(20 * 10 / 8)
    assert_eq!(stats.mana, 105);
    // (20 - 7) * 5 - 15 + floor(3 * 10 / 2)
    assert_eq!(stats.attack_rating, 65);
}

#[test]
fn negative_per_level_bonuses_round_down() {
    let items = vec![equipped("rin", 6, &[(216, -3), (214, -5)])];
    let stats = sorceress_stats(&at_level(10), &items);

    // floor(-30 / 8) is -4, not -3
    assert_eq!(stats.life, 56);
    // 5 + floor(-50 / 8)
    assert_eq!(stats.defense, -2);
}

#[test]
fn attack_rating_percent_applies_to_flat_total() {
    let items = vec![equipped("rin", 6, &[(19, 10), (119, 20)])];
    let stats = sorceress_stats(&at_level(2), &items);
    // (50 + 10) * 1.2
    assert_eq!(stats.attack_rating, 72);
}

#[test]
fn attack_rating_never_goes_negative() {
    let items = vec![equipped("rin", 6, &[(19, -100)])];
    let stats = sorceress_stats(&at_level(2), &items);
    assert_eq!(stats.attack_rating, 0);

    let mut attrs = at_level(2);
    attrs.insert(2, 0);
    let stats = sorceress_stats(&attrs, &[]);
    assert_eq!(stats.attack_rating, 0);
}
