//! Final gameplay stats from base attributes, gear and balance tables.

use serde::Serialize;

use crate::character_class::CharacterClass;
use crate::d2s::attributes::AttributeSet;
use crate::d2s::header::Difficulty;
use crate::d2s::items::Item;
use crate::d2s::types::{ATTR_LIFE, ATTR_MANA, ATTR_STAMINA};
use crate::tables::{ClassConstants, GameData, ItemCategory};

const STAT_STRENGTH: u16 = 0;
const STAT_ENERGY: u16 = 1;
const STAT_DEXTERITY: u16 = 2;
const STAT_VITALITY: u16 = 3;
const STAT_LIFE: u16 = 7;
const STAT_MANA: u16 = 9;
const STAT_STAMINA: u16 = 11;
const STAT_STAMINA_PERCENT: u16 = 12;
const STAT_ENHANCED_DEFENSE: u16 = 16;
const STAT_ATTACK_RATING: u16 = 19;
const STAT_DEFENSE: u16 = 31;
const STAT_FIRE_RESIST: u16 = 39;
const STAT_LIGHTNING_RESIST: u16 = 41;
const STAT_COLD_RESIST: u16 = 43;
const STAT_POISON_RESIST: u16 = 45;
const STAT_LIFE_PERCENT: u16 = 76;
const STAT_MANA_PERCENT: u16 = 77;
const STAT_ATTACK_RATING_PERCENT: u16 = 119;
const STAT_DEFENSE_PER_LEVEL: u16 = 214;
const STAT_STAMINA_PER_LEVEL: u16 = 215;
const STAT_LIFE_PER_LEVEL: u16 = 216;
const STAT_MANA_PER_LEVEL: u16 = 217;
const STAT_ATTACK_RATING_PER_LEVEL: u16 = 224;

/// Per-level stats are stored in eighths of a point, except attack rating
/// which uses halves.
const PER_LEVEL_DIVISOR: i64 = 8;
const AR_PER_LEVEL_DIVISOR: i64 = 2;
const AR_DEXTERITY_OFFSET: i64 = 7;
const AR_PER_DEXTERITY: i64 = 5;
const DEFENSE_PER_DEXTERITY: i64 = 4;

/// An item whose stats count toward the character.
#[derive(Debug, Clone, Copy)]
pub struct ItemContribution<'a> {
    pub item: &'a Item,
    /// Worn items also add their own base defense.
    pub equipped: bool,
}

impl<'a> ItemContribution<'a> {
    /// Worn gear plus charms in the inventory grid.
    pub fn collect(items: &'a [Item], data: &GameData) -> Vec<Self> {
        items
            .iter()
            .filter_map(|item| {
                if item.equip_slot().is_some() {
                    Some(Self {
                        item,
                        equipped: true,
                    })
                } else if item.in_inventory() && item.type_def(data).is_some_and(|def| def.charm) {
                    Some(Self {
                        item,
                        equipped: false,
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    fn stat(&self, id: u16) -> i64 {
        self.item.stat_total(id)
    }
}

pub struct DerivedInputs<'a> {
    pub attributes: &'a AttributeSet,
    pub class: CharacterClass,
    /// Header level, used when the attribute stream carries none.
    pub header_level: u8,
    pub difficulty: Difficulty,
    pub items: Vec<ItemContribution<'a>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivedStats {
    pub total_strength: i64,
    pub total_dexterity: i64,
    pub total_vitality: i64,
    pub total_energy: i64,
    pub item_strength: i64,
    pub item_dexterity: i64,
    pub item_vitality: i64,
    pub item_energy: i64,
    pub life: i64,
    pub mana: i64,
    pub stamina: i64,
    pub defense: i64,
    pub attack_rating: i64,
    pub fire_resist: i64,
    pub cold_resist: i64,
    pub lightning_resist: i64,
    pub poison_resist: i64,
    pub difficulty: Difficulty,
    pub next_level_experience: Option<u64>,
}

#[derive(Default)]
struct ItemSums {
    strength: i64,
    energy: i64,
    dexterity: i64,
    vitality: i64,
    life: i64,
    mana: i64,
    stamina: i64,
    defense: i64,
    attack_rating: i64,
    attack_rating_percent: i64,
    fire_resist: i64,
    lightning_resist: i64,
    cold_resist: i64,
    poison_resist: i64,
    life_percent: i64,
    mana_percent: i64,
    stamina_percent: i64,
    life_per_level: i64,
    mana_per_level: i64,
    stamina_per_level: i64,
    defense_per_level: i64,
    attack_rating_per_level: i64,
}

impl ItemSums {
    fn collect(items: &[ItemContribution<'_>]) -> Self {
        let mut sums = Self::default();
        for item in items {
            sums.strength += item.stat(STAT_STRENGTH);
            sums.energy += item.stat(STAT_ENERGY);
            sums.dexterity += item.stat(STAT_DEXTERITY);
            sums.vitality += item.stat(STAT_VITALITY);
            sums.life += item.stat(STAT_LIFE);
            sums.mana += item.stat(STAT_MANA);
            sums.stamina += item.stat(STAT_STAMINA);
            sums.defense += item.stat(STAT_DEFENSE);
            sums.attack_rating += item.stat(STAT_ATTACK_RATING);
            sums.attack_rating_percent += item.stat(STAT_ATTACK_RATING_PERCENT);
            sums.fire_resist += item.stat(STAT_FIRE_RESIST);
            sums.lightning_resist += item.stat(STAT_LIGHTNING_RESIST);
            sums.cold_resist += item.stat(STAT_COLD_RESIST);
            sums.poison_resist += item.stat(STAT_POISON_RESIST);
            sums.life_percent += item.stat(STAT_LIFE_PERCENT);
            sums.mana_percent += item.stat(STAT_MANA_PERCENT);
            sums.stamina_percent += item.stat(STAT_STAMINA_PERCENT);
            sums.life_per_level += item.stat(STAT_LIFE_PER_LEVEL);
            sums.mana_per_level += item.stat(STAT_MANA_PER_LEVEL);
            sums.stamina_per_level += item.stat(STAT_STAMINA_PER_LEVEL);
            sums.defense_per_level += item.stat(STAT_DEFENSE_PER_LEVEL);
            sums.attack_rating_per_level += item.stat(STAT_ATTACK_RATING_PER_LEVEL);
        }
        sums
    }
}

/// `floor(raw * (1 + percent / 100))`
fn apply_percent(raw: f64, percent: i64) -> i64 {
    (raw * (100.0 + percent as f64) / 100.0).floor() as i64
}

fn per_level(value: i64, level: i64, divisor: i64) -> i64 {
    (value * level).div_euclid(divisor)
}

/// Pool stat: base, flat item bonus, attribute scaling and per-level bonus,
/// then the percentage bonus.
fn pool(base: i64, flat: i64, attribute: i64, per_point: f64, from_levels: i64, percent: i64) -> i64 {
    let raw = (base + flat + from_levels) as f64 + attribute as f64 * per_point;
    apply_percent(raw, percent)
}

pub fn compute_derived_stats(inputs: &DerivedInputs<'_>, data: &GameData) -> DerivedStats {
    let attrs = inputs.attributes;
    let constants: ClassConstants = data
        .class_constants
        .get(inputs.class.as_str())
        .copied()
        .unwrap_or_default();
    let level = match attrs.level() {
        0 => i64::from(inputs.header_level),
        level => level,
    };
    let items = ItemSums::collect(&inputs.items);

    let total_strength = attrs.strength() + items.strength;
    let total_dexterity = attrs.dexterity() + items.dexterity;
    let total_vitality = attrs.vitality() + items.vitality;
    let total_energy = attrs.energy() + items.energy;

    let life = pool(
        attrs.get(ATTR_LIFE),
        items.life,
        items.vitality,
        constants.life_per_vitality,
        per_level(items.life_per_level, level, PER_LEVEL_DIVISOR),
        items.life_percent,
    );
    let mana = pool(
        attrs.get(ATTR_MANA),
        items.mana,
        items.energy,
        constants.mana_per_energy,
        per_level(items.mana_per_level, level, PER_LEVEL_DIVISOR),
        items.mana_percent,
    );
    let stamina = pool(
        attrs.get(ATTR_STAMINA),
        items.stamina,
        items.vitality,
        constants.stamina_per_vitality,
        per_level(items.stamina_per_level, level, PER_LEVEL_DIVISOR),
        items.stamina_percent,
    );

    let mut defense = total_dexterity.div_euclid(DEFENSE_PER_DEXTERITY) + items.defense;
    for contribution in inputs.items.iter().filter(|c| c.equipped) {
        let item = contribution.item;
        if item.category(data) != ItemCategory::Armor {
            continue;
        }
        let base = item.defense(data).unwrap_or(0);
        defense += apply_percent(base as f64, contribution.stat(STAT_ENHANCED_DEFENSE));
    }
    defense += per_level(items.defense_per_level, level, PER_LEVEL_DIVISOR);

    let resist_penalty = data
        .difficulty_penalties
        .get(inputs.difficulty.as_str())
        .map(|p| p.resist_penalty)
        .unwrap_or(0);

    let ar_base = ((total_dexterity - AR_DEXTERITY_OFFSET) * AR_PER_DEXTERITY) as f64
        + constants.to_hit_factor
        + (items.attack_rating
            + per_level(items.attack_rating_per_level, level, AR_PER_LEVEL_DIVISOR)) as f64;
    let attack_rating = apply_percent(ar_base, items.attack_rating_percent).max(0);

    DerivedStats {
        total_strength,
        total_dexterity,
        total_vitality,
        total_energy,
        item_strength: items.strength,
        item_dexterity: items.dexterity,
        item_vitality: items.vitality,
        item_energy: items.energy,
        life,
        mana,
        stamina,
        defense,
        attack_rating,
        fire_resist: items.fire_resist + resist_penalty,
        cold_resist: items.cold_resist + resist_penalty,
        lightning_resist: items.lightning_resist + resist_penalty,
        poison_resist: items.poison_resist + resist_penalty,
        difficulty: inputs.difficulty,
        next_level_experience: u32::try_from(level)
            .ok()
            .and_then(|level| data.experience.next_level(level)),
    }
}
