//! Game-balance lookup tables.
//!
//! A [`GameData`] bundle is built once (normally deserialized from the JSON
//! emitted by the table loader) and shared read-only by every decode. Runtime
//! refreshes go through [`TableStore`], which swaps in a fully built bundle so
//! a decode in flight keeps the snapshot it started with.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::properties::{PropertyDescriptor, overrides};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Armor,
    Weapon,
    #[default]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTypeDef {
    pub name: String,
    pub category: ItemCategory,
    pub width: u8,
    pub height: u8,
    pub defense: u32,
    pub min_damage: u32,
    pub max_damage: u32,
    pub two_hand_min_damage: u32,
    pub two_hand_max_damage: u32,
    pub req_level: u32,
    pub req_str: u32,
    pub req_dex: u32,
    pub stackable: bool,
    pub charm: bool,
}

/// Storage layout and display rules for one stat id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatDef {
    pub name: String,
    pub save_bits: u8,
    pub save_add: i32,
    pub save_param_bits: u8,
    /// 2 = chance to cast, 3 = charges; anything else stores the value whole.
    pub encoding: u8,
    /// Number of consecutive ids stored together, this one included (damage
    /// ranges, poison). Zero and one both mean a single stat.
    pub group_count: u8,
    pub descriptor: PropertyDescriptor,
}

impl StatDef {
    pub fn grouped_len(&self) -> u16 {
        u16::from(self.group_count.max(1))
    }

    pub fn is_compound(&self) -> bool {
        self.group_count > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillDef {
    pub name: String,
    /// Three-letter code of the owning class, e.g. `sor`.
    pub class_code: Option<String>,
}

/// Class wording used by skill-bonus properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassStrings {
    pub name: String,
    pub code: Option<String>,
    /// "to Amazon Skill Levels"
    pub all_skills: Option<String>,
    /// "(Amazon Only)"
    pub class_only: Option<String>,
    pub skill_tabs: Vec<Option<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassConstants {
    pub to_hit_factor: f64,
    pub life_per_level: f64,
    pub mana_per_level: f64,
    pub stamina_per_level: f64,
    pub life_per_vitality: f64,
    pub mana_per_energy: f64,
    pub stamina_per_vitality: f64,
    pub base_strength: i64,
    pub base_dexterity: i64,
    pub base_vitality: i64,
    pub base_energy: i64,
    pub base_life: i64,
    pub base_stamina: i64,
    pub block_factor: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyPenalty {
    pub resist_penalty: i64,
}

/// Experience needed to leave each level, indexed by level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceTable {
    pub thresholds: Vec<u64>,
    pub max_level: u32,
}

impl Default for ExperienceTable {
    fn default() -> Self {
        Self {
            thresholds: Vec::new(),
            max_level: 99,
        }
    }
}

impl ExperienceTable {
    pub fn next_level(&self, level: u32) -> Option<u64> {
        if level >= self.max_level {
            return None;
        }
        self.thresholds
            .get(level as usize)
            .copied()
            .filter(|&xp| xp > 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameData {
    pub item_types: BTreeMap<String, ItemTypeDef>,
    pub stats: BTreeMap<u16, StatDef>,
    pub skills: BTreeMap<u16, SkillDef>,
    pub classes: BTreeMap<u8, ClassStrings>,
    pub uniques: BTreeMap<u16, String>,
    pub set_items: BTreeMap<u16, String>,
    pub runewords: BTreeMap<u16, String>,
    pub rare_names: BTreeMap<u16, String>,
    pub magic_prefixes: BTreeMap<u16, String>,
    pub magic_suffixes: BTreeMap<u16, String>,
    pub class_constants: BTreeMap<String, ClassConstants>,
    pub difficulty_penalties: BTreeMap<String, DifficultyPenalty>,
    pub experience: ExperienceTable,
}

impl GameData {
    pub fn item_type(&self, code: &str) -> Option<&ItemTypeDef> {
        self.item_types.get(code)
    }

    pub fn stat(&self, id: u16) -> Option<&StatDef> {
        self.stats.get(&id)
    }

    pub fn skill_name(&self, id: u16) -> Option<&str> {
        self.skills
            .get(&id)
            .map(|s| s.name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn class_strings(&self, id: u8) -> Option<&ClassStrings> {
        self.classes.get(&id)
    }

    pub fn class_by_code(&self, code: &str) -> Option<&ClassStrings> {
        self.classes
            .values()
            .find(|c| c.code.as_deref() == Some(code))
    }

    /// Display name of an item type: table name, then the built-in names of
    /// stacked gems and runes, then the raw code.
    pub fn base_name(&self, code: &str) -> String {
        if let Some(def) = self.item_type(code)
            && !def.name.is_empty()
        {
            return def.name.clone();
        }
        if let Some(name) = overrides::stacked_item_name(code) {
            return name.to_string();
        }
        if code.is_empty() {
            "Unknown".to_string()
        } else {
            code.to_string()
        }
    }

    /// Fill blank names and descriptor strings from a secondary bundle,
    /// typically the stock game's tables underneath a mod's.
    pub fn merge_missing_names(&mut self, fallback: &GameData) {
        for (code, def) in &mut self.item_types {
            if def.name.is_empty()
                && let Some(other) = fallback.item_types.get(code)
            {
                def.name = other.name.clone();
            }
        }
        for (id, skill) in &mut self.skills {
            if skill.name.is_empty()
                && let Some(other) = fallback.skills.get(id)
            {
                skill.name = other.name.clone();
            }
        }
        for (id, stat) in &mut self.stats {
            if let Some(other) = fallback.stats.get(id) {
                stat.descriptor.fill_missing_strings(&other.descriptor);
            }
        }
        for (id, class) in &mut self.classes {
            let Some(other) = fallback.classes.get(id) else {
                continue;
            };
            if class.name.is_empty() {
                class.name = other.name.clone();
            }
            if class.code.is_none() {
                class.code = other.code.clone();
            }
            if class.all_skills.is_none() {
                class.all_skills = other.all_skills.clone();
            }
            if class.class_only.is_none() {
                class.class_only = other.class_only.clone();
            }
            if class.skill_tabs.len() < other.skill_tabs.len() {
                class.skill_tabs.resize(other.skill_tabs.len(), None);
            }
            for (tab, other_tab) in class.skill_tabs.iter_mut().zip(&other.skill_tabs) {
                if tab.is_none() {
                    *tab = other_tab.clone();
                }
            }
        }
        for (ours, theirs) in [
            (&mut self.uniques, &fallback.uniques),
            (&mut self.set_items, &fallback.set_items),
            (&mut self.runewords, &fallback.runewords),
            (&mut self.rare_names, &fallback.rare_names),
            (&mut self.magic_prefixes, &fallback.magic_prefixes),
            (&mut self.magic_suffixes, &fallback.magic_suffixes),
        ] {
            merge_name_map(ours, theirs);
        }
    }

    /// Apply the built-in descriptor and skill-name corrections.
    pub fn with_builtin_overrides(mut self) -> Self {
        overrides::apply(&mut self);
        self
    }
}

fn merge_name_map(ours: &mut BTreeMap<u16, String>, theirs: &BTreeMap<u16, String>) {
    for (id, name) in theirs {
        let entry = ours.entry(*id).or_default();
        if entry.is_empty() {
            entry.clone_from(name);
        }
    }
}

/// Holder for the current table bundle.
#[derive(Debug, Default)]
pub struct TableStore {
    current: RwLock<Arc<GameData>>,
}

impl TableStore {
    pub fn new(data: GameData) -> Self {
        Self {
            current: RwLock::new(Arc::new(data)),
        }
    }

    /// The bundle every decode started from now on will see.
    pub fn snapshot(&self) -> Arc<GameData> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Publish a replacement bundle, returning the previous one.
    pub fn replace(&self, data: GameData) -> Arc<GameData> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, Arc::new(data))
    }
}
