use serde::{Deserialize, Serialize};

use crate::d2s::attributes::AttributeSet;
use crate::derived::DerivedStats;

use super::item_view::ItemView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMethod {
    /// Every section decoded against the balance tables.
    Full,
    /// Marker scan only: attributes and classic skills.
    Basic,
}

impl ParseMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Basic => "basic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatEntry {
    pub id: u16,
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillEntry {
    pub id: u16,
    pub name: String,
    pub points: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquippedItem {
    pub slot: String,
    pub item: ItemView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    pub name: String,
    pub class: String,
    pub class_id: u8,
    pub level: i64,
    pub hardcore: bool,
    pub expansion: bool,
    pub dead: bool,
    pub ladder: bool,
    /// Unix seconds.
    pub last_played: Option<u32>,
    pub attributes: AttributeSet,
    /// Allocated skills only.
    pub skills: Vec<SkillEntry>,
    pub equipped: Vec<EquippedItem>,
    pub inventory: Vec<ItemView>,
    pub mercenary: Vec<EquippedItem>,
    pub derived: Option<DerivedStats>,
    pub parse_method: ParseMethod,
    pub notices: Vec<String>,
}

impl Character {
    /// Named base attributes in stream order, zero-filled.
    pub fn stats(&self) -> Vec<StatEntry> {
        self.attributes
            .named()
            .into_iter()
            .enumerate()
            .map(|(id, (name, value))| StatEntry {
                id: id as u16,
                name: name.to_string(),
                value,
            })
            .collect()
    }

    pub fn equipped_item(&self, slot: &str) -> Option<&ItemView> {
        self.equipped
            .iter()
            .find(|entry| entry.slot == slot)
            .map(|entry| &entry.item)
    }
}
