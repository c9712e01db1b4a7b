use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::character_class::CharacterClass;
use crate::error::DecodeError;
use crate::properties::DescriptorMode;
use crate::reader::{BitReader, ByteReader};
use crate::tables::{GameData, ItemCategory, ItemTypeDef};

use super::types::{
    DEFAULT_DEFENSE_BITS, DEFAULT_DURABILITY_BITS, DEFAULT_MAX_DURABILITY_BITS, EQUIP_SLOT_NAMES,
    ITEM_LIST_MARKER, ITEM_MARKER_BITS, MAX_ITEM_ATTRIBUTES, QUALITY_NAMES, QUANTITY_BITS,
    STAT_ARMOR_DEFENSE, STAT_DURABILITY, STAT_ID_BITS, STAT_LIST_END, STAT_MAX_DURABILITY,
    TOME_CODES,
};

const EAR_NAME_CHARS: usize = 15;
const PERSONALIZED_NAME_CHARS: usize = 16;
const NAME_CHAR_BITS: u32 = 7;
const SET_LIST_COUNT: u32 = 5;
const RARE_AFFIX_COUNT: usize = 6;
const ETHEREAL_NUMERATOR: i64 = 3;
const ETHEREAL_DENOMINATOR: i64 = 2;

/// One entry of an item's attribute list: the stat id and the values stored
/// for it (parameters first, then the value itself).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicAttribute {
    pub id: u16,
    pub values: Vec<i64>,
}

impl MagicAttribute {
    pub fn new(id: u16, values: Vec<i64>) -> Self {
        Self { id, values }
    }

    /// The stored value; parameters come before it.
    pub fn value(&self) -> i64 {
        self.values.last().copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RareAffixes {
    pub first_name: u16,
    pub second_name: u16,
    /// Alternating prefix and suffix ids.
    pub affixes: [Option<u16>; RARE_AFFIX_COUNT],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "quality", rename_all = "snake_case")]
pub enum Quality {
    Low { kind: u8 },
    #[default]
    Normal,
    Superior { kind: u8 },
    Magic { prefix: u16, suffix: u16 },
    Set { set_id: u16 },
    Rare(RareAffixes),
    Unique { unique_id: u16 },
    Crafted(RareAffixes),
    Tempered,
}

impl Quality {
    pub fn id(&self) -> u8 {
        match self {
            Self::Low { .. } => 1,
            Self::Normal => 2,
            Self::Superior { .. } => 3,
            Self::Magic { .. } => 4,
            Self::Set { .. } => 5,
            Self::Rare(_) => 6,
            Self::Unique { .. } => 7,
            Self::Crafted(_) => 8,
            Self::Tempered => 9,
        }
    }

    pub fn name(&self) -> &'static str {
        QUALITY_NAMES[usize::from(self.id() - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Head,
    Neck,
    Torso,
    RightArm,
    LeftArm,
    RightRing,
    LeftRing,
    Belt,
    Feet,
    Hands,
    RightArmSwitch,
    LeftArmSwitch,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 12] = [
        Self::Head,
        Self::Neck,
        Self::Torso,
        Self::RightArm,
        Self::LeftArm,
        Self::RightRing,
        Self::LeftRing,
        Self::Belt,
        Self::Feet,
        Self::Hands,
        Self::RightArmSwitch,
        Self::LeftArmSwitch,
    ];

    /// Slots are numbered from 1; 0 means not equipped.
    pub fn from_raw(raw: u8) -> Option<Self> {
        let index = usize::from(raw).checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    pub fn raw(&self) -> u8 {
        match self {
            Self::Head => 1,
            Self::Neck => 2,
            Self::Torso => 3,
            Self::RightArm => 4,
            Self::LeftArm => 5,
            Self::RightRing => 6,
            Self::LeftRing => 7,
            Self::Belt => 8,
            Self::Feet => 9,
            Self::Hands => 10,
            Self::RightArmSwitch => 11,
            Self::LeftArmSwitch => 12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        EQUIP_SLOT_NAMES[usize::from(self.raw() - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoragePanel {
    Inventory,
    Cube,
    Stash,
    Unknown(u8),
}

impl StoragePanel {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Inventory,
            4 => Self::Cube,
            5 => Self::Stash,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Stored { panel: StoragePanel, x: u8, y: u8 },
    Equipped(EquipSlot),
    Belt { slot: u8 },
    Cursor,
    Socketed,
    Unknown(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarData {
    pub class: CharacterClass,
    pub level: u8,
    pub name: String,
}

/// Base defense and damage after ethereal scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseDamage {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub two_hand_min: Option<i64>,
    pub two_hand_max: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub identified: bool,
    pub socketed: bool,
    pub new: bool,
    pub is_ear: bool,
    pub starter: bool,
    pub simple: bool,
    pub ethereal: bool,
    pub personalized: bool,
    pub runeword: bool,
    pub version: u16,
    pub location: u8,
    pub equipped_slot: u8,
    pub x: u8,
    pub y: u8,
    pub panel: u8,
    pub ear: Option<EarData>,
    pub code: String,
    pub filled_sockets: u8,

    pub id: Option<u32>,
    pub level: u8,
    pub quality: Quality,
    pub picture: Option<u8>,
    pub class_specific: Option<u16>,
    pub runeword_id: Option<u16>,
    pub personalized_name: Option<String>,
    pub defense_rating: Option<i64>,
    pub max_durability: Option<i64>,
    pub durability: Option<i64>,
    pub quantity: Option<u16>,
    pub total_sockets: u8,
    pub set_list_mask: u8,

    pub magic_attributes: Vec<MagicAttribute>,
    /// Partial set bonuses, one list per set-list flag bit.
    pub set_attributes: Vec<Vec<MagicAttribute>>,
    pub runeword_attributes: Vec<MagicAttribute>,
    pub socketed_items: Vec<Item>,
}

impl Item {
    pub fn placement(&self) -> Placement {
        match self.location {
            0 => Placement::Stored {
                panel: StoragePanel::from_raw(self.panel),
                x: self.x,
                y: self.y,
            },
            1 => match EquipSlot::from_raw(self.equipped_slot) {
                Some(slot) => Placement::Equipped(slot),
                None => Placement::Unknown(self.location),
            },
            2 => Placement::Belt { slot: self.x },
            4 => Placement::Cursor,
            6 => Placement::Socketed,
            other => Placement::Unknown(other),
        }
    }

    pub fn equip_slot(&self) -> Option<EquipSlot> {
        match self.placement() {
            Placement::Equipped(slot) => Some(slot),
            _ => None,
        }
    }

    pub fn in_inventory(&self) -> bool {
        matches!(
            self.placement(),
            Placement::Stored {
                panel: StoragePanel::Inventory,
                ..
            }
        )
    }

    pub fn type_def<'d>(&self, data: &'d GameData) -> Option<&'d ItemTypeDef> {
        data.item_type(&self.code)
    }

    pub fn category(&self, data: &GameData) -> ItemCategory {
        self.type_def(data).map(|def| def.category).unwrap_or_default()
    }

    /// Every attribute list the item carries, socket fillers and set bonuses
    /// included.
    pub fn all_attributes(&self) -> impl Iterator<Item = &MagicAttribute> {
        self.magic_attributes
            .iter()
            .chain(self.runeword_attributes.iter())
            .chain(
                self.socketed_items
                    .iter()
                    .flat_map(|child| child.magic_attributes.iter()),
            )
            .chain(self.set_attributes.iter().flatten())
    }

    /// Sum of the stored value of every attribute with stat `id`.
    pub fn stat_total(&self, id: u16) -> i64 {
        self.all_attributes()
            .filter(|attr| attr.id == id)
            .map(MagicAttribute::value)
            .sum()
    }

    pub fn base_name(&self, data: &GameData) -> String {
        data.base_name(&self.code)
    }

    /// Name precedence: runeword, unique, set, rare/crafted fragments, magic
    /// affixes, superior, then the base name.
    pub fn display_name(&self, data: &GameData) -> String {
        let base = self.base_name(data);
        let lookup = |table: &std::collections::BTreeMap<u16, String>, id: u16| {
            table.get(&id).filter(|name| !name.is_empty()).cloned()
        };

        if self.runeword
            && let Some(name) = self.runeword_id.and_then(|id| lookup(&data.runewords, id))
        {
            return name;
        }

        match self.quality {
            Quality::Unique { unique_id } => lookup(&data.uniques, unique_id).unwrap_or(base),
            Quality::Set { set_id } => lookup(&data.set_items, set_id).unwrap_or(base),
            Quality::Rare(affixes) | Quality::Crafted(affixes) => {
                let parts: Vec<String> = [affixes.first_name, affixes.second_name]
                    .into_iter()
                    .filter_map(|id| lookup(&data.rare_names, id))
                    .collect();
                if parts.is_empty() {
                    base
                } else {
                    parts.join(" ")
                }
            }
            Quality::Magic { prefix, suffix } => {
                let prefix = (prefix != 0)
                    .then(|| lookup(&data.magic_prefixes, prefix))
                    .flatten();
                let suffix = (suffix != 0)
                    .then(|| lookup(&data.magic_suffixes, suffix))
                    .flatten();
                [prefix, Some(base), suffix]
                    .into_iter()
                    .flatten()
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            Quality::Superior { .. } => format!("Superior {base}"),
            Quality::Low { .. } | Quality::Normal | Quality::Tempered => base,
        }
    }

    /// Armor defense: the stored rating when present, otherwise the table
    /// value, scaled for ethereal items.
    pub fn defense(&self, data: &GameData) -> Option<i64> {
        let def = self.type_def(data)?;
        if def.category != ItemCategory::Armor {
            return None;
        }
        if let Some(rating) = self.defense_rating.filter(|&r| r > 0) {
            return Some(rating);
        }
        let base = i64::from(def.defense);
        if base == 0 {
            return None;
        }
        Some(self.ethereal_scaled(base))
    }

    pub fn base_damage(&self, data: &GameData) -> Option<BaseDamage> {
        let def = self.type_def(data)?;
        if def.category != ItemCategory::Weapon {
            return None;
        }
        let scale = |v: u32| (v > 0).then(|| self.ethereal_scaled(i64::from(v)));
        Some(BaseDamage {
            min: scale(def.min_damage),
            max: scale(def.max_damage),
            two_hand_min: scale(def.two_hand_min_damage),
            two_hand_max: scale(def.two_hand_max_damage),
        })
    }

    fn ethereal_scaled(&self, value: i64) -> i64 {
        if self.ethereal {
            (value * ETHEREAL_NUMERATOR).div_euclid(ETHEREAL_DENOMINATOR)
        } else {
            value
        }
    }
}

/// Items decoded from one `"JM"` list.
#[derive(Debug, Clone, Default)]
pub struct ItemList {
    pub items: Vec<Item>,
    /// First byte after the last item read.
    pub end: usize,
    /// Why the list stopped before its declared count, if it did.
    pub error: Option<DecodeError>,
}

/// Read a `"JM"` + count header at `offset` and that many top-level items.
///
/// A missing header is an error; a bad item stops the list and keeps the
/// items before it.
pub fn read_item_list(
    bytes: &[u8],
    offset: usize,
    data: &GameData,
) -> Result<ItemList, DecodeError> {
    let header = ByteReader::new(bytes);
    if !header.has_marker(offset, ITEM_LIST_MARKER) {
        return Err(DecodeError::MalformedSection {
            section: "items",
            marker: "JM",
            offset,
        });
    }
    let count = header.read_u16(offset + ITEM_LIST_MARKER.len())?;

    let mut r = BitReader::at_byte(bytes, offset + ITEM_LIST_MARKER.len() + 2);
    let mut list = ItemList::default();
    for index in 0..count {
        match read_item(&mut r, data, 0) {
            Ok(item) => list.items.push(item),
            Err(e) => {
                warn!(index, count, error = %e, "item list stopped early");
                list.error = Some(e);
                break;
            }
        }
    }
    list.end = r.byte_position();
    debug!(offset, count, read = list.items.len(), end = list.end, "decoded item list");
    Ok(list)
}

/// Read one item record, and its socket fillers, from a byte-aligned cursor.
pub fn read_item(r: &mut BitReader<'_>, data: &GameData, depth: u8) -> Result<Item, DecodeError> {
    let start = r.byte_position();
    if r.read_bits(16)? != ITEM_MARKER_BITS {
        return Err(DecodeError::MalformedSection {
            section: "item",
            marker: "JM",
            offset: start,
        });
    }

    let mut item = Item::default();
    r.skip(4)?;
    item.identified = r.read_bit()?;
    r.skip(6)?;
    item.socketed = r.read_bit()?;
    r.skip(1)?;
    item.new = r.read_bit()?;
    r.skip(2)?;
    item.is_ear = r.read_bit()?;
    item.starter = r.read_bit()?;
    r.skip(3)?;
    item.simple = r.read_bit()?;
    item.ethereal = r.read_bit()?;
    r.skip(1)?;
    item.personalized = r.read_bit()?;
    r.skip(1)?;
    item.runeword = r.read_bit()?;
    r.skip(5)?;
    item.version = r.read_bits(10)? as u16;
    item.location = r.read_bits(3)? as u8;
    item.equipped_slot = r.read_bits(4)? as u8;
    item.x = r.read_bits(4)? as u8;
    item.y = r.read_bits(4)? as u8;
    item.panel = r.read_bits(3)? as u8;

    if item.is_ear {
        let class = CharacterClass::from_raw(r.read_bits(3)? as u8);
        let level = r.read_bits(7)? as u8;
        let name = r.read_terminated_string(NAME_CHAR_BITS, EAR_NAME_CHARS)?;
        item.ear = Some(EarData { class, level, name });
        r.align();
        return Ok(item);
    }

    let mut code = String::with_capacity(4);
    for _ in 0..4 {
        code.push(char::from(r.read_bits(8)? as u8));
    }
    item.code = code.trim_matches(|c: char| c == ' ' || c == '\0').to_string();
    item.filled_sockets = r.read_bits(if item.simple { 1 } else { 3 })? as u8;

    if !item.simple {
        read_extended(r, data, &mut item)?;
    }
    r.align();

    if item.simple || item.filled_sockets == 0 {
        return Ok(item);
    }
    if depth > 0 {
        return Err(DecodeError::MalformedSection {
            section: "socketed item",
            marker: "JM",
            offset: r.byte_position(),
        });
    }

    for _ in 0..item.filled_sockets {
        let child = read_item(r, data, depth + 1)?;
        if child.category(data) != ItemCategory::Other {
            warn!(
                parent = %item.code,
                child = %child.code,
                "socket filler is not a gem, rune or jewel, dropped"
            );
            continue;
        }
        item.socketed_items.push(child);
    }
    Ok(item)
}

fn read_extended(r: &mut BitReader<'_>, data: &GameData, item: &mut Item) -> Result<(), DecodeError> {
    let Some(def) = data.item_type(&item.code) else {
        return Err(DecodeError::unknown_id("item type", &item.code));
    };

    item.id = Some(r.read_bits(32)?);
    item.level = r.read_bits(7)? as u8;
    let quality = r.read_bits(4)? as u8;
    if r.read_bit()? {
        item.picture = Some(r.read_bits(3)? as u8);
    }
    if r.read_bit()? {
        item.class_specific = Some(r.read_bits(11)? as u16);
    }
    item.quality = read_quality(r, quality)?;

    if item.runeword {
        item.runeword_id = Some(r.read_bits(12)? as u16);
        r.skip(4)?;
    }
    if item.personalized {
        item.personalized_name =
            Some(r.read_terminated_string(NAME_CHAR_BITS, PERSONALIZED_NAME_CHARS)?);
    }
    if TOME_CODES.contains(&item.code.as_str()) {
        r.skip(5)?;
    }
    // timestamp
    r.skip(1)?;

    if def.category == ItemCategory::Armor {
        let (bits, add) = stat_layout(data, STAT_ARMOR_DEFENSE, DEFAULT_DEFENSE_BITS);
        item.defense_rating = Some(i64::from(r.read_bits(bits)?) - add);
    }
    if matches!(def.category, ItemCategory::Armor | ItemCategory::Weapon) {
        let (bits, add) = stat_layout(data, STAT_MAX_DURABILITY, DEFAULT_MAX_DURABILITY_BITS);
        let max = i64::from(r.read_bits(bits)?) - add;
        item.max_durability = Some(max);
        if max != 0 {
            let (bits, add) = stat_layout(data, STAT_DURABILITY, DEFAULT_DURABILITY_BITS);
            item.durability = Some(i64::from(r.read_bits(bits)?) - add);
        }
    }
    if def.stackable {
        item.quantity = Some(r.read_bits(QUANTITY_BITS)? as u16);
    }
    if item.socketed {
        item.total_sockets = r.read_bits(4)? as u8;
    }
    if matches!(item.quality, Quality::Set { .. }) {
        item.set_list_mask = r.read_bits(SET_LIST_COUNT)? as u8;
    }

    item.magic_attributes = read_attribute_list(r, data)?;
    for bit in 0..SET_LIST_COUNT {
        if item.set_list_mask & (1 << bit) != 0 {
            item.set_attributes.push(read_attribute_list(r, data)?);
        }
    }
    if item.runeword {
        item.runeword_attributes = read_attribute_list(r, data)?;
    }
    Ok(())
}

fn read_quality(r: &mut BitReader<'_>, raw: u8) -> Result<Quality, DecodeError> {
    Ok(match raw {
        1 => Quality::Low {
            kind: r.read_bits(3)? as u8,
        },
        2 => Quality::Normal,
        3 => Quality::Superior {
            kind: r.read_bits(3)? as u8,
        },
        4 => Quality::Magic {
            prefix: r.read_bits(11)? as u16,
            suffix: r.read_bits(11)? as u16,
        },
        5 => Quality::Set {
            set_id: r.read_bits(12)? as u16,
        },
        6 => Quality::Rare(read_rare_affixes(r)?),
        7 => Quality::Unique {
            unique_id: r.read_bits(12)? as u16,
        },
        8 => Quality::Crafted(read_rare_affixes(r)?),
        9 => Quality::Tempered,
        other => return Err(DecodeError::unknown_id("item quality", other)),
    })
}

fn read_rare_affixes(r: &mut BitReader<'_>) -> Result<RareAffixes, DecodeError> {
    let mut affixes = RareAffixes {
        first_name: r.read_bits(8)? as u16,
        second_name: r.read_bits(8)? as u16,
        affixes: [None; RARE_AFFIX_COUNT],
    };
    for slot in affixes.affixes.iter_mut() {
        if r.read_bit()? {
            *slot = Some(r.read_bits(11)? as u16);
        }
    }
    Ok(affixes)
}

fn stat_layout(data: &GameData, id: u16, default: (u8, i32)) -> (u32, i64) {
    let (bits, add) = data
        .stat(id)
        .filter(|stat| stat.save_bits > 0)
        .map(|stat| (stat.save_bits, stat.save_add))
        .unwrap_or(default);
    (u32::from(bits), i64::from(add))
}

/// Read `(9-bit id, fields)` entries until the end-of-list id.
///
/// Every id must have a table entry: without its widths the rest of the
/// stream cannot be located.
pub fn read_attribute_list(
    r: &mut BitReader<'_>,
    data: &GameData,
) -> Result<Vec<MagicAttribute>, DecodeError> {
    let mut attributes = Vec::new();
    while attributes.len() < MAX_ITEM_ATTRIBUTES {
        let id = r.read_bits(STAT_ID_BITS)? as u16;
        if id == STAT_LIST_END {
            return Ok(attributes);
        }
        let Some(stat) = data.stat(id) else {
            return Err(DecodeError::unknown_id("stat", id));
        };

        let mut values = Vec::new();
        for member in id..id + stat.grouped_len() {
            let Some(member_stat) = data.stat(member) else {
                return Err(DecodeError::unknown_id("stat", member));
            };

            if member_stat.save_param_bits > 0 {
                let mut param = i64::from(r.read_bits(u32::from(member_stat.save_param_bits))?);
                if member_stat.descriptor.mode == Some(DescriptorMode::SkillTab) {
                    values.push(param & 0x7);
                    param = (param >> 3) & 0x1fff;
                } else if matches!(member_stat.encoding, 2 | 3) {
                    values.push(param & 0x3f);
                    param = (param >> 6) & 0x3ff;
                }
                values.push(param);
            }

            if member_stat.save_bits == 0 {
                return Err(DecodeError::unknown_id("stat width", member));
            }
            let value = i64::from(r.read_bits(u32::from(member_stat.save_bits))?)
                - i64::from(member_stat.save_add);
            if member_stat.encoding == 3 {
                values.push(value & 0xff);
                values.push((value >> 8) & 0xff);
            } else {
                values.push(value);
            }
        }
        attributes.push(MagicAttribute { id, values });
    }

    Err(DecodeError::MalformedSection {
        section: "item attributes",
        marker: "end of list",
        offset: r.byte_position(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equip_slot_numbering_starts_at_one() {
        assert_eq!(EquipSlot::from_raw(0), None);
        assert_eq!(EquipSlot::from_raw(1), Some(EquipSlot::Head));
        assert_eq!(EquipSlot::from_raw(12), Some(EquipSlot::LeftArmSwitch));
        assert_eq!(EquipSlot::from_raw(13), None);
        assert_eq!(EquipSlot::RightArm.as_str(), "rArm");
    }

    #[test]
    fn quality_names_follow_ids() {
        assert_eq!(Quality::Normal.name(), "normal");
        assert_eq!(Quality::Unique { unique_id: 3 }.name(), "unique");
        assert_eq!(Quality::Tempered.name(), "tempered");
    }

    #[test]
    fn unknown_quality_is_rejected() {
        let data = [0u8; 4];
        let mut r = BitReader::new(&data);
        assert!(matches!(
            read_quality(&mut r, 0),
            Err(DecodeError::UnknownId { kind: "item quality", .. })
        ));
    }

    #[test]
    fn stat_total_sums_every_source() {
        let item = Item {
            magic_attributes: vec![MagicAttribute::new(0, vec![5])],
            runeword_attributes: vec![MagicAttribute::new(0, vec![2])],
            socketed_items: vec![Item {
                magic_attributes: vec![MagicAttribute::new(0, vec![1])],
                ..Item::default()
            }],
            set_attributes: vec![vec![MagicAttribute::new(0, vec![3])]],
            ..Item::default()
        };
        assert_eq!(item.stat_total(0), 11);
        assert_eq!(item.stat_total(2), 0);
    }
}
