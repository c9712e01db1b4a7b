#![allow(dead_code)]

use d2s_core::d2s::attributes::{AttributeSet, encode_attributes};
use d2s_core::properties::DescriptorMode;
use d2s_core::reader::BitWriter;
use d2s_core::tables::GameData;
use serde_json::json;

pub const CLASS_SORCERESS: u8 = 1;
pub const STATUS_EXPANSION: u8 = 0x20;

/// Balance tables covering every item code and stat id the fixtures use.
pub fn test_data() -> GameData {
    let value = json!({
        "item_types": {
            "cap": { "name": "Cap", "category": "armor", "width": 2, "height": 2, "defense": 100, "req_level": 1 },
            "lbl": { "name": "Light Belt", "category": "armor", "width": 2, "height": 1, "defense": 8 },
            "hax": { "name": "Hand Axe", "category": "weapon", "width": 1, "height": 3, "min_damage": 3, "max_damage": 6 },
            "2hs": { "name": "Two-Handed Sword", "category": "weapon", "min_damage": 2, "max_damage": 9, "two_hand_min_damage": 8, "two_hand_max_damage": 17 },
            "cm1": { "name": "Small Charm", "category": "other", "width": 1, "height": 1, "charm": true },
            "rin": { "name": "Ring", "category": "other" },
            "gcr": { "name": "Chipped Ruby", "category": "other" },
            "tbk": { "name": "Tome of Town Portal", "category": "other", "stackable": true },
            "r01": { "name": "El Rune", "category": "other" }
        },
        "stats": {
            "0": { "name": "strength", "save_bits": 8, "save_add": 32,
                   "descriptor": { "mode": 1, "value_position": 1, "positive": "to Strength" } },
            "2": { "name": "dexterity", "save_bits": 7, "save_add": 32,
                   "descriptor": { "mode": 1, "value_position": 1, "positive": "to Dexterity" } },
            "3": { "name": "vitality", "save_bits": 7, "save_add": 32,
                   "descriptor": { "mode": 1, "value_position": 1, "positive": "to Vitality" } },
            "7": { "name": "maxhp", "save_bits": 9, "save_add": 32,
                   "descriptor": { "mode": 1, "value_position": 1, "positive": "to Life" } },
            "16": { "name": "item_armor_percent", "save_bits": 9,
                    "descriptor": { "mode": 4, "value_position": 1, "positive": "Enhanced Defense" } },
            "31": { "name": "armorclass", "save_bits": 11, "save_add": 10,
                    "descriptor": { "mode": 1, "value_position": 1, "positive": "Defense" } },
            "39": { "name": "fireresist", "save_bits": 8, "save_add": 50,
                    "descriptor": { "mode": 4, "value_position": 2, "positive": "Fire Resist" } },
            "43": { "name": "coldresist", "save_bits": 8, "save_add": 50,
                    "descriptor": { "mode": 4, "value_position": 2, "positive": "Cold Resist" } },
            "57": { "name": "poisonmindam", "save_bits": 10, "group_count": 3,
                    "descriptor": { "range": "Adds %d-%d poison damage over %d seconds" } },
            "58": { "name": "poisonmaxdam", "save_bits": 10 },
            "59": { "name": "poisonlength", "save_bits": 9 },
            "75": { "name": "item_maxdurability_percent", "save_bits": 7, "save_add": 20,
                    "descriptor": { "mode": 2, "value_position": 2, "positive": "Increase Maximum Durability" } },
            "83": { "name": "item_addclassskills", "save_bits": 3, "save_param_bits": 3,
                    "descriptor": { "mode": 13 } },
            "93": { "name": "item_fasterattackrate", "save_bits": 7, "save_add": 20,
                    "descriptor": { "mode": 4, "value_position": 1, "positive": "Increased Attack Speed" } },
            "107": { "name": "item_singleskill", "save_bits": 3, "save_param_bits": 9,
                     "descriptor": { "mode": 28 } },
            "188": { "name": "item_addskill_tab", "save_bits": 3, "save_param_bits": 16,
                     "descriptor": { "mode": 14 } },
            "198": { "name": "item_skillonhit", "save_bits": 7, "save_param_bits": 16, "encoding": 2,
                     "descriptor": { "mode": 15, "positive": "%d%% Chance to cast level %d %s on striking" } },
            "204": { "name": "item_charged_skill", "save_bits": 16, "save_param_bits": 16, "encoding": 3,
                     "descriptor": { "mode": 24, "positive": "(%d/%d Charges)" } },
            "329": { "name": "item_elemskill_fire", "save_bits": 4 },
            "360": { "name": "corrupted", "save_bits": 2 }
        },
        "skills": {
            "36": { "name": "Fire Bolt", "class_code": "sor" },
            "44": { "name": "Frost Nova", "class_code": "sor" },
            "54": { "name": "Teleport", "class_code": "sor" }
        },
        "classes": {
            "1": {
                "name": "Sorceress",
                "code": "sor",
                "all_skills": "to Sorceress Skill Levels",
                "class_only": "(Sorceress Only)",
                "skill_tabs": ["+%d to Fire Skills", "+%d to Lightning Skills", "+%d to Cold Skills"]
            }
        },
        "uniques": { "5": "Biggin's Bonnet" },
        "set_items": { "2": "Sigon's Visor" },
        "runewords": { "27": "Steel" },
        "rare_names": { "1": "Beast", "2": "Crown" },
        "magic_prefixes": { "3": "Sturdy" },
        "magic_suffixes": { "4": "of Health" },
        "class_constants": {
            "Sorceress": {
                "to_hit_factor": -15.0,
                "life_per_level": 1.0,
                "mana_per_level": 2.0,
                "stamina_per_level": 1.0,
                "life_per_vitality": 2.0,
                "mana_per_energy": 2.0,
                "stamina_per_vitality": 1.0,
                "base_strength": 10,
                "base_dexterity": 25,
                "base_vitality": 10,
                "base_energy": 35
            }
        },
        "difficulty_penalties": {
            "Normal": { "resist_penalty": 0 },
            "Nightmare": { "resist_penalty": -40 },
            "Hell": { "resist_penalty": -100 }
        },
        "experience": { "thresholds": [0, 500, 1500, 3750], "max_level": 99 }
    });
    serde_json::from_value::<GameData>(value)
        .expect("fixture tables deserialize")
        .with_builtin_overrides()
}

/// One item record as the encoder should lay it out.
#[derive(Debug, Clone, Default)]
pub struct ItemSpec {
    pub code: String,
    pub simple: bool,
    pub identified: bool,
    pub ethereal: bool,
    pub socketed: bool,
    pub runeword: bool,
    pub location: u8,
    pub slot: u8,
    pub x: u8,
    pub y: u8,
    pub panel: u8,
    pub level: u8,
    pub quality: u8,
    /// Raw `(value, width)` fields following the quality id.
    pub quality_fields: Vec<(u32, u32)>,
    pub runeword_id: u16,
    pub defense: Option<i64>,
    pub max_durability: Option<u32>,
    pub durability: u32,
    pub quantity: Option<u32>,
    pub total_sockets: u8,
    pub set_mask: u8,
    pub attributes: Vec<(u16, Vec<i64>)>,
    pub set_attributes: Vec<Vec<(u16, Vec<i64>)>>,
    pub runeword_attributes: Vec<(u16, Vec<i64>)>,
    pub children: Vec<ItemSpec>,
}

impl ItemSpec {
    pub fn simple(code: &str) -> Self {
        Self {
            code: code.to_string(),
            simple: true,
            identified: true,
            quality: 2,
            ..Self::default()
        }
    }

    pub fn extended(code: &str) -> Self {
        Self {
            code: code.to_string(),
            identified: true,
            level: 10,
            quality: 2,
            ..Self::default()
        }
    }

    pub fn equipped(mut self, slot: u8) -> Self {
        self.location = 1;
        self.slot = slot;
        self
    }

    pub fn in_inventory(mut self, x: u8, y: u8) -> Self {
        self.location = 0;
        self.panel = 1;
        self.x = x;
        self.y = y;
        self
    }

    pub fn armor(mut self, defense: i64) -> Self {
        self.defense = Some(defense);
        self.max_durability = Some(12);
        self.durability = 10;
        self
    }

    pub fn weapon(mut self) -> Self {
        self.max_durability = Some(30);
        self.durability = 25;
        self
    }

    pub fn with_attr(mut self, id: u16, values: &[i64]) -> Self {
        self.attributes.push((id, values.to_vec()));
        self
    }

    pub fn ethereal(mut self) -> Self {
        self.ethereal = true;
        self
    }

    pub fn quality(mut self, quality: u8, fields: &[(u32, u32)]) -> Self {
        self.quality = quality;
        self.quality_fields = fields.to_vec();
        self
    }

    pub fn with_sockets(mut self, total: u8, children: Vec<ItemSpec>) -> Self {
        self.socketed = true;
        self.total_sockets = total;
        self.children = children;
        self
    }
}

/// Mirror of the decoder's attribute list layout.
pub fn write_attribute_list(w: &mut BitWriter, data: &GameData, list: &[(u16, Vec<i64>)]) {
    for (id, values) in list {
        w.write_bits(u32::from(*id), 9);
        let stat = data.stat(*id).expect("fixture stat");
        let mut i = 0;
        for member in *id..*id + stat.grouped_len() {
            let s = data.stat(member).expect("fixture stat member");
            if s.save_param_bits > 0 {
                let param = if s.descriptor.mode == Some(DescriptorMode::SkillTab) {
                    i += 2;
                    values[i - 2] | (values[i - 1] << 3)
                } else if matches!(s.encoding, 2 | 3) {
                    i += 2;
                    values[i - 2] | (values[i - 1] << 6)
                } else {
                    i += 1;
                    values[i - 1]
                };
                w.write_bits(param as u32, u32::from(s.save_param_bits));
            }
            let value = if s.encoding == 3 {
                i += 2;
                values[i - 2] | (values[i - 1] << 8)
            } else {
                i += 1;
                values[i - 1]
            };
            w.write_bits((value + i64::from(s.save_add)) as u32, u32::from(s.save_bits));
        }
    }
    w.write_bits(0x1FF, 9);
}

pub fn write_item(w: &mut BitWriter, data: &GameData, item: &ItemSpec) {
    w.write_bits(0x4D4A, 16);
    w.write_bits(0, 4);
    w.write_bits(u32::from(item.identified), 1);
    w.write_bits(0, 6);
    w.write_bits(u32::from(item.socketed), 1);
    w.write_bits(0, 1);
    w.write_bits(0, 1); // new
    w.write_bits(0, 2);
    w.write_bits(0, 1); // ear
    w.write_bits(0, 1); // starter
    w.write_bits(0, 3);
    w.write_bits(u32::from(item.simple), 1);
    w.write_bits(u32::from(item.ethereal), 1);
    w.write_bits(0, 1);
    w.write_bits(0, 1); // personalized
    w.write_bits(0, 1);
    w.write_bits(u32::from(item.runeword), 1);
    w.write_bits(0, 5);
    w.write_bits(101, 10);
    w.write_bits(u32::from(item.location), 3);
    w.write_bits(u32::from(item.slot), 4);
    w.write_bits(u32::from(item.x), 4);
    w.write_bits(u32::from(item.y), 4);
    w.write_bits(u32::from(item.panel), 3);

    let mut code = item.code.clone().into_bytes();
    code.resize(4, b' ');
    w.write_bytes(&code);
    let filled = item.children.len() as u32;
    w.write_bits(filled, if item.simple { 1 } else { 3 });

    if !item.simple {
        w.write_bits(0x1234_5678, 32);
        w.write_bits(u32::from(item.level), 7);
        w.write_bits(u32::from(item.quality), 4);
        w.write_bits(0, 1); // picture
        w.write_bits(0, 1); // class specific
        for &(value, width) in &item.quality_fields {
            w.write_bits(value, width);
        }
        if item.runeword {
            w.write_bits(u32::from(item.runeword_id), 12);
            w.write_bits(5, 4);
        }
        if item.code == "tbk" {
            w.write_bits(0, 5);
        }
        w.write_bits(0, 1); // timestamp
        if let Some(defense) = item.defense {
            w.write_bits((defense + 10) as u32, 11);
        }
        if let Some(max) = item.max_durability {
            w.write_bits(max, 8);
            if max != 0 {
                w.write_bits(item.durability, 9);
            }
        }
        if let Some(quantity) = item.quantity {
            w.write_bits(quantity, 9);
        }
        if item.socketed {
            w.write_bits(u32::from(item.total_sockets), 4);
        }
        if item.quality == 5 {
            w.write_bits(u32::from(item.set_mask), 5);
        }
        write_attribute_list(w, data, &item.attributes);
        for list in &item.set_attributes {
            write_attribute_list(w, data, list);
        }
        if item.runeword {
            write_attribute_list(w, data, &item.runeword_attributes);
        }
    }
    w.align();

    if !item.simple {
        for child in &item.children {
            write_item(w, data, child);
        }
    }
}

pub fn item_list_bytes(data: &GameData, items: &[ItemSpec]) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.write_bytes(b"JM");
    w.write_bits(items.len() as u32, 16);
    for item in items {
        write_item(&mut w, data, item);
    }
    w.into_bytes()
}

/// A whole save file.
#[derive(Debug, Clone)]
pub struct SaveSpec {
    pub version: u32,
    pub name: String,
    pub status: u8,
    pub class: u8,
    pub level: u8,
    pub last_played: u32,
    pub difficulty: [u8; 3],
    pub mercenary_id: u32,
    pub attributes: AttributeSet,
    /// `None` leaves the skill marker out.
    pub skills: Option<Vec<u8>>,
    pub items: Vec<ItemSpec>,
    pub mercenary_items: Vec<ItemSpec>,
    pub golem: Option<ItemSpec>,
}

impl Default for SaveSpec {
    fn default() -> Self {
        Self {
            version: 96,
            name: "Tester".to_string(),
            status: STATUS_EXPANSION,
            class: CLASS_SORCERESS,
            level: 10,
            last_played: 1_700_000_000,
            difficulty: [0x80, 0, 0],
            mercenary_id: 0,
            attributes: [(0, 20), (1, 35), (2, 25), (3, 10), (7, 60), (9, 80), (11, 80), (12, 10)]
                .into_iter()
                .collect(),
            skills: Some(vec![0; 33]),
            items: Vec::new(),
            mercenary_items: Vec::new(),
            golem: None,
        }
    }
}

pub fn build_save(data: &GameData, spec: &SaveSpec) -> Vec<u8> {
    let mut out = vec![0u8; 765];
    out[0..4].copy_from_slice(&0xAA55_AA55u32.to_le_bytes());
    out[4..8].copy_from_slice(&spec.version.to_le_bytes());
    let name = spec.name.as_bytes();
    out[20..20 + name.len()].copy_from_slice(name);
    out[36] = spec.status;
    out[40] = spec.class;
    out[43] = spec.level;
    out[48..52].copy_from_slice(&spec.last_played.to_le_bytes());
    out[168..171].copy_from_slice(&spec.difficulty);
    out[179..183].copy_from_slice(&spec.mercenary_id.to_le_bytes());

    out.extend_from_slice(b"gf");
    out.extend(encode_attributes(&spec.attributes));
    if let Some(skills) = &spec.skills {
        out.extend_from_slice(b"if");
        out.extend_from_slice(skills);
    }
    out.extend(item_list_bytes(data, &spec.items));
    out.extend_from_slice(b"JM\0\0");

    if spec.status & STATUS_EXPANSION != 0 {
        out.extend_from_slice(b"jf");
        if spec.mercenary_id != 0 {
            out.extend(item_list_bytes(data, &spec.mercenary_items));
        }
        out.extend_from_slice(b"kf");
        match &spec.golem {
            Some(golem) => {
                out.push(1);
                let mut w = BitWriter::new();
                write_item(&mut w, data, golem);
                out.extend(w.into_bytes());
            }
            None => out.push(0),
        }
    }

    let len = out.len() as u32;
    out[8..12].copy_from_slice(&len.to_le_bytes());
    out
}
