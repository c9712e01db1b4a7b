use serde::Serialize;

use crate::d2s::items::Item;
use crate::properties::{FormattedProperty, format_item_properties, format_set_properties};
use crate::tables::GameData;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocketEntry {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridPosition {
    pub x: u8,
    pub y: u8,
    pub w: u8,
    pub h: u8,
}

/// Display-ready item: resolved names, base numbers and property text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub name: String,
    /// Set only when it differs from `name`.
    pub base_name: Option<String>,
    pub code: String,
    pub quality: String,
    pub quality_id: u8,
    pub identified: bool,
    pub ethereal: bool,
    pub socketed: bool,
    pub total_sockets: u8,
    pub filled_sockets: u8,
    pub sockets: Vec<SocketEntry>,
    pub item_level: u8,
    pub req_level: u32,
    pub req_str: u32,
    pub req_dex: u32,
    pub defense: Option<i64>,
    pub min_damage: Option<i64>,
    pub max_damage: Option<i64>,
    pub two_hand_min_damage: Option<i64>,
    pub two_hand_max_damage: Option<i64>,
    pub durability: Option<(i64, i64)>,
    pub quantity: Option<u16>,
    pub properties: Vec<FormattedProperty>,
    pub set_properties: Vec<FormattedProperty>,
    pub is_runeword: bool,
    pub position: Option<GridPosition>,
}

impl ItemView {
    pub fn from_item(item: &Item, data: &GameData) -> Self {
        let def = item.type_def(data);
        let name = item.display_name(data);
        let base = item.base_name(data);
        let damage = item.base_damage(data).unwrap_or_default();

        let sockets = item
            .socketed_items
            .iter()
            .map(|child| SocketEntry {
                name: child.base_name(data),
                code: child.code.clone(),
            })
            .collect();

        Self {
            base_name: (base != name).then_some(base),
            name,
            code: item.code.clone(),
            quality: item.quality.name().to_string(),
            quality_id: item.quality.id(),
            identified: item.identified,
            ethereal: item.ethereal,
            socketed: item.socketed,
            total_sockets: item.total_sockets,
            filled_sockets: item.filled_sockets,
            sockets,
            item_level: item.level,
            req_level: def.map(|d| d.req_level).unwrap_or(0),
            req_str: def.map(|d| d.req_str).unwrap_or(0),
            req_dex: def.map(|d| d.req_dex).unwrap_or(0),
            defense: item.defense(data),
            min_damage: damage.min,
            max_damage: damage.max,
            two_hand_min_damage: damage.two_hand_min,
            two_hand_max_damage: damage.two_hand_max,
            durability: item.max_durability.filter(|&max| max > 0).map(|max| {
                (item.durability.unwrap_or(0), max)
            }),
            quantity: item.quantity,
            properties: format_item_properties(item, data),
            set_properties: format_set_properties(item, data),
            is_runeword: item.runeword,
            position: None,
        }
    }

    /// Attach grid placement; table size defaults to 1x1.
    pub fn with_position(mut self, item: &Item, data: &GameData) -> Self {
        let (w, h) = item
            .type_def(data)
            .map(|def| (def.width.max(1), def.height.max(1)))
            .unwrap_or((1, 1));
        self.position = Some(GridPosition {
            x: item.x,
            y: item.y,
            w,
            h,
        });
        self
    }
}
