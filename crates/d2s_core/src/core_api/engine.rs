use std::sync::Arc;

use tracing::{debug, warn};

use crate::d2s::attributes::AttributeSet;
use crate::d2s::fallback;
use crate::d2s::header::Header;
use crate::d2s::items::{EquipSlot, Item};
use crate::d2s::skills::Skill;
use crate::d2s::{DecodeOptions, Document, SaveGame};
use crate::derived::{DerivedInputs, ItemContribution, compute_derived_stats};
use crate::layout::FileLayout;
use crate::tables::{GameData, TableStore};

use super::error::CoreError;
use super::item_view::ItemView;
use super::types::{Character, EquippedItem, ParseMethod, SkillEntry};

const BASIC_NOTICE: &str =
    "basic decode: items, mercenary and derived stats are unavailable for this save";

#[derive(Debug, Clone, Default)]
pub struct Engine {
    tables: Option<Arc<TableStore>>,
    options: DecodeOptions,
}

#[derive(Debug)]
pub struct Session {
    character: Character,
    document: Option<Document>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(mut self, tables: Arc<TableStore>) -> Self {
        self.tables = Some(tables);
        self
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Decode a save. Only an invalid header is an error: without tables, or
    /// when the full decoder gives up, the marker scanner fills in what it can.
    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let bytes = bytes.as_ref();
        let header = Header::parse(bytes)?;

        let Some(store) = &self.tables else {
            debug!("no balance tables, using basic decode");
            return Ok(basic_session(
                bytes,
                &header,
                vec!["no balance tables loaded".to_string()],
            ));
        };

        let data = store.snapshot();
        match Document::parse_with_layout(bytes, &data, self.options) {
            Ok(document) => {
                let character = full_character(&document.save, &data);
                Ok(Session {
                    character,
                    document: Some(document),
                })
            }
            Err(e) => {
                warn!(error = %e, "full decode failed, falling back to marker scan");
                Ok(basic_session(
                    bytes,
                    &header,
                    vec![format!("full decode failed: {e}")],
                ))
            }
        }
    }
}

impl Session {
    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn into_character(self) -> Character {
        self.character
    }

    pub fn parse_method(&self) -> ParseMethod {
        self.character.parse_method
    }

    /// The decoded save, present after a full decode.
    pub fn save(&self) -> Option<&SaveGame> {
        self.document.as_ref().map(|doc| &doc.save)
    }

    pub fn layout(&self) -> Option<&FileLayout> {
        self.document.as_ref().map(Document::layout)
    }
}

fn basic_session(bytes: &[u8], header: &Header, mut notices: Vec<String>) -> Session {
    let scan = fallback::scan(bytes, header);
    notices.extend(scan.notices);
    notices.push(BASIC_NOTICE.to_string());

    let mut character = base_character(header, scan.attributes, &scan.skills, ParseMethod::Basic);
    character.notices = notices;
    Session {
        character,
        document: None,
    }
}

fn base_character(
    header: &Header,
    attributes: AttributeSet,
    skills: &[Skill],
    parse_method: ParseMethod,
) -> Character {
    let level = match attributes.level() {
        0 => i64::from(header.level),
        level => level,
    };
    Character {
        name: header.name.clone(),
        class: header.class.to_string(),
        class_id: header.class.raw(),
        level,
        hardcore: header.status.hardcore,
        expansion: header.status.expansion,
        dead: header.status.died,
        ladder: header.status.ladder,
        last_played: header.last_played,
        attributes,
        skills: skills
            .iter()
            .filter(|skill| skill.points > 0)
            .map(|skill| SkillEntry {
                id: skill.id,
                name: skill.name.clone(),
                points: skill.points,
            })
            .collect(),
        equipped: Vec::new(),
        inventory: Vec::new(),
        mercenary: Vec::new(),
        derived: None,
        parse_method,
        notices: Vec::new(),
    }
}

fn full_character(save: &SaveGame, data: &GameData) -> Character {
    let mut character = base_character(
        &save.header,
        save.attributes.clone(),
        &save.skills,
        ParseMethod::Full,
    );

    character.equipped = by_slot(save.items.iter().filter_map(|item| {
        item.equip_slot().map(|slot| (slot, item))
    }), data);
    character.mercenary = by_slot(save.mercenary_items.iter().filter_map(|item| {
        EquipSlot::from_raw(item.equipped_slot).map(|slot| (slot, item))
    }), data);
    character.inventory = save
        .items
        .iter()
        .filter(|item| item.in_inventory())
        .map(|item| ItemView::from_item(item, data).with_position(item, data))
        .collect();

    let inputs = DerivedInputs {
        attributes: &save.attributes,
        class: save.header.class,
        header_level: save.header.level,
        difficulty: save.header.difficulty(),
        items: ItemContribution::collect(&save.items, data),
    };
    character.derived = Some(compute_derived_stats(&inputs, data));
    character.notices = save.notices.clone();
    character
}

fn by_slot<'a>(
    items: impl Iterator<Item = (EquipSlot, &'a Item)>,
    data: &GameData,
) -> Vec<EquippedItem> {
    let mut out: Vec<(EquipSlot, EquippedItem)> = items
        .map(|(slot, item)| {
            (
                slot,
                EquippedItem {
                    slot: slot.as_str().to_string(),
                    item: ItemView::from_item(item, data),
                },
            )
        })
        .collect();
    out.sort_by_key(|(slot, _)| slot.raw());
    out.into_iter().map(|(_, entry)| entry).collect()
}
