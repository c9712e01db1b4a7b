pub mod attributes;
pub mod fallback;
pub mod header;
pub mod items;
pub mod skills;
pub mod types;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::DecodeError;
use crate::layout::{ByteRange, FileLayout, SectionId, SectionLayout};
use crate::reader::{BitReader, ByteReader};
use crate::tables::GameData;
use attributes::{AttributeSet, decode_attributes};
use header::Header;
use items::{Item, read_item, read_item_list};
use skills::{Ruleset, Skill, decode_skills};
use types::{
    ATTRIBUTES_MARKER, CORPSE_HEADER_LEN, GOLEM_MARKER, ITEM_LIST_MARKER, MERCENARY_MARKER,
    OFFSET_ATTRIBUTES, SUPPORTED_VERSION,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub ruleset: Ruleset,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Corpse {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveGame {
    pub header: Header,
    pub attributes: AttributeSet,
    pub skills: Vec<Skill>,
    pub items: Vec<Item>,
    pub corpses: Vec<Corpse>,
    pub mercenary_items: Vec<Item>,
    pub golem: Option<Item>,
    /// Degradations met while decoding; empty for a clean save.
    pub notices: Vec<String>,
}

#[derive(Debug)]
pub struct Document {
    pub save: SaveGame,
    layout: FileLayout,
}

struct Capture {
    sections: Vec<SectionLayout>,
}

impl Capture {
    fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    fn record(&mut self, id: SectionId, start: usize, end: usize) {
        self.sections.push(SectionLayout {
            id,
            range: ByteRange { start, end },
        });
    }
}

impl SaveGame {
    pub fn parse(
        bytes: &[u8],
        data: &GameData,
        options: DecodeOptions,
    ) -> Result<Self, DecodeError> {
        parse_internal(bytes, data, options, None).map(|(save, _)| save)
    }
}

impl Document {
    pub fn parse_with_layout(
        bytes: &[u8],
        data: &GameData,
        options: DecodeOptions,
    ) -> Result<Self, DecodeError> {
        let mut capture = Capture::new();
        let (save, consumed) = parse_internal(bytes, data, options, Some(&mut capture))?;

        let file_len = bytes.len();
        if consumed < file_len {
            capture.record(SectionId::Tail, consumed, file_len);
        }

        let layout = FileLayout {
            file_len,
            sections: capture.sections,
        };
        layout.validate()?;

        Ok(Self { save, layout })
    }

    pub fn layout(&self) -> &FileLayout {
        &self.layout
    }
}

/// Full decode. Returns the save and the number of bytes accounted for.
fn parse_internal(
    bytes: &[u8],
    data: &GameData,
    options: DecodeOptions,
    mut capture: Option<&mut Capture>,
) -> Result<(SaveGame, usize), DecodeError> {
    let header = Header::parse(bytes)?;
    if header.version != SUPPORTED_VERSION {
        return Err(DecodeError::UnsupportedVersion(header.version));
    }
    if let Some(c) = capture.as_deref_mut() {
        c.record(SectionId::Header, 0, OFFSET_ATTRIBUTES);
    }

    // Attributes: "gf" + bit stream
    let r = ByteReader::new(bytes);
    if !r.has_marker(OFFSET_ATTRIBUTES, ATTRIBUTES_MARKER) {
        return Err(DecodeError::MalformedSection {
            section: "attributes",
            marker: "gf",
            offset: OFFSET_ATTRIBUTES,
        });
    }
    let mut notices = Vec::new();
    let stream = decode_attributes(bytes, OFFSET_ATTRIBUTES + ATTRIBUTES_MARKER.len());
    if let Some(e) = &stream.stop {
        notices.push(format!("attributes decoded partially: {e}"));
    }
    let attributes_end = stream.end_byte();
    if let Some(c) = capture.as_deref_mut() {
        c.record(SectionId::Attributes, OFFSET_ATTRIBUTES, attributes_end);
    }

    // Skills: "if" + one byte per slot
    let table = decode_skills(
        bytes,
        attributes_end,
        header.class,
        header.level,
        options.ruleset,
        |_, id| {
            data.skill_name(id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Skill {id}"))
        },
    )?;
    if let Some(c) = capture.as_deref_mut() {
        c.record(SectionId::Skills, attributes_end, table.end);
    }
    if table.truncated {
        notices.push("skill section truncated".to_string());
    }

    let mut save = SaveGame {
        header,
        attributes: stream.attributes,
        skills: table.skills,
        items: Vec::new(),
        corpses: Vec::new(),
        mercenary_items: Vec::new(),
        golem: None,
        notices,
    };

    let mut pos = table.end;
    if let Err(e) = read_item_sections(bytes, data, &mut save, capture, &mut pos) {
        warn!(offset = pos, error = %e, "item data could not be fully decoded");
        save.notices
            .push(format!("item data after byte {pos} could not be decoded: {e}"));
    }
    debug!(
        items = save.items.len(),
        corpses = save.corpses.len(),
        mercenary = save.mercenary_items.len(),
        golem = save.golem.is_some(),
        consumed = pos,
        "decoded save"
    );

    Ok((save, pos))
}

/// Player, corpse, mercenary and golem item sections. `pos` is left at the
/// end of the last section read in full, so a failure still reports how far
/// the decode got.
fn read_item_sections(
    bytes: &[u8],
    data: &GameData,
    save: &mut SaveGame,
    mut capture: Option<&mut Capture>,
    pos: &mut usize,
) -> Result<(), DecodeError> {
    let r = ByteReader::new(bytes);

    let player = read_item_list(bytes, *pos, data)?;
    if let Some(c) = capture.as_deref_mut() {
        c.record(SectionId::Items, *pos, player.end);
    }
    save.items = player.items;
    *pos = player.end;
    if let Some(e) = player.error {
        return Err(e);
    }

    // Corpses: "JM" + count, then per corpse an opaque header and an item list
    let corpse_start = *pos;
    if !r.has_marker(corpse_start, ITEM_LIST_MARKER) {
        return Err(DecodeError::MalformedSection {
            section: "corpse",
            marker: "JM",
            offset: corpse_start,
        });
    }
    let corpse_count = r.read_u16(corpse_start + ITEM_LIST_MARKER.len())?;
    let mut cursor = corpse_start + ITEM_LIST_MARKER.len() + 2;
    for _ in 0..corpse_count {
        cursor += CORPSE_HEADER_LEN;
        let list = read_item_list(bytes, cursor, data)?;
        cursor = list.end;
        save.corpses.push(Corpse { items: list.items });
        if let Some(e) = list.error {
            if let Some(c) = capture.as_deref_mut() {
                c.record(SectionId::Corpse, corpse_start, cursor);
            }
            *pos = cursor;
            return Err(e);
        }
    }
    if let Some(c) = capture.as_deref_mut() {
        c.record(SectionId::Corpse, corpse_start, cursor);
    }
    *pos = cursor;

    if !save.header.status.expansion {
        return Ok(());
    }

    // Mercenary: "jf", then a list only when a mercenary was ever hired
    let merc_start = *pos;
    if !r.has_marker(merc_start, MERCENARY_MARKER) {
        return Err(DecodeError::MalformedSection {
            section: "mercenary",
            marker: "jf",
            offset: merc_start,
        });
    }
    let mut merc_end = merc_start + MERCENARY_MARKER.len();
    if save.header.mercenary_id.is_some() {
        let list = read_item_list(bytes, merc_end, data)?;
        merc_end = list.end;
        save.mercenary_items = list.items;
        if let Some(e) = list.error {
            if let Some(c) = capture.as_deref_mut() {
                c.record(SectionId::Mercenary, merc_start, merc_end);
            }
            *pos = merc_end;
            return Err(e);
        }
    }
    if let Some(c) = capture.as_deref_mut() {
        c.record(SectionId::Mercenary, merc_start, merc_end);
    }
    *pos = merc_end;

    // Golem: "kf" + flag byte + optional item
    let golem_start = *pos;
    if !r.has_marker(golem_start, GOLEM_MARKER) {
        return Err(DecodeError::MalformedSection {
            section: "golem",
            marker: "kf",
            offset: golem_start,
        });
    }
    let flag_at = golem_start + GOLEM_MARKER.len();
    let mut golem_end = flag_at + 1;
    if r.read_u8(flag_at)? == 1 {
        let mut bits = BitReader::at_byte(bytes, golem_end);
        save.golem = Some(read_item(&mut bits, data, 0)?);
        golem_end = bits.byte_position();
    }
    if let Some(c) = capture.as_deref_mut() {
        c.record(SectionId::Golem, golem_start, golem_end);
    }
    *pos = golem_end;

    Ok(())
}
