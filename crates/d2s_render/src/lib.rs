use std::fmt::Write as _;

use d2s_core::core_api::{Character, EquippedItem, ItemView, Session};
use d2s_core::derived::DerivedStats;
use d2s_core::layout::FileLayout;
use serde_json::{Map as JsonMap, Value as JsonValue};

const SHEET_WIDTH: usize = 76;
const TWO_COL_WIDTH_LEFT: usize = 34;
const TWO_COL_WIDTH_RIGHT: usize = 40;
const SLOT_COL_WIDTH: usize = 12;
const PROPERTY_INDENT: usize = 2 + SLOT_COL_WIDTH + 2;
const LAYOUT_NAME_WIDTH: usize = 12;
const SECONDS_PER_DAY: u32 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    CharacterSheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// Also list set bonuses and item codes.
    pub verbose: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub name: bool,
    pub class: bool,
    pub level: bool,
    pub status: bool,
    pub last_played: bool,
    pub attributes: bool,
    pub derived: bool,
    pub skills: bool,
    pub equipped: bool,
    pub inventory: bool,
    pub mercenary: bool,
    pub notices: bool,
}

impl FieldSelection {
    pub fn is_any_selected(&self) -> bool {
        self.name
            || self.class
            || self.level
            || self.status
            || self.last_played
            || self.attributes
            || self.derived
            || self.skills
            || self.equipped
            || self.inventory
            || self.mercenary
            || self.notices
    }
}

pub fn render_json_full(session: &Session, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(default_json(session.character())),
    }
}

pub fn render_json_selected(
    session: &Session,
    fields: &FieldSelection,
    style: JsonStyle,
) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => {
            JsonValue::Object(selected_json(fields, session.character()))
        }
    }
}

pub fn render_text(session: &Session, style: TextStyle) -> String {
    render_text_with_options(session, style, TextRenderOptions::default())
}

pub fn render_text_with_options(
    session: &Session,
    style: TextStyle,
    options: TextRenderOptions,
) -> String {
    match style {
        TextStyle::CharacterSheet => render_sheet_impl(session.character(), options),
    }
}

/// `key=value` lines for the selected fields, in canonical order. List
/// fields repeat their key once per entry.
pub fn render_selected_pairs(
    session: &Session,
    fields: &FieldSelection,
) -> Vec<(&'static str, String)> {
    let character = session.character();
    let mut out = Vec::new();

    if fields.name {
        out.push(("name", character.name.clone()));
    }
    if fields.class {
        out.push(("class", character.class.clone()));
    }
    if fields.level {
        out.push(("level", character.level.to_string()));
    }
    if fields.status {
        out.push(("status", format_status(character)));
    }
    if fields.last_played {
        out.push((
            "last_played",
            character
                .last_played
                .map(format_unix_time)
                .unwrap_or_else(|| "never".to_string()),
        ));
    }
    if fields.attributes {
        for stat in character.stats() {
            out.push(("attribute", format!("{}={}", stat.name, stat.value)));
        }
    }
    if fields.derived {
        match &character.derived {
            Some(derived) => {
                for (name, value) in derived_pairs(derived) {
                    out.push(("derived", format!("{name}={value}")));
                }
            }
            None => out.push(("derived", "unavailable".to_string())),
        }
    }
    if fields.skills {
        for skill in &character.skills {
            out.push(("skill", format!("{}={}", skill.name, skill.points)));
        }
    }
    if fields.equipped {
        for entry in &character.equipped {
            out.push(("equipped", format!("{}={}", entry.slot, entry.item.name)));
        }
    }
    if fields.inventory {
        for item in &character.inventory {
            out.push(("inventory", item.name.clone()));
        }
    }
    if fields.mercenary {
        for entry in &character.mercenary {
            out.push(("mercenary", format!("{}={}", entry.slot, entry.item.name)));
        }
    }
    if fields.notices {
        for notice in &character.notices {
            out.push(("notice", notice.clone()));
        }
    }

    out
}

pub fn render_layout_json(layout: &FileLayout) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("file_len".to_string(), JsonValue::from(layout.file_len));
    out.insert(
        "sections".to_string(),
        JsonValue::Array(
            layout
                .sections
                .iter()
                .map(|section| {
                    let mut m = JsonMap::new();
                    m.insert(
                        "id".to_string(),
                        JsonValue::String(section.id.as_str().to_string()),
                    );
                    m.insert("start".to_string(), JsonValue::from(section.range.start));
                    m.insert("end".to_string(), JsonValue::from(section.range.end));
                    m.insert("len".to_string(), JsonValue::from(section.range.len()));
                    JsonValue::Object(m)
                })
                .collect(),
        ),
    );
    JsonValue::Object(out)
}

pub fn render_layout_text(layout: &FileLayout) -> String {
    let mut out = String::new();
    writeln!(&mut out, "file length: {} bytes", layout.file_len)
        .expect("writing to String cannot fail");
    for section in &layout.sections {
        writeln!(
            &mut out,
            "  {:<w$}{:>8}..{:<8}({} bytes)",
            section.id.as_str(),
            section.range.start,
            section.range.end,
            section.range.len(),
            w = LAYOUT_NAME_WIDTH
        )
        .expect("writing to String cannot fail");
    }
    out
}

fn selected_json(fields: &FieldSelection, character: &Character) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();

    if fields.name {
        out.insert("name".to_string(), JsonValue::String(character.name.clone()));
    }
    if fields.class {
        out.insert(
            "class".to_string(),
            JsonValue::String(character.class.clone()),
        );
        out.insert("class_id".to_string(), JsonValue::from(character.class_id));
    }
    if fields.level {
        out.insert("level".to_string(), JsonValue::from(character.level));
    }
    if fields.status {
        insert_status(&mut out, character);
    }
    if fields.last_played {
        out.insert("last_played".to_string(), last_played_to_json(character));
    }
    if fields.attributes {
        out.insert("attributes".to_string(), attributes_to_json(character));
    }
    if fields.derived {
        out.insert("derived".to_string(), derived_to_json(character));
    }
    if fields.skills {
        out.insert("skills".to_string(), skills_to_json(character));
    }
    if fields.equipped {
        out.insert(
            "equipped".to_string(),
            equipped_to_json(&character.equipped),
        );
    }
    if fields.inventory {
        out.insert("inventory".to_string(), inventory_to_json(character));
    }
    if fields.mercenary {
        out.insert(
            "mercenary".to_string(),
            equipped_to_json(&character.mercenary),
        );
    }
    if fields.notices {
        out.insert("notices".to_string(), notices_to_json(character));
    }

    out
}

fn default_json(character: &Character) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();

    out.insert("name".to_string(), JsonValue::String(character.name.clone()));
    out.insert(
        "class".to_string(),
        JsonValue::String(character.class.clone()),
    );
    out.insert("class_id".to_string(), JsonValue::from(character.class_id));
    out.insert("level".to_string(), JsonValue::from(character.level));
    insert_status(&mut out, character);
    out.insert("last_played".to_string(), last_played_to_json(character));
    out.insert(
        "parse_method".to_string(),
        JsonValue::String(character.parse_method.as_str().to_string()),
    );
    out.insert("attributes".to_string(), attributes_to_json(character));
    out.insert("derived".to_string(), derived_to_json(character));
    out.insert("skills".to_string(), skills_to_json(character));
    out.insert(
        "equipped".to_string(),
        equipped_to_json(&character.equipped),
    );
    out.insert("inventory".to_string(), inventory_to_json(character));
    out.insert(
        "mercenary".to_string(),
        equipped_to_json(&character.mercenary),
    );
    out.insert("notices".to_string(), notices_to_json(character));

    out
}

fn insert_status(out: &mut JsonMap<String, JsonValue>, character: &Character) {
    out.insert("hardcore".to_string(), JsonValue::Bool(character.hardcore));
    out.insert("expansion".to_string(), JsonValue::Bool(character.expansion));
    out.insert("dead".to_string(), JsonValue::Bool(character.dead));
    out.insert("ladder".to_string(), JsonValue::Bool(character.ladder));
}

fn last_played_to_json(character: &Character) -> JsonValue {
    match character.last_played {
        Some(secs) => JsonValue::from(secs),
        None => JsonValue::Null,
    }
}

fn attributes_to_json(character: &Character) -> JsonValue {
    let mut m = JsonMap::new();
    for stat in character.stats() {
        m.insert(stat.name, JsonValue::from(stat.value));
    }
    JsonValue::Object(m)
}

fn derived_pairs(d: &DerivedStats) -> Vec<(&'static str, String)> {
    vec![
        ("strength", d.total_strength.to_string()),
        ("dexterity", d.total_dexterity.to_string()),
        ("vitality", d.total_vitality.to_string()),
        ("energy", d.total_energy.to_string()),
        ("life", d.life.to_string()),
        ("mana", d.mana.to_string()),
        ("stamina", d.stamina.to_string()),
        ("defense", d.defense.to_string()),
        ("attack_rating", d.attack_rating.to_string()),
        ("fire_resist", d.fire_resist.to_string()),
        ("cold_resist", d.cold_resist.to_string()),
        ("lightning_resist", d.lightning_resist.to_string()),
        ("poison_resist", d.poison_resist.to_string()),
        ("difficulty", d.difficulty.to_string()),
        (
            "next_level_experience",
            d.next_level_experience
                .map(|xp| xp.to_string())
                .unwrap_or_else(|| "max".to_string()),
        ),
    ]
}

fn derived_to_json(character: &Character) -> JsonValue {
    let Some(d) = &character.derived else {
        return JsonValue::Null;
    };

    let mut totals = JsonMap::new();
    for (name, total, bonus) in [
        ("strength", d.total_strength, d.item_strength),
        ("dexterity", d.total_dexterity, d.item_dexterity),
        ("vitality", d.total_vitality, d.item_vitality),
        ("energy", d.total_energy, d.item_energy),
    ] {
        let mut entry = JsonMap::new();
        entry.insert("total".to_string(), JsonValue::from(total));
        entry.insert("bonus".to_string(), JsonValue::from(bonus));
        totals.insert(name.to_string(), JsonValue::Object(entry));
    }

    let mut resists = JsonMap::new();
    resists.insert("fire".to_string(), JsonValue::from(d.fire_resist));
    resists.insert("cold".to_string(), JsonValue::from(d.cold_resist));
    resists.insert("lightning".to_string(), JsonValue::from(d.lightning_resist));
    resists.insert("poison".to_string(), JsonValue::from(d.poison_resist));

    let mut m = JsonMap::new();
    m.insert("attributes".to_string(), JsonValue::Object(totals));
    m.insert("life".to_string(), JsonValue::from(d.life));
    m.insert("mana".to_string(), JsonValue::from(d.mana));
    m.insert("stamina".to_string(), JsonValue::from(d.stamina));
    m.insert("defense".to_string(), JsonValue::from(d.defense));
    m.insert("attack_rating".to_string(), JsonValue::from(d.attack_rating));
    m.insert("resists".to_string(), JsonValue::Object(resists));
    m.insert(
        "difficulty".to_string(),
        JsonValue::String(d.difficulty.to_string()),
    );
    m.insert(
        "next_level_experience".to_string(),
        match d.next_level_experience {
            Some(xp) => JsonValue::from(xp),
            None => JsonValue::Null,
        },
    );
    JsonValue::Object(m)
}

fn skills_to_json(character: &Character) -> JsonValue {
    JsonValue::Array(
        character
            .skills
            .iter()
            .map(|s| {
                let mut m = JsonMap::new();
                m.insert("id".to_string(), JsonValue::from(s.id));
                m.insert("name".to_string(), JsonValue::String(s.name.clone()));
                m.insert("points".to_string(), JsonValue::from(s.points));
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn equipped_to_json(entries: &[EquippedItem]) -> JsonValue {
    JsonValue::Array(
        entries
            .iter()
            .map(|entry| {
                let mut m = JsonMap::new();
                m.insert("slot".to_string(), JsonValue::String(entry.slot.clone()));
                m.extend(item_fields(&entry.item));
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn inventory_to_json(character: &Character) -> JsonValue {
    JsonValue::Array(
        character
            .inventory
            .iter()
            .map(|item| JsonValue::Object(item_fields(item)))
            .collect(),
    )
}

fn notices_to_json(character: &Character) -> JsonValue {
    JsonValue::Array(
        character
            .notices
            .iter()
            .map(|n| JsonValue::String(n.clone()))
            .collect(),
    )
}

fn item_fields(item: &ItemView) -> JsonMap<String, JsonValue> {
    let mut m = JsonMap::new();
    m.insert("name".to_string(), JsonValue::String(item.name.clone()));
    if let Some(base) = &item.base_name {
        m.insert("base_name".to_string(), JsonValue::String(base.clone()));
    }
    m.insert("code".to_string(), JsonValue::String(item.code.clone()));
    m.insert(
        "quality".to_string(),
        JsonValue::String(item.quality.clone()),
    );
    m.insert("identified".to_string(), JsonValue::Bool(item.identified));
    m.insert("ethereal".to_string(), JsonValue::Bool(item.ethereal));
    m.insert("item_level".to_string(), JsonValue::from(item.item_level));

    let mut requirements = JsonMap::new();
    requirements.insert("level".to_string(), JsonValue::from(item.req_level));
    requirements.insert("strength".to_string(), JsonValue::from(item.req_str));
    requirements.insert("dexterity".to_string(), JsonValue::from(item.req_dex));
    m.insert("requirements".to_string(), JsonValue::Object(requirements));

    if let Some(defense) = item.defense {
        m.insert("defense".to_string(), JsonValue::from(defense));
    }
    if let (Some(min), Some(max)) = (item.min_damage, item.max_damage) {
        m.insert("damage".to_string(), damage_to_json(min, max));
    }
    if let (Some(min), Some(max)) = (item.two_hand_min_damage, item.two_hand_max_damage) {
        m.insert("two_hand_damage".to_string(), damage_to_json(min, max));
    }
    if let Some((current, max)) = item.durability {
        m.insert(
            "durability".to_string(),
            JsonValue::Array(vec![JsonValue::from(current), JsonValue::from(max)]),
        );
    }
    if let Some(quantity) = item.quantity {
        m.insert("quantity".to_string(), JsonValue::from(quantity));
    }
    if item.socketed {
        let mut sockets = JsonMap::new();
        sockets.insert("total".to_string(), JsonValue::from(item.total_sockets));
        sockets.insert("filled".to_string(), JsonValue::from(item.filled_sockets));
        sockets.insert(
            "items".to_string(),
            JsonValue::Array(
                item.sockets
                    .iter()
                    .map(|s| JsonValue::String(s.name.clone()))
                    .collect(),
            ),
        );
        m.insert("sockets".to_string(), JsonValue::Object(sockets));
    }
    m.insert("runeword".to_string(), JsonValue::Bool(item.is_runeword));
    m.insert(
        "properties".to_string(),
        JsonValue::Array(
            item.properties
                .iter()
                .map(|p| JsonValue::String(p.description.clone()))
                .collect(),
        ),
    );
    if !item.set_properties.is_empty() {
        m.insert(
            "set_properties".to_string(),
            JsonValue::Array(
                item.set_properties
                    .iter()
                    .map(|p| JsonValue::String(p.description.clone()))
                    .collect(),
            ),
        );
    }
    if let Some(pos) = item.position {
        let mut p = JsonMap::new();
        p.insert("x".to_string(), JsonValue::from(pos.x));
        p.insert("y".to_string(), JsonValue::from(pos.y));
        p.insert("w".to_string(), JsonValue::from(pos.w));
        p.insert("h".to_string(), JsonValue::from(pos.h));
        m.insert("position".to_string(), JsonValue::Object(p));
    }
    m
}

fn damage_to_json(min: i64, max: i64) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("min".to_string(), JsonValue::from(min));
    m.insert("max".to_string(), JsonValue::from(max));
    JsonValue::Object(m)
}

fn render_sheet_impl(character: &Character, options: TextRenderOptions) -> String {
    let played = match character.last_played {
        Some(secs) => format!("Last played {} UTC", format_unix_time(secs)),
        None => "Never played".to_string(),
    };

    let mut out = String::new();
    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(&mut out, "{}", centered_no_trailing("DIABLO II", SHEET_WIDTH))
        .expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "{}",
        centered_no_trailing("CHARACTER RECORD", SHEET_WIDTH)
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out, "{}", centered_no_trailing(&played, SHEET_WIDTH))
        .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    let name_section = format!("  Name: {:<19}", character.name);
    let class_section = format!("Class: {:<17}", character.class);
    writeln!(
        &mut out,
        "{}{}Level: {:02}",
        name_section, class_section, character.level
    )
    .expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "  Mode: {:<19}Decode: {}",
        format_status(character),
        character.parse_method.as_str()
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    write_attributes_grid(&mut out, character);
    writeln!(&mut out).expect("writing to String cannot fail");
    write_skills_grid(&mut out, character);
    writeln!(&mut out).expect("writing to String cannot fail");
    write_equipped_section(&mut out, " ::: Equipped :::", &character.equipped, options);
    writeln!(&mut out).expect("writing to String cannot fail");
    write_equipped_section(&mut out, " ::: Mercenary :::", &character.mercenary, options);
    writeln!(&mut out).expect("writing to String cannot fail");
    write_inventory_section(&mut out, &character.inventory, options);

    if !character.notices.is_empty() {
        writeln!(&mut out).expect("writing to String cannot fail");
        writeln!(&mut out, " ::: Notices :::").expect("writing to String cannot fail");
        for notice in &character.notices {
            writeln!(&mut out, "  - {notice}").expect("writing to String cannot fail");
        }
    }
    writeln!(&mut out).expect("writing to String cannot fail");

    out
}

fn write_attributes_grid(out: &mut String, character: &Character) {
    writeln!(
        out,
        " ::: Attributes :::                 ::: Derived :::"
    )
    .expect("writing to String cannot fail");

    let attrs = &character.attributes;
    let derived = character.derived.as_ref();
    let core = [
        ("Strength", attrs.strength(), derived.map(|d| d.item_strength)),
        ("Dexterity", attrs.dexterity(), derived.map(|d| d.item_dexterity)),
        ("Vitality", attrs.vitality(), derived.map(|d| d.item_vitality)),
        ("Energy", attrs.energy(), derived.map(|d| d.item_energy)),
    ];
    let mut left: Vec<String> = core
        .iter()
        .map(|&(label, base, bonus)| match bonus {
            Some(bonus) if bonus != 0 => {
                format!("{label}: {} ({base} {bonus:+})", base + bonus)
            }
            _ => format!("{label}: {base}"),
        })
        .collect();
    left.push(format!("Stat Points: {}", attrs.get(4)));
    left.push(format!("Skill Points: {}", attrs.get(5)));
    left.push(format!(
        "Experience: {}",
        format_number_with_commas(attrs.get(13))
    ));
    left.push(format!("Gold: {}", format_number_with_commas(attrs.get(14))));
    left.push(format!(
        "Stash: {}",
        format_number_with_commas(attrs.get(15))
    ));

    let right: Vec<String> = match derived {
        Some(d) => vec![
            format!("Life: {}", d.life),
            format!("Mana: {}", d.mana),
            format!("Stamina: {}", d.stamina),
            format!("Defense: {}", d.defense),
            format!("Attack Rating: {}", d.attack_rating),
            format!("Fire Res.: {}%", d.fire_resist),
            format!("Cold Res.: {}%", d.cold_resist),
            format!("Lightning Res.: {}%", d.lightning_resist),
            format!("Poison Res.: {}%", d.poison_resist),
            format!(
                "Next Level: {} ({})",
                d.next_level_experience
                    .map(|xp| format_number_with_commas(xp as i64))
                    .unwrap_or_else(|| "max".to_string()),
                d.difficulty
            ),
        ],
        None => vec![
            format!("Life: {}", attrs.get(7)),
            format!("Mana: {}", attrs.get(9)),
            format!("Stamina: {}", attrs.get(11)),
            "(no gear bonuses)".to_string(),
        ],
    };

    write_two_columns(out, &left, &right);
}

fn write_skills_grid(out: &mut String, character: &Character) {
    writeln!(out, " ::: Skills :::").expect("writing to String cannot fail");

    if character.skills.is_empty() {
        writeln!(out, " none").expect("writing to String cannot fail");
        return;
    }
    let lines: Vec<String> = character
        .skills
        .iter()
        .map(|s| format!("{}: {}", s.name, s.points))
        .collect();
    let half = lines.len().div_ceil(2);
    let (left, right) = lines.split_at(half);
    write_two_columns(out, left, right);
}

fn write_two_columns(out: &mut String, left: &[String], right: &[String]) {
    let row_count = left.len().max(right.len());
    for row in 0..row_count {
        let l = left.get(row).map(String::as_str).unwrap_or("");
        let r = right.get(row).map(String::as_str).unwrap_or("");
        let line = format!(
            " {:<a$}{:<b$}",
            fit_column(l, TWO_COL_WIDTH_LEFT),
            fit_column(r, TWO_COL_WIDTH_RIGHT),
            a = TWO_COL_WIDTH_LEFT,
            b = TWO_COL_WIDTH_RIGHT
        );
        writeln!(out, "{}", line.trim_end()).expect("writing to String cannot fail");
    }
}

fn write_equipped_section(
    out: &mut String,
    heading: &str,
    entries: &[EquippedItem],
    options: TextRenderOptions,
) {
    writeln!(out, "{heading}").expect("writing to String cannot fail");
    if entries.is_empty() {
        writeln!(out, "  none").expect("writing to String cannot fail");
        return;
    }
    for entry in entries {
        writeln!(
            out,
            "  {:<w$}{}",
            entry.slot,
            item_title(&entry.item, options),
            w = SLOT_COL_WIDTH + 2
        )
        .expect("writing to String cannot fail");
        write_item_details(out, &entry.item, options);
    }
}

fn write_inventory_section(out: &mut String, items: &[ItemView], options: TextRenderOptions) {
    writeln!(out, " ::: Inventory :::").expect("writing to String cannot fail");
    if items.is_empty() {
        writeln!(out, "  none").expect("writing to String cannot fail");
        return;
    }
    for item in items {
        let place = match item.position {
            Some(p) => format!("{},{} {}x{}", p.x, p.y, p.w, p.h),
            None => String::new(),
        };
        writeln!(
            out,
            "  {:<w$}{}",
            place,
            item_title(item, options),
            w = SLOT_COL_WIDTH + 2
        )
        .expect("writing to String cannot fail");
        write_item_details(out, item, options);
    }
}

fn item_title(item: &ItemView, options: TextRenderOptions) -> String {
    let mut title = item.name.clone();
    if let Some(base) = &item.base_name {
        title.push_str(&format!(" [{base}]"));
    }
    if item.ethereal {
        title.push_str(" (ethereal)");
    }
    if let Some(quantity) = item.quantity {
        title.push_str(&format!(" x{quantity}"));
    }
    if options.verbose {
        title.push_str(&format!(" <{}>", item.code));
    }
    title
}

fn write_item_details(out: &mut String, item: &ItemView, options: TextRenderOptions) {
    let indent = " ".repeat(PROPERTY_INDENT);
    if let Some(defense) = item.defense {
        writeln!(out, "{indent}Defense: {defense}").expect("writing to String cannot fail");
    }
    if let (Some(min), Some(max)) = (item.min_damage, item.max_damage) {
        writeln!(out, "{indent}Damage: {min} to {max}").expect("writing to String cannot fail");
    }
    if let (Some(min), Some(max)) = (item.two_hand_min_damage, item.two_hand_max_damage) {
        writeln!(out, "{indent}Two-Hand Damage: {min} to {max}")
            .expect("writing to String cannot fail");
    }
    if item.socketed {
        writeln!(
            out,
            "{indent}Sockets: {}/{}",
            item.filled_sockets, item.total_sockets
        )
        .expect("writing to String cannot fail");
    }
    for property in &item.properties {
        writeln!(out, "{indent}{}", property.description)
            .expect("writing to String cannot fail");
    }
    if options.verbose {
        for property in &item.set_properties {
            writeln!(out, "{indent}(set) {}", property.description)
                .expect("writing to String cannot fail");
        }
    }
}

fn format_status(character: &Character) -> String {
    let mut parts = vec![if character.expansion {
        "Expansion"
    } else {
        "Classic"
    }];
    if character.hardcore {
        parts.push("Hardcore");
    }
    if character.ladder {
        parts.push("Ladder");
    }
    if character.dead {
        parts.push("Dead");
    }
    parts.join(", ")
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out = String::with_capacity(width);
    for ch in value.chars().take(width - 3) {
        out.push(ch);
    }
    out.push_str("...");
    out
}

fn centered_no_trailing(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }

    let left_padding = (width - len) / 2;
    format!("{}{}", " ".repeat(left_padding), value)
}

/// `YYYY-MM-DD HH:MM:SS` in UTC.
fn format_unix_time(secs: u32) -> String {
    let days = i64::from(secs / SECONDS_PER_DAY);
    let rem = secs % SECONDS_PER_DAY;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02} {:02}:{:02}:{:02}",
        rem / 3600,
        (rem / 60) % 60,
        rem % 60
    )
}

/// Proleptic Gregorian date for a day count since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

fn format_number_with_commas(n: i64) -> String {
    if n < 0 {
        return format!("-{}", format_number_with_commas(-n));
    }
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
