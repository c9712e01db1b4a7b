//! Built-in corrections for stats and skills whose shipped tables carry no
//! usable description. They only fill gaps; a bundle that already describes a
//! stat keeps its own wording.

use tracing::debug;

use crate::tables::{GameData, SkillDef};

use super::descriptor::{CustomFormat, DescriptorMode, ValuePosition};

struct StatOverride {
    stat: &'static str,
    hidden: bool,
    mode: Option<u8>,
    value_position: Option<ValuePosition>,
    text: Option<&'static str>,
    custom: Option<fn() -> CustomFormat>,
}

const fn hidden(stat: &'static str) -> StatOverride {
    StatOverride {
        stat,
        hidden: true,
        mode: None,
        value_position: None,
        text: None,
        custom: None,
    }
}

const fn before(stat: &'static str, mode: u8, text: &'static str) -> StatOverride {
    StatOverride {
        stat,
        hidden: false,
        mode: Some(mode),
        value_position: Some(ValuePosition::Before),
        text: Some(text),
        custom: None,
    }
}

const fn template(stat: &'static str, mode: u8, text: &'static str) -> StatOverride {
    StatOverride {
        stat,
        hidden: false,
        mode: Some(mode),
        value_position: None,
        text: Some(text),
        custom: None,
    }
}

fn splash_damage() -> CustomFormat {
    CustomFormat::SplashDamage
}

const STAT_OVERRIDES: &[StatOverride] = &[
    hidden("corrupted"),
    hidden("desecrated"),
    hidden("desecrator"),
    StatOverride {
        stat: "item_splashonhit",
        hidden: false,
        mode: None,
        value_position: None,
        text: None,
        custom: Some(splash_damage),
    },
    before("item_elemskill_fire", 1, "to Fire Skills"),
    before("item_elemskill_ltng", 1, "to Lightning Skills"),
    before("item_elemskill_cold", 1, "to Cold Skills"),
    before("item_elemskill_pois", 1, "to Poison Skills"),
    before("item_elemskill_mag", 1, "to Magic Skills"),
    before("item_healafterhit", 1, "Life after each Hit"),
    before("item_healafterkill", 1, "Life after each Kill"),
    before("item_manaafterhit", 1, "Mana after each Hit"),
    before("item_manaafterkill", 1, "Mana after each Kill"),
    before("passive_mag_mastery", 4, "to Magic Skill Damage"),
    before("passive_mag_pierce", 20, "to Enemy Magic Resistance"),
    before("item_pierce_cold", 20, "to Enemy Cold Resistance"),
    before("item_pierce_fire", 20, "to Enemy Fire Resistance"),
    before("item_pierce_ltng", 20, "to Enemy Lightning Resistance"),
    before("item_pierce_pois", 20, "to Enemy Poison Resistance"),
    template(
        "item_skilloncast",
        15,
        "%d%% Chance to cast level %d %s on casting",
    ),
    template(
        "item_skillonblock",
        15,
        "%d%% Chance to cast level %d %s when blocking",
    ),
    template(
        "item_skilloncrit",
        15,
        "%d%% Chance to cast level %d %s on critical hit",
    ),
    template(
        "item_skillonpierce",
        15,
        "%d%% Chance to cast level %d %s on piercing",
    ),
    before("item_maxdeadlystrike", 4, "to Maximum Deadly Strike"),
];

const SKILL_NAME_OVERRIDES: &[(u16, &str)] = &[
    (445, "Life Tap"),
    (446, "Decrepify"),
    (447, "Lower Resist"),
    (358, "Splash Damage"),
];

/// Display names for stacked gems, runes and quiver tiers that have no
/// item-type entry of their own.
const STACKED_ITEM_NAMES: &[(&str, &str)] = &[
    ("gcvs", "Chipped Amethyst"),
    ("gfvs", "Flawed Amethyst"),
    ("gsvs", "Amethyst"),
    ("gzvs", "Flawless Amethyst"),
    ("glvs", "Flawless Amethyst"),
    ("gpvs", "Perfect Amethyst"),
    ("gcws", "Chipped Diamond"),
    ("gfws", "Flawed Diamond"),
    ("gsws", "Diamond"),
    ("gzws", "Flawless Diamond"),
    ("glws", "Flawless Diamond"),
    ("gpws", "Perfect Diamond"),
    ("gcgs", "Chipped Emerald"),
    ("gfgs", "Flawed Emerald"),
    ("gsgs", "Emerald"),
    ("gzgs", "Flawless Emerald"),
    ("glgs", "Flawless Emerald"),
    ("gpgs", "Perfect Emerald"),
    ("gcrs", "Chipped Ruby"),
    ("gfrs", "Flawed Ruby"),
    ("gsrs", "Ruby"),
    ("gzrs", "Flawless Ruby"),
    ("glrs", "Flawless Ruby"),
    ("gprs", "Perfect Ruby"),
    ("gcbs", "Chipped Sapphire"),
    ("gfbs", "Flawed Sapphire"),
    ("gsbs", "Sapphire"),
    ("gzbs", "Flawless Sapphire"),
    ("glbs", "Flawless Sapphire"),
    ("gpbs", "Perfect Sapphire"),
    ("gcys", "Chipped Topaz"),
    ("gfys", "Flawed Topaz"),
    ("gsys", "Topaz"),
    ("gzys", "Flawless Topaz"),
    ("glys", "Flawless Topaz"),
    ("gpys", "Perfect Topaz"),
    ("skcs", "Chipped Skull"),
    ("skfs", "Flawed Skull"),
    ("skus", "Skull"),
    ("skzs", "Flawless Skull"),
    ("skls", "Perfect Skull"),
    ("skps", "Perfect Skull"),
    ("aqv2", "Sharp Arrows"),
    ("aqv3", "Razor Arrows"),
    ("cqv2", "Heavy Bolts"),
    ("cqv3", "War Bolts"),
    ("r01s", "El Rune"),
    ("r02s", "Eld Rune"),
    ("r03s", "Tir Rune"),
    ("r04s", "Nef Rune"),
    ("r05s", "Eth Rune"),
    ("r06s", "Ith Rune"),
    ("r07s", "Tal Rune"),
    ("r08s", "Ral Rune"),
    ("r09s", "Ort Rune"),
    ("r10s", "Thul Rune"),
    ("r11s", "Amn Rune"),
    ("r12s", "Sol Rune"),
    ("r13s", "Shael Rune"),
    ("r14s", "Dol Rune"),
    ("r15s", "Hel Rune"),
    ("r16s", "Io Rune"),
    ("r17s", "Lum Rune"),
    ("r18s", "Ko Rune"),
    ("r19s", "Fal Rune"),
    ("r20s", "Lem Rune"),
    ("r21s", "Pul Rune"),
    ("r22s", "Um Rune"),
    ("r23s", "Mal Rune"),
    ("r24s", "Ist Rune"),
    ("r25s", "Gul Rune"),
    ("r26s", "Vex Rune"),
    ("r27s", "Ohm Rune"),
    ("r28s", "Lo Rune"),
    ("r29s", "Sur Rune"),
    ("r30s", "Ber Rune"),
    ("r31s", "Jah Rune"),
    ("r32s", "Cham Rune"),
    ("r33s", "Zod Rune"),
];

pub fn stacked_item_name(code: &str) -> Option<&'static str> {
    STACKED_ITEM_NAMES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

pub fn apply(data: &mut GameData) {
    let mut patched = 0usize;
    for stat in data.stats.values_mut() {
        let Some(fix) = STAT_OVERRIDES.iter().find(|o| o.stat == stat.name) else {
            continue;
        };
        let desc = &mut stat.descriptor;
        if fix.hidden {
            desc.hidden = true;
            patched += 1;
            continue;
        }
        if let Some(text) = fix.text
            && desc.positive.as_deref().is_none_or(str::is_empty)
        {
            desc.positive = Some(text.to_string());
            desc.negative = Some(text.to_string());
            patched += 1;
        }
        if let Some(mode) = fix.mode
            && desc.mode.is_none_or(|m| m.raw() == 0)
        {
            desc.mode = Some(DescriptorMode::from_raw(mode));
            patched += 1;
        }
        if fix.value_position.is_some() && desc.value_position.is_none() {
            desc.value_position = fix.value_position;
            patched += 1;
        }
        if let Some(custom) = fix.custom {
            desc.custom = Some(custom());
            patched += 1;
        }
    }

    for &(id, name) in SKILL_NAME_OVERRIDES {
        data.skills
            .entry(id)
            .or_insert_with(SkillDef::default)
            .name = name.to_string();
    }

    debug!(patched, "applied built-in stat descriptions");
}
