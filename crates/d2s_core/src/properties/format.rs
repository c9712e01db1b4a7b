use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::d2s::items::{Item, MagicAttribute};
use crate::tables::{GameData, StatDef};

use super::descriptor::{CustomFormat, DescriptorMode, ValuePosition};

/// Resistances always use the positive wording, negative values included.
const RESIST_STATS: [u16; 4] = [39, 41, 43, 45];
const POISON_DAMAGE_STAT: &str = "poisonmindam";
const MAX_DAMAGE_PERCENT_STAT: &str = "item_maxdamage_percent";
const POISON_FRAMES_PER_SECOND: i64 = 25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedProperty {
    pub stat: String,
    pub values: Vec<i64>,
    pub description: String,
}

/// Game-style printf: `%d`, `%+d`, `%s` and `%+s` take successive arguments
/// (a missing argument prints nothing), then the first `%%` becomes `%`.
pub fn sprintf(template: Option<&str>, args: &[String]) -> String {
    let Some(template) = template.filter(|t| !t.is_empty()) else {
        return args.join(" ");
    };

    let chars: Vec<char> = template.chars().collect();
    let mut out = String::with_capacity(template.len());
    let mut next = args.iter();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '%' {
            let plus = chars.get(i + 1) == Some(&'+');
            let spec_at = if plus { i + 2 } else { i + 1 };
            if let Some(spec) = chars.get(spec_at)
                && matches!(spec, 'd' | 'D' | 's' | 'S')
            {
                if let Some(arg) = next.next() {
                    if plus {
                        out.push('+');
                    }
                    out.push_str(arg);
                }
                i = spec_at + 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out.replacen("%%", "%", 1)
}

/// Replace every `%d` in order with the next item from `values`.
fn substitute_each(template: &str, values: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut next = values.iter();
    while let Some(pos) = rest.find(['%']) {
        let tail = &rest[pos..];
        if tail.starts_with("%d") || tail.starts_with("%D") {
            out.push_str(&rest[..pos]);
            if let Some(v) = next.next() {
                out.push_str(v);
            }
            rest = &tail[2..];
        } else {
            out.push_str(&rest[..pos + 1]);
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

/// Replace only the first occurrence of `pattern`.
fn substitute_first(template: &str, pattern: &str, value: &str) -> String {
    template.replacen(pattern, value, 1)
}

/// Numbers the way a script runtime prints them: no trailing `.0`.
fn plain_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// `item_fastercastrate` becomes `Fastercastrate`.
fn humanize(name: &str) -> String {
    let trimmed = name.strip_prefix("item_").unwrap_or(name);
    let mut out = String::with_capacity(trimmed.len());
    let mut prev_word = false;
    for c in trimmed.chars() {
        let c = if c == '_' { ' ' } else { c };
        let is_word = c.is_ascii_alphanumeric();
        if is_word && !prev_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_word = is_word;
    }
    out
}

fn value_at(values: &[i64], index: usize) -> i64 {
    values.get(index).copied().unwrap_or(0)
}

fn arg_at(values: &[i64], index: usize) -> String {
    values.get(index).map(i64::to_string).unwrap_or_default()
}

fn skill_name(data: &GameData, id: i64) -> Option<&str> {
    u16::try_from(id).ok().and_then(|id| data.skill_name(id))
}

fn stat_label(id: u16, stat: Option<&StatDef>) -> String {
    stat.map(|s| s.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("stat_{id}"))
}

enum Rendered {
    Value(String),
    Text(String),
}

/// Format one (possibly grouped) attribute. `None` means the stat renders
/// nothing: hidden, undescribed, or an empty result.
pub fn describe(attr: &MagicAttribute, data: &GameData) -> Option<String> {
    let values = attr.values.as_slice();
    let v = values.last().copied().unwrap_or(0);
    let sign = if v >= 0 { "+" } else { "" };

    let Some(stat) = data.stat(attr.id) else {
        return Some(format!(
            "{sign}{v} {}",
            humanize(&stat_label(attr.id, None))
        ));
    };
    let desc = &stat.descriptor;
    if desc.hidden {
        return None;
    }

    if let Some(custom) = &desc.custom {
        return Some(match custom {
            CustomFormat::SplashDamage => {
                let pct = values.get(2).copied().filter(|&p| p != 0).unwrap_or(100);
                format!("{pct}% Splash Damage")
            }
            CustomFormat::Template(template) => {
                let args: Vec<String> = values.iter().map(i64::to_string).collect();
                substitute_each(template, &args)
            }
        });
    }

    if stat.is_compound() {
        return describe_compound(stat, values);
    }

    let mode = match desc.mode {
        None => return None,
        Some(mode) if mode.raw() == 0 => return None,
        Some(mode) => mode,
    };

    let template = if v >= 0 || RESIST_STATS.contains(&attr.id) {
        desc.positive.as_deref()
    } else {
        desc.negative.as_deref().or(desc.positive.as_deref())
    };
    let ds = template.unwrap_or("");
    let has_ds = !ds.is_empty();

    let rendered = match mode {
        DescriptorMode::SignedValue
        | DescriptorMode::SignedValueQualified
        | DescriptorMode::SignedValueAlt => Rendered::Value(format!("{sign}{v}")),
        DescriptorMode::Percent | DescriptorMode::PercentQualified => {
            Rendered::Value(format!("{v}%"))
        }
        DescriptorMode::PlainValue | DescriptorMode::PlainValueQualified => {
            Rendered::Value(v.to_string())
        }
        DescriptorMode::SignedPercent | DescriptorMode::SignedPercentQualified => {
            Rendered::Value(format!("{sign}{v}%"))
        }
        DescriptorMode::Scaled128 | DescriptorMode::Scaled128Qualified => {
            let scaled = (v * 100).div_euclid(128);
            if has_ds && !ds.contains("%%") {
                Rendered::Value(format!("{scaled}%"))
            } else {
                Rendered::Value(scaled.to_string())
            }
        }
        DescriptorMode::RepairRate => Rendered::Text(substitute_first(
            ds,
            "%d",
            &plain_number(v as f64 / 100.0),
        )),
        DescriptorMode::ClassSkills => {
            let all_skills = u8::try_from(value_at(values, 0))
                .ok()
                .and_then(|id| data.class_strings(id))
                .and_then(|c| c.all_skills.as_deref())
                .unwrap_or("to Skills");
            Rendered::Text(format!("{sign}{v} {all_skills}"))
        }
        DescriptorMode::SkillTab => {
            let class = u8::try_from(value_at(values, 1))
                .ok()
                .and_then(|id| data.class_strings(id));
            let tab = class.and_then(|c| {
                usize::try_from(value_at(values, 0))
                    .ok()
                    .and_then(|t| c.skill_tabs.get(t))
                    .and_then(|t| t.as_deref())
                    .filter(|t| !t.is_empty())
            });
            match (class, tab) {
                (Some(class), Some(tab)) => Rendered::Text(format!(
                    "{} {}",
                    sprintf(Some(tab), &[v.to_string()]),
                    class.class_only.as_deref().unwrap_or("")
                )),
                _ => Rendered::Text(format!("+{v} to Skill Tab")),
            }
        }
        DescriptorMode::ChanceToCast => {
            let skill = skill_name(data, value_at(values, 1))
                .map(str::to_string)
                .unwrap_or_else(|| format!("Skill {}", value_at(values, 1)));
            Rendered::Text(sprintf(
                template,
                &[arg_at(values, 2), arg_at(values, 0), skill],
            ))
        }
        DescriptorMode::Aura => {
            let skill = skill_name(data, value_at(values, 0))
                .map(str::to_string)
                .unwrap_or_else(|| format!("Skill {}", value_at(values, 0)));
            let with_level = substitute_first(ds, "%d", &v.to_string());
            Rendered::Text(substitute_first(&with_level, "%s", &skill))
        }
        DescriptorMode::ByTime => {
            Rendered::Text(format!("{v} {ds} (Increases near [time])"))
        }
        DescriptorMode::ByTimePercent => {
            Rendered::Text(format!("{v}% {ds} (Increases near [time])"))
        }
        DescriptorMode::Template | DescriptorMode::TemplateAlt => {
            Rendered::Text(sprintf(template, &[v.to_string()]))
        }
        DescriptorMode::NegatedPercent => Rendered::Value(format!("{}%", -v)),
        DescriptorMode::Negated => Rendered::Value((-v).to_string()),
        DescriptorMode::VersusMonsterType => Rendered::Text(format!("{v}% {ds} [montype]")),
        DescriptorMode::VersusMonster => Rendered::Text(format!("{v}% {ds} [monster]")),
        DescriptorMode::Charges => {
            let skill = skill_name(data, value_at(values, 1)).unwrap_or("Skill");
            if ds.starts_with('(') {
                let charges: Vec<String> = (2..values.len().max(2))
                    .map(|i| value_at(values, i).to_string())
                    .collect();
                let charges = substitute_each(ds, &charges);
                Rendered::Text(format!(
                    "Level {} {skill} {charges}",
                    value_at(values, 0)
                ))
            } else {
                Rendered::Text(sprintf(
                    template,
                    &[
                        arg_at(values, 0),
                        skill.to_string(),
                        arg_at(values, 2),
                        arg_at(values, 3),
                    ],
                ))
            }
        }
        DescriptorMode::ClassSkill => {
            let skill_id = value_at(values, 0);
            let skill = u16::try_from(skill_id)
                .ok()
                .and_then(|id| data.skills.get(&id));
            let class_only = skill
                .and_then(|s| s.class_code.as_deref())
                .and_then(|code| data.class_by_code(code))
                .and_then(|c| c.class_only.as_deref());
            let skill_name = skill.map(|s| s.name.as_str()).filter(|n| !n.is_empty());
            if has_ds {
                Rendered::Text(sprintf(
                    template,
                    &[
                        v.to_string(),
                        skill_name.unwrap_or("").to_string(),
                        class_only.unwrap_or("").to_string(),
                    ],
                ))
            } else {
                Rendered::Text(format!(
                    "{sign}{v} to {} {}",
                    skill_name.unwrap_or("Skill"),
                    class_only.unwrap_or("")
                ))
            }
        }
        DescriptorMode::Skill => {
            let skill = skill_name(data, value_at(values, 0)).unwrap_or("Skill");
            Rendered::Text(format!("{sign}{v} to {skill}"))
        }
        DescriptorMode::Unused25 | DescriptorMode::Unused26 | DescriptorMode::Unknown(_) => {
            if let DescriptorMode::Unknown(raw) = mode {
                warn!(stat = attr.id, mode = raw, "unknown description mode");
            } else {
                debug!(stat = attr.id, mode = mode.raw(), "unused description mode");
            }
            if has_ds {
                return Some(format!("{ds}: {v}"));
            }
            return Some(format!(
                "{sign}{v} {}",
                humanize(&stat_label(attr.id, Some(stat)))
            ));
        }
    };

    let mut description = match rendered {
        Rendered::Text(text) => text,
        Rendered::Value(value) => match desc.value_position.unwrap_or_default() {
            ValuePosition::Template => sprintf(template, &[value]),
            ValuePosition::Before => format!("{value} {ds}"),
            ValuePosition::After => format!("{ds} {value}"),
        },
    };

    if mode.appends_qualifier()
        && let Some(qualifier) = desc.qualifier.as_deref().filter(|q| !q.is_empty())
    {
        description.push(' ');
        description.push_str(qualifier);
    }

    let trimmed = description.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Stats stored as a run of consecutive ids: damage ranges and poison.
fn describe_compound(stat: &StatDef, values: &[i64]) -> Option<String> {
    let desc = &stat.descriptor;

    if stat.name == POISON_DAMAGE_STAT {
        let frames = value_at(values, 2);
        let parts = [
            (value_at(values, 0) * frames).div_euclid(256),
            (value_at(values, 1) * frames).div_euclid(256),
            frames.div_euclid(POISON_FRAMES_PER_SECOND),
        ]
        .map(|n| n.to_string());
        let text = substitute_each(desc.range.as_deref().unwrap_or(""), &parts);
        return (!text.is_empty()).then_some(text);
    }

    let mut template = desc.range.clone().unwrap_or_default();
    if value_at(values, 0) == value_at(values, 1) {
        template = desc.equal_range.clone().unwrap_or_default();
        if stat.name == MAX_DAMAGE_PERCENT_STAT {
            template = format!("+%d% {}", strip_percent_slots(&template.replace('}', "")));
        }
    }

    let args: Vec<String> = values.iter().map(i64::to_string).collect();
    let text = substitute_each(&template, &args);
    (!text.is_empty()).then_some(text)
}

/// Drop `%d%%` and `%+d%%` slots.
fn strip_percent_slots(template: &str) -> String {
    template
        .replace("%+d%%", "")
        .replace("%+D%%", "")
        .replace("%d%%", "")
        .replace("%D%%", "")
}

/// Merge attributes sharing a stat id.
///
/// Keyed stats (skill, class, tab, charges) merge only when their leading
/// key values match. Compound stats add position by position; everything
/// else adds the trailing value, or the trailing two for charges.
pub fn group_attributes<'a>(
    attrs: impl IntoIterator<Item = &'a MagicAttribute>,
    data: &GameData,
) -> Vec<MagicAttribute> {
    let mut grouped: Vec<MagicAttribute> = Vec::new();
    for attr in attrs {
        let Some(stat) = data.stat(attr.id) else {
            grouped.push(attr.clone());
            continue;
        };

        let key_len = if stat.encoding == 3 {
            2
        } else {
            stat.descriptor.mode.map(|m| m.key_len()).unwrap_or(0)
        };

        let existing = grouped.iter_mut().find(|g| {
            g.id == attr.id
                && (0..key_len).all(|i| g.values.get(i) == attr.values.get(i))
        });

        let Some(existing) = existing else {
            grouped.push(attr.clone());
            continue;
        };

        if stat.is_compound() {
            for (ours, theirs) in existing.values.iter_mut().zip(&attr.values) {
                *ours += theirs;
            }
        } else {
            let summed = if stat.encoding == 3 { 2 } else { 1 };
            let len = existing.values.len();
            for idx in len.saturating_sub(summed)..len {
                if let Some(theirs) = attr.values.get(idx) {
                    existing.values[idx] += theirs;
                }
            }
        }
    }
    grouped
}

fn to_properties<'a>(
    attrs: impl IntoIterator<Item = &'a MagicAttribute>,
    data: &GameData,
    dedupe: bool,
) -> Vec<FormattedProperty> {
    let mut out: Vec<FormattedProperty> = Vec::new();
    for attr in attrs {
        let Some(description) = describe(attr, data) else {
            continue;
        };
        if dedupe && out.iter().any(|p| p.description == description) {
            continue;
        }
        out.push(FormattedProperty {
            stat: stat_label(attr.id, data.stat(attr.id)),
            values: attr.values.clone(),
            description,
        });
    }
    out
}

/// Item text: own, runeword and socket-filler attributes, grouped, formatted
/// and deduplicated in first-seen order.
pub fn format_item_properties(item: &Item, data: &GameData) -> Vec<FormattedProperty> {
    let socketed = item
        .socketed_items
        .iter()
        .flat_map(|child| child.magic_attributes.iter());
    let all = item
        .magic_attributes
        .iter()
        .chain(item.runeword_attributes.iter())
        .chain(socketed);
    let grouped = group_attributes(all, data);
    to_properties(&grouped, data, true)
}

/// Partial set bonuses, each formatted on its own.
pub fn format_set_properties(item: &Item, data: &GameData) -> Vec<FormattedProperty> {
    to_properties(item.set_attributes.iter().flatten(), data, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprintf_fills_slots_in_order() {
        let out = sprintf(
            Some("%d%% Chance to cast level %d %s on striking"),
            &["10".into(), "3".into(), "Frost Nova".into()],
        );
        assert_eq!(out, "10% Chance to cast level 3 Frost Nova on striking");
    }

    #[test]
    fn sprintf_plus_slot_prefixes_sign() {
        assert_eq!(
            sprintf(Some("%+d to Strength"), &["5".into()]),
            "+5 to Strength"
        );
    }

    #[test]
    fn sprintf_without_template_joins_args() {
        assert_eq!(sprintf(None, &["a".into(), "b".into()]), "a b");
    }

    #[test]
    fn sprintf_missing_argument_prints_nothing() {
        assert_eq!(sprintf(Some("%d-%d"), &["1".into()]), "1-");
    }

    #[test]
    fn humanize_strips_prefix_and_capitalizes_words() {
        assert_eq!(humanize("item_fire_resist"), "Fire Resist");
        assert_eq!(humanize("stat_400"), "Stat 400");
    }

    #[test]
    fn plain_number_drops_trailing_zero() {
        assert_eq!(plain_number(1.0), "1");
        assert_eq!(plain_number(0.5), "0.5");
    }
}
