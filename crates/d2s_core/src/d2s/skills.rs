use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::character_class::CharacterClass;
use crate::error::DecodeError;
use crate::reader::ByteReader;

use super::types::{CLASSIC_SKILL_COUNT, EXTENDED_SKILL_COUNT, SKILLS_MARKER};

/// Which skill table layout the save was written with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ruleset {
    /// 30 contiguous skills per class.
    Classic,
    /// 30 contiguous skills followed by three extra non-contiguous ids.
    #[default]
    Extended,
}

impl Ruleset {
    pub fn skill_count(&self) -> usize {
        match self {
            Self::Classic => CLASSIC_SKILL_COUNT,
            Self::Extended => EXTENDED_SKILL_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: u16,
    pub name: String,
    pub points: u8,
}

#[derive(Debug, Clone, Default)]
pub struct SkillTable {
    pub skills: Vec<Skill>,
    /// First byte after the section.
    pub end: usize,
    /// The buffer ended before every slot was read.
    pub truncated: bool,
}

/// Skill ids in save order for `class`.
pub fn skill_ids(class: CharacterClass, ruleset: Ruleset) -> Option<Vec<u16>> {
    let base = class.skill_base()?;
    let mut ids: Vec<u16> = (0..CLASSIC_SKILL_COUNT as u16).map(|i| base + i).collect();
    if ruleset == Ruleset::Extended {
        ids.extend(class.extended_skills()?);
    }
    Some(ids)
}

/// Read the marker and one point byte per skill slot at `offset`.
///
/// A level 1 character may not have a skill section yet, so a missing marker
/// there yields an empty table; anywhere else it is a malformed save.
pub fn decode_skills(
    bytes: &[u8],
    offset: usize,
    class: CharacterClass,
    level: u8,
    ruleset: Ruleset,
    name_of: impl Fn(usize, u16) -> String,
) -> Result<SkillTable, DecodeError> {
    let r = ByteReader::new(bytes);
    if !r.has_marker(offset, SKILLS_MARKER) {
        if level <= 1 {
            debug!(offset, "no skill section on a level 1 character");
            return Ok(SkillTable {
                skills: Vec::new(),
                end: offset,
                truncated: false,
            });
        }
        return Err(DecodeError::MalformedSection {
            section: "skills",
            marker: "if",
            offset,
        });
    }

    let start = offset + SKILLS_MARKER.len();
    let wanted = ruleset.skill_count();
    let count = wanted.min(r.len().saturating_sub(start));
    let truncated = count < wanted;
    if truncated {
        warn!(offset, wanted, available = count, "skill section truncated");
    }
    let points = r.read_bytes(start, count)?;
    let end = start + count;

    let Some(ids) = skill_ids(class, ruleset) else {
        warn!(class = %class, "no skill layout for class, skills left empty");
        return Ok(SkillTable {
            skills: Vec::new(),
            end,
            truncated,
        });
    };

    let skills = ids
        .iter()
        .zip(points)
        .enumerate()
        .map(|(index, (&id, &points))| Skill {
            id,
            name: name_of(index, id),
            points,
        })
        .collect();

    Ok(SkillTable {
        skills,
        end,
        truncated,
    })
}
