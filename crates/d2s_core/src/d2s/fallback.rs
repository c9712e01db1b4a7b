//! Marker-scanning decode used when the full decoder cannot run.
//!
//! Only the base attributes and the 30 classic skill bytes are recovered.
//! Neither marker is required: a save without them yields defaults.

use tracing::{debug, warn};

use crate::reader::ByteReader;

use super::attributes::{AttributeSet, decode_attributes};
use super::header::Header;
use super::skills::Skill;
use super::types::{
    ATTRIBUTE_SCAN_END, ATTRIBUTES_MARKER, CLASS_SKILL_NAMES, CLASSIC_SKILL_COUNT, SCAN_START,
    SKILL_SCAN_END, SKILLS_MARKER,
};

#[derive(Debug, Clone, Default)]
pub struct BasicDecode {
    pub attributes: AttributeSet,
    /// All 30 classic slots, zero points included.
    pub skills: Vec<Skill>,
    pub notices: Vec<String>,
}

pub fn scan(bytes: &[u8], header: &Header) -> BasicDecode {
    let r = ByteReader::new(bytes);
    let mut out = BasicDecode::default();

    let mut skill_scan_start = SCAN_START;
    match r.find_marker(ATTRIBUTES_MARKER, SCAN_START, ATTRIBUTE_SCAN_END) {
        Some(offset) => {
            let stream = decode_attributes(bytes, offset + ATTRIBUTES_MARKER.len());
            if let Some(e) = &stream.stop {
                out.notices
                    .push(format!("attributes decoded partially: {e}"));
            }
            skill_scan_start = skill_scan_start.max(stream.end_byte());
            debug!(offset, count = stream.attributes.len(), "scanned attributes");
            out.attributes = stream.attributes;
        }
        None => {
            warn!("attribute marker not found, using defaults");
            out.notices.push("attribute section not found".to_string());
        }
    }

    match r.find_marker(SKILLS_MARKER, skill_scan_start, SKILL_SCAN_END) {
        Some(offset) => {
            let start = offset + SKILLS_MARKER.len();
            match r.read_bytes(start, CLASSIC_SKILL_COUNT) {
                Ok(points) => out.skills = classic_skills(header, points),
                Err(_) => {
                    warn!(offset, "skill section truncated");
                    out.notices.push("skill section truncated".to_string());
                }
            }
        }
        None => {
            warn!("skill marker not found, skills left empty");
            out.notices.push("skill section not found".to_string());
        }
    }

    out
}

fn classic_skills(header: &Header, points: &[u8]) -> Vec<Skill> {
    let names = CLASS_SKILL_NAMES.get(usize::from(header.class.raw()));
    let base = header.class.skill_base();
    points
        .iter()
        .enumerate()
        .map(|(index, &points)| {
            let name = names
                .and_then(|names| names.get(index))
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("Skill {}", index + 1));
            Skill {
                id: base.unwrap_or(0) + index as u16,
                name,
                points,
            }
        })
        .collect()
}
