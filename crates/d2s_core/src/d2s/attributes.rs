use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DecodeError;
use crate::reader::{BitReader, BitWriter};

use super::types::{
    ATTR_DEXTERITY, ATTR_ENERGY, ATTR_LEVEL, ATTR_STRENGTH, ATTR_VITALITY, ATTRIBUTE_WIDTHS,
    FIXED_POINT_ATTRIBUTES, FIXED_POINT_SCALE, STAT_ID_BITS, STAT_LIST_END, attribute_name,
    attribute_width,
};

/// Base character attributes keyed by stat id. Absent ids read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet {
    values: BTreeMap<u16, i64>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u16) -> i64 {
        self.values.get(&id).copied().unwrap_or(0)
    }

    pub fn contains(&self, id: u16) -> bool {
        self.values.contains_key(&id)
    }

    pub fn insert(&mut self, id: u16, value: i64) {
        self.values.insert(id, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, i64)> + '_ {
        self.values.iter().map(|(&id, &v)| (id, v))
    }

    /// Every attribute id with a display name, zero-filled when absent.
    pub fn named(&self) -> Vec<(&'static str, i64)> {
        ATTRIBUTE_WIDTHS
            .iter()
            .filter_map(|&(id, _)| attribute_name(id).map(|name| (name, self.get(id))))
            .collect()
    }

    pub fn strength(&self) -> i64 {
        self.get(ATTR_STRENGTH)
    }

    pub fn dexterity(&self) -> i64 {
        self.get(ATTR_DEXTERITY)
    }

    pub fn vitality(&self) -> i64 {
        self.get(ATTR_VITALITY)
    }

    pub fn energy(&self) -> i64 {
        self.get(ATTR_ENERGY)
    }

    pub fn level(&self) -> i64 {
        self.get(ATTR_LEVEL)
    }
}

impl FromIterator<(u16, i64)> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = (u16, i64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Result of walking one attribute stream.
#[derive(Debug, Clone)]
pub struct AttributeStream {
    pub attributes: AttributeSet,
    /// Bit position after the last field consumed.
    pub end_bit: usize,
    /// The end-of-list id was reached.
    pub terminated: bool,
    /// Why decoding stopped early, if it did.
    pub stop: Option<DecodeError>,
}

impl AttributeStream {
    /// First byte after the stream, padding included.
    pub fn end_byte(&self) -> usize {
        self.end_bit.div_ceil(8)
    }
}

/// Decode `(9-bit id, value)` pairs starting at `start_byte` until the
/// end-of-list id. An unmapped id or a truncated buffer stops the walk and
/// keeps everything read so far.
pub fn decode_attributes(bytes: &[u8], start_byte: usize) -> AttributeStream {
    let mut r = BitReader::at_byte(bytes, start_byte);
    let mut attributes = AttributeSet::new();
    let mut stop = None;
    let mut terminated = false;

    for _ in 0..=ATTRIBUTE_WIDTHS.len() {
        let id = match r.read_bits(STAT_ID_BITS) {
            Ok(id) => id as u16,
            Err(e) => {
                stop = Some(e);
                break;
            }
        };
        if id == STAT_LIST_END {
            terminated = true;
            break;
        }

        let Some(width) = attribute_width(id) else {
            warn!(id, bit = r.position(), "unmapped attribute id, stopping");
            stop = Some(DecodeError::unknown_id("attribute", id));
            break;
        };

        let raw = match r.read_bits(width) {
            Ok(raw) => i64::from(raw),
            Err(e) => {
                stop = Some(e);
                break;
            }
        };
        let value = if FIXED_POINT_ATTRIBUTES.contains(&id) {
            raw.div_euclid(FIXED_POINT_SCALE)
        } else {
            raw
        };
        attributes.insert(id, value);
    }

    if let Some(e) = &stop {
        warn!(error = %e, decoded = attributes.len(), "attribute stream ended early");
    } else if !terminated {
        warn!("attribute stream exceeded the known id count");
    }
    debug!(count = attributes.len(), end_bit = r.position(), "decoded attributes");

    AttributeStream {
        attributes,
        end_bit: r.position(),
        terminated,
        stop,
    }
}

/// Inverse of [`decode_attributes`]: known ids in ascending order, fixed-point
/// ids scaled back up, then the end-of-list id. Values wider than their field
/// are truncated to it; unmapped ids are skipped.
pub fn encode_attributes(attributes: &AttributeSet) -> Vec<u8> {
    let mut w = BitWriter::new();
    for (id, value) in attributes.iter() {
        let Some(width) = attribute_width(id) else {
            continue;
        };
        let stored = if FIXED_POINT_ATTRIBUTES.contains(&id) {
            value * FIXED_POINT_SCALE
        } else {
            value
        };
        w.write_bits(u32::from(id), STAT_ID_BITS);
        w.write_bits(stored as u32, width);
    }
    w.write_bits(u32::from(STAT_LIST_END), STAT_ID_BITS);
    w.into_bytes()
}
