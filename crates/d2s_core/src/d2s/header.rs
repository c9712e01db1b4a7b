use std::fmt;

use serde::{Deserialize, Serialize};

use crate::character_class::CharacterClass;
use crate::error::DecodeError;
use crate::reader::ByteReader;

use super::types::{
    DIFFICULTY_ACTIVE, MAGIC, MIN_HEADER_LEN, NAME_LEN, OFFSET_CHECKSUM, OFFSET_CLASS,
    OFFSET_DIFFICULTY, OFFSET_FILE_SIZE, OFFSET_LAST_PLAYED, OFFSET_LEVEL, OFFSET_MERCENARY_ID,
    OFFSET_NAME, OFFSET_PROGRESSION, OFFSET_STATUS, OFFSET_VERSION, STATUS_DIED,
    STATUS_EXPANSION, STATUS_HARDCORE, STATUS_LADDER,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlags {
    pub hardcore: bool,
    pub died: bool,
    pub expansion: bool,
    pub ladder: bool,
}

impl StatusFlags {
    pub fn from_raw(raw: u8) -> Self {
        Self {
            hardcore: raw & STATUS_HARDCORE != 0,
            died: raw & STATUS_DIED != 0,
            expansion: raw & STATUS_EXPANSION != 0,
            ladder: raw & STATUS_LADDER != 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Normal,
    Nightmare,
    Hell,
}

impl Difficulty {
    /// The highest difficulty whose progress byte carries the active bit.
    pub fn from_progress(progress: [u8; 3]) -> Self {
        if progress[2] & DIFFICULTY_ACTIVE != 0 {
            Self::Hell
        } else if progress[1] & DIFFICULTY_ACTIVE != 0 {
            Self::Nightmare
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Nightmare => "Nightmare",
            Self::Hell => "Hell",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub version: u32,
    pub file_size: u32,
    pub checksum: u32,
    pub name: String,
    pub status: StatusFlags,
    pub progression: u8,
    pub class: CharacterClass,
    pub level: u8,
    /// Unix seconds; `None` when the save was never played.
    pub last_played: Option<u32>,
    pub difficulty_progress: [u8; 3],
    pub mercenary_id: Option<u32>,
}

impl Header {
    /// Validate magic and length, then read the fixed-offset fields.
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < MIN_HEADER_LEN {
            return Err(DecodeError::InvalidFormat(format!(
                "file is {} bytes, shorter than the {MIN_HEADER_LEN}-byte header",
                bytes.len()
            )));
        }

        let r = ByteReader::new(bytes);
        let magic = r.read_u32(0)?;
        if magic != MAGIC {
            return Err(DecodeError::InvalidFormat(format!(
                "bad magic 0x{magic:08X}, expected 0x{MAGIC:08X}"
            )));
        }

        let progress = r.read_bytes(OFFSET_DIFFICULTY, 3)?;
        let last_played = r.read_u32(OFFSET_LAST_PLAYED)?;
        let mercenary_id = r.read_u32(OFFSET_MERCENARY_ID)?;

        Ok(Self {
            version: r.read_u32(OFFSET_VERSION)?,
            file_size: r.read_u32(OFFSET_FILE_SIZE)?,
            checksum: r.read_u32(OFFSET_CHECKSUM)?,
            name: r.read_fixed_string(OFFSET_NAME, NAME_LEN)?,
            status: StatusFlags::from_raw(r.read_u8(OFFSET_STATUS)?),
            progression: r.read_u8(OFFSET_PROGRESSION)?,
            class: CharacterClass::from_raw(r.read_u8(OFFSET_CLASS)?),
            level: r.read_u8(OFFSET_LEVEL)?,
            last_played: (last_played != 0).then_some(last_played),
            difficulty_progress: [progress[0], progress[1], progress[2]],
            mercenary_id: (mercenary_id != 0).then_some(mercenary_id),
        })
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_progress(self.difficulty_progress)
    }
}
