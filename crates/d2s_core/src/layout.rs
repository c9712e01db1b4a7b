use serde::Serialize;

use crate::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Header,
    Attributes,
    Skills,
    Items,
    Corpse,
    Mercenary,
    Golem,
    Tail,
}

impl SectionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Attributes => "attributes",
            Self::Skills => "skills",
            Self::Items => "items",
            Self::Corpse => "corpse",
            Self::Mercenary => "mercenary",
            Self::Golem => "golem",
            Self::Tail => "tail",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionLayout {
    pub id: SectionId,
    pub range: ByteRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileLayout {
    pub file_len: usize,
    pub sections: Vec<SectionLayout>,
}

impl FileLayout {
    pub fn section(&self, id: SectionId) -> Option<&SectionLayout> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn validate(&self) -> Result<(), DecodeError> {
        let Some(first) = self.sections.first() else {
            return Err(DecodeError::InvalidFormat(
                "file layout must contain at least one section".to_string(),
            ));
        };

        if first.range.start != 0 {
            return Err(DecodeError::InvalidFormat(
                "layout does not start at byte 0".to_string(),
            ));
        }

        let mut expected = 0usize;
        for section in &self.sections {
            if section.range.start != expected {
                return Err(DecodeError::InvalidFormat(format!(
                    "layout gap/overlap around section {}: expected start {}, got {}",
                    section.id.as_str(),
                    expected,
                    section.range.start
                )));
            }
            if section.range.end < section.range.start {
                return Err(DecodeError::InvalidFormat(format!(
                    "invalid section range {}: {}..{}",
                    section.id.as_str(),
                    section.range.start,
                    section.range.end
                )));
            }
            expected = section.range.end;
        }

        if expected != self.file_len {
            return Err(DecodeError::InvalidFormat(format!(
                "layout does not cover file: ended at {}, file length {}",
                expected, self.file_len
            )));
        }

        Ok(())
    }
}
