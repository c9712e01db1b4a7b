use thiserror::Error;

/// Failure raised while walking the save buffer.
///
/// Only `InvalidFormat` aborts a decode outright; every other kind stops the
/// section being read and the caller keeps whatever was decoded before it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid save format: {0}")]
    InvalidFormat(String),

    #[error("read of {width} bits at bit {bit} runs past end of {len}-byte buffer")]
    OutOfBounds { bit: usize, width: u32, len: usize },

    #[error("{section} section marker {marker:?} not found at byte {offset}")]
    MalformedSection {
        section: &'static str,
        marker: &'static str,
        offset: usize,
    },

    #[error("unknown {kind} id {id}")]
    UnknownId { kind: &'static str, id: String },

    #[error("unsupported save version {0}")]
    UnsupportedVersion(u32),
}

impl DecodeError {
    pub fn out_of_bounds(bit: usize, width: u32, len: usize) -> Self {
        Self::OutOfBounds { bit, width, len }
    }

    pub fn unknown_id(kind: &'static str, id: impl ToString) -> Self {
        Self::UnknownId {
            kind,
            id: id.to_string(),
        }
    }
}
