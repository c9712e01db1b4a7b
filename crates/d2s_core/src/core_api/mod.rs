mod engine;
mod error;
mod item_view;
mod types;

pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode};
pub use item_view::{GridPosition, ItemView, SocketEntry};
pub use types::{Character, EquippedItem, ParseMethod, SkillEntry, StatEntry};
