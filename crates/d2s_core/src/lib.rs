pub mod character_class;
pub mod core_api;
pub mod d2s;
pub mod derived;
pub mod error;
pub mod layout;
pub mod properties;
pub mod reader;
pub mod tables;
