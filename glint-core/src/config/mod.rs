//! Configuration types and parsing
//!
//! Configuration is loaded once at startup from an embedded `face.toml`
//! and resolved into `FaceSettings` with per-field fallbacks.

mod toml;
mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
