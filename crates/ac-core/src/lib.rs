//! Shared types, traits, and configuration for tilescii.
//!
//! This crate contains the image and character-grid types, the glyph table,
//! and the configuration layer used across the tilescii workspace.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod glyph;
pub mod traits;

pub use config::ConvertConfig;
pub use error::CoreError;
pub use frame::{CharGrid, Image, ImageId, Rgb};
pub use glyph::{BitmapGlyphs, GlyphGrid};
pub use traits::{AsciiOutput, GlyphSource};
