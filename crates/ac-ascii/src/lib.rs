//! Moteur de conversion pour tilescii.
//!
//! Pads and tiles an image, scores each tile, and maps every score to the
//! character of closest glyph brightness.

pub mod brightness;
pub mod cache;
pub mod matcher;
pub mod partition;
pub mod pipeline;

pub use brightness::BrightnessMatrix;
pub use cache::ConversionCache;
pub use matcher::{CharBrightnessIndex, MatchError};
pub use pipeline::ConversionPipeline;
