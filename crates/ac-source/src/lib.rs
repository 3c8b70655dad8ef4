//! Image loading for tilescii.

pub mod image;

pub use crate::image::{decode_image, load_image};
