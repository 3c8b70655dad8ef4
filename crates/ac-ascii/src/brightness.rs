use ac_core::frame::Image;
use ac_core::glyph::GlyphGrid;
use rayon::prelude::*;

use crate::partition::divide;

/// Luminosité moyenne d'une image, normalisée dans [0, 1].
///
/// Per-pixel BT.709 luminance, averaged, divided by 255.
///
/// # Example
/// ```
/// use ac_core::frame::{Image, Rgb};
/// use ac_ascii::brightness::pixel_brightness;
/// assert_eq!(pixel_brightness(&Image::filled(2, 2, Rgb::BLACK)), 0.0);
/// assert!((pixel_brightness(&Image::filled(2, 2, Rgb::WHITE)) - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn pixel_brightness(image: &Image) -> f64 {
    let pixels = image.pixels();
    if pixels.is_empty() {
        return 0.0;
    }
    let total: f64 = pixels.iter().map(|p| p.luminance()).sum();
    (total / pixels.len() as f64 / 255.0).clamp(0.0, 1.0)
}

/// Fraction de cellules allumées d'un glyphe, dans [0, 1].
///
/// # Example
/// ```
/// use ac_core::glyph::GlyphGrid;
/// use ac_ascii::brightness::glyph_brightness;
/// let g = GlyphGrid::from_fn(16, 16, |x, _| x < 4);
/// assert_eq!(glyph_brightness(&g), 0.25);
/// ```
#[must_use]
pub fn glyph_brightness(glyph: &GlyphGrid) -> f64 {
    if glyph.is_empty() {
        return 0.0;
    }
    glyph.count_on() as f64 / glyph.len() as f64
}

/// Matrice de luminosités par tuile, row-major (`rows × cols`).
#[derive(Clone, Debug, PartialEq)]
pub struct BrightnessMatrix {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl BrightnessMatrix {
    /// Wrap row-major values.
    ///
    /// # Panics
    /// Panics if `values.len() != rows * cols`.
    #[must_use]
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> Self {
        assert_eq!(values.len(), rows * cols, "brightness matrix shape mismatch");
        Self { values, rows, cols }
    }

    /// Number of tile rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of tile columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at (`row`, `col`).
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    /// All values, row-major.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Calcule la luminosité de chaque tuile d'une image paddée.
///
/// Tiles come from [`divide`]. They are independent: with `parallel` they
/// are scored on the rayon pool, and `collect` keeps row-major order either way.
///
/// # Example
/// ```
/// use ac_core::frame::{Image, Rgb};
/// use ac_ascii::brightness::score_tiles;
/// let img = Image::from_fn(4, 4, |x, _| if x < 2 { Rgb::BLACK } else { Rgb::WHITE });
/// let m = score_tiles(&img, 2, true);
/// assert_eq!((m.rows(), m.cols()), (2, 2));
/// assert_eq!(m.get(1, 0), 0.0);
/// ```
#[must_use]
pub fn score_tiles(padded: &Image, resolution: u32, parallel: bool) -> BrightnessMatrix {
    let tiles = divide(padded, resolution);
    let rows = tiles.len();
    let cols = tiles.first().map_or(0, Vec::len);
    let tiles: Vec<Image> = tiles.into_iter().flatten().collect();

    let values: Vec<f64> = if parallel {
        tiles.par_iter().map(pixel_brightness).collect()
    } else {
        tiles.iter().map(pixel_brightness).collect()
    };

    BrightnessMatrix::new(rows, cols, values)
}
