use ac_core::frame::{CharGrid, Image};
use ac_core::traits::GlyphSource;

use crate::brightness::{BrightnessMatrix, score_tiles};
use crate::cache::ConversionCache;
use crate::matcher::{CharBrightnessIndex, MatchError};
use crate::partition::pad;

/// Pipeline de conversion image → grille de caractères.
///
/// pad → tile → score (or reuse the cached matrix) → index lookup per tile.
/// The pipeline owns its [`ConversionCache`]; the index is borrowed so the
/// caller can keep mutating it between runs without invalidating the cache.
///
/// # Example
/// ```
/// use ac_core::frame::{Image, Rgb};
/// use ac_ascii::matcher::CharBrightnessIndex;
/// use ac_ascii::pipeline::ConversionPipeline;
///
/// let img = Image::filled(8, 8, Rgb::WHITE);
/// let index = CharBrightnessIndex::new(" #".chars());
/// let mut pipeline = ConversionPipeline::new();
/// let grid = pipeline.convert(&img, 2, &index).unwrap();
/// assert_eq!(grid.lines(), vec!["  ", "  "]);
/// ```
#[derive(Debug)]
pub struct ConversionPipeline {
    cache: ConversionCache,
    parallel: bool,
}

impl Default for ConversionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionPipeline {
    /// Pipeline with an empty cache and parallel tile scoring.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: ConversionCache::new(),
            parallel: true,
        }
    }

    /// Enable or disable rayon tile scoring.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Shared cache, for inspection.
    #[must_use]
    pub fn cache(&self) -> &ConversionCache {
        &self.cache
    }

    /// Brightness matrix for (`image`, `resolution`), cached per instance.
    pub fn brightness(&mut self, image: &Image, resolution: u32) -> &BrightnessMatrix {
        let parallel = self.parallel;
        self.cache.get_or_compute(image, resolution, || {
            let padded = pad(image);
            score_tiles(&padded, resolution, parallel)
        })
    }

    /// Convertit `image` en grille de `resolution` caractères par ligne.
    ///
    /// The caller must choose a resolution dividing the padded width.
    ///
    /// # Errors
    /// Returns [`MatchError::EmptySet`] if `index` has no character.
    pub fn convert<G: GlyphSource>(
        &mut self,
        image: &Image,
        resolution: u32,
        index: &CharBrightnessIndex<G>,
    ) -> Result<CharGrid, MatchError> {
        if index.is_empty() {
            return Err(MatchError::EmptySet);
        }

        let matrix = self.brightness(image, resolution);
        let mut grid = CharGrid::new(matrix.cols(), matrix.rows());
        for row in 0..matrix.rows() {
            for col in 0..matrix.cols() {
                grid.set(col, row, index.match_brightness(matrix.get(row, col))?);
            }
        }

        log::info!(
            "conversion {}×{} → {}×{} caractères",
            image.width(),
            image.height(),
            grid.width(),
            grid.height()
        );
        Ok(grid)
    }
}
