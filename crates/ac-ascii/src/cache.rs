use ac_core::frame::{Image, ImageId};

use crate::brightness::BrightnessMatrix;

/// Entrée unique du cache : (identité d'image, résolution, matrice).
#[derive(Debug)]
struct CacheEntry {
    image: ImageId,
    resolution: u32,
    matrix: BrightnessMatrix,
}

/// Mémorise la matrice de luminosités de la dernière conversion.
///
/// Identity is per image *instance* ([`ImageId`]): a clone or a reload of the
/// same file is a miss. At most one entry is kept; any miss replaces it.
///
/// # Example
/// ```
/// use ac_core::frame::{Image, Rgb};
/// use ac_ascii::brightness::BrightnessMatrix;
/// use ac_ascii::cache::ConversionCache;
///
/// let img = Image::filled(4, 4, Rgb::WHITE);
/// let mut cache = ConversionCache::new();
/// let mut calls = 0;
/// for _ in 0..3 {
///     cache.get_or_compute(&img, 2, || {
///         calls += 1;
///         BrightnessMatrix::new(1, 1, vec![1.0])
///     });
/// }
/// assert_eq!(calls, 1);
/// ```
#[derive(Debug, Default)]
pub struct ConversionCache {
    entry: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

impl ConversionCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if the entry matches `image` and `resolution`.
    #[must_use]
    pub fn is_cached(&self, image: &Image, resolution: u32) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|e| e.image == image.id() && e.resolution == resolution)
    }

    /// Matrice en cache si (image, résolution) correspond, sinon `compute`.
    ///
    /// On a miss the result of `compute` becomes the sole entry.
    pub fn get_or_compute(
        &mut self,
        image: &Image,
        resolution: u32,
        compute: impl FnOnce() -> BrightnessMatrix,
    ) -> &BrightnessMatrix {
        if self.is_cached(image, resolution) {
            self.hits += 1;
            log::debug!("cache hit ({:?}, res {resolution})", image.id());
        } else {
            self.misses += 1;
            log::debug!("cache miss ({:?}, res {resolution})", image.id());
            self.entry = None;
        }
        let entry = self.entry.get_or_insert_with(|| CacheEntry {
            image: image.id(),
            resolution,
            matrix: compute(),
        });
        &entry.matrix
    }

    /// Drop the entry.
    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// Lookups answered from the entry.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that ran `compute`.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_core::frame::Rgb;
    use std::cell::Cell;

    fn matrix(v: f64) -> BrightnessMatrix {
        BrightnessMatrix::new(1, 1, vec![v])
    }

    #[test]
    fn same_image_and_resolution_computes_once() {
        let img = Image::filled(4, 4, Rgb::BLACK);
        let mut cache = ConversionCache::new();
        let calls = Cell::new(0);
        let first = cache
            .get_or_compute(&img, 2, || {
                calls.set(calls.get() + 1);
                matrix(0.25)
            })
            .clone();
        let second = cache
            .get_or_compute(&img, 2, || {
                calls.set(calls.get() + 1);
                matrix(0.75)
            })
            .clone();
        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn new_resolution_evicts_previous_entry() {
        let img = Image::filled(4, 4, Rgb::BLACK);
        let mut cache = ConversionCache::new();
        cache.get_or_compute(&img, 2, || matrix(0.1));
        let m = cache.get_or_compute(&img, 4, || matrix(0.2)).clone();
        assert_eq!(m, matrix(0.2));
        assert!(!cache.is_cached(&img, 2));
        assert!(cache.is_cached(&img, 4));
        // Back to 2: recomputed, the old entry is gone.
        let m = cache.get_or_compute(&img, 2, || matrix(0.3)).clone();
        assert_eq!(m, matrix(0.3));
        assert_eq!(cache.misses(), 3);
    }

    #[test]
    fn equal_content_different_instance_is_a_miss() {
        let a = Image::filled(4, 4, Rgb::WHITE);
        let b = a.clone();
        let mut cache = ConversionCache::new();
        cache.get_or_compute(&a, 1, || matrix(1.0));
        assert!(!cache.is_cached(&b, 1));
        cache.get_or_compute(&b, 1, || matrix(1.0));
        assert_eq!(cache.misses(), 2);
        assert!(!cache.is_cached(&a, 1));
    }

    #[test]
    fn clear_forces_recompute() {
        let img = Image::filled(2, 2, Rgb::WHITE);
        let mut cache = ConversionCache::new();
        cache.get_or_compute(&img, 1, || matrix(1.0));
        cache.clear();
        assert!(!cache.is_cached(&img, 1));
    }
}
