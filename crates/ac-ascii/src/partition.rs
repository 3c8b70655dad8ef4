use std::borrow::Cow;

use ac_core::frame::{Image, Rgb};

const MAX_POWER_OF_TWO: u32 = 1 << 31;

/// Plus petite puissance de deux ≥ `n`.
///
/// `next_power_of_two(0)` vaut 1. Above `2^31` no `u32` power of two fits;
/// the result saturates at `2^31`.
///
/// # Example
/// ```
/// use ac_ascii::partition::next_power_of_two;
/// assert_eq!(next_power_of_two(0), 1);
/// assert_eq!(next_power_of_two(1), 1);
/// assert_eq!(next_power_of_two(10), 16);
/// assert_eq!(next_power_of_two(16), 16);
/// ```
#[must_use]
pub fn next_power_of_two(n: u32) -> u32 {
    n.checked_next_power_of_two().unwrap_or(MAX_POWER_OF_TWO)
}

/// Agrandit l'image en blanc jusqu'aux puissances de deux, original centré.
///
/// Returns the input borrowed (no copy) when both dimensions are already
/// powers of two. Otherwise the original sits at offset
/// `((newW - w) / 2, (newH - h) / 2)` in a white canvas.
///
/// # Example
/// ```
/// use ac_core::frame::{Image, Rgb};
/// use ac_ascii::partition::pad;
/// let img = Image::filled(3, 4, Rgb::BLACK);
/// let padded = pad(&img);
/// assert_eq!((padded.width(), padded.height()), (4, 4));
/// assert_eq!(padded.pixel(3, 0), Rgb::WHITE);
/// assert_eq!(padded.pixel(0, 0), Rgb::BLACK);
/// ```
#[must_use]
pub fn pad(image: &Image) -> Cow<'_, Image> {
    let (w, h) = (image.width(), image.height());
    let new_w = next_power_of_two(w);
    let new_h = next_power_of_two(h);

    if new_w == w && new_h == h {
        return Cow::Borrowed(image);
    }

    let left = new_w.saturating_sub(w) / 2;
    let top = new_h.saturating_sub(h) / 2;
    log::trace!("pad {w}×{h} → {new_w}×{new_h} (offset {left},{top})");

    Cow::Owned(Image::from_fn(new_w, new_h, |x, y| {
        let inside = (left..left + w).contains(&x) && (top..top + h).contains(&y);
        if inside {
            image.pixel(x - left, y - top)
        } else {
            Rgb::WHITE
        }
    }))
}

/// Géométrie du découpage d'une image en tuiles carrées.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGeometry {
    /// Côté d'une tuile en pixels.
    pub tile_size: u32,
    /// Nombre de lignes de tuiles.
    pub rows: u32,
    /// Nombre de colonnes de tuiles (= résolution).
    pub cols: u32,
}

impl TileGeometry {
    /// Geometry for `resolution` tiles per row over a `width × height` image.
    ///
    /// `tile_size = width / resolution` (integer division) and
    /// `rows = height / tile_size`. A zero tile size yields an empty
    /// geometry (no tile) instead of dividing by zero.
    ///
    /// # Example
    /// ```
    /// use ac_ascii::partition::TileGeometry;
    /// let g = TileGeometry::new(16, 8, 4);
    /// assert_eq!((g.tile_size, g.rows, g.cols), (4, 2, 4));
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32, resolution: u32) -> Self {
        let tile_size = width.checked_div(resolution).unwrap_or(0);
        if tile_size == 0 {
            return Self {
                tile_size: 0,
                rows: 0,
                cols: 0,
            };
        }
        Self {
            tile_size,
            rows: height / tile_size,
            cols: resolution,
        }
    }

    /// Total number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// `true` when no tile fits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Copie la tuile (`row`, `col`) de `image` selon `geometry`.
#[must_use]
pub fn tile(image: &Image, geometry: TileGeometry, row: u32, col: u32) -> Image {
    let size = geometry.tile_size;
    let (x0, y0) = (col * size, row * size);
    Image::from_fn(size, size, |x, y| image.pixel(x0 + x, y0 + y))
}

/// Découpe une image (déjà paddée) en `rows × resolution` tuiles carrées.
///
/// The caller must pick a `resolution` dividing the width evenly; otherwise
/// the right/bottom remainder is silently dropped.
///
/// # Example
/// ```
/// use ac_core::frame::{Image, Rgb};
/// use ac_ascii::partition::divide;
/// let img = Image::filled(8, 4, Rgb::WHITE);
/// let tiles = divide(&img, 4);
/// assert_eq!(tiles.len(), 2);
/// assert_eq!(tiles[0].len(), 4);
/// assert_eq!(tiles[1][3].width(), 2);
/// ```
#[must_use]
pub fn divide(image: &Image, resolution: u32) -> Vec<Vec<Image>> {
    let geometry = TileGeometry::new(image.width(), image.height(), resolution);
    (0..geometry.rows)
        .map(|r| (0..geometry.cols).map(|c| tile(image, geometry, r, c)).collect())
        .collect()
}
