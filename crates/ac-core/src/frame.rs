use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::CoreError;

/// Un pixel RGB, 8 bits par canal.
///
/// # Example
/// ```
/// use ac_core::frame::Rgb;
/// assert_eq!(Rgb::WHITE, Rgb::new(255, 255, 255));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure white, the padding colour.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Build a pixel from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Grey level of the same value on all three channels.
    #[must_use]
    pub const fn grey(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// Luminance perceptuelle BT.709, dans [0, 255].
    ///
    /// # Example
    /// ```
    /// use ac_core::frame::Rgb;
    /// assert!((Rgb::WHITE.luminance() - 255.0).abs() < 1e-9);
    /// assert_eq!(Rgb::BLACK.luminance(), 0.0);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn luminance(self) -> f64 {
        0.2126 * f64::from(self.r) + 0.7152 * f64::from(self.g) + 0.0722 * f64::from(self.b)
    }
}

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Identité d'instance d'une [`Image`], unique pour la durée du processus.
///
/// Deux images aux pixels identiques mais construites séparément ont des
/// identités différentes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(u64);

impl ImageId {
    fn fresh() -> Self {
        Self(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Image RGB immuable, stockée row-major.
///
/// Largeur et hauteur sont toujours > 0. `from_rows` / `from_raw_rgb`
/// valident les données décodées et renvoient une erreur ; `from_fn` /
/// `filled` servent aux opérations géométriques et paniquent sur une
/// dimension nulle.
///
/// # Example
/// ```
/// use ac_core::frame::{Image, Rgb};
/// let img = Image::from_rows(vec![vec![Rgb::BLACK, Rgb::WHITE]]).unwrap();
/// assert_eq!((img.width(), img.height()), (2, 1));
/// assert_eq!(img.pixel(1, 0), Rgb::WHITE);
/// ```
#[derive(Debug)]
pub struct Image {
    id: ImageId,
    pixels: Vec<Rgb>,
    width: u32,
    height: u32,
}

impl Image {
    /// Build an image from decoded rows.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if there are no rows or the
    /// rows are empty, and [`CoreError::RaggedRows`] if row lengths differ.
    pub fn from_rows(rows: Vec<Vec<Rgb>>) -> Result<Self, CoreError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(CoreError::RaggedRows {
                row,
                len: r.len(),
                expected: width,
            });
        }
        Ok(Self {
            id: ImageId::fresh(),
            pixels: rows.into_iter().flatten().collect(),
            width: width as u32,
            height: height as u32,
        })
    }

    /// Build an image from packed RGB bytes (3 bytes per pixel, row-major).
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if a dimension is zero or the
    /// buffer length is not `width * height * 3`.
    ///
    /// # Example
    /// ```
    /// use ac_core::frame::{Image, Rgb};
    /// let img = Image::from_raw_rgb(1, 2, &[0, 0, 0, 255, 255, 255]).unwrap();
    /// assert_eq!(img.pixel(0, 1), Rgb::WHITE);
    /// ```
    pub fn from_raw_rgb(width: u32, height: u32, data: &[u8]) -> Result<Self, CoreError> {
        let expected = width as usize * height as usize * 3;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self {
            id: ImageId::fresh(),
            pixels: data
                .chunks_exact(3)
                .map(|p| Rgb::new(p[0], p[1], p[2]))
                .collect(),
            width,
            height,
        })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    ///
    /// # Panics
    /// Panics if `width` or `height` is zero. Use [`Image::from_rows`] or
    /// [`Image::from_raw_rgb`] for untrusted dimensions.
    ///
    /// # Example
    /// ```
    /// use ac_core::frame::{Image, Rgb};
    /// let img = Image::from_fn(4, 2, |x, _| if x < 2 { Rgb::BLACK } else { Rgb::WHITE });
    /// assert_eq!(img.pixel(3, 1), Rgb::WHITE);
    /// ```
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgb) -> Self {
        assert!(width > 0 && height > 0, "image vide : {width}×{height}");
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            id: ImageId::fresh(),
            pixels,
            width,
            height,
        }
    }

    /// Image of a single colour.
    ///
    /// # Panics
    /// Panics if `width` or `height` is zero.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        assert!(width > 0 && height > 0, "image vide : {width}×{height}");
        Self {
            id: ImageId::fresh(),
            pixels: vec![color; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Instance identity.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ImageId {
        self.id
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Accès au pixel (x, y).
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// All pixels, row-major.
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Row `y` as a slice.
    #[must_use]
    pub fn row(&self, y: u32) -> &[Rgb] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }
}

/// Un clone est une nouvelle instance : même contenu, identité distincte.
impl Clone for Image {
    fn clone(&self) -> Self {
        Self {
            id: ImageId::fresh(),
            pixels: self.pixels.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Grille de caractères produite par la conversion, row-major.
///
/// # Example
/// ```
/// use ac_core::frame::CharGrid;
/// let mut grid = CharGrid::new(3, 2);
/// grid.set(2, 1, '@');
/// assert_eq!(grid.get(2, 1), '@');
/// assert_eq!(grid.lines(), vec!["   ".to_string(), "  @".to_string()]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharGrid {
    cells: Vec<char>,
    width: usize,
    height: usize,
}

impl CharGrid {
    /// Crée une grille remplie d'espaces.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![' '; width * height],
            width,
            height,
        }
    }

    /// Build a grid from row-major cells.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if `cells.len() != width * height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<char>) -> Result<Self, CoreError> {
        if cells.len() != width * height {
            return Err(CoreError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Width in characters.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in characters.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Character at (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> char {
        self.cells[y * self.width + x]
    }

    /// Set the character at (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, ch: char) {
        self.cells[y * self.width + x] = ch;
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        // chunks(0) panics; an empty grid has no rows anyway.
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    /// Rows rendered as strings.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.rows().map(|r| r.iter().collect()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_ragged_input() {
        let rows = vec![vec![Rgb::BLACK; 3], vec![Rgb::BLACK; 2]];
        let err = Image::from_rows(rows).unwrap_err();
        assert!(matches!(
            err,
            CoreError::RaggedRows {
                row: 1,
                len: 2,
                expected: 3
            }
        ));
    }

    #[test]
    fn from_rows_rejects_empty_input() {
        assert!(Image::from_rows(Vec::new()).is_err());
        assert!(Image::from_rows(vec![Vec::new()]).is_err());
    }

    #[test]
    fn from_raw_rgb_checks_length() {
        assert!(Image::from_raw_rgb(2, 2, &[0; 11]).is_err());
        assert!(Image::from_raw_rgb(0, 2, &[]).is_err());
        assert!(Image::from_raw_rgb(2, 2, &[0; 12]).is_ok());
    }

    #[test]
    fn clone_gets_fresh_identity() {
        let a = Image::filled(2, 2, Rgb::WHITE);
        let b = a.clone();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn row_slices_match_pixels() {
        let img = Image::from_fn(3, 2, |x, y| Rgb::grey((x + 10 * y) as u8));
        assert_eq!(img.row(1), &[Rgb::grey(10), Rgb::grey(11), Rgb::grey(12)]);
    }

    #[test]
    #[should_panic(expected = "image vide")]
    fn from_fn_rejects_zero_width() {
        let _ = Image::from_fn(0, 3, |_, _| Rgb::BLACK);
    }

    #[test]
    #[should_panic(expected = "image vide")]
    fn filled_rejects_zero_height() {
        let _ = Image::filled(2, 0, Rgb::WHITE);
    }

    #[test]
    fn empty_char_grid_has_no_lines() {
        let grid = CharGrid::new(0, 0);
        assert!(grid.lines().is_empty());
    }
}
