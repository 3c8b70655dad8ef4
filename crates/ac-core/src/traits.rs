use crate::frame::CharGrid;
use crate::glyph::GlyphGrid;

/// Fournit le bitmap d'un caractère.
///
/// Implémenté par : `BitmapGlyphs`.
///
/// CONTRAT : déterministe, pur, ne échoue jamais pour un caractère de la
/// plage imprimable 32–126.
///
/// # Example
/// ```
/// use ac_core::traits::GlyphSource;
/// use ac_core::glyph::GlyphGrid;
///
/// struct Solid;
/// impl GlyphSource for Solid {
///     fn glyph(&self, _c: char) -> GlyphGrid { GlyphGrid::from_fn(4, 4, |_, _| true) }
/// }
/// assert_eq!(Solid.glyph('x').count_on(), 16);
/// ```
pub trait GlyphSource {
    /// Bitmap of `c`.
    fn glyph(&self, c: char) -> GlyphGrid;
}

/// Consomme une grille de caractères (console, fichier HTML…).
///
/// # Example
/// ```
/// use ac_core::traits::AsciiOutput;
/// use ac_core::frame::CharGrid;
///
/// struct Discard;
/// impl AsciiOutput for Discard {
///     fn out(&mut self, _grid: &CharGrid) -> anyhow::Result<()> { Ok(()) }
///     fn name(&self) -> &'static str { "discard" }
/// }
/// ```
pub trait AsciiOutput {
    /// Emit `grid`.
    ///
    /// # Errors
    /// Returns an error if the underlying sink cannot be written.
    fn out(&mut self, grid: &CharGrid) -> anyhow::Result<()>;

    /// Nom lisible pour les logs.
    fn name(&self) -> &'static str;
}
