use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use ac_core::glyph::BitmapGlyphs;
use ac_core::traits::GlyphSource;
use thiserror::Error;

use crate::brightness::glyph_brightness;

/// Errors raised by brightness lookup.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// No character is registered.
    #[error("Character set is empty.")]
    EmptySet,
}

/// Clé de luminosité brute, ordonnée totalement.
#[derive(Clone, Copy, Debug)]
struct BrightnessKey(f64);

impl PartialEq for BrightnessKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BrightnessKey {}

impl PartialOrd for BrightnessKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BrightnessKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Index ordonné luminosité brute → caractères.
///
/// Each key holds the characters sharing that exact raw brightness, in
/// code-point order. Empty keys are removed, and every registered character
/// lives under exactly one key.
///
/// Lookup stretches the target linearly over the `[lo, hi]` range actually
/// present, then picks the nearest key (floor wins ties) and returns its
/// lowest code point.
///
/// # Example
/// ```
/// use ac_ascii::matcher::CharBrightnessIndex;
/// let mut index = CharBrightnessIndex::new(" #".chars());
/// assert_eq!(index.match_brightness(1.0).unwrap(), ' ');
/// assert_eq!(index.match_brightness(0.0).unwrap(), '#');
/// index.set_reverse(true);
/// assert_eq!(index.match_brightness(1.0).unwrap(), '#');
/// ```
pub struct CharBrightnessIndex<G = BitmapGlyphs> {
    glyphs: G,
    by_brightness: BTreeMap<BrightnessKey, BTreeSet<char>>,
    by_char: BTreeMap<char, BrightnessKey>,
    reverse: bool,
}

impl CharBrightnessIndex<BitmapGlyphs> {
    /// Index over the built-in glyph table.
    #[must_use]
    pub fn new(chars: impl IntoIterator<Item = char>) -> Self {
        Self::with_glyphs(BitmapGlyphs, chars)
    }
}

impl<G: GlyphSource> CharBrightnessIndex<G> {
    /// Index using `glyphs` to compute raw brightness.
    pub fn with_glyphs(glyphs: G, chars: impl IntoIterator<Item = char>) -> Self {
        let mut index = Self {
            glyphs,
            by_brightness: BTreeMap::new(),
            by_char: BTreeMap::new(),
            reverse: false,
        };
        for c in chars {
            index.add(c);
        }
        index
    }

    /// Fraction of lit cells in the glyph of `c`.
    #[must_use]
    pub fn glyph_brightness(&self, c: char) -> f64 {
        glyph_brightness(&self.glyphs.glyph(c))
    }

    /// Register `c`. No-op if already present.
    pub fn add(&mut self, c: char) {
        if self.by_char.contains_key(&c) {
            return;
        }
        let key = BrightnessKey(self.glyph_brightness(c));
        self.by_brightness.entry(key).or_default().insert(c);
        self.by_char.insert(c, key);
        log::debug!("add {c:?} @ {:.4}", key.0);
    }

    /// Unregister `c`. No-op if absent.
    pub fn remove(&mut self, c: char) {
        let Some(key) = self.by_char.remove(&c) else {
            return;
        };
        if let Some(set) = self.by_brightness.get_mut(&key) {
            set.remove(&c);
            if set.is_empty() {
                self.by_brightness.remove(&key);
            }
        }
        log::debug!("remove {c:?} @ {:.4}", key.0);
    }

    /// `true` if `c` is registered.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.by_char.contains_key(&c)
    }

    /// Raw brightness `c` is registered under.
    #[must_use]
    pub fn raw_brightness(&self, c: char) -> Option<f64> {
        self.by_char.get(&c).map(|k| k.0)
    }

    /// Tous les caractères enregistrés, par code point croissant.
    #[must_use]
    pub fn all_chars(&self) -> BTreeSet<char> {
        self.by_char.keys().copied().collect()
    }

    /// Number of registered characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_char.len()
    }

    /// `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_char.is_empty()
    }

    /// Number of distinct brightness levels.
    #[must_use]
    pub fn levels(&self) -> usize {
        self.by_brightness.len()
    }

    /// Inverse la correspondance clair/sombre.
    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
    }

    /// Current reverse flag.
    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    /// Caractère dont la luminosité normalisée est la plus proche de `target`.
    ///
    /// # Errors
    /// Returns [`MatchError::EmptySet`] if no character is registered.
    pub fn match_brightness(&self, target: f64) -> Result<char, MatchError> {
        let (Some((&lo, lo_set)), Some((&hi, _))) = (
            self.by_brightness.first_key_value(),
            self.by_brightness.last_key_value(),
        ) else {
            return Err(MatchError::EmptySet);
        };

        if lo == hi {
            return first_of(lo_set);
        }

        let target = if self.reverse { 1.0 - target } else { target };
        let raw = BrightnessKey(target * (hi.0 - lo.0) + lo.0);

        let floor = self.by_brightness.range(..=raw).next_back();
        let ceiling = self.by_brightness.range(raw..).next();

        match (floor, ceiling) {
            (Some((f, f_set)), Some((c, c_set))) => {
                if (raw.0 - f.0).abs() <= (c.0 - raw.0).abs() {
                    first_of(f_set)
                } else {
                    first_of(c_set)
                }
            }
            (Some((_, set)), None) | (None, Some((_, set))) => first_of(set),
            (None, None) => Err(MatchError::EmptySet),
        }
    }
}

fn first_of(set: &BTreeSet<char>) -> Result<char, MatchError> {
    set.first().copied().ok_or(MatchError::EmptySet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_core::glyph::GlyphGrid;

    /// Glyphes synthétiques : luminosité = valeur associée dans la table.
    struct Table(&'static [(char, usize)]);

    impl GlyphSource for Table {
        fn glyph(&self, c: char) -> GlyphGrid {
            let lit = self.0.iter().find(|(k, _)| *k == c).map_or(0, |(_, n)| *n);
            let mut i = 0;
            GlyphGrid::from_fn(10, 10, |_, _| {
                i += 1;
                i <= lit
            })
        }
    }

    const TENTHS: &[(char, usize)] = &[
        ('a', 10),
        ('b', 50),
        ('c', 90),
        ('d', 50),
        ('e', 30),
        ('f', 70),
        ('x', 0),
        ('y', 100),
    ];

    fn index(chars: &str) -> CharBrightnessIndex<Table> {
        CharBrightnessIndex::with_glyphs(Table(TENTHS), chars.chars())
    }

    #[test]
    fn empty_index_fails() {
        let idx = index("");
        assert_eq!(idx.match_brightness(0.5), Err(MatchError::EmptySet));
    }

    #[test]
    fn single_level_returns_lowest_code_point() {
        let idx = index("db");
        assert_eq!(idx.levels(), 1);
        for t in [0.0, 0.3, 1.0] {
            assert_eq!(idx.match_brightness(t), Ok('b'));
        }
    }

    #[test]
    fn exact_middle_key() {
        // {0.1, 0.5, 0.9}, target 0.5 → raw 0.5
        let idx = index("abc");
        assert_eq!(idx.match_brightness(0.5), Ok('b'));
        assert_eq!(idx.match_brightness(0.0), Ok('a'));
        assert_eq!(idx.match_brightness(1.0), Ok('c'));
    }

    #[test]
    fn equidistant_prefers_floor() {
        // {0.0, 1.0}: target 0.5 is exactly between.
        let idx = index("xy");
        assert_eq!(idx.match_brightness(0.5), Ok('x'));
    }

    #[test]
    fn nearest_key_wins() {
        // {0.1, 0.3, 0.9} → lo 0.1, hi 0.9. target 0.4 → raw 0.42, nearest 0.3.
        let idx = index("aec");
        assert_eq!(idx.match_brightness(0.4), Ok('e'));
        // target 0.8 → raw 0.74, nearest 0.9.
        assert_eq!(idx.match_brightness(0.8), Ok('c'));
    }

    #[test]
    fn shared_key_returns_lowest_code_point() {
        let idx = index("adc");
        assert_eq!(idx.match_brightness(0.5), Ok('d'));
        let idx = index("abcd");
        assert_eq!(idx.match_brightness(0.5), Ok('b'));
    }

    #[test]
    fn out_of_range_targets_clamp_to_bounds() {
        let idx = index("abc");
        assert_eq!(idx.match_brightness(-3.0), Ok('a'));
        assert_eq!(idx.match_brightness(7.0), Ok('c'));
    }

    #[test]
    fn reverse_mirrors_lookup() {
        let mut idx = index("abcef");
        let forward: Vec<char> = [0.0, 0.25, 0.6, 1.0]
            .iter()
            .map(|&t| idx.match_brightness(1.0 - t).unwrap())
            .collect();
        idx.set_reverse(true);
        assert!(idx.is_reverse());
        let reversed: Vec<char> = [0.0, 0.25, 0.6, 1.0]
            .iter()
            .map(|&t| idx.match_brightness(t).unwrap())
            .collect();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn remove_drops_empty_keys() {
        let mut idx = index("abd");
        assert_eq!(idx.levels(), 2);
        idx.remove('b');
        assert_eq!(idx.levels(), 2);
        idx.remove('d');
        assert_eq!(idx.levels(), 1);
        assert_eq!(idx.all_chars().into_iter().collect::<String>(), "a");
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut idx = index("ab");
        idx.remove('z');
        idx.remove('c');
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn add_is_idempotent() {
        let mut idx = index("ab");
        idx.add('a');
        idx.add('a');
        assert_eq!(idx.len(), 2);
        idx.remove('a');
        assert!(!idx.contains('a'));
    }

    #[test]
    fn remove_then_add_restores_behaviour() {
        let mut idx = index("abcef");
        let probes = [0.0, 0.1, 0.33, 0.5, 0.71, 0.9, 1.0];
        let before: Vec<_> = probes.iter().map(|&t| idx.match_brightness(t)).collect();
        idx.remove('e');
        idx.add('e');
        let after: Vec<_> = probes.iter().map(|&t| idx.match_brightness(t)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn result_is_always_registered() {
        let mut idx = index("abcdefxy");
        idx.remove('c');
        idx.remove('y');
        for i in 0..=20 {
            let ch = idx.match_brightness(f64::from(i) / 20.0).unwrap();
            assert!(idx.contains(ch));
        }
    }

    #[test]
    fn all_chars_in_code_point_order() {
        let idx = index("ydax");
        assert_eq!(idx.all_chars().into_iter().collect::<String>(), "adxy");
        assert_eq!(idx.raw_brightness('d'), Some(0.5));
        assert_eq!(idx.raw_brightness('q'), None);
    }

    #[test]
    fn builtin_glyphs_space_is_brightest() {
        let idx = CharBrightnessIndex::new(" .#@".chars());
        assert_eq!(idx.raw_brightness(' '), Some(1.0));
        assert_eq!(idx.match_brightness(1.0), Ok(' '));
        let dense = idx.match_brightness(0.0).unwrap();
        assert!(dense == '#' || dense == '@');
    }
}
