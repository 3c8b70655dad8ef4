use std::collections::BTreeSet;

/// Jeu initial : les dix chiffres.
pub const CHARSET_DIGITS: &str = "0123456789";

/// Premier caractère imprimable accepté par le glyph table (espace).
pub const PRINTABLE_FIRST: char = ' ';

/// Dernier caractère imprimable accepté par le glyph table (tilde).
pub const PRINTABLE_LAST: char = '~';

/// `true` si `c` est dans la plage ASCII imprimable 32–126.
///
/// # Example
/// ```
/// use ac_core::charset::is_printable;
/// assert!(is_printable('a'));
/// assert!(!is_printable('\n'));
/// assert!(!is_printable('é'));
/// ```
#[inline]
#[must_use]
pub fn is_printable(c: char) -> bool {
    (PRINTABLE_FIRST..=PRINTABLE_LAST).contains(&c)
}

/// All characters of an inclusive range, whatever the order of the bounds.
///
/// # Example
/// ```
/// use ac_core::charset::char_range;
/// let r: Vec<char> = char_range('c', 'a').collect();
/// assert_eq!(r, vec!['a', 'b', 'c']);
/// ```
pub fn char_range(a: char, b: char) -> impl Iterator<Item = char> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    lo..=hi
}

/// Every printable character, space through tilde.
pub fn printable() -> impl Iterator<Item = char> {
    PRINTABLE_FIRST..=PRINTABLE_LAST
}

/// Ensemble ordonné des caractères imprimables d'une chaîne (doublons retirés).
///
/// # Example
/// ```
/// use ac_core::charset::parse_charset;
/// let set = parse_charset("9a\t9 ");
/// assert_eq!(set.into_iter().collect::<String>(), " 9a");
/// ```
#[must_use]
pub fn parse_charset(s: &str) -> BTreeSet<char> {
    s.chars().filter(|&c| is_printable(c)).collect()
}
