/// Runes that terminate a quoteless string in JSONH V1.
pub(crate) const RESERVED_RUNES_V1: &[char] = &[
    '\\', ',', ':', '[', ']', '{', '}', '/', '#', '"', '\'',
];

/// Runes that terminate a quoteless string in JSONH V2 (adds the verbatim symbol).
pub(crate) const RESERVED_RUNES_V2: &[char] = &[
    '\\', ',', ':', '[', ']', '{', '}', '/', '#', '"', '\'', '@',
];

/// Runes that end a line: LF, CR, LINE SEPARATOR, PARAGRAPH SEPARATOR.
pub(crate) const NEWLINE_RUNES: &[char] = &['\n', '\r', '\u{2028}', '\u{2029}'];

#[inline]
pub(crate) fn is_newline_rune(rune: char) -> bool {
    NEWLINE_RUNES.contains(&rune)
}
