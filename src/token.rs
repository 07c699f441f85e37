use smol_str::SmolStr;

/// The kind of a single JSONH token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    None,
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    PropertyName,
    Comment,
    String,
    Number,
    TrueBool,
    FalseBool,
    Null,
}

/// A single JSONH token.
///
/// Tokens are plain values with no identity; the structural kinds carry an
/// empty value, the rest carry their lexical text (after escape processing
/// for strings and property names, as consumed for numbers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonhToken {
    pub kind: TokenKind,
    pub value: SmolStr,
}

impl JsonhToken {
    pub fn new(kind: TokenKind, value: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// A token that carries no value, for the structural kinds.
    pub fn structural(kind: TokenKind) -> Self {
        Self {
            kind,
            value: SmolStr::default(),
        }
    }
}
