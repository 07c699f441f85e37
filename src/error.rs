use std::fmt;

/// The broad class a reader failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A malformed token: unterminated string or comment, bad escape digits,
    /// empty quoteless string, misplaced digit separator.
    Lexical,
    /// A malformed document: missing `:`, unclosed container, braceless
    /// object where the grammar forbids one.
    Structural,
    /// A well-formed token with an impossible value: surrogate half, digit
    /// outside the declared base, exceeded max depth.
    Semantic,
    /// A constraint imposed by the reader options rather than the grammar.
    Configuration,
    /// A typed deserialisation failure reported by serde.
    Deserialize,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    /// Byte offset of the reader when the failure was raised, when known.
    pub offset: Option<usize>,
}

impl Error {
    pub fn lexical(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Lexical,
            message: message.into(),
            offset: None,
        }
    }

    pub fn structural(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Structural,
            message: message.into(),
            offset: None,
        }
    }

    pub fn semantic(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Semantic,
            message: message.into(),
            offset: None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Configuration,
            message: message.into(),
            offset: None,
        }
    }

    pub fn deserialize(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Deserialize,
            message: message.into(),
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
