//! Serde-compatible reader for JSONH ("JSON for Humans").
//!
//! JSONH is a superset of JSON that accepts quoteless strings, unquoted
//! property names, single/multi-quoted strings with whitespace-aware
//! dedent, optional commas, line and block comments, hexadecimal, binary
//! and octal numbers with `_` separators and fractional exponents, and
//! braceless top-level objects.
//!
//! Input is a UTF-8 byte stream. A leading byte order mark is not stripped;
//! strip it upstream if your source carries one. Feeding bytes that are not
//! valid UTF-8 is a precondition violation: the reader will not panic, but
//! the tokens produced for the malformed runes are unspecified.
//!
//! # Examples
//!
//! Parse into a generic value:
//!
//! ```rust
//! let value = serde_jsonh::parse_to_value(r#"
//! // A configuration file
//! name: Ada Lovelace
//! age: 0x25
//! tags: [pioneer, "analytical engine"]
//! "#)?;
//! assert_eq!(value, serde_json::json!({
//!     "name": "Ada Lovelace",
//!     "age": 37,
//!     "tags": ["pioneer", "analytical engine"],
//! }));
//! # Ok::<(), serde_jsonh::Error>(())
//! ```
//!
//! Parse into a typed struct:
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize, PartialEq)]
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! let user: User = serde_jsonh::from_str("name: Grace Hopper, age: 46")?;
//! assert_eq!(
//!     user,
//!     User {
//!         name: "Grace Hopper".to_string(),
//!         age: 46
//!     }
//! );
//! # Ok::<(), serde_jsonh::Error>(())
//! ```
//!
//! Multi-quoted strings dedent to the closing line:
//!
//! ```rust
//! let value = serde_jsonh::parse_to_value("\"\"\"\n    Hello\n      World\n    \"\"\"")?;
//! assert_eq!(value, serde_json::json!("Hello\n  World"));
//! # Ok::<(), serde_jsonh::Error>(())
//! ```
//!
//! Read raw tokens:
//!
//! ```rust
//! use serde_jsonh::{JsonhReader, JsonhReaderOptions, TokenKind};
//!
//! let mut reader = JsonhReader::from_str("{a: b}", JsonhReaderOptions::default());
//! let kinds: Vec<TokenKind> = reader
//!     .read_element()
//!     .into_iter()
//!     .map(|token| token.map(|token| token.kind))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::StartObject,
//!         TokenKind::PropertyName,
//!         TokenKind::String,
//!         TokenKind::EndObject,
//!     ]
//! );
//! # Ok::<(), serde_jsonh::Error>(())
//! ```
//!
//! Skip to a property and parse its value:
//!
//! ```rust
//! use serde_jsonh::{JsonhReader, JsonhReaderOptions};
//!
//! let input = r#"{ "a": "1", "b": { "c": "2" }, "c": "3" }"#;
//! let mut reader = JsonhReader::from_str(input, JsonhReaderOptions::default());
//! assert!(reader.find_property_value("c"));
//! assert_eq!(reader.parse_element::<String>()?, "3");
//! # Ok::<(), serde_jsonh::Error>(())
//! ```

mod constants;
mod error;
mod number;
mod options;
mod reader;
mod token;
mod tree;
mod utf8;

use std::io::Read;

use serde::de::DeserializeOwned;

pub use crate::error::{Error, ErrorKind};
pub use crate::options::{JsonhReaderOptions, JsonhVersion};
pub use crate::reader::JsonhReader;
pub use crate::token::{JsonhToken, TokenKind};
pub use crate::utf8::Utf8Reader;
pub use serde_json::Value;

pub type Result<T> = std::result::Result<T, Error>;

/// Parses a single JSONH element from a string into `T`.
pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    from_str_with_options(input, JsonhReaderOptions::default())
}

pub fn from_str_with_options<T: DeserializeOwned>(
    input: &str,
    options: JsonhReaderOptions,
) -> Result<T> {
    JsonhReader::from_str(input, options).parse_element()
}

/// Parses a single JSONH element from UTF-8 bytes into `T`.
pub fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T> {
    from_slice_with_options(input, JsonhReaderOptions::default())
}

pub fn from_slice_with_options<T: DeserializeOwned>(
    input: &[u8],
    options: JsonhReaderOptions,
) -> Result<T> {
    JsonhReader::from_bytes(input, options).parse_element()
}

/// Parses a single JSONH element from an `io::Read` source into `T`.
pub fn from_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T> {
    from_reader_with_options(reader, JsonhReaderOptions::default())
}

pub fn from_reader_with_options<T: DeserializeOwned, R: Read>(
    mut reader: R,
    options: JsonhReaderOptions,
) -> Result<T> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|err| Error::deserialize(format!("read failed: {err}")))?;
    JsonhReader::from_vec(buf, options).parse_element()
}

/// Parses a single JSONH element from a string into a generic JSON value.
pub fn parse_to_value(input: &str) -> Result<Value> {
    parse_to_value_with_options(input, JsonhReaderOptions::default())
}

pub fn parse_to_value_with_options(input: &str, options: JsonhReaderOptions) -> Result<Value> {
    JsonhReader::from_str(input, options).parse_value()
}

/// Parse a JSONH string into a [`Value`].
///
/// This macro calls [`parse_to_value`], returning a `Result<Value>`.
///
/// # Examples
///
/// ```rust
/// use serde_jsonh::jsonh;
///
/// let value = jsonh!("name: \"Snoopy\"\nage: 5")?;
/// assert_eq!(value, serde_json::json!({"name": "Snoopy", "age": 5}));
/// # Ok::<(), serde_jsonh::Error>(())
/// ```
#[macro_export]
macro_rules! jsonh {
    ($input:expr) => {
        $crate::parse_to_value($input)
    };
    ($input:expr, $options:expr) => {
        $crate::parse_to_value_with_options($input, $options)
    };
}
