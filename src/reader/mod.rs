mod number;
mod string;

use std::ops::ControlFlow;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::constants::{is_newline_rune, RESERVED_RUNES_V1, RESERVED_RUNES_V2};
use crate::options::{JsonhReaderOptions, JsonhVersion};
use crate::token::{JsonhToken, TokenKind};
use crate::tree;
use crate::utf8::Utf8Reader;
use crate::{Error, Result};

/// Receives tokens as the reader produces them; returning
/// [`ControlFlow::Break`] stops the reader with the cursor parked after the
/// token just delivered.
pub(crate) trait TokenSink: FnMut(JsonhToken) -> ControlFlow<()> {}

impl<F: FnMut(JsonhToken) -> ControlFlow<()>> TokenSink for F {}

/// A reader that tokenizes and parses JSONH from a UTF-8 byte source.
///
/// A reader is created over a source, issues one token stream or one parse,
/// and is discarded; re-parsing the same input needs a new reader.
pub struct JsonhReader<'a> {
    utf8: Utf8Reader<'a>,
    options: JsonhReaderOptions,
    depth: usize,
}

impl<'a> JsonhReader<'a> {
    /// Constructs a reader over a borrowed string slice.
    pub fn from_str(input: &'a str, options: JsonhReaderOptions) -> Self {
        Self::with_utf8(Utf8Reader::from_str(input), options)
    }

    /// Constructs a reader over a borrowed byte slice.
    pub fn from_bytes(input: &'a [u8], options: JsonhReaderOptions) -> Self {
        Self::with_utf8(Utf8Reader::from_slice(input), options)
    }

    /// Constructs a reader that takes ownership of a string.
    pub fn from_string(input: String, options: JsonhReaderOptions) -> Self {
        Self::with_utf8(Utf8Reader::from_string(input), options)
    }

    /// Constructs a reader that takes ownership of a byte buffer.
    pub fn from_vec(input: Vec<u8>, options: JsonhReaderOptions) -> Self {
        Self::with_utf8(Utf8Reader::from_vec(input), options)
    }

    fn with_utf8(utf8: Utf8Reader<'a>, options: JsonhReaderOptions) -> Self {
        Self {
            utf8,
            options,
            depth: 0,
        }
    }

    pub fn options(&self) -> &JsonhReaderOptions {
        &self.options
    }

    /// The byte offset of the reader in its source.
    pub fn position(&self) -> usize {
        self.utf8.position()
    }

    /// The number of runes read from the source so far.
    pub fn runes_read(&self) -> u64 {
        self.utf8.runes_read()
    }

    /// Parses a single element and deserialises it into `T`.
    pub fn parse_element<T: DeserializeOwned>(&mut self) -> Result<T> {
        let value = self.parse_value()?;
        serde_json::from_value(value)
            .map_err(|err| Error::deserialize(format!("deserialize failed: {err}")))
    }

    /// Parses a single element into a generic JSON value.
    pub fn parse_value(&mut self) -> Result<Value> {
        tree::parse_element(self)
    }

    /// Reads the tokens of a single element. An error terminates the
    /// sequence and is its last entry.
    pub fn read_element(&mut self) -> Vec<Result<JsonhToken>> {
        let mut tokens = Vec::new();
        let outcome = self.read_element_into(&mut |token| {
            tokens.push(Ok(token));
            ControlFlow::Continue(())
        });
        if let Err(error) = outcome {
            tokens.push(Err(error));
        }
        tokens
    }

    /// Advances the reader until a property with the given name is found at
    /// the top level of the object at the cursor, leaving the cursor
    /// immediately after its `:` so the value can be parsed next.
    ///
    /// Returns false when the property is missing or the input is
    /// malformed.
    pub fn find_property_value(&mut self, property_name: &str) -> bool {
        let mut found = false;
        let mut depth = 0usize;
        let outcome = self.read_element_into(&mut |token| {
            match token.kind {
                TokenKind::StartObject | TokenKind::StartArray => depth += 1,
                TokenKind::EndObject | TokenKind::EndArray => depth = depth.saturating_sub(1),
                TokenKind::PropertyName => {
                    if depth == 1 && token.value == property_name {
                        found = true;
                        return ControlFlow::Break(());
                    }
                }
                _ => {}
            }
            ControlFlow::Continue(())
        });
        outcome.is_ok() && found
    }

    /// Reads whitespace and returns whether another token follows.
    pub fn has_token(&mut self) -> bool {
        self.read_whitespace();
        self.utf8.peek().is_some()
    }

    pub(crate) fn read_element_into<S: TokenSink>(
        &mut self,
        sink: &mut S,
    ) -> Result<ControlFlow<()>> {
        if self.read_comments_and_whitespace(sink)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }

        let Some(next) = self.utf8.peek() else {
            return Err(self.err_lexical("Expected token, got end of input"));
        };

        if next == '{' {
            self.read_object(sink)
        } else if next == '[' {
            self.read_array(sink)
        } else {
            let primitive = self.read_primitive_element()?;
            self.read_braceless_object_or_primitive(primitive, sink)
        }
    }

    /// Reads trailing comments and whitespace and errors if an element
    /// follows.
    pub(crate) fn read_end_of_elements<S: TokenSink>(
        &mut self,
        sink: &mut S,
    ) -> Result<ControlFlow<()>> {
        if self.read_comments_and_whitespace(sink)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }
        if self.utf8.peek().is_some() {
            return Err(self.err_configuration("Expected end of elements"));
        }
        Ok(ControlFlow::Continue(()))
    }

    fn read_object<S: TokenSink>(&mut self, sink: &mut S) -> Result<ControlFlow<()>> {
        // Without an opening brace the production falls through to a
        // braceless object.
        if !self.utf8.read_one('{') {
            return self.read_braceless_object(None, sink);
        }
        if sink(JsonhToken::structural(TokenKind::StartObject)).is_break() {
            return Ok(ControlFlow::Break(()));
        }
        self.enter_container()?;

        loop {
            if self.read_comments_and_whitespace(sink)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }

            let Some(next) = self.utf8.peek() else {
                if self.options.incomplete_inputs {
                    self.depth -= 1;
                    if sink(JsonhToken::structural(TokenKind::EndObject)).is_break() {
                        return Ok(ControlFlow::Break(()));
                    }
                    return Ok(ControlFlow::Continue(()));
                }
                return Err(self.err_structural("Expected `}` to end object, got end of input"));
            };

            if next == '}' {
                self.utf8.read();
                self.depth -= 1;
                if sink(JsonhToken::structural(TokenKind::EndObject)).is_break() {
                    return Ok(ControlFlow::Break(()));
                }
                return Ok(ControlFlow::Continue(()));
            }

            if self.read_property(None, sink)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
    }

    fn read_braceless_object<S: TokenSink>(
        &mut self,
        first_property: Option<Vec<JsonhToken>>,
        sink: &mut S,
    ) -> Result<ControlFlow<()>> {
        if sink(JsonhToken::structural(TokenKind::StartObject)).is_break() {
            return Ok(ControlFlow::Break(()));
        }
        self.enter_container()?;

        if first_property.is_some() && self.read_property(first_property, sink)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }

        loop {
            if self.read_comments_and_whitespace(sink)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }

            if self.utf8.peek().is_none() {
                // Braceless objects have no closing brace
                self.depth -= 1;
                if sink(JsonhToken::structural(TokenKind::EndObject)).is_break() {
                    return Ok(ControlFlow::Break(()));
                }
                return Ok(ControlFlow::Continue(()));
            }

            if self.read_property(None, sink)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
    }

    fn read_braceless_object_or_primitive<S: TokenSink>(
        &mut self,
        primitive: JsonhToken,
        sink: &mut S,
    ) -> Result<ControlFlow<()>> {
        // Look ahead for a `:` promoting the primitive to a property name,
        // keeping any comments found on the way for re-emission.
        let mut pending: Vec<JsonhToken> = Vec::new();
        self.read_comments_and_whitespace(&mut |token| {
            pending.push(token);
            ControlFlow::Continue(())
        })?;

        if primitive.kind != TokenKind::String || !self.utf8.read_one(':') {
            if sink(primitive).is_break() {
                return Ok(ControlFlow::Break(()));
            }
            for token in pending {
                if sink(token).is_break() {
                    return Ok(ControlFlow::Break(()));
                }
            }
            return Ok(ControlFlow::Continue(()));
        }

        if self.depth > 0 {
            return Err(self.err_structural("Nested braceless object"));
        }

        pending.push(JsonhToken::new(TokenKind::PropertyName, primitive.value));
        self.read_braceless_object(Some(pending), sink)
    }

    fn read_property<S: TokenSink>(
        &mut self,
        name_tokens: Option<Vec<JsonhToken>>,
        sink: &mut S,
    ) -> Result<ControlFlow<()>> {
        match name_tokens {
            Some(tokens) => {
                for token in tokens {
                    if sink(token).is_break() {
                        return Ok(ControlFlow::Break(()));
                    }
                }
            }
            None => {
                if self.read_property_name(sink)?.is_break() {
                    return Ok(ControlFlow::Break(()));
                }
            }
        }

        if self.read_comments_and_whitespace(sink)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }
        if self.read_element_into(sink)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }
        if self.read_comments_and_whitespace(sink)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }
        self.utf8.read_one(',');
        Ok(ControlFlow::Continue(()))
    }

    fn read_property_name<S: TokenSink>(&mut self, sink: &mut S) -> Result<ControlFlow<()>> {
        let name = self.read_string()?;

        if self.read_comments_and_whitespace(sink)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }

        if !self.utf8.read_one(':') {
            return Err(self.err_structural("Expected `:` after property name in object"));
        }

        if sink(JsonhToken::new(TokenKind::PropertyName, name.value)).is_break() {
            return Ok(ControlFlow::Break(()));
        }
        Ok(ControlFlow::Continue(()))
    }

    fn read_array<S: TokenSink>(&mut self, sink: &mut S) -> Result<ControlFlow<()>> {
        if !self.utf8.read_one('[') {
            return Err(self.err_structural("Expected `[` to start array"));
        }
        if sink(JsonhToken::structural(TokenKind::StartArray)).is_break() {
            return Ok(ControlFlow::Break(()));
        }
        self.enter_container()?;

        loop {
            if self.read_comments_and_whitespace(sink)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }

            let Some(next) = self.utf8.peek() else {
                if self.options.incomplete_inputs {
                    self.depth -= 1;
                    if sink(JsonhToken::structural(TokenKind::EndArray)).is_break() {
                        return Ok(ControlFlow::Break(()));
                    }
                    return Ok(ControlFlow::Continue(()));
                }
                return Err(self.err_structural("Expected `]` to end array, got end of input"));
            };

            if next == ']' {
                self.utf8.read();
                self.depth -= 1;
                if sink(JsonhToken::structural(TokenKind::EndArray)).is_break() {
                    return Ok(ControlFlow::Break(()));
                }
                return Ok(ControlFlow::Continue(()));
            }

            if self.read_item(sink)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
    }

    fn read_item<S: TokenSink>(&mut self, sink: &mut S) -> Result<ControlFlow<()>> {
        if self.read_element_into(sink)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }
        if self.read_comments_and_whitespace(sink)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }
        self.utf8.read_one(',');
        Ok(ControlFlow::Continue(()))
    }

    fn read_primitive_element(&mut self) -> Result<JsonhToken> {
        let Some(next) = self.utf8.peek() else {
            return Err(self.err_lexical("Expected primitive element, got end of input"));
        };

        if matches!(next, '0'..='9' | '-' | '+' | '.') {
            self.read_number_or_quoteless_string()
        } else if matches!(next, '"' | '\'')
            || (next == '@' && self.options.supports_version(JsonhVersion::V2))
        {
            self.read_string()
        } else {
            self.read_quoteless_string("", false)
        }
    }

    fn read_comments_and_whitespace<S: TokenSink>(
        &mut self,
        sink: &mut S,
    ) -> Result<ControlFlow<()>> {
        loop {
            self.read_whitespace();

            match self.utf8.peek() {
                Some('#') | Some('/') => {
                    let comment = self.read_comment()?;
                    if sink(comment).is_break() {
                        return Ok(ControlFlow::Break(()));
                    }
                }
                _ => return Ok(ControlFlow::Continue(())),
            }
        }
    }

    fn read_comment(&mut self) -> Result<JsonhToken> {
        let mut block_comment = false;
        let mut opening_nest = 0usize;

        if self.utf8.read_one('#') {
            // Hash-style comment
        } else if self.utf8.read_one('/') {
            if self.utf8.read_one('/') {
                // Line-style comment
            } else if self.utf8.read_one('*') {
                block_comment = true;
            } else if self.options.supports_version(JsonhVersion::V2)
                && self.utf8.peek() == Some('=')
            {
                block_comment = true;
                while self.utf8.read_one('=') {
                    opening_nest += 1;
                }
                if !self.utf8.read_one('*') {
                    return Err(self.err_lexical("Expected `*` after start of nesting block comment"));
                }
            } else {
                return Err(self.err_lexical("Unexpected `/`"));
            }
        } else {
            return Err(self.err_lexical("Unexpected character"));
        }

        if block_comment {
            self.read_block_comment_body(opening_nest)
        } else {
            self.read_line_comment_body()
        }
    }

    fn read_line_comment_body(&mut self) -> Result<JsonhToken> {
        let mut comment = String::new();
        loop {
            // Skip ahead to the next candidate line terminator; U+2028 and
            // U+2029 encode with a 0xE2 lead byte.
            let remaining = self.utf8.remaining_bytes();
            let boundary = memchr::memchr3(b'\n', b'\r', 0xE2, remaining).unwrap_or(remaining.len());
            if boundary > 0 {
                let span = String::from_utf8_lossy(&remaining[..boundary]);
                let runes = span.chars().count() as u64;
                comment.push_str(&span);
                self.utf8.advance_by(boundary, runes);
            }

            let Some(next) = self.utf8.read() else {
                return Ok(JsonhToken::new(TokenKind::Comment, comment));
            };
            if is_newline_rune(next) {
                return Ok(JsonhToken::new(TokenKind::Comment, comment));
            }
            comment.push(next);
        }
    }

    fn read_block_comment_body(&mut self, opening_nest: usize) -> Result<JsonhToken> {
        let mut comment = String::new();
        loop {
            let Some(next) = self.utf8.read() else {
                return Err(self.err_lexical("Expected end of block comment, got end of input"));
            };

            if next == '*' {
                if self.options.supports_version(JsonhVersion::V2) {
                    let mut closing_nest = 0;
                    while closing_nest < opening_nest && self.utf8.read_one('=') {
                        closing_nest += 1;
                    }
                    // A partial end marker is part of the comment body
                    if closing_nest < opening_nest || self.utf8.peek() != Some('/') {
                        comment.push('*');
                        for _ in 0..closing_nest {
                            comment.push('=');
                        }
                        continue;
                    }
                }
                if self.utf8.read_one('/') {
                    return Ok(JsonhToken::new(TokenKind::Comment, comment));
                }
            }

            comment.push(next);
        }
    }

    fn read_whitespace(&mut self) {
        while let Some(next) = self.utf8.peek() {
            if !next.is_whitespace() {
                return;
            }
            self.utf8.read();
        }
    }

    fn enter_container(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(self.err_semantic("Exceeded max depth"));
        }
        Ok(())
    }

    fn reserved_runes(&self) -> &'static [char] {
        if self.options.supports_version(JsonhVersion::V2) {
            RESERVED_RUNES_V2
        } else {
            RESERVED_RUNES_V1
        }
    }

    fn err_lexical(&self, message: &str) -> Error {
        Error::lexical(message).with_offset(self.utf8.position())
    }

    fn err_structural(&self, message: &str) -> Error {
        Error::structural(message).with_offset(self.utf8.position())
    }

    fn err_semantic(&self, message: &str) -> Error {
        Error::semantic(message).with_offset(self.utf8.position())
    }

    fn err_configuration(&self, message: &str) -> Error {
        Error::configuration(message).with_offset(self.utf8.position())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{ErrorKind, Result};

    fn tokens(input: &str) -> Vec<JsonhToken> {
        JsonhReader::from_str(input, JsonhReaderOptions::default())
            .read_element()
            .into_iter()
            .collect::<Result<_>>()
            .unwrap()
    }

    fn parse(input: &str) -> Result<Value> {
        JsonhReader::from_str(input, JsonhReaderOptions::default()).parse_value()
    }

    fn parse_error(input: &str) -> Error {
        parse(input).unwrap_err()
    }

    #[rstest::rstest]
    fn test_basic_object_tokens() {
        assert_eq!(
            tokens("{\n    \"a\": \"b\"\n}"),
            [
                JsonhToken::structural(TokenKind::StartObject),
                JsonhToken::new(TokenKind::PropertyName, "a"),
                JsonhToken::new(TokenKind::String, "b"),
                JsonhToken::structural(TokenKind::EndObject),
            ]
        );
    }

    #[rstest::rstest]
    fn test_array_with_optional_commas_and_quoteless_item() {
        assert_eq!(
            parse("[ 1, 2,\n    3\n    4 5, 6 ]").unwrap(),
            json!([1, 2, 3, "4 5", 6])
        );
    }

    #[rstest::rstest]
    fn test_unicode_escapes_and_surrogate_pairing() {
        assert_eq!(
            parse(r#""\U0001F47D and \uD83D\uDC7D""#).unwrap(),
            json!("👽 and 👽")
        );
        assert_eq!(parse(r#""\x41\u0042""#).unwrap(), json!("AB"));
    }

    #[rstest::rstest]
    fn test_multi_quoted_dedent() {
        let input = "\"\"\"\"\n  Hello! Here's a quote: \". Now a double quote: \"\". \
                     And a triple quote! \"\"\". Escape: \\\\\\U0001F47D.\n \"\"\"\"";
        let expected = " Hello! Here's a quote: \". Now a double quote: \"\". \
                        And a triple quote! \"\"\". Escape: \\👽.";
        assert_eq!(parse(input).unwrap(), json!(expected));
    }

    #[rstest::rstest]
    fn test_quoteless_vs_named_literal() {
        assert_eq!(
            parse("[nulla, null b, null]").unwrap(),
            json!(["nulla", "null b", null])
        );
        assert_eq!(parse("[true, false]").unwrap(), json!([true, false]));
        // An escape suppresses the named literal
        assert_eq!(parse(r"[nul\l]").unwrap(), json!(["null"]));
    }

    #[rstest::rstest]
    fn test_numbers_with_base_prefixes_and_separators() {
        assert_eq!(
            parse("[0xDEADCAFE, 0b_100, 100__000, 0x5e3, 0x5e+3]").unwrap(),
            json!([3735931646u64, 4, 100000, 1507, 5000])
        );
        let value = parse("1.2e3.4").unwrap();
        assert_eq!(value.as_f64().unwrap() as i64, 3014);
    }

    #[rstest::rstest]
    fn test_braceless_object_with_spaces_in_keys() {
        assert_eq!(parse("a b: c d").unwrap(), json!({"a b": "c d"}));
    }

    #[rstest::rstest]
    fn test_braceless_object_multiple_properties() {
        assert_eq!(
            parse("a: 1\nb: [x, y]\nc: {d: e}").unwrap(),
            json!({"a": 1, "b": ["x", "y"], "c": {"d": "e"}})
        );
    }

    #[rstest::rstest]
    fn test_comment_mix_inside_array() {
        assert_eq!(
            parse("[1 # hash\n 2 // line\n 3 /* block */, 4]").unwrap(),
            json!([1, 2, 3, 4])
        );
    }

    #[rstest::rstest]
    fn test_comment_token_values() {
        let tokens = tokens("[1] // line comment");
        // Trailing comments after the closing bracket are not part of the
        // element, so look at one inside instead.
        assert_eq!(tokens.len(), 3);

        let tokens = self::tokens("[/* block comment */ 1]");
        assert_eq!(
            tokens[1],
            JsonhToken::new(TokenKind::Comment, " block comment ")
        );

        let tokens = self::tokens("[# hash comment\n1]");
        assert_eq!(
            tokens[1],
            JsonhToken::new(TokenKind::Comment, " hash comment")
        );

        let tokens = self::tokens("[/* multiline\nblock comment */ 1]");
        assert_eq!(
            tokens[1],
            JsonhToken::new(TokenKind::Comment, " multiline\nblock comment ")
        );
    }

    #[rstest::rstest]
    fn test_nestable_block_comments() {
        assert_eq!(parse("[1 /==* comment *= nested *==/, 2]").unwrap(), json!([1, 2]));
        // A partial end marker is comment text
        assert_eq!(parse("[1 /=* a *= b *=/, 2]").unwrap(), json!([1, 2]));
    }

    #[rstest::rstest]
    fn test_nestable_block_comment_requires_v2() {
        let options = JsonhReaderOptions::new().with_version(JsonhVersion::V1);
        let mut reader = JsonhReader::from_str("[1 /=* comment *=/, 2]", options);
        let error = reader.parse_value().unwrap_err();
        assert_eq!(error.to_string(), "Unexpected `/`");
    }

    #[rstest::rstest]
    fn test_unterminated_block_comment() {
        let error = parse_error("[1 /* never closed");
        assert_eq!(
            error.to_string(),
            "Expected end of block comment, got end of input"
        );
    }

    #[rstest::rstest]
    fn test_verbatim_strings() {
        assert_eq!(parse(r#"@"C:\temp\new""#).unwrap(), json!(r"C:\temp\new"));
        assert_eq!(parse(r"@'a\nb'").unwrap(), json!(r"a\nb"));
        assert_eq!(parse(r"@null").unwrap(), json!("null"));
        assert_eq!(parse(r"[@a\b]").unwrap(), json!([r"a\b"]));
    }

    #[rstest::rstest]
    fn test_verbatim_symbol_must_touch_its_string() {
        let error = parse_error("@ \"a\"");
        assert_eq!(
            error.to_string(),
            "Expected string to immediately follow verbatim symbol"
        );
        assert_eq!(error.kind, ErrorKind::Configuration);
    }

    #[rstest::rstest]
    fn test_at_sign_is_plain_text_in_v1() {
        let options = JsonhReaderOptions::new().with_version(JsonhVersion::V1);
        let mut reader = JsonhReader::from_str("@name", options);
        assert_eq!(reader.parse_value().unwrap(), json!("@name"));
    }

    #[rstest::rstest]
    fn test_quoted_string_flavours() {
        assert_eq!(parse("\"\"").unwrap(), json!(""));
        assert_eq!(parse("''").unwrap(), json!(""));
        assert_eq!(parse("'single'").unwrap(), json!("single"));
        // Literal newlines are allowed inside single-line strings
        assert_eq!(parse("\"a\nb\"").unwrap(), json!("a\nb"));
        // Partial end-quote runs are literal in multi-quoted strings
        assert_eq!(parse("'''a '' b'''").unwrap(), json!("a '' b"));
    }

    #[rstest::rstest]
    fn test_escape_sequences() {
        assert_eq!(
            parse(r#""\\\b\f\n\r\t\v\0\a\e""#).unwrap(),
            json!("\\\u{8}\u{c}\n\r\t\u{b}\0\u{7}\u{1b}")
        );
        // Unknown escapes are the literal rune
        assert_eq!(parse(r#""\q\👽""#).unwrap(), json!("q👽"));
        // Line continuation
        assert_eq!(parse("\"a\\\nb\"").unwrap(), json!("ab"));
        assert_eq!(parse("\"a\\\r\nb\"").unwrap(), json!("ab"));
    }

    #[rstest::rstest]
    fn test_escape_sequence_errors() {
        assert_eq!(
            parse_error(r#""\u12""#).to_string(),
            "Incorrect number of hexadecimal digits in escape sequence"
        );
        assert_eq!(
            parse_error(r#""\uD800x""#).to_string(),
            "Invalid code point in escape sequence"
        );
        assert_eq!(
            parse_error(r#""\uD83D\u0041""#).to_string(),
            "Low surrogate out of range"
        );
        assert_eq!(
            parse_error(r#""\uD83D\n""#).to_string(),
            "Expected low surrogate after high surrogate"
        );
    }

    #[rstest::rstest]
    fn test_quoteless_disambiguation() {
        assert_eq!(parse("6 ab a").unwrap(), json!("6 ab a"));
        assert_eq!(parse("1.2.3").unwrap(), json!("1.2.3"));
        assert_eq!(parse("[1_, 2]").unwrap(), json!(["1_", 2]));
        assert_eq!(parse("0x").unwrap(), json!("0x"));
    }

    #[rstest::rstest]
    fn test_nested_container_never_closed() {
        let error = parse_error("a: {");
        assert_eq!(
            error.to_string(),
            "Expected `}` to end object, got end of input"
        );
    }

    #[rstest::rstest]
    fn test_braceless_object_inside_array_is_an_error() {
        let error = parse_error("[\n a: b\n c: d\n]");
        assert_eq!(error.to_string(), "Nested braceless object");
        assert_eq!(error.kind, ErrorKind::Structural);
    }

    #[rstest::rstest]
    fn test_braceless_object_as_property_value_is_an_error() {
        let error = parse_error("{a: b: c}");
        assert_eq!(error.to_string(), "Nested braceless object");
    }

    #[rstest::rstest]
    fn test_missing_colon_after_property_name() {
        let error = parse_error("{a 1}");
        assert_eq!(
            error.to_string(),
            "Expected `:` after property name in object"
        );
    }

    #[rstest::rstest]
    fn test_missing_closing_bracket() {
        let error = parse_error("[1, 2");
        assert_eq!(
            error.to_string(),
            "Expected `]` to end array, got end of input"
        );
    }

    #[rstest::rstest]
    fn test_incomplete_inputs_synthesise_container_ends() {
        let options = JsonhReaderOptions::new().with_incomplete_inputs(true);

        let mut reader = JsonhReader::from_str("{a: [1, 2", options);
        assert_eq!(reader.parse_value().unwrap(), json!({"a": [1, 2]}));

        let mut reader = JsonhReader::from_str("[{name: cat", options);
        assert_eq!(reader.parse_value().unwrap(), json!([{"name": "cat"}]));
    }

    #[rstest::rstest]
    fn test_max_depth() {
        let options = JsonhReaderOptions::new().with_max_depth(3);

        let mut reader = JsonhReader::from_str("[[[1]]]", options);
        assert_eq!(reader.parse_value().unwrap(), json!([[[1]]]));

        let mut reader = JsonhReader::from_str("[[[[1]]]]", options);
        let error = reader.parse_value().unwrap_err();
        assert_eq!(error.to_string(), "Exceeded max depth");
        assert_eq!(error.kind, ErrorKind::Semantic);
    }

    #[rstest::rstest]
    fn test_empty_and_comment_only_inputs() {
        assert_eq!(
            parse_error("").to_string(),
            "Expected token, got end of input"
        );
        assert_eq!(
            parse_error("# only a comment").to_string(),
            "Expected token, got end of input"
        );
    }

    #[rstest::rstest]
    fn test_empty_quoteless_string() {
        let error = parse_error("{: 1}");
        assert_eq!(error.to_string(), "Empty quoteless string");
    }

    #[rstest::rstest]
    fn test_error_terminates_token_stream() {
        let mut reader = JsonhReader::from_str("[1,", JsonhReaderOptions::default());
        let tokens = reader.read_element();
        let (last, rest) = tokens.split_last().unwrap();
        assert!(last.is_err());
        assert!(rest.iter().all(|token| token.is_ok()));
    }

    #[rstest::rstest]
    fn test_error_offset_is_recoverable() {
        let mut reader = JsonhReader::from_str("[1,", JsonhReaderOptions::default());
        let tokens = reader.read_element();
        let error = tokens.last().unwrap().as_ref().unwrap_err();
        assert_eq!(error.offset, Some(reader.position()));
    }

    #[rstest::rstest]
    fn test_find_property_value() {
        let input = "{\n  \"a\": \"1\",\n  \"b\": {\n    \"c\": \"2\"\n  },\n  \"c\": \"3\"\n}";
        let mut reader = JsonhReader::from_str(input, JsonhReaderOptions::default());
        assert!(reader.find_property_value("c"));
        assert_eq!(reader.parse_element::<String>().unwrap(), "3");
    }

    #[rstest::rstest]
    fn test_find_property_value_missing_or_malformed() {
        let mut reader = JsonhReader::from_str("{a: 1}", JsonhReaderOptions::default());
        assert!(!reader.find_property_value("b"));

        let mut reader = JsonhReader::from_str("{a: [", JsonhReaderOptions::default());
        assert!(!reader.find_property_value("b"));
    }

    #[rstest::rstest]
    fn test_has_token() {
        let mut reader = JsonhReader::from_str("  1", JsonhReaderOptions::default());
        assert!(reader.has_token());

        let mut reader = JsonhReader::from_str("   ", JsonhReaderOptions::default());
        assert!(!reader.has_token());
    }

    #[rstest::rstest]
    fn test_property_names_from_every_primitive_shape() {
        assert_eq!(
            parse("{'quoted name': 1, null: 2, 123: 3}").unwrap(),
            json!({"quoted name": 1, "null": 2, "123": 3})
        );
    }

    #[rstest::rstest]
    fn test_promotion_keeps_comments() {
        let tokens = tokens("a /* note */: 1");
        assert_eq!(
            tokens,
            [
                JsonhToken::structural(TokenKind::StartObject),
                JsonhToken::new(TokenKind::Comment, " note "),
                JsonhToken::new(TokenKind::PropertyName, "a"),
                JsonhToken::new(TokenKind::Number, "1"),
                JsonhToken::structural(TokenKind::EndObject),
            ]
        );
    }

    #[rstest::rstest]
    fn test_only_string_primitives_promote() {
        // A number followed by `:` stays a root number; the rest of the
        // input is trailing content.
        assert_eq!(parse("123: x").unwrap(), json!(123));
    }

    #[rstest::rstest]
    fn test_named_literal_tokens_carry_their_text() {
        let tokens = tokens("[null, true, false]");
        assert_eq!(tokens[1], JsonhToken::new(TokenKind::Null, "null"));
        assert_eq!(tokens[2], JsonhToken::new(TokenKind::TrueBool, "true"));
        assert_eq!(tokens[3], JsonhToken::new(TokenKind::FalseBool, "false"));
    }

    #[rstest::rstest]
    fn test_unicode_newline_runes_terminate() {
        assert_eq!(
            parse("[a\u{2028}b]").unwrap(),
            json!(["a", "b"])
        );
        assert_eq!(parse("# comment\u{2029}1").unwrap(), json!(1));
    }

    #[rstest::rstest]
    fn test_crlf_line_comment() {
        assert_eq!(parse("# note\r\n7").unwrap(), json!(7));
    }
}
