use std::io::SeekFrom;

use crate::constants::is_newline_rune;
use crate::options::JsonhVersion;
use crate::reader::JsonhReader;
use crate::token::{JsonhToken, TokenKind};
use crate::utf8::Utf8Reader;
use crate::Result;

impl JsonhReader<'_> {
    /// Reads a quoted string, falling through to a quoteless string when no
    /// quote follows.
    pub(crate) fn read_string(&mut self) -> Result<JsonhToken> {
        let mut verbatim = false;
        if self.options.supports_version(JsonhVersion::V2) && self.utf8.read_one('@') {
            verbatim = true;

            match self.utf8.peek() {
                Some(next) if !matches!(next, '#' | '/') && !next.is_whitespace() => {}
                _ => {
                    return Err(
                        self.err_configuration("Expected string to immediately follow verbatim symbol")
                    )
                }
            }
        }

        let Some(start_quote) = self.utf8.read_any(&['"', '\'']) else {
            return self.read_quoteless_string("", verbatim);
        };

        let mut start_quotes = 1usize;
        while self.utf8.read_one(start_quote) {
            start_quotes += 1;
        }

        // Exactly two start quotes is the empty string
        if start_quotes == 2 {
            return Ok(JsonhToken::new(TokenKind::String, ""));
        }

        let mut body = String::new();
        let mut end_quotes = 0usize;
        loop {
            let Some(next) = self.utf8.read() else {
                return Err(self.err_lexical("Expected end of string, got end of input"));
            };

            // A partial run of end quotes is part of the string
            if next != start_quote {
                for _ in 0..end_quotes {
                    body.push(start_quote);
                }
                end_quotes = 0;
            }

            if next == start_quote {
                end_quotes += 1;
                if end_quotes == start_quotes {
                    break;
                }
            } else if next == '\\' {
                if verbatim {
                    body.push(next);
                } else {
                    self.read_escape_sequence(&mut body)?;
                }
            } else {
                body.push(next);
            }
        }

        if start_quotes > 1 {
            body = dedent_multiquoted(body);
        }

        Ok(JsonhToken::new(TokenKind::String, body))
    }

    /// Reads a quoteless string, optionally seeded with already-consumed
    /// text from the number disambiguator.
    pub(crate) fn read_quoteless_string(&mut self, seed: &str, verbatim: bool) -> Result<JsonhToken> {
        let reserved = self.reserved_runes();
        let mut named_literal_possible = !verbatim;
        let mut body = String::from(seed);

        loop {
            let Some(next) = self.utf8.peek() else {
                break;
            };

            if next == '\\' {
                self.utf8.read();
                if verbatim {
                    body.push(next);
                } else {
                    self.read_escape_sequence(&mut body)?;
                }
                named_literal_possible = false;
            } else if reserved.contains(&next) || is_newline_rune(next) {
                break;
            } else {
                self.utf8.read();
                body.push(next);
            }
        }

        if body.is_empty() {
            return Err(self.err_lexical("Empty quoteless string"));
        }

        let trimmed = body.trim();

        if named_literal_possible {
            match trimmed {
                "null" => return Ok(JsonhToken::new(TokenKind::Null, "null")),
                "true" => return Ok(JsonhToken::new(TokenKind::TrueBool, "true")),
                "false" => return Ok(JsonhToken::new(TokenKind::FalseBool, "false")),
                _ => {}
            }
        }

        Ok(JsonhToken::new(TokenKind::String, trimmed))
    }

    fn read_escape_sequence(&mut self, out: &mut String) -> Result<()> {
        if let Some(rune) = self.read_escape_rune(None)? {
            out.push(rune);
        }
        Ok(())
    }

    fn read_escape_rune(&mut self, high_surrogate: Option<u32>) -> Result<Option<char>> {
        let Some(escape) = self.utf8.read() else {
            return Err(self.err_lexical("Expected escape sequence, got end of input"));
        };

        if high_surrogate.is_some() && !matches!(escape, 'u' | 'x' | 'U') {
            return Err(self.err_semantic("Expected low surrogate after high surrogate"));
        }

        match escape {
            '\\' => Ok(Some('\\')),
            'b' => Ok(Some('\u{0008}')),
            'f' => Ok(Some('\u{000C}')),
            'n' => Ok(Some('\n')),
            'r' => Ok(Some('\r')),
            't' => Ok(Some('\t')),
            'v' => Ok(Some('\u{000B}')),
            '0' => Ok(Some('\0')),
            'a' => Ok(Some('\u{0007}')),
            'e' => Ok(Some('\u{001B}')),
            'u' => self.read_hex_escape(4, high_surrogate),
            'x' => self.read_hex_escape(2, high_surrogate),
            'U' => self.read_hex_escape(8, high_surrogate),
            rune if is_newline_rune(rune) => {
                // Line continuation; CR LF counts as one newline
                if rune == '\r' {
                    self.utf8.read_one('\n');
                }
                Ok(None)
            }
            rune => Ok(Some(rune)),
        }
    }

    fn read_hex_escape(&mut self, digits: u32, high_surrogate: Option<u32>) -> Result<Option<char>> {
        let code_point = self.read_hex_sequence(digits)?;

        if let Some(high_surrogate) = high_surrogate {
            let combined = combine_utf16_surrogates(high_surrogate, code_point)
                .map_err(|message| self.err_semantic(message))?;
            return match char::from_u32(combined) {
                Some(rune) => Ok(Some(rune)),
                None => Err(self.err_semantic("Invalid code point in escape sequence")),
            };
        }

        // A high surrogate pairs opportunistically with a following escape
        if is_utf16_high_surrogate(code_point) && self.utf8.read_one('\\') {
            return self.read_escape_rune(Some(code_point));
        }
        match char::from_u32(code_point) {
            Some(rune) => Ok(Some(rune)),
            None => Err(self.err_semantic("Invalid code point in escape sequence")),
        }
    }

    fn read_hex_sequence(&mut self, digits: u32) -> Result<u32> {
        let mut value = 0u32;
        for _ in 0..digits {
            match self.utf8.read() {
                Some(rune) if rune.is_ascii_hexdigit() => {
                    value = (value << 4) | rune.to_digit(16).unwrap_or(0);
                }
                _ => {
                    return Err(self.err_lexical(
                        "Incorrect number of hexadecimal digits in escape sequence",
                    ))
                }
            }
        }
        Ok(value)
    }
}

fn combine_utf16_surrogates(high: u32, low: u32) -> std::result::Result<u32, &'static str> {
    if !is_utf16_high_surrogate(high) {
        return Err("High surrogate out of range");
    }
    if !is_utf16_low_surrogate(low) {
        return Err("Low surrogate out of range");
    }
    Ok(0x10000 + (((high - 0xD800) << 10) | (low - 0xDC00)))
}

fn is_utf16_high_surrogate(code_point: u32) -> bool {
    (0xD800..=0xDBFF).contains(&code_point)
}

fn is_utf16_low_surrogate(code_point: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&code_point)
}

/// Applies the multi-quoted string dedent: strip the all-whitespace first
/// and last lines, then remove the closing line's indentation from every
/// remaining line.
fn dedent_multiquoted(body: String) -> String {
    // The leading whitespace must end in a newline.
    let mut forward = Utf8Reader::from_str(&body);
    let mut leading_len = None;
    while let Some(rune) = forward.read() {
        if is_newline_rune(rune) {
            if rune == '\r' {
                forward.read_one('\n');
            }
            leading_len = Some(forward.position());
            break;
        }
        if !rune.is_whitespace() {
            break;
        }
    }
    let Some(leading_len) = leading_len else {
        return body;
    };

    // The trailing whitespace must start at a newline; the whitespace runes
    // after it set the dedent width.
    let mut reverse = Utf8Reader::from_str(&body);
    reverse.seek(SeekFrom::End(0));
    let mut dedent_width = 0usize;
    let trailing_newline_at = loop {
        let Some(rune) = reverse.read_reverse() else {
            return body;
        };
        if is_newline_rune(rune) {
            if rune == '\n' {
                // CR LF is a single newline
                reverse.read_one_reverse('\r');
            }
            break reverse.position();
        }
        if !rune.is_whitespace() {
            return body;
        }
        dedent_width += 1;
    };

    // Strip the trailing and leading slices. The two scans meet on the same
    // newline when the body is a single whitespace-only line.
    let mut body = body;
    body.truncate(trailing_newline_at);
    let remainder = body.split_off(leading_len.min(body.len()));

    if dedent_width == 0 {
        return remainder;
    }

    // Strip up to the dedent width of whitespace from the start of every
    // line, partial runs included.
    let mut dedented = String::with_capacity(remainder.len());
    let mut budget = dedent_width;
    for rune in remainder.chars() {
        if is_newline_rune(rune) {
            dedented.push(rune);
            budget = dedent_width;
        } else if budget > 0 && rune.is_whitespace() {
            budget -= 1;
        } else {
            budget = 0;
            dedented.push(rune);
        }
    }
    dedented
}
