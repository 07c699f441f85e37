use crate::constants::is_newline_rune;
use crate::number;
use crate::reader::JsonhReader;
use crate::token::{JsonhToken, TokenKind};
use crate::Result;

impl JsonhReader<'_> {
    /// Lexes a number, then re-reads it as a quoteless string when the rest
    /// of the line continues it (`6 ab a` is one string) or when the
    /// literal is malformed (`1.2.3` is one string).
    pub(crate) fn read_number_or_quoteless_string(&mut self) -> Result<JsonhToken> {
        let mut digits = String::new();
        match self.read_number(&mut digits) {
            Ok(token) => {
                let mut whitespace = String::new();
                if self.detect_quoteless_continuation(&mut whitespace) {
                    let seed = format!("{}{whitespace}", token.value);
                    self.read_quoteless_string(&seed, false)
                } else {
                    Ok(token)
                }
            }
            Err(_) => self.read_quoteless_string(&digits, false),
        }
    }

    /// Consumes whitespace on the current line and reports whether a
    /// quoteless string continues after it.
    fn detect_quoteless_continuation(&mut self, whitespace: &mut String) -> bool {
        loop {
            let Some(next) = self.utf8.peek() else {
                break;
            };

            // Quoteless strings cannot contain unescaped newlines
            if is_newline_rune(next) {
                return false;
            }
            if !next.is_whitespace() {
                break;
            }

            whitespace.push(next);
            self.utf8.read();
        }

        match self.utf8.peek() {
            Some(next) => next == '\\' || !self.reserved_runes().contains(&next),
            None => false,
        }
    }

    fn read_number(&mut self, digits: &mut String) -> Result<JsonhToken> {
        if let Some(sign) = self.utf8.read_any(&['-', '+']) {
            digits.push(sign);
        }

        let mut alphabet = number::DECIMAL_DIGITS;
        let mut has_base_specifier = false;
        let mut has_leading_zero = false;
        if self.utf8.read_one('0') {
            digits.push('0');
            has_leading_zero = true;

            if let Some(base) = self.utf8.read_any(&['x', 'X', 'b', 'B', 'o', 'O']) {
                digits.push(base);
                alphabet = match base {
                    'x' | 'X' => number::HEX_DIGITS,
                    'b' | 'B' => number::BINARY_DIGITS,
                    _ => number::OCTAL_DIGITS,
                };
                has_base_specifier = true;
                has_leading_zero = false;
            }
        }

        let digits_start = digits.len();
        self.read_digits(digits, alphabet, has_base_specifier, has_leading_zero)?;

        // In hex a trailing `e` is a digit, so the exponent sign is
        // mandatory: `0xe+3` is an exponent, `0xe3` is three hex digits.
        if digits.ends_with(['e', 'E']) {
            if let Some(sign) = self.utf8.read_any(&['-', '+']) {
                digits.push(sign);

                if has_base_specifier && digits.len() == digits_start + 2 {
                    return Err(self.err_lexical("Missing digit between base specifier and exponent"));
                }

                self.read_digits(digits, alphabet, false, false)?;
            }
        } else if let Some(marker) = self.utf8.read_any(&['e', 'E']) {
            digits.push(marker);

            if let Some(sign) = self.utf8.read_any(&['-', '+']) {
                digits.push(sign);
            }

            self.read_digits(digits, alphabet, false, false)?;
        }

        Ok(JsonhToken::new(TokenKind::Number, digits.as_str()))
    }

    fn read_digits(
        &mut self,
        digits: &mut String,
        alphabet: &str,
        has_base_specifier: bool,
        has_leading_zero: bool,
    ) -> Result<()> {
        if !has_base_specifier && !has_leading_zero && self.utf8.peek() == Some('_') {
            return Err(self.err_lexical("Leading `_` in number"));
        }

        let mut in_fraction = false;
        let mut empty = !has_leading_zero;

        loop {
            let Some(next) = self.utf8.peek() else {
                break;
            };

            if alphabet.contains(next.to_ascii_lowercase()) {
                self.utf8.read();
                digits.push(next);
                empty = false;
            } else if next == '.' {
                if digits.ends_with('_') {
                    return Err(self.err_lexical("`.` must not follow `_` in number"));
                }

                self.utf8.read();
                digits.push(next);
                empty = false;

                if in_fraction {
                    return Err(self.err_lexical("Duplicate `.` in number"));
                }
                in_fraction = true;
            } else if next == '_' {
                if digits.ends_with('.') {
                    return Err(self.err_lexical("`_` must not follow `.` in number"));
                }

                self.utf8.read();
                digits.push(next);
                empty = false;
            } else {
                break;
            }
        }

        if empty {
            return Err(self.err_lexical("Empty number"));
        }
        if !digits.chars().any(|rune| !matches!(rune, '.' | '-' | '+' | '_')) {
            return Err(self.err_lexical("Number must have at least one digit"));
        }
        if digits.ends_with('_') {
            return Err(self.err_lexical("Trailing `_` in number"));
        }

        Ok(())
    }
}
