use smallvec::SmallVec;

use crate::{Error, Result};

pub(crate) const DECIMAL_DIGITS: &str = "0123456789";
pub(crate) const HEX_DIGITS: &str = "0123456789abcdef";
pub(crate) const BINARY_DIGITS: &str = "01";
pub(crate) const OCTAL_DIGITS: &str = "01234567";

/// Converts the lexical text of a number token to a base-10 real.
///
/// For example `+5.2e3.0` converts to `5200`. Both the mantissa and the
/// exponent may be fractional and are read in the base declared by the
/// `0x`/`0b`/`0o` prefix. Values fold through `f64` arithmetic, so very
/// large magnitudes round silently.
pub(crate) fn parse(text: &str) -> Result<f64> {
    let mut scratch: SmallVec<[u8; 32]> = SmallVec::with_capacity(text.len());
    for &byte in text.as_bytes() {
        if byte != b'_' {
            scratch.push(byte);
        }
    }
    let digits = std::str::from_utf8(&scratch).map_err(|_| Error::semantic("Invalid digit"))?;

    let (sign, digits) = split_sign(digits);

    let (alphabet, digits) = match digits.get(..2) {
        Some("0x") | Some("0X") => (HEX_DIGITS, &digits[2..]),
        Some("0b") | Some("0B") => (BINARY_DIGITS, &digits[2..]),
        Some("0o") | Some("0O") => (OCTAL_DIGITS, &digits[2..]),
        _ => (DECIMAL_DIGITS, digits),
    };

    let (mantissa_digits, exponent_digits) = split_exponent(digits, alphabet == HEX_DIGITS);

    let mantissa = parse_fractional(mantissa_digits, alphabet)?;
    let value = match exponent_digits {
        Some(exponent_digits) => {
            let exponent = parse_fractional(exponent_digits, alphabet)?;
            mantissa * 10f64.powf(exponent)
        }
        None => mantissa,
    };
    Ok(sign * value)
}

fn split_sign(digits: &str) -> (f64, &str) {
    if let Some(rest) = digits.strip_prefix('-') {
        return (-1.0, rest);
    }
    (1.0, digits.strip_prefix('+').unwrap_or(digits))
}

/// Splits `12.3e4.5` into mantissa and exponent. Hex digits include `e`, so
/// in hex mode only an `e`/`E` immediately followed by a sign splits.
fn split_exponent(digits: &str, hex: bool) -> (&str, Option<&str>) {
    let bytes = digits.as_bytes();
    for (index, &byte) in bytes.iter().enumerate() {
        if byte == b'e' || byte == b'E' {
            if hex && !matches!(bytes.get(index + 1), Some(b'+') | Some(b'-')) {
                continue;
            }
            return (&digits[..index], Some(&digits[index + 1..]));
        }
    }
    (digits, None)
}

/// Converts a fractional number such as `123.45` from the given digit
/// alphabet to a base-10 real.
fn parse_fractional(digits: &str, alphabet: &str) -> Result<f64> {
    let (sign, digits) = split_sign(digits);
    if digits.is_empty() {
        return Err(Error::lexical("Empty number"));
    }

    if alphabet == DECIMAL_DIGITS {
        let value: f64 = digits.parse().map_err(|_| Error::semantic("Invalid digit"))?;
        return Ok(sign * value);
    }

    let base = alphabet.len() as f64;
    match digits.split_once('.') {
        None => Ok(sign * parse_whole(digits, alphabet)?),
        Some((whole_digits, fraction_digits)) => {
            let whole = match whole_digits {
                "" => 0.0,
                _ => parse_whole(whole_digits, alphabet)?,
            };
            let fraction = match fraction_digits {
                "" => 0.0,
                _ => parse_whole(fraction_digits, alphabet)?,
            };
            // Leading zeros in the fraction shift the value, so the divisor
            // is sized by digit count rather than by the parsed value.
            Ok(sign * (whole + fraction / base.powi(fraction_digits.len() as i32)))
        }
    }
}

fn parse_whole(digits: &str, alphabet: &str) -> Result<f64> {
    let base = alphabet.len() as f64;
    let mut value = 0.0f64;
    for rune in digits.chars() {
        let digit = alphabet
            .find(rune.to_ascii_lowercase())
            .ok_or_else(|| Error::semantic("Invalid digit"))?;
        value = value * base + digit as f64;
    }
    Ok(value)
}
