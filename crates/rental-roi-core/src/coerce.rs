//! Lenient deserializers for user-entered numbers.
//!
//! Form fields arrive as numbers, numeric strings, blanks or garbage. The
//! engine never rejects them: a leading number is kept and anything else is
//! read as zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Deserialize a `Decimal`, coercing non-numeric input to zero.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_value(&value))
}

/// Deserialize a `bool` from `true`/`false`, `"true"`/`"yes"`/`"on"`, or a
/// non-zero number. Anything else is `false`.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "on" | "1"
        ),
        Value::Number(_) => !decimal_from_value(&value).is_zero(),
        _ => false,
    })
}

/// Parse free text the way the input form does: the longest leading number
/// ("12abc" is 12, "1,500" is 1), or zero when the text does not start with
/// one. Numbers outside the `Decimal` range also read as zero.
pub fn parse_or_zero(text: &str) -> Decimal {
    let trimmed = text.trim();
    if let Ok(value) = Decimal::from_str(trimmed) {
        return value;
    }
    let Some((mantissa, exponent)) = leading_number(trimmed) else {
        return Decimal::ZERO;
    };
    match exponent {
        Some(exp) => Decimal::from_scientific(&format!("{mantissa}e{exp}")),
        None => Decimal::from_str(&mantissa),
    }
    .unwrap_or(Decimal::ZERO)
}

/// Split off `[sign] digits [. digits] [e [sign] digits]` from the front of
/// `text`. Returns the normalised mantissa and the exponent digits.
fn leading_number(text: &str) -> Option<(String, Option<&str>)> {
    let bytes = text.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    let (sign, mut i) = match bytes.first() {
        Some(b'-') => ("-", 1),
        Some(b'+') => ("", 1),
        _ => ("", 0),
    };
    let int_start = i;
    while is_digit(i) {
        i += 1;
    }
    let int_part = &text[int_start..i];

    let mut frac_part = "";
    if bytes.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        i = frac_start;
        while is_digit(i) {
            i += 1;
        }
        frac_part = &text[frac_start..i];
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut exponent = None;
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let exp_start = i + 1;
        let mut j = exp_start;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let digits_start = j;
        while is_digit(j) {
            j += 1;
        }
        if j > digits_start {
            exponent = Some(text[exp_start..j].trim_start_matches('+'));
        }
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let mantissa = if frac_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    };
    Some((mantissa, exponent))
}

fn decimal_from_value(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_or_zero(&n.to_string()),
        Value::String(s) => parse_or_zero(s),
        _ => Decimal::ZERO,
    }
}
