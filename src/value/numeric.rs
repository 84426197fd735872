//! Standard numeric format specifiers
//!
//! A specifier is one letter optionally followed by a precision, e.g. `N2`
//! or `x8`. Picture strings such as `#,##0.00` are not supported.

use crate::error::RenderError;
use crate::provider::NumberFormat;

const MAX_PRECISION: usize = 99;

fn parse_spec(spec: &str) -> Result<(char, Option<usize>), RenderError> {
    let mut chars = spec.chars();
    let letter = chars
        .next()
        .filter(char::is_ascii_alphabetic)
        .ok_or_else(|| unsupported(spec))?;

    let digits = chars.as_str();
    if digits.is_empty() {
        return Ok((letter, None));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(unsupported(spec));
    }
    match digits.parse::<usize>() {
        Ok(precision) if precision <= MAX_PRECISION => Ok((letter, Some(precision))),
        _ => Err(RenderError::invalid_format(
            spec,
            format!("precision of '{}' is out of range", spec),
        )),
    }
}

fn unsupported(spec: &str) -> RenderError {
    RenderError::invalid_format(spec, format!("format specifier '{}' is not supported", spec))
}

pub(crate) fn format_integer(
    value: i128,
    spec: &str,
    numbers: &NumberFormat,
) -> Result<String, RenderError> {
    let (letter, precision) = parse_spec(spec)?;
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();

    match letter {
        'D' | 'd' => {
            let width = precision.unwrap_or(0);
            Ok(format!("{}{:0>width$}", sign, magnitude, width = width))
        }
        'X' | 'x' => {
            // Negative values print as their 64-bit two's complement.
            let bits = if value < 0 {
                u128::from(value as i64 as u64)
            } else {
                magnitude
            };
            let width = precision.unwrap_or(0);
            Ok(if letter == 'X' {
                format!("{:0>width$X}", bits, width = width)
            } else {
                format!("{:0>width$x}", bits, width = width)
            })
        }
        'F' | 'f' => Ok(fixed(
            sign,
            &magnitude.to_string(),
            "",
            precision.unwrap_or(2),
            numbers,
            false,
        )),
        'N' | 'n' => Ok(fixed(
            sign,
            &magnitude.to_string(),
            "",
            precision.unwrap_or(2),
            numbers,
            true,
        )),
        'G' | 'g' if precision.is_none() => Ok(value.to_string()),
        'E' | 'e' | 'P' | 'p' | 'G' | 'g' => format_float(value as f64, spec, numbers),
        _ => Err(unsupported(spec)),
    }
}

pub(crate) fn format_float(
    value: f64,
    spec: &str,
    numbers: &NumberFormat,
) -> Result<String, RenderError> {
    let (letter, precision) = parse_spec(spec)?;

    if !value.is_finite() {
        return match letter {
            'F' | 'f' | 'N' | 'n' | 'E' | 'e' | 'P' | 'p' | 'G' | 'g' => Ok(value.to_string()),
            _ => Err(unsupported(spec)),
        };
    }

    match letter {
        'F' | 'f' => Ok(decimal(value, precision.unwrap_or(2), numbers, false)),
        'N' | 'n' => Ok(decimal(value, precision.unwrap_or(2), numbers, true)),
        'P' | 'p' => Ok(format!(
            "{} %",
            decimal(value * 100.0, precision.unwrap_or(2), numbers, true)
        )),
        'E' | 'e' => Ok(scientific(value, precision.unwrap_or(6), letter, numbers)),
        'G' | 'g' => {
            let general = match precision {
                Some(digits) if digits > 0 => {
                    let rounded = format!("{:.*e}", digits - 1, value);
                    rounded.parse::<f64>().unwrap_or(value)
                }
                _ => value,
            };
            Ok(general
                .to_string()
                .replace('.', &numbers.decimal_separator.to_string()))
        }
        _ => Err(unsupported(spec)),
    }
}

fn decimal(value: f64, precision: usize, numbers: &NumberFormat, grouped: bool) -> String {
    let text = format!("{:.*}", precision, value.abs());
    let (integral, fraction) = match text.split_once('.') {
        Some((integral, fraction)) => (integral, fraction),
        None => (text.as_str(), ""),
    };
    let negative = value < 0.0 && text.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    let sign = if negative { "-" } else { "" };
    let mut result = String::new();
    result.push_str(sign);
    result.push_str(&group(integral, numbers.group_separator, grouped));
    if !fraction.is_empty() {
        result.push(numbers.decimal_separator);
        result.push_str(fraction);
    }
    result
}

fn fixed(
    sign: &str,
    integral: &str,
    fraction: &str,
    precision: usize,
    numbers: &NumberFormat,
    grouped: bool,
) -> String {
    let mut result = String::from(sign);
    result.push_str(&group(integral, numbers.group_separator, grouped));
    if precision > 0 {
        result.push(numbers.decimal_separator);
        result.push_str(&format!("{:0<width$}", fraction, width = precision));
    }
    result
}

fn group(integral: &str, separator: char, grouped: bool) -> String {
    if !grouped || integral.len() <= 3 {
        return integral.to_string();
    }
    let mut result = String::with_capacity(integral.len() + integral.len() / 3);
    for (i, digit) in integral.chars().enumerate() {
        if i > 0 && (integral.len() - i) % 3 == 0 {
            result.push(separator);
        }
        result.push(digit);
    }
    result
}

fn scientific(value: f64, precision: usize, letter: char, numbers: &NumberFormat) -> String {
    let text = format!("{:.*e}", precision, value);
    let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!(
        "{}{}{}{:03}",
        mantissa.replace('.', &numbers.decimal_separator.to_string()),
        letter,
        sign,
        exponent.unsigned_abs()
    )
}
