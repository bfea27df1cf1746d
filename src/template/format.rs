//! printf-style formatting for `{key|format}` placeholders.
//!
//! A format is literal text around exactly one verb, e.g. `%03d` or `v%.2f`.
//! `%%` is a literal percent sign.

use serde_json::{Number, Value};

use super::stringify;

/// A parsed format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    prefix: String,
    spec: Spec,
    suffix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Spec {
    minus: bool,
    plus: bool,
    space: bool,
    zero: bool,
    sharp: bool,
    width: Option<usize>,
    precision: Option<usize>,
    verb: char,
}

const VERBS: &str = "dibcoxXeEfFgGsqvt";

impl Format {
    /// Parse a format string. Errors carry a human readable reason.
    pub fn parse(s: &str) -> Result<Self, String> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut spec = None;
        let mut chars = s.chars().peekable();

        while let Some(c) = chars.next() {
            let out = if spec.is_some() { &mut suffix } else { &mut prefix };
            if c != '%' {
                out.push(c);
                continue;
            }
            if chars.next_if_eq(&'%').is_some() {
                out.push('%');
                continue;
            }
            if spec.is_some() {
                return Err("format must contain exactly one verb".to_string());
            }

            let mut parsed = Spec::default();
            while let Some(flag) = chars.next_if(|c| "-+ 0#".contains(*c)) {
                match flag {
                    '-' => parsed.minus = true,
                    '+' => parsed.plus = true,
                    ' ' => parsed.space = true,
                    '0' => parsed.zero = true,
                    _ => parsed.sharp = true,
                }
            }
            parsed.width = number(&mut chars);
            if chars.next_if_eq(&'.').is_some() {
                parsed.precision = Some(number(&mut chars).unwrap_or(0));
            }
            match chars.next() {
                Some(verb) if VERBS.contains(verb) => parsed.verb = verb,
                Some(verb) => return Err(format!("unknown verb '%{verb}'")),
                None => return Err("incomplete verb".to_string()),
            }
            spec = Some(parsed);
        }

        let spec = spec.ok_or_else(|| "format must contain exactly one verb".to_string())?;
        Ok(Self {
            prefix,
            spec,
            suffix,
        })
    }

    /// Format a single value. Errors when the verb does not apply to the
    /// value's type.
    pub fn apply(&self, value: &Value) -> Result<String, String> {
        let body = self.spec.format(value)?;
        Ok(format!("{}{}{}", self.prefix, body, self.suffix))
    }
}

fn number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut n: Option<usize> = None;
    while let Some(d) = chars.next_if(char::is_ascii_digit) {
        let digit = d.to_digit(10).unwrap_or(0) as usize;
        n = Some(n.unwrap_or(0).saturating_mul(10).saturating_add(digit));
    }
    n
}

/// Numeric view of a JSON value.
enum Num {
    Int(i128),
    Float(f64),
}

fn as_num(n: &Number) -> Num {
    if let Some(i) = n.as_i64() {
        Num::Int(i.into())
    } else if let Some(u) = n.as_u64() {
        Num::Int(u.into())
    } else {
        Num::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "table",
    }
}

impl Spec {
    fn format(&self, value: &Value) -> Result<String, String> {
        let mismatch = || format!("verb '%{}' cannot format {}", self.verb, type_name(value));
        match (self.verb, value) {
            ('d' | 'i' | 'b' | 'o' | 'x' | 'X' | 'c', Value::Number(n)) => {
                let i = match as_num(n) {
                    Num::Int(i) => i,
                    Num::Float(f) if f.fract() == 0.0 && f.abs() < 1e18 => f as i128,
                    Num::Float(_) => return Err(mismatch()),
                };
                if self.verb == 'c' {
                    let c = u32::try_from(i).ok().and_then(char::from_u32).ok_or_else(mismatch)?;
                    return Ok(self.pad(c.to_string()));
                }
                Ok(self.integer(i))
            }
            ('e' | 'E' | 'f' | 'F' | 'g' | 'G', Value::Number(n)) => {
                let f = match as_num(n) {
                    Num::Int(i) => i as f64,
                    Num::Float(f) => f,
                };
                Ok(self.float(f))
            }
            ('x' | 'X', Value::String(s)) => {
                let hex: String = s.bytes().map(|b| format!("{b:02x}")).collect();
                let hex = if self.verb == 'X' { hex.to_uppercase() } else { hex };
                Ok(self.pad(hex))
            }
            ('t', Value::Bool(b)) => Ok(self.pad(b.to_string())),
            ('q', Value::String(s)) => Ok(self.pad(quote(s))),
            ('s' | 'v', _) => {
                let mut s = stringify(value);
                if let Some(p) = self.precision {
                    s = s.chars().take(p).collect();
                }
                Ok(self.pad(s))
            }
            _ => Err(mismatch()),
        }
    }

    fn integer(&self, i: i128) -> String {
        let negative = i < 0;
        let magnitude = i.unsigned_abs();
        let (mut digits, prefix) = match self.verb {
            'b' => (format!("{magnitude:b}"), "0b"),
            'o' => (format!("{magnitude:o}"), "0"),
            'x' => (format!("{magnitude:x}"), "0x"),
            'X' => (format!("{magnitude:X}"), "0X"),
            _ => (magnitude.to_string(), ""),
        };
        if let Some(p) = self.precision {
            if p == 0 && magnitude == 0 {
                digits.clear();
            }
            while digits.len() < p {
                digits.insert(0, '0');
            }
        }
        if self.sharp && !prefix.is_empty() && !(self.verb == 'o' && digits.starts_with('0')) {
            digits.insert_str(0, prefix);
        }
        self.pad_number(negative, digits, self.precision.is_none())
    }

    fn float(&self, f: f64) -> String {
        if !f.is_finite() {
            let s = if f.is_nan() { "NaN" } else { "Inf" };
            return self.pad_number(f.is_sign_negative() && !f.is_nan(), s.to_string(), false);
        }
        let negative = f.is_sign_negative();
        let f = f.abs();
        let digits = match self.verb {
            'f' | 'F' => format!("{:.*}", self.precision.unwrap_or(6), f),
            'e' => exponent(f, self.precision.unwrap_or(6)),
            'E' => exponent(f, self.precision.unwrap_or(6)).to_uppercase(),
            'g' => general(f, self.precision, self.sharp),
            _ => general(f, self.precision, self.sharp).to_uppercase(),
        };
        self.pad_number(negative, digits, true)
    }

    /// Apply sign and width to a number's digits. Zero padding goes between
    /// the sign and the digits.
    fn pad_number(&self, negative: bool, digits: String, zero_allowed: bool) -> String {
        let sign = if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        };
        let width = self.width.unwrap_or(0);
        let len = sign.len() + digits.chars().count();
        if self.zero && zero_allowed && !self.minus && len < width {
            format!("{sign}{}{digits}", "0".repeat(width - len))
        } else {
            self.pad(format!("{sign}{digits}"))
        }
    }

    /// Pad with spaces to the field width.
    fn pad(&self, s: String) -> String {
        let width = self.width.unwrap_or(0);
        let len = s.chars().count();
        if len >= width {
            s
        } else if self.minus {
            format!("{s}{}", " ".repeat(width - len))
        } else {
            format!("{}{s}", " ".repeat(width - len))
        }
    }
}

/// Double-quoted string with printf-style escapes for control characters.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `%e` formatting of a non-negative number: `d.dddde±XX`.
fn exponent(f: f64, precision: usize) -> String {
    let s = format!("{:.*e}", precision, f);
    split_exponent(&s)
        .map(|(mantissa, exp)| format!("{mantissa}e{}", exponent_suffix(exp)))
        .unwrap_or(s)
}

fn exponent_suffix(exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{sign}{:02}", exp.unsigned_abs())
}

fn split_exponent(s: &str) -> Option<(&str, i32)> {
    let (mantissa, exp) = s.split_once('e')?;
    Some((mantissa, exp.parse().ok()?))
}

/// `%g` formatting: shortest representation when no precision is given,
/// otherwise `precision` significant digits. Scientific notation is used for
/// small or large exponents.
pub(crate) fn general(f: f64, precision: Option<usize>, sharp: bool) -> String {
    if f.is_sign_negative() {
        return format!("-{}", general(-f, precision, sharp));
    }
    let scientific = match precision {
        Some(p) => format!("{:.*e}", p.max(1) - 1, f),
        None => format!("{f:e}"),
    };
    let Some((mantissa, exp)) = split_exponent(&scientific) else {
        return scientific;
    };
    let mut digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    if !sharp {
        let trimmed = digits.trim_end_matches('0').len().max(1);
        digits.truncate(trimmed);
    }

    let eprec = match precision {
        None => 6,
        Some(p) => {
            let p = p.max(1) as i64;
            let nd = digits.len() as i64;
            if p > nd && nd >= i64::from(exp) + 1 {
                nd
            } else {
                p
            }
        }
    };
    let exp = i64::from(exp);

    if exp < -4 || exp >= eprec {
        let (head, tail) = digits.split_at(1);
        let mantissa = if tail.is_empty() {
            head.to_string()
        } else {
            format!("{head}.{tail}")
        };
        return format!("{mantissa}e{}", exponent_suffix(exp as i32));
    }

    // plain decimal: place the point after exp+1 digits
    let point = exp + 1;
    if point <= 0 {
        format!("0.{}{digits}", "0".repeat((-point) as usize))
    } else if point as usize >= digits.len() {
        format!("{digits}{}", "0".repeat(point as usize - digits.len()))
    } else {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    }
}
