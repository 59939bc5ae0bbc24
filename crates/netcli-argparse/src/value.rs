//! Typed option storage and numeric coercion.

use std::borrow::Cow;
use std::fmt;

use crate::error::{ParseError, ParseResult};

/// The value kind of a registered option. Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Flag,
    Text,
    Integer,
    Real,
}

impl Kind {
    pub(crate) fn article_name(&self) -> &'static str {
        match self {
            Self::Flag => "a boolean",
            Self::Text => "a string",
            Self::Integer => "an integer",
            Self::Real => "a float",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Flag => "flag",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Real => "real",
        };
        f.write_str(name)
    }
}

/// A single typed option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Flag(bool),
    Text(Cow<'a, str>),
    Integer(i64),
    Real(f64),
}

impl Value<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Flag(_) => Kind::Flag,
            Self::Text(_) => Kind::Text,
            Self::Integer(_) => Kind::Integer,
            Self::Real(_) => Kind::Real,
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Self::Text(Cow::Borrowed(v))
    }
}

impl From<String> for Value<'_> {
    fn from(v: String) -> Self {
        Self::Text(Cow::Owned(v))
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(v: Cow<'a, str>) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for Value<'_> {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

/// Homogeneous storage: one vector per kind, so a value of the wrong kind
/// can never end up in an option.
#[derive(Debug, Clone, PartialEq)]
enum Values<'a> {
    Flag(Vec<bool>),
    Text(Vec<Cow<'a, str>>),
    Integer(Vec<i64>),
    Real(Vec<f64>),
}

impl Values<'_> {
    fn empty(kind: Kind) -> Self {
        match kind {
            Kind::Flag => Self::Flag(Vec::new()),
            Kind::Text => Self::Text(Vec::new()),
            Kind::Integer => Self::Integer(Vec::new()),
            Kind::Real => Self::Real(Vec::new()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Flag(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::Integer(v) => v.len(),
            Self::Real(v) => v.len(),
        }
    }
}

/// The state of one registered option: its typed values plus the `found`
/// and `greedy` markers.
///
/// Scalar options start with their default as the only value; list options
/// start empty. Reading a scalar returns the most recently appended value.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionValue<'a> {
    values: Values<'a>,
    found: bool,
    greedy: bool,
}

impl<'a> OptionValue<'a> {
    /// A scalar option holding `default` until something is appended.
    pub fn scalar(default: impl Into<Value<'a>>) -> Self {
        let default = default.into();
        let mut opt = Self::list(default.kind(), false);
        // Kinds agree by construction.
        let _ = opt.append(default);
        opt
    }

    /// A boolean flag defaulting to `false`.
    pub fn flag() -> Self {
        Self::scalar(false)
    }

    /// An initially empty list option.
    pub fn list(kind: Kind, greedy: bool) -> Self {
        Self {
            values: Values::empty(kind),
            found: false,
            greedy,
        }
    }

    pub fn kind(&self) -> Kind {
        match &self.values {
            Values::Flag(_) => Kind::Flag,
            Values::Text(_) => Kind::Text,
            Values::Integer(_) => Kind::Integer,
            Values::Real(_) => Kind::Real,
        }
    }

    /// Whether the option appeared on the command line.
    pub fn found(&self) -> bool {
        self.found
    }

    pub(crate) fn mark_found(&mut self) {
        self.found = true;
    }

    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        match &mut self.values {
            Values::Flag(v) => v.clear(),
            Values::Text(v) => v.clear(),
            Values::Integer(v) => v.clear(),
            Values::Real(v) => v.clear(),
        }
    }

    /// Append a value. On a kind mismatch the value is rejected and its kind
    /// is returned.
    pub fn append(&mut self, value: Value<'a>) -> Result<(), Kind> {
        match (&mut self.values, value) {
            (Values::Flag(v), Value::Flag(x)) => v.push(x),
            (Values::Text(v), Value::Text(x)) => v.push(x),
            (Values::Integer(v), Value::Integer(x)) => v.push(x),
            (Values::Real(v), Value::Real(x)) => v.push(x),
            (_, other) => return Err(other.kind()),
        }
        Ok(())
    }

    /// Coerce a raw command-line token to this option's kind and append it.
    pub(crate) fn append_raw(&mut self, raw: &'a str) -> ParseResult<()> {
        match &mut self.values {
            Values::Flag(v) => v.push(true),
            Values::Text(v) => v.push(Cow::Borrowed(raw)),
            Values::Integer(v) => v.push(parse_int(raw)?),
            Values::Real(v) => v.push(parse_float(raw)?),
        }
        Ok(())
    }

    /// The most recently appended value, if any.
    pub fn current(&self) -> Option<Value<'_>> {
        match &self.values {
            Values::Flag(v) => v.last().map(|x| Value::Flag(*x)),
            Values::Text(v) => v.last().map(|x| Value::Text(Cow::Borrowed(x.as_ref()))),
            Values::Integer(v) => v.last().map(|x| Value::Integer(*x)),
            Values::Real(v) => v.last().map(|x| Value::Real(*x)),
        }
    }

    /// Every value in insertion order.
    pub fn all_values(&self) -> Vec<Value<'a>> {
        match &self.values {
            Values::Flag(v) => v.iter().map(|x| Value::Flag(*x)).collect(),
            Values::Text(v) => v.iter().cloned().map(Value::Text).collect(),
            Values::Integer(v) => v.iter().map(|x| Value::Integer(*x)).collect(),
            Values::Real(v) => v.iter().map(|x| Value::Real(*x)).collect(),
        }
    }

    pub fn flags(&self) -> Option<&[bool]> {
        match &self.values {
            Values::Flag(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn texts(&self) -> Option<&[Cow<'a, str>]> {
        match &self.values {
            Values::Text(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn integers(&self) -> Option<&[i64]> {
        match &self.values {
            Values::Integer(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn reals(&self) -> Option<&[f64]> {
        match &self.values {
            Values::Real(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = match &self.values {
            Values::Flag(v) => v.iter().map(|x| x.to_string()).collect(),
            Values::Text(v) => v.iter().map(|x| x.to_string()).collect(),
            Values::Integer(v) => v.iter().map(|x| x.to_string()).collect(),
            Values::Real(v) => v.iter().map(|x| format!("{x:.6}")).collect(),
        };
        write!(f, "[{}]", items.join(", "))
    }
}

/// Parse an integer the way C's `strtol` does with base 0: optional leading
/// whitespace and sign, then `0x` hex, `0` octal or decimal digits.
/// Nothing may follow the digits.
pub fn parse_int(input: &str) -> ParseResult<i64> {
    let invalid = || ParseError::NumericInvalidFormat {
        input: input.to_string(),
        target: Kind::Integer,
    };

    let trimmed = input.trim_start();
    let (negative, unsigned) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix('+') {
        (false, rest)
    } else {
        (false, trimmed)
    };

    let (radix, digits) = if let Some(rest) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        (16, rest)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }

    // Digits are validated above, so any failure here is an overflow.
    let out_of_range = || ParseError::NumericOutOfRange {
        input: input.to_string(),
    };
    let magnitude = u128::from_str_radix(digits, radix).map_err(|_| out_of_range())?;
    let magnitude = i128::try_from(magnitude).map_err(|_| out_of_range())?;
    let signed = if negative { -magnitude } else { magnitude };
    i64::try_from(signed).map_err(|_| out_of_range())
}

/// Parse a floating-point number, allowing leading whitespace. A finite
/// literal too large for `f64` is out of range.
pub fn parse_float(input: &str) -> ParseResult<f64> {
    let trimmed = input.trim_start();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ParseError::NumericInvalidFormat {
            input: input.to_string(),
            target: Kind::Real,
        })?;

    if value.is_infinite() && !trimmed.to_ascii_lowercase().contains("inf") {
        return Err(ParseError::NumericOutOfRange {
            input: input.to_string(),
        });
    }
    Ok(value)
}
