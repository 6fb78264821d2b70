//! Cell values and the inference rules that produce them.
//!
//! [`classify()`] turns one trimmed cell into a [`CellValue`] by trying, in
//! order, integer, float, boolean, and finally falling back to text. The
//! order matters: `"1"` is an integer, `"1.0"` a float, `"true"` a boolean.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A typed cell.
///
/// Serializes untagged. JSON has no infinity, so a float literal that
/// overflows `f64` (`1e400`) is written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

/// [`classify()`] never produces NaN, which is what makes `Eq` sound. A
/// hand-built `CellValue::Float(f64::NAN)` is not equal to itself.
impl Eq for CellValue {}

impl CellValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            CellValue::Integer(_) => ValueKind::Integer,
            CellValue::Float(_) => ValueKind::Float,
            CellValue::Boolean(_) => ValueKind::Boolean,
            CellValue::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 {
                    format!("{f:.1}")
                } else {
                    f.to_string()
                }
            }
            CellValue::Boolean(b) => b.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// The tag of a [`CellValue`], also used as the optional type hint of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Integer => "Integer",
            ValueKind::Float => "Float",
            ValueKind::Boolean => "Boolean",
            ValueKind::Text => "Text",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "integer" | "int" | "i64" => Ok(ValueKind::Integer),
            "float" | "double" | "f64" => Ok(ValueKind::Float),
            "boolean" | "bool" => Ok(ValueKind::Boolean),
            "text" | "string" | "str" => Ok(ValueKind::Text),
            _ => Err(format!("unknown value type '{value}'")),
        }
    }
}

impl Serialize for ValueKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ValueKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Classifies an already trimmed cell. First matching rule wins.
pub fn classify(text: &str) -> CellValue {
    if let Some(value) = parse_integer(text) {
        return CellValue::Integer(value);
    }
    if let Some(value) = parse_float(text) {
        return CellValue::Float(value);
    }
    if let Some(value) = parse_boolean(text) {
        return CellValue::Boolean(value);
    }
    CellValue::Text(text.to_string())
}

/// Optional sign followed by ASCII digits. Leading zeros are fine; values
/// outside `i64` are left for the float rule.
fn parse_integer(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Plain decimal/exponent notation only; `inf` and `nan` spellings stay text.
fn parse_float(text: &str) -> Option<f64> {
    let mut saw_digit = false;
    for byte in text.bytes() {
        match byte {
            b'0'..=b'9' => saw_digit = true,
            b'+' | b'-' | b'.' | b'e' | b'E' => {}
            _ => return None,
        }
    }
    if !saw_digit {
        return None;
    }
    text.parse().ok()
}

fn parse_boolean(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Types that a [`CellValue`] can be read back as, without conversion.
pub trait FromCell<'a>: Sized {
    const KIND: ValueKind;

    fn from_cell(value: &'a CellValue) -> Option<Self>;
}

impl<'a> FromCell<'a> for i64 {
    const KIND: ValueKind = ValueKind::Integer;

    fn from_cell(value: &'a CellValue) -> Option<Self> {
        match value {
            CellValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl<'a> FromCell<'a> for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn from_cell(value: &'a CellValue) -> Option<Self> {
        match value {
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl<'a> FromCell<'a> for bool {
    const KIND: ValueKind = ValueKind::Boolean;

    fn from_cell(value: &'a CellValue) -> Option<Self> {
        match value {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl<'a> FromCell<'a> for &'a str {
    const KIND: ValueKind = ValueKind::Text;

    fn from_cell(value: &'a CellValue) -> Option<Self> {
        match value {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl<'a> FromCell<'a> for String {
    const KIND: ValueKind = ValueKind::Text;

    fn from_cell(value: &'a CellValue) -> Option<Self> {
        match value {
            CellValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}
