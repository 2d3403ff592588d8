//! Style configuration: flattening the sectioned host config into a lookup
//! table, and the loose value coercions the host's style values expect.
//!
//! Host style values arrive untyped. A colour option is an object with a
//! `color` field, a checkbox is a boolean, and sizes or offsets may be numbers
//! or numeric strings. The accessors here never fail: an unknown id reads as
//! absent and callers pick their own defaults.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

lazy_static! {
    static ref LEADING_INT: Regex = Regex::new(r"^\s*([+-]?\d+)").unwrap();
    static ref DECIMAL: Regex =
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap();
    static ref RADIX: Regex = Regex::new(r"^0([xX][0-9a-fA-F]+|[oO][0-7]+|[bB][01]+)$").unwrap();
}

/// One configurable style option as delivered by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleElement {
    pub id: String,
    /// `None` only when the `value` key is missing; an explicit `null` is kept
    #[serde(default, deserialize_with = "present_value", skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A titled group of style options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleSection {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub elements: Vec<StyleElement>,
}

/// Flat mapping from style option id to its configured value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    values: HashMap<String, Value>,
}

/// Flatten style sections into one id -> value map.
///
/// Later elements with the same id replace earlier ones; an element without a
/// `value` key clears the id, while an explicit `null` is stored as such.
pub fn parse_style(sections: &[StyleSection]) -> Style {
    let mut values = HashMap::new();
    for element in sections.iter().flat_map(|s| s.elements.iter()) {
        match &element.value {
            Some(v) => {
                values.insert(element.id.clone(), v.clone());
            }
            None => {
                values.remove(&element.id);
            }
        }
    }
    Style { values }
}

impl Style {
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The `color` field of a colour option
    pub fn color(&self, id: &str) -> Option<&str> {
        self.get(id)?.get("color")?.as_str()
    }

    pub fn is_truthy(&self, id: &str) -> bool {
        truthy(self.get(id))
    }

    /// Numeric value with `Number()` semantics: absent or unparsable is NaN.
    pub fn number(&self, id: &str) -> f64 {
        to_number(self.get(id))
    }

    /// Leading integer with `parseInt()` semantics: unparsable is NaN.
    pub fn integer(&self, id: &str) -> f64 {
        parse_int(self.get(id))
    }

    /// CSS font-size declaration value. Bare numbers are taken as pixels.
    pub fn font_size(&self, id: &str) -> Option<String> {
        match self.get(id)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(format!("{}px", n)),
            _ => None,
        }
    }
}

impl FromIterator<(String, Value)> for Style {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Truthiness of a loosely typed value. Absent, null, false, 0, NaN and the
/// empty string are false; everything else is true.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Convert a loosely typed value to a number the way `Number(value)` does.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => string_to_number(s),
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [single] if !single.is_array() && !single.is_object() => match single {
                Value::Null => 0.0,
                Value::String(s) => string_to_number(s),
                Value::Bool(_) => f64::NAN,
                other => to_number(Some(other)),
            },
            _ => f64::NAN,
        },
        Some(Value::Object(_)) => f64::NAN,
    }
}

fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    if DECIMAL.is_match(s) {
        return s.parse().unwrap_or(f64::NAN);
    }
    if let Some(rest) = s.strip_suffix("Infinity") {
        return match rest {
            "" | "+" => f64::INFINITY,
            "-" => f64::NEG_INFINITY,
            _ => f64::NAN,
        };
    }
    if RADIX.is_match(s) {
        let (radix, digits) = match &s[1..2] {
            "x" | "X" => (16, &s[2..]),
            "o" | "O" => (8, &s[2..]),
            _ => (2, &s[2..]),
        };
        return u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
    }
    f64::NAN
}

/// Leading decimal integer of a value's text, the way `parseInt(value, 10)` reads it.
pub fn parse_int(value: Option<&Value>) -> f64 {
    let text = match value {
        None | Some(Value::Null) => return f64::NAN,
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => {
            return n.as_f64().map_or(f64::NAN, f64::trunc);
        }
        Some(other) => other.to_string(),
    };
    LEADING_INT
        .captures(&text)
        .and_then(|c| c[1].parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}
