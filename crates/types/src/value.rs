//! The loosely-typed value carried by fill instructions and field listings.
//!
//! On the wire a value is a JSON scalar or a homogeneous array. Arrays are
//! decoded by looking at their first element: strings give a
//! [`Value::StringList`], numbers a [`Value::NumberList`]. An empty array is an
//! empty string list. Any other shape is rejected.

use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const MIXED_ARRAY_MESSAGE: &str = "array may only be string[] or number[]";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(f64),
    Boolean(bool),
    StringList(Vec<String>),
    NumberList(Vec<f64>),
}

impl Value {
    /// Short type tag used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::StringList(_) => "string[]",
            Value::NumberList(_) => "number[]",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number as an integer if it has no fractional part.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Number(n) => integral(*n),
            _ => None,
        }
    }
}

/// Converts a float to an integer when it is integral and in range.
pub fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(list: Vec<String>) -> Self {
        Value::StringList(list)
    }
}

impl From<Vec<f64>> for Value {
    fn from(list: Vec<f64>) -> Self {
        Value::NumberList(list)
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    match integral(n) {
        Some(i) => write!(f, "{}", i),
        None => write!(f, "{}", n),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => write_number(f, *n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::StringList(list) => write!(f, "[{}]", list.join(", ")),
            Value::NumberList(list) => {
                f.write_str("[")?;
                for (i, n) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_number(f, *n)?;
                }
                f.write_str("]")
            }
        }
    }
}

fn serialize_number<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    match integral(n) {
        Some(i) => serializer.serialize_i64(i),
        None => serializer.serialize_f64(n),
    }
}

struct WireNumber(f64);

impl Serialize for WireNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_number(self.0, serializer)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Number(n) => serialize_number(*n, serializer),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::StringList(list) => list.serialize(serializer),
            Value::NumberList(list) => {
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for n in list {
                    seq.serialize_element(&WireNumber(*n))?;
                }
                seq.end()
            }
        }
    }
}

/// One decoded array element; anything that is neither string nor number is `Other`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ArrayItem {
    Str(String),
    Num(f64),
    Other(IgnoredAny),
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, boolean, string[] or number[]")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Boolean(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element::<ArrayItem>()? {
            items.push(item);
        }

        match items.first() {
            None => Ok(Value::StringList(Vec::new())),
            Some(ArrayItem::Str(_)) => items
                .into_iter()
                .map(|item| match item {
                    ArrayItem::Str(s) => Ok(s),
                    _ => Err(de::Error::custom(MIXED_ARRAY_MESSAGE)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::StringList),
            Some(ArrayItem::Num(_)) => items
                .into_iter()
                .map(|item| match item {
                    ArrayItem::Num(n) => Ok(n),
                    _ => Err(de::Error::custom(MIXED_ARRAY_MESSAGE)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::NumberList),
            Some(ArrayItem::Other(_)) => Err(de::Error::custom(MIXED_ARRAY_MESSAGE)),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}
