//! Native values and the marshalling codec.
//!
//! [`Value`] is the application-side representation of an item attribute.
//! [`marshal`] converts it into the wire's [`AttributeValue`] tagged union and
//! [`unmarshal`] is the exact inverse: `unmarshal(marshal(v)) == v` for every
//! representable `v`.
//!
//! Homogeneous scalar lists marshal to the typed set tags (`SS`, `NS`, `BS`);
//! anything mixed falls back to the generic `L` tag. Null handling is a
//! call-site decision: the codec itself maps [`Value::Null`] to the `NULL`
//! wire tag, and callers that forbid null (condition compilation, key
//! extraction) must reject it before marshalling.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::attribute_value::AttributeValue;

/// A native attribute value, prior to wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent / null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating-point number. Must be finite to be marshalled.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Raw bytes.
    Binary(bytes::Bytes),
    /// Ordered list of values.
    List(Vec<Value>),
    /// String-keyed map of values, ordered by key.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns `true` if this is [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if this is a scalar (not a list or map).
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

/// Errors produced by the value codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The value has no wire representation (e.g. a non-finite float).
    UnsupportedValueType {
        /// Description of the offending value.
        detail: String,
    },
    /// A wire number string could not be parsed back into a native number.
    InvalidNumber(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedValueType { detail } => {
                write!(f, "value has no wire representation: {detail}")
            }
            Self::InvalidNumber(s) => write!(f, "invalid wire number: {s}"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Formats a float the way the codec writes it to the `N` tag.
///
/// Uses the shortest representation that round-trips, keeping a trailing
/// `.0` on integral floats so they unmarshal back to [`Value::Float`].
fn format_float(f: f64) -> String {
    format!("{f:?}")
}

/// Converts a native value into its wire representation.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedValueType`] for values with no wire
/// mapping, such as NaN or infinite floats.
pub fn marshal(value: &Value) -> Result<AttributeValue, CodecError> {
    match value {
        Value::Null => Ok(AttributeValue::Null(true)),
        Value::Bool(b) => Ok(AttributeValue::Bool(*b)),
        Value::Int(i) => Ok(AttributeValue::N(i.to_string())),
        Value::Float(f) => {
            if f.is_finite() {
                Ok(AttributeValue::N(format_float(*f)))
            } else {
                Err(CodecError::UnsupportedValueType {
                    detail: format!("non-finite number {f}"),
                })
            }
        }
        Value::String(s) => Ok(AttributeValue::S(s.clone())),
        Value::Binary(b) => Ok(AttributeValue::B(b.clone())),
        Value::List(items) => marshal_list(items),
        Value::Map(map) => {
            let mut out = HashMap::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), marshal(v)?);
            }
            Ok(AttributeValue::M(out))
        }
    }
}

/// Marshals a list, choosing a typed set tag when every element shares one
/// of the scalar families (string, number, binary).
fn marshal_list(items: &[Value]) -> Result<AttributeValue, CodecError> {
    if !items.is_empty() {
        if items.iter().all(|v| matches!(v, Value::String(_))) {
            let set = items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    _ => unreachable!(),
                })
                .collect();
            return Ok(AttributeValue::Ss(set));
        }
        if items
            .iter()
            .all(|v| matches!(v, Value::Int(_) | Value::Float(_)))
        {
            let set = items
                .iter()
                .map(|v| match v {
                    Value::Int(i) => Ok(i.to_string()),
                    Value::Float(f) if f.is_finite() => Ok(format_float(*f)),
                    Value::Float(f) => Err(CodecError::UnsupportedValueType {
                        detail: format!("non-finite number {f}"),
                    }),
                    _ => unreachable!(),
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(AttributeValue::Ns(set));
        }
        if items.iter().all(|v| matches!(v, Value::Binary(_))) {
            let set = items
                .iter()
                .map(|v| match v {
                    Value::Binary(b) => b.clone(),
                    _ => unreachable!(),
                })
                .collect();
            return Ok(AttributeValue::Bs(set));
        }
    }
    let list = items.iter().map(marshal).collect::<Result<Vec<_>, _>>()?;
    Ok(AttributeValue::L(list))
}

/// Parses a wire number string into [`Value::Int`] or [`Value::Float`].
fn unmarshal_number(n: &str) -> Result<Value, CodecError> {
    if let Ok(i) = n.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    n.parse::<f64>()
        .map(Value::Float)
        .map_err(|_| CodecError::InvalidNumber(n.to_owned()))
}

/// Converts a wire value back into its native representation.
///
/// # Errors
///
/// Returns [`CodecError::InvalidNumber`] if an `N` or `NS` payload is not a
/// parseable number.
pub fn unmarshal(value: &AttributeValue) -> Result<Value, CodecError> {
    match value {
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::N(n) => unmarshal_number(n),
        AttributeValue::B(b) => Ok(Value::Binary(b.clone())),
        AttributeValue::Ss(set) => Ok(Value::List(
            set.iter().map(|s| Value::String(s.clone())).collect(),
        )),
        AttributeValue::Ns(set) => {
            let items = set
                .iter()
                .map(|n| unmarshal_number(n.as_str()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(items))
        }
        AttributeValue::Bs(set) => Ok(Value::List(
            set.iter().map(|b| Value::Binary(b.clone())).collect(),
        )),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::L(list) => {
            let items = list.iter().map(unmarshal).collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(items))
        }
        AttributeValue::M(map) => {
            let mut out = BTreeMap::new();
            for (k, v) in map {
                out.insert(k.clone(), unmarshal(v)?);
            }
            Ok(Value::Map(out))
        }
    }
}

/// Marshals a whole item (attribute name to native value).
///
/// # Errors
///
/// Propagates the first [`CodecError`] from any attribute.
pub fn marshal_item(
    item: &BTreeMap<String, Value>,
) -> Result<HashMap<String, AttributeValue>, CodecError> {
    let mut out = HashMap::with_capacity(item.len());
    for (k, v) in item {
        out.insert(k.clone(), marshal(v)?);
    }
    Ok(out)
}

/// Unmarshals a whole wire item back into native values.
///
/// # Errors
///
/// Propagates the first [`CodecError`] from any attribute.
pub fn unmarshal_item(
    item: &HashMap<String, AttributeValue>,
) -> Result<BTreeMap<String, Value>, CodecError> {
    let mut out = BTreeMap::new();
    for (k, v) in item {
        out.insert(k.clone(), unmarshal(v)?);
    }
    Ok(out)
}
