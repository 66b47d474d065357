//! Dynamic values passed into and returned from accessors.
//!
//! [`Shaped`] is the domain-family marker: its `SHAPE` constant classifies a
//! declared result type at compile time, and `to_value` converts a borrowed
//! field into a [`Value`]. [`FromValue`] converts accessor arguments back.

use crate::accessor::{AccessError, Accessible, ResultShape};
use std::collections::{BTreeMap, HashMap};

/// A dynamically typed accessor result or argument
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Unsigned integer above `i64::MAX`
    UInt(u64),
    /// Floating point
    Float(f64),
    /// Text
    Text(String),
    /// Ordered sequence
    List(Vec<Value>),
    /// String-keyed map
    Map(BTreeMap<String, Value>),
    /// Member of the tracked domain family
    Node(Box<dyn Accessible>),
}

impl Value {
    /// Short name of the variant, used in error messages
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Node(_) => "node",
        }
    }

    /// Check for `Null`
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null or an empty sequence: carries no data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Borrow as text
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Read as integer
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Read as unsigned integer (non-negative `Int` or `UInt`)
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Int(n) => u64::try_from(*n).ok(),
            Self::UInt(n) => Some(*n),
            _ => None,
        }
    }

    /// Read as boolean
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow as list
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as domain node
    #[must_use]
    pub fn as_node(&self) -> Option<&dyn Accessible> {
        match self {
            Self::Node(node) => Some(node.as_ref()),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_u64().map(Self::UInt))
                .unwrap_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN))),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

/// Declared result shape plus conversion into a [`Value`].
///
/// Implemented for scalars, strings, maps and the standard containers here;
/// `#[derive(Accessible)]` implements it for domain types with
/// `SHAPE = Some(ResultShape::DomainObject)`.
pub trait Shaped {
    /// Shape classification, `None` when the element type is unknown
    const SHAPE: Option<ResultShape>;

    /// Convert a borrowed value into a dynamic [`Value`]
    fn to_value(&self) -> Value;
}

macro_rules! scalar_shaped {
    ($variant:ident as $conv:ty: $($ty:ty),+) => {
        $(
            impl Shaped for $ty {
                const SHAPE: Option<ResultShape> = Some(ResultShape::ScalarOrOther);

                #[allow(clippy::cast_lossless, clippy::cast_possible_wrap)]
                fn to_value(&self) -> Value {
                    Value::$variant(*self as $conv)
                }
            }
        )+
    };
}

scalar_shaped!(Int as i64: i8, i16, i32, i64, u8, u16, u32, isize);
scalar_shaped!(Float as f64: f32, f64);

// Wide unsigned values stay `Int` while they fit, `UInt` beyond that.
macro_rules! unsigned_shaped {
    ($($ty:ty),+) => {
        $(
            impl Shaped for $ty {
                const SHAPE: Option<ResultShape> = Some(ResultShape::ScalarOrOther);

                #[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
                fn to_value(&self) -> Value {
                    let n = *self as u64;
                    i64::try_from(n).map_or(Value::UInt(n), Value::Int)
                }
            }
        )+
    };
}

unsigned_shaped!(u64, usize);

impl Shaped for bool {
    const SHAPE: Option<ResultShape> = Some(ResultShape::ScalarOrOther);

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Shaped for char {
    const SHAPE: Option<ResultShape> = Some(ResultShape::ScalarOrOther);

    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl Shaped for String {
    const SHAPE: Option<ResultShape> = Some(ResultShape::ScalarOrOther);

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl Shaped for &'static str {
    const SHAPE: Option<ResultShape> = Some(ResultShape::ScalarOrOther);

    fn to_value(&self) -> Value {
        Value::Text((*self).to_string())
    }
}

impl<T: Shaped> Shaped for Option<T> {
    const SHAPE: Option<ResultShape> = T::SHAPE;

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, Shaped::to_value)
    }
}

impl<T: Shaped> Shaped for Box<T> {
    const SHAPE: Option<ResultShape> = T::SHAPE;

    fn to_value(&self) -> Value {
        self.as_ref().to_value()
    }
}

impl<T: Shaped> Shaped for Vec<T> {
    const SHAPE: Option<ResultShape> = match T::SHAPE {
        Some(ResultShape::DomainObject) => Some(ResultShape::SequenceOfDomainObject),
        Some(_) => Some(ResultShape::SequenceOfOther),
        None => None,
    };

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Shaped::to_value).collect())
    }
}

impl<T: Shaped> Shaped for BTreeMap<String, T> {
    const SHAPE: Option<ResultShape> = Some(ResultShape::ScalarOrOther);

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl<T: Shaped, S> Shaped for HashMap<String, T, S> {
    const SHAPE: Option<ResultShape> = Some(ResultShape::ScalarOrOther);

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

// Untyped JSON payloads: the element type of an array is unknown until runtime.
impl Shaped for serde_json::Value {
    const SHAPE: Option<ResultShape> = None;

    fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

impl Shaped for Value {
    const SHAPE: Option<ResultShape> = None;

    fn to_value(&self) -> Value {
        self.clone()
    }
}

/// Conversion of accessor arguments from [`Value`]
pub trait FromValue: Sized {
    /// Convert, failing with [`AccessError::ArgumentType`]
    fn from_value(value: &Value) -> Result<Self, AccessError>;
}

const fn mismatch(expected: &'static str, value: &Value) -> AccessError {
    AccessError::ArgumentType {
        position: 0,
        expected,
        actual: value.kind(),
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, AccessError> {
        Ok(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, AccessError> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            other => Err(mismatch("text", other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, AccessError> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, AccessError> {
        match value {
            Value::Float(x) => Ok(*x),
            #[allow(clippy::cast_precision_loss)]
            Value::Int(n) => Ok(*n as f64),
            #[allow(clippy::cast_precision_loss)]
            Value::UInt(n) => Ok(*n as f64),
            other => Err(mismatch("float", other)),
        }
    }
}

macro_rules! int_from_value {
    ($($ty:ty),+) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self, AccessError> {
                    match value {
                        Value::Int(n) => <$ty>::try_from(*n).ok(),
                        Value::UInt(n) => <$ty>::try_from(*n).ok(),
                        _ => None,
                    }
                    .ok_or_else(|| mismatch(stringify!($ty), value))
                }
            }
        )+
    };
}

int_from_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, AccessError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
