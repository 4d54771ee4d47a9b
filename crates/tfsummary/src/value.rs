//! value representation
//!
//! The summary model contains the following data types
//! - string (utf-8)
//! - integer (i64)
//! - float (f64)
//! - boolean (true/false)
//! - null
//! - list (ordered sequence of values)
//! - map (order-preserving "dictionary", where the key is of type string)
//! - raw (source text of an expression that could not be reduced statically)
//!
//! A number literal is an `integer` when it has no fractional part as written (saturated to the i64 range), otherwise
//! it is a `float`. Arrays and objects stay `raw` when reduced from an expression.
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serializer,
};
use std::fmt;

/// All possible value types
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<Value>),
    Map(indexmap::IndexMap<String, Value>),
    /// Trimmed source text of an expression
    Raw(String),
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for hcl::Expression {
    fn from(value: Value) -> Self {
        use hcl::Expression;

        match value {
            Value::String(s) => Expression::String(s),
            Value::Integer(int) => Expression::Number(int.into()),
            Value::Float(float) => hcl::Number::from_f64(float)
                .map(Expression::Number)
                .unwrap_or(Expression::Null),
            Value::Bool(bool) => Expression::Bool(bool),
            Value::Null => Expression::Null,
            Value::List(list) => Expression::Array(list.into_iter().map(Into::into).collect()),
            Value::Map(map) => {
                let object: hcl::Object<hcl::ObjectKey, Expression> = map
                    .into_iter()
                    .map(|(k, v)| (hcl::ObjectKey::Expression(Expression::String(k)), v.into()))
                    .collect();
                Expression::Object(object)
            }
            Value::Raw(raw) => Expression::Raw(hcl::expr::RawExpression::new(raw)),
        }
    }
}

/// Renders scalars the way a user would write them, lists and maps as HCL
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(value) | Value::Raw(value) => f.write_str(value),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Null => f.write_str("null"),
            Value::List(_) | Value::Map(_) => {
                let expr = hcl::Expression::from(self.clone());
                let rendered = hcl::format::to_string(&expr).map_err(|_| fmt::Error)?;
                f.write_str(rendered.trim())
            }
        }
    }
}

impl serde::ser::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::String(value) | Value::Raw(value) => serializer.serialize_str(value),
            Value::Integer(value) => serializer.serialize_i64(*value),
            Value::Float(value) => serializer.serialize_f64(*value),
            Value::Bool(value) => serializer.serialize_bool(*value),
            Value::Null => serializer.serialize_unit(),
            Value::List(value) => {
                let mut ser = serializer.serialize_seq(Some(value.len()))?;
                for element in value {
                    ser.serialize_element(element)?;
                }
                ser.end()
            }
            Value::Map(value) => {
                let mut ser = serializer.serialize_map(Some(value.len()))?;
                for (element_key, element_value) in value {
                    ser.serialize_entry(element_key, element_value)?;
                }
                ser.end()
            }
        }
    }
}
