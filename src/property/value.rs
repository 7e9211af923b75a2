//! Dynamically typed property values and option mappings.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geom::Axes;

/// Primitive type a property declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Floating point number.
    Number,
    /// Text.
    String,
    /// Boolean flag.
    Boolean,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => f.write_str("number"),
            Self::String => f.write_str("string"),
            Self::Boolean => f.write_str("boolean"),
        }
    }
}

/// A property value as supplied by callers or option mappings.
///
/// Lists are spread across a setter's positional arguments, so
/// `[0, 10]` for `xLims` reaches the setter as two numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag.
    Bool(bool),
    /// Number.
    Number(f64),
    /// Text.
    Text(String),
    /// Sequence of values.
    List(Vec<Value>),
}

impl Value {
    /// Primitive type of the value, `None` for lists.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Bool(_) => Some(ValueType::Boolean),
            Self::Number(_) => Some(ValueType::Number),
            Self::Text(_) => Some(ValueType::String),
            Self::List(_) => None,
        }
    }

    /// Short description of the runtime type, used in error messages.
    pub fn type_name(&self) -> String {
        match self.value_type() {
            Some(ty) => ty.to_string(),
            None => "list".to_string(),
        }
    }

    /// Positional arguments this value expands to.
    pub fn spread(&self) -> &[Value] {
        match self {
            Self::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// Access a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Access a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Access text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(values: [T; N]) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Axes<T>> for Value {
    fn from(values: Axes<T>) -> Self {
        Self::List(vec![values.x.into(), values.y.into()])
    }
}

/// Compile-time literal used for defaults and allowed choices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    /// Boolean literal.
    Bool(bool),
    /// Number literal.
    Number(f64),
    /// Text literal.
    Text(&'static str),
}

impl Literal {
    /// Check whether a runtime value equals this literal.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Bool(a), Value::Bool(b)) => a == b,
            (Self::Number(a), Value::Number(b)) => a == b,
            (Self::Text(a), Value::Text(b)) => *a == b,
            _ => false,
        }
    }

    /// Convert into an owned value.
    pub fn to_value(self) -> Value {
        match self {
            Self::Bool(value) => Value::Bool(value),
            Self::Number(value) => Value::Number(value),
            Self::Text(value) => Value::Text(value.to_string()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Extraction of typed values from stored properties.
pub trait FromValue: Sized {
    /// Convert a stored value, `None` on type mismatch.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_number()
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

/// Configuration mapping handed to constructors and `merge_options`.
///
/// Keys keep insertion order. The mapping deserializes from any serde
/// format; [`Options::from_json`] covers the common case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(IndexMap<String, Value>);

impl Options {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Add an option, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace an option.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up an option.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate over options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_spread_into_arguments() {
        let value = Value::from([0.0, 10.0]);
        assert_eq!(value.spread().len(), 2);
        let single = Value::from(true);
        assert_eq!(single.spread(), &[Value::Bool(true)]);
    }

    #[test]
    fn options_parse_from_json() {
        let options =
            Options::from_json(r#"{"xLims": [0, 10], "majorTicks": false, "origin": "centre"}"#)
                .expect("valid json");
        assert_eq!(options.len(), 3);
        assert_eq!(
            options.get("xLims"),
            Some(&Value::List(vec![Value::Number(0.0), Value::Number(10.0)]))
        );
        assert_eq!(options.get("majorTicks"), Some(&Value::Bool(false)));
        assert_eq!(options.get("origin"), Some(&Value::Text("centre".into())));
        let keys: Vec<&str> = options.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["xLims", "majorTicks", "origin"]);
    }

    #[test]
    fn options_reject_null() {
        assert!(Options::from_json(r#"{"xLims": null}"#).is_err());
    }

    #[test]
    fn literal_matches_only_same_type() {
        assert!(Literal::Text("solid").matches(&Value::from("solid")));
        assert!(!Literal::Number(1.0).matches(&Value::from("1")));
    }
}
