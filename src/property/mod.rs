//! Typed, validated property storage.
//!
//! Every configurable display setting lives in a [`PropertyStore`] and is
//! written through one of four setter shapes:
//!
//! - [`single`]: exactly one value of the declared type.
//! - [`array`]: a fixed number of values of the declared type.
//! - [`axes`]: one value for both axes, or an x value followed by a y value.
//! - [`choice`]: one value from a declared set.
//!
//! A rejected value never touches the store.

mod value;

pub use value::{FromValue, Literal, Options, Value, ValueType};

use indexmap::IndexMap;

use crate::error::{ValidationError, ValidationKind};
use crate::geom::Axes;

/// Setter shape of a property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Exactly one value.
    Single,
    /// A fixed number of values.
    Array(usize),
    /// One value for both axes or one per axis.
    Axes,
    /// One value from a fixed set.
    Choice(&'static [Literal]),
}

/// Extra validation applied after the shape and type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Every number must be finite and greater than zero.
    Positive,
    /// Numbers must be finite and strictly increasing.
    Increasing,
}

/// Declaration of a single property of an entity kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyDescriptor {
    /// Property key as it appears in option mappings.
    pub key: &'static str,
    /// Declared primitive type.
    pub ty: ValueType,
    /// Setter shape.
    pub shape: Shape,
    /// Default arguments, spread the same way as caller input.
    pub default: &'static [Literal],
    /// Optional extra constraint.
    pub constraint: Option<Constraint>,
    /// String sentinels accepted in place of a typed value.
    pub sentinels: &'static [&'static str],
}

impl PropertyDescriptor {
    /// Declare a property with no constraint or sentinels.
    pub const fn new(
        key: &'static str,
        ty: ValueType,
        shape: Shape,
        default: &'static [Literal],
    ) -> Self {
        Self {
            key,
            ty,
            shape,
            default,
            constraint: None,
            sentinels: &[],
        }
    }

    /// Attach a constraint.
    pub const fn constrained(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Accept the given string sentinels.
    pub const fn with_sentinels(mut self, sentinels: &'static [&'static str]) -> Self {
        self.sentinels = sentinels;
        self
    }

    /// Default arguments as owned values.
    pub fn default_args(&self) -> Vec<Value> {
        self.default.iter().map(|literal| literal.to_value()).collect()
    }

    /// Validate positional arguments and produce the value to store.
    pub fn validate(&self, args: &[Value]) -> Result<Stored, ValidationError> {
        if let [Value::Text(text)] = args
            && self.sentinels.contains(&text.as_str())
        {
            return Ok(Stored::Single(Value::Text(text.clone())));
        }
        let stored = match self.shape {
            Shape::Single => single(self.key, self.ty, args)?,
            Shape::Array(len) => array(self.key, self.ty, len, args)?,
            Shape::Axes => axes(self.key, self.ty, args)?,
            Shape::Choice(allowed) => choice(self.key, self.ty, allowed, args)?,
        };
        if let Some(constraint) = self.constraint {
            check_constraint(self.key, constraint, &stored)?;
        }
        Ok(stored)
    }
}

/// A validated property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Stored {
    /// Single or choice value.
    Single(Value),
    /// Fixed-length sequence, order preserved.
    Array(Vec<Value>),
    /// Per-axis pair.
    Axes(Axes<Value>),
}

/// Single-value setter.
pub fn single(key: &str, ty: ValueType, args: &[Value]) -> Result<Stored, ValidationError> {
    let [value] = args else {
        return Err(arity(key, "1", args.len()));
    };
    expect_type(key, ty, value)?;
    Ok(Stored::Single(value.clone()))
}

/// Fixed-length array setter.
pub fn array(
    key: &str,
    ty: ValueType,
    len: usize,
    args: &[Value],
) -> Result<Stored, ValidationError> {
    if args.len() != len {
        return Err(arity(key, &len.to_string(), args.len()));
    }
    for value in args {
        expect_type(key, ty, value)?;
    }
    Ok(Stored::Array(args.to_vec()))
}

/// Axis-pair setter.
pub fn axes(key: &str, ty: ValueType, args: &[Value]) -> Result<Stored, ValidationError> {
    let pair = match args {
        [both] => Axes::splat(both.clone()),
        [x, y] => Axes::new(x.clone(), y.clone()),
        _ => return Err(arity(key, "1 or 2", args.len())),
    };
    expect_type(key, ty, &pair.x)?;
    expect_type(key, ty, &pair.y)?;
    Ok(Stored::Axes(pair))
}

/// Enumerated-choice setter.
pub fn choice(
    key: &str,
    ty: ValueType,
    allowed: &[Literal],
    args: &[Value],
) -> Result<Stored, ValidationError> {
    let [value] = args else {
        return Err(arity(key, "1", args.len()));
    };
    expect_type(key, ty, value)?;
    if !allowed.iter().any(|literal| literal.matches(value)) {
        let allowed = allowed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ValidationError::new(
            key,
            ValidationKind::NotAChoice {
                value: value.to_string(),
                allowed,
            },
        ));
    }
    Ok(Stored::Single(value.clone()))
}

fn expect_type(key: &str, ty: ValueType, value: &Value) -> Result<(), ValidationError> {
    if value.value_type() == Some(ty) {
        Ok(())
    } else {
        Err(ValidationError::new(
            key,
            ValidationKind::WrongType {
                expected: ty,
                found: value.type_name(),
            },
        ))
    }
}

fn arity(key: &str, expected: &str, found: usize) -> ValidationError {
    ValidationError::new(
        key,
        ValidationKind::WrongArity {
            expected: expected.to_string(),
            found,
        },
    )
}

fn check_constraint(
    key: &str,
    constraint: Constraint,
    stored: &Stored,
) -> Result<(), ValidationError> {
    let numbers: Vec<f64> = match stored {
        Stored::Single(value) => vec![value.as_number().unwrap_or(f64::NAN)],
        Stored::Array(values) => values
            .iter()
            .map(|value| value.as_number().unwrap_or(f64::NAN))
            .collect(),
        Stored::Axes(pair) => vec![
            pair.x.as_number().unwrap_or(f64::NAN),
            pair.y.as_number().unwrap_or(f64::NAN),
        ],
    };
    let ok = match constraint {
        Constraint::Positive => numbers.iter().all(|v| v.is_finite() && *v > 0.0),
        Constraint::Increasing => {
            numbers.iter().all(|v| v.is_finite()) && numbers.windows(2).all(|w| w[0] < w[1])
        }
    };
    if ok {
        return Ok(());
    }
    let message = match constraint {
        Constraint::Positive => "values must be finite and greater than zero",
        Constraint::Increasing => "values must be finite and strictly increasing",
    };
    Err(ValidationError::new(
        key,
        ValidationKind::Constraint(message.to_string()),
    ))
}

/// Validated key/value storage for one entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyStore {
    values: IndexMap<&'static str, Stored>,
}

impl PropertyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `args` against `descriptor` and store the result.
    ///
    /// Returns whether the stored value changed.
    pub fn assign(
        &mut self,
        descriptor: &PropertyDescriptor,
        args: &[Value],
    ) -> Result<bool, ValidationError> {
        let stored = descriptor.validate(args)?;
        let changed = self.values.get(descriptor.key) != Some(&stored);
        tracing::trace!(property = descriptor.key, changed, "property assigned");
        self.values.insert(descriptor.key, stored);
        Ok(changed)
    }

    /// Access a stored value.
    pub fn get(&self, key: &str) -> Option<&Stored> {
        self.values.get(key)
    }

    /// Iterate over stored properties in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Stored)> {
        self.values.iter().map(|(key, stored)| (*key, stored))
    }

    /// Number of stored properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read a single or choice value.
    pub fn value<T: FromValue>(&self, key: &str) -> Option<T> {
        match self.values.get(key)? {
            Stored::Single(value) => T::from_value(value),
            _ => None,
        }
    }

    /// Read an array value.
    pub fn array<T: FromValue>(&self, key: &str) -> Option<Vec<T>> {
        match self.values.get(key)? {
            Stored::Array(values) => values.iter().map(T::from_value).collect(),
            _ => None,
        }
    }

    /// Read an axis-pair value.
    pub fn axes<T: FromValue>(&self, key: &str) -> Option<Axes<T>> {
        match self.values.get(key)? {
            Stored::Axes(pair) => Some(Axes::new(
                T::from_value(&pair.x)?,
                T::from_value(&pair.y)?,
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &[Literal] = &[Literal::Text("solid"), Literal::Text("none")];

    fn num(v: f64) -> Value {
        Value::Number(v)
    }

    #[test]
    fn single_stores_matching_type() {
        let stored = single("traceWidth", ValueType::Number, &[num(2.5)]).unwrap();
        assert_eq!(stored, Stored::Single(num(2.5)));
    }

    #[test]
    fn single_rejects_mismatch_and_arity() {
        let err = single("traceWidth", ValueType::Number, &[Value::from("2")]).unwrap_err();
        assert!(matches!(err.kind, ValidationKind::WrongType { .. }));
        let err = single("traceWidth", ValueType::Number, &[num(1.0), num(2.0)]).unwrap_err();
        assert!(matches!(err.kind, ValidationKind::WrongArity { found: 2, .. }));
        assert!(single("traceWidth", ValueType::Number, &[]).is_err());
    }

    #[test]
    fn array_preserves_order() {
        let args = [num(3.0), num(1.0), num(2.0)];
        let stored = array("a", ValueType::Number, 3, &args).unwrap();
        assert_eq!(stored, Stored::Array(args.to_vec()));
    }

    #[test]
    fn array_rejects_length_and_type() {
        assert!(array("xLims", ValueType::Number, 2, &[num(1.0)]).is_err());
        assert!(array("xLims", ValueType::Number, 2, &[num(1.0), num(2.0), num(3.0)]).is_err());
        assert!(array("xLims", ValueType::Number, 2, &[num(1.0), Value::Bool(true)]).is_err());
        assert!(
            array(
                "xLims",
                ValueType::Number,
                2,
                &[num(1.0), Value::List(vec![num(2.0)])]
            )
            .is_err()
        );
    }

    #[test]
    fn axes_splats_single_value() {
        let stored = axes("majorTicks", ValueType::Boolean, &[Value::Bool(true)]).unwrap();
        assert_eq!(
            stored,
            Stored::Axes(Axes::new(Value::Bool(true), Value::Bool(true)))
        );
    }

    #[test]
    fn axes_takes_x_then_y() {
        let stored = axes("majorTickSpacing", ValueType::Number, &[num(1.0), num(2.0)]).unwrap();
        assert_eq!(stored, Stored::Axes(Axes::new(num(1.0), num(2.0))));
    }

    #[test]
    fn axes_rejects_bad_arity_and_type() {
        assert!(axes("k", ValueType::Number, &[]).is_err());
        assert!(axes("k", ValueType::Number, &[num(1.0), num(2.0), num(3.0)]).is_err());
        assert!(axes("k", ValueType::Number, &[num(1.0), Value::Bool(false)]).is_err());
    }

    #[test]
    fn choice_requires_membership_and_type() {
        assert!(choice("traceStyle", ValueType::String, STYLES, &[Value::from("solid")]).is_ok());
        let err =
            choice("traceStyle", ValueType::String, STYLES, &[Value::from("wavy")]).unwrap_err();
        assert!(matches!(err.kind, ValidationKind::NotAChoice { .. }));
        let err = choice("traceStyle", ValueType::String, STYLES, &[num(1.0)]).unwrap_err();
        assert!(matches!(err.kind, ValidationKind::WrongType { .. }));
    }

    #[test]
    fn store_is_untouched_on_failure() {
        let descriptor = PropertyDescriptor::new(
            "xLims",
            ValueType::Number,
            Shape::Array(2),
            &[Literal::Number(-1.0), Literal::Number(1.0)],
        )
        .constrained(Constraint::Increasing);
        let mut store = PropertyStore::new();
        store
            .assign(&descriptor, &descriptor.default_args())
            .unwrap();
        let before = store.clone();
        assert!(store.assign(&descriptor, &[num(5.0), num(1.0)]).is_err());
        assert!(store.assign(&descriptor, &[num(5.0)]).is_err());
        assert_eq!(store, before);
        assert_eq!(store.array::<f64>("xLims"), Some(vec![-1.0, 1.0]));
    }

    #[test]
    fn assign_is_idempotent() {
        let descriptor = PropertyDescriptor::new(
            "majorTicks",
            ValueType::Boolean,
            Shape::Axes,
            &[Literal::Bool(true)],
        );
        let mut store = PropertyStore::new();
        assert!(store.assign(&descriptor, &[Value::Bool(false)]).unwrap());
        let first = store.clone();
        assert!(!store.assign(&descriptor, &[Value::Bool(false)]).unwrap());
        assert_eq!(store, first);
        assert_eq!(
            store.axes::<bool>("majorTicks"),
            Some(Axes::new(false, false))
        );
    }

    #[test]
    fn sentinels_bypass_shape() {
        let descriptor = PropertyDescriptor::new(
            "origin",
            ValueType::Number,
            Shape::Axes,
            &[Literal::Text("centre")],
        )
        .with_sentinels(&["centre"]);
        assert_eq!(
            descriptor.validate(&[Value::from("centre")]).unwrap(),
            Stored::Single(Value::from("centre"))
        );
        assert!(descriptor.validate(&[Value::from("middle")]).is_err());
        assert_eq!(
            descriptor.validate(&[num(4.0)]).unwrap(),
            Stored::Axes(Axes::splat(num(4.0)))
        );
    }

    #[test]
    fn positive_constraint_rejects_zero() {
        let descriptor = PropertyDescriptor::new(
            "majorGridSpacing",
            ValueType::Number,
            Shape::Axes,
            &[Literal::Number(1.0)],
        )
        .constrained(Constraint::Positive);
        assert!(descriptor.validate(&[num(1.0), num(0.0)]).is_err());
        assert!(descriptor.validate(&[num(f64::INFINITY)]).is_err());
        assert!(descriptor.validate(&[num(0.5)]).is_ok());
    }
}
