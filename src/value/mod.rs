pub mod error;
pub mod formatter;

use crate::{ast::LiteralValue, object::JsObject};
use compact_str::CompactString;
use error::RuntimeErrorKind;
use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub enum Value {
    /// The sentinel for missing bindings and properties. Equal only to itself.
    Undefined,
    Integer(i64),
    String(CompactString),
    Object(JsObject),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
            Self::Object(object) => write!(f, "{object}"),
        }
    }
}

impl From<&LiteralValue> for Value {
    fn from(value: &LiteralValue) -> Self {
        match value {
            LiteralValue::Undefined => Value::Undefined,
            LiteralValue::Integer(v) => Value::Integer(*v),
            LiteralValue::String(v) => Value::String(v.clone()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Integer(if value { 1 } else { 0 })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl Value {
    /// Everything except the integer `0` is true, including `undefined` and `"0"`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Integer(0))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_object(&self) -> Option<&JsObject> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

// Arithmetic
impl Value {
    fn integers(&self, other: &Value) -> Result<(i64, i64), RuntimeErrorKind> {
        match (self, other) {
            (Value::Integer(lhs), Value::Integer(rhs)) => Ok((*lhs, *rhs)),
            (lhs, rhs) => Err(RuntimeErrorKind::NonNumerics(lhs.clone(), rhs.clone())),
        }
    }

    pub fn add(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.integers(other)?;
        Ok(Value::Integer(lhs.wrapping_add(rhs)))
    }

    pub fn subtract(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.integers(other)?;
        Ok(Value::Integer(lhs.wrapping_sub(rhs)))
    }

    pub fn multiply(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.integers(other)?;
        Ok(Value::Integer(lhs.wrapping_mul(rhs)))
    }

    pub fn divide(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.integers(other)?;
        if rhs == 0 {
            return Err(RuntimeErrorKind::DivisionByZero);
        }
        Ok(Value::Integer(lhs.wrapping_div(rhs)))
    }

    pub fn remainder(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.integers(other)?;
        if rhs == 0 {
            return Err(RuntimeErrorKind::DivisionByZero);
        }
        Ok(Value::Integer(lhs.wrapping_rem(rhs)))
    }
}

// Comparison
impl Value {
    /// Integers order with integers and strings with strings; nothing else is ordered.
    pub fn compare(&self, other: &Value) -> Result<Ordering, RuntimeErrorKind> {
        match (self, other) {
            (Value::Integer(lhs), Value::Integer(rhs)) => Ok(lhs.cmp(rhs)),
            (Value::String(lhs), Value::String(rhs)) => Ok(lhs.cmp(rhs)),
            (lhs, rhs) => Err(RuntimeErrorKind::NonComparable(lhs.clone(), rhs.clone())),
        }
    }

    // Equality
    pub fn is_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Integer(lhs), Value::Integer(rhs)) => lhs == rhs,
            (Value::String(lhs), Value::String(rhs)) => lhs == rhs,
            (Value::Object(lhs), Value::Object(rhs)) => lhs.ptr_eq(rhs),
            _ => false,
        }
    }

    pub fn is_not_equal(&self, other: &Value) -> bool {
        !self.is_equal(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_integer_zero_is_false() {
        assert!(!Value::Integer(0).is_truthy());
        assert!(Value::Integer(-1).is_truthy());
        assert!(Value::Undefined.is_truthy());
        assert!(Value::String("0".into()).is_truthy());
        assert!(Value::String("".into()).is_truthy());
        assert!(Value::Object(JsObject::new_object(None)).is_truthy());
    }

    #[test]
    fn undefined_equals_only_itself() {
        assert_eq!(Value::Undefined, Value::Undefined);
        assert_ne!(Value::Undefined, Value::Integer(0));
        assert_ne!(Value::Undefined, Value::String("undefined".into()));
        assert_ne!(Value::Undefined, Value::Object(JsObject::new_object(None)));
    }

    #[test]
    fn objects_compare_by_identity() {
        let object = JsObject::new_object(None);
        let same = Value::Object(object.clone());
        assert_eq!(Value::Object(object), same);
        assert_ne!(
            Value::Object(JsObject::new_object(None)),
            Value::Object(JsObject::new_object(None))
        );
    }

    #[test]
    fn not_equal_negates_equality() {
        let object = Value::Object(JsObject::new_object(None));
        assert!(!object.is_not_equal(&object.clone()));
        assert!(Value::Integer(1).is_not_equal(&Value::String("1".into())));
        assert!(!Value::Undefined.is_not_equal(&Value::Undefined));
    }

    #[test]
    fn remainder_is_not_multiplication() {
        let result = Value::Integer(7).remainder(&Value::Integer(3)).unwrap();
        assert_eq!(result, Value::Integer(1));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let error = Value::Integer(1).divide(&Value::Integer(0)).unwrap_err();
        assert!(matches!(error, RuntimeErrorKind::DivisionByZero));
        let error = Value::Integer(1).remainder(&Value::Integer(0)).unwrap_err();
        assert!(matches!(error, RuntimeErrorKind::DivisionByZero));
    }

    #[test]
    fn mixed_comparison_is_an_error() {
        let error = Value::Integer(1)
            .compare(&Value::String("1".into()))
            .unwrap_err();
        assert!(matches!(error, RuntimeErrorKind::NonComparable(_, _)));
    }
}
