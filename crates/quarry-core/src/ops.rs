//! Truthiness and comparison semantics shared by both renderers.
//!
//! The interpreter calls these directly; emitted code calls the same functions,
//! so a test expression means the same thing on either backend.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Ne,
    Eq,
    Ge,
    Le,
    Gt,
    Lt,
}

impl CompareOp {
    /// Operators in the order the scanner tries them.
    ///
    /// Two-character operators precede their one-character prefixes.
    pub const TRIAL_ORDER: [CompareOp; 6] = [
        CompareOp::Ne,
        CompareOp::Eq,
        CompareOp::Ge,
        CompareOp::Le,
        CompareOp::Gt,
        CompareOp::Lt,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Ne => "!=",
            CompareOp::Eq => "==",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
        }
    }

    /// Variant name, as spelled in generated code.
    pub fn name(self) -> &'static str {
        match self {
            CompareOp::Ne => "Ne",
            CompareOp::Eq => "Eq",
            CompareOp::Ge => "Ge",
            CompareOp::Le => "Le",
            CompareOp::Gt => "Gt",
            CompareOp::Lt => "Lt",
        }
    }

    fn accepts(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Ne => ord != Ordering::Equal,
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Ge => ord != Ordering::Less,
            CompareOp::Le => ord != Ordering::Greater,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Lt => ord == Ordering::Less,
        }
    }
}

/// Truth value of a bare property path.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::List(items) => !items.is_empty(),
        _ => true,
    }
}

/// Evaluate `left OP right`. Never fails: operands that cannot be coerced
/// into a comparable form make the comparison false.
pub fn compare(left: &Value, op: CompareOp, right: &Value) -> bool {
    if left.is_null() || right.is_null() {
        let both = left.is_null() && right.is_null();
        return match op {
            CompareOp::Eq => both,
            CompareOp::Ne => !both,
            _ => false,
        };
    }

    let left = canonical(left);
    let right = canonical(right);

    match op {
        CompareOp::Eq => loosely_equal(&left, &right),
        CompareOp::Ne => !loosely_equal(&left, &right),
        _ => ordering(&left, &right).is_some_and(|ord| op.accepts(ord)),
    }
}

/// Identifiers compare as their text.
fn canonical(value: &Value) -> Value {
    match value {
        Value::Identifier(id) => Value::String(id.as_str().to_string()),
        other => other.clone(),
    }
}

fn loosely_equal(left: &Value, right: &Value) -> bool {
    if left == right {
        return true;
    }
    if let (Some(l), Some(r)) = (left.as_decimal(), right.as_decimal()) {
        return l == r;
    }
    if let Some(r) = coerce(right, left) {
        return *left == r;
    }
    if let Some(l) = coerce(left, right) {
        return l == *right;
    }
    left.to_string() == right.to_string()
}

fn ordering(left: &Value, right: &Value) -> Option<Ordering> {
    match left {
        Value::Int(_) | Value::Decimal(_) => {
            let l = left.as_decimal()?;
            let r = match right {
                Value::String(s) => s.trim().parse::<Decimal>().ok()?,
                other => other.as_decimal()?,
            };
            Some(l.cmp(&r))
        }
        Value::String(l) => match coerce(right, left)? {
            Value::String(r) => Some(l.as_str().cmp(r.as_str())),
            _ => None,
        },
        Value::Bool(l) => match coerce(right, left)? {
            Value::Bool(r) => Some(l.cmp(&r)),
            _ => None,
        },
        _ => None,
    }
}

/// Convert `value` into the representation of `like`.
fn coerce(value: &Value, like: &Value) -> Option<Value> {
    match (like, value) {
        (Value::Int(_), Value::Int(i)) => Some(Value::Int(*i)),
        (Value::Int(_), Value::Decimal(d)) if d.fract().is_zero() => {
            d.to_i64().map(Value::Int)
        }
        (Value::Int(_), Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::Int),

        (Value::Decimal(_), Value::Int(i)) => Some(Value::Decimal(Decimal::from(*i))),
        (Value::Decimal(_), Value::Decimal(d)) => Some(Value::Decimal(*d)),
        (Value::Decimal(_), Value::String(s)) => {
            s.trim().parse::<Decimal>().ok().map(Value::Decimal)
        }

        (Value::Bool(_), Value::Bool(b)) => Some(Value::Bool(*b)),
        (Value::Bool(_), Value::String(s)) => parse_bool(s).map(Value::Bool),

        (Value::String(_), Value::List(_) | Value::Object(_)) => None,
        (Value::String(_), scalar) => Some(Value::String(scalar.to_string())),

        _ => None,
    }
}

/// Case-insensitive `true`/`false`.
pub fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
