//! Type coercion of decoded scalars into declared field kinds.
//!
//! Backends decode plain numbers into whatever wide kind their parser
//! produces (TOML integers arrive as `i64`, YAML floats as `f64`, and so on).
//! [`coerce`] normalizes such a scalar to the field's exact declared numeric
//! kind so `set` implementations can extract it directly. Everything else
//! passes through unchanged: non-numeric mismatches are the backend's (or the
//! field's) problem, not the coercion engine's.

use serde_json::{Number, Value};

use crate::field::{FieldKind, NumericKind};

/// Coerce a decoded value to the declared kind of its field.
///
/// Null values and non-numeric values are returned unchanged. Numbers are
/// converted with the standard conversion rule of the *target* kind: widening
/// is exact, integer narrowing wraps to the target width, float-to-integer
/// saturates, and integer-to-float rounds.
pub fn coerce(value: Value, kind: FieldKind) -> Value {
    let coerced = match (&value, kind) {
        (Value::Number(n), FieldKind::Numeric(target)) => coerce_number(n, target),
        _ => None,
    };
    match coerced {
        Some(number) => Value::Number(number),
        None => value,
    }
}

fn coerce_number(n: &Number, target: NumericKind) -> Option<Number> {
    match target {
        NumericKind::I8 => Some(Number::from(as_i64(n)? as i8)),
        NumericKind::I16 => Some(Number::from(as_i64(n)? as i16)),
        NumericKind::I32 => Some(Number::from(as_i64(n)? as i32)),
        NumericKind::I64 => Some(Number::from(as_i64(n)?)),
        NumericKind::U8 => Some(Number::from(as_u64(n)? as u8)),
        NumericKind::U16 => Some(Number::from(as_u64(n)? as u16)),
        NumericKind::U32 => Some(Number::from(as_u64(n)? as u32)),
        NumericKind::U64 => Some(Number::from(as_u64(n)?)),
        NumericKind::F32 => Number::from_f64(n.as_f64()? as f32 as f64),
        NumericKind::F64 => Number::from_f64(n.as_f64()?),
    }
}

// Integer view of a decoded number. Floats narrow with `as` (saturating),
// matching the target-kind conversion rule.
fn as_i64(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        Some(i)
    } else if let Some(u) = n.as_u64() {
        Some(u as i64)
    } else {
        n.as_f64().map(|f| f as i64)
    }
}

fn as_u64(n: &Number) -> Option<u64> {
    if let Some(u) = n.as_u64() {
        Some(u)
    } else if let Some(i) = n.as_i64() {
        Some(i as u64)
    } else {
        n.as_f64().map(|f| f as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_passes_through() {
        assert_eq!(coerce(Value::Null, FieldKind::Numeric(NumericKind::I32)), Value::Null);
    }

    #[test]
    fn non_numeric_mismatch_passes_through() {
        let v = json!("not a number");
        assert_eq!(coerce(v.clone(), FieldKind::Numeric(NumericKind::I32)), v);
        let v = json!(true);
        assert_eq!(coerce(v.clone(), FieldKind::Str), v);
    }

    #[test]
    fn integer_to_float_rounds() {
        let v = coerce(json!(8080i64), FieldKind::Numeric(NumericKind::F32));
        assert_eq!(v.as_f64().unwrap(), 8080.0);

        // Beyond f32 precision: converts per f32 rounding, no error.
        let v = coerce(json!(16_777_217i64), FieldKind::Numeric(NumericKind::F32));
        assert_eq!(v.as_f64().unwrap(), 16_777_216.0);
    }

    #[test]
    fn float_to_integer_truncates() {
        let v = coerce(json!(3306.7), FieldKind::Numeric(NumericKind::U16));
        assert_eq!(v.as_u64().unwrap(), 3306);
    }

    #[test]
    fn integer_narrowing_wraps_to_target_width() {
        let v = coerce(json!(300i64), FieldKind::Numeric(NumericKind::U8));
        assert_eq!(v.as_u64().unwrap(), 300u64 as u8 as u64);
    }

    #[test]
    fn widening_is_exact() {
        let v = coerce(json!(42i64), FieldKind::Numeric(NumericKind::I64));
        assert_eq!(v.as_i64().unwrap(), 42);
        let v = coerce(json!(1.25f64), FieldKind::Numeric(NumericKind::F64));
        assert_eq!(v.as_f64().unwrap(), 1.25);
    }
}
