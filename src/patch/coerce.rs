//! Value coercion for mapping patches.
//!
//! Decoded payloads carry loosely-typed numbers, so a number may land in any
//! signed integer field. Nothing else is converted.

use super::error::PatchError;
use crate::schema::{Kind, Scalar};
use crate::value::Value;

/// Converts a decoded value into a scalar of the target field's kind.
pub fn coerce(field: &str, value: &Value, kind: Kind) -> Result<Scalar, PatchError> {
    let scalar = match (value, kind) {
        (Value::Bool(b), Kind::Bool) => Some(Scalar::Bool(*b)),
        (Value::String(s), Kind::String) => Some(Scalar::String(s.clone())),
        (Value::Int(i), Kind::F64) => Some(Scalar::F64(*i as f64)),
        (Value::Float(f), Kind::F64) => Some(Scalar::F64(*f)),
        (Value::Int(i), kind) if kind.is_signed_int() => Some(narrow_int(*i, kind)),
        (Value::Float(f), kind) if kind.is_signed_int() => Some(truncate_float(*f, kind)),
        _ => None,
    };
    scalar.ok_or_else(|| PatchError::type_mismatch(field, value, kind, value.kind_name()))
}

/// Fails unless a typed patch value already has the target's kind.
pub fn ensure_same_kind(field: &str, value: &Scalar, kind: Kind) -> Result<(), PatchError> {
    if value.kind() == kind {
        Ok(())
    } else {
        Err(PatchError::type_mismatch(field, value, kind, value.kind().name()))
    }
}

fn narrow_int(i: i64, kind: Kind) -> Scalar {
    match kind {
        Kind::I8 => Scalar::I8(i as i8),
        Kind::I16 => Scalar::I16(i as i16),
        Kind::I32 => Scalar::I32(i as i32),
        Kind::Isize => Scalar::Isize(i as isize),
        _ => Scalar::I64(i),
    }
}

fn truncate_float(f: f64, kind: Kind) -> Scalar {
    match kind {
        Kind::I8 => Scalar::I8(f as i8),
        Kind::I16 => Scalar::I16(f as i16),
        Kind::I32 => Scalar::I32(f as i32),
        Kind::Isize => Scalar::Isize(f as isize),
        _ => Scalar::I64(f as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_kind_passes_through() {
        assert_eq!(coerce("f", &Value::Bool(false), Kind::Bool).unwrap(), Scalar::Bool(false));
        assert_eq!(
            coerce("f", &Value::String("x".into()), Kind::String).unwrap(),
            Scalar::String("x".into())
        );
        assert_eq!(coerce("f", &Value::Int(9), Kind::I64).unwrap(), Scalar::I64(9));
        assert_eq!(coerce("f", &Value::Float(1.5), Kind::F64).unwrap(), Scalar::F64(1.5));
    }

    #[test]
    fn test_numbers_widen_into_every_signed_width() {
        let two = Value::Float(2.0);
        assert_eq!(coerce("f", &two, Kind::I8).unwrap(), Scalar::I8(2));
        assert_eq!(coerce("f", &two, Kind::I16).unwrap(), Scalar::I16(2));
        assert_eq!(coerce("f", &two, Kind::I32).unwrap(), Scalar::I32(2));
        assert_eq!(coerce("f", &two, Kind::I64).unwrap(), Scalar::I64(2));
        assert_eq!(coerce("f", &two, Kind::Isize).unwrap(), Scalar::Isize(2));
        assert_eq!(coerce("f", &Value::Int(100500), Kind::I32).unwrap(), Scalar::I32(100500));
        assert_eq!(coerce("f", &Value::Int(3), Kind::F64).unwrap(), Scalar::F64(3.0));
    }

    #[test]
    fn test_int_narrowing_wraps() {
        assert_eq!(coerce("f", &Value::Int(300), Kind::I8).unwrap(), Scalar::I8(44));
        assert_eq!(coerce("f", &Value::Int(-40_000), Kind::I16).unwrap(), Scalar::I16(25_536));
        assert_eq!(coerce("f", &Value::Int(-7), Kind::I16).unwrap(), Scalar::I16(-7));
    }

    #[test]
    fn test_float_truncates_toward_zero() {
        assert_eq!(coerce("f", &Value::Float(-2.9), Kind::I32).unwrap(), Scalar::I32(-2));
        assert_eq!(coerce("f", &Value::Float(1e10), Kind::I8).unwrap(), Scalar::I8(i8::MAX));
    }

    #[test]
    fn test_unconvertible_kinds_fail() {
        for (value, kind) in [
            (Value::String("euros".into()), Kind::I32),
            (Value::Float(1.0), Kind::U32),
            (Value::Float(1.0), Kind::F32),
            (Value::Int(1), Kind::Bool),
            (Value::Bool(true), Kind::String),
            (Value::Null, Kind::I64),
            (Value::List(vec![]), Kind::String),
        ] {
            let err = coerce("salary", &value, kind).unwrap_err();
            assert!(err.is_type_mismatch(), "{value:?} -> {kind}");
        }
    }

    #[test]
    fn test_typed_form_has_no_widening() {
        assert!(ensure_same_kind("salary", &Scalar::I32(1), Kind::I32).is_ok());
        let err = ensure_same_kind("salary", &Scalar::F64(500.0), Kind::I32).unwrap_err();
        assert_eq!(
            err.to_string(),
            "field `salary` types mismatch while patching: i32 vs f64 (500)"
        );
    }
}
