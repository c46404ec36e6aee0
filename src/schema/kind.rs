//! Field kinds and the scalar values stored under them.

use super::record::AssignError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind is the type tag of a record field.
///
/// Two fields only exchange values directly when their kinds are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    Record,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::Isize => "isize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::Usize => "usize",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::String => "string",
            Kind::Record => "record",
        }
    }

    /// Returns true for the fixed-width and platform-native signed integers.
    pub fn is_signed_int(self) -> bool {
        matches!(
            self,
            Kind::I8 | Kind::I16 | Kind::I32 | Kind::I64 | Kind::Isize
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar is an owned field value tagged with its exact kind.
///
/// Equality is structural, so change detection never depends on where a value
/// is stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    String(String),
}

impl Scalar {
    pub fn kind(&self) -> Kind {
        match self {
            Scalar::Bool(_) => Kind::Bool,
            Scalar::I8(_) => Kind::I8,
            Scalar::I16(_) => Kind::I16,
            Scalar::I32(_) => Kind::I32,
            Scalar::I64(_) => Kind::I64,
            Scalar::Isize(_) => Kind::Isize,
            Scalar::U8(_) => Kind::U8,
            Scalar::U16(_) => Kind::U16,
            Scalar::U32(_) => Kind::U32,
            Scalar::U64(_) => Kind::U64,
            Scalar::Usize(_) => Kind::Usize,
            Scalar::F32(_) => Kind::F32,
            Scalar::F64(_) => Kind::F64,
            Scalar::String(_) => Kind::String,
        }
    }

    /// Returns true if the value equals its kind's default.
    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Bool(b) => !*b,
            Scalar::I8(v) => *v == 0,
            Scalar::I16(v) => *v == 0,
            Scalar::I32(v) => *v == 0,
            Scalar::I64(v) => *v == 0,
            Scalar::Isize(v) => *v == 0,
            Scalar::U8(v) => *v == 0,
            Scalar::U16(v) => *v == 0,
            Scalar::U32(v) => *v == 0,
            Scalar::U64(v) => *v == 0,
            Scalar::Usize(v) => *v == 0,
            Scalar::F32(v) => *v == 0.0,
            Scalar::F64(v) => *v == 0.0,
            Scalar::String(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::I8(v) => write!(f, "{}", v),
            Scalar::I16(v) => write!(f, "{}", v),
            Scalar::I32(v) => write!(f, "{}", v),
            Scalar::I64(v) => write!(f, "{}", v),
            Scalar::Isize(v) => write!(f, "{}", v),
            Scalar::U8(v) => write!(f, "{}", v),
            Scalar::U16(v) => write!(f, "{}", v),
            Scalar::U32(v) => write!(f, "{}", v),
            Scalar::U64(v) => write!(f, "{}", v),
            Scalar::Usize(v) => write!(f, "{}", v),
            Scalar::F32(v) => write!(f, "{}", v),
            Scalar::F64(v) => write!(f, "{}", v),
            Scalar::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// ScalarField is implemented by every type that can live in a scalar field.
///
/// Newtypes over a primitive (integer codes, identifiers) implement it by
/// delegating to the wrapped type, and so share its kind.
pub trait ScalarField: Sized {
    const KIND: Kind;

    fn to_scalar(&self) -> Scalar;

    fn from_scalar(value: Scalar) -> Result<Self, AssignError>;
}

macro_rules! scalar_field {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ScalarField for $ty {
                const KIND: Kind = Kind::$variant;

                fn to_scalar(&self) -> Scalar {
                    Scalar::$variant(self.clone())
                }

                fn from_scalar(value: Scalar) -> Result<Self, AssignError> {
                    match value {
                        Scalar::$variant(v) => Ok(v),
                        other => Err(AssignError::KindMismatch {
                            expected: Kind::$variant,
                            actual: other.kind(),
                        }),
                    }
                }
            }
        )*
    };
}

scalar_field! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    String => String,
}
