//! Record descriptors: the static field table of a record type and the
//! accessors the merge engine drives it through.

use super::catalog::Catalog;
use super::kind::{Kind, Scalar};
use thiserror::Error;

/// Shape describes how a field stores its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A plain scalar; present in a typed patch only when non-zero.
    Scalar(Kind),
    /// An `Option` of a scalar; present when `Some`, even if the value is zero.
    Optional(Kind),
    /// A nested record.
    Record,
    /// An `Option` (possibly boxed) of a nested record.
    OptionalRecord,
    /// An embedded record whose fields are promoted onto the enclosing one.
    Flatten,
    /// Not patchable. Private and skipped fields have this shape.
    Opaque,
}

impl Shape {
    /// Returns the scalar kind, if the field holds a scalar.
    pub fn kind(self) -> Option<Kind> {
        match self {
            Shape::Scalar(kind) | Shape::Optional(kind) => Some(kind),
            Shape::Record | Shape::OptionalRecord | Shape::Flatten => Some(Kind::Record),
            Shape::Opaque => None,
        }
    }

    pub fn is_optional(self) -> bool {
        matches!(self, Shape::Optional(_) | Shape::OptionalRecord)
    }
}

/// FieldDef is one row of a record's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Declared field name.
    pub name: &'static str,
    /// Serialization-style tag, e.g. `"first_name,omitempty"`.
    pub alias: Option<&'static str>,
    /// Whether the field is visible to the merge engine.
    pub exported: bool,
    pub shape: Shape,
}

/// FieldRef is a read view of one field.
pub enum FieldRef<'a> {
    Scalar(Scalar),
    Optional(Option<Scalar>),
    Record(&'a dyn Record),
    OptionalRecord(Option<&'a dyn Record>),
    Opaque,
}

impl FieldRef<'_> {
    /// Kind name of the held value, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldRef::Scalar(s) | FieldRef::Optional(Some(s)) => s.kind().name(),
            FieldRef::Record(_) | FieldRef::OptionalRecord(Some(_)) => Kind::Record.name(),
            FieldRef::Optional(None) | FieldRef::OptionalRecord(None) => "none",
            FieldRef::Opaque => "opaque",
        }
    }
}

/// AssignError is returned by record accessors when a write cannot happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("cannot assign {actual} to a {expected} field")]
    KindMismatch { expected: Kind, actual: Kind },

    #[error("field is not writable")]
    NotWritable,

    #[error("no field at slot {0}")]
    UnknownSlot(usize),
}

/// Record is implemented by every type that can be patched or used as a patch.
///
/// Fields are addressed by slot, the index of the field in the type's own
/// field table. Implementations are normally generated by `#[derive(Record)]`.
pub trait Record {
    /// The field catalog of this type, built once.
    fn describe() -> &'static Catalog
    where
        Self: Sized;

    /// Same as [`Record::describe`], callable through `dyn Record`.
    fn catalog(&self) -> &'static Catalog;

    fn field(&self, slot: usize) -> FieldRef<'_>;

    /// Writes a scalar into a `Scalar` or `Optional` field.
    fn set(&mut self, slot: usize, value: Scalar) -> Result<(), AssignError>;

    /// Resets an optional field to `None`.
    fn clear(&mut self, slot: usize) -> Result<(), AssignError>;

    /// Mutable access to a nested or flattened record that is present.
    fn record_mut(&mut self, slot: usize) -> Option<&mut dyn Record>;

    /// Like [`Record::record_mut`], but creates an absent optional record from
    /// its default first.
    fn insert_record(&mut self, slot: usize) -> Option<&mut dyn Record>;
}

impl<R: Record> Record for Box<R> {
    fn describe() -> &'static Catalog {
        R::describe()
    }

    fn catalog(&self) -> &'static Catalog {
        (**self).catalog()
    }

    fn field(&self, slot: usize) -> FieldRef<'_> {
        (**self).field(slot)
    }

    fn set(&mut self, slot: usize, value: Scalar) -> Result<(), AssignError> {
        (**self).set(slot, value)
    }

    fn clear(&mut self, slot: usize) -> Result<(), AssignError> {
        (**self).clear(slot)
    }

    fn record_mut(&mut self, slot: usize) -> Option<&mut dyn Record> {
        (**self).record_mut(slot)
    }

    fn insert_record(&mut self, slot: usize) -> Option<&mut dyn Record> {
        (**self).insert_record(slot)
    }
}

/// Walks `path` through nested records starting at `root`.
pub fn owner<'a>(root: &'a dyn Record, path: &[usize]) -> Option<&'a dyn Record> {
    let mut record = root;
    for &slot in path {
        record = match record.field(slot) {
            FieldRef::Record(inner) | FieldRef::OptionalRecord(Some(inner)) => inner,
            _ => return None,
        };
    }
    Some(record)
}

/// Mutable counterpart of [`owner`].
pub fn owner_mut<'a>(root: &'a mut dyn Record, path: &[usize]) -> Option<&'a mut dyn Record> {
    let mut record = root;
    for &slot in path {
        record = record.record_mut(slot)?;
    }
    Some(record)
}

/// Returns true if a field would be treated as absent in a typed patch.
///
/// Plain scalars are absent at their zero value, optionals when `None`, and
/// nested records when none of their own fields are present.
pub fn is_absent(field: &FieldRef<'_>) -> bool {
    match field {
        FieldRef::Scalar(s) => s.is_zero(),
        FieldRef::Optional(v) => v.is_none(),
        FieldRef::Record(r) => is_zero_record(*r),
        FieldRef::OptionalRecord(r) => r.is_none(),
        FieldRef::Opaque => true,
    }
}

/// Returns true if every patchable field of `record` is absent.
pub fn is_zero_record(record: &dyn Record) -> bool {
    record.catalog().entries().iter().all(|entry| {
        owner(record, entry.owner_path())
            .map(|o| is_absent(&o.field(entry.slot())))
            .unwrap_or(true)
    })
}
