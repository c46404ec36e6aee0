//! Field catalogs: a record's field table with flattened members folded in.

use super::record::{FieldDef, Shape};

/// Entry is a field reachable from a record, possibly through flattened members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: Vec<usize>,
    def: &'static FieldDef,
    exported: bool,
}

impl Entry {
    /// The field's definition in its owning record.
    pub fn def(&self) -> &'static FieldDef {
        self.def
    }

    /// Slots from the outer record down to the field itself.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Slots of the flattened members leading to the owning record.
    pub fn owner_path(&self) -> &[usize] {
        &self.path[..self.path.len() - 1]
    }

    /// Slot of the field in its owning record.
    pub fn slot(&self) -> usize {
        self.path[self.path.len() - 1]
    }

    /// False if the field or any flattened member above it is unexported.
    pub fn exported(&self) -> bool {
        self.exported
    }

    pub fn shape(&self) -> Shape {
        self.def.shape
    }

    pub fn name(&self) -> &'static str {
        self.def.name
    }
}

/// Catalog lists every field of a record type that the resolver can see.
///
/// Catalogs are built once per type and should be considered immutable.
#[derive(Debug, Clone)]
pub struct Catalog {
    type_name: &'static str,
    fields: &'static [FieldDef],
    entries: Vec<Entry>,
}

impl Catalog {
    /// Builds the catalog of a record from its own field table.
    ///
    /// `flattened` maps the slot of every `Shape::Flatten` field to the
    /// catalog of the embedded type. A flatten slot without a catalog
    /// contributes nothing.
    pub fn build(
        type_name: &'static str,
        fields: &'static [FieldDef],
        flattened: Vec<(usize, &'static Catalog)>,
    ) -> Self {
        let mut entries = Vec::with_capacity(fields.len());
        for (slot, def) in fields.iter().enumerate() {
            if def.shape != Shape::Flatten {
                entries.push(Entry {
                    path: vec![slot],
                    def,
                    exported: def.exported,
                });
                continue;
            }
            let Some((_, inner)) = flattened.iter().find(|(s, _)| *s == slot) else {
                continue;
            };
            for child in &inner.entries {
                let mut path = Vec::with_capacity(child.path.len() + 1);
                path.push(slot);
                path.extend_from_slice(&child.path);
                entries.push(Entry {
                    path,
                    def: child.def,
                    exported: def.exported && child.exported,
                });
            }
        }
        Catalog {
            type_name,
            fields,
            entries,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The record's own field table, in declaration order.
    pub fn fields(&self) -> &'static [FieldDef] {
        self.fields
    }

    /// Every reachable field, flattened members expanded in place.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Kind;

    static NAME_FIELDS: [FieldDef; 2] = [
        FieldDef {
            name: "first_name",
            alias: None,
            exported: true,
            shape: Shape::Scalar(Kind::String),
        },
        FieldDef {
            name: "last_name",
            alias: None,
            exported: true,
            shape: Shape::Scalar(Kind::String),
        },
    ];

    static PERSON_FIELDS: [FieldDef; 3] = [
        FieldDef {
            name: "name",
            alias: None,
            exported: true,
            shape: Shape::Flatten,
        },
        FieldDef {
            name: "salary",
            alias: Some("salary,omitempty"),
            exported: true,
            shape: Shape::Scalar(Kind::I64),
        },
        FieldDef {
            name: "secret",
            alias: None,
            exported: false,
            shape: Shape::Opaque,
        },
    ];

    fn name_catalog() -> &'static Catalog {
        static CATALOG: once_cell::sync::OnceCell<Catalog> = once_cell::sync::OnceCell::new();
        CATALOG.get_or_init(|| Catalog::build("Name", &NAME_FIELDS, vec![]))
    }

    #[test]
    fn test_flatten_promotes_fields() {
        let catalog = Catalog::build("Person", &PERSON_FIELDS, vec![(0, name_catalog())]);
        let names: Vec<_> = catalog.entries().iter().map(Entry::name).collect();
        assert_eq!(names, vec!["first_name", "last_name", "salary", "secret"]);

        let last = &catalog.entries()[1];
        assert_eq!(last.path(), &[0, 1]);
        assert_eq!(last.owner_path(), &[0]);
        assert_eq!(last.slot(), 1);

        let salary = &catalog.entries()[2];
        assert!(salary.owner_path().is_empty());
        assert_eq!(salary.slot(), 1);
        assert!(!catalog.entries()[3].exported());
    }

    #[test]
    fn test_missing_flatten_catalog_contributes_nothing() {
        let catalog = Catalog::build("Person", &PERSON_FIELDS, vec![]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.fields().len(), 3);
        assert_eq!(catalog.type_name(), "Person");
    }
}
