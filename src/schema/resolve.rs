//! Field resolution: matching patch identifiers to catalog entries.

use super::catalog::{Catalog, Entry};
use super::record::FieldDef;
use tracing::trace;

/// Returns the identifier a mapping key must equal to select this field.
///
/// The alias tag is cut at the first `,`; trailing options belong to
/// serializers and are ignored here. An empty alias falls back to the
/// declared name.
pub fn identifier(def: &FieldDef) -> &'static str {
    match def.alias {
        Some(tag) => match tag.split(',').next() {
            Some(alias) if !alias.is_empty() => alias,
            _ => def.name,
        },
        None => def.name,
    }
}

/// Finds the exported field selected by a mapping key.
///
/// A field declared on the record itself shadows a promoted field of the same
/// identifier; among equally deep matches the first declared wins.
pub fn find_by_identifier<'c>(catalog: &'c Catalog, key: &str) -> Option<&'c Entry> {
    let found = shallowest(catalog, |entry| identifier(entry.def()) == key);
    trace!(
        record = catalog.type_name(),
        key,
        found = found.is_some(),
        "resolve by identifier"
    );
    found
}

/// Finds the exported field with the given declared name. Aliases are not
/// consulted. Shadowing follows [`find_by_identifier`].
pub fn find_by_name<'c>(catalog: &'c Catalog, name: &str) -> Option<&'c Entry> {
    let found = shallowest(catalog, |entry| entry.name() == name);
    trace!(
        record = catalog.type_name(),
        name,
        found = found.is_some(),
        "resolve by name"
    );
    found
}

fn shallowest<'c>(catalog: &'c Catalog, pred: impl Fn(&Entry) -> bool) -> Option<&'c Entry> {
    catalog
        .entries()
        .iter()
        .filter(|entry| entry.exported() && pred(entry))
        .min_by_key(|entry| entry.path().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Kind, Shape};

    static FIELDS: [FieldDef; 4] = [
        FieldDef {
            name: "first_name",
            alias: Some("firstName"),
            exported: true,
            shape: Shape::Scalar(Kind::String),
        },
        FieldDef {
            name: "salary",
            alias: Some("pay,omitempty"),
            exported: true,
            shape: Shape::Scalar(Kind::I32),
        },
        FieldDef {
            name: "extra",
            alias: Some(",omitempty"),
            exported: true,
            shape: Shape::Scalar(Kind::String),
        },
        FieldDef {
            name: "hidden",
            alias: None,
            exported: false,
            shape: Shape::Opaque,
        },
    ];

    fn catalog() -> Catalog {
        Catalog::build("Target", &FIELDS, vec![])
    }

    #[test]
    fn test_identifier_cuts_options() {
        assert_eq!(identifier(&FIELDS[0]), "firstName");
        assert_eq!(identifier(&FIELDS[1]), "pay");
        assert_eq!(identifier(&FIELDS[2]), "extra");
        assert_eq!(identifier(&FIELDS[3]), "hidden");
    }

    #[test]
    fn test_find_by_identifier_uses_alias() {
        let c = catalog();
        assert_eq!(find_by_identifier(&c, "firstName").map(Entry::name), Some("first_name"));
        assert_eq!(find_by_identifier(&c, "pay").map(Entry::name), Some("salary"));
        assert!(find_by_identifier(&c, "first_name").is_none());
        assert!(find_by_identifier(&c, "salary").is_none());
        assert!(find_by_identifier(&c, "pay,omitempty").is_none());
    }

    #[test]
    fn test_find_by_name_ignores_alias() {
        let c = catalog();
        assert_eq!(find_by_name(&c, "first_name").map(Entry::name), Some("first_name"));
        assert!(find_by_name(&c, "firstName").is_none());
    }

    #[test]
    fn test_unexported_never_matches() {
        let c = catalog();
        assert!(find_by_identifier(&c, "hidden").is_none());
        assert!(find_by_name(&c, "hidden").is_none());
        assert!(find_by_name(&c, "unknown").is_none());
    }

    static INNER: [FieldDef; 1] = [FieldDef {
        name: "salary",
        alias: None,
        exported: true,
        shape: Shape::Scalar(Kind::I64),
    }];

    static OUTER: [FieldDef; 2] = [
        FieldDef {
            name: "inner",
            alias: None,
            exported: true,
            shape: Shape::Flatten,
        },
        FieldDef {
            name: "salary",
            alias: None,
            exported: true,
            shape: Shape::Scalar(Kind::I64),
        },
    ];

    #[test]
    fn test_declared_field_shadows_promoted() {
        static INNER_CATALOG: once_cell::sync::OnceCell<Catalog> = once_cell::sync::OnceCell::new();
        let inner = INNER_CATALOG.get_or_init(|| Catalog::build("Inner", &INNER, vec![]));
        let c = Catalog::build("Outer", &OUTER, vec![(0, inner)]);

        assert_eq!(find_by_identifier(&c, "salary").map(Entry::path), Some(&[1][..]));
        assert_eq!(find_by_name(&c, "salary").map(Entry::path), Some(&[1][..]));
    }
}
