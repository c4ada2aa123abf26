//! Naming conventions turning type and member names into schema
//! identifiers.
//!
//! Everything here is a pure function of the model: calling it twice on the
//! same input yields the same name, which matters because the names end up
//! in a live database schema.

use crate::domain::{DomainModel, TypeId};
use std::fmt;

/// Suffix stripped from type names when deriving table names.
pub const ENTITY_SUFFIX: &str = "Entity";

/// Delimiter placed between words of schema identifiers.
pub const DELIMITER: char = '_';

/// Converts an identifier into schema casing: a delimiter before every
/// uppercase letter (never leading), then everything lowercased.
///
/// ```
/// use autorm_core::naming::to_schema_name;
///
/// assert_eq!(to_schema_name("FooBarBaz"), "foo_bar_baz");
/// assert_eq!(to_schema_name("foo_bar_baz"), "foo_bar_baz");
/// ```
pub fn to_schema_name(identifier: &str) -> String {
    std_util::str::delimit_upper(identifier, DELIMITER).to_lowercase()
}

/// Table name of a type.
///
/// An explicit table name is used as given. Otherwise it is the type's
/// [`schema_name`].
pub fn table_name(model: &DomainModel, id: TypeId) -> String {
    match explicit_table_name(model, id) {
        Some(table_name) => table_name.to_string(),
        None => schema_name(model, id),
    }
}

/// Name standing for a type inside other schema identifiers.
///
/// Starts from the explicit table name, else the hierarchy's table name
/// template applied to the simple name, else the simple name. The `Entity`
/// suffix is stripped (twice, for doubled suffixes) and the result is put in
/// schema casing, explicit table names included.
pub fn schema_name(model: &DomainModel, id: TypeId) -> String {
    let ty = model.ty(id);

    let name = match explicit_table_name(model, id) {
        Some(table_name) => table_name.to_string(),
        None => model
            .lineage(id)
            .find_map(|ty| ty.attrs.inheritance_root.as_ref())
            .and_then(|root| root.format_table_name(&ty.name))
            .unwrap_or_else(|| ty.name.clone()),
    };

    to_schema_name(std_util::str::strip_suffix_n(&name, ENTITY_SUFFIX, 2))
}

fn explicit_table_name(model: &DomainModel, id: TypeId) -> Option<&str> {
    model
        .ty(id)
        .attrs
        .class
        .as_ref()
        .and_then(|class| class.table_name.as_deref())
}

/// The part of a foreign key name that stands for a type: its foreign key
/// alias if it or a base declares one, else its schema name.
pub fn foreign_key_name_part(model: &DomainModel, id: TypeId) -> String {
    model
        .lineage(id)
        .find_map(|ty| ty.attrs.foreign_key_alias.clone())
        .unwrap_or_else(|| schema_name(model, id))
}

/// Key column a collection uses to point back at its owner when the
/// element type has no member referring to it, e.g. `customer_id`.
pub fn owner_key_column(model: &DomainModel, owner: TypeId) -> String {
    format!("{}_id", schema_name(model, owner))
}

/// Conventional key column pointing at a type, e.g. `customer_id`.
///
/// Built from the simple type name rather than the table name so that the
/// column does not move when a table is renamed.
pub fn key_column(model: &DomainModel, target: TypeId) -> String {
    format!("{}_id", to_schema_name(&model.ty(target).name))
}

/// Name of the private field conventionally backing a property:
/// `_` followed by the name with its first letter lowercased.
pub fn backing_field_name(member: &str) -> String {
    format!("_{}", std_util::str::lower_first(member))
}

/// Conventional name of a foreign key constraint, `FK_{from}_{to}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyName {
    from: String,
    to: String,
}

impl ForeignKeyName {
    /// Names the constraint from the table of `from` to the table of `to`.
    pub fn new(model: &DomainModel, from: TypeId, to: TypeId) -> ForeignKeyName {
        ForeignKeyName {
            from: foreign_key_name_part(model, from),
            to: foreign_key_name_part(model, to),
        }
    }
}

impl ForeignKeyName {
    /// Returns true if the name follows the `FK_` convention. Other names
    /// are placeholders the ORM assigns itself.
    pub fn is_conventional(name: &str) -> bool {
        name.starts_with("FK_")
    }
}

impl fmt::Display for ForeignKeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FK_{}_{}", self.from, self.to)
    }
}

impl From<ForeignKeyName> for String {
    fn from(value: ForeignKeyName) -> Self {
        value.to_string()
    }
}
