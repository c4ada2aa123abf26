use serde::{Deserialize, Serialize};
use std::fmt;

/// Explicit settings for a property column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropertyOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,

    /// Column default, as SQL text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// Name of a registered custom column type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_type: Option<String>,

    /// Leave the column out of UPDATE statements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_on_update: Option<bool>,

    /// Prefix for the columns of a component-typed member
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_column_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyMapping {
    pub member: String,
    pub access: Access,
    pub column_name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub unique: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    pub ignore_on_update: bool,

    /// Set for component-typed members only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_column_prefix: Option<String>,
}

/// How the ORM reads and writes a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "field")]
pub enum Access {
    /// Through the property accessors
    Property,
    /// Directly through the named backing field
    Field(String),
    /// Read through the property, written through the named backing field
    NoSetter(String),
}

/// A physical column produced by a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub nullable: bool,
    pub unique: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    AnsiString,
    String,
    Boolean,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    DateTime,
    DateTimeOffset,
    Guid,
    Binary,
    /// A flags value stored as a 64-bit integer
    BitwiseMask,
    /// A lightweight entity reference stored as id and name columns
    ReferenceTo,
    /// A registered custom column type
    Custom(String),
}

impl PropertyOverride {
    /// Fills every unset field from `defaults`. `column_type` names a
    /// registered type and is resolved by the caller.
    pub fn merge(&self, defaults: PropertyMapping) -> PropertyMapping {
        PropertyMapping {
            member: defaults.member,
            access: defaults.access,
            column_name: self.column_name.clone().unwrap_or(defaults.column_name),
            column_type: defaults.column_type,
            nullable: self.nullable.unwrap_or(defaults.nullable),
            unique: self.unique.unwrap_or(defaults.unique),
            default: self.default.clone().or(defaults.default),
            length: self.length.or(defaults.length),
            ignore_on_update: self.ignore_on_update.unwrap_or(defaults.ignore_on_update),
            component_column_prefix: match defaults.component_column_prefix {
                Some(prefix) => Some(self.component_column_prefix.clone().unwrap_or(prefix)),
                None => None,
            },
        }
    }
}

impl PropertyMapping {
    /// The single column this property maps to.
    pub fn column(&self) -> Column {
        Column {
            name: self.column_name.clone(),
            ty: self.column_type.clone(),
            nullable: self.nullable,
            unique: self.unique,
            length: self.length,
            default: self.default.clone(),
        }
    }

    /// The column name of a member nested in this component property.
    pub fn component_column(&self, column: &str) -> String {
        format!(
            "{}{column}",
            self.component_column_prefix.as_deref().unwrap_or_default()
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Custom(name) => f.write_str(name),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> PropertyMapping {
        PropertyMapping {
            member: "Name".into(),
            access: Access::Property,
            column_name: "name".into(),
            column_type: ColumnType::AnsiString,
            nullable: true,
            unique: false,
            default: None,
            length: Some(100),
            ignore_on_update: false,
            component_column_prefix: None,
        }
    }

    #[test]
    fn override_fills_only_given_fields() {
        let explicit = PropertyOverride {
            length: Some(250),
            nullable: Some(false),
            ..Default::default()
        };

        let merged = explicit.merge(defaults());
        assert_eq!(merged.length, Some(250));
        assert!(!merged.nullable);
        assert_eq!(merged.column_name, "name");
        assert_eq!(merged.column_type, ColumnType::AnsiString);
    }

    #[test]
    fn component_prefix_ignored_on_plain_properties() {
        let explicit = PropertyOverride {
            component_column_prefix: Some("addr_".into()),
            ..Default::default()
        };

        assert_eq!(explicit.merge(defaults()).component_column_prefix, None);
    }

    #[test]
    fn component_column_is_prefixed() {
        let mut mapping = defaults();
        mapping.component_column_prefix = Some("billing_address_".into());
        assert_eq!(mapping.component_column("city"), "billing_address_city");
    }
}
