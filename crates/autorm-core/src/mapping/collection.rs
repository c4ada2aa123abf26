use super::Cascade;
use crate::filter::FilterMapping;
use serde::{Deserialize, Serialize};

/// Explicit settings for a collection-valued association.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_type: Option<CollectionType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub association: Option<CollectionAssociation>,

    /// Key column on the element side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cascade: Option<Cascade>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_mode: Option<FetchMode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionMapping {
    pub member: String,
    pub element: String,
    pub collection_type: CollectionType,
    pub association: CollectionAssociation,
    pub column_name: String,
    pub foreign_key_name: String,
    pub inverse: bool,
    pub cascade: Cascade,

    /// Unset unless overridden
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_mode: Option<FetchMode>,

    /// Filters of the element type, applied when loading the collection
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterMapping>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionType {
    /// Unordered, duplicates allowed
    #[default]
    Bag,
    Set,
    List,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionAssociation {
    #[default]
    OneToMany,
    ManyToMany,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    Select,
    Join,
    SubSelect,
}

impl CollectionOverride {
    /// Fills every unset field from `defaults`.
    pub fn merge(&self, defaults: CollectionMapping) -> CollectionMapping {
        CollectionMapping {
            member: defaults.member,
            element: defaults.element,
            collection_type: self.collection_type.unwrap_or(defaults.collection_type),
            association: self.association.unwrap_or(defaults.association),
            column_name: self.column_name.clone().unwrap_or(defaults.column_name),
            foreign_key_name: self
                .foreign_key_name
                .clone()
                .unwrap_or(defaults.foreign_key_name),
            inverse: self.inverse.unwrap_or(defaults.inverse),
            cascade: self.cascade.unwrap_or(defaults.cascade),
            fetch_mode: self.fetch_mode.or(defaults.fetch_mode),
            filters: defaults.filters,
        }
    }
}
