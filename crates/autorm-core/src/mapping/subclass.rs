use super::InheritanceScheme;
use crate::filter::FilterMapping;
use serde::{Deserialize, Serialize};

/// Explicit settings for a subclass of a mapped hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubClassOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubClassMapping {
    pub scheme: InheritanceScheme,

    /// Name of the direct mapped base type
    pub extends: String,

    /// Set for single-table hierarchies only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator_value: Option<String>,

    /// Set for joined and union subclasses, which own a table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterMapping>,
}

impl SubClassOverride {
    /// Fills every unset field from `defaults`.
    pub fn merge(&self, defaults: SubClassMapping) -> SubClassMapping {
        SubClassMapping {
            discriminator_value: match defaults.scheme {
                InheritanceScheme::TablePerClassHierarchy => self
                    .discriminator_value
                    .clone()
                    .or(defaults.discriminator_value),
                _ => None,
            },
            ..defaults
        }
    }
}
