use super::{Access, VersionMapping};
use crate::filter::FilterMapping;
use serde::{Deserialize, Serialize};

/// Explicit class-level settings. Applies to the declaring type only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,

    /// Only write changed columns on update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_update: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_strategy: Option<IdentifierStrategy>,

    /// Registered generator used by [`IdentifierStrategy::Custom`]. Naming a
    /// generator implies the custom strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id_generator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_mutable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_action: Option<SchemaAction>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_usage: Option<CacheUsage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_region: Option<String>,
}

/// Finalized class-level mapping of a root entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassMapping {
    pub table_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,

    pub dynamic_update: bool,

    pub is_mutable: bool,

    pub schema_action: SchemaAction,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheMapping>,

    pub identifier: IdentifierMapping,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionMapping>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterMapping>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheMapping {
    pub usage: CacheUsage,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Explicit settings for the identifier member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentifierOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierMapping {
    pub member: String,
    pub column_name: String,
    pub strategy: IdentifierStrategy,

    /// Generator name when the strategy is [`IdentifierStrategy::Custom`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,

    pub access: Access,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierStrategy {
    /// Blocks of ids pre-allocated from a shared counter
    HiLo,
    /// Supplied by the application
    Assigned,
    /// Generated by the database on insert
    Identity,
    /// Sequential GUIDs
    GuidComb,
    /// A registered custom generator
    Custom,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaAction {
    All,
    None,
    Drop,
    Update,
    Export,
    Validate,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheUsage {
    ReadOnly,
    ReadWrite,
    NonstrictReadWrite,
    Transactional,
}

/// Declares the root of an inheritance hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InheritanceRoot {
    pub scheme: InheritanceScheme,

    #[serde(default = "default_discriminator_column")]
    pub discriminator_column: String,

    #[serde(default)]
    pub discriminator_type: DiscriminatorType,

    /// Template applied to the simple name of every type of the hierarchy
    /// to build its table name. `{}` is replaced by the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name_format: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceScheme {
    /// One table per class, joined on the identifier
    TablePerClass,
    /// A single table for the whole hierarchy with a discriminator column
    TablePerClassHierarchy,
    /// One table per concrete class holding every inherited column
    TablePerConcreteClass,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscriminatorType {
    #[default]
    AnsiString,
    Int16,
    Int32,
    Int64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discriminator {
    pub column_name: String,
    pub ty: DiscriminatorType,
}

fn default_discriminator_column() -> String {
    "discriminator".to_string()
}

impl ClassOverride {
    /// Fills every unset field from `defaults`.
    pub fn merge(&self, defaults: ClassMapping) -> ClassMapping {
        let cache = match (self.cache_usage, &self.cache_region) {
            (None, None) => defaults.cache,
            (usage, region) => Some(CacheMapping {
                usage: usage.unwrap_or(CacheUsage::ReadWrite),
                region: region.clone(),
            }),
        };

        ClassMapping {
            table_name: self.table_name.clone().unwrap_or(defaults.table_name),
            schema_name: self.schema_name.clone().or(defaults.schema_name),
            dynamic_update: self.dynamic_update.unwrap_or(defaults.dynamic_update),
            is_mutable: self.is_mutable.unwrap_or(defaults.is_mutable),
            schema_action: self.schema_action.unwrap_or(defaults.schema_action),
            cache,
            identifier: IdentifierMapping {
                strategy: self.identifier_strategy().unwrap_or(defaults.identifier.strategy),
                generator: self
                    .custom_id_generator
                    .clone()
                    .or(defaults.identifier.generator),
                ..defaults.identifier
            },
            discriminator: defaults.discriminator,
            version: defaults.version,
            filters: defaults.filters,
        }
    }

    /// The explicit strategy, with a named generator implying
    /// [`IdentifierStrategy::Custom`].
    pub fn identifier_strategy(&self) -> Option<IdentifierStrategy> {
        match (self.identifier_strategy, &self.custom_id_generator) {
            (Some(strategy), _) => Some(strategy),
            (None, Some(_)) => Some(IdentifierStrategy::Custom),
            (None, None) => None,
        }
    }
}

impl InheritanceRoot {
    pub fn new(scheme: InheritanceScheme) -> InheritanceRoot {
        InheritanceRoot {
            scheme,
            discriminator_column: default_discriminator_column(),
            discriminator_type: DiscriminatorType::default(),
            table_name_format: None,
        }
    }

    /// Applies the table name template, if any, to a simple type name.
    pub fn format_table_name(&self, name: &str) -> Option<String> {
        self.table_name_format
            .as_ref()
            .map(|format| format.replace("{0}", name).replace("{}", name))
    }
}
