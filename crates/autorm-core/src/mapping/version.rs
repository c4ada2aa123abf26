use serde::{Deserialize, Serialize};

/// Marks a member as the optimistic concurrency version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConcurrencyLock {
    /// The database assigns the version on every write
    pub database_generated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionMapping {
    pub member: String,
    pub column_name: String,
    pub ty: VersionType,
    pub generated: Generated,
    pub not_null: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// Version value of an instance that was never saved. `None` means
    /// null.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsaved_value: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    Timestamp,
    Int32,
    Int64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generated {
    Never,
    Always,
}

impl VersionType {
    /// Default value of the underlying type, which marks unsaved instances.
    pub fn unsaved_value(self) -> &'static str {
        match self {
            VersionType::Timestamp => "0001-01-01T00:00:00",
            VersionType::Int32 | VersionType::Int64 => "0",
        }
    }
}
