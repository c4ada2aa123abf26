use super::{Member, MemberId};
use crate::mapping::{ClassOverride, InheritanceRoot, SubClassOverride};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A class of the domain model.
#[derive(Debug, Clone)]
pub struct DomainType {
    /// Uniquely identifies the type within the model
    pub id: TypeId,

    /// Simple (unqualified) type name
    pub name: String,

    pub namespace: Option<String>,

    /// Direct base class, if any
    pub base: Option<TypeId>,

    pub is_abstract: bool,

    /// Capabilities declared at this level. Use
    /// [`DomainModel::has_capability`](super::DomainModel::has_capability)
    /// for the inherited view.
    pub capabilities: Vec<Capability>,

    /// Names of the private instance fields declared at this level.
    pub fields: Vec<String>,

    /// Members declared at this level, in declaration order.
    pub members: Vec<Member>,

    pub attrs: TypeAttrs,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub usize);

/// Marker capabilities a type may declare. A type has a capability when it
/// or any of its base types declares it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Persistent domain entity
    DomainEntity,

    /// Read-mostly lookup entity. Reference entities are immutable, use
    /// assigned identifiers and are never cascaded into.
    ReferenceEntity,

    /// Entity carrying the audit and soft-delete members of the tracked
    /// template.
    Tracked,
}

/// Declarative settings attached to a type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeAttrs {
    pub ignore: bool,

    /// Map members of this type as a single column through a custom type
    /// instead of as a component.
    pub treat_as_property: bool,

    /// Class-level overrides. Not inherited by subclasses.
    #[serde(rename = "class", skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassOverride>,

    #[serde(rename = "subclass", skip_serializing_if = "Option::is_none")]
    pub subclass: Option<SubClassOverride>,

    /// Marks the root of an inheritance hierarchy and picks its layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inheritance_root: Option<InheritanceRoot>,

    /// Name used in place of the table name when building foreign key
    /// names. Inherited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key_alias: Option<String>,

    /// Filters attached to this type and its subclasses.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attach_filters: Vec<String>,

    /// Filters inherited from a base type that no longer apply from this
    /// type down.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub detach_filters: Vec<String>,
}

impl DomainType {
    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace-qualified name, used in diagnostics and generated
    /// mappings.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}.{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn member(&self, id: impl Into<MemberId>) -> &Member {
        let id = id.into();
        assert_eq!(self.id, id.ty);
        &self.members[id.index]
    }

    /// Member declared at this level with the given name.
    pub fn member_by_name(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.name == name)
    }

    /// Returns true if this level declares a private field of that name.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field == name)
    }

    /// Returns true if this level declares the capability. See
    /// [`DomainModel::has_capability`](super::DomainModel::has_capability)
    /// for the inherited check.
    pub fn declares(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

impl From<&DomainType> for TypeId {
    fn from(value: &DomainType) -> Self {
        value.id
    }
}
