use super::TypeId;
use crate::mapping::{
    AssociationOverride, CollectionOverride, ConcurrencyLock, IdentifierOverride, PropertyOverride,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A member (property or field) declared by a domain type.
#[derive(Debug, Clone)]
pub struct Member {
    /// Uniquely identifies the member within the model. `id.ty` is the
    /// declaring type.
    pub id: MemberId,

    pub name: String,

    pub ty: MemberTy,

    /// True for value types wrapped as optional. Reference types are
    /// nullable regardless.
    pub nullable: bool,

    pub accessor: Accessor,

    /// Explicit ordering among the members declared at the same level.
    /// Unordered members sort last.
    pub order: Option<i32>,

    pub attrs: MemberAttrs,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId {
    pub ty: TypeId,
    pub index: usize,
}

/// How a member is reached on an instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Accessor {
    Property {
        /// True when the property exposes a setter
        setter: bool,

        /// True when the property implements an interface member
        /// explicitly and is therefore not reachable by name.
        explicit_interface: bool,
    },

    /// A plain field
    Field,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberTy {
    Primitive(Primitive),

    Enum {
        name: String,
        /// True if one of the enum's values is zero, which makes the
        /// default value distinguishable from "unset".
        has_zero: bool,
    },

    /// A reference to another domain type: an entity (association) or a
    /// component.
    Type(TypeId),

    /// A collection of another domain type.
    Collection(TypeId),

    /// A lightweight reference to an entity stored as its id and display
    /// name.
    ReferenceTo(TypeId),

    /// A flags value over the given type, stored as a 64-bit integer.
    BitwiseMask(TypeId),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    String,
    Bool,
    I16,
    I32,
    I64,
    F32,
    F64,
    Decimal,
    DateTime,
    DateTimeOffset,
    Guid,
    Bytes,
}

/// Declarative settings attached to a member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberAttrs {
    pub ignore: bool,

    /// Force the member to map as a single column even when its type would
    /// otherwise be a component or an association.
    pub treat_as_property: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<IdentifierOverride>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyOverride>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub association: Option<AssociationOverride>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<CollectionOverride>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency_lock: Option<ConcurrencyLock>,
}

impl Member {
    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type that declares this member.
    pub fn declaring_type(&self) -> TypeId {
        self.id.ty
    }

    pub fn is_ignored(&self) -> bool {
        self.attrs.ignore
    }

    pub fn is_property(&self) -> bool {
        matches!(self.accessor, Accessor::Property { .. })
    }

    pub fn has_setter(&self) -> bool {
        matches!(self.accessor, Accessor::Property { setter: true, .. })
    }

    pub fn is_explicit_interface(&self) -> bool {
        matches!(
            self.accessor,
            Accessor::Property {
                explicit_interface: true,
                ..
            }
        )
    }

    /// Returns true if the member's value can be absent.
    ///
    /// Value types are required unless wrapped as optional. Enums with a zero
    /// value and reference types are nullable.
    pub fn is_nullable_type(&self) -> bool {
        if self.nullable {
            return true;
        }

        match &self.ty {
            MemberTy::Primitive(primitive) => !primitive.is_value_type(),
            MemberTy::Enum { has_zero, .. } => *has_zero,
            MemberTy::ReferenceTo(_) => false,
            MemberTy::Type(_) | MemberTy::Collection(_) | MemberTy::BitwiseMask(_) => true,
        }
    }
}

impl MemberTy {
    pub fn is_collection(&self) -> bool {
        matches!(self, MemberTy::Collection(_))
    }

    /// The domain type this member points at, if any.
    pub fn target(&self) -> Option<TypeId> {
        match self {
            MemberTy::Type(id)
            | MemberTy::Collection(id)
            | MemberTy::ReferenceTo(id)
            | MemberTy::BitwiseMask(id) => Some(*id),
            MemberTy::Primitive(_) | MemberTy::Enum { .. } => None,
        }
    }
}

impl Primitive {
    /// Returns true for types stored inline that cannot be null without
    /// being wrapped.
    pub fn is_value_type(self) -> bool {
        !matches!(self, Primitive::String | Primitive::Bytes)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Bool => "bool",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
            Primitive::Decimal => "decimal",
            Primitive::DateTime => "date_time",
            Primitive::DateTimeOffset => "date_time_offset",
            Primitive::Guid => "guid",
            Primitive::Bytes => "bytes",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberId({}/{})", self.ty.0, self.index)
    }
}

impl From<&Member> for MemberId {
    fn from(value: &Member) -> Self {
        value.id
    }
}
