//! Resolution of mapping descriptors.
//!
//! The [`Resolver`] computes the conventional default for each concern,
//! merges the explicit override on top and memoizes member-level results,
//! so that a member referenced from both sides of a relation resolves once.

mod association;
mod class;
mod collection;
mod property;

use crate::domain::{DomainModel, MemberId, TypeId};
use crate::inspect::{EntityMember, Inspector};
use crate::mapping::{
    Access, AssociationMapping, CollectionMapping, OneToOneMapping, PropertyMapping,
};
use crate::Registry;
use std::collections::HashMap;

type MemberKey = (TypeId, MemberId);

#[derive(Debug)]
pub struct Resolver<'a> {
    model: &'a DomainModel,
    registry: &'a Registry,
    inspector: Inspector<'a>,
    properties: HashMap<MemberKey, PropertyMapping>,
    associations: HashMap<MemberKey, AssociationMapping>,
    one_to_ones: HashMap<MemberKey, OneToOneMapping>,
    collections: HashMap<MemberKey, CollectionMapping>,
}

impl<'a> Resolver<'a> {
    pub fn new(model: &'a DomainModel, registry: &'a Registry) -> Resolver<'a> {
        Resolver {
            model,
            registry,
            inspector: Inspector::new(model),
            properties: HashMap::new(),
            associations: HashMap::new(),
            one_to_ones: HashMap::new(),
            collections: HashMap::new(),
        }
    }

    pub fn model(&self) -> &'a DomainModel {
        self.model
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn inspector(&self) -> Inspector<'a> {
        self.inspector
    }

    /// How the ORM reaches a member: through its backing field when the
    /// member is a collection or has no setter, through the property
    /// otherwise.
    pub fn access(&self, member: EntityMember<'_>) -> Access {
        match self.inspector.backing_field(member) {
            Some(field) if member.member.ty.is_collection() => Access::Field(field),
            Some(field) if !member.member.has_setter() => Access::NoSetter(field),
            _ => Access::Property,
        }
    }
}

fn key(member: EntityMember<'_>) -> MemberKey {
    (member.entity, member.member.id)
}
