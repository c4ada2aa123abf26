//! Classification of domain types and members.
//!
//! The inspector answers the questions the resolvers ask: is this type an
//! entity, which members of an entity are persistent and in which order,
//! and what kind of mapping each member needs.

use crate::domain::{Capability, DomainModel, DomainType, Member, MemberTy, TypeId};
use crate::mapping::{AssociationType, InheritanceRoot};
use crate::naming;
use crate::{Error, Result};
use indexmap::IndexMap;

/// Names of the members a tracked entity receives when the model declares
/// no template type.
pub const TRACKED_MEMBERS: &[&str] = &[
    "IsActive",
    "RowCreated",
    "RowCreatedUser",
    "RowUpdated",
    "RowUpdatedUser",
    "Version",
];

/// Name of the identifier member when no member is explicitly marked.
pub const IDENTIFIER_NAME: &str = "Id";

#[derive(Debug, Clone, Copy)]
pub struct Inspector<'a> {
    model: &'a DomainModel,
}

/// A member as seen from a concrete entity.
///
/// The owning entity may differ from the type declaring the member when the
/// member is inherited. Conventions that name things after the owner, such
/// as foreign keys, must use `entity`.
#[derive(Debug, Clone, Copy)]
pub struct EntityMember<'a> {
    pub entity: TypeId,
    pub member: &'a Member,
}

/// The mapping shape of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Identifier,
    Property,
    Component(TypeId),
    ManyToOne(TypeId),
    OneToOne(TypeId),
    Collection(TypeId),
}

impl<'a> Inspector<'a> {
    pub fn new(model: &'a DomainModel) -> Inspector<'a> {
        Inspector { model }
    }

    pub fn model(&self) -> &'a DomainModel {
        self.model
    }

    /// Returns true if instances of the type are persisted in their own
    /// right.
    ///
    /// Abstract types only count when they are the declared root of an
    /// inheritance hierarchy.
    pub fn is_entity(&self, id: TypeId) -> bool {
        let ty = self.model.ty(id);

        if ty.attrs.ignore {
            return false;
        }

        let capable = self.model.has_capability(id, Capability::DomainEntity)
            || self.model.has_capability(id, Capability::ReferenceEntity);

        capable && (!ty.is_abstract || ty.attrs.inheritance_root.is_some())
    }

    /// Returns true if the type is an entity and none of its bases is.
    pub fn is_root_entity(&self, id: TypeId) -> bool {
        self.is_entity(id) && self.model.lineage(id).skip(1).all(|ty| !self.is_entity(ty.id))
    }

    /// Returns true if the type is an embedded value: a concrete class that
    /// is not an entity and is not mapped through a custom type.
    pub fn is_component(&self, id: TypeId) -> bool {
        let ty = self.model.ty(id);
        !ty.attrs.ignore && !ty.attrs.treat_as_property && !ty.is_abstract && !self.is_entity(id)
    }

    pub fn is_reference_entity(&self, id: TypeId) -> bool {
        self.model.has_capability(id, Capability::ReferenceEntity)
    }

    pub fn is_tracked(&self, id: TypeId) -> bool {
        self.model.has_capability(id, Capability::Tracked)
    }

    /// Every entity of the model, in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = &'a DomainType> {
        let inspector = *self;
        self.model
            .types()
            .filter(move |ty| inspector.is_entity(ty.id))
    }

    /// The top-most entity of the type's hierarchy.
    pub fn hierarchy_root(&self, id: TypeId) -> TypeId {
        self.model
            .lineage(id)
            .filter(|ty| self.is_entity(ty.id))
            .last()
            .map(|ty| ty.id)
            .unwrap_or(id)
    }

    /// The inheritance layout declared by the root of the type's hierarchy.
    pub fn inheritance_root(&self, id: TypeId) -> Option<&'a InheritanceRoot> {
        self.model
            .ty(self.hierarchy_root(id))
            .attrs
            .inheritance_root
            .as_ref()
    }

    /// The nearest base type that is an entity.
    pub fn entity_base(&self, id: TypeId) -> Option<TypeId> {
        self.model
            .lineage(id)
            .skip(1)
            .find(|ty| self.is_entity(ty.id))
            .map(|ty| ty.id)
    }

    /// The entity's identifier member.
    ///
    /// A member explicitly marked as the identifier wins; otherwise a member
    /// named `Id`. Marking more than one member is ambiguous.
    pub fn identifier(&self, entity: TypeId) -> Result<EntityMember<'a>> {
        let visible = self.model.visible_members(entity);

        let marked: Vec<&'a Member> = visible
            .iter()
            .copied()
            .filter(|member| !member.attrs.ignore && member.attrs.identifier.is_some())
            .collect();

        match marked[..] {
            [member] => return Ok(EntityMember::new(entity, member)),
            [] => {}
            _ => {
                return Err(Error::ambiguous_convention(
                    format!(
                        "`{}` marks more than one member as its identifier",
                        self.model.ty(entity).name
                    ),
                    marked.iter().map(|member| member.name.clone()),
                ))
            }
        }

        visible
            .into_iter()
            .find(|member| !member.attrs.ignore && member.name == IDENTIFIER_NAME)
            .map(|member| EntityMember::new(entity, member))
            .ok_or_else(|| Error::missing_identifier(self.model.ty(entity).qualified_name()))
    }

    /// Returns true if the member is its entity's identifier.
    pub fn is_identifier(&self, member: EntityMember<'_>) -> bool {
        if member.member.attrs.ignore {
            return false;
        }

        if member.member.attrs.identifier.is_some() {
            return true;
        }

        member.member.name == IDENTIFIER_NAME
            && !self
                .model
                .visible_members(member.entity)
                .iter()
                .any(|other| other.attrs.identifier.is_some())
    }

    /// Name of the private field backing the member, if the owning entity's
    /// hierarchy declares one.
    pub fn backing_field(&self, member: EntityMember<'_>) -> Option<String> {
        let name = naming::backing_field_name(&member.member.name);
        self.model.has_field(member.entity, &name).then_some(name)
    }

    /// Returns true if the member is mapped as a persistent member of its
    /// entity.
    ///
    /// Concurrency versions and the identifier are mapped separately.
    /// Explicit interface implementations cannot be reached by name, and a
    /// member the ORM cannot write (no setter, no backing field) cannot be
    /// loaded.
    pub fn is_persistent(&self, member: EntityMember<'_>) -> bool {
        let m = member.member;

        if m.attrs.concurrency_lock.is_some() || m.attrs.ignore || m.is_explicit_interface() {
            return false;
        }

        if m.is_property() && !m.has_setter() && self.backing_field(member).is_none() {
            return false;
        }

        !self.is_identifier(member)
    }

    /// Persistent members of a root entity, walking its hierarchy top down.
    ///
    /// Tracked entities first receive the members named by the tracked
    /// template, matched by name against the entity's own members. Within a
    /// level, members are ordered by their explicit order, then by
    /// declaration. A member declared lower in the hierarchy replaces a base
    /// member of the same name.
    pub fn persistent_members(&self, entity: TypeId) -> Result<Vec<EntityMember<'a>>> {
        Ok(self
            .candidate_members(entity)?
            .into_iter()
            .filter(|member| self.is_persistent(*member))
            .collect())
    }

    /// Persistent members declared by a subclass itself. Inherited members
    /// are mapped by the base.
    pub fn subclass_members(&self, entity: TypeId) -> Vec<EntityMember<'a>> {
        self.level_members(self.model.ty(entity))
            .into_iter()
            .map(|member| EntityMember::new(entity, member))
            .filter(|member| self.is_persistent(*member))
            .collect()
    }

    /// Persistent members of a component type, flattened over its
    /// hierarchy. `entity` is the entity the component is embedded in.
    pub fn component_members(&self, entity: TypeId, component: TypeId) -> Vec<EntityMember<'a>> {
        let mut members = IndexMap::new();
        for ty in self.model.hierarchy(component) {
            for member in self.level_members(ty) {
                members.insert(member.name.as_str(), member);
            }
        }

        members
            .into_values()
            .map(|member| EntityMember::new(entity, member))
            .filter(|member| self.is_persistent(*member))
            .collect()
    }

    fn candidate_members(&self, entity: TypeId) -> Result<Vec<EntityMember<'a>>> {
        let mut members: IndexMap<&str, &'a Member> = IndexMap::new();

        if self.is_tracked(entity) {
            let visible = self.model.visible_members(entity);

            for name in self.tracked_member_names() {
                let Some(member) = visible.iter().copied().find(|member| member.name == name) else {
                    return Err(Error::unsupported_member_shape(
                        format!("{}.{name}", self.model.ty(entity).name),
                        "is required by the tracked template but not declared",
                    ));
                };
                tracing::trace!(entity = %self.model.ty(entity).name, member = name, "matched tracked member");
                members.insert(member.name.as_str(), member);
            }
        }

        for ty in self.model.hierarchy(entity) {
            for member in self.level_members(ty) {
                // An ignored member keeps its slot so a base declaration
                // cannot bring it back.
                if members.get(member.name.as_str()).is_some_and(|m| m.attrs.ignore) {
                    continue;
                }
                members.insert(member.name.as_str(), member);
            }
        }

        Ok(members
            .into_values()
            .map(|member| EntityMember::new(entity, member))
            .collect())
    }

    /// Members of one hierarchy level that may be mapped, in mapping order.
    fn level_members(&self, ty: &'a DomainType) -> Vec<&'a Member> {
        let mut members: Vec<_> = ty
            .members
            .iter()
            .filter(|member| {
                !member.attrs.ignore
                    && member.name != IDENTIFIER_NAME
                    && (member.is_property() || member.attrs.treat_as_property)
            })
            .collect();

        // Stable: declaration order breaks ties
        members.sort_by_key(|member| member.order.unwrap_or(i32::MAX));
        members
    }

    fn tracked_member_names(&self) -> Vec<&'a str> {
        match self.model.tracked_template() {
            Some(template) => self
                .level_members(template)
                .into_iter()
                .map(|member| member.name.as_str())
                .collect(),
            None => TRACKED_MEMBERS.to_vec(),
        }
    }

    /// Decides how a member is mapped.
    pub fn classify(&self, member: EntityMember<'_>) -> Result<MemberKind> {
        let m = member.member;

        if !m.is_property() {
            return Err(Error::unsupported_member_shape(
                member.display_name(self.model),
                "is mapped as an entity property but is not backed by a property accessor",
            ));
        }

        if m.attrs.treat_as_property {
            return Ok(MemberKind::Property);
        }

        if self.is_identifier(member) {
            return Ok(MemberKind::Identifier);
        }

        match &m.ty {
            MemberTy::Primitive(_)
            | MemberTy::Enum { .. }
            | MemberTy::ReferenceTo(_)
            | MemberTy::BitwiseMask(_) => Ok(MemberKind::Property),
            MemberTy::Type(target) => {
                let target = *target;
                let ty = self.model.ty(target);

                if ty.attrs.treat_as_property {
                    Ok(MemberKind::Property)
                } else if self.is_component(target) {
                    Ok(MemberKind::Component(target))
                } else if self.is_entity(target) {
                    let association_type = m
                        .attrs
                        .association
                        .as_ref()
                        .and_then(|association| association.association_type)
                        .unwrap_or_default();

                    Ok(match association_type {
                        AssociationType::ManyToOne => MemberKind::ManyToOne(target),
                        AssociationType::OneToOne => MemberKind::OneToOne(target),
                    })
                } else {
                    Err(Error::unsupported_member_shape(
                        member.display_name(self.model),
                        format!("refers to `{}`, which is neither an entity nor a component", ty.name),
                    ))
                }
            }
            MemberTy::Collection(element) => {
                if self.is_entity(*element) {
                    Ok(MemberKind::Collection(*element))
                } else {
                    Err(Error::unsupported_member_shape(
                        member.display_name(self.model),
                        format!(
                            "is a collection of `{}`, which is not an entity",
                            self.model.ty(*element).name
                        ),
                    ))
                }
            }
        }
    }

    /// The entity's concurrency version member, if any.
    pub fn concurrency_member(&self, entity: TypeId) -> Result<Option<EntityMember<'a>>> {
        let locked: Vec<&'a Member> = self
            .model
            .visible_members(entity)
            .into_iter()
            .filter(|member| !member.attrs.ignore && member.attrs.concurrency_lock.is_some())
            .collect();

        match locked[..] {
            [] => Ok(None),
            [member] => Ok(Some(EntityMember::new(entity, member))),
            _ => Err(Error::ambiguous_convention(
                format!(
                    "`{}` declares more than one concurrency version member",
                    self.model.ty(entity).name
                ),
                locked.iter().map(|member| member.name.clone()),
            )),
        }
    }
}

impl<'a> EntityMember<'a> {
    pub fn new(entity: TypeId, member: &'a Member) -> EntityMember<'a> {
        EntityMember { entity, member }
    }

    pub fn name(&self) -> &'a str {
        &self.member.name
    }

    /// `Entity.Member`, for diagnostics.
    pub fn display_name(&self, model: &DomainModel) -> String {
        format!("{}.{}", model.ty(self.entity).name, self.member.name)
    }
}
