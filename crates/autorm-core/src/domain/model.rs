use super::{Capability, DomainType, Member, MemberId, MemberTy, TypeId};
use indexmap::IndexMap;
use std::collections::HashMap;

/// A complete, validated domain model.
///
/// Built once from a [`ModelDef`](super::ModelDef) and read-only from then
/// on. All [`TypeId`]s and [`MemberId`]s handed out by the model index into
/// it.
#[derive(Debug, Clone)]
pub struct DomainModel {
    name: String,
    default_schema: Option<String>,
    types: IndexMap<TypeId, DomainType>,
    by_name: HashMap<String, TypeId>,
    tracked_template: Option<TypeId>,
}

impl DomainModel {
    pub(super) fn new(
        name: String,
        default_schema: Option<String>,
        types: IndexMap<TypeId, DomainType>,
        tracked_template: Option<TypeId>,
    ) -> DomainModel {
        let by_name = types
            .values()
            .flat_map(|ty| {
                let mut names = vec![(ty.name.clone(), ty.id)];
                if ty.namespace.is_some() {
                    names.push((ty.qualified_name(), ty.id));
                }
                names
            })
            .collect();

        DomainModel {
            name,
            default_schema,
            types,
            by_name,
            tracked_template,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema applied to every table unless a class override names another.
    pub fn default_schema(&self) -> Option<&str> {
        self.default_schema.as_deref()
    }

    /// Get a type by ID
    pub fn ty(&self, id: impl Into<TypeId>) -> &DomainType {
        &self.types[&id.into()]
    }

    pub fn types(&self) -> impl Iterator<Item = &DomainType> {
        self.types.values()
    }

    /// Looks a type up by simple or namespace-qualified name.
    pub fn type_by_name(&self, name: &str) -> Option<&DomainType> {
        self.by_name.get(name).map(|id| self.ty(*id))
    }

    /// Get a member by ID
    pub fn member(&self, id: impl Into<MemberId>) -> &Member {
        let id = id.into();
        self.ty(id.ty).member(id)
    }

    /// The type whose members every tracked entity receives, if the model
    /// declares one.
    pub fn tracked_template(&self) -> Option<&DomainType> {
        self.tracked_template.map(|id| self.ty(id))
    }

    /// Iterates the type and its base types, from the type itself up to the
    /// top of the hierarchy.
    pub fn lineage(&self, id: TypeId) -> impl Iterator<Item = &DomainType> {
        let mut next = Some(id);
        core::iter::from_fn(move || {
            let ty = self.ty(next?);
            next = ty.base;
            Some(ty)
        })
    }

    /// The type's hierarchy ordered from the top-most base down to the type
    /// itself.
    pub fn hierarchy(&self, id: TypeId) -> Vec<&DomainType> {
        let mut hierarchy: Vec<_> = self.lineage(id).collect();
        hierarchy.reverse();
        hierarchy
    }

    /// Returns true if the type or one of its bases declares the
    /// capability.
    pub fn has_capability(&self, id: TypeId, capability: Capability) -> bool {
        self.lineage(id).any(|ty| ty.declares(capability))
    }

    /// Returns true if `id` is `ancestor` or derives from it.
    pub fn is_subtype_of(&self, id: TypeId, ancestor: TypeId) -> bool {
        self.lineage(id).any(|ty| ty.id == ancestor)
    }

    /// Members visible on an instance of the type, walking the hierarchy top
    /// down. A member declared lower in the hierarchy hides a base member of
    /// the same name and takes its position.
    pub fn visible_members(&self, id: TypeId) -> Vec<&Member> {
        let mut visible = IndexMap::<&str, &Member>::new();
        for ty in self.hierarchy(id) {
            for member in &ty.members {
                visible.insert(&member.name, member);
            }
        }
        visible.into_values().collect()
    }

    /// Human readable name of a member type, for diagnostics.
    pub fn describe(&self, ty: &MemberTy) -> String {
        match ty {
            MemberTy::Primitive(primitive) => primitive.to_string(),
            MemberTy::Enum { name, .. } => name.clone(),
            MemberTy::Type(id) => self.ty(*id).name.clone(),
            MemberTy::Collection(id) => format!("collection of {}", self.ty(*id).name),
            MemberTy::ReferenceTo(id) => format!("reference to {}", self.ty(*id).name),
            MemberTy::BitwiseMask(id) => format!("bitwise mask of {}", self.ty(*id).name),
        }
    }

    /// Returns true if some level of the type's hierarchy declares a private
    /// field of that name.
    pub fn has_field(&self, id: TypeId, name: &str) -> bool {
        self.lineage(id).any(|ty| ty.has_field(name))
    }
}
