use super::{key, Resolver};
use crate::domain::{Member, MemberTy, TypeId};
use crate::filter::filters_for_type;
use crate::inspect::EntityMember;
use crate::mapping::{Cascade, CollectionAssociation, CollectionMapping, CollectionType};
use crate::naming::{self, ForeignKeyName};
use crate::{Error, Result};

impl<'a> Resolver<'a> {
    /// Settings of a collection-valued association.
    ///
    /// Unless both key names are given explicitly, they are inferred from
    /// the element type: its single member pointing back at the owner
    /// supplies them, so both sides of the relation agree. Without such a
    /// member the names derive from the owner; with more than one, the
    /// intent cannot be inferred.
    pub fn collection_mapping(&mut self, member: EntityMember<'_>) -> Result<CollectionMapping> {
        if let Some(mapping) = self.collections.get(&key(member)) {
            return Ok(mapping.clone());
        }

        let element = match member.member.ty {
            MemberTy::Collection(element) => element,
            ref ty => {
                return Err(Error::unsupported_member_shape(
                    member.display_name(self.model),
                    format!("is of type `{}`, which is not a collection", self.model.describe(ty)),
                ))
            }
        };

        let explicit = member.member.attrs.collection.clone().unwrap_or_default();

        let (column_name, foreign_key_name) = match (&explicit.column_name, &explicit.foreign_key_name) {
            (Some(column_name), Some(foreign_key_name)) => {
                (column_name.clone(), foreign_key_name.clone())
            }
            _ => self.infer_collection_key(member, element)?,
        };

        let defaults = CollectionMapping {
            member: member.member.name.clone(),
            element: self.model.ty(element).name.clone(),
            collection_type: CollectionType::Bag,
            association: CollectionAssociation::OneToMany,
            column_name,
            foreign_key_name,
            inverse: true,
            cascade: Cascade::All,
            fetch_mode: None,
            filters: filters_for_type(self.model, self.registry, element)?,
        };

        let mapping = explicit.merge(defaults);
        self.collections.insert(key(member), mapping.clone());
        Ok(mapping)
    }

    /// Members of `element` whose declared type is exactly `owner`.
    ///
    /// Subtypes of the owner do not count. Ignored members do: they still
    /// point at the owner, so a single convention cannot pick between them.
    pub fn back_references(&self, owner: TypeId, element: TypeId) -> Vec<&'a Member> {
        self.model
            .visible_members(element)
            .into_iter()
            .filter(|member| member.ty == MemberTy::Type(owner))
            .collect()
    }

    fn infer_collection_key(
        &mut self,
        member: EntityMember<'_>,
        element: TypeId,
    ) -> Result<(String, String)> {
        let owner = member.entity;
        let model = self.model;
        let back_references = self.back_references(owner, element);

        match back_references[..] {
            [] => {
                tracing::trace!(
                    member = %member.display_name(model),
                    "no back reference, naming key after the owner"
                );
                Ok((
                    naming::owner_key_column(model, owner),
                    ForeignKeyName::new(model, element, owner).into(),
                ))
            }
            [back_reference] => {
                tracing::trace!(
                    member = %member.display_name(model),
                    back_reference = %back_reference.name,
                    "inferred collection key from back reference"
                );
                let inverse = self.association_mapping(EntityMember::new(element, back_reference))?;
                Ok((inverse.column_name, inverse.foreign_key_name))
            }
            _ => Err(Error::ambiguous_convention(
                format!(
                    "collection `{}` cannot infer its key: `{}` has {} members of type `{}`; \
                     give the collection an explicit column and foreign key name",
                    member.display_name(model),
                    model.ty(element).name,
                    back_references.len(),
                    model.ty(owner).name,
                ),
                back_references.iter().map(|candidate| candidate.name.clone()),
            )),
        }
    }
}
