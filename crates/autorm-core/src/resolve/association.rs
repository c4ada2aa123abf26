use super::{key, Resolver};
use crate::domain::{MemberTy, TypeId};
use crate::inspect::EntityMember;
use crate::mapping::{
    AssociationMapping, AssociationOverride, AssociationType, Cascade, Lazy, OneToOneMapping,
};
use crate::naming::{self, ForeignKeyName};
use crate::{Error, Result};

impl Resolver<'_> {
    /// Settings of a many-to-one association.
    ///
    /// The key column defaults to `{target}_id`. That name is only computed
    /// when no explicit column is given, so an override is enough to settle
    /// a collision.
    pub fn association_mapping(&mut self, member: EntityMember<'_>) -> Result<AssociationMapping> {
        if let Some(mapping) = self.associations.get(&key(member)) {
            return Ok(mapping.clone());
        }

        let target = self.association_target(member)?;
        let explicit = member
            .member
            .attrs
            .association
            .clone()
            .unwrap_or_default();

        let column_name = match &explicit.column_name {
            Some(column_name) => column_name.clone(),
            None => self.association_column(member, target)?,
        };

        let defaults = AssociationMapping {
            member: member.member.name.clone(),
            target: self.model.ty(target).name.clone(),
            association_type: AssociationType::ManyToOne,
            column_name,
            foreign_key_name: ForeignKeyName::new(self.model, member.entity, target).into(),
            no_foreign_key: false,
            cascade: self.default_cascade(target),
            nullable: false,
            lazy: Lazy::Proxy,
        };

        let mapping = explicit.merge(defaults);
        tracing::trace!(
            member = %member.display_name(self.model),
            column = %mapping.column_name,
            foreign_key = %mapping.foreign_key_name,
            "resolved association"
        );

        self.associations.insert(key(member), mapping.clone());
        Ok(mapping)
    }

    /// Settings of a one-to-one association. The foreign key points from
    /// the target back to the owner.
    pub fn one_to_one_mapping(&mut self, member: EntityMember<'_>) -> Result<OneToOneMapping> {
        if let Some(mapping) = self.one_to_ones.get(&key(member)) {
            return Ok(mapping.clone());
        }

        let target = self.association_target(member)?;
        let defaults = OneToOneMapping {
            member: member.member.name.clone(),
            target: self.model.ty(target).name.clone(),
            foreign_key_name: ForeignKeyName::new(self.model, target, member.entity).into(),
            cascade: Cascade::Persist,
            lazy: Lazy::Proxy,
        };

        let mapping = match &member.member.attrs.association {
            Some(explicit) => explicit.merge_one_to_one(defaults),
            None => AssociationOverride::default().merge_one_to_one(defaults),
        };

        self.one_to_ones.insert(key(member), mapping.clone());
        Ok(mapping)
    }

    /// Reference entities are never cascaded into.
    fn default_cascade(&self, target: TypeId) -> Cascade {
        if self.inspector.is_reference_entity(target) {
            Cascade::None
        } else {
            Cascade::Persist
        }
    }

    fn association_target(&self, member: EntityMember<'_>) -> Result<TypeId> {
        match member.member.ty {
            MemberTy::Type(target) if self.inspector.is_entity(target) => Ok(target),
            ref ty => Err(Error::unsupported_member_shape(
                member.display_name(self.model),
                format!(
                    "is of type `{}`, which is not an entity",
                    self.model.describe(ty)
                ),
            )),
        }
    }

    /// The conventional key column, refusing to guess when the owner holds
    /// several associations of the same type that would all receive it.
    fn association_column(&self, member: EntityMember<'_>, target: TypeId) -> Result<String> {
        let colliding: Vec<&str> = self
            .model
            .visible_members(member.entity)
            .into_iter()
            .filter(|other| {
                !other.attrs.ignore
                    && other.ty == MemberTy::Type(target)
                    && other
                        .attrs
                        .association
                        .as_ref()
                        .and_then(|association| association.column_name.as_ref())
                        .is_none()
            })
            .map(|other| other.name.as_str())
            .collect();

        if colliding.len() > 1 {
            return Err(Error::ambiguous_convention(
                format!(
                    "`{}` has several associations of type `{}` that would all use the column `{}`; \
                     give each an explicit column and foreign key name",
                    self.model.ty(member.entity).name,
                    self.model.ty(target).name,
                    naming::key_column(self.model, target),
                ),
                colliding,
            ));
        }

        Ok(naming::key_column(self.model, target))
    }
}
