use super::Resolver;
use crate::domain::{MemberTy, Primitive, TypeId};
use crate::filter::filters_for_type;
use crate::mapping::{
    ClassMapping, Discriminator, Generated, IdentifierMapping, IdentifierStrategy,
    InheritanceScheme, SchemaAction, SubClassMapping, VersionMapping, VersionType,
};
use crate::naming;
use crate::{Error, Result};

/// Identifier column used unless the identifier names one.
pub const DEFAULT_IDENTIFIER_COLUMN: &str = "id";

impl Resolver<'_> {
    /// Assembles the class-level mapping of a root entity: table and
    /// schema, identifier, mutability, discriminator, version and filters.
    pub fn class_mapping(&mut self, entity: TypeId) -> Result<ClassMapping> {
        let ty = self.model.ty(entity);
        let reference = self.inspector.is_reference_entity(entity);

        let defaults = ClassMapping {
            table_name: naming::table_name(self.model, entity),
            schema_name: self.model.default_schema().map(str::to_string),
            dynamic_update: true,
            is_mutable: !reference,
            schema_action: SchemaAction::All,
            cache: None,
            identifier: self.identifier_mapping(entity)?,
            discriminator: self.discriminator(entity),
            version: self.version_mapping(entity)?,
            filters: filters_for_type(self.model, self.registry, entity)?,
        };

        let mapping = match &ty.attrs.class {
            Some(explicit) => explicit.merge(defaults),
            None => defaults,
        };

        if mapping.identifier.strategy == IdentifierStrategy::Custom {
            match &mapping.identifier.generator {
                Some(generator) if self.registry.has_id_generator(generator) => {}
                Some(generator) => {
                    return Err(Error::invalid_override(format!(
                        "`{}` uses identifier generator `{generator}`, which is not registered",
                        ty.name
                    )))
                }
                None => {
                    return Err(Error::invalid_override(format!(
                        "`{}` uses the custom identifier strategy without naming a generator",
                        ty.name
                    )))
                }
            }
        }

        tracing::debug!(
            entity = %ty.name,
            table = %mapping.table_name,
            strategy = ?mapping.identifier.strategy,
            "assembled class mapping"
        );

        Ok(mapping)
    }

    /// The identifier column and generation strategy. Reference entities
    /// carry assigned ids; other entities pre-allocate ids with hi/lo.
    pub fn identifier_mapping(&self, entity: TypeId) -> Result<IdentifierMapping> {
        let member = self.inspector.identifier(entity)?;

        let column_name = member
            .member
            .attrs
            .identifier
            .as_ref()
            .and_then(|identifier| identifier.column_name.clone())
            .unwrap_or_else(|| DEFAULT_IDENTIFIER_COLUMN.to_string());

        let strategy = if self.inspector.is_reference_entity(entity) {
            IdentifierStrategy::Assigned
        } else {
            IdentifierStrategy::HiLo
        };

        Ok(IdentifierMapping {
            member: member.member.name.clone(),
            column_name,
            strategy,
            generator: None,
            access: self.access(member),
        })
    }

    /// Discriminator column, declared by the root of a single-table
    /// hierarchy.
    pub fn discriminator(&self, entity: TypeId) -> Option<Discriminator> {
        let root = self.model.ty(entity).attrs.inheritance_root.as_ref()?;

        (root.scheme == InheritanceScheme::TablePerClassHierarchy).then(|| Discriminator {
            column_name: root.discriminator_column.clone(),
            ty: root.discriminator_type,
        })
    }

    /// The optimistic concurrency version, if the entity declares one.
    pub fn version_mapping(&mut self, entity: TypeId) -> Result<Option<VersionMapping>> {
        let Some(member) = self.inspector.concurrency_member(entity)? else {
            return Ok(None);
        };

        let ty = match member.member.ty {
            MemberTy::Primitive(Primitive::DateTime) => VersionType::Timestamp,
            MemberTy::Primitive(Primitive::I32) => VersionType::Int32,
            MemberTy::Primitive(Primitive::I64) => VersionType::Int64,
            ref other => {
                return Err(Error::unsupported_version_type(
                    member.display_name(self.model),
                    self.model.describe(other),
                ))
            }
        };

        let generated = match &member.member.attrs.concurrency_lock {
            Some(lock) if lock.database_generated => Generated::Always,
            _ => Generated::Never,
        };

        let property = self.property_mapping(member)?;

        Ok(Some(VersionMapping {
            member: member.member.name.clone(),
            column_name: property.column_name,
            ty,
            generated,
            not_null: !property.nullable,
            default: property.default,
            length: property.length,
            unsaved_value: (!member.member.nullable).then(|| ty.unsaved_value().to_string()),
        }))
    }

    /// Mapping of an entity extending another entity.
    ///
    /// Single-table subclasses are told apart by a discriminator value, the
    /// simple type name unless overridden. Joined and union subclasses own
    /// a table.
    pub fn subclass_mapping(&self, entity: TypeId) -> Result<SubClassMapping> {
        let ty = self.model.ty(entity);

        let Some(base) = self.inspector.entity_base(entity) else {
            return Err(Error::invalid_override(format!(
                "`{}` is mapped as a subclass but extends no entity",
                ty.name
            )));
        };

        let Some(root) = self.inspector.inheritance_root(entity) else {
            return Err(Error::invalid_override(format!(
                "`{}` extends entity `{}`, but the hierarchy declares no inheritance scheme",
                ty.name,
                self.model.ty(base).name
            )));
        };

        let (discriminator_value, table_name, schema_name) = match root.scheme {
            InheritanceScheme::TablePerClassHierarchy => (Some(ty.name.clone()), None, None),
            InheritanceScheme::TablePerClass | InheritanceScheme::TablePerConcreteClass => {
                let schema_name = ty
                    .attrs
                    .class
                    .as_ref()
                    .and_then(|class| class.schema_name.clone())
                    .or_else(|| self.model.default_schema().map(str::to_string));

                (None, Some(naming::table_name(self.model, entity)), schema_name)
            }
        };

        let defaults = SubClassMapping {
            scheme: root.scheme,
            extends: self.model.ty(base).name.clone(),
            discriminator_value,
            table_name,
            schema_name,
            filters: filters_for_type(self.model, self.registry, entity)?,
        };

        Ok(match &ty.attrs.subclass {
            Some(explicit) => explicit.merge(defaults),
            None => defaults,
        })
    }
}
