//! Compilation of a whole domain model into mapping descriptors.

use crate::domain::{DomainModel, TypeId};
use crate::filter::{filter_definitions, FilterDefinition};
use crate::inspect::{EntityMember, MemberKind};
use crate::mapping::{
    AssociationMapping, ClassMapping, CollectionMapping, Column, OneToOneMapping,
    PropertyMapping, SubClassMapping,
};
use crate::resolve::Resolver;
use crate::{Error, Registry, Result};
use indexmap::IndexMap;
use serde::Serialize;

/// Every entity mapping of a model, keyed by entity name in declaration
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledModel {
    pub name: String,
    pub entities: IndexMap<String, EntityMapping>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter_definitions: Vec<FilterDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityMapping {
    pub name: String,

    #[serde(flatten)]
    pub kind: EntityKind,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<MappedProperty>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentMapping>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub many_to_ones: Vec<AssociationMapping>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_to_ones: Vec<OneToOneMapping>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<CollectionMapping>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Root of a hierarchy, owning the identifier and the table
    Class(ClassMapping),
    SubClass(SubClassMapping),
}

/// A property and the physical columns it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedProperty {
    #[serde(flatten)]
    pub mapping: PropertyMapping,
    pub columns: Vec<Column>,
}

/// An embedded value, flattened into its owner's table. Column names of
/// nested members carry the component's prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentMapping {
    pub member: String,
    pub component: String,
    pub prefix: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<MappedProperty>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentMapping>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub many_to_ones: Vec<AssociationMapping>,
}

/// Compiles every entity of the model.
///
/// Any convention that cannot be applied fails the whole model.
pub fn compile(model: &DomainModel, registry: &Registry) -> Result<CompiledModel> {
    let mut resolver = Resolver::new(model, registry);
    let inspector = resolver.inspector();
    let mut entities = IndexMap::new();

    for ty in inspector.entities() {
        let mapping = compile_entity(&mut resolver, ty.id)
            .map_err(|err| err.context(crate::err!("failed to map entity `{}`", ty.name)))?;
        entities.insert(ty.name.clone(), mapping);
    }

    let filter_definitions = filter_definitions(model, registry)?;

    tracing::debug!(
        model = model.name(),
        entities = entities.len(),
        filters = filter_definitions.len(),
        "compiled model"
    );

    Ok(CompiledModel {
        name: model.name().to_string(),
        entities,
        filter_definitions,
    })
}

fn compile_entity(resolver: &mut Resolver<'_>, entity: TypeId) -> Result<EntityMapping> {
    let inspector = resolver.inspector();
    let ty = resolver.model().ty(entity);

    let (kind, members) = if inspector.is_root_entity(entity) {
        (
            EntityKind::Class(resolver.class_mapping(entity)?),
            inspector.persistent_members(entity)?,
        )
    } else {
        (
            EntityKind::SubClass(resolver.subclass_mapping(entity)?),
            inspector.subclass_members(entity),
        )
    };

    let mut mapping = EntityMapping {
        name: ty.name.clone(),
        kind,
        properties: vec![],
        components: vec![],
        many_to_ones: vec![],
        one_to_ones: vec![],
        collections: vec![],
    };

    for member in members {
        match inspector.classify(member)? {
            // Mapped by the class mapping
            MemberKind::Identifier => {}
            MemberKind::Property => mapping.properties.push(mapped_property(resolver, member, "")?),
            MemberKind::Component(component) => mapping
                .components
                .push(compile_component(resolver, member, component, "", &[])?),
            MemberKind::ManyToOne(_) => mapping
                .many_to_ones
                .push(resolver.association_mapping(member)?),
            MemberKind::OneToOne(_) => mapping
                .one_to_ones
                .push(resolver.one_to_one_mapping(member)?),
            MemberKind::Collection(_) => mapping
                .collections
                .push(resolver.collection_mapping(member)?),
        }
    }

    tracing::debug!(
        entity = %mapping.name,
        properties = mapping.properties.len(),
        components = mapping.components.len(),
        many_to_ones = mapping.many_to_ones.len(),
        one_to_ones = mapping.one_to_ones.len(),
        collections = mapping.collections.len(),
        "mapped entity"
    );

    Ok(mapping)
}

fn compile_component(
    resolver: &mut Resolver<'_>,
    member: EntityMember<'_>,
    component: TypeId,
    outer_prefix: &str,
    enclosing: &[TypeId],
) -> Result<ComponentMapping> {
    let inspector = resolver.inspector();
    let model = resolver.model();

    let property = resolver.property_mapping(member)?;
    let prefix = format!("{outer_prefix}{}", property.component_column(""));

    let mut mapping = ComponentMapping {
        member: member.member.name.clone(),
        component: model.ty(component).name.clone(),
        prefix: prefix.clone(),
        properties: vec![],
        components: vec![],
        many_to_ones: vec![],
    };

    for nested in inspector.component_members(member.entity, component) {
        match inspector.classify(nested)? {
            MemberKind::Identifier => {}
            MemberKind::Property => mapping
                .properties
                .push(mapped_property(resolver, nested, &prefix)?),
            MemberKind::Component(inner) => {
                let enclosing = [enclosing, &[component]].concat();
                if enclosing.contains(&inner) {
                    return Err(Error::unsupported_member_shape(
                        nested.display_name(model),
                        format!("embeds `{}`, which encloses it", model.ty(inner).name),
                    ));
                }
                mapping
                    .components
                    .push(compile_component(resolver, nested, inner, &prefix, &enclosing)?)
            }
            MemberKind::ManyToOne(_) => {
                let mut association = resolver.association_mapping(nested)?;
                association.column_name = format!("{prefix}{}", association.column_name);
                mapping.many_to_ones.push(association);
            }
            MemberKind::OneToOne(_) | MemberKind::Collection(_) => {
                return Err(Error::unsupported_member_shape(
                    nested.display_name(model),
                    "is an association that cannot be embedded in a component",
                ))
            }
        }
    }

    Ok(mapping)
}

fn mapped_property(
    resolver: &mut Resolver<'_>,
    member: EntityMember<'_>,
    prefix: &str,
) -> Result<MappedProperty> {
    let mut mapping = resolver.property_mapping(member)?;
    let mut columns = resolver.property_columns(member)?;

    if !prefix.is_empty() {
        mapping.column_name = format!("{prefix}{}", mapping.column_name);
        for column in &mut columns {
            column.name = format!("{prefix}{}", column.name);
        }
    }

    Ok(MappedProperty { mapping, columns })
}

impl CompiledModel {
    pub fn entity(&self, name: &str) -> Option<&EntityMapping> {
        self.entities.get(name)
    }

    /// Serializes the compiled model as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl EntityMapping {
    pub fn class(&self) -> Option<&ClassMapping> {
        match &self.kind {
            EntityKind::Class(class) => Some(class),
            EntityKind::SubClass(_) => None,
        }
    }

    pub fn subclass(&self) -> Option<&SubClassMapping> {
        match &self.kind {
            EntityKind::SubClass(subclass) => Some(subclass),
            EntityKind::Class(_) => None,
        }
    }

    pub fn property(&self, member: &str) -> Option<&MappedProperty> {
        self.properties.iter().find(|p| p.mapping.member == member)
    }

    pub fn component(&self, member: &str) -> Option<&ComponentMapping> {
        self.components.iter().find(|c| c.member == member)
    }

    pub fn many_to_one(&self, member: &str) -> Option<&AssociationMapping> {
        self.many_to_ones.iter().find(|a| a.member == member)
    }

    pub fn one_to_one(&self, member: &str) -> Option<&OneToOneMapping> {
        self.one_to_ones.iter().find(|a| a.member == member)
    }

    pub fn collection(&self, member: &str) -> Option<&CollectionMapping> {
        self.collections.iter().find(|c| c.member == member)
    }
}
