//! Row filters attached to entities and their collections.

mod soft_delete;
pub use soft_delete::SoftDeleteFilter;

use crate::domain::{DomainModel, TypeId};
use crate::inspect::Inspector;
use crate::mapping::ColumnType;
use crate::naming;
use crate::{Error, Registry, Result};
use indexmap::IndexSet;
use serde::Serialize;
use std::fmt;

/// A named row filter the ORM applies to queries of the entities it is
/// attached to.
pub trait Filter: fmt::Debug + Send + Sync {
    /// Unique name the filter is registered and attached under
    fn name(&self) -> &str;

    /// SQL condition applied to the filtered table.
    fn condition(&self, cx: &FilterContext<'_>) -> Result<String>;

    /// Named parameters referenced by the condition.
    fn parameters(&self) -> Vec<FilterParameter>;

    /// Condition used when the filter is enabled without an explicit one.
    fn default_condition(&self) -> Option<String> {
        None
    }

    /// Apply the filter when loading many-to-one associations too.
    fn use_on_many_to_one(&self) -> bool {
        true
    }
}

/// What a filter can look up while building its condition.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    model: &'a DomainModel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterParameter {
    pub name: String,
    pub ty: ColumnType,
}

/// A filter attached to a class or collection mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterMapping {
    pub name: String,
    pub condition: String,
}

/// Model-wide declaration of a filter, registered once with the ORM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterDefinition {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_condition: Option<String>,

    pub parameters: Vec<FilterParameter>,

    pub use_on_many_to_one: bool,
}

impl<'a> FilterContext<'a> {
    pub fn new(model: &'a DomainModel) -> FilterContext<'a> {
        FilterContext { model }
    }

    pub fn model(&self) -> &'a DomainModel {
        self.model
    }

    /// Column of a member every tracked entity receives, honoring a column
    /// override declared on the tracked template.
    pub fn tracked_column(&self, member: &str) -> String {
        self.model
            .tracked_template()
            .and_then(|template| template.member_by_name(member))
            .and_then(|member| member.attrs.property.as_ref())
            .and_then(|property| property.column_name.clone())
            .unwrap_or_else(|| naming::to_schema_name(member))
    }
}

impl FilterParameter {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> FilterParameter {
        FilterParameter {
            name: name.into(),
            ty,
        }
    }
}

/// Filter names attached to the type, walking from the type up through its
/// bases. A filter detached anywhere in the hierarchy is dropped.
fn attached_names(model: &DomainModel, id: TypeId) -> IndexSet<&str> {
    let detached: IndexSet<&str> = model
        .lineage(id)
        .flat_map(|ty| ty.attrs.detach_filters.iter().map(String::as_str))
        .collect();

    model
        .lineage(id)
        .flat_map(|ty| ty.attrs.attach_filters.iter().map(String::as_str))
        .filter(|name| !detached.contains(name))
        .collect()
}

/// Filters applying to a type, each with its condition built.
///
/// Order follows discovery from the type up through its bases; a filter
/// attached at several levels appears once.
pub fn filters_for_type(
    model: &DomainModel,
    registry: &Registry,
    id: TypeId,
) -> Result<Vec<FilterMapping>> {
    let cx = FilterContext::new(model);

    attached_names(model, id)
        .into_iter()
        .map(|name| -> Result<FilterMapping> {
            let filter = lookup(model, registry, id, name)?;
            Ok(FilterMapping {
                name: filter.name().to_string(),
                condition: filter.condition(&cx)?,
            })
        })
        .collect()
}

/// Definitions of every filter attached to some entity of the model,
/// de-duplicated by name.
pub fn filter_definitions(model: &DomainModel, registry: &Registry) -> Result<Vec<FilterDefinition>> {
    let inspector = Inspector::new(model);
    let mut seen = IndexSet::new();
    let mut definitions = vec![];

    for entity in inspector.entities() {
        for name in attached_names(model, entity.id) {
            if !seen.insert(name) {
                continue;
            }

            let filter = lookup(model, registry, entity.id, name)?;
            definitions.push(FilterDefinition {
                name: filter.name().to_string(),
                default_condition: filter.default_condition(),
                parameters: filter.parameters(),
                use_on_many_to_one: filter.use_on_many_to_one(),
            });
        }
    }

    Ok(definitions)
}

fn lookup<'r>(
    model: &DomainModel,
    registry: &'r Registry,
    id: TypeId,
    name: &str,
) -> Result<&'r dyn Filter> {
    registry.filter(name).ok_or_else(|| {
        Error::invalid_override(format!(
            "`{}` attaches filter `{name}`, which is not registered",
            model.ty(id).name
        ))
    })
}
