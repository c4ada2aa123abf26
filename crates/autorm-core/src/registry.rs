use crate::domain::{Member, MemberTy, Primitive};
use crate::filter::{Filter, SoftDeleteFilter};
use crate::{Error, Result};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Named extension points that overrides may refer to: custom column types,
/// custom identifier generators and row filters.
///
/// A new registry knows the [`SoftDeleteFilter`].
#[derive(Debug, Clone)]
pub struct Registry {
    column_types: IndexMap<String, UserType>,
    id_generators: IndexSet<String>,
    filters: IndexMap<String, Arc<dyn Filter>>,
}

/// A custom column type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserType {
    pub name: String,

    /// Member types the column type can store. Empty accepts any member.
    #[serde(default)]
    pub accepts: Vec<Primitive>,
}

impl Registry {
    pub fn new() -> Registry {
        let mut registry = Registry {
            column_types: IndexMap::new(),
            id_generators: IndexSet::new(),
            filters: IndexMap::new(),
        };
        registry.register_filter(SoftDeleteFilter);
        registry
    }

    pub fn register_column_type(&mut self, ty: UserType) -> &mut Self {
        self.column_types.insert(ty.name.clone(), ty);
        self
    }

    pub fn register_id_generator(&mut self, name: impl Into<String>) -> &mut Self {
        self.id_generators.insert(name.into());
        self
    }

    /// Registers a filter, replacing any filter of the same name.
    pub fn register_filter(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters
            .insert(filter.name().to_string(), Arc::new(filter));
        self
    }

    pub fn filter(&self, name: &str) -> Option<&dyn Filter> {
        self.filters.get(name).map(|filter| &**filter)
    }

    pub fn filters(&self) -> impl Iterator<Item = &dyn Filter> {
        self.filters.values().map(|filter| &**filter)
    }

    pub fn has_id_generator(&self, name: &str) -> bool {
        self.id_generators.contains(name)
    }

    /// The registered column type `name`, checked against the member it is
    /// going to store.
    pub fn column_type_for(&self, name: &str, member: &Member) -> Result<&UserType> {
        let Some(ty) = self.column_types.get(name) else {
            return Err(Error::invalid_override(format!(
                "`{}` uses column type `{name}`, which is not registered",
                member.name
            )));
        };

        if !ty.accepts(&member.ty) {
            return Err(Error::invalid_override(format!(
                "column type `{name}` cannot store `{}`",
                member.name
            )));
        }

        Ok(ty)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

impl UserType {
    pub fn new(name: impl Into<String>) -> UserType {
        UserType {
            name: name.into(),
            accepts: vec![],
        }
    }

    pub fn accepting(mut self, primitive: Primitive) -> Self {
        self.accepts.push(primitive);
        self
    }

    fn accepts(&self, ty: &MemberTy) -> bool {
        if self.accepts.is_empty() {
            return true;
        }

        match ty {
            MemberTy::Primitive(primitive) => self.accepts.contains(primitive),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelDef, TypeDef, MemberDef};
    use std_util::prelude::*;

    fn member(primitive: Primitive) -> Member {
        let model = ModelDef::new("test")
            .ty(TypeDef::entity("Order").member(MemberDef::primitive("Total", primitive)))
            .build()
            .unwrap();
        let member = model.types().next().unwrap().members[0].clone();
        member
    }

    #[test]
    fn soft_delete_is_registered_by_default() {
        let registry = Registry::new();
        let filter = assert_some!(registry.filter("soft_delete"));
        assert_eq!(filter.name(), "soft_delete");
    }

    #[test]
    fn unregistered_column_type_is_rejected() {
        let registry = Registry::new();
        let err = assert_err!(registry.column_type_for("money", &member(Primitive::Decimal)));
        assert!(err.is_invalid_override());
        assert_err_mentions!(err, "`money`", "not registered");
    }

    #[test]
    fn column_type_must_accept_member_type() {
        let mut registry = Registry::new();
        registry.register_column_type(UserType::new("money").accepting(Primitive::Decimal));

        assert_ok!(registry.column_type_for("money", &member(Primitive::Decimal)));

        let err = assert_err!(registry.column_type_for("money", &member(Primitive::String)));
        assert!(err.is_invalid_override());
        assert_err_mentions!(err, "cannot store `Total`");
    }
}
