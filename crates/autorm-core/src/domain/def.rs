use super::{
    Accessor, Capability, DomainModel, DomainType, Member, MemberAttrs, MemberId, MemberTy,
    Primitive, TypeAttrs, TypeId,
};
use crate::{bail, Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Serializable description of a domain model, with types referenced by
/// name. [`ModelDef::build`] resolves the names and validates the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelDef {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_schema: Option<String>,

    /// Name of the type whose members every tracked entity receives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracked_template: Option<String>,

    pub types: Vec<TypeDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeDef {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    #[serde(rename = "abstract")]
    pub is_abstract: bool,

    pub capabilities: Vec<Capability>,

    /// Private instance fields, used to find property backing fields.
    pub fields: Vec<String>,

    pub members: Vec<MemberDef>,

    #[serde(flatten)]
    pub attrs: TypeAttrs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDef {
    pub name: String,

    pub ty: MemberTyDef,

    #[serde(default)]
    pub nullable: bool,

    /// Property without a setter
    #[serde(default)]
    pub readonly: bool,

    /// Plain field rather than a property
    #[serde(default)]
    pub field: bool,

    #[serde(default)]
    pub explicit_interface: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,

    #[serde(flatten)]
    pub attrs: MemberAttrs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberTyDef {
    Primitive(Primitive),
    Enum {
        name: String,
        #[serde(default)]
        has_zero: bool,
    },
    Type(String),
    Collection(String),
    ReferenceTo(String),
    BitwiseMask(String),
}

impl ModelDef {
    pub fn new(name: impl Into<String>) -> ModelDef {
        ModelDef {
            name: name.into(),
            ..ModelDef::default()
        }
    }

    pub fn default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    pub fn tracked_template(mut self, name: impl Into<String>) -> Self {
        self.tracked_template = Some(name.into());
        self
    }

    pub fn ty(mut self, ty: TypeDef) -> Self {
        self.types.push(ty);
        self
    }

    /// Resolves type names and validates the hierarchy.
    pub fn build(&self) -> Result<DomainModel> {
        Builder::default().build(self)
    }
}

impl TypeDef {
    pub fn new(name: impl Into<String>) -> TypeDef {
        TypeDef {
            name: name.into(),
            ..TypeDef::default()
        }
    }

    /// A concrete domain entity.
    pub fn entity(name: impl Into<String>) -> TypeDef {
        TypeDef::new(name).capability(Capability::DomainEntity)
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn is_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    pub fn member(mut self, member: MemberDef) -> Self {
        self.members.push(member);
        self
    }

    pub fn attrs(mut self, f: impl FnOnce(&mut TypeAttrs)) -> Self {
        f(&mut self.attrs);
        self
    }
}

impl MemberDef {
    pub fn new(name: impl Into<String>, ty: MemberTyDef) -> MemberDef {
        MemberDef {
            name: name.into(),
            ty,
            nullable: false,
            readonly: false,
            field: false,
            explicit_interface: false,
            order: None,
            attrs: MemberAttrs::default(),
        }
    }

    pub fn primitive(name: impl Into<String>, primitive: Primitive) -> MemberDef {
        MemberDef::new(name, MemberTyDef::Primitive(primitive))
    }

    /// A member referencing another domain type.
    pub fn reference(name: impl Into<String>, target: impl Into<String>) -> MemberDef {
        MemberDef::new(name, MemberTyDef::Type(target.into()))
    }

    pub fn collection(name: impl Into<String>, element: impl Into<String>) -> MemberDef {
        MemberDef::new(name, MemberTyDef::Collection(element.into()))
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn plain_field(mut self) -> Self {
        self.field = true;
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn attrs(mut self, f: impl FnOnce(&mut MemberAttrs)) -> Self {
        f(&mut self.attrs);
        self
    }
}

#[derive(Default)]
struct Builder {
    ids: IndexMap<String, TypeId>,
}

impl Builder {
    fn build(mut self, def: &ModelDef) -> Result<DomainModel> {
        for (index, ty) in def.types.iter().enumerate() {
            if ty.name.is_empty() {
                bail!("type #{index} has no name");
            }

            if self.ids.insert(ty.name.clone(), TypeId(index)).is_some() {
                bail!("type `{}` is declared more than once", ty.name);
            }
        }

        let mut types = IndexMap::with_capacity(def.types.len());
        for (index, ty) in def.types.iter().enumerate() {
            let built = self.build_type(TypeId(index), ty)?;
            types.insert(built.id, built);
        }

        self.verify_acyclic(def)?;

        let tracked_template = def
            .tracked_template
            .as_deref()
            .map(|name| self.resolve(name))
            .transpose()?;

        Ok(DomainModel::new(
            def.name.clone(),
            def.default_schema.clone(),
            types,
            tracked_template,
        ))
    }

    fn build_type(&self, id: TypeId, def: &TypeDef) -> Result<DomainType> {
        let base = def.base.as_deref().map(|name| self.resolve(name)).transpose()?;

        let mut seen = HashSet::new();
        let mut members = Vec::with_capacity(def.members.len());
        for (index, member) in def.members.iter().enumerate() {
            if !seen.insert(member.name.as_str()) {
                bail!(
                    "member `{}.{}` is declared more than once",
                    def.name,
                    member.name
                );
            }

            members.push(Member {
                id: MemberId { ty: id, index },
                name: member.name.clone(),
                ty: self.member_ty(&member.ty)?,
                nullable: member.nullable,
                accessor: if member.field {
                    Accessor::Field
                } else {
                    Accessor::Property {
                        setter: !member.readonly,
                        explicit_interface: member.explicit_interface,
                    }
                },
                order: member.order,
                attrs: member.attrs.clone(),
            });
        }

        Ok(DomainType {
            id,
            name: def.name.clone(),
            namespace: def.namespace.clone(),
            base,
            is_abstract: def.is_abstract,
            capabilities: def.capabilities.clone(),
            fields: def.fields.clone(),
            members,
            attrs: def.attrs.clone(),
        })
    }

    fn member_ty(&self, def: &MemberTyDef) -> Result<MemberTy> {
        Ok(match def {
            MemberTyDef::Primitive(primitive) => MemberTy::Primitive(*primitive),
            MemberTyDef::Enum { name, has_zero } => MemberTy::Enum {
                name: name.clone(),
                has_zero: *has_zero,
            },
            MemberTyDef::Type(name) => MemberTy::Type(self.resolve(name)?),
            MemberTyDef::Collection(name) => MemberTy::Collection(self.resolve(name)?),
            MemberTyDef::ReferenceTo(name) => MemberTy::ReferenceTo(self.resolve(name)?),
            MemberTyDef::BitwiseMask(name) => MemberTy::BitwiseMask(self.resolve(name)?),
        })
    }

    fn resolve(&self, name: &str) -> Result<TypeId> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| Error::unknown_type(name))
    }

    /// Base chains must terminate. Walking more steps than there are types
    /// means the chain loops.
    fn verify_acyclic(&self, def: &ModelDef) -> Result<()> {
        for ty in &def.types {
            let mut steps = 0;
            let mut base = ty.base.as_deref();
            while let Some(name) = base {
                steps += 1;
                if steps > def.types.len() {
                    bail!("type `{}` has a cyclic base hierarchy", ty.name);
                }
                let id = self.resolve(name)?;
                base = def.types[id.0].base.as_deref();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std_util::prelude::*;

    #[test]
    fn unknown_member_type_is_reported_by_name() {
        let def = ModelDef::new("shop")
            .ty(TypeDef::entity("Order").member(MemberDef::reference("Customer", "Customer")));

        let err = assert_err!(def.build());
        assert!(err.is_unknown_type());
        assert_err_mentions!(err, "Customer");
    }

    #[test]
    fn duplicate_type_names_are_rejected() {
        let def = ModelDef::new("shop")
            .ty(TypeDef::entity("Order"))
            .ty(TypeDef::entity("Order"));

        assert_err_mentions!(assert_err!(def.build()), "`Order`", "more than once");
    }

    #[test]
    fn cyclic_base_is_rejected() {
        let def = ModelDef::new("shop")
            .ty(TypeDef::entity("A").base("B"))
            .ty(TypeDef::entity("B").base("A"));

        assert_err_mentions!(assert_err!(def.build()), "cyclic");
    }

    #[test]
    fn types_are_found_by_simple_and_qualified_name() {
        let model = assert_ok!(ModelDef::new("shop")
            .ty(TypeDef::entity("Order").namespace("Shop.Sales"))
            .build());

        let by_simple = assert_some!(model.type_by_name("Order"));
        let by_qualified = assert_some!(model.type_by_name("Shop.Sales.Order"));
        assert_eq!(by_simple.id, by_qualified.id);
        assert_none!(model.type_by_name("Sales.Order"));
    }

    #[test]
    fn accessor_flags_are_carried_over() {
        let model = assert_ok!(ModelDef::new("shop")
            .ty(TypeDef::entity("Order")
                .member(MemberDef::primitive("Total", Primitive::Decimal).readonly())
                .member(MemberDef::primitive("cache", Primitive::String).plain_field()))
            .build());

        let order = assert_some!(model.type_by_name("Order"));
        let total = assert_some!(order.member_by_name("Total"));
        assert!(total.is_property());
        assert!(!total.has_setter());

        let cache = assert_some!(order.member_by_name("cache"));
        assert_eq!(cache.accessor, Accessor::Field);
    }

    #[test]
    fn deserializes_from_json() {
        let def: ModelDef = serde_json::from_str(
            r#"{
                "name": "shop",
                "types": [
                    {
                        "name": "Customer",
                        "capabilities": ["domain_entity"],
                        "foreign_key_alias": "cust",
                        "members": [
                            { "name": "Id", "ty": { "primitive": "i64" } },
                            { "name": "Name", "ty": { "primitive": "string" },
                              "property": { "length": 200 } }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let model = assert_ok!(def.build());
        let customer = assert_some!(model.type_by_name("Customer"));
        assert_eq!(customer.attrs.foreign_key_alias.as_deref(), Some("cust"));
        let name = assert_some!(customer.member_by_name("Name"));
        let property = assert_some!(name.attrs.property.as_ref());
        assert_eq!(property.length, Some(200));
    }
}
