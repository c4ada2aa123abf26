use autorm_core::domain::{Capability, MemberDef, MemberTyDef, ModelDef, Primitive, TypeDef};
use autorm_core::inspect::TRACKED_MEMBERS;
use autorm_core::mapping::{Access, Column, ColumnType, PropertyOverride};
use autorm_core::{compile, Registry, UserType};
use pretty_assertions::assert_eq;
use std_util::prelude::*;

fn id() -> MemberDef {
    MemberDef::primitive("Id", Primitive::I64)
}

fn column(name: &str, ty: ColumnType, nullable: bool, length: Option<u32>) -> Column {
    Column {
        name: name.into(),
        ty,
        nullable,
        unique: false,
        length,
        default: None,
    }
}

#[test]
fn primitive_defaults() {
    let model = assert_ok!(ModelDef::new("sales")
        .ty(TypeDef::entity("Customer")
            .member(id())
            .member(MemberDef::primitive("FirstName", Primitive::String))
            .member(MemberDef::primitive("BirthDate", Primitive::DateTime).nullable())
            .member(MemberDef::primitive("Balance", Primitive::Decimal))
            .member(MemberDef::primitive("LastSeen", Primitive::DateTimeOffset))
            .member(MemberDef::new(
                "Tier",
                MemberTyDef::Enum {
                    name: "Tier".into(),
                    has_zero: false,
                },
            )))
        .build());
    let registry = Registry::new();

    let compiled = assert_ok!(compile(&model, &registry));
    let customer = assert_some!(compiled.entity("Customer"));

    let columns: Vec<_> = customer
        .properties
        .iter()
        .flat_map(|property| property.columns.clone())
        .collect();

    assert_eq!(
        columns,
        vec![
            column("first_name", ColumnType::AnsiString, true, Some(100)),
            column("birth_date", ColumnType::DateTime, true, None),
            column("balance", ColumnType::Decimal, false, None),
            column("last_seen", ColumnType::DateTimeOffset, false, None),
            column("tier", ColumnType::Int32, false, None),
        ]
    );
}

#[test]
fn explicit_order_comes_first() {
    let model = assert_ok!(ModelDef::new("sales")
        .ty(TypeDef::entity("Customer")
            .member(id())
            .member(MemberDef::primitive("Notes", Primitive::String))
            .member(MemberDef::primitive("Email", Primitive::String).order(2))
            .member(MemberDef::primitive("Name", Primitive::String).order(1)))
        .build());
    let registry = Registry::new();

    let compiled = assert_ok!(compile(&model, &registry));
    let names: Vec<_> = assert_some!(compiled.entity("Customer"))
        .properties
        .iter()
        .map(|property| property.mapping.member.as_str())
        .collect();
    assert_eq!(names, ["Name", "Email", "Notes"]);
}

#[test]
fn property_override() {
    let model = assert_ok!(ModelDef::new("sales")
        .ty(TypeDef::entity("Customer")
            .member(id())
            .member(MemberDef::primitive("Email", Primitive::String).attrs(|attrs| {
                attrs.property = Some(PropertyOverride {
                    column_name: Some("email_address".into()),
                    nullable: Some(false),
                    unique: Some(true),
                    length: Some(320),
                    ignore_on_update: Some(true),
                    ..Default::default()
                })
            })))
        .build());
    let registry = Registry::new();

    let compiled = assert_ok!(compile(&model, &registry));
    let email = assert_some!(assert_some!(compiled.entity("Customer")).property("Email"));
    assert!(email.mapping.ignore_on_update);
    assert_eq!(
        email.columns,
        [Column {
            name: "email_address".into(),
            ty: ColumnType::AnsiString,
            nullable: false,
            unique: true,
            length: Some(320),
            default: None,
        }]
    );
}

#[test]
fn custom_column_type_must_be_registered() {
    let model = assert_ok!(ModelDef::new("sales")
        .ty(TypeDef::entity("Order")
            .member(id())
            .member(MemberDef::primitive("Total", Primitive::Decimal).attrs(|attrs| {
                attrs.property = Some(PropertyOverride {
                    column_type: Some("Money".into()),
                    ..Default::default()
                })
            })))
        .build());

    let err = assert_err!(compile(&model, &Registry::new()));
    assert!(err.is_invalid_override());
    assert_err_mentions!(err, "Money");

    let mut registry = Registry::new();
    registry.register_column_type(UserType::new("Money").accepting(Primitive::String));
    let err = assert_err!(compile(&model, &registry));
    assert!(err.is_invalid_override());

    registry.register_column_type(UserType::new("Money").accepting(Primitive::Decimal));
    let compiled = assert_ok!(compile(&model, &registry));
    let total = assert_some!(assert_some!(compiled.entity("Order")).property("Total"));
    assert_eq!(total.mapping.column_type, ColumnType::Custom("Money".into()));
}

#[test]
fn reference_to_maps_id_and_name_columns() {
    let model = assert_ok!(ModelDef::new("sales")
        .ty(TypeDef::new("OrderStatus")
            .capability(Capability::ReferenceEntity)
            .member(id()))
        .ty(TypeDef::entity("Order")
            .member(id())
            .member(MemberDef::new("Status", MemberTyDef::ReferenceTo("OrderStatus".into())))
            .member(MemberDef::new("Flags", MemberTyDef::BitwiseMask("OrderStatus".into()))))
        .build());
    let registry = Registry::new();

    let compiled = assert_ok!(compile(&model, &registry));
    let order = assert_some!(compiled.entity("Order"));

    assert_eq!(
        assert_some!(order.property("Status")).columns,
        [
            column("order_status_id", ColumnType::Int64, false, None),
            column("order_status_name", ColumnType::AnsiString, true, Some(100)),
        ]
    );
    assert_eq!(
        assert_some!(order.property("Flags")).columns,
        [column("flags", ColumnType::BitwiseMask, true, None)]
    );
}

#[test]
fn components_are_flattened_with_prefix() {
    let model = assert_ok!(ModelDef::new("sales")
        .ty(TypeDef::new("Address")
            .member(MemberDef::primitive("Street", Primitive::String))
            .member(MemberDef::primitive("City", Primitive::String)))
        .ty(TypeDef::new("Location")
            .member(MemberDef::reference("Address", "Address"))
            .member(MemberDef::primitive("Floor", Primitive::I32)))
        .ty(TypeDef::entity("Customer")
            .member(id())
            .member(MemberDef::reference("HomeAddress", "Address"))
            .member(MemberDef::reference("WorkAddress", "Address").attrs(|attrs| {
                attrs.property = Some(PropertyOverride {
                    component_column_prefix: Some("work_".into()),
                    ..Default::default()
                })
            }))
            .member(MemberDef::reference("Office", "Location")))
        .build());
    let registry = Registry::new();

    let compiled = assert_ok!(compile(&model, &registry));
    let customer = assert_some!(compiled.entity("Customer"));
    assert!(customer.properties.is_empty());

    let columns = |component: &autorm_core::compile::ComponentMapping| -> Vec<String> {
        component
            .properties
            .iter()
            .flat_map(|property| property.columns.iter().map(|column| column.name.clone()))
            .collect()
    };

    let home = assert_some!(customer.component("HomeAddress"));
    assert_eq!(home.component, "Address");
    assert_eq!(home.prefix, "home_address_");
    assert_eq!(columns(home), ["home_address_street", "home_address_city"]);

    let work = assert_some!(customer.component("WorkAddress"));
    assert_eq!(columns(work), ["work_street", "work_city"]);

    let office = assert_some!(customer.component("Office"));
    assert_eq!(columns(office), ["office_floor"]);
    assert_eq!(office.components.len(), 1);
    assert_eq!(
        columns(&office.components[0]),
        ["office_address_street", "office_address_city"]
    );
}

#[test]
fn self_embedding_component_is_rejected() {
    let model = assert_ok!(ModelDef::new("org")
        .ty(TypeDef::new("Node").member(MemberDef::reference("Parent", "Node")))
        .ty(TypeDef::entity("Tree").member(id()).member(MemberDef::reference("Root", "Node")))
        .build());
    let registry = Registry::new();

    let err = assert_err!(compile(&model, &registry));
    assert!(err.is_unsupported_member_shape());
    assert_err_mentions!(err, "Parent");
}

#[test]
fn treat_as_property_maps_a_class_to_one_column() {
    let model = assert_ok!(ModelDef::new("sales")
        .ty(TypeDef::new("Money")
            .attrs(|attrs| attrs.treat_as_property = true)
            .member(MemberDef::primitive("Amount", Primitive::Decimal)))
        .ty(TypeDef::entity("Order")
            .member(id())
            .member(MemberDef::reference("Total", "Money")))
        .build());
    let registry = Registry::new();

    let compiled = assert_ok!(compile(&model, &registry));
    let order = assert_some!(compiled.entity("Order"));
    assert!(order.components.is_empty());
    assert_eq!(
        assert_some!(order.property("Total")).columns,
        [column("total", ColumnType::Custom("Money".into()), true, None)]
    );
}

#[test]
fn field_treated_as_property_is_rejected() {
    let model = assert_ok!(ModelDef::new("sales")
        .ty(TypeDef::entity("Order")
            .member(id())
            .member(MemberDef::primitive("total", Primitive::Decimal)
                .plain_field()
                .attrs(|attrs| attrs.treat_as_property = true)))
        .build());
    let registry = Registry::new();

    let err = assert_err!(compile(&model, &registry));
    assert!(err.is_unsupported_member_shape());
    assert_err_mentions!(err, "Order.total", "property accessor");
}

#[test]
fn unwritable_members_are_skipped() {
    let model = assert_ok!(ModelDef::new("sales")
        .ty(TypeDef::entity("Order")
            .member(id())
            .field("_total")
            .member(MemberDef::primitive("Total", Primitive::Decimal).readonly())
            .member(MemberDef::primitive("Summary", Primitive::String).readonly())
            .member(MemberDef::primitive("Secret", Primitive::String).attrs(|attrs| attrs.ignore = true))
            .member({
                let mut member = MemberDef::primitive("Code", Primitive::String);
                member.explicit_interface = true;
                member
            }))
        .build());
    let registry = Registry::new();

    let compiled = assert_ok!(compile(&model, &registry));
    let order = assert_some!(compiled.entity("Order"));

    let total = assert_some!(order.property("Total"));
    assert_eq!(total.mapping.access, Access::NoSetter("_total".into()));

    assert_none!(order.property("Summary"));
    assert_none!(order.property("Secret"));
    assert_none!(order.property("Code"));
}

fn tracked_entity() -> TypeDef {
    let mut entity = TypeDef::entity("Order")
        .capability(Capability::Tracked)
        .member(id())
        .member(MemberDef::primitive("Number", Primitive::String));

    for name in TRACKED_MEMBERS.iter().rev() {
        entity = entity.member(MemberDef::primitive(*name, Primitive::String));
    }
    entity
}

#[test]
fn tracked_members_come_first() {
    let model = assert_ok!(ModelDef::new("sales").ty(tracked_entity()).build());
    let registry = Registry::new();

    let compiled = assert_ok!(compile(&model, &registry));
    let names: Vec<_> = assert_some!(compiled.entity("Order"))
        .properties
        .iter()
        .map(|property| property.mapping.member.as_str())
        .collect();

    assert_eq!(
        names,
        [
            "IsActive",
            "RowCreated",
            "RowCreatedUser",
            "RowUpdated",
            "RowUpdatedUser",
            "Version",
            "Number",
        ]
    );
}

#[test]
fn tracked_template_members_come_first() {
    let model = assert_ok!(ModelDef::new("sales")
        .tracked_template("Tracked")
        .ty(TypeDef::new("Tracked")
            .is_abstract()
            .member(MemberDef::primitive("Deleted", Primitive::Bool))
            .member(MemberDef::primitive("ChangedBy", Primitive::String)))
        .ty(TypeDef::entity("Order")
            .capability(Capability::Tracked)
            .member(id())
            .member(MemberDef::primitive("Number", Primitive::String))
            .member(MemberDef::primitive("ChangedBy", Primitive::String))
            .member(MemberDef::primitive("Deleted", Primitive::Bool)))
        .build());
    let registry = Registry::new();

    let compiled = assert_ok!(compile(&model, &registry));
    let names: Vec<_> = assert_some!(compiled.entity("Order"))
        .properties
        .iter()
        .map(|property| property.mapping.member.as_str())
        .collect();
    assert_eq!(names, ["Deleted", "ChangedBy", "Number"]);
}

#[test]
fn tracked_entity_must_declare_tracked_members() {
    let model = assert_ok!(ModelDef::new("sales")
        .ty(TypeDef::entity("Order")
            .capability(Capability::Tracked)
            .member(id()))
        .build());
    let registry = Registry::new();

    let err = assert_err!(compile(&model, &registry));
    assert!(err.is_unsupported_member_shape());
    assert_err_mentions!(err, "Order.IsActive", "tracked");
}
