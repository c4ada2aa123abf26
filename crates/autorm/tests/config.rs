use autorm::mapping::{Access, CacheUsage, Cascade, ColumnType, Generated, VersionType};
use autorm::ModelConfig;
use std_util::prelude::*;

fn fixture() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop.json")
}

#[test]
fn compiles_model_document() {
    let config = assert_ok!(ModelConfig::from_path(fixture()));
    assert_eq!(config.name(), "shop");

    let compiled = assert_ok!(config.compile());
    assert_eq!(
        compiled.entities.keys().collect::<Vec<_>>(),
        ["Country", "CustomerEntity", "Order", "OrderLine"]
    );

    let country = assert_some!(assert_some!(compiled.entity("Country")).class());
    assert!(!country.is_mutable);
    assert_none!(&country.version);

    let customer = assert_some!(compiled.entity("CustomerEntity"));
    let class = assert_some!(customer.class());
    assert_eq!(class.table_name, "customer");
    assert_eq!(class.schema_name.as_deref(), Some("shop"));
    assert_eq!(class.filters.len(), 1);

    let version = assert_some!(class.version.as_ref());
    assert_eq!(version.ty, VersionType::Int32);
    assert_eq!(version.generated, Generated::Never);

    assert_eq!(assert_some!(customer.property("Name")).mapping.length, Some(200));
    assert_eq!(
        assert_some!(customer.component("Address")).prefix,
        "address_"
    );

    let country = assert_some!(customer.many_to_one("Country"));
    assert_eq!(country.column_name, "country_id");
    assert_eq!(country.cascade, Cascade::None);

    let orders = assert_some!(customer.collection("Orders"));
    assert_eq!(orders.column_name, "customer_entity_id");
    assert_eq!(orders.foreign_key_name, "FK_orders_customer");

    let order = assert_some!(compiled.entity("Order"));
    let class = assert_some!(order.class());
    assert_eq!(class.table_name, "orders");
    assert_eq!(assert_some!(class.cache.as_ref()).usage, CacheUsage::ReadWrite);
    assert_eq!(
        assert_some!(order.property("Total")).mapping.column_type,
        ColumnType::Custom("Money".into())
    );

    let lines = assert_some!(order.collection("Lines"));
    assert_eq!(lines.column_name, "order_id");
    assert_eq!(lines.foreign_key_name, "FK_order_line_orders");
    assert_eq!(
        resolve_access(&config, "CustomerEntity", "Orders"),
        Access::Field("_orders".into())
    );
}

fn resolve_access(config: &ModelConfig, ty: &str, member: &str) -> Access {
    let model = assert_ok!(config.build());
    let registry = config.registry();
    let resolver = autorm::Resolver::new(&model, &registry);

    let ty = assert_some!(model.type_by_name(ty));
    let member = assert_some!(ty.member_by_name(member));
    resolver.access(autorm::inspect::EntityMember::new(ty.id, member))
}

#[test]
fn registry_knows_document_extensions() {
    let config = assert_ok!(ModelConfig::from_path(fixture()));
    let registry = config.registry();

    assert!(registry.has_id_generator("snowflake"));
    assert_some!(registry.filter("soft_delete"));
}

#[test]
fn unknown_type_is_rejected() {
    let config = assert_ok!(ModelConfig::from_json(
        r#"{
            "model": {
                "name": "shop",
                "types": [
                    {
                        "name": "Order",
                        "capabilities": ["domain_entity"],
                        "members": [
                            { "name": "Id", "ty": { "primitive": "i64" } },
                            { "name": "Customer", "ty": { "type": "Customer" } }
                        ]
                    }
                ]
            }
        }"#
    ));

    let err = assert_err!(config.build());
    assert!(err.is_unknown_type());
    assert_err_mentions!(err, "Customer");
}

#[test]
fn unknown_fields_are_rejected() {
    let err = assert_err!(ModelConfig::from_json(
        r#"{ "model": { "name": "shop", "types": [] }, "generators": [] }"#
    ));
    assert_err_mentions!(err, "generators");
}

#[test]
fn missing_file_names_the_path() {
    let err = assert_err!(ModelConfig::from_path("does/not/exist.json"));
    assert_err_mentions!(err, "does/not/exist.json");
}
