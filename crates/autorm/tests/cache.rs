use autorm::domain::{MemberDef, ModelDef, Primitive, TypeDef};
use autorm::{MappingCache, ModelConfig, Registry};
use std::sync::Arc;
use std_util::prelude::*;

fn config(name: &str, entity: &str) -> ModelConfig {
    ModelConfig::new(
        ModelDef::new(name).ty(TypeDef::entity(entity).member(MemberDef::primitive("Id", Primitive::I64))),
    )
}

fn broken(name: &str) -> ModelConfig {
    ModelConfig::new(ModelDef::new(name).ty(TypeDef::entity("Orphan")))
}

#[test]
fn load_and_get() {
    let cache = MappingCache::new();
    assert!(cache.is_empty());

    assert_ok!(cache.load([&config("sales", "Order"), &config("hr", "Employee")]));
    assert_eq!(cache.names(), ["sales", "hr"]);

    let sales = assert_ok!(cache.get("sales"));
    assert_some!(sales.entity("Order"));

    // Readers share the compiled model
    assert!(Arc::ptr_eq(&sales, &assert_some!(cache.try_get("sales"))));

    let err = assert_err!(cache.get("billing"));
    assert_err_mentions!(err, "billing");
    assert_none!(cache.try_get("billing"));
}

#[test]
fn load_replaces_models_of_the_same_name() {
    let cache = MappingCache::new();
    assert_ok!(cache.load([&config("sales", "Order")]));
    assert_ok!(cache.load([&config("sales", "Invoice")]));

    assert_eq!(cache.len(), 1);
    let sales = assert_ok!(cache.get("sales"));
    assert_none!(sales.entity("Order"));
    assert_some!(sales.entity("Invoice"));
}

#[test]
fn failed_load_stores_nothing() {
    let cache = MappingCache::new();

    let err = assert_err!(cache.load([&config("sales", "Order"), &broken("hr")]));
    assert!(err.is_missing_identifier());
    assert_err_mentions!(err, "hr", "Orphan");
    assert!(cache.is_empty());
}

#[test]
fn add_rejects_duplicates() {
    let cache = MappingCache::new();
    let registry = Registry::new();

    let added = assert_ok!(cache.add(&config("sales", "Order"), &registry));
    assert_eq!(added.name, "sales");

    let err = assert_err!(cache.add(&config("sales", "Invoice"), &registry));
    assert_err_mentions!(err, "sales", "already registered");
    assert_some!(assert_ok!(cache.get("sales")).entity("Order"));
}

#[test]
fn reload_drops_previous_models() {
    let cache = MappingCache::new();
    assert_ok!(cache.load([&config("sales", "Order"), &config("hr", "Employee")]));

    assert_ok!(cache.reload([&config("billing", "Invoice")]));
    assert_eq!(cache.names(), ["billing"]);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn global_cache_is_shared() {
    let first = MappingCache::global();
    let second = MappingCache::global();
    assert!(std::ptr::eq(first, second));
}
