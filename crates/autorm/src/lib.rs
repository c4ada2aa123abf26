//! Convention-based ORM mapping configuration.
//!
//! Describe a domain model in a [`ModelConfig`] document, compile it once at
//! startup and share the result through a [`MappingCache`].
//!
//! ```
//! use autorm::ModelConfig;
//!
//! let config = ModelConfig::from_json(r#"{
//!     "model": {
//!         "name": "shop",
//!         "types": [
//!             {
//!                 "name": "Customer",
//!                 "capabilities": ["domain_entity"],
//!                 "members": [
//!                     { "name": "Id", "ty": { "primitive": "i64" } },
//!                     { "name": "FirstName", "ty": { "primitive": "string" } }
//!                 ]
//!             }
//!         ]
//!     }
//! }"#).unwrap();
//!
//! let compiled = config.compile().unwrap();
//! let customer = compiled.entity("Customer").unwrap();
//! assert_eq!(customer.class().unwrap().table_name, "customer");
//! assert_eq!(customer.property("FirstName").unwrap().columns[0].name, "first_name");
//! ```

pub mod cache;
pub use cache::MappingCache;

mod config;
pub use config::ModelConfig;

pub use autorm_core::{
    bail, compile, domain, err, filter, inspect, mapping, naming, resolve, CompiledModel,
    DomainModel, EntityMapping, Error, Filter, Inspector, Registry, Resolver, Result, UserType,
};
