//! Convention-based mapping configuration for domain models.
//!
//! Given a [`DomainModel`](domain::DomainModel), [`compile`] derives the
//! complete ORM mapping of every entity: table and column names, keys,
//! associations, collections, versions and filters. Conventions apply
//! wherever the model declares nothing explicitly.

mod error;
pub use error::Error;

pub mod compile;
pub use compile::{compile, CompiledModel, EntityMapping};

pub mod domain;
pub use domain::DomainModel;

pub mod filter;
pub use filter::Filter;

pub mod inspect;
pub use inspect::Inspector;

pub mod mapping;

pub mod naming;

mod registry;
pub use registry::{Registry, UserType};

pub mod resolve;
pub use resolve::Resolver;

/// A Result type alias that uses autorm's [`Error`] type.
pub type Result<T, E = Error> = core::result::Result<T, E>;
