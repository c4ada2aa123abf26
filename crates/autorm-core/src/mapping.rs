//! Mapping descriptors.
//!
//! Every concern comes in two shapes: an *override* with every field
//! optional, filled from user declarations, and a *mapping* with every field
//! set. `merge` fills the unset fields of an override from the conventional
//! defaults; an explicit value always wins.

mod association;
pub use association::{
    AssociationMapping, AssociationOverride, AssociationType, Cascade, Lazy, OneToOneMapping,
};

mod class;
pub use class::{
    CacheMapping, CacheUsage, ClassMapping, ClassOverride, Discriminator, DiscriminatorType,
    IdentifierMapping, IdentifierOverride, IdentifierStrategy, InheritanceRoot,
    InheritanceScheme, SchemaAction,
};

mod collection;
pub use collection::{
    CollectionAssociation, CollectionMapping, CollectionOverride, CollectionType, FetchMode,
};

mod property;
pub use property::{Access, Column, ColumnType, PropertyMapping, PropertyOverride};

mod subclass;
pub use subclass::{SubClassMapping, SubClassOverride};

mod version;
pub use version::{ConcurrencyLock, Generated, VersionMapping, VersionType};
