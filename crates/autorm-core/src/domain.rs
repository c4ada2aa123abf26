//! Reflected description of a domain model: types, their members and the
//! declarative overrides attached to both.

mod def;
pub use def::{MemberDef, MemberTyDef, ModelDef, TypeDef};

mod member;
pub use member::{Accessor, Member, MemberAttrs, MemberId, MemberTy, Primitive};

mod model;
pub use model::DomainModel;

mod ty;
pub use ty::{Capability, DomainType, TypeAttrs, TypeId};
