use serde::{Deserialize, Serialize};

/// Explicit settings for a single-valued association.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssociationOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key_name: Option<String>,

    /// Suppress the foreign key constraint entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_foreign_key: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub association_type: Option<AssociationType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cascade: Option<Cascade>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lazy: Option<Lazy>,
}

/// Resolved settings for a many-to-one or one-to-one association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssociationMapping {
    pub member: String,
    pub target: String,
    pub association_type: AssociationType,
    pub column_name: String,
    pub foreign_key_name: String,
    pub no_foreign_key: bool,
    pub cascade: Cascade,
    pub nullable: bool,
    pub lazy: Lazy,
}

/// Resolved settings for a one-to-one association. The two sides share the
/// identifier, so there is no key column of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OneToOneMapping {
    pub member: String,
    pub target: String,
    pub foreign_key_name: String,
    pub cascade: Cascade,
    pub lazy: Lazy,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationType {
    #[default]
    ManyToOne,
    OneToOne,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cascade {
    None,
    Persist,
    Merge,
    Remove,
    DeleteOrphans,
    All,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lazy {
    /// Load through a proxy on first access
    Proxy,
    /// Load on first access without a proxy
    NoProxy,
    /// Load eagerly with the owner, through an outer join
    NoLazy,
}

impl AssociationOverride {
    /// Fills every unset field from `defaults`.
    pub fn merge(&self, defaults: AssociationMapping) -> AssociationMapping {
        AssociationMapping {
            member: defaults.member,
            target: defaults.target,
            association_type: self.association_type.unwrap_or(defaults.association_type),
            column_name: self.column_name.clone().unwrap_or(defaults.column_name),
            foreign_key_name: self
                .foreign_key_name
                .clone()
                .unwrap_or(defaults.foreign_key_name),
            no_foreign_key: self.no_foreign_key.unwrap_or(defaults.no_foreign_key),
            cascade: self.cascade.unwrap_or(defaults.cascade),
            nullable: self.nullable.unwrap_or(defaults.nullable),
            lazy: self.lazy.unwrap_or(defaults.lazy),
        }
    }
}

impl AssociationOverride {
    /// Fills the settings meaningful for a one-to-one association.
    pub fn merge_one_to_one(&self, defaults: OneToOneMapping) -> OneToOneMapping {
        OneToOneMapping {
            member: defaults.member,
            target: defaults.target,
            foreign_key_name: self
                .foreign_key_name
                .clone()
                .unwrap_or(defaults.foreign_key_name),
            cascade: self.cascade.unwrap_or(defaults.cascade),
            lazy: self.lazy.unwrap_or(defaults.lazy),
        }
    }
}

impl AssociationMapping {
    /// The foreign key constraint name, or `None` when the constraint is
    /// suppressed.
    pub fn foreign_key(&self) -> Option<&str> {
        (!self.no_foreign_key).then_some(self.foreign_key_name.as_str())
    }

    /// Eager associations are fetched with an outer join.
    pub fn is_fetch_join(&self) -> bool {
        self.lazy == Lazy::NoLazy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> AssociationMapping {
        AssociationMapping {
            member: "Customer".into(),
            target: "Customer".into(),
            association_type: AssociationType::ManyToOne,
            column_name: "customer_id".into(),
            foreign_key_name: "FK_order_customer".into(),
            no_foreign_key: false,
            cascade: Cascade::Persist,
            nullable: false,
            lazy: Lazy::Proxy,
        }
    }

    #[test]
    fn empty_override_yields_defaults() {
        assert_eq!(AssociationOverride::default().merge(defaults()), defaults());
    }

    #[test]
    fn explicit_fields_win() {
        let explicit = AssociationOverride {
            column_name: Some("buyer_id".into()),
            lazy: Some(Lazy::NoLazy),
            no_foreign_key: Some(true),
            ..Default::default()
        };

        let merged = explicit.merge(defaults());
        assert_eq!(merged.column_name, "buyer_id");
        assert_eq!(merged.foreign_key_name, "FK_order_customer");
        assert_eq!(merged.foreign_key(), None);
        assert!(merged.is_fetch_join());
        assert_eq!(merged.cascade, Cascade::Persist);
    }
}
