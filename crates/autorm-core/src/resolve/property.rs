use super::{key, Resolver};
use crate::domain::{MemberTy, Primitive};
use crate::inspect::EntityMember;
use crate::mapping::{Column, ColumnType, PropertyMapping};
use crate::naming;
use crate::Result;

/// Length given to string columns unless overridden.
pub const DEFAULT_STRING_LENGTH: u32 = 100;

impl Resolver<'_> {
    /// Column settings of a property member.
    pub fn property_mapping(&mut self, member: EntityMember<'_>) -> Result<PropertyMapping> {
        if let Some(mapping) = self.properties.get(&key(member)) {
            return Ok(mapping.clone());
        }

        let defaults = self.default_property(member);
        let mapping = match &member.member.attrs.property {
            Some(explicit) => {
                let mut mapping = explicit.merge(defaults);
                if let Some(name) = &explicit.column_type {
                    let ty = self.registry.column_type_for(name, member.member)?;
                    mapping.column_type = ColumnType::Custom(ty.name.clone());
                }
                mapping
            }
            None => defaults,
        };

        self.properties.insert(key(member), mapping.clone());
        Ok(mapping)
    }

    /// The physical columns of a property member. Most properties map to a
    /// single column; entity references map to an id and a name column.
    pub fn property_columns(&mut self, member: EntityMember<'_>) -> Result<Vec<Column>> {
        let mapping = self.property_mapping(member)?;

        match (&member.member.ty, &mapping.column_type) {
            (MemberTy::ReferenceTo(target), ColumnType::ReferenceTo) => {
                let table = naming::table_name(self.model, *target);
                Ok(vec![
                    Column {
                        name: format!("{table}_id"),
                        ty: ColumnType::Int64,
                        nullable: false,
                        unique: false,
                        length: None,
                        default: None,
                    },
                    Column {
                        name: format!("{table}_name"),
                        ty: ColumnType::AnsiString,
                        nullable: true,
                        unique: false,
                        length: Some(DEFAULT_STRING_LENGTH),
                        default: None,
                    },
                ])
            }
            _ => Ok(vec![mapping.column()]),
        }
    }

    fn default_property(&self, member: EntityMember<'_>) -> PropertyMapping {
        let m = member.member;
        let column_name = naming::to_schema_name(&m.name);

        let (column_type, length) = match &m.ty {
            MemberTy::Primitive(Primitive::String) => {
                (ColumnType::AnsiString, Some(DEFAULT_STRING_LENGTH))
            }
            MemberTy::Primitive(primitive) => (column_type(*primitive), None),
            MemberTy::Enum { .. } => (ColumnType::Int32, None),
            MemberTy::ReferenceTo(_) => (ColumnType::ReferenceTo, None),
            MemberTy::BitwiseMask(_) => (ColumnType::BitwiseMask, None),
            MemberTy::Type(target) | MemberTy::Collection(target) => {
                (ColumnType::Custom(self.model.ty(*target).name.clone()), None)
            }
        };

        let component_column_prefix = match &m.ty {
            MemberTy::Type(target) if self.inspector.is_component(*target) => {
                Some(format!("{column_name}_"))
            }
            _ => None,
        };

        PropertyMapping {
            member: m.name.clone(),
            access: self.access(member),
            column_name,
            column_type,
            nullable: m.is_nullable_type(),
            unique: false,
            default: None,
            length,
            ignore_on_update: false,
            component_column_prefix,
        }
    }
}

fn column_type(primitive: Primitive) -> ColumnType {
    match primitive {
        Primitive::String => ColumnType::AnsiString,
        Primitive::Bool => ColumnType::Boolean,
        Primitive::I16 => ColumnType::Int16,
        Primitive::I32 => ColumnType::Int32,
        Primitive::I64 => ColumnType::Int64,
        Primitive::F32 => ColumnType::Single,
        Primitive::F64 => ColumnType::Double,
        Primitive::Decimal => ColumnType::Decimal,
        Primitive::DateTime => ColumnType::DateTime,
        Primitive::DateTimeOffset => ColumnType::DateTimeOffset,
        Primitive::Guid => ColumnType::Guid,
        Primitive::Bytes => ColumnType::Binary,
    }
}
