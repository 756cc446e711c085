//! Tenant configuration entity model
//!
//! A tenant is a named profile selecting a metadata report and the way lookup
//! values are represented to clients of that tenant.

use std::fmt;
use std::str::FromStr;

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tenant configuration row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenant_configs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip)]
    pub id: i32,

    /// Tenant identifier; unique once the seeder has created its index
    pub tenant_id: String,

    /// Metadata report file backing this tenant
    pub metadata_file_path: String,

    pub lookup_type: LookupType,

    pub friendly_name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// How lookup values are exposed for a tenant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum LookupType {
    /// Lookup values are plain strings.
    #[sea_orm(string_value = "STRING")]
    #[serde(rename = "STRING")]
    StringValues,

    /// Lookup values are members of an enumeration, multi-valued fields are collections.
    #[sea_orm(string_value = "ENUM_COLLECTION")]
    #[serde(rename = "ENUM_COLLECTION")]
    EnumCollection,

    /// Lookup values are members of a flags enumeration.
    #[sea_orm(string_value = "ENUM_FLAGS")]
    #[serde(rename = "ENUM_FLAGS")]
    EnumFlags,
}

impl LookupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupType::StringValues => "STRING",
            LookupType::EnumCollection => "ENUM_COLLECTION",
            LookupType::EnumFlags => "ENUM_FLAGS",
        }
    }
}

impl fmt::Display for LookupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized lookup type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lookup type '{0}'")]
pub struct UnknownLookupType(pub String);

impl FromStr for LookupType {
    type Err = UnknownLookupType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STRING" => Ok(LookupType::StringValues),
            "ENUM_COLLECTION" => Ok(LookupType::EnumCollection),
            "ENUM_FLAGS" => Ok(LookupType::EnumFlags),
            _ => Err(UnknownLookupType(s.to_string())),
        }
    }
}
