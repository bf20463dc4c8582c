//! SQL to Prisma scalar type mapping.

use super::naming::to_pascal_case;
use crate::ir::{Column, Enum};

/// Prisma scalar types this generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Int,
    String,
    Boolean,
    DateTime,
    Float,
    Json,
}

impl Scalar {
    pub fn as_str(self) -> &'static str {
        match self {
            Scalar::Int => "Int",
            Scalar::String => "String",
            Scalar::Boolean => "Boolean",
            Scalar::DateTime => "DateTime",
            Scalar::Float => "Float",
            Scalar::Json => "Json",
        }
    }
}

/// Resolved field type of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Scalar(Scalar),
    Enum(String),
}

impl FieldType {
    pub fn name(&self) -> &str {
        match self {
            FieldType::Scalar(s) => s.as_str(),
            FieldType::Enum(name) => name,
        }
    }
}

/// Uppercased SQL type without an array suffix.
pub fn base_type(column: &Column) -> String {
    column
        .typ
        .trim_end_matches("[]")
        .to_uppercase()
}

pub fn is_array(column: &Column) -> bool {
    column.typ.ends_with("[]")
}

/// Map a column to its Prisma type. A known enum wins over every SQL rule;
/// anything unrecognized becomes `String`.
pub fn map_type(column: &Column, enums: &[Enum]) -> FieldType {
    let derived = to_pascal_case(column.typ.trim_end_matches("[]"));
    if let Some(e) = enums.iter().find(|e| to_pascal_case(&e.name) == derived) {
        return FieldType::Enum(to_pascal_case(&e.name));
    }
    FieldType::Scalar(map_sql_type(&base_type(column)))
}

pub fn map_sql_type(upper: &str) -> Scalar {
    match upper {
        "SERIAL" | "BIGSERIAL" | "SMALLSERIAL" | "INTEGER" | "INT" | "INT2" | "INT4" | "INT8"
        | "BIGINT" | "SMALLINT" => Scalar::Int,
        "VARCHAR" | "TEXT" | "CHAR" | "CHARACTER" | "CITEXT" => Scalar::String,
        "BOOLEAN" | "BOOL" => Scalar::Boolean,
        "TIMESTAMP" | "TIMESTAMPTZ" | "DATE" | "TIME" | "TIMETZ" => Scalar::DateTime,
        "DECIMAL" | "NUMERIC" | "FLOAT" | "FLOAT4" | "FLOAT8" | "DOUBLE" | "REAL" => {
            Scalar::Float
        }
        "UUID" => Scalar::String,
        "JSON" | "JSONB" => Scalar::Json,
        _ => Scalar::String,
    }
}

/// `SERIAL` and `BIGSERIAL` columns are auto-incremented.
pub fn is_serial(column: &Column) -> bool {
    matches!(base_type(column).as_str(), "SERIAL" | "BIGSERIAL" | "SMALLSERIAL")
}

pub fn is_uuid(column: &Column) -> bool {
    base_type(column) == "UUID"
}

pub fn is_timestamp(column: &Column) -> bool {
    matches!(
        base_type(column).as_str(),
        "TIMESTAMP" | "TIMESTAMPTZ" | "DATE" | "TIME" | "TIMETZ"
    )
}

/// `@db.*` attribute pinning the storage type, when one applies.
pub fn native_type_attribute(column: &Column) -> Option<&'static str> {
    match base_type(column).as_str() {
        "UUID" => Some("@db.Uuid"),
        "JSON" => Some("@db.Json"),
        "JSONB" => Some("@db.JsonB"),
        _ => None,
    }
}
