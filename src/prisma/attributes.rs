//! Per-column field attributes.
//!
//! Attributes are emitted in a fixed order: `@id`, `@unique`, `@default`,
//! `@updatedAt`, `@map`, then the `@db.*` native type.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{is_serial, is_timestamp, is_uuid, native_type_attribute};
use crate::ir::{Column, Enum};

static UUID_FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:gen_random_uuid|uuid_generate_v\d\w*)\s*\(").unwrap()
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").unwrap());

static JSON_CAST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)::\s*jsonb?\b").unwrap());

static TRAILING_CAST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s*::\s*[\w."]+(?:\s*\[\s*\])?\s*$"#).unwrap());

/// Column facts the attribute rules depend on, resolved by the generator.
pub struct ColumnContext<'a> {
    pub column: &'a Column,
    pub field_name: &'a str,
    pub is_id: bool,
    pub is_unique: bool,
    /// Enum definition when the column is enum-typed.
    pub enum_def: Option<&'a Enum>,
}

pub fn field_attributes(ctx: &ColumnContext<'_>) -> Vec<String> {
    let column = ctx.column;
    let mut attrs = Vec::new();

    if ctx.is_id {
        attrs.push("@id".to_string());
        if is_serial(column) {
            attrs.push("@default(autoincrement())".to_string());
        } else if is_uuid(column)
            && column
                .default_value
                .as_deref()
                .is_some_and(|d| UUID_FUNCTION_RE.is_match(d))
        {
            attrs.push("@default(uuid())".to_string());
        }
    }

    if ctx.is_unique && !ctx.is_id {
        attrs.push("@unique".to_string());
    }

    if !ctx.is_id {
        if let Some(default) = &column.default_value {
            if let Some(value) = default_value(default, ctx.enum_def) {
                attrs.push(format!("@default({value})"));
            }
        } else if is_serial(column) {
            attrs.push("@default(autoincrement())".to_string());
        }
    }

    if is_timestamp(column) && column.name.to_lowercase().contains("updated") {
        attrs.push("@updatedAt".to_string());
    }

    if ctx.field_name != column.name {
        attrs.push(format!("@map({})", quote(&column.name)));
    }

    if let Some(native) = native_type_attribute(column) {
        attrs.push(native.to_string());
    }

    attrs
}

/// Body of a `@default(...)` attribute for a raw SQL default expression.
/// `None` when the default should not be carried over.
pub fn default_value(raw: &str, enum_def: Option<&Enum>) -> Option<String> {
    let expr = raw.trim();
    let upper = expr.to_uppercase();

    if matches!(upper.as_str(), "CURRENT_TIMESTAMP" | "NOW()" | "(NOW())") {
        return Some("now()".to_string());
    }
    if UUID_FUNCTION_RE.is_match(expr) {
        return Some(format!("dbgenerated({})", quote(expr)));
    }
    if upper == "NULL" {
        return None;
    }
    if upper == "TRUE" || upper == "FALSE" {
        return Some(upper.to_lowercase());
    }
    if NUMBER_RE.is_match(expr) {
        return Some(expr.to_string());
    }
    if upper.contains("NOW()") || upper.contains("CURRENT_TIMESTAMP") {
        return Some("now()".to_string());
    }
    if JSON_CAST_RE.is_match(expr) {
        return Some(format!("dbgenerated({})", quote(strip_outer_parens(expr))));
    }

    let literal = string_literal(expr);
    if let Some(e) = enum_def {
        if e.values.iter().any(|v| *v == literal) {
            return Some(literal);
        }
    }
    Some(quote(&literal))
}

/// `'it''s'::text` -> `it's`
fn string_literal(expr: &str) -> String {
    let without_cast = TRAILING_CAST_RE.replace(expr, "");
    let inner = strip_outer_parens(&without_cast);
    match inner.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        Some(body) => body.replace("''", "'"),
        None => inner.to_string(),
    }
}

fn strip_outer_parens(expr: &str) -> &str {
    let mut expr = expr.trim();
    while let Some(inner) = expr.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        expr = inner.trim();
    }
    expr
}

/// Render a Prisma string literal.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
