//! Column clause parsing.
//!
//! A column clause is one top-level element of a CREATE TABLE body that is
//! not a table constraint, e.g. `"email" VARCHAR(255) UNIQUE NOT NULL`.

use std::sync::LazyLock;

use regex::Regex;

use super::ident::{QUALIFIED_NAME, normalize_name, split_name_list};
use crate::error::ParseError;
use crate::ir::{Column, Constraint, Enum};

/// Declared type with optional length and array suffix.
static TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:"([^"]+)"|([\w$]+(?:\.[\w$]+)?))\s*(?:\(\s*(\d+)\s*(?:,\s*-?\d+\s*)?\))?\s*(\[\s*\])?"#,
    )
    .unwrap()
});

static IDENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bGENERATED\s+(?:ALWAYS|BY\s+DEFAULT)\s+AS\s+IDENTITY(?:\s*\((?:[^()]|\([^()]*\))*\))?",
    )
    .unwrap()
});

static PRIMARY_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").unwrap());

static UNIQUE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bUNIQUE\b").unwrap());

static NOT_NULL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNOT\s+NULL\b").unwrap());

/// Default expression: a literal, a parenthesized expression or a call, with
/// one level of nested parentheses and an optional `::type` cast.
static DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\bDEFAULT\s+(",
        r"(?:'(?:[^']|'')*'",
        r"|\((?:[^()]|\([^()]*\))*\)",
        r"|[^\s,()']+(?:\s*\((?:[^()]|\([^()]*\))*\))?)",
        r"(?:\s*::\s*[\w.]+(?:\s*\[\s*\])?)?",
        r")",
    ))
    .unwrap()
});

static REFERENCES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\bREFERENCES\s+({QUALIFIED_NAME})\s*(?:\(([^)]*)\))?"
    ))
    .unwrap()
});

static LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'(?:[^']|'')*'").unwrap());

/// Parse one column clause of `table`.
///
/// An inline `REFERENCES` clause appends a FOREIGN KEY constraint to
/// `constraints` with this column as its only source column.
pub fn parse_column(
    clause: &str,
    table: &str,
    enums: &[Enum],
    constraints: &mut Vec<Constraint>,
) -> Result<Column, ParseError> {
    let malformed = || ParseError::MalformedColumn {
        table: table.to_string(),
        clause: clause.to_string(),
    };

    let (name, rest) = split_identifier(clause).ok_or_else(malformed)?;

    let is_identity = IDENTITY_RE.is_match(rest);
    let rest = IDENTITY_RE.replace_all(rest, "");
    let rest = rest.trim();

    let caps = TYPE_RE.captures(rest).ok_or_else(malformed)?;
    let declared = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| normalize_name(m.as_str()))
        .ok_or_else(malformed)?;
    let length = caps.get(3).and_then(|m| m.as_str().parse::<u32>().ok());
    let is_array = caps.get(4).is_some();

    let declared = if is_identity {
        identity_type(&declared).map(str::to_string).unwrap_or(declared)
    } else {
        declared
    };

    let is_enum = enums.iter().any(|e| e.name.eq_ignore_ascii_case(&declared));
    let mut typ = if is_enum {
        declared
    } else {
        declared.to_uppercase()
    };
    if is_array {
        typ.push_str("[]");
    }

    // Flags are matched with string literals blanked out so a default such
    // as 'unique' does not mark the column.
    let modifiers = LITERAL_RE.replace_all(rest, "''");
    let is_primary_key = PRIMARY_KEY_RE.is_match(&modifiers);
    let is_unique = is_primary_key || UNIQUE_RE.is_match(&modifiers);
    let nullable = !is_primary_key && !NOT_NULL_RE.is_match(&modifiers);

    let default_value = DEFAULT_RE
        .captures(rest)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());

    if let Some(refs) = REFERENCES_RE.captures(rest) {
        let target = normalize_name(&refs[1]);
        let target_columns = refs
            .get(2)
            .map(|m| split_name_list(m.as_str()))
            .filter(|cols| !cols.is_empty())
            .unwrap_or_else(|| vec!["id".to_string()]);
        constraints.push(Constraint::foreign_key(
            vec![name.clone()],
            target,
            target_columns,
        ));
    }

    Ok(Column {
        name,
        typ,
        nullable,
        default_value,
        is_primary_key,
        is_unique,
        length,
        is_enum,
    })
}

/// Split the leading column identifier from the rest of the clause.
fn split_identifier(clause: &str) -> Option<(String, &str)> {
    let clause = clause.trim();
    if let Some(quoted) = clause.strip_prefix('"') {
        let end = quoted.find('"')?;
        let rest = quoted[end + 1..].trim_start();
        Some((quoted[..end].to_string(), rest))
    } else {
        let (name, rest) = clause.split_once(' ')?;
        Some((name.to_string(), rest.trim_start()))
    }
}

/// Identity columns behave like serial columns downstream.
fn identity_type(declared: &str) -> Option<&'static str> {
    match declared.to_uppercase().as_str() {
        "INTEGER" | "INT" | "INT4" => Some("SERIAL"),
        "BIGINT" | "INT8" => Some("BIGSERIAL"),
        _ => None,
    }
}
