//! Error types for sqlprism.

use thiserror::Error;

/// A statement the parser had to skip.
///
/// These never abort a parse; they are logged and collected as diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Malformed CREATE TYPE statement: {0}")]
    MalformedEnum(String),

    #[error("Malformed CREATE TABLE statement: {0}")]
    MalformedTable(String),

    #[error("Unterminated column list in table {table}")]
    UnterminatedTableBody { table: String },

    #[error("Malformed column definition in table {table}: {clause}")]
    MalformedColumn { table: String, clause: String },

    #[error("Malformed ALTER TABLE statement: {0}")]
    MalformedAlter(String),

    #[error("ALTER TABLE targets unknown table {table}")]
    UnknownAlterTarget { table: String },
}

/// Failure of the end-to-end conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("No valid CREATE TABLE or CREATE TYPE definitions found")]
    NoDefinitions,
}
