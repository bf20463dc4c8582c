//! PostgreSQL DDL to IR parsing.

mod column;
mod ident;
mod parser;
mod preprocess;

pub use column::parse_column;
pub use parser::{
    parse, parse_alter, parse_enum, parse_table, parse_table_constraint, parse_with_diagnostics,
};
pub use preprocess::{split_statements, split_top_level};
