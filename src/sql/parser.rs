//! PostgreSQL DDL parser.
//!
//! Statements are matched shape by shape rather than through a grammar. The
//! input is normalized first (see [`super::preprocess`]), then three ordered
//! passes run over the statement list:
//!
//! 1. `CREATE TYPE ... AS ENUM` statements, so that column types can be
//!    recognized as enums.
//! 2. `CREATE TABLE` statements.
//! 3. `ALTER TABLE ... ADD ...` statements, which attach constraints to the
//!    tables found in pass 2.
//!
//! A statement that does not match its expected shape is skipped and
//! reported as a [`ParseError`]; the parse itself never fails.

use std::sync::LazyLock;

use regex::Regex;

use super::column::parse_column;
use super::ident::{QUALIFIED_NAME, normalize_name, split_name_list, unquote};
use super::preprocess::{find_matching_paren, split_statements, split_top_level};
use crate::error::ParseError;
use crate::ir::{Constraint, Enum, Schema, Table};

static ENUM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^CREATE\s+TYPE\s+({QUALIFIED_NAME})\s+AS\s+ENUM\s*\((.*)\)\s*$"
    ))
    .unwrap()
});

static CREATE_TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^CREATE\s+(?:(?:GLOBAL|LOCAL)\s+)?(?:(?:TEMP|TEMPORARY|UNLOGGED)\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?({QUALIFIED_NAME})\s*\("
    ))
    .unwrap()
});

/// Opening of a table constraint clause. A bare keyword followed by a type
/// (`unique TEXT`, `check INT`) is a column, not a constraint.
static CONSTRAINT_LEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:CONSTRAINT\s",
        r"|PRIMARY\s+KEY\b",
        r"|FOREIGN\s+KEY\b",
        r"|UNIQUE\s*(?:\(|NULLS\b)",
        r"|CHECK\s*\(",
        r"|EXCLUDE\s*(?:\(|USING\b))",
    ))
    .unwrap()
});

static PRIMARY_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\s*\(([^)]*)\)").unwrap());

static FOREIGN_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\bFOREIGN\s+KEY\s*\(([^)]*)\)\s*REFERENCES\s+({QUALIFIED_NAME})\s*(?:\(([^)]*)\))?"
    ))
    .unwrap()
});

static UNIQUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bUNIQUE\s*(?:NULLS\s+(?:NOT\s+)?DISTINCT\s*)?\(([^)]*)\)").unwrap());

static CHECK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bCHECK\s*\(").unwrap());

static ALTER_TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^ALTER\s+TABLE\s+(?:IF\s+EXISTS\s+)?(?:ONLY\s+)?({QUALIFIED_NAME})\s+ADD\s+(?:CONSTRAINT\s+({QUALIFIED_NAME})\s+)?(.*)$"
    ))
    .unwrap()
});

/// Parse DDL text into the IR. Skipped statements are logged.
pub fn parse(input: &str) -> Schema {
    parse_with_diagnostics(input).0
}

/// Parse DDL text, also returning one error per skipped statement.
pub fn parse_with_diagnostics(input: &str) -> (Schema, Vec<ParseError>) {
    let mut parser = SchemaParser::new(input);
    parser.run();
    (parser.schema, parser.diagnostics)
}

struct SchemaParser {
    statements: Vec<String>,
    schema: Schema,
    diagnostics: Vec<ParseError>,
}

impl SchemaParser {
    fn new(input: &str) -> Self {
        Self {
            statements: split_statements(input),
            schema: Schema::default(),
            diagnostics: Vec::new(),
        }
    }

    fn run(&mut self) {
        let statements = std::mem::take(&mut self.statements);

        for stmt in statements.iter().filter(|s| is_enum_statement(s)) {
            match parse_enum(stmt) {
                Ok(e) => self.schema.enums.push(e),
                Err(err) => self.record(err),
            }
        }

        for stmt in statements.iter().filter(|s| is_table_statement(s)) {
            match parse_table(stmt, &self.schema.enums) {
                Ok(table) => self.schema.tables.push(table),
                Err(err) => self.record(err),
            }
        }

        for stmt in statements.iter().filter(|s| is_alter_statement(s)) {
            if let Err(err) = self.apply_alter(stmt) {
                self.record(err);
            }
        }

        log::debug!(
            "parsed {} statements into {} tables and {} enums ({} skipped)",
            statements.len(),
            self.schema.tables.len(),
            self.schema.enums.len(),
            self.diagnostics.len()
        );
    }

    fn record(&mut self, err: ParseError) {
        log::warn!("skipping statement: {err}");
        self.diagnostics.push(err);
    }

    /// Attach an `ALTER TABLE ... ADD` constraint to the altered table.
    fn apply_alter(&mut self, stmt: &str) -> Result<(), ParseError> {
        let (table_name, constraint) = parse_alter(stmt)?;

        let table = self
            .schema
            .tables
            .iter_mut()
            .find(|t| t.name.eq_ignore_ascii_case(&table_name))
            .ok_or(ParseError::UnknownAlterTarget { table: table_name })?;
        table.constraints.push(constraint);
        Ok(())
    }
}

/// Case-insensitive check that `stmt` begins with the given words.
fn starts_with_words(stmt: &str, words: &[&str]) -> bool {
    let mut tokens = stmt.split_whitespace();
    words
        .iter()
        .all(|w| tokens.next().is_some_and(|t| t.eq_ignore_ascii_case(w)))
}

fn is_enum_statement(stmt: &str) -> bool {
    starts_with_words(stmt, &["CREATE", "TYPE"]) && stmt.to_uppercase().contains("AS ENUM")
}

/// `CREATE TABLE`, also the `TEMP`/`UNLOGGED` variants.
fn is_table_statement(stmt: &str) -> bool {
    starts_with_words(stmt, &["CREATE", "TABLE"]) || CREATE_TABLE_RE.is_match(stmt)
}

fn is_alter_statement(stmt: &str) -> bool {
    let upper = stmt.to_uppercase();
    starts_with_words(stmt, &["ALTER", "TABLE"])
        && (upper.contains("ADD FOREIGN KEY")
            || upper.contains("ADD CONSTRAINT")
            || upper.contains("ADD PRIMARY KEY")
            || upper.contains("ADD UNIQUE"))
}

/// `CREATE TYPE name AS ENUM ('a', 'b')`
pub fn parse_enum(stmt: &str) -> Result<Enum, ParseError> {
    let caps = ENUM_RE
        .captures(stmt)
        .ok_or_else(|| ParseError::MalformedEnum(stmt.to_string()))?;

    let name = normalize_name(&caps[1]);
    let values = split_top_level(&caps[2], ',')
        .iter()
        .map(|v| unquote(v).trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();

    Ok(Enum { name, values })
}

/// `CREATE TABLE name ( clause, clause, ... )`
pub fn parse_table(stmt: &str, enums: &[Enum]) -> Result<Table, ParseError> {
    let caps = CREATE_TABLE_RE
        .captures(stmt)
        .ok_or_else(|| ParseError::MalformedTable(stmt.to_string()))?;
    let name = normalize_name(&caps[1]);

    // the regex ends on the opening parenthesis of the body
    let open = caps.get(0).map(|m| m.end() - 1).unwrap_or_default();
    let close = find_matching_paren(stmt, open)
        .ok_or_else(|| ParseError::UnterminatedTableBody { table: name.clone() })?;
    let body = &stmt[open + 1..close];

    let mut table = Table::new(name);
    for clause in split_top_level(body, ',') {
        if is_constraint_clause(&clause) {
            if let Some(constraint) = parse_table_constraint(&clause) {
                table.constraints.push(constraint);
            }
        } else {
            let column = parse_column(&clause, &table.name, enums, &mut table.constraints)?;
            table.columns.push(column);
        }
    }

    Ok(table)
}

/// A clause is a table constraint when it opens with `CONSTRAINT name` or
/// with a constraint keyword followed by its own syntax.
fn is_constraint_clause(clause: &str) -> bool {
    CONSTRAINT_LEAD_RE.is_match(clause)
}

/// Table-level `PRIMARY KEY`, `FOREIGN KEY`, `UNIQUE` or `CHECK` clause,
/// optionally introduced by `CONSTRAINT name`.
pub fn parse_table_constraint(clause: &str) -> Option<Constraint> {
    if let Some(caps) = FOREIGN_KEY_RE.captures(clause) {
        return Some(foreign_key_from(&caps));
    }
    if let Some(caps) = PRIMARY_KEY_RE.captures(clause) {
        return Some(Constraint::primary_key(split_name_list(&caps[1])));
    }
    if let Some(caps) = UNIQUE_RE.captures(clause) {
        return Some(Constraint::unique(split_name_list(&caps[1])));
    }
    if CHECK_RE.is_match(clause) {
        return Some(Constraint::check());
    }
    None
}

fn foreign_key_from(caps: &regex::Captures<'_>) -> Constraint {
    let columns = split_name_list(&caps[1]);
    let target = normalize_name(&caps[2]);
    let target_columns = caps
        .get(3)
        .map(|m| split_name_list(m.as_str()))
        .filter(|cols| !cols.is_empty())
        .unwrap_or_else(|| vec!["id".to_string()]);
    Constraint::foreign_key(columns, target, target_columns)
}

/// `ALTER TABLE [ONLY] name ADD [CONSTRAINT c] FOREIGN KEY | PRIMARY KEY | UNIQUE ...`
///
/// Returns the altered table's name and the constraint to attach to it.
pub fn parse_alter(stmt: &str) -> Result<(String, Constraint), ParseError> {
    let malformed = || ParseError::MalformedAlter(stmt.to_string());

    let caps = ALTER_TABLE_RE.captures(stmt).ok_or_else(malformed)?;
    let table = normalize_name(&caps[1]);
    let action = caps.get(3).map(|m| m.as_str()).unwrap_or_default();

    let constraint = if let Some(fk) = FOREIGN_KEY_RE.captures(action) {
        foreign_key_from(&fk)
    } else if let Some(pk) = PRIMARY_KEY_RE.captures(action) {
        Constraint::primary_key(split_name_list(&pk[1]))
    } else if let Some(uq) = UNIQUE_RE.captures(action) {
        Constraint::unique(split_name_list(&uq[1]))
    } else {
        return Err(malformed());
    };

    if constraint.columns.is_empty() {
        return Err(malformed());
    }
    Ok((table, constraint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ConstraintKind;

    #[test]
    fn test_parse_enum() {
        let e = parse_enum("CREATE TYPE status AS ENUM ('ACTIVE', 'INACTIVE')").unwrap();
        assert_eq!(e.name, "status");
        assert_eq!(e.values, vec!["ACTIVE", "INACTIVE"]);
    }

    #[test]
    fn test_parse_enum_quoted_and_qualified() {
        let e = parse_enum("create type public.\"Mood\" as enum ( 'sad' , \"ok\", '', 'happy' )").unwrap();
        assert_eq!(e.name, "Mood");
        assert_eq!(e.values, vec!["sad", "ok", "happy"]);
    }

    #[test]
    fn test_parse_enum_malformed() {
        let err = parse_enum("CREATE TYPE status AS ENUM").unwrap_err();
        assert!(matches!(err, ParseError::MalformedEnum(_)));
    }

    #[test]
    fn test_parse_simple_table() {
        let table = parse_table(
            "CREATE TABLE users (id SERIAL PRIMARY KEY, email VARCHAR(255) UNIQUE NOT NULL)",
            &[],
        )
        .unwrap();

        assert_eq!(table.name, "users");
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[0].name, "id");
        assert_eq!(table.columns[1].name, "email");
        assert!(table.constraints.is_empty());
    }

    #[test]
    fn test_parse_table_if_not_exists_qualified() {
        let table = parse_table(
            "CREATE TABLE IF NOT EXISTS public.\"Orders\" (id INT)",
            &[],
        )
        .unwrap();
        assert_eq!(table.name, "Orders");
    }

    #[test]
    fn test_parse_table_constraints() {
        let table = parse_table(
            "CREATE TABLE post_tags ( post_id INT NOT NULL, tag_id INT NOT NULL, \
             CONSTRAINT post_tags_pkey PRIMARY KEY (post_id, tag_id), \
             FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE, \
             CONSTRAINT fk_tag FOREIGN KEY (\"tag_id\") REFERENCES public.tags, \
             UNIQUE (tag_id, post_id), \
             CHECK (post_id > 0) )",
            &[],
        )
        .unwrap();

        assert_eq!(table.columns.len(), 2);
        let kinds: Vec<_> = table.constraints.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ConstraintKind::PrimaryKey,
                ConstraintKind::ForeignKey,
                ConstraintKind::ForeignKey,
                ConstraintKind::Unique,
                ConstraintKind::Check,
            ]
        );
        assert_eq!(table.constraints[0].columns, vec!["post_id", "tag_id"]);
        assert_eq!(table.constraints[2].columns, vec!["tag_id"]);
        assert_eq!(table.constraints[2].referenced_table.as_deref(), Some("tags"));
        assert_eq!(table.constraints[2].referenced_columns, vec!["id"]);
    }

    #[test]
    fn test_column_named_like_keyword_is_column() {
        let table = parse_table(
            "CREATE TABLE codes (unique_code TEXT, check_digit INT, primary_contact TEXT)",
            &[],
        )
        .unwrap();
        assert_eq!(table.columns.len(), 3);
        assert!(table.constraints.is_empty());
    }

    #[test]
    fn test_keyword_named_columns_and_exclusion_constraint() {
        let table = parse_table(
            "CREATE TABLE bookings (unique TEXT UNIQUE, check INT CHECK (check > 0), \
             CONSTRAINT no_overlap EXCLUDE USING gist (room WITH =))",
            &[],
        )
        .unwrap();

        let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["unique", "check"]);
        assert!(table.columns[0].is_unique);
        assert_eq!(table.columns[1].typ, "INT");
        assert!(table.constraints.is_empty());
    }

    #[test]
    fn test_inline_reference_appends_constraint() {
        let table = parse_table(
            "CREATE TABLE posts (id SERIAL PRIMARY KEY, author_id INTEGER REFERENCES users(id))",
            &[],
        )
        .unwrap();
        assert_eq!(table.constraints.len(), 1);
        assert_eq!(table.constraints[0].columns, vec!["author_id"]);
    }

    #[test]
    fn test_parse_table_unterminated() {
        let err = parse_table("CREATE TABLE broken (id INT, name TEXT", &[]).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnterminatedTableBody {
                table: "broken".to_string()
            }
        );
    }

    #[test]
    fn test_parse_alter_foreign_key() {
        let (table, c) = parse_alter(
            "ALTER TABLE ONLY public.posts ADD CONSTRAINT posts_author_fkey FOREIGN KEY (author_id) REFERENCES public.users(id)",
        )
        .unwrap();
        assert_eq!(table, "posts");
        assert_eq!(c.kind, ConstraintKind::ForeignKey);
        assert_eq!(c.columns, vec!["author_id"]);
        assert_eq!(c.referenced_table.as_deref(), Some("users"));
        assert_eq!(c.referenced_columns, vec!["id"]);
    }

    #[test]
    fn test_parse_alter_unnamed_foreign_key() {
        let (table, c) = parse_alter(
            "ALTER TABLE \"comments\" ADD FOREIGN KEY (\"post_id\") REFERENCES \"posts\" (\"id\")",
        )
        .unwrap();
        assert_eq!(table, "comments");
        assert_eq!(c.referenced_table.as_deref(), Some("posts"));
    }

    #[test]
    fn test_parse_alter_primary_key() {
        let (table, c) =
            parse_alter("ALTER TABLE ONLY public.users ADD CONSTRAINT users_pkey PRIMARY KEY (id)").unwrap();
        assert_eq!(table, "users");
        assert_eq!(c, Constraint::primary_key(vec!["id".to_string()]));
    }

    #[test]
    fn test_parse_alter_malformed() {
        let err = parse_alter("ALTER TABLE users ADD CONSTRAINT c CHECK (x > 0)").unwrap_err();
        assert!(matches!(err, ParseError::MalformedAlter(_)));
    }

    #[test]
    fn test_passes_resolve_enums_declared_later() {
        let sql = "CREATE TABLE accounts (id SERIAL PRIMARY KEY, status STATUS); \
                   CREATE TYPE status AS ENUM ('ACTIVE', 'INACTIVE');";
        let schema = parse(sql);
        assert_eq!(schema.enums.len(), 1);
        let status = &schema.tables[0].columns[1];
        assert!(status.is_enum);
        assert_eq!(status.typ, "STATUS");
    }

    #[test]
    fn test_alter_attaches_to_owning_table() {
        let sql = "CREATE TABLE users (id SERIAL PRIMARY KEY);
                   CREATE TABLE posts (id SERIAL PRIMARY KEY, author_id INT);
                   ALTER TABLE posts ADD CONSTRAINT fk FOREIGN KEY (author_id) REFERENCES users (id);";
        let schema = parse(sql);
        assert!(schema.tables[0].constraints.is_empty());
        assert_eq!(schema.tables[1].constraints.len(), 1);
    }

    #[test]
    fn test_alter_unknown_table_is_skipped() {
        let sql = "CREATE TABLE users (id INT);
                   ALTER TABLE ghosts ADD FOREIGN KEY (user_id) REFERENCES users (id);";
        let (schema, diagnostics) = parse_with_diagnostics(sql);
        assert_eq!(schema.tables.len(), 1);
        assert_eq!(
            diagnostics,
            vec![ParseError::UnknownAlterTarget {
                table: "ghosts".to_string()
            }]
        );
    }

    #[test]
    fn test_malformed_statement_does_not_abort() {
        let sql = "CREATE TABLE broken (id INT, name;
                   CREATE TABLE good (id SERIAL PRIMARY KEY);";
        let (schema, diagnostics) = parse_with_diagnostics(sql);
        assert_eq!(schema.tables.len(), 1);
        assert_eq!(schema.tables[0].name, "good");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_other_statements_ignored() {
        let sql = "CREATE INDEX idx ON users (email);
                   CREATE VIEW v AS SELECT 1;
                   INSERT INTO users VALUES (1);";
        let (schema, diagnostics) = parse_with_diagnostics(sql);
        assert!(schema.is_empty());
        assert!(diagnostics.is_empty());
    }
}
