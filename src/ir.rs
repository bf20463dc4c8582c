//! Intermediate representation shared by the SQL parser and the Prisma generator.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub tables: Vec<Table>,
    pub enums: Vec<Enum>,
}

impl Schema {
    /// True when nothing usable was found in the input.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.enums.is_empty()
    }

    /// Position of a table by name, ignoring case (unquoted SQL identifiers
    /// fold). An exact match wins.
    pub fn table_index(&self, name: &str) -> Option<usize> {
        self.tables
            .iter()
            .position(|t| t.name == name)
            .or_else(|| {
                self.tables
                    .iter()
                    .position(|t| t.name.eq_ignore_ascii_case(name))
            })
    }

    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.table_index(name).map(|i| &self.tables[i])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub constraints: Vec<Constraint>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints
            .iter()
            .filter(|c| c.kind == ConstraintKind::ForeignKey)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    /// Uppercased SQL type name, or the enum name in its declared case.
    pub typ: String,
    pub nullable: bool,
    /// Raw default expression, unevaluated.
    pub default_value: Option<String>,
    pub is_primary_key: bool,
    pub is_unique: bool,
    pub length: Option<u32>,
    pub is_enum: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typ: typ.into(),
            nullable: true,
            default_value: None,
            is_primary_key: false,
            is_unique: false,
            length: None,
            is_enum: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    ForeignKey,
    Unique,
    Check,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub columns: Vec<String>,
    pub referenced_table: Option<String>,
    pub referenced_columns: Vec<String>,
}

impl Constraint {
    pub fn primary_key(columns: Vec<String>) -> Self {
        Self {
            kind: ConstraintKind::PrimaryKey,
            columns,
            referenced_table: None,
            referenced_columns: Vec::new(),
        }
    }

    pub fn unique(columns: Vec<String>) -> Self {
        Self {
            kind: ConstraintKind::Unique,
            columns,
            referenced_table: None,
            referenced_columns: Vec::new(),
        }
    }

    pub fn check() -> Self {
        Self {
            kind: ConstraintKind::Check,
            columns: Vec::new(),
            referenced_table: None,
            referenced_columns: Vec::new(),
        }
    }

    pub fn foreign_key(
        columns: Vec<String>,
        referenced_table: impl Into<String>,
        referenced_columns: Vec<String>,
    ) -> Self {
        Self {
            kind: ConstraintKind::ForeignKey,
            columns,
            referenced_table: Some(referenced_table.into()),
            referenced_columns,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: String,
    pub values: Vec<String>,
}
