//! Generator-side model representation and the scalar pass.

use super::attributes::{ColumnContext, field_attributes};
use super::naming::{field_name, model_name};
use super::types::{FieldType, is_array, map_type};
use crate::ir::{Column, ConstraintKind, Enum, Table};

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    /// Scalar fields in declaration order, then relation fields.
    pub fields: Vec<Field>,
    /// Block attributes (`@@id`, `@@unique`, `@@map`).
    pub attributes: Vec<String>,
}

impl Model {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn scalars(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.relation)
    }

    pub fn relations(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.relation)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub typ: String,
    pub optional: bool,
    pub list: bool,
    pub attributes: Vec<String>,
    pub relation: bool,
}

impl Field {
    /// Type annotation as written: `Int`, `User?`, `Post[]`.
    pub fn type_annotation(&self) -> String {
        if self.list {
            format!("{}[]", self.typ)
        } else if self.optional {
            format!("{}?", self.typ)
        } else {
            self.typ.clone()
        }
    }
}

/// Build a model holding only the scalar fields of `table`.
pub fn build_model(table: &Table, enums: &[Enum]) -> Model {
    let name = model_name(&table.name);

    let key_columns = |kind: ConstraintKind| {
        table
            .constraints
            .iter()
            .filter(move |c| c.kind == kind)
            .map(|c| c.columns.as_slice())
    };
    let names_column = |cols: &[String], column: &Column| {
        cols.len() == 1 && cols[0].eq_ignore_ascii_case(&column.name)
    };
    let in_columns = |cols: &[String], column: &Column| {
        cols.iter().any(|c| c.eq_ignore_ascii_case(&column.name))
    };

    let fields = table
        .columns
        .iter()
        .map(|column| {
            let is_id = column.is_primary_key
                || key_columns(ConstraintKind::PrimaryKey).any(|cols| names_column(cols, column));
            let in_key = is_id
                || key_columns(ConstraintKind::PrimaryKey).any(|cols| in_columns(cols, column));
            let is_unique = column.is_unique
                || key_columns(ConstraintKind::Unique).any(|cols| names_column(cols, column));
            scalar_field(column, is_id, in_key, is_unique, enums)
        })
        .collect();

    let mut model = Model {
        name,
        fields,
        attributes: Vec::new(),
    };

    for cols in key_columns(ConstraintKind::PrimaryKey).filter(|cols| cols.len() > 1) {
        let attr = format!("@@id([{}])", field_list(cols));
        model.attributes.push(attr);
    }
    for cols in key_columns(ConstraintKind::Unique).filter(|cols| cols.len() > 1) {
        let attr = format!("@@unique([{}])", field_list(cols));
        model.attributes.push(attr);
    }
    if model.name != table.name {
        let attr = format!("@@map({})", super::attributes::quote(&table.name));
        model.attributes.push(attr);
    }

    model
}

fn scalar_field(column: &Column, is_id: bool, in_key: bool, is_unique: bool, enums: &[Enum]) -> Field {
    let name = field_name(&column.name);
    let field_type = map_type(column, enums);
    let enum_def = match &field_type {
        FieldType::Enum(enum_name) => enums
            .iter()
            .find(|e| super::naming::to_pascal_case(&e.name) == *enum_name),
        FieldType::Scalar(_) => None,
    };

    let attributes = field_attributes(&ColumnContext {
        column,
        field_name: &name,
        is_id,
        is_unique,
        enum_def,
    });
    let list = is_array(column);

    Field {
        typ: field_type.name().to_string(),
        optional: column.nullable && !in_key && !list,
        list,
        attributes,
        relation: false,
        name,
    }
}

/// `a, b` list of field names for column names.
pub fn field_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| field_name(c))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Constraint;

    fn column(name: &str, typ: &str) -> Column {
        Column::new(name, typ)
    }

    #[test]
    fn test_scalar_fields_in_order() {
        let mut table = Table::new("users");
        let mut id = column("id", "SERIAL");
        id.is_primary_key = true;
        id.is_unique = true;
        id.nullable = false;
        table.columns.push(id);
        table.columns.push(column("display_name", "TEXT"));

        let model = build_model(&table, &[]);
        assert_eq!(model.name, "User");
        assert_eq!(model.attributes, vec!["@@map(\"users\")"]);

        let names: Vec<_> = model.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "displayName"]);
        assert_eq!(model.fields[0].type_annotation(), "Int");
        assert_eq!(model.fields[1].type_annotation(), "String?");
    }

    #[test]
    fn test_primary_key_never_optional() {
        let mut table = Table::new("Tag");
        // nullable in the IR, keyed through a table constraint
        table.columns.push(column("id", "INTEGER"));
        table.constraints.push(Constraint::primary_key(vec!["id".to_string()]));

        let model = build_model(&table, &[]);
        assert!(model.attributes.is_empty());
        assert!(!model.fields[0].optional);
        assert_eq!(model.fields[0].attributes, vec!["@id"]);
    }

    #[test]
    fn test_composite_keys() {
        let mut table = Table::new("post_tags");
        table.columns.push(column("post_id", "INTEGER"));
        table.columns.push(column("tag_id", "INTEGER"));
        table.constraints.push(Constraint::primary_key(vec![
            "post_id".to_string(),
            "tag_id".to_string(),
        ]));
        table.constraints.push(Constraint::unique(vec![
            "tag_id".to_string(),
            "post_id".to_string(),
        ]));

        let model = build_model(&table, &[]);
        assert_eq!(
            model.attributes,
            vec![
                "@@id([postId, tagId])",
                "@@unique([tagId, postId])",
                "@@map(\"post_tags\")",
            ]
        );
        assert!(model.fields.iter().all(|f| !f.optional));
        assert!(model.fields.iter().all(|f| !f.attributes.contains(&"@id".to_string())));
    }

    #[test]
    fn test_single_column_unique_constraint() {
        let mut table = Table::new("users");
        table.columns.push(column("email", "TEXT"));
        table.constraints.push(Constraint::unique(vec!["email".to_string()]));

        let model = build_model(&table, &[]);
        assert_eq!(model.fields[0].attributes, vec!["@unique"]);
    }

    #[test]
    fn test_enum_field() {
        let enums = vec![Enum {
            name: "status".to_string(),
            values: vec!["ACTIVE".to_string(), "INACTIVE".to_string()],
        }];
        let mut table = Table::new("accounts");
        let mut status = column("status", "STATUS");
        status.is_enum = true;
        status.nullable = false;
        status.default_value = Some("'ACTIVE'".to_string());
        table.columns.push(status);

        let model = build_model(&table, &enums);
        assert_eq!(model.fields[0].typ, "Status");
        assert_eq!(model.fields[0].attributes, vec!["@default(ACTIVE)"]);
    }

    #[test]
    fn test_array_never_optional() {
        let mut table = Table::new("posts");
        table.columns.push(column("tags", "TEXT[]"));

        let model = build_model(&table, &[]);
        assert_eq!(model.fields[0].type_annotation(), "String[]");
    }
}
