//! Serializer for rendering models and enums as a Prisma schema document.

use unicode_width::UnicodeWidthStr;

use super::GeneratorOptions;
use super::attributes::quote;
use super::model::{Field, Model};
use super::naming::to_pascal_case;
use crate::ir::Enum;

const INDENT: &str = "  ";

/// Render the whole document: header, enum blocks, then model blocks.
pub fn serialize(options: &GeneratorOptions, enums: &[Enum], models: &[Model]) -> String {
    let mut output = String::new();
    serialize_header(&mut output, options);

    for e in enums {
        output.push('\n');
        serialize_enum(&mut output, e);
    }

    for model in models {
        output.push('\n');
        serialize_model(&mut output, model);
    }

    output
}

fn serialize_header(output: &mut String, options: &GeneratorOptions) {
    output.push_str("// This is your Prisma schema file,\n");
    output.push_str("// learn more about it in the docs: https://pris.ly/d/prisma-schema\n");
    output.push('\n');
    output.push_str("generator client {\n");
    output.push_str(&format!(
        "{INDENT}provider = {}\n",
        quote(&options.client_provider)
    ));
    output.push_str("}\n");
    output.push('\n');
    output.push_str("datasource db {\n");
    output.push_str(&format!(
        "{INDENT}provider = {}\n",
        quote(&options.datasource_provider)
    ));
    output.push_str(&format!("{INDENT}url      = env({})\n", quote(&options.url_env)));
    output.push_str("}\n");
}

fn serialize_enum(output: &mut String, e: &Enum) {
    let name = to_pascal_case(&e.name);
    output.push_str(&format!("enum {name} {{\n"));
    for value in &e.values {
        output.push_str(&format!("{INDENT}{value}\n"));
    }
    if name != e.name {
        output.push('\n');
        output.push_str(&format!("{INDENT}@@map({})\n", quote(&e.name)));
    }
    output.push_str("}\n");
}

fn serialize_model(output: &mut String, model: &Model) {
    output.push_str(&format!("model {} {{\n", model.name));

    let name_width = model
        .fields
        .iter()
        .map(|f| f.name.width())
        .max()
        .unwrap_or(0);
    let type_width = model
        .fields
        .iter()
        .map(|f| f.type_annotation().width())
        .max()
        .unwrap_or(0);

    for field in model.scalars() {
        serialize_field(output, field, name_width, type_width);
    }

    if model.relations().next().is_some() {
        output.push('\n');
        output.push_str(&format!("{INDENT}// Relations\n"));
        for field in model.relations() {
            serialize_field(output, field, name_width, type_width);
        }
    }

    if !model.attributes.is_empty() {
        output.push('\n');
        for attr in &model.attributes {
            output.push_str(&format!("{INDENT}{attr}\n"));
        }
    }

    output.push_str("}\n");
}

fn serialize_field(output: &mut String, field: &Field, name_width: usize, type_width: usize) {
    let typ = field.type_annotation();
    let mut line = String::from(INDENT);
    line.push_str(&pad(&field.name, name_width));
    line.push(' ');
    line.push_str(&pad(&typ, type_width));
    if !field.attributes.is_empty() {
        line.push(' ');
        line.push_str(&field.attributes.join(" "));
    }
    output.push_str(line.trim_end());
    output.push('\n');
}

/// Pad to a display width; wide characters count as two columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, typ: &str, optional: bool, attributes: &[&str]) -> Field {
        Field {
            name: name.to_string(),
            typ: typ.to_string(),
            optional,
            list: false,
            attributes: attributes.iter().map(|a| a.to_string()).collect(),
            relation: false,
        }
    }

    #[test]
    fn test_header() {
        let out = serialize(&GeneratorOptions::default(), &[], &[]);
        assert_eq!(
            out,
            "// This is your Prisma schema file,\n\
             // learn more about it in the docs: https://pris.ly/d/prisma-schema\n\
             \n\
             generator client {\n  provider = \"prisma-client-js\"\n}\n\
             \n\
             datasource db {\n  provider = \"postgresql\"\n  url      = env(\"DATABASE_URL\")\n}\n"
        );
    }

    #[test]
    fn test_enum_block() {
        let mut out = String::new();
        serialize_enum(
            &mut out,
            &Enum {
                name: "Role".to_string(),
                values: vec!["ADMIN".to_string(), "member".to_string()],
            },
        );
        assert_eq!(out, "enum Role {\n  ADMIN\n  member\n}\n");
    }

    #[test]
    fn test_enum_block_mapped() {
        let mut out = String::new();
        serialize_enum(
            &mut out,
            &Enum {
                name: "user_role".to_string(),
                values: vec!["ADMIN".to_string()],
            },
        );
        assert_eq!(out, "enum UserRole {\n  ADMIN\n\n  @@map(\"user_role\")\n}\n");
    }

    #[test]
    fn test_model_alignment() {
        let mut relation = field("author", "User", true, &["@relation(\"PostToUser\", fields: [authorId], references: [id])"]);
        relation.relation = true;
        let model = Model {
            name: "Post".to_string(),
            fields: vec![
                field("id", "Int", false, &["@id", "@default(autoincrement())"]),
                field("authorId", "Int", true, &["@map(\"author_id\")"]),
                field("body", "String", true, &[]),
                relation,
            ],
            attributes: vec!["@@map(\"posts\")".to_string()],
        };

        let mut out = String::new();
        serialize_model(&mut out, &model);
        assert_eq!(
            out,
            "model Post {\n\
             \x20 id       Int     @id @default(autoincrement())\n\
             \x20 authorId Int?    @map(\"author_id\")\n\
             \x20 body     String?\n\
             \n\
             \x20 // Relations\n\
             \x20 author   User?   @relation(\"PostToUser\", fields: [authorId], references: [id])\n\
             \n\
             \x20 @@map(\"posts\")\n\
             }\n"
        );
    }

    #[test]
    fn test_pad_wide_characters() {
        assert_eq!(pad("名前", 6), "名前  ");
        assert_eq!(pad("id", 4), "id  ");
        assert_eq!(pad("toolong", 3), "toolong");
    }
}
