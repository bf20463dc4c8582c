//! IR to Prisma schema generation.

mod attributes;
mod model;
mod naming;
mod relations;
mod serializer;
mod types;

pub use model::{Field, Model, build_model};
pub use naming::{column_context, model_name, pluralize, singularize, to_camel_case, to_pascal_case};
pub use relations::add_relations;
pub use types::{FieldType, Scalar, map_sql_type, map_type};

use crate::ir::Schema;

/// Settings for the generator and datasource header blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub client_provider: String,
    pub datasource_provider: String,
    /// Environment variable holding the connection URL.
    pub url_env: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            client_provider: "prisma-client-js".to_string(),
            datasource_provider: "postgresql".to_string(),
            url_env: "DATABASE_URL".to_string(),
        }
    }
}

/// Generate a Prisma schema document with the default header.
pub fn generate(schema: &Schema) -> String {
    generate_with_options(schema, &GeneratorOptions::default())
}

pub fn generate_with_options(schema: &Schema, options: &GeneratorOptions) -> String {
    let mut models = build_models(schema);
    add_relations(schema, &mut models);
    serializer::serialize(options, &schema.enums, &models)
}

/// Scalar-only models, one per table, in table order.
pub fn build_models(schema: &Schema) -> Vec<Model> {
    schema
        .tables
        .iter()
        .map(|t| build_model(t, &schema.enums))
        .collect()
}
