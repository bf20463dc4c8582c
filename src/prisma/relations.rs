//! Relation field synthesis.
//!
//! Runs after every table has a scalar-only model, so a back relation can be
//! attached to any model, including ones declared later in the input.
//!
//! Pass 1 counts foreign keys per (source, target) table pair. Pass 2 adds,
//! for each foreign key, a forward field on the source model and a back
//! field on the target model, bound together by one relation name.

use std::collections::{HashMap, HashSet};

use super::attributes::quote;
use super::model::{Field, Model, field_list};
use super::naming::{column_context, field_name, model_name, pluralize, strip_id_suffix};
use crate::ir::{Constraint, Schema, Table};

/// Accumulators threaded through relation synthesis.
struct RelationContext<'a> {
    schema: &'a Schema,
    /// Foreign keys per (source table index, target table index).
    pair_counts: HashMap<(usize, usize), usize>,
    relation_names: HashSet<String>,
}

/// Add relation fields to `models`, which must be in table order.
pub fn add_relations(schema: &Schema, models: &mut [Model]) {
    let mut ctx = RelationContext {
        schema,
        pair_counts: HashMap::new(),
        relation_names: HashSet::new(),
    };
    ctx.count_pairs();

    for (source, table) in schema.tables.iter().enumerate() {
        for fk in table.foreign_keys() {
            ctx.add_relation(source, table, fk, models);
        }
    }
}

impl<'a> RelationContext<'a> {
    fn count_pairs(&mut self) {
        for (source, table) in self.schema.tables.iter().enumerate() {
            for fk in table.foreign_keys() {
                if let Some(target) = self.target_index(fk) {
                    *self.pair_counts.entry((source, target)).or_default() += 1;
                }
            }
        }
    }

    fn target_index(&self, fk: &Constraint) -> Option<usize> {
        fk.referenced_table
            .as_deref()
            .and_then(|name| self.schema.table_index(name))
    }

    fn add_relation(&mut self, source: usize, table: &Table, fk: &Constraint, models: &mut [Model]) {
        let Some(first_column) = fk.columns.first() else {
            return;
        };
        let schema = self.schema;
        let referenced = fk.referenced_table.as_deref().unwrap_or_default();
        let target = self.target_index(fk);

        let (target_table, target_model) = match target {
            Some(t) => (schema.tables[t].name.as_str(), models[t].name.clone()),
            None => (referenced, model_name(referenced)),
        };
        let source_model = models[source].name.clone();

        let relation = self.relation_name(&source_model, &target_model, first_column);

        // forward: many-to-one on the source model
        let forward_name = forward_field_name(first_column, target_table);
        // key columns are required on the scalar side, so follow those fields
        let optional = fk.columns.iter().any(|c| {
            let name = field_name(c);
            models[source]
                .scalars()
                .find(|f| f.name == name)
                .is_none_or(|f| f.optional)
        });
        let references = if fk.referenced_columns.is_empty() {
            vec!["id".to_string()]
        } else {
            fk.referenced_columns.clone()
        };
        let forward = Field {
            name: unique_field_name(&models[source], &forward_name, &target_model),
            typ: target_model.clone(),
            optional,
            list: false,
            attributes: vec![format!(
                "@relation({}, fields: [{}], references: [{}])",
                quote(&relation),
                field_list(&fk.columns),
                field_list(&references)
            )],
            relation: true,
        };
        models[source].fields.push(forward);

        // back: one-to-many on the target model
        let Some(target) = target else {
            log::warn!(
                "{}.{} references unknown table {}; only the forward relation is emitted",
                table.name,
                first_column,
                referenced
            );
            return;
        };

        let mut back_name = pluralize(&field_name(&table.name));
        if self.pair_counts.get(&(source, target)).copied().unwrap_or_default() > 1 {
            back_name.push_str(&column_context(first_column));
        }
        let back = Field {
            name: unique_field_name(&models[target], &back_name, &source_model),
            typ: source_model,
            optional: false,
            list: true,
            attributes: vec![format!("@relation({})", quote(&relation))],
            relation: true,
        };
        models[target].fields.push(back);
    }

    /// `<Source>To<Target>`, suffixed with the column context when that
    /// name is already taken by an earlier foreign key.
    fn relation_name(&mut self, source_model: &str, target_model: &str, column: &str) -> String {
        let base = format!("{source_model}To{target_model}");
        let mut name = base.clone();
        if self.relation_names.contains(&name) {
            name = format!("{base}_{}", column_context(column));
        }
        let mut n = 2;
        let candidate = name.clone();
        while self.relation_names.contains(&name) {
            name = format!("{candidate}{n}");
            n += 1;
        }
        self.relation_names.insert(name.clone());
        name
    }
}

/// Forward field name from the first foreign-key column.
fn forward_field_name(column: &str, target_table: &str) -> String {
    if column.eq_ignore_ascii_case("id") {
        return field_name(target_table);
    }
    let base = strip_id_suffix(column);
    if base.eq_ignore_ascii_case(target_table) {
        return field_name(target_table);
    }
    field_name(base)
}

/// `candidate`, or a variant of it not yet used in `model`.
fn unique_field_name(model: &Model, candidate: &str, other_model: &str) -> String {
    if !model.has_field(candidate) {
        return candidate.to_string();
    }
    let with_model = format!("{candidate}{other_model}");
    if !model.has_field(&with_model) {
        return with_model;
    }
    let mut n = 2;
    loop {
        let name = format!("{candidate}{n}");
        if !model.has_field(&name) {
            return name;
        }
        n += 1;
    }
}
