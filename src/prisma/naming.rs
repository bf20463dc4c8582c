//! Identifier conventions for generated models and fields.

/// Split an identifier into words on `_`, `-`, spaces and other
/// non-alphanumeric characters.
fn words(s: &str) -> Vec<&str> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

fn capitalize(word: &str) -> String {
    // SHOUTING words are folded first so `USER_ID` becomes `UserId`
    let folded;
    let word = if word.len() > 1 && word.chars().all(|c| !c.is_lowercase()) {
        folded = word.to_lowercase();
        folded.as_str()
    } else {
        word
    };

    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `order_items` -> `OrderItems`
pub fn to_pascal_case(s: &str) -> String {
    words(s).into_iter().map(capitalize).collect()
}

/// `created_at` -> `createdAt`
pub fn to_camel_case(s: &str) -> String {
    lower_first(&to_pascal_case(s))
}

/// Model name for a table: PascalCase with the last word singularized.
pub fn model_name(table: &str) -> String {
    let mut parts = words(table);
    let last = parts.pop().map(singularize).unwrap_or_default();
    let mut name: String = parts.into_iter().map(capitalize).collect();
    name.push_str(&capitalize(&last));
    name
}

/// Field name for a column.
pub fn field_name(column: &str) -> String {
    to_camel_case(column)
}

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
];

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// English plural for back-relation names.
///
/// Words already ending in `s` are left alone.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.ends_with('s') {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| lower == *singular) {
        return plural.to_string();
    }
    if ["sh", "ch", "x", "z"].iter().any(|suffix| lower.ends_with(suffix)) {
        return format!("{word}es");
    }
    let mut rev = lower.chars().rev();
    if let (Some('y'), Some(before)) = (rev.next(), rev.next()) {
        if !is_vowel(before) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }
    format!("{word}s")
}

/// English singular for model names.
pub fn singularize(word: &str) -> String {
    let lower = word.to_lowercase();
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| lower == *plural) {
        return singular.to_string();
    }
    let strip = |n: usize| word[..word.len() - n].to_string();

    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", strip(3));
    }
    if ["sses", "shes", "ches", "xes", "zes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return strip(2);
    }
    if lower.ends_with("uses") && !lower.ends_with("ouses") {
        return strip(2);
    }
    if ["ss", "us", "is"].iter().any(|suffix| lower.ends_with(suffix)) {
        return word.to_string();
    }
    if lower.len() > 1 && lower.ends_with('s') {
        return strip(1);
    }
    word.to_string()
}

/// Naming context of a foreign-key column: its last two underscore-separated
/// tokens after dropping an `_id` suffix, in PascalCase.
///
/// `created_by_user_id` -> `ByUser`, `author_id` -> `Author`
pub fn column_context(column: &str) -> String {
    let base = strip_id_suffix(column);
    let tokens: Vec<&str> = base.split('_').filter(|t| !t.is_empty()).collect();
    let start = tokens.len().saturating_sub(2);
    tokens[start..].iter().map(|t| capitalize(t)).collect()
}

/// `author_id` -> `author`; names without the suffix are returned unchanged.
pub fn strip_id_suffix(column: &str) -> &str {
    match column.len().checked_sub(3).and_then(|at| column.get(at..).map(|tail| (at, tail))) {
        Some((at, tail)) if at > 0 && tail.eq_ignore_ascii_case("_id") => &column[..at],
        _ => column,
    }
}
