//! Identifier helpers shared by the statement matchers.

/// Regex fragment for a possibly schema-qualified, possibly quoted name.
pub const QUALIFIED_NAME: &str = r#"(?:"[^"]+"|[\w$]+)(?:\s*\.\s*(?:"[^"]+"|[\w$]+))?"#;

/// Strip a schema qualifier and surrounding double quotes.
///
/// `public.users`, `"public"."users"` and `"users"` all yield `users`.
pub fn normalize_name(raw: &str) -> String {
    let raw = raw.trim();
    let mut in_quotes = false;
    let mut last_dot = None;
    for (i, c) in raw.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '.' if !in_quotes => last_dot = Some(i),
            _ => {}
        }
    }
    let last = match last_dot {
        Some(pos) => raw[pos + 1..].trim(),
        None => raw,
    };
    unquote(last).to_string()
}

/// Remove one layer of matching double or single quotes.
pub fn unquote(s: &str) -> &str {
    let s = s.trim();
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Split a parenthesized column list body: `a, "b", c`.
pub fn split_name_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(normalize_name)
        .filter(|s| !s.is_empty())
        .collect()
}
