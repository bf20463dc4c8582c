//! Text normalization ahead of statement matching.
//!
//! Comments are dropped, whitespace runs collapse to a single space and the
//! input is split into `;`-terminated statements. Single-quoted literals are
//! copied through untouched so that `--`, `/*` or `;` inside a default value
//! survive.

use std::iter::Peekable;
use std::str::Chars;

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    current_char: Option<char>,
    out: String,
    statements: Vec<String>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        let mut chars = input.chars().peekable();
        let current_char = chars.next();
        Self {
            chars,
            current_char,
            out: String::new(),
            statements: Vec::new(),
        }
    }

    fn advance(&mut self) {
        self.current_char = self.chars.next();
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn push_space(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with(' ') {
            self.out.push(' ');
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.current_char {
            self.advance();
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance(); // /
        self.advance(); // *
        while let Some(c) = self.current_char {
            self.advance();
            if c == '*' && self.current_char == Some('/') {
                self.advance();
                break;
            }
        }
    }

    fn copy_quoted(&mut self, quote: char) {
        self.out.push(quote);
        self.advance();
        while let Some(c) = self.current_char {
            self.out.push(c);
            self.advance();
            if c == quote {
                // doubled quote is an escaped quote
                if self.current_char == Some(quote) {
                    self.out.push(quote);
                    self.advance();
                } else {
                    break;
                }
            }
        }
    }

    fn finish_statement(&mut self) {
        let stmt = self.out.trim().to_string();
        if !stmt.is_empty() {
            self.statements.push(stmt);
        }
        self.out.clear();
    }

    fn run(mut self) -> Vec<String> {
        while let Some(c) = self.current_char {
            match c {
                '-' if self.peek() == Some(&'-') => {
                    self.skip_line_comment();
                    self.push_space();
                }
                '/' if self.peek() == Some(&'*') => {
                    self.skip_block_comment();
                    self.push_space();
                }
                '\'' | '"' => self.copy_quoted(c),
                ';' => {
                    self.advance();
                    self.finish_statement();
                }
                c if c.is_whitespace() => {
                    self.advance();
                    self.push_space();
                }
                c => {
                    self.out.push(c);
                    self.advance();
                }
            }
        }
        self.finish_statement();
        self.statements
    }
}

/// Strip comments, collapse whitespace and split into statements.
pub fn split_statements(input: &str) -> Vec<String> {
    Scanner::new(input).run()
}

/// Split on `sep` where parenthesis depth is zero and outside quotes.
/// Pieces are trimmed; empty pieces are dropped.
pub fn split_top_level(text: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in text.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                current.push(c);
            }
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    current.push(c);
                }
                '(' => {
                    depth += 1;
                    current.push(c);
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    current.push(c);
                }
                c if c == sep && depth == 0 => {
                    parts.push(std::mem::take(&mut current));
                }
                c => current.push(c),
            },
        }
    }
    parts.push(current);

    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Byte offset of the `)` closing the `(` at `open`, if balanced.
pub fn find_matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in text[open..].char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}
