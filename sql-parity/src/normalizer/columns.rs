//! Stages that rewrite column lists: SELECT collapsing and INSERT/UPDATE column sorting.
//!
//! These stages recognise statement shape with patterns instead of a parser. When the
//! shape is ambiguous they return the input unchanged.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::{Captures, Match, Regex};
use tracing::debug;

static SELECT_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(SELECT\s+)(DISTINCT\s+)?(.+?)(\s+FROM\b)").unwrap()
});

static INSERT_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bINSERT\s+INTO\s+\w+(?:\.\w+)?\s*\(").unwrap());
static VALUES_HEAD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*VALUES\s*\(").unwrap());

static UPDATE_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bUPDATE\s+\w+(?:\.\w+)?\s+SET\s+").unwrap());
static SET_CLAUSE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:WHERE|FROM|RETURNING|ORDER\s+BY|LIMIT)\b").unwrap()
});

/// Replace the column list of every `SELECT [DISTINCT] ... FROM` with `*`.
///
/// Bare, qualified and aliased columns as well as function calls all collapse the same
/// way. A SELECT without an adjoining FROM is left as is.
///
/// ## Example
///
/// ```rust
/// use sql_parity::normalizer::columns::collapse_select_columns;
///
/// assert_eq!(
///     collapse_select_columns("SELECT DISTINCT id, name FROM users"),
///     "SELECT DISTINCT * FROM users"
/// );
/// ```
pub fn collapse_select_columns(query: &str) -> String {
    SELECT_LIST
        .replace_all(query, |caps: &Captures| {
            format!(
                "{}{}*{}",
                &caps[1],
                caps.get(2).map_or("", |m| m.as_str()),
                &caps[4]
            )
        })
        .into_owned()
}

/// Sort the column list of `INSERT INTO t (...) VALUES (...)` by column name, keeping
/// each value paired with its column.
///
/// Declines when the column and value counts differ, when the VALUES list has more than
/// one row, or when either list has unbalanced parentheses or quotes.
pub fn sort_insert_columns(query: &str) -> String {
    let mut sorted = String::with_capacity(query.len());
    let mut cursor = 0;
    for head in INSERT_HEAD.find_iter(query) {
        if head.start() < cursor {
            continue;
        }
        if let Some((end, rewritten)) = sort_insert_at(query, head) {
            sorted.push_str(&query[cursor..head.start()]);
            sorted.push_str(&rewritten);
            cursor = end;
        }
    }
    sorted.push_str(&query[cursor..]);
    sorted
}

/// Rewrites the INSERT starting at `head`, returning the end offset of the replaced text.
fn sort_insert_at(query: &str, head: Match<'_>) -> Option<(usize, String)> {
    let columns_open = head.end() - 1;
    let columns_close = find_matching_paren(query, columns_open)?;
    let values_head = VALUES_HEAD.find(&query[columns_close + 1..])?;
    let values_open = columns_close + values_head.end();
    let values_close = find_matching_paren(query, values_open)?;

    if query[values_close + 1..].trim_start().starts_with(',') {
        debug!(stage = "sort_insert_columns", "multi-row VALUES, leaving statement unchanged");
        return None;
    }

    let columns = split_top_level(&query[columns_open + 1..columns_close])?;
    let values = split_top_level(&query[values_open + 1..values_close])?;
    if columns.len() != values.len() {
        debug!(
            stage = "sort_insert_columns",
            columns = columns.len(),
            values = values.len(),
            "column and value counts differ, leaving statement unchanged"
        );
        return None;
    }

    let mut pairs = columns.into_iter().zip(values).collect::<Vec<_>>();
    pairs.sort_by(|a, b| column_order(a.0, b.0));
    let (columns, values): (Vec<&str>, Vec<&str>) = pairs.into_iter().unzip();

    let rewritten = format!(
        "{}{}{}{})",
        &query[head.start()..=columns_open],
        columns.join(", "),
        &query[columns_close..=values_open],
        values.join(", ")
    );
    Some((values_close + 1, rewritten))
}

/// Sort the assignments of `UPDATE t SET c1 = v1, c2 = v2 ...` by column name.
///
/// The SET clause ends at the first top-level WHERE, FROM, RETURNING, ORDER BY or LIMIT,
/// or at the end of the statement. Commas inside parentheses or string literals do not
/// split assignments.
pub fn sort_update_columns(query: &str) -> String {
    let Some(head) = UPDATE_HEAD.find(query) else {
        return query.to_string();
    };
    let body = &query[head.end()..];
    let set_len = find_top_level(body, &SET_CLAUSE_END).map_or(body.len(), |m| m.start());
    let (set_clause, suffix) = body.split_at(set_len);

    match sort_assignments(set_clause) {
        Some(assignments) => format!("{}{}{}", &query[..head.end()], assignments, suffix),
        None => {
            debug!(
                stage = "sort_update_columns",
                "unparsable SET clause, leaving statement unchanged"
            );
            query.to_string()
        }
    }
}

fn sort_assignments(set_clause: &str) -> Option<String> {
    let mut assignments = split_top_level(set_clause)?
        .into_iter()
        .map(|assignment| {
            let (column, value) = assignment.split_once('=')?;
            let column = column.trim();
            (!column.is_empty()).then_some((column, value.trim()))
        })
        .collect::<Option<Vec<_>>>()?;
    assignments.sort_by(|a, b| column_order(a.0, b.0));
    Some(
        assignments
            .iter()
            .map(|(column, value)| format!("{column} = {value}"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Orders columns by their unqualified name so that `users.z` and `z` sort alike, falling
/// back to the full text on ties.
fn column_order(a: &str, b: &str) -> Ordering {
    unqualified(a)
        .cmp(unqualified(b))
        .then_with(|| a.cmp(b))
}

fn unqualified(column: &str) -> &str {
    column.rsplit_once('.').map_or(column, |(_, name)| name)
}

/// Parenthesis depth and single-quoted literal state while walking SQL text.
#[derive(Debug, Default)]
struct Scanner {
    depth: usize,
    in_literal: bool,
    broken: bool,
}

impl Scanner {
    /// Advances over `ch` and reports whether it sits at the top level, outside any
    /// parentheses or string literal.
    fn step(&mut self, ch: char) -> bool {
        if self.in_literal {
            if ch == '\'' {
                self.in_literal = false;
            }
            return false;
        }
        match ch {
            '\'' => {
                self.in_literal = true;
                false
            }
            '(' => {
                self.depth += 1;
                false
            }
            ')' => {
                match self.depth.checked_sub(1) {
                    Some(depth) => self.depth = depth,
                    None => self.broken = true,
                }
                false
            }
            _ => self.depth == 0,
        }
    }

    fn is_balanced(&self) -> bool {
        self.depth == 0 && !self.in_literal && !self.broken
    }
}

/// Split a comma list at top-level commas, trimming each item. `None` when unbalanced.
pub(crate) fn split_top_level(list: &str) -> Option<Vec<&str>> {
    let mut scanner = Scanner::default();
    let mut items = Vec::new();
    let mut start = 0;
    for (i, ch) in list.char_indices() {
        if scanner.step(ch) && ch == ',' {
            items.push(list[start..i].trim());
            start = i + 1;
        }
    }
    if !scanner.is_balanced() {
        return None;
    }
    items.push(list[start..].trim());
    Some(items)
}

/// Byte offset of the parenthesis closing the one at `open`.
fn find_matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut scanner = Scanner::default();
    for (i, ch) in text[open..].char_indices() {
        scanner.step(ch);
        if ch == ')' && !scanner.in_literal && scanner.depth == 0 {
            return (!scanner.broken).then_some(open + i);
        }
    }
    None
}

/// First match of `pattern` that starts outside parentheses and string literals.
fn find_top_level<'h>(haystack: &'h str, pattern: &Regex) -> Option<Match<'h>> {
    pattern.find_iter(haystack).find(|m| {
        let mut scanner = Scanner::default();
        haystack[..m.start()].chars().for_each(|ch| {
            scanner.step(ch);
        });
        scanner.is_balanced()
    })
}
