//! A Normalizer that converts SQL queries to a canonical form.
//!
//! See [`normalize`](crate::normalize()) as the entry point for normalizing SQL.
//! The individual stages live in [`lexical`], [`columns`] and [`clauses`] and can be
//! used on their own.

pub mod clauses;
pub mod columns;
pub mod lexical;

use tracing::trace;

use crate::query::{detect_operation, CanonicalQuery, RawQuery};

/// Convenience function to normalize SQL with default options.
///
/// ## Example
///
/// ```rust
/// let sql = "select  *  from  users  where  id = $1";
/// let result = sql_parity::normalize(sql);
/// assert_eq!(result, "SELECT * FROM users WHERE id = ?");
/// ```
pub fn normalize(sql: &str) -> String {
    Normalizer::default().normalize(sql)
}

/// Convenience function to normalize SQL with options.
///
/// ## Example
///
/// ```rust
/// use sql_parity::NormalizerOptions;
///
/// let sql = "INSERT INTO t (c, b, a) VALUES (?, ?, ?)";
/// let options = NormalizerOptions::new().with_sort_insert_columns(true);
/// let result = sql_parity::normalize_with_options(sql, options);
/// assert_eq!(result, "INSERT INTO t (a, b, c) VALUES (?, ?, ?)");
/// ```
pub fn normalize_with_options(sql: &str, options: NormalizerOptions) -> String {
    Normalizer::new(options).normalize(sql)
}

/// Options for normalizing SQL. Each switch gates exactly one stage.
///
/// The default enables the four lexical stages. The remaining stages are semantic and
/// opt-in, because they can hide a real difference between two query layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerOptions {
    /// Strip `--` and `/* */` comments.
    pub remove_comments: bool,
    /// Strip backtick, double-quote and bracket identifier quotes.
    pub remove_quotes: bool,
    /// Rewrite `$1`, `:name` and `@name` markers to `?`.
    pub unify_placeholders: bool,
    /// Upper-case SQL keywords.
    pub uppercase_keywords: bool,
    /// Replace SELECT column lists with `*`.
    pub collapse_select_columns: bool,
    /// `INNER JOIN` becomes `JOIN`, `X OUTER JOIN` becomes `X JOIN`.
    pub normalize_join_syntax: bool,
    /// Drop redundant `ASC` in ORDER BY.
    pub remove_order_by_asc: bool,
    /// Sort INSERT columns (with their values) by name.
    pub sort_insert_columns: bool,
    /// Sort UPDATE SET assignments by column name.
    pub sort_update_columns: bool,
    /// Drop a trailing RETURNING clause.
    pub remove_returning_clause: bool,
    /// Drop `table.` qualifiers in single-table statements.
    pub remove_table_qualifiers: bool,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            remove_comments: true,
            remove_quotes: true,
            unify_placeholders: true,
            uppercase_keywords: true,
            ..Self::none()
        }
    }
}

impl NormalizerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stage disabled; only whitespace collapsing and trimming remain.
    pub fn none() -> Self {
        Self {
            remove_comments: false,
            remove_quotes: false,
            unify_placeholders: false,
            uppercase_keywords: false,
            collapse_select_columns: false,
            normalize_join_syntax: false,
            remove_order_by_asc: false,
            sort_insert_columns: false,
            sort_update_columns: false,
            remove_returning_clause: false,
            remove_table_qualifiers: false,
        }
    }

    /// The defaults plus every semantic stage.
    pub fn semantic() -> Self {
        Self::default()
            .with_collapse_select_columns(true)
            .with_normalize_join_syntax(true)
            .with_remove_order_by_asc(true)
            .with_sort_insert_columns(true)
            .with_sort_update_columns(true)
            .with_remove_returning_clause(true)
            .with_remove_table_qualifiers(true)
    }

    pub fn with_remove_comments(mut self, remove_comments: bool) -> Self {
        self.remove_comments = remove_comments;
        self
    }

    pub fn with_remove_quotes(mut self, remove_quotes: bool) -> Self {
        self.remove_quotes = remove_quotes;
        self
    }

    pub fn with_unify_placeholders(mut self, unify_placeholders: bool) -> Self {
        self.unify_placeholders = unify_placeholders;
        self
    }

    pub fn with_uppercase_keywords(mut self, uppercase_keywords: bool) -> Self {
        self.uppercase_keywords = uppercase_keywords;
        self
    }

    pub fn with_collapse_select_columns(mut self, collapse_select_columns: bool) -> Self {
        self.collapse_select_columns = collapse_select_columns;
        self
    }

    pub fn with_normalize_join_syntax(mut self, normalize_join_syntax: bool) -> Self {
        self.normalize_join_syntax = normalize_join_syntax;
        self
    }

    pub fn with_remove_order_by_asc(mut self, remove_order_by_asc: bool) -> Self {
        self.remove_order_by_asc = remove_order_by_asc;
        self
    }

    pub fn with_sort_insert_columns(mut self, sort_insert_columns: bool) -> Self {
        self.sort_insert_columns = sort_insert_columns;
        self
    }

    pub fn with_sort_update_columns(mut self, sort_update_columns: bool) -> Self {
        self.sort_update_columns = sort_update_columns;
        self
    }

    pub fn with_remove_returning_clause(mut self, remove_returning_clause: bool) -> Self {
        self.remove_returning_clause = remove_returning_clause;
        self
    }

    pub fn with_remove_table_qualifiers(mut self, remove_table_qualifiers: bool) -> Self {
        self.remove_table_qualifiers = remove_table_qualifiers;
        self
    }
}

type Stage = fn(&str) -> String;

/// Applies the enabled stages to one query at a time.
///
/// Stage order is fixed: comments, quotes (jointly with keywords when both are on),
/// placeholders, whitespace, keywords, SELECT columns, JOINs, ASC, INSERT sort, UPDATE
/// sort, RETURNING, table qualifiers, then a final trim.
#[derive(Debug, Default, Clone)]
pub struct Normalizer {
    options: NormalizerOptions,
}

impl Normalizer {
    pub fn new(options: NormalizerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    /// Normalize one SQL statement.
    pub fn normalize(&self, sql: &str) -> String {
        let normalized = self
            .stages()
            .into_iter()
            .fold(sql.to_string(), |query, stage| stage(&query))
            .trim()
            .to_string();
        trace!(%sql, %normalized, "normalized query");
        normalized
    }

    /// Normalize a captured query and tag it with its operation.
    pub fn canonicalize(&self, raw: RawQuery) -> CanonicalQuery {
        CanonicalQuery {
            normalized: self.normalize(&raw.sql),
            operation: detect_operation(&raw.sql),
            raw: raw.sql,
            args: raw.args,
        }
    }

    fn stages(&self) -> Vec<Stage> {
        let o = &self.options;
        let mut stages: Vec<Stage> = Vec::new();
        if o.remove_comments {
            stages.push(lexical::remove_comments);
        }
        match (o.remove_quotes, o.uppercase_keywords) {
            (true, true) => stages.push(lexical::remove_quotes_preserving_case),
            (true, false) => stages.push(lexical::remove_quotes),
            _ => {}
        }
        if o.unify_placeholders {
            stages.push(lexical::unify_placeholders);
        }
        stages.push(lexical::collapse_whitespace);
        if o.uppercase_keywords && !o.remove_quotes {
            stages.push(lexical::uppercase_keywords);
        }
        let semantic: [(bool, Stage); 7] = [
            (o.collapse_select_columns, columns::collapse_select_columns),
            (o.normalize_join_syntax, clauses::normalize_join_syntax),
            (o.remove_order_by_asc, clauses::remove_order_by_asc),
            (o.sort_insert_columns, columns::sort_insert_columns),
            (o.sort_update_columns, columns::sort_update_columns),
            (o.remove_returning_clause, clauses::remove_returning_clause),
            (o.remove_table_qualifiers, clauses::remove_table_qualifiers),
        ];
        stages.extend(
            semantic
                .into_iter()
                .filter_map(|(enabled, stage)| enabled.then_some(stage)),
        );
        stages
    }
}
