//! Token-level stages: whitespace, comments, identifier quotes, placeholders and keyword case.
//!
//! None of these stages look at statement shape, so they apply to any input.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::keywords::KEYWORDS;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"--[^\n]*").unwrap());
static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

static BACKTICK_QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static DOUBLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());
static BRACKET_QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").unwrap());

static POSITIONAL_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\d+").unwrap());
static NAMED_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":\w+").unwrap());
static AT_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+").unwrap());

static KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i-u)\b(?:{})\b", KEYWORDS.join("|"))).unwrap()
});

// Masked spans are written as U+E000 <index> U+E001. Private-use code points never
// form a keyword and never appear in SQL emitted by a query builder.
const MASK_OPEN: char = '\u{E000}';
const MASK_CLOSE: char = '\u{E001}';
static MASKED_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x{E000}(\d+)\x{E001}").unwrap());

/// Quote styles in the order they are stripped: MySQL, standard SQL, SQL Server.
fn quoted_identifier_patterns() -> [&'static Regex; 3] {
    [&*BACKTICK_QUOTED, &*DOUBLE_QUOTED, &*BRACKET_QUOTED]
}

/// Replace every run of whitespace, newlines and tabs included, with a single space.
///
/// Leading and trailing whitespace is collapsed but not trimmed; the
/// [`Normalizer`](crate::Normalizer) trims once after all stages ran.
pub fn collapse_whitespace(query: &str) -> String {
    WHITESPACE.replace_all(query, " ").into_owned()
}

/// Strip `-- ...` line comments and `/* ... */` block comments.
///
/// Block comments may span lines; each one ends at the nearest `*/`.
pub fn remove_comments(query: &str) -> String {
    let without_line_comments = LINE_COMMENT.replace_all(query, "");
    BLOCK_COMMENT
        .replace_all(&without_line_comments, "")
        .into_owned()
}

/// Strip one layer of backtick, double-quote or bracket delimiters around identifiers.
///
/// The inner text is kept as written, so a later keyword pass may still upper-case an
/// identifier that happens to be spelled like a keyword. Use
/// [`remove_quotes_preserving_case`] when both stages are wanted.
pub fn remove_quotes(query: &str) -> String {
    quoted_identifier_patterns()
        .into_iter()
        .fold(query.to_string(), |acc, pattern| {
            pattern.replace_all(&acc, "${1}").into_owned()
        })
}

/// Strip identifier quotes and upper-case keywords in one pass, leaving the inner text of
/// every quoted identifier exactly as written.
///
/// ## Example
///
/// ```rust
/// use sql_parity::normalizer::lexical::remove_quotes_preserving_case;
///
/// let sql = r#"update users set "count" = "count" + 1"#;
/// assert_eq!(remove_quotes_preserving_case(sql), "UPDATE users SET count = count + 1");
/// ```
pub fn remove_quotes_preserving_case(query: &str) -> String {
    let mut spans: Vec<String> = Vec::new();
    let mut masked = query.to_string();
    for pattern in quoted_identifier_patterns() {
        masked = pattern
            .replace_all(&masked, |caps: &Captures| {
                spans.push(caps[1].to_string());
                format!("{MASK_OPEN}{}{MASK_CLOSE}", spans.len() - 1)
            })
            .into_owned();
    }

    let folded = uppercase_keywords(&masked);

    MASKED_SPAN
        .replace_all(&folded, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| spans.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Rewrite `$1`, `:name` and `@name` parameter markers to a bare `?`.
///
/// Only the text changes; the bind values travelling with the query keep their order.
pub fn unify_placeholders(query: &str) -> String {
    let query = POSITIONAL_PLACEHOLDER.replace_all(query, "?");
    let query = NAMED_PLACEHOLDER.replace_all(&query, "?");
    AT_PLACEHOLDER.replace_all(&query, "?").into_owned()
}

/// Upper-case every whole-word occurrence of a [`KEYWORDS`] entry.
///
/// Identifiers that merely contain a keyword, such as `updated_at` or `orders`, are left
/// alone.
pub fn uppercase_keywords(query: &str) -> String {
    KEYWORD
        .replace_all(query, |caps: &Captures| caps[0].to_ascii_uppercase())
        .into_owned()
}
