//! Stages that rewrite whole clauses: JOIN spelling, ORDER BY direction, RETURNING and
//! table qualifiers.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::lexical::collapse_whitespace;

static INNER_JOIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bINNER\s+JOIN\b").unwrap());
static LEFT_OUTER_JOIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLEFT\s+OUTER\s+JOIN\b").unwrap());
static RIGHT_OUTER_JOIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bRIGHT\s+OUTER\s+JOIN\b").unwrap());
static FULL_OUTER_JOIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFULL\s+OUTER\s+JOIN\b").unwrap());

static ORDER_BY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bORDER\s+BY\b").unwrap());
static ASC_BEFORE_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+ASC\s*,").unwrap());
static ASC_AT_CLAUSE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+ASC(\s*$|\s+LIMIT\b|\s+OFFSET\b|\s+HAVING\b|\s+UNION\b|\s*\))").unwrap()
});

static RETURNING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\s+RETURNING\s+.+$").unwrap());

static JOIN_KEYWORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bJOIN\b").unwrap());
static SUBQUERY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\(\s*SELECT\b").unwrap());
static COMMA_JOIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bFROM\s+\w+(?:\s+(?:AS\s+)?\w+)?\s*,").unwrap()
});
static SCHEMA_QUALIFIED_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:FROM|UPDATE|INSERT\s+INTO)\s+\w+\.\w+").unwrap()
});
static TABLE_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(FOR\s+)?(?:FROM|UPDATE|INTO)\s+(\w+)").unwrap()
});

/// Rewrite `INNER JOIN` to `JOIN` and `LEFT|RIGHT|FULL OUTER JOIN` to `LEFT|RIGHT|FULL JOIN`.
///
/// `CROSS JOIN` and forms that are already short are untouched.
pub fn normalize_join_syntax(query: &str) -> String {
    let query = INNER_JOIN.replace_all(query, "JOIN");
    let query = LEFT_OUTER_JOIN.replace_all(&query, "LEFT JOIN");
    let query = RIGHT_OUTER_JOIN.replace_all(&query, "RIGHT JOIN");
    FULL_OUTER_JOIN
        .replace_all(&query, "FULL JOIN")
        .into_owned()
}

/// Drop explicit `ASC` qualifiers from ORDER BY, keeping `DESC`.
///
/// Everything from the first `ORDER BY` onward is rewritten; an `ASC` is removed when a
/// comma, the end of the statement, a closing parenthesis or one of LIMIT, OFFSET,
/// HAVING and UNION follows it.
pub fn remove_order_by_asc(query: &str) -> String {
    let Some(order_by) = ORDER_BY.find(query) else {
        return query.to_string();
    };
    let (head, tail) = query.split_at(order_by.start());
    let tail = ASC_BEFORE_COMMA.replace_all(tail, ",");
    let tail = ASC_AT_CLAUSE_END.replace_all(&tail, "${1}");
    format!("{head}{}", collapse_whitespace(&tail))
}

/// Strip a trailing `RETURNING ...` clause, whatever it lists.
pub fn remove_returning_clause(query: &str) -> String {
    RETURNING.replace(query, "").into_owned()
}

/// Strip `table.` prefixes from column references when the statement touches exactly
/// one table.
///
/// Declines on any JOIN, comma-joined FROM list, parenthesised subquery, schema-qualified
/// table, or more than one FROM/UPDATE/INTO clause. Qualifiers that use an alias are never
/// stripped, since only the table name itself is matched.
///
/// ## Example
///
/// ```rust
/// use sql_parity::normalizer::clauses::remove_table_qualifiers;
///
/// assert_eq!(
///     remove_table_qualifiers("DELETE FROM products WHERE products.id = ?"),
///     "DELETE FROM products WHERE id = ?"
/// );
/// assert_eq!(
///     remove_table_qualifiers("SELECT * FROM users u WHERE u.age >= ?"),
///     "SELECT * FROM users u WHERE u.age >= ?"
/// );
/// ```
pub fn remove_table_qualifiers(query: &str) -> String {
    if let Some(reason) = multi_table_reason(query) {
        debug!(stage = "remove_table_qualifiers", reason, "leaving statement unchanged");
        return query.to_string();
    }

    // `FOR UPDATE` is a row lock, not a table clause.
    let mut clauses = TABLE_CLAUSE
        .captures_iter(query)
        .filter(|caps| caps.get(1).is_none());
    let table = match (clauses.next(), clauses.next()) {
        (Some(caps), None) => caps[2].to_string(),
        (None, _) => return query.to_string(),
        (Some(_), Some(_)) => {
            debug!(
                stage = "remove_table_qualifiers",
                reason = "more than one table clause",
                "leaving statement unchanged"
            );
            return query.to_string();
        }
    };

    match Regex::new(&format!(r"(?i)\b{}\.(\w+)", regex::escape(&table))) {
        Ok(qualifier) => qualifier.replace_all(query, "${1}").into_owned(),
        Err(_) => query.to_string(),
    }
}

fn multi_table_reason(query: &str) -> Option<&'static str> {
    if JOIN_KEYWORD.is_match(query) {
        Some("join")
    } else if SUBQUERY.is_match(query) {
        Some("subquery")
    } else if COMMA_JOIN.is_match(query) {
        Some("comma join")
    } else if SCHEMA_QUALIFIED_TABLE.is_match(query) {
        Some("schema-qualified table")
    } else {
        None
    }
}
