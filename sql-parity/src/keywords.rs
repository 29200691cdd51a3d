//! The closed keyword vocabulary used by keyword case-folding.

/// Keywords rewritten to their upper-case spelling by
/// [`uppercase_keywords`](crate::normalizer::lexical::uppercase_keywords).
pub const KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "AND", "OR", "NOT", "IN", "IS", "NULL",
    "INSERT", "INTO", "VALUES", "UPDATE", "SET", "DELETE",
    "JOIN", "LEFT", "RIGHT", "INNER", "OUTER", "CROSS", "ON",
    "GROUP", "BY", "HAVING", "ORDER", "ASC", "DESC", "LIMIT", "OFFSET",
    "AS", "DISTINCT", "ALL", "UNION", "INTERSECT", "EXCEPT",
    "CREATE", "ALTER", "DROP", "TABLE", "INDEX", "VIEW",
    "PRIMARY", "KEY", "FOREIGN", "REFERENCES", "CONSTRAINT",
    "LIKE", "BETWEEN", "EXISTS", "CASE", "WHEN", "THEN", "ELSE", "END",
    "COUNT", "SUM", "AVG", "MIN", "MAX", "COALESCE", "NULLIF",
    "TRUE", "FALSE", "RETURNING",
];

/// Whether `word` is in [`KEYWORDS`], ignoring ASCII case.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|keyword| keyword.eq_ignore_ascii_case(word))
}
