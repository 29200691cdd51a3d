//! A Splitter that cuts a multi-statement script into single statements.
//!
//! See [`split_statements`](crate::split_statements) as the entry point for splitting SQL.

use std::str::Chars;

use sqlparser::dialect::{self, Dialect};
use sqlparser::parser::ParserError;
use sqlparser::tokenizer::{Location, Token, TokenWithLocation, Tokenizer};

use crate::error::Error;

/// Convenience function to split a script into statements.
///
/// Statements are cut at `;` tokens, so semicolons inside string literals, quoted
/// identifiers and comments do not split. Each statement keeps its original text,
/// trimmed. Statements holding only whitespace or comments are dropped.
///
/// ## Example
///
/// ```rust
/// use sqlparser::dialect::GenericDialect;
///
/// let dialect = GenericDialect {};
/// let sql = "SELECT ';' FROM t1; -- done\nUPDATE t2 SET a = 1;";
/// let result = sql_parity::split_statements(&dialect, sql).unwrap();
/// assert_eq!(result, ["SELECT ';' FROM t1", "-- done\nUPDATE t2 SET a = 1"]);
/// ```
pub fn split_statements(dialect: &dyn Dialect, sql: &str) -> Result<Vec<String>, Error> {
    Splitter::split(dialect, sql)
}

/// Look up a sqlparser dialect by name. `None` selects the generic dialect.
pub fn dialect_from_name(name: Option<&str>) -> Result<Box<dyn Dialect>, Error> {
    let name = name.unwrap_or("generic");
    dialect::dialect_from_str(name)
        .ok_or_else(|| Error::ArgumentError(format!("Dialect not found: {}", name)))
}

/// Splitter for SQL scripts.
#[derive(Debug, Default)]
pub struct Splitter;

impl Splitter {
    /// Split SQL into statements.
    pub fn split(dialect: &dyn Dialect, sql: &str) -> Result<Vec<String>, Error> {
        let tokens = Tokenizer::new(dialect, sql)
            .tokenize_with_location()
            .map_err(ParserError::from)?;

        let mut cursor = LocationCursor::new(sql);
        let mut statements = Vec::new();
        let mut start = 0;
        let mut has_content = false;
        for TokenWithLocation { token, location } in tokens {
            match token {
                Token::SemiColon => {
                    let end = cursor.seek(location);
                    if has_content {
                        statements.push(sql[start..end].trim().to_string());
                    }
                    start = end + 1;
                    has_content = false;
                }
                Token::Whitespace(_) | Token::EOF => {}
                _ => has_content = true,
            }
        }
        if has_content {
            statements.push(sql[start..].trim().to_string());
        }
        Ok(statements)
    }
}

/// Converts tokenizer locations (1-based line and character column) into byte offsets.
/// Locations must be sought in increasing order.
struct LocationCursor<'a> {
    chars: Chars<'a>,
    offset: usize,
    line: u64,
    column: u64,
}

impl<'a> LocationCursor<'a> {
    fn new(sql: &'a str) -> Self {
        Self {
            chars: sql.chars(),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn seek(&mut self, target: Location) -> usize {
        while (self.line, self.column) < (target.line, target.column) {
            let Some(ch) = self.chars.next() else {
                break;
            };
            self.offset += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset
    }
}
