//! The error type shared by the fallible surfaces: dialect lookup, script splitting, mode
//! parsing, file I/O and session verification. Normalization itself never fails.

use sqlparser::parser::ParserError;

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Eq, thiserror::Error, PartialEq)]
pub enum Error {
    /// An invalid name or value was supplied, such as an unknown dialect.
    #[error("{0}")]
    ArgumentError(String),
    /// The tokenizer rejected the input while splitting statements.
    #[error("{0}")]
    ParserError(#[from] ParserError),
    #[error("{0}")]
    IOError(String),
    /// Two query sequences differ; carries the rendered report.
    #[error("{0}")]
    Mismatch(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IOError(e.to_string())
    }
}
