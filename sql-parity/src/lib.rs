//! # sql-parity
//!
//! `sql-parity` normalizes SQL text into a canonical form and compares sequences of
//! canonical queries, so that the queries issued by two data-access layers can be checked
//! for equivalence without a database.
//!
//! ## Main Functionalities
//!
//! - **SQL Normalization**: Rewrite SQL into a canonical form with a configurable pipeline of text stages. See the [`normalizer`] module for more information.
//! - **Query Comparison**: Compare two query sequences in strict or unordered mode. See the [`comparator`] module for more information.
//! - **Report Formatting**: Render a comparison as a readable report. See the [`formatter`] module for more information.
//! - **Statement Splitting**: Split multi-statement scripts. See the [`splitter`] module for more information.
//! - **Recording Sessions**: Record both sides, then verify they match. See the [`session`] module for more information.
//!
//! ## Quick Start
//!
//! Here's a quick example to get you started with SQL normalization and comparison:
//!
//! ```rust
//! use sql_parity::CompareMode;
//!
//! let expected = [sql_parity::normalize("select * from `users` where id = $1")];
//! let actual = [sql_parity::normalize("SELECT *\n  FROM users\n WHERE id = :id")];
//! assert_eq!(expected, ["SELECT * FROM users WHERE id = ?"]);
//! assert!(sql_parity::compare(&expected, &actual, CompareMode::Strict).is_equal());
//! ```
//!
//! For more comprehensive examples and usage, refer to the documentation of each module.

pub mod comparator;
pub mod error;
pub mod formatter;
pub mod keywords;
pub mod normalizer;
pub mod query;
pub mod session;
pub mod splitter;

pub use comparator::*;
pub use formatter::*;
pub use normalizer::*;
pub use query::*;
pub use session::*;
pub use splitter::*;
pub use sqlparser;

#[doc(hidden)]
// Internal module for testing. Made public for use in integration tests.
pub mod test_utils;
