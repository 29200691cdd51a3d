//! A recording Session that captures two query sequences and verifies they match.
//!
//! The [`Recorder`] stands in for whatever intercepts queries on their way to a database:
//! each side of a comparison is recorded into its own recorder, canonicalized with the
//! session's [`Normalizer`], and compared with the session's [`CompareMode`].
//!
//! ## Example
//!
//! ```rust
//! use sql_parity::{CompareMode, NormalizerOptions, Session};
//!
//! let mut session = Session::new(NormalizerOptions::new().with_remove_returning_clause(true));
//! session
//!     .expect(|rec| {
//!         rec.record("select * from users where id = $1");
//!         rec.record("update users set name = $1 where id = $2 returning id");
//!     })
//!     .actual(|rec| {
//!         rec.record("SELECT * FROM `users` WHERE id = ?");
//!         rec.record("UPDATE users SET name = ? WHERE id = ?");
//!     });
//! assert!(session.verify().is_ok());
//! ```

use sqlparser::dialect::Dialect;
use tracing::debug;

use crate::comparator::{CompareMode, Comparator, Comparison};
use crate::error::Error;
use crate::formatter::format_report;
use crate::normalizer::{Normalizer, NormalizerOptions};
use crate::query::{BindValue, CanonicalQuery, RawQuery};
use crate::splitter::split_statements;

/// Collects raw queries in the order they are issued.
#[derive(Debug, Default)]
pub struct Recorder {
    queries: Vec<RawQuery>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a query without bind values.
    pub fn record(&mut self, sql: impl Into<String>) -> &mut Self {
        self.queries.push(RawQuery::new(sql));
        self
    }

    /// Record a query together with its bind values.
    pub fn record_with_args<I, V>(&mut self, sql: impl Into<String>, args: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<BindValue>,
    {
        let args = args.into_iter().map(Into::into).collect();
        self.queries.push(RawQuery::new(sql).with_args(args));
        self
    }

    /// Split `sql` into statements and record each of them. Returns how many were recorded.
    pub fn record_script(&mut self, dialect: &dyn Dialect, sql: &str) -> Result<usize, Error> {
        let statements = split_statements(dialect, sql)?;
        let count = statements.len();
        self.queries.extend(statements.into_iter().map(RawQuery::new));
        Ok(count)
    }

    pub fn queries(&self) -> &[RawQuery] {
        &self.queries
    }

    pub fn into_queries(self) -> Vec<RawQuery> {
        self.queries
    }
}

/// Captures an expected and an actual query sequence and compares their canonical forms.
#[derive(Debug, Default, Clone)]
pub struct Session {
    normalizer: Normalizer,
    mode: CompareMode,
    expected: Vec<CanonicalQuery>,
    actual: Vec<CanonicalQuery>,
}

impl Session {
    pub fn new(options: NormalizerOptions) -> Self {
        Self {
            normalizer: Normalizer::new(options),
            ..Self::default()
        }
    }

    /// Set the mode used by [`compare`](Self::compare) and [`verify`](Self::verify).
    pub fn with_mode(mut self, mode: CompareMode) -> Self {
        self.mode = mode;
        self
    }

    /// Record the expected side. Replaces anything recorded for it before.
    pub fn expect<F: FnOnce(&mut Recorder)>(&mut self, capture: F) -> &mut Self {
        self.expected = self.capture(capture);
        self
    }

    /// Record the actual side. Replaces anything recorded for it before.
    pub fn actual<F: FnOnce(&mut Recorder)>(&mut self, capture: F) -> &mut Self {
        self.actual = self.capture(capture);
        self
    }

    pub fn expected_queries(&self) -> &[CanonicalQuery] {
        &self.expected
    }

    pub fn actual_queries(&self) -> &[CanonicalQuery] {
        &self.actual
    }

    pub fn compare(&self) -> Comparison {
        self.compare_with(self.mode)
    }

    pub fn compare_with(&self, mode: CompareMode) -> Comparison {
        Comparator::new(mode).compare(&self.expected, &self.actual)
    }

    /// `Err(Error::Mismatch(report))` when the two sides differ.
    pub fn verify(&self) -> Result<(), Error> {
        self.verify_with(self.mode)
    }

    pub fn verify_with(&self, mode: CompareMode) -> Result<(), Error> {
        let comparison = self.compare_with(mode);
        if comparison.is_equal() {
            return Ok(());
        }
        debug!(
            ?mode,
            mismatches = comparison.mismatches().count(),
            "query sequences differ"
        );
        Err(Error::Mismatch(format_report(&comparison)))
    }

    fn capture<F: FnOnce(&mut Recorder)>(&self, capture: F) -> Vec<CanonicalQuery> {
        let mut recorder = Recorder::new();
        capture(&mut recorder);
        recorder
            .into_queries()
            .into_iter()
            .map(|raw| self.normalizer.canonicalize(raw))
            .collect()
    }
}
