//! A Formatter that renders a [`Comparison`] as a human-readable report.
//!
//! See [`format_report`](crate::format_report) as the entry point for rendering reports.

use std::fmt::{self, Write};

use crate::comparator::{Comparison, DiffKind};

/// Convenience function to render a comparison report.
///
/// ## Example
///
/// ```rust
/// use sql_parity::CompareMode;
///
/// let comparison = sql_parity::compare(&["SELECT 1"], &["SELECT 2"], CompareMode::Strict);
/// let report = sql_parity::format_report(&comparison);
/// assert!(report.starts_with("queries do not match\n"));
/// assert!(report.contains("  [0] MODIFIED:\n      expected: SELECT 1\n      actual:   SELECT 2\n"));
/// ```
pub fn format_report(comparison: &Comparison) -> String {
    ReportFormatter::format(comparison)
}

/// Formatter for comparison reports.
#[derive(Debug, Default)]
pub struct ReportFormatter;

impl ReportFormatter {
    /// Render a comparison report.
    pub fn format(comparison: &Comparison) -> String {
        comparison.to_string()
    }

    fn write(out: &mut impl Write, comparison: &Comparison) -> fmt::Result {
        if comparison.is_equal() {
            writeln!(out, "queries match")?;
        } else {
            writeln!(out, "queries do not match")?;
        }
        writeln!(out)?;
        writeln!(
            out,
            "Expected {} queries, got {} queries",
            comparison.expected_count, comparison.actual_count
        )?;
        writeln!(out)?;
        writeln!(out, "Differences:")?;

        for difference in &comparison.differences {
            let expected = difference.expected.as_deref().unwrap_or_default();
            let actual = difference.actual.as_deref().unwrap_or_default();
            match difference.kind {
                DiffKind::Match => {
                    writeln!(out, "  [{}] {}: {}", difference.index, difference.kind, expected)?;
                }
                DiffKind::Missing => {
                    writeln!(out, "  [{}] {}:", difference.index, difference.kind)?;
                    writeln!(out, "      expected: {expected}")?;
                }
                DiffKind::Extra => {
                    writeln!(out, "  [{}] {}:", difference.index, difference.kind)?;
                    writeln!(out, "      actual:   {actual}")?;
                }
                DiffKind::Modified => {
                    writeln!(out, "  [{}] {}:", difference.index, difference.kind)?;
                    writeln!(out, "      expected: {expected}")?;
                    writeln!(out, "      actual:   {actual}")?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ReportFormatter::write(f, self)
    }
}
