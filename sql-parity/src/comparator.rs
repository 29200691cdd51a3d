//! A Comparator that diffs two sequences of canonical queries.
//!
//! See [`compare`](crate::compare()) as the entry point for comparing query sequences.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Convenience function to compare two sequences of canonical queries.
///
/// ## Example
///
/// ```rust
/// use sql_parity::CompareMode;
///
/// let expected = ["SELECT * FROM a", "SELECT * FROM b"];
/// let actual = ["SELECT * FROM b", "SELECT * FROM a"];
/// assert!(!sql_parity::compare(&expected, &actual, CompareMode::Strict).is_equal());
/// assert!(sql_parity::compare(&expected, &actual, CompareMode::Unordered).is_equal());
/// ```
pub fn compare<E: AsRef<str>, A: AsRef<str>>(
    expected: &[E],
    actual: &[A],
    mode: CompareMode,
) -> Comparison {
    Comparator::new(mode).compare(expected, actual)
}

/// How two sequences are matched against each other.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CompareMode {
    /// Position by position.
    #[default]
    Strict,
    /// As multisets; order is ignored, duplicates are counted.
    Unordered,
}

impl FromStr for CompareMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(CompareMode::Strict),
            "unordered" => Ok(CompareMode::Unordered),
            _ => Err(Error::ArgumentError(format!("Compare mode not found: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Match,
    /// Present in expected only.
    Missing,
    /// Present in actual only.
    Extra,
    /// Present on both sides at the same position with different text.
    Modified,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiffKind::Match => "OK",
            DiffKind::Missing => "MISSING",
            DiffKind::Extra => "EXTRA",
            DiffKind::Modified => "MODIFIED",
        };
        f.write_str(label)
    }
}

/// One entry of a [`Comparison`]. `expected` is `None` for [`DiffKind::Extra`] and `actual`
/// is `None` for [`DiffKind::Missing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    pub kind: DiffKind,
    pub index: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl Difference {
    fn matched(index: usize, expected: &str, actual: &str) -> Self {
        Self {
            kind: DiffKind::Match,
            index,
            expected: Some(expected.to_string()),
            actual: Some(actual.to_string()),
        }
    }

    fn missing(index: usize, expected: &str) -> Self {
        Self {
            kind: DiffKind::Missing,
            index,
            expected: Some(expected.to_string()),
            actual: None,
        }
    }

    fn extra(index: usize, actual: &str) -> Self {
        Self {
            kind: DiffKind::Extra,
            index,
            expected: None,
            actual: Some(actual.to_string()),
        }
    }

    fn modified(index: usize, expected: &str, actual: &str) -> Self {
        Self {
            kind: DiffKind::Modified,
            ..Self::matched(index, expected, actual)
        }
    }
}

/// Result of one comparison, rebuilt from scratch on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub differences: Vec<Difference>,
    pub expected_count: usize,
    pub actual_count: usize,
}

impl Comparison {
    /// `true` when every entry is a [`DiffKind::Match`].
    pub fn is_equal(&self) -> bool {
        self.differences
            .iter()
            .all(|difference| difference.kind == DiffKind::Match)
    }

    /// Entries other than [`DiffKind::Match`].
    pub fn mismatches(&self) -> impl Iterator<Item = &Difference> {
        self.differences
            .iter()
            .filter(|difference| difference.kind != DiffKind::Match)
    }
}

/// Comparator for canonical query sequences.
#[derive(Debug, Default, Clone, Copy)]
pub struct Comparator {
    mode: CompareMode,
}

impl Comparator {
    pub fn new(mode: CompareMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> CompareMode {
        self.mode
    }

    /// Compare `expected` against `actual`. Neither input is retained.
    pub fn compare<E: AsRef<str>, A: AsRef<str>>(
        &self,
        expected: &[E],
        actual: &[A],
    ) -> Comparison {
        let expected = expected.iter().map(AsRef::as_ref).collect::<Vec<&str>>();
        let actual = actual.iter().map(AsRef::as_ref).collect::<Vec<&str>>();
        let differences = match self.mode {
            CompareMode::Strict => Self::compare_strict(&expected, &actual),
            CompareMode::Unordered => Self::compare_unordered(&expected, &actual),
        };
        Comparison {
            differences,
            expected_count: expected.len(),
            actual_count: actual.len(),
        }
    }

    fn compare_strict(expected: &[&str], actual: &[&str]) -> Vec<Difference> {
        (0..expected.len().max(actual.len()))
            .filter_map(|i| match (expected.get(i), actual.get(i)) {
                (Some(e), Some(a)) if e == a => Some(Difference::matched(i, e, a)),
                (Some(e), Some(a)) => Some(Difference::modified(i, e, a)),
                (Some(e), None) => Some(Difference::missing(i, e)),
                (None, Some(a)) => Some(Difference::extra(i, a)),
                (None, None) => None,
            })
            .collect()
    }

    fn compare_unordered(expected: &[&str], actual: &[&str]) -> Vec<Difference> {
        let mut available = occurrences(actual);
        let mut unclaimed = occurrences(expected);

        let mut differences = expected
            .iter()
            .enumerate()
            .map(|(i, query)| match available.get_mut(query) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    Difference::matched(i, query, query)
                }
                _ => Difference::missing(i, query),
            })
            .collect::<Vec<_>>();

        let mut index = expected.len();
        for query in actual {
            match unclaimed.get_mut(query) {
                Some(count) if *count > 0 => *count -= 1,
                _ => {
                    differences.push(Difference::extra(index, query));
                    index += 1;
                }
            }
        }
        differences
    }
}

fn occurrences<'a>(queries: &[&'a str]) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for query in queries {
        *counts.entry(*query).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(comparison: &Comparison) -> Vec<(DiffKind, usize)> {
        comparison
            .differences
            .iter()
            .map(|difference| (difference.kind, difference.index))
            .collect()
    }

    #[test]
    fn test_compare_mode_from_str() {
        assert_eq!("strict".parse::<CompareMode>(), Ok(CompareMode::Strict));
        assert_eq!("Unordered".parse::<CompareMode>(), Ok(CompareMode::Unordered));
        assert_eq!(
            "random".parse::<CompareMode>(),
            Err(Error::ArgumentError("Compare mode not found: random".into()))
        );
        assert_eq!(CompareMode::default(), CompareMode::Strict);
    }

    #[test]
    fn test_diff_kind_display() {
        assert_eq!(DiffKind::Match.to_string(), "OK");
        assert_eq!(DiffKind::Missing.to_string(), "MISSING");
        assert_eq!(DiffKind::Extra.to_string(), "EXTRA");
        assert_eq!(DiffKind::Modified.to_string(), "MODIFIED");
    }

    #[test]
    fn test_strict_equal() {
        let queries = ["SELECT * FROM a", "SELECT * FROM b"];
        let comparison = Comparator::new(CompareMode::Strict).compare(&queries, &queries);
        assert!(comparison.is_equal());
        assert_eq!(kinds(&comparison), vec![(DiffKind::Match, 0), (DiffKind::Match, 1)]);
        assert_eq!(comparison.differences[0].actual.as_deref(), Some("SELECT * FROM a"));
    }

    #[test]
    fn test_strict_swapped_order_is_modified() {
        let comparison = Comparator::new(CompareMode::Strict).compare(&["A", "B"], &["B", "A"]);
        assert!(!comparison.is_equal());
        assert_eq!(kinds(&comparison), vec![(DiffKind::Modified, 0), (DiffKind::Modified, 1)]);
        assert_eq!(
            comparison.differences[0],
            Difference {
                kind: DiffKind::Modified,
                index: 0,
                expected: Some("A".into()),
                actual: Some("B".into()),
            }
        );
    }

    #[test]
    fn test_strict_length_mismatch() {
        let comparator = Comparator::new(CompareMode::Strict);

        let comparison = comparator.compare(&["A", "B", "C"], &["A"]);
        assert_eq!(
            kinds(&comparison),
            vec![(DiffKind::Match, 0), (DiffKind::Missing, 1), (DiffKind::Missing, 2)]
        );
        assert_eq!(comparison.differences[1].actual, None);

        let comparison = comparator.compare(&["A"], &["X", "B"]);
        assert_eq!(kinds(&comparison), vec![(DiffKind::Modified, 0), (DiffKind::Extra, 1)]);
        assert_eq!(comparison.differences[1].expected, None);
        assert_eq!(comparison.expected_count, 1);
        assert_eq!(comparison.actual_count, 2);
    }

    #[test]
    fn test_empty_sequences() {
        let empty: [&str; 0] = [];
        for mode in [CompareMode::Strict, CompareMode::Unordered] {
            let comparison = Comparator::new(mode).compare(&empty, &empty);
            assert!(comparison.is_equal());
            assert!(comparison.differences.is_empty());
        }
    }

    #[test]
    fn test_unordered_swapped_order_matches() {
        let comparison = Comparator::new(CompareMode::Unordered).compare(&["A", "B"], &["B", "A"]);
        assert!(comparison.is_equal());
        assert_eq!(kinds(&comparison), vec![(DiffKind::Match, 0), (DiffKind::Match, 1)]);
    }

    #[test]
    fn test_unordered_counts_duplicates() {
        let comparator = Comparator::new(CompareMode::Unordered);

        let comparison = comparator.compare(&["A", "A", "B"], &["B", "A"]);
        assert!(!comparison.is_equal());
        assert_eq!(
            kinds(&comparison),
            vec![(DiffKind::Match, 0), (DiffKind::Missing, 1), (DiffKind::Match, 2)]
        );

        let comparison = comparator.compare(&["A"], &["A", "A"]);
        assert_eq!(kinds(&comparison), vec![(DiffKind::Match, 0), (DiffKind::Extra, 1)]);
        assert_eq!(comparison.differences[1].actual.as_deref(), Some("A"));
    }

    #[test]
    fn test_unordered_extra_indices_follow_expected() {
        let comparison =
            Comparator::new(CompareMode::Unordered).compare(&["A", "B"], &["X", "B", "Y", "Z"]);
        assert_eq!(
            kinds(&comparison),
            vec![
                (DiffKind::Missing, 0),
                (DiffKind::Match, 1),
                (DiffKind::Extra, 2),
                (DiffKind::Extra, 3),
                (DiffKind::Extra, 4),
            ]
        );
        let extras = comparison
            .mismatches()
            .filter(|difference| difference.kind == DiffKind::Extra)
            .map(|difference| difference.actual.as_deref())
            .collect::<Vec<_>>();
        assert_eq!(extras, vec![Some("X"), Some("Y"), Some("Z")]);
    }

    #[test]
    fn test_compare_accepts_owned_strings() {
        let expected = vec!["SELECT 1".to_string()];
        let actual = vec!["SELECT 1"];
        assert!(compare(&expected, &actual, CompareMode::Strict).is_equal());
    }
}
