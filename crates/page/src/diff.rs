// ABOUTME: Line-based LCS diff between two text extracts plus change metrics.
// ABOUTME: Produces Unchanged/Added/Removed records and the percent-changed heuristic.

//! Content diffing for selected document regions.
//!
//! Diffs are computed per line. Lines keep their terminators, so joining the
//! Unchanged and Removed records gives back the `from` text and joining the
//! Unchanged and Added records gives back the `to` text.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::select::selected_extract;

/// How a line fares between the `from` and `to` texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Unchanged,
    Added,
    Removed,
}

impl ChangeType {
    /// Stable numeric code: 0 unchanged, 1 added, 2 removed.
    pub fn code(self) -> u8 {
        match self {
            ChangeType::Unchanged => 0,
            ChangeType::Added => 1,
            ChangeType::Removed => 2,
        }
    }

    /// Prefix used in textual diffs.
    pub fn marker(self) -> char {
        match self {
            ChangeType::Unchanged => ' ',
            ChangeType::Added => '+',
            ChangeType::Removed => '-',
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeType::Unchanged => "unchanged",
            ChangeType::Added => "added",
            ChangeType::Removed => "removed",
        };
        write!(f, "{}", s)
    }
}

/// One line of a diff and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffRecord {
    pub content: String,
    pub change: ChangeType,
}

impl DiffRecord {
    pub fn new(content: impl Into<String>, change: ChangeType) -> Self {
        Self {
            content: content.into(),
            change,
        }
    }

    pub fn is_change(&self) -> bool {
        self.change != ChangeType::Unchanged
    }
}

/// Record counts by type plus the percent-changed ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChangeMetrics {
    pub unchanged: usize,
    pub added: usize,
    pub removed: usize,
    pub percent_changed: f64,
}

impl ChangeMetrics {
    pub fn from_records(records: &[DiffRecord], percent_changed: f64) -> Self {
        let mut metrics = Self {
            unchanged: 0,
            added: 0,
            removed: 0,
            percent_changed,
        };
        for record in records {
            match record.change {
                ChangeType::Unchanged => metrics.unchanged += 1,
                ChangeType::Added => metrics.added += 1,
                ChangeType::Removed => metrics.removed += 1,
            }
        }
        metrics
    }
}

/// Splits text after each `\r\n`, `\n` or `\r`, keeping the terminators.
///
/// A trailing fragment without a terminator is its own line; `""` has no lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let end = match bytes[i] {
            b'\n' => Some(i + 1),
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => Some(i + 2),
            b'\r' => Some(i + 1),
            _ => None,
        };
        match end {
            Some(end) => {
                lines.push(&text[start..end]);
                start = end;
                i = end;
            }
            None => i += 1,
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Index pairs of a longest common subsequence of `a` and `b`.
///
/// Lines that occur on only one side can never match, so they are set aside
/// before the search. The rest goes through Hirschberg's divide and conquer,
/// which keeps memory linear in the input. On ties the earliest unmatched
/// line of `a` stays available, so matches land as early in `a` as possible.
fn lcs_pairs(a: &[&str], b: &[&str]) -> Vec<(usize, usize)> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let in_a: HashSet<&str> = a.iter().copied().collect();
    let in_b: HashSet<&str> = b.iter().copied().collect();
    let a_keep: Vec<usize> = (0..a.len()).filter(|&i| in_b.contains(a[i])).collect();
    let b_keep: Vec<usize> = (0..b.len()).filter(|&j| in_a.contains(b[j])).collect();
    let a_lines: Vec<&str> = a_keep.iter().map(|&i| a[i]).collect();
    let b_lines: Vec<&str> = b_keep.iter().map(|&j| b[j]).collect();

    let mut pairs = Vec::new();
    hirschberg(&a_lines, &b_lines, (0, 0), &mut pairs);
    pairs
        .into_iter()
        .map(|(i, j)| (a_keep[i], b_keep[j]))
        .collect()
}

fn hirschberg(
    a: &[&str],
    b: &[&str],
    offset: (usize, usize),
    pairs: &mut Vec<(usize, usize)>,
) {
    if a.is_empty() || b.is_empty() {
        return;
    }
    if a.len() == 1 {
        if let Some(j) = b.iter().position(|line| *line == a[0]) {
            pairs.push((offset.0, offset.1 + j));
        }
        return;
    }

    let mid = a.len() / 2;
    let forward = lcs_lengths(&a[..mid], b, false);
    let backward = lcs_lengths(&a[mid..], b, true);

    // Largest split on ties: the upper half keeps as much of `b` as it can.
    let mut split = 0;
    let mut best = 0;
    for k in 0..=b.len() {
        let total = forward[k] + backward[b.len() - k];
        if total >= best {
            best = total;
            split = k;
        }
    }

    hirschberg(&a[..mid], &b[..split], offset, pairs);
    hirschberg(
        &a[mid..],
        &b[split..],
        (offset.0 + mid, offset.1 + split),
        pairs,
    );
}

/// LCS length of `a` against every prefix of `b`, indexed by prefix length.
///
/// With `reversed` both sides are read back to front, giving lengths against
/// every suffix of `b` indexed by suffix length.
fn lcs_lengths(a: &[&str], b: &[&str], reversed: bool) -> Vec<usize> {
    let m = b.len();
    let mut prev = vec![0usize; m + 1];
    let mut curr = vec![0usize; m + 1];
    for step in 0..a.len() {
        let line = if reversed { a[a.len() - 1 - step] } else { a[step] };
        for k in 1..=m {
            let other = if reversed { b[m - k] } else { b[k - 1] };
            curr[k] = if line == other {
                prev[k - 1] + 1
            } else {
                prev[k].max(curr[k - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev
}

/// Line diff of `from` against `to`.
///
/// Within each changed block the removed lines come before the added ones.
pub fn diff(from: &str, to: &str) -> Vec<DiffRecord> {
    let from_lines = split_lines(from);
    let to_lines = split_lines(to);

    let prefix = from_lines
        .iter()
        .zip(&to_lines)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = from_lines[prefix..]
        .iter()
        .rev()
        .zip(to_lines[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let from_mid = &from_lines[prefix..from_lines.len() - suffix];
    let to_mid = &to_lines[prefix..to_lines.len() - suffix];

    let mut records = Vec::with_capacity(from_lines.len().max(to_lines.len()));
    records.extend(
        from_lines[..prefix]
            .iter()
            .map(|line| DiffRecord::new(*line, ChangeType::Unchanged)),
    );

    let (mut fi, mut ti) = (0, 0);
    for (f, t) in lcs_pairs(from_mid, to_mid) {
        push_block(&mut records, &from_mid[fi..f], &to_mid[ti..t]);
        records.push(DiffRecord::new(from_mid[f], ChangeType::Unchanged));
        fi = f + 1;
        ti = t + 1;
    }
    push_block(&mut records, &from_mid[fi..], &to_mid[ti..]);

    records.extend(
        from_lines[from_lines.len() - suffix..]
            .iter()
            .map(|line| DiffRecord::new(*line, ChangeType::Unchanged)),
    );
    records
}

fn push_block(records: &mut Vec<DiffRecord>, removed: &[&str], added: &[&str]) {
    records.extend(
        removed
            .iter()
            .map(|line| DiffRecord::new(*line, ChangeType::Removed)),
    );
    records.extend(
        added
            .iter()
            .map(|line| DiffRecord::new(*line, ChangeType::Added)),
    );
}

/// Keeps only Added and Removed records, in their original order.
pub fn changes_only(records: &[DiffRecord]) -> Vec<DiffRecord> {
    records.iter().filter(|r| r.is_change()).cloned().collect()
}

/// Diffs the inner markup of the first `selector` match in each document.
///
/// A side without a match contributes an empty string.
pub fn selected_diff(from_markup: &str, to_markup: &str, selector: &str) -> Vec<DiffRecord> {
    let from = selected_extract(from_markup, selector);
    let to = selected_extract(to_markup, selector);
    let records = diff(&from, &to);
    tracing::debug!(selector, records = records.len(), "computed selected diff");
    records
}

/// Only the changed lines of [`selected_diff`].
pub fn selected_changes(from_markup: &str, to_markup: &str, selector: &str) -> Vec<DiffRecord> {
    changes_only(&selected_diff(from_markup, to_markup, selector))
}

/// Textual form of [`selected_diff`].
pub fn selected_diff_textual(from_markup: &str, to_markup: &str, selector: &str) -> String {
    unified(&selected_diff(from_markup, to_markup, selector))
}

/// Magnitude-of-change ratio between the selected regions of two documents.
///
/// `before` is the record count of diffing an empty text against the `from`
/// extract, `after` the record count of diffing `from` against `to`. The
/// result is `|after - before| / before`, with 0.0 when both counts are zero
/// and 1.0 when exactly one is. Not clamped.
pub fn percent_changed(from_markup: &str, to_markup: &str, selector: &str) -> f64 {
    let from = selected_extract(from_markup, selector);
    let to = selected_extract(to_markup, selector);
    let percent = percent_between(&from, &to);
    tracing::debug!(selector, percent, "computed percent changed");
    percent
}

fn percent_between(from: &str, to: &str) -> f64 {
    let before = diff("", from).len();
    let after = diff(from, to).len();

    if before == 0 && after == 0 {
        return 0.0;
    }
    if before == 0 || after == 0 {
        return 1.0;
    }
    (after as f64 - before as f64).abs() / before as f64
}

/// Record counts of the selected diff together with [`percent_changed`].
pub fn change_metrics(from_markup: &str, to_markup: &str, selector: &str) -> ChangeMetrics {
    let from = selected_extract(from_markup, selector);
    let to = selected_extract(to_markup, selector);
    let records = diff(&from, &to);
    ChangeMetrics::from_records(&records, percent_between(&from, &to))
}

/// Renders records as text: a `--- Original` / `+++ New` header, then one
/// line per record prefixed with ` `, `+` or `-`.
pub fn unified(records: &[DiffRecord]) -> String {
    let mut out = String::from("--- Original\n+++ New\n");
    for record in records {
        out.push(record.change.marker());
        out.push_str(&record.content);
        if !record.content.ends_with('\n') && !record.content.ends_with('\r') {
            out.push('\n');
        }
    }
    out
}

/// Density of `\n` characters in `s`: newline count over byte length.
pub fn breaks_ratio(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }
    s.matches('\n').count() as f64 / s.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn changes(records: &[DiffRecord]) -> Vec<ChangeType> {
        records.iter().map(|r| r.change).collect()
    }

    #[test]
    fn test_split_lines() {
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("a"), vec!["a"]);
        assert_eq!(split_lines("a\nb"), vec!["a\n", "b"]);
        assert_eq!(split_lines("a\r\nb\rc\n"), vec!["a\r\n", "b\r", "c\n"]);
        assert_eq!(split_lines("\n\n"), vec!["\n", "\n"]);
    }

    #[test]
    fn test_breaks_ratio() {
        assert_eq!(breaks_ratio("aaaa"), 0.0);
        assert_eq!(breaks_ratio("aaa\n"), 0.25);
        assert_eq!(breaks_ratio("\naa\n"), 0.5);
        assert_eq!(breaks_ratio("\n\r\n\r"), 0.5);
        assert_eq!(breaks_ratio("\n"), 1.0);
        assert_eq!(breaks_ratio(""), 0.0);
    }

    #[test]
    fn test_identical_is_unchanged() {
        let text = "one\ntwo\nthree";
        let records = diff(text, text);
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| !r.is_change()));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(diff("", "").is_empty());
        assert_eq!(
            changes(&diff("", "a\nb")),
            vec![ChangeType::Added, ChangeType::Added]
        );
        assert_eq!(
            changes(&diff("a\nb", "")),
            vec![ChangeType::Removed, ChangeType::Removed]
        );
    }

    #[test]
    fn test_removed_precede_added_in_block() {
        let records = diff("a\nb\nc\nd\n", "a\nx\ny\nd\n");
        assert_eq!(
            records,
            vec![
                DiffRecord::new("a\n", ChangeType::Unchanged),
                DiffRecord::new("b\n", ChangeType::Removed),
                DiffRecord::new("c\n", ChangeType::Removed),
                DiffRecord::new("x\n", ChangeType::Added),
                DiffRecord::new("y\n", ChangeType::Added),
                DiffRecord::new("d\n", ChangeType::Unchanged),
            ]
        );
    }

    #[test]
    fn test_tie_matches_earliest_from_line() {
        let records = diff("a\nb\n", "b\na\n");
        assert_eq!(
            records,
            vec![
                DiffRecord::new("b\n", ChangeType::Added),
                DiffRecord::new("a\n", ChangeType::Unchanged),
                DiffRecord::new("b\n", ChangeType::Removed),
            ]
        );
    }

    #[test]
    fn test_records_reconstruct_both_sides() {
        let from = "keep\nold one\nshared\nold two\ntail";
        let to = "keep\nshared\nnew\ntail\nextra\n";
        let records = diff(from, to);

        let rebuilt_from: String = records
            .iter()
            .filter(|r| r.change != ChangeType::Added)
            .map(|r| r.content.as_str())
            .collect();
        let rebuilt_to: String = records
            .iter()
            .filter(|r| r.change != ChangeType::Removed)
            .map(|r| r.content.as_str())
            .collect();

        assert_eq!(rebuilt_from, from);
        assert_eq!(rebuilt_to, to);
    }

    #[test]
    fn test_changes_only_keeps_order() {
        let records = diff("a\nb\nc\n", "a\nB\nc\nd\n");
        let changed = changes_only(&records);
        assert_eq!(
            changed,
            vec![
                DiffRecord::new("b\n", ChangeType::Removed),
                DiffRecord::new("B\n", ChangeType::Added),
                DiffRecord::new("d\n", ChangeType::Added),
            ]
        );
    }

    #[test]
    fn test_percent_between_edges() {
        assert_eq!(percent_between("", ""), 0.0);
        assert_eq!(percent_between("", "x\n"), 1.0);
        assert_eq!(percent_between("x\ny\n", "x\ny\n"), 0.0);
        // Dropping everything yields as many records as before.
        assert_eq!(percent_between("x\ny\n", ""), 0.0);
    }

    #[test]
    fn test_percent_can_exceed_one() {
        // 1 line before, 1 removed + 3 added after.
        assert_eq!(percent_between("a", "b\nc\nd"), 3.0);
    }

    #[test]
    fn test_change_type_codes() {
        assert_eq!(ChangeType::Unchanged.code(), 0);
        assert_eq!(ChangeType::Added.code(), 1);
        assert_eq!(ChangeType::Removed.code(), 2);
        assert_eq!(ChangeType::Removed.to_string(), "removed");
    }

    #[test]
    fn test_metrics_counts() {
        let records = diff("a\nb\n", "a\nc\nd\n");
        let metrics = ChangeMetrics::from_records(&records, 0.5);
        assert_eq!(metrics.unchanged, 1);
        assert_eq!(metrics.removed, 1);
        assert_eq!(metrics.added, 2);
        assert_eq!(metrics.percent_changed, 0.5);
    }

    #[test]
    fn test_unified_output() {
        let text = unified(&diff("abc\nsame", "def\nsame"));
        assert_eq!(text, "--- Original\n+++ New\n-abc\n+def\n same\n");
    }

    fn lcs_len_quadratic(a: &[&str], b: &[&str]) -> usize {
        let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
        for i in 0..a.len() {
            for j in 0..b.len() {
                table[i + 1][j + 1] = if a[i] == b[j] {
                    table[i][j] + 1
                } else {
                    table[i][j + 1].max(table[i + 1][j])
                };
            }
        }
        table[a.len()][b.len()]
    }

    #[test]
    fn test_lcs_is_longest_and_ordered() {
        let alphabet = ["a\n", "b\n", "c\n", "d\n"];
        let mut seed = 7u64;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as usize
        };

        for _ in 0..200 {
            let a: Vec<&str> = (0..next() % 12).map(|_| alphabet[next() % 4]).collect();
            let b: Vec<&str> = (0..next() % 12).map(|_| alphabet[next() % 4]).collect();
            let pairs = lcs_pairs(&a, &b);

            assert_eq!(pairs.len(), lcs_len_quadratic(&a, &b), "{:?} / {:?}", a, b);
            assert!(pairs.iter().all(|&(i, j)| a[i] == b[j]));
            assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 < w[1].1));
        }
    }

    #[test]
    fn test_repeated_line_matches_first_occurrence() {
        let records = diff("x\n", "x\nx\n");
        assert_eq!(
            records,
            vec![
                DiffRecord::new("x\n", ChangeType::Unchanged),
                DiffRecord::new("x\n", ChangeType::Added),
            ]
        );
    }

    #[test]
    fn test_large_disjoint_inputs() {
        let n = 50_000;
        let from: String = (0..n).map(|i| format!("a{}\n", i)).collect();
        let to: String = (0..n).map(|i| format!("b{}\n", i)).collect();

        let records = diff(&from, &to);
        assert_eq!(records.len(), 2 * n);
        assert!(records[..n].iter().all(|r| r.change == ChangeType::Removed));
        assert!(records[n..].iter().all(|r| r.change == ChangeType::Added));
    }

    #[test]
    fn test_large_inputs_with_shared_lines() {
        let n = 3_000;
        let side = |name: &str| -> String {
            (0..n)
                .map(|i| {
                    if i % 3 == 0 {
                        "\n".to_string()
                    } else {
                        format!("{} {}\n", name, i)
                    }
                })
                .collect()
        };
        let from = side("from");
        let to = side("to");

        let records = diff(&from, &to);
        let metrics = ChangeMetrics::from_records(&records, 0.0);
        assert_eq!(metrics.unchanged, n / 3);
        assert_eq!(metrics.removed, n - n / 3);
        assert_eq!(metrics.added, n - n / 3);
    }
}
