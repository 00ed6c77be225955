//! Position-wise comparison of two clean sequences (no gaps, no alignment).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Match,
    Mismatch,
    /// base only in the second sequence
    Insertion,
    /// base only in the first sequence
    Deletion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    pub kind: DiffKind,
    pub pos: usize,
    pub base_a: Option<char>,
    pub base_b: Option<char>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiffStats {
    pub matches: usize,
    pub mismatches: usize,
    pub insertions: usize,
    pub deletions: usize,
    /// matches / compared positions × 100
    pub identity: f64,
}

pub fn diff_sequences(a: &[u8], b: &[u8]) -> Vec<DiffEntry> {
    let n = a.len().max(b.len());
    (0..n)
        .map(|pos| {
            let base_a = a.get(pos).map(|&x| x as char);
            let base_b = b.get(pos).map(|&x| x as char);
            let kind = match (base_a, base_b) {
                (Some(x), Some(y)) if x == y => DiffKind::Match,
                (Some(_), Some(_)) => DiffKind::Mismatch,
                (Some(_), None) => DiffKind::Deletion,
                _ => DiffKind::Insertion,
            };
            DiffEntry { kind, pos, base_a, base_b }
        })
        .collect()
}

/// `None` when there is nothing to compare.
pub fn diff_stats(diff: &[DiffEntry]) -> Option<DiffStats> {
    if diff.is_empty() {
        return None;
    }
    let count = |k: DiffKind| diff.iter().filter(|d| d.kind == k).count();
    let matches = count(DiffKind::Match);
    Some(DiffStats {
        matches,
        mismatches: count(DiffKind::Mismatch),
        insertions: count(DiffKind::Insertion),
        deletions: count(DiffKind::Deletion),
        identity: matches as f64 / diff.len() as f64 * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_sequences() {
        let d = diff_sequences(b"ACGT", b"ACGT");
        let s = diff_stats(&d).unwrap();
        assert_eq!(s.matches, 4);
        assert_eq!(s.identity, 100.0);
    }

    #[test]
    fn mismatch_and_tail() {
        let d = diff_sequences(b"ACGTAA", b"AGGT");
        assert_eq!(d[1].kind, DiffKind::Mismatch);
        assert_eq!(d[1].base_a, Some('C'));
        assert_eq!(d[1].base_b, Some('G'));
        assert_eq!(d[4].kind, DiffKind::Deletion);
        let s = diff_stats(&d).unwrap();
        assert_eq!((s.matches, s.mismatches, s.insertions, s.deletions), (3, 1, 0, 2));
        assert_eq!(s.identity, 50.0);

        let d = diff_sequences(b"AC", b"ACTT");
        assert_eq!(d[3].kind, DiffKind::Insertion);
        assert_eq!(d[3].base_a, None);
    }

    #[test]
    fn empty_has_no_stats() {
        assert!(diff_sequences(b"", b"").is_empty());
        assert!(diff_stats(&[]).is_none());
    }
}
