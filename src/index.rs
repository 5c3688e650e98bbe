//! Sorted, overlap-free range index with size-class query dispatch (C4).
//!
//! Construction sorts and merges once; queries never allocate. The
//! query function picks among three code paths by range count: a
//! single-range fast path, a straight-line linear scan for small sets,
//! and binary search otherwise (binary search only pays for itself once
//! there are enough ranges to offset its overhead). The inclusive test
//! itself is the branchless one from [`crate::addr`]; this module must
//! not substitute a naive `min <= a && a <= max`.

use crate::addr::{V4Addr, V6Addr};
use crate::pattern::{CompiledRange, V4Range, V6Range};

/// Ranges at or below this count use a straight-line linear scan
/// instead of binary search. Faster in practice at this size, and it
/// specializes well for the compiler.
const LINEAR_SCAN_THRESHOLD: usize = 6;

/// Summary counts for an index's contents, useful for sanity-checking
/// that construction merged everything it should have: the count
/// should shrink whenever input patterns overlapped or touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub v4_ranges: usize,
    pub v6_ranges: usize,
}

/// Immutable, sorted, overlap-free index of IPv4 and IPv6 ranges.
///
/// Built once via [`PatternIndex::build`], then freely shared (it is
/// `Send + Sync`) across threads; each caller just needs its own
/// scanning scratch buffer.
#[derive(Debug, Clone)]
pub struct PatternIndex {
    v4: Vec<V4Range>,
    v6: Vec<V6Range>,
}

impl PatternIndex {
    /// Build an index from compiled ranges: sorts by `min`, then sweeps
    /// once merging any two ranges with `next.min <= cur.max + 1` into
    /// one. The `+1` rule collapses both overlap and immediate
    /// adjacency, which is what keeps `contains` minimal: no query ever
    /// has to check more than one merged range covering the same point.
    pub fn build(ranges: impl IntoIterator<Item = CompiledRange>) -> Self {
        let mut v4: Vec<V4Range> = Vec::new();
        let mut v6: Vec<V6Range> = Vec::new();

        for r in ranges {
            match r {
                CompiledRange::V4(r) => v4.push(r),
                CompiledRange::V6(r) => v6.push(r),
            }
        }

        Self {
            v4: merge_v4(v4),
            v6: merge_v6(v6),
        }
    }

    /// Does this index contain `addr`?
    #[inline]
    pub fn contains_v4(&self, addr: V4Addr) -> bool {
        match self.v4.as_slice() {
            [] => false,
            [only] => addr.in_range(only.min, only.max),
            ranges if ranges.len() <= LINEAR_SCAN_THRESHOLD => {
                ranges.iter().any(|r| addr.in_range(r.min, r.max))
            }
            ranges => binary_search_v4(ranges, addr),
        }
    }

    /// Does this index contain `addr`?
    #[inline]
    pub fn contains_v6(&self, addr: V6Addr) -> bool {
        match self.v6.as_slice() {
            [] => false,
            [only] => addr.in_range(only.min, only.max),
            ranges if ranges.len() <= LINEAR_SCAN_THRESHOLD => {
                ranges.iter().any(|r| addr.in_range(r.min, r.max))
            }
            ranges => binary_search_v6(ranges, addr),
        }
    }

    pub fn has_v4(&self) -> bool {
        !self.v4.is_empty()
    }

    pub fn has_v6(&self) -> bool {
        !self.v6.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            v4_ranges: self.v4.len(),
            v6_ranges: self.v6.len(),
        }
    }

    /// Exposed for tests verifying the merge invariants directly.
    #[cfg(test)]
    pub(crate) fn v4_ranges(&self) -> &[V4Range] {
        &self.v4
    }

    #[cfg(test)]
    pub(crate) fn v6_ranges(&self) -> &[V6Range] {
        &self.v6
    }
}

fn merge_v4(mut ranges: Vec<V4Range>) -> Vec<V4Range> {
    ranges.sort_by_key(|r| r.min);
    let mut merged: Vec<V4Range> = Vec::with_capacity(ranges.len());
    for r in ranges {
        match merged.last_mut() {
            Some(last) if r.min.0 <= last.max.0.saturating_add(1) => {
                if r.max.0 > last.max.0 {
                    last.max = r.max;
                }
            }
            _ => merged.push(r),
        }
    }
    merged
}

fn merge_v6(mut ranges: Vec<V6Range>) -> Vec<V6Range> {
    ranges.sort_by_key(|r| r.min);
    let mut merged: Vec<V6Range> = Vec::with_capacity(ranges.len());
    for r in ranges {
        match merged.last_mut() {
            Some(last) if r.min.0 <= last.max.0.saturating_add(1) => {
                if r.max.0 > last.max.0 {
                    last.max = r.max;
                }
            }
            _ => merged.push(r),
        }
    }
    merged
}

/// Binary search for the greatest `min <= addr`, then the branchless
/// inclusive test against that range's `max`.
#[inline]
fn binary_search_v4(ranges: &[V4Range], addr: V4Addr) -> bool {
    let mut lo = 0usize;
    let mut hi = ranges.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if ranges[mid].min > addr {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    if lo == 0 {
        return false;
    }
    let r = &ranges[lo - 1];
    addr.in_range(r.min, r.max)
}

#[inline]
fn binary_search_v6(ranges: &[V6Range], addr: V6Addr) -> bool {
    let mut lo = 0usize;
    let mut hi = ranges.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if ranges[mid].min > addr {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    if lo == 0 {
        return false;
    }
    let r = &ranges[lo - 1];
    addr.in_range(r.min, r.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::compile_token;

    fn v4(token: &str) -> CompiledRange {
        compile_token(token.as_bytes(), false).unwrap()
    }

    #[test]
    fn merges_overlapping_and_adjacent_ranges() {
        let idx = PatternIndex::build(vec![
            v4("10.0.0.0/24"),
            v4("10.0.1.0/24"), // adjacent to the above
            v4("10.0.5.0/24"), // disjoint
        ]);
        let ranges = idx.v4_ranges();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].min, V4Addr::from_octets(10, 0, 0, 0));
        assert_eq!(ranges[0].max, V4Addr::from_octets(10, 0, 1, 255));

        // invariant 1: r_i.max + 1 < r_{i+1}.min for every adjacent pair
        for w in ranges.windows(2) {
            assert!(w[0].max.0 + 1 < w[1].min.0);
        }
    }

    #[test]
    fn contains_matches_every_input_pattern() {
        let idx = PatternIndex::build(vec![v4("192.168.0.0/16"), v4("10.0.0.0/8")]);
        assert!(idx.contains_v4(V4Addr::from_octets(192, 168, 5, 5)));
        assert!(idx.contains_v4(V4Addr::from_octets(10, 1, 1, 1)));
        assert!(!idx.contains_v4(V4Addr::from_octets(172, 16, 0, 1)));
    }

    #[test]
    fn single_range_fast_path() {
        let idx = PatternIndex::build(vec![v4("192.168.0.0/16")]);
        assert!(idx.contains_v4(V4Addr::from_octets(192, 168, 0, 0)));
        assert!(idx.contains_v4(V4Addr::from_octets(192, 168, 255, 255)));
        assert!(!idx.contains_v4(V4Addr::from_octets(192, 169, 0, 0)));
    }

    #[test]
    fn many_ranges_use_binary_search_path() {
        let tokens: Vec<CompiledRange> = (0..20)
            .map(|i| v4(&format!("10.{i}.0.0/24")))
            .collect();
        let idx = PatternIndex::build(tokens);
        assert!(idx.v4_ranges().len() > LINEAR_SCAN_THRESHOLD);
        assert!(idx.contains_v4(V4Addr::from_octets(10, 5, 0, 10)));
        assert!(idx.contains_v4(V4Addr::from_octets(10, 19, 0, 255)));
        assert!(!idx.contains_v4(V4Addr::from_octets(10, 20, 0, 0)));
    }

    #[test]
    fn empty_index_matches_nothing() {
        let idx = PatternIndex::build(Vec::<CompiledRange>::new());
        assert!(!idx.contains_v4(V4Addr::MIN));
        assert!(!idx.contains_v6(V6Addr::MIN));
    }

    #[test]
    fn slash_zero_matches_everything() {
        let idx = PatternIndex::build(vec![v4("0.0.0.0/0")]);
        assert!(idx.contains_v4(V4Addr::MIN));
        assert!(idx.contains_v4(V4Addr::MAX));

        let idx6 = PatternIndex::build(vec![compile_token(b"::/0", false).unwrap()]);
        assert!(idx6.contains_v6(V6Addr::MIN));
        assert!(idx6.contains_v6(V6Addr::MAX));
    }

    #[test]
    fn idempotent_build_is_byte_identical() {
        let tokens = vec![v4("10.0.0.0/8"), v4("192.168.0.0/16"), v4("10.1.0.0/16")];
        let idx1 = PatternIndex::build(tokens.clone());
        let idx2 = PatternIndex::build(tokens);
        assert_eq!(idx1.v4_ranges(), idx2.v4_ranges());
    }
}
