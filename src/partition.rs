//! Splitting `[0, n)` into contiguous worker ranges.

use std::ops::Range;

/// Divides `[0, n)` into `workers` contiguous ranges, `workers` clamped to
/// `[1, n]`. Every range but the last holds `n / workers` indices; the last
/// also takes the remainder. Empty when `n == 0`.
pub fn partition(n: usize, workers: usize) -> Vec<Range<usize>> {
    if n == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, n);
    let base = n / workers;

    let mut ranges = Vec::with_capacity(workers);
    for w in 0..workers {
        let start = w * base;
        let end = if w == workers - 1 { n } else { start + base };
        ranges.push(start..end);
    }
    ranges
}

/// Cuts `slice` into one mutable sub-slice per range. The ranges must tile
/// `[0, slice.len())` in order, as `partition` produces them.
pub fn split_disjoint<'a, T>(mut slice: &'a mut [T], ranges: &[Range<usize>]) -> Vec<&'a mut [T]> {
    let mut parts = Vec::with_capacity(ranges.len());
    let mut offset = 0;
    for r in ranges {
        assert_eq!(r.start, offset, "ranges must be contiguous, gap before {:?}", r);
        let (head, tail) = std::mem::take(&mut slice).split_at_mut(r.len());
        parts.push(head);
        slice = tail;
        offset = r.end;
    }
    assert!(slice.is_empty(), "ranges leave {} trailing slots uncovered", slice.len());
    parts
}
