//! Stable adaptive sort.
//!
//! A natural merge sort in the TimSort family: ascending runs are detected
//! (strictly descending runs reversed), short runs are extended to a minimum
//! length with binary insertion, and runs are merged under the stack-length
//! invariants. Linear on sorted or nearly sorted input, `O(n log n)` worst
//! case, and stable: equal elements keep their relative order.
//!
//! The display list is mostly sorted frame to frame, which is the case this
//! is tuned for.

use std::cmp::Ordering;

/// Arrays shorter than this are sorted by binary insertion only.
const MIN_MERGE: usize = 32;

#[derive(Debug, Copy, Clone)]
struct Run {
    start: usize,
    len: usize,
}

/// Sorts `v` in place with a 3-way comparator, stably.
pub fn stable_sort_by<T, F>(v: &mut [T], mut cmp: F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let n = v.len();
    if n < 2 {
        return;
    }

    if n < MIN_MERGE {
        let run = count_run_and_make_ascending(v, &mut cmp);
        binary_insertion_sort(v, run, &mut cmp);
        return;
    }

    let min_run = min_run_length(n);
    let mut runs: Vec<Run> = Vec::with_capacity(40);
    let mut tmp: Vec<T> = Vec::new();

    let mut lo = 0;
    while lo < n {
        let mut len = count_run_and_make_ascending(&mut v[lo..], &mut cmp);
        if len < min_run {
            let forced = min_run.min(n - lo);
            binary_insertion_sort(&mut v[lo..lo + forced], len, &mut cmp);
            len = forced;
        }
        runs.push(Run { start: lo, len });
        merge_collapse(v, &mut runs, &mut tmp, &mut cmp);
        lo += len;
    }

    while runs.len() > 1 {
        let mut i = runs.len() - 2;
        if i > 0 && runs[i - 1].len < runs[i + 1].len {
            i -= 1;
        }
        merge_at(v, &mut runs, i, &mut tmp, &mut cmp);
    }
}

/// Sorts by a key extracted from each element.
#[inline]
pub fn stable_sort_by_key<T, K, F>(v: &mut [T], mut key: F)
where
    T: Clone,
    K: Ord,
    F: FnMut(&T) -> K,
{
    stable_sort_by(v, |a, b| key(a).cmp(&key(b)));
}

fn min_run_length(mut n: usize) -> usize {
    let mut r = 0;
    while n >= MIN_MERGE {
        r |= n & 1;
        n >>= 1;
    }
    n + r
}

/// Length of the run starting at `v[0]`; a strictly descending run is
/// reversed in place. Strictness keeps the reversal stable.
fn count_run_and_make_ascending<T, F>(v: &mut [T], cmp: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let n = v.len();
    if n < 2 {
        return n;
    }
    let mut end = 2;
    if cmp(&v[1], &v[0]) == Ordering::Less {
        while end < n && cmp(&v[end], &v[end - 1]) == Ordering::Less {
            end += 1;
        }
        v[..end].reverse();
    } else {
        while end < n && cmp(&v[end], &v[end - 1]) != Ordering::Less {
            end += 1;
        }
    }
    end
}

/// Sorts `v` given that `v[..sorted]` is already sorted.
fn binary_insertion_sort<T, F>(v: &mut [T], sorted: usize, cmp: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in sorted.max(1)..v.len() {
        let mut lo = 0;
        let mut hi = i;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if cmp(&v[i], &v[mid]) == Ordering::Less {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        v[lo..=i].rotate_right(1);
    }
}

/// Merges until the run stack satisfies
/// `len[i-2] > len[i-1] + len[i]` and `len[i-1] > len[i]`.
fn merge_collapse<T, F>(v: &mut [T], runs: &mut Vec<Run>, tmp: &mut Vec<T>, cmp: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    while runs.len() > 1 {
        let mut i = runs.len() - 2;
        let r = |k: usize| runs[k].len;
        if (i > 0 && r(i - 1) <= r(i) + r(i + 1)) || (i > 1 && r(i - 2) <= r(i - 1) + r(i)) {
            if r(i - 1) < r(i + 1) {
                i -= 1;
            }
        } else if r(i) > r(i + 1) {
            break;
        }
        merge_at(v, runs, i, tmp, cmp);
    }
}

fn merge_at<T, F>(v: &mut [T], runs: &mut Vec<Run>, i: usize, tmp: &mut Vec<T>, cmp: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let a = runs[i];
    let b = runs[i + 1];
    debug_assert_eq!(a.start + a.len, b.start);
    runs[i].len = a.len + b.len;
    runs.remove(i + 1);
    merge(&mut v[a.start..b.start + b.len], a.len, tmp, cmp);
}

/// Merges the sorted halves `v[..mid]` and `v[mid..]`.
fn merge<T, F>(v: &mut [T], mid: usize, tmp: &mut Vec<T>, cmp: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    // Left elements not greater than the first right element are in place.
    let first = upper_bound(&v[..mid], &v[mid], cmp);
    if first == mid {
        return;
    }
    // Right elements not less than the last left element are in place.
    let last = mid + lower_bound(&v[mid..], &v[mid - 1], cmp);

    let v = &mut v[first..last];
    let mid = mid - first;

    tmp.clear();
    tmp.extend_from_slice(&v[..mid]);

    let (mut i, mut j, mut k) = (0, mid, 0);
    while i < tmp.len() && j < v.len() {
        if cmp(&v[j], &tmp[i]) == Ordering::Less {
            v[k] = v[j].clone();
            j += 1;
        } else {
            v[k] = tmp[i].clone();
            i += 1;
        }
        k += 1;
    }
    while i < tmp.len() {
        v[k] = tmp[i].clone();
        i += 1;
        k += 1;
    }
}

/// First index whose element is greater than `key`.
fn upper_bound<T, F>(v: &[T], key: &T, cmp: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let (mut lo, mut hi) = (0, v.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if cmp(key, &v[mid]) == Ordering::Less {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// First index whose element is not less than `key`.
fn lower_bound<T, F>(v: &[T], key: &T, cmp: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let (mut lo, mut hi) = (0, v.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if cmp(&v[mid], key) == Ordering::Less {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// (key, original index)
    type Item = (u32, usize);

    fn tag(keys: &[u32]) -> Vec<Item> {
        keys.iter().copied().enumerate().map(|(i, k)| (k, i)).collect()
    }

    fn check(keys: &[u32]) {
        let mut ours = tag(keys);
        let mut oracle = ours.clone();
        stable_sort_by(&mut ours, |a, b| a.0.cmp(&b.0));
        oracle.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(ours, oracle, "len {}", keys.len());
    }

    /// Deterministic xorshift sequence.
    fn pseudo_random(n: usize, seed: u64, modulo: u32) -> Vec<u32> {
        let mut x = seed.max(1);
        (0..n)
            .map(|_| {
                x ^= x << 13;
                x ^= x >> 7;
                x ^= x << 17;
                (x % modulo as u64) as u32
            })
            .collect()
    }

    const SIZES: &[usize] = &[0, 1, 2, 3, 31, 32, 33, 64, 100, 257, 1000, 4097, 10_000];

    // ── shapes of input ───────────────────────────────────────────────────

    #[test]
    fn sorted_input() {
        for &n in SIZES {
            check(&(0..n as u32).collect::<Vec<_>>());
        }
    }

    #[test]
    fn reversed_input() {
        for &n in SIZES {
            check(&(0..n as u32).rev().collect::<Vec<_>>());
        }
    }

    #[test]
    fn duplicate_heavy_input() {
        for &n in SIZES {
            check(&pseudo_random(n, 7 + n as u64, 3));
        }
    }

    #[test]
    fn random_input() {
        for &n in SIZES {
            check(&pseudo_random(n, 99 + n as u64, u32::MAX));
        }
    }

    #[test]
    fn sawtooth_input() {
        let keys: Vec<u32> = (0..5000u32).map(|i| i % 97).collect();
        check(&keys);
    }

    // ── adaptivity ────────────────────────────────────────────────────────

    #[test]
    fn sorted_input_is_linear() {
        let mut v: Vec<u32> = (0..10_000).collect();
        let mut count = 0usize;
        stable_sort_by(&mut v, |a, b| {
            count += 1;
            a.cmp(b)
        });
        assert_eq!(count, 9_999);
    }

    #[test]
    fn reversed_input_is_linear() {
        let mut v: Vec<u32> = (0..10_000).rev().collect();
        let mut count = 0usize;
        stable_sort_by(&mut v, |a, b| {
            count += 1;
            a.cmp(b)
        });
        assert_eq!(count, 9_999);
        assert!(v.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn sort_by_key_orders_tuples() {
        let mut v = vec![(2, 'a'), (1, 'b'), (2, 'c'), (0, 'd')];
        stable_sort_by_key(&mut v, |e| e.0);
        assert_eq!(v, vec![(0, 'd'), (1, 'b'), (2, 'a'), (2, 'c')]);
    }

    proptest! {
        #[test]
        fn matches_std_stable_sort(keys in prop::collection::vec(0u32..50, 0..2000)) {
            let mut ours = tag(&keys);
            let mut oracle = ours.clone();
            stable_sort_by(&mut ours, |a, b| a.0.cmp(&b.0));
            oracle.sort_by(|a, b| a.0.cmp(&b.0));
            prop_assert_eq!(ours, oracle);
        }
    }
}
