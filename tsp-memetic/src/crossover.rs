use rand::Rng;

use crate::types::is_permutation;

/// Order crossover (OX). Two distinct cut points are drawn and sorted to
/// `(start, end)`; parent A's slice `[start, end)` is copied verbatim, then
/// parent B is scanned in its own order and every city not yet present is
/// written into the next open slot, starting at `end` and wrapping modulo n.
///
/// Invariant: the child is always a permutation of `[0, n)`; the open slots
/// from `end` wrapping to `start` are exactly as many as the cities missing
/// from the copied slice.
pub fn order_crossover<R: Rng>(parent_a: &[usize], parent_b: &[usize], rng: &mut R) -> Vec<usize> {
    let n = parent_a.len();
    debug_assert_eq!(n, parent_b.len());

    let first = rng.gen_range(0..n);
    let mut second = rng.gen_range(0..n);
    while second == first {
        second = rng.gen_range(0..n);
    }
    let (start, end) = if first < second {
        (first, second)
    } else {
        (second, first)
    };

    let mut child = vec![usize::MAX; n];
    let mut present = vec![false; n];
    for position in start..end {
        child[position] = parent_a[position];
        present[parent_a[position]] = true;
    }

    let mut write = end % n;
    for &city in parent_b {
        if present[city] {
            continue;
        }
        child[write] = city;
        present[city] = true;
        write = (write + 1) % n;
    }

    debug_assert!(is_permutation(&child));
    child
}
