//! Representation-specific genetic operators.
//!
//! # Bit-string operators (binary-coded continuous genomes)
//!
//! - [`two_point_crossover`]: exchange the segment between two distinct cuts
//! - [`bit_swap_mutation`]: transpose two distinct bits
//!
//! # Permutation operators (tours over city indices)
//!
//! - [`segment_transfer_crossover`]: copy a segment of parent A to the front,
//!   append the rest in parent B's order
//! - [`relocation_mutation`]: distance-biased position swaps
//!
//! Every permutation operator preserves the set of cities: no duplicates, no
//! omissions. [`is_permutation`] checks this.

use super::selection::draw_pool;
use crate::codec::BitString;
use rand::Rng;

/// Number of positions perturbed by one [`relocation_mutation`].
pub const RELOCATION_MOVES: usize = 3;

// ============================================================================
// Bit-string operators
// ============================================================================

/// Two-point crossover on bit strings.
///
/// Draws two distinct cut indices `i < j` over the genome length and returns
/// `(B[..i] + A[i..j] + B[j..], A[..i] + B[i..j] + A[j..])`.
///
/// # Panics
/// Panics if the parents differ in length or are shorter than 2 bits.
pub fn two_point_crossover<R: Rng>(
    parent_a: &BitString,
    parent_b: &BitString,
    rng: &mut R,
) -> (BitString, BitString) {
    assert_eq!(
        parent_a.len(),
        parent_b.len(),
        "parents must have equal length"
    );

    let (i, j) = distinct_pair(parent_a.len(), rng);
    let mut child_1 = parent_b.clone();
    let mut child_2 = parent_a.clone();
    child_1.exchange_segment(&mut child_2, i..j);
    (child_1, child_2)
}

/// Swaps the bits at two distinct random positions.
///
/// Bit strings shorter than 2 bits are left unchanged.
pub fn bit_swap_mutation<R: Rng>(bits: &mut BitString, rng: &mut R) {
    if bits.len() < 2 {
        return;
    }
    let (i, j) = distinct_pair(bits.len(), rng);
    bits.swap(i, j);
}

// ============================================================================
// Permutation operators
// ============================================================================

/// Segment-transfer crossover for permutations.
///
/// 1. Draw two distinct cut indices `lo < hi`
/// 2. Copy `parent_a[lo..hi]` verbatim to the front of the child
/// 3. Append the elements of `parent_b` not in that segment, in `parent_b`
///    order
///
/// Produces exactly one child.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents have different lengths or are not permutations of
/// `0..n`.
pub fn segment_transfer_crossover<R: Rng>(
    parent_a: &[usize],
    parent_b: &[usize],
    rng: &mut R,
) -> Vec<usize> {
    let n = parent_a.len();
    assert_eq!(n, parent_b.len(), "parents must have equal length");

    if n < 2 {
        return parent_a.to_vec();
    }

    let (lo, hi) = distinct_pair(n, rng);
    let mut in_segment = vec![false; n];
    let mut child = Vec::with_capacity(n);
    for &city in &parent_a[lo..hi] {
        in_segment[city] = true;
        child.push(city);
    }
    child.extend(parent_b.iter().copied().filter(|&city| !in_segment[city]));

    debug_assert!(is_permutation(&child, n), "crossover broke the permutation");
    child
}

/// Distance-biased relocation mutation for tours.
///
/// Each position `k` is weighted by the perimeter of the triangle it forms
/// with its tour neighbours, `d(prev, k) + d(k, next) + d(next, prev)`, a
/// proxy for how much it costs to keep that city where it is.
/// [`RELOCATION_MOVES`] positions are drawn with replacement from these
/// weights (uniformly if they sum to zero); each drawn position `p` is
/// swapped with position `(p - d) mod n` for a uniform random `d` in `0..n`.
///
/// `distance` receives two city indices.
pub fn relocation_mutation<R, D>(tour: &mut [usize], distance: D, rng: &mut R)
where
    R: Rng,
    D: Fn(usize, usize) -> f64,
{
    let n = tour.len();
    if n < 2 {
        return;
    }

    let costs = relocation_costs(tour, distance);
    for p in draw_pool(&costs, RELOCATION_MOVES, rng) {
        let d = rng.random_range(0..n);
        tour.swap(p, (p + n - d) % n);
    }

    debug_assert!(is_permutation(tour, n), "mutation broke the permutation");
}

/// Per-position weights used by [`relocation_mutation`]: the perimeter of
/// the triangle each city forms with its cyclic tour neighbours.
pub fn relocation_costs<D>(tour: &[usize], distance: D) -> Vec<f64>
where
    D: Fn(usize, usize) -> f64,
{
    let n = tour.len();
    (0..n)
        .map(|k| {
            let prev = tour[(k + n - 1) % n];
            let next = tour[(k + 1) % n];
            let city = tour[k];
            distance(prev, city) + distance(city, next) + distance(next, prev)
        })
        .collect()
}

/// Returns `true` if `perm` contains each of `0..n` exactly once.
pub fn is_permutation(perm: &[usize], n: usize) -> bool {
    if perm.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &v in perm {
        if v >= n || seen[v] {
            return false;
        }
        seen[v] = true;
    }
    true
}

// ============================================================================
// Helpers
// ============================================================================

/// Draws two distinct indices from `0..n`, returned in ascending order.
///
/// # Panics
/// Panics if `n < 2`.
pub fn distinct_pair<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    assert!(n >= 2, "need at least 2 positions to draw a distinct pair, got {n}");
    let a = rng.random_range(0..n);
    let mut b = rng.random_range(0..n - 1);
    if b >= a {
        b += 1;
    }
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn bits(s: &str) -> BitString {
        s.parse().expect("valid bit literal")
    }

    fn ones(b: &BitString) -> usize {
        b.iter().filter(|&x| x).count()
    }

    // ---- Distinct pair ----

    #[test]
    fn test_distinct_pair_bounds() {
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            let (i, j) = distinct_pair(10, &mut rng);
            assert!(i < j);
            assert!(j < 10);
        }
    }

    #[test]
    fn test_distinct_pair_covers_all_pairs() {
        let mut rng = create_rng(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(distinct_pair(4, &mut rng));
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    #[should_panic(expected = "at least 2 positions")]
    fn test_distinct_pair_needs_two() {
        let mut rng = create_rng(1);
        distinct_pair(1, &mut rng);
    }

    // ---- Two-point crossover ----

    #[test]
    fn test_two_point_crossover_complementary() {
        let mut rng = create_rng(42);
        let a = bits("0000000000");
        let b = bits("1111111111");
        for _ in 0..100 {
            let (c1, c2) = two_point_crossover(&a, &b, &mut rng);
            // Every position comes from exactly one parent per child.
            for k in 0..10 {
                assert_ne!(c1.get(k), c2.get(k));
            }
            let zeros = 10 - ones(&c1);
            assert!((1..10).contains(&zeros), "segment must be non-empty and proper: {c1}");
        }
    }

    #[test]
    fn test_two_point_crossover_segment_is_contiguous() {
        let mut rng = create_rng(3);
        let a = bits("00000000");
        let b = bits("11111111");
        for _ in 0..50 {
            let (c1, _) = two_point_crossover(&a, &b, &mut rng);
            let s = c1.to_string();
            let trimmed = s.trim_matches('1');
            assert!(trimmed.chars().all(|c| c == '0'), "segment not contiguous: {s}");
        }
    }

    #[test]
    fn test_two_point_crossover_identical_parents() {
        let mut rng = create_rng(42);
        let a = bits("1011001");
        let (c1, c2) = two_point_crossover(&a, &a, &mut rng);
        assert_eq!(c1, a);
        assert_eq!(c2, a);
    }

    // ---- Bit swap mutation ----

    #[test]
    fn test_bit_swap_preserves_popcount() {
        let mut rng = create_rng(42);
        let mut b = bits("1100101000");
        for _ in 0..100 {
            bit_swap_mutation(&mut b, &mut rng);
            assert_eq!(ones(&b), 4);
        }
    }

    #[test]
    fn test_bit_swap_two_bits() {
        let mut rng = create_rng(42);
        let original = bits("10");
        let mut b = original.clone();
        bit_swap_mutation(&mut b, &mut rng);
        // With two bits the only distinct pair is (0, 1).
        assert_eq!(b.to_string(), "01");
    }

    #[test]
    fn test_bit_swap_short_noop() {
        let mut rng = create_rng(42);
        let mut b = bits("1");
        bit_swap_mutation(&mut b, &mut rng);
        assert_eq!(b.to_string(), "1");
    }

    // ---- Segment-transfer crossover ----

    #[test]
    fn test_segment_transfer_valid() {
        let mut rng = create_rng(42);
        let p1: Vec<usize> = (0..8).collect();
        let p2 = vec![7, 6, 5, 4, 3, 2, 1, 0];
        for _ in 0..100 {
            let child = segment_transfer_crossover(&p1, &p2, &mut rng);
            assert!(is_permutation(&child, 8), "child not valid: {child:?}");
        }
    }

    #[test]
    fn test_segment_transfer_structure() {
        let mut rng = create_rng(9);
        let p1 = vec![0, 1, 2, 3, 4, 5];
        let p2 = vec![5, 3, 1, 4, 2, 0];
        for _ in 0..50 {
            let child = segment_transfer_crossover(&p1, &p2, &mut rng);
            // The prefix is a contiguous run of p1.
            let start = child[0];
            let mut len = 0;
            while len < child.len() && len + start < p1.len() && child[len] == p1[start + len] {
                len += 1;
            }
            assert!(len >= 1);
            // The remainder follows p2 order.
            let rest = &child[len..];
            let expected: Vec<usize> = p2
                .iter()
                .copied()
                .filter(|c| !child[..len].contains(c))
                .collect();
            assert_eq!(rest, expected.as_slice());
        }
    }

    #[test]
    fn test_segment_transfer_identical_parents() {
        let mut rng = create_rng(42);
        let p = vec![2, 0, 3, 1];
        for _ in 0..20 {
            let child = segment_transfer_crossover(&p, &p, &mut rng);
            assert!(is_permutation(&child, 4));
        }
    }

    #[test]
    fn test_segment_transfer_single_city() {
        let mut rng = create_rng(42);
        assert_eq!(segment_transfer_crossover(&[0], &[0], &mut rng), vec![0]);
    }

    // ---- Relocation mutation ----

    fn line_distance(a: usize, b: usize) -> f64 {
        (a as f64 - b as f64).abs()
    }

    #[test]
    fn test_relocation_preserves_permutation() {
        let mut rng = create_rng(42);
        for _ in 0..200 {
            let mut tour: Vec<usize> = (0..12).collect();
            relocation_mutation(&mut tour, line_distance, &mut rng);
            assert!(is_permutation(&tour, 12), "invalid tour: {tour:?}");
        }
    }

    /// Cities on a line, except city 4 which sits far off at x = 1000.
    fn outlier_distance(a: usize, b: usize) -> f64 {
        let x = |c: usize| if c == 4 { 1000.0 } else { c as f64 };
        (x(a) - x(b)).abs()
    }

    #[test]
    fn test_relocation_costs_are_neighbour_triangles() {
        let tour: Vec<usize> = (0..8).collect();
        let costs = relocation_costs(&tour, line_distance);
        // Ends close the loop: (7, 0, 1) and (6, 7, 0).
        assert_eq!(costs, vec![14.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 14.0]);

        let tour = vec![2, 0, 1];
        let costs = relocation_costs(&tour, line_distance);
        assert_eq!(costs, vec![4.0, 4.0, 4.0]);

        let costs = relocation_costs(&(0..8).collect::<Vec<_>>(), outlier_distance);
        assert_eq!(costs[4], 997.0 + 995.0 + 2.0);
        assert!(costs[3] > 1900.0 && costs[5] > 1900.0);
        assert_eq!(costs[0], 14.0);
    }

    #[test]
    fn test_relocation_swaps_with_earlier_position() {
        // Replays the draws on an identical stream: each move swaps the
        // drawn position p with (p - d) mod n.
        let n = 9;
        for seed in 0..50 {
            let start: Vec<usize> = (0..n).collect();
            let mut tour = start.clone();
            relocation_mutation(&mut tour, outlier_distance, &mut create_rng(seed));

            let mut rng = create_rng(seed);
            let mut expected = start.clone();
            let costs = relocation_costs(&start, outlier_distance);
            let picks = draw_pool(&costs, RELOCATION_MOVES, &mut rng);
            assert_eq!(picks.len(), RELOCATION_MOVES);
            for p in picks {
                let d = rng.random_range(0..n);
                expected.swap(p, (p + n - d) % n);
            }
            assert_eq!(tour, expected, "seed {seed}");
        }
    }

    #[test]
    fn test_relocation_prefers_costly_cities() {
        let mut rng = create_rng(42);
        let (mut outlier_moved, mut first_moved) = (0, 0);
        for _ in 0..2000 {
            let mut tour: Vec<usize> = (0..8).collect();
            relocation_mutation(&mut tour, outlier_distance, &mut rng);
            outlier_moved += usize::from(tour[4] != 4);
            first_moved += usize::from(tour[0] != 0);
        }
        assert!(
            outlier_moved > first_moved * 3 / 2,
            "outlier moved {outlier_moved} times, first city {first_moved} times"
        );
    }

    #[test]
    fn test_relocation_zero_distances_uniform_fallback() {
        let mut rng = create_rng(42);
        let mut changed = false;
        for _ in 0..50 {
            let mut tour: Vec<usize> = (0..6).collect();
            relocation_mutation(&mut tour, |_, _| 0.0, &mut rng);
            assert!(is_permutation(&tour, 6));
            changed |= tour != (0..6).collect::<Vec<_>>();
        }
        assert!(changed);
    }

    #[test]
    fn test_relocation_tiny_tours() {
        let mut rng = create_rng(42);
        let mut one = vec![0];
        relocation_mutation(&mut one, line_distance, &mut rng);
        assert_eq!(one, vec![0]);

        let mut two = vec![1, 0];
        relocation_mutation(&mut two, line_distance, &mut rng);
        assert!(is_permutation(&two, 2));
    }

    // ---- Validity check ----

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[2, 0, 1], 3));
        assert!(is_permutation(&[], 0));
        assert!(!is_permutation(&[0, 0, 1], 3));
        assert!(!is_permutation(&[0, 1], 3));
        assert!(!is_permutation(&[0, 1, 3], 3));
    }

    // ---- Properties ----

    fn shuffled(n: usize, seed: u64) -> Vec<usize> {
        let mut v: Vec<usize> = (0..n).collect();
        crate::random::shuffle(&mut v, &mut create_rng(seed));
        v
    }

    proptest! {
        #[test]
        fn prop_crossover_then_mutation_is_permutation(
            n in 2usize..40,
            seed_a in any::<u64>(),
            seed_b in any::<u64>(),
            seed in any::<u64>(),
        ) {
            let a = shuffled(n, seed_a);
            let b = shuffled(n, seed_b);
            let mut rng = create_rng(seed);
            let mut child = segment_transfer_crossover(&a, &b, &mut rng);
            prop_assert!(is_permutation(&child, n));
            relocation_mutation(&mut child, line_distance, &mut rng);
            let mut sorted = child.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..n).collect::<Vec<_>>());
        }

        #[test]
        fn prop_two_point_crossover_conserves_bits(
            raw_a in proptest::collection::vec(any::<bool>(), 2..100),
            seed in any::<u64>(),
        ) {
            let a: BitString = raw_a.iter().copied().collect();
            let b: BitString = raw_a.iter().map(|x| !x).collect();
            let mut rng = create_rng(seed);
            let (c1, c2) = two_point_crossover(&a, &b, &mut rng);
            prop_assert_eq!(ones(&c1) + ones(&c2), ones(&a) + ones(&b));
        }
    }
}
