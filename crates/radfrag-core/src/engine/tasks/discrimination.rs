use super::grouping::AmbiguityGroup;
use crate::core::models::candidate::PrecursorCandidate;
use crate::core::models::result::DiscriminationResult;
use crate::core::tolerance::MassTolerance;
use crate::engine::config::SearchLimits;
use itertools::Itertools;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use tracing::debug;

/// Fixed-width set of competitor positions.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CompetitorSet {
    words: Vec<u64>,
}

impl CompetitorSet {
    fn empty(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
        }
    }

    fn full(len: usize) -> Self {
        let mut set = Self::empty(len);
        for i in 0..len {
            set.insert(i);
        }
        set
    }

    fn insert(&mut self, index: usize) {
        self.words[index / 64] |= 1 << (index % 64);
    }

    fn intersection(&self, other: &Self) -> Self {
        Self {
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| a & b)
                .collect(),
        }
    }

    fn is_disjoint(&self, other: &Self) -> bool {
        self.words.iter().zip(&other.words).all(|(a, b)| a & b == 0)
    }

    fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}

/// Which competitors match each target fragment.
struct MatchTable {
    matches: Vec<CompetitorSet>,
    competitor_count: usize,
}

impl MatchTable {
    fn build(
        fragments: &[f64],
        competitors: &[&PrecursorCandidate],
        tolerance: &MassTolerance,
    ) -> Self {
        let matches = fragments
            .iter()
            .map(|&fragment| {
                let mut set = CompetitorSet::empty(competitors.len());
                for (i, competitor) in competitors.iter().enumerate() {
                    if competitor.contains_within(fragment, tolerance) {
                        set.insert(i);
                    }
                }
                set
            })
            .collect();
        Self {
            matches,
            competitor_count: competitors.len(),
        }
    }

    fn sharing_count(&self, fragment: usize) -> usize {
        self.matches[fragment].count()
    }

    /// `true` if some fragment is matched by none of `survivors`.
    fn has_fragment_unmatched_by(&self, survivors: &CompetitorSet) -> bool {
        self.matches.iter().any(|m| m.is_disjoint(survivors))
    }
}

/// Yields the `k`-subsets of `0..weights.len()` in order of ascending weight
/// sum. `weights` must be sorted ascending.
///
/// Subsets are discovered best-first from a heap: the lightest subset is
/// `[0, 1, .., k-1]` and each popped subset pushes the subsets reached by
/// moving one of its elements a single position right.
struct CombinationsByWeight<'w> {
    weights: &'w [usize],
    heap: BinaryHeap<Reverse<(usize, Vec<usize>)>>,
    seen: HashSet<Vec<usize>>,
}

impl<'w> CombinationsByWeight<'w> {
    fn new(weights: &'w [usize], k: usize) -> Self {
        let mut heap = BinaryHeap::new();
        let mut seen = HashSet::new();
        if k > 0 && k <= weights.len() {
            let first: Vec<usize> = (0..k).collect();
            let weight = first.iter().map(|&i| weights[i]).sum();
            seen.insert(first.clone());
            heap.push(Reverse((weight, first)));
        }
        Self {
            weights,
            heap,
            seen,
        }
    }
}

impl Iterator for CombinationsByWeight<'_> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let Reverse((weight, combination)) = self.heap.pop()?;
        let n = self.weights.len();
        for i in 0..combination.len() {
            let limit = combination.get(i + 1).copied().unwrap_or(n);
            if combination[i] + 1 < limit {
                let mut next = combination.clone();
                next[i] += 1;
                if self.seen.insert(next.clone()) {
                    let next_weight =
                        weight - self.weights[combination[i]] + self.weights[next[i]];
                    self.heap.push(Reverse((next_weight, next)));
                }
            }
        }
        Some(combination)
    }
}

/// `true` if some fragment matches nothing in the merged, sorted competitor
/// fragment list.
fn has_owned_fragment(
    fragments: &[f64],
    competitors: &[&PrecursorCandidate],
    tolerance: &MassTolerance,
) -> bool {
    let mut merged: Vec<f64> = competitors
        .iter()
        .flat_map(|c| c.fragment_set().iter().copied())
        .collect();
    merged.sort_unstable_by(f64::total_cmp);

    fragments.iter().any(|&fragment| {
        let window = tolerance.search_window(&merged, fragment, |m| *m);
        !merged[window]
            .iter()
            .any(|&other| tolerance.within(fragment, other))
    })
}

/// Repeatedly takes the fragment shared by the fewest remaining competitors.
fn greedy_cover(table: &MatchTable) -> i32 {
    let mut remaining = CompetitorSet::full(table.competitor_count);
    let mut used = vec![false; table.matches.len()];
    let mut chosen = 0;

    loop {
        let best = table
            .matches
            .iter()
            .enumerate()
            .filter(|&(f, _)| !used[f])
            .map(|(f, m)| (m.intersection(&remaining).count(), f))
            .min();
        let Some((survivors, fragment)) = best else {
            return -1;
        };
        if survivors == remaining.count() {
            return -1;
        }
        used[fragment] = true;
        remaining = remaining.intersection(&table.matches[fragment]);
        chosen += 1;
        if remaining.is_empty() {
            return chosen;
        }
    }
}

fn best_of(a: i32, b: Option<i32>) -> i32 {
    match b {
        Some(b) if a < 0 || b < a => b,
        _ => a,
    }
}

/// Smallest number of target fragment masses that, observed together, rule
/// out every competitor.
///
/// Returns `0` without competitors and `-1` when no set of the target's
/// fragments can separate it from them. Inputs larger than `limits` are
/// answered by a greedy cover, which may overestimate.
pub fn min_fragments_to_differentiate(
    target_fragments: &[f64],
    competitors: &[&PrecursorCandidate],
    tolerance: &MassTolerance,
    limits: &SearchLimits,
) -> i32 {
    if competitors.is_empty() {
        return 0;
    }
    let fragments: Vec<f64> = target_fragments
        .iter()
        .copied()
        .unique_by(|f| f.to_bits())
        .collect();

    if has_owned_fragment(&fragments, competitors, tolerance) {
        return 1;
    }

    let table = MatchTable::build(&fragments, competitors, tolerance);
    let pool: Vec<usize> = (0..fragments.len())
        .filter(|&f| table.sharing_count(f) < table.competitor_count)
        .sorted_by_key(|&f| table.sharing_count(f))
        .collect();
    if pool.is_empty() {
        return -1;
    }

    if pool.len() > limits.max_exhaustive_pool {
        debug!(
            pool = pool.len(),
            limit = limits.max_exhaustive_pool,
            "Fragment pool too large for exhaustive search, using greedy cover."
        );
        return greedy_cover(&table);
    }

    let weights: Vec<usize> = pool.iter().map(|&f| table.sharing_count(f)).collect();
    for k in 2..=pool.len() {
        let mut next_size = None;
        for (examined, combination) in CombinationsByWeight::new(&weights, k).enumerate() {
            if examined >= limits.max_combinations_per_size {
                debug!(
                    size = k,
                    limit = limits.max_combinations_per_size,
                    "Combination limit reached, using greedy cover."
                );
                return best_of(greedy_cover(&table), next_size);
            }

            let survivors = combination
                .iter()
                .fold(CompetitorSet::full(table.competitor_count), |acc, &j| {
                    acc.intersection(&table.matches[pool[j]])
                });
            if survivors.is_empty() {
                return k as i32;
            }
            if next_size.is_none() && table.has_fragment_unmatched_by(&survivors) {
                next_size = Some(k as i32 + 1);
            }
        }
        if let Some(size) = next_size {
            return size;
        }
    }
    -1
}

/// Orders `target_fragments` so the fragments shared by the fewest
/// competitors come first. Ties keep their input order.
pub fn rank_by_rarity(
    target_fragments: &[f64],
    competitors: &[&PrecursorCandidate],
    tolerance: &MassTolerance,
) -> Vec<f64> {
    let table = MatchTable::build(target_fragments, competitors, tolerance);
    (0..target_fragments.len())
        .sorted_by_key(|&f| table.sharing_count(f))
        .map(|f| target_fragments[f])
        .collect()
}

/// Runs the fragment search for one ambiguity group. Fragments are matched
/// with the fragment tolerance, without isotope offsets.
pub fn discriminate(
    group: &AmbiguityGroup<'_>,
    tolerance: &MassTolerance,
    limits: &SearchLimits,
) -> DiscriminationResult {
    let target = group.target;
    let fragment_tolerance = tolerance.fragment_tolerance();
    let fragments_needed = if group.competitors.is_empty() {
        0
    } else {
        let ranked = rank_by_rarity(
            target.fragment_set(),
            &group.competitors,
            &fragment_tolerance,
        );
        min_fragments_to_differentiate(&ranked, &group.competitors, &fragment_tolerance, limits)
    };

    DiscriminationResult {
        accession: target.identity().clone(),
        sequence_key: target.sequence_key().to_string(),
        competitor_count: group.competitors.len(),
        fragments_available: target.fragments_available(),
        fragments_needed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn candidate(accession: &str, fragments: &[f64]) -> PrecursorCandidate {
        PrecursorCandidate::new(accession, accession, 1000.0, fragments.to_vec())
    }

    fn needed(target: &[f64], competitors: &[&[f64]]) -> i32 {
        let owned: Vec<PrecursorCandidate> = competitors
            .iter()
            .enumerate()
            .map(|(i, f)| candidate(&format!("C{}", i), f))
            .collect();
        let refs: Vec<&PrecursorCandidate> = owned.iter().collect();
        min_fragments_to_differentiate(
            target,
            &refs,
            &MassTolerance::ppm(10.0),
            &SearchLimits::default(),
        )
    }

    // -1 means "never", so it ranks after every positive count.
    fn difficulty(needed: i32) -> i64 {
        if needed < 0 { i64::MAX } else { needed as i64 }
    }

    #[test]
    fn no_competitors_need_no_fragments() {
        assert_eq!(needed(&[100.0, 200.0, 300.0], &[]), 0);
    }

    #[test]
    fn identical_fragments_are_indistinguishable() {
        assert_eq!(needed(&[100.0, 200.0, 300.0], &[&[100.0, 200.0, 300.0]]), -1);
    }

    #[test]
    fn an_owned_fragment_needs_one() {
        assert_eq!(needed(&[100.0, 200.0, 300.0], &[&[100.0, 200.0, 350.0]]), 1);
        assert_eq!(
            needed(
                &[100.0, 200.0, 300.0],
                &[&[150.0, 250.0, 350.0], &[100.0, 250.0, 350.0]]
            ),
            1
        );
    }

    #[test]
    fn complementary_competitors_need_a_pair() {
        assert_eq!(
            needed(
                &[100.0, 200.0, 300.0],
                &[&[100.0, 200.0, 350.0], &[100.0, 250.0, 300.0]]
            ),
            2
        );
    }

    #[test]
    fn three_competitors_can_need_three_fragments() {
        // Every pair of target fragments is shared by one competitor.
        let target = [100.0, 200.0, 300.0];
        assert_eq!(
            needed(
                &target,
                &[&[100.0, 200.0], &[200.0, 300.0], &[100.0, 300.0]]
            ),
            3
        );
    }

    #[test]
    fn fragment_matching_uses_the_tolerance() {
        assert_eq!(needed(&[100.0, 200.0], &[&[100.0005, 200.001]]), -1);
        assert_eq!(needed(&[100.0, 200.0], &[&[100.0005, 200.01]]), 1);
    }

    #[test]
    fn target_without_fragments_is_indistinguishable() {
        assert_eq!(needed(&[], &[&[100.0]]), -1);
    }

    #[test]
    fn enumerator_yields_each_subset_once_in_weight_order() {
        let weights = [0, 1, 1, 3];
        let combinations: Vec<Vec<usize>> = CombinationsByWeight::new(&weights, 2).collect();
        assert_eq!(combinations.len(), 6);
        let unique: HashSet<_> = combinations.iter().cloned().collect();
        assert_eq!(unique.len(), 6);
        let sums: Vec<usize> = combinations
            .iter()
            .map(|c| c.iter().map(|&i| weights[i]).sum())
            .collect();
        assert!(sums.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(combinations[0], vec![0, 1]);
    }

    #[test]
    fn enumerator_handles_out_of_range_sizes() {
        assert_eq!(CombinationsByWeight::new(&[1, 2], 3).count(), 0);
        assert_eq!(CombinationsByWeight::new(&[1, 2], 0).count(), 0);
    }

    #[test]
    fn rank_by_rarity_puts_unshared_fragments_first() {
        let competitors = [candidate("C0", &[100.0, 200.0]), candidate("C1", &[100.0])];
        let refs: Vec<&PrecursorCandidate> = competitors.iter().collect();
        let ranked = rank_by_rarity(&[100.0, 200.0, 300.0], &refs, &MassTolerance::ppm(10.0));
        assert_eq!(ranked, vec![300.0, 200.0, 100.0]);
    }

    fn random_fragments(rng: &mut StdRng) -> Vec<f64> {
        (1..=8)
            .filter(|_| rng.gen_bool(0.6))
            .map(|i| i as f64 * 100.0)
            .collect()
    }

    #[test]
    fn ranking_and_competitor_growth_behave() {
        let mut rng = StdRng::seed_from_u64(7);
        let tolerance = MassTolerance::ppm(10.0);
        let limits = SearchLimits::default();

        for _ in 0..50 {
            let target = random_fragments(&mut rng);
            let competitors: Vec<PrecursorCandidate> = (0..5)
                .map(|i| candidate(&format!("C{}", i), &random_fragments(&mut rng)))
                .collect();
            let refs: Vec<&PrecursorCandidate> = competitors.iter().collect();

            let mut previous = 0;
            for size in 0..=refs.len() {
                let current =
                    min_fragments_to_differentiate(&target, &refs[..size], &tolerance, &limits);
                assert!(difficulty(current) >= difficulty(previous));
                previous = current;
            }

            let ranked = rank_by_rarity(&target, &refs, &tolerance);
            assert_eq!(
                min_fragments_to_differentiate(&ranked, &refs, &tolerance, &limits),
                previous
            );
        }
    }

    #[test]
    fn greedy_fallback_is_an_upper_bound() {
        let mut rng = StdRng::seed_from_u64(11);
        let tolerance = MassTolerance::ppm(10.0);
        let exhaustive = SearchLimits::default();
        let greedy_only = SearchLimits {
            max_exhaustive_pool: 0,
            ..SearchLimits::default()
        };

        for _ in 0..50 {
            let target = random_fragments(&mut rng);
            let competitors: Vec<PrecursorCandidate> = (0..4)
                .map(|i| candidate(&format!("C{}", i), &random_fragments(&mut rng)))
                .collect();
            let refs: Vec<&PrecursorCandidate> = competitors.iter().collect();

            let exact = min_fragments_to_differentiate(&target, &refs, &tolerance, &exhaustive);
            let bound = min_fragments_to_differentiate(&target, &refs, &tolerance, &greedy_only);
            assert!(difficulty(bound) >= difficulty(exact));
            assert_eq!(exact < 0, bound < 0);
        }
    }

    #[test]
    fn combination_limit_still_returns_an_answer() {
        let limits = SearchLimits {
            max_exhaustive_pool: 24,
            max_combinations_per_size: 1,
        };
        let competitors = [
            candidate("C0", &[100.0, 200.0]),
            candidate("C1", &[200.0, 300.0]),
            candidate("C2", &[100.0, 300.0]),
        ];
        let refs: Vec<&PrecursorCandidate> = competitors.iter().collect();
        let result = min_fragments_to_differentiate(
            &[100.0, 200.0, 300.0],
            &refs,
            &MassTolerance::ppm(10.0),
            &limits,
        );
        assert_eq!(result, 3);
    }

    #[test]
    fn discriminate_fills_the_result_record() {
        let target = PrecursorCandidate::new("T", "TARGET", 1000.0, vec![100.0, 200.0, 300.0]);
        let rival = PrecursorCandidate::new("R", "RIVAL", 1000.0, vec![100.0, 200.0, 350.0]);
        let group = AmbiguityGroup {
            target: &target,
            competitors: vec![&rival],
        };
        let result = discriminate(
            &group,
            &MassTolerance::ppm(10.0).with_missed_monoisotopics(2),
            &SearchLimits::default(),
        );
        assert_eq!(result.accession.as_str(), "T");
        assert_eq!(result.sequence_key, "TARGET");
        assert_eq!(result.competitor_count, 1);
        assert_eq!(result.fragments_available, 3);
        assert_eq!(result.fragments_needed, 1);
    }
}
