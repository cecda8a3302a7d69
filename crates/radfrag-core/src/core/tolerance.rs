use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Mass difference between the 13C and 12C isotopes, in daltons.
///
/// Used as the spacing between adjacent isotope peaks when modelling a
/// precursor whose monoisotopic peak was picked incorrectly.
pub const ISOTOPE_SPACING: f64 = 1.003_354_838_1;

const PPM_SCALE: f64 = 1e6;

// Relative widening of the pruning window. The bounds and `within` round
// differently at the window edge; every index inside is confirmed anyway.
const WINDOW_SLACK: f64 = 1e-12;

/// Relative (parts-per-million) mass tolerance with an optional allowance for
/// missed monoisotopic peaks.
///
/// Two masses are considered indistinguishable when their relative error,
/// measured against the reference mass, is within `ppm / 1e6`. When
/// `missed_monoisotopics` is `k > 0`, an observed mass also matches a reference
/// that is offset by `1..=k` isotope spacings, which models an instrument
/// reporting the wrong peak of the isotopic envelope.
///
/// A negative `ppm` is accepted and makes every pair of distinct masses
/// distinguishable; equal masses always match.
///
/// # Example
///
/// ```
/// use radfrag::core::tolerance::MassTolerance;
///
/// let tolerance = MassTolerance::ppm(10.0);
/// assert!(tolerance.within(1000.005, 1000.0));
/// assert!(!tolerance.within(1000.02, 1000.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassTolerance {
    ppm: f64,
    #[serde(default)]
    missed_monoisotopics: u32,
    #[serde(default = "default_isotope_spacing")]
    isotope_spacing: f64,
}

fn default_isotope_spacing() -> f64 {
    ISOTOPE_SPACING
}

impl MassTolerance {
    pub fn ppm(ppm: f64) -> Self {
        Self {
            ppm,
            missed_monoisotopics: 0,
            isotope_spacing: ISOTOPE_SPACING,
        }
    }

    pub fn with_missed_monoisotopics(self, missed_monoisotopics: u32) -> Self {
        Self {
            missed_monoisotopics,
            ..self
        }
    }

    pub fn with_isotope_spacing(self, isotope_spacing: f64) -> Self {
        Self {
            isotope_spacing,
            ..self
        }
    }

    pub fn ppm_value(&self) -> f64 {
        self.ppm
    }

    pub fn missed_monoisotopics(&self) -> u32 {
        self.missed_monoisotopics
    }

    /// The tolerance used for matching fragment masses: same ppm window, no
    /// isotope offsets.
    pub fn fragment_tolerance(&self) -> Self {
        Self {
            missed_monoisotopics: 0,
            ..*self
        }
    }

    /// Returns `true` if `observed` cannot be told apart from `reference`.
    #[inline]
    pub fn within(&self, observed: f64, reference: f64) -> bool {
        if observed == reference {
            return true;
        }
        if self.ppm < 0.0 {
            return false;
        }
        (0..=self.missed_monoisotopics).any(|i| {
            self.within_ppm(observed, reference + i as f64 * self.isotope_spacing)
        })
    }

    #[inline]
    fn within_ppm(&self, observed: f64, reference: f64) -> bool {
        (observed - reference).abs() / reference <= self.ppm / PPM_SCALE
    }

    /// Lowest observed mass that can match `mean` (the window at zero isotope
    /// offsets).
    pub fn minimum_value(&self, mean: f64) -> f64 {
        mean * (1.0 - self.window_fraction())
    }

    /// Highest observed mass that can match `mean` (the window at the largest
    /// allowed isotope offset).
    pub fn maximum_value(&self, mean: f64) -> f64 {
        let shifted = mean + self.missed_monoisotopics as f64 * self.isotope_spacing;
        shifted * (1.0 + self.window_fraction())
    }

    /// Narrows `sorted` (ascending by `mass_of`) to the index range whose
    /// masses could be `within` tolerance of `observed` when used as the
    /// reference.
    ///
    /// Every index outside the returned range is guaranteed not to match; the
    /// indices inside still have to be confirmed with [`within`](Self::within).
    pub fn search_window<T>(
        &self,
        sorted: &[T],
        observed: f64,
        mass_of: impl Fn(&T) -> f64,
    ) -> Range<usize> {
        let start = sorted.partition_point(|item| {
            self.maximum_value(mass_of(item)) * (1.0 + WINDOW_SLACK) < observed
        });
        let end = start
            + sorted[start..].partition_point(|item| {
                self.minimum_value(mass_of(item)) * (1.0 - WINDOW_SLACK) <= observed
            });
        start..end
    }

    // Negative tolerances still have to keep identical masses inside the
    // window, so the bounds never shrink below the mean itself.
    #[inline]
    fn window_fraction(&self) -> f64 {
        self.ppm.max(0.0) / PPM_SCALE
    }
}

impl Default for MassTolerance {
    fn default() -> Self {
        Self::ppm(10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn within_is_reflexive_for_non_negative_tolerances() {
        for ppm in [0.0, 1.0, 10.0, 1000.0] {
            let tolerance = MassTolerance::ppm(ppm).with_missed_monoisotopics(2);
            for value in [0.5, 100.0, 12_345.678, 80_000.0] {
                assert!(tolerance.within(value, value));
            }
        }
    }

    #[test]
    fn within_uses_relative_error_on_the_reference() {
        let tolerance = MassTolerance::ppm(10.0);
        assert!(tolerance.within(1000.01, 1000.0));
        assert!(tolerance.within(999.991, 1000.0));
        assert!(!tolerance.within(1000.011, 1000.0));
        assert!(!tolerance.within(999.989, 1000.0));
    }

    #[test]
    fn negative_tolerance_rejects_every_distinct_pair() {
        let tolerance = MassTolerance::ppm(-5.0).with_missed_monoisotopics(3);
        assert!(!tolerance.within(1000.0, 1000.000_001));
        assert!(!tolerance.within(1000.0 + ISOTOPE_SPACING, 1000.0));
        assert!(!tolerance.within(1.0, 2.0));
        assert!(tolerance.within(1000.0, 1000.0));
    }

    #[test]
    fn negative_tolerance_ignores_isotope_offsets() {
        let tolerance = MassTolerance::ppm(-1.0).with_missed_monoisotopics(2);
        for i in 1..=2 {
            let shifted = 2500.0 + i as f64 * ISOTOPE_SPACING;
            assert!(!tolerance.within(shifted, 2500.0));
        }
    }

    #[test]
    fn missed_monoisotopic_allowance_matches_isotope_offsets() {
        let base = MassTolerance::ppm(5.0);
        let with_two = base.with_missed_monoisotopics(2);
        let reference = 10_000.0;

        let one_off = reference + ISOTOPE_SPACING;
        let two_off = reference + 2.0 * ISOTOPE_SPACING;
        let three_off = reference + 3.0 * ISOTOPE_SPACING;

        assert!(!base.within(one_off, reference));
        assert!(with_two.within(one_off, reference));
        assert!(with_two.within(two_off, reference));
        assert!(!with_two.within(three_off, reference));
    }

    #[test]
    fn missed_monoisotopic_allowance_only_shifts_the_reference_upwards() {
        let tolerance = MassTolerance::ppm(5.0).with_missed_monoisotopics(1);
        assert!(!tolerance.within(10_000.0 - ISOTOPE_SPACING, 10_000.0));
    }

    #[test]
    fn window_bounds_cover_all_isotope_offsets() {
        let tolerance = MassTolerance::ppm(10.0).with_missed_monoisotopics(2);
        let mean = 1000.0;
        assert!(approx_eq(tolerance.minimum_value(mean), 999.99));
        let expected_max = (mean + 2.0 * ISOTOPE_SPACING) * (1.0 + 10.0 / 1e6);
        assert!(approx_eq(tolerance.maximum_value(mean), expected_max));
    }

    #[test]
    fn window_bounds_never_exclude_the_mean_for_negative_tolerances() {
        let tolerance = MassTolerance::ppm(-20.0);
        assert!(tolerance.minimum_value(500.0) <= 500.0);
        assert!(tolerance.maximum_value(500.0) >= 500.0);
    }

    #[test]
    fn fragment_tolerance_drops_isotope_offsets() {
        let tolerance = MassTolerance::ppm(10.0).with_missed_monoisotopics(3);
        let fragment = tolerance.fragment_tolerance();
        assert_eq!(fragment.missed_monoisotopics(), 0);
        assert_eq!(fragment.ppm_value(), 10.0);
    }

    #[test]
    fn search_window_prunes_to_matching_neighbourhood() {
        let tolerance = MassTolerance::ppm(10.0);
        let masses = [500.0, 999.0, 999.995, 1000.0, 1000.004, 1001.0, 1500.0];
        let window = tolerance.search_window(&masses, 1000.0, |m| *m);
        assert_eq!(window, 2..5);
        assert!(masses[window].iter().all(|&m| tolerance.within(1000.0, m)));
    }

    #[test]
    fn search_window_is_empty_when_nothing_is_close() {
        let tolerance = MassTolerance::ppm(10.0);
        let masses = [100.0, 200.0, 300.0];
        assert!(tolerance.search_window(&masses, 250.0, |m| *m).is_empty());
        assert!(tolerance.search_window(&masses, 50.0, |m| *m).is_empty());
        assert!(tolerance.search_window(&masses, 350.0, |m| *m).is_empty());
    }

    #[test]
    fn search_window_keeps_every_match_at_the_tolerance_edge() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20_000 {
            let ppm = rng.gen_range(0.1..50.0);
            let k = rng.gen_range(0..4u32);
            let reference = rng.gen_range(100.0..100_000.0);
            let tolerance = MassTolerance::ppm(ppm).with_missed_monoisotopics(k);
            let shifted = reference + k as f64 * ISOTOPE_SPACING;
            for observed in [
                reference * (1.0 - ppm / 1e6),
                shifted * (1.0 + ppm / 1e6),
            ] {
                if tolerance.within(observed, reference) {
                    let window = tolerance.search_window(&[reference], observed, |m| *m);
                    assert_eq!(
                        window,
                        0..1,
                        "ppm {} k {} reference {} observed {}",
                        ppm,
                        k,
                        reference,
                        observed
                    );
                }
            }
        }
    }

    #[test]
    fn search_window_includes_lighter_references_with_missed_monoisotopics() {
        let tolerance = MassTolerance::ppm(5.0).with_missed_monoisotopics(1);
        let masses = [5000.0 - ISOTOPE_SPACING, 5000.0];
        let window = tolerance.search_window(&masses, 5000.0, |m| *m);
        assert_eq!(window, 0..2);
    }
}
