//! k-nearest inverse-distance-weighted elevation interpolation.
//!
//! Estimates the elevation at a query point from scattered
//! [`ElevationSample`]s. Only the `k` nearest samples contribute, so distant
//! contour lines do not wash out local detail.
//!
//! Every input has a defined numeric result; nothing here panics or returns
//! an error:
//!
//! | Situation | Result |
//! |-----------|--------|
//! | No samples | `0.0` |
//! | A neighbor within [`EXACT_MATCH_DISTANCE`] | that sample's elevation |
//! | A neighbor whose weight overflows to `+inf` | the nearest such sample's elevation |
//! | Weight sum zero or non-finite | elevation of the nearest neighbor |
//! | Otherwise | `Σ wᵢ·eᵢ / Σ wᵢ` with `wᵢ = 1 / dᵢ^power` |
//!
//! # Example
//!
//! ```
//! use geosample::{ElevationSample, IdwInterpolator};
//!
//! let samples = [
//!     ElevationSample::new(1.0, 0.0, 10.0),
//!     ElevationSample::new(-1.0, 0.0, 20.0),
//! ];
//! let idw = IdwInterpolator::new(2, 2.0);
//! assert!((idw.interpolate(0.0, 0.0, &samples) - 15.0).abs() < 1e-9);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::{ElevationSample, LocalPoint};

/// Default number of neighbors.
pub const DEFAULT_K: usize = 8;

/// Default distance exponent (inverse-square falloff).
pub const DEFAULT_POWER: f64 = 2.0;

/// Distance in meters under which a query is treated as hitting a sample.
pub const EXACT_MATCH_DISTANCE: f64 = 0.001;

/// Elevation returned when there are no samples at all.
pub const NO_DATA_ELEVATION: f64 = 0.0;

/// Estimate the elevation at `(x, y)` from `samples`.
///
/// # Arguments
///
/// * `x`, `y` - Query point on the local plane, in meters
/// * `samples` - Known elevations; may be empty
/// * `k` - Number of nearest samples to use (all of them if fewer exist;
///   0 is treated as 1)
/// * `power` - Distance exponent
///
/// # Returns
///
/// The estimated elevation in meters. See the module docs for the fallbacks.
pub fn interpolate_elevation(
    x: f64,
    y: f64,
    samples: &[ElevationSample],
    k: usize,
    power: f64,
) -> f64 {
    if samples.is_empty() {
        return NO_DATA_ELEVATION;
    }

    let neighbors = nearest_neighbors(x, y, samples, k);

    // Sorted ascending, so the first hit is the closest one
    if let Some(&(_, i)) = neighbors.iter().find(|(d, _)| *d < EXACT_MATCH_DISTANCE) {
        return samples[i].elevation;
    }

    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for &(distance, i) in &neighbors {
        if !distance.is_finite() {
            continue;
        }
        let weight = 1.0 / distance.powf(power);
        if weight == f64::INFINITY {
            // d^power underflowed; this neighbor outweighs every other one
            return samples[i].elevation;
        }
        if weight.is_nan() {
            continue;
        }
        weighted_sum += weight * samples[i].elevation;
        weight_sum += weight;
    }

    if weight_sum > 0.0 && weight_sum.is_finite() {
        weighted_sum / weight_sum
    } else {
        samples[neighbors[0].1].elevation
    }
}

/// Distances and indices of the `k` nearest samples, nearest first.
///
/// NaN distances (degenerate coordinates) are treated as infinitely far.
/// Equal distances keep input order. `samples` must not be empty.
fn nearest_neighbors(x: f64, y: f64, samples: &[ElevationSample], k: usize) -> Vec<(f64, usize)> {
    let k = k.max(1);

    let mut candidates: Vec<(f64, usize)> = samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let d = s.distance_to(x, y);
            (if d.is_nan() { f64::INFINITY } else { d }, i)
        })
        .collect();

    let by_distance =
        |a: &(f64, usize), b: &(f64, usize)| -> Ordering { a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)) };

    if k < candidates.len() {
        candidates.select_nth_unstable_by(k - 1, by_distance);
        candidates.truncate(k);
    }
    candidates.sort_unstable_by(by_distance);
    candidates
}

/// Interpolation parameters bundled for repeated use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdwInterpolator {
    /// Number of nearest samples used per query.
    pub k: usize,
    /// Distance exponent.
    pub power: f64,
}

impl Default for IdwInterpolator {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            power: DEFAULT_POWER,
        }
    }
}

impl IdwInterpolator {
    pub fn new(k: usize, power: f64) -> Self {
        Self { k, power }
    }

    /// Estimate the elevation at `(x, y)`. See [`interpolate_elevation`].
    pub fn interpolate(&self, x: f64, y: f64, samples: &[ElevationSample]) -> f64 {
        interpolate_elevation(x, y, samples, self.k, self.power)
    }

    /// Estimate the elevation at a local point.
    pub fn interpolate_point(&self, point: LocalPoint, samples: &[ElevationSample]) -> f64 {
        self.interpolate(point.x, point.y, samples)
    }

    /// Estimate elevations for many points, in input order.
    ///
    /// Queries are independent; with the `parallel` feature they run on the
    /// rayon thread pool.
    pub fn interpolate_many(&self, points: &[LocalPoint], samples: &[ElevationSample]) -> Vec<f64> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            points
                .par_iter()
                .map(|p| self.interpolate_point(*p, samples))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            points
                .iter()
                .map(|p| self.interpolate_point(*p, samples))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64, y: f64, e: f64) -> ElevationSample {
        ElevationSample::new(x, y, e)
    }

    #[test]
    fn test_empty_samples_return_zero() {
        for (x, y) in [(0.0, 0.0), (1e6, -1e6), (f64::NAN, 3.0)] {
            assert_eq!(interpolate_elevation(x, y, &[], DEFAULT_K, DEFAULT_POWER), 0.0);
        }
        assert_eq!(IdwInterpolator::default().interpolate(5.0, 5.0, &[]), 0.0);
    }

    #[test]
    fn test_symmetric_pair_is_mean() {
        let samples = [sample(1.0, 0.0, 10.0), sample(-1.0, 0.0, 20.0)];
        let e = interpolate_elevation(0.0, 0.0, &samples, 2, 2.0);
        assert!((14.9..=15.1).contains(&e), "e = {}", e);
    }

    #[test]
    fn test_exact_match_returns_sample() {
        let samples = [
            sample(0.0, 0.0, 100.0),
            sample(10.0, 0.0, 200.0),
            sample(0.0, 10.0, 300.0),
            sample(-7.5, 3.25, 412.5),
        ];
        for s in &samples {
            assert_eq!(
                interpolate_elevation(s.x, s.y, &samples, DEFAULT_K, DEFAULT_POWER),
                s.elevation
            );
        }

        // Within the tolerance still counts as a hit
        let e = interpolate_elevation(10.0005, 0.0, &samples, DEFAULT_K, DEFAULT_POWER);
        assert_eq!(e, 200.0);
    }

    #[test]
    fn test_exact_match_prefers_closest() {
        let samples = [sample(0.0009, 0.0, 1.0), sample(0.0001, 0.0, 2.0)];
        assert_eq!(interpolate_elevation(0.0, 0.0, &samples, 8, 2.0), 2.0);
    }

    #[test]
    fn test_fewer_samples_than_k() {
        let samples = [sample(3.0, 0.0, 30.0)];
        assert_eq!(interpolate_elevation(0.0, 0.0, &samples, 8, 2.0), 30.0);

        let samples = [sample(2.0, 0.0, 10.0), sample(-2.0, 0.0, 10.0)];
        assert!((interpolate_elevation(0.0, 1.0, &samples, 8, 2.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_only_k_nearest_contribute() {
        let samples = [
            sample(1.0, 0.0, 10.0),
            sample(-1.0, 0.0, 10.0),
            sample(500.0, 500.0, 10_000.0),
        ];
        assert!((interpolate_elevation(0.0, 0.0, &samples, 2, 2.0) - 10.0).abs() < 1e-12);

        // With k = 3 the far sample pulls the estimate up
        assert!(interpolate_elevation(0.0, 0.0, &samples, 3, 2.0) > 10.0);
    }

    #[test]
    fn test_k_zero_uses_nearest() {
        let samples = [sample(1.0, 0.0, 10.0), sample(5.0, 0.0, 50.0)];
        assert_eq!(interpolate_elevation(0.0, 0.0, &samples, 0, 2.0), 10.0);
    }

    #[test]
    fn test_weighting_favors_closer_samples() {
        let samples = [sample(1.0, 0.0, 0.0), sample(-3.0, 0.0, 100.0)];
        // w = 1 and 1/9 → 100 * (1/9) / (10/9) = 10
        let e = interpolate_elevation(0.0, 0.0, &samples, 2, 2.0);
        assert!((e - 10.0).abs() < 1e-9, "e = {}", e);

        // Power 1: w = 1 and 1/3 → 100 * (1/3) / (4/3) = 25
        let e = interpolate_elevation(0.0, 0.0, &samples, 2, 1.0);
        assert!((e - 25.0).abs() < 1e-9, "e = {}", e);

        // Power 0 is a plain mean
        let e = interpolate_elevation(0.0, 0.0, &samples, 2, 0.0);
        assert!((e - 50.0).abs() < 1e-9, "e = {}", e);
    }

    #[test]
    fn test_result_within_sample_range() {
        let samples: Vec<_> = (0..20)
            .map(|i| {
                let a = i as f64 * 0.7;
                sample(a.cos() * 40.0, a.sin() * 25.0, 100.0 + (i * 13 % 50) as f64)
            })
            .collect();
        let lo = samples.iter().map(|s| s.elevation).fold(f64::INFINITY, f64::min);
        let hi = samples
            .iter()
            .map(|s| s.elevation)
            .fold(f64::NEG_INFINITY, f64::max);

        for (x, y) in [(0.0, 0.0), (12.5, -3.0), (-100.0, 80.0)] {
            let e = interpolate_elevation(x, y, &samples, DEFAULT_K, DEFAULT_POWER);
            assert!(e >= lo && e <= hi, "e = {}", e);
        }
    }

    #[test]
    fn test_degenerate_coordinates_fall_back() {
        // All distances NaN → treated as infinite → zero weights
        let samples = [sample(f64::NAN, 0.0, 42.0), sample(f64::NAN, 1.0, 99.0)];
        assert_eq!(interpolate_elevation(0.0, 0.0, &samples, 8, 2.0), 42.0);

        // NaN query point behaves the same
        let samples = [sample(1.0, 0.0, 7.0), sample(2.0, 0.0, 8.0)];
        assert_eq!(interpolate_elevation(f64::NAN, 0.0, &samples, 8, 2.0), 7.0);
    }

    #[test]
    fn test_degenerate_sample_ignored_among_valid() {
        let samples = [
            sample(f64::NAN, f64::NAN, 1_000.0),
            sample(1.0, 0.0, 10.0),
            sample(-1.0, 0.0, 20.0),
        ];
        let e = interpolate_elevation(0.0, 0.0, &samples, 8, 2.0);
        assert!((e - 15.0).abs() < 1e-9, "e = {}", e);

        // With k = 2 the degenerate sample is never selected
        let e = interpolate_elevation(0.0, 0.0, &samples, 2, 2.0);
        assert!((e - 15.0).abs() < 1e-9, "e = {}", e);
    }

    #[test]
    fn test_overflowing_weight_dominates() {
        // 0.01^200 underflows to zero, so the near sample's weight is infinite
        let samples = [sample(0.01, 0.0, 100.0), sample(1.0, 0.0, 50.0)];
        assert_eq!(interpolate_elevation(0.0, 0.0, &samples, 8, 200.0), 100.0);
        assert_eq!(interpolate_elevation(0.0, 0.0, &samples, 8, 100.0), 100.0);

        // Farther samples listed first do not change which one wins
        let samples = [
            sample(2.0, 0.0, 10.0),
            sample(0.0, 0.02, 80.0),
            sample(0.01, 0.0, 100.0),
        ];
        assert_eq!(interpolate_elevation(0.0, 0.0, &samples, 8, 400.0), 100.0);
    }

    #[test]
    fn test_non_finite_power_falls_back_to_nearest() {
        let samples = [sample(3.0, 0.0, 100.0), sample(4.0, 0.0, 50.0)];
        for power in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let z = interpolate_elevation(0.0, 0.0, &samples, 8, power);
            assert_eq!(z, 100.0, "power {}", power);
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let samples = [
            sample(1.0, 0.0, 1.0),
            sample(0.0, 1.0, 2.0),
            sample(-1.0, 0.0, 3.0),
            sample(0.0, -1.0, 4.0),
        ];
        let neighbors = nearest_neighbors(0.0, 0.0, &samples, 2);
        assert_eq!(neighbors.iter().map(|n| n.1).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_interpolate_many_preserves_order() {
        let samples = [
            sample(0.0, 0.0, 0.0),
            sample(10.0, 0.0, 100.0),
            sample(0.0, 10.0, 50.0),
        ];
        let points = [
            LocalPoint::new(10.0, 0.0),
            LocalPoint::new(0.0, 0.0),
            LocalPoint::new(0.0, 10.0),
            LocalPoint::new(4.0, 4.0),
        ];
        let idw = IdwInterpolator::default();
        let out = idw.interpolate_many(&points, &samples);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], 100.0);
        assert_eq!(out[1], 0.0);
        assert_eq!(out[2], 50.0);
        assert_eq!(out[3], idw.interpolate_point(points[3], &samples));
    }
}
