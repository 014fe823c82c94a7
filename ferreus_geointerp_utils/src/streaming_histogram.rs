/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements a bounded-size streaming histogram supporting quantile queries.
//
// Created on: 21 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # streaming_histogram
//!
//! A compressed one-pass histogram after Ben-Haim & Tom-Tov (JMLR 11, 2010):
//! an ordered list of `(center, weight)` centroids bounded to a fixed count.
//! When a push would exceed the bound, the two closest centroids are merged
//! by a weight-preserving centroid combination. Quantiles are answered from
//! the cumulative trapezoid sums of the centroid sequence.

use serde::{Deserialize, Serialize};

/// Default maximum number of centroids per histogram.
pub const DEFAULT_BIN_COUNT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Centroid {
    center: f64,
    weight: f64,
}

/// A bounded streaming histogram of weighted samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingHistogram {
    bins: Vec<Centroid>,
    bin_count: usize,
    count: u64,
    min: f64,
    max: f64,
}

impl Default for StreamingHistogram {
    fn default() -> Self {
        Self::new(DEFAULT_BIN_COUNT)
    }
}

impl StreamingHistogram {
    /// Creates an empty histogram bounded to `bin_count` centroids.
    pub fn new(bin_count: usize) -> Self {
        assert!(bin_count >= 2, "a histogram needs at least two centroids");
        Self {
            bins: Vec::new(),
            bin_count,
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Resets the histogram to the empty state, keeping the bound.
    pub fn clear(&mut self) {
        self.bins.clear();
        self.count = 0;
        self.min = f64::INFINITY;
        self.max = f64::NEG_INFINITY;
    }

    /// Maximum number of centroids retained.
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Number of samples pushed.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of sample weights.
    pub fn sum_of_weights(&self) -> f64 {
        self.bins.iter().map(|b| b.weight).sum()
    }

    /// Smallest sample, or NaN when empty.
    pub fn min(&self) -> f64 {
        match self.count == 0 {
            true => f64::NAN,
            false => self.min,
        }
    }

    /// Largest sample, or NaN when empty.
    pub fn max(&self) -> f64 {
        match self.count == 0 {
            true => f64::NAN,
            false => self.max,
        }
    }

    /// Adds a sample with the given weight.
    pub fn push(&mut self, value: f64, weight: f64) {
        if weight <= 0.0 {
            return;
        }
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);

        let index = self.bins.partition_point(|b| b.center < value);
        if index < self.bins.len() && self.bins[index].center == value {
            self.bins[index].weight += weight;
            return;
        }
        self.bins.insert(
            index,
            Centroid {
                center: value,
                weight,
            },
        );
        if self.bins.len() > self.bin_count {
            self.compress();
        }
    }

    /// Merges another histogram into this one. The merge preserves the total
    /// weight and is associative up to centroid compression.
    pub fn merge(&mut self, other: &Self) {
        for bin in &other.bins {
            let index = self.bins.partition_point(|b| b.center < bin.center);
            if index < self.bins.len() && self.bins[index].center == bin.center {
                self.bins[index].weight += bin.weight;
            } else {
                self.bins.insert(index, *bin);
                if self.bins.len() > self.bin_count {
                    self.compress();
                }
            }
        }
        self.count += other.count;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Weighted mean of the stored distribution, or NaN when empty.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        let mut sum = 0.0;
        let mut weight = 0.0;
        for bin in &self.bins {
            sum += bin.center * bin.weight;
            weight += bin.weight;
        }
        sum / weight
    }

    /// Approximate weighted variance of the stored distribution.
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        let mean = self.mean();
        let mut sum = 0.0;
        let mut weight = 0.0;
        for bin in &self.bins {
            let delta = bin.center - mean;
            sum += delta * delta * bin.weight;
            weight += bin.weight;
        }
        sum / weight
    }

    /// Approximate quantile `q` in `[0, 1]` (Ben-Haim & Tom-Tov uniform
    /// procedure inverted for a single level).
    pub fn quantile(&self, q: f64) -> f64 {
        if self.count == 0 || !(0.0..=1.0).contains(&q) {
            return f64::NAN;
        }
        if self.bins.len() == 1 {
            return self.bins[0].center;
        }

        let total = self.sum_of_weights();
        let target = q * total;

        // Cumulative weight up to each centroid, counting half of the
        // centroid's own weight (trapezoid rule between adjacent centers).
        let mut cumulative = 0.0;
        let mut previous = 0.0;
        for i in 0..self.bins.len() {
            let here = cumulative + 0.5 * self.bins[i].weight;
            if target <= here {
                if i == 0 {
                    return self.min.max(self.bins[0].center
                        - (self.bins[0].center - self.min) * (here - target)
                            / here.max(f64::MIN_POSITIVE));
                }
                let span = here - previous;
                let fraction = match span > 0.0 {
                    true => (target - previous) / span,
                    false => 0.0,
                };
                return self.bins[i - 1].center
                    + (self.bins[i].center - self.bins[i - 1].center) * fraction;
            }
            cumulative += self.bins[i].weight;
            previous = here;
        }
        self.max
    }

    /// Merges the two closest adjacent centroids.
    fn compress(&mut self) {
        let mut best = 0;
        let mut best_gap = f64::INFINITY;
        for i in 0..self.bins.len() - 1 {
            let gap = self.bins[i + 1].center - self.bins[i].center;
            if gap < best_gap {
                best_gap = gap;
                best = i;
            }
        }

        let a = self.bins[best];
        let b = self.bins[best + 1];
        let weight = a.weight + b.weight;
        self.bins[best] = Centroid {
            center: (a.center * a.weight + b.center * b.weight) / weight,
            weight,
        };
        self.bins.remove(best + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn exact_when_under_the_bound() {
        let mut hist = StreamingHistogram::new(16);
        for v in [5.0, 1.0, 3.0, 2.0, 4.0] {
            hist.push(v, 1.0);
        }
        assert_eq!(hist.count(), 5);
        assert_eq!(hist.sum_of_weights(), 5.0);
        assert_eq!(hist.min(), 1.0);
        assert_eq!(hist.max(), 5.0);
        assert!((hist.mean() - 3.0).abs() < 1e-14);
        assert!((hist.quantile(0.5) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn weight_is_preserved_through_compression() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut hist = StreamingHistogram::new(8);
        let mut total = 0.0;
        for _ in 0..1000 {
            let w = rng.random_range(0.5..2.0);
            hist.push(rng.random_range(-1.0..1.0), w);
            total += w;
        }
        assert!(hist.bins.len() <= 8);
        assert!((hist.sum_of_weights() - total).abs() < 1e-9);
    }

    #[test]
    fn mean_survives_compression() {
        let mut rng = StdRng::seed_from_u64(11);
        let values: Vec<f64> = (0..2000).map(|_| rng.random_range(0.0..10.0)).collect();
        let mut hist = StreamingHistogram::new(32);
        for &v in &values {
            hist.push(v, 1.0);
        }
        let exact = values.iter().sum::<f64>() / values.len() as f64;
        assert!((hist.mean() - exact).abs() < 1e-9);
    }

    #[test]
    fn median_of_a_uniform_stream_is_close_to_half() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut hist = StreamingHistogram::new(64);
        for _ in 0..20000 {
            hist.push(rng.random_range(0.0..1.0), 1.0);
        }
        let median = hist.quantile(0.5);
        assert!((median - 0.5).abs() < 0.02, "median={}", median);
        let q10 = hist.quantile(0.1);
        assert!((q10 - 0.1).abs() < 0.02, "q10={}", q10);
        let q90 = hist.quantile(0.9);
        assert!((q90 - 0.9).abs() < 0.02, "q90={}", q90);
    }

    #[test]
    fn quantile_extremes_hit_the_sample_range() {
        let mut hist = StreamingHistogram::new(8);
        for v in [2.0, 7.0, 4.0, 9.0, 1.0] {
            hist.push(v, 1.0);
        }
        assert_eq!(hist.quantile(1.0), 9.0);
        assert!(hist.quantile(0.0) >= 1.0 - 1e-12);
        assert!(hist.quantile(0.0) <= 2.0);
    }

    #[test]
    fn merge_preserves_weight_and_bounds() {
        let mut rng = StdRng::seed_from_u64(33);
        let mut left = StreamingHistogram::new(16);
        let mut right = StreamingHistogram::new(16);
        for _ in 0..500 {
            left.push(rng.random_range(0.0..1.0), 1.0);
            right.push(rng.random_range(2.0..3.0), 1.0);
        }
        let total = left.sum_of_weights() + right.sum_of_weights();
        left.merge(&right);
        assert_eq!(left.count(), 1000);
        assert!((left.sum_of_weights() - total).abs() < 1e-9);
        assert!(left.min() < 1.0);
        assert!(left.max() >= 2.0);
        assert!(left.bins.len() <= 16);
    }

    #[test]
    fn invalid_quantile_level_yields_nan() {
        let mut hist = StreamingHistogram::default();
        hist.push(1.0, 1.0);
        assert!(hist.quantile(-0.1).is_nan());
        assert!(hist.quantile(1.1).is_nan());
    }

    #[test]
    fn empty_histogram_yields_nan_statistics() {
        let hist = StreamingHistogram::default();
        assert!(hist.mean().is_nan());
        assert!(hist.quantile(0.5).is_nan());
        assert!(hist.min().is_nan());
    }
}
