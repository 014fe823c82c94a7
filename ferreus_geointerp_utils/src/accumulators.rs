/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements streaming weighted central-moment accumulators for binned statistics.
//
// Created on: 21 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # accumulators
//!
//! Incremental univariate statistics with arbitrary weights, maintained with
//! the numerically stable recurrences of Pébay et al. (Comput Stat 31,
//! 1305-1325, 2016). Central moments up to order four are kept, so mean,
//! variance, skewness and kurtosis can be extracted at any time, and two
//! accumulators can be merged without revisiting their samples.

use serde::{Deserialize, Serialize};

/// Streaming weighted statistics for one variable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Accumulators {
    count: u64,
    sum_of_weights: f64,
    mean: f64,
    min: f64,
    max: f64,
    sum: f64,
    mom2: f64,
    mom3: f64,
    mom4: f64,
}

impl Default for Accumulators {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulators {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            sum_of_weights: 0.0,
            mean: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
            mom2: 0.0,
            mom3: 0.0,
            mom4: 0.0,
        }
    }

    /// Resets the accumulator to the empty state.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Adds a sample with unit weight.
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.push_weighted(value, 1.0);
    }

    /// Adds a sample with the given weight.
    #[inline]
    pub fn push_weighted(&mut self, value: f64, weight: f64) {
        self.merge(&Self {
            count: 1,
            sum_of_weights: weight,
            mean: value,
            min: value,
            max: value,
            sum: value * weight,
            mom2: 0.0,
            mom3: 0.0,
            mom4: 0.0,
        });
    }

    /// Merges another accumulator into this one (Pébay pairwise update).
    pub fn merge(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }

        let w_a = self.sum_of_weights;
        let w_b = other.sum_of_weights;
        let w = w_a + w_b;
        let delta = other.mean - self.mean;
        let delta_w = delta / w;

        let mom4 = self.mom4
            + other.mom4
            + delta.powi(4) * w_a * w_b * (w_a * w_a - w_a * w_b + w_b * w_b) / (w * w * w)
            + 6.0 * delta_w * delta_w * (w_a * w_a * other.mom2 + w_b * w_b * self.mom2)
            + 4.0 * delta_w * (w_a * other.mom3 - w_b * self.mom3);

        let mom3 = self.mom3
            + other.mom3
            + delta.powi(3) * w_a * w_b * (w_a - w_b) / (w * w)
            + 3.0 * delta_w * (w_a * other.mom2 - w_b * self.mom2);

        let mom2 = self.mom2 + other.mom2 + delta * delta * w_a * w_b / w;

        self.count += other.count;
        self.sum_of_weights = w;
        self.mean += delta * w_b / w;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.mom2 = mom2;
        self.mom3 = mom3;
        self.mom4 = mom4;
    }

    /// Number of samples pushed.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of the sample weights.
    pub fn sum_of_weights(&self) -> f64 {
        self.sum_of_weights
    }

    /// Weighted sum of the samples.
    pub fn sum(&self) -> f64 {
        self.sum
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

    /// Weighted mean, or NaN when empty.
    pub fn mean(&self) -> f64 {
        match self.count == 0 {
            true => f64::NAN,
            false => self.mean,
        }
    }

    /// Weighted variance with the given delta degrees of freedom: the
    /// divisor is `sum_of_weights - ddof`.
    pub fn variance(&self, ddof: u64) -> f64 {
        let divisor = self.sum_of_weights - ddof as f64;
        match self.count == 0 || divisor <= 0.0 {
            true => f64::NAN,
            false => self.mom2 / divisor,
        }
    }

    /// Weighted skewness, or NaN when undefined.
    pub fn skewness(&self) -> f64 {
        match self.count == 0 || self.mom2 == 0.0 {
            true => f64::NAN,
            false => self.sum_of_weights.sqrt() * self.mom3 / self.mom2.powf(1.5),
        }
    }

    /// Weighted excess kurtosis, or NaN when undefined.
    pub fn kurtosis(&self) -> f64 {
        match self.count == 0 || self.mom2 == 0.0 {
            true => f64::NAN,
            false => self.sum_of_weights * self.mom4 / (self.mom2 * self.mom2) - 3.0,
        }
    }
}
