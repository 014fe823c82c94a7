/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements 2-D binning backed by per-cell streaming histograms for quantile statistics.
//
// Created on: 24 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # histogram
//!
//! A 2-D binning whose cells keep a bounded streaming histogram instead of
//! moment accumulators, trading a small approximation error for quantile
//! and median queries over arbitrarily long streams.

use crate::axis::Axis;
use crate::error::{Error, Result};
use crate::grid::GridValue;
use crate::trivariate::check_same_length;
use faer::Mat;
use ferreus_geointerp_utils::{StreamingHistogram, DEFAULT_BIN_COUNT};

/// Streaming 2-D histogram binning of scalar samples.
#[derive(Debug, Clone)]
pub struct Histogram2D<T: GridValue> {
    x: Axis,
    y: Axis,
    cells: Vec<StreamingHistogram>,
    _payload: std::marker::PhantomData<T>,
}

impl<T: GridValue> Histogram2D<T> {
    /// Creates an empty histogram grid.
    ///
    /// # Arguments
    /// * `x`, `y` - Definition of the bin centers on each axis.
    /// * `bin_count` - Maximum number of centroids per cell histogram
    ///   (defaults to [`DEFAULT_BIN_COUNT`]).
    pub fn new(x: Axis, y: Axis, bin_count: Option<usize>) -> Self {
        let cells = x.len() * y.len();
        let bound = bin_count.unwrap_or(DEFAULT_BIN_COUNT);
        Self {
            x,
            y,
            cells: vec![StreamingHistogram::new(bound); cells],
            _payload: std::marker::PhantomData,
        }
    }

    /// Bin centers of the X axis.
    pub fn x(&self) -> &Axis {
        &self.x
    }

    /// Bin centers of the Y axis.
    pub fn y(&self) -> &Axis {
        &self.y
    }

    /// Resets the statistics.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Pushes new samples into their nearest cells. NaN samples are
    /// skipped; samples outside the axes are dropped.
    pub fn push(&mut self, x: &[f64], y: &[f64], z: &[T]) -> Result<()> {
        self.push_weighted(x, y, z, None)
    }

    /// Pushes weighted samples; `weights` must match the samples when
    /// given.
    pub fn push_weighted(
        &mut self,
        x: &[f64],
        y: &[f64],
        z: &[T],
        weights: Option<&[f64]>,
    ) -> Result<()> {
        check_same_length(x.len(), "y", y.len())?;
        check_same_length(x.len(), "z", z.len())?;
        if let Some(weights) = weights {
            check_same_length(x.len(), "weights", weights.len())?;
        }

        for index in 0..x.len() {
            let value = z[index].to_f64();
            if value.is_nan() {
                continue;
            }
            let (ix, iy) = match (
                self.x.find_index(x[index], false),
                self.y.find_index(y[index], false),
            ) {
                (Some(ix), Some(iy)) => (ix, iy),
                _ => continue,
            };
            let weight = weights.map_or(1.0, |w| w[index]);
            self.cells[ix * self.y.len() + iy].push(value, weight);
        }
        Ok(())
    }

    /// Merges another histogram grid with identical axes into this one.
    /// The merge preserves the total weight and is associative up to
    /// centroid compression.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        if self.x != other.x || self.y != other.y {
            return Err(Error::invalid_argument(
                "cannot merge histograms defined on different axes",
            ));
        }
        for (cell, rhs) in self.cells.iter_mut().zip(&other.cells) {
            cell.merge(rhs);
        }
        Ok(())
    }

    fn statistics(&self, f: impl Fn(&StreamingHistogram) -> f64) -> Mat<T> {
        let ny = self.y.len();
        Mat::from_fn(self.x.len(), ny, |ix, iy| {
            T::from_f64(f(&self.cells[ix * ny + iy]))
        })
    }

    /// Count of samples within each bin.
    pub fn count(&self) -> Mat<T> {
        self.statistics(|cell| cell.count() as f64)
    }

    /// Sum of sample weights within each bin.
    pub fn sum_of_weights(&self) -> Mat<T> {
        self.statistics(StreamingHistogram::sum_of_weights)
    }

    /// Approximate mean of sample values within each bin.
    pub fn mean(&self) -> Mat<T> {
        self.statistics(StreamingHistogram::mean)
    }

    /// Approximate variance of sample values within each bin.
    pub fn variance(&self) -> Mat<T> {
        self.statistics(StreamingHistogram::variance)
    }

    /// Minimum of sample values within each bin.
    pub fn min(&self) -> Mat<T> {
        self.statistics(StreamingHistogram::min)
    }

    /// Maximum of sample values within each bin.
    pub fn max(&self) -> Mat<T> {
        self.statistics(StreamingHistogram::max)
    }

    /// Approximate quantile `q` of sample values within each bin.
    pub fn quantile(&self, q: f64) -> Result<Mat<T>> {
        if !(0.0..=1.0).contains(&q) {
            return Err(Error::invalid_argument(format!(
                "the quantile level must lie in [0, 1], got {}",
                q
            )));
        }
        Ok(self.statistics(|cell| cell.quantile(q)))
    }

    /// Approximate median of sample values within each bin.
    pub fn median(&self) -> Mat<T> {
        self.statistics(|cell| cell.quantile(0.5))
    }
}

impl<T: GridValue> std::ops::AddAssign<&Histogram2D<T>> for Histogram2D<T> {
    /// Merges `rhs` into this histogram grid.
    ///
    /// # Panics
    /// When the two grids are not defined on identical axes; use
    /// [`Histogram2D::merge`] for a fallible merge.
    fn add_assign(&mut self, rhs: &Histogram2D<T>) {
        assert!(
            self.x == rhs.x && self.y == rhs.y,
            "histogram grids must share their axes"
        );
        for (cell, other) in self.cells.iter_mut().zip(&rhs.cells) {
            cell.merge(other);
        }
    }
}
