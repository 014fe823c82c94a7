/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements streaming 2-D binning with weighted central moments per cell.
//
// Created on: 24 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # binning
//!
//! Groups a stream of samples into the cells of a 2-D grid. Each cell keeps
//! a streaming accumulator of weighted central moments, so every statistic
//! is available at any time without revisiting the samples. Samples can be
//! routed to their single nearest cell (simple binning) or distributed over
//! the four surrounding cells with bilinear weights (linear binning),
//! optionally weighted by spherical sub-cell areas.

use crate::axis::Axis;
use crate::bivariate::CellInterval;
use crate::error::{Error, Result};
use crate::geodetic::Spheroid;
use crate::grid::GridValue;
use crate::parallel;
use crate::trivariate::check_same_length;
use faer::Mat;
use ferreus_geointerp_utils::Accumulators;
use rayon::prelude::*;

/// Streaming 2-D binning of scalar samples.
#[derive(Debug, Clone)]
pub struct Binning2D<T: GridValue> {
    x: Axis,
    y: Axis,
    acc: Vec<Accumulators>,
    spheroid: Option<Spheroid>,
    _payload: std::marker::PhantomData<T>,
}

impl<T: GridValue> Binning2D<T> {
    /// Creates an empty binning grid.
    ///
    /// # Arguments
    /// * `x`, `y` - Definition of the bin centers on each axis.
    /// * `spheroid` - When given, `x` and `y` are read as longitudes and
    ///   latitudes and linear binning weighs the four sub-cells by their
    ///   spherical areas instead of planar fractions.
    pub fn new(x: Axis, y: Axis, spheroid: Option<Spheroid>) -> Self {
        let cells = x.len() * y.len();
        Self {
            x,
            y,
            acc: vec![Accumulators::new(); cells],
            spheroid,
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

    /// Geodetic system used for area weighting, if any.
    pub fn spheroid(&self) -> Option<&Spheroid> {
        self.spheroid.as_ref()
    }

    /// Resets the statistics.
    pub fn clear(&mut self) {
        for acc in &mut self.acc {
            acc.clear();
        }
    }

    #[inline]
    fn cell(&mut self, ix: usize, iy: usize) -> &mut Accumulators {
        &mut self.acc[ix * self.y.len() + iy]
    }

    /// Pushes one sample with the simple (nearest cell) routing.
    fn push_simple(&mut self, x: f64, y: f64, z: f64) {
        let (ix, iy) = match (self.x.find_index(x, false), self.y.find_index(y, false)) {
            (Some(ix), Some(iy)) => (ix, iy),
            // Samples outside the grid are dropped.
            _ => return,
        };
        self.cell(ix, iy).push(z);
    }

    /// Pushes one sample with linear binning: the four surrounding cells
    /// receive the sample weighted by the opposite sub-cell fraction.
    fn push_linear(&mut self, x: f64, y: f64, z: f64) {
        let cx = match CellInterval::locate(&self.x, x, false) {
            Ok(Some(cx)) => cx,
            _ => return,
        };
        let cy = match CellInterval::locate(&self.y, y, false) {
            Ok(Some(cy)) => cy,
            _ => return,
        };

        let weights = match &self.spheroid {
            Some(_) => spherical_weights(&cx, &cy),
            None => planar_weights(&cx, &cy),
        };
        let corners = [
            (cx.i0, cy.i0, weights[0]),
            (cx.i0, cy.i1, weights[1]),
            (cx.i1, cy.i0, weights[2]),
            (cx.i1, cy.i1, weights[3]),
        ];
        for (ix, iy, weight) in corners {
            if weight > 0.0 {
                self.cell(ix, iy).push_weighted(z, weight);
            }
        }
    }

    /// Pushes new samples into the defined bins.
    ///
    /// # Arguments
    /// * `x`, `y` - Sample coordinates.
    /// * `z` - Sample values; NaN samples are skipped.
    /// * `simple` - Nearest-cell routing when true, linear binning
    ///   otherwise.
    pub fn push(&mut self, x: &[f64], y: &[f64], z: &[T], simple: bool) -> Result<()> {
        check_same_length(x.len(), "y", y.len())?;
        check_same_length(x.len(), "z", z.len())?;

        for index in 0..x.len() {
            let value = z[index].to_f64();
            if value.is_nan() {
                continue;
            }
            match simple {
                true => self.push_simple(x[index], y[index], value),
                false => self.push_linear(x[index], y[index], value),
            }
        }
        Ok(())
    }

    /// Parallel variant of [`Binning2D::push`]: each worker accumulates a
    /// private matrix over its input slice and the results are merged in a
    /// fixed order.
    ///
    /// Floating-point commutativity is not guaranteed across worker counts;
    /// pin `num_threads` to `1` when bit-exact reproducibility is required.
    pub fn push_par(
        &mut self,
        x: &[f64],
        y: &[f64],
        z: &[T],
        simple: bool,
        num_threads: usize,
    ) -> Result<()> {
        check_same_length(x.len(), "y", y.len())?;
        check_same_length(x.len(), "z", z.len())?;

        let threads = parallel::get_num_threads(num_threads);
        if threads <= 1 {
            return self.push(x, y, z, simple);
        }

        let chunk = x.len().div_ceil(threads).max(1);
        let ranges: Vec<_> = (0..x.len())
            .step_by(chunk)
            .map(|start| start..(start + chunk).min(x.len()))
            .collect();

        let partials: Vec<Binning2D<T>> = ranges
            .into_par_iter()
            .map(|range| {
                let mut partial =
                    Binning2D::<T>::new(self.x.clone(), self.y.clone(), self.spheroid);
                // Input slices are validated above; the per-chunk push
                // cannot fail.
                let _ = partial.push(&x[range.clone()], &y[range.clone()], &z[range], simple);
                partial
            })
            .collect();

        for partial in &partials {
            self.merge(partial)?;
        }
        Ok(())
    }

    /// Merges another binning grid with identical axes into this one.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        if self.x != other.x || self.y != other.y {
            return Err(Error::invalid_argument(
                "cannot merge binnings defined on different axes",
            ));
        }
        for (acc, rhs) in self.acc.iter_mut().zip(&other.acc) {
            acc.merge(rhs);
        }
        Ok(())
    }

    fn statistics(&self, f: impl Fn(&Accumulators) -> f64) -> Mat<T> {
        let ny = self.y.len();
        Mat::from_fn(self.x.len(), ny, |ix, iy| {
            T::from_f64(f(&self.acc[ix * ny + iy]))
        })
    }

    /// Count of samples within each bin.
    pub fn count(&self) -> Mat<T> {
        self.statistics(|acc| acc.count() as f64)
    }

    /// Sum of sample values within each bin.
    pub fn sum(&self) -> Mat<T> {
        self.statistics(Accumulators::sum)
    }

    /// Sum of sample weights within each bin.
    pub fn sum_of_weights(&self) -> Mat<T> {
        self.statistics(Accumulators::sum_of_weights)
    }

    /// Minimum of sample values within each bin.
    pub fn min(&self) -> Mat<T> {
        self.statistics(Accumulators::min)
    }

    /// Maximum of sample values within each bin.
    pub fn max(&self) -> Mat<T> {
        self.statistics(Accumulators::max)
    }

    /// Mean of sample values within each bin.
    pub fn mean(&self) -> Mat<T> {
        self.statistics(Accumulators::mean)
    }

    /// Variance of sample values within each bin, with the given delta
    /// degrees of freedom.
    pub fn variance(&self, ddof: u64) -> Mat<T> {
        self.statistics(|acc| acc.variance(ddof))
    }

    /// Skewness of sample values within each bin.
    pub fn skewness(&self) -> Mat<T> {
        self.statistics(Accumulators::skewness)
    }

    /// Excess kurtosis of sample values within each bin.
    pub fn kurtosis(&self) -> Mat<T> {
        self.statistics(Accumulators::kurtosis)
    }
}

impl<T: GridValue> std::ops::AddAssign<&Binning2D<T>> for Binning2D<T> {
    /// Merges `rhs` into this binning.
    ///
    /// # Panics
    /// When the two binnings are not defined on identical axes; use
    /// [`Binning2D::merge`] for a fallible merge.
    fn add_assign(&mut self, rhs: &Binning2D<T>) {
        assert!(
            self.x == rhs.x && self.y == rhs.y,
            "binnings must share their axes"
        );
        for (acc, other) in self.acc.iter_mut().zip(&rhs.acc) {
            acc.merge(other);
        }
    }
}

/// Planar bilinear weights of the four surrounding cells.
fn planar_weights(cx: &CellInterval, cy: &CellInterval) -> [f64; 4] {
    let t = fraction(cx);
    let u = fraction(cy);
    [
        (1.0 - t) * (1.0 - u),
        (1.0 - t) * u,
        t * (1.0 - u),
        t * u,
    ]
}

#[inline]
fn fraction(c: &CellInterval) -> f64 {
    match c.x1 == c.x0 {
        true => 0.0,
        false => (c.x - c.x0) / (c.x1 - c.x0),
    }
}

/// Area of a longitude/latitude rectangle on the unit sphere.
#[inline]
fn spherical_area(lon0: f64, lon1: f64, lat0: f64, lat1: f64) -> f64 {
    (lon1 - lon0).to_radians().abs()
        * (lat1.to_radians().sin() - lat0.to_radians().sin()).abs()
}

/// Spherical analogue of the bilinear weights: each corner receives the
/// area of the opposite sub-rectangle, normalized by the cell area.
fn spherical_weights(cx: &CellInterval, cy: &CellInterval) -> [f64; 4] {
    let total = spherical_area(cx.x0, cx.x1, cy.x0, cy.x1);
    if total == 0.0 {
        return planar_weights(cx, cy);
    }
    [
        spherical_area(cx.x, cx.x1, cy.x, cy.x1) / total,
        spherical_area(cx.x, cx.x1, cy.x0, cy.x) / total,
        spherical_area(cx.x0, cx.x, cy.x, cy.x1) / total,
        spherical_area(cx.x0, cx.x, cy.x0, cy.x) / total,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn axis(n: usize) -> Axis {
        let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
        Axis::new(&values, false).unwrap()
    }

    fn matrix_value<T: GridValue>(m: &Mat<T>, ix: usize, iy: usize) -> f64 {
        m[(ix, iy)].to_f64()
    }

    #[test]
    fn simple_binning_routes_to_the_nearest_cell() {
        let mut binning = Binning2D::<f64>::new(axis(4), axis(4), None);
        binning
            .push(&[0.1, 0.4, 2.6], &[0.2, 0.4, 3.0], &[10.0, 20.0, 30.0], true)
            .unwrap();

        let count = binning.count();
        assert_eq!(matrix_value(&count, 0, 0), 2.0);
        assert_eq!(matrix_value(&count, 3, 3), 1.0);
        let mean = binning.mean();
        assert_eq!(matrix_value(&mean, 0, 0), 15.0);
        assert_eq!(matrix_value(&mean, 3, 3), 30.0);
        assert!(matrix_value(&mean, 1, 1).is_nan());
    }

    #[test]
    fn out_of_domain_and_nan_samples_are_dropped() {
        let mut binning = Binning2D::<f64>::new(axis(3), axis(3), None);
        binning
            .push(
                &[-5.0, 1.0, 1.0],
                &[1.0, 9.0, 1.0],
                &[1.0, 2.0, f64::NAN],
                true,
            )
            .unwrap();
        let count = binning.count();
        for ix in 0..3 {
            for iy in 0..3 {
                assert_eq!(matrix_value(&count, ix, iy), 0.0);
            }
        }
    }

    #[test]
    fn linear_binning_distributes_bilinear_weights() {
        let mut binning = Binning2D::<f64>::new(axis(3), axis(3), None);
        // Sample at (0.25, 0.75): weights (1-t)(1-u) etc. with t=0.25,
        // u=0.75.
        binning.push(&[0.25], &[0.75], &[8.0], false).unwrap();

        let weights = binning.sum_of_weights();
        assert!((matrix_value(&weights, 0, 0) - 0.1875).abs() < 1e-12);
        assert!((matrix_value(&weights, 0, 1) - 0.5625).abs() < 1e-12);
        assert!((matrix_value(&weights, 1, 0) - 0.0625).abs() < 1e-12);
        assert!((matrix_value(&weights, 1, 1) - 0.1875).abs() < 1e-12);

        // The total pushed weight is one sample.
        let mut total = 0.0;
        for ix in 0..3 {
            for iy in 0..3 {
                total += matrix_value(&weights, ix, iy);
            }
        }
        assert!((total - 1.0).abs() < 1e-12);
        // Every touched cell sees the same value, so each mean is 8.
        assert!((matrix_value(&binning.mean(), 0, 1) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn linear_binning_on_a_node_is_simple_binning() {
        let mut linear = Binning2D::<f64>::new(axis(3), axis(3), None);
        linear.push(&[1.0], &[1.0], &[5.0], false).unwrap();
        let weights = linear.sum_of_weights();
        assert!((matrix_value(&weights, 1, 1) - 1.0).abs() < 1e-12);
        assert_eq!(matrix_value(&linear.count(), 1, 1), 1.0);
    }

    #[test]
    fn statistics_match_a_direct_computation() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut binning = Binning2D::<f64>::new(axis(2), axis(2), None);
        let samples: Vec<f64> = (0..500).map(|_| rng.random_range(-1.0..3.0)).collect();
        // All samples land in cell (0, 0).
        let x = vec![0.1; 500];
        let y = vec![0.2; 500];
        binning.push(&x, &y, &samples, true).unwrap();

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        assert_eq!(matrix_value(&binning.count(), 0, 0), 500.0);
        assert!((matrix_value(&binning.mean(), 0, 0) - mean).abs() < 1e-12);
        assert!((matrix_value(&binning.variance(0), 0, 0) - variance).abs() < 1e-12);
        assert!(
            (matrix_value(&binning.sum(), 0, 0) - samples.iter().sum::<f64>()).abs() < 1e-9
        );
    }

    #[test]
    fn merge_is_associative_for_exact_statistics() {
        let mut rng = StdRng::seed_from_u64(23);
        let build = |seed: &mut StdRng| {
            let mut binning = Binning2D::<f64>::new(axis(4), axis(4), None);
            for _ in 0..100 {
                let x = [seed.random_range(0.0..3.0)];
                let y = [seed.random_range(0.0..3.0)];
                let z = [seed.random_range(-1.0..1.0)];
                binning.push(&x, &y, &z, true).unwrap();
            }
            binning
        };
        let b1 = build(&mut rng);
        let b2 = build(&mut rng);
        let b3 = build(&mut rng);

        let mut left = b1.clone();
        left.merge(&b2).unwrap();
        left.merge(&b3).unwrap();

        let mut inner = b2.clone();
        inner.merge(&b3).unwrap();
        let mut right = b1.clone();
        right.merge(&inner).unwrap();

        for ix in 0..4 {
            for iy in 0..4 {
                assert_eq!(
                    matrix_value(&left.count(), ix, iy),
                    matrix_value(&right.count(), ix, iy)
                );
                assert_eq!(
                    matrix_value(&left.min(), ix, iy).to_bits(),
                    matrix_value(&right.min(), ix, iy).to_bits()
                );
                assert_eq!(
                    matrix_value(&left.max(), ix, iy).to_bits(),
                    matrix_value(&right.max(), ix, iy).to_bits()
                );
                let a = matrix_value(&left.mean(), ix, iy);
                let b = matrix_value(&right.mean(), ix, iy);
                match a.is_nan() {
                    true => assert!(b.is_nan()),
                    false => assert!((a - b).abs() < 1e-12),
                }
            }
        }
    }

    #[test]
    fn merge_rejects_different_axes() {
        let a = Binning2D::<f64>::new(axis(3), axis(3), None);
        let mut b = Binning2D::<f64>::new(axis(4), axis(3), None);
        assert!(b.merge(&a).is_err());
    }

    #[test]
    fn add_assign_merges_in_place() {
        let mut a = Binning2D::<f64>::new(axis(3), axis(3), None);
        let mut b = Binning2D::<f64>::new(axis(3), axis(3), None);
        a.push(&[1.0], &[1.0], &[2.0], true).unwrap();
        b.push(&[1.0], &[1.0], &[4.0], true).unwrap();
        a += &b;
        assert_eq!(matrix_value(&a.count(), 1, 1), 2.0);
        assert_eq!(matrix_value(&a.mean(), 1, 1), 3.0);
    }

    #[test]
    fn parallel_push_matches_sequential_statistics() {
        let mut rng = StdRng::seed_from_u64(31);
        let n = 2000;
        let x: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..7.0)).collect();
        let y: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..7.0)).collect();
        let z: Vec<f64> = (0..n).map(|_| rng.random_range(-2.0..2.0)).collect();

        let mut sequential = Binning2D::<f64>::new(axis(8), axis(8), None);
        sequential.push(&x, &y, &z, true).unwrap();
        let mut parallel_run = Binning2D::<f64>::new(axis(8), axis(8), None);
        parallel_run.push_par(&x, &y, &z, true, 4).unwrap();

        for ix in 0..8 {
            for iy in 0..8 {
                assert_eq!(
                    matrix_value(&sequential.count(), ix, iy),
                    matrix_value(&parallel_run.count(), ix, iy)
                );
                let a = matrix_value(&sequential.mean(), ix, iy);
                let b = matrix_value(&parallel_run.mean(), ix, iy);
                match a.is_nan() {
                    true => assert!(b.is_nan()),
                    false => assert!((a - b).abs() < 1e-10),
                }
            }
        }
    }

    #[test]
    fn circular_longitude_binning_wraps() {
        let lon_values: Vec<f64> = (0..36).map(|i| i as f64 * 10.0).collect();
        let lon = Axis::new(&lon_values, true).unwrap();
        let mut binning = Binning2D::<f64>::new(lon, axis(3), None);
        binning.push(&[-4.0, 356.0], &[1.0, 1.0], &[1.0, 3.0], true).unwrap();
        // Both samples reduce to the cell at 0 degrees (the nearest center
        // through the seam).
        assert_eq!(matrix_value(&binning.count(), 0, 1), 2.0);
        assert_eq!(matrix_value(&binning.mean(), 0, 1), 2.0);
    }

    #[test]
    fn geodetic_weights_differ_from_planar_fractions() {
        // Cell between latitudes 60 and 61: the opposite-area rule hands
        // the poleward corner the larger (equatorward) sub-area, so the
        // spherical weights are asymmetric where the planar ones are not.
        let lon = Axis::new(&[0.0, 1.0], false).unwrap();
        let lat = Axis::new(&[60.0, 61.0], false).unwrap();
        let mut geodetic =
            Binning2D::<f64>::new(lon.clone(), lat, Some(Spheroid::default()));
        geodetic.push(&[0.5], &[60.5], &[1.0], false).unwrap();

        let lat_flat = Axis::new(&[60.0, 61.0], false).unwrap();
        let mut planar = Binning2D::<f64>::new(lon, lat_flat, None);
        planar.push(&[0.5], &[60.5], &[1.0], false).unwrap();

        let g = geodetic.sum_of_weights();
        let p = planar.sum_of_weights();
        // Planar: symmetric quarters; spherical: the poleward corners get
        // more than a quarter each.
        assert!((matrix_value(&p, 0, 0) - 0.25).abs() < 1e-12);
        assert!(matrix_value(&g, 0, 1) > 0.25);
        assert!(matrix_value(&g, 0, 0) < 0.25);

        // Weights still sum to one.
        let mut total = 0.0;
        for ix in 0..2 {
            for iy in 0..2 {
                total += matrix_value(&g, ix, iy);
            }
        }
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn f32_binning_round_trips_statistics() {
        let mut binning = Binning2D::<f32>::new(axis(3), axis(3), None);
        binning
            .push(&[1.0, 1.0], &[1.0, 1.0], &[2.0f32, 6.0], true)
            .unwrap();
        let mean = binning.mean();
        assert_eq!(mean[(1, 1)], 4.0f32);
    }
}
