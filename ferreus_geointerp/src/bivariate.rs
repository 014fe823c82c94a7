/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements nearest, bilinear and inverse-distance interpolation on 2-D grids.
//
// Created on: 22 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # bivariate
//!
//! Vectorized interpolation of 2-D grids from the four corners of the
//! enclosing cell. NaN corners propagate through bilinear interpolation;
//! inverse-distance weighting skips them and renormalizes.

use crate::axis::Axis;
use crate::error::{Error, Result};
use crate::grid::{Grid2D, GridValue};
use crate::parallel;
use ferreus_geointerp_utils::math;
use serde::{Deserialize, Serialize};

/// Interpolation kernels evaluated from the four corners of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BivariateInterpolator {
    /// Value of the closest corner.
    Nearest,

    /// Bilinear interpolation; any NaN corner makes the result NaN.
    Bilinear,

    /// Inverse distance weighting with the given power; NaN corners are
    /// skipped and the weights renormalized.
    InverseDistanceWeighting { p: i32 },
}

impl Default for BivariateInterpolator {
    fn default() -> Self {
        BivariateInterpolator::Bilinear
    }
}

/// An enclosing interval on one axis: bracketing presentation indices plus
/// the unwrapped coordinates of the target and both ends.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CellInterval {
    pub i0: usize,
    pub i1: usize,
    pub x0: f64,
    pub x1: f64,
    pub x: f64,
}

impl CellInterval {
    /// Locates the interval of `axis` enclosing `x`, unwrapping circular
    /// coordinates so `x0 <= x <= x1` always holds.
    pub(crate) fn locate(axis: &Axis, x: f64, bounds_error: bool) -> Result<Option<Self>> {
        let (i0, i1) = match axis.find_indexes(x) {
            Some(pair) => pair,
            None => {
                if bounds_error {
                    return Err(Error::OutOfDomain {
                        value: x,
                        min: axis.min_value(),
                        max: axis.max_value(),
                    });
                }
                return Ok(None);
            }
        };

        let xn = axis.normalize_coordinate(x);
        let x0 = axis.coordinate_value(i0);
        let mut x1 = axis.coordinate_value(i1);
        if let Some(period) = axis.period() {
            // Seam cell: the upper end wraps to the start of the circle.
            if x1 < x0 {
                x1 += period;
            }
        }
        Ok(Some(Self { i0, i1, x0, x1, x: xn }))
    }

    /// Interpolation weight of the lower end (`1` at `x0`, `0` at `x1`).
    #[inline]
    fn lower_weight(&self) -> f64 {
        match self.i0 == self.i1 || self.x1 == self.x0 {
            true => 1.0,
            false => (self.x1 - self.x) / (self.x1 - self.x0),
        }
    }
}

impl BivariateInterpolator {
    /// Evaluates the kernel over one cell; `corner(i, j)` reads the grid at
    /// the bracketing indices (`i`, `j` in `{0, 1}` selecting the interval
    /// ends).
    pub(crate) fn evaluate<F>(&self, cx: &CellInterval, cy: &CellInterval, corner: F) -> f64
    where
        F: Fn(usize, usize) -> f64,
    {
        match self {
            BivariateInterpolator::Nearest => {
                let ix = match cx.x - cx.x0 <= cx.x1 - cx.x {
                    true => 0,
                    false => 1,
                };
                let iy = match cy.x - cy.x0 <= cy.x1 - cy.x {
                    true => 0,
                    false => 1,
                };
                corner(ix, iy)
            }
            BivariateInterpolator::Bilinear => {
                let wx0 = cx.lower_weight();
                let wx1 = 1.0 - wx0;
                let wy0 = cy.lower_weight();
                let wy1 = 1.0 - wy0;
                wx0 * wy0 * corner(0, 0)
                    + wx0 * wy1 * corner(0, 1)
                    + wx1 * wy0 * corner(1, 0)
                    + wx1 * wy1 * corner(1, 1)
            }
            BivariateInterpolator::InverseDistanceWeighting { p } => {
                let mut numerator = 0.0;
                let mut denominator = 0.0;
                for i in 0..2 {
                    for j in 0..2 {
                        let value = corner(i, j);
                        if value.is_nan() {
                            continue;
                        }
                        let dx = cx.x - match i == 0 {
                            true => cx.x0,
                            false => cx.x1,
                        };
                        let dy = cy.x - match j == 0 {
                            true => cy.x0,
                            false => cy.x1,
                        };
                        let distance = (dx * dx + dy * dy).sqrt();
                        if distance == 0.0 {
                            // The target sits on a defined node.
                            return value;
                        }
                        let weight = distance.powi(-p);
                        numerator += weight * value;
                        denominator += weight;
                    }
                }
                match denominator == 0.0 {
                    true => f64::NAN,
                    false => numerator / denominator,
                }
            }
        }
    }
}

/// Interpolates a 2-D grid at arbitrary target positions.
///
/// # Arguments
/// * `grid` - The gridded field to interpolate.
/// * `x`, `y` - Target coordinates, one pair per output value.
/// * `interpolator` - Cell kernel to evaluate.
/// * `bounds_error` - Raise [`Error::OutOfDomain`] for targets outside a
///   non-circular axis instead of returning NaN.
/// * `num_threads` - Worker count: `0` uses all logical CPUs, `1` runs
///   sequentially.
pub fn bivariate<T: GridValue>(
    grid: &Grid2D<'_, T>,
    x: &[f64],
    y: &[f64],
    interpolator: &BivariateInterpolator,
    bounds_error: bool,
    num_threads: usize,
) -> Result<Vec<f64>> {
    if x.len() != y.len() {
        return Err(Error::InvalidShape {
            name: "y",
            expected: x.len(),
            found: y.len(),
        });
    }

    parallel::try_map(x.len(), num_threads, |index| {
        let cx = CellInterval::locate(grid.x(), x[index], bounds_error)?;
        let cy = CellInterval::locate(grid.y(), y[index], bounds_error)?;
        let (cx, cy) = match (cx, cy) {
            (Some(cx), Some(cy)) => (cx, cy),
            _ => return Ok(f64::NAN),
        };
        Ok(interpolator.evaluate(&cx, &cy, |i, j| {
            let ix = match i == 0 {
                true => cx.i0,
                false => cx.i1,
            };
            let iy = match j == 0 {
                true => cy.i0,
                false => cy.i1,
            };
            grid.value(ix, iy).to_f64()
        }))
    })
}

/// Linear interpolation between two planar results along a third axis,
/// shared by the 3-D and 4-D drivers.
#[inline]
pub(crate) fn between_planes(x: f64, x0: f64, x1: f64, v0: f64, v1: f64, nearest: bool) -> f64 {
    if x0 == x1 {
        return v0;
    }
    match nearest {
        true => match x - x0 <= x1 - x {
            true => v0,
            false => v1,
        },
        false => math::linear(x, x0, x1, v0, v1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::Axis;

    fn lattice(
        nx: usize,
        ny: usize,
        f: impl Fn(f64, f64) -> f64,
    ) -> (Axis, Axis, Vec<f64>) {
        let xs: Vec<f64> = (0..nx).map(|i| i as f64).collect();
        let ys: Vec<f64> = (0..ny).map(|i| i as f64).collect();
        let mut values = Vec::with_capacity(nx * ny);
        for &x in &xs {
            for &y in &ys {
                values.push(f(x, y));
            }
        }
        (
            Axis::new(&xs, false).unwrap(),
            Axis::new(&ys, false).unwrap(),
            values,
        )
    }

    #[test]
    fn bilinear_is_exact_on_a_plane() {
        let plane = |x: f64, y: f64| 2.0 * x - 3.0 * y + 1.0;
        let (x, y, values) = lattice(4, 4, plane);
        let grid = Grid2D::new(&x, &y, &values).unwrap();

        let result = bivariate(
            &grid,
            &[0.37, 1.5, 2.99],
            &[2.88, 0.0, 0.25],
            &BivariateInterpolator::Bilinear,
            false,
            1,
        )
        .unwrap();
        for (i, (&tx, &ty)) in [0.37, 1.5, 2.99].iter().zip([2.88, 0.0, 0.25].iter()).enumerate()
        {
            assert!(
                (result[i] - plane(tx, ty)).abs() < 1e-12,
                "({}, {}): {} != {}",
                tx,
                ty,
                result[i],
                plane(tx, ty)
            );
        }
    }

    #[test]
    fn bilinear_returns_exact_node_values() {
        let (x, y, values) = lattice(4, 4, |x, y| (x * 1.7).sin() + y * y);
        let grid = Grid2D::new(&x, &y, &values).unwrap();
        for ix in 0..4 {
            for iy in 0..4 {
                let result = bivariate(
                    &grid,
                    &[ix as f64],
                    &[iy as f64],
                    &BivariateInterpolator::Bilinear,
                    true,
                    1,
                )
                .unwrap();
                assert!(
                    (result[0] - grid.value(ix, iy)).abs() < 1e-14,
                    "node ({}, {})",
                    ix,
                    iy
                );
            }
        }
    }

    #[test]
    fn out_of_domain_policy() {
        let (x, y, values) = lattice(3, 3, |x, y| x + y);
        let grid = Grid2D::new(&x, &y, &values).unwrap();

        let nan = bivariate(
            &grid,
            &[5.0],
            &[1.0],
            &BivariateInterpolator::Bilinear,
            false,
            1,
        )
        .unwrap();
        assert!(nan[0].is_nan());

        let error = bivariate(
            &grid,
            &[5.0],
            &[1.0],
            &BivariateInterpolator::Bilinear,
            true,
            1,
        )
        .unwrap_err();
        assert!(matches!(error, Error::OutOfDomain { .. }));
    }

    #[test]
    fn bilinear_propagates_nan_corners() {
        let x = Axis::new(&[0.0, 1.0], false).unwrap();
        let y = Axis::new(&[0.0, 1.0], false).unwrap();
        let values = [1.0, f64::NAN, 3.0, 4.0];
        let grid = Grid2D::new(&x, &y, &values).unwrap();

        let result = bivariate(
            &grid,
            &[0.5],
            &[0.5],
            &BivariateInterpolator::Bilinear,
            false,
            1,
        )
        .unwrap();
        assert!(result[0].is_nan());
    }

    #[test]
    fn idw_skips_nan_corners_and_renormalizes() {
        let x = Axis::new(&[0.0, 1.0], false).unwrap();
        let y = Axis::new(&[0.0, 1.0], false).unwrap();
        let values = [1.0, f64::NAN, 3.0, 4.0];
        let grid = Grid2D::new(&x, &y, &values).unwrap();

        let idw = BivariateInterpolator::InverseDistanceWeighting { p: 2 };
        let result = bivariate(&grid, &[0.5], &[0.5], &idw, false, 1).unwrap();
        // Equidistant corners: the mean of the three defined values.
        assert!((result[0] - (1.0 + 3.0 + 4.0) / 3.0).abs() < 1e-12);

        let all_nan = [f64::NAN; 4];
        let grid = Grid2D::new(&x, &y, &all_nan).unwrap();
        let result = bivariate(&grid, &[0.5], &[0.5], &idw, false, 1).unwrap();
        assert!(result[0].is_nan());
    }

    #[test]
    fn idw_returns_the_exact_sample_on_a_node() {
        let x = Axis::new(&[0.0, 1.0], false).unwrap();
        let y = Axis::new(&[0.0, 1.0], false).unwrap();
        let values = [1.0, 2.0, 3.0, 4.0];
        let grid = Grid2D::new(&x, &y, &values).unwrap();
        let idw = BivariateInterpolator::InverseDistanceWeighting { p: 2 };
        let result = bivariate(&grid, &[0.0], &[1.0], &idw, false, 1).unwrap();
        assert_eq!(result[0], 2.0);
    }

    #[test]
    fn nearest_picks_the_closest_corner() {
        let (x, y, values) = lattice(3, 3, |x, y| 10.0 * x + y);
        let grid = Grid2D::new(&x, &y, &values).unwrap();
        let result = bivariate(
            &grid,
            &[0.4, 0.6],
            &[1.4, 1.6],
            &BivariateInterpolator::Nearest,
            false,
            1,
        )
        .unwrap();
        assert_eq!(result[0], 1.0);
        assert_eq!(result[1], 12.0);
    }

    #[test]
    fn circular_seam_is_label_independent() {
        // Periodic plane on a circular longitude axis.
        let xs: Vec<f64> = (0..360).step_by(10).map(|v| v as f64).collect();
        let ys = [-10.0, 0.0, 10.0];
        let x = Axis::new(&xs, true).unwrap();
        let y = Axis::new(&ys, false).unwrap();
        let mut values = Vec::new();
        for &lon in &xs {
            for &lat in &ys {
                values.push(lon.to_radians().cos() * (1.0 + lat / 100.0));
            }
        }
        let grid = Grid2D::new(&x, &y, &values).unwrap();

        let a = bivariate(
            &grid,
            &[355.0, -5.0],
            &[2.5, 2.5],
            &BivariateInterpolator::Bilinear,
            false,
            1,
        )
        .unwrap();
        // -5 and 355 label the same longitude.
        assert!((a[0] - a[1]).abs() < 1e-12);

        let at_min = bivariate(
            &grid,
            &[0.0, 360.0],
            &[0.0, 0.0],
            &BivariateInterpolator::Bilinear,
            false,
            1,
        )
        .unwrap();
        assert!((at_min[0] - at_min[1]).abs() < 1e-12);
    }

    #[test]
    fn deterministic_across_worker_counts() {
        let (x, y, values) = lattice(16, 16, |x, y| (x * 0.7).cos() * (y * 0.3).sin());
        let grid = Grid2D::new(&x, &y, &values).unwrap();
        let targets_x: Vec<f64> = (0..500).map(|i| 15.0 * i as f64 / 499.0).collect();
        let targets_y: Vec<f64> = (0..500).map(|i| 15.0 * (499 - i) as f64 / 499.0).collect();

        let sequential = bivariate(
            &grid,
            &targets_x,
            &targets_y,
            &BivariateInterpolator::Bilinear,
            false,
            1,
        )
        .unwrap();
        for num_threads in [2, 4, 0] {
            let parallel = bivariate(
                &grid,
                &targets_x,
                &targets_y,
                &BivariateInterpolator::Bilinear,
                false,
                num_threads,
            )
            .unwrap();
            assert_eq!(sequential, parallel);
        }
    }

    #[test]
    fn mismatched_target_lengths_are_rejected() {
        let (x, y, values) = lattice(3, 3, |x, y| x + y);
        let grid = Grid2D::new(&x, &y, &values).unwrap();
        let error = bivariate(
            &grid,
            &[0.0, 1.0],
            &[0.0],
            &BivariateInterpolator::Bilinear,
            false,
            1,
        )
        .unwrap_err();
        assert!(matches!(error, Error::InvalidShape { .. }));
    }
}
