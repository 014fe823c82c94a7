/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements gap filling of gridded fields by Poisson relaxation and LOESS regression.
//
// Created on: 23 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # fill
//!
//! Replaces undefined (NaN) grid samples with values derived from their
//! surroundings: either by relaxing Poisson's equation over the masked
//! cells, or by locally weighted regression (LOESS) with the tri-cube
//! weight function.

use crate::axis::Axis;
use crate::error::{Error, Result};
use crate::grid::{Grid2D, Grid3D, GridValue};
use crate::parallel;
use serde::{Deserialize, Serialize};

/// Initialization of the masked cells before relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FirstGuess {
    /// Use zero as the initial guess.
    Zero,

    /// Use the zonal average along the X direction.
    #[default]
    ZonalAverage,
}

fn check_relaxation(relaxation: f64) -> Result<()> {
    match relaxation > 0.0 && relaxation < 2.0 {
        true => Ok(()),
        false => Err(Error::invalid_argument(format!(
            "the relaxation constant must lie in (0, 2), got {}",
            relaxation
        ))),
    }
}

/// Fills the masked cells of each longitude band with the band mean of the
/// defined samples (zero when a band is fully masked).
fn set_zonal_average(work: &mut [f64], mask: &[bool], nx: usize, ny: usize) {
    for iy in 0..ny {
        let mut sum = 0.0;
        let mut count = 0usize;
        for ix in 0..nx {
            if !mask[ix * ny + iy] {
                sum += work[ix * ny + iy];
                count += 1;
            }
        }
        let first_guess = match count == 0 {
            true => 0.0,
            false => sum / count as f64,
        };
        for ix in 0..nx {
            if mask[ix * ny + iy] {
                work[ix * ny + iy] = first_guess;
            }
        }
    }
}

/// One Jacobi sweep over the masked cells, reading `prev` and writing
/// `next`; returns the largest absolute correction applied.
fn poisson_sweep(
    prev: &[f64],
    next: &mut [f64],
    mask: &[bool],
    nx: usize,
    ny: usize,
    is_circle: bool,
    relaxation: f64,
    num_threads: usize,
) -> f64 {
    let residuals = parallel::dispatch_reduce(next, ny, num_threads, |start, chunk| {
        let row0 = start / ny;
        let rows = chunk.len() / ny;
        let mut max_residual = 0.0f64;

        for row in 0..rows {
            let ix = row0 + row;
            // Mirror neighbors on the X edges, or the circular neighbor
            // when the axis wraps.
            let ix0 = match ix == 0 {
                true => match is_circle {
                    true => nx - 1,
                    false => 1,
                },
                false => ix - 1,
            };
            let ix1 = match ix == nx - 1 {
                true => match is_circle {
                    true => 0,
                    false => nx - 2,
                },
                false => ix + 1,
            };

            for iy in 0..ny {
                if !mask[ix * ny + iy] {
                    continue;
                }
                // Mirror neighbors on the Y edges.
                let iy0 = match iy == 0 {
                    true => 1,
                    false => iy - 1,
                };
                let iy1 = match iy == ny - 1 {
                    true => ny - 2,
                    false => iy + 1,
                };

                let residual = (0.25
                    * (prev[ix0 * ny + iy]
                        + prev[ix1 * ny + iy]
                        + prev[ix * ny + iy0]
                        + prev[ix * ny + iy1])
                    - prev[ix * ny + iy])
                    * relaxation;
                chunk[row * ny + iy] = prev[ix * ny + iy] + residual;
                max_residual = max_residual.max(residual.abs());
            }
        }
        max_residual
    });
    residuals.into_iter().fold(0.0, f64::max)
}

/// Replaces all NaN values of a `(x.len(), y.len())` row-major buffer with
/// values derived from solving Poisson's equation by relaxation.
///
/// # Arguments
/// * `x`, `y` - Grid axes; a circular X axis makes the X boundary periodic.
/// * `values` - Grid samples, modified in place.
/// * `first_guess` - Initialization of the masked cells.
/// * `max_iterations` - Sweep limit.
/// * `epsilon` - Convergence threshold on the largest correction.
/// * `relaxation` - Relaxation constant in `(0, 2)`.
/// * `num_threads` - Worker count: `0` uses all logical CPUs.
///
/// # Returns
/// The number of sweeps performed and the final maximum residual.
#[allow(clippy::too_many_arguments)]
pub fn poisson<T: GridValue>(
    x: &Axis,
    y: &Axis,
    values: &mut [T],
    first_guess: FirstGuess,
    max_iterations: usize,
    epsilon: f64,
    relaxation: f64,
    num_threads: usize,
) -> Result<(usize, f64)> {
    let nx = x.len();
    let ny = y.len();
    if values.len() != nx * ny {
        return Err(Error::InvalidShape {
            name: "values",
            expected: nx * ny,
            found: values.len(),
        });
    }
    check_relaxation(relaxation)?;
    if nx < 2 || ny < 2 {
        return Err(Error::invalid_argument(
            "the grid must hold at least two samples per axis",
        ));
    }

    let mask: Vec<bool> = values.iter().map(|v| GridValue::to_f64(*v).is_nan()).collect();
    if !mask.iter().any(|&m| m) {
        return Ok((0, 0.0));
    }

    let mut prev: Vec<f64> = values.iter().map(|v| GridValue::to_f64(*v)).collect();
    match first_guess {
        FirstGuess::Zero => {
            for (value, &masked) in prev.iter_mut().zip(&mask) {
                if masked {
                    *value = 0.0;
                }
            }
        }
        FirstGuess::ZonalAverage => set_zonal_average(&mut prev, &mask, nx, ny),
    }
    let mut next = prev.clone();

    let mut iteration = 0;
    let mut max_residual = 0.0;
    for _ in 0..max_iterations {
        iteration += 1;
        max_residual = poisson_sweep(
            &prev,
            &mut next,
            &mask,
            nx,
            ny,
            x.is_circle(),
            relaxation,
            num_threads,
        );
        std::mem::swap(&mut prev, &mut next);
        if max_residual < epsilon {
            break;
        }
    }

    for (slot, value) in values.iter_mut().zip(&prev) {
        *slot = T::from_f64(*value);
    }
    Ok((iteration, max_residual))
}

/// Reflects a window offset into `[0, n)` about the grid edges.
fn mirror(index: i64, n: usize) -> usize {
    let n = n as i64;
    let mut index = index;
    loop {
        if index < 0 {
            index = -index;
        } else if index >= n {
            index = 2 * (n - 1) - index;
        } else {
            return index as usize;
        }
    }
}

/// Fills undefined values by locally weighted regression (LOESS) with the
/// tri-cube weight function `w(d) = (1 - d^3)^3` for `d <= 1`.
///
/// Every NaN cell is replaced by the weighted average of the defined
/// samples in the `(2nx + 1) x (2ny + 1)` window around it (symmetrical
/// boundary); cells whose window holds no defined sample stay NaN.
///
/// # Returns
/// A new buffer with the same shape as the grid.
pub fn loess<T: GridValue>(
    grid: &Grid2D<'_, T>,
    nx: usize,
    ny: usize,
    num_threads: usize,
) -> Result<Vec<T>> {
    if nx == 0 || ny == 0 {
        return Err(Error::invalid_argument(
            "the half-window sizes must be strictly positive",
        ));
    }
    let x_len = grid.x().len();
    let y_len = grid.y().len();

    let rows = parallel::try_map(x_len, num_threads, |ix| {
        let x = grid.x().coordinate_value(ix);
        let mut row = Vec::with_capacity(y_len);

        for iy in 0..y_len {
            let mut z = grid.value(ix, iy).to_f64();
            if z.is_nan() {
                let y = grid.y().coordinate_value(iy);
                let mut value = 0.0;
                let mut weight = 0.0;

                for wx in -(nx as i64)..=nx as i64 {
                    let jx = mirror(ix as i64 + wx, x_len);
                    let dx = (grid.x().coordinate_value(jx) - x) / nx as f64;
                    for wy in -(ny as i64)..=ny as i64 {
                        let jy = mirror(iy as i64 + wy, y_len);
                        let zi = grid.value(jx, jy).to_f64();
                        if zi.is_nan() {
                            continue;
                        }
                        let dy = (grid.y().coordinate_value(jy) - y) / ny as f64;
                        let d = (dx * dx + dy * dy).sqrt();
                        if d <= 1.0 {
                            let wi = (1.0 - d * d * d).powi(3);
                            value += wi * zi;
                            weight += wi;
                        }
                    }
                }
                if weight != 0.0 {
                    z = value / weight;
                }
            }
            row.push(T::from_f64(z));
        }
        Ok(row)
    })?;

    Ok(rows.into_iter().flatten().collect())
}

/// Applies [`poisson`] to every Z slice of a 3-D grid buffer in place.
#[allow(clippy::too_many_arguments)]
pub fn poisson_3d<T: GridValue>(
    x: &Axis,
    y: &Axis,
    z_len: usize,
    values: &mut [T],
    first_guess: FirstGuess,
    max_iterations: usize,
    epsilon: f64,
    relaxation: f64,
    num_threads: usize,
) -> Result<(usize, f64)> {
    let nx = x.len();
    let ny = y.len();
    if values.len() != nx * ny * z_len {
        return Err(Error::InvalidShape {
            name: "values",
            expected: nx * ny * z_len,
            found: values.len(),
        });
    }

    let mut iterations = 0;
    let mut max_residual = 0.0f64;
    let mut slice = vec![T::from_f64(0.0); nx * ny];
    for iz in 0..z_len {
        for ix in 0..nx {
            for iy in 0..ny {
                slice[ix * ny + iy] = values[(ix * ny + iy) * z_len + iz];
            }
        }
        let (it, residual) = poisson(
            x,
            y,
            &mut slice,
            first_guess,
            max_iterations,
            epsilon,
            relaxation,
            num_threads,
        )?;
        iterations = iterations.max(it);
        max_residual = max_residual.max(residual);
        for ix in 0..nx {
            for iy in 0..ny {
                values[(ix * ny + iy) * z_len + iz] = slice[ix * ny + iy];
            }
        }
    }
    Ok((iterations, max_residual))
}

/// Applies [`loess`] to every Z slice of a 3-D grid.
pub fn loess_3d<T: GridValue>(
    grid: &Grid3D<'_, T>,
    nx: usize,
    ny: usize,
    num_threads: usize,
) -> Result<Vec<T>> {
    let x_len = grid.x().len();
    let y_len = grid.y().len();
    let z_len = grid.z().len();

    let mut out = vec![T::from_f64(f64::NAN); x_len * y_len * z_len];
    let mut slice = vec![T::from_f64(0.0); x_len * y_len];
    for iz in 0..z_len {
        for ix in 0..x_len {
            for iy in 0..y_len {
                slice[ix * y_len + iy] = grid.value(ix, iy, iz);
            }
        }
        let view = Grid2D::new(grid.x(), grid.y(), &slice)?;
        let filled = loess(&view, nx, ny, num_threads)?;
        for ix in 0..x_len {
            for iy in 0..y_len {
                out[(ix * y_len + iy) * z_len + iz] = filled[ix * y_len + iy];
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(n: usize) -> Axis {
        let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
        Axis::new(&values, false).unwrap()
    }

    #[test]
    fn poisson_converges_on_a_three_by_three_hole() {
        let x = axis(3);
        let y = axis(3);
        let mut values = vec![1.0f64; 9];
        values[4] = f64::NAN;

        let (iterations, residual) = poisson(
            &x,
            &y,
            &mut values,
            FirstGuess::Zero,
            100,
            1e-9,
            1.0,
            1,
        )
        .unwrap();
        assert!(iterations < 100);
        assert!(residual < 1e-9);
        assert!((values[4] - 1.0).abs() < 1e-9, "center={}", values[4]);
    }

    #[test]
    fn poisson_without_gaps_is_a_no_op() {
        let x = axis(4);
        let y = axis(4);
        let mut values: Vec<f64> = (0..16).map(|v| v as f64).collect();
        let original = values.clone();
        let (iterations, residual) =
            poisson(&x, &y, &mut values, FirstGuess::Zero, 50, 1e-6, 1.0, 1).unwrap();
        assert_eq!(iterations, 0);
        assert_eq!(residual, 0.0);
        assert_eq!(values, original);
    }

    #[test]
    fn poisson_residual_is_non_increasing_for_small_relaxation() {
        // Track the residual across single sweeps by repeatedly running with
        // max_iterations = 1.
        let x = axis(8);
        let y = axis(8);
        let mut values = vec![0.5f64; 64];
        for hole in [9, 10, 11, 18, 27, 36, 45, 54] {
            values[hole] = f64::NAN;
        }
        // Boundary samples vary so the relaxation has real work to do.
        for i in 0..8 {
            values[i] = i as f64 / 7.0;
        }

        // Run the whole relaxation once per sweep count and compare the
        // final residuals: each additional sweep must not increase it.
        let mut previous = f64::INFINITY;
        for sweeps in 1..12 {
            let mut buffer = values.clone();
            let (_, residual) = poisson(
                &x,
                &y,
                &mut buffer,
                FirstGuess::Zero,
                sweeps,
                0.0,
                1.0,
                1,
            )
            .unwrap();
            assert!(
                residual <= previous + 1e-12,
                "sweep {}: {} > {}",
                sweeps,
                residual,
                previous
            );
            previous = residual;
            assert!(buffer.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn poisson_zonal_average_first_guess() {
        let x = axis(4);
        let y = axis(3);
        // Column means: y-band 0 holds (1, 3, _) -> 2.0 after masking.
        let mut values = vec![
            1.0,
            10.0,
            100.0,
            3.0,
            10.0,
            100.0,
            f64::NAN,
            10.0,
            100.0,
            2.0,
            10.0,
            100.0,
        ];
        let mut prev: Vec<f64> = values.clone();
        let mask: Vec<bool> = prev.iter().map(|v| v.is_nan()).collect();
        set_zonal_average(&mut prev, &mask, 4, 3);
        assert!((prev[6] - 2.0).abs() < 1e-12);

        // The full relaxation keeps the field inside the band range.
        let (_, residual) = poisson(
            &x,
            &y,
            &mut values,
            FirstGuess::ZonalAverage,
            500,
            1e-10,
            1.0,
            1,
        )
        .unwrap();
        assert!(residual < 1e-10);
        assert!(values[6] > 1.0 && values[6] < 100.0);
    }

    #[test]
    fn poisson_rejects_bad_relaxation() {
        let x = axis(3);
        let y = axis(3);
        let mut values = vec![1.0f64; 9];
        values[4] = f64::NAN;
        for relaxation in [0.0, -0.5, 2.0, 2.5] {
            assert!(poisson(
                &x,
                &y,
                &mut values.clone(),
                FirstGuess::Zero,
                10,
                1e-6,
                relaxation,
                1
            )
            .is_err());
        }
    }

    #[test]
    fn poisson_matches_across_worker_counts_per_sweep() {
        // A single Jacobi sweep is deterministic, so one-sweep results must
        // be identical for any worker count.
        let x = axis(16);
        let y = axis(16);
        let mut values: Vec<f64> = (0..256).map(|v| ((v * 31) % 17) as f64).collect();
        for hole in (0..256).step_by(7) {
            values[hole] = f64::NAN;
        }

        let mut sequential = values.clone();
        poisson(&x, &y, &mut sequential, FirstGuess::Zero, 1, 0.0, 0.9, 1).unwrap();
        for num_threads in [2, 4, 0] {
            let mut parallel_run = values.clone();
            poisson(
                &x,
                &y,
                &mut parallel_run,
                FirstGuess::Zero,
                1,
                0.0,
                0.9,
                num_threads,
            )
            .unwrap();
            assert_eq!(sequential, parallel_run);
        }
    }

    #[test]
    fn circular_x_boundary_uses_the_wrap_neighbor() {
        let lon = Axis::new(&[0.0, 90.0, 180.0, 270.0], true).unwrap();
        let y = axis(3);
        // Hole at the first row: with a circular axis its left neighbor is
        // the last row (value 8), with a mirror axis it would be row 1.
        let mut wrapped = vec![
            f64::NAN,
            0.0,
            0.0,
            2.0,
            0.0,
            0.0,
            4.0,
            0.0,
            0.0,
            8.0,
            0.0,
            0.0,
        ];
        let mut mirrored = wrapped.clone();

        poisson(&lon, &y, &mut wrapped, FirstGuess::Zero, 1, 0.0, 1.0, 1).unwrap();

        let lon_flat = axis(4);
        poisson(
            &lon_flat,
            &y,
            &mut mirrored,
            FirstGuess::Zero,
            1,
            0.0,
            1.0,
            1,
        )
        .unwrap();

        // One sweep from zero: circular average includes 8, mirror counts 2.
        assert!((wrapped[0] - 0.25 * (8.0 + 2.0)).abs() < 1e-12);
        assert!((mirrored[0] - 0.25 * (2.0 + 2.0)).abs() < 1e-12);
    }

    #[test]
    fn loess_fills_an_interior_hole_and_keeps_defined_samples() {
        let x = axis(6);
        let y = axis(6);
        let mut values: Vec<f64> = Vec::new();
        for ix in 0..6 {
            for iy in 0..6 {
                values.push(ix as f64 + iy as f64);
            }
        }
        values[2 * 6 + 3] = f64::NAN;
        let grid = Grid2D::new(&x, &y, &values).unwrap();

        let filled = loess(&grid, 2, 2, 1).unwrap();
        for (i, (&a, &b)) in values.iter().zip(filled.iter()).enumerate() {
            if i == 2 * 6 + 3 {
                assert!(b.is_finite());
                assert!((b - 5.0).abs() < 1.0, "filled={}", b);
            } else {
                assert_eq!(a, b, "defined cell {} must be untouched", i);
            }
        }
    }

    #[test]
    fn loess_leaves_unreachable_holes_nan() {
        let x = axis(8);
        let y = axis(8);
        let values = vec![f64::NAN; 64];
        let grid = Grid2D::new(&x, &y, &values).unwrap();
        let filled = loess(&grid, 1, 1, 1).unwrap();
        assert!(filled.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn loess_rejects_zero_windows() {
        let x = axis(4);
        let y = axis(4);
        let values = vec![0.0f64; 16];
        let grid = Grid2D::new(&x, &y, &values).unwrap();
        assert!(loess(&grid, 0, 1, 1).is_err());
        assert!(loess(&grid, 1, 0, 1).is_err());
    }

    #[test]
    fn loess_is_deterministic_across_worker_counts() {
        let x = axis(12);
        let y = axis(12);
        let mut values: Vec<f64> = (0..144).map(|v| (v as f64 * 0.37).sin()).collect();
        for hole in (5..144).step_by(11) {
            values[hole] = f64::NAN;
        }
        let grid = Grid2D::new(&x, &y, &values).unwrap();

        let sequential = loess(&grid, 2, 2, 1).unwrap();
        for num_threads in [3, 0] {
            let parallel_run = loess(&grid, 2, 2, num_threads).unwrap();
            for (a, b) in sequential.iter().zip(parallel_run.iter()) {
                match a.is_nan() {
                    true => assert!(b.is_nan()),
                    false => assert_eq!(a, b),
                }
            }
        }
    }

    #[test]
    fn three_dimensional_fill_treats_slices_independently() {
        let x = axis(4);
        let y = axis(4);
        let z = axis(2);
        // Identical slices: both must converge to identical results.
        let mut values = vec![0.0f64; 32];
        for ix in 0..4 {
            for iy in 0..4 {
                for iz in 0..2 {
                    values[(ix * 4 + iy) * 2 + iz] = (ix + iy) as f64;
                }
            }
        }
        values[(1 * 4 + 1) * 2] = f64::NAN;
        values[(1 * 4 + 1) * 2 + 1] = f64::NAN;

        poisson_3d(
            &x,
            &y,
            2,
            &mut values,
            FirstGuess::Zero,
            200,
            1e-10,
            1.0,
            1,
        )
        .unwrap();
        for ix in 0..4 {
            for iy in 0..4 {
                let a = values[(ix * 4 + iy) * 2];
                let b = values[(ix * 4 + iy) * 2 + 1];
                assert_eq!(a, b, "slices diverged at ({}, {})", ix, iy);
            }
        }

        let grid_values: Vec<f64> = values.clone();
        let grid = Grid3D::new(&x, &y, &z, &grid_values).unwrap();
        let filled = loess_3d(&grid, 1, 1, 1).unwrap();
        assert_eq!(filled.len(), 32);
    }
}
