/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements bicubic and spline interpolation of grids over sampled frames.
//
// Created on: 23 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # spline
//!
//! Tensor-product interpolation on `2nx x 2ny` frames: a univariate fitting
//! model is evaluated along X for every frame row, then once more across the
//! row results along Y. Bicubic interpolation is the cubic-spline instance
//! of this engine. The 3-D and 4-D drivers apply the 2-D evaluation on each
//! bracketing Z (and U) hyperplane and close with linear interpolation.

use crate::axis::{Axis, Boundary};
use crate::bivariate::{between_planes, CellInterval};
use crate::error::{Error, Result};
use crate::grid::{Grid2D, Grid3D, Grid4D, GridValue, TemporalGrid3D, TemporalGrid4D};
use crate::parallel;
use crate::sampler::Frame2D;
use crate::temporal_axis::Resolution;
use crate::trivariate::{check_same_length, locate_temporal, AxisMethod};
use crate::warning::WarningSink;
use ferreus_geointerp_utils::{FittingModel, Interpolator1D};

/// Workspace owned by one worker range: two univariate interpolators plus
/// the column buffer, reset between targets.
struct SplineWorkspace {
    along_x: Interpolator1D,
    along_y: Interpolator1D,
    rows: Vec<f64>,
}

impl SplineWorkspace {
    fn new(fitting_model: FittingModel) -> Self {
        Self {
            along_x: Interpolator1D::new(fitting_model),
            along_y: Interpolator1D::new(fitting_model),
            rows: Vec::new(),
        }
    }

    /// Tensor-product evaluation of a frame at its target position.
    fn evaluate(&mut self, frame: &Frame2D) -> f64 {
        if frame.has_nan() {
            return f64::NAN;
        }
        let ny = frame.y.indices.len();
        let nx = frame.x.indices.len();

        self.rows.clear();
        let mut column = vec![0.0; nx];
        for j in 0..ny {
            for (i, slot) in column.iter_mut().enumerate() {
                *slot = frame.value(i, j);
            }
            self.rows
                .push(self.along_x.interpolate(&frame.x.coordinates, &column, frame.x.target));
        }
        self.along_y
            .interpolate(&frame.y.coordinates, &self.rows, frame.y.target)
    }
}

fn check_window(
    fitting_model: FittingModel,
    nx: usize,
    ny: usize,
    boundary: Boundary,
    x_axis: &Axis,
) -> Result<()> {
    let min_size = fitting_model.min_size();
    if 2 * nx < min_size || 2 * ny < min_size {
        return Err(Error::invalid_argument(format!(
            "the window must hold at least {} points per axis for this \
             fitting model, got ({}, {})",
            min_size,
            2 * nx,
            2 * ny
        )));
    }
    if boundary == Boundary::Wrap && !x_axis.is_circle() {
        return Err(Error::invalid_argument(
            "the Wrap boundary requires a circular X axis",
        ));
    }
    Ok(())
}

/// Resolves an out-of-domain frame failure according to `bounds_error`.
fn frame_or_nan(result: Result<Option<Frame2D>>, bounds_error: bool) -> Result<Option<Frame2D>> {
    match result {
        Ok(frame) => Ok(frame),
        Err(error @ Error::OutOfDomain { .. }) => match bounds_error {
            true => Err(error),
            false => Ok(None),
        },
        Err(error) => Err(error),
    }
}

/// Spline (or bicubic, with [`FittingModel::CSpline`]) interpolation of a
/// 2-D grid.
///
/// # Arguments
/// * `grid` - The gridded field to interpolate.
/// * `x`, `y` - Target coordinates.
/// * `nx`, `ny` - Half-window sizes; the frame holds `2nx x 2ny` samples.
/// * `fitting_model` - Univariate model evaluated along each direction.
/// * `boundary` - Policy for windows crossing the grid edge.
/// * `bounds_error` - Raise [`Error::OutOfDomain`] instead of yielding NaN.
/// * `num_threads` - Worker count: `0` uses all logical CPUs.
#[allow(clippy::too_many_arguments)]
pub fn spline_bivariate<T: GridValue>(
    grid: &Grid2D<'_, T>,
    x: &[f64],
    y: &[f64],
    nx: usize,
    ny: usize,
    fitting_model: FittingModel,
    boundary: Boundary,
    bounds_error: bool,
    num_threads: usize,
) -> Result<Vec<f64>> {
    check_same_length(x.len(), "y", y.len())?;
    check_window(fitting_model, nx, ny, boundary, grid.x())?;

    parallel::try_map_with(
        x.len(),
        num_threads,
        || SplineWorkspace::new(fitting_model),
        |workspace, index| {
            let frame = frame_or_nan(
                Frame2D::sample(
                    grid.x(),
                    grid.y(),
                    x[index],
                    y[index],
                    nx,
                    ny,
                    boundary,
                    |ix, iy| grid.value(ix, iy).to_f64(),
                ),
                bounds_error,
            )?;
            Ok(match frame {
                Some(frame) => workspace.evaluate(&frame),
                None => f64::NAN,
            })
        },
    )
}

/// Spline interpolation of a 3-D grid: the 2-D engine on both bracketing Z
/// planes, closed linearly (or by nearest) along Z.
#[allow(clippy::too_many_arguments)]
pub fn spline_trivariate<T: GridValue>(
    grid: &Grid3D<'_, T>,
    x: &[f64],
    y: &[f64],
    z: &[f64],
    nx: usize,
    ny: usize,
    fitting_model: FittingModel,
    boundary: Boundary,
    z_method: AxisMethod,
    bounds_error: bool,
    num_threads: usize,
) -> Result<Vec<f64>> {
    check_same_length(x.len(), "y", y.len())?;
    check_same_length(x.len(), "z", z.len())?;
    check_window(fitting_model, nx, ny, boundary, grid.x())?;

    parallel::try_map_with(
        x.len(),
        num_threads,
        || SplineWorkspace::new(fitting_model),
        |workspace, index| {
            let cz = match CellInterval::locate(grid.z(), z[index], bounds_error)? {
                Some(cz) => cz,
                None => return Ok(f64::NAN),
            };
            let mut plane = |iz: usize| -> Result<f64> {
                let frame = frame_or_nan(
                    Frame2D::sample(
                        grid.x(),
                        grid.y(),
                        x[index],
                        y[index],
                        nx,
                        ny,
                        boundary,
                        |ix, iy| grid.value(ix, iy, iz).to_f64(),
                    ),
                    bounds_error,
                )?;
                Ok(match frame {
                    Some(frame) => workspace.evaluate(&frame),
                    None => f64::NAN,
                })
            };
            let v0 = plane(cz.i0)?;
            let v1 = plane(cz.i1)?;
            Ok(between_planes(
                cz.x,
                cz.x0,
                cz.x1,
                v0,
                v1,
                z_method.is_nearest(),
            ))
        },
    )
}

/// Spline interpolation of a 3-D grid with a temporal Z axis.
#[allow(clippy::too_many_arguments)]
pub fn spline_trivariate_temporal<T: GridValue>(
    grid: &TemporalGrid3D<'_, T>,
    x: &[f64],
    y: &[f64],
    z: &[i64],
    z_resolution: Resolution,
    sink: &dyn WarningSink,
    nx: usize,
    ny: usize,
    fitting_model: FittingModel,
    boundary: Boundary,
    z_method: AxisMethod,
    bounds_error: bool,
    num_threads: usize,
) -> Result<Vec<f64>> {
    check_same_length(x.len(), "y", y.len())?;
    check_same_length(x.len(), "z", z.len())?;
    check_window(fitting_model, nx, ny, boundary, grid.x())?;

    let instants = grid.z().safe_cast(z, z_resolution, sink)?;

    parallel::try_map_with(
        x.len(),
        num_threads,
        || SplineWorkspace::new(fitting_model),
        |workspace, index| {
            let (iz0, iz1, z0, z1, zt) =
                match locate_temporal(grid.z(), instants[index], bounds_error)? {
                    Some(interval) => interval,
                    None => return Ok(f64::NAN),
                };
            let mut plane = |iz: usize| -> Result<f64> {
                let frame = frame_or_nan(
                    Frame2D::sample(
                        grid.x(),
                        grid.y(),
                        x[index],
                        y[index],
                        nx,
                        ny,
                        boundary,
                        |ix, iy| grid.value(ix, iy, iz).to_f64(),
                    ),
                    bounds_error,
                )?;
                Ok(match frame {
                    Some(frame) => workspace.evaluate(&frame),
                    None => f64::NAN,
                })
            };
            let v0 = plane(iz0)?;
            let v1 = plane(iz1)?;
            Ok(between_planes(zt, z0, z1, v0, v1, z_method.is_nearest()))
        },
    )
}

/// Spline interpolation of a 4-D grid: the 2-D engine on the four
/// bracketing (Z, U) hyperplanes, closed linearly in Z then U.
#[allow(clippy::too_many_arguments)]
pub fn spline_quadrivariate<T: GridValue>(
    grid: &Grid4D<'_, T>,
    x: &[f64],
    y: &[f64],
    z: &[f64],
    u: &[f64],
    nx: usize,
    ny: usize,
    fitting_model: FittingModel,
    boundary: Boundary,
    z_method: AxisMethod,
    u_method: AxisMethod,
    bounds_error: bool,
    num_threads: usize,
) -> Result<Vec<f64>> {
    check_same_length(x.len(), "y", y.len())?;
    check_same_length(x.len(), "z", z.len())?;
    check_same_length(x.len(), "u", u.len())?;
    check_window(fitting_model, nx, ny, boundary, grid.x())?;

    parallel::try_map_with(
        x.len(),
        num_threads,
        || SplineWorkspace::new(fitting_model),
        |workspace, index| {
            let cz = match CellInterval::locate(grid.z(), z[index], bounds_error)? {
                Some(cz) => cz,
                None => return Ok(f64::NAN),
            };
            let cu = match CellInterval::locate(grid.u(), u[index], bounds_error)? {
                Some(cu) => cu,
                None => return Ok(f64::NAN),
            };
            let mut volume = |iu: usize| -> Result<f64> {
                let mut plane = |iz: usize| -> Result<f64> {
                    let frame = frame_or_nan(
                        Frame2D::sample(
                            grid.x(),
                            grid.y(),
                            x[index],
                            y[index],
                            nx,
                            ny,
                            boundary,
                            |ix, iy| grid.value(ix, iy, iz, iu).to_f64(),
                        ),
                        bounds_error,
                    )?;
                    Ok(match frame {
                        Some(frame) => workspace.evaluate(&frame),
                        None => f64::NAN,
                    })
                };
                let v0 = plane(cz.i0)?;
                let v1 = plane(cz.i1)?;
                Ok(between_planes(
                    cz.x,
                    cz.x0,
                    cz.x1,
                    v0,
                    v1,
                    z_method.is_nearest(),
                ))
            };
            let v0 = volume(cu.i0)?;
            let v1 = volume(cu.i1)?;
            Ok(between_planes(
                cu.x,
                cu.x0,
                cu.x1,
                v0,
                v1,
                u_method.is_nearest(),
            ))
        },
    )
}

/// Spline interpolation of a 4-D grid with a temporal Z axis.
#[allow(clippy::too_many_arguments)]
pub fn spline_quadrivariate_temporal<T: GridValue>(
    grid: &TemporalGrid4D<'_, T>,
    x: &[f64],
    y: &[f64],
    z: &[i64],
    u: &[f64],
    z_resolution: Resolution,
    sink: &dyn WarningSink,
    nx: usize,
    ny: usize,
    fitting_model: FittingModel,
    boundary: Boundary,
    z_method: AxisMethod,
    u_method: AxisMethod,
    bounds_error: bool,
    num_threads: usize,
) -> Result<Vec<f64>> {
    check_same_length(x.len(), "y", y.len())?;
    check_same_length(x.len(), "z", z.len())?;
    check_same_length(x.len(), "u", u.len())?;
    check_window(fitting_model, nx, ny, boundary, grid.x())?;

    let instants = grid.z().safe_cast(z, z_resolution, sink)?;

    parallel::try_map_with(
        x.len(),
        num_threads,
        || SplineWorkspace::new(fitting_model),
        |workspace, index| {
            let (iz0, iz1, z0, z1, zt) =
                match locate_temporal(grid.z(), instants[index], bounds_error)? {
                    Some(interval) => interval,
                    None => return Ok(f64::NAN),
                };
            let cu = match CellInterval::locate(grid.u(), u[index], bounds_error)? {
                Some(cu) => cu,
                None => return Ok(f64::NAN),
            };
            let mut volume = |iu: usize| -> Result<f64> {
                let mut plane = |iz: usize| -> Result<f64> {
                    let frame = frame_or_nan(
                        Frame2D::sample(
                            grid.x(),
                            grid.y(),
                            x[index],
                            y[index],
                            nx,
                            ny,
                            boundary,
                            |ix, iy| grid.value(ix, iy, iz, iu).to_f64(),
                        ),
                        bounds_error,
                    )?;
                    Ok(match frame {
                        Some(frame) => workspace.evaluate(&frame),
                        None => f64::NAN,
                    })
                };
                let v0 = plane(iz0)?;
                let v1 = plane(iz1)?;
                Ok(between_planes(zt, z0, z1, v0, v1, z_method.is_nearest()))
            };
            let v0 = volume(cu.i0)?;
            let v1 = volume(cu.i1)?;
            Ok(between_planes(
                cu.x,
                cu.x0,
                cu.x1,
                v0,
                v1,
                u_method.is_nearest(),
            ))
        },
    )
}
