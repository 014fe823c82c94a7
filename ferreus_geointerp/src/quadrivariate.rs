/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements 4-D grid interpolation: trivariate on both U hyperplanes, closed linearly.
//
// Created on: 22 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::bivariate::{between_planes, BivariateInterpolator, CellInterval};
use crate::error::Result;
use crate::grid::{Grid4D, GridValue, TemporalGrid4D};
use crate::parallel;
use crate::temporal_axis::Resolution;
use crate::trivariate::{check_same_length, locate_temporal, AxisMethod};
use crate::warning::WarningSink;

/// Interpolates a 4-D grid at arbitrary target positions: the trivariate
/// result is computed on both U hyperplanes and closed linearly (or by
/// nearest) along U.
#[allow(clippy::too_many_arguments)]
pub fn quadrivariate<T: GridValue>(
    grid: &Grid4D<'_, T>,
    x: &[f64],
    y: &[f64],
    z: &[f64],
    u: &[f64],
    interpolator: &BivariateInterpolator,
    z_method: AxisMethod,
    u_method: AxisMethod,
    bounds_error: bool,
    num_threads: usize,
) -> Result<Vec<f64>> {
    check_same_length(x.len(), "y", y.len())?;
    check_same_length(x.len(), "z", z.len())?;
    check_same_length(x.len(), "u", u.len())?;

    parallel::try_map(x.len(), num_threads, |index| {
        let cx = CellInterval::locate(grid.x(), x[index], bounds_error)?;
        let cy = CellInterval::locate(grid.y(), y[index], bounds_error)?;
        let cz = CellInterval::locate(grid.z(), z[index], bounds_error)?;
        let cu = CellInterval::locate(grid.u(), u[index], bounds_error)?;
        let (cx, cy, cz, cu) = match (cx, cy, cz, cu) {
            (Some(cx), Some(cy), Some(cz), Some(cu)) => (cx, cy, cz, cu),
            _ => return Ok(f64::NAN),
        };

        let volume = |iu: usize| {
            let plane = |iz: usize| {
                interpolator.evaluate(&cx, &cy, |i, j| {
                    let ix = match i == 0 {
                        true => cx.i0,
                        false => cx.i1,
                    };
                    let iy = match j == 0 {
                        true => cy.i0,
                        false => cy.i1,
                    };
                    grid.value(ix, iy, iz, iu).to_f64()
                })
            };
            between_planes(
                cz.x,
                cz.x0,
                cz.x1,
                plane(cz.i0),
                plane(cz.i1),
                z_method.is_nearest(),
            )
        };
        Ok(between_planes(
            cu.x,
            cu.x0,
            cu.x1,
            volume(cu.i0),
            volume(cu.i1),
            u_method.is_nearest(),
        ))
    })
}

/// Interpolates a 4-D grid whose Z axis is temporal; `z` targets are
/// instants in `z_resolution`, cast up front.
#[allow(clippy::too_many_arguments)]
pub fn quadrivariate_temporal<T: GridValue>(
    grid: &TemporalGrid4D<'_, T>,
    x: &[f64],
    y: &[f64],
    z: &[i64],
    u: &[f64],
    z_resolution: Resolution,
    sink: &dyn WarningSink,
    interpolator: &BivariateInterpolator,
    z_method: AxisMethod,
    u_method: AxisMethod,
    bounds_error: bool,
    num_threads: usize,
) -> Result<Vec<f64>> {
    check_same_length(x.len(), "y", y.len())?;
    check_same_length(x.len(), "z", z.len())?;
    check_same_length(x.len(), "u", u.len())?;

    let instants = grid.z().safe_cast(z, z_resolution, sink)?;

    parallel::try_map(x.len(), num_threads, |index| {
        let cx = CellInterval::locate(grid.x(), x[index], bounds_error)?;
        let cy = CellInterval::locate(grid.y(), y[index], bounds_error)?;
        let cz = locate_temporal(grid.z(), instants[index], bounds_error)?;
        let cu = CellInterval::locate(grid.u(), u[index], bounds_error)?;
        let (cx, cy, (iz0, iz1, z0, z1, zt), cu) = match (cx, cy, cz, cu) {
            (Some(cx), Some(cy), Some(cz), Some(cu)) => (cx, cy, cz, cu),
            _ => return Ok(f64::NAN),
        };

        let volume = |iu: usize| {
            let plane = |iz: usize| {
                interpolator.evaluate(&cx, &cy, |i, j| {
                    let ix = match i == 0 {
                        true => cx.i0,
                        false => cx.i1,
                    };
                    let iy = match j == 0 {
                        true => cy.i0,
                        false => cy.i1,
                    };
                    grid.value(ix, iy, iz, iu).to_f64()
                })
            };
            between_planes(zt, z0, z1, plane(iz0), plane(iz1), z_method.is_nearest())
        };
        Ok(between_planes(
            cu.x,
            cu.x0,
            cu.x1,
            volume(cu.i0),
            volume(cu.i1),
            u_method.is_nearest(),
        ))
    })
}
