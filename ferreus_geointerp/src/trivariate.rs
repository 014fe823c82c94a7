/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements 3-D grid interpolation: a bivariate kernel on both Z planes, closed linearly.
//
// Created on: 22 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # trivariate
//!
//! Interpolation of 3-D grids: the bivariate kernel is evaluated on the two
//! grid planes bracketing the Z target, and the planar results are closed
//! with a linear (or nearest) interpolation along Z. Grids with a temporal
//! Z axis take integer instants, cast to the axis resolution up front.

use crate::bivariate::{between_planes, BivariateInterpolator, CellInterval};
use crate::error::{Error, Result};
use crate::grid::{Grid3D, GridValue, TemporalGrid3D};
use crate::parallel;
use crate::temporal_axis::{Resolution, TemporalAxis};
use crate::warning::WarningSink;
use serde::{Deserialize, Serialize};

/// Interpolation method applied along the closing (Z or U) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisMethod {
    #[default]
    Linear,
    Nearest,
}

impl AxisMethod {
    #[inline]
    pub(crate) fn is_nearest(&self) -> bool {
        matches!(self, AxisMethod::Nearest)
    }
}

pub(crate) fn check_same_length(x: usize, name: &'static str, other: usize) -> Result<()> {
    match x == other {
        true => Ok(()),
        false => Err(Error::InvalidShape {
            name,
            expected: x,
            found: other,
        }),
    }
}

/// Locates the Z interval of a temporal axis, mirroring
/// [`CellInterval::locate`] for integer instants.
pub(crate) fn locate_temporal(
    axis: &TemporalAxis,
    z: i64,
    bounds_error: bool,
) -> Result<Option<(usize, usize, f64, f64, f64)>> {
    match axis.find_indexes(z) {
        Some((i0, i1)) => {
            let z0 = axis.coordinate_value(i0) as f64;
            let z1 = axis.coordinate_value(i1) as f64;
            Ok(Some((i0, i1, z0, z1, z as f64)))
        }
        None => match bounds_error {
            true => Err(Error::OutOfDomain {
                value: z as f64,
                min: axis.min_value() as f64,
                max: axis.max_value() as f64,
            }),
            false => Ok(None),
        },
    }
}

/// Interpolates a 3-D grid at arbitrary target positions.
///
/// # Arguments
/// * `grid` - The gridded field to interpolate.
/// * `x`, `y`, `z` - Target coordinates, one triple per output value.
/// * `interpolator` - Kernel evaluated on the bracketing (x, y) planes.
/// * `z_method` - Closing interpolation along the Z axis.
/// * `bounds_error` - Raise [`Error::OutOfDomain`] instead of yielding NaN.
/// * `num_threads` - Worker count: `0` uses all logical CPUs.
pub fn trivariate<T: GridValue>(
    grid: &Grid3D<'_, T>,
    x: &[f64],
    y: &[f64],
    z: &[f64],
    interpolator: &BivariateInterpolator,
    z_method: AxisMethod,
    bounds_error: bool,
    num_threads: usize,
) -> Result<Vec<f64>> {
    check_same_length(x.len(), "y", y.len())?;
    check_same_length(x.len(), "z", z.len())?;

    parallel::try_map(x.len(), num_threads, |index| {
        let cx = CellInterval::locate(grid.x(), x[index], bounds_error)?;
        let cy = CellInterval::locate(grid.y(), y[index], bounds_error)?;
        let cz = CellInterval::locate(grid.z(), z[index], bounds_error)?;
        let (cx, cy, cz) = match (cx, cy, cz) {
            (Some(cx), Some(cy), Some(cz)) => (cx, cy, cz),
            _ => return Ok(f64::NAN),
        };

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
                grid.value(ix, iy, iz).to_f64()
            })
        };
        Ok(between_planes(
            cz.x,
            cz.x0,
            cz.x1,
            plane(cz.i0),
            plane(cz.i1),
            z_method.is_nearest(),
        ))
    })
}

/// Interpolates a 3-D grid whose Z axis is temporal.
///
/// The `z` targets are instants in `z_resolution`; they are cast to the
/// axis resolution before the parallel region, warning through `sink` when
/// the cast truncates.
#[allow(clippy::too_many_arguments)]
pub fn trivariate_temporal<T: GridValue>(
    grid: &TemporalGrid3D<'_, T>,
    x: &[f64],
    y: &[f64],
    z: &[i64],
    z_resolution: Resolution,
    sink: &dyn WarningSink,
    interpolator: &BivariateInterpolator,
    z_method: AxisMethod,
    bounds_error: bool,
    num_threads: usize,
) -> Result<Vec<f64>> {
    check_same_length(x.len(), "y", y.len())?;
    check_same_length(x.len(), "z", z.len())?;

    let instants = grid.z().safe_cast(z, z_resolution, sink)?;

    parallel::try_map(x.len(), num_threads, |index| {
        let cx = CellInterval::locate(grid.x(), x[index], bounds_error)?;
        let cy = CellInterval::locate(grid.y(), y[index], bounds_error)?;
        let cz = locate_temporal(grid.z(), instants[index], bounds_error)?;
        let (cx, cy, (iz0, iz1, z0, z1, zt)) = match (cx, cy, cz) {
            (Some(cx), Some(cy), Some(cz)) => (cx, cy, cz),
            _ => return Ok(f64::NAN),
        };

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
                grid.value(ix, iy, iz).to_f64()
            })
        };
        Ok(between_planes(
            zt,
            z0,
            z1,
            plane(iz0),
            plane(iz1),
            z_method.is_nearest(),
        ))
    })
}
