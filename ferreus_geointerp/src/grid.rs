/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the immutable N-D grid views binding axes to contiguous value buffers.
//
// Created on: 22 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # grid
//!
//! A grid is a tuple of axes plus a borrowed, contiguous, row-major value
//! buffer whose first axis is the outermost dimension. The grid never copies
//! the buffer: the owner must outlive every query. Missing samples are
//! encoded as NaN.

use crate::axis::Axis;
use crate::error::{Error, Result};
use crate::temporal_axis::TemporalAxis;
use num_traits::Float;
use std::fmt::Debug;

/// Scalar payload types accepted by the grids.
pub trait GridValue: Float + Copy + Debug + Send + Sync + 'static {
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

impl GridValue for f32 {
    #[inline(always)]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl GridValue for f64 {
    #[inline(always)]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value
    }
}

fn check_buffer<T>(name: &'static str, expected: usize, values: &[T]) -> Result<()> {
    match values.len() == expected {
        true => Ok(()),
        false => Err(Error::InvalidShape {
            name,
            expected,
            found: values.len(),
        }),
    }
}

/// Reverses a row-major buffer along one dimension.
fn flip_dimension<T: Copy>(values: &mut [T], shape: &[usize], dim: usize) {
    let outer: usize = shape[..dim].iter().product();
    let n = shape[dim];
    let inner: usize = shape[dim + 1..].iter().product();
    let block = n * inner;

    for o in 0..outer {
        let base = o * block;
        for i in 0..n / 2 {
            let j = n - 1 - i;
            for k in 0..inner {
                values.swap(base + i * inner + k, base + j * inner + k);
            }
        }
    }
}

/// A 2-D Cartesian grid view.
#[derive(Debug, Clone, Copy)]
pub struct Grid2D<'a, T: GridValue> {
    x: &'a Axis,
    y: &'a Axis,
    values: &'a [T],
}

impl<'a, T: GridValue> Grid2D<'a, T> {
    /// Binds two axes to a row-major `(x.len(), y.len())` buffer.
    pub fn new(x: &'a Axis, y: &'a Axis, values: &'a [T]) -> Result<Self> {
        check_buffer("z", x.len() * y.len(), values)?;
        Ok(Self { x, y, values })
    }

    pub fn x(&self) -> &Axis {
        self.x
    }

    pub fn y(&self) -> &Axis {
        self.y
    }

    pub fn values(&self) -> &[T] {
        self.values
    }

    #[inline(always)]
    pub fn value(&self, ix: usize, iy: usize) -> T {
        self.values[ix * self.y.len() + iy]
    }

    /// Returns ascending copies of both axes with the buffer re-ordered to
    /// match, for callers that require increasing axes.
    pub fn increasing_axes(&self) -> (Axis, Axis, Vec<T>) {
        let mut values = self.values.to_vec();
        let shape = [self.x.len(), self.y.len()];
        let mut x = self.x.clone();
        let mut y = self.y.clone();
        if !x.is_ascending() {
            x.flip();
            flip_dimension(&mut values, &shape, 0);
        }
        if !y.is_ascending() {
            y.flip();
            flip_dimension(&mut values, &shape, 1);
        }
        (x, y, values)
    }
}

/// A 3-D Cartesian grid view.
#[derive(Debug, Clone, Copy)]
pub struct Grid3D<'a, T: GridValue> {
    x: &'a Axis,
    y: &'a Axis,
    z: &'a Axis,
    values: &'a [T],
}

impl<'a, T: GridValue> Grid3D<'a, T> {
    /// Binds three axes to a row-major `(x.len(), y.len(), z.len())` buffer.
    pub fn new(x: &'a Axis, y: &'a Axis, z: &'a Axis, values: &'a [T]) -> Result<Self> {
        check_buffer("u", x.len() * y.len() * z.len(), values)?;
        Ok(Self { x, y, z, values })
    }

    pub fn x(&self) -> &Axis {
        self.x
    }

    pub fn y(&self) -> &Axis {
        self.y
    }

    pub fn z(&self) -> &Axis {
        self.z
    }

    pub fn values(&self) -> &[T] {
        self.values
    }

    #[inline(always)]
    pub fn value(&self, ix: usize, iy: usize, iz: usize) -> T {
        self.values[(ix * self.y.len() + iy) * self.z.len() + iz]
    }
}

/// A 4-D Cartesian grid view.
#[derive(Debug, Clone, Copy)]
pub struct Grid4D<'a, T: GridValue> {
    x: &'a Axis,
    y: &'a Axis,
    z: &'a Axis,
    u: &'a Axis,
    values: &'a [T],
}

impl<'a, T: GridValue> Grid4D<'a, T> {
    /// Binds four axes to a row-major
    /// `(x.len(), y.len(), z.len(), u.len())` buffer.
    pub fn new(
        x: &'a Axis,
        y: &'a Axis,
        z: &'a Axis,
        u: &'a Axis,
        values: &'a [T],
    ) -> Result<Self> {
        check_buffer("v", x.len() * y.len() * z.len() * u.len(), values)?;
        Ok(Self { x, y, z, u, values })
    }

    pub fn x(&self) -> &Axis {
        self.x
    }

    pub fn y(&self) -> &Axis {
        self.y
    }

    pub fn z(&self) -> &Axis {
        self.z
    }

    pub fn u(&self) -> &Axis {
        self.u
    }

    #[inline(always)]
    pub fn value(&self, ix: usize, iy: usize, iz: usize, iu: usize) -> T {
        self.values[((ix * self.y.len() + iy) * self.z.len() + iz) * self.u.len() + iu]
    }
}

/// A 3-D grid whose third axis is temporal.
#[derive(Debug, Clone, Copy)]
pub struct TemporalGrid3D<'a, T: GridValue> {
    x: &'a Axis,
    y: &'a Axis,
    z: &'a TemporalAxis,
    values: &'a [T],
}

impl<'a, T: GridValue> TemporalGrid3D<'a, T> {
    pub fn new(
        x: &'a Axis,
        y: &'a Axis,
        z: &'a TemporalAxis,
        values: &'a [T],
    ) -> Result<Self> {
        check_buffer("u", x.len() * y.len() * z.len(), values)?;
        Ok(Self { x, y, z, values })
    }

    pub fn x(&self) -> &Axis {
        self.x
    }

    pub fn y(&self) -> &Axis {
        self.y
    }

    pub fn z(&self) -> &TemporalAxis {
        self.z
    }

    #[inline(always)]
    pub fn value(&self, ix: usize, iy: usize, iz: usize) -> T {
        self.values[(ix * self.y.len() + iy) * self.z.len() + iz]
    }
}

/// A 4-D grid whose third axis is temporal.
#[derive(Debug, Clone, Copy)]
pub struct TemporalGrid4D<'a, T: GridValue> {
    x: &'a Axis,
    y: &'a Axis,
    z: &'a TemporalAxis,
    u: &'a Axis,
    values: &'a [T],
}

impl<'a, T: GridValue> TemporalGrid4D<'a, T> {
    pub fn new(
        x: &'a Axis,
        y: &'a Axis,
        z: &'a TemporalAxis,
        u: &'a Axis,
        values: &'a [T],
    ) -> Result<Self> {
        check_buffer("v", x.len() * y.len() * z.len() * u.len(), values)?;
        Ok(Self { x, y, z, u, values })
    }

    pub fn x(&self) -> &Axis {
        self.x
    }

    pub fn y(&self) -> &Axis {
        self.y
    }

    pub fn z(&self) -> &TemporalAxis {
        self.z
    }

    pub fn u(&self) -> &Axis {
        self.u
    }

    #[inline(always)]
    pub fn value(&self, ix: usize, iy: usize, iz: usize, iu: usize) -> T {
        self.values[((ix * self.y.len() + iy) * self.z.len() + iz) * self.u.len() + iu]
    }
}
