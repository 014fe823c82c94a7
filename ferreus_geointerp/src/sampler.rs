/////////////////////////////////////////////////////////////////////////////////////////////
//
// Assembles dense local windows (frames) around a target for the spline kernels.
//
// Created on: 23 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # sampler
//!
//! A frame is the dense `2nx x 2ny` neighborhood of grid samples around a
//! target, with strictly ascending abscissae on both axes. Out-of-range
//! positions are resolved by the boundary policy: their value comes from the
//! clamped / wrapped / mirrored grid index while their coordinate is
//! extended monotonically, so the spline kernels always see a well-ordered
//! window. Circular X coordinates are unwrapped across the seam for the
//! same reason.

use crate::axis::{Axis, Boundary};
use crate::error::{Error, Result};

/// One axis of a frame: monotone coordinates, the grid (presentation)
/// indices supplying each sample, and the normalized target coordinate.
#[derive(Debug, Clone)]
pub(crate) struct FrameAxis {
    pub coordinates: Vec<f64>,
    pub indices: Vec<usize>,
    pub target: f64,
}

impl FrameAxis {
    /// Builds the `2 * half` frame positions of `axis` around `x`.
    ///
    /// Returns `Ok(None)` when the boundary policy is [`Boundary::Undef`]
    /// and the window leaves the axis; targets outside a non-circular axis
    /// surface as [`Error::OutOfDomain`].
    pub(crate) fn new(axis: &Axis, x: f64, half: usize, boundary: Boundary) -> Result<Option<Self>> {
        let n = axis.len() as i64;
        let xn = axis.normalize_coordinate(x);
        let bracket = match axis.ascending_bracket(xn) {
            Some(index) => index as i64,
            None => {
                return Err(Error::OutOfDomain {
                    value: x,
                    min: axis.min_value(),
                    max: axis.max_value(),
                })
            }
        };

        let window = 2 * half;
        let mut coordinates = Vec::with_capacity(window);
        let mut indices = Vec::with_capacity(window);

        // Local spacing used to extend coordinates past the ends.
        let front_step = axis.ascending_value(1) - axis.ascending_value(0);
        let back_step =
            axis.ascending_value(n as usize - 1) - axis.ascending_value(n as usize - 2);

        for offset in 0..window as i64 {
            let raw = bracket + 1 - half as i64 + offset;
            let (index, coordinate) = match axis.period() {
                Some(period) => {
                    // Unwrap across the seam so the frame stays monotone.
                    let wrapped = raw.rem_euclid(n) as usize;
                    let turns = raw.div_euclid(n) as f64;
                    (wrapped, axis.ascending_value(wrapped) + turns * period)
                }
                None => {
                    if raw < 0 {
                        let index = match boundary {
                            Boundary::Expand | Boundary::Wrap => 0,
                            Boundary::Sym => (-raw).min(n - 1) as usize,
                            Boundary::Undef => return Ok(None),
                        };
                        (index, axis.ascending_value(0) + raw as f64 * front_step)
                    } else if raw >= n {
                        let index = match boundary {
                            Boundary::Expand | Boundary::Wrap => n as usize - 1,
                            Boundary::Sym => (2 * (n - 1) - raw).max(0) as usize,
                            Boundary::Undef => return Ok(None),
                        };
                        (
                            index,
                            axis.ascending_value(n as usize - 1)
                                + (raw - (n - 1)) as f64 * back_step,
                        )
                    } else {
                        (raw as usize, axis.ascending_value(raw as usize))
                    }
                }
            };
            coordinates.push(coordinate);
            indices.push(axis.present_index(index));
        }

        Ok(Some(Self {
            coordinates,
            indices,
            target: xn,
        }))
    }
}

/// A dense 2-D frame ready for a tensor-product kernel.
#[derive(Debug, Clone)]
pub(crate) struct Frame2D {
    pub x: FrameAxis,
    pub y: FrameAxis,
    /// Row-major `(2nx, 2ny)` samples; NaN marks missing values.
    pub values: Vec<f64>,
}

impl Frame2D {
    /// Gathers the frame samples through `value(ix, iy)` (presentation
    /// indices).
    pub(crate) fn sample<F>(
        x_axis: &Axis,
        y_axis: &Axis,
        x: f64,
        y: f64,
        nx: usize,
        ny: usize,
        boundary: Boundary,
        value: F,
    ) -> Result<Option<Self>>
    where
        F: Fn(usize, usize) -> f64,
    {
        let fx = match FrameAxis::new(x_axis, x, nx, boundary)? {
            Some(frame) => frame,
            None => return Ok(None),
        };
        let fy = match FrameAxis::new(y_axis, y, ny, boundary)? {
            Some(frame) => frame,
            None => return Ok(None),
        };

        let mut values = Vec::with_capacity(fx.indices.len() * fy.indices.len());
        for &ix in &fx.indices {
            for &iy in &fy.indices {
                values.push(value(ix, iy));
            }
        }
        Ok(Some(Self {
            x: fx,
            y: fy,
            values,
        }))
    }

    /// True when any frame sample is undefined.
    pub(crate) fn has_nan(&self) -> bool {
        self.values.iter().any(|v| v.is_nan())
    }

    #[inline]
    pub(crate) fn value(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.y.indices.len() + j]
    }
}
