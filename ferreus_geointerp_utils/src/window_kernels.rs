/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the window functions used for distance-weighted neighborhood averaging.
//
// Created on: 20 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Half-window weighting functions.
//!
//! Each window is evaluated on the normalized distance `x = d / r` where `d`
//! is the distance from the target and `r` the search radius. All windows
//! return their peak weight at `x = 0` and taper towards `x = 1`; the weight
//! is zero for `x > 1`.

use crate::math::sinc;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window functions available for neighborhood weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WindowFunction {
    Blackman,
    BlackmanHarris,
    Boxcar,
    FlatTop,
    /// `arg` is the standard deviation expressed as a fraction of the radius.
    Gaussian,
    Hamming,
    Hann,
    /// `arg` is the number of lobes, at least one.
    Lanczos,
    Nuttall,
    Parzen,
    Welch,
}

impl WindowFunction {
    /// Evaluates the window weight for a sample at distance `d` from the
    /// target with search radius `r`.
    ///
    /// `arg` parameterizes the `Gaussian` (standard deviation as a fraction
    /// of `r`) and `Lanczos` (lobe count) windows and is ignored otherwise.
    pub fn weight(&self, d: f64, r: f64, arg: f64) -> f64 {
        let x = d / r;
        if x > 1.0 {
            return 0.0;
        }
        match self {
            WindowFunction::Blackman => {
                0.42 + 0.5 * (PI * x).cos() + 0.08 * (2.0 * PI * x).cos()
            }
            WindowFunction::BlackmanHarris => {
                0.35875 + 0.48829 * (PI * x).cos() + 0.14128 * (2.0 * PI * x).cos()
                    + 0.01168 * (3.0 * PI * x).cos()
            }
            WindowFunction::Boxcar => 1.0,
            WindowFunction::FlatTop => {
                0.21557895 + 0.41663158 * (PI * x).cos()
                    + 0.277263158 * (2.0 * PI * x).cos()
                    + 0.083578947 * (3.0 * PI * x).cos()
                    + 0.006947368 * (4.0 * PI * x).cos()
            }
            WindowFunction::Gaussian => {
                let sigma = arg;
                (-0.5 * (x / sigma) * (x / sigma)).exp()
            }
            WindowFunction::Hamming => 0.53836 + 0.46164 * (PI * x).cos(),
            WindowFunction::Hann => 0.5 * (1.0 + (PI * x).cos()),
            WindowFunction::Lanczos => {
                let lobes = arg.max(1.0);
                sinc(x) * sinc(x / lobes)
            }
            WindowFunction::Nuttall => {
                0.3635819 + 0.4891775 * (PI * x).cos() + 0.1365995 * (2.0 * PI * x).cos()
                    + 0.0106411 * (3.0 * PI * x).cos()
            }
            WindowFunction::Parzen => match x <= 0.5 {
                true => 1.0 - 6.0 * x * x * (1.0 - x),
                false => 2.0 * (1.0 - x).powi(3),
            },
            WindowFunction::Welch => 1.0 - x * x,
        }
    }

    /// True when the window weight is non-negative over `[0, 1]`.
    ///
    /// Windows with this property yield weighted averages bounded by the
    /// extrema of the samples. `FlatTop` and `Lanczos` take small negative
    /// values in their tails.
    pub fn is_non_negative(&self) -> bool {
        !matches!(self, WindowFunction::FlatTop | WindowFunction::Lanczos)
    }
}

/// All implemented window functions, for iteration in tests and bindings.
pub const ALL_WINDOW_FUNCTIONS: [WindowFunction; 11] = [
    WindowFunction::Blackman,
    WindowFunction::BlackmanHarris,
    WindowFunction::Boxcar,
    WindowFunction::FlatTop,
    WindowFunction::Gaussian,
    WindowFunction::Hamming,
    WindowFunction::Hann,
    WindowFunction::Lanczos,
    WindowFunction::Nuttall,
    WindowFunction::Parzen,
    WindowFunction::Welch,
];
