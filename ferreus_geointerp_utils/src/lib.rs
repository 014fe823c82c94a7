/////////////////////////////////////////////////////////////////////////////////////////////
//
// Re-exports kernel functions, fitting models and accumulators used across the geointerp crates.
//
// Created on: 20 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Utilities for the [`ferreus_geointerp`] crate
//!
//! Shared math primitives with no orchestration logic: radial basis and
//! window kernel functions, the univariate fitting models used by the
//! gridded spline interpolators, streaming moment accumulators, and the
//! bounded streaming histogram.

pub mod math;

mod accumulators;
mod interpolate1d;
mod rbf_kernels;
mod streaming_histogram;
mod window_kernels;

/// Implemented kernels for scattered-data interpolation.
pub mod kernels {
    pub use super::rbf_kernels::*;
    pub use super::window_kernels::*;
}

pub use {
    accumulators::Accumulators,
    interpolate1d::{FittingModel, Interpolator1D},
    rbf_kernels::{get_distance, phi_matrix, RadialBasisFunction},
    streaming_histogram::{StreamingHistogram, DEFAULT_BIN_COUNT},
    window_kernels::{WindowFunction, ALL_WINDOW_FUNCTIONS},
};
