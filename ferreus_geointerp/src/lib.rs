/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API and high-level documentation for geo-referenced interpolation.
//
// Created on: 20 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Optimized interpolation and binning of geo-referenced data.
//!
//! This crate evaluates scalar fields sampled on regular Cartesian grids
//! (2-D to 4-D, with optional circular and temporal axes) or as scattered
//! geodetic point clouds, and aggregates sample streams into gridded
//! statistics.
//!
//! The building blocks:
//!
//! - [`Axis`] / [`TemporalAxis`] - monotonic coordinate vectors with O(1)
//!   lookup on regular spacings, bisection on irregular ones, and
//!   wrap-around semantics for longitudes.
//! - [`Grid2D`], [`Grid3D`], [`Grid4D`] (and their temporal variants) -
//!   immutable views binding axes to contiguous value buffers.
//! - [`bivariate`], [`trivariate`], [`quadrivariate`] - interpolation from
//!   the enclosing cell (nearest, bilinear, inverse distance weighting),
//!   extended linearly along the Z and U axes.
//! - [`spline_bivariate`] and friends - bicubic and spline interpolation
//!   over sampled frames with configurable boundary policies.
//! - [`RTree3D`] - a geodetic R\*-tree for scattered data, with k-nearest
//!   and radius queries plus inverse-distance, radial-basis-function and
//!   window-function interpolation.
//! - [`Binning2D`] / [`Histogram2D`] - streaming 2-D aggregation with
//!   weighted central moments, or bounded histograms for quantiles.
//! - [`fill`] - gap filling of gridded fields by Poisson relaxation or
//!   LOESS regression.
//!
//! Every vectorized entry point takes a `num_threads` argument: `0` uses
//! all logical CPUs, `1` disables parallelism. Pure interpolators return
//! bit-identical results for any worker count.
//!
//! # Example
//!
//! ```
//! use ferreus_geointerp::{bivariate, Axis, BivariateInterpolator, Grid2D};
//!
//! // A 4x4 lattice sampling the plane v(x, y) = 2x - 3y + 1.
//! let x = Axis::new(&[0.0, 1.0, 2.0, 3.0], false).unwrap();
//! let y = Axis::new(&[0.0, 1.0, 2.0, 3.0], false).unwrap();
//! let values: Vec<f64> = (0..16)
//!     .map(|i| 2.0 * (i / 4) as f64 - 3.0 * (i % 4) as f64 + 1.0)
//!     .collect();
//! let grid = Grid2D::new(&x, &y, &values).unwrap();
//!
//! let result = bivariate(
//!     &grid,
//!     &[0.37],
//!     &[0.12],
//!     &BivariateInterpolator::Bilinear,
//!     false,
//!     1,
//! )
//! .unwrap();
//! assert!((result[0] - (2.0 * 0.37 - 3.0 * 0.12 + 1.0)).abs() < 1e-12);
//! ```

mod axis;

mod common;

mod temporal_axis;

mod geodetic;

mod grid;

mod sampler;

mod bivariate;

mod trivariate;

mod quadrivariate;

mod spline;

pub mod fill;

mod rtree;

mod binning;

mod histogram;

mod linalg;

pub mod parallel;

mod error;

pub mod warning;

pub use {
    axis::{Axis, Boundary, DEFAULT_CIRCLE, DEFAULT_EPSILON},
    binning::Binning2D,
    bivariate::{bivariate, BivariateInterpolator},
    common::{create_evaluation_grid, generate_random_coordinates},
    error::{Error, Result},
    geodetic::{Coordinates, DistanceStrategy, Lla, Spheroid},
    grid::{Grid2D, Grid3D, Grid4D, GridValue, TemporalGrid3D, TemporalGrid4D},
    histogram::Histogram2D,
    quadrivariate::{quadrivariate, quadrivariate_temporal},
    rtree::{Neighbor, RTree3D},
    spline::{
        spline_bivariate, spline_quadrivariate, spline_quadrivariate_temporal,
        spline_trivariate, spline_trivariate_temporal,
    },
    temporal_axis::{safe_cast_values, Resolution, TemporalAxis},
    trivariate::{trivariate, trivariate_temporal, AxisMethod},
};

// The kernel and fitting-model vocabulary types come from the utility
// crate; re-export them so callers need a single dependency.
pub use ferreus_geointerp_utils::{
    FittingModel, RadialBasisFunction, WindowFunction, DEFAULT_BIN_COUNT,
};
