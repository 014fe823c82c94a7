/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines shared helpers for random coordinate generation and evaluation grids.
//
// Created on: 24 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::Mat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate a matrix of random geographic coordinates.
///
/// # Parameters
/// - `n`: Number of points to generate (rows in the output matrix).
/// - `lon`: Inclusive longitude range in degrees.
/// - `lat`: Inclusive latitude range in degrees.
/// - `seed`: Optional random seed.
///   - If `Some(seed)` is provided, the same sequence of points will be
///     generated deterministically across runs and platforms (useful for
///     reproducible tests).
///   - If `None`, the generator is seeded from the operating system's
///     randomness source.
///
/// # Returns
/// A `Mat<f64>` of shape `(n, 2)` holding `(lon, lat)` rows.
///
/// # Example
/// ```
/// use ferreus_geointerp::generate_random_coordinates;
///
/// // Generate 100 reproducible points over the tropics
/// let pts = generate_random_coordinates(100, (-180.0, 180.0), (-23.5, 23.5), Some(42));
/// assert_eq!(pts.nrows(), 100);
/// assert_eq!(pts.ncols(), 2);
/// ```
pub fn generate_random_coordinates(
    n: usize,
    lon: (f64, f64),
    lat: (f64, f64),
    seed: Option<u64>,
) -> Mat<f64> {
    let mut rng = match seed.is_some() {
        true => StdRng::seed_from_u64(seed.unwrap()),
        false => StdRng::from_os_rng(),
    };

    let mut coordinates = Mat::<f64>::zeros(n, 2);
    for row in 0..n {
        coordinates[(row, 0)] = rng.random_range(lon.0..lon.1);
        coordinates[(row, 1)] = rng.random_range(lat.0..lat.1);
    }

    coordinates
}

/// Create a regular evaluation grid from per-dimension ranges and sample
/// counts.
///
/// # Arguments
/// * `ranges` - Inclusive `(min, max)` range for each dimension.
/// * `counts` - Number of grid samples per range; must match `ranges.len()`.
///
/// # Returns
/// A `Mat<f64>` with one row per grid point and one column per dimension.
pub fn create_evaluation_grid(ranges: &[(f64, f64)], counts: &[usize]) -> Mat<f64> {
    assert_eq!(ranges.len(), counts.len());

    let dimensions = counts.to_vec();
    let total_points: usize = dimensions.iter().product();
    let num_dimensions = ranges.len();

    Mat::from_fn(total_points, num_dimensions, |row_idx, col_idx| {
        let dim_points = dimensions[col_idx];
        let (start, end) = ranges[col_idx];
        let step = (end - start) / (dim_points as f64 - 1.0);

        let stride = match col_idx == 0 {
            true => 1,
            false => dimensions[..col_idx].iter().product::<usize>(),
        };

        let index_in_dim = (row_idx / stride) % dim_points;
        start + step * index_in_dim as f64
    })
}
