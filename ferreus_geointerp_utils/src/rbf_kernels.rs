/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the radial basis functions used by the scattered-data interpolators.
//
// Created on: 20 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::{Mat, MatRef};
use serde::{Deserialize, Serialize};

/// Radial basis functions available for scattered-data interpolation.
///
/// The scale-free kernels (`Linear`, `Cubic`, `ThinPlate`) ignore the shape
/// parameter; the others use `epsilon` as a length scale in the same unit as
/// the distances passed to [`RadialBasisFunction::phi`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RadialBasisFunction {
    /// `phi(r) = r`
    Linear,

    /// `phi(r) = r^3`
    Cubic,

    /// `phi(r) = r^2 log(r)`
    ThinPlate,

    /// `phi(r) = exp(-(r / epsilon)^2)`
    Gaussian,

    /// `phi(r) = sqrt(1 + (r / epsilon)^2)`
    Multiquadric,

    /// `phi(r) = 1 / sqrt(1 + (r / epsilon)^2)`
    InverseMultiquadric,
}

impl RadialBasisFunction {
    /// Evaluates the basis function at distance `r`.
    #[inline(always)]
    pub fn phi(&self, r: f64, epsilon: f64) -> f64 {
        match self {
            RadialBasisFunction::Linear => r,
            RadialBasisFunction::Cubic => r.powi(3),
            RadialBasisFunction::ThinPlate => match r.abs() < f64::EPSILON {
                true => 0.0,
                false => r * r * r.ln(),
            },
            RadialBasisFunction::Gaussian => {
                let s = r / epsilon;
                (-s * s).exp()
            }
            RadialBasisFunction::Multiquadric => {
                let s = r / epsilon;
                (1.0 + s * s).sqrt()
            }
            RadialBasisFunction::InverseMultiquadric => {
                let s = r / epsilon;
                1.0 / (1.0 + s * s).sqrt()
            }
        }
    }
}

/// Returns the Euclidean distance between two points.
#[inline(always)]
pub fn get_distance(a: &[f64], b: &[f64]) -> f64 {
    let mut dist = 0.0;
    for (p, q) in a.iter().zip(b.iter()) {
        let diff = p - q;
        dist += diff * diff;
    }
    dist.sqrt()
}

/// Assembles the symmetric collocation matrix `Phi` for a set of points.
///
/// Each row of `points` is a point; entry `(i, j)` of the result is
/// `phi(|p_i - p_j|)`. `smooth` is subtracted on the diagonal to soften the
/// fit (zero enforces exact interpolation).
pub fn phi_matrix(
    points: &MatRef<f64>,
    kernel: RadialBasisFunction,
    epsilon: f64,
    smooth: f64,
) -> Mat<f64> {
    let n = points.nrows();
    let dims = points.ncols();
    let mut a = Mat::<f64>::zeros(n, n);
    let mut pi = vec![0.0; dims];
    let mut pj = vec![0.0; dims];

    for i in 0..n {
        for d in 0..dims {
            pi[d] = *points.get(i, d);
        }
        for j in i..n {
            for d in 0..dims {
                pj[d] = *points.get(j, d);
            }
            let value = kernel.phi(get_distance(&pi, &pj), epsilon);
            a[(i, j)] = value;
            a[(j, i)] = value;
        }
        a[(i, i)] -= smooth;
    }
    a
}
