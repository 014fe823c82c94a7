/////////////////////////////////////////////////////////////////////////////////////////////
//
// Adds the dense pivoted-LU solve backing the radial basis function interpolation.
//
// Created on: 23 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # linalg
//!
//! A small dense solver for the collocation systems assembled on k-nearest
//! neighborhoods. The systems are tiny (k by k with k of a few dozen), so a
//! straightforward partially pivoted elimination on a [`faer::Mat`] is both
//! simpler and faster than dispatching to a factorization designed for
//! large problems.

use crate::error::{Error, Result};
use faer::Mat;

/// Solves `A x = b` by Gaussian elimination with partial pivoting.
///
/// # Errors
/// [`Error::SingularSystem`] when a pivot falls below the numerical rank
/// tolerance, i.e. the system has no unique solution.
pub(crate) fn solve(a: &Mat<f64>, b: &[f64]) -> Result<Vec<f64>> {
    let n = a.nrows();
    debug_assert_eq!(a.ncols(), n);
    debug_assert_eq!(b.len(), n);

    let mut lu = a.clone();
    let mut x: Vec<f64> = b.to_vec();

    // Rank tolerance relative to the largest entry of the matrix.
    let mut max_entry = 0.0f64;
    for i in 0..n {
        for j in 0..n {
            max_entry = max_entry.max(lu[(i, j)].abs());
        }
    }
    let tolerance = f64::EPSILON * n as f64 * max_entry.max(1.0);

    for column in 0..n {
        let mut pivot = column;
        for row in column + 1..n {
            if lu[(row, column)].abs() > lu[(pivot, column)].abs() {
                pivot = row;
            }
        }
        if lu[(pivot, column)].abs() <= tolerance {
            return Err(Error::SingularSystem);
        }
        if pivot != column {
            for j in 0..n {
                let tmp = lu[(column, j)];
                lu[(column, j)] = lu[(pivot, j)];
                lu[(pivot, j)] = tmp;
            }
            x.swap(column, pivot);
        }

        let diagonal = lu[(column, column)];
        for row in column + 1..n {
            let factor = lu[(row, column)] / diagonal;
            if factor == 0.0 {
                continue;
            }
            for j in column + 1..n {
                lu[(row, j)] -= factor * lu[(column, j)];
            }
            x[row] -= factor * x[column];
        }
    }

    for row in (0..n).rev() {
        let mut value = x[row];
        for j in row + 1..n {
            value -= lu[(row, j)] * x[j];
        }
        x[row] = value / lu[(row, row)];
    }
    Ok(x)
}
