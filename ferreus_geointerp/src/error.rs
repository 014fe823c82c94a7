/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the error type shared by the axis, grid, tree and binning components.
//
// Created on: 21 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use std::fmt;

/// Result alias for fallible operations of this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the interpolation and binning components.
///
/// Input validation runs before any parallel region, so a call either fails
/// with one of these kinds up front or runs to completion.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An array length does not match the dimension it is bound to.
    InvalidShape {
        /// Name of the offending parameter.
        name: &'static str,
        expected: usize,
        found: usize,
    },

    /// An argument violates a documented precondition.
    InvalidArgument { message: String },

    /// A query coordinate lies outside a non-circular axis while
    /// `bounds_error` is enabled.
    OutOfDomain { value: f64, min: f64, max: f64 },

    /// `increment()` was requested on an irregularly spaced axis.
    NotRegular,

    /// A radial basis collocation system has no unique solution.
    SingularSystem,
}

impl Error {
    /// Shorthand for an [`Error::InvalidArgument`] with a formatted message.
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidShape {
                name,
                expected,
                found,
            } => write!(
                f,
                "{} could not be broadcast with the bound dimension: expected {}, found {}",
                name, expected, found
            ),
            Error::InvalidArgument { message } => write!(f, "{}", message),
            Error::OutOfDomain { value, min, max } => write!(
                f,
                "coordinate {} is out of the axis definition range [{}, {}]",
                value, min, max
            ),
            Error::NotRegular => {
                write!(f, "this axis is not regular, the increment is undefined")
            }
            Error::SingularSystem => {
                write!(f, "the collocation system has no unique solution")
            }
        }
    }
}

impl std::error::Error for Error {}
