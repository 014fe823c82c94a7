/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the 1-D coordinate axis with regular, irregular and circular lookup.
//
// Created on: 21 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # axis
//!
//! A coordinate axis is an ordered sequence of monotonic coordinates with
//! O(1) lookup on regularly spaced axes, bisection on irregular axes, and
//! wrap-around semantics for circular (longitude-like) axes.
//!
//! Internally the coordinates are always stored in ascending order; a
//! presentation flag maps indices back to the caller's original orientation,
//! which makes [`Axis::flip`] a constant-time operation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Maximum allowed relative difference between coordinate steps for an axis
/// to be considered regular.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Period used by circular axes unless overridden, in degrees.
pub const DEFAULT_CIRCLE: f64 = 360.0;

/// Type of boundary handling when indexing past an axis endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boundary {
    /// Expand the boundary as a constant.
    Expand,

    /// Circular boundary conditions.
    Wrap,

    /// Symmetrical boundary conditions.
    Sym,

    /// Boundary violation is not defined.
    Undef,
}

/// Numeric behaviour required from an axis coordinate type.
///
/// The axis family is tagged rather than dynamically dispatched: the two
/// concrete coordinate types (`f64` for spatial axes, `i64` for temporal
/// axes) implement exact index arithmetic in their own domain.
pub(crate) trait CoordinateScalar:
    Copy + PartialOrd + std::fmt::Debug + Send + Sync + 'static
{
    fn to_f64(self) -> f64;

    /// Returns the uniform step when the sequence is regularly spaced to
    /// within `epsilon` (relative to the mean step), `None` otherwise.
    /// The sequence is strictly ascending with at least two values.
    fn uniform_step(values: &[Self], epsilon: f64) -> Option<Self>;

    /// Index of the coordinate closest to `self` on a regular axis; exact
    /// midpoints resolve to the lower index. The result may lie outside
    /// `[0, size)`.
    fn nearest_step_index(self, front: Self, step: Self) -> i64;

    /// Floor index of the interval containing `self` on a regular axis.
    fn bracket_step_index(self, front: Self, step: Self) -> i64;

    /// Coordinate at `index` on a regular axis.
    fn coordinate_at(front: Self, step: Self, index: usize) -> Self;
}

impl CoordinateScalar for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    fn uniform_step(values: &[f64], epsilon: f64) -> Option<f64> {
        let n = values.len();
        let mean = (values[n - 1] - values[0]) / (n - 1) as f64;
        for pair in values.windows(2) {
            if ((pair[1] - pair[0]) - mean).abs() > epsilon * mean.abs() {
                return None;
            }
        }
        Some(mean)
    }

    #[inline]
    fn nearest_step_index(self, front: f64, step: f64) -> i64 {
        let t = (self - front) / step;
        let floor = t.floor();
        let index = match t - floor > 0.5 {
            true => floor + 1.0,
            false => floor,
        };
        index as i64
    }

    #[inline]
    fn bracket_step_index(self, front: f64, step: f64) -> i64 {
        ((self - front) / step).floor() as i64
    }

    #[inline]
    fn coordinate_at(front: f64, step: f64, index: usize) -> f64 {
        front + step * index as f64
    }
}

impl CoordinateScalar for i64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn uniform_step(values: &[i64], _epsilon: f64) -> Option<i64> {
        let step = values[1] - values[0];
        for pair in values.windows(2) {
            if pair[1] - pair[0] != step {
                return None;
            }
        }
        Some(step)
    }

    #[inline]
    fn nearest_step_index(self, front: i64, step: i64) -> i64 {
        let delta = self - front;
        let quotient = delta.div_euclid(step);
        let remainder = delta.rem_euclid(step);
        match 2 * remainder > step {
            true => quotient + 1,
            false => quotient,
        }
    }

    #[inline]
    fn bracket_step_index(self, front: i64, step: i64) -> i64 {
        (self - front).div_euclid(step)
    }

    #[inline]
    fn coordinate_at(front: i64, step: i64, index: usize) -> i64 {
        front + step * index as i64
    }
}

/// Coordinate storage: regular axes keep only their endpoints and step,
/// irregular axes keep the full ascending sequence.
#[derive(Debug, Clone, PartialEq)]
enum Container<T> {
    Regular {
        front: T,
        step: T,
        size: usize,
    },
    Irregular {
        values: Vec<T>,
    },
}

impl<T: CoordinateScalar> Container<T> {
    fn new(values: Vec<T>, epsilon: f64) -> Self {
        if values.len() >= 2 {
            if let Some(step) = T::uniform_step(&values, epsilon) {
                return Container::Regular {
                    front: values[0],
                    step,
                    size: values.len(),
                };
            }
        }
        Container::Irregular { values }
    }

    fn size(&self) -> usize {
        match self {
            Container::Regular { size, .. } => *size,
            Container::Irregular { values } => values.len(),
        }
    }

    fn value(&self, index: usize) -> T {
        match self {
            Container::Regular { front, step, .. } => T::coordinate_at(*front, *step, index),
            Container::Irregular { values } => values[index],
        }
    }

    fn front(&self) -> T {
        self.value(0)
    }

    fn back(&self) -> T {
        self.value(self.size() - 1)
    }

    fn step(&self) -> Option<T> {
        match self {
            Container::Regular { step, .. } => Some(*step),
            Container::Irregular { .. } => None,
        }
    }

    /// Index of the closest coordinate, unbounded: the result is `-1` below
    /// the front, `size` beyond the back for irregular axes, and any integer
    /// for regular axes.
    fn nearest(&self, x: T) -> i64 {
        match self {
            Container::Regular { front, step, .. } => x.nearest_step_index(*front, *step),
            Container::Irregular { values } => {
                if x < values[0] {
                    return -1;
                }
                let n = values.len();
                if x > values[n - 1] {
                    return n as i64;
                }
                let hi = values.partition_point(|v| *v < x).min(n - 1);
                if hi == 0 {
                    return 0;
                }
                let lo = hi - 1;
                let d_lo = x.to_f64() - values[lo].to_f64();
                let d_hi = values[hi].to_f64() - x.to_f64();
                match d_hi < d_lo {
                    true => hi as i64,
                    false => lo as i64,
                }
            }
        }
    }

    /// Floor index of the bracketing interval, unbounded.
    fn bracket(&self, x: T) -> i64 {
        match self {
            Container::Regular { front, step, .. } => x.bracket_step_index(*front, *step),
            Container::Irregular { values } => {
                if x < values[0] {
                    return -1;
                }
                values.partition_point(|v| *v <= x) as i64 - 1
            }
        }
    }
}

/// Generic monotonic axis over a coordinate scalar, stored ascending.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CoordinateAxis<T> {
    container: Container<T>,
    is_ascending: bool,
    epsilon: f64,
}

impl<T: CoordinateScalar> CoordinateAxis<T> {
    /// Builds an axis from caller-ordered values, which must be strictly
    /// monotonic.
    pub(crate) fn new(values: &[T], epsilon: f64) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::invalid_argument("an axis requires at least one value"));
        }

        let is_ascending = match values.len() >= 2 {
            true => values[0] < values[1],
            false => true,
        };
        let mut ascending: Vec<T> = values.to_vec();
        if !is_ascending {
            ascending.reverse();
        }
        if ascending.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::invalid_argument(
                "axis values are not strictly monotonic",
            ));
        }

        Ok(Self {
            container: Container::new(ascending, epsilon),
            is_ascending,
            epsilon,
        })
    }

    pub(crate) fn size(&self) -> usize {
        self.container.size()
    }

    pub(crate) fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub(crate) fn is_ascending(&self) -> bool {
        self.is_ascending
    }

    pub(crate) fn is_regular(&self) -> bool {
        self.container.step().is_some()
    }

    /// Smallest coordinate, independent of the presentation order.
    pub(crate) fn min_value(&self) -> T {
        self.container.front()
    }

    /// Largest coordinate, independent of the presentation order.
    pub(crate) fn max_value(&self) -> T {
        self.container.back()
    }

    /// First coordinate in presentation order.
    pub(crate) fn front(&self) -> T {
        match self.is_ascending {
            true => self.container.front(),
            false => self.container.back(),
        }
    }

    /// Last coordinate in presentation order.
    pub(crate) fn back(&self) -> T {
        match self.is_ascending {
            true => self.container.back(),
            false => self.container.front(),
        }
    }

    /// Reverses the presentation order of the axis in place.
    pub(crate) fn flip(&mut self) {
        self.is_ascending = !self.is_ascending;
    }

    /// Coordinate at `index` in presentation order.
    pub(crate) fn coordinate_value(&self, index: usize) -> T {
        self.container.value(self.ascending_index(index))
    }

    /// Step between adjacent coordinates in presentation order.
    pub(crate) fn increment(&self) -> Result<T> {
        // The presentation step of a descending axis is the negated
        // ascending step; negation is left to the concrete axis types so the
        // generic core stays free of arithmetic bounds.
        self.container.step().ok_or(Error::NotRegular)
    }

    #[inline]
    fn ascending_index(&self, index: usize) -> usize {
        match self.is_ascending {
            true => index,
            false => self.size() - 1 - index,
        }
    }

    #[inline]
    pub(crate) fn present_index(&self, ascending: usize) -> usize {
        self.ascending_index(ascending)
    }

    /// Index of the closest coordinate in the ascending domain, unbounded.
    fn nearest_ascending(&self, x: T) -> i64 {
        self.container.nearest(x)
    }

    /// Nearest grid index in presentation order. Out-of-range targets yield
    /// `None` unless `bounded`, in which case the nearest endpoint wins.
    pub(crate) fn find_index(&self, x: T, bounded: bool) -> Option<usize> {
        let n = self.size() as i64;
        let raw = self.nearest_ascending(x);
        let index = match raw < 0 || raw >= n {
            true => match bounded {
                true => raw.clamp(0, n - 1),
                false => return None,
            },
            false => raw,
        };
        Some(self.present_index(index as usize))
    }

    /// Bracketing pair `(i0, i1)` in presentation order such that the axis
    /// coordinates at `i0` and `i1` enclose `x`.
    pub(crate) fn find_indexes(&self, x: T) -> Option<(usize, usize)> {
        let n = self.size();
        if n == 1 {
            let only = self.container.front();
            return match !(x < only) && !(only < x) {
                true => Some((0, 0)),
                false => None,
            };
        }
        if x < self.min_value() || x > self.max_value() {
            return None;
        }
        let i0 = (self.container.bracket(x).max(0) as usize).min(n - 2);
        Some((self.present_index(i0), self.present_index(i0 + 1)))
    }

    /// Window of `2 * half_window` ascending-domain indices around `x`,
    /// honoring the boundary policy. Returns `None` when `x` lies outside
    /// the axis or when the policy is [`Boundary::Undef`] and the window
    /// leaves the axis.
    pub(crate) fn find_indexes_around(
        &self,
        x: T,
        half_window: usize,
        boundary: Boundary,
    ) -> Option<Vec<usize>> {
        let n = self.size() as i64;
        if x < self.min_value() || x > self.max_value() {
            return None;
        }
        let i0 = self.container.bracket(x).clamp(0, n - 2);

        let mut window = Vec::with_capacity(2 * half_window);
        for offset in 0..2 * half_window as i64 {
            let raw = i0 + 1 - half_window as i64 + offset;
            let index = match boundary {
                Boundary::Expand => raw.clamp(0, n - 1),
                Boundary::Wrap => raw.rem_euclid(n),
                Boundary::Sym => mirror_index(raw, n),
                Boundary::Undef => match (0..n).contains(&raw) {
                    true => raw,
                    false => return None,
                },
            };
            window.push(index as usize);
        }
        Some(window)
    }

    /// Ascending coordinate at an ascending-domain index; used by samplers
    /// that build monotone frames from [`CoordinateAxis::find_indexes_around`].
    pub(crate) fn ascending_value(&self, index: usize) -> T {
        self.container.value(index)
    }

    /// Floor index of the bracketing interval in the ascending domain,
    /// unbounded.
    pub(crate) fn bracket_ascending(&self, x: T) -> i64 {
        self.container.bracket(x)
    }
}

/// Reflects an index into `[0, n)` about the axis endpoints.
fn mirror_index(mut index: i64, n: i64) -> i64 {
    if n == 1 {
        return 0;
    }
    loop {
        if index < 0 {
            index = -index;
        } else if index >= n {
            index = 2 * (n - 1) - index;
        } else {
            return index;
        }
    }
}

/// A spatial coordinate axis.
///
/// Supports regular and irregular spacing, descending presentation order,
/// and circular (wrap-around) semantics for longitude-like coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    core: CoordinateAxis<f64>,
    circle: Option<f64>,
}

impl Axis {
    /// Creates an axis from coordinate values.
    ///
    /// # Arguments
    /// * `values` - Strictly monotonic axis coordinates.
    /// * `is_circle` - True if the axis wraps around with a period of
    ///   [`DEFAULT_CIRCLE`] degrees.
    pub fn new(values: &[f64], is_circle: bool) -> Result<Self> {
        Self::with_options(
            values,
            DEFAULT_EPSILON,
            match is_circle {
                true => Some(DEFAULT_CIRCLE),
                false => None,
            },
        )
    }

    /// Creates an axis with an explicit regularity tolerance and, for
    /// circular axes, an explicit period.
    pub fn with_options(values: &[f64], epsilon: f64, period: Option<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::invalid_argument("an axis requires at least one value"));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::invalid_argument("axis values must be finite"));
        }
        let normalized: Vec<f64>;
        let values = match period {
            Some(period) => {
                if period <= 0.0 {
                    return Err(Error::invalid_argument("the axis period must be positive"));
                }
                // Pull every coordinate into one period anchored at the
                // first value, so e.g. [350, 0, 10] reads as [350, 360, 370].
                normalized = values
                    .iter()
                    .map(|&v| ferreus_geointerp_utils::math::normalize_angle(v, values[0], period))
                    .collect();
                &normalized[..]
            }
            None => values,
        };

        Ok(Self {
            core: CoordinateAxis::new(values, epsilon)?,
            circle: period,
        })
    }

    /// Number of coordinates on the axis.
    pub fn len(&self) -> usize {
        self.core.size()
    }

    /// Always false: an axis holds at least one coordinate.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True if the coordinates are regularly spaced.
    pub fn is_regular(&self) -> bool {
        self.core.is_regular()
    }

    /// True if the coordinates are presented in ascending order.
    pub fn is_ascending(&self) -> bool {
        self.core.is_ascending()
    }

    /// True if this axis wraps around.
    pub fn is_circle(&self) -> bool {
        self.circle.is_some()
    }

    /// Period of a circular axis.
    pub fn period(&self) -> Option<f64> {
        self.circle
    }

    /// Regularity tolerance used at construction.
    pub fn epsilon(&self) -> f64 {
        self.core.epsilon()
    }

    /// First coordinate in presentation order.
    pub fn front(&self) -> f64 {
        self.core.front()
    }

    /// Last coordinate in presentation order.
    pub fn back(&self) -> f64 {
        self.core.back()
    }

    /// Smallest coordinate.
    pub fn min_value(&self) -> f64 {
        self.core.min_value()
    }

    /// Largest coordinate.
    pub fn max_value(&self) -> f64 {
        self.core.max_value()
    }

    /// Coordinate at `index` in presentation order.
    pub fn coordinate_value(&self, index: usize) -> f64 {
        self.core.coordinate_value(index)
    }

    /// All coordinates in presentation order.
    pub fn coordinate_values(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.coordinate_value(i)).collect()
    }

    /// Step between adjacent coordinates in presentation order.
    ///
    /// # Errors
    /// [`Error::NotRegular`] when the axis is irregularly spaced.
    pub fn increment(&self) -> Result<f64> {
        let step = self.core.increment()?;
        Ok(match self.is_ascending() {
            true => step,
            false => -step,
        })
    }

    /// Reverses the presentation order of the axis in place.
    pub fn flip(&mut self) {
        self.core.flip();
    }

    /// Reduces a coordinate into the axis period when circular.
    #[inline]
    pub(crate) fn normalize_coordinate(&self, x: f64) -> f64 {
        match self.circle {
            Some(period) => ferreus_geointerp_utils::math::normalize_angle(
                x,
                self.core.min_value(),
                period,
            ),
            None => x,
        }
    }

    /// Returns the grid index whose coordinate is closest to `x`.
    ///
    /// Out-of-range targets yield `None` when `bounded` is false and clamp
    /// to the nearest endpoint otherwise. Circular axes reduce `x` modulo
    /// the period first and never fail.
    pub fn find_index(&self, x: f64, bounded: bool) -> Option<usize> {
        match self.circle {
            Some(period) => {
                let xn = self.normalize_coordinate(x);
                let n = self.len() as i64;
                let raw = self.core.nearest_ascending(xn);
                let index = if (0..n).contains(&raw) {
                    raw as usize
                } else if self.is_regular() {
                    // The step arithmetic already resolved the seam; only
                    // the modulo remains.
                    raw.rem_euclid(n) as usize
                } else {
                    // Irregular circle, target in the seam gap: pick the
                    // closer end across the seam.
                    let to_back = xn - self.core.max_value();
                    let to_front = self.core.min_value() + period - xn;
                    match to_back <= to_front {
                        true => n as usize - 1,
                        false => 0,
                    }
                };
                Some(self.core.present_index(index))
            }
            None => self.core.find_index(x, bounded),
        }
    }

    /// Returns the bracketing pair `(i0, i1)` with
    /// `coordinate(i0) <= x <= coordinate(i1)`. On circular axes a target in
    /// the seam gap wraps to `(len - 1, 0)`; otherwise out-of-range targets
    /// yield `None`.
    pub fn find_indexes(&self, x: f64) -> Option<(usize, usize)> {
        match self.circle {
            Some(_) => {
                let xn = self.normalize_coordinate(x);
                if xn > self.core.max_value() {
                    let n = self.len();
                    return Some((
                        self.core.present_index(n - 1),
                        self.core.present_index(0),
                    ));
                }
                self.core.find_indexes(xn)
            }
            None => self.core.find_indexes(x),
        }
    }

    /// Window of `2 * half_window` indexes around `x` in the ascending
    /// domain, honoring the boundary policy.
    pub fn find_indexes_around(
        &self,
        x: f64,
        half_window: usize,
        boundary: Boundary,
    ) -> Option<Vec<usize>> {
        let xn = self.normalize_coordinate(x);
        match self.circle {
            Some(_) if xn > self.core.max_value() => {
                if boundary == Boundary::Undef {
                    return None;
                }
                // Seam bracket: build the window around the wrap interval.
                let n = self.len() as i64;
                let mut window = Vec::with_capacity(2 * half_window);
                for offset in 0..2 * half_window as i64 {
                    let raw = n - half_window as i64 + offset;
                    window.push(raw.rem_euclid(n) as usize);
                }
                Some(window)
            }
            _ => self.core.find_indexes_around(xn, half_window, boundary),
        }
    }

    /// Ascending coordinate at an ascending-domain index.
    pub(crate) fn ascending_value(&self, index: usize) -> f64 {
        self.core.ascending_value(index)
    }

    /// Presentation index of an ascending-domain index.
    #[inline]
    pub(crate) fn present_index(&self, ascending: usize) -> usize {
        self.core.present_index(ascending)
    }

    /// Ascending-domain interval index enclosing the (normalized) target,
    /// for frame assembly. Circular targets in the seam gap return the wrap
    /// interval `len - 1`; non-circular targets outside the axis return
    /// `None`.
    pub(crate) fn ascending_bracket(&self, xn: f64) -> Option<usize> {
        let n = self.len();
        if n < 2 {
            return None;
        }
        if self.is_circle() && xn > self.core.max_value() {
            return Some(n - 1);
        }
        if xn < self.core.min_value() || xn > self.core.max_value() {
            return None;
        }
        Some(self.core.bracket_ascending(xn).clamp(0, n as i64 - 2) as usize)
    }

    /// Access to the generic core for dimension-agnostic consumers.
    pub(crate) fn core(&self) -> &CoordinateAxis<f64> {
        &self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_axis(start: f64, stop: f64, step: f64, is_circle: bool) -> Axis {
        let mut values = Vec::new();
        let mut x = start;
        while x < stop - 1e-9 {
            values.push(x);
            x += step;
        }
        Axis::new(&values, is_circle).unwrap()
    }

    #[test]
    fn regular_latitude_lookup() {
        // Ascending, non-circular, regular: [-90, -89.75, ..., 89.75]
        let axis = range_axis(-90.0, 90.0, 0.25, false);
        assert_eq!(axis.len(), 720);
        assert!(axis.is_regular());
        assert!(axis.is_ascending());
        assert_eq!(axis.find_index(0.0, false), Some(360));
        assert_eq!(axis.find_index(90.25, false), None);
        assert_eq!(axis.find_index(90.25, true), Some(719));
        assert_eq!(axis.find_index(-90.25, true), Some(0));
    }

    #[test]
    fn longitude_circle_lookup() {
        let axis = range_axis(0.0, 360.0, 1.0, true);
        assert_eq!(axis.len(), 360);
        assert!(axis.is_circle());
        assert_eq!(axis.find_index(-180.0, false), Some(180));
        assert_eq!(axis.find_index(180.0, false), Some(180));
        assert_eq!(axis.find_index(360.0, false), Some(0));
        assert_eq!(axis.find_index(-0.4, false), Some(0));
        assert_eq!(axis.find_index(359.6, false), Some(0));
    }

    #[test]
    fn circular_lookup_is_period_invariant() {
        let axis = range_axis(0.0, 360.0, 1.0, true);
        for x in [-723.0, -180.0, -0.5, 0.0, 37.2, 359.9, 501.0] {
            assert_eq!(
                axis.find_index(x, false),
                axis.find_index(x + 360.0, false),
                "x={}",
                x
            );
        }
    }

    #[test]
    fn irregular_axis_lookup_minimizes_distance() {
        // A Mercator-like latitude spacing: strictly ascending, non-uniform.
        let values: Vec<f64> = (0..107)
            .map(|i| {
                let t = -1.52 + 3.04 * i as f64 / 106.0;
                t.sinh().atan().to_degrees() * 1.35
            })
            .collect();
        let axis = Axis::new(&values, false).unwrap();
        assert!(!axis.is_regular());

        let found = axis.find_index(0.0, false).unwrap();
        let mut best = 0;
        for i in 0..axis.len() {
            if axis.coordinate_value(i).abs() < axis.coordinate_value(best).abs() {
                best = i;
            }
        }
        assert_eq!(found, best);
        assert!(axis.increment().is_err());
        assert_eq!(axis.increment().unwrap_err(), Error::NotRegular);
    }

    #[test]
    fn find_index_round_trips_every_node() {
        let axis = range_axis(-90.0, 90.0, 0.25, false);
        for i in (0..axis.len()).step_by(7) {
            assert_eq!(axis.find_index(axis.coordinate_value(i), true), Some(i));
        }
        let irregular =
            Axis::new(&[-5.0, -1.5, 0.0, 0.25, 2.0, 7.0, 19.0], false).unwrap();
        for i in 0..irregular.len() {
            assert_eq!(
                irregular.find_index(irregular.coordinate_value(i), true),
                Some(i)
            );
        }
    }

    #[test]
    fn midpoint_resolves_to_the_lower_index() {
        let axis = Axis::new(&[0.0, 1.0, 2.0, 3.0], false).unwrap();
        assert_eq!(axis.find_index(0.5, false), Some(0));
        assert_eq!(axis.find_index(1.5, false), Some(1));
        assert_eq!(axis.find_index(1.500001, false), Some(2));
    }

    #[test]
    fn find_indexes_brackets_interior_targets() {
        let axis = Axis::new(&[0.0, 1.0, 2.0, 3.0], false).unwrap();
        assert_eq!(axis.find_indexes(0.5), Some((0, 1)));
        assert_eq!(axis.find_indexes(2.0), Some((2, 3)));
        assert_eq!(axis.find_indexes(3.0), Some((2, 3)));
        assert_eq!(axis.find_indexes(0.0), Some((0, 1)));
        assert_eq!(axis.find_indexes(3.1), None);
        assert_eq!(axis.find_indexes(-0.1), None);
    }

    #[test]
    fn circular_bracket_wraps_at_the_seam() {
        let axis = range_axis(0.0, 360.0, 1.0, true);
        assert_eq!(axis.find_indexes(359.5), Some((359, 0)));
        assert_eq!(axis.find_indexes(-0.5), Some((359, 0)));
        assert_eq!(axis.find_indexes(0.5), Some((0, 1)));
    }

    #[test]
    fn descending_axis_maps_presentation_indices() {
        let mut axis = Axis::new(&[3.0, 2.0, 1.0, 0.0], false).unwrap();
        assert!(!axis.is_ascending());
        assert_eq!(axis.front(), 3.0);
        assert_eq!(axis.back(), 0.0);
        assert_eq!(axis.coordinate_value(0), 3.0);
        assert_eq!(axis.find_index(3.0, false), Some(0));
        assert_eq!(axis.find_index(0.1, false), Some(3));
        assert_eq!(axis.increment().unwrap(), -1.0);

        let (i0, i1) = axis.find_indexes(1.5).unwrap();
        let lo = axis.coordinate_value(i0).min(axis.coordinate_value(i1));
        let hi = axis.coordinate_value(i0).max(axis.coordinate_value(i1));
        assert!(lo <= 1.5 && 1.5 <= hi);

        axis.flip();
        assert!(axis.is_ascending());
        assert_eq!(axis.front(), 0.0);
        assert_eq!(axis.increment().unwrap(), 1.0);
    }

    #[test]
    fn flip_is_an_involution() {
        let reference = Axis::new(&[0.0, 0.5, 1.0], false).unwrap();
        let mut axis = reference.clone();
        axis.flip();
        axis.flip();
        assert_eq!(axis, reference);
    }

    #[test]
    fn window_boundary_policies() {
        let axis = Axis::new(&[0.0, 1.0, 2.0, 3.0, 4.0], false).unwrap();

        // Target in the first cell: the raw window [-1, 0, 1, 2] crosses the
        // lower boundary.
        let expand = axis.find_indexes_around(0.5, 2, Boundary::Expand).unwrap();
        assert_eq!(expand, vec![0, 0, 1, 2]);

        let wrap = axis.find_indexes_around(0.5, 2, Boundary::Wrap).unwrap();
        assert_eq!(wrap, vec![4, 0, 1, 2]);

        let sym = axis.find_indexes_around(0.5, 2, Boundary::Sym).unwrap();
        assert_eq!(sym, vec![1, 0, 1, 2]);

        assert_eq!(axis.find_indexes_around(0.5, 2, Boundary::Undef), None);
        let interior = axis.find_indexes_around(2.5, 2, Boundary::Undef).unwrap();
        assert_eq!(interior, vec![1, 2, 3, 4]);
    }

    #[test]
    fn out_of_range_window_is_none() {
        let axis = Axis::new(&[0.0, 1.0, 2.0], false).unwrap();
        assert_eq!(axis.find_indexes_around(5.0, 1, Boundary::Expand), None);
    }

    #[test]
    fn circular_window_crosses_the_seam() {
        let axis = range_axis(0.0, 360.0, 1.0, true);
        let window = axis
            .find_indexes_around(359.5, 2, Boundary::Wrap)
            .unwrap();
        assert_eq!(window, vec![358, 359, 0, 1]);
    }

    #[test]
    fn non_monotonic_values_are_rejected() {
        assert!(Axis::new(&[0.0, 1.0, 1.0], false).is_err());
        assert!(Axis::new(&[0.0, 2.0, 1.0], false).is_err());
        assert!(Axis::new(&[], false).is_err());
        assert!(Axis::new(&[], true).is_err());
        assert!(Axis::new(&[0.0, f64::NAN], false).is_err());
        // A full period duplicates the first coordinate on the circle.
        assert!(Axis::new(&[0.0, 180.0, 360.0], true).is_err());
    }

    #[test]
    fn irregular_circle_seam_picks_the_closer_end() {
        let axis = Axis::new(&[0.0, 10.0, 350.0], true).unwrap();
        assert!(!axis.is_regular());
        assert_eq!(axis.find_index(352.0, false), Some(2));
        assert_eq!(axis.find_index(358.0, false), Some(0));
        assert_eq!(axis.find_index(-2.0, false), Some(0));
        assert_eq!(axis.find_indexes(355.0), Some((2, 0)));
    }

    #[test]
    fn single_point_axis() {
        let axis = Axis::new(&[42.0], false).unwrap();
        assert_eq!(axis.len(), 1);
        assert_eq!(axis.find_index(42.0, false), Some(0));
        assert_eq!(axis.find_index(41.0, false), None);
        assert_eq!(axis.find_index(41.0, true), Some(0));
        assert_eq!(axis.find_indexes(42.0), Some((0, 0)));
        assert!(axis.increment().is_err());
    }

    #[test]
    fn shifted_longitude_layout_normalizes() {
        // Longitudes presented as [-180, ..., 179.5] and [0, ..., 359.5]
        // describe the same circle.
        let a = range_axis(-180.0, 180.0, 0.5, true);
        let b = range_axis(0.0, 360.0, 0.5, true);
        for x in [-179.75, -10.0, 0.0, 42.25, 180.0, 359.75] {
            let ia = a.find_index(x, false).unwrap();
            let ib = b.find_index(x, false).unwrap();
            let va = a.normalize_coordinate(a.coordinate_value(ia));
            let vb = b.normalize_coordinate(b.coordinate_value(ib));
            assert!(
                ferreus_geointerp_utils::math::normalize_angle(va - vb, 0.0, 360.0) < 1e-9
                    || ferreus_geointerp_utils::math::normalize_angle(vb - va, 0.0, 360.0)
                        < 1e-9,
                "x={}",
                x
            );
        }
    }
}
