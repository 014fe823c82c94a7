/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the integer-nanosecond temporal axis and its resolution conversions.
//
// Created on: 21 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # temporal_axis
//!
//! A time axis stores 64-bit signed instants in a declared resolution, so
//! nanosecond precision survives intact where a floating coordinate would
//! round. Conversions between resolutions go through [`TemporalAxis::safe_cast`],
//! which warns when precision is lost.

use crate::axis::{Boundary, CoordinateAxis};
use crate::error::{Error, Result};
use crate::warning::{WarningMsg, WarningSink};
use serde::{Deserialize, Serialize};

/// Time resolutions supported by a temporal axis.
///
/// Calendar resolutions (`Year`, `Month`) count calendar periods and only
/// convert between themselves; the fixed-length resolutions (`Week` down to
/// `Nanosecond`) convert freely among each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl Resolution {
    /// Length of one unit in the family base (months for calendar
    /// resolutions, nanoseconds otherwise).
    fn base_units(&self) -> i64 {
        match self {
            Resolution::Year => 12,
            Resolution::Month => 1,
            Resolution::Week => 7 * 86_400 * 1_000_000_000,
            Resolution::Day => 86_400 * 1_000_000_000,
            Resolution::Hour => 3_600 * 1_000_000_000,
            Resolution::Minute => 60 * 1_000_000_000,
            Resolution::Second => 1_000_000_000,
            Resolution::Millisecond => 1_000_000,
            Resolution::Microsecond => 1_000,
            Resolution::Nanosecond => 1,
        }
    }

    /// True for the calendar-counted resolutions.
    fn is_calendar(&self) -> bool {
        matches!(self, Resolution::Year | Resolution::Month)
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resolution::Year => "year",
            Resolution::Month => "month",
            Resolution::Week => "week",
            Resolution::Day => "day",
            Resolution::Hour => "hour",
            Resolution::Minute => "minute",
            Resolution::Second => "second",
            Resolution::Millisecond => "millisecond",
            Resolution::Microsecond => "microsecond",
            Resolution::Nanosecond => "nanosecond",
        };
        f.write_str(name)
    }
}

/// Converts instants between two resolutions of the same family.
///
/// Casting to a coarser resolution truncates towards negative infinity and
/// reports the loss through the sink; casting to a finer resolution fails
/// with [`Error::InvalidArgument`] on overflow.
pub fn safe_cast_values(
    values: &[i64],
    from: Resolution,
    to: Resolution,
    sink: &dyn WarningSink,
) -> Result<Vec<i64>> {
    if from.is_calendar() != to.is_calendar() {
        return Err(Error::invalid_argument(format!(
            "cannot convert {} instants to {}: calendar and fixed-length \
             resolutions are unrelated",
            from, to
        )));
    }
    if from == to {
        return Ok(values.to_vec());
    }

    let from_units = from.base_units();
    let to_units = to.base_units();

    if from_units > to_units {
        // Finer target: exact multiplication, checked.
        let factor = from_units / to_units;
        let mut out = Vec::with_capacity(values.len());
        for &v in values {
            out.push(v.checked_mul(factor).ok_or_else(|| {
                Error::invalid_argument(format!(
                    "instant {} {}s overflows the {} resolution",
                    v, from, to
                ))
            })?);
        }
        return Ok(out);
    }

    // Coarser target: floor division, warning when any remainder is lost.
    let factor = to_units / from_units;
    let mut truncated = false;
    let out = values
        .iter()
        .map(|&v| {
            truncated |= v.rem_euclid(factor) != 0;
            v.div_euclid(factor)
        })
        .collect();
    if truncated {
        sink.emit(WarningMsg::ResolutionTruncation { from, to });
    }
    Ok(out)
}

/// A coordinate axis over 64-bit integer instants.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalAxis {
    core: CoordinateAxis<i64>,
    resolution: Resolution,
}

impl TemporalAxis {
    /// Creates a temporal axis from instants expressed in `resolution`.
    pub fn new(values: &[i64], resolution: Resolution) -> Result<Self> {
        Ok(Self {
            core: CoordinateAxis::new(values, 0.0)?,
            resolution,
        })
    }

    /// Resolution of the stored instants.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Number of instants on the axis.
    pub fn len(&self) -> usize {
        self.core.size()
    }

    /// Always false: an axis holds at least one instant.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True if the instants are regularly spaced.
    pub fn is_regular(&self) -> bool {
        self.core.is_regular()
    }

    /// True if the instants are presented in ascending order.
    pub fn is_ascending(&self) -> bool {
        self.core.is_ascending()
    }

    /// First instant in presentation order.
    pub fn front(&self) -> i64 {
        self.core.front()
    }

    /// Last instant in presentation order.
    pub fn back(&self) -> i64 {
        self.core.back()
    }

    /// Smallest instant.
    pub fn min_value(&self) -> i64 {
        self.core.min_value()
    }

    /// Largest instant.
    pub fn max_value(&self) -> i64 {
        self.core.max_value()
    }

    /// Instant at `index` in presentation order.
    pub fn coordinate_value(&self, index: usize) -> i64 {
        self.core.coordinate_value(index)
    }

    /// Step between adjacent instants in presentation order.
    ///
    /// # Errors
    /// [`Error::NotRegular`] when the axis is irregularly spaced.
    pub fn increment(&self) -> Result<i64> {
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

    /// Converts caller instants into the axis resolution, warning through
    /// the sink when the conversion truncates.
    pub fn safe_cast(
        &self,
        values: &[i64],
        from: Resolution,
        sink: &dyn WarningSink,
    ) -> Result<Vec<i64>> {
        safe_cast_values(values, from, self.resolution, sink)
    }

    /// Index of the instant closest to `x`; ties resolve to the lower
    /// index. Out-of-range targets yield `None` unless `bounded`.
    pub fn find_index(&self, x: i64, bounded: bool) -> Option<usize> {
        self.core.find_index(x, bounded)
    }

    /// Bracketing pair `(i0, i1)` in presentation order.
    pub fn find_indexes(&self, x: i64) -> Option<(usize, usize)> {
        self.core.find_indexes(x)
    }

    /// Window of `2 * half_window` ascending-domain indexes around `x`.
    pub fn find_indexes_around(
        &self,
        x: i64,
        half_window: usize,
        boundary: Boundary,
    ) -> Option<Vec<usize>> {
        self.core.find_indexes_around(x, half_window, boundary)
    }
}
