/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the univariate fitting models backing the gridded spline interpolators.
//
// Created on: 20 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # interpolate1d
//!
//! One-dimensional fitting models evaluated over small coordinate windows.
//! An [`Interpolator1D`] owns its workspace buffers so a worker thread can
//! reuse a single instance across many evaluations; the buffers are reset at
//! the start of each call.

use serde::{Deserialize, Serialize};

/// The implemented univariate fitting models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FittingModel {
    /// Piecewise linear interpolation.
    Linear,

    /// Global polynomial through all window points (Newton form).
    Polynomial,

    /// Cubic spline with natural boundary conditions.
    CSpline,

    /// Cubic spline with periodic boundary conditions.
    CSplinePeriodic,

    /// Non-rounded Akima spline with natural boundary conditions.
    Akima,

    /// Non-rounded Akima spline with periodic boundary conditions.
    AkimaPeriodic,

    /// Steffen's method, which guarantees monotonicity between data points.
    Steffen,
}

impl FittingModel {
    /// Minimum number of points required by the fitting model.
    pub fn min_size(&self) -> usize {
        match self {
            FittingModel::Linear => 2,
            FittingModel::Polynomial => 3,
            FittingModel::CSpline => 3,
            FittingModel::CSplinePeriodic => 2,
            FittingModel::Akima => 5,
            FittingModel::AkimaPeriodic => 5,
            FittingModel::Steffen => 3,
        }
    }
}

/// Locates the interval index `i` such that `xa[i] <= x <= xa[i + 1]`,
/// clamping targets outside the abscissa range to the first or last interval.
#[inline]
fn bracket(xa: &[f64], x: f64) -> usize {
    let n = xa.len();
    if x <= xa[0] {
        return 0;
    }
    if x >= xa[n - 1] {
        return n - 2;
    }
    let i = xa.partition_point(|&v| v <= x) - 1;
    i.min(n - 2)
}

/// Cubic Hermite evaluation on `[x0, x1]` from endpoint values and
/// derivatives.
#[inline]
fn hermite(x: f64, x0: f64, x1: f64, y0: f64, y1: f64, d0: f64, d1: f64) -> f64 {
    let h = x1 - x0;
    let t = (x - x0) / h;
    let t2 = t * t;
    let t3 = t2 * t;

    (2.0 * t3 - 3.0 * t2 + 1.0) * y0
        + (t3 - 2.0 * t2 + t) * h * d0
        + (-2.0 * t3 + 3.0 * t2) * y1
        + (t3 - t2) * h * d1
}

/// A univariate interpolator with a reusable workspace.
///
/// The abscissae passed to [`Interpolator1D::interpolate`] must be strictly
/// ascending and hold at least [`FittingModel::min_size`] points; callers
/// validate both before entering their parallel regions.
#[derive(Debug, Clone)]
pub struct Interpolator1D {
    model: FittingModel,

    // Workspace buffers, cleared at the start of each call.
    h: Vec<f64>,
    s: Vec<f64>,
    d: Vec<f64>,
    scratch: Vec<f64>,
}

impl Interpolator1D {
    /// Creates a new interpolator for the given fitting model.
    pub fn new(model: FittingModel) -> Self {
        Self {
            model,
            h: Vec::new(),
            s: Vec::new(),
            d: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// Returns the fitting model evaluated by this instance.
    pub fn model(&self) -> FittingModel {
        self.model
    }

    /// Minimum number of points required by the configured model.
    pub fn min_size(&self) -> usize {
        self.model.min_size()
    }

    /// Returns the interpolated value of `y` at `x`.
    pub fn interpolate(&mut self, xa: &[f64], ya: &[f64], x: f64) -> f64 {
        debug_assert_eq!(xa.len(), ya.len());
        debug_assert!(xa.len() >= self.min_size());
        debug_assert!(xa.windows(2).all(|w| w[0] < w[1]));

        match self.model {
            FittingModel::Linear => {
                let i = bracket(xa, x);
                crate::math::linear(x, xa[i], xa[i + 1], ya[i], ya[i + 1])
            }
            FittingModel::Polynomial => self.polynomial(xa, ya, x),
            FittingModel::CSpline => self.cspline(xa, ya, x, false),
            FittingModel::CSplinePeriodic => self.cspline(xa, ya, x, true),
            FittingModel::Akima => self.akima(xa, ya, x, false),
            FittingModel::AkimaPeriodic => self.akima(xa, ya, x, true),
            FittingModel::Steffen => self.steffen(xa, ya, x),
        }
    }

    /// Newton divided-difference polynomial through all window points.
    fn polynomial(&mut self, xa: &[f64], ya: &[f64], x: f64) -> f64 {
        let n = xa.len();
        self.scratch.clear();
        self.scratch.extend_from_slice(ya);

        for j in 1..n {
            for i in (j..n).rev() {
                self.scratch[i] = (self.scratch[i] - self.scratch[i - 1]) / (xa[i] - xa[i - j]);
            }
        }

        let mut result = self.scratch[n - 1];
        for i in (0..n - 1).rev() {
            result = result * (x - xa[i]) + self.scratch[i];
        }
        result
    }

    /// Fills `self.h` with interval widths and `self.s` with secant slopes.
    fn intervals(&mut self, xa: &[f64], ya: &[f64]) {
        let n = xa.len();
        self.h.clear();
        self.s.clear();
        for i in 0..n - 1 {
            let h = xa[i + 1] - xa[i];
            self.h.push(h);
            self.s.push((ya[i + 1] - ya[i]) / h);
        }
    }

    /// Cubic spline interpolation, natural or periodic.
    ///
    /// Solves for the second derivatives `sigma` at the nodes, then
    /// evaluates the standard piecewise-cubic form on the bracketing
    /// interval.
    fn cspline(&mut self, xa: &[f64], ya: &[f64], x: f64, periodic: bool) -> f64 {
        let n = xa.len();
        self.intervals(xa, ya);

        // Second derivatives at each node.
        self.d.clear();
        self.d.resize(n, 0.0);

        if periodic {
            self.cspline_periodic_sigma(n);
        } else {
            self.cspline_natural_sigma(n);
        }

        let i = bracket(xa, x);
        let h = self.h[i];
        let a = (xa[i + 1] - x) / h;
        let b = (x - xa[i]) / h;

        a * ya[i]
            + b * ya[i + 1]
            + ((a * a * a - a) * self.d[i] + (b * b * b - b) * self.d[i + 1]) * h * h / 6.0
    }

    /// Natural boundary conditions: tridiagonal solve with
    /// `sigma[0] = sigma[n - 1] = 0` (Thomas algorithm).
    fn cspline_natural_sigma(&mut self, n: usize) {
        if n < 3 {
            return;
        }
        let m = n - 2;
        self.scratch.clear();
        self.scratch.resize(2 * m, 0.0);
        let (cp, dp) = self.scratch.split_at_mut(m);

        for i in 0..m {
            let diag = 2.0 * (self.h[i] + self.h[i + 1]);
            let rhs = 6.0 * (self.s[i + 1] - self.s[i]);
            let lower = match i == 0 {
                true => 0.0,
                false => self.h[i],
            };
            let denom = diag - lower * if i == 0 { 0.0 } else { cp[i - 1] };
            cp[i] = self.h[i + 1] / denom;
            dp[i] = (rhs - lower * if i == 0 { 0.0 } else { dp[i - 1] }) / denom;
        }

        self.d[m] = dp[m - 1];
        for i in (0..m - 1).rev() {
            self.d[i + 1] = dp[i] - cp[i] * self.d[i + 2];
        }
    }

    /// Periodic boundary conditions: cyclic system over `n - 1` unknowns,
    /// solved densely. Windows are a few points wide, so the cubic cost of
    /// the elimination is irrelevant.
    fn cspline_periodic_sigma(&mut self, n: usize) {
        let m = n - 1;
        if m == 1 {
            return;
        }

        // Dense m x m system in row-major order plus the right-hand side.
        self.scratch.clear();
        self.scratch.resize(m * (m + 1), 0.0);
        let width = m + 1;

        for i in 0..m {
            let prev = (i + m - 1) % m;
            let next = (i + 1) % m;
            let h_prev = self.h[prev];
            let h_here = self.h[i];
            self.scratch[i * width + prev] += h_prev;
            self.scratch[i * width + i] += 2.0 * (h_prev + h_here);
            self.scratch[i * width + next] += h_here;
            self.scratch[i * width + m] = 6.0 * (self.s[i] - self.s[prev]);
        }

        // Gaussian elimination with partial pivoting.
        for col in 0..m {
            let mut pivot = col;
            for row in col + 1..m {
                if self.scratch[row * width + col].abs() > self.scratch[pivot * width + col].abs()
                {
                    pivot = row;
                }
            }
            if pivot != col {
                for k in 0..width {
                    self.scratch.swap(col * width + k, pivot * width + k);
                }
            }
            let diag = self.scratch[col * width + col];
            if diag.abs() < f64::EPSILON {
                continue;
            }
            for row in col + 1..m {
                let factor = self.scratch[row * width + col] / diag;
                for k in col..width {
                    self.scratch[row * width + k] -= factor * self.scratch[col * width + k];
                }
            }
        }
        for i in (0..m).rev() {
            let mut value = self.scratch[i * width + m];
            for k in i + 1..m {
                value -= self.scratch[i * width + k] * self.d[k];
            }
            let diag = self.scratch[i * width + i];
            self.d[i] = match diag.abs() < f64::EPSILON {
                true => 0.0,
                false => value / diag,
            };
        }
        self.d[m] = self.d[0];
    }

    /// Akima interpolation, natural or periodic slope extension.
    fn akima(&mut self, xa: &[f64], ya: &[f64], x: f64, periodic: bool) -> f64 {
        let n = xa.len();
        self.intervals(xa, ya);
        let ns = n - 1;

        // Extended secant slopes: two phantom slopes on each side.
        self.scratch.clear();
        self.scratch.resize(ns + 4, 0.0);
        self.scratch[2..2 + ns].copy_from_slice(&self.s);
        if periodic {
            self.scratch[1] = self.s[ns - 1];
            self.scratch[0] = self.s[ns - 2];
            self.scratch[2 + ns] = self.s[0];
            self.scratch[3 + ns] = self.s[1];
        } else {
            self.scratch[1] = 2.0 * self.s[0] - self.s[1];
            self.scratch[0] = 2.0 * self.scratch[1] - self.s[0];
            self.scratch[2 + ns] = 2.0 * self.s[ns - 1] - self.s[ns - 2];
            self.scratch[3 + ns] = 2.0 * self.scratch[2 + ns] - self.s[ns - 1];
        }

        // Akima derivative at each node from the four surrounding slopes.
        self.d.clear();
        for i in 0..n {
            let sm2 = self.scratch[i];
            let sm1 = self.scratch[i + 1];
            let s0 = self.scratch[i + 2];
            let sp1 = self.scratch[i + 3];
            let w1 = (sp1 - s0).abs();
            let w2 = (sm1 - sm2).abs();
            let derivative = match w1 + w2 < f64::EPSILON {
                true => 0.5 * (sm1 + s0),
                false => (w1 * sm1 + w2 * s0) / (w1 + w2),
            };
            self.d.push(derivative);
        }

        let i = bracket(xa, x);
        hermite(x, xa[i], xa[i + 1], ya[i], ya[i + 1], self.d[i], self.d[i + 1])
    }

    /// Steffen interpolation: slope limiting keeps the interpolant monotone
    /// between data points.
    fn steffen(&mut self, xa: &[f64], ya: &[f64], x: f64) -> f64 {
        let n = xa.len();
        self.intervals(xa, ya);

        self.d.clear();
        self.d.resize(n, 0.0);

        // One-sided parabolic estimates at the boundaries, sign-guarded.
        let p0 = self.s[0] * (1.0 + self.h[0] / (self.h[0] + self.h[1]))
            - self.s[1] * self.h[0] / (self.h[0] + self.h[1]);
        self.d[0] = steffen_boundary(p0, self.s[0]);

        let pn = self.s[n - 2] * (1.0 + self.h[n - 2] / (self.h[n - 2] + self.h[n - 3]))
            - self.s[n - 3] * self.h[n - 2] / (self.h[n - 2] + self.h[n - 3]);
        self.d[n - 1] = steffen_boundary(pn, self.s[n - 2]);

        for i in 1..n - 1 {
            let s_prev = self.s[i - 1];
            let s_here = self.s[i];
            let p = (s_prev * self.h[i] + s_here * self.h[i - 1]) / (self.h[i - 1] + self.h[i]);
            self.d[i] = (sign(s_prev) + sign(s_here))
                * s_prev.abs().min(s_here.abs()).min(0.5 * p.abs());
        }

        let i = bracket(xa, x);
        hermite(x, xa[i], xa[i + 1], ya[i], ya[i + 1], self.d[i], self.d[i + 1])
    }
}

#[inline]
fn sign(x: f64) -> f64 {
    match x > 0.0 {
        true => 1.0,
        false => match x < 0.0 {
            true => -1.0,
            false => 0.0,
        },
    }
}

#[inline]
fn steffen_boundary(p: f64, s: f64) -> f64 {
    if p * s <= 0.0 {
        0.0
    } else if p.abs() > 2.0 * s.abs() {
        2.0 * s
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MODELS: [FittingModel; 7] = [
        FittingModel::Linear,
        FittingModel::Polynomial,
        FittingModel::CSpline,
        FittingModel::CSplinePeriodic,
        FittingModel::Akima,
        FittingModel::AkimaPeriodic,
        FittingModel::Steffen,
    ];

    fn sample(f: impl Fn(f64) -> f64, xa: &[f64]) -> Vec<f64> {
        xa.iter().map(|&x| f(x)).collect()
    }

    #[test]
    fn all_models_reproduce_node_values() {
        let xa: Vec<f64> = (0..8).map(|i| i as f64 * 0.5).collect();
        let ya = sample(|x| (1.3 * x).sin() + 0.2 * x, &xa);

        for model in ALL_MODELS {
            let mut interp = Interpolator1D::new(model);
            for (i, &x) in xa.iter().enumerate() {
                let y = interp.interpolate(&xa, &ya, x);
                assert!(
                    (y - ya[i]).abs() < 1e-12,
                    "{:?} at node {}: {} != {}",
                    model,
                    i,
                    y,
                    ya[i]
                );
            }
        }
    }

    #[test]
    fn all_models_are_exact_on_linear_data() {
        let xa: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let ya = sample(|x| 2.0 * x - 3.0, &xa);

        for model in ALL_MODELS {
            let mut interp = Interpolator1D::new(model);
            for i in 0..20 {
                let x = 0.35 * i as f64;
                let y = interp.interpolate(&xa, &ya, x.min(7.0));
                let expected = 2.0 * x.min(7.0) - 3.0;
                assert!(
                    (y - expected).abs() < 1e-10,
                    "{:?} at x={}: {} != {}",
                    model,
                    x,
                    y,
                    expected
                );
            }
        }
    }

    #[test]
    fn polynomial_is_exact_on_quadratic_data() {
        let xa = [0.0, 1.0, 2.5, 4.0];
        let ya = sample(|x| x * x - x + 2.0, &xa);
        let mut interp = Interpolator1D::new(FittingModel::Polynomial);
        for i in 0..=16 {
            let x = 0.25 * i as f64;
            let y = interp.interpolate(&xa, &ya, x);
            let expected = x * x - x + 2.0;
            assert!((y - expected).abs() < 1e-11, "x={}: {}", x, y);
        }
    }

    #[test]
    fn natural_cspline_matches_hand_computed_value() {
        // Three points (0,0), (1,1), (2,0): the single interior second
        // derivative is -3, giving f(0.5) = 0.6875.
        let xa = [0.0, 1.0, 2.0];
        let ya = [0.0, 1.0, 0.0];
        let mut interp = Interpolator1D::new(FittingModel::CSpline);
        let y = interp.interpolate(&xa, &ya, 0.5);
        assert!((y - 0.6875).abs() < 1e-12, "{}", y);
    }

    #[test]
    fn steffen_stays_within_data_bounds_on_monotone_data() {
        let xa: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let ya = [0.0, 0.1, 0.2, 3.0, 3.1, 3.2];
        let mut interp = Interpolator1D::new(FittingModel::Steffen);
        let mut previous = f64::NEG_INFINITY;
        for i in 0..=100 {
            let x = 5.0 * i as f64 / 100.0;
            let y = interp.interpolate(&xa, &ya, x);
            assert!(y >= previous - 1e-9, "not monotone at x={}", x);
            assert!((0.0..=3.2).contains(&y), "overshoot at x={}: {}", x, y);
            previous = y;
        }
    }

    #[test]
    fn akima_avoids_oscillation_on_a_step() {
        // A flat-step profile: Akima should stay close to the flat segments.
        let xa: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let ya = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        let mut interp = Interpolator1D::new(FittingModel::Akima);
        let y = interp.interpolate(&xa, &ya, 1.5);
        assert!(y.abs() < 1e-12, "flat segment disturbed: {}", y);
        let y = interp.interpolate(&xa, &ya, 5.5);
        assert!((y - 1.0).abs() < 1e-12, "flat segment disturbed: {}", y);
    }

    #[test]
    fn periodic_cspline_on_a_sampled_cosine() {
        // One full period of cos(x); the periodic fit should track the curve
        // far better than a percent everywhere.
        let n = 13;
        let xa: Vec<f64> = (0..n)
            .map(|i| i as f64 * 2.0 * std::f64::consts::PI / (n - 1) as f64)
            .collect();
        let ya = sample(f64::cos, &xa);
        let mut interp = Interpolator1D::new(FittingModel::CSplinePeriodic);
        for i in 0..=50 {
            let x = 2.0 * std::f64::consts::PI * i as f64 / 50.0;
            let y = interp.interpolate(&xa, &ya, x);
            assert!((y - x.cos()).abs() < 5e-3, "x={}: {} != {}", x, y, x.cos());
        }
    }

    #[test]
    fn min_sizes_match_the_documented_models() {
        assert_eq!(FittingModel::Linear.min_size(), 2);
        assert_eq!(FittingModel::Polynomial.min_size(), 3);
        assert_eq!(FittingModel::CSpline.min_size(), 3);
        assert_eq!(FittingModel::CSplinePeriodic.min_size(), 2);
        assert_eq!(FittingModel::Akima.min_size(), 5);
        assert_eq!(FittingModel::AkimaPeriodic.min_size(), 5);
        assert_eq!(FittingModel::Steffen.min_size(), 3);
    }
}
