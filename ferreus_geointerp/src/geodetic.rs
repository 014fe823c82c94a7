/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the reference spheroid, ECEF conversions and geodesic distance strategies.
//
// Created on: 22 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # geodetic
//!
//! World geodetic system support: ellipsoid parameters and their derived
//! quantities, conversions between geographic (longitude, latitude,
//! altitude) and earth-centered earth-fixed Cartesian coordinates, and a
//! family of geodesic distance strategies.
//!
//! Positions handed to this module are in degrees and meters; distances come
//! back in meters.

use ferreus_geointerp_utils::math::sqr;
use serde::{Deserialize, Serialize};

/// A geographic position: longitude and latitude in degrees, altitude in
/// meters above the spheroid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lla {
    pub lon: f64,
    pub lat: f64,
    pub alt: f64,
}

impl Lla {
    pub fn new(lon: f64, lat: f64, alt: f64) -> Self {
        Self { lon, lat, alt }
    }
}

/// World Geodetic System ellipsoid parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spheroid {
    semi_major_axis: f64,
    flattening: f64,
}

impl Default for Spheroid {
    /// WGS-84.
    fn default() -> Self {
        Self {
            semi_major_axis: 6_378_137.0,
            flattening: 1.0 / 298.257_223_563,
        }
    }
}

impl Spheroid {
    /// Creates a spheroid from its semi-major axis (meters) and flattening.
    pub fn new(semi_major_axis: f64, flattening: f64) -> Self {
        Self {
            semi_major_axis,
            flattening,
        }
    }

    /// Semi-major axis `a`.
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Flattening `f = (a - b) / a`.
    pub fn flattening(&self) -> f64 {
        self.flattening
    }

    /// Semi-minor axis `b = a (1 - f)`.
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening)
    }

    /// First eccentricity squared `(a^2 - b^2) / a^2`.
    pub fn first_eccentricity_squared(&self) -> f64 {
        let a2 = sqr(self.semi_major_axis);
        (a2 - sqr(self.semi_minor_axis())) / a2
    }

    /// Second eccentricity squared `(a^2 - b^2) / b^2`.
    pub fn second_eccentricity_squared(&self) -> f64 {
        let b2 = sqr(self.semi_minor_axis());
        (sqr(self.semi_major_axis) - b2) / b2
    }

    /// Equatorial circumference, or the polar one when `semi_major_axis`
    /// is false.
    pub fn equatorial_circumference(&self, semi_major_axis: bool) -> f64 {
        2.0 * std::f64::consts::PI
            * match semi_major_axis {
                true => self.semi_major_axis,
                false => self.semi_minor_axis(),
            }
    }

    /// Polar radius of curvature `a^2 / b`.
    pub fn polar_radius_of_curvature(&self) -> f64 {
        sqr(self.semi_major_axis) / self.semi_minor_axis()
    }

    /// Equatorial radius of curvature for a meridian, `b^2 / a`.
    pub fn equatorial_radius_of_curvature(&self) -> f64 {
        sqr(self.semi_minor_axis()) / self.semi_major_axis
    }

    /// Axis ratio `b / a`.
    pub fn axis_ratio(&self) -> f64 {
        self.semi_minor_axis() / self.semi_major_axis
    }

    /// Linear eccentricity `sqrt(a^2 - b^2)`.
    pub fn linear_eccentricity(&self) -> f64 {
        (sqr(self.semi_major_axis) - sqr(self.semi_minor_axis())).sqrt()
    }

    /// Mean radius `(2a + b) / 3`.
    pub fn mean_radius(&self) -> f64 {
        (2.0 * self.semi_major_axis + self.semi_minor_axis()) / 3.0
    }

    /// Authalic radius: the radius of the sphere with the same surface area.
    pub fn authalic_radius(&self) -> f64 {
        let a = self.semi_major_axis;
        let b = self.semi_minor_axis();
        let e = self.linear_eccentricity();
        ((sqr(a) + a * sqr(b) / e * ((a + e) / b).ln()) * 0.5).sqrt()
    }

    /// Volumetric radius: the radius of the sphere with the same volume.
    pub fn volumetric_radius(&self) -> f64 {
        (sqr(self.semi_major_axis) * self.semi_minor_axis()).powf(1.0 / 3.0)
    }
}

/// Converter between geographic and ECEF Cartesian coordinates on a given
/// spheroid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    spheroid: Spheroid,
}

impl Coordinates {
    pub fn new(spheroid: Spheroid) -> Self {
        Self { spheroid }
    }

    pub fn spheroid(&self) -> &Spheroid {
        &self.spheroid
    }

    /// Converts a geographic position to ECEF Cartesian coordinates in
    /// meters.
    pub fn lla_to_ecef(&self, position: &Lla) -> [f64; 3] {
        let lon = position.lon.to_radians();
        let lat = position.lat.to_radians();
        let e2 = self.spheroid.first_eccentricity_squared();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();

        // Prime vertical radius of curvature.
        let n = self.spheroid.semi_major_axis() / (1.0 - e2 * sqr(sin_lat)).sqrt();

        [
            (n + position.alt) * cos_lat * cos_lon,
            (n + position.alt) * cos_lat * sin_lon,
            (n * (1.0 - e2) + position.alt) * sin_lat,
        ]
    }

    /// Converts ECEF Cartesian coordinates back to a geographic position
    /// (Heikkinen's closed-form solution).
    pub fn ecef_to_lla(&self, ecef: &[f64; 3]) -> Lla {
        let [x, y, z] = *ecef;
        let a = self.spheroid.semi_major_axis();
        let b = self.spheroid.semi_minor_axis();
        let e2 = self.spheroid.first_eccentricity_squared();
        let ep2 = self.spheroid.second_eccentricity_squared();

        let p = (sqr(x) + sqr(y)).sqrt();
        if p < 1e-12 {
            // On the polar axis the longitude is arbitrary.
            let lat = match z >= 0.0 {
                true => 90.0,
                false => -90.0,
            };
            return Lla::new(0.0, lat, z.abs() - b);
        }

        let f = 54.0 * sqr(b) * sqr(z);
        let g = sqr(p) + (1.0 - e2) * sqr(z) - e2 * (sqr(a) - sqr(b));
        let c = sqr(e2) * f * sqr(p) / (g * g * g);
        let s = (1.0 + c + (sqr(c) + 2.0 * c).sqrt()).cbrt();
        let k = s + 1.0 + 1.0 / s;
        let pp = f / (3.0 * sqr(k) * sqr(g));
        let q = (1.0 + 2.0 * sqr(e2) * pp).sqrt();
        let r0 = -pp * e2 * p / (1.0 + q)
            + (0.5 * sqr(a) * (1.0 + 1.0 / q)
                - pp * (1.0 - e2) * sqr(z) / (q * (1.0 + q))
                - 0.5 * pp * sqr(p))
            .sqrt();
        let u = (sqr(p - e2 * r0) + sqr(z)).sqrt();
        let v = (sqr(p - e2 * r0) + (1.0 - e2) * sqr(z)).sqrt();
        let z0 = sqr(b) * z / (a * v);

        Lla::new(
            y.atan2(x).to_degrees(),
            ((z + ep2 * z0) / p).atan().to_degrees(),
            u * (1.0 - sqr(b) / (a * v)),
        )
    }
}

/// Geodesic distance formulae on geographic coordinates.
///
/// The spatial index stores Cartesian points for query performance but
/// always reports distances through one of these strategies, so the metric
/// of the results is independent of the storage geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistanceStrategy {
    /// Great-circle distance on a sphere of radius `a`.
    #[default]
    Haversine,

    /// Andoyer's first-order flattening correction.
    Andoyer,

    /// Reduced-latitude (Andoyer-Lambert) first-order formula.
    Thomas,

    /// Vincenty's iterative inverse solution, falling back to haversine
    /// when the iteration fails to converge near the antipode.
    Vincenty,
}

impl DistanceStrategy {
    /// Distance in meters between two geographic positions; altitudes are
    /// ignored.
    pub fn distance(&self, a: &Lla, b: &Lla, spheroid: &Spheroid) -> f64 {
        match self {
            DistanceStrategy::Haversine => haversine(a, b, spheroid),
            DistanceStrategy::Andoyer => andoyer(a, b, spheroid),
            DistanceStrategy::Thomas => thomas(a, b, spheroid),
            DistanceStrategy::Vincenty => vincenty(a, b, spheroid),
        }
    }
}

fn haversine(a: &Lla, b: &Lla, spheroid: &Spheroid) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let half_dlat = 0.5 * (lat2 - lat1);
    let half_dlon = 0.5 * (b.lon - a.lon).to_radians();

    let h = sqr(half_dlat.sin()) + lat1.cos() * lat2.cos() * sqr(half_dlon.sin());
    2.0 * spheroid.semi_major_axis() * h.sqrt().min(1.0).asin()
}

fn andoyer(a: &Lla, b: &Lla, spheroid: &Spheroid) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let f = 0.5 * (lat1 + lat2);
    let g = 0.5 * (lat1 - lat2);
    let l = 0.5 * (a.lon - b.lon).to_radians();

    let s = sqr(g.sin()) * sqr(l.cos()) + sqr(f.cos()) * sqr(l.sin());
    let c = sqr(g.cos()) * sqr(l.cos()) + sqr(f.sin()) * sqr(l.sin());
    if s == 0.0 {
        return 0.0;
    }
    if c < 1e-30 {
        // Antipodal pair: the correction terms degenerate.
        return std::f64::consts::PI * spheroid.semi_major_axis();
    }
    let omega = (s / c).sqrt().atan();
    let r = (s * c).sqrt() / omega;
    let d = 2.0 * omega * spheroid.semi_major_axis();
    let h1 = (3.0 * r - 1.0) / (2.0 * c);
    let h2 = (3.0 * r + 1.0) / (2.0 * s);

    d * (1.0
        + spheroid.flattening()
            * (h1 * sqr(f.sin()) * sqr(g.cos()) - h2 * sqr(f.cos()) * sqr(g.sin())))
}

fn thomas(a: &Lla, b: &Lla, spheroid: &Spheroid) -> f64 {
    let flattening = spheroid.flattening();
    let beta1 = ((1.0 - flattening) * a.lat.to_radians().tan()).atan();
    let beta2 = ((1.0 - flattening) * b.lat.to_radians().tan()).atan();
    let dlon = (b.lon - a.lon).to_radians();

    // Central angle between the reduced latitudes.
    let h = sqr((0.5 * (beta2 - beta1)).sin())
        + beta1.cos() * beta2.cos() * sqr((0.5 * dlon).sin());
    let sigma = 2.0 * h.sqrt().min(1.0).asin();
    if sigma == 0.0 {
        return 0.0;
    }

    let p = 0.5 * (beta1 + beta2);
    let q = 0.5 * (beta2 - beta1);
    let half = 0.5 * sigma;
    let x = match half.cos().abs() < f64::EPSILON {
        true => 0.0,
        false => (sigma - sigma.sin()) * sqr(p.sin()) * sqr(q.cos()) / sqr(half.cos()),
    };
    let y = match half.sin().abs() < f64::EPSILON {
        true => 0.0,
        false => (sigma + sigma.sin()) * sqr(p.cos()) * sqr(q.sin()) / sqr(half.sin()),
    };

    spheroid.semi_major_axis() * (sigma - 0.5 * flattening * (x + y))
}

fn vincenty(a: &Lla, b: &Lla, spheroid: &Spheroid) -> f64 {
    let major = spheroid.semi_major_axis();
    let minor = spheroid.semi_minor_axis();
    let flattening = spheroid.flattening();

    let u1 = ((1.0 - flattening) * a.lat.to_radians().tan()).atan();
    let u2 = ((1.0 - flattening) * b.lat.to_radians().tan()).atan();
    let l = (b.lon - a.lon).to_radians();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..200 {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = (sqr(cos_u2 * sin_lambda)
            + sqr(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda))
        .sqrt();
        if sin_sigma == 0.0 {
            return 0.0;
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos2_alpha = 1.0 - sqr(sin_alpha);
        let cos_2sigma_m = match cos2_alpha.abs() < f64::EPSILON {
            // Equatorial line.
            true => 0.0,
            false => cos_sigma - 2.0 * sin_u1 * sin_u2 / cos2_alpha,
        };
        let c = flattening / 16.0 * cos2_alpha * (4.0 + flattening * (4.0 - 3.0 * cos2_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * flattening
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * sqr(cos_2sigma_m))));

        if (lambda - previous).abs() < 1e-12 {
            let u2_term = cos2_alpha * (sqr(major) - sqr(minor)) / sqr(minor);
            let big_a = 1.0
                + u2_term / 16384.0
                    * (4096.0 + u2_term * (-768.0 + u2_term * (320.0 - 175.0 * u2_term)));
            let big_b = u2_term / 1024.0
                * (256.0 + u2_term * (-128.0 + u2_term * (74.0 - 47.0 * u2_term)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * sqr(cos_2sigma_m))
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sqr(sin_sigma))
                                * (-3.0 + 4.0 * sqr(cos_2sigma_m))));
            return minor * big_a * (sigma - delta_sigma);
        }
    }

    // Near-antipodal points defeat the iteration.
    haversine(a, b, spheroid)
}
