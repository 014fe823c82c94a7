/////////////////////////////////////////////////////////////////////////////////////////////
//
// Wraps the `rstar` crate into a geodetic spatial index with scattered-data interpolation.
//
// Created on: 24 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # rtree
//!
//! Spatial index for geodetic point clouds. Positions are stored as ECEF
//! Cartesian points inside an R\*-tree, which keeps the index geometry fast
//! and balanced; query results always report geodesic distances computed on
//! the geographic coordinates, so the metric of the results is independent
//! of the storage geometry.
//!
//! On top of the k-nearest and radius queries, the index offers three
//! vectorized interpolators over the neighborhoods: inverse distance
//! weighting, radial basis functions, and window-function averaging.

use crate::error::{Error, Result};
use crate::geodetic::{Coordinates, DistanceStrategy, Lla, Spheroid};
use crate::grid::GridValue;
use crate::linalg;
use crate::parallel;
use faer::{Mat, MatRef};
use ferreus_geointerp_utils::{RadialBasisFunction, WindowFunction};
use rstar::primitives::GeomWithData;
use rstar::RTree;

type IndexedPoint = GeomWithData<[f64; 3], usize>;

/// A neighbor returned by the queries: geodesic distance in meters plus the
/// stored value.
pub type Neighbor<T> = (f64, T);

/// Spatial index for scattered geodetic samples of type `T`.
pub struct RTree3D<T: GridValue> {
    tree: RTree<IndexedPoint>,
    positions: Vec<Lla>,
    ecef: Vec<[f64; 3]>,
    values: Vec<T>,
    coordinates: Coordinates,
    strategy: DistanceStrategy,
}

impl<T: GridValue> Default for RTree3D<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T: GridValue> RTree3D<T> {
    /// Creates an empty index on the given spheroid (WGS-84 by default),
    /// reporting haversine distances.
    pub fn new(spheroid: Option<Spheroid>) -> Self {
        Self::with_strategy(spheroid, DistanceStrategy::Haversine)
    }

    /// Creates an empty index with an explicit distance strategy.
    pub fn with_strategy(spheroid: Option<Spheroid>, strategy: DistanceStrategy) -> Self {
        Self {
            tree: RTree::new(),
            positions: Vec::new(),
            ecef: Vec::new(),
            values: Vec::new(),
            coordinates: Coordinates::new(spheroid.unwrap_or_default()),
            strategy,
        }
    }

    /// Number of stored samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the index holds no sample.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Removes every stored sample.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.positions.clear();
        self.ecef.clear();
        self.values.clear();
    }

    /// Geographic bounds of the stored samples:
    /// `(lon, lat, alt)` minima and maxima.
    pub fn equatorial_bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        if self.is_empty() {
            return None;
        }
        let mut mins = [f64::INFINITY; 3];
        let mut maxs = [f64::NEG_INFINITY; 3];
        for position in &self.positions {
            for (slot, value) in mins
                .iter_mut()
                .zip([position.lon, position.lat, position.alt])
            {
                *slot = slot.min(value);
            }
            for (slot, value) in maxs
                .iter_mut()
                .zip([position.lon, position.lat, position.alt])
            {
                *slot = slot.max(value);
            }
        }
        Some((mins, maxs))
    }

    fn parse_coordinates(coordinates: &MatRef<'_, f64>, values: &[T]) -> Result<Vec<Lla>> {
        if coordinates.nrows() != values.len() {
            return Err(Error::InvalidShape {
                name: "values",
                expected: coordinates.nrows(),
                found: values.len(),
            });
        }
        match coordinates.ncols() {
            2 | 3 => Ok((0..coordinates.nrows())
                .map(|row| {
                    Lla::new(
                        *coordinates.get(row, 0),
                        *coordinates.get(row, 1),
                        match coordinates.ncols() == 3 {
                            true => *coordinates.get(row, 2),
                            false => 0.0,
                        },
                    )
                })
                .collect()),
            found => Err(Error::invalid_argument(format!(
                "coordinates must be a matrix (n, 2) of longitudes and \
                 latitudes or (n, 3) with altitudes, got (n, {})",
                found
            ))),
        }
    }

    /// Replaces the index contents, bulk-loading the tree for a balanced,
    /// query-optimal structure.
    ///
    /// # Arguments
    /// * `coordinates` - One `(lon, lat[, alt])` row per point, in degrees
    ///   and meters.
    /// * `values` - Value carried by each point.
    pub fn packing(&mut self, coordinates: &MatRef<'_, f64>, values: &[T]) -> Result<()> {
        let positions = Self::parse_coordinates(coordinates, values)?;
        self.positions = positions;
        self.values = values.to_vec();
        self.ecef = self
            .positions
            .iter()
            .map(|p| self.coordinates.lla_to_ecef(p))
            .collect();
        self.tree = RTree::bulk_load(
            self.ecef
                .iter()
                .enumerate()
                .map(|(index, point)| GeomWithData::new(*point, index))
                .collect(),
        );
        Ok(())
    }

    /// Inserts new samples one by one, keeping the existing contents.
    pub fn insert(&mut self, coordinates: &MatRef<'_, f64>, values: &[T]) -> Result<()> {
        let positions = Self::parse_coordinates(coordinates, values)?;
        for (position, value) in positions.into_iter().zip(values.iter()) {
            let point = self.coordinates.lla_to_ecef(&position);
            let index = self.values.len();
            self.positions.push(position);
            self.ecef.push(point);
            self.values.push(*value);
            self.tree.insert(GeomWithData::new(point, index));
        }
        Ok(())
    }

    /// Geodesic distance from `point` to the stored sample `index`.
    #[inline]
    fn distance_to(&self, point: &Lla, index: usize) -> f64 {
        self.strategy
            .distance(point, &self.positions[index], self.coordinates.spheroid())
    }

    /// Indices of the up-to-`k` nearest samples in ECEF order, with the
    /// `within` envelope test applied.
    fn nearest_indices(&self, point: &Lla, k: usize, within: bool) -> Vec<usize> {
        let target = self.coordinates.lla_to_ecef(point);
        let indices: Vec<usize> = self
            .tree
            .nearest_neighbor_iter(&target)
            .take(k)
            .map(|item| item.data)
            .collect();

        if within && !indices.is_empty() {
            // The envelope is the axis-aligned bounding box of the
            // neighbors in Cartesian space, not their convex hull.
            let mut mins = [f64::INFINITY; 3];
            let mut maxs = [f64::NEG_INFINITY; 3];
            for &index in &indices {
                for axis in 0..3 {
                    mins[axis] = mins[axis].min(self.ecef[index][axis]);
                    maxs[axis] = maxs[axis].max(self.ecef[index][axis]);
                }
            }
            let covered = (0..3).all(|axis| {
                target[axis] >= mins[axis] && target[axis] <= maxs[axis]
            });
            if !covered {
                return Vec::new();
            }
        }
        indices
    }

    /// Search for the `k` nearest samples of a point.
    ///
    /// The results follow the Cartesian nearest order; each entry carries
    /// the geodesic distance to the target in meters.
    pub fn query(&self, point: &Lla, k: usize) -> Vec<Neighbor<T>> {
        self.nearest_indices(point, k, false)
            .into_iter()
            .map(|index| (self.distance_to(point, index), self.values[index]))
            .collect()
    }

    /// Like [`RTree3D::query`], but rejects the whole neighborhood (empty
    /// result) when the target is not covered by the envelope of its `k`
    /// neighbors, which forbids extrapolation.
    pub fn query_within(&self, point: &Lla, k: usize) -> Vec<Neighbor<T>> {
        self.nearest_indices(point, k, true)
            .into_iter()
            .map(|index| (self.distance_to(point, index), self.values[index]))
            .collect()
    }

    /// Search for every sample within a geodesic `radius` (meters) of the
    /// point.
    pub fn query_ball(&self, point: &Lla, radius: f64) -> Vec<Neighbor<T>> {
        let target = self.coordinates.lla_to_ecef(point);
        // The Cartesian chord never exceeds the geodesic arc, so the tree
        // lookup returns a superset of the ball.
        let mut result: Vec<Neighbor<T>> = self
            .tree
            .locate_within_distance(target, radius * radius)
            .filter_map(|item| {
                let distance = self.distance_to(point, item.data);
                match distance < radius {
                    true => Some((distance, self.values[item.data])),
                    false => None,
                }
            })
            .collect();
        result.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        result
    }

    /// Vectorized k-nearest query over a matrix of targets.
    ///
    /// Returns `(distances, values)` matrices of shape `(n, k)`; rows with
    /// fewer than `k` neighbors are padded with `-1`.
    pub fn query_batch(
        &self,
        coordinates: &MatRef<'_, f64>,
        k: usize,
        within: bool,
        num_threads: usize,
    ) -> Result<(Mat<f64>, Mat<f64>)> {
        let targets = Self::parse_targets(coordinates)?;
        let rows = parallel::try_map(targets.len(), num_threads, |index| {
            let neighbors = match within {
                true => self.query_within(&targets[index], k),
                false => self.query(&targets[index], k),
            };
            Ok(neighbors)
        })?;

        let n = targets.len();
        let mut distances = Mat::from_fn(n, k, |_, _| -1.0);
        let mut values = Mat::from_fn(n, k, |_, _| -1.0);
        for (row, neighbors) in rows.into_iter().enumerate() {
            for (column, (distance, value)) in neighbors.into_iter().enumerate() {
                distances[(row, column)] = distance;
                values[(row, column)] = value.to_f64();
            }
        }
        Ok((distances, values))
    }

    fn parse_targets(coordinates: &MatRef<'_, f64>) -> Result<Vec<Lla>> {
        match coordinates.ncols() {
            2 | 3 => Ok((0..coordinates.nrows())
                .map(|row| {
                    Lla::new(
                        *coordinates.get(row, 0),
                        *coordinates.get(row, 1),
                        match coordinates.ncols() == 3 {
                            true => *coordinates.get(row, 2),
                            false => 0.0,
                        },
                    )
                })
                .collect()),
            found => Err(Error::invalid_argument(format!(
                "coordinates must be a matrix (n, 2) or (n, 3), got (n, {})",
                found
            ))),
        }
    }

    /// Neighborhood shared by the interpolation drivers: geodesic distances
    /// and sample indices, radius-filtered when requested.
    fn neighborhood(
        &self,
        point: &Lla,
        k: usize,
        within: bool,
        radius: Option<f64>,
    ) -> Vec<(f64, usize)> {
        let mut neighbors: Vec<(f64, usize)> = self
            .nearest_indices(point, k, within)
            .into_iter()
            .map(|index| (self.distance_to(point, index), index))
            .collect();
        if let Some(radius) = radius {
            neighbors.retain(|&(distance, _)| distance <= radius);
        }
        neighbors
    }

    /// Interpolation by inverse distance weighting.
    ///
    /// # Arguments
    /// * `coordinates` - One `(lon, lat[, alt])` target per row.
    /// * `k` - Neighborhood size.
    /// * `radius` - Optional geodesic cut-off in meters.
    /// * `within` - Reject extrapolated targets (outside the neighborhood
    ///   envelope).
    /// * `p` - Weighting power.
    /// * `num_threads` - Worker count: `0` uses all logical CPUs.
    ///
    /// # Returns
    /// The interpolated values and the number of neighbors used per target;
    /// targets with an empty neighborhood yield NaN.
    pub fn inverse_distance_weighting(
        &self,
        coordinates: &MatRef<'_, f64>,
        k: usize,
        radius: Option<f64>,
        within: bool,
        p: i32,
        num_threads: usize,
    ) -> Result<(Vec<f64>, Vec<u32>)> {
        let targets = Self::parse_targets(coordinates)?;
        let rows = parallel::try_map(targets.len(), num_threads, |index| {
            let neighbors = self.neighborhood(&targets[index], k, within, radius);
            if neighbors.is_empty() {
                return Ok((f64::NAN, 0u32));
            }

            let mut numerator = 0.0;
            let mut denominator = 0.0;
            for &(distance, sample) in &neighbors {
                if distance == 0.0 {
                    // The target coincides with a stored sample.
                    return Ok((self.values[sample].to_f64(), neighbors.len() as u32));
                }
                let weight = distance.powi(-p);
                numerator += weight * self.values[sample].to_f64();
                denominator += weight;
            }
            Ok((numerator / denominator, neighbors.len() as u32))
        })?;
        Ok(rows.into_iter().unzip())
    }

    /// Interpolation by radial basis functions over the neighborhood.
    ///
    /// The collocation system is assembled on the ECEF coordinates of the
    /// neighbors; `epsilon` defaults to the mean pairwise distance of the
    /// neighborhood and `smooth` damps the diagonal. Targets whose system
    /// is singular (or rejected by `within`) yield NaN.
    #[allow(clippy::too_many_arguments)]
    pub fn radial_basis_function(
        &self,
        coordinates: &MatRef<'_, f64>,
        k: usize,
        radius: Option<f64>,
        within: bool,
        rbf: RadialBasisFunction,
        epsilon: Option<f64>,
        smooth: f64,
        num_threads: usize,
    ) -> Result<(Vec<f64>, Vec<u32>)> {
        let targets = Self::parse_targets(coordinates)?;
        let rows = parallel::try_map(targets.len(), num_threads, |index| {
            let neighbors = self.neighborhood(&targets[index], k, within, radius);
            if neighbors.is_empty() {
                return Ok((f64::NAN, 0u32));
            }
            let count = neighbors.len();

            let points = Mat::from_fn(count, 3, |row, axis| {
                self.ecef[neighbors[row].1][axis]
            });

            // The shape parameter defaults to the mean pairwise distance of
            // the neighborhood.
            let epsilon = epsilon.unwrap_or_else(|| {
                let mut sum = 0.0;
                for i in 0..count {
                    for j in i + 1..count {
                        sum += ferreus_geointerp_utils::get_distance(
                            &self.ecef[neighbors[i].1],
                            &self.ecef[neighbors[j].1],
                        );
                    }
                }
                match count > 1 {
                    true => sum / (count * (count - 1) / 2) as f64,
                    false => 1.0,
                }
            });

            let phi = ferreus_geointerp_utils::phi_matrix(&points.as_ref(), rbf, epsilon, smooth);
            let z: Vec<f64> = neighbors
                .iter()
                .map(|&(_, sample)| self.values[sample].to_f64())
                .collect();

            let weights = match linalg::solve(&phi, &z) {
                Ok(weights) => weights,
                Err(Error::SingularSystem) => return Ok((f64::NAN, count as u32)),
                Err(error) => return Err(error),
            };

            let target = self.coordinates.lla_to_ecef(&targets[index]);
            let mut value = 0.0;
            for (weight, &(_, sample)) in weights.iter().zip(&neighbors) {
                let distance =
                    ferreus_geointerp_utils::get_distance(&target, &self.ecef[sample]);
                value += weight * rbf.phi(distance, epsilon);
            }
            Ok((value, count as u32))
        })?;
        Ok(rows.into_iter().unzip())
    }

    /// Interpolation by window-function weighting: each neighbor weighs
    /// `W(d / radius)`.
    #[allow(clippy::too_many_arguments)]
    pub fn window_function(
        &self,
        coordinates: &MatRef<'_, f64>,
        k: usize,
        radius: f64,
        within: bool,
        wf: WindowFunction,
        arg: f64,
        num_threads: usize,
    ) -> Result<(Vec<f64>, Vec<u32>)> {
        if radius <= 0.0 {
            return Err(Error::invalid_argument(
                "the window radius must be strictly positive",
            ));
        }
        let targets = Self::parse_targets(coordinates)?;
        let rows = parallel::try_map(targets.len(), num_threads, |index| {
            let neighbors = self.neighborhood(&targets[index], k, within, Some(radius));
            if neighbors.is_empty() {
                return Ok((f64::NAN, 0u32));
            }

            let mut numerator = 0.0;
            let mut denominator = 0.0;
            for &(distance, sample) in &neighbors {
                let weight = wf.weight(distance, radius, arg);
                numerator += weight * self.values[sample].to_f64();
                denominator += weight;
            }
            Ok((
                match denominator == 0.0 {
                    true => f64::NAN,
                    false => numerator / denominator,
                },
                neighbors.len() as u32,
            ))
        })?;
        Ok(rows.into_iter().unzip())
    }
}
