//! Density-based clustering (DBSCAN) over a single frame.
//!
//! The pass runs in two phases:
//!
//! 1. **Density scan**: one radius query per point, issued in parallel with
//!    rayon against a [`NeighborIndex`]. Each neighbour list is in ascending
//!    index order and includes the query point itself.
//! 2. **Labeling**: a strictly sequential sweep in input order that grows
//!    clusters breadth-first from core points. Only this phase writes labels,
//!    so which cluster claims a point reachable from two cores depends only
//!    on the input order.
//!
//! A point claimed by a cluster is never handed to another one, and a point
//! labeled noise can only be upgraded to a border point of a later cluster.

use std::collections::VecDeque;

use rayon::prelude::*;
use thiserror::Error;
use veloclust_core::PointCloud;
use veloclust_spatial::NeighborIndex;

/// Per-point outcome of a clustering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterLabel {
    Unassigned,
    Noise,
    Cluster(u32),
}

impl ClusterLabel {
    pub fn cluster_id(self) -> Option<u32> {
        match self {
            ClusterLabel::Cluster(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_noise(self) -> bool {
        self == ClusterLabel::Noise
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DbscanParamsError {
    #[error("cluster radius must be positive with a finite, normal square, got {0}")]
    InvalidRadius(f32),

    #[error("minimum cluster points must be at least 1")]
    ZeroMinPoints,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DbscanParams {
    /// Neighbourhood radius (epsilon). Points at exactly this distance count.
    pub radius: f32,
    /// Neighbours needed for a point to be core, the point itself included.
    pub min_points: usize,
}

impl DbscanParams {
    pub fn new(radius: f32, min_points: usize) -> Result<Self, DbscanParamsError> {
        let params = Self { radius, min_points };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), DbscanParamsError> {
        // Neighbourhoods compare against radius² in f32, so the square must
        // neither overflow nor flush towards zero.
        if !(self.radius > 0.0 && (self.radius * self.radius).is_normal()) {
            return Err(DbscanParamsError::InvalidRadius(self.radius));
        }
        if self.min_points == 0 {
            return Err(DbscanParamsError::ZeroMinPoints);
        }
        Ok(())
    }
}

/// Labels produced by [`dbscan`], indexed like the input cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub labels: Vec<ClusterLabel>,
    /// `core[i]` is true when point `i` had at least `min_points` neighbours.
    pub core: Vec<bool>,
    pub num_clusters: usize,
}

impl Clustering {
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            core: Vec::new(),
            num_clusters: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_noise()).count()
    }

    /// Member indices of cluster `id`, ascending.
    pub fn cluster_members(&self, id: u32) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == ClusterLabel::Cluster(id))
            .map(|(i, _)| i)
            .collect()
    }

    /// Member count per cluster, indexed by cluster id.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.num_clusters];
        for label in &self.labels {
            if let ClusterLabel::Cluster(id) = label {
                sizes[*id as usize] += 1;
            }
        }
        sizes
    }
}

/// Radius neighbourhood of every point, computed in parallel.
///
/// Lists are collected in point order, so the result does not depend on how
/// rayon schedules the queries. `radius` is expected to pass
/// [`DbscanParams::validate`]; otherwise every list comes back empty.
///
/// All lists are held at once, so memory is the sum of neighbourhood sizes.
/// That is linear in the frame for sensible radii but approaches n² when the
/// radius spans the whole frame.
pub fn neighborhoods(cloud: &PointCloud, radius: f32) -> Vec<Vec<usize>> {
    if cloud.is_empty() {
        return Vec::new();
    }
    let index = NeighborIndex::build(cloud);
    let radius_sq = radius * radius;
    (0..cloud.len())
        .into_par_iter()
        .map(|i| index.radius_search_sq(&cloud.point(i), radius_sq))
        .collect()
}

/// Clusters `cloud` with DBSCAN.
///
/// Cluster ids start at 0 and increase in the order clusters are discovered
/// while sweeping points in input order. Every point ends as either
/// [`ClusterLabel::Noise`] or [`ClusterLabel::Cluster`]. Non-finite points
/// have no neighbours and always end as noise.
///
/// With `min_points == 1` every finite point is core, so clusters are the
/// connected components of the radius graph and nothing finite is noise.
pub fn dbscan(cloud: &PointCloud, params: &DbscanParams) -> Clustering {
    if cloud.is_empty() {
        return Clustering::empty();
    }
    let neighbors = neighborhoods(cloud, params.radius);
    label_from_neighborhoods(&neighbors, params.min_points)
}

/// Labeling phase of [`dbscan`], given precomputed neighbourhoods.
///
/// `neighbors[i]` must contain `i` itself when point `i` is finite.
pub fn label_from_neighborhoods(neighbors: &[Vec<usize>], min_points: usize) -> Clustering {
    let n = neighbors.len();
    let core: Vec<bool> = neighbors.iter().map(|nb| nb.len() >= min_points).collect();
    let mut labels = vec![ClusterLabel::Unassigned; n];
    let mut next_id: u32 = 0;
    let mut queue: VecDeque<usize> = VecDeque::new();

    for p in 0..n {
        if labels[p] != ClusterLabel::Unassigned {
            continue;
        }
        if !core[p] {
            labels[p] = ClusterLabel::Noise;
            continue;
        }

        let id = next_id;
        next_id += 1;
        labels[p] = ClusterLabel::Cluster(id);
        queue.extend(neighbors[p].iter().copied().filter(|&q| q != p));

        while let Some(q) = queue.pop_front() {
            match labels[q] {
                ClusterLabel::Noise => {
                    // Border point: absorbed, never expanded.
                    labels[q] = ClusterLabel::Cluster(id);
                }
                ClusterLabel::Unassigned => {
                    labels[q] = ClusterLabel::Cluster(id);
                    if core[q] {
                        queue.extend(
                            neighbors[q]
                                .iter()
                                .copied()
                                .filter(|&r| !matches!(labels[r], ClusterLabel::Cluster(_))),
                        );
                    }
                }
                ClusterLabel::Cluster(_) => {}
            }
        }

        log::trace!(
            "cluster {} seeded at point {} ({} neighbours)",
            id,
            p,
            neighbors[p].len()
        );
    }

    Clustering {
        labels,
        core,
        num_clusters: next_id as usize,
    }
}
