use crate::{KdTree, LinearIndex};
use veloclust_core::PointCloud;

/// Frames smaller than this are searched by pairwise scan.
///
/// Below a few dozen points a scan over a contiguous array beats the tree
/// build plus traversal; above it the scan's O(n) per query dominates.
pub const LINEAR_SCAN_MAX_POINTS: usize = 64;

/// Radius-query index over one frame, picking its back-end by frame size.
///
/// Both back-ends return the same answer for the same query, so callers can
/// treat the choice as purely a performance detail.
#[derive(Debug, Clone)]
pub enum NeighborIndex {
    Linear(LinearIndex),
    Tree(KdTree),
}

impl NeighborIndex {
    pub fn build(cloud: &PointCloud) -> Self {
        if cloud.len() < LINEAR_SCAN_MAX_POINTS {
            Self::Linear(LinearIndex::build(cloud))
        } else {
            Self::Tree(KdTree::build(cloud))
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Linear(index) => index.len(),
            Self::Tree(tree) => tree.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ascending indices of every finite point with squared distance to
    /// `query` at most `radius_sq`.
    pub fn radius_search_sq(&self, query: &[f32; 3], radius_sq: f32) -> Vec<usize> {
        match self {
            Self::Linear(index) => index.radius_search_sq(query, radius_sq),
            Self::Tree(tree) => tree.radius_search_sq(query, radius_sq),
        }
    }
}
