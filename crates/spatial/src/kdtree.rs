use kiddo::float::distance::SquaredEuclidean;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use std::num::NonZero;
use veloclust_core::PointCloud;

/// A KdTree for radius and nearest-neighbour queries over one frame.
///
/// Built on kiddo v5's `ImmutableKdTree`. Only finite points are inserted;
/// `ids` maps tree items back to indices in the source cloud, so queries
/// always answer in terms of the caller's point indices.
#[derive(Debug, Clone)]
pub struct KdTree {
    tree: ImmutableKdTree<f32, u32, 3, 32>,
    ids: Vec<u32>,
    num_points: usize,
}

impl KdTree {
    /// Build a KdTree from a PointCloud.
    ///
    /// # Panics
    ///
    /// Panics if the cloud holds more than `u32::MAX` points.
    pub fn build(cloud: &PointCloud) -> Self {
        let n = cloud.len();
        assert!(n <= u32::MAX as usize, "cloud too large for u32 tree items");

        let mut points = Vec::with_capacity(n);
        let mut ids = Vec::with_capacity(n);
        for (i, p) in cloud.iter_points().enumerate() {
            if p.iter().all(|v| v.is_finite()) {
                points.push(p);
                ids.push(i as u32);
            }
        }

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
            ids,
            num_points: n,
        }
    }

    /// Number of points in the source cloud, finite or not.
    pub fn len(&self) -> usize {
        self.num_points
    }

    pub fn is_empty(&self) -> bool {
        self.num_points == 0
    }

    /// Number of points actually stored in the tree.
    pub fn indexed_len(&self) -> usize {
        self.ids.len()
    }

    /// Find the `k` nearest neighbours to `query`.
    ///
    /// Returns `(indices, distances)` where distances are **Euclidean**
    /// (not squared), sorted in ascending order by distance.
    ///
    /// Edge cases:
    /// - Returns empty if `k == 0`, the tree is empty, or query is non-finite.
    /// - If `k` exceeds the number of indexed points, returns all of them.
    pub fn knn(&self, query: &[f32; 3], k: usize) -> (Vec<usize>, Vec<f32>) {
        if self.ids.is_empty() || !query.iter().all(|v| v.is_finite()) {
            return (Vec::new(), Vec::new());
        }
        let Some(nz_k) = NonZero::new(k) else {
            return (Vec::new(), Vec::new());
        };

        let results = self.tree.nearest_n::<SquaredEuclidean>(query, nz_k);

        let mut indices = Vec::with_capacity(results.len());
        let mut distances = Vec::with_capacity(results.len());
        for nn in results {
            indices.push(self.ids[nn.item as usize] as usize);
            distances.push(nn.distance.sqrt());
        }

        (indices, distances)
    }

    /// Find all points within `radius` (Euclidean distance) of `query`.
    ///
    /// Returns ascending indices of points where `euclidean_dist <= radius`.
    ///
    /// Edge cases:
    /// - Returns empty if radius <= 0, the tree is empty, radius is
    ///   non-finite, or query contains NaN/inf.
    pub fn radius_search(&self, query: &[f32; 3], radius: f32) -> Vec<usize> {
        if radius <= 0.0 || !radius.is_finite() {
            return Vec::new();
        }
        self.radius_search_sq(query, radius * radius)
    }

    /// Same as [`radius_search`](Self::radius_search) but takes the squared
    /// radius, so repeated queries skip the multiplication.
    pub fn radius_search_sq(&self, query: &[f32; 3], radius_sq: f32) -> Vec<usize> {
        if self.ids.is_empty()
            || radius_sq <= 0.0
            || !radius_sq.is_finite()
            || !query.iter().all(|v| v.is_finite())
        {
            return Vec::new();
        }

        // kiddo's `within_unsorted` uses strict `<`. To include points
        // exactly on the boundary (dist == radius), we query with a tiny
        // epsilon added, then post-filter with `<=`.
        let query_radius_sq = radius_sq + f32::EPSILON * radius_sq.max(1.0);

        let results = self
            .tree
            .within_unsorted::<SquaredEuclidean>(query, query_radius_sq);

        let mut indices: Vec<usize> = results
            .into_iter()
            .filter(|nn| nn.distance <= radius_sq)
            .map(|nn| self.ids[nn.item as usize] as usize)
            .collect();

        // Ascending index order keeps neighbour enumeration deterministic.
        indices.sort_unstable();

        indices
    }
}
