use veloclust_core::PointCloud;

/// Pairwise-scan neighbour search.
///
/// Every query touches every point, so this only pays off for tiny frames
/// where building a tree costs more than scanning. Results match
/// [`KdTree::radius_search_sq`](crate::KdTree::radius_search_sq) exactly:
/// ascending indices, inclusive boundary, non-finite points never returned.
#[derive(Debug, Clone)]
pub struct LinearIndex {
    points: Vec<[f32; 3]>,
}

impl LinearIndex {
    pub fn build(cloud: &PointCloud) -> Self {
        Self {
            points: cloud.iter_points().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn radius_search_sq(&self, query: &[f32; 3], radius_sq: f32) -> Vec<usize> {
        if self.points.is_empty()
            || radius_sq <= 0.0
            || !radius_sq.is_finite()
            || !query.iter().all(|v| v.is_finite())
        {
            return Vec::new();
        }

        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.iter().all(|v| v.is_finite()))
            .filter(|(_, p)| squared_distance(query, p) <= radius_sq)
            .map(|(i, _)| i)
            .collect()
    }
}

#[inline]
pub(crate) fn squared_distance(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}
