use veloclust_core::{Aabb, PointCloud};

use crate::dbscan::{ClusterLabel, Clustering};

/// Geometric summary of one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterDescriptor {
    pub id: u32,
    pub point_count: usize,
    /// Arithmetic mean of the member coordinates.
    pub centroid: [f32; 3],
    pub bounds: Aabb,
}

impl ClusterDescriptor {
    /// Midpoint of the bounding box; differs from `centroid` for lopsided
    /// clusters.
    pub fn center(&self) -> [f32; 3] {
        self.bounds.center().unwrap_or(self.centroid)
    }

    /// Box edge lengths along x, y and z.
    pub fn dimensions(&self) -> [f32; 3] {
        self.bounds.dimensions()
    }
}

#[derive(Default, Clone, Copy)]
struct CentroidAccum {
    sx: f64,
    sy: f64,
    sz: f64,
    n: usize,
}

/// One descriptor per cluster in `clustering`, ordered by ascending id.
/// Noise points are ignored.
///
/// # Panics
///
/// Panics if `clustering` was not computed from `cloud` (length mismatch).
pub fn summarize_clusters(cloud: &PointCloud, clustering: &Clustering) -> Vec<ClusterDescriptor> {
    assert_eq!(
        cloud.len(),
        clustering.len(),
        "clustering must label every point of the cloud"
    );

    let mut sums = vec![CentroidAccum::default(); clustering.num_clusters];
    let mut bounds = vec![Aabb::empty(); clustering.num_clusters];

    for (p, label) in cloud.iter_points().zip(&clustering.labels) {
        let ClusterLabel::Cluster(id) = *label else {
            continue;
        };
        let id = id as usize;
        let acc = &mut sums[id];
        acc.sx += p[0] as f64;
        acc.sy += p[1] as f64;
        acc.sz += p[2] as f64;
        acc.n += 1;
        bounds[id].expand_with_point(p);
    }

    sums.into_iter()
        .zip(bounds)
        .enumerate()
        .map(|(id, (acc, bounds))| {
            let denom = acc.n.max(1) as f64;
            let descriptor = ClusterDescriptor {
                id: id as u32,
                point_count: acc.n,
                centroid: [
                    (acc.sx / denom) as f32,
                    (acc.sy / denom) as f32,
                    (acc.sz / denom) as f32,
                ],
                bounds,
            };
            log::trace!(
                "cluster {}: {} points, centroid {:?}, size {:?}",
                descriptor.id,
                descriptor.point_count,
                descriptor.centroid,
                descriptor.dimensions()
            );
            descriptor
        })
        .collect()
}
