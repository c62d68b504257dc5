use veloclust_core::{PointCloud, PointXYZ};

/// Region of interest in front of the sensor.
///
/// A point is admitted only if it lies strictly inside every bound:
/// `|atan2(y, x)| < opening_angle`, `min_range < hypot(x, y) < max_range`
/// and `z > min_height`. Borderline returns are dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdmissionParams {
    /// Half-angle of the forward sector, in radians.
    pub opening_angle: f32,
    pub min_range: f32,
    pub max_range: f32,
    pub min_height: f32,
}

impl AdmissionParams {
    pub fn admits(&self, point: [f32; 3]) -> bool {
        let p = PointXYZ::from(point);

        // atan2(0, 0) == 0, so the origin passes the sector test and is
        // rejected by the range test instead.
        let angle = p.abs_azimuth();
        let range = p.planar_range();

        angle < self.opening_angle
            && self.min_range < range
            && range < self.max_range
            && p.z > self.min_height
    }
}

/// Keeps the points inside the sensor's region of interest, in input order.
///
/// Non-finite coordinates never pass: every comparison against NaN is false
/// and infinite ranges fail `range < max_range`.
pub fn admission_filter(cloud: &PointCloud, params: &AdmissionParams) -> PointCloud {
    if cloud.is_empty() {
        return PointCloud::new();
    }

    let keep: Vec<usize> = cloud
        .iter_points()
        .enumerate()
        .filter(|(_, p)| params.admits(*p))
        .map(|(i, _)| i)
        .collect();

    cloud.select(&keep)
}
