use crate::{Aabb, HasPosition, PointXYZ};

/// One LiDAR frame, stored as separate coordinate columns.
///
/// A point's position in the columns is its index for the lifetime of the
/// frame; every stage that reduces a cloud produces a new `PointCloud` rather
/// than editing one in place.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            z: Vec::with_capacity(capacity),
        }
    }

    pub fn from_xyz(x: Vec<f32>, y: Vec<f32>, z: Vec<f32>) -> Self {
        assert_eq!(x.len(), y.len(), "x and y must have same length");
        assert_eq!(x.len(), z.len(), "x and z must have same length");

        Self { x, y, z }
    }

    /// Builds a cloud from interleaved `x, y, z, x, y, z, ...` floats, the
    /// layout most sensor drivers hand out.
    pub fn from_array(data: &[f32], num_points: usize) -> Self {
        assert_eq!(
            data.len(),
            num_points * 3,
            "interleaved xyz input must have num_points * 3 floats"
        );

        let mut cloud = Self::with_capacity(num_points);
        for chunk in data.chunks_exact(3).take(num_points) {
            cloud.push([chunk[0], chunk[1], chunk[2]]);
        }
        cloud
    }

    /// Builds a cloud from any sequence of positioned points, preserving order.
    pub fn from_points<P, I>(points: I) -> Self
    where
        P: HasPosition,
        I: IntoIterator<Item = P>,
    {
        let iter = points.into_iter();
        let mut cloud = Self::with_capacity(iter.size_hint().0);
        for p in iter {
            cloud.push(p.position());
        }
        cloud
    }

    pub fn push(&mut self, point: [f32; 3]) {
        self.x.push(point[0]);
        self.y.push(point[1]);
        self.z.push(point[2]);
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.x.len(), self.y.len());
        debug_assert_eq!(self.x.len(), self.z.len());
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_xyz(&self.x, &self.y, &self.z)
    }

    pub fn point(&self, i: usize) -> [f32; 3] {
        [self.x[i], self.y[i], self.z[i]]
    }

    pub fn point_xyz(&self, i: usize) -> PointXYZ {
        PointXYZ::new(self.x[i], self.y[i], self.z[i])
    }

    pub fn iter_points(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((x, y), z)| [*x, *y, *z])
    }

    /// Returns the points at `indices`, in the order the indices are given.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut out = Self::with_capacity(indices.len());
        for &idx in indices {
            assert!(idx < self.len(), "index out of bounds in select");
            out.push(self.point(idx));
        }
        out
    }

    pub fn to_array(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len() * 3);
        for p in self.iter_points() {
            out.extend_from_slice(&p);
        }
        out
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: HasPosition> FromIterator<P> for PointCloud {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::from_points(iter)
    }
}
