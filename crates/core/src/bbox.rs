/// Axis-aligned bounding box over the finite points it has seen.
#[derive(Debug, Clone, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
    empty: bool,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: [f32::INFINITY; 3],
            max: [f32::NEG_INFINITY; 3],
            empty: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn expand_with_point(&mut self, point: [f32; 3]) {
        if !point.iter().all(|v| v.is_finite()) {
            return;
        }

        if self.empty {
            self.min = point;
            self.max = point;
            self.empty = false;
            return;
        }

        for (axis, &val) in point.iter().enumerate() {
            self.min[axis] = self.min[axis].min(val);
            self.max[axis] = self.max[axis].max(val);
        }
    }

    pub fn contains(&self, point: &[f32; 3]) -> bool {
        if self.empty || !point.iter().all(|v| v.is_finite()) {
            return false;
        }

        (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }

    /// Midpoint of the box. `None` for an empty box.
    pub fn center(&self) -> Option<[f32; 3]> {
        if self.empty {
            return None;
        }
        Some([
            0.5 * (self.min[0] + self.max[0]),
            0.5 * (self.min[1] + self.max[1]),
            0.5 * (self.min[2] + self.max[2]),
        ])
    }

    /// Edge lengths along x, y and z. All zero for an empty box.
    pub fn dimensions(&self) -> [f32; 3] {
        if self.empty {
            return [0.0; 3];
        }
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn from_xyz(x: &[f32], y: &[f32], z: &[f32]) -> Self {
        let n = x.len().min(y.len()).min(z.len());
        let mut aabb = Self::empty();
        for i in 0..n {
            aabb.expand_with_point([x[i], y[i], z[i]]);
        }
        aabb
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb;

    #[test]
    fn empty_box_has_no_center() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
        assert_eq!(aabb.center(), None);
        assert_eq!(aabb.dimensions(), [0.0; 3]);
    }

    #[test]
    fn single_point_box_is_degenerate() {
        let mut aabb = Aabb::empty();
        aabb.expand_with_point([1.0, 2.0, 3.0]);
        assert_eq!(aabb.min, [1.0, 2.0, 3.0]);
        assert_eq!(aabb.max, [1.0, 2.0, 3.0]);
        assert_eq!(aabb.dimensions(), [0.0; 3]);
        assert_eq!(aabb.center(), Some([1.0, 2.0, 3.0]));
    }

    #[test]
    fn center_and_dimensions() {
        let aabb = Aabb::from_xyz(&[0.0, 4.0], &[-1.0, 1.0], &[2.0, 3.0]);
        assert_eq!(aabb.center(), Some([2.0, 0.0, 2.5]));
        assert_eq!(aabb.dimensions(), [4.0, 2.0, 1.0]);
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let mut aabb = Aabb::empty();
        aabb.expand_with_point([f32::NAN, 0.0, 0.0]);
        assert!(aabb.is_empty());
        aabb.expand_with_point([f32::INFINITY, 0.0, 0.0]);
        assert!(aabb.is_empty());
    }
}
