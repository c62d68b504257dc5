use crate::HasPosition;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointXYZ {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl PointXYZ {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Distance from the sensor origin projected onto the ground plane.
    pub fn planar_range(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Absolute azimuth relative to the sensor's forward (+x) axis, in radians.
    ///
    /// A point at the origin sits on the forward axis (angle 0), whatever the
    /// signs of its zero coordinates. `atan2(0.0, -0.0)` alone would give π.
    pub fn abs_azimuth(&self) -> f32 {
        if self.x == 0.0 && self.y == 0.0 {
            return 0.0;
        }
        self.y.atan2(self.x).abs()
    }
}

impl HasPosition for PointXYZ {
    fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for PointXYZ {
    fn from(p: [f32; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

impl From<PointXYZ> for [f32; 3] {
    fn from(p: PointXYZ) -> Self {
        [p.x, p.y, p.z]
    }
}
