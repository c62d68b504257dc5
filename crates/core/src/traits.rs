/// Anything that can hand the pipeline a sensor-frame position.
///
/// Callers implement this for their own decoded point type so a frame can be
/// turned into a [`PointCloud`](crate::PointCloud) without an intermediate copy.
pub trait HasPosition {
    fn position(&self) -> [f32; 3];
}

impl HasPosition for [f32; 3] {
    fn position(&self) -> [f32; 3] {
        *self
    }
}

impl HasPosition for (f32, f32, f32) {
    fn position(&self) -> [f32; 3] {
        [self.0, self.1, self.2]
    }
}
