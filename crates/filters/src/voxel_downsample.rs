use hashbrown::HashMap;
use veloclust_core::PointCloud;

#[derive(Default, Clone, Copy)]
struct VoxelAccum {
    sx: f64,
    sy: f64,
    sz: f64,
    n: usize,
}

/// Replaces every occupied `voxel_size`-edged cubic cell with the centroid of
/// the points that fell into it.
///
/// Cell keys are `floor(coord / voxel_size)` per axis. Output points appear
/// in the order their cells were first seen in the input, so the result is
/// deterministic for a given frame. Non-finite points are skipped.
///
/// # Panics
///
/// Panics if `voxel_size` is not a positive finite number. Configurations
/// are validated up front, so reaching this is a caller bug.
pub fn voxel_downsample(cloud: &PointCloud, voxel_size: f32) -> PointCloud {
    assert!(
        voxel_size.is_finite() && voxel_size > 0.0,
        "voxel_size must be > 0 and finite"
    );

    if cloud.is_empty() {
        return PointCloud::new();
    }

    let mut slots: HashMap<(i64, i64, i64), usize> = HashMap::new();
    let mut cells: Vec<VoxelAccum> = Vec::new();

    for [px, py, pz] in cloud.iter_points() {
        if !px.is_finite() || !py.is_finite() || !pz.is_finite() {
            continue;
        }

        let key = (
            (px / voxel_size).floor() as i64,
            (py / voxel_size).floor() as i64,
            (pz / voxel_size).floor() as i64,
        );

        let slot = *slots.entry(key).or_insert_with(|| {
            cells.push(VoxelAccum::default());
            cells.len() - 1
        });

        let cell = &mut cells[slot];
        cell.sx += px as f64;
        cell.sy += py as f64;
        cell.sz += pz as f64;
        cell.n += 1;
    }

    let mut out = PointCloud::with_capacity(cells.len());
    for cell in &cells {
        let denom = cell.n as f64;
        out.push([
            (cell.sx / denom) as f32,
            (cell.sy / denom) as f32,
            (cell.sz / denom) as f32,
        ]);
    }
    out
}
