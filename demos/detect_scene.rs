//! Runs the detector on a synthetic frame and prints what it finds.
//!
//! ```text
//! RUST_LOG=debug cargo run --example detect_scene [config.yaml]
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use veloclust::spatial::KdTree;
use veloclust::{CancelToken, Detector, DetectorConfig, PointCloud};

fn synthetic_frame() -> PointCloud {
    let mut rng = StdRng::seed_from_u64(42);
    let mut cloud = PointCloud::new();

    // Road surface, removed by the height cut.
    for _ in 0..5000 {
        cloud.push([
            rng.gen_range(-30.0..30.0),
            rng.gen_range(-30.0..30.0),
            rng.gen_range(-1.75..-1.65),
        ]);
    }

    // Two parked cars and a pedestrian.
    let objects: [([f32; 3], [f32; 3], usize); 3] = [
        ([9.0, 3.0, -0.8], [2.0, 0.9, 0.7], 600),
        ([14.0, -2.5, -0.8], [2.0, 0.9, 0.7], 400),
        ([6.0, -1.0, -0.6], [0.3, 0.3, 0.9], 120),
    ];
    for (center, half, count) in objects {
        for _ in 0..count {
            cloud.push([
                center[0] + rng.gen_range(-half[0]..half[0]),
                center[1] + rng.gen_range(-half[1]..half[1]),
                center[2] + rng.gen_range(-half[2]..half[2]),
            ]);
        }
    }

    cloud
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => DetectorConfig::from_yaml(path)?,
        None => DetectorConfig::default(),
    };
    let detector = Detector::new(config)?;

    let frame = synthetic_frame();
    let detection = detector.detect_labeled(&frame, &CancelToken::new())?;

    println!(
        "{} input points, {} clustered, {} noise",
        frame.len(),
        detection.cloud.len(),
        detection.clustering.noise_count()
    );
    let tree = KdTree::build(&detection.cloud);
    for c in &detection.clusters {
        let [cx, cy, cz] = c.centroid;
        let [dx, dy, dz] = c.dimensions();
        println!(
            "cluster {:>2}: {:>5} points  centroid ({:6.2}, {:6.2}, {:6.2})  size {:.2} x {:.2} x {:.2}",
            c.id, c.point_count, cx, cy, cz, dx, dy, dz
        );

        // Hollow or L-shaped returns leave the centroid far from any member.
        let (nearest, dist) = tree.knn(&c.centroid, 1);
        let core_hits = tree
            .radius_search(&c.centroid, detector.config().cluster_radius)
            .len();
        if let (Some(&i), Some(&d)) = (nearest.first(), dist.first()) {
            println!(
                "            nearest return #{} at {:.2} m, {} returns within eps",
                i, d, core_hits
            );
        }
    }
    Ok(())
}
