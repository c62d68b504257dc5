//! End-to-end tests of the per-frame detector on synthetic LiDAR frames.

use std::f32::consts::FRAC_PI_4;
use std::sync::Arc;

use rand::prelude::*;
use veloclust::filters::{admission_filter, AdmissionParams};
use veloclust::pipeline::Stage;
use veloclust::spatial::KdTree;
use veloclust::{CancelToken, DetectError, Detector, DetectorConfig, PointCloud};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ────────────────── Scene builder ──────────────────

/// Object centres of the synthetic street scene, all inside the default
/// forward sector and above the ground cut.
const OBJECTS: [[f32; 3]; 3] = [[8.0, 2.0, -0.5], [12.0, -3.0, -0.3], [15.0, 1.0, 0.0]];

const POINTS_PER_OBJECT: usize = 300;

/// A frame resembling one sweep of a roof-mounted scanner: a ground plane
/// below the height cut, three boxy objects ahead, one object behind the
/// vehicle and sparse clutter.
fn street_scene(seed: u64) -> PointCloud {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cloud = PointCloud::new();

    for _ in 0..2000 {
        cloud.push([
            rng.gen_range(-25.0..25.0),
            rng.gen_range(-25.0..25.0),
            rng.gen_range(-1.75..-1.65),
        ]);
    }

    for c in OBJECTS {
        for _ in 0..POINTS_PER_OBJECT {
            cloud.push([
                c[0] + rng.gen_range(-0.8..0.8),
                c[1] + rng.gen_range(-0.8..0.8),
                c[2] + rng.gen_range(-0.5..0.5),
            ]);
        }
    }

    for _ in 0..POINTS_PER_OBJECT {
        cloud.push([
            -10.0 + rng.gen_range(-0.8..0.8),
            rng.gen_range(-0.8..0.8),
            rng.gen_range(-0.5..0.5),
        ]);
    }

    for _ in 0..40 {
        cloud.push([
            rng.gen_range(4.0..19.0),
            rng.gen_range(-4.0..4.0),
            rng.gen_range(1.5..3.0),
        ]);
    }

    cloud
}

fn nearest_object(centroid: [f32; 3]) -> (usize, f32) {
    OBJECTS
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let d = ((centroid[0] - c[0]).powi(2)
                + (centroid[1] - c[1]).powi(2)
                + (centroid[2] - c[2]).powi(2))
            .sqrt();
            (i, d)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap()
}

// ────────────────── Concrete scenarios ──────────────────

#[test]
fn grid_with_far_outlier() {
    init_logger();
    let config = DetectorConfig {
        enable_admission_filter: false,
        cluster_radius: 1.5,
        cluster_min_points: 3,
        ..DetectorConfig::default()
    };
    let detector = Detector::new(config).unwrap();
    let frame = PointCloud::from_xyz(
        vec![0.0, 1.0, 0.0, 1.0, 100.0],
        vec![0.0, 0.0, 1.0, 1.0, 0.0],
        vec![0.0; 5],
    );

    let detection = detector
        .detect_labeled(&frame, &CancelToken::new())
        .unwrap();

    assert_eq!(detection.clustering.noise_count(), 1);
    assert!(detection.clustering.labels[4].is_noise());
    assert_eq!(detection.clusters.len(), 1);
    let c = &detection.clusters[0];
    assert_eq!(c.id, 0);
    assert_eq!(c.point_count, 4);
    assert_eq!(c.centroid, [0.5, 0.5, 0.0]);
    assert_eq!(c.bounds.min, [0.0, 0.0, 0.0]);
    assert_eq!(c.bounds.max, [1.0, 1.0, 0.0]);
}

#[test]
fn origin_is_rejected_by_admission() {
    let params = AdmissionParams {
        opening_angle: FRAC_PI_4,
        min_range: 3.0,
        max_range: 20.0,
        min_height: -1.3,
    };
    assert!(!params.admits([0.0, 0.0, 0.0]));

    let frame = PointCloud::from_xyz(vec![0.0], vec![0.0], vec![0.0]);
    assert!(admission_filter(&frame, &params).is_empty());

    // Same result through the detector: nothing survives, nothing is found.
    let detector = Detector::new(DetectorConfig::default()).unwrap();
    assert_eq!(detector.detect(&frame), Ok(Vec::new()));
}

#[test]
fn single_point_clusters_leave_no_noise() {
    let config = DetectorConfig {
        enable_admission_filter: false,
        cluster_radius: 0.5,
        cluster_min_points: 1,
        ..DetectorConfig::default()
    };
    let detector = Detector::new(config).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let frame: PointCloud = (0..500)
        .map(|_| {
            [
                rng.gen_range(-20.0f32..20.0),
                rng.gen_range(-20.0f32..20.0),
                rng.gen_range(-2.0f32..2.0),
            ]
        })
        .collect();

    let detection = detector
        .detect_labeled(&frame, &CancelToken::new())
        .unwrap();
    assert_eq!(detection.clustering.noise_count(), 0);
    let total: usize = detection.clusters.iter().map(|c| c.point_count).sum();
    assert_eq!(total, frame.len());
}

// ────────────────── Street scene ──────────────────

#[test]
fn street_scene_finds_the_objects_ahead() {
    init_logger();
    let frame = street_scene(2024);
    let detector = Detector::new(DetectorConfig::default()).unwrap();
    let clusters = detector.detect(&frame).unwrap();

    assert_eq!(clusters.len(), OBJECTS.len(), "clusters: {:?}", clusters);

    let mut matched = [false; 3];
    for c in &clusters {
        let (obj, dist) = nearest_object(c.centroid);
        assert!(dist < 0.3, "cluster {} is {:.2} m from object {}", c.id, dist, obj);
        assert!(!matched[obj], "object {} detected twice", obj);
        matched[obj] = true;

        // Clutter is far above the objects, so nothing else joins them.
        assert_eq!(c.point_count, POINTS_PER_OBJECT);
        let dims = c.dimensions();
        assert!(dims[0] <= 1.601 && dims[1] <= 1.601 && dims[2] <= 1.001);
    }
}

#[test]
fn street_scene_survives_downsampling() {
    let frame = street_scene(7);
    let config = DetectorConfig {
        enable_voxel_downsample: true,
        voxel_size: 0.2,
        cluster_radius: 0.5,
        cluster_min_points: 3,
        ..DetectorConfig::default()
    };
    let detector = Detector::new(config).unwrap();
    let detection = detector
        .detect_labeled(&frame, &CancelToken::new())
        .unwrap();

    assert_eq!(detection.clusters.len(), OBJECTS.len());
    for c in &detection.clusters {
        let (_, dist) = nearest_object(c.centroid);
        assert!(dist < 0.3);
        assert!(c.point_count < POINTS_PER_OBJECT);
    }
    let clustered: usize = detection.clusters.iter().map(|c| c.point_count).sum();
    assert!(clustered <= detection.cloud.len());
}

#[test]
fn returns_near_each_centroid_belong_to_its_cluster() {
    let frame = street_scene(31);
    let detector = Detector::new(DetectorConfig::default()).unwrap();
    let detection = detector
        .detect_labeled(&frame, &CancelToken::new())
        .unwrap();
    let tree = KdTree::build(&detection.cloud);

    for c in &detection.clusters {
        let (nearest, dist) = tree.knn(&c.centroid, 5);
        assert_eq!(nearest.len(), 5);
        assert!(dist.windows(2).all(|w| w[0] <= w[1]));
        for i in nearest {
            assert_eq!(detection.clustering.labels[i].cluster_id(), Some(c.id));
        }

        let within = tree.radius_search(&c.centroid, 0.5);
        assert!(!within.is_empty());
        assert!(within.windows(2).all(|w| w[0] < w[1]));
        for i in within {
            assert_eq!(detection.clustering.labels[i].cluster_id(), Some(c.id));
        }
    }
}

#[test]
fn cluster_ids_are_dense_and_ordered() {
    let frame = street_scene(11);
    let detector = Detector::new(DetectorConfig::default()).unwrap();
    let clusters = detector.detect(&frame).unwrap();
    for (i, c) in clusters.iter().enumerate() {
        assert_eq!(c.id as usize, i);
    }
}

// ────────────────── Determinism ──────────────────

#[test]
fn identical_frames_give_identical_output() {
    let frame = street_scene(99);
    let detector = Detector::new(DetectorConfig::default()).unwrap();
    let first = detector.detect(&frame).unwrap();
    for _ in 0..10 {
        assert_eq!(detector.detect(&frame).unwrap(), first);
    }

    // A second detector built from the same configuration agrees too.
    let other = Detector::new(DetectorConfig::default()).unwrap();
    assert_eq!(other.detect(&frame).unwrap(), first);
}

#[test]
fn detector_is_shared_across_threads() {
    let detector = Arc::new(Detector::new(DetectorConfig::default()).unwrap());
    let frame = Arc::new(street_scene(5));
    let expected = detector.detect(&frame).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let detector = Arc::clone(&detector);
            let frame = Arc::clone(&frame);
            std::thread::spawn(move || detector.detect(&frame).unwrap())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

// ────────────────── Cancellation ──────────────────

#[test]
fn cancelled_frame_reports_no_result() {
    init_logger();
    let detector = Detector::new(DetectorConfig::default()).unwrap();
    let frame = street_scene(1);
    let token = CancelToken::new();

    let remote = token.clone();
    std::thread::spawn(move || remote.cancel()).join().unwrap();

    let err = detector.detect_with_cancel(&frame, &token).unwrap_err();
    assert_eq!(err, DetectError::Cancelled(Stage::Admission));

    token.reset();
    let clusters = detector.detect_with_cancel(&frame, &token).unwrap();
    assert_eq!(clusters.len(), OBJECTS.len());
}

#[test]
fn empty_result_is_not_a_cancellation() {
    let detector = Detector::new(DetectorConfig::default()).unwrap();
    // Everything is behind the sensor.
    let frame = PointCloud::from_xyz(vec![-5.0, -5.1, -5.2], vec![0.0; 3], vec![0.0; 3]);
    assert_eq!(
        detector.detect_with_cancel(&frame, &CancelToken::new()),
        Ok(Vec::new())
    );
}
