//! Frame-level LiDAR object detection.
//!
//! A [`Detector`] is built once from a validated [`DetectorConfig`] and then
//! fed one frame at a time:
//!
//! ```
//! use veloclust_core::PointCloud;
//! use veloclust_pipeline::{Detector, DetectorConfig};
//!
//! let detector = Detector::new(DetectorConfig::default()).unwrap();
//! let frame = PointCloud::from_xyz(vec![10.0], vec![0.0], vec![0.0]);
//! let clusters = detector.detect(&frame).unwrap();
//! assert!(clusters.is_empty());
//! ```

#![forbid(unsafe_code)]

pub mod cancel;
pub mod config;
pub mod detector;

pub use cancel::CancelToken;
pub use config::{ConfigError, DetectorConfig};
pub use detector::{DetectError, Detection, Detector, Stage};
