//! LiDAR frame preprocessing and density-based object clustering.
//!
//! This crate re-exports the workspace members:
//!
//! - [`cloud`]: `PointCloud`, `PointXYZ`, `Aabb`
//! - [`spatial`]: radius-query indices (`KdTree`, `LinearIndex`, `NeighborIndex`)
//! - [`filters`]: sensor region-of-interest filter and voxel downsampling
//! - [`segmentation`]: DBSCAN and per-cluster summaries
//! - [`pipeline`]: configured, cancellable per-frame `Detector`

#![forbid(unsafe_code)]

pub use veloclust_core as cloud;
pub use veloclust_filters as filters;
pub use veloclust_pipeline as pipeline;
pub use veloclust_segmentation as segmentation;
pub use veloclust_spatial as spatial;

pub use veloclust_core::{Aabb, PointCloud, PointXYZ};
pub use veloclust_pipeline::{CancelToken, ConfigError, DetectError, Detector, DetectorConfig};
pub use veloclust_segmentation::{ClusterDescriptor, ClusterLabel, Clustering};
