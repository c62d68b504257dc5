//! Per-frame object detection: admission filter, optional voxel
//! downsampling, DBSCAN and cluster summaries.

use thiserror::Error;
use veloclust_core::PointCloud;
use veloclust_filters::{admission_filter, voxel_downsample, AdmissionParams};
use veloclust_segmentation::{
    label_from_neighborhoods, neighborhoods, summarize_clusters, ClusterDescriptor, Clustering,
    DbscanParams,
};

use crate::cancel::CancelToken;
use crate::config::{ConfigError, DetectorConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DetectError {
    /// The frame was abandoned; no result exists for it.
    #[error("frame cancelled before {0}")]
    Cancelled(Stage),
}

/// Pipeline stage boundaries at which cancellation is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Admission,
    Downsample,
    DensityScan,
    Labeling,
    Summary,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Admission => "admission filter",
            Stage::Downsample => "voxel downsampling",
            Stage::DensityScan => "density scan",
            Stage::Labeling => "cluster labeling",
            Stage::Summary => "cluster summary",
        };
        f.write_str(name)
    }
}

/// Full output of one frame, for callers that need per-point labels as well
/// as the cluster summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// The cloud that was clustered, after admission and downsampling.
    pub cloud: PointCloud,
    /// Labels indexed like `cloud`.
    pub clustering: Clustering,
    pub clusters: Vec<ClusterDescriptor>,
}

/// Stateless-per-frame object detector holding a validated configuration.
#[derive(Debug, Clone)]
pub struct Detector {
    config: DetectorConfig,
    admission: AdmissionParams,
    dbscan: DbscanParams,
}

impl Detector {
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "detector ready: admission={} voxel={} (size {}), eps={} min_points={}",
            config.enable_admission_filter,
            config.enable_voxel_downsample,
            config.voxel_size,
            config.cluster_radius,
            config.cluster_min_points
        );
        Ok(Self {
            admission: config.admission_params(),
            dbscan: config.dbscan_params(),
            config,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect objects in one frame that nobody else can cancel.
    pub fn detect(&self, frame: &PointCloud) -> Result<Vec<ClusterDescriptor>, DetectError> {
        self.detect_with_cancel(frame, &CancelToken::new())
    }

    /// Detect objects in one frame, giving up between stages once `cancel`
    /// is set. `Ok(vec![])` means nothing was found; `Err` means the frame
    /// was skipped.
    pub fn detect_with_cancel(
        &self,
        frame: &PointCloud,
        cancel: &CancelToken,
    ) -> Result<Vec<ClusterDescriptor>, DetectError> {
        self.detect_labeled(frame, cancel).map(|d| d.clusters)
    }

    /// Like [`detect_with_cancel`](Self::detect_with_cancel) but also returns
    /// the clustered cloud and its per-point labels.
    pub fn detect_labeled(
        &self,
        frame: &PointCloud,
        cancel: &CancelToken,
    ) -> Result<Detection, DetectError> {
        checkpoint(cancel, Stage::Admission)?;
        let admitted = if self.config.enable_admission_filter {
            let out = admission_filter(frame, &self.admission);
            log::debug!("admission: {} -> {} points", frame.len(), out.len());
            out
        } else {
            frame.clone()
        };

        checkpoint(cancel, Stage::Downsample)?;
        let cloud = if self.config.enable_voxel_downsample {
            let out = voxel_downsample(&admitted, self.config.voxel_size);
            log::debug!("voxel downsample: {} -> {} points", admitted.len(), out.len());
            out
        } else {
            admitted
        };

        checkpoint(cancel, Stage::DensityScan)?;
        let neighbors = neighborhoods(&cloud, self.dbscan.radius);

        checkpoint(cancel, Stage::Labeling)?;
        let clustering = label_from_neighborhoods(&neighbors, self.dbscan.min_points);
        drop(neighbors);
        log::debug!(
            "dbscan: {} clusters, {} noise points",
            clustering.num_clusters,
            clustering.noise_count()
        );

        checkpoint(cancel, Stage::Summary)?;
        let clusters = summarize_clusters(&cloud, &clustering);

        Ok(Detection {
            cloud,
            clustering,
            clusters,
        })
    }
}

fn checkpoint(cancel: &CancelToken, next: Stage) -> Result<(), DetectError> {
    if cancel.is_cancelled() {
        log::warn!("frame cancelled before {}", next);
        return Err(DetectError::Cancelled(next));
    }
    Ok(())
}
