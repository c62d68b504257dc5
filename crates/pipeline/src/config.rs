//! Detector configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use veloclust_filters::AdmissionParams;
use veloclust_segmentation::{DbscanParams, DbscanParamsError};

/// Problems found while loading or validating a [`DetectorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("opening angle must be positive and finite, got {0}")]
    InvalidOpeningAngle(f32),

    #[error("range bounds must satisfy 0 <= min_range < max_range, got [{min}, {max}]")]
    InvalidRange { min: f32, max: f32 },

    #[error("min_height must not be NaN")]
    InvalidMinHeight,

    #[error("voxel size must be positive and finite, got {0}")]
    NonPositiveVoxelSize(f32),

    #[error("cluster radius must be positive with a finite, normal square, got {0}")]
    NonPositiveRadius(f32),

    #[error("cluster_min_points must be at least 1")]
    ZeroMinPoints,
}

impl From<DbscanParamsError> for ConfigError {
    fn from(err: DbscanParamsError) -> Self {
        match err {
            DbscanParamsError::InvalidRadius(r) => ConfigError::NonPositiveRadius(r),
            DbscanParamsError::ZeroMinPoints => ConfigError::ZeroMinPoints,
        }
    }
}

/// Process-wide detector settings, fixed once a [`Detector`](crate::Detector)
/// is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Run the field-of-view/range/height admission stage.
    #[serde(default = "default_true")]
    pub enable_admission_filter: bool,

    /// Half-angle of the forward sector, in radians.
    #[serde(default = "default_opening_angle")]
    pub opening_angle: f32,

    #[serde(default = "default_min_range")]
    pub min_range: f32,

    #[serde(default = "default_max_range")]
    pub max_range: f32,

    /// Points at or below this height (sensor frame) are ground returns.
    #[serde(default = "default_min_height")]
    pub min_height: f32,

    #[serde(default)]
    pub enable_voxel_downsample: bool,

    /// Voxel edge length. Validated even while downsampling is disabled.
    #[serde(default = "default_voxel_size")]
    pub voxel_size: f32,

    /// DBSCAN neighbourhood radius.
    #[serde(default = "default_cluster_radius")]
    pub cluster_radius: f32,

    /// DBSCAN core threshold, counting the point itself.
    #[serde(default = "default_cluster_min_points")]
    pub cluster_min_points: usize,
}

fn default_true() -> bool {
    true
}

fn default_opening_angle() -> f32 {
    std::f32::consts::FRAC_PI_4
}

fn default_min_range() -> f32 {
    3.0
}

fn default_max_range() -> f32 {
    20.0
}

fn default_min_height() -> f32 {
    -1.3
}

fn default_voxel_size() -> f32 {
    0.2
}

fn default_cluster_radius() -> f32 {
    0.5
}

fn default_cluster_min_points() -> usize {
    5
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            enable_admission_filter: default_true(),
            opening_angle: default_opening_angle(),
            min_range: default_min_range(),
            max_range: default_max_range(),
            min_height: default_min_height(),
            enable_voxel_downsample: false,
            voxel_size: default_voxel_size(),
            cluster_radius: default_cluster_radius(),
            cluster_min_points: default_cluster_min_points(),
        }
    }
}

impl DetectorConfig {
    /// Load configuration from a YAML file. The result is validated.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text. Missing keys take their defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DetectorConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.opening_angle.is_finite() && self.opening_angle > 0.0) {
            return Err(ConfigError::InvalidOpeningAngle(self.opening_angle));
        }
        let ranges_ok = self.min_range.is_finite()
            && self.max_range.is_finite()
            && self.min_range >= 0.0
            && self.min_range < self.max_range;
        if !ranges_ok {
            return Err(ConfigError::InvalidRange {
                min: self.min_range,
                max: self.max_range,
            });
        }
        if self.min_height.is_nan() {
            return Err(ConfigError::InvalidMinHeight);
        }
        if !(self.voxel_size.is_finite() && self.voxel_size > 0.0) {
            return Err(ConfigError::NonPositiveVoxelSize(self.voxel_size));
        }
        self.dbscan_params().validate()?;
        Ok(())
    }

    pub fn admission_params(&self) -> AdmissionParams {
        AdmissionParams {
            opening_angle: self.opening_angle,
            min_range: self.min_range,
            max_range: self.max_range,
            min_height: self.min_height,
        }
    }

    pub fn dbscan_params(&self) -> DbscanParams {
        DbscanParams {
            radius: self.cluster_radius,
            min_points: self.cluster_min_points,
        }
    }
}
