#![forbid(unsafe_code)]

pub mod admission;
pub mod voxel_downsample;

pub use admission::{admission_filter, AdmissionParams};
pub use voxel_downsample::voxel_downsample;
