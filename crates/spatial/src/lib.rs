#![forbid(unsafe_code)]

pub mod index;
pub mod kdtree;
pub mod linear;

pub use index::{NeighborIndex, LINEAR_SCAN_MAX_POINTS};
pub use kdtree::KdTree;
pub use linear::LinearIndex;
