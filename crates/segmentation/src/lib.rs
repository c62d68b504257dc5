#![forbid(unsafe_code)]

pub mod dbscan;
pub mod summary;

pub use dbscan::{
    dbscan, label_from_neighborhoods, neighborhoods, ClusterLabel, Clustering, DbscanParams,
    DbscanParamsError,
};
pub use summary::{summarize_clusters, ClusterDescriptor};
