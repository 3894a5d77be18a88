//! FoundationDB CRD Definitions
//!
//! Cluster resource types read by the pod client.

pub mod foundationdb_cluster;
pub mod version;

pub use foundationdb_cluster::*;
pub use version::*;
