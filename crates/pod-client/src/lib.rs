//! FoundationDB Pod Client
//!
//! Keeps the configuration files of a FoundationDB pod in sync with what the
//! operator wants them to be, and reports the substitution variables the
//! pod's processes are launched with.
//!
//! Three strategies sit behind [`PodClientTrait`]:
//!
//! - [`SidecarClient`]: talks to the sidecar container's HTTP API, verifying
//!   files by SHA-256 hash and asking the sidecar to copy them into place.
//! - [`AnnotationClient`]: for the unified image, where the launcher
//!   publishes its environment and running configuration as pod annotations.
//! - `MockPodClient` (behind the `test-util` feature): an in-memory double
//!   that computes substitutions from cluster and pod topology.
//!
//! # Example
//!
//! ```no_run
//! use pod_client::{new_pod_client, PodClientConfig, PodClientTrait};
//! # use std::sync::Arc;
//! # async fn example(
//! #     cluster: Arc<crds::FoundationDBCluster>,
//! #     pod: Arc<k8s_openapi::api::core::v1::Pod>,
//! #     monitor_conf: &str,
//! # ) -> Result<(), pod_client::PodClientError> {
//! let config = PodClientConfig::from_env();
//! let client = new_pod_client(cluster, pod, &config)?;
//!
//! if !client.update_file("fdbmonitor.conf", monitor_conf).await? {
//!     // Not converged yet; try again on the next reconcile
//! }
//! let substitutions = client.variable_substitutions().await?;
//! # let _ = substitutions;
//! # Ok(())
//! # }
//! ```

pub mod annotation;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod factory;
pub mod hash;
pub mod models;
#[path = "trait.rs"]
pub mod pod_client_trait;
pub mod sidecar;
pub mod topology;
pub mod transport;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod sidecar_test;

pub use annotation::AnnotationClient;
pub use client::PodClient;
pub use config::{PodClientConfig, TlsConfig};
pub use error::{ErrorKind, PodClientError};
pub use factory::new_pod_client;
#[cfg(any(test, feature = "test-util"))]
pub use factory::new_mock_pod_client;
pub use models::*;
pub use pod_client_trait::PodClientTrait;
pub use sidecar::SidecarClient;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockPodClient;
