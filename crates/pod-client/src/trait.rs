//! PodClient trait
//!
//! The contract every sync strategy implements. Callers hold one client per
//! pod per reconciliation pass and re-invoke on the next pass until every
//! operation reports success.

use crate::error::PodClientError;
use crate::models::SubstitutionMap;
use crds::FoundationDBCluster;
use k8s_openapi::api::core::v1::Pod;

/// Trait for syncing configuration files with a FoundationDB pod
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait PodClientTrait: Send + Sync {
    /// Cluster this client is bound to
    fn cluster(&self) -> &FoundationDBCluster;

    /// Pod this client is bound to
    fn pod(&self) -> &Pod;

    /// Check whether a file is present on the pod.
    ///
    /// An `Err` means the file is not known to be present yet; it does not
    /// distinguish an absent file from an unreachable pod.
    async fn is_present(&self, filename: &str) -> Result<bool, PodClientError>;

    /// Check whether a file is up to date and try to update it if not.
    ///
    /// Returns `Ok(false)` when the pod has not converged yet.
    async fn update_file(&self, name: &str, contents: &str) -> Result<bool, PodClientError>;

    /// Keys and values the pod substitutes into its launcher configuration
    async fn variable_substitutions(&self) -> Result<SubstitutionMap, PodClientError>;
}
