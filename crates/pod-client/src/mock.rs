//! Mock pod client for unit testing
//!
//! Reports every file as present and up to date, and computes substitutions
//! locally from cluster and pod topology. Pods annotated with
//! `foundationdb.org/mock-unreachable` fail substitution lookups the way an
//! unreachable sidecar would.

use crate::constants::MOCK_UNREACHABLE_ANNOTATION;
use crate::error::PodClientError;
use crate::models::SubstitutionMap;
use crate::pod_client_trait::PodClientTrait;
use crate::topology;
use crds::FoundationDBCluster;
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Mock pod client for testing
///
/// Records the contents of every `update_file` call so tests can inspect
/// what a caller pushed.
#[derive(Debug, Clone)]
pub struct MockPodClient {
    cluster: Arc<FoundationDBCluster>,
    pod: Arc<Pod>,
    files: Arc<Mutex<HashMap<String, String>>>,
}

impl MockPodClient {
    /// Create a new mock client
    pub fn new(cluster: Arc<FoundationDBCluster>, pod: Arc<Pod>) -> Self {
        Self {
            cluster,
            pod,
            files: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Contents last passed to `update_file` for `name`
    pub fn file_contents(&self, name: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn is_unreachable(&self) -> bool {
        self.pod.annotations().contains_key(MOCK_UNREACHABLE_ANNOTATION)
    }
}

#[async_trait::async_trait]
impl PodClientTrait for MockPodClient {
    fn cluster(&self) -> &FoundationDBCluster {
        &self.cluster
    }

    fn pod(&self) -> &Pod {
        &self.pod
    }

    async fn is_present(&self, _filename: &str) -> Result<bool, PodClientError> {
        Ok(true)
    }

    async fn update_file(&self, name: &str, contents: &str) -> Result<bool, PodClientError> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), contents.to_string());
        Ok(true)
    }

    async fn variable_substitutions(&self) -> Result<SubstitutionMap, PodClientError> {
        if self.is_unreachable() {
            return Err(PodClientError::Unreachable(self.pod.name_any()));
        }
        topology::variable_substitutions(&self.cluster, &self.pod)
    }
}
