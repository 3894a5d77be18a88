//! Annotation pod client
//!
//! Used with the unified image, where the launcher inside the main container
//! publishes its environment and running configuration as pod annotations.
//! Nothing is sent over the network; convergence is read off the pod snapshot.

use crate::constants::{
    CLUSTER_FILE, CURRENT_CONFIGURATION_ANNOTATION, ENVIRONMENT_ANNOTATION, MONITOR_CONF_FILE,
};
use crate::error::PodClientError;
use crate::models::{ProcessConfiguration, SubstitutionMap};
use crate::pod_client_trait::PodClientTrait;
use crds::FoundationDBCluster;
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use std::sync::Arc;
use tracing::{error, info};

/// Pod client backed by pod annotations
#[derive(Debug, Clone)]
pub struct AnnotationClient {
    cluster: Arc<FoundationDBCluster>,
    pod: Arc<Pod>,
}

impl AnnotationClient {
    /// Create a client for a unified-image pod
    pub fn new(cluster: Arc<FoundationDBCluster>, pod: Arc<Pod>) -> Self {
        Self { cluster, pod }
    }

    fn annotation(&self, key: &str) -> Result<&str, PodClientError> {
        match self.pod.annotations().get(key) {
            Some(value) => Ok(value.as_str()),
            None => {
                info!(
                    namespace = %self.cluster.namespace().unwrap_or_default(),
                    cluster = %self.cluster.name_any(),
                    pod = %self.pod.name_any(),
                    annotation = key,
                    "Waiting for Kubernetes monitor to update annotations"
                );
                Err(PodClientError::MissingAnnotation {
                    pod: self.pod.name_any(),
                    annotation: key.to_string(),
                })
            }
        }
    }

    /// Compare the desired launcher configuration with the one the launcher reports
    fn monitor_conf_matches(&self, contents: &str) -> Result<bool, PodClientError> {
        let desired: ProcessConfiguration = serde_json::from_str(contents).map_err(|e| {
            error!("Error parsing desired process configuration: {} (input: {})", e, contents);
            PodClientError::MalformedDesiredConfig(e)
        })?;

        let current_data = self.annotation(CURRENT_CONFIGURATION_ANNOTATION)?;
        let current: ProcessConfiguration = serde_json::from_str(current_data).map_err(|e| {
            error!(
                "Error parsing current process configuration: {} (input: {})",
                e, current_data
            );
            PodClientError::MalformedAppliedConfig(e)
        })?;

        let matches = current == desired;
        if !matches {
            info!(
                namespace = %self.cluster.namespace().unwrap_or_default(),
                cluster = %self.cluster.name_any(),
                pod = %self.pod.name_any(),
                desired = ?desired,
                current = ?current,
                "Waiting for Kubernetes monitor config update"
            );
        }
        Ok(matches)
    }
}

#[async_trait::async_trait]
impl PodClientTrait for AnnotationClient {
    fn cluster(&self) -> &FoundationDBCluster {
        &self.cluster
    }

    fn pod(&self) -> &Pod {
        &self.pod
    }

    /// Always true: the launcher materializes files itself.
    async fn is_present(&self, _filename: &str) -> Result<bool, PodClientError> {
        Ok(true)
    }

    async fn update_file(&self, name: &str, contents: &str) -> Result<bool, PodClientError> {
        match name {
            // The launcher manages the cluster file on its own.
            CLUSTER_FILE => Ok(true),
            MONITOR_CONF_FILE => self.monitor_conf_matches(contents),
            _ => Err(PodClientError::UnknownFile(name.to_string())),
        }
    }

    async fn variable_substitutions(&self) -> Result<SubstitutionMap, PodClientError> {
        let environment = self.annotation(ENVIRONMENT_ANNOTATION)?;
        Ok(serde_json::from_str(environment)?)
    }
}
