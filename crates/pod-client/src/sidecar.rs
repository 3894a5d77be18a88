//! Sidecar pod client
//!
//! Syncs files through the sidecar's HTTP API. A file is in sync when the
//! hash the sidecar reports for it equals the hash of the desired contents.

use crate::constants::MONITOR_CONF_FILE;
use crate::error::PodClientError;
use crate::hash::{content_hash, hash_matches};
use crate::models::SubstitutionMap;
use crate::pod_client_trait::PodClientTrait;
use crate::transport::SidecarTransport;
use crds::FoundationDBCluster;
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Remote action that brings a file in line with the config map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Remediation {
    /// Regenerate the monitor conf from its template
    GenerateMonitorConf,
    /// Copy files from the config map volume to the dynamic conf volume
    CopyFiles,
}

impl Remediation {
    fn for_file(name: &str) -> Self {
        if name == MONITOR_CONF_FILE {
            Remediation::GenerateMonitorConf
        } else {
            Remediation::CopyFiles
        }
    }

    fn path(self) -> &'static str {
        match self {
            Remediation::GenerateMonitorConf => "copy_monitor_conf",
            Remediation::CopyFiles => "copy_files",
        }
    }
}

/// Pod client backed by the sidecar API
#[derive(Debug, Clone)]
pub struct SidecarClient {
    cluster: Arc<FoundationDBCluster>,
    pod: Arc<Pod>,
    transport: SidecarTransport,
}

impl SidecarClient {
    /// Create a client for a pod reachable through `transport`
    pub fn new(
        cluster: Arc<FoundationDBCluster>,
        pod: Arc<Pod>,
        transport: SidecarTransport,
    ) -> Self {
        Self {
            cluster,
            pod,
            transport,
        }
    }

    /// Whether requests to the sidecar use TLS
    pub fn use_tls(&self) -> bool {
        self.transport.use_tls()
    }

    /// The underlying HTTP session
    pub fn transport(&self) -> &SidecarTransport {
        &self.transport
    }

    /// Check whether the sidecar's copy of `filename` has the expected contents.
    ///
    /// An error status from the sidecar (404 before the file has been copied)
    /// counts as a mismatch. Only transport failures are returned as errors.
    async fn check_hash(&self, filename: &str, contents: &str) -> Result<bool, PodClientError> {
        let expected = content_hash(contents);
        let reported = match self.transport.get(&format!("check_hash/{filename}")).await {
            Ok(reported) => reported,
            Err(PodClientError::SidecarStatus { status, .. }) => {
                debug!(
                    "Hash check for {}: sidecar answered with status {}",
                    filename, status
                );
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        debug!(
            "Hash check for {}: expected {}, sidecar reported {}",
            filename,
            expected,
            reported.trim()
        );
        Ok(hash_matches(&reported, &expected))
    }

    async fn remediate(&self, remediation: Remediation) -> Result<(), PodClientError> {
        self.transport.post(remediation.path()).await?;
        Ok(())
    }

    /// Compare the sidecar's file with the desired contents; on mismatch,
    /// trigger `remediation` and check once more.
    async fn update_dynamic_file(
        &self,
        filename: &str,
        contents: &str,
        remediation: Remediation,
    ) -> Result<bool, PodClientError> {
        if self.check_hash(filename, contents).await? {
            return Ok(true);
        }

        self.remediate(remediation).await?;

        // Checked immediately; a slow copy on the sidecar shows up as not
        // converged until the next reconciliation pass.
        let matches = self.check_hash(filename, contents).await?;
        if !matches {
            info!(
                namespace = %self.cluster.namespace().unwrap_or_default(),
                cluster = %self.cluster.name_any(),
                pod = %self.pod.name_any(),
                file = filename,
                "Waiting for config update"
            );
        }
        Ok(matches)
    }
}

#[async_trait::async_trait]
impl PodClientTrait for SidecarClient {
    fn cluster(&self) -> &FoundationDBCluster {
        &self.cluster
    }

    fn pod(&self) -> &Pod {
        &self.pod
    }

    async fn is_present(&self, filename: &str) -> Result<bool, PodClientError> {
        match self.transport.get(&format!("check_hash/{filename}")).await {
            Ok(_) => Ok(true),
            Err(e) => {
                info!(
                    namespace = %self.cluster.namespace().unwrap_or_default(),
                    cluster = %self.cluster.name_any(),
                    pod = %self.pod.name_any(),
                    file = filename,
                    "Waiting for file"
                );
                Err(e)
            }
        }
    }

    async fn update_file(&self, name: &str, contents: &str) -> Result<bool, PodClientError> {
        self.update_dynamic_file(name, contents, Remediation::for_file(name))
            .await
    }

    async fn variable_substitutions(&self) -> Result<SubstitutionMap, PodClientError> {
        let body = self.transport.get("substitutions").await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(
                pod = %self.pod.name_any(),
                response_body = %body,
                "Error deserializing pod substitutions: {}", e
            );
            PodClientError::Serialization(e)
        })
    }
}
