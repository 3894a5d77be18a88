//! FoundationDBCluster CRD
//!
//! The subset of the cluster resource that pod clients read: fault domain
//! policy, declared version and the version currently running.

use crate::version::{FdbVersion, VersionParseError};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fault domain key that gives every pod its own zone
pub const NONE_FAULT_DOMAIN_KEY: &str = "foundationdb.org/none";

/// Fault domain key that places the whole Kubernetes cluster in one zone
pub const KUBERNETES_CLUSTER_FAULT_DOMAIN_KEY: &str = "foundationdb.org/kubernetes-cluster";

/// The only supported custom fault domain source
pub const NODE_NAME_FAULT_DOMAIN_SOURCE: &str = "spec.nodeName";

/// Label holding a pod's process group ID when none are configured
pub const DEFAULT_PROCESS_GROUP_ID_LABEL: &str = "foundationdb.org/fdb-process-group-id";

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "apps.foundationdb.org",
    version = "v1beta1",
    kind = "FoundationDBCluster",
    namespaced,
    status = "FoundationDBClusterStatus",
    shortname = "fdb"
)]
#[serde(rename_all = "camelCase")]
pub struct FoundationDBClusterSpec {
    /// Version of FoundationDB the cluster should run (e.g. "6.2.20")
    pub version: String,

    /// How zone and machine identity are assigned to processes
    #[serde(default)]
    pub fault_domain: FoundationDBClusterFaultDomain,

    /// Pod labels to read the process group ID from, in priority order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub process_group_id_labels: Vec<String>,
}

/// Fault domain policy
///
/// `key` selects the strategy. For custom keys, `value_from` names the pod
/// field the zone is read from.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FoundationDBClusterFaultDomain {
    /// Fault domain key (e.g. "kubernetes.io/hostname")
    #[serde(default)]
    pub key: String,

    /// Fixed zone value, used with the kubernetes-cluster key
    #[serde(default)]
    pub value: String,

    /// Source for the zone value of custom keys
    #[serde(default)]
    pub value_from: String,
}

/// Observed state of a FoundationDBCluster
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct FoundationDBClusterStatus {
    /// Version currently running on the cluster's processes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running_version: Option<String>,
}

impl FoundationDBCluster {
    /// Parse the declared version
    pub fn desired_version(&self) -> Result<FdbVersion, VersionParseError> {
        FdbVersion::parse(&self.spec.version)
    }

    /// Whether processes are still running a version other than the declared one
    #[must_use]
    pub fn is_being_upgraded(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|status| status.running_version.as_deref())
            .is_some_and(|running| !running.is_empty() && running != self.spec.version)
    }

    /// Labels to read a pod's process group ID from
    #[must_use]
    pub fn process_group_id_labels(&self) -> Vec<&str> {
        if self.spec.process_group_id_labels.is_empty() {
            vec![DEFAULT_PROCESS_GROUP_ID_LABEL]
        } else {
            self.spec
                .process_group_id_labels
                .iter()
                .map(String::as_str)
                .collect()
        }
    }
}
