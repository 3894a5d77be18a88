//! Topology resolution
//!
//! Derives a pod's substitution variables (public address, zone, machine,
//! process group and binary directory) from the cluster's fault domain policy
//! and the pod's own metadata. Every call recomputes from the given snapshots.

use crate::constants::{substitutions, PUBLIC_IP_ANNOTATION, PUBLIC_IP_SOURCE_ANNOTATION};
use crate::error::PodClientError;
use crate::models::{PublicIpSource, SubstitutionMap};
use crds::{
    FoundationDBCluster, KUBERNETES_CLUSTER_FAULT_DOMAIN_KEY, NODE_NAME_FAULT_DOMAIN_SOURCE,
    NONE_FAULT_DOMAIN_KEY,
};
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use std::net::IpAddr;

/// Directory binaries are copied into while a cluster is being upgraded
const DYNAMIC_BINARY_DIR: &str = "/var/dynamic-conf/bin";

/// Directory of the binaries shipped with the main container
const DEFAULT_BINARY_DIR: &str = "/usr/bin";

/// Where the pod's public IP comes from
#[must_use]
pub fn public_ip_source(pod: &Pod) -> PublicIpSource {
    match pod.annotations().get(PUBLIC_IP_SOURCE_ANNOTATION).map(String::as_str) {
        Some("service") => PublicIpSource::Service,
        _ => PublicIpSource::Pod,
    }
}

/// Public IPs of a pod, in priority order. Empty while the pod is pending.
#[must_use]
pub fn public_ips_for_pod(pod: &Pod) -> Vec<String> {
    let ips = match public_ip_source(pod) {
        PublicIpSource::Service => pod
            .annotations()
            .get(PUBLIC_IP_ANNOTATION)
            .cloned()
            .into_iter()
            .collect(),
        PublicIpSource::Pod => {
            let status = pod.status.as_ref();
            let pod_ips: Vec<String> = status
                .and_then(|s| s.pod_ips.as_ref())
                .map(|ips| ips.iter().map(|ip| ip.ip.clone()).collect())
                .unwrap_or_default();
            if pod_ips.is_empty() {
                status.and_then(|s| s.pod_ip.clone()).into_iter().collect()
            } else {
                pod_ips
            }
        }
    };

    ips.into_iter().filter(|ip| !ip.is_empty()).collect()
}

/// Render an address for use in FDB addresses: IPv6 is bracketed, IPv4 is bare
pub fn render_public_ip(pod_name: &str, ip: &str) -> Result<String, PodClientError> {
    let parsed: IpAddr = ip.parse().map_err(|_| PodClientError::AddressUnavailable {
        pod: pod_name.to_string(),
        reason: format!("failed to parse IP {ip:?}"),
    })?;

    Ok(match parsed {
        IpAddr::V4(_) => ip.to_string(),
        IpAddr::V6(_) => format!("[{ip}]"),
    })
}

/// Name of the node the pod is scheduled on, or "" if unscheduled
#[must_use]
pub fn node_name(pod: &Pod) -> &str {
    pod.spec
        .as_ref()
        .and_then(|spec| spec.node_name.as_deref())
        .unwrap_or_default()
}

/// Process group ID from the first configured label present on the pod
#[must_use]
pub fn process_group_id(cluster: &FoundationDBCluster, pod: &Pod) -> String {
    let labels = pod.labels();
    cluster
        .process_group_id_labels()
        .into_iter()
        .find_map(|label| labels.get(label).cloned())
        .unwrap_or_default()
}

/// Compute the substitution variables for a pod from cluster and pod topology.
///
/// Fails without returning a partial map if the pod has no parseable address,
/// the fault domain source is unsupported, or the cluster version is invalid.
pub fn variable_substitutions(
    cluster: &FoundationDBCluster,
    pod: &Pod,
) -> Result<SubstitutionMap, PodClientError> {
    let pod_name = pod.name_any();
    let mut result = SubstitutionMap::new();

    let ip = public_ips_for_pod(pod)
        .into_iter()
        .next()
        .ok_or_else(|| PodClientError::AddressUnavailable {
            pod: pod_name.clone(),
            reason: "no IP assigned".to_string(),
        })?;
    result.insert(
        substitutions::PUBLIC_IP.to_string(),
        render_public_ip(&pod_name, &ip)?,
    );

    let fault_domain = &cluster.spec.fault_domain;
    let (machine_id, zone_id) = match fault_domain.key.as_str() {
        NONE_FAULT_DOMAIN_KEY => (pod_name.clone(), pod_name.clone()),
        KUBERNETES_CLUSTER_FAULT_DOMAIN_KEY => {
            (node_name(pod).to_string(), fault_domain.value.clone())
        }
        _ => {
            let source = if fault_domain.value_from.is_empty() {
                NODE_NAME_FAULT_DOMAIN_SOURCE
            } else {
                fault_domain.value_from.as_str()
            };
            if source != NODE_NAME_FAULT_DOMAIN_SOURCE {
                return Err(PodClientError::UnsupportedFaultDomainSource(source.to_string()));
            }
            let node = node_name(pod).to_string();
            (node.clone(), node)
        }
    };
    result.insert(substitutions::MACHINE_ID.to_string(), machine_id);
    result.insert(substitutions::ZONE_ID.to_string(), zone_id);

    result.insert(
        substitutions::INSTANCE_ID.to_string(),
        process_group_id(cluster, pod),
    );

    let version = cluster.desired_version()?;
    if version.supports_using_binaries_from_main_container() {
        let binary_dir = if cluster.is_being_upgraded() {
            format!("{DYNAMIC_BINARY_DIR}/{version}")
        } else {
            DEFAULT_BINARY_DIR.to_string()
        };
        result.insert(substitutions::BINARY_DIR.to_string(), binary_dir);
    }

    Ok(result)
}
