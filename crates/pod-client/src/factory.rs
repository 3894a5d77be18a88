//! Pod client factory
//!
//! Chooses the sync strategy for a pod from its spec and assembles the
//! transport for it.

use crate::annotation::AnnotationClient;
use crate::client::PodClient;
use crate::config::PodClientConfig;
use crate::constants::{
    IMAGE_TYPE_ENV, MAIN_CONTAINER_NAME, SIDECAR_CONTAINER_NAME, SIDECAR_TLS_FLAG,
};
use crate::error::PodClientError;
#[cfg(any(test, feature = "test-util"))]
use crate::mock::MockPodClient;
use crate::models::ImageType;
use crate::sidecar::SidecarClient;
use crate::topology;
use crate::transport::SidecarTransport;
use crds::FoundationDBCluster;
use k8s_openapi::api::core::v1::{Container, Pod};
use kube::ResourceExt;
use std::sync::Arc;
use tracing::debug;

fn container<'a>(pod: &'a Pod, name: &str) -> Option<&'a Container> {
    pod.spec
        .as_ref()
        .and_then(|spec| spec.containers.iter().find(|c| c.name == name))
}

/// Image type declared on the main container, split if undeclared
#[must_use]
pub fn image_type(pod: &Pod) -> ImageType {
    container(pod, MAIN_CONTAINER_NAME)
        .and_then(|c| c.env.as_ref())
        .and_then(|env| env.iter().find(|var| var.name == IMAGE_TYPE_ENV))
        .map(|var| ImageType::from_env_value(var.value.as_deref().unwrap_or_default()))
        .unwrap_or_default()
}

/// Whether the sidecar serves its API over TLS
#[must_use]
pub fn pod_has_sidecar_tls(pod: &Pod) -> bool {
    container(pod, SIDECAR_CONTAINER_NAME)
        .and_then(|c| c.args.as_ref())
        .is_some_and(|args| args.iter().any(|arg| arg == SIDECAR_TLS_FLAG))
}

/// Whether the sidecar container is ready.
///
/// A pod without a status for the sidecar is treated as ready.
#[must_use]
pub fn sidecar_ready(pod: &Pod) -> bool {
    pod.status
        .as_ref()
        .and_then(|s| s.container_statuses.as_ref())
        .is_none_or(|statuses| {
            statuses
                .iter()
                .filter(|s| s.name == SIDECAR_CONTAINER_NAME)
                .all(|s| s.ready)
        })
}

fn has_pod_ip(pod: &Pod) -> bool {
    pod.status
        .as_ref()
        .and_then(|s| s.pod_ip.as_deref())
        .is_some_and(|ip| !ip.is_empty())
}

fn pod_path(cluster: &FoundationDBCluster, pod: &Pod) -> String {
    format!(
        "{}/{}/{}",
        cluster.namespace().unwrap_or_default(),
        cluster.name_any(),
        pod.name_any()
    )
}

/// Build a client for working with a FoundationDB pod.
///
/// Unified-image pods get an [`AnnotationClient`] without any readiness
/// checks. Other pods get a [`SidecarClient`], which requires an assigned pod
/// IP, a public IP to reach the sidecar on, and a ready sidecar, plus TLS material when the sidecar runs with `--tls`.
pub fn new_pod_client(
    cluster: Arc<FoundationDBCluster>,
    pod: Arc<Pod>,
    config: &PodClientConfig,
) -> Result<PodClient, PodClientError> {
    if image_type(&pod) == ImageType::Unified {
        debug!("Using annotation client for pod {}", pod.name_any());
        return Ok(AnnotationClient::new(cluster, pod).into());
    }

    if !has_pod_ip(&pod) {
        return Err(PodClientError::AddressPending(pod_path(&cluster, &pod)));
    }

    if !sidecar_ready(&pod) {
        return Err(PodClientError::SidecarNotReady(pod_path(&cluster, &pod)));
    }

    // The sidecar listens on the public IP, which may come from a service.
    let address = topology::public_ips_for_pod(&pod)
        .into_iter()
        .next()
        .ok_or_else(|| PodClientError::AddressPending(pod_path(&cluster, &pod)))?;

    let tls = if pod_has_sidecar_tls(&pod) {
        Some(config.tls.load()?)
    } else {
        None
    };

    let transport = SidecarTransport::new(&address, config, tls)?;
    debug!(
        "Using sidecar client for pod {} at {}",
        pod.name_any(),
        transport.base_url()
    );
    Ok(SidecarClient::new(cluster, pod, transport).into())
}

/// Build a mock client for working with a FoundationDB pod
#[cfg(any(test, feature = "test-util"))]
pub fn new_mock_pod_client(cluster: Arc<FoundationDBCluster>, pod: Arc<Pod>) -> PodClient {
    MockPodClient::new(cluster, pod).into()
}
