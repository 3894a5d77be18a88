//! Pod client strategies behind one type
//!
//! The factory picks a strategy once per pod; callers hold a [`PodClient`]
//! and never branch on image type themselves.

use crate::annotation::AnnotationClient;
use crate::error::PodClientError;
#[cfg(any(test, feature = "test-util"))]
use crate::mock::MockPodClient;
use crate::models::SubstitutionMap;
use crate::pod_client_trait::PodClientTrait;
use crate::sidecar::SidecarClient;
use crds::FoundationDBCluster;
use k8s_openapi::api::core::v1::Pod;

/// A pod client using one of the sync strategies
#[derive(Debug, Clone)]
pub enum PodClient {
    /// Files synced through the sidecar HTTP API
    Sidecar(SidecarClient),
    /// State read from annotations published by the unified image
    Annotation(AnnotationClient),
    /// In-memory test double
    #[cfg(any(test, feature = "test-util"))]
    Mock(MockPodClient),
}

impl PodClient {
    fn inner(&self) -> &dyn PodClientTrait {
        match self {
            PodClient::Sidecar(client) => client,
            PodClient::Annotation(client) => client,
            #[cfg(any(test, feature = "test-util"))]
            PodClient::Mock(client) => client,
        }
    }
}

impl From<SidecarClient> for PodClient {
    fn from(client: SidecarClient) -> Self {
        PodClient::Sidecar(client)
    }
}

impl From<AnnotationClient> for PodClient {
    fn from(client: AnnotationClient) -> Self {
        PodClient::Annotation(client)
    }
}

#[cfg(any(test, feature = "test-util"))]
impl From<MockPodClient> for PodClient {
    fn from(client: MockPodClient) -> Self {
        PodClient::Mock(client)
    }
}

#[async_trait::async_trait]
impl PodClientTrait for PodClient {
    fn cluster(&self) -> &FoundationDBCluster {
        self.inner().cluster()
    }

    fn pod(&self) -> &Pod {
        self.inner().pod()
    }

    async fn is_present(&self, filename: &str) -> Result<bool, PodClientError> {
        self.inner().is_present(filename).await
    }

    async fn update_file(&self, name: &str, contents: &str) -> Result<bool, PodClientError> {
        self.inner().update_file(name, contents).await
    }

    async fn variable_substitutions(&self) -> Result<SubstitutionMap, PodClientError> {
        self.inner().variable_substitutions().await
    }
}
