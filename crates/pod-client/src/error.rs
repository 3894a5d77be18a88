//! Pod client errors

use thiserror::Error;

/// Errors that can occur when syncing configuration with a pod
#[derive(Debug, Error)]
pub enum PodClientError {
    /// HTTP request to the sidecar failed after retries
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The sidecar answered with a non-success status
    #[error("Sidecar returned {status} for {path}: {body}")]
    SidecarStatus {
        /// Request path
        path: String,
        /// Response status code
        status: u16,
        /// Response body
        body: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The pod has not been assigned an IP yet
    #[error("Waiting for pod {0} to be assigned an IP")]
    AddressPending(String),

    /// The sidecar container is not ready
    #[error("Waiting for pod {0} to be ready")]
    SidecarNotReady(String),

    /// The pod has no usable public address
    #[error("Pod {pod} has no usable public IP: {reason}")]
    AddressUnavailable {
        /// Pod name
        pod: String,
        /// Why the address could not be used
        reason: String,
    },

    /// The pod is missing an annotation the launcher has not published yet
    #[error("Pod {pod} does not have required annotation {annotation}")]
    MissingAnnotation {
        /// Pod name
        pod: String,
        /// Annotation key
        annotation: String,
    },

    /// The desired process configuration could not be parsed
    #[error("Error parsing desired process configuration: {0}")]
    MalformedDesiredConfig(#[source] serde_json::Error),

    /// The applied process configuration could not be parsed
    #[error("Error parsing current process configuration: {0}")]
    MalformedAppliedConfig(#[source] serde_json::Error),

    /// The cluster version string could not be parsed
    #[error("Invalid version: {0}")]
    InvalidVersion(#[from] crds::VersionParseError),

    /// The fault domain names a source other than `spec.nodeName`
    #[error("Unsupported fault domain source {0}")]
    UnsupportedFaultDomainSource(String),

    /// The strategy does not manage the requested file
    #[error("Unknown file {0}")]
    UnknownFile(String),

    /// TLS is enabled for the sidecar but credential paths are not configured
    #[error("Missing one or more TLS env vars: {0}")]
    MissingTlsMaterial(String),

    /// TLS credentials could not be read or parsed
    #[error("TLS error: {0}")]
    Tls(String),

    /// The pod is marked unreachable (mock only)
    #[error("Pod {0} is not reachable")]
    Unreachable(String),
}

/// Coarse classification of [`PodClientError`] for callers deciding whether to poll again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Remote state is not ready yet; the next reconciliation pass may succeed
    Pending,
    /// Input data is malformed; retrying will not help until it changes
    MalformedInput,
    /// Network or TLS failure; already retried a bounded number of times
    Transport,
    /// Configuration the client cannot handle
    Unsupported,
}

impl ErrorKind {
    /// Whether calling again on a later pass can succeed without input changes
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Pending | ErrorKind::Transport)
    }
}

impl PodClientError {
    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            PodClientError::AddressPending(_)
            | PodClientError::SidecarNotReady(_)
            | PodClientError::MissingAnnotation { .. } => ErrorKind::Pending,
            PodClientError::Http(_)
            | PodClientError::SidecarStatus { .. }
            | PodClientError::Unreachable(_) => ErrorKind::Transport,
            PodClientError::Serialization(_)
            | PodClientError::AddressUnavailable { .. }
            | PodClientError::MalformedDesiredConfig(_)
            | PodClientError::MalformedAppliedConfig(_)
            | PodClientError::InvalidVersion(_) => ErrorKind::MalformedInput,
            PodClientError::UnsupportedFaultDomainSource(_)
            | PodClientError::UnknownFile(_)
            | PodClientError::MissingTlsMaterial(_)
            | PodClientError::Tls(_) => ErrorKind::Unsupported,
        }
    }

    /// Shorthand for `self.kind().is_retryable()`
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}
