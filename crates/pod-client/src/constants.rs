//! Names shared with the sidecar, the launcher and the pod spec

/// Port the sidecar listens on
pub const SIDECAR_PORT: u16 = 8080;

/// Name of the main FoundationDB container
pub const MAIN_CONTAINER_NAME: &str = "foundationdb";

/// Name of the sidecar container
pub const SIDECAR_CONTAINER_NAME: &str = "foundationdb-kubernetes-sidecar";

/// Sidecar argument that enables TLS on its API
pub const SIDECAR_TLS_FLAG: &str = "--tls";

/// Environment variable on the main container declaring its image type
pub const IMAGE_TYPE_ENV: &str = "FDB_IMAGE_TYPE";

/// Launcher (fdbmonitor) configuration file
pub const MONITOR_CONF_FILE: &str = "fdbmonitor.conf";

/// Cluster file
pub const CLUSTER_FILE: &str = "fdb.cluster";

/// Annotation holding the launcher's substitution variables
pub const ENVIRONMENT_ANNOTATION: &str = "foundationdb.org/launcher-environment";

/// Annotation holding the configuration the launcher currently runs with
pub const CURRENT_CONFIGURATION_ANNOTATION: &str = "foundationdb.org/launcher-current-configuration";

/// Annotation that makes the mock client report the pod as unreachable
pub const MOCK_UNREACHABLE_ANNOTATION: &str = "foundationdb.org/mock-unreachable";

/// Annotation selecting where a pod's public IP comes from
pub const PUBLIC_IP_SOURCE_ANNOTATION: &str = "foundationdb.org/public-ip-source";

/// Annotation holding the public IP when it comes from a service
pub const PUBLIC_IP_ANNOTATION: &str = "foundationdb.org/public-ip";

/// Substitution variable names
pub mod substitutions {
    /// Public address of the process
    pub const PUBLIC_IP: &str = "FDB_PUBLIC_IP";
    /// Machine identity
    pub const MACHINE_ID: &str = "FDB_MACHINE_ID";
    /// Zone identity
    pub const ZONE_ID: &str = "FDB_ZONE_ID";
    /// Process group identity
    pub const INSTANCE_ID: &str = "FDB_INSTANCE_ID";
    /// Directory holding the fdbserver binaries
    pub const BINARY_DIR: &str = "BINARY_DIR";
}

/// Environment variables read by [`crate::PodClientConfig::from_env`]
pub mod env {
    /// Client certificate path
    pub const TLS_CERTIFICATE_FILE: &str = "FDB_TLS_CERTIFICATE_FILE";
    /// Client key path
    pub const TLS_KEY_FILE: &str = "FDB_TLS_KEY_FILE";
    /// CA bundle path
    pub const TLS_CA_FILE: &str = "FDB_TLS_CA_FILE";
    /// Set to "1" to skip verifying the sidecar's certificate
    pub const DISABLE_SIDECAR_TLS_CHECK: &str = "DISABLE_SIDECAR_TLS_CHECK";
}
