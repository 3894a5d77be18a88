//! Test utilities for pod client unit tests
//!
//! Builders for cluster and pod fixtures plus a fake sidecar HTTP server.

use crate::config::TlsConfig;
use crate::constants::{IMAGE_TYPE_ENV, MAIN_CONTAINER_NAME, SIDECAR_CONTAINER_NAME};
use crate::hash::content_hash;
use crds::{FoundationDBCluster, FoundationDBClusterSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerStatus, EnvVar, Pod, PodIP, PodSpec, PodStatus,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Helper to create a test FoundationDBCluster
pub fn create_test_cluster(version: &str) -> FoundationDBCluster {
    let mut cluster = FoundationDBCluster::new(
        "sample-cluster",
        FoundationDBClusterSpec {
            version: version.to_string(),
            ..Default::default()
        },
    );
    cluster.metadata.namespace = Some("default".to_string());
    cluster
}

/// Helper to create a split-image pod with a ready sidecar
pub fn create_test_pod(name: &str, ip: Option<&str>, node_name: &str) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("default".to_string()),
            ..Default::default()
        },
        spec: Some(PodSpec {
            node_name: Some(node_name.to_string()),
            containers: vec![
                Container {
                    name: MAIN_CONTAINER_NAME.to_string(),
                    ..Default::default()
                },
                Container {
                    name: SIDECAR_CONTAINER_NAME.to_string(),
                    args: Some(vec!["--copy-file".to_string(), "fdb.cluster".to_string()]),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }),
        status: Some(PodStatus {
            pod_ip: ip.map(str::to_string),
            pod_ips: ip.map(|ip| vec![PodIP { ip: ip.to_string() }]),
            container_statuses: Some(vec![ContainerStatus {
                name: SIDECAR_CONTAINER_NAME.to_string(),
                ready: true,
                ..Default::default()
            }]),
            ..Default::default()
        }),
    }
}

/// Helper to set an annotation on a pod
pub fn set_annotation(pod: &mut Pod, key: &str, value: &str) {
    pod.metadata
        .annotations
        .get_or_insert_with(Default::default)
        .insert(key.to_string(), value.to_string());
}

/// Helper to set a label on a pod
pub fn set_label(pod: &mut Pod, key: &str, value: &str) {
    pod.metadata
        .labels
        .get_or_insert_with(Default::default)
        .insert(key.to_string(), value.to_string());
}

/// Helper to declare the image type on the main container
pub fn set_image_type(pod: &mut Pod, image_type: &str) {
    let spec = pod.spec.get_or_insert_with(Default::default);
    if let Some(main) = spec
        .containers
        .iter_mut()
        .find(|c| c.name == MAIN_CONTAINER_NAME)
    {
        main.env.get_or_insert_with(Vec::new).push(EnvVar {
            name: IMAGE_TYPE_ENV.to_string(),
            value: Some(image_type.to_string()),
            ..Default::default()
        });
    }
}

/// Helper to append an argument to the sidecar container
pub fn add_sidecar_arg(pod: &mut Pod, arg: &str) {
    let spec = pod.spec.get_or_insert_with(Default::default);
    if let Some(sidecar) = spec
        .containers
        .iter_mut()
        .find(|c| c.name == SIDECAR_CONTAINER_NAME)
    {
        sidecar.args.get_or_insert_with(Vec::new).push(arg.to_string());
    }
}

/// Helper to set the sidecar's readiness
pub fn set_sidecar_ready(pod: &mut Pod, ready: bool) {
    if let Some(statuses) = pod
        .status
        .as_mut()
        .and_then(|s| s.container_statuses.as_mut())
    {
        for status in statuses.iter_mut().filter(|s| s.name == SIDECAR_CONTAINER_NAME) {
            status.ready = ready;
        }
    }
}

/// Write a self-signed certificate, its key and a CA bundle containing the
/// certificate into `dir`, and return a config pointing at them
pub fn write_test_tls_files(dir: &std::path::Path) -> TlsConfig {
    let rcgen::CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let certificate_file = dir.join("tls.crt");
    let key_file = dir.join("tls.key");
    let ca_file = dir.join("ca.crt");
    std::fs::write(&certificate_file, cert.pem()).unwrap();
    std::fs::write(&key_file, key_pair.serialize_pem()).unwrap();
    std::fs::write(&ca_file, cert.pem()).unwrap();

    TlsConfig {
        certificate_file: Some(certificate_file),
        key_file: Some(key_file),
        ca_file: Some(ca_file),
        disable_verification: false,
    }
}

/// Route client logs to the test harness output
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// State shared between a [`FakeSidecar`] server and the test inspecting it
#[derive(Debug, Default)]
pub struct FakeSidecarState {
    /// Files the sidecar serves hashes for
    pub files: HashMap<String, String>,
    /// Files `copy_files`/`copy_monitor_conf` install, keyed by name
    pub pending: HashMap<String, String>,
    /// Requests received, as "METHOD path"
    pub requests: Vec<String>,
    /// Body returned from `GET /substitutions`
    pub substitutions: String,
}

/// An in-process sidecar API bound to 127.0.0.1 on an ephemeral port
#[derive(Debug, Clone)]
pub struct FakeSidecar {
    /// Address the server listens on
    pub addr: SocketAddr,
    /// Shared state
    pub state: Arc<Mutex<FakeSidecarState>>,
}

impl FakeSidecar {
    /// Start the server in the background
    pub async fn start() -> Self {
        use axum::extract::{Path, State};
        use axum::http::StatusCode;
        use axum::routing::{get, post};
        use axum::Router;

        type Shared = Arc<Mutex<FakeSidecarState>>;

        init_test_tracing();

        async fn check_hash(State(state): State<Shared>, Path(file): Path<String>) -> (StatusCode, String) {
            let mut state = state.lock().unwrap();
            state.requests.push(format!("GET check_hash/{file}"));
            match state.files.get(&file) {
                Some(contents) => (StatusCode::OK, content_hash(contents)),
                None => (StatusCode::NOT_FOUND, format!("{file} not found")),
            }
        }

        fn install(state: &Shared, request: &str) -> StatusCode {
            let mut state = state.lock().unwrap();
            state.requests.push(request.to_string());
            let pending: Vec<(String, String)> = state.pending.drain().collect();
            state.files.extend(pending);
            StatusCode::OK
        }

        async fn copy_files(State(state): State<Shared>) -> StatusCode {
            install(&state, "POST copy_files")
        }

        async fn copy_monitor_conf(State(state): State<Shared>) -> StatusCode {
            install(&state, "POST copy_monitor_conf")
        }

        async fn substitutions(State(state): State<Shared>) -> String {
            let mut state = state.lock().unwrap();
            state.requests.push("GET substitutions".to_string());
            state.substitutions.clone()
        }

        let state: Shared = Arc::default();
        let app = Router::new()
            .route("/check_hash/{file}", get(check_hash))
            .route("/copy_files", post(copy_files))
            .route("/copy_monitor_conf", post(copy_monitor_conf))
            .route("/substitutions", get(substitutions))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Set a file the sidecar currently serves
    pub fn set_file(&self, name: &str, contents: &str) {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(name.to_string(), contents.to_string());
    }

    /// Stage a file that the next copy request installs
    pub fn stage_file(&self, name: &str, contents: &str) {
        self.state
            .lock()
            .unwrap()
            .pending
            .insert(name.to_string(), contents.to_string());
    }

    /// Set the `GET /substitutions` response body
    pub fn set_substitutions(&self, body: &str) {
        self.state.lock().unwrap().substitutions = body.to_string();
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }
}
