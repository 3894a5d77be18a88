//! Pod client configuration
//!
//! All process-environment lookups happen in [`PodClientConfig::from_env`];
//! everything downstream takes an explicit config so it can be tested without
//! mutating the environment.

use crate::constants::{env, SIDECAR_PORT};
use crate::error::PodClientError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Client credentials used when the sidecar serves its API over TLS
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    /// PEM client certificate
    pub certificate_file: Option<PathBuf>,
    /// PEM client private key
    pub key_file: Option<PathBuf>,
    /// PEM CA bundle used to verify the sidecar
    pub ca_file: Option<PathBuf>,
    /// Skip verifying the sidecar's certificate. Diagnostic use only.
    pub disable_verification: bool,
}

/// Loaded TLS material, ready to install on an HTTP client
pub struct TlsMaterial {
    /// Client certificate and key
    pub identity: reqwest::Identity,
    /// Trusted roots for the sidecar certificate
    pub ca_certificates: Vec<reqwest::Certificate>,
    /// Whether certificate verification is disabled
    pub disable_verification: bool,
}

impl std::fmt::Debug for TlsMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsMaterial")
            .field("ca_certificates", &self.ca_certificates.len())
            .field("disable_verification", &self.disable_verification)
            .finish_non_exhaustive()
    }
}

impl TlsConfig {
    /// Read TLS settings from `FDB_TLS_CERTIFICATE_FILE`, `FDB_TLS_KEY_FILE`,
    /// `FDB_TLS_CA_FILE` and `DISABLE_SIDECAR_TLS_CHECK`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read TLS settings through `lookup`, which maps a variable name to its
    /// value. Empty values count as unset; verification is only disabled by
    /// `DISABLE_SIDECAR_TLS_CHECK=1`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        };

        Self {
            certificate_file: path(env::TLS_CERTIFICATE_FILE),
            key_file: path(env::TLS_KEY_FILE),
            ca_file: path(env::TLS_CA_FILE),
            disable_verification: lookup(env::DISABLE_SIDECAR_TLS_CHECK).as_deref() == Some("1"),
        }
    }

    /// Load certificate, key and CA bundle. All three must be configured.
    pub fn load(&self) -> Result<TlsMaterial, PodClientError> {
        let (Some(certificate_file), Some(key_file), Some(ca_file)) =
            (&self.certificate_file, &self.key_file, &self.ca_file)
        else {
            return Err(PodClientError::MissingTlsMaterial(format!(
                "{}, {} or {}",
                env::TLS_CERTIFICATE_FILE,
                env::TLS_KEY_FILE,
                env::TLS_CA_FILE
            )));
        };

        debug!(
            "Loading sidecar TLS material: cert={}, key={}, ca={}",
            certificate_file.display(),
            key_file.display(),
            ca_file.display()
        );

        let mut identity_pem = read_pem(certificate_file)?;
        identity_pem.push(b'\n');
        identity_pem.extend(read_pem(key_file)?);
        let identity = reqwest::Identity::from_pem(&identity_pem)
            .map_err(|e| PodClientError::Tls(format!("invalid client certificate or key: {e}")))?;

        let ca_certificates = reqwest::Certificate::from_pem_bundle(&read_pem(ca_file)?)
            .map_err(|e| PodClientError::Tls(format!("invalid CA bundle {}: {e}", ca_file.display())))?;

        Ok(TlsMaterial {
            identity,
            ca_certificates,
            disable_verification: self.disable_verification,
        })
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, PodClientError> {
    std::fs::read(path)
        .map_err(|e| PodClientError::Tls(format!("failed to read {}: {e}", path.display())))
}

/// Settings for building pod clients
#[derive(Debug, Clone)]
pub struct PodClientConfig {
    /// Sidecar TLS credentials
    pub tls: TlsConfig,
    /// Port of the sidecar API
    pub sidecar_port: u16,
    /// Retries after the first attempt on transport failures
    pub retry_max: u32,
    /// Wait between retries
    pub retry_wait: Duration,
    /// Timeout for read requests (hash checks, substitutions)
    pub read_timeout: Duration,
    /// Timeout for requests that make the sidecar copy files
    pub write_timeout: Duration,
}

impl Default for PodClientConfig {
    fn default() -> Self {
        Self {
            tls: TlsConfig::default(),
            sidecar_port: SIDECAR_PORT,
            retry_max: 2,
            retry_wait: Duration::from_secs(1),
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(10),
        }
    }
}

impl PodClientConfig {
    /// Default settings with TLS credentials taken from the environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            tls: TlsConfig::from_env(),
            ..Default::default()
        }
    }
}
