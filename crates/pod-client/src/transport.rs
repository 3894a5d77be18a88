//! HTTP transport to the sidecar API
//!
//! Wraps a reqwest client bound to one pod address. Transport-level failures
//! are retried a bounded number of times; any response from the sidecar,
//! successful or not, is final.

use crate::config::{PodClientConfig, TlsMaterial};
use crate::error::PodClientError;
use reqwest::{Client, Method};
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

/// HTTP session with one sidecar
#[derive(Debug, Clone)]
pub struct SidecarTransport {
    client: Client,
    base_url: String,
    use_tls: bool,
    retry_max: u32,
    retry_wait: Duration,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl SidecarTransport {
    /// Create a transport for the sidecar listening on `address`.
    ///
    /// Passing TLS material switches the scheme to `https` and presents the
    /// client certificate.
    pub fn new(
        address: &str,
        config: &PodClientConfig,
        tls: Option<TlsMaterial>,
    ) -> Result<Self, PodClientError> {
        let mut builder = Client::builder().use_rustls_tls();
        let use_tls = tls.is_some();

        if let Some(tls) = tls {
            builder = builder
                .identity(tls.identity)
                .danger_accept_invalid_certs(tls.disable_verification);
            for certificate in tls.ca_certificates {
                builder = builder.add_root_certificate(certificate);
            }
        }

        let client = builder.build().map_err(PodClientError::Http)?;
        let scheme = if use_tls { "https" } else { "http" };
        let host = match address.parse::<IpAddr>() {
            Ok(IpAddr::V6(_)) => format!("[{address}]"),
            _ => address.to_string(),
        };

        Ok(Self {
            client,
            base_url: format!("{scheme}://{host}:{}", config.sidecar_port),
            use_tls,
            retry_max: config.retry_max,
            retry_wait: config.retry_wait,
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether requests go over TLS
    pub fn use_tls(&self) -> bool {
        self.use_tls
    }

    /// URL scheme in use
    pub fn scheme(&self) -> &'static str {
        if self.use_tls { "https" } else { "http" }
    }

    /// Build a full URL from a path relative to the sidecar root
    pub fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Make a GET request and return the response body
    pub async fn get(&self, path: &str) -> Result<String, PodClientError> {
        self.request(Method::GET, path, self.read_timeout).await
    }

    /// Make a POST request with an empty body and return the response body.
    ///
    /// POSTs make the sidecar copy files, so they get the longer timeout.
    pub async fn post(&self, path: &str) -> Result<String, PodClientError> {
        self.request(Method::POST, path, self.write_timeout).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        timeout: Duration,
    ) -> Result<String, PodClientError> {
        let url = self.build_url(path);
        let mut attempt = 0;

        let response = loop {
            debug!("{} {} (attempt {})", method, url, attempt + 1);

            let mut request = self.client.request(method.clone(), &url).timeout(timeout);
            if method == Method::POST {
                request = request
                    .header("Content-Type", "application/json")
                    .body("");
            }

            match request.send().await {
                Ok(response) => break response,
                Err(e) if attempt < self.retry_max => {
                    debug!("{} {} failed, retrying: {}", method, url, e);
                    attempt += 1;
                    tokio::time::sleep(self.retry_wait).await;
                }
                Err(e) => return Err(PodClientError::Http(e)),
            }
        };

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PodClientError::SidecarStatus {
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
