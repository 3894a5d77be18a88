//! Unit tests for the sidecar pod client

#[cfg(test)]
mod tests {
    use crate::config::PodClientConfig;
    use crate::constants::{CLUSTER_FILE, MONITOR_CONF_FILE};
    use crate::error::PodClientError;
    use crate::pod_client_trait::PodClientTrait;
    use crate::sidecar::SidecarClient;
    use crate::test_utils::*;
    use crate::transport::SidecarTransport;
    use std::sync::Arc;
    use std::time::Duration;

    fn client_for(port: u16) -> SidecarClient {
        let config = PodClientConfig {
            sidecar_port: port,
            retry_wait: Duration::from_millis(10),
            ..Default::default()
        };
        let transport = SidecarTransport::new("127.0.0.1", &config, None).unwrap();
        SidecarClient::new(
            Arc::new(create_test_cluster("6.2.20")),
            Arc::new(create_test_pod("sample-storage-1", Some("127.0.0.1"), "node-a")),
            transport,
        )
    }

    #[tokio::test]
    async fn test_update_file_already_converged() {
        let sidecar = FakeSidecar::start().await;
        sidecar.set_file(CLUSTER_FILE, "sample:abc@10.1.2.3:4501");
        let client = client_for(sidecar.addr.port());

        let updated = client
            .update_file(CLUSTER_FILE, "sample:abc@10.1.2.3:4501")
            .await
            .unwrap();

        assert!(updated);
        assert_eq!(sidecar.requests(), vec!["GET check_hash/fdb.cluster"]);
    }

    #[tokio::test]
    async fn test_update_file_copies_and_rechecks_once() {
        let sidecar = FakeSidecar::start().await;
        sidecar.set_file(CLUSTER_FILE, "sample:abc@10.1.2.3:4501");
        sidecar.stage_file(CLUSTER_FILE, "sample:def@10.1.2.3:4501");
        let client = client_for(sidecar.addr.port());

        let updated = client
            .update_file(CLUSTER_FILE, "sample:def@10.1.2.3:4501")
            .await
            .unwrap();

        assert!(updated);
        assert_eq!(
            sidecar.requests(),
            vec![
                "GET check_hash/fdb.cluster",
                "POST copy_files",
                "GET check_hash/fdb.cluster",
            ]
        );
    }

    #[tokio::test]
    async fn test_update_monitor_conf_regenerates_config() {
        let sidecar = FakeSidecar::start().await;
        sidecar.set_file(MONITOR_CONF_FILE, "[fdbmonitor]\n");
        sidecar.stage_file(MONITOR_CONF_FILE, "[fdbmonitor]\nuser = fdb\n");
        let client = client_for(sidecar.addr.port());

        let updated = client
            .update_file(MONITOR_CONF_FILE, "[fdbmonitor]\nuser = fdb\n")
            .await
            .unwrap();

        assert!(updated);
        assert_eq!(
            sidecar.requests(),
            vec![
                "GET check_hash/fdbmonitor.conf",
                "POST copy_monitor_conf",
                "GET check_hash/fdbmonitor.conf",
            ]
        );
    }

    #[tokio::test]
    async fn test_update_file_not_converged_after_remediation() {
        let sidecar = FakeSidecar::start().await;
        sidecar.set_file(CLUSTER_FILE, "sample:abc@10.1.2.3:4501");
        let client = client_for(sidecar.addr.port());

        let updated = client
            .update_file(CLUSTER_FILE, "sample:def@10.1.2.3:4501")
            .await
            .unwrap();

        assert!(!updated);
        assert_eq!(sidecar.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_update_file_copies_file_missing_from_sidecar() {
        let sidecar = FakeSidecar::start().await;
        sidecar.stage_file(CLUSTER_FILE, "sample:abc@10.1.2.3:4501");
        let client = client_for(sidecar.addr.port());

        let updated = client
            .update_file(CLUSTER_FILE, "sample:abc@10.1.2.3:4501")
            .await
            .unwrap();

        assert!(updated);
        assert_eq!(
            sidecar.requests(),
            vec![
                "GET check_hash/fdb.cluster",
                "POST copy_files",
                "GET check_hash/fdb.cluster",
            ]
        );
    }

    #[tokio::test]
    async fn test_update_file_still_missing_after_copy() {
        let sidecar = FakeSidecar::start().await;
        let client = client_for(sidecar.addr.port());

        let updated = client
            .update_file(CLUSTER_FILE, "sample:abc@10.1.2.3:4501")
            .await
            .unwrap();

        assert!(!updated);
        assert_eq!(sidecar.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_update_file_surfaces_transport_errors_without_remediation() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let client = client_for(port);

        let err = client
            .update_file(CLUSTER_FILE, "sample:abc@10.1.2.3:4501")
            .await
            .unwrap_err();

        assert!(matches!(err, PodClientError::Http(_)));
    }

    #[tokio::test]
    async fn test_is_present() {
        let sidecar = FakeSidecar::start().await;
        sidecar.set_file(CLUSTER_FILE, "sample:abc@10.1.2.3:4501");
        let client = client_for(sidecar.addr.port());

        assert!(client.is_present(CLUSTER_FILE).await.unwrap());
    }

    // An absent file and an unreachable sidecar both come back as errors;
    // callers cannot tell "absent" from "unknown".
    #[tokio::test]
    async fn test_is_present_conflates_absent_and_unreachable() {
        let sidecar = FakeSidecar::start().await;
        let client = client_for(sidecar.addr.port());
        let absent = client.is_present("missing.conf").await.unwrap_err();
        assert!(matches!(absent, PodClientError::SidecarStatus { status: 404, .. }));

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let unreachable = client_for(port).is_present(CLUSTER_FILE).await.unwrap_err();
        assert!(matches!(unreachable, PodClientError::Http(_)));
    }

    #[tokio::test]
    async fn test_variable_substitutions_from_sidecar() {
        let sidecar = FakeSidecar::start().await;
        sidecar.set_substitutions(
            r#"{"FDB_PUBLIC_IP":"10.1.2.3","FDB_ZONE_ID":"node-a","FDB_MACHINE_ID":"node-a"}"#,
        );
        let client = client_for(sidecar.addr.port());

        let subs = client.variable_substitutions().await.unwrap();
        assert_eq!(subs.len(), 3);
        assert_eq!(subs["FDB_PUBLIC_IP"], "10.1.2.3");
        assert_eq!(sidecar.requests(), vec!["GET substitutions"]);
    }

    #[tokio::test]
    async fn test_variable_substitutions_malformed_response() {
        let sidecar = FakeSidecar::start().await;
        sidecar.set_substitutions("not json");
        let client = client_for(sidecar.addr.port());

        let err = client.variable_substitutions().await.unwrap_err();
        assert!(matches!(err, PodClientError::Serialization(_)));
    }
}
