#![allow(clippy::unwrap_used)]
// Inventory resolution against a mocked vSphere Automation API.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nsxv_core::{
    CoreError, InventoryKind, InventoryResolver, Moid, TargetSelector, TlsVerification,
    VcenterConfig, VcenterInventory,
};

async fn connect(server: &MockServer) -> VcenterInventory {
    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!("tok-1")))
        .mount(server)
        .await;

    let config = VcenterConfig {
        url: server.uri().parse().unwrap(),
        username: "administrator@vsphere.local".into(),
        password: SecretString::from("pw".to_owned()),
        tls: TlsVerification::DangerAcceptInvalid,
        timeout: Duration::from_secs(5),
    };
    VcenterInventory::connect(&config).await.unwrap()
}

async fn mount_list(server: &MockServer, kind: &str, key: &str, value: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/vcenter/{kind}")))
        .and(query_param(key, value))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn cluster_path_walks_datacenter_and_host_folder() {
    let server = MockServer::start().await;
    let inventory = connect(&server).await;

    mount_list(&server, "datacenter", "names", "DC1", json!([
        { "datacenter": "datacenter-2", "name": "DC1" }
    ]))
    .await;
    Mock::given(method("GET"))
        .and(path("/api/vcenter/folder"))
        .and(query_param("names", "host"))
        .and(query_param("datacenters", "datacenter-2"))
        .and(query_param("type", "HOST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "folder": "group-h4", "name": "host", "type": "HOST" }
        ])))
        .mount(&server)
        .await;
    mount_list(&server, "folder", "parent_folders", "group-h4", json!([])).await;
    mount_list(&server, "cluster", "folders", "group-h4", json!([
        { "cluster": "domain-c7", "name": "Compute" }
    ]))
    .await;
    mount_list(&server, "host", "folders", "group-h4", json!([])).await;

    let moid = InventoryResolver::new(&inventory)
        .resolve_path("DC1/host/Compute", InventoryKind::Cluster)
        .await
        .unwrap();
    assert_eq!(moid, Moid::from("domain-c7"));
}

#[tokio::test]
async fn host_name_lookup_refuses_duplicates() {
    let server = MockServer::start().await;
    let inventory = connect(&server).await;

    mount_list(&server, "host", "names", "esx01", json!([
        { "host": "host-12", "name": "esx01" },
        { "host": "host-30", "name": "esx01" }
    ]))
    .await;

    let err = TargetSelector::Name("esx01".into())
        .resolve(InventoryKind::Host, &inventory)
        .await
        .unwrap_err();
    match err {
        CoreError::Ambiguous { candidates, .. } => {
            assert_eq!(candidates, vec!["host-12", "host-30"]);
        }
        other => panic!("expected Ambiguous, got: {other:?}"),
    }
}

#[tokio::test]
async fn close_logs_out() {
    let server = MockServer::start().await;
    let inventory = connect(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    inventory.close().await.unwrap();
    assert!(!inventory.client().is_logged_in());
}

#[tokio::test]
async fn rejected_login_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let config = VcenterConfig {
        url: server.uri().parse().unwrap(),
        username: "administrator@vsphere.local".into(),
        password: SecretString::from("wrong".to_owned()),
        tls: TlsVerification::DangerAcceptInvalid,
        timeout: Duration::from_secs(5),
    };
    let result = VcenterInventory::connect(&config).await;
    assert!(matches!(result, Err(CoreError::AuthenticationFailed { .. })));
}
