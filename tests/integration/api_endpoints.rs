//! Integration tests for API endpoints
//!
//! These tests verify that:
//! - The three routes map onto the registry operations
//! - Malformed requests are rejected with 400 before reaching the registry
//! - The snapshot body is JSON with an exact content length

use pretty_assertions::assert_eq;
use reqwest::{StatusCode, header};
use resource_registry::ResourceInfo;
use serde_json::{Value, json};

use crate::helpers::*;

const NODE1_FORM: [(&str, &str); 5] = [
    ("mem", "8G"),
    ("cpu", "10%"),
    ("cpu_name", "x86"),
    ("host", "h1"),
    ("conn", "tcp"),
];

#[tokio::test]
async fn test_add_identity_acknowledges() {
    let (registry, addr) = spawn_test_hub().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/addIdentity"))
        .form(&[("name", "node1")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "200 OK");

    let snapshot = registry.snapshot().await.unwrap();
    assert!(snapshot.contains_key("node1"));
}

#[tokio::test]
async fn test_add_identity_from_query_string() {
    let (registry, addr) = spawn_test_hub().await;

    let response = reqwest::get(format!("http://{addr}/addIdentity?name=node2"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(registry.snapshot().await.unwrap().contains_key("node2"));
}

#[tokio::test]
async fn test_add_identity_without_name_is_bad_request() {
    let (registry, addr) = spawn_test_hub().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/addIdentity"))
        .form(&[("identity", "node1")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: Value = response.json().await.unwrap();
    assert!(json["error"].is_string());

    assert!(registry.snapshot().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_report_then_request_all() {
    let (_registry, addr) = spawn_test_hub().await;
    let client = reqwest::Client::new();

    client
        .post(format!("http://{addr}/addIdentity"))
        .form(&[("name", "node1")])
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("http://{addr}/"))
        .header("Rr-Identity", "node1")
        .form(&NODE1_FORM)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("http://{addr}/requestAll"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let content_length: usize = response.headers()[header::CONTENT_LENGTH]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();

    let body = response.bytes().await.unwrap();
    assert_eq!(content_length, body.len());

    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        json,
        json!({
            "node1": {"mem": "8G", "cpu": "10%", "cpu_name": "x86", "host": "h1", "conn": "tcp"}
        })
    );
}

#[tokio::test]
async fn test_request_all_empty_registry() {
    let (_registry, addr) = spawn_test_hub().await;

    let response = reqwest::get(format!("http://{addr}/requestAll"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "{}");
}

#[tokio::test]
async fn test_report_for_unknown_identity_is_silent() {
    let (registry, addr) = spawn_test_hub().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/"))
        .header("Rr-Identity", "ghost")
        .form(&NODE1_FORM)
        .send()
        .await
        .unwrap();

    // The remote caller is not told; the registry counts the rejection
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!registry.snapshot().await.unwrap().contains_key("ghost"));
    assert_eq!(registry.get_stats().await.unwrap().updates_rejected, 1);
}

#[tokio::test]
async fn test_report_without_identity_header_is_bad_request() {
    let (registry, addr) = spawn_test_hub().await;
    registry.add_identity("node1").await.unwrap();

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/"))
        .form(&NODE1_FORM)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let stats = registry.get_stats().await.unwrap();
    assert_eq!(stats.updates_applied, 0);
    assert_eq!(stats.updates_rejected, 0);
}

#[tokio::test]
async fn test_report_with_missing_field_is_bad_request() {
    let (registry, addr) = spawn_test_hub().await;
    registry.add_identity("node1").await.unwrap();

    let client = reqwest::Client::new();

    for missing in ["mem", "cpu", "cpu_name", "host", "conn"] {
        let form: Vec<_> = NODE1_FORM
            .iter()
            .filter(|(name, _)| *name != missing)
            .collect();

        let response = client
            .post(format!("http://{addr}/"))
            .header("Rr-Identity", "node1")
            .form(&form)
            .send()
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "missing {missing} should be rejected"
        );
    }

    let snapshot = registry.snapshot().await.unwrap();
    assert_eq!(snapshot["node1"], ResourceInfo::default());
}

#[tokio::test]
async fn test_report_on_other_path_is_bad_request() {
    let (registry, addr) = spawn_test_hub().await;
    registry.add_identity("node1").await.unwrap();

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/metrics"))
        .header("Rr-Identity", "node1")
        .form(&NODE1_FORM)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(registry.get_stats().await.unwrap().updates_applied, 0);
}

#[tokio::test]
async fn test_report_without_form_body_is_bad_request() {
    let (registry, addr) = spawn_test_hub().await;
    registry.add_identity("node1").await.unwrap();

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/"))
        .header("Rr-Identity", "node1")
        .body("not a form")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

const NODE1_QUERY: &str = "mem=8G&cpu=10%25&cpu_name=x86&host=h1&conn=tcp";

#[tokio::test]
async fn test_report_fields_from_query_string_on_post() {
    let (registry, addr) = spawn_test_hub().await;
    registry.add_identity("node1").await.unwrap();

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/?{NODE1_QUERY}"))
        .header("Rr-Identity", "node1")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(registry.snapshot().await.unwrap()["node1"], create_node1_info());
}

#[tokio::test]
async fn test_report_fields_split_between_query_and_body() {
    let (registry, addr) = spawn_test_hub().await;
    registry.add_identity("node1").await.unwrap();

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/?mem=8G"))
        .header("Rr-Identity", "node1")
        .form(&NODE1_FORM[1..])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(registry.snapshot().await.unwrap()["node1"], create_node1_info());
}

#[tokio::test]
async fn test_report_body_value_precedes_query_value() {
    let (registry, addr) = spawn_test_hub().await;
    registry.add_identity("node1").await.unwrap();

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/?mem=1G"))
        .header("Rr-Identity", "node1")
        .form(&NODE1_FORM)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(registry.snapshot().await.unwrap()["node1"].mem, "8G");
}

#[tokio::test]
async fn test_report_repeated_key_takes_first_value() {
    let (registry, addr) = spawn_test_hub().await;
    registry.add_identity("node1").await.unwrap();

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/?{NODE1_QUERY}&mem=16G"))
        .header("Rr-Identity", "node1")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(registry.snapshot().await.unwrap()["node1"], create_node1_info());
}

#[tokio::test]
async fn test_add_identity_ignores_non_form_body() {
    let (registry, addr) = spawn_test_hub().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/addIdentity?name=node1"))
        .body("not a form")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(registry.snapshot().await.unwrap().contains_key("node1"));
}

#[tokio::test]
async fn test_add_identity_with_empty_name() {
    let (registry, addr) = spawn_test_hub().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/addIdentity"))
        .form(&[("name", "")])
        .send()
        .await
        .unwrap();

    // only presence of the field is checked
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "200 OK");
    assert!(registry.snapshot().await.unwrap().contains_key(""));
}

#[tokio::test]
async fn test_request_all_content_length_counts_bytes() {
    let (registry, addr) = spawn_test_hub().await;
    registry.add_identity("nœud-1").await.unwrap();
    registry.add_identity("東京").await.unwrap();
    registry
        .update_info("東京", create_tagged_info("ü"))
        .await
        .unwrap();

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/requestAll"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_length: usize = response.headers()[header::CONTENT_LENGTH]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    let body = response.text().await.unwrap();

    assert_eq!(content_length, body.len());
    assert!(body.len() > body.chars().count());

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["東京"]["host"], "host-ü");
    assert_eq!(json["nœud-1"]["mem"], "");

    let response = client
        .head(format!("http://{addr}/requestAll"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_LENGTH],
        content_length.to_string().as_str()
    );
}

#[tokio::test]
async fn test_stopped_registry_is_server_error() {
    let (registry, addr) = spawn_test_hub().await;
    registry.shutdown().await.unwrap();

    let response = reqwest::get(format!("http://{addr}/requestAll"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
