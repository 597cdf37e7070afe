//! Catalog tests through the full proxy stack
//!
//! A mock backend broker serves a catalog; the proxy must hand it to each
//! registration with that registration's suffix on every identifier.

use axum::http::{Method, StatusCode};
use osbmux_tests::{Harness, Reply};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn backend_catalog() -> Value {
    json!({
        "services": [
            {
                "id": "mysql-id",
                "name": "mysql",
                "description": "MySQL",
                "bindable": true,
                "plans": [
                    { "id": "small-id", "name": "small", "description": "1GB" },
                    { "id": "large-id", "name": "large", "description": "10GB" }
                ]
            },
            {
                "id": "redis-id",
                "name": "redis",
                "description": "Redis",
                "bindable": true,
                "plans": [
                    { "id": "shared-id", "name": "shared", "description": "Shared VM" }
                ]
            }
        ]
    })
}

async fn harness_with_catalog() -> Harness {
    let harness = Harness::start().await;
    harness.broker.reply(
        Method::GET,
        "/v2/catalog",
        Reply::json(StatusCode::OK, backend_catalog()),
    );
    harness
}

#[tokio::test]
async fn test_catalog_identifiers_are_suffixed() {
    let harness = harness_with_catalog().await;

    let response = harness
        .client()
        .get(harness.url("/acme/v2/catalog"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/json"
    );

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "services": [
                {
                    "id": "mysql-id-acme",
                    "name": "mysql-acme",
                    "description": "MySQL",
                    "bindable": true,
                    "plans": [
                        { "id": "small-id-acme", "name": "small", "description": "1GB" },
                        { "id": "large-id-acme", "name": "large", "description": "10GB" }
                    ]
                },
                {
                    "id": "redis-id-acme",
                    "name": "redis-acme",
                    "description": "Redis",
                    "bindable": true,
                    "plans": [
                        { "id": "shared-id-acme", "name": "shared", "description": "Shared VM" }
                    ]
                }
            ]
        })
    );
}

#[tokio::test]
async fn test_catalog_counts_are_preserved() {
    let harness = harness_with_catalog().await;

    let body: Value = harness
        .client()
        .get(harness.url("/acme/v2/catalog"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let services = body["services"].as_array().unwrap();
    assert_eq!(services.len(), 2);
    let plans: Vec<&Value> = services
        .iter()
        .flat_map(|s| s["plans"].as_array().unwrap())
        .collect();
    assert_eq!(plans.len(), 3);
    assert!(plans
        .iter()
        .all(|p| p["id"].as_str().unwrap().ends_with("-acme")));
}

#[tokio::test]
async fn test_catalog_request_reaches_backend_without_suffix() {
    let harness = harness_with_catalog().await;

    harness
        .client()
        .get(harness.url("/acme/v2/catalog"))
        .header("authorization", "Basic YWRtaW46c2VjcmV0")
        .header("x-broker-api-version", "2.13")
        .send()
        .await
        .unwrap();

    let request = harness.broker.last_request().unwrap();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/v2/catalog");
    assert_eq!(request.headers["authorization"], "Basic YWRtaW46c2VjcmV0");
    assert_eq!(request.headers["x-broker-api-version"], "2.13");
}

#[tokio::test]
async fn test_each_registration_sees_its_own_suffix() {
    let harness = harness_with_catalog().await;
    let client = harness.client();

    let (acme, globex) = tokio::join!(
        client.get(harness.url("/acme/v2/catalog")).send(),
        client.get(harness.url("/globex/v2/catalog")).send(),
    );
    let acme: Value = acme.unwrap().json().await.unwrap();
    let globex: Value = globex.unwrap().json().await.unwrap();

    assert_eq!(acme["services"][0]["name"], "mysql-acme");
    assert_eq!(globex["services"][0]["name"], "mysql-globex");
    assert_eq!(harness.broker.requests().len(), 2);
}

#[tokio::test]
async fn test_catalog_backend_401_is_not_authorized() {
    let harness = Harness::start().await;
    harness.broker.reply(
        Method::GET,
        "/v2/catalog",
        Reply::json(
            StatusCode::UNAUTHORIZED,
            json!({ "error": "Unauthorized", "description": "bad credentials for broker" }),
        ),
    );

    let response = harness
        .client()
        .get(harness.url("/acme/v2/catalog"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "description": "Not authorized" }));
}

#[tokio::test]
async fn test_catalog_malformed_backend_body_is_500() {
    let harness = Harness::start().await;
    harness.broker.reply(
        Method::GET,
        "/v2/catalog",
        Reply::raw(StatusCode::OK, Some("text/html"), b"<html>maintenance</html>"),
    );

    let response = harness
        .client()
        .get(harness.url("/acme/v2/catalog"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert!(body["description"].is_string());
}

#[tokio::test]
async fn test_catalog_other_backend_errors_are_relayed() {
    let harness = Harness::start().await;
    harness.broker.reply(
        Method::GET,
        "/v2/catalog",
        Reply::raw(
            StatusCode::PRECONDITION_FAILED,
            Some("application/json"),
            br#"{"description":"unsupported broker API version"}"#,
        ),
    );

    let response = harness
        .client()
        .get(harness.url("/acme/v2/catalog"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
    assert_eq!(
        response.text().await.unwrap(),
        r#"{"description":"unsupported broker API version"}"#
    );
}

#[tokio::test]
async fn test_catalog_without_suffix_is_404() {
    let harness = harness_with_catalog().await;

    let response = harness
        .client()
        .get(harness.url("/v2/catalog"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.text().await.unwrap(),
        "Please provide a suffix in url"
    );
    assert!(harness.broker.requests().is_empty());
}
