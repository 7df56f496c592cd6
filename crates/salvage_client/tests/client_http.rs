use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;
use salvage_client::{AnalysisClient, ClientConfig, ClientError};
use salvage_core::core_api::AnalysisRequest;
use salvage_core::{ReprocessingEfficiency, SalvageItem};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn response_fixture() -> serde_json::Value {
    let path = workspace_root().join("tests/fixtures/analysis_response.json");
    let raw = std::fs::read_to_string(&path).expect("fixture should be readable");
    serde_json::from_str(&raw).expect("fixture should parse")
}

fn client_for(server: &MockServer) -> AnalysisClient {
    let config = ClientConfig::new(server.uri()).with_timeout(Duration::from_secs(5));
    AnalysisClient::new(config).expect("client should build")
}

fn sample_request() -> AnalysisRequest {
    AnalysisRequest {
        salvage_items: vec![
            SalvageItem::new("Armor Plates", 45).expect("valid"),
            SalvageItem::new("Tripped Power Circuit", 120).expect("valid"),
        ],
        reprocessing_efficiency: ReprocessingEfficiency::new(0.6).expect("valid"),
    }
}

#[tokio::test]
async fn analyze_posts_request_and_decodes_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/salvage/analyze"))
        .and(body_json(json!({
            "salvage_items": [
                {"name": "Armor Plates", "quantity": 45},
                {"name": "Tripped Power Circuit", "quantity": 120},
            ],
            "reprocessing_efficiency": 0.6,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_fixture()))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .analyze(&sample_request())
        .await
        .expect("analysis should succeed");

    assert_eq!(response.materials.len(), 2);
    assert_eq!(response.materials[0].name, "Tritanium");
    assert_eq!(response.materials[1].unit_price, None);
    assert_eq!(response.buildable_items.len(), 2);
    assert_eq!(response.reprocessing_efficiency_used, 0.6);
    assert_eq!(response.unknown_items[0].name, "Light Neutron Blaster I");
}

#[tokio::test]
async fn service_error_payload_becomes_user_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/salvage/analyze"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": "Reprocessing efficiency out of range"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .analyze(&sample_request())
        .await
        .expect_err("service rejected the request");

    assert!(matches!(err, ClientError::Service { status: 400, .. }));
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message(), "Reprocessing efficiency out of range");
}

#[tokio::test]
async fn message_field_wins_over_error_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/salvage/analyze"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Market data unavailable",
            "error": "Database error",
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .analyze(&sample_request())
        .await
        .expect_err("service failed");
    assert_eq!(err.user_message(), "Market data unavailable");
}

#[tokio::test]
async fn error_without_payload_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/salvage/analyze"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .analyze(&sample_request())
        .await
        .expect_err("gateway failed");

    assert!(matches!(
        err,
        ClientError::Service {
            status: 502,
            message: None
        }
    ));
    assert_eq!(err.user_message(), "Request failed with status code 502");
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/salvage/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"materials": "nope"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .analyze(&sample_request())
        .await
        .expect_err("body does not match the contract");

    assert!(matches!(err, ClientError::Decode { what: "analysis", .. }));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn update_market_prices_sends_type_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/market/update"))
        .and(body_json(json!({"type_ids": [34, 11399]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updated_count": 2,
            "prices": [
                {"type_id": 34, "sell_price": 4.12, "buy_price": 3.9},
                {"type_id": 11399, "sell_price": null, "buy_price": null},
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .update_market_prices(&[34, 11399])
        .await
        .expect("update should succeed");

    assert_eq!(response.updated_count, 2);
    assert_eq!(response.prices[0].sell_price, Some(4.12));
    assert_eq!(response.prices[1].buy_price, None);
}

#[tokio::test]
async fn empty_update_asks_for_full_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/market/update"))
        .and(body_json(json!({"type_ids": []})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated_count": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .update_market_prices(&[])
        .await
        .expect("update should succeed");
    assert_eq!(response.updated_count, 0);
    assert!(response.prices.is_empty());
}

#[tokio::test]
async fn market_prices_decodes_cached_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/market/prices"))
        .and(body_json(json!({"type_ids": [34]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "type_id": 34,
            "region_id": 10000002,
            "sell_price": 4.12,
            "buy_price": 3.9,
            "daily_volume": null,
            "updated_at": "2024-05-01T12:00:00Z",
        }])))
        .mount(&server)
        .await;

    let prices = client_for(&server)
        .market_prices(&[34])
        .await
        .expect("prices should load");

    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].region_id, 10000002);
    assert_eq!(prices[0].daily_volume, None);
    assert_eq!(prices[0].updated_at, "2024-05-01T12:00:00Z");
}

#[tokio::test]
async fn health_returns_trimmed_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK\n"))
        .mount(&server)
        .await;

    let status = client_for(&server).health().await.expect("health should succeed");
    assert_eq!(status, "OK");
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/planner/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(format!("{}/planner", server.uri()));
    let client = AnalysisClient::new(config).expect("client should build");
    assert_eq!(client.health().await.expect("health"), "OK");
}
