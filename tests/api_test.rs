use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use module_stats::{create_router, AppState, CoefficientStore, InMemorySource, QualityPolicy, StatService};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const RINGS: &str = r#"{"ring1": {"a": 10, "b": 2}, "ring2": {"a": 0.5, "b": 0.1}}"#;

const ADD_ON: &str = r#"{
    "group": "Add-On",
    "modules": {
        "stabilizing_grip": {
            "moduleType": "Control",
            "localization": {"ru": "Стабилизирующая рукоять", "en": "Stabilizing grip", "es": ""},
            "stats": {
                "vertical_recoil": {"a": -4.0, "b": -0.5},
                "horizontal_recoil": {"a": -2.0, "b": -0.25}
            }
        }
    }
}"#;

fn router() -> Router {
    let source = InMemorySource::new()
        .with_file("rings.json", RINGS)
        .with_file("add_on.json", ADD_ON);
    let store = CoefficientStore::load(&source).unwrap();
    let service = StatService::new(Arc::new(store), QualityPolicy::default());
    create_router(AppState::new(service), true)
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_stat_ring1() {
    let (status, body) = get("/stat?module=ring1&q=5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["module"], "ring1");
    assert_eq!(body["stat"], "value");
    assert_eq!(body["q"], 5.0);
    assert_eq!(body["value"], 20.0);
}

#[tokio::test]
async fn test_stat_zero_quality_returns_base_value() {
    let (status, body) = get("/stat?module=ring2&q=0").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], 0.5);
}

#[tokio::test]
async fn test_stat_unknown_module() {
    let (status, body) = get("/stat?module=ring99&q=5").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["detail"], "Unknown module 'ring99'");
}

#[tokio::test]
async fn test_stat_negative_quality_rejected() {
    let (status, body) = get("/stat?module=ring1&q=-1").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert!(body["detail"].as_str().unwrap().contains("q"));
}

#[tokio::test]
async fn test_stat_invalid_quality_values() {
    for uri in [
        "/stat?module=ring1&q=abc",
        "/stat?module=ring1&q=NaN",
        "/stat?module=ring1&q=inf",
        "/stat?module=ring1",
        "/stat?q=5",
    ] {
        let (status, body) = get(uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "uri: {}", uri);
        assert_eq!(body["error"], "validation_error", "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_stat_multi_stat_module() {
    let (status, body) = get("/stat?module=stabilizing_grip&q=10").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("vertical_recoil, horizontal_recoil"));

    let (status, body) = get("/stat?module=stabilizing_grip&q=10&stat=vertical_recoil").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], -9.0);

    let (status, _) = get("/stat?module=stabilizing_grip&q=10&stat=weight").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_module_stats() {
    let (status, body) = get("/module-stats?module=stabilizing_grip&q=4&lang=en").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["module"], "stabilizing_grip");
    assert_eq!(body["group"], "Add-On");
    assert_eq!(body["moduleType"], "Control");
    assert_eq!(body["display_name"], "Stabilizing grip");
    assert_eq!(body["percent"], 4.0);
    assert_eq!(body["stats"]["vertical_recoil"], -6.0);
    assert_eq!(body["stats"]["horizontal_recoil"], -3.0);
}

#[tokio::test]
async fn test_stats_follow_data_file_order() {
    let request = Request::builder()
        .uri("/module-stats?module=stabilizing_grip&q=1")
        .body(Body::empty())
        .unwrap();
    let response = router().oneshot(request).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    let vertical = text.find("vertical_recoil").unwrap();
    let horizontal = text.find("horizontal_recoil").unwrap();
    assert!(vertical < horizontal, "unexpected order: {}", text);

    let (_, body) = get("/modules").await;
    assert_eq!(
        body[2]["stat_keys"],
        serde_json::json!(["vertical_recoil", "horizontal_recoil"])
    );
}

#[tokio::test]
async fn test_module_stats_language_fallback() {
    let (status, body) = get("/module-stats?module=stabilizing_grip&q=0&lang=es").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "Стабилизирующая рукоять");

    let (_, body) = get("/module-stats?module=stabilizing_grip&q=0").await;
    assert_eq!(body["display_name"], "Стабилизирующая рукоять");

    let (status, _) = get("/module-stats?module=stabilizing_grip&q=0&lang=de").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = get("/module-stats?module=ring99&q=0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_modules() {
    let (status, body) = get("/modules?lang=en").await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    let keys: Vec<&str> = items.iter().map(|i| i["key"].as_str().unwrap()).collect();
    assert_eq!(keys, vec!["ring1", "ring2", "stabilizing_grip"]);

    assert_eq!(items[0]["group"], "default");
    assert_eq!(items[0]["display_name"], Value::Null);
    assert_eq!(items[0]["stat_keys"], serde_json::json!(["value"]));
    assert_eq!(items[2]["display_name"], "Stabilizing grip");
    assert_eq!(items[2]["moduleType"], "Control");
}

#[tokio::test]
async fn test_status_and_health() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modules"], 3);
    assert!(body["loaded_at"].is_string());
}

#[tokio::test]
async fn test_documentation_routes() {
    let (status, body) = get("/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/stat"]["get"]["parameters"].is_array());

    let request = Request::builder().uri("/docs").body(Body::empty()).unwrap();
    let response = router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/html"));
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, _) = get("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
