use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::advisor::router::{advisor_router, recommendation_handler, weekly_handler};
use crate::advisor::service::{AdvisorService, RecommendationRequest, WeeklyRequest};
use crate::advisor::DayIndex;

fn rpc_body(method: &str, params: Value) -> axum::body::Body {
    let payload = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": 7,
    });
    axum::body::Body::from(serde_json::to_vec(&payload).expect("serializes"))
}

async fn post(router: axum::Router, uri: &str, body: axum::body::Body) -> axum::response::Response {
    router
        .oneshot(
            axum::http::Request::post(uri)
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(body)
                .expect("request builds"),
        )
        .await
        .expect("route executes")
}

#[tokio::test]
async fn rpc_route_returns_recommendation() {
    let router = advisor_router(Arc::new(AdvisorService::default()));
    let params = json!({
        "today": 10,
        "schools": [record(1, "North University", 1, 10, 20)],
        "states": [state_record(1, "passed", false, false)],
    });

    let response = post(router, "/rpc", rpc_body("getRecommendation", params)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["id"], json!(7));
    let result = &payload["result"];
    assert_eq!(result["action"]["type"], json!("payEnrollmentFee"));
    assert_eq!(result["action"]["schoolId"], json!(1));
    assert_eq!(result["urgency"], json!(0));
    assert_eq!(result["allRecommendations"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn rpc_route_surfaces_validation_errors() {
    let router = advisor_router(Arc::new(AdvisorService::default()));
    let mut broken = record(1, "Broken College", 1, 10, 20);
    broken.tuition = 1;
    let params = json!({ "today": 5, "schools": [broken], "states": [] });

    let response = post(router, "/rpc", rpc_body("getRecommendation", params)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload.get("result").is_none());
    assert_eq!(payload["error"]["code"], json!(-32602));
    assert_eq!(payload["error"]["data"]["kind"], json!("validation"));
    let message = payload["error"]["message"].as_str().unwrap_or_default();
    assert!(message.contains("Broken College"));
    assert!(message.contains("tuition must exceed"));
}

#[tokio::test]
async fn rpc_route_projects_a_week() {
    let router = advisor_router(Arc::new(AdvisorService::default()));
    let params = json!({
        "startDay": 8,
        "schools": [record(1, "North University", 1, 10, 20)],
        "states": [state_record(1, "passed", false, false)],
    });

    let response = post(router, "/rpc", rpc_body("getWeeklyRecommendations", params)).await;

    let payload = read_json_body(response).await;
    let result = &payload["result"];
    assert_eq!(result["startDay"], json!(8));
    let days = result["recommendations"].as_array().expect("days listed");
    assert_eq!(days.len(), 7);
    assert_eq!(days[2]["day"], json!(10));
    assert_eq!(days[2]["result"]["action"]["type"], json!("payEnrollmentFee"));
    assert_eq!(days[2]["result"]["urgency"], json!(2));
    assert!(result["upcomingAnnouncements"].as_array().expect("list").is_empty());
    assert!(result["note"].is_string());
}

#[tokio::test]
async fn rpc_route_rejects_malformed_params() {
    let router = advisor_router(Arc::new(AdvisorService::default()));

    let response = post(
        router,
        "/rpc",
        rpc_body("getRecommendation", json!({ "today": "soon" })),
    )
    .await;

    let payload = read_json_body(response).await;
    assert_eq!(payload["error"]["code"], json!(-32602));
}

#[tokio::test]
async fn recommendation_handler_returns_unprocessable_for_invalid_roster() {
    let service = Arc::new(AdvisorService::default());
    let request = RecommendationRequest {
        today: DayIndex::new(5),
        schools: vec![record(1, "North University", 0, 10, 20)],
        states: Vec::new(),
    };

    let response = recommendation_handler(State(service), axum::Json(request)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("priority must be positive"));
}

#[tokio::test]
async fn weekly_handler_rejects_empty_window() {
    let service = Arc::new(AdvisorService::default());
    let request = WeeklyRequest {
        start_day: DayIndex::new(5),
        days: Some(0),
        schools: vec![record(1, "North University", 1, 10, 20)],
        states: vec![state_record(1, "passed", false, false)],
    };

    let response = weekly_handler(State(service), axum::Json(request)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn weekly_handler_honours_requested_length() {
    let service = Arc::new(AdvisorService::default());
    let request = WeeklyRequest {
        start_day: DayIndex::new(5),
        days: Some(3),
        schools: vec![record(1, "North University", 1, 10, 20)],
        states: vec![state_record(1, "passed", false, false)],
    };

    let response = weekly_handler(State(service), axum::Json(request)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["recommendations"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn rpc_route_reports_parse_errors_in_band() {
    let router = advisor_router(Arc::new(AdvisorService::default()));

    let response = post(router, "/rpc", axum::body::Body::from("{not json")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"]["code"], json!(-32700));
    assert_eq!(payload["id"], Value::Null);
}

#[tokio::test]
async fn ping_route_answers_without_a_body() {
    let router = advisor_router(Arc::new(AdvisorService::default()));

    let response = router
        .oneshot(
            axum::http::Request::get("/ping")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["jsonrpc"], json!("2.0"));
    assert_eq!(payload["result"], json!({ "status": "ok" }));
}
