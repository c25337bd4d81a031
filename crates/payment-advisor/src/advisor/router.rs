use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::rpc::{dispatch, handle_body, JsonRpcRequest, METHOD_PING};
use super::service::{AdvisorError, AdvisorService, RecommendationRequest, WeeklyRequest};

/// Router exposing the JSON-RPC endpoint and plain JSON equivalents.
pub fn advisor_router(service: Arc<AdvisorService>) -> Router {
    Router::new()
        .route("/rpc", post(rpc_handler))
        .route("/ping", get(ping_handler))
        .route("/api/v1/recommendation", post(recommendation_handler))
        .route("/api/v1/recommendation/weekly", post(weekly_handler))
        .with_state(service)
}

pub(crate) async fn rpc_handler(
    State(service): State<Arc<AdvisorService>>,
    body: Bytes,
) -> Response {
    let response = handle_body(&service, &body);
    if let Some(error) = &response.error {
        tracing::warn!(code = error.code, message = %error.message, "rpc call failed");
    }
    (StatusCode::OK, Json(response)).into_response()
}

/// Plain GET shortcut for the `ping` method.
pub(crate) async fn ping_handler(State(service): State<Arc<AdvisorService>>) -> Response {
    let request = JsonRpcRequest::new(METHOD_PING, Value::Null, Value::Null);
    (StatusCode::OK, Json(dispatch(&service, request))).into_response()
}

pub(crate) async fn recommendation_handler(
    State(service): State<Arc<AdvisorService>>,
    Json(request): Json<RecommendationRequest>,
) -> Response {
    respond(service.recommend(&request))
}

pub(crate) async fn weekly_handler(
    State(service): State<Arc<AdvisorService>>,
    Json(request): Json<WeeklyRequest>,
) -> Response {
    respond(service.weekly(&request))
}

fn respond<T: Serialize>(outcome: Result<T, AdvisorError>) -> Response {
    match outcome {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}
