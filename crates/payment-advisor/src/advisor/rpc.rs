//! JSON-RPC 2.0 envelope for the advisor methods.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::service::{AdvisorError, AdvisorService};

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

pub const METHOD_PING: &str = "ping";
pub const METHOD_RECOMMENDATION: &str = "getRecommendation";
pub const METHOD_WEEKLY: &str = "getWeeklyRecommendations";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Value,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Value, id: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn failure(id: Value, code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data,
            }),
            id,
        }
    }
}

/// Decode a raw request body and dispatch it.
///
/// Malformed JSON yields a parse error; well-formed JSON that is not a request object
/// yields an invalid-request error carrying whatever `id` could be recovered.
pub fn handle_body(service: &AdvisorService, body: &[u8]) -> JsonRpcResponse {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(err) => {
            return JsonRpcResponse::failure(
                Value::Null,
                PARSE_ERROR,
                format!("parse error: {err}"),
                None,
            )
        }
    };

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    match serde_json::from_value::<JsonRpcRequest>(value) {
        Ok(request) => dispatch(service, request),
        Err(err) => {
            JsonRpcResponse::failure(id, INVALID_REQUEST, format!("invalid request: {err}"), None)
        }
    }
}

/// Route a request to the advisor and wrap the outcome in a response envelope.
pub fn dispatch(service: &AdvisorService, request: JsonRpcRequest) -> JsonRpcResponse {
    let JsonRpcRequest {
        jsonrpc,
        method,
        params,
        id,
    } = request;

    if jsonrpc != JSONRPC_VERSION {
        return JsonRpcResponse::failure(
            id,
            INVALID_REQUEST,
            format!("unsupported jsonrpc version '{jsonrpc}'"),
            None,
        );
    }

    debug!(%method, "dispatching rpc call");
    let outcome = match method.as_str() {
        METHOD_PING => Ok(json!({ "status": "ok" })),
        METHOD_RECOMMENDATION => {
            parse_params(params).and_then(|request| to_result(service.recommend(&request)))
        }
        METHOD_WEEKLY => {
            parse_params(params).and_then(|request| to_result(service.weekly(&request)))
        }
        other => Err(JsonRpcError {
            code: METHOD_NOT_FOUND,
            message: format!("method '{other}' not found"),
            data: None,
        }),
    };

    match outcome {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(error) => JsonRpcResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        },
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, JsonRpcError> {
    serde_json::from_value(params).map_err(|err| JsonRpcError {
        code: INVALID_PARAMS,
        message: format!("invalid params: {err}"),
        data: None,
    })
}

fn to_result<T: Serialize>(outcome: Result<T, AdvisorError>) -> Result<Value, JsonRpcError> {
    let value = outcome.map_err(advisor_error)?;
    serde_json::to_value(value).map_err(|err| JsonRpcError {
        code: INTERNAL_ERROR,
        message: err.to_string(),
        data: None,
    })
}

fn advisor_error(error: AdvisorError) -> JsonRpcError {
    let kind = match error {
        AdvisorError::Validation(_) => "validation",
        AdvisorError::EmptyWindow | AdvisorError::WindowTooLong { .. } => "window",
    };
    JsonRpcError {
        code: INVALID_PARAMS,
        message: error.to_string(),
        data: Some(json!({ "kind": kind })),
    }
}
