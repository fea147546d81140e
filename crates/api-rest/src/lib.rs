//! # API REST
//!
//! REST API for the data-call ledger.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON envelopes, CORS, the caller header)
//!
//! Every invocation runs against one shared [`Network`], serialised behind a mutex.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use datacall_core::{Identity, Invocation, Network, Operation, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

/// Header carrying the caller's organisation type.
pub const ORG_TYPE_HEADER: &str = "x-org-type";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    network: Arc<Mutex<Network>>,
}

impl AppState {
    pub fn new(network: Network) -> Self {
        Self {
            network: Arc::new(Mutex::new(network)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationInfo {
    pub name: String,
    /// Organisation types allowed to invoke; absent when unrestricted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_org_types: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OperationsRes {
    pub operations: Vec<OperationInfo>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct InvokeReq {
    /// Positional arguments, usually one JSON document.
    pub args: Vec<String>,
    /// Transient entries; never written to public state.
    pub transient: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventRes {
    pub name: String,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvokeRes {
    pub status: u16,
    pub message: String,
    /// The payload as JSON when it parses as JSON, otherwise as a string.
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declined: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    pub events: Vec<EventRes>,
}

fn payload_value(bytes: &[u8]) -> serde_json::Value {
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

impl From<Response> for InvokeRes {
    fn from(response: Response) -> Self {
        Self {
            status: response.status,
            message: response.message,
            payload: payload_value(&response.payload),
            declined: response.declined.map(|reason| reason.to_string()),
            tx_id: response.tx_id,
            events: response
                .events
                .into_iter()
                .map(|event| EventRes {
                    payload: payload_value(&event.payload),
                    name: event.name,
                })
                .collect(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_operations, invoke),
    components(schemas(HealthRes, OperationInfo, OperationsRes, InvokeReq, InvokeRes, EventRes))
)]
pub struct ApiDoc;

/// Build the REST router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/operations", get(list_operations))
        .route("/channels/:channel/invoke/:function", post(invoke))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Data-call REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/operations",
    responses(
        (status = 200, description = "Every operation and who may invoke it", body = OperationsRes)
    )
)]
/// List the operations the contract answers to
async fn list_operations() -> Json<OperationsRes> {
    let operations = Operation::ALL
        .iter()
        .map(|op| OperationInfo {
            name: op.name().to_owned(),
            allowed_org_types: op
                .allowed_org_types()
                .map(|allowed| allowed.iter().map(|s| (*s).to_owned()).collect()),
        })
        .collect();
    Json(OperationsRes { operations })
}

#[utoipa::path(
    post,
    path = "/channels/{channel}/invoke/{function}",
    params(
        ("channel" = String, Path, description = "Channel to invoke on"),
        ("function" = String, Path, description = "Operation name"),
        ("x-org-type" = Option<String>, Header, description = "Caller organisation type")
    ),
    request_body = InvokeReq,
    responses(
        (status = 200, description = "Operation completed or declined", body = InvokeRes),
        (status = 500, description = "Operation failed", body = InvokeRes)
    )
)]
/// Invoke a contract operation on a channel
///
/// The caller's organisation type comes from the `x-org-type` header. Failures keep the
/// response envelope and answer with status 500, the way the contract reports them.
async fn invoke(
    State(state): State<AppState>,
    Path((channel, function)): Path<(String, String)>,
    headers: HeaderMap,
    Json(req): Json<InvokeReq>,
) -> (StatusCode, Json<InvokeRes>) {
    let mut identity = Identity::new();
    if let Some(org_type) = headers
        .get(ORG_TYPE_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        identity = identity.with_org_type(org_type);
    }

    let mut invocation = Invocation::new(function, identity);
    invocation.args = req.args;
    invocation.transient = req
        .transient
        .into_iter()
        .map(|(key, value)| (key, value.into_bytes()))
        .collect();

    let result = state.network.lock().await.invoke(&channel, invocation);
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Invoke error on {}: {}", channel, e);
            Response::error(&e)
        }
    };
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.into()))
}
