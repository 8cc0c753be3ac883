//! In-process Postal server used by the client tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    extract::{Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use indexmap::IndexMap;
use reqwest::Client;
use serde_json::{json, Value};

use crate::devices::{Device, DeviceType};
use crate::service::{Service, USER_AGENT};
use crate::status::ServerStatus;

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
    pub body: String,
}

#[derive(Default)]
struct Store {
    devices: IndexMap<(String, String), Device>,
    status: ServerStatus,
    notifications: Vec<Value>,
}

#[derive(Clone, Default)]
struct StubState {
    store: Arc<Mutex<Store>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub(crate) struct StubServer {
    addr: SocketAddr,
    state: StubState,
}

impl StubServer {
    pub async fn start() -> Self {
        let state = StubState::default();
        let addr = spawn(router(state.clone())).await;
        Self { addr, state }
    }

    pub fn service(&self) -> Service {
        service_at(self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<Value> {
        self.state.store.lock().unwrap().notifications.clone()
    }
}

/// Serve `router` on an ephemeral localhost port
pub(crate) async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A localhost address nothing is listening on
pub(crate) async fn unused_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub(crate) fn service_at(addr: SocketAddr) -> Service {
    // Bypass any proxy configured in the environment
    let client = Client::builder()
        .no_proxy()
        .user_agent(USER_AGENT)
        .build()
        .unwrap();
    Service::with_client(client, addr.ip().to_string(), addr.port())
}

fn router(state: StubState) -> Router {
    Router::new()
        .route("/v1/users/{user}/devices", get(list_devices))
        .route(
            "/v1/users/{user}/devices/{token}",
            get(get_device).put(put_device).delete(delete_device),
        )
        .route("/v1/notify", post(notify))
        .route("/status", get(status))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<StubState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap();

    let header_value = |headers: &HeaderMap, name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        content_type: header_value(&parts.headers, header::CONTENT_TYPE),
        user_agent: header_value(&parts.headers, header::USER_AGENT),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn error(status: StatusCode, message: &str, domain: &str, code: i64) -> Response {
    (
        status,
        Json(json!({"message": message, "domain": domain, "code": code})),
    )
        .into_response()
}

fn device_not_found() -> Response {
    error(
        StatusCode::NOT_FOUND,
        "The device could not be found.",
        "PostalDeviceError",
        1,
    )
}

async fn list_devices(State(state): State<StubState>, Path(user): Path<String>) -> Response {
    let store = state.store.lock().unwrap();
    let devices: Vec<Device> = store
        .devices
        .values()
        .filter(|d| d.user == user)
        .cloned()
        .collect();
    Json(devices).into_response()
}

async fn get_device(
    State(state): State<StubState>,
    Path((user, token)): Path<(String, String)>,
) -> Response {
    let store = state.store.lock().unwrap();
    match store.devices.get(&(user, token)) {
        Some(device) => Json(device.clone()).into_response(),
        None => device_not_found(),
    }
}

async fn put_device(
    State(state): State<StubState>,
    Path((user, token)): Path<(String, String)>,
    body: String,
) -> Response {
    let Ok(mut device) = serde_json::from_str::<Device>(&body) else {
        return error(
            StatusCode::BAD_REQUEST,
            "the json structure provided is invalid.",
            "PostalJsonError",
            0,
        );
    };
    device.user = user.clone();
    device.device_token = token.clone();

    let mut store = state.store.lock().unwrap();
    let existed = store
        .devices
        .insert((user, token), device.clone())
        .is_some();

    let status = if existed {
        store.status.devices_updated += 1;
        StatusCode::OK
    } else {
        store.status.devices_added += 1;
        StatusCode::CREATED
    };
    (status, Json(device)).into_response()
}

async fn delete_device(
    State(state): State<StubState>,
    Path((user, token)): Path<(String, String)>,
) -> Response {
    let mut store = state.store.lock().unwrap();
    match store.devices.shift_remove(&(user, token)) {
        Some(_) => {
            store.status.devices_removed += 1;
            StatusCode::NO_CONTENT.into_response()
        }
        None => device_not_found(),
    }
}

async fn notify(State(state): State<StubState>, body: String) -> Response {
    let payload: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

    let valid = ["aps", "c2dm", "gcm"]
        .iter()
        .all(|key| payload.get(key).is_some_and(Value::is_object))
        && ["users", "devices"]
            .iter()
            .all(|key| payload.get(key).is_some_and(Value::is_array));
    if !valid {
        return error(
            StatusCode::BAD_REQUEST,
            "Missing or invalid fields in JSON payload.",
            "PostalJsonError",
            0,
        );
    }

    let listed = |key: &str, value: &str| {
        payload[key]
            .as_array()
            .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(value)))
    };

    let mut store = state.store.lock().unwrap();
    let targets: Vec<DeviceType> = store
        .devices
        .values()
        .filter(|d| listed("users", &d.user) || listed("devices", &d.device_token))
        .map(|d| d.device_type)
        .collect();
    for device_type in targets {
        let counts = &mut store.status.devices_notified;
        match device_type {
            DeviceType::Ios => counts.aps += 1,
            DeviceType::C2dm => counts.c2dm += 1,
            DeviceType::Gcm => counts.gcm += 1,
        }
    }
    store.notifications.push(payload);

    StatusCode::OK.into_response()
}

async fn status(State(state): State<StubState>) -> Response {
    Json(state.store.lock().unwrap().status.clone()).into_response()
}
