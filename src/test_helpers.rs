//! In-process mock of the library backend.
//!
//! Responses are canned per `(method, path)`; every request is recorded with
//! its authorization header so tests can assert on interceptor behavior.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use serde_json::{Value, json};

use crate::app::App;
use crate::config::ClientConfig;
use crate::navigation::History;
use crate::storage::MemoryStore;

#[derive(Clone, Debug)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(String, String), (u16, Value)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub(crate) struct MockBackend {
    base_url: String,
    state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let router = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Self { base_url: format!("http://{addr}"), state }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method.to_owned(), path.to_owned()), (status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    let path = uri.path().to_owned();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(ToOwned::to_owned),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned),
        body,
    });

    let canned = state.routes.lock().unwrap().get(&(method.to_string(), path)).cloned();
    match canned {
        Some((status, body)) => (StatusCode::from_u16(status).unwrap(), Json(body)),
        None => (StatusCode::NOT_FOUND, Json(json!({ "success": false, "message": "no mock route" }))),
    }
}

/// Base URL of a port that was bound and released, so connects are refused.
pub(crate) async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub(crate) fn login_success(role: &str, token: &str) -> Value {
    json!({
        "success": true,
        "message": "login ok",
        "data": {
            "id": 1,
            "username": "alice",
            "name": "Alice",
            "role": role,
            "token": token,
            "type": "Bearer"
        }
    })
}

pub(crate) struct TestApp {
    pub app: App,
    pub storage: Arc<MemoryStore>,
    pub history: Arc<History>,
}

/// App wired to `base_url` with in-memory storage and a recording navigator.
pub(crate) fn test_app(base_url: &str) -> TestApp {
    test_app_with_storage(base_url, Arc::new(MemoryStore::new()))
}

pub(crate) fn test_app_with_storage(base_url: &str, storage: Arc<MemoryStore>) -> TestApp {
    let history = Arc::new(History::default());
    let config = ClientConfig::default().with_base_url(base_url);
    let app = App::new(config, storage.clone(), history.clone()).unwrap();
    TestApp { app, storage, history }
}
