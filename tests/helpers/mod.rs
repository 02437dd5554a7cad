#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use homerelay::config::HubConfig;
use homerelay::error::ModelError;
use homerelay::hub::HubClient;
use homerelay::memory::MemoryStore;
use homerelay::model::CompletionProvider;
use homerelay::relay::Relay;
use serde_json::Value;
use tempfile::TempDir;

pub const HUB_TOKEN: &str = "test-token";

/// A service call received by the fake hub.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub body: Value,
}

#[derive(Clone)]
struct HubState {
    states: Value,
    calls: Arc<Mutex<Vec<ServiceCall>>>,
}

/// A running fake hub: `GET /api/states` answers with canned states when the bearer
/// token matches, `POST /api/services/{domain}/{service}` records the call.
pub struct FakeHub {
    pub url: String,
    pub calls: Arc<Mutex<Vec<ServiceCall>>>,
}

impl FakeHub {
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn config(&self) -> HubConfig {
        HubConfig {
            url: self.url.clone(),
            token: HUB_TOKEN.into(),
            timeout_secs: 5,
        }
    }

    pub fn client(&self) -> HubClient {
        HubClient::new(&self.config()).unwrap()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {HUB_TOKEN}"))
        .unwrap_or(false)
}

async fn states_handler(State(state): State<HubState>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(serde_json::json!({"message": "401: Unauthorized"})));
    }
    (StatusCode::OK, Json(state.states.clone()))
}

async fn service_handler(
    State(state): State<HubState>,
    Path((domain, service)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(serde_json::json!({"message": "401: Unauthorized"})));
    }
    state.calls.lock().unwrap().push(ServiceCall {
        domain,
        service,
        body,
    });
    (StatusCode::OK, Json(serde_json::json!([])))
}

pub async fn spawn_hub(states: Value) -> FakeHub {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = HubState {
        states,
        calls: Arc::clone(&calls),
    };
    let app = Router::new()
        .route("/api/states", get(states_handler))
        .route("/api/services/{domain}/{service}", post(service_handler))
        .with_state(state);

    let url = serve(app).await;
    FakeHub { url, calls }
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Hub config pointing at a port nothing listens on.
pub fn unreachable_hub() -> HubClient {
    HubClient::new(&HubConfig {
        url: "http://127.0.0.1:9".into(),
        token: HUB_TOKEN.into(),
        timeout_secs: 1,
    })
    .unwrap()
}

pub fn lamp_states() -> Value {
    serde_json::json!([
        {
            "entity_id": "input_boolean.lamp1",
            "state": "off",
            "attributes": {"friendly_name": "Bedroom Lamp", "editable": true},
            "area_name": "Bedroom"
        },
        {
            "entity_id": "input_boolean.fan",
            "state": "on",
            "attributes": {}
        }
    ])
}

/// A model that replays scripted outputs in order and records every prompt.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String, ModelError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(e)) => Err(ModelError::Decode(e)),
            None => Err(ModelError::Decode("no scripted reply left".into())),
        }
    }
}

pub fn memory_in(tmp: &TempDir) -> MemoryStore {
    MemoryStore::new(tmp.path().join("memory.json"))
}

pub fn relay(tmp: &TempDir, hub: HubClient, model: Arc<ScriptedModel>) -> Relay {
    Relay::new(memory_in(tmp), hub, model, 256)
}
