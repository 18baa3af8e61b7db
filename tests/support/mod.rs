// Fake GraphQL backend shared by the integration tests in one test binary.
#![allow(dead_code)]

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock},
    time::Duration,
};

// Content id prefixes that make the fake backend misbehave.
pub const MISSING_POST: &str = "missing-post";
pub const FAILING_POST: &str = "failing-post";
pub const REJECTED_POST: &str = "rejected-post";

#[derive(Default)]
struct Backend {
    // Every GraphQL body received, in arrival order.
    requests: Mutex<Vec<Value>>,
    // View counters keyed by content id.
    views: Mutex<HashMap<String, u64>>,
}

static BACKEND: OnceLock<Arc<Backend>> = OnceLock::new();
static SERVER_URL: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

fn backend() -> Arc<Backend> {
    BACKEND.get_or_init(|| Arc::new(Backend::default())).clone()
}

/// Starts the fake backend once and returns its GraphQL endpoint.
pub fn ensure_backend() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Own OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{addr}/graphql"));
                let app = Router::new()
                    .route("/graphql", post(graphql))
                    .with_state(backend());
                axum::serve(listener, app).await.expect("fake backend failed");
            });
        });
        wait_for_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

/// Unique content id that triggers the misbehavior named by `prefix`.
pub fn post_with(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}

/// Bodies of all requests whose `variables.id` equals `content_id`.
pub fn requests_for(content_id: &str) -> Vec<Value> {
    let requests = backend().requests.lock().expect("requests mutex poisoned").clone();
    requests
        .into_iter()
        .filter(|body| body["variables"]["id"] == content_id)
        .collect()
}

async fn graphql(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend
        .requests
        .lock()
        .expect("requests mutex poisoned")
        .push(body.clone());

    let id = body["variables"]["id"].as_str().unwrap_or_default().to_string();
    let behavior = [MISSING_POST, FAILING_POST, REJECTED_POST]
        .into_iter()
        .find(|prefix| id.starts_with(prefix));
    match behavior {
        Some(MISSING_POST) => (
            StatusCode::OK,
            Json(json!({
                "data": null,
                "errors": [{ "message": "post not found", "path": ["incrementViews"] }]
            })),
        ),
        Some(FAILING_POST) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "database unavailable" })),
        ),
        Some(REJECTED_POST) => (
            StatusCode::OK,
            Json(json!({
                "data": {
                    "incrementViews": { "success": false, "message": "view already counted", "data": null }
                }
            })),
        ),
        _ => {
            let views = {
                let mut counters = backend.views.lock().expect("views mutex poisoned");
                let count = counters.entry(id.clone()).or_insert(0);
                *count += 1;
                *count
            };
            (
                StatusCode::OK,
                Json(json!({
                    "data": {
                        "incrementViews": {
                            "success": true,
                            "message": "views incremented",
                            "data": { "id": id, "views": views }
                        }
                    }
                })),
            )
        }
    }
}

fn wait_for_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };
    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .and_then(|rest| rest.strip_suffix("/graphql"))
        .expect("base url should look like http://host:port/graphql");

    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("fake backend did not become ready in time");
}
