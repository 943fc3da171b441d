//! In-process stand-in for the administration backend.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use base64::Engine;
use parking_lot::Mutex;
use serde_json::Value;

use carro_admin::identity::{SessionManager, SessionStore};
use carro_admin::{ApiClient, Config, Services};

#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub query: String,
    pub auth: Option<String>,
    pub body: String,
}

impl Seen {
    /// Decoded query pairs in wire order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.query
            .split('&')
            .filter(|kv| !kv.is_empty())
            .map(|kv| {
                let (k, v) = kv.split_once('=').unwrap_or((kv, ""));
                (decode(k), decode(v))
            })
            .collect()
    }

    pub fn param(&self, key: &str) -> Option<String> { self.pairs().into_iter().find(|(k, _)| k == key).map(|(_, v)| v) }

    pub fn json(&self) -> Value { serde_json::from_str(&self.body).unwrap() }
}

fn decode(s: &str) -> String { urlencoding::decode(&s.replace('+', " ")).unwrap().into_owned() }

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(status: u16, v: Value) -> Self {
        Self { status, content_type: "application/json".into(), body: v.to_string().into_bytes() }
    }

    pub fn text(status: u16, t: &str) -> Self {
        Self { status, content_type: "text/plain;charset=UTF-8".into(), body: t.as_bytes().to_vec() }
    }

    pub fn bytes(content_type: &str, body: &[u8]) -> Self {
        Self { status: 200, content_type: content_type.into(), body: body.to_vec() }
    }
}

#[derive(Default)]
pub struct Mock {
    seen: Mutex<Vec<Seen>>,
    replies: Mutex<HashMap<(String, String), Reply>>,
}

impl Mock {
    pub fn on(&self, method: &str, path: &str, reply: Reply) {
        self.replies.lock().insert((method.to_string(), path.to_string()), reply);
    }

    pub fn seen(&self) -> Vec<Seen> { self.seen.lock().clone() }

    pub fn last(&self) -> Seen { self.seen.lock().last().cloned().expect("no request recorded") }

    pub fn to(&self, path: &str) -> Vec<Seen> { self.seen().into_iter().filter(|s| s.path == path).collect() }
}

async fn handle(State(mock): State<Arc<Mock>>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let seen = Seen {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().unwrap_or("").to_string(),
        auth: headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()).map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    let key = (seen.method.clone(), seen.path.clone());
    mock.seen.lock().push(seen);
    let reply = mock.replies.lock().get(&key).cloned();
    match reply {
        Some(r) => {
            let status = StatusCode::from_u16(r.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(header::CONTENT_TYPE, r.content_type)], r.body).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no route").into_response(),
    }
}

/// Serve `mock` on an ephemeral port; returns the base URL.
pub async fn serve(mock: Arc<Mock>) -> String {
    let app = Router::new().fallback(handle).with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn services(base: &str, store: Arc<dyn SessionStore>) -> Services {
    let cfg = Config { api_url: base.to_string(), ..Config::default() };
    let session = Arc::new(SessionManager::restore(store));
    Services::new(Arc::new(ApiClient::new(&cfg, session).unwrap()))
}

/// Unsigned JWT with the given claims.
pub fn token(claims: Value) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    format!(
        "{}.{}.c2ln",
        engine.encode(br#"{"alg":"RS256","typ":"JWT"}"#),
        engine.encode(claims.to_string().as_bytes())
    )
}

pub fn token_for(user: &str, roles: &[&str]) -> String { token(serde_json::json!({ "sub": user, "roles": roles, "exp": 4102444800i64 })) }

pub fn page(content: Value, number: u32, total_pages: u32, total_elements: u64) -> Value {
    serde_json::json!({
        "content": content,
        "number": number,
        "totalPages": total_pages,
        "totalElements": total_elements,
        "size": 5,
    })
}
