//! HTTP plumbing shared by every service: URL building, bearer attachment and the
//! mapping from HTTP outcomes to [`ClientError`].

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ClientError, ClientResult, DUPLICATE_CPF, GENERIC_FAILURE};
use crate::identity::SessionManager;

/// Body text the backend sends on a 400 for a duplicate owner CPF.
const DUPLICATE_CPF_BODY: &str = "CPF já cadastrado";

pub struct ApiClient {
    base: String,
    client: reqwest::Client,
    session: Arc<SessionManager>,
    public_prefix: String,
    logout_on_unauthorized: bool,
}

impl ApiClient {
    pub fn new(cfg: &Config, session: Arc<SessionManager>) -> ClientResult<Self> {
        cfg.validate()?;
        let mut builder = reqwest::Client::builder().user_agent(concat!("carro-admin/", env!("CARGO_PKG_VERSION")));
        if let Some(t) = cfg.timeout() {
            builder = builder.timeout(t);
        }
        let client = builder.build().map_err(|e| ClientError::config(format!("http client: {e}")))?;
        Ok(Self {
            base: cfg.api_url.trim_end_matches('/').to_string(),
            client,
            session,
            public_prefix: cfg.public_prefix.clone(),
            logout_on_unauthorized: cfg.logout_on_unauthorized,
        })
    }

    pub fn base(&self) -> &str { &self.base }

    pub fn session(&self) -> &Arc<SessionManager> { &self.session }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base, path)
        } else {
            format!("{}/{}", self.base, path)
        }
    }

    /// Whether a bearer token goes on a request to `path`. Never for the login endpoint or
    /// anything under the public prefix.
    pub fn needs_auth(&self, path: &str) -> bool {
        if path.contains("/login") {
            return false;
        }
        let prefix = self.public_prefix.trim_end_matches('/');
        !(path == prefix || path.starts_with(&self.public_prefix) || path.starts_with(&format!("{prefix}?")))
    }

    fn request(&self, method: Method, path: &str) -> (RequestBuilder, bool) {
        let mut rb = self.client.request(method, self.url(path));
        let mut with_token = false;
        if self.needs_auth(path) {
            if let Some(token) = self.session.token() {
                rb = rb.bearer_auth(token);
                with_token = true;
            }
        }
        (rb, with_token)
    }

    async fn send(&self, method: Method, path: &str, build: impl FnOnce(RequestBuilder) -> RequestBuilder) -> ClientResult<Response> {
        let (rb, with_token) = self.request(method.clone(), path);
        debug!(target: "carro_admin::api", %method, path, auth = with_token, "request");
        let resp = build(rb).send().await.map_err(|e| classify_transport(&e))?;
        let status = resp.status();
        debug!(target: "carro_admin::api", %method, path, status = status.as_u16(), "response");
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let err = classify_status(status.as_u16(), &body);
        if matches!(err, ClientError::Unauthorized { .. }) && with_token && self.logout_on_unauthorized {
            warn!(target: "carro_admin::api", path, "token rejected; clearing session");
            self.session.logout();
        }
        Err(err)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> ClientResult<T> {
        let resp = self.send(Method::GET, path, |rb| rb.query(query)).await?;
        decode_json(resp).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        let resp = self.send(Method::POST, path, |rb| rb.json(body)).await?;
        decode_json(resp).await
    }

    pub async fn post_text<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<String> {
        let resp = self.send(Method::POST, path, |rb| rb.json(body)).await?;
        read_text(resp).await
    }

    pub async fn patch_text<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<String> {
        let resp = self.send(Method::PATCH, path, |rb| rb.json(body)).await?;
        read_text(resp).await
    }

    pub async fn delete_text(&self, path: &str) -> ClientResult<String> {
        let resp = self.send(Method::DELETE, path, |rb| rb).await?;
        read_text(resp).await
    }

    /// Raw body plus its `Content-Type`.
    pub async fn get_bytes(&self, path: &str, query: &[(String, String)]) -> ClientResult<(Vec<u8>, Option<String>)> {
        let resp = self.send(Method::GET, path, |rb| rb.query(query)).await?;
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = resp.bytes().await.map_err(|e| classify_transport(&e))?;
        Ok((bytes.to_vec(), content_type))
    }
}

async fn decode_json<T: DeserializeOwned>(resp: Response) -> ClientResult<T> {
    let text = read_text(resp).await?;
    serde_json::from_str(&text).map_err(|e| ClientError::decode(format!("unexpected response body: {e}")))
}

async fn read_text(resp: Response) -> ClientResult<String> { resp.text().await.map_err(|e| classify_transport(&e)) }

pub(crate) fn classify_transport(e: &reqwest::Error) -> ClientError {
    if e.is_decode() {
        ClientError::decode(e.to_string())
    } else {
        ClientError::unreachable(e.to_string())
    }
}

/// Map a non-success status and its body to an error.
pub(crate) fn classify_status(status: u16, body: &str) -> ClientError {
    match status {
        401 => ClientError::Unauthorized { message: extract_message(body) },
        403 => ClientError::Forbidden { message: extract_message(body) },
        409 => match serde_json::from_str::<serde_json::Value>(body) {
            Ok(v) if v.get("campo").and_then(|c| c.as_str()).is_some() => {
                let field = v.get("campo").and_then(|c| c.as_str()).unwrap_or_default();
                ClientError::conflict(field, extract_message(body))
            }
            _ => ClientError::Api { status, message: extract_message(body) },
        },
        400 if body.contains(DUPLICATE_CPF_BODY) => ClientError::conflict("cpf", DUPLICATE_CPF),
        _ => ClientError::Api { status, message: extract_message(body) },
    }
}

/// Backend message from an error body: the first of `mensagem`, `error`, `message`,
/// `erro` in a JSON object, a bare JSON string, or short plain text.
pub(crate) fn extract_message(body: &str) -> String {
    let trimmed = body.trim();
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => ["mensagem", "error", "message", "erro"]
            .iter()
            .filter_map(|k| map.get(*k).and_then(|v| v.as_str()))
            .find(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        Ok(serde_json::Value::String(s)) if !s.trim().is_empty() => s,
        Ok(_) => GENERIC_FAILURE.to_string(),
        Err(_) if !trimmed.is_empty() && trimmed.len() <= 300 && !trimmed.starts_with('<') => trimmed.to_string(),
        Err(_) => GENERIC_FAILURE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MemorySessionStore;

    fn client(prefix: &str) -> ApiClient {
        let cfg = Config { api_url: "http://localhost:8082/".into(), public_prefix: prefix.into(), ..Config::default() };
        ApiClient::new(&cfg, Arc::new(SessionManager::new(Arc::new(MemorySessionStore::new())))).unwrap()
    }

    #[test]
    fn bearer_policy() {
        let c = client("/api/publico/");
        assert!(!c.needs_auth("/login"));
        assert!(!c.needs_auth("/api/publico/arquivos"));
        assert!(!c.needs_auth("/api/publico/arquivos/download"));
        assert!(c.needs_auth("/api/carro"));
        assert!(c.needs_auth("/api/publicos"));
        assert_eq!(c.url("/api/carro"), "http://localhost:8082/api/carro");
        assert_eq!(c.url("api/carro"), "http://localhost:8082/api/carro");
    }

    #[test]
    fn status_classification() {
        assert!(matches!(classify_status(401, ""), ClientError::Unauthorized { .. }));
        assert!(matches!(classify_status(403, ""), ClientError::Forbidden { .. }));
        assert_eq!(
            classify_status(409, r#"{"erro":"Conflito","campo":"username","mensagem":"Usuário já existe"}"#),
            ClientError::conflict("username", "Usuário já existe")
        );
        assert_eq!(classify_status(400, "CPF já cadastrado!"), ClientError::conflict("cpf", DUPLICATE_CPF));
        assert_eq!(
            classify_status(500, r#"{"mensagem":"Falha interna"}"#),
            ClientError::Api { status: 500, message: "Falha interna".into() }
        );
        assert_eq!(classify_status(409, "{}"), ClientError::Api { status: 409, message: GENERIC_FAILURE.into() });
    }

    #[test]
    fn message_extraction_order() {
        assert_eq!(extract_message(r#"{"error":"Bad Request","message":"x"}"#), "Bad Request");
        assert_eq!(extract_message(r#"{"message":"x","erro":"y"}"#), "x");
        assert_eq!(extract_message(r#""texto simples""#), "texto simples");
        assert_eq!(extract_message("Marca não encontrada"), "Marca não encontrada");
        assert_eq!(extract_message("<html>erro</html>"), GENERIC_FAILURE);
        assert_eq!(extract_message(""), GENERIC_FAILURE);
        assert_eq!(extract_message("[1,2]"), GENERIC_FAILURE);
    }
}
