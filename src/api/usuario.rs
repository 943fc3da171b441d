use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::resource::Resource;
use super::role::Role;
use super::ApiClient;
use crate::error::ClientResult;
use crate::listing::{ListRequest, ListSource, Page, UsuarioFilter};
use crate::validation::validate_usuario;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usuario {
    #[serde(default)]
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Only ever sent; the backend does not return it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Usuario {
    pub fn role_names(&self) -> Vec<&str> { self.roles.iter().map(|r| r.nome.as_str()).collect() }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsuarioInput {
    pub username: String,
    /// `None` on update keeps the current password.
    pub password: Option<String>,
    pub roles: Vec<Role>,
}

#[derive(Serialize)]
struct UsuarioBody<'a> {
    username: &'a str,
    roles: &'a [Role],
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
}

impl UsuarioInput {
    fn body(&self) -> UsuarioBody<'_> {
        UsuarioBody {
            username: self.username.trim(),
            roles: &self.roles,
            password: self.password.as_deref().filter(|p| !p.is_empty()),
        }
    }
}

/// The update endpoint answers with the stored record, or a plain message on some builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsuarioUpdate {
    Record(Usuario),
    Message(String),
}

/// `GET /api/usuario/logado`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UsuarioLogado {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Clone)]
pub struct UsuarioService {
    res: Resource,
}

impl UsuarioService {
    pub const PATH: &'static str = "/api/usuario";

    pub fn new(client: Arc<ApiClient>) -> Self { Self { res: Resource::new(client, Self::PATH) } }

    pub async fn list(&self, request: &ListRequest) -> ClientResult<Page<Usuario>> { self.res.list(request).await }

    pub async fn get(&self, id: i64) -> ClientResult<Usuario> { self.res.get(id).await }

    pub async fn create(&self, input: &UsuarioInput) -> ClientResult<String> {
        validate_usuario(input, true)?;
        self.res.create_text(&input.body()).await
    }

    pub async fn update(&self, id: i64, input: &UsuarioInput) -> ClientResult<UsuarioUpdate> {
        validate_usuario(input, false)?;
        let text = self.res.update_text(id, &input.body()).await?;
        Ok(match serde_json::from_str::<Usuario>(&text) {
            Ok(u) => UsuarioUpdate::Record(u),
            Err(_) => UsuarioUpdate::Message(text),
        })
    }

    pub async fn delete(&self, id: i64) -> ClientResult<String> { self.res.delete(id).await }

    pub async fn logado(&self) -> ClientResult<UsuarioLogado> {
        self.res.client().get_json(&format!("{}/logado", Self::PATH), &[]).await
    }
}

#[async_trait]
impl ListSource for UsuarioService {
    type Item = Usuario;
    type Filter = UsuarioFilter;
    const DEFAULT_SORT: &'static str = "username";
    const SORT_FIELDS: &'static [&'static str] = &["id", "username"];
    const LIST_ERROR: &'static str = "Erro ao listar usuários!";

    async fn fetch(&self, request: &ListRequest) -> ClientResult<Page<Usuario>> { self.list(request).await }
}
