use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::listing::{ListRequest, ListSource, Page, SortDirection};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub id: i64,
    pub nome: String,
}

#[derive(Clone)]
pub struct RoleService {
    client: Arc<ApiClient>,
}

impl RoleService {
    pub const PATH: &'static str = "/api/role";

    pub fn new(client: Arc<ApiClient>) -> Self { Self { client } }

    pub async fn list(&self, request: &ListRequest) -> ClientResult<Page<Role>> {
        self.client.get_json(Self::PATH, &request.to_query_pairs()).await
    }

    /// Every role, for pickers.
    pub async fn all(&self) -> ClientResult<Vec<Role>> {
        let req = ListRequest { page: 0, size: 1000, sort_field: "id".into(), sort_dir: SortDirection::Asc, filters: Vec::new() };
        Ok(self.list(&req).await?.content)
    }

    /// Resolve role names (case-insensitive) against the backend's list.
    pub async fn resolve(&self, names: &[String]) -> ClientResult<Vec<Role>> {
        let known = self.all().await?;
        names
            .iter()
            .map(|n| {
                known
                    .iter()
                    .find(|r| r.nome.eq_ignore_ascii_case(n.trim()))
                    .cloned()
                    .ok_or_else(|| ClientError::validation("roles", format!("perfil desconhecido: {n}")))
            })
            .collect()
    }
}

#[async_trait]
impl ListSource for RoleService {
    type Item = Role;
    type Filter = ();
    const DEFAULT_SORT: &'static str = "id";
    const SORT_FIELDS: &'static [&'static str] = &["id", "nome"];
    const LIST_ERROR: &'static str = "Erro ao carregar roles!";

    async fn fetch(&self, request: &ListRequest) -> ClientResult<Page<Role>> { self.list(request).await }
}
