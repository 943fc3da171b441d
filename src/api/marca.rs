use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::resource::Resource;
use super::ApiClient;
use crate::error::ClientResult;
use crate::listing::{ListRequest, ListSource, MarcaFilter, Page};
use crate::validation::validate_marca;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marca {
    #[serde(default)]
    pub id: i64,
    pub nome: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarcaInput {
    pub nome: String,
}

#[derive(Clone)]
pub struct MarcaService {
    res: Resource,
}

impl MarcaService {
    pub const PATH: &'static str = "/api/marca";

    pub fn new(client: Arc<ApiClient>) -> Self { Self { res: Resource::new(client, Self::PATH) } }

    pub async fn list(&self, request: &ListRequest) -> ClientResult<Page<Marca>> { self.res.list(request).await }

    pub async fn get(&self, id: i64) -> ClientResult<Marca> { self.res.get(id).await }

    pub async fn create(&self, input: &MarcaInput) -> ClientResult<Marca> {
        validate_marca(input)?;
        self.res.create_json(&trimmed(input)).await
    }

    pub async fn update(&self, id: i64, input: &MarcaInput) -> ClientResult<String> {
        validate_marca(input)?;
        self.res.update_text(id, &Marca { id, nome: input.nome.trim().to_string() }).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<String> { self.res.delete(id).await }
}

fn trimmed(input: &MarcaInput) -> MarcaInput { MarcaInput { nome: input.nome.trim().to_string() } }

#[async_trait]
impl ListSource for MarcaService {
    type Item = Marca;
    type Filter = MarcaFilter;
    const DEFAULT_SORT: &'static str = "nome";
    const SORT_FIELDS: &'static [&'static str] = &["id", "nome"];
    const LIST_ERROR: &'static str = "Erro ao listar registros!";

    async fn fetch(&self, request: &ListRequest) -> ClientResult<Page<Marca>> { self.list(request).await }
}

/// Brand listing as the report screen reads it: same endpoint, sorted by id.
#[derive(Clone)]
pub struct MarcaConsulta(pub MarcaService);

#[async_trait]
impl ListSource for MarcaConsulta {
    type Item = Marca;
    type Filter = MarcaFilter;
    const DEFAULT_SORT: &'static str = "id";
    const SORT_FIELDS: &'static [&'static str] = &["id", "nome"];
    const LIST_ERROR: &'static str = "Erro ao listar marcas!";

    async fn fetch(&self, request: &ListRequest) -> ClientResult<Page<Marca>> { self.0.list(request).await }
}
