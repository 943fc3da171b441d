use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::marca::Marca;
use super::proprietario::Proprietario;
use super::resource::{IdRef, Resource};
use super::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::listing::{CarroFilter, ListRequest, ListSource, Page};
use crate::validation::validate_carro;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carro {
    #[serde(default)]
    pub id: i64,
    pub modelo: String,
    #[serde(default)]
    pub cor: String,
    #[serde(default)]
    pub ano: i32,
    #[serde(default)]
    pub marca: Option<Marca>,
    #[serde(default)]
    pub proprietarios: Vec<Proprietario>,
}

impl Carro {
    pub fn marca_nome(&self) -> &str { self.marca.as_ref().map(|m| m.nome.as_str()).unwrap_or("") }

    pub fn proprietarios_nomes(&self) -> String {
        self.proprietarios.iter().map(|p| p.nome.as_str()).collect::<Vec<_>>().join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarroInput {
    pub modelo: String,
    pub cor: String,
    pub ano: i32,
    pub marca_id: Option<i64>,
    pub proprietario_ids: Vec<i64>,
}

/// Body for create and update: related records travel as `{id}` references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarroCreate {
    pub modelo: String,
    pub cor: String,
    pub ano: i32,
    pub marca: IdRef,
    pub proprietarios: Vec<IdRef>,
}

impl CarroInput {
    pub fn to_body(&self) -> ClientResult<CarroCreate> {
        validate_carro(self)?;
        let marca = self.marca_id.ok_or_else(|| ClientError::validation("marca", crate::validation::REQUIRED_FIELDS))?;
        Ok(CarroCreate {
            modelo: self.modelo.trim().to_string(),
            cor: self.cor.trim().to_string(),
            ano: self.ano,
            marca: IdRef { id: marca },
            proprietarios: self.proprietario_ids.iter().map(|id| IdRef { id: *id }).collect(),
        })
    }
}

#[derive(Clone)]
pub struct CarroService {
    res: Resource,
}

impl CarroService {
    pub const PATH: &'static str = "/api/carro";

    pub fn new(client: Arc<ApiClient>) -> Self { Self { res: Resource::new(client, Self::PATH) } }

    pub async fn list(&self, request: &ListRequest) -> ClientResult<Page<Carro>> { self.res.list(request).await }

    pub async fn get(&self, id: i64) -> ClientResult<Carro> { self.res.get(id).await }

    pub async fn create(&self, input: &CarroInput) -> ClientResult<String> {
        let body = input.to_body()?;
        self.res.create_text(&body).await
    }

    pub async fn update(&self, id: i64, input: &CarroInput) -> ClientResult<String> {
        let body = input.to_body()?;
        self.res.update_text(id, &body).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<String> { self.res.delete(id).await }
}

#[async_trait]
impl ListSource for CarroService {
    type Item = Carro;
    type Filter = CarroFilter;
    const DEFAULT_SORT: &'static str = "modelo";
    const SORT_FIELDS: &'static [&'static str] = &["id", "modelo", "cor", "ano", "marca"];
    const LIST_ERROR: &'static str = "Erro ao listar carros!";

    async fn fetch(&self, request: &ListRequest) -> ClientResult<Page<Carro>> { self.list(request).await }
}
