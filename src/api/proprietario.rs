use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::resource::Resource;
use super::ApiClient;
use crate::error::ClientResult;
use crate::listing::masks::digits_only;
use crate::listing::{ListRequest, ListSource, Page, ProprietarioFilter};
use crate::validation::validate_proprietario;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proprietario {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub cpf: String,
    pub nome: String,
    #[serde(default)]
    pub telefone: String,
}

/// Form values; CPF and phone may carry their display masks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProprietarioInput {
    pub nome: String,
    pub cpf: String,
    pub telefone: String,
}

impl ProprietarioInput {
    /// Wire body: trimmed name, masks stripped.
    pub fn to_body(&self, id: i64) -> Proprietario {
        Proprietario {
            id,
            cpf: digits_only(&self.cpf),
            nome: self.nome.trim().to_string(),
            telefone: digits_only(&self.telefone),
        }
    }
}

#[derive(Serialize)]
struct NewProprietario {
    cpf: String,
    nome: String,
    telefone: String,
}

#[derive(Clone)]
pub struct ProprietarioService {
    res: Resource,
}

impl ProprietarioService {
    pub const PATH: &'static str = "/api/proprietario";

    pub fn new(client: Arc<ApiClient>) -> Self { Self { res: Resource::new(client, Self::PATH) } }

    pub async fn list(&self, request: &ListRequest) -> ClientResult<Page<Proprietario>> { self.res.list(request).await }

    pub async fn get(&self, id: i64) -> ClientResult<Proprietario> { self.res.get(id).await }

    /// A CPF already on file comes back as a conflict on `cpf`.
    pub async fn create(&self, input: &ProprietarioInput) -> ClientResult<Proprietario> {
        validate_proprietario(input)?;
        let Proprietario { cpf, nome, telefone, .. } = input.to_body(0);
        self.res.create_json(&NewProprietario { cpf, nome, telefone }).await
    }

    pub async fn update(&self, id: i64, input: &ProprietarioInput) -> ClientResult<String> {
        validate_proprietario(input)?;
        self.res.update_text(id, &input.to_body(id)).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<String> { self.res.delete(id).await }
}

#[async_trait]
impl ListSource for ProprietarioService {
    type Item = Proprietario;
    type Filter = ProprietarioFilter;
    const DEFAULT_SORT: &'static str = "nome";
    const SORT_FIELDS: &'static [&'static str] = &["id", "nome", "cpf", "telefone"];
    const LIST_ERROR: &'static str = "Erro ao listar registros!";

    async fn fetch(&self, request: &ListRequest) -> ClientResult<Page<Proprietario>> { self.list(request).await }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_strips_masks() {
        let input = ProprietarioInput { nome: " Maria ".into(), cpf: "123.456.789-01".into(), telefone: "(11) 98765-4321".into() };
        let body = input.to_body(7);
        assert_eq!(body, Proprietario { id: 7, cpf: "12345678901".into(), nome: "Maria".into(), telefone: "11987654321".into() });
    }
}
