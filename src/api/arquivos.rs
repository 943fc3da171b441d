use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ClientResult;

/// Entry of the public document tree.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ItemDto {
    pub nome: String,
    #[serde(rename = "isDiretorio", default)]
    pub is_diretorio: bool,
    /// Bytes, files only.
    #[serde(default)]
    pub tamanho: Option<f64>,
    /// Entry count, directories only.
    #[serde(default)]
    pub contagem: Option<u64>,
    #[serde(default)]
    pub filhos: Option<Vec<ItemDto>>,
}

/// Public document folders. Requests here never carry a token.
#[derive(Clone)]
pub struct ArquivosService {
    client: Arc<ApiClient>,
}

impl ArquivosService {
    pub const PATH: &'static str = "/api/publico/arquivos";

    pub fn new(client: Arc<ApiClient>) -> Self { Self { client } }

    fn caminho_query(caminho: Option<&str>) -> Vec<(String, String)> {
        caminho
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| vec![("caminho".to_string(), c.to_string())])
            .unwrap_or_default()
    }

    pub async fn list(&self, caminho: Option<&str>) -> ClientResult<Vec<ItemDto>> {
        self.client.get_json(Self::PATH, &Self::caminho_query(caminho)).await
    }

    pub async fn download(&self, caminho: &str) -> ClientResult<Vec<u8>> {
        let path = format!("{}/download", Self::PATH);
        let (bytes, _) = self.client.get_bytes(&path, &Self::caminho_query(Some(caminho))).await?;
        Ok(bytes)
    }

    /// Link that opens the file inline.
    pub fn view_url(&self, caminho: &str) -> String {
        format!("{}?caminho={}", self.client.url(&format!("{}/view", Self::PATH)), urlencoding::encode(caminho))
    }

    pub fn download_url(&self, caminho: &str) -> String {
        format!("{}?caminho={}", self.client.url(&format!("{}/download", Self::PATH)), urlencoding::encode(caminho))
    }
}
