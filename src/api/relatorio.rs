use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;

use super::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::listing::SortDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Xls,
    Csv,
}

impl ReportFormat {
    /// Value of the `formato` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Xls => "xls",
            ReportFormat::Csv => "csv",
        }
    }

    /// Saved spreadsheets use the modern extension.
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Xls => "xlsx",
            other => other.as_str(),
        }
    }

    fn default_content_type(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Xls => "application/vnd.ms-excel",
            ReportFormat::Csv => "text/csv",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ReportFormat {
    type Err = ClientError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ReportFormat::Pdf),
            "xls" | "xlsx" | "excel" => Ok(ReportFormat::Xls),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(ClientError::validation("formato", format!("formato inválido: {other} (use pdf, xls ou csv)"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

/// Filters of the brand report; mirrors the brand list the user is looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarcaReportQuery {
    pub nome: Option<String>,
    pub sort_field: Option<String>,
    pub sort_dir: Option<SortDirection>,
}

#[derive(Clone)]
pub struct RelatorioService {
    client: Arc<ApiClient>,
}

impl RelatorioService {
    pub const PATH: &'static str = "/api/relatorios";

    pub fn new(client: Arc<ApiClient>) -> Self { Self { client } }

    pub async fn marcas(&self, formato: ReportFormat, query: &MarcaReportQuery) -> ClientResult<Report> {
        let mut params = vec![("formato".to_string(), formato.as_str().to_string())];
        if let Some(n) = query.nome.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            params.push(("nome".to_string(), n.to_string()));
        }
        if let Some(f) = query.sort_field.as_deref().filter(|f| !f.is_empty()) {
            params.push(("sortField".to_string(), f.to_string()));
        }
        if let Some(d) = query.sort_dir {
            params.push(("sortDir".to_string(), d.as_str().to_string()));
        }
        self.fetch("marcas", formato, &params).await
    }

    pub async fn carros(&self, formato: ReportFormat, data_inicial: Option<NaiveDate>, data_final: Option<NaiveDate>) -> ClientResult<Report> {
        if let (Some(a), Some(b)) = (data_inicial, data_final) {
            if a > b {
                return Err(ClientError::validation("dataInicial", "A data inicial deve ser anterior à data final."));
            }
        }
        let mut params = vec![("formato".to_string(), formato.as_str().to_string())];
        if let Some(d) = data_inicial {
            params.push(("dataInicial".to_string(), d.format("%Y-%m-%d").to_string()));
        }
        if let Some(d) = data_final {
            params.push(("dataFinal".to_string(), d.format("%Y-%m-%d").to_string()));
        }
        self.fetch("carros", formato, &params).await
    }

    async fn fetch(&self, kind: &str, formato: ReportFormat, params: &[(String, String)]) -> ClientResult<Report> {
        let (bytes, content_type) = self.client.get_bytes(&format!("{}/{}", Self::PATH, kind), params).await?;
        Ok(Report {
            bytes,
            content_type: content_type.unwrap_or_else(|| formato.default_content_type().to_string()),
            filename: format!("relatorio-{}.{}", kind, formato.extension()),
        })
    }
}
