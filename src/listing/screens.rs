use crate::api::{MarcaConsulta, MarcaReportQuery, MarcaService, RelatorioService, Report, ReportFormat};
use crate::error::ClientResult;
use crate::notify::Toasts;

use super::{ListController, MarcaFilter, SortDirection};

/// Brand lookup screen: a brand list plus report export of exactly what is listed.
pub struct MarcaReportScreen {
    list: ListController<MarcaConsulta>,
    relatorios: RelatorioService,
}

impl MarcaReportScreen {
    pub fn new(marcas: MarcaService, relatorios: RelatorioService, size: u32) -> Self {
        Self { list: ListController::new(MarcaConsulta(marcas), size), relatorios }
    }

    pub fn with_toasts(mut self, toasts: Toasts) -> Self {
        self.list = self.list.with_toasts(toasts);
        self
    }

    /// Initial sort, applied before the first search.
    pub fn with_sort(mut self, field: &str, dir: SortDirection) -> ClientResult<Self> {
        self.list = self.list.with_sort(field, dir)?;
        Ok(self)
    }

    pub fn list(&self) -> &ListController<MarcaConsulta> { &self.list }

    pub fn list_mut(&mut self) -> &mut ListController<MarcaConsulta> { &mut self.list }

    pub async fn search(&mut self, nome: &str) -> ClientResult<()> {
        self.list.apply_filter(MarcaFilter { nome: Some(nome.to_string()) }).await
    }

    pub async fn search_all(&mut self) -> ClientResult<()> { self.list.clear_filter().await }

    /// Report parameters for the current filter and sort.
    pub fn report_query(&self) -> MarcaReportQuery {
        let state = self.list.state();
        MarcaReportQuery {
            nome: self.list.filter().nome.clone(),
            sort_field: Some(state.sort_field.clone()),
            sort_dir: Some(state.sort_dir),
        }
    }

    pub async fn generate(&self, formato: ReportFormat) -> ClientResult<Report> {
        self.relatorios.marcas(formato, &self.report_query()).await
    }
}
