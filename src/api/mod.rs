//! Typed client for the administration REST API.

mod arquivos;
mod auth;
mod carro;
mod client;
mod dashboard;
mod marca;
mod proprietario;
mod recuperar;
mod relatorio;
mod resource;
mod role;
mod usuario;

use std::sync::Arc;

pub use arquivos::{ArquivosService, ItemDto};
pub use auth::LOGIN_PATH;
pub use carro::{Carro, CarroCreate, CarroInput, CarroService};
pub use client::ApiClient;
pub use dashboard::{DashboardMetrics, DashboardService};
pub use marca::{Marca, MarcaConsulta, MarcaInput, MarcaService};
pub use proprietario::{Proprietario, ProprietarioInput, ProprietarioService};
pub use recuperar::{Mensagem, PasswordReset, RecuperarService};
pub use relatorio::{MarcaReportQuery, RelatorioService, Report, ReportFormat};
pub use resource::IdRef;
pub use role::{Role, RoleService};
pub use usuario::{Usuario, UsuarioInput, UsuarioLogado, UsuarioService, UsuarioUpdate};

/// Every service over one shared client.
#[derive(Clone)]
pub struct Services {
    pub client: Arc<ApiClient>,
    pub carros: CarroService,
    pub proprietarios: ProprietarioService,
    pub marcas: MarcaService,
    pub usuarios: UsuarioService,
    pub roles: RoleService,
    pub recuperar: RecuperarService,
    pub dashboard: DashboardService,
    pub arquivos: ArquivosService,
    pub relatorios: RelatorioService,
}

impl Services {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            carros: CarroService::new(client.clone()),
            proprietarios: ProprietarioService::new(client.clone()),
            marcas: MarcaService::new(client.clone()),
            usuarios: UsuarioService::new(client.clone()),
            roles: RoleService::new(client.clone()),
            recuperar: RecuperarService::new(client.clone()),
            dashboard: DashboardService::new(client.clone()),
            arquivos: ArquivosService::new(client.clone()),
            relatorios: RelatorioService::new(client.clone()),
            client,
        }
    }
}
