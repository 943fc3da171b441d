use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ClientResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardMetrics {
    pub total_carros: u64,
    pub total_usuarios: u64,
    pub total_proprietarios: u64,
    pub total_marcas: u64,
}

#[derive(Clone)]
pub struct DashboardService {
    client: Arc<ApiClient>,
}

impl DashboardService {
    pub const PATH: &'static str = "/api/dashboard/metrics";

    pub fn new(client: Arc<ApiClient>) -> Self { Self { client } }

    pub async fn metrics(&self) -> ClientResult<DashboardMetrics> { self.client.get_json(Self::PATH, &[]).await }
}
