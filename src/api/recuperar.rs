use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ClientResult;
use crate::validation::validate_password_reset;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Mensagem {
    pub mensagem: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordReset {
    pub username: String,
    #[serde(rename = "senhaProvisoria")]
    pub senha_provisoria: String,
    #[serde(rename = "novaSenha")]
    pub nova_senha: String,
}

#[derive(Serialize)]
struct IdBody {
    id: i64,
}

/// Temporary-password issuance (admin) and redemption (the user, logged in with the
/// temporary password).
#[derive(Clone)]
pub struct RecuperarService {
    client: Arc<ApiClient>,
}

impl RecuperarService {
    pub const GENERATE_PATH: &'static str = "/api/recuperar/gerar-senha";
    pub const RESET_PATH: &'static str = "/api/recuperar/redefinir-senha";

    pub fn new(client: Arc<ApiClient>) -> Self { Self { client } }

    pub async fn generate_temporary_password(&self, user_id: i64) -> ClientResult<Mensagem> {
        self.client.post_json(Self::GENERATE_PATH, &IdBody { id: user_id }).await
    }

    pub async fn reset_password(&self, reset: &PasswordReset) -> ClientResult<Mensagem> {
        validate_password_reset(reset)?;
        self.client.post_json(Self::RESET_PATH, reset).await
    }
}
