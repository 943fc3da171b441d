//! Unified client error model.
//! Every failure surfaced by the library (form validation, transport, backend responses,
//! session storage) is one `ClientError` variant, plus helpers that turn it into the
//! short user-facing text shown in notifications.

use thiserror::Error;

/// Fallback text used when the backend gives no usable message.
pub const GENERIC_FAILURE: &str = "Erro ao processar requisição";
pub const INVALID_CREDENTIALS: &str = "Credenciais inválidas. Verifique seu usuário e senha.";
pub const SERVER_UNREACHABLE: &str = "Não foi possível conectar ao servidor de backend. Por favor, verifique sua conexão ou tente novamente mais tarde.";
pub const AUTH_REQUIRED: &str = "Você precisa estar autenticado para acessar este recurso.";
pub const DUPLICATE_CPF: &str = "Este CPF já está cadastrado. Por favor, use outro CPF.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Rejected before dispatch; never reaches the backend.
    #[error("validation failed on '{field}': {message}")]
    Validation { field: String, message: String },
    /// 401 on the login endpoint.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// 401 on any other endpoint.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },
    #[error("forbidden: {message}")]
    Forbidden { message: String },
    /// Transport-level failure, no HTTP status available.
    #[error("server unreachable: {message}")]
    Unreachable { message: String },
    /// Domain conflict reported by the backend, bound to a form field.
    #[error("conflict on '{field}': {message}")]
    Conflict { field: String, message: String },
    #[error("backend error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("decode error: {message}")]
    Decode { message: String },
    #[error("session storage error: {message}")]
    Storage { message: String },
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ClientError {
    pub fn validation<S: Into<String>, M: Into<String>>(field: S, msg: M) -> Self {
        ClientError::Validation { field: field.into(), message: msg.into() }
    }
    pub fn conflict<S: Into<String>, M: Into<String>>(field: S, msg: M) -> Self {
        ClientError::Conflict { field: field.into(), message: msg.into() }
    }
    pub fn decode<M: Into<String>>(msg: M) -> Self { ClientError::Decode { message: msg.into() } }
    pub fn storage<M: Into<String>>(msg: M) -> Self { ClientError::Storage { message: msg.into() } }
    pub fn config<M: Into<String>>(msg: M) -> Self { ClientError::Config { message: msg.into() } }
    pub fn unreachable<M: Into<String>>(msg: M) -> Self { ClientError::Unreachable { message: msg.into() } }

    pub fn code_str(&self) -> &'static str {
        match self {
            ClientError::Validation { .. } => "validation",
            ClientError::InvalidCredentials => "invalid_credentials",
            ClientError::Unauthorized { .. } => "unauthorized",
            ClientError::Forbidden { .. } => "forbidden",
            ClientError::Unreachable { .. } => "unreachable",
            ClientError::Conflict { .. } => "conflict",
            ClientError::Api { .. } => "api_error",
            ClientError::Decode { .. } => "decode_error",
            ClientError::Storage { .. } => "storage_error",
            ClientError::Config { .. } => "config_error",
        }
    }

    /// HTTP status the error came from, when there was one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ClientError::InvalidCredentials | ClientError::Unauthorized { .. } => Some(401),
            ClientError::Forbidden { .. } => Some(403),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Field a form should highlight, for validation and conflict errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            ClientError::Validation { field, .. } | ClientError::Conflict { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::InvalidCredentials | ClientError::Unauthorized { .. })
    }

    /// Text for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation { message, .. } | ClientError::Conflict { message, .. } => message.clone(),
            ClientError::InvalidCredentials => INVALID_CREDENTIALS.to_string(),
            ClientError::Unauthorized { .. } => AUTH_REQUIRED.to_string(),
            ClientError::Forbidden { message } => message.clone(),
            ClientError::Unreachable { .. } => SERVER_UNREACHABLE.to_string(),
            ClientError::Api { status, message } => format!("Ocorreu um erro: {} - {}.", status, message),
            ClientError::Decode { .. } | ClientError::Storage { .. } | ClientError::Config { .. } => GENERIC_FAILURE.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self { ClientError::Storage { message: err.to_string() } }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self { ClientError::Decode { message: err.to_string() } }
}
