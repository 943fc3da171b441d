use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::principal::Principal;
use crate::error::ClientResult;
use crate::routes::{DEFAULT_LANDING, PASSWORD_RESET_ROUTE};

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

// Keep passwords out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("username", &self.username).field("password", &"***").finish()
    }
}

/// Body returned by `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "expiresIn", default)]
    pub expires_in: Option<i64>,
    #[serde(rename = "temporaryPassword", alias = "senhaProvisoria", default)]
    pub temporary_password: bool,
}

/// Anything that can trade credentials for a bearer token.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> ClientResult<LoginResponse>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub principal: Principal,
    pub expires_in: Option<i64>,
    /// The account must change its password before using the admin area.
    pub temporary_password: bool,
}

impl LoginOutcome {
    /// Where the caller should go next.
    pub fn landing(&self) -> &'static str {
        if self.temporary_password { PASSWORD_RESET_ROUTE } else { DEFAULT_LANDING }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_accepts_both_flag_spellings() {
        let a: LoginResponse = serde_json::from_str(r#"{"accessToken":"t","expiresIn":36000,"senhaProvisoria":true}"#).unwrap();
        assert!(a.temporary_password);
        assert_eq!(a.expires_in, Some(36000));
        let b: LoginResponse = serde_json::from_str(r#"{"accessToken":"t","temporaryPassword":false}"#).unwrap();
        assert!(!b.temporary_password);
        let c: LoginResponse = serde_json::from_str(r#"{"accessToken":"t"}"#).unwrap();
        assert!(!c.temporary_password);
    }

    #[test]
    fn landing_depends_on_temporary_password() {
        let mut out = LoginOutcome { principal: Principal::default(), expires_in: None, temporary_password: false };
        assert_eq!(out.landing(), "/admin/home");
        out.temporary_password = true;
        assert_eq!(out.landing(), "/redefinir-senha");
    }

    #[test]
    fn debug_hides_password() {
        let c = Credentials::new("maria", "segredo");
        assert!(!format!("{c:?}").contains("segredo"));
    }
}
