use async_trait::async_trait;

use super::ApiClient;
use crate::error::ClientResult;
use crate::identity::{AuthProvider, Credentials, LoginOutcome, LoginResponse};

pub const LOGIN_PATH: &str = "/login";

#[async_trait]
impl AuthProvider for ApiClient {
    async fn authenticate(&self, credentials: &Credentials) -> ClientResult<LoginResponse> {
        self.post_json(LOGIN_PATH, credentials).await
    }
}

impl ApiClient {
    /// Log in against this backend and install the returned token in the shared session.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<LoginOutcome> {
        self.session().login(self, credentials).await
    }

    pub fn logout(&self) { self.session().logout() }
}
