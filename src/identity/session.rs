//! The single owned session: bearer token plus the identity decoded from it.
//!
//! Durable state lives in a [`SessionStore`]; the in-memory mirror is published through
//! `watch` channels so observers get the current value on subscribe and every change
//! after. Only [`SessionManager::login`], [`SessionManager::set_token`] and
//! [`SessionManager::logout`] write.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::principal::{decode_token, Principal};
use super::provider::{AuthProvider, Credentials, LoginOutcome};
use super::store::{SessionStore, StoredSession};
use crate::error::{ClientError, ClientResult};
use crate::validation;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub principal: Option<Principal>,
}

impl SessionSnapshot {
    pub fn is_logged_in(&self) -> bool { self.token.is_some() && self.principal.is_some() }
}

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    state: RwLock<SessionSnapshot>,
    logged_in: watch::Sender<bool>,
    username: watch::Sender<Option<String>>,
    roles: watch::Sender<Vec<String>>,
}

impl SessionManager {
    /// Start logged out, ignoring whatever the store holds.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (logged_in, _) = watch::channel(false);
        let (username, _) = watch::channel(None);
        let (roles, _) = watch::channel(Vec::new());
        Self { store, state: RwLock::new(SessionSnapshot::default()), logged_in, username, roles }
    }

    /// Start from the durable store. A stored token that no longer decodes is treated as a
    /// corrupt session and wiped.
    pub fn restore(store: Arc<dyn SessionStore>) -> Self {
        let sm = Self::new(store);
        let stored = match sm.store.load() {
            Ok(s) => s,
            Err(e) => {
                warn!(target: "carro_admin::session", error = %e, "stored session unreadable; starting logged out");
                sm.clear_session();
                return sm;
            }
        };
        if let Some(token) = stored.token {
            match sm.set_token(&token) {
                Ok(p) => info!(target: "carro_admin::session", user = %p.username, "session restored"),
                Err(e) => warn!(target: "carro_admin::session", error = %e, "stored token discarded"),
            }
        }
        sm
    }

    /// Trade credentials for a token through `provider` and install it.
    ///
    /// Validation and backend failures leave the current session untouched. A 401 from the
    /// login endpoint is reported as [`ClientError::InvalidCredentials`].
    pub async fn login(&self, provider: &dyn AuthProvider, credentials: &Credentials) -> ClientResult<LoginOutcome> {
        validation::validate_credentials(credentials)?;
        let resp = provider.authenticate(credentials).await.map_err(|e| match e {
            ClientError::Unauthorized { .. } => ClientError::InvalidCredentials,
            other => other,
        })?;
        if resp.access_token.trim().is_empty() {
            return Err(ClientError::decode("login response carried no access token"));
        }
        let principal = self.set_token(&resp.access_token)?;
        info!(
            target: "carro_admin::session",
            user = %principal.username,
            roles = ?principal.roles,
            temporary_password = resp.temporary_password,
            "login succeeded"
        );
        Ok(LoginOutcome { principal, expires_in: resp.expires_in, temporary_password: resp.temporary_password })
    }

    /// Replace the session with `token`. If it does not decode the session is cleared,
    /// exactly as on logout, and the decode error is returned.
    pub fn set_token(&self, token: &str) -> ClientResult<Principal> {
        let principal = match decode_token(token) {
            Ok(p) => p,
            Err(e) => {
                warn!(target: "carro_admin::session", error = %e, "token failed to decode; clearing session");
                self.clear_session();
                return Err(e);
            }
        };
        let stored = StoredSession {
            token: Some(token.to_string()),
            username: Some(principal.username.clone()),
            roles: principal.roles.clone(),
        };
        self.store.save(&stored)?;
        {
            let mut st = self.state.write();
            st.token = Some(token.to_string());
            st.principal = Some(principal.clone());
        }
        self.publish(true, Some(principal.username.clone()), principal.roles.clone());
        debug!(target: "carro_admin::session", user = %principal.username, "token installed");
        Ok(principal)
    }

    pub fn logout(&self) {
        self.clear_session();
        info!(target: "carro_admin::session", "logged out");
    }

    fn clear_session(&self) {
        if let Err(e) = self.store.clear() {
            warn!(target: "carro_admin::session", error = %e, "failed to clear stored session");
        }
        *self.state.write() = SessionSnapshot::default();
        self.publish(false, None, Vec::new());
    }

    fn publish(&self, logged_in: bool, username: Option<String>, roles: Vec<String>) {
        self.logged_in.send_replace(logged_in);
        self.username.send_replace(username);
        self.roles.send_replace(roles);
    }

    pub fn token(&self) -> Option<String> { self.state.read().token.clone() }

    pub fn is_logged_in(&self) -> bool { self.state.read().is_logged_in() }

    pub fn username(&self) -> Option<String> {
        self.state.read().principal.as_ref().map(|p| p.username.clone())
    }

    pub fn roles(&self) -> Vec<String> {
        self.state.read().principal.as_ref().map(|p| p.roles.clone()).unwrap_or_default()
    }

    pub fn principal(&self) -> Option<Principal> { self.state.read().principal.clone() }

    pub fn snapshot(&self) -> SessionSnapshot { self.state.read().clone() }

    pub fn subscribe_logged_in(&self) -> watch::Receiver<bool> { self.logged_in.subscribe() }

    pub fn subscribe_username(&self) -> watch::Receiver<Option<String>> { self.username.subscribe() }

    pub fn subscribe_roles(&self) -> watch::Receiver<Vec<String>> { self.roles.subscribe() }
}
