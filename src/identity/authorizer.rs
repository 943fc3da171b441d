use std::sync::Arc;

use tracing::debug;

use super::session::SessionManager;
use crate::routes::{App, DEFAULT_LANDING, LOGIN_ROUTE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    /// Denied; the caller should go to this path instead.
    Redirect(&'static str),
}

impl Navigation {
    pub fn is_allowed(&self) -> bool { matches!(self, Navigation::Allow) }
}

/// The guard rule on its own.
///
/// Not logged in sends the user to login. A non-empty `required` list that shares no
/// role with `roles` sends them to the default landing page. Anything else is allowed.
pub fn authorize<R: AsRef<str>>(logged_in: bool, roles: &[R], required: &[&str]) -> Navigation {
    if !logged_in {
        return Navigation::Redirect(LOGIN_ROUTE);
    }
    if required.is_empty() {
        return Navigation::Allow;
    }
    if roles.iter().any(|r| required.contains(&r.as_ref())) {
        Navigation::Allow
    } else {
        Navigation::Redirect(DEFAULT_LANDING)
    }
}

/// Guard over one console's route table, reading the live session.
pub struct RouteGuard {
    app: App,
    session: Arc<SessionManager>,
}

impl RouteGuard {
    pub fn new(app: App, session: Arc<SessionManager>) -> Self { Self { app, session } }

    pub fn app(&self) -> App { self.app }

    /// Decide a navigation to `path`. Public routes are always allowed; paths that match
    /// no route go to login, like the consoles' wildcard route.
    pub fn check(&self, path: &str) -> Navigation {
        if self.app.is_public(path) {
            return Navigation::Allow;
        }
        let Some(route) = self.app.find(path) else {
            debug!(target: "carro_admin::guard", path, "unknown route");
            return Navigation::Redirect(LOGIN_ROUTE);
        };
        let decision = authorize(self.session.is_logged_in(), &self.session.roles(), route.required_roles);
        debug!(target: "carro_admin::guard", path = route.path, ?decision, "navigation checked");
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::principal::encode_test_token;
    use crate::identity::store::MemorySessionStore;
    use serde_json::json;

    const ROLE_SETS: &[&[&str]] = &[&[], &["ADMIN"], &["GERENTE"], &["BASIC"], &["BASIC", "GERENTE"], &["OTHER"]];

    #[test]
    fn allow_iff_logged_in_and_role_overlap() {
        for required in ROLE_SETS {
            for held in ROLE_SETS {
                let overlap = held.iter().any(|h| required.contains(h));
                let expect_allow = required.is_empty() || overlap;
                assert_eq!(authorize(true, *held, *required).is_allowed(), expect_allow, "held {held:?} required {required:?}");
                assert_eq!(authorize(false, *held, *required), Navigation::Redirect("/login"));
            }
        }
        assert_eq!(authorize(true, &["BASIC"], &["ADMIN"]), Navigation::Redirect("/admin/home"));
    }

    #[test]
    fn guard_reads_live_session() {
        let session = Arc::new(SessionManager::new(Arc::new(MemorySessionStore::new())));
        let guard = RouteGuard::new(App::Carro, session.clone());
        assert_eq!(guard.check("/admin/carros"), Navigation::Redirect("/login"));
        assert!(guard.check("/login").is_allowed());
        assert!(guard.check("/redefinir-senha").is_allowed());

        session.set_token(&encode_test_token(&json!({"sub": "joao", "roles": ["BASIC"]}))).unwrap();
        assert!(guard.check("/admin/carros").is_allowed());
        assert!(guard.check("/admin/home").is_allowed());
        assert_eq!(guard.check("/admin/usuarios"), Navigation::Redirect("/admin/home"));
        assert_eq!(guard.check("/nowhere"), Navigation::Redirect("/login"));

        session.logout();
        assert_eq!(guard.check("/admin/home"), Navigation::Redirect("/login"));
    }
}
