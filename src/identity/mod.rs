//! Session and authorization: the bearer token, the identity decoded from it, and the
//! route guard.

mod authorizer;
mod principal;
mod provider;
mod session;
mod store;

pub use authorizer::{authorize, Navigation, RouteGuard};
pub use principal::{decode_token, Principal};
pub use provider::{AuthProvider, Credentials, LoginOutcome, LoginResponse};
pub use session::{SessionManager, SessionSnapshot};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoredSession};

#[cfg(test)]
pub(crate) use principal::encode_test_token;
