pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod folders;
pub mod identity;
pub mod listing;
pub mod logging;
pub mod notify;
pub mod routes;
pub mod validation;

pub use api::{ApiClient, Services};
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use identity::{RouteGuard, SessionManager};
pub use notify::Toasts;
pub use routes::App;
