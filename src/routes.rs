//! Route tables of the two admin consoles, as data.
//!
//! Every admin command in the CLI is bound to one of these paths and goes through the
//! guard before it runs.

pub const LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_LANDING: &str = "/admin/home";
pub const PASSWORD_RESET_ROUTE: &str = "/redefinir-senha";

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_GERENTE: &str = "GERENTE";
pub const ROLE_BASIC: &str = "BASIC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    /// Empty means any logged-in user.
    pub required_roles: &'static [&'static str],
    /// Menu label; `None` for routes that are not menu entries.
    pub label: Option<&'static str>,
}

impl Route {
    const fn new(path: &'static str, required_roles: &'static [&'static str], label: Option<&'static str>) -> Self {
        Self { path, required_roles, label }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum App {
    /// Vehicle console: cars, owners, brands, users.
    Carro,
    /// Portal console: brands, users, document folders.
    Portal,
}

const ALL: &[&str] = &[ROLE_ADMIN, ROLE_BASIC, ROLE_GERENTE];
const ADMIN_OR_GERENTE: &[&str] = &[ROLE_ADMIN, ROLE_GERENTE];
const ADMIN_ONLY: &[&str] = &[ROLE_ADMIN];

pub const HOME: Route = Route::new("/admin/home", ALL, Some("Início"));
pub const CARROS: Route = Route::new("/admin/carros", &[], Some("Carros"));
pub const CARROS_GERENCIAR: Route = Route::new("/admin/carros/gerenciar", &[], None);
pub const PROPRIETARIOS: Route = Route::new("/admin/proprietarios", &[], Some("Proprietários"));
pub const PROPRIETARIOS_GERENCIAR: Route = Route::new("/admin/proprietarios/gerenciar", &[], None);
pub const MARCAS_CONSULTA: Route = Route::new("/admin/marcas/consulta", ADMIN_OR_GERENTE, Some("Consultar marcas"));
pub const MARCAS_GERENCIAR: Route = Route::new("/admin/marcas/gerenciar", ADMIN_ONLY, Some("Gerenciar marcas"));
pub const USUARIOS: Route = Route::new("/admin/usuarios", ADMIN_ONLY, Some("Usuários"));
pub const USUARIOS_GERENCIAR: Route = Route::new("/admin/usuarios/gerenciar", ADMIN_ONLY, None);
pub const PASTAS_CONSULTA: Route = Route::new("/admin/pastas/consulta", ADMIN_OR_GERENTE, Some("Consultar pastas"));
pub const PASTAS_GERENCIAR: Route = Route::new("/admin/pastas/gerenciar", ADMIN_ONLY, Some("Gerenciar pastas"));

const CARRO_ROUTES: &[Route] = &[
    HOME,
    CARROS,
    CARROS_GERENCIAR,
    PROPRIETARIOS,
    PROPRIETARIOS_GERENCIAR,
    MARCAS_CONSULTA,
    MARCAS_GERENCIAR,
    USUARIOS,
    USUARIOS_GERENCIAR,
];

const PORTAL_ROUTES: &[Route] = &[
    HOME,
    MARCAS_CONSULTA,
    MARCAS_GERENCIAR,
    PASTAS_CONSULTA,
    PASTAS_GERENCIAR,
    USUARIOS,
    USUARIOS_GERENCIAR,
];

const CARRO_PUBLIC: &[&str] = &[LOGIN_ROUTE, PASSWORD_RESET_ROUTE];
const PORTAL_PUBLIC: &[&str] = &[LOGIN_ROUTE, "/home", "/protocolos"];

impl App {
    pub fn routes(self) -> &'static [Route] {
        match self {
            App::Carro => CARRO_ROUTES,
            App::Portal => PORTAL_ROUTES,
        }
    }

    pub fn public_routes(self) -> &'static [&'static str] {
        match self {
            App::Carro => CARRO_PUBLIC,
            App::Portal => PORTAL_PUBLIC,
        }
    }

    /// Guarded route for `path`. `/admin` and `/admin/` resolve to the home route.
    pub fn find(self, path: &str) -> Option<&'static Route> {
        let p = normalize(path);
        let p = if p == "/admin" { DEFAULT_LANDING } else { p };
        self.routes().iter().find(|r| r.path == p)
    }

    pub fn is_public(self, path: &str) -> bool {
        let p = normalize(path);
        self.public_routes()
            .iter()
            .any(|pub_path| p == *pub_path || (p.starts_with(pub_path) && p[pub_path.len()..].starts_with('/')))
    }

    /// Menu entries whose guard would let a user holding `roles` through.
    pub fn visible_menu<S: AsRef<str>>(self, roles: &[S]) -> Vec<&'static Route> {
        self.routes()
            .iter()
            .filter(|r| r.label.is_some())
            .filter(|r| r.required_roles.is_empty() || r.required_roles.iter().any(|req| roles.iter().any(|h| h.as_ref() == *req)))
            .collect()
    }
}

fn normalize(path: &str) -> &str {
    let p = path.split(|c| c == '?' || c == '#').next().unwrap_or(path);
    if p.len() > 1 { p.trim_end_matches('/') } else { p }
}
