use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde::Serialize;
use tracing::{debug, info};

use carro_admin::api::{
    CarroInput, ItemDto, MarcaConsulta, MarcaInput, PasswordReset, ProprietarioInput, ReportFormat, Services, UsuarioInput, UsuarioUpdate,
};
use carro_admin::cli::browse::{self, BrowseCommand};
use carro_admin::cli::{Printer, TableRow};
use carro_admin::error::{ClientError, AUTH_REQUIRED};
use carro_admin::folders::{Entered, FolderBrowser};
use carro_admin::identity::{Credentials, FileSessionStore, Navigation, RouteGuard, SessionManager};
use carro_admin::listing::screens::MarcaReportScreen;
use carro_admin::listing::{
    CarroFilter, ListController, ListSource, MarcaFilter, ProprietarioFilter, SortDirection, UsuarioFilter,
};
use carro_admin::routes::{self, App, Route};
use carro_admin::{logging, ApiClient, Config, Toasts};

#[derive(Parser)]
#[command(name = "carro-admin", version, about = "Console de administração: carros, proprietários, marcas, usuários e pastas públicas")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "CARRO_API_URL")]
    api_url: Option<String>,

    /// Session file
    #[arg(long, env = "CARRO_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Console whose route table gates the commands
    #[arg(long, value_enum, default_value = "carro", global = true)]
    app: AppArg,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum AppArg {
    Carro,
    Portal,
}

impl From<AppArg> for App {
    fn from(a: AppArg) -> Self {
        match a {
            AppArg::Carro => App::Carro,
            AppArg::Portal => App::Portal,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session
    Login {
        #[arg(long, short)]
        username: Option<String>,
        #[arg(long, env = "CARRO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami {
        /// Ask the backend instead of reading the token
        #[arg(long)]
        remote: bool,
    },
    /// Menu entries visible to the current user
    Menu,
    /// Record counts
    Dashboard,
    /// Cars
    #[command(subcommand)]
    Carros(CarroCmd),
    /// Owners
    #[command(subcommand)]
    Proprietarios(ProprietarioCmd),
    /// Brands
    #[command(subcommand)]
    Marcas(MarcaCmd),
    /// Users
    #[command(subcommand)]
    Usuarios(UsuarioCmd),
    /// Available roles
    Roles,
    /// Page through a list interactively
    Browse {
        #[arg(value_enum)]
        lista: BrowseTarget,
    },
    /// Export a report
    #[command(subcommand)]
    Report(ReportCmd),
    /// Public document folders
    #[command(subcommand)]
    Files(FilesCmd),
    /// Temporary passwords
    #[command(subcommand)]
    Password(PasswordCmd),
}

#[derive(Args, Clone)]
struct ListOpts {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    size: Option<u32>,
    /// Sort field
    #[arg(long)]
    sort: Option<String>,
    /// asc or desc
    #[arg(long)]
    dir: Option<SortDirection>,
}

#[derive(Subcommand)]
enum CarroCmd {
    List {
        #[arg(long)]
        modelo: Option<String>,
        #[arg(long)]
        marca: Option<String>,
        #[arg(long)]
        ano: Option<i32>,
        #[command(flatten)]
        opts: ListOpts,
    },
    Get { id: i64 },
    Create(CarroArgs),
    Update {
        id: i64,
        #[command(flatten)]
        args: CarroArgs,
    },
    Delete { id: i64 },
}

#[derive(Args)]
struct CarroArgs {
    #[arg(long)]
    modelo: String,
    #[arg(long)]
    cor: String,
    #[arg(long)]
    ano: i32,
    /// Brand id
    #[arg(long)]
    marca: i64,
    /// Owner id; repeat for several owners
    #[arg(long = "proprietario")]
    proprietarios: Vec<i64>,
}

impl From<CarroArgs> for CarroInput {
    fn from(a: CarroArgs) -> Self {
        CarroInput { modelo: a.modelo, cor: a.cor, ano: a.ano, marca_id: Some(a.marca), proprietario_ids: a.proprietarios }
    }
}

#[derive(Subcommand)]
enum ProprietarioCmd {
    List {
        /// Name or CPF
        #[arg(long)]
        busca: Option<String>,
        #[command(flatten)]
        opts: ListOpts,
    },
    Get { id: i64 },
    Create(ProprietarioArgs),
    Update {
        id: i64,
        #[command(flatten)]
        args: ProprietarioArgs,
    },
    Delete { id: i64 },
}

#[derive(Args)]
struct ProprietarioArgs {
    #[arg(long)]
    nome: String,
    #[arg(long)]
    cpf: String,
    #[arg(long)]
    telefone: String,
}

impl From<ProprietarioArgs> for ProprietarioInput {
    fn from(a: ProprietarioArgs) -> Self { ProprietarioInput { nome: a.nome, cpf: a.cpf, telefone: a.telefone } }
}

#[derive(Subcommand)]
enum MarcaCmd {
    List {
        #[arg(long)]
        nome: Option<String>,
        #[command(flatten)]
        opts: ListOpts,
    },
    Get { id: i64 },
    Create {
        #[arg(long)]
        nome: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        nome: String,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum UsuarioCmd {
    List {
        #[arg(long)]
        username: Option<String>,
        #[command(flatten)]
        opts: ListOpts,
    },
    Get { id: i64 },
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Role name; repeat for several roles
        #[arg(long = "role")]
        roles: Vec<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        username: String,
        /// Leave out to keep the current password
        #[arg(long)]
        password: Option<String>,
        #[arg(long = "role")]
        roles: Vec<String>,
    },
    Delete { id: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
enum BrowseTarget {
    Carros,
    Proprietarios,
    Marcas,
    Usuarios,
    Files,
}

#[derive(Subcommand)]
enum ReportCmd {
    /// Brand report over the filtered, sorted brand list
    Marcas {
        #[arg(long, default_value = "pdf")]
        formato: ReportFormat,
        #[arg(long)]
        nome: Option<String>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        dir: Option<SortDirection>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Car report, optionally over a date range (YYYY-MM-DD)
    Carros {
        #[arg(long, default_value = "pdf")]
        formato: ReportFormat,
        #[arg(long)]
        de: Option<NaiveDate>,
        #[arg(long)]
        ate: Option<NaiveDate>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum FilesCmd {
    Ls { caminho: Option<String> },
    Download {
        caminho: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the view and download links
    Url { caminho: String },
}

#[derive(Subcommand)]
enum PasswordCmd {
    /// Issue a temporary password for a user
    Generate { id: i64 },
    /// Replace a temporary password
    Reset {
        #[arg(long)]
        username: String,
        #[arg(long)]
        provisoria: String,
        #[arg(long)]
        nova: String,
    },
}

struct Ctx {
    cfg: Config,
    session: Arc<SessionManager>,
    services: Services,
    guard: RouteGuard,
    toasts: Toasts,
    printer: Printer,
}

impl Ctx {
    fn build(cli: &Cli) -> Result<Self> {
        let mut cfg = Config::from_env().context("invalid CARRO_* configuration")?;
        if let Some(url) = &cli.api_url {
            cfg.api_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(p) = &cli.session_file {
            cfg.session_file = p.clone();
        }
        cfg.validate()?;
        let session = Arc::new(SessionManager::restore(Arc::new(FileSessionStore::new(cfg.session_file.clone()))));
        let client = Arc::new(ApiClient::new(&cfg, session.clone())?);
        debug!(target: "carro_admin::cli", api = %cfg.api_url, session_file = %cfg.session_file.display(), "context ready");
        Ok(Self {
            guard: RouteGuard::new(cli.app.into(), session.clone()),
            services: Services::new(client),
            toasts: Toasts::new(cfg.toast_ttl()),
            printer: Printer::new(cli.json),
            session,
            cfg,
        })
    }

    /// Refuse the command unless the bound route lets the current user in.
    fn enter(&self, route: Route) -> Result<()> {
        self.enter_path(route.path)
    }

    fn enter_path(&self, path: &str) -> Result<()> {
        match self.guard.check(path) {
            Navigation::Allow => Ok(()),
            Navigation::Redirect(to) if to == routes::LOGIN_ROUTE => {
                bail!("{AUTH_REQUIRED} Use `carro-admin login`.")
            }
            Navigation::Redirect(_) => bail!("Acesso negado: seu perfil não permite acessar {path}."),
        }
    }

    fn page_size(&self, opts: &ListOpts) -> u32 { opts.size.unwrap_or(self.cfg.page_size) }

    fn done(&self, text: &str) -> Result<()> {
        self.toasts.success(text);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("carro_admin=warn");
    let cli = Cli::parse();
    let ctx = Ctx::build(&cli)?;
    let outcome = run(&ctx, cli.command).await;
    ctx.printer.flush_toasts(&ctx.toasts);
    if let Err(e) = outcome {
        match e.downcast_ref::<ClientError>() {
            Some(ce) => eprintln!("erro: {}", ce.user_message()),
            None => eprintln!("erro: {e:#}"),
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(ctx: &Ctx, command: Command) -> Result<()> {
    let s = &ctx.services;
    match command {
        Command::Login { username, password } => cmd_login(ctx, username, password).await,
        Command::Logout => {
            s.client.logout();
            ctx.printer.message("Sessão encerrada.")?;
            Ok(())
        }
        Command::Whoami { remote } => cmd_whoami(ctx, remote).await,
        Command::Menu => {
            ctx.enter(routes::HOME)?;
            let menu: Vec<_> = ctx.guard.app().visible_menu(&ctx.session.roles()).into_iter().filter_map(|r| r.label.map(|l| (l, r.path))).collect();
            if ctx.printer.is_json() {
                let entries: Vec<_> = menu.iter().map(|(l, p)| serde_json::json!({ "label": l, "path": p })).collect();
                ctx.printer.json(&entries)?;
            } else {
                for (label, path) in menu {
                    println!("{label:<20} {path}");
                }
            }
            Ok(())
        }
        Command::Dashboard => {
            ctx.enter(routes::HOME)?;
            let m = s.dashboard.metrics().await?;
            ctx.printer.fields(
                &m,
                &[
                    ("Carros", m.total_carros.to_string()),
                    ("Proprietários", m.total_proprietarios.to_string()),
                    ("Marcas", m.total_marcas.to_string()),
                    ("Usuários", m.total_usuarios.to_string()),
                ],
            )?;
            Ok(())
        }
        Command::Carros(cmd) => cmd_carros(ctx, cmd).await,
        Command::Proprietarios(cmd) => cmd_proprietarios(ctx, cmd).await,
        Command::Marcas(cmd) => cmd_marcas(ctx, cmd).await,
        Command::Usuarios(cmd) => cmd_usuarios(ctx, cmd).await,
        Command::Roles => {
            ctx.enter(routes::USUARIOS_GERENCIAR)?;
            ctx.printer.items(&s.roles.all().await?)?;
            Ok(())
        }
        Command::Browse { lista } => match lista {
            BrowseTarget::Carros => browse_list(ctx, routes::CARROS, s.carros.clone()).await,
            BrowseTarget::Proprietarios => browse_list(ctx, routes::PROPRIETARIOS, s.proprietarios.clone()).await,
            BrowseTarget::Marcas => browse_list(ctx, routes::MARCAS_GERENCIAR, s.marcas.clone()).await,
            BrowseTarget::Usuarios => browse_list(ctx, routes::USUARIOS, s.usuarios.clone()).await,
            BrowseTarget::Files => browse_files(ctx).await,
        },
        Command::Report(cmd) => cmd_report(ctx, cmd).await,
        Command::Files(cmd) => cmd_files(ctx, cmd).await,
        Command::Password(cmd) => cmd_password(ctx, cmd).await,
    }
}

fn prompt(editor: &mut DefaultEditor, label: &str) -> Result<String> {
    match editor.readline(label) {
        Ok(line) => Ok(line.trim().to_string()),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => bail!("cancelado"),
        Err(e) => Err(e.into()),
    }
}

async fn cmd_login(ctx: &Ctx, username: Option<String>, password: Option<String>) -> Result<()> {
    let (username, password) = match (username, password) {
        (Some(u), Some(p)) => (u, p),
        (u, p) => {
            let mut editor = DefaultEditor::new()?;
            let u = match u {
                Some(u) => u,
                None => prompt(&mut editor, "Usuário: ")?,
            };
            let p = match p {
                Some(p) => p,
                None => prompt(&mut editor, "Senha: ")?,
            };
            (u, p)
        }
    };
    let outcome = ctx.services.client.login(&Credentials::new(username, password)).await?;
    info!(target: "carro_admin::cli", user = %outcome.principal.username, landing = outcome.landing(), "logged in");
    if ctx.printer.is_json() {
        ctx.printer.json(&serde_json::json!({
            "username": outcome.principal.username,
            "roles": outcome.principal.roles,
            "temporaryPassword": outcome.temporary_password,
            "landing": outcome.landing(),
        }))?;
    } else {
        println!("Bem-vindo, {} ({}).", outcome.principal.username, outcome.principal.roles.join(", "));
        if outcome.temporary_password {
            println!("Você entrou com uma senha provisória. Defina uma nova com `carro-admin password reset`.");
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct WhoAmI<'a> {
    username: &'a str,
    roles: &'a [String],
    expires_at: Option<DateTime<Utc>>,
}

async fn cmd_whoami(ctx: &Ctx, remote: bool) -> Result<()> {
    let Some(principal) = ctx.session.principal() else {
        bail!("{AUTH_REQUIRED}");
    };
    if remote {
        let u = ctx.services.usuarios.logado().await?;
        let roles: Vec<String> = u.roles.iter().map(|r| r.nome.clone()).collect();
        ctx.printer.fields(&u, &[("ID", u.id.to_string()), ("Login", u.login.clone()), ("Perfis", roles.join(", "))])?;
        return Ok(());
    }
    let expires_at = principal.expires_at.and_then(|s| DateTime::<Utc>::from_timestamp(s, 0));
    let view = WhoAmI { username: &principal.username, roles: &principal.roles, expires_at };
    ctx.printer.fields(
        &view,
        &[
            ("Usuário", principal.username.clone()),
            ("Perfis", principal.roles.join(", ")),
            ("Expira em", expires_at.map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string()).unwrap_or_else(|| "-".into())),
        ],
    )?;
    Ok(())
}

/// One page of `source`, then print it.
async fn list_page<S>(ctx: &Ctx, source: S, filter: S::Filter, opts: &ListOpts) -> Result<()>
where
    S: ListSource,
    S::Item: TableRow + Serialize,
{
    if opts.page == 0 {
        bail!("páginas começam em 1");
    }
    let mut list = ListController::new(source, ctx.page_size(opts))
        .with_toasts(ctx.toasts.clone())
        .with_filter(filter)
        .with_page(opts.page - 1);
    if let Some(field) = &opts.sort {
        list = list.with_sort(field, opts.dir.unwrap_or_default())?;
    }
    list.execute_query().await?;
    ctx.printer.page(list.result())?;
    Ok(())
}

async fn cmd_carros(ctx: &Ctx, cmd: CarroCmd) -> Result<()> {
    let svc = &ctx.services.carros;
    match cmd {
        CarroCmd::List { modelo, marca, ano, opts } => {
            ctx.enter(routes::CARROS)?;
            list_page(ctx, svc.clone(), CarroFilter { modelo, marca, ano }, &opts).await
        }
        CarroCmd::Get { id } => {
            ctx.enter(routes::CARROS)?;
            ctx.printer.record(&svc.get(id).await?)?;
            Ok(())
        }
        CarroCmd::Create(args) => {
            ctx.enter(routes::CARROS_GERENCIAR)?;
            let msg = svc.create(&args.into()).await?;
            ctx.done(non_blank(&msg, "Carro cadastrado com sucesso!"))
        }
        CarroCmd::Update { id, args } => {
            ctx.enter(routes::CARROS_GERENCIAR)?;
            let msg = svc.update(id, &args.into()).await?;
            ctx.done(non_blank(&msg, "Carro atualizado com sucesso!"))
        }
        CarroCmd::Delete { id } => {
            ctx.enter(routes::CARROS_GERENCIAR)?;
            svc.delete(id).await?;
            ctx.done("Carro excluído com sucesso!")
        }
    }
}

async fn cmd_proprietarios(ctx: &Ctx, cmd: ProprietarioCmd) -> Result<()> {
    let svc = &ctx.services.proprietarios;
    match cmd {
        ProprietarioCmd::List { busca, opts } => {
            ctx.enter(routes::PROPRIETARIOS)?;
            list_page(ctx, svc.clone(), ProprietarioFilter { search: busca }, &opts).await
        }
        ProprietarioCmd::Get { id } => {
            ctx.enter(routes::PROPRIETARIOS)?;
            ctx.printer.record(&svc.get(id).await?)?;
            Ok(())
        }
        ProprietarioCmd::Create(args) => {
            ctx.enter(routes::PROPRIETARIOS_GERENCIAR)?;
            let created = svc.create(&args.into()).await?;
            ctx.printer.record(&created)?;
            ctx.done("Proprietário cadastrado com sucesso!")
        }
        ProprietarioCmd::Update { id, args } => {
            ctx.enter(routes::PROPRIETARIOS_GERENCIAR)?;
            let msg = svc.update(id, &args.into()).await?;
            ctx.done(non_blank(&msg, "Proprietário atualizado com sucesso!"))
        }
        ProprietarioCmd::Delete { id } => {
            ctx.enter(routes::PROPRIETARIOS_GERENCIAR)?;
            svc.delete(id).await?;
            ctx.done("Proprietário excluído com sucesso!")
        }
    }
}

async fn cmd_marcas(ctx: &Ctx, cmd: MarcaCmd) -> Result<()> {
    let svc = &ctx.services.marcas;
    ctx.enter(routes::MARCAS_GERENCIAR)?;
    match cmd {
        MarcaCmd::List { nome, opts } => list_page(ctx, svc.clone(), MarcaFilter { nome }, &opts).await,
        MarcaCmd::Get { id } => {
            ctx.printer.record(&svc.get(id).await?)?;
            Ok(())
        }
        MarcaCmd::Create { nome } => {
            let created = svc.create(&MarcaInput { nome }).await?;
            ctx.printer.record(&created)?;
            ctx.done("Marca cadastrada com sucesso!")
        }
        MarcaCmd::Update { id, nome } => {
            let msg = svc.update(id, &MarcaInput { nome }).await?;
            ctx.done(non_blank(&msg, "Marca atualizada com sucesso!"))
        }
        MarcaCmd::Delete { id } => {
            svc.delete(id).await?;
            ctx.done("Marca excluída com sucesso!")
        }
    }
}

async fn cmd_usuarios(ctx: &Ctx, cmd: UsuarioCmd) -> Result<()> {
    let s = &ctx.services;
    match cmd {
        UsuarioCmd::List { username, opts } => {
            ctx.enter(routes::USUARIOS)?;
            list_page(ctx, s.usuarios.clone(), UsuarioFilter { username }, &opts).await
        }
        UsuarioCmd::Get { id } => {
            ctx.enter(routes::USUARIOS)?;
            ctx.printer.record(&s.usuarios.get(id).await?)?;
            Ok(())
        }
        UsuarioCmd::Create { username, password, roles } => {
            ctx.enter(routes::USUARIOS_GERENCIAR)?;
            let roles = s.roles.resolve(&roles).await?;
            let msg = s.usuarios.create(&UsuarioInput { username, password: Some(password), roles }).await?;
            ctx.done(non_blank(&msg, "Usuário cadastrado com sucesso!"))
        }
        UsuarioCmd::Update { id, username, password, roles } => {
            ctx.enter(routes::USUARIOS_GERENCIAR)?;
            let roles = s.roles.resolve(&roles).await?;
            match s.usuarios.update(id, &UsuarioInput { username, password, roles }).await? {
                UsuarioUpdate::Record(u) => ctx.printer.record(&u)?,
                UsuarioUpdate::Message(m) => ctx.printer.message(&m)?,
            }
            ctx.done("Usuário atualizado com sucesso!")
        }
        UsuarioCmd::Delete { id } => {
            ctx.enter(routes::USUARIOS_GERENCIAR)?;
            s.usuarios.delete(id).await?;
            ctx.done("Usuário excluído com sucesso!")
        }
    }
}

async fn browse_list<S>(ctx: &Ctx, route: Route, source: S) -> Result<()>
where
    S: ListSource,
    S::Item: TableRow + Serialize,
{
    ctx.enter(route)?;
    let mut list = ListController::new(source, ctx.cfg.page_size).with_toasts(ctx.toasts.clone());
    if list.execute_query().await.is_ok() {
        ctx.printer.page(list.result())?;
    }
    println!("{}", browse::HELP);
    let mut editor = DefaultEditor::new()?;
    loop {
        ctx.printer.flush_toasts(&ctx.toasts);
        let line = match editor.readline(&format!("{}> ", route.path)) {
            Ok(l) => l,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let _ = editor.add_history_entry(line.as_str());
        let cmd = match BrowseCommand::parse(&line) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}", e.user_message());
                continue;
            }
        };
        if cmd == BrowseCommand::Help {
            println!("{}", browse::HELP);
            continue;
        }
        match browse::apply(&mut list, &cmd).await {
            Ok(false) => break,
            Ok(true) => ctx.printer.page(list.result())?,
            Err(e) => eprintln!("{}", e.user_message()),
        }
        if !ctx.session.is_logged_in() {
            eprintln!("{AUTH_REQUIRED}");
            break;
        }
    }
    Ok(())
}

fn save(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("não foi possível gravar {}", path.display()))
}

async fn cmd_report(ctx: &Ctx, cmd: ReportCmd) -> Result<()> {
    let s = &ctx.services;
    let (report, output) = match cmd {
        ReportCmd::Marcas { formato, nome, sort, dir, output } => {
            ctx.enter(routes::MARCAS_CONSULTA)?;
            let field = sort.as_deref().unwrap_or(MarcaConsulta::DEFAULT_SORT);
            let mut screen = MarcaReportScreen::new(s.marcas.clone(), s.relatorios.clone(), ctx.cfg.page_size)
                .with_toasts(ctx.toasts.clone())
                .with_sort(field, dir.unwrap_or_default())?;
            match nome {
                Some(n) => screen.search(&n).await?,
                None => screen.search_all().await?,
            }
            if !ctx.printer.is_json() {
                ctx.printer.page(screen.list().result())?;
            }
            (screen.generate(formato).await?, output)
        }
        ReportCmd::Carros { formato, de, ate, output } => {
            ctx.enter(routes::CARROS)?;
            (s.relatorios.carros(formato, de, ate).await?, output)
        }
    };
    let path = output.unwrap_or_else(|| PathBuf::from(&report.filename));
    save(&path, &report.bytes)?;
    info!(target: "carro_admin::cli", file = %path.display(), content_type = %report.content_type, bytes = report.bytes.len(), "report saved");
    ctx.printer.message(&format!("Relatório salvo em {} ({}, {} bytes).", path.display(), report.content_type, report.bytes.len()))?;
    Ok(())
}

fn file_name(caminho: &str) -> &str { caminho.rsplit('/').find(|s| !s.is_empty()).unwrap_or("download") }

async fn cmd_files(ctx: &Ctx, cmd: FilesCmd) -> Result<()> {
    let svc = &ctx.services.arquivos;
    match cmd {
        FilesCmd::Ls { caminho } => {
            let items = svc.list(caminho.as_deref()).await?;
            ctx.printer.items(&items)?;
        }
        FilesCmd::Download { caminho, output } => {
            let bytes = svc.download(&caminho).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(file_name(&caminho)));
            save(&path, &bytes)?;
            ctx.printer.message(&format!("Arquivo salvo em {} ({} bytes).", path.display(), bytes.len()))?;
        }
        FilesCmd::Url { caminho } => {
            if ctx.printer.is_json() {
                ctx.printer.json(&serde_json::json!({ "view": svc.view_url(&caminho), "download": svc.download_url(&caminho) }))?;
            } else {
                println!("visualizar: {}", svc.view_url(&caminho));
                println!("baixar:     {}", svc.download_url(&caminho));
            }
        }
    }
    Ok(())
}

const FILES_HELP: &str = "comandos: ls, cd <nome>, up, root, get <nome>, q|quit";

async fn browse_files(ctx: &Ctx) -> Result<()> {
    let svc = &ctx.services.arquivos;
    let mut nav = FolderBrowser::new();
    let mut items: Vec<ItemDto> = svc.list(None).await?;
    ctx.printer.items(&items)?;
    println!("{FILES_HELP}");
    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline(&format!("/{}> ", nav.caminho())) {
            Ok(l) => l,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let _ = editor.add_history_entry(line.as_str());
        let (word, arg) = match line.trim().split_once(char::is_whitespace) {
            Some((w, a)) => (w.to_string(), a.trim().to_string()),
            None => (line.trim().to_string(), String::new()),
        };
        let reload = match word.as_str() {
            "q" | "quit" | "exit" => break,
            "ls" | "" => true,
            "up" | ".." => {
                nav.up();
                true
            }
            "root" => {
                nav.root();
                true
            }
            "cd" | "get" => {
                let Some(item) = items.iter().find(|i| i.nome == arg) else {
                    eprintln!("não encontrado: {arg}");
                    continue;
                };
                match nav.enter(item) {
                    Entered::Directory(_) => true,
                    Entered::File(path) => {
                        match svc.download(&path).await {
                            Ok(bytes) => {
                                let target = PathBuf::from(file_name(&path));
                                save(&target, &bytes)?;
                                println!("Arquivo salvo em {} ({} bytes).", target.display(), bytes.len());
                            }
                            Err(e) => eprintln!("{}", e.user_message()),
                        }
                        false
                    }
                }
            }
            _ => {
                println!("{FILES_HELP}");
                false
            }
        };
        if reload {
            let caminho = nav.caminho();
            match svc.list(Some(&caminho)).await {
                Ok(list) => {
                    items = list;
                    ctx.printer.items(&items)?;
                }
                Err(e) => eprintln!("{}", e.user_message()),
            }
        }
    }
    Ok(())
}

async fn cmd_password(ctx: &Ctx, cmd: PasswordCmd) -> Result<()> {
    let svc = &ctx.services.recuperar;
    let resp = match cmd {
        PasswordCmd::Generate { id } => {
            ctx.enter(routes::USUARIOS_GERENCIAR)?;
            svc.generate_temporary_password(id).await?
        }
        PasswordCmd::Reset { username, provisoria, nova } => {
            ctx.enter_path(routes::PASSWORD_RESET_ROUTE)?;
            let resp = svc
                .reset_password(&PasswordReset { username, senha_provisoria: provisoria, nova_senha: nova })
                .await?;
            ctx.services.client.logout();
            resp
        }
    };
    ctx.printer.message(&resp.mensagem)?;
    Ok(())
}

fn non_blank<'a>(msg: &'a str, fallback: &'a str) -> &'a str {
    let t = msg.trim().trim_matches('"');
    if t.is_empty() {
        fallback
    } else {
        t
    }
}
