mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use carro_admin::api::{CarroInput, MarcaInput, PasswordReset, ProprietarioInput, ReportFormat, UsuarioInput, UsuarioUpdate};
use carro_admin::error::{ClientError, DUPLICATE_CPF};
use carro_admin::identity::MemorySessionStore;
use carro_admin::listing::screens::MarcaReportScreen;
use carro_admin::listing::SortDirection;
use carro_admin::Services;

use common::{page, services, token_for, Mock, Reply};

async fn logged_in(mock: Arc<Mock>) -> Services {
    let base = common::serve(mock).await;
    let s = services(&base, Arc::new(MemorySessionStore::new()));
    s.client.session().set_token(&token_for("maria", &["ADMIN"])).unwrap();
    s
}

#[tokio::test]
async fn bearer_goes_only_to_private_endpoints() {
    let mock = Arc::new(Mock::default());
    mock.on("GET", "/api/publico/arquivos", Reply::json(200, json!([])));
    mock.on("GET", "/api/dashboard/metrics", Reply::json(200, json!({})));
    let s = logged_in(mock.clone()).await;
    let tok = s.client.session().token().unwrap();

    s.arquivos.list(None).await.unwrap();
    s.dashboard.metrics().await.unwrap();

    assert_eq!(mock.to("/api/publico/arquivos")[0].auth, None);
    assert_eq!(mock.to("/api/dashboard/metrics")[0].auth, Some(format!("Bearer {tok}")));
}

#[tokio::test]
async fn dashboard_metrics_decode() {
    let mock = Arc::new(Mock::default());
    mock.on(
        "GET",
        "/api/dashboard/metrics",
        Reply::json(200, json!({ "totalCarros": 12, "totalUsuarios": 3, "totalProprietarios": 9, "totalMarcas": 5 })),
    );
    let s = logged_in(mock).await;
    let m = s.dashboard.metrics().await.unwrap();
    assert_eq!((m.total_carros, m.total_usuarios, m.total_proprietarios, m.total_marcas), (12, 3, 9, 5));
}

#[tokio::test]
async fn duplicate_cpf_is_a_field_conflict() {
    let mock = Arc::new(Mock::default());
    mock.on("POST", "/api/proprietario", Reply::text(400, "CPF já cadastrado!"));
    let s = logged_in(mock.clone()).await;

    let input = ProprietarioInput { nome: "Ana".into(), cpf: "123.456.789-09".into(), telefone: "(11) 98765-4321".into() };
    let err = s.proprietarios.create(&input).await.unwrap_err();
    assert_eq!(err, ClientError::conflict("cpf", DUPLICATE_CPF));
    assert_eq!(err.field(), Some("cpf"));
    assert_eq!(mock.last().json(), json!({ "cpf": "12345678909", "nome": "Ana", "telefone": "11987654321" }));
}

#[tokio::test]
async fn conflict_names_the_field() {
    let mock = Arc::new(Mock::default());
    mock.on(
        "POST",
        "/api/marca",
        Reply::json(409, json!({ "erro": "Conflito", "campo": "nome", "mensagem": "Marca já cadastrada" })),
    );
    let s = logged_in(mock).await;
    let err = s.marcas.create(&MarcaInput { nome: "Fiat".into() }).await.unwrap_err();
    assert_eq!(err, ClientError::conflict("nome", "Marca já cadastrada"));
}

#[tokio::test]
async fn invalid_forms_never_reach_the_backend() {
    let mock = Arc::new(Mock::default());
    let s = logged_in(mock.clone()).await;

    let short_cpf = ProprietarioInput { nome: "Ana".into(), cpf: "1234567890".into(), telefone: "11999999999".into() };
    assert!(matches!(s.proprietarios.create(&short_cpf).await, Err(ClientError::Validation { .. })));
    let no_brand = CarroInput { modelo: "Uno".into(), cor: "Branco".into(), ano: 2010, marca_id: None, proprietario_ids: vec![] };
    assert!(matches!(s.carros.create(&no_brand).await, Err(ClientError::Validation { .. })));
    let no_password = UsuarioInput { username: "novo".into(), password: None, roles: vec![] };
    assert!(matches!(s.usuarios.create(&no_password).await, Err(ClientError::Validation { .. })));

    assert!(mock.seen().is_empty());
}

#[tokio::test]
async fn car_body_references_related_records() {
    let mock = Arc::new(Mock::default());
    mock.on("POST", "/api/carro", Reply::text(200, "Carro cadastrado com sucesso"));
    let s = logged_in(mock.clone()).await;
    let input = CarroInput { modelo: " Civic ".into(), cor: "Prata".into(), ano: 2020, marca_id: Some(2), proprietario_ids: vec![1, 4] };
    let msg = s.carros.create(&input).await.unwrap();
    assert_eq!(msg, "Carro cadastrado com sucesso");
    assert_eq!(
        mock.last().json(),
        json!({ "modelo": "Civic", "cor": "Prata", "ano": 2020, "marca": { "id": 2 }, "proprietarios": [{ "id": 1 }, { "id": 4 }] })
    );
}

#[tokio::test]
async fn user_update_accepts_record_or_message() {
    let mock = Arc::new(Mock::default());
    mock.on("PATCH", "/api/usuario/3", Reply::json(200, json!({ "id": 3, "username": "ana", "roles": [{ "id": 1, "nome": "ADMIN" }] })));
    mock.on("PATCH", "/api/usuario/4", Reply::text(200, "Usuário atualizado"));
    let s = logged_in(mock.clone()).await;
    let input = UsuarioInput { username: "ana".into(), password: None, roles: vec![] };

    match s.usuarios.update(3, &input).await.unwrap() {
        UsuarioUpdate::Record(u) => assert_eq!(u.role_names(), vec!["ADMIN"]),
        other => panic!("expected record, got {other:?}"),
    }
    assert_eq!(mock.last().json().get("password"), None);
    assert_eq!(s.usuarios.update(4, &input).await.unwrap(), UsuarioUpdate::Message("Usuário atualizado".into()));
}

#[tokio::test]
async fn brand_report_follows_the_listed_filter() {
    let mock = Arc::new(Mock::default());
    mock.on("GET", "/api/marca", Reply::json(200, page(json!([{ "id": 1, "nome": "Fiat" }]), 0, 1, 1)));
    mock.on("GET", "/api/relatorios/marcas", Reply::bytes("application/pdf", b"%PDF-1.4"));
    let s = logged_in(mock.clone()).await;

    let mut screen = MarcaReportScreen::new(s.marcas.clone(), s.relatorios.clone(), 5);
    screen.search("Fi").await.unwrap();
    assert_eq!(mock.last().param("sortField").as_deref(), Some("id"));
    screen.list_mut().sort_by("nome").await.unwrap();
    screen.list_mut().sort_by("nome").await.unwrap();

    let report = screen.generate(ReportFormat::Pdf).await.unwrap();
    assert_eq!(report.filename, "relatorio-marcas.pdf");
    assert_eq!(report.content_type, "application/pdf");
    assert_eq!(report.bytes, b"%PDF-1.4");

    let req = mock.last();
    assert_eq!(req.path, "/api/relatorios/marcas");
    assert_eq!(req.param("formato").as_deref(), Some("pdf"));
    assert_eq!(req.param("nome").as_deref(), Some("Fi"));
    assert_eq!(req.param("sortField").as_deref(), Some("nome"));
    assert_eq!(req.param("sortDir").as_deref(), Some("desc"));
}

#[tokio::test]
async fn brand_report_keeps_requested_sort_on_the_default_field() {
    let mock = Arc::new(Mock::default());
    mock.on("GET", "/api/marca", Reply::json(200, page(json!([{ "id": 1, "nome": "Fiat" }]), 0, 1, 1)));
    mock.on("GET", "/api/relatorios/marcas", Reply::bytes("application/pdf", b"%PDF-1.4"));
    let s = logged_in(mock.clone()).await;

    let mut screen =
        MarcaReportScreen::new(s.marcas.clone(), s.relatorios.clone(), 5).with_sort("id", SortDirection::Asc).unwrap();
    screen.search_all().await.unwrap();
    screen.generate(ReportFormat::Pdf).await.unwrap();

    assert_eq!(mock.to("/api/marca").len(), 1);
    let req = mock.last();
    assert_eq!(req.path, "/api/relatorios/marcas");
    assert_eq!(req.param("sortField").as_deref(), Some("id"));
    assert_eq!(req.param("sortDir").as_deref(), Some("asc"));

    let bad = MarcaReportScreen::new(s.marcas.clone(), s.relatorios.clone(), 5).with_sort("cor", SortDirection::Desc);
    assert!(matches!(bad, Err(ClientError::Validation { .. })));
}

#[tokio::test]
async fn car_report_dates() {
    let mock = Arc::new(Mock::default());
    mock.on("GET", "/api/relatorios/carros", Reply::bytes("application/vnd.ms-excel", b"xls"));
    let s = logged_in(mock.clone()).await;
    let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dec = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

    let report = s.relatorios.carros(ReportFormat::Xls, Some(jan), Some(dec)).await.unwrap();
    assert_eq!(report.filename, "relatorio-carros.xlsx");
    let req = mock.last();
    assert_eq!(req.param("dataInicial").as_deref(), Some("2024-01-01"));
    assert_eq!(req.param("dataFinal").as_deref(), Some("2024-12-31"));

    let before = mock.seen().len();
    let err = s.relatorios.carros(ReportFormat::Pdf, Some(dec), Some(jan)).await.unwrap_err();
    assert_eq!(err.field(), Some("dataInicial"));
    assert_eq!(mock.seen().len(), before);
}

#[tokio::test]
async fn public_folders() {
    let mock = Arc::new(Mock::default());
    mock.on(
        "GET",
        "/api/publico/arquivos",
        Reply::json(
            200,
            json!([
                { "nome": "2024", "isDiretorio": true, "contagem": 3 },
                { "nome": "edital.pdf", "isDiretorio": false, "tamanho": 20480.0 }
            ]),
        ),
    );
    mock.on("GET", "/api/publico/arquivos/download", Reply::bytes("application/pdf", b"pdf-bytes"));
    let base = common::serve(mock.clone()).await;
    let s = services(&base, Arc::new(MemorySessionStore::new()));

    let items = s.arquivos.list(Some("Editais")).await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items[0].is_diretorio);
    assert_eq!(items[1].tamanho, Some(20480.0));
    assert_eq!(mock.last().param("caminho").as_deref(), Some("Editais"));

    let bytes = s.arquivos.download("Editais/edital de março.pdf").await.unwrap();
    assert_eq!(bytes, b"pdf-bytes");
    assert_eq!(mock.last().param("caminho").as_deref(), Some("Editais/edital de março.pdf"));
    assert!(s.arquivos.view_url("a b.pdf").ends_with("/api/publico/arquivos/view?caminho=a%20b.pdf"));
}

#[tokio::test]
async fn temporary_password_flow() {
    let mock = Arc::new(Mock::default());
    mock.on("POST", "/api/recuperar/gerar-senha", Reply::json(200, json!({ "mensagem": "Senha provisória: Ab12Cd34" })));
    mock.on("POST", "/api/recuperar/redefinir-senha", Reply::json(200, json!({ "mensagem": "Senha redefinida com sucesso" })));
    let s = logged_in(mock.clone()).await;

    let m = s.recuperar.generate_temporary_password(9).await.unwrap();
    assert!(m.mensagem.contains("Ab12Cd34"));
    assert_eq!(mock.last().json(), json!({ "id": 9 }));

    let reset = PasswordReset { username: "joao".into(), senha_provisoria: "Ab12Cd34".into(), nova_senha: "nova-senha".into() };
    s.recuperar.reset_password(&reset).await.unwrap();
    assert_eq!(mock.last().json(), json!({ "username": "joao", "senhaProvisoria": "Ab12Cd34", "novaSenha": "nova-senha" }));
}
