//! Per-entity list filters and how they map onto query parameters. Empty values are
//! never sent.

use super::masks::{digits_only, is_cpf};
use super::ListFilter;
use crate::error::{ClientError, ClientResult};

fn non_empty(v: &Option<String>) -> Option<String> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Split `key=value` tokens from free words. Free words are joined back with spaces.
fn split_args(input: &str) -> (Vec<(String, String)>, String) {
    let mut pairs = Vec::new();
    let mut free = Vec::new();
    for tok in input.split_whitespace() {
        match tok.split_once('=') {
            Some((k, v)) if !k.is_empty() => pairs.push((k.to_ascii_lowercase(), v.to_string())),
            _ => free.push(tok),
        }
    }
    (pairs, free.join(" "))
}

fn unknown_key(key: &str) -> ClientError { ClientError::validation(key, format!("filtro desconhecido: {key}")) }

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarroFilter {
    pub modelo: Option<String>,
    pub marca: Option<String>,
    /// `0` counts as no filter.
    pub ano: Option<i32>,
}

impl ListFilter for CarroFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(m) = non_empty(&self.modelo) {
            out.push(("modelo", m));
        }
        if let Some(m) = non_empty(&self.marca) {
            out.push(("marca", m));
        }
        if let Some(a) = self.ano.filter(|a| *a != 0) {
            out.push(("ano", a.to_string()));
        }
        out
    }

    /// `modelo=.. marca=.. ano=..`; bare words are the model.
    fn parse(input: &str) -> ClientResult<Self> {
        let (pairs, free) = split_args(input);
        let mut f = CarroFilter::default();
        if !free.is_empty() {
            f.modelo = Some(free);
        }
        for (k, v) in pairs {
            match k.as_str() {
                "modelo" => f.modelo = Some(v),
                "marca" => f.marca = Some(v),
                "ano" => {
                    let ano = v.parse::<i32>().map_err(|_| ClientError::validation("ano", format!("ano inválido: {v}")))?;
                    f.ano = Some(ano);
                }
                other => return Err(unknown_key(other)),
            }
        }
        Ok(f)
    }
}

/// How the owner search box is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerSearch {
    /// Digits only.
    Cpf(String),
    Nome(String),
}

/// A value shaped like a CPF searches by CPF (mask stripped); anything else by name.
pub fn classify_owner_search(raw: &str) -> Option<OwnerSearch> {
    let t = raw.trim();
    if t.is_empty() {
        None
    } else if is_cpf(t) {
        Some(OwnerSearch::Cpf(digits_only(t)))
    } else {
        Some(OwnerSearch::Nome(t.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProprietarioFilter {
    /// Free text: a name or a CPF.
    pub search: Option<String>,
}

impl ProprietarioFilter {
    pub fn search<S: Into<String>>(s: S) -> Self { Self { search: Some(s.into()) } }
}

impl ListFilter for ProprietarioFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self.search.as_deref().and_then(classify_owner_search) {
            Some(OwnerSearch::Cpf(d)) => vec![("cpf", d)],
            Some(OwnerSearch::Nome(n)) => vec![("nome", n)],
            None => Vec::new(),
        }
    }

    fn parse(input: &str) -> ClientResult<Self> {
        let t = input.trim();
        Ok(Self { search: (!t.is_empty()).then(|| t.to_string()) })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarcaFilter {
    pub nome: Option<String>,
}

impl ListFilter for MarcaFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        non_empty(&self.nome).map(|n| vec![("nome", n)]).unwrap_or_default()
    }

    fn parse(input: &str) -> ClientResult<Self> {
        let (pairs, free) = split_args(input);
        let mut f = MarcaFilter { nome: (!free.is_empty()).then_some(free) };
        for (k, v) in pairs {
            match k.as_str() {
                "nome" => f.nome = Some(v),
                other => return Err(unknown_key(other)),
            }
        }
        Ok(f)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsuarioFilter {
    pub username: Option<String>,
}

impl ListFilter for UsuarioFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        non_empty(&self.username).map(|u| vec![("username", u)]).unwrap_or_default()
    }

    fn parse(input: &str) -> ClientResult<Self> {
        let (pairs, free) = split_args(input);
        let mut f = UsuarioFilter { username: (!free.is_empty()).then_some(free) };
        for (k, v) in pairs {
            match k.as_str() {
                "username" => f.username = Some(v),
                other => return Err(unknown_key(other)),
            }
        }
        Ok(f)
    }
}

/// Lists that take no filter (roles).
impl ListFilter for () {
    fn query_pairs(&self) -> Vec<(&'static str, String)> { Vec::new() }

    fn parse(input: &str) -> ClientResult<Self> {
        if input.trim().is_empty() {
            Ok(())
        } else {
            Err(ClientError::validation("filtro", "esta lista não aceita filtros"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_search_sends_exactly_one_key() {
        let cases = [
            ("123.456.789-01", Some(("cpf", "12345678901"))),
            ("12345678901", Some(("cpf", "12345678901"))),
            ("  Maria Souza ", Some(("nome", "Maria Souza"))),
            ("123.456", Some(("nome", "123.456"))),
            ("١٢٣٤٥٦٧٨٩٠١", Some(("nome", "١٢٣٤٥٦٧٨٩٠١"))),
            ("   ", None),
        ];
        for (input, expected) in cases {
            let pairs = ProprietarioFilter::search(input).query_pairs();
            match expected {
                Some((k, v)) => assert_eq!(pairs, vec![(k, v.to_string())], "input {input:?}"),
                None => assert!(pairs.is_empty()),
            }
        }
        assert!(ProprietarioFilter::default().query_pairs().is_empty());
    }

    #[test]
    fn carro_filter_omits_empty_values() {
        let f = CarroFilter { modelo: Some("Civic".into()), marca: Some("  ".into()), ano: Some(0) };
        assert_eq!(f.query_pairs(), vec![("modelo", "Civic".to_string())]);
        let f = CarroFilter { modelo: None, marca: Some("Honda".into()), ano: Some(2020) };
        assert_eq!(f.query_pairs(), vec![("marca", "Honda".to_string()), ("ano", "2020".to_string())]);
    }

    #[test]
    fn parse_from_command_line() {
        let f = CarroFilter::parse("Civic ano=2020 marca=Honda").unwrap();
        assert_eq!(f, CarroFilter { modelo: Some("Civic".into()), marca: Some("Honda".into()), ano: Some(2020) });
        assert_eq!(CarroFilter::parse("ano=abc").unwrap_err().field(), Some("ano"));
        assert_eq!(CarroFilter::parse("cor=azul").unwrap_err().field(), Some("cor"));
        assert_eq!(MarcaFilter::parse("Fiat").unwrap().nome.as_deref(), Some("Fiat"));
        assert_eq!(UsuarioFilter::parse("username=ana").unwrap().username.as_deref(), Some("ana"));
        assert!(<() as ListFilter>::parse("x").is_err());
    }
}
