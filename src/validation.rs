//! Form checks run before anything is sent. A failing check never reaches the backend.

use crate::api::{CarroInput, MarcaInput, PasswordReset, ProprietarioInput, UsuarioInput};
use crate::error::{ClientError, ClientResult};
use crate::identity::Credentials;
use crate::listing::masks::digits_only;

pub const REQUIRED_FIELDS: &str = "Preencha todos os campos obrigatórios.";

fn required(field: &str, value: &str) -> ClientResult<()> {
    if value.trim().is_empty() {
        Err(ClientError::validation(field, REQUIRED_FIELDS))
    } else {
        Ok(())
    }
}

pub fn validate_credentials(c: &Credentials) -> ClientResult<()> {
    required("username", &c.username)?;
    required("password", &c.password)
}

pub fn validate_proprietario(p: &ProprietarioInput) -> ClientResult<()> {
    required("nome", &p.nome)?;
    required("cpf", &p.cpf)?;
    required("telefone", &p.telefone)?;
    if digits_only(&p.cpf).len() != 11 {
        return Err(ClientError::validation("cpf", "CPF deve conter 11 dígitos."));
    }
    Ok(())
}

pub fn validate_carro(c: &CarroInput) -> ClientResult<()> {
    required("modelo", &c.modelo)?;
    required("cor", &c.cor)?;
    if c.ano <= 0 {
        return Err(ClientError::validation("ano", REQUIRED_FIELDS));
    }
    match c.marca_id {
        Some(id) if id > 0 => Ok(()),
        _ => Err(ClientError::validation("marca", REQUIRED_FIELDS)),
    }
}

pub fn validate_marca(m: &MarcaInput) -> ClientResult<()> { required("nome", &m.nome) }

/// A password is mandatory when creating; on update an absent password keeps the old one.
pub fn validate_usuario(u: &UsuarioInput, creating: bool) -> ClientResult<()> {
    required("username", &u.username)?;
    match u.password.as_deref() {
        Some(p) if !p.trim().is_empty() => Ok(()),
        Some(_) => Err(ClientError::validation("password", REQUIRED_FIELDS)),
        None if creating => Err(ClientError::validation("password", REQUIRED_FIELDS)),
        None => Ok(()),
    }
}

pub fn validate_password_reset(r: &PasswordReset) -> ClientResult<()> {
    required("username", &r.username)?;
    required("senhaProvisoria", &r.senha_provisoria)?;
    required("novaSenha", &r.nova_senha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_requires_all_fields_and_full_cpf() {
        let mut p = ProprietarioInput { nome: "Maria".into(), cpf: "123.456.789-01".into(), telefone: "(11) 98765-4321".into() };
        assert!(validate_proprietario(&p).is_ok());
        p.cpf = "123.456".into();
        assert_eq!(validate_proprietario(&p).unwrap_err().field(), Some("cpf"));
        p.telefone = " ".into();
        assert_eq!(validate_proprietario(&p).unwrap_err().field(), Some("telefone"));
    }

    #[test]
    fn car_requires_brand_and_year() {
        let mut c = CarroInput { modelo: "Civic".into(), cor: "Prata".into(), ano: 2020, marca_id: Some(1), proprietario_ids: vec![] };
        assert!(validate_carro(&c).is_ok());
        c.marca_id = None;
        assert_eq!(validate_carro(&c).unwrap_err().field(), Some("marca"));
        c.marca_id = Some(1);
        c.ano = 0;
        assert_eq!(validate_carro(&c).unwrap_err().field(), Some("ano"));
    }

    #[test]
    fn user_password_rules() {
        let mut u = UsuarioInput { username: "ana".into(), password: None, roles: vec![] };
        assert!(validate_usuario(&u, false).is_ok());
        assert_eq!(validate_usuario(&u, true).unwrap_err().field(), Some("password"));
        u.password = Some("".into());
        assert!(validate_usuario(&u, false).is_err());
        u.password = Some("s3nha".into());
        assert!(validate_usuario(&u, true).is_ok());
    }

    #[test]
    fn reset_requires_three_fields() {
        let r = PasswordReset { username: "ana".into(), senha_provisoria: "tmp".into(), nova_senha: "".into() };
        assert_eq!(validate_password_reset(&r).unwrap_err().field(), Some("novaSenha"));
        assert!(validate_marca(&MarcaInput { nome: "  ".into() }).is_err());
        assert!(validate_credentials(&Credentials::new("a", "b")).is_ok());
    }
}
