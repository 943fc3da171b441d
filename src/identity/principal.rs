use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Identity derived from a bearer token's claims.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiry (`exp`, seconds since epoch) when the token carries one.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool { self.roles.iter().any(|r| r == role) }

    pub fn has_any_role<S: AsRef<str>>(&self, wanted: &[S]) -> bool {
        wanted.iter().any(|w| self.has_role(w.as_ref()))
    }
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: String,
    #[serde(default)]
    roles: Option<RolesClaim>,
    #[serde(default)]
    exp: Option<i64>,
}

// Spring issues `roles` as a JSON list; some issuers use a space-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RolesClaim {
    List(Vec<String>),
    Joined(String),
}

impl RolesClaim {
    fn into_vec(self) -> Vec<String> {
        match self {
            RolesClaim::List(v) => v,
            RolesClaim::Joined(s) => s.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// Decode the claims segment of a JWT without verifying its signature.
///
/// The result only drives what the console shows; the backend re-checks the token
/// on every authenticated request.
pub fn decode_token(token: &str) -> ClientResult<Principal> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|seg| !seg.is_empty())
        .ok_or_else(|| ClientError::decode("token has no claims segment"))?;
    let trimmed = payload.trim_end_matches('=');
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| base64::engine::general_purpose::STANDARD_NO_PAD.decode(trimmed))
        .map_err(|e| ClientError::decode(format!("claims segment is not base64: {e}")))?;
    let raw: RawClaims = serde_json::from_slice(&bytes)
        .map_err(|e| ClientError::decode(format!("claims segment is not a claims object: {e}")))?;
    Ok(Principal {
        username: raw.sub,
        roles: raw.roles.map(RolesClaim::into_vec).unwrap_or_default(),
        expires_at: raw.exp,
    })
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &serde_json::Value) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let body = engine.encode(claims.to_string().as_bytes());
    format!("{header}.{body}.c2lnbmF0dXJl")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_subject_and_role_list() {
        let token = encode_test_token(&json!({"sub": "maria", "roles": ["ADMIN", "GERENTE"], "exp": 1900000000}));
        let p = decode_token(&token).unwrap();
        assert_eq!(p.username, "maria");
        assert_eq!(p.roles, vec!["ADMIN", "GERENTE"]);
        assert_eq!(p.expires_at, Some(1900000000));
        assert!(p.has_any_role(&["BASIC", "GERENTE"]));
        assert!(!p.has_role("BASIC"));
    }

    #[test]
    fn accepts_space_joined_roles_and_padded_segment() {
        let engine = base64::engine::general_purpose::STANDARD;
        let body = engine.encode(json!({"sub": "joao", "roles": "BASIC GERENTE"}).to_string());
        let token = format!("aGVhZGVy.{body}.sig");
        let p = decode_token(&token).unwrap();
        assert_eq!(p.roles, vec!["BASIC", "GERENTE"]);
    }

    #[test]
    fn missing_roles_claim_means_no_roles() {
        let token = encode_test_token(&json!({"sub": "ana"}));
        assert!(decode_token(&token).unwrap().roles.is_empty());
    }

    #[test]
    fn malformed_tokens_fail_to_decode() {
        for bad in ["", "opaque-token", "a..c", "a.!!!notbase64!!!.c"] {
            assert!(matches!(decode_token(bad), Err(ClientError::Decode { .. })), "token {bad:?}");
        }
        let not_json = format!("h.{}.s", base64::engine::general_purpose::URL_SAFE_NO_PAD.encode("plain text"));
        assert!(decode_token(&not_json).is_err());
        let no_sub = encode_test_token(&json!({"roles": ["ADMIN"]}));
        assert!(decode_token(&no_sub).is_err());
    }
}
