//! JWT 클레임 디코더
//!
//! 클라이언트는 서명 키를 갖고 있지 않으므로 토큰의 서명을 검증하지 않습니다.
//! 페이로드 세그먼트만 해석하여 만료 시간과 권한 클레임을 읽어오며,
//! 신뢰 판단은 서버 확인(`/auth/current`)으로 보완합니다.
//!
//! 토큰 디코딩은 이 모듈의 [`decode_token`] 한 곳에서만 수행합니다.
//! 실패는 항상 `SessionError::TokenDecodeError`로 반환되며 패닉하지 않습니다.

use std::collections::BTreeSet;

use chrono::Utc;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde_json::{Map, Value};

use crate::domain::models::session::CustomerId;
use crate::domain::models::token::TokenClaims;
use crate::errors::errors::{SessionError, SessionResult};
use crate::utils::string_utils::clean_optional_string;

const ROLE_CLAIMS: &[&str] = &[
    "role",
    "roles",
    "http://schemas.microsoft.com/ws/2008/06/identity/claims/role",
];

const EMAIL_CLAIMS: &[&str] = &[
    "email",
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress",
    "unique_name",
];

const CUSTOMER_ID_CLAIMS: &[&str] = &["customerId", "CustomerId", "customer_id"];

const EMAIL_CONFIRMED_CLAIMS: &[&str] = &["emailConfirmed", "EmailConfirmed", "email_verified"];

const FIRST_NAME_CLAIMS: &[&str] = &[
    "given_name",
    "firstName",
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/givenname",
];

const LAST_NAME_CLAIMS: &[&str] = &[
    "family_name",
    "lastName",
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/surname",
];

/// 토큰 페이로드를 디코딩하여 정규화된 클레임을 반환합니다.
///
/// 서명과 만료는 검증하지 않습니다. 만료 판단은 [`is_token_structurally_valid`]
/// 또는 [`TokenClaims::is_expired_at`]에서 수행합니다.
///
/// # Arguments
///
/// * `token` - `header.payload.signature` 형식의 JWT (Bearer 접두사 제외)
///
/// # Errors
///
/// * `SessionError::TokenDecodeError` - 세그먼트 수 불일치, base64/JSON 파싱 실패
///
/// # Examples
///
/// ```rust,ignore
/// let claims = decode_token(&token)?;
/// println!("Roles: {:?}", claims.roles);
/// ```
pub fn decode_token(token: &str) -> SessionResult<TokenClaims> {
    let token = token.trim();
    if token.is_empty() || token.split('.').count() != 3 {
        return Err(SessionError::TokenDecodeError(
            "JWT는 세 개의 세그먼트로 구성되어야 합니다".to_string(),
        ));
    }

    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Map<String, Value>>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| SessionError::TokenDecodeError(format!("토큰 페이로드 해석 실패: {}", e)))?;

    Ok(normalize_claims(&data.claims))
}

/// 토큰이 구조적으로 올바르고 아직 만료되지 않았는지 확인합니다.
///
/// 잘못된 형식의 토큰은 `false`를 반환합니다.
pub fn is_token_structurally_valid(token: &str) -> bool {
    is_token_structurally_valid_at(token, Utc::now().timestamp())
}

/// [`is_token_structurally_valid`]의 시각 지정 버전
pub fn is_token_structurally_valid_at(token: &str, now_secs: i64) -> bool {
    match decode_token(token) {
        Ok(claims) => !claims.is_expired_at(now_secs),
        Err(e) => {
            log::debug!("토큰 구조 검증 실패: {}", e);
            false
        }
    }
}

fn normalize_claims(raw: &Map<String, Value>) -> TokenClaims {
    TokenClaims {
        subject: first_string(raw, &["sub"]),
        email: first_string(raw, EMAIL_CLAIMS),
        roles: collect_roles(raw),
        customer_id: CUSTOMER_ID_CLAIMS
            .iter()
            .find_map(|name| raw.get(*name).and_then(as_customer_id)),
        email_confirmed: EMAIL_CONFIRMED_CLAIMS
            .iter()
            .find_map(|name| raw.get(*name).and_then(as_bool))
            .unwrap_or(false),
        first_name: first_string(raw, FIRST_NAME_CLAIMS),
        last_name: first_string(raw, LAST_NAME_CLAIMS),
        exp: raw.get("exp").and_then(as_timestamp),
        iat: raw.get("iat").and_then(as_timestamp),
    }
}

fn first_string(raw: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        raw.get(*name)
            .and_then(Value::as_str)
            .and_then(|s| clean_optional_string(Some(s.to_string())))
    })
}

// 역할 클레임은 단일 문자열 또는 배열로 올 수 있음
fn collect_roles(raw: &Map<String, Value>) -> BTreeSet<String> {
    let mut roles = BTreeSet::new();
    for name in ROLE_CLAIMS {
        match raw.get(*name) {
            Some(Value::String(role)) => {
                if let Some(role) = clean_optional_string(Some(role.clone())) {
                    roles.insert(role);
                }
            }
            Some(Value::Array(values)) => {
                roles.extend(
                    values
                        .iter()
                        .filter_map(Value::as_str)
                        .filter_map(|role| clean_optional_string(Some(role.to_string()))),
                );
            }
            _ => {}
        }
    }
    roles
}

fn as_customer_id(value: &Value) -> Option<CustomerId> {
    match value {
        Value::Number(n) => n.as_i64().map(CustomerId::Number),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else if let Ok(n) = s.parse::<i64>() {
                Some(CustomerId::Number(n))
            } else {
                Some(CustomerId::Text(s.to_string()))
            }
        }
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::{json, Value};

    /// 주어진 클레임으로 HS256 테스트 토큰을 발급합니다.
    pub fn mint_token(claims: &Value) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(b"test-secret"))
            .expect("test token encoding")
    }

    /// `ttl_secs` 후 만료되는 일반 사용자 토큰
    pub fn user_token(email: &str, roles: &[&str], ttl_secs: i64) -> String {
        let now = Utc::now().timestamp();
        mint_token(&json!({
            "sub": email,
            "email": email,
            "role": roles,
            "customerId": "17",
            "emailConfirmed": "True",
            "iat": now,
            "exp": now + ttl_secs,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_collects_roles_from_all_claim_names() {
        let token = mint_token(&json!({
            "sub": "user-1",
            "role": "User",
            "http://schemas.microsoft.com/ws/2008/06/identity/claims/role": ["Admin", "User"],
            "exp": 4_102_444_800i64,
        }));

        let claims = decode_token(&token).unwrap();
        assert_eq!(claims.subject.as_deref(), Some("user-1"));
        assert_eq!(claims.roles.len(), 2);
        assert!(claims.roles.contains("Admin"));
        assert_eq!(claims.exp, Some(4_102_444_800));
    }

    #[test]
    fn test_decode_normalizes_profile_claims() {
        let token = user_token("a@b.com", &["User"], 3600);
        let claims = decode_token(&token).unwrap();

        assert_eq!(claims.email.as_deref(), Some("a@b.com"));
        assert_eq!(claims.customer_id, Some(CustomerId::Number(17)));
        assert!(claims.email_confirmed);
    }

    #[test]
    fn test_malformed_tokens_are_errors_not_panics() {
        assert!(decode_token("").is_err());
        assert!(decode_token("only.two").is_err());
        assert!(decode_token("a.b.c").is_err());
        assert!(decode_token("eyJhbGciOiJIUzI1NiJ9.!!!.sig").is_err());
        assert!(!is_token_structurally_valid("garbage"));
    }

    #[test]
    fn test_structural_validity_checks_expiry() {
        let now = Utc::now().timestamp();
        let valid = user_token("a@b.com", &["User"], 600);
        let expired = user_token("a@b.com", &["User"], -600);
        let no_exp = mint_token(&json!({ "sub": "a@b.com" }));

        assert!(is_token_structurally_valid(&valid));
        assert!(!is_token_structurally_valid(&expired));
        assert!(!is_token_structurally_valid(&no_exp));
        assert!(!is_token_structurally_valid_at(&valid, now + 601));
    }
}
