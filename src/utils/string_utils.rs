//! # 문자열 유틸리티
//!
//! 문자열 처리와 관련된 공통 유틸리티 함수들입니다.

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::errors::errors::SessionError;

/// 필수 문자열 필드 검증 및 정리
///
/// 빈 문자열이나 공백만 있는 경우 ValidationError를 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거한 문자열을 반환합니다.
///
/// # 인자
/// * `value` - 검증할 문자열
/// * `field_name` - 필드명 (에러 메시지용)
///
/// # 반환값
/// * `Ok(String)` - 정리된 유효한 문자열
/// * `Err(SessionError)` - 빈 문자열이거나 공백만 있는 경우
///
/// # 예제
/// ```rust,ignore
/// use crate::utils::string_utils::validate_required_string;
///
/// assert_eq!(validate_required_string("  a@b.com  ", "email").unwrap(), "a@b.com");
/// assert!(validate_required_string("   ", "email").is_err());
/// ```
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, SessionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SessionError::ValidationError(
            format!("{}은(는) 필수입니다", field_name)
        ));
    }
    Ok(trimmed.to_string())
}

/// 선택적 문자열 필드 정리
///
/// None 값이거나 빈 문자열/공백만 있는 경우 None을 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거한 문자열을 Some 옵션으로 반환합니다.
///
/// # 예제
/// ```rust,ignore
/// use crate::utils::string_utils::clean_optional_string;
///
/// assert_eq!(clean_optional_string(Some("  Hello  ".to_string())), Some("Hello".to_string()));
/// assert_eq!(clean_optional_string(Some("   ".to_string())), None);
/// assert_eq!(clean_optional_string(None), None);
/// ```
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 선택적 문자열 필드를 위한 serde deserializer
///
/// 빈 문자열이나 공백만 있는 문자열을 자동으로 None으로 변환합니다.
/// `#[serde(deserialize_with = "deserialize_optional_string")]` 속성과 함께 사용됩니다.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// 로그 출력용 짧은 다이제스트
///
/// 토큰 원문은 절대 로그에 남기지 않고, SHA-256 해시의 앞 12자리만 사용합니다.
///
/// # 예제
/// ```rust,ignore
/// log::info!("토큰 저장 완료 - 토큰: {}", short_digest(&token));
/// ```
pub fn short_digest(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    format!("{:x}", digest)[..12].to_string()
}

/// 오리진 문자열에서 호스트명만 추출합니다.
///
/// 스킴, 포트, 경로를 제거하고 소문자로 변환합니다.
///
/// # 예제
/// ```rust,ignore
/// assert_eq!(hostname_of("https://App.Example.com:8443/path"), "app.example.com");
/// ```
pub fn hostname_of(origin: &str) -> String {
    let without_scheme = origin
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(origin);
    without_scheme
        .split(['/', ':'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_string() {
        // 성공 케이스
        assert_eq!(validate_required_string("Hello", "name").unwrap(), "Hello");
        assert_eq!(validate_required_string("  World  ", "name").unwrap(), "World");

        // 실패 케이스
        assert!(validate_required_string("", "name").is_err());
        assert!(validate_required_string("\t\n", "name").is_err());
    }

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  World  ".to_string())), Some("World".to_string()));
        assert_eq!(clean_optional_string(Some("".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct TestStruct {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            first_name: Option<String>,
        }

        let result: TestStruct = serde_json::from_str(r#"{"first_name": "  지민  "}"#).unwrap();
        assert_eq!(result.first_name, Some("지민".to_string()));

        let result: TestStruct = serde_json::from_str(r#"{"first_name": "   "}"#).unwrap();
        assert_eq!(result.first_name, None);

        let result: TestStruct = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(result.first_name, None);
    }

    #[test]
    fn test_short_digest_is_stable_and_short() {
        let first = short_digest("eyJhbGciOiJIUzI1NiJ9.payload.sig");
        let second = short_digest("eyJhbGciOiJIUzI1NiJ9.payload.sig");
        assert_eq!(first, second);
        assert_eq!(first.len(), 12);
        assert_ne!(first, short_digest("other"));
    }

    #[test]
    fn test_hostname_of_origin() {
        assert_eq!(hostname_of("https://App.Example.com:8443/path"), "app.example.com");
        assert_eq!(hostname_of("localhost:3000"), "localhost");
        assert_eq!(hostname_of(""), "");
    }
}
