//! 인증 백엔드 API 설정 관리 모듈
//!
//! 백엔드 기본 URL과 요청 타임아웃을 환경 변수에서 읽어옵니다.

use std::env;
use std::time::Duration;

/// 인증 백엔드 API 설정
///
/// ## 환경 변수
///
/// ```bash
/// export AUTH_API_BASE_URL="https://api.example.com/api"
/// export AUTH_HTTP_TIMEOUT_SECS="30"
/// ```
pub struct AuthApiConfig;

impl AuthApiConfig {
    /// API 기본 URL을 반환합니다.
    ///
    /// # Returns
    ///
    /// 기본 URL. 기본값: `http://localhost:8080/api`
    pub fn base_url() -> String {
        env::var("AUTH_API_BASE_URL").unwrap_or_else(|_| "http://localhost:8080/api".to_string())
    }

    /// 요청별 타임아웃(초)을 반환합니다.
    ///
    /// # Returns
    ///
    /// 타임아웃 초. 기본값: 30, 0이나 파싱 불가 값은 기본값으로 대체
    pub fn timeout_secs() -> u64 {
        env::var("AUTH_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .unwrap_or(30)
    }

    /// 요청별 타임아웃
    pub fn timeout() -> Duration {
        Duration::from_secs(Self::timeout_secs())
    }
}
