//! 클라이언트 세션 설정 관리 모듈
//!
//! 비활성 만료 시간, 저장 레코드 수명, 저장 키/경로, 교차 오리진 쿠키 모드 등
//! 세션 코어의 동작을 결정하는 설정값을 관리합니다.
//!
//! ## 환경 변수
//!
//! ```bash
//! export SESSION_IDLE_TIMEOUT_MINUTES="30"
//! export SESSION_MAX_RECORD_AGE_HOURS="24"
//! export SESSION_STORAGE_KEY="auth_session"
//! export SESSION_STORAGE_PATH=".session/storage.json"
//! export CROSS_ORIGIN_COOKIE_MODE="auto"        # true | false | auto
//! export APP_ORIGIN="https://app.example.com"
//! export STATIC_HOSTING_PATTERNS="azurestaticapps.net,github.io"
//! ```

use std::convert::Infallible;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::string_utils::hostname_of;

/// 교차 오리진 쿠키 모드
///
/// 정적 호스팅에 배포된 프론트엔드가 다른 오리진의 백엔드를 호출하면
/// 쿠키 기반 세션 연동을 신뢰할 수 없습니다. 이 모드에서는 서버 확인이 실패해도
/// 로컬 토큰 클레임으로 세션을 유지합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieMode {
    /// 항상 교차 오리진으로 취급
    CrossOrigin,
    /// 항상 동일 오리진으로 취급
    SameOrigin,
    /// 오리진 호스트명이 정적 호스팅 패턴과 일치하면 교차 오리진
    Auto,
}

/// 문자열에서 CookieMode를 생성합니다. 알 수 없는 값은 `Auto`로 처리합니다.
impl FromStr for CookieMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "cross-origin" => CookieMode::CrossOrigin,
            "false" | "0" | "no" | "same-origin" => CookieMode::SameOrigin,
            _ => CookieMode::Auto,
        })
    }
}

impl CookieMode {

    /// 실제 교차 오리진 여부를 결정합니다.
    ///
    /// # Arguments
    ///
    /// * `hostname` - 애플리케이션 오리진의 호스트명
    /// * `patterns` - 정적 호스팅 호스트명 패턴 (접미사 또는 포함 여부로 비교)
    pub fn resolve(&self, hostname: &str, patterns: &[String]) -> bool {
        match self {
            CookieMode::CrossOrigin => true,
            CookieMode::SameOrigin => false,
            CookieMode::Auto => {
                let hostname = hostname.to_ascii_lowercase();
                patterns
                    .iter()
                    .map(|p| p.trim().to_ascii_lowercase())
                    .filter(|p| !p.is_empty())
                    .any(|p| hostname.contains(&p))
            }
        }
    }
}

/// 세션 설정 (환경 변수 접근자)
pub struct SessionConfig;

impl SessionConfig {
    /// 비활성 만료 시간(분). 기본값: 30
    pub fn idle_timeout_minutes() -> u64 {
        env::var("SESSION_IDLE_TIMEOUT_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|m: &u64| *m > 0)
            .unwrap_or(30)
    }

    /// 저장 레코드 최대 수명(시간). 기본값: 24
    pub fn max_record_age_hours() -> u64 {
        env::var("SESSION_MAX_RECORD_AGE_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|h: &u64| *h > 0)
            .unwrap_or(24)
    }

    /// 저장 키. 기본값: `auth_session`
    pub fn storage_key() -> String {
        env::var("SESSION_STORAGE_KEY").unwrap_or_else(|_| "auth_session".to_string())
    }

    /// 영구 저장 파일 경로. 기본값: `.session/storage.json`
    pub fn storage_path() -> PathBuf {
        env::var("SESSION_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".session/storage.json"))
    }

    /// 교차 오리진 쿠키 모드. 기본값: `auto`
    pub fn cookie_mode() -> CookieMode {
        env::var("CROSS_ORIGIN_COOKIE_MODE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(CookieMode::Auto)
    }

    /// 애플리케이션 오리진. 기본값: `http://localhost:3000`
    pub fn app_origin() -> String {
        env::var("APP_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string())
    }

    /// 정적 호스팅 호스트명 패턴 목록 (쉼표 구분). 기본값: `azurestaticapps.net`
    pub fn static_hosting_patterns() -> Vec<String> {
        env::var("STATIC_HOSTING_PATTERNS")
            .unwrap_or_else(|_| "azurestaticapps.net".to_string())
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// 컨트롤러에 주입되는 세션 옵션
///
/// 테스트에서는 직접 값을 채워 생성하고, 애플리케이션에서는 [`SessionOptions::from_env`]를 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// 비활성 만료 시간
    pub idle_timeout: Duration,
    /// 저장 레코드 최대 수명
    pub max_record_age: Duration,
    /// 저장 키
    pub storage_key: String,
    /// 영구 저장 파일 경로
    pub storage_path: PathBuf,
    /// 해석된 교차 오리진 여부
    pub cross_origin: bool,
    /// 애플리케이션 오리진
    pub app_origin: String,
}

impl SessionOptions {
    /// 환경 변수에서 옵션을 수집합니다.
    pub fn from_env() -> Self {
        let app_origin = SessionConfig::app_origin();
        let hostname = hostname_of(&app_origin);
        let cross_origin = SessionConfig::cookie_mode()
            .resolve(&hostname, &SessionConfig::static_hosting_patterns());

        Self {
            idle_timeout: Duration::from_secs(SessionConfig::idle_timeout_minutes() * 60),
            max_record_age: Duration::from_secs(SessionConfig::max_record_age_hours() * 60 * 60),
            storage_key: SessionConfig::storage_key(),
            storage_path: SessionConfig::storage_path(),
            cross_origin,
            app_origin,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30 * 60),
            max_record_age: Duration::from_secs(24 * 60 * 60),
            storage_key: "auth_session".to_string(),
            storage_path: PathBuf::from(".session/storage.json"),
            cross_origin: false,
            app_origin: "http://localhost:3000".to_string(),
        }
    }
}
