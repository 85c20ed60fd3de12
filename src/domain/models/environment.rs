//! 실행 환경 신호 모델
//!
//! 핑거프린트와 암호화 키 유도에 사용되는 환경 특성값을 하나의 레코드로 묶습니다.
//! 브라우저의 `navigator`/`screen`/canvas 값이나 네이티브 프로세스 정보 등
//! 구체적인 값은 호출하는 런타임이 채워 넣고, 유도 로직은 이 구조체만 소비합니다.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::utils::string_utils::hostname_of;

/// 핑거프린트/키 유도에 사용되는 환경 신호
///
/// 모든 필드는 쓰기 시점과 읽기 시점에 동일하게 재현 가능해야 합니다.
/// 값이 달라지면 저장된 레코드는 다른 기기/브라우저의 것으로 간주되어 폐기됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSignals {
    /// User-Agent 문자열
    pub user_agent: String,
    /// 선호 언어 (예: `ko-KR`)
    pub language: String,
    /// 화면 가로 해상도
    pub screen_width: u32,
    /// 화면 세로 해상도
    pub screen_height: u32,
    /// 색상 깊이 (bit)
    pub color_depth: u32,
    /// UTC 대비 오프셋 (분, `UTC - local`)
    pub timezone_offset_minutes: i32,
    /// 영구 저장소 API 존재 여부
    pub has_local_storage: bool,
    /// 세션 저장소 API 존재 여부
    pub has_session_storage: bool,
    /// 플랫폼 식별자
    pub platform: String,
    /// 쿠키 사용 가능 여부
    pub cookie_enabled: bool,
    /// canvas 렌더링 프로브 결과 (렌더링 불가 환경에서는 `None`)
    pub canvas_probe: Option<String>,
    /// 애플리케이션 오리진 (예: `https://app.example.com`)
    pub origin: String,
}

impl EnvironmentSignals {
    /// 현재 네이티브 프로세스에서 환경 신호를 수집합니다.
    ///
    /// 화면/canvas 같은 브라우저 전용 신호는 고정값을 사용하므로,
    /// 같은 머신/사용자 계정에서는 항상 같은 결과가 나옵니다.
    ///
    /// # Arguments
    ///
    /// * `origin` - 애플리케이션 오리진 (`APP_ORIGIN` 설정값)
    pub fn from_process(origin: impl Into<String>) -> Self {
        let language = std::env::var("LANG")
            .ok()
            .and_then(|lang| lang.split('.').next().map(|l| l.replace('_', "-")))
            .filter(|lang| !lang.is_empty())
            .unwrap_or_else(|| "en-US".to_string());

        // JS의 getTimezoneOffset과 같은 부호 규칙 (UTC - local)
        let timezone_offset_minutes = -(Local::now().offset().local_minus_utc() / 60);

        Self {
            user_agent: format!(
                "{}/{} ({}; {})",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
            language,
            screen_width: 0,
            screen_height: 0,
            color_depth: 0,
            timezone_offset_minutes,
            has_local_storage: true,
            has_session_storage: true,
            platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
            cookie_enabled: true,
            canvas_probe: None,
            origin: origin.into(),
        }
    }

    /// `"{width}x{height}"` 형식의 화면 해상도 문자열
    pub fn screen_resolution(&self) -> String {
        format!("{}x{}", self.screen_width, self.screen_height)
    }

    /// 오리진의 호스트명
    pub fn hostname(&self) -> String {
        hostname_of(&self.origin)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::EnvironmentSignals;

    /// 테스트용 고정 브라우저 환경
    pub fn browser_signals() -> EnvironmentSignals {
        EnvironmentSignals {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0".to_string(),
            language: "ko-KR".to_string(),
            screen_width: 1920,
            screen_height: 1080,
            color_depth: 24,
            timezone_offset_minutes: -540,
            has_local_storage: true,
            has_session_storage: true,
            platform: "Linux x86_64".to_string(),
            cookie_enabled: true,
            canvas_probe: Some("data:image/png;base64,iVBORw0KGgo".to_string()),
            origin: "https://app.example.com".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_strips_scheme_port_and_path() {
        let mut signals = fixtures::browser_signals();
        signals.origin = "https://Happy-Sea-0a1b.azurestaticapps.net:443/app".to_string();
        assert_eq!(signals.hostname(), "happy-sea-0a1b.azurestaticapps.net");

        signals.origin = "localhost:3000".to_string();
        assert_eq!(signals.hostname(), "localhost");
    }

    #[test]
    fn test_from_process_is_reproducible() {
        let first = EnvironmentSignals::from_process("http://localhost:3000");
        let second = EnvironmentSignals::from_process("http://localhost:3000");
        assert_eq!(first, second);
        assert!(first.canvas_probe.is_none());
    }
}
