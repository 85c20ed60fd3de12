//! 세션/사용자 프로필 모델
//!
//! 로그인된 사용자를 나타내는 프로필과, UI 계층에 노출되는
//! 세션 컨텍스트 스냅샷을 정의합니다.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 고객 식별자
///
/// 백엔드는 숫자 또는 문자열로 내려줄 수 있으므로 두 형태를 모두 보존합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerId {
    /// 숫자형 고객 ID
    Number(i64),
    /// 문자열 고객 ID
    Text(String),
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerId::Number(id) => write!(f, "{}", id),
            CustomerId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// 로그인된 사용자의 프로필
///
/// `roles`, `customer_id`, `email_confirmed`는 토큰 클레임 (또는 이를 뒷받침하는
/// 서버 응답)에서 매번 다시 유도됩니다. 캐시된 프로필 필드만으로 신뢰하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfile {
    /// 사용자 이메일
    pub email: String,
    /// 권한 클레임
    #[serde(default)]
    pub roles: BTreeSet<String>,
    /// 고객 ID (고객 계정인 경우)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    /// 이메일 인증 여부
    #[serde(default)]
    pub email_confirmed: bool,
    /// 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// 성
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl SessionProfile {
    /// 특정 역할을 보유하고 있는지 확인
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// 여러 역할 중 하나라도 보유하고 있는지 확인
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }
}

/// 현재 세션 (토큰 + 프로필)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer 토큰
    pub token: String,
    /// 갱신용 토큰
    pub refresh_token: Option<String>,
    /// 사용자 프로필
    pub profile: SessionProfile,
}

/// 인증 컨트롤러의 초기화 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// 최초 `check_auth`가 아직 끝나지 않음 (라우트 가드는 대기해야 함)
    Initializing,
    /// 초기화 완료
    Ready,
}

/// UI 계층에 노출되는 세션 컨텍스트 스냅샷
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// 로그인된 사용자 (없으면 `None`)
    pub user: Option<SessionProfile>,
    /// 로그인/로그아웃 등 요청 진행 중 여부
    pub loading: bool,
    /// 초기화 상태
    pub status: AuthStatus,
}

impl SessionContext {
    /// 초기화 중인 빈 컨텍스트
    pub fn initializing() -> Self {
        Self {
            user: None,
            loading: false,
            status: AuthStatus::Initializing,
        }
    }

    /// 초기화가 진행 중인지 여부
    pub fn is_initializing(&self) -> bool {
        self.status == AuthStatus::Initializing
    }

    /// 로그인 상태 여부
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_id_accepts_number_and_string() {
        let number: CustomerId = serde_json::from_str("42").unwrap();
        assert_eq!(number, CustomerId::Number(42));

        let text: CustomerId = serde_json::from_str("\"C-42\"").unwrap();
        assert_eq!(text, CustomerId::Text("C-42".to_string()));
        assert_eq!(text.to_string(), "C-42");
    }

    #[test]
    fn test_profile_json_uses_camel_case() {
        let json = r#"{"email":"a@b.com","roles":["User"],"customerId":7,"emailConfirmed":true}"#;
        let profile: SessionProfile = serde_json::from_str(json).unwrap();

        assert!(profile.has_role("User"));
        assert!(!profile.has_role("Admin"));
        assert!(profile.has_any_role(&["Admin", "User"]));
        assert_eq!(profile.customer_id, Some(CustomerId::Number(7)));
        assert!(profile.email_confirmed);
    }
}
