//! 토큰 관련 모델
//!
//! 디코딩된 JWT 클레임, 클라이언트 저장소에 영속화되는 레코드,
//! 그리고 저장소 조회 결과를 정의합니다.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::models::session::{CustomerId, SessionProfile};

/// 토큰 페이로드에서 추출한 정규화된 클레임
///
/// 백엔드는 역할/이메일 클레임을 여러 이름(표준 URI 클레임 포함)으로
/// 내려줄 수 있으므로, 디코더가 이를 하나의 형태로 모아둡니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenClaims {
    /// 토큰 주체 (`sub`)
    pub subject: Option<String>,
    /// 사용자 이메일
    pub email: Option<String>,
    /// 권한 목록
    pub roles: BTreeSet<String>,
    /// 고객 ID
    pub customer_id: Option<CustomerId>,
    /// 이메일 인증 여부
    pub email_confirmed: bool,
    /// 이름
    pub first_name: Option<String>,
    /// 성
    pub last_name: Option<String>,
    /// 만료 시간 (Unix timestamp, 초)
    pub exp: Option<i64>,
    /// 발급 시간 (Unix timestamp, 초)
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// 만료 시간을 밀리초 단위로 반환합니다.
    pub fn expires_at_millis(&self) -> Option<i64> {
        self.exp.map(|exp| exp.saturating_mul(1000))
    }

    /// `now_secs` 시점에 만료되었는지 확인합니다.
    ///
    /// 만료 클레임이 없는 토큰은 만료된 것으로 취급합니다.
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        match self.exp {
            Some(exp) => now_secs >= exp,
            None => true,
        }
    }

    /// 클레임만으로 세션 프로필을 구성합니다.
    ///
    /// 이메일 클레임이 없으면 `sub`를 사용합니다.
    pub fn to_profile(&self) -> SessionProfile {
        SessionProfile {
            email: self
                .email
                .clone()
                .or_else(|| self.subject.clone())
                .unwrap_or_default(),
            roles: self.roles.clone(),
            customer_id: self.customer_id.clone(),
            email_confirmed: self.email_confirmed,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }

    /// 클레임을 기준으로 서버 응답을 보조 자료로 사용해 프로필을 구성합니다.
    ///
    /// 역할, 고객 ID, 이메일 인증 여부는 클레임 값을 우선하고, 클레임에 없을 때만
    /// 서버 값을 사용합니다. 이메일과 이름은 서버 값을 우선합니다.
    pub fn corroborate(&self, server: &SessionProfile) -> SessionProfile {
        let claimed = self.to_profile();
        SessionProfile {
            email: if server.email.trim().is_empty() {
                claimed.email
            } else {
                server.email.clone()
            },
            roles: if claimed.roles.is_empty() {
                server.roles.clone()
            } else {
                claimed.roles
            },
            customer_id: claimed.customer_id.or_else(|| server.customer_id.clone()),
            email_confirmed: claimed.email_confirmed || server.email_confirmed,
            first_name: server.first_name.clone().or(claimed.first_name),
            last_name: server.last_name.clone().or(claimed.last_name),
        }
    }
}

/// 클라이언트 저장소에 암호화되어 저장되는 레코드
///
/// 레코드는 항상 통째로 덮어쓰며 부분 수정하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTokenRecord {
    /// Bearer 토큰
    pub token: String,
    /// 갱신용 토큰
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// 캐시된 사용자 프로필
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<SessionProfile>,
    /// 기록 시점의 환경 핑거프린트
    pub fingerprint: String,
    /// 레코드 생성 시각 (epoch ms)
    pub timestamp: i64,
    /// 토큰 만료 시각 (epoch ms)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// 저장소 조회 결과
///
/// 유효한 레코드가 없으면 모든 필드가 `None`입니다. 부분적으로 유효한 상태는 없습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    /// Bearer 토큰
    pub token: Option<String>,
    /// 갱신용 토큰
    pub refresh_token: Option<String>,
    /// 캐시된 사용자 프로필
    pub user_info: Option<SessionProfile>,
    /// 토큰 만료 시각 (epoch ms)
    pub expires_at: Option<i64>,
}

impl TokenSet {
    /// 모든 필드가 비어 있는 결과
    pub fn empty() -> Self {
        Self::default()
    }

    /// 토큰이 존재하는지 여부
    pub fn is_empty(&self) -> bool {
        self.token.is_none()
    }
}

impl From<StoredTokenRecord> for TokenSet {
    fn from(record: StoredTokenRecord) -> Self {
        Self {
            token: Some(record.token),
            refresh_token: record.refresh_token,
            user_info: record.user_info,
            expires_at: record.expires_at,
        }
    }
}
