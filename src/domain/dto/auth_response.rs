//! 인증 응답 DTO
//!
//! 인증 백엔드가 돌려주는 응답 본문을 매핑합니다.
use serde::Deserialize;

use std::collections::BTreeSet;

use crate::domain::models::session::{CustomerId, SessionProfile};
use crate::utils::string_utils::deserialize_optional_string;

/// 로그인/회원가입 응답 (`POST /auth/login`, `POST /auth/register`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// 발급된 Bearer 토큰
    pub token: String,
    /// 갱신용 토큰 (백엔드가 발급하는 경우)
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// 서버가 보고한 역할 목록
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub email_confirmed: bool,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub last_name: Option<String>,
}

impl AuthResponse {
    /// 서버가 보고한 값만으로 구성한 프로필
    pub fn server_profile(&self) -> SessionProfile {
        SessionProfile {
            email: self.email.clone(),
            roles: self.roles.iter().cloned().collect(),
            customer_id: self.customer_id.clone(),
            email_confirmed: self.email_confirmed,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// 현재 사용자 응답 (`GET /auth/current`)
///
/// 로그인 응답과 같은 모양이지만 토큰은 포함하지 않을 수 있습니다.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub email: String,
    #[serde(default)]
    pub roles: BTreeSet<String>,
    #[serde(default)]
    pub email_confirmed: bool,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub last_name: Option<String>,
}

impl From<CurrentUserResponse> for SessionProfile {
    fn from(response: CurrentUserResponse) -> Self {
        SessionProfile {
            email: response.email,
            roles: response.roles,
            customer_id: response.customer_id,
            email_confirmed: response.email_confirmed,
            first_name: response.first_name,
            last_name: response.last_name,
        }
    }
}

/// 이메일 인증 상태 응답 (`GET /auth/check-email-confirmation/{email}`)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfirmationStatus {
    /// 인증 완료 여부
    pub confirmed: bool,
    /// 인증 완료 후 재발급된 토큰
    #[serde(default)]
    pub token: Option<String>,
}

/// 에러 응답 본문
///
/// 백엔드 구현에 따라 `message`, `error`, `title` 중 하나에 설명이 담깁니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ApiErrorBody {
    /// 비어 있지 않은 첫 번째 설명 문구
    pub fn into_message(self) -> Option<String> {
        [self.message, self.error, self.title]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}
