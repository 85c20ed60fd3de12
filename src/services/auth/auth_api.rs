//! # 인증 백엔드 API 클라이언트
//!
//! 인증 백엔드의 REST 엔드포인트를 호출하는 [`AuthApi`] trait과
//! `reqwest` 기반 구현체 [`HttpAuthApi`]를 제공합니다.
//!
//! ## 엔드포인트
//!
//! | 메서드 | 경로 | 인증 | 응답 |
//! |--------|------|------|------|
//! | `POST` | `/auth/login` | - | [`AuthResponse`] |
//! | `POST` | `/auth/register` | - | [`AuthResponse`] |
//! | `POST` | `/auth/logout` | Bearer | `204` |
//! | `GET` | `/auth/current` | Bearer | [`CurrentUserResponse`] |
//! | `GET` | `/auth/check-email-confirmation/{email}` | Bearer | [`EmailConfirmationStatus`] |
//!
//! ## 에러 매핑
//!
//! - 연결 실패, 타임아웃, 응답 파싱 실패 → `SessionError::TransportError`
//! - 2xx 이외의 상태 코드 → `SessionError::ApiError { status, message }`
//!   (`message`는 응답 본문의 `message`/`error`/`title` 중 첫 번째 값)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::domain::dto::auth_request::{LoginRequest, RegisterRequest};
use crate::domain::dto::auth_response::{
    ApiErrorBody, AuthResponse, CurrentUserResponse, EmailConfirmationStatus,
};
use crate::domain::models::session::SessionProfile;
use crate::errors::errors::{SessionError, SessionResult};

/// 인증 백엔드 추상화
///
/// 컨트롤러와 세션 검증기는 이 trait에만 의존하므로 테스트에서는
/// 가짜 구현체로 교체할 수 있습니다.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// 이메일/비밀번호 로그인
    async fn login(&self, request: &LoginRequest) -> SessionResult<AuthResponse>;

    /// 회원가입 (성공 시 로그인과 같은 응답)
    async fn register(&self, request: &RegisterRequest) -> SessionResult<AuthResponse>;

    /// 로그아웃. 호출자는 401 응답을 "이미 로그아웃됨"으로 처리해야 합니다.
    async fn logout(&self, token: Option<&str>) -> SessionResult<()>;

    /// 서버 측 세션 확인 및 현재 사용자 프로필 조회
    async fn current_user(&self, token: &str) -> SessionResult<SessionProfile>;

    /// 이메일 인증 상태 조회
    async fn check_email_confirmation(
        &self,
        email: &str,
        token: Option<&str>,
    ) -> SessionResult<EmailConfirmationStatus>;
}

/// `reqwest` 기반 인증 백엔드 클라이언트
///
/// 쿠키 저장소를 활성화하여 동일 오리진 배포에서 서버 세션 쿠키를 유지합니다.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
}

impl HttpAuthApi {
    /// 새 클라이언트를 생성합니다.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API 기본 URL (예: `http://localhost:8080/api`)
    /// * `timeout` - 요청별 타임아웃
    ///
    /// # Errors
    ///
    /// * `SessionError::InternalError` - HTTP 클라이언트 생성 실패 (TLS 초기화 등)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> SessionResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| SessionError::InternalError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 2xx가 아니면 응답 본문에서 메시지를 꺼내 `ApiError`로 변환합니다.
    async fn ensure_success(response: Response) -> SessionResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(ApiErrorBody::into_message)
            .unwrap_or_default();

        log::debug!("인증 API 실패 응답 - 상태: {}, 메시지: {}", status.as_u16(), message);
        Err(SessionError::ApiError {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse_json<T: DeserializeOwned>(response: Response, what: &str) -> SessionResult<T> {
        let response = Self::ensure_success(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| SessionError::TransportError(format!("{} 응답 파싱 실패: {}", what, e)))
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> SessionResult<AuthResponse> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await
            .map_err(|e| SessionError::TransportError(format!("로그인 요청 실패: {}", e)))?;

        Self::parse_json(response, "로그인").await
    }

    async fn register(&self, request: &RegisterRequest) -> SessionResult<AuthResponse> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await
            .map_err(|e| SessionError::TransportError(format!("회원가입 요청 실패: {}", e)))?;

        Self::parse_json(response, "회원가입").await
    }

    async fn logout(&self, token: Option<&str>) -> SessionResult<()> {
        let mut builder = self.client.post(self.url("/auth/logout"));
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SessionError::TransportError(format!("로그아웃 요청 실패: {}", e)))?;

        Self::ensure_success(response).await.map(|_| ())
    }

    async fn current_user(&self, token: &str) -> SessionResult<SessionProfile> {
        let response = self
            .client
            .get(self.url("/auth/current"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SessionError::TransportError(format!("현재 사용자 조회 요청 실패: {}", e)))?;

        Self::parse_json::<CurrentUserResponse>(response, "현재 사용자")
            .await
            .map(SessionProfile::from)
    }

    async fn check_email_confirmation(
        &self,
        email: &str,
        token: Option<&str>,
    ) -> SessionResult<EmailConfirmationStatus> {
        let path = format!("/auth/check-email-confirmation/{}", urlencoding::encode(email));
        let mut builder = self.client.get(self.url(&path));
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SessionError::TransportError(format!("이메일 인증 상태 요청 실패: {}", e)))?;

        Self::parse_json(response, "이메일 인증 상태").await
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! 호출을 기록하는 테스트용 `AuthApi` 구현체

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// 미리 정해둔 응답을 돌려주는 가짜 백엔드
    #[derive(Default)]
    pub struct FakeAuthApi {
        pub login_response: Mutex<Option<SessionResult<AuthResponse>>>,
        pub register_response: Mutex<Option<SessionResult<AuthResponse>>>,
        pub current_user_response: Mutex<Option<SessionResult<SessionProfile>>>,
        pub email_status_response: Mutex<Option<SessionResult<EmailConfirmationStatus>>>,
        pub logout_response: Mutex<Option<SessionResult<()>>>,
        /// `current_user` 응답 전 대기 시간
        pub current_user_delay: Mutex<Option<Duration>>,
        /// `logout` 응답 전 대기 시간
        pub logout_delay: Mutex<Option<Duration>>,
        pub login_calls: AtomicUsize,
        pub register_calls: AtomicUsize,
        pub logout_calls: AtomicUsize,
        pub current_user_calls: AtomicUsize,
        pub email_status_calls: AtomicUsize,
    }

    impl FakeAuthApi {
        pub fn set_login(&self, response: SessionResult<AuthResponse>) {
            *self.login_response.lock().unwrap() = Some(response);
        }

        pub fn set_register(&self, response: SessionResult<AuthResponse>) {
            *self.register_response.lock().unwrap() = Some(response);
        }

        pub fn set_current_user(&self, response: SessionResult<SessionProfile>) {
            *self.current_user_response.lock().unwrap() = Some(response);
        }

        pub fn set_email_status(&self, response: SessionResult<EmailConfirmationStatus>) {
            *self.email_status_response.lock().unwrap() = Some(response);
        }

        pub fn set_logout(&self, response: SessionResult<()>) {
            *self.logout_response.lock().unwrap() = Some(response);
        }

        pub fn set_current_user_delay(&self, delay: Duration) {
            *self.current_user_delay.lock().unwrap() = Some(delay);
        }

        pub fn set_logout_delay(&self, delay: Duration) {
            *self.logout_delay.lock().unwrap() = Some(delay);
        }

        pub fn calls(counter: &AtomicUsize) -> usize {
            counter.load(Ordering::SeqCst)
        }

        fn unconfigured<T>() -> SessionResult<T> {
            Err(SessionError::TransportError("응답이 설정되지 않았습니다".to_string()))
        }
    }

    #[async_trait]
    impl AuthApi for FakeAuthApi {
        async fn login(&self, _request: &LoginRequest) -> SessionResult<AuthResponse> {
            self.login_calls.fetch_add(1, Ordering::SeqCst);
            self.login_response
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(Self::unconfigured)
        }

        async fn register(&self, _request: &RegisterRequest) -> SessionResult<AuthResponse> {
            self.register_calls.fetch_add(1, Ordering::SeqCst);
            self.register_response
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(Self::unconfigured)
        }

        async fn logout(&self, _token: Option<&str>) -> SessionResult<()> {
            self.logout_calls.fetch_add(1, Ordering::SeqCst);
            let delay = *self.logout_delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.logout_response.lock().unwrap().clone().unwrap_or(Ok(()))
        }

        async fn current_user(&self, _token: &str) -> SessionResult<SessionProfile> {
            self.current_user_calls.fetch_add(1, Ordering::SeqCst);
            let delay = *self.current_user_delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.current_user_response
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(Self::unconfigured)
        }

        async fn check_email_confirmation(
            &self,
            _email: &str,
            _token: Option<&str>,
        ) -> SessionResult<EmailConfirmationStatus> {
            self.email_status_calls.fetch_add(1, Ordering::SeqCst);
            self.email_status_response
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(Self::unconfigured)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = HttpAuthApi::new("http://localhost:8080/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.url("/auth/login"), "http://localhost:8080/api/auth/login");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // 닫힌 포트로 연결 시도
        let api = HttpAuthApi::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let request = LoginRequest {
            email: "a@b.com".to_string(),
            password: "pw".to_string(),
        };

        let result = api.login(&request).await;
        assert!(matches!(result, Err(SessionError::TransportError(_))));
    }
}
