//! # 세션 유효성 검증기
//!
//! 로컬에 저장된 토큰이 아직 쓸 만한지 판단하고, 서버에 한 번 더 확인합니다.
//!
//! ## 검증 순서
//!
//! ```text
//! 1. 로컬 토큰 없음                      → invalid
//! 2. 구조적으로 잘못되었거나 만료됨        → 저장소 삭제, invalid
//! 3. GET /auth/current (Bearer)
//!    ├─ 성공                              → valid (서버 프로필)
//!    └─ 실패
//!       ├─ 교차 오리진 배포              → valid (토큰 클레임 프로필)
//!       └─ 동일 오리진 배포              → 저장소 삭제, invalid
//! ```
//!
//! 어느 경로에서든 에러는 호출자에게 전파되지 않고 invalid 결과로 바뀝니다.

use std::sync::Arc;

use crate::domain::models::session::SessionProfile;
use crate::repositories::tokens::token_store::EncryptedTokenStore;
use crate::services::auth::auth_api::AuthApi;
use crate::services::token::decoder::{decode_token, is_token_structurally_valid};
use crate::utils::string_utils::short_digest;

/// 세션 검증 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionValidation {
    pub valid: bool,
    pub user: Option<SessionProfile>,
}

impl SessionValidation {
    fn invalid() -> Self {
        Self { valid: false, user: None }
    }

    fn valid(user: SessionProfile) -> Self {
        Self { valid: true, user: Some(user) }
    }
}

/// 세션 유효성 검증기
pub struct SessionValidator {
    store: Arc<EncryptedTokenStore>,
    api: Arc<dyn AuthApi>,
    cross_origin: bool,
}

impl SessionValidator {
    /// # Arguments
    ///
    /// * `store` - 토큰 저장소
    /// * `api` - 인증 백엔드
    /// * `cross_origin` - 교차 오리진 정적 호스팅 배포 여부
    pub fn new(store: Arc<EncryptedTokenStore>, api: Arc<dyn AuthApi>, cross_origin: bool) -> Self {
        Self { store, api, cross_origin }
    }

    /// 교차 오리진 모드 여부
    pub fn is_cross_origin(&self) -> bool {
        self.cross_origin
    }

    /// 저장된 세션을 검증합니다.
    ///
    /// 서버 확인에 성공하면 캐시된 프로필도 서버 값으로 갱신합니다.
    /// 유효하지 않은 모든 경우에 저장소를 비웁니다.
    pub async fn validate_session(&self) -> SessionValidation {
        let Some(token) = self.store.get_token() else {
            log::debug!("저장된 토큰 없음 - 세션 검증 생략");
            return SessionValidation::invalid();
        };

        if !is_token_structurally_valid(&token) {
            log::info!("저장된 토큰이 유효하지 않아 삭제합니다 - 토큰: {}", short_digest(&token));
            self.store.clear_tokens();
            return SessionValidation::invalid();
        }

        match self.api.current_user(&token).await {
            Ok(profile) => {
                if let Err(e) = self.store.update_user_info(&profile) {
                    log::warn!("캐시된 프로필 갱신 실패: {}", e);
                }
                log::info!("✅ 서버 세션 확인 완료 - 사용자: {}", profile.email);
                SessionValidation::valid(profile)
            }
            Err(e) if self.cross_origin => match decode_token(&token) {
                Ok(claims) => {
                    log::warn!("서버 세션 확인 실패, 교차 오리진 모드이므로 토큰 클레임을 사용합니다: {}", e);
                    SessionValidation::valid(claims.to_profile())
                }
                Err(decode_error) => {
                    log::warn!("토큰 클레임 해석 실패로 세션을 삭제합니다: {}", decode_error);
                    self.store.clear_tokens();
                    SessionValidation::invalid()
                }
            },
            Err(e) => {
                log::warn!("서버 세션 확인 실패로 세션을 삭제합니다: {}", e);
                self.store.clear_tokens();
                SessionValidation::invalid()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::environment::fixtures::browser_signals;
    use crate::errors::errors::SessionError;
    use crate::services::auth::auth_api::fake::FakeAuthApi;
    use crate::services::token::decoder::test_support::user_token;
    use crate::storage::MemoryTransport;
    use std::collections::BTreeSet;

    fn setup(cross_origin: bool) -> (Arc<EncryptedTokenStore>, Arc<FakeAuthApi>, SessionValidator) {
        let store = Arc::new(EncryptedTokenStore::new(
            Arc::new(MemoryTransport::new()),
            browser_signals(),
        ));
        let api = Arc::new(FakeAuthApi::default());
        let validator = SessionValidator::new(store.clone(), api.clone(), cross_origin);
        (store, api, validator)
    }

    fn server_profile() -> SessionProfile {
        SessionProfile {
            email: "jimin@example.com".to_string(),
            roles: BTreeSet::from(["User".to_string()]),
            customer_id: None,
            email_confirmed: true,
            first_name: Some("지민".to_string()),
            last_name: None,
        }
    }

    #[tokio::test]
    async fn test_no_token_is_invalid_without_server_call() {
        let (_, api, validator) = setup(false);

        let result = validator.validate_session().await;
        assert!(!result.valid);
        assert_eq!(FakeAuthApi::calls(&api.current_user_calls), 0);
    }

    #[tokio::test]
    async fn test_malformed_token_clears_store() {
        let (store, api, validator) = setup(false);
        store.store_tokens("not-a-jwt", None, None, None).unwrap();

        let result = validator.validate_session().await;
        assert!(!result.valid);
        assert!(store.get_token().is_none());
        assert_eq!(FakeAuthApi::calls(&api.current_user_calls), 0);
    }

    #[tokio::test]
    async fn test_server_confirmation_returns_server_profile() {
        let (store, api, validator) = setup(false);
        let token = user_token("jimin@example.com", &["User"], 3600);
        store.store_tokens(&token, None, None, None).unwrap();
        api.set_current_user(Ok(server_profile()));

        let result = validator.validate_session().await;
        assert!(result.valid);
        assert_eq!(result.user, Some(server_profile()));
        assert_eq!(store.get_user_info(), Some(server_profile()));
    }

    #[tokio::test]
    async fn test_same_origin_server_failure_clears_store() {
        let (store, api, validator) = setup(false);
        let token = user_token("jimin@example.com", &["User"], 3600);
        store.store_tokens(&token, None, None, None).unwrap();
        api.set_current_user(Err(SessionError::ApiError { status: 401, message: String::new() }));

        let result = validator.validate_session().await;
        assert_eq!(result, SessionValidation { valid: false, user: None });
        assert!(store.get_token().is_none());
    }

    #[tokio::test]
    async fn test_cross_origin_falls_back_to_token_claims() {
        let (store, api, validator) = setup(true);
        let token = user_token("admin@example.com", &["Admin", "User"], 3600);
        store.store_tokens(&token, None, None, None).unwrap();
        api.set_current_user(Err(SessionError::TransportError("cookie rejected".to_string())));

        let result = validator.validate_session().await;
        assert!(result.valid);
        let user = result.user.unwrap();
        assert_eq!(user.email, "admin@example.com");
        assert!(user.has_role("Admin"));
        assert!(user.email_confirmed);
        assert_eq!(store.get_token(), Some(token));
    }
}
