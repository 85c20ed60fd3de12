//! 세션 클라이언트 전역에서 사용하는 에러 시스템
//!
//! 클라이언트 세션 코어를 위한 통합 에러 처리 시스템입니다.
//! `thiserror`를 사용하여 타입 안전하고 일관된 에러 처리를 제공합니다.
//!
//! ## 에러 분류
//!
//! | 분류 | 변형 | 처리 방식 |
//! |------|------|-----------|
//! | 전송 | `TransportError`, `ApiError` | 로그인/회원가입에서는 호출자에게 전달, 세션 검증/로그아웃에서는 삼킴 |
//! | 저장소 | `StorageError`, `CryptoError` | 쓰기 실패는 치명적, 복호화 실패는 "세션 없음"으로 자가 복구 |
//! | 토큰 | `TokenDecodeError` | 항상 "유효하지 않은 토큰"으로 취급 |
//! | 입력 | `ValidationError` | 로그인 폼에 그대로 표시 |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::errors::SessionError;
//!
//! fn require_email(email: &str) -> Result<(), SessionError> {
//!     if email.is_empty() {
//!         return Err(SessionError::ValidationError("Email is required".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// 로그인 실패 시 백엔드 메시지가 없을 때 사용하는 기본 문구
pub const GENERIC_FAILURE_MESSAGE: &str = "요청을 처리하지 못했습니다. 잠시 후 다시 시도해주세요.";

/// 세션 클라이언트 전역 에러 타입
///
/// 인증 백엔드 호출, 클라이언트 저장소, 토큰 해석 과정에서 발생할 수 있는
/// 모든 종류의 에러를 포괄하는 열거형입니다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// 네트워크 전송 실패 (연결 불가, 타임아웃 등)
    #[error("Transport error: {0}")]
    TransportError(String),

    /// 백엔드가 2xx 이외의 상태 코드로 응답
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP 상태 코드
        status: u16,
        /// 백엔드가 내려준 메시지 (없으면 기본 문구)
        message: String,
    },

    /// 클라이언트 저장소 읽기/쓰기 실패 (용량 초과 등)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 저장 레코드 암호화/복호화 실패
    #[error("Crypto error: {0}")]
    CryptoError(String),

    /// 토큰 디코딩 실패 (형식 오류, 페이로드 파싱 실패)
    #[error("Token decode error: {0}")]
    TokenDecodeError(String),

    /// 입력값 검증 에러
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 내부 에러
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl SessionError {
    /// 백엔드가 401 Unauthorized로 응답했는지 확인합니다.
    ///
    /// 로그아웃 경로에서는 401을 "이미 로그아웃된 상태"로 간주합니다.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SessionError::ApiError { status: 401, .. })
    }

    /// 사용자에게 보여줄 메시지를 반환합니다.
    ///
    /// 백엔드 메시지가 있으면 그대로 전달하고, 그 외에는 기본 문구를 사용합니다.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let err = SessionError::ApiError { status: 400, message: "이메일 인증이 필요합니다".into() };
    /// assert_eq!(err.user_message(), "이메일 인증이 필요합니다");
    /// ```
    pub fn user_message(&self) -> String {
        match self {
            SessionError::ApiError { message, .. } if !message.trim().is_empty() => message.clone(),
            SessionError::ValidationError(message) if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type SessionResult<T> = Result<T, SessionError>;

/// 외부 라이브러리 에러를 SessionError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> SessionResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> SessionResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> SessionResult<T> {
        self.map_err(|e| SessionError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> SessionResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| SessionError::InternalError(format!("{}: {}", f(), e)))
    }
}
