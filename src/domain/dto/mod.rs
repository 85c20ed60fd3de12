//! 인증 백엔드 요청/응답 DTO 모듈
//!
//! - [`auth_request`] - 로그인/회원가입 요청 (`validator` 검증 포함)
//! - [`auth_response`] - 로그인, 현재 사용자, 이메일 인증 상태, 에러 응답

pub mod auth_request;
pub mod auth_response;

pub use auth_request::*;
pub use auth_response::*;
