//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 도메인별로 모듈화되어 인증 백엔드 통신, 레코드 보호, 토큰 해석,
//! 세션 생명주기 관리를 담당합니다.
//!
//! # Modules
//!
//! - [`auth`] - 인증 백엔드 API 클라이언트
//! - [`security`] - 핑거프린트, 키 유도, 레코드 봉인
//! - [`token`] - JWT 페이로드 해석
//! - [`session`] - 세션 검증, 비활성 감지, 인증 컨트롤러

pub mod auth;
pub mod security;
pub mod session;
pub mod token;
