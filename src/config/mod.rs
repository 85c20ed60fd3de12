//! # Configuration Module
//!
//! 세션 클라이언트의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`api_config`] - 인증 백엔드 URL, 요청 타임아웃
//! - [`session_config`] - 비활성 시간, 레코드 수명, 저장소, 교차 오리진 모드
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{AuthApiConfig, SessionOptions};
//!
//! let base_url = AuthApiConfig::base_url();
//! let options = SessionOptions::from_env();
//! println!("idle timeout: {:?}", options.idle_timeout);
//! ```
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 인증 백엔드
//! export AUTH_API_BASE_URL="https://api.example.com/api"
//! export AUTH_HTTP_TIMEOUT_SECS="30"
//!
//! # 세션
//! export SESSION_IDLE_TIMEOUT_MINUTES="30"
//! export CROSS_ORIGIN_COOKIE_MODE="auto"
//! export APP_ORIGIN="https://app.example.com"
//! ```

pub mod api_config;
pub mod session_config;

pub use api_config::*;
pub use session_config::*;
