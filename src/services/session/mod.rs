//! 세션 생명주기 서비스 모듈
//!
//! - [`activity`] - 사용자 상호작용 이벤트 허브
//! - [`inactivity_monitor`] - 비활성 감지 타이머
//! - [`validity_gate`] - 저장된 세션 검증
//! - [`auth_controller`] - 로그인/로그아웃/초기 확인 조율

pub mod activity;
pub mod auth_controller;
pub mod inactivity_monitor;
pub mod validity_gate;

pub use activity::*;
pub use auth_controller::*;
pub use inactivity_monitor::*;
pub use validity_gate::*;
