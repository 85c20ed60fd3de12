//! 클라이언트 세션 코어
//!
//! 인증 백엔드와 통신하는 클라이언트 애플리케이션을 위한 세션 관리 라이브러리입니다.
//! 발급받은 토큰을 환경에 묶인 암호화 블롭으로 보관하고, 시작 시 세션을 검증하며,
//! 사용자 비활성 시 자동으로 로그아웃합니다.
//!
//! # Features
//!
//! - **암호화 토큰 저장소**: 핑거프린트 바인딩, 24시간 수명, 만료 검사
//! - **핑거프린트/키 유도**: 환경 신호 기반 SHA-256
//! - **세션 검증**: 로컬 구조 검사 후 서버 확인, 교차 오리진 배포에서는 토큰 클레임으로 대체
//! - **비활성 감지**: 사용자 입력이 없으면 한 번만 만료 콜백 호출
//! - **인증 컨트롤러**: 로그인/로그아웃/초기 확인 조율과 세션 컨텍스트 발행
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │    AuthController    │ ← 세션 컨텍스트 (watch 채널)
//! └──────────────────────┘
//!      │        │       │
//!      ▼        ▼       ▼
//! ┌────────┐ ┌──────┐ ┌───────────────────┐
//! │AuthApi │ │Valid.│ │ InactivityMonitor │ ← ActivityHub 입력
//! └────────┘ └──────┘ └───────────────────┘
//!      │        │
//!      ▼        ▼
//! ┌──────────────────────┐
//! │ EncryptedTokenStore  │ ← 핑거프린트 + RecordCipher
//! └──────────────────────┘
//!           │
//!           ▼
//! ┌──────────────────────┐
//! │    TokenTransport    │ ← 메모리 / 파일
//! └──────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use auth_session_client::config::SessionOptions;
//! use auth_session_client::repositories::tokens::{select_transport, token_store, EncryptedTokenStore};
//! use auth_session_client::services::session::{ActivityHub, AuthController};
//!
//! let options = SessionOptions::from_env();
//! let transport = select_transport(options.cross_origin, &options.storage_path);
//! let store = token_store::initialize(EncryptedTokenStore::new(transport, signals));
//!
//! let controller = AuthController::new(store, api, ActivityHub::new(), options);
//! controller.check_auth().await;
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod storage;
pub mod utils;
