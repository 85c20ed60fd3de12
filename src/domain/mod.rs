//! # Domain Layer Module
//!
//! 세션 코어의 도메인 계층입니다.
//!
//! ## 모듈 구성
//!
//! ```text
//! domain/
//! ├── dto/       - 인증 백엔드 요청/응답 본문
//! └── models/    - 세션 프로필, 토큰 레코드, 환경 신호
//! ```
//!
//! ## 데이터 흐름
//!
//! ```text
//! AuthResponse (dto) ──decode──► TokenClaims ──corroborate──► SessionProfile
//!                                                      │
//!                                                      ▼
//!                                          StoredTokenRecord (암호화 저장)
//! ```

pub mod dto;
pub mod models;

pub use dto::*;
pub use models::*;
