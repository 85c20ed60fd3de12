//! # Domain Models Module
//!
//! 세션 코어의 값 객체들을 정의합니다.
//!
//! | 모델 | 설명 |
//! |------|------|
//! | [`session::SessionProfile`] | 로그인된 사용자 프로필 |
//! | [`session::SessionContext`] | UI 계층에 노출되는 세션 스냅샷 |
//! | [`token::TokenClaims`] | 정규화된 JWT 클레임 |
//! | [`token::StoredTokenRecord`] | 암호화되어 저장되는 레코드 |
//! | [`environment::EnvironmentSignals`] | 핑거프린트/키 유도용 환경 신호 |

pub mod environment;
pub mod session;
pub mod token;

pub use environment::*;
pub use session::*;
pub use token::*;
