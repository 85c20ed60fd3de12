//! 토큰 저장 리포지토리 모듈
//!
//! 세션 레코드의 암호화 저장, 검증, 삭제를 담당합니다.
//!
//! # Features
//!
//! - **환경 바인딩**: 기록 시점의 핑거프린트와 다르면 레코드 폐기
//! - **수명 관리**: 24시간이 지난 레코드와 만료된 토큰 자동 폐기
//! - **자가 복구**: 복호화/파싱 실패는 "세션 없음"으로 처리하고 삭제
//! - **저장 전략**: 배포 방식에 따라 메모리/파일 저장소 선택
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::repositories::tokens::{select_transport, EncryptedTokenStore};
//!
//! let store = EncryptedTokenStore::new(select_transport(false, path), signals);
//! store.store_tokens(&token, None, Some(&profile), None)?;
//! assert!(store.is_token_valid());
//! ```

pub mod token_store;
pub mod transport;

pub use token_store::*;
pub use transport::*;
