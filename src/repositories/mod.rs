//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! 클라이언트 저장소에 세션 레코드를 영속화하는 리포지토리를 제공합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::tokens::token_store;
//!
//! let store = token_store::instance().expect("저장소 초기화 필요");
//! let token = store.get_token();
//! ```

pub mod tokens;
