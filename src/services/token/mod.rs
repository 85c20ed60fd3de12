//! 토큰 해석 서비스 모듈
//!
//! 서버가 발급한 JWT의 페이로드를 클라이언트에서 해석하는 기능을 제공합니다.

pub mod decoder;

pub use decoder::*;
