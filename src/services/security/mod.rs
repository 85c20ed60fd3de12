//! 클라이언트 저장 레코드 보호 모듈
//!
//! 환경 핑거프린트/키 유도와 레코드 봉인 기능을 제공합니다.
//!
//! # Security
//!
//! 로컬 저장소의 가벼운 열람/변조를 막기 위한 난독화 계층입니다.
//! 페이지 안에서 코드를 실행할 수 있는 공격자에 대한 기밀성 보장은 아닙니다.

pub mod cipher;
pub mod fingerprint;

pub use cipher::*;
pub use fingerprint::*;
