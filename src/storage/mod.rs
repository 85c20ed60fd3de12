//! 클라이언트 저장소 계층 모듈
//!
//! [`TokenTransport`](crate::repositories::tokens::transport::TokenTransport)의
//! 구현체들을 제공합니다.
//!
//! - [`memory`] - 프로세스 수명 동안만 유지되는 저장소 (용량 제한 옵션)
//! - [`file`] - JSON 파일 기반 영구 저장소
//!
//! # 환경 설정
//!
//! ```bash
//! SESSION_STORAGE_PATH=.session/storage.json  # 기본값
//! ```

pub mod file;
pub mod memory;

pub use file::FileTransport;
pub use memory::MemoryTransport;
