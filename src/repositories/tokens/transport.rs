//! 토큰 저장 전략 (TokenTransport)
//!
//! 암호화된 레코드 블롭을 실제로 어디에 보관할지 추상화합니다.
//! 배포 방식에 따라 시작 시 한 번 구현체를 선택하고, 이후 저장소 메서드 안에서는
//! 분기하지 않습니다.
//!
//! | 배포 방식 | 구현체 | 설명 |
//! |-----------|--------|------|
//! | 교차 오리진 정적 호스팅 | [`FileTransport::new`] | `SESSION_STORAGE_PATH`에 블롭 보관 |
//! | 동일 오리진 | [`FileTransport::cookie_scoped`] | 같은 디렉터리의 `session_cookie.json`에 블롭 보관 |
//!
//! 두 전략 모두 재시작 후 세션을 복원할 수 있습니다. 동일 오리진 파일은 서버 세션 쿠키와
//! 같은 수명을 가지는 것으로 취급하며, 교차 오리진 파일과 섞이지 않도록 분리합니다.
//! [`MemoryTransport`](crate::storage::MemoryTransport)는 테스트와 임베딩 용도입니다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::errors::SessionResult;
use crate::storage::FileTransport;

/// 클라이언트 키-값 저장소 추상화
///
/// 브라우저의 `localStorage`와 같은 의미를 가집니다. 구현체는 스레드 안전해야 합니다.
pub trait TokenTransport: Send + Sync {
    /// 로그용 구현체 이름
    fn name(&self) -> &'static str;

    /// 키에 저장된 값을 읽습니다. 없으면 `Ok(None)`.
    fn read(&self, key: &str) -> SessionResult<Option<String>>;

    /// 키에 값을 기록합니다. 기존 값은 덮어씁니다.
    ///
    /// # Errors
    ///
    /// * `SessionError::StorageError` - 용량 초과, I/O 실패
    fn write(&self, key: &str, value: &str) -> SessionResult<()>;

    /// 키를 삭제합니다. 키가 없어도 성공합니다.
    fn clear(&self, key: &str) -> SessionResult<()>;
}

/// 동일 오리진 모드의 저장 파일 이름
pub const SAME_ORIGIN_STORAGE_FILE: &str = "session_cookie.json";

/// 동일 오리진 모드에서 사용할 저장 파일 경로
///
/// `storage_path`와 같은 디렉터리에 [`SAME_ORIGIN_STORAGE_FILE`]을 둡니다.
pub fn same_origin_storage_path(storage_path: &Path) -> PathBuf {
    match storage_path.parent() {
        Some(parent) => parent.join(SAME_ORIGIN_STORAGE_FILE),
        None => PathBuf::from(SAME_ORIGIN_STORAGE_FILE),
    }
}

/// 배포 방식에 맞는 저장 전략을 선택합니다.
///
/// # Arguments
///
/// * `cross_origin_cookie_mode` - 교차 오리진 정적 호스팅 여부
/// * `storage_path` - 영구 저장 파일 경로
pub fn select_transport(cross_origin_cookie_mode: bool, storage_path: &Path) -> Arc<dyn TokenTransport> {
    if cross_origin_cookie_mode {
        log::info!("🔐 토큰 저장 전략: 영구 저장소 ({})", storage_path.display());
        Arc::new(FileTransport::new(storage_path))
    } else {
        let path = same_origin_storage_path(storage_path);
        log::info!("🔐 토큰 저장 전략: 동일 오리진 쿠키 저장소 ({})", path.display());
        Arc::new(FileTransport::cookie_scoped(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::environment::fixtures::browser_signals;
    use crate::repositories::tokens::token_store::EncryptedTokenStore;
    use crate::services::token::decoder::test_support::user_token;

    fn temp_storage_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("auth_session_client_{}_{}", name, uuid::Uuid::new_v4()))
            .join("storage.json")
    }

    #[test]
    fn test_select_transport_by_mode() {
        let path = temp_storage_path("select");
        assert_eq!(select_transport(true, &path).name(), "file");
        assert_eq!(select_transport(false, &path).name(), "cookie-file");
    }

    #[test]
    fn test_same_origin_path_is_separate_sibling() {
        let path = PathBuf::from(".session/storage.json");
        assert_eq!(same_origin_storage_path(&path), PathBuf::from(".session/session_cookie.json"));
        assert_eq!(same_origin_storage_path(Path::new("storage.json")), PathBuf::from("session_cookie.json"));
    }

    #[test]
    fn test_both_modes_restore_session_after_reload() {
        for cross_origin in [false, true] {
            let path = temp_storage_path("reload");
            let token = user_token("jimin@example.com", &["User"], 3600);

            let first = EncryptedTokenStore::new(select_transport(cross_origin, &path), browser_signals());
            first.store_tokens(&token, Some("refresh"), None, None).unwrap();

            let reloaded = EncryptedTokenStore::new(select_transport(cross_origin, &path), browser_signals());
            assert_eq!(reloaded.get_token(), Some(token.clone()), "cross_origin = {}", cross_origin);
            assert_eq!(reloaded.get_refresh_token().as_deref(), Some("refresh"));

            let other_mode = EncryptedTokenStore::new(select_transport(!cross_origin, &path), browser_signals());
            assert!(other_mode.get_token().is_none());

            if let Some(dir) = path.parent() {
                let _ = std::fs::remove_dir_all(dir);
            }
        }
    }
}
