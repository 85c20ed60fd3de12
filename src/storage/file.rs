//! 파일 기반 영구 저장소
//!
//! JSON 객체 하나를 키-값 맵으로 사용하는 영구 저장소입니다.
//! 쓰기는 임시 파일에 기록한 뒤 이름을 바꿔 원자적으로 교체합니다.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::errors::{SessionError, SessionResult};
use crate::repositories::tokens::transport::TokenTransport;

/// 파일 키-값 저장소
#[derive(Debug)]
pub struct FileTransport {
    path: PathBuf,
    label: &'static str,
    // 같은 프로세스 안의 동시 쓰기 직렬화
    guard: Mutex<()>,
}

impl FileTransport {
    /// 지정한 경로를 사용하는 저장소를 생성합니다. 파일은 첫 쓰기 때 만들어집니다.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            label: "file",
            guard: Mutex::new(()),
        }
    }

    /// 동일 오리진 쿠키 세션용 저장소를 생성합니다. 저장 방식은 [`new`](Self::new)와 같습니다.
    pub fn cookie_scoped(path: impl AsRef<Path>) -> Self {
        Self {
            label: "cookie-file",
            ..Self::new(path)
        }
    }

    /// 저장 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> SessionResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| SessionError::StorageError(format!("저장 파일 읽기 실패: {}", e)))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                log::warn!("저장 파일이 손상되어 비어 있는 것으로 간주합니다 - 경로: {}, 에러: {}", self.path.display(), e);
                Ok(BTreeMap::new())
            }
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> SessionResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| SessionError::StorageError(format!("저장 디렉터리 생성 실패: {}", e)))?;
        }

        let json = serde_json::to_string(entries)
            .map_err(|e| SessionError::StorageError(format!("저장 데이터 직렬화 실패: {}", e)))?;

        let tmp_path = self.path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        fs::write(&tmp_path, json)
            .map_err(|e| SessionError::StorageError(format!("저장 파일 쓰기 실패: {}", e)))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| SessionError::StorageError(format!("저장 파일 교체 실패: {}", e)))
    }

    fn lock(&self) -> SessionResult<std::sync::MutexGuard<'_, ()>> {
        self.guard
            .lock()
            .map_err(|_| SessionError::StorageError("파일 저장소 잠금 실패".to_string()))
    }
}

impl TokenTransport for FileTransport {
    fn name(&self) -> &'static str {
        self.label
    }

    fn read(&self, key: &str) -> SessionResult<Option<String>> {
        let _guard = self.lock()?;
        Ok(self.load()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> SessionResult<()> {
        let _guard = self.lock()?;
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn clear(&self, key: &str) -> SessionResult<()> {
        let _guard = self.lock()?;
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("auth_session_client_{}_{}", name, uuid::Uuid::new_v4()))
            .join("storage.json")
    }

    #[test]
    fn test_values_survive_new_instance() {
        let path = temp_path("persist");
        FileTransport::new(&path).write("auth", "blob").unwrap();

        let reopened = FileTransport::new(&path);
        assert_eq!(reopened.read("auth").unwrap().as_deref(), Some("blob"));

        reopened.clear("auth").unwrap();
        reopened.clear("auth").unwrap();
        assert_eq!(FileTransport::new(&path).read("auth").unwrap(), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupted_file_reads_as_empty() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let transport = FileTransport::new(&path);
        assert_eq!(transport.read("auth").unwrap(), None);
        transport.write("auth", "fresh").unwrap();
        assert_eq!(transport.read("auth").unwrap().as_deref(), Some("fresh"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
