//! 메모리 기반 저장소
//!
//! 프로세스 수명 동안만 유지되는 키-값 저장소입니다. 선택적으로 용량 제한을
//! 두어 브라우저 저장소의 quota 초과 상황을 재현할 수 있습니다.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::errors::{SessionError, SessionResult};
use crate::repositories::tokens::transport::TokenTransport;

/// 메모리 키-값 저장소
#[derive(Debug, Default)]
pub struct MemoryTransport {
    entries: Mutex<HashMap<String, String>>,
    /// 키+값 바이트 합계 상한
    quota_bytes: Option<usize>,
}

impl MemoryTransport {
    /// 용량 제한 없는 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 키+값 바이트 합계가 `quota_bytes`를 넘으면 쓰기를 거부하는 저장소를 생성합니다.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// 키 존재 여부
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().map(|entries| entries.contains_key(key)).unwrap_or(false)
    }

    fn lock(&self) -> SessionResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| SessionError::StorageError("메모리 저장소 잠금 실패".to_string()))
    }
}

impl TokenTransport for MemoryTransport {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn read(&self, key: &str) -> SessionResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> SessionResult<()> {
        let mut entries = self.lock()?;

        if let Some(quota) = self.quota_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let required = used + key.len() + value.len();
            if required > quota {
                return Err(SessionError::StorageError(format!(
                    "저장소 용량 초과 ({} / {} bytes)",
                    required, quota
                )));
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> SessionResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
