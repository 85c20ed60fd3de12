use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use once_cell::sync::OnceCell;

use crate::domain::models::environment::EnvironmentSignals;
use crate::domain::models::session::SessionProfile;
use crate::domain::models::token::{StoredTokenRecord, TokenSet};
use crate::errors::errors::{SessionError, SessionResult};
use crate::repositories::tokens::transport::TokenTransport;
use crate::services::security::cipher::RecordCipher;
use crate::services::security::fingerprint::{encryption_key, fingerprint};
use crate::services::token::decoder::decode_token;
use crate::utils::string_utils::short_digest;

/// 기본 저장 키
pub const DEFAULT_STORAGE_KEY: &str = "auth_session";

/// 레코드 최대 수명 기본값 (24시간)
pub const DEFAULT_MAX_RECORD_AGE: Duration = Duration::from_secs(24 * 60 * 60);

static GLOBAL_STORE: OnceCell<Arc<EncryptedTokenStore>> = OnceCell::new();

/// 프로세스 전역 저장소 핸들을 초기화합니다.
///
/// 이미 초기화되어 있으면 전달된 저장소는 버리고 기존 핸들을 반환합니다.
///
/// # Examples
///
/// ```rust,ignore
/// let transport = select_transport(options.cross_origin, &options.storage_path);
/// let store = token_store::initialize(EncryptedTokenStore::new(transport, signals));
/// ```
pub fn initialize(store: EncryptedTokenStore) -> Arc<EncryptedTokenStore> {
    GLOBAL_STORE.get_or_init(|| Arc::new(store)).clone()
}

/// 초기화된 전역 저장소 핸들 (초기화 전이면 `None`)
pub fn instance() -> Option<Arc<EncryptedTokenStore>> {
    GLOBAL_STORE.get().cloned()
}

/// 암호화된 클라이언트 토큰 저장소
///
/// 세션 레코드 하나를 암호화된 블롭으로 고정 키 아래에 보관합니다.
/// 읽을 때마다 다음 순서로 검증하고, 첫 번째 실패에서 레코드를 삭제합니다.
///
/// 1. 복호화 및 JSON 파싱
/// 2. 핑거프린트 일치
/// 3. 레코드 나이 ≤ 최대 수명 (기본 24시간)
/// 4. 토큰 만료 시각이 미래
///
/// 핑거프린트와 암호화 키는 인스턴스당 한 번만 계산하며 저장하지 않습니다.
pub struct EncryptedTokenStore {
    transport: Arc<dyn TokenTransport>,
    signals: EnvironmentSignals,
    storage_key: String,
    max_record_age: Duration,
    fingerprint: OnceCell<String>,
    cipher: OnceCell<RecordCipher>,
}

impl EncryptedTokenStore {
    /// 기본 저장 키와 최대 수명으로 저장소를 생성합니다.
    ///
    /// # Arguments
    ///
    /// * `transport` - 블롭을 보관할 저장 전략
    /// * `signals` - 핑거프린트/키 유도에 사용할 환경 신호
    pub fn new(transport: Arc<dyn TokenTransport>, signals: EnvironmentSignals) -> Self {
        Self {
            transport,
            signals,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            max_record_age: DEFAULT_MAX_RECORD_AGE,
            fingerprint: OnceCell::new(),
            cipher: OnceCell::new(),
        }
    }

    /// 저장 키를 변경합니다.
    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self
    }

    /// 레코드 최대 수명을 변경합니다.
    pub fn with_max_record_age(mut self, max_record_age: Duration) -> Self {
        self.max_record_age = max_record_age;
        self
    }

    /// 저장 키
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    fn current_fingerprint(&self) -> &str {
        self.fingerprint.get_or_init(|| fingerprint(&self.signals))
    }

    fn cipher(&self) -> SessionResult<&RecordCipher> {
        self.cipher
            .get_or_try_init(|| RecordCipher::new(&encryption_key(&self.signals)))
    }

    fn now_millis() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// 토큰 세트를 새 레코드로 저장합니다.
    ///
    /// 기존 레코드는 통째로 덮어씁니다. `expires_at`이 없으면 토큰의 `exp` 클레임에서 유도합니다.
    ///
    /// # Arguments
    ///
    /// * `token` - Bearer 토큰
    /// * `refresh_token` - 갱신용 토큰
    /// * `user_info` - 캐시할 사용자 프로필
    /// * `expires_at` - 만료 시각 (epoch ms)
    ///
    /// # Errors
    ///
    /// * `SessionError::StorageError` - 저장소 쓰기 실패 (용량 초과 등)
    /// * `SessionError::CryptoError` - 암호화 실패
    pub fn store_tokens(
        &self,
        token: &str,
        refresh_token: Option<&str>,
        user_info: Option<&SessionProfile>,
        expires_at: Option<i64>,
    ) -> SessionResult<()> {
        let expires_at = expires_at.or_else(|| {
            decode_token(token)
                .ok()
                .and_then(|claims| claims.expires_at_millis())
        });

        let record = StoredTokenRecord {
            token: token.to_string(),
            refresh_token: refresh_token.map(str::to_string),
            user_info: user_info.cloned(),
            fingerprint: self.current_fingerprint().to_string(),
            timestamp: Self::now_millis(),
            expires_at,
        };

        self.persist_record(&record)?;
        log::info!("🔐 세션 레코드 저장 완료 - 토큰: {}", short_digest(token));
        Ok(())
    }

    /// 저장된 토큰 세트를 조회합니다.
    ///
    /// 레코드가 없거나, 복호화할 수 없거나, 검증에 실패하면 모든 필드가 `None`인
    /// 결과를 반환합니다. 실패한 레코드는 삭제됩니다.
    pub fn get_tokens(&self) -> TokenSet {
        let record = match self.load_record() {
            Ok(Some(record)) => record,
            Ok(None) => return TokenSet::empty(),
            Err(e) => {
                log::warn!("저장된 세션 레코드를 읽을 수 없어 삭제합니다: {}", e);
                self.clear_tokens();
                return TokenSet::empty();
            }
        };

        let now = Self::now_millis();

        if record.fingerprint != self.current_fingerprint() {
            log::warn!("🚨 핑거프린트 불일치 - 다른 환경에서 생성된 세션 레코드를 삭제합니다");
            self.clear_tokens();
            return TokenSet::empty();
        }

        let age_millis = now.saturating_sub(record.timestamp);
        if age_millis > self.max_record_age.as_millis() as i64 {
            log::warn!("세션 레코드가 최대 수명을 초과하여 삭제합니다 - 경과: {}ms", age_millis);
            self.clear_tokens();
            return TokenSet::empty();
        }

        if let Some(expires_at) = record.expires_at {
            if now >= expires_at {
                log::info!("저장된 토큰이 만료되어 삭제합니다 - 토큰: {}", short_digest(&record.token));
                self.clear_tokens();
                return TokenSet::empty();
            }
        }

        TokenSet::from(record)
    }

    /// 저장된 Bearer 토큰
    pub fn get_token(&self) -> Option<String> {
        self.get_tokens().token
    }

    /// 저장된 갱신용 토큰
    pub fn get_refresh_token(&self) -> Option<String> {
        self.get_tokens().refresh_token
    }

    /// 캐시된 사용자 프로필
    pub fn get_user_info(&self) -> Option<SessionProfile> {
        self.get_tokens().user_info
    }

    /// 캐시된 사용자 프로필만 교체합니다.
    ///
    /// 토큰, 갱신 토큰, 만료 시각, 생성 시각은 그대로 유지합니다.
    /// 유효한 토큰이 없으면 아무것도 하지 않습니다.
    pub fn update_user_info(&self, user_info: &SessionProfile) -> SessionResult<()> {
        let current = self.get_tokens();
        let Some(token) = current.token else {
            log::debug!("저장된 토큰이 없어 프로필 갱신을 건너뜁니다");
            return Ok(());
        };

        // 검증을 통과한 직후이므로 원본 레코드를 다시 읽어 생성 시각을 보존
        let timestamp = match self.load_record() {
            Ok(Some(record)) => record.timestamp,
            _ => Self::now_millis(),
        };

        let record = StoredTokenRecord {
            token,
            refresh_token: current.refresh_token,
            user_info: Some(user_info.clone()),
            fingerprint: self.current_fingerprint().to_string(),
            timestamp,
            expires_at: current.expires_at,
        };

        self.persist_record(&record)
    }

    /// 토큰 갱신 결과를 반영합니다.
    ///
    /// 캐시된 프로필은 유지하고, 새 갱신 토큰이 없으면 기존 갱신 토큰을 유지합니다.
    ///
    /// # Errors
    ///
    /// * `SessionError::StorageError` - 저장소 쓰기 실패
    pub fn update_tokens(
        &self,
        token: &str,
        refresh_token: Option<&str>,
        expires_at: Option<i64>,
    ) -> SessionResult<()> {
        let current = self.get_tokens();
        let refresh_token = refresh_token
            .map(str::to_string)
            .or(current.refresh_token);

        self.store_tokens(
            token,
            refresh_token.as_deref(),
            current.user_info.as_ref(),
            expires_at,
        )
    }

    /// 현재 유효한 토큰이 있는지 확인합니다.
    pub fn is_token_valid(&self) -> bool {
        let tokens = self.get_tokens();
        match (tokens.token, tokens.expires_at) {
            (Some(_), Some(expires_at)) => Self::now_millis() < expires_at,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// 저장된 레코드를 삭제합니다. 여러 번 호출해도 안전하며 실패하지 않습니다.
    pub fn clear_tokens(&self) {
        if let Err(e) = self.transport.clear(&self.storage_key) {
            log::error!("세션 레코드 삭제 실패 - 저장소: {}, 에러: {}", self.transport.name(), e);
        }
    }

    /// 레코드를 복호화해 읽습니다. 검증은 하지 않습니다.
    fn load_record(&self) -> SessionResult<Option<StoredTokenRecord>> {
        let Some(blob) = self.transport.read(&self.storage_key)? else {
            return Ok(None);
        };

        let plaintext = self.cipher()?.open(&blob)?;
        let record = serde_json::from_slice(&plaintext)
            .map_err(|e| SessionError::CryptoError(format!("세션 레코드 파싱 실패: {}", e)))?;
        Ok(Some(record))
    }

    fn persist_record(&self, record: &StoredTokenRecord) -> SessionResult<()> {
        let json = serde_json::to_vec(record)
            .map_err(|e| SessionError::InternalError(format!("세션 레코드 직렬화 실패: {}", e)))?;
        let blob = self.cipher()?.seal(&json)?;
        self.transport.write(&self.storage_key, &blob)
    }
}
