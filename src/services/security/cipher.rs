//! 저장 레코드 봉인(seal)/개봉(open)
//!
//! 환경에서 유도한 키로 레코드 JSON을 AES-256-GCM으로 감싸 저장소에 기록할 문자열 블롭을 만듭니다.
//!
//! ## 블롭 형식
//!
//! ```text
//! base64( version(1) || nonce(12) || ciphertext(n) || tag(16) )
//! ```
//!
//! - nonce: 레코드마다 시스템 난수로 새로 생성
//! - AAD: 버전 바이트
//!
//! 태그가 맞지 않으면 평문을 돌려주지 않으므로, 블롭의 어느 바이트라도
//! 바뀌면 레코드 전체가 무효가 됩니다. 키 유도 방식에 대한 보안 한계는
//! [`crate::services::security::fingerprint`] 문서를 참고하세요.

use aws_lc_rs::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use aws_lc_rs::rand::{SecureRandom, SystemRandom};
use base64::{engine::general_purpose, Engine as _};

use crate::errors::errors::{SessionError, SessionResult};

const BLOB_VERSION: u8 = 1;
const TAG_LEN: usize = 16;

/// 레코드 암호화기
pub struct RecordCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl RecordCipher {
    /// 32바이트 키로 암호화기를 생성합니다.
    ///
    /// # Errors
    ///
    /// * `SessionError::CryptoError` - 키 초기화 실패
    pub fn new(key: &[u8; 32]) -> SessionResult<Self> {
        let unbound = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|e| SessionError::CryptoError(format!("AES-256-GCM 키 초기화 실패: {}", e)))?;

        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// 평문을 봉인하여 base64 블롭을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `SessionError::CryptoError` - 난수 생성 또는 암호화 실패
    pub fn seal(&self, plaintext: &[u8]) -> SessionResult<String> {
        let mut nonce = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce)
            .map_err(|e| SessionError::CryptoError(format!("nonce 생성 실패: {}", e)))?;

        let mut in_out = plaintext.to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce),
                Aad::from(&[BLOB_VERSION][..]),
                &mut in_out,
            )
            .map_err(|e| SessionError::CryptoError(format!("레코드 암호화 실패: {}", e)))?;

        let mut blob = Vec::with_capacity(1 + NONCE_LEN + in_out.len());
        blob.push(BLOB_VERSION);
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&in_out);

        Ok(general_purpose::STANDARD.encode(blob))
    }

    /// 블롭을 개봉하여 평문을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `SessionError::CryptoError` - base64 오류, 길이/버전 불일치, 인증 태그 불일치
    pub fn open(&self, blob: &str) -> SessionResult<Vec<u8>> {
        let raw = general_purpose::STANDARD
            .decode(blob.trim())
            .map_err(|e| SessionError::CryptoError(format!("블롭 base64 디코딩 실패: {}", e)))?;

        if raw.len() < 1 + NONCE_LEN + TAG_LEN {
            return Err(SessionError::CryptoError("블롭 길이가 너무 짧습니다".to_string()));
        }
        if raw[0] != BLOB_VERSION {
            return Err(SessionError::CryptoError(format!(
                "지원하지 않는 블롭 버전: {}",
                raw[0]
            )));
        }

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&raw[1..1 + NONCE_LEN]);
        let mut in_out = raw[1 + NONCE_LEN..].to_vec();

        let plaintext = self
            .key
            .open_in_place(
                Nonce::assume_unique_for_key(nonce),
                Aad::from(&[BLOB_VERSION][..]),
                &mut in_out,
            )
            .map_err(|_| SessionError::CryptoError("블롭 무결성 검증 실패".to_string()))?;

        Ok(plaintext.to_vec())
    }
}
