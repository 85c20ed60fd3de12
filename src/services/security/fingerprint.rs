//! 환경 핑거프린트 및 암호화 키 유도
//!
//! [`EnvironmentSignals`]로부터 두 가지 값을 결정적으로 유도합니다.
//!
//! - **핑거프린트**: 저장 레코드를 현재 브라우저/기기에 묶는 바인딩 값
//! - **암호화 키**: 저장 레코드를 감싸는 대칭 키
//!
//! 키는 핑거프린트보다 좁은 신호 집합을 사용하여 같은 브라우징 세션 안에서
//! 안정적으로 재현되지만, 오리진과 머신에는 여전히 묶여 있어 다른 브라우저로
//! 복사한 블롭은 복호화되지 않습니다.
//!
//! # Security
//!
//! 키는 클라이언트에서 유도 가능하므로 이는 **난독화**입니다. 로컬 저장소를
//! 가볍게 들여다보거나 수정하는 것을 막을 뿐, 페이지 안에서 코드를 실행할 수 있는
//! 공격자에 대한 기밀성은 보장하지 않습니다.

use sha2::{Digest, Sha256};

use crate::domain::models::environment::EnvironmentSignals;

/// canvas 렌더링이 불가능한 환경(headless/test)에서 사용하는 고정값
pub const CANVAS_UNAVAILABLE: &str = "canvas-unavailable";

/// 키 유도에 섞는 고정 salt
pub const KEY_DERIVATION_SALT: &str = "auth-session-client::record-key::v1";

const FIELD_SEPARATOR: &str = "|";

/// 환경 신호로부터 핑거프린트를 계산합니다.
///
/// SHA-256 해시의 16진수 문자열을 반환합니다.
///
/// # Examples
///
/// ```rust,ignore
/// let signals = EnvironmentSignals::from_process("http://localhost:3000");
/// let fp = fingerprint(&signals);
/// assert_eq!(fp, fingerprint(&signals));
/// ```
pub fn fingerprint(signals: &EnvironmentSignals) -> String {
    let canvas = signals
        .canvas_probe
        .as_deref()
        .filter(|probe| !probe.is_empty())
        .unwrap_or(CANVAS_UNAVAILABLE);

    let components = [
        signals.user_agent.clone(),
        signals.language.clone(),
        signals.screen_resolution(),
        signals.color_depth.to_string(),
        signals.timezone_offset_minutes.to_string(),
        signals.has_local_storage.to_string(),
        signals.has_session_storage.to_string(),
        signals.platform.clone(),
        signals.cookie_enabled.to_string(),
        canvas.to_string(),
    ];

    format!("{:x}", Sha256::digest(components.join(FIELD_SEPARATOR).as_bytes()))
}

/// 환경 신호로부터 32바이트 레코드 암호화 키를 유도합니다.
pub fn encryption_key(signals: &EnvironmentSignals) -> [u8; 32] {
    let components = [
        signals.user_agent.clone(),
        signals.language.clone(),
        signals.screen_resolution(),
        signals.timezone_offset_minutes.to_string(),
        signals.origin.clone(),
        KEY_DERIVATION_SALT.to_string(),
    ];

    let digest = Sha256::digest(components.join(FIELD_SEPARATOR).as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::environment::fixtures::browser_signals;

    #[test]
    fn test_fingerprint_is_deterministic() {
        let signals = browser_signals();
        assert_eq!(fingerprint(&signals), fingerprint(&signals.clone()));
        assert_eq!(fingerprint(&signals).len(), 64);
    }

    #[test]
    fn test_fingerprint_changes_with_user_agent() {
        let signals = browser_signals();
        let mut other = signals.clone();
        other.user_agent = "Mozilla/5.0 (Windows NT 10.0) Chrome/126.0".to_string();
        assert_ne!(fingerprint(&signals), fingerprint(&other));
    }

    #[test]
    fn test_missing_canvas_uses_sentinel() {
        let mut without = browser_signals();
        without.canvas_probe = None;
        let mut empty = browser_signals();
        empty.canvas_probe = Some(String::new());
        let mut sentinel = browser_signals();
        sentinel.canvas_probe = Some(CANVAS_UNAVAILABLE.to_string());

        assert_eq!(fingerprint(&without), fingerprint(&sentinel));
        assert_eq!(fingerprint(&empty), fingerprint(&sentinel));
    }

    #[test]
    fn test_key_ignores_noisy_signals_but_binds_origin() {
        let signals = browser_signals();

        let mut noisy = signals.clone();
        noisy.color_depth = 30;
        noisy.canvas_probe = None;
        noisy.cookie_enabled = false;
        assert_eq!(encryption_key(&signals), encryption_key(&noisy));

        let mut other_origin = signals.clone();
        other_origin.origin = "https://evil.example.net".to_string();
        assert_ne!(encryption_key(&signals), encryption_key(&other_origin));
    }
}
