//! # 인증 컨텍스트 컨트롤러
//!
//! "누가 로그인했는가"에 대한 단일 진실 공급원입니다.
//! 토큰 저장소, 세션 검증기, 비활성 감지기를 조율하고,
//! UI 계층에는 [`SessionContext`] 스냅샷과 변경 알림만 노출합니다.
//!
//! ## 동시성 규칙
//!
//! - 비활성 감지기는 슬롯 하나에만 존재하며, 항상 기존 인스턴스를 해제한 뒤 새로 만듭니다.
//! - 로그인/로그아웃/종료는 세션 세대(generation)를 올립니다. 이전 세대에 묶인
//!   비활성 콜백이나 검증 결과는 무시됩니다.
//! - `check_auth`는 컨트롤러 수명 동안 한 번만 실행됩니다.
//! - `shutdown` 이후 도착한 비동기 결과는 상태에 반영하지 않습니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let controller = AuthController::new(store, api, hub, SessionOptions::from_env());
//! controller.check_auth().await;
//! controller.wait_until_initialized().await;
//!
//! match controller.login("user@example.com", "password").await {
//!     Ok(profile) => log::info!("로그인: {}", profile.email),
//!     Err(e) => eprintln!("{}", e.user_message()),
//! }
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::watch;
use validator::Validate;

use crate::config::session_config::SessionOptions;
use crate::domain::dto::auth_request::{LoginRequest, RegisterRequest};
use crate::domain::dto::auth_response::AuthResponse;
use crate::domain::models::session::{AuthStatus, Session, SessionContext, SessionProfile};
use crate::errors::errors::{SessionError, SessionResult};
use crate::repositories::tokens::token_store::EncryptedTokenStore;
use crate::services::auth::auth_api::AuthApi;
use crate::services::session::activity::ActivityHub;
use crate::services::session::inactivity_monitor::{IdleCallback, InactivityMonitor};
use crate::services::session::validity_gate::SessionValidator;
use crate::services::token::decoder::decode_token;
use crate::utils::string_utils::{short_digest, validate_required_string};

/// 인증 컨텍스트 컨트롤러
pub struct AuthController {
    store: Arc<EncryptedTokenStore>,
    api: Arc<dyn AuthApi>,
    validator: SessionValidator,
    hub: Arc<ActivityHub>,
    options: SessionOptions,
    session: Mutex<Option<Session>>,
    monitor: Mutex<Option<InactivityMonitor>>,
    generation: AtomicU64,
    check_started: AtomicBool,
    alive: AtomicBool,
    context_tx: watch::Sender<SessionContext>,
}

impl AuthController {
    /// 컨트롤러를 생성합니다. 초기 상태는 `Initializing`입니다.
    ///
    /// # Arguments
    ///
    /// * `store` - 암호화 토큰 저장소
    /// * `api` - 인증 백엔드
    /// * `hub` - 사용자 상호작용 이벤트 허브
    /// * `options` - 세션 옵션 (비활성 시간, 교차 오리진 모드 등)
    pub fn new(
        store: Arc<EncryptedTokenStore>,
        api: Arc<dyn AuthApi>,
        hub: Arc<ActivityHub>,
        options: SessionOptions,
    ) -> Arc<Self> {
        let validator = SessionValidator::new(store.clone(), api.clone(), options.cross_origin);
        let (context_tx, _) = watch::channel(SessionContext::initializing());

        Arc::new(Self {
            store,
            api,
            validator,
            hub,
            options,
            session: Mutex::new(None),
            monitor: Mutex::new(None),
            generation: AtomicU64::new(0),
            check_started: AtomicBool::new(false),
            alive: AtomicBool::new(true),
            context_tx,
        })
    }

    /// 현재 세션 컨텍스트 스냅샷
    pub fn context(&self) -> SessionContext {
        self.context_tx.borrow().clone()
    }

    /// 세션 컨텍스트 변경 알림 수신기
    pub fn subscribe(&self) -> watch::Receiver<SessionContext> {
        self.context_tx.subscribe()
    }

    /// 초기 세션 확인이 끝날 때까지 기다립니다.
    ///
    /// 라우트 가드는 이 메서드가 반환된 뒤에 로그인 여부를 판단해야 합니다.
    pub async fn wait_until_initialized(&self) {
        let mut rx = self.subscribe();
        if rx.wait_for(|ctx| !ctx.is_initializing()).await.is_err() {
            log::debug!("세션 컨텍스트 채널이 닫혀 초기화 대기를 종료합니다");
        }
    }

    /// 현재 세션 (토큰 포함)
    pub fn session(&self) -> Option<Session> {
        self.session.lock().ok().and_then(|s| s.clone())
    }

    /// 로그인 상태 여부
    pub fn is_authenticated(&self) -> bool {
        self.current_profile().is_some()
    }

    /// 현재 사용자가 해당 역할을 가지고 있는지 확인합니다. 세션이 없으면 `false`.
    pub fn has_role(&self, role: &str) -> bool {
        self.current_profile()
            .map(|profile| profile.has_role(role))
            .unwrap_or(false)
    }

    /// 현재 사용자의 이메일 인증 여부. 세션이 없으면 `false`.
    pub fn is_email_confirmed(&self) -> bool {
        self.current_profile()
            .map(|profile| profile.email_confirmed)
            .unwrap_or(false)
    }

    fn current_profile(&self) -> Option<SessionProfile> {
        self.session
            .lock()
            .ok()
            .and_then(|s| s.as_ref().map(|session| session.profile.clone()))
    }

    /// 초기 세션 확인
    ///
    /// 컨트롤러 수명 동안 한 번만 실행되며, 두 번째 호출부터는 아무것도 하지 않습니다.
    /// 유효하면 상태를 채우고 비활성 감지기를 무장하며, 아니면 상태와 감지기를 정리합니다.
    /// 어떤 경우에도 끝나면 상태가 `Ready`가 됩니다.
    pub async fn check_auth(self: &Arc<Self>) {
        if self.check_started.swap(true, Ordering::SeqCst) {
            log::debug!("세션 확인이 이미 실행되었습니다");
            return;
        }

        let generation = self.generation.load(Ordering::SeqCst);
        log::info!("🔍 저장된 세션 확인 시작");
        let validation = self.validator.validate_session().await;

        if !self.alive.load(Ordering::SeqCst) {
            log::debug!("컨트롤러가 종료되어 세션 확인 결과를 버립니다");
            return;
        }

        if self.generation.load(Ordering::SeqCst) != generation {
            log::debug!("세션 확인 중 새로운 로그인/로그아웃이 있어 결과를 버립니다");
            self.publish(|ctx| ctx.status = AuthStatus::Ready);
            return;
        }

        let restored = match (validation.valid, validation.user) {
            (true, Some(user)) => {
                let tokens = self.store.get_tokens();
                tokens.token.map(|token| {
                    let profile = decode_token(&token)
                        .map(|claims| claims.corroborate(&user))
                        .unwrap_or(user);
                    Session {
                        token,
                        refresh_token: tokens.refresh_token,
                        profile,
                    }
                })
            }
            _ => None,
        };

        match restored {
            Some(session) => {
                log::info!("✅ 세션 복원 완료 - 사용자: {}", session.profile.email);
                let profile = session.profile.clone();
                self.set_session(Some(session));
                self.arm_monitor(generation);
                self.publish(move |ctx| {
                    ctx.user = Some(profile);
                    ctx.status = AuthStatus::Ready;
                });
            }
            None => {
                log::info!("복원할 세션이 없습니다");
                self.destroy_monitor();
                self.set_session(None);
                self.publish(|ctx| {
                    ctx.user = None;
                    ctx.status = AuthStatus::Ready;
                });
            }
        }
    }

    /// 이메일/비밀번호로 로그인합니다.
    ///
    /// # Errors
    ///
    /// * `SessionError::ValidationError` - 입력값 검증 실패 (백엔드 호출 없음)
    /// * `SessionError::ApiError` / `TransportError` - 백엔드 에러 (그대로 전달)
    /// * `SessionError::TokenDecodeError` - 발급된 토큰을 해석할 수 없음
    /// * `SessionError::StorageError` - 세션 저장 실패
    pub async fn login(self: &Arc<Self>, email: &str, password: &str) -> SessionResult<SessionProfile> {
        let request = LoginRequest {
            email: validate_required_string(email, "이메일")?,
            password: password.to_string(),
        };
        request
            .validate()
            .map_err(|e| SessionError::ValidationError(e.to_string()))?;

        let generation = self.begin_session_change();
        self.publish(|ctx| ctx.loading = true);

        let result = match self.api.login(&request).await {
            Ok(response) => self.establish_session(generation, response),
            Err(e) => {
                log::warn!("로그인 실패 - 이메일: {}, 에러: {}", request.email, e);
                Err(e)
            }
        };

        self.publish(|ctx| ctx.loading = false);
        result
    }

    /// 회원가입 후 바로 로그인 상태로 전환합니다.
    ///
    /// # Errors
    ///
    /// [`login`](Self::login)과 같습니다.
    pub async fn register(self: &Arc<Self>, request: RegisterRequest) -> SessionResult<SessionProfile> {
        request
            .validate()
            .map_err(|e| SessionError::ValidationError(e.to_string()))?;

        let generation = self.begin_session_change();
        self.publish(|ctx| ctx.loading = true);

        let result = match self.api.register(&request).await {
            Ok(response) => self.establish_session(generation, response),
            Err(e) => {
                log::warn!("회원가입 실패 - 이메일: {}, 에러: {}", request.email, e);
                Err(e)
            }
        };

        self.publish(|ctx| ctx.loading = false);
        result
    }

    /// 로그아웃합니다.
    ///
    /// 로컬 상태, 저장소, 비활성 감지기는 백엔드 호출 전에 정리하므로 호출 결과나
    /// 중간 취소와 관계없이 항상 로그아웃 상태가 됩니다. 401 응답은 이미 로그아웃된 것으로 간주합니다.
    /// 백엔드 응답을 기다리는 동안 새 로그인이 시작되면 그 세션은 건드리지 않습니다.
    pub async fn logout(&self) {
        let token = self
            .session()
            .map(|session| session.token)
            .or_else(|| self.store.get_token());

        let generation = self.begin_session_change();
        self.store.clear_tokens();
        self.set_session(None);
        self.publish(|ctx| {
            ctx.user = None;
            ctx.loading = true;
        });

        match self.api.logout(token.as_deref()).await {
            Ok(()) => log::info!("👋 로그아웃 완료"),
            Err(e) if e.is_unauthorized() => log::debug!("이미 로그아웃된 세션입니다"),
            Err(e) => log::warn!("로그아웃 요청 실패, 로컬 세션만 정리했습니다: {}", e),
        }

        if self.generation.load(Ordering::SeqCst) != generation {
            log::debug!("로그아웃 응답 대기 중 새로운 세션 작업이 있어 상태를 그대로 둡니다");
            return;
        }
        self.publish(|ctx| ctx.loading = false);
    }

    /// 이메일 인증 상태를 다시 확인합니다.
    ///
    /// 인증이 완료되었으면 현재 사용자 프로필을 다시 받아 상태를 갱신하고 `true`를 반환합니다.
    /// 미인증이거나 통신에 실패하면 상태를 바꾸지 않고 `false`를 반환합니다.
    pub async fn refresh_email_confirmation(&self) -> bool {
        let Some(session) = self.session() else {
            return false;
        };
        let generation = self.generation.load(Ordering::SeqCst);

        let status = match self
            .api
            .check_email_confirmation(&session.profile.email, Some(&session.token))
            .await
        {
            Ok(status) => status,
            Err(e) => {
                log::warn!("이메일 인증 상태 확인 실패: {}", e);
                return false;
            }
        };

        if !status.confirmed {
            return false;
        }

        let token = status.token.unwrap_or_else(|| session.token.clone());
        let server_profile = match self.api.current_user(&token).await {
            Ok(profile) => profile,
            Err(e) => {
                log::warn!("이메일 인증 후 사용자 정보 조회 실패: {}", e);
                return false;
            }
        };

        if !self.alive.load(Ordering::SeqCst) || self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }

        let profile = decode_token(&token)
            .map(|claims| claims.corroborate(&server_profile))
            .unwrap_or(server_profile);

        if token != session.token {
            if let Err(e) = self.store.update_tokens(&token, None, None) {
                log::warn!("재발급된 토큰 저장 실패: {}", e);
                return false;
            }
        }
        if let Err(e) = self.store.update_user_info(&profile) {
            log::warn!("캐시된 프로필 갱신 실패: {}", e);
        }

        log::info!("📧 이메일 인증 확인 - 사용자: {}", profile.email);
        self.set_session(Some(Session {
            token,
            refresh_token: session.refresh_token,
            profile: profile.clone(),
        }));
        self.publish(move |ctx| ctx.user = Some(profile));
        true
    }

    /// 백그라운드 토큰 갱신 결과를 반영하고 비활성 타이머를 연장합니다.
    ///
    /// # Errors
    ///
    /// * `SessionError::ValidationError` - 활성 세션이 없음
    /// * `SessionError::StorageError` - 저장 실패
    pub fn apply_token_refresh(&self, token: &str, refresh_token: Option<&str>) -> SessionResult<()> {
        let Some(session) = self.session() else {
            return Err(SessionError::ValidationError(
                "갱신할 세션이 없습니다".to_string(),
            ));
        };

        self.store.update_tokens(token, refresh_token, None)?;

        let profile = decode_token(token)
            .map(|claims| claims.corroborate(&session.profile))
            .unwrap_or(session.profile);
        let refresh_token = refresh_token.map(str::to_string).or(session.refresh_token);

        self.set_session(Some(Session {
            token: token.to_string(),
            refresh_token,
            profile: profile.clone(),
        }));
        self.publish(move |ctx| ctx.user = Some(profile));

        if let Ok(slot) = self.monitor.lock() {
            if let Some(monitor) = slot.as_ref() {
                monitor.extend_session();
            }
        }

        log::info!("🔄 토큰 갱신 반영 - 토큰: {}", short_digest(token));
        Ok(())
    }

    /// 컨트롤러를 종료합니다 (UI 언마운트).
    ///
    /// 이후 도착하는 비동기 결과는 버려지고, 비활성 감지기는 해제됩니다.
    pub fn shutdown(&self) {
        self.publish(|ctx| {
            ctx.loading = false;
            ctx.status = AuthStatus::Ready;
        });
        self.alive.store(false, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.destroy_monitor();
        log::debug!("인증 컨트롤러 종료");
    }

    /// 세션 세대를 올리고 기존 감지기를 해제합니다.
    fn begin_session_change(&self) -> u64 {
        self.destroy_monitor();
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// 로그인/회원가입 응답으로 세션을 구성하고 저장합니다.
    fn establish_session(self: &Arc<Self>, generation: u64, response: AuthResponse) -> SessionResult<SessionProfile> {
        let claims = decode_token(&response.token)?;
        let profile = claims.corroborate(&response.server_profile());

        if !self.alive.load(Ordering::SeqCst) || self.generation.load(Ordering::SeqCst) != generation {
            return Err(SessionError::InternalError(
                "더 새로운 세션 작업으로 로그인 결과가 취소되었습니다".to_string(),
            ));
        }

        self.store.store_tokens(
            &response.token,
            response.refresh_token.as_deref(),
            Some(&profile),
            claims.expires_at_millis(),
        )?;

        log::info!(
            "✅ 로그인 완료 - 사용자: {}, 역할: {:?}, 토큰: {}",
            profile.email,
            profile.roles,
            short_digest(&response.token)
        );

        self.set_session(Some(Session {
            token: response.token,
            refresh_token: response.refresh_token,
            profile: profile.clone(),
        }));
        self.arm_monitor(generation);

        let published = profile.clone();
        self.publish(move |ctx| ctx.user = Some(published));
        Ok(profile)
    }

    fn set_session(&self, session: Option<Session>) {
        if let Ok(mut slot) = self.session.lock() {
            *slot = session;
        }
    }

    fn publish<F>(&self, update: F)
    where
        F: FnOnce(&mut SessionContext),
    {
        if !self.alive.load(Ordering::SeqCst) {
            return;
        }
        self.context_tx.send_modify(update);
    }

    /// 기존 감지기를 해제한 뒤 새 감지기를 무장합니다.
    fn arm_monitor(self: &Arc<Self>, generation: u64) {
        let Ok(mut slot) = self.monitor.lock() else {
            return;
        };
        if let Some(previous) = slot.take() {
            previous.destroy();
        }

        let weak: Weak<Self> = Arc::downgrade(self);
        let callback: IdleCallback = Arc::new(move || {
            let weak = weak.clone();
            tokio::spawn(async move {
                if let Some(controller) = weak.upgrade() {
                    controller.handle_idle_timeout(generation).await;
                }
            });
        });

        match InactivityMonitor::new(self.hub.clone(), self.options.idle_timeout, callback) {
            Ok(monitor) => *slot = Some(monitor),
            Err(e) => log::error!("비활성 감지기 생성 실패: {}", e),
        }
    }

    fn destroy_monitor(&self) {
        let previous = self.monitor.lock().ok().and_then(|mut slot| slot.take());
        if let Some(monitor) = previous {
            monitor.destroy();
        }
    }

    async fn handle_idle_timeout(&self, generation: u64) {
        if !self.alive.load(Ordering::SeqCst) || self.generation.load(Ordering::SeqCst) != generation {
            log::debug!("이전 세션의 비활성 만료 알림을 무시합니다");
            return;
        }
        log::info!("⏰ 비활성 시간 초과로 자동 로그아웃합니다");
        self.logout().await;
    }
}
