//! 클라이언트 세션 코어 실행 바이너리
//!
//! 환경 설정을 읽어 토큰 저장소와 인증 컨트롤러를 구성하고,
//! 저장된 세션을 확인한 뒤 현재 세션 상태를 출력합니다.
//! `AUTH_EMAIL`/`AUTH_PASSWORD`가 설정되어 있고 복원할 세션이 없으면 로그인을 시도합니다.

use std::sync::Arc;

use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};

use auth_session_client::config::{AuthApiConfig, SessionOptions};
use auth_session_client::domain::models::environment::EnvironmentSignals;
use auth_session_client::domain::models::session::SessionContext;
use auth_session_client::errors::SessionResult;
use auth_session_client::repositories::tokens::{select_transport, token_store, EncryptedTokenStore};
use auth_session_client::services::auth::HttpAuthApi;
use auth_session_client::services::session::{ActivityHub, AuthController};

#[tokio::main]
async fn main() {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 세션 클라이언트 시작중...");

    if let Err(e) = run().await {
        error!("❌ 세션 클라이언트 실행 실패: {}", e);
        std::process::exit(1);
    }
}

/// 저장소와 컨트롤러를 구성하고 세션을 확인합니다
///
/// # Errors
///
/// * `SessionError::InternalError` - HTTP 클라이언트 생성 실패
async fn run() -> SessionResult<()> {
    let options = SessionOptions::from_env();
    info!(
        "세션 옵션 - 오리진: {}, 교차 오리진: {}, 비활성 만료: {}분",
        options.app_origin,
        options.cross_origin,
        options.idle_timeout.as_secs() / 60
    );

    let signals = EnvironmentSignals::from_process(options.app_origin.clone());
    let transport = select_transport(options.cross_origin, &options.storage_path);
    let store = token_store::initialize(
        EncryptedTokenStore::new(transport, signals)
            .with_storage_key(options.storage_key.clone())
            .with_max_record_age(options.max_record_age),
    );

    let api = Arc::new(HttpAuthApi::new(AuthApiConfig::base_url(), AuthApiConfig::timeout())?);
    let controller = AuthController::new(store, api, ActivityHub::new(), options);

    controller.check_auth().await;
    controller.wait_until_initialized().await;

    if !controller.is_authenticated() {
        login_from_env(&controller).await;
    }

    report_session(&controller.context());
    controller.shutdown();
    Ok(())
}

/// `AUTH_EMAIL`/`AUTH_PASSWORD`가 있으면 로그인을 시도합니다
async fn login_from_env(controller: &Arc<AuthController>) {
    let (Ok(email), Ok(password)) = (std::env::var("AUTH_EMAIL"), std::env::var("AUTH_PASSWORD")) else {
        info!("AUTH_EMAIL/AUTH_PASSWORD가 없어 로그인을 건너뜁니다");
        return;
    };

    match controller.login(&email, &password).await {
        Ok(profile) => info!("✅ 로그인 성공 - 사용자: {}", profile.email),
        Err(e) => {
            warn!("로그인 실패: {}", e);
            error!("{}", e.user_message());
        }
    }
}

/// 현재 세션 상태를 로그로 출력합니다
fn report_session(context: &SessionContext) {
    match &context.user {
        Some(user) => {
            let roles: Vec<&str> = user.roles.iter().map(String::as_str).collect();
            info!("👤 로그인 사용자: {}", user.email);
            info!("   역할: {}", roles.join(", "));
            info!("   이메일 인증: {}", if user.email_confirmed { "완료" } else { "미완료" });
            if let Some(customer_id) = &user.customer_id {
                info!("   고객 ID: {}", customer_id);
            }
        }
        None => info!("🔒 로그인된 사용자가 없습니다"),
    }
}

/// 프로필에 맞는 환경 파일을 로드합니다
///
/// `PROFILE` 환경 변수에 따라 `.env.prod`, `.env.dev` 또는 기본 `.env` 파일을 로드합니다.
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// 환경변수 RUST_LOG를 기반으로 로깅 레벨을 설정합니다.
/// 기본값은 info 레벨이며, 이 크레이트는 debug 레벨로 설정됩니다.
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,auth_session_client=debug"));
}
