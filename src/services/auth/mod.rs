//! 인증 백엔드 서비스 모듈
//!
//! 인증 백엔드의 REST API를 호출하는 클라이언트를 제공합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::config::AuthApiConfig;
//! use crate::services::auth::HttpAuthApi;
//!
//! let api = HttpAuthApi::new(AuthApiConfig::base_url(), AuthApiConfig::timeout())?;
//! let response = api.login(&request).await?;
//! ```

pub mod auth_api;

pub use auth_api::*;
