//! 인증 게이트
//!
//! 요청 환경을 준비한 뒤 API 경로와 공개 경로를 제외한 모든 요청에
//! 인증된 세션을 요구합니다.

mod config;
mod guard;
mod middleware;

pub use config::AuthConfig;
pub use guard::{
    AuthGuard, AuthOutcome, EnvironmentBootstrap, SessionAuthGuard, TemplateGlobals,
    CSRF_FIELD_PARAM, CSRF_TOKEN_PARAM,
};
pub use middleware::AuthMiddleware;
