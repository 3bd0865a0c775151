//! CSRF 게이트
//!
//! 세션 토큰을 지연 발급하고 변경 메서드에서 제출된 토큰을 검증합니다.

mod config;
mod middleware;

pub use config::CsrfConfig;
pub(crate) use config::{default_api_prefix, default_field_name};
pub use middleware::{csrf_failure_status, CsrfMiddleware, CSRF_FAILURE_BODY};
