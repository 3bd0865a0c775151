use async_trait::async_trait;
use hyper::{Method, StatusCode};
use tracing::warn;
use crate::http::{HandlerResult, RequestContext, Response};
use crate::middleware::{Middleware, Next};
use crate::security::TokenManager;
use super::config::CsrfConfig;

/// CSRF 실패 상태 코드 (419)
pub fn csrf_failure_status() -> StatusCode {
    StatusCode::from_u16(419).unwrap_or(StatusCode::FORBIDDEN)
}

pub const CSRF_FAILURE_BODY: &str =
    "<h1>Invalid CSRF token</h1><p>Please refresh the page and try again.</p>";

/// CSRF 게이트
///
/// 모든 요청에서 세션 토큰을 보장하고, API 접두사 밖의 변경 메서드는
/// 제출된 토큰이 일치해야만 통과시킵니다.
pub struct CsrfMiddleware {
    config: CsrfConfig,
    tokens: TokenManager,
}

impl CsrfMiddleware {
    pub fn new(config: CsrfConfig, tokens: TokenManager) -> Self {
        Self { config, tokens }
    }

    fn is_mutating(method: &Method) -> bool {
        matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
    }

    /// 폼 필드를 먼저, 없으면 헤더를 확인합니다.
    fn submitted_token(&self, ctx: &RequestContext) -> Option<String> {
        ctx.request
            .form_field(&self.config.field_name)
            .or_else(|| ctx.request.header(&self.config.header_name).map(str::to_string))
    }

    fn rejection(&self) -> Response {
        Response::html(csrf_failure_status(), CSRF_FAILURE_BODY)
    }
}

#[async_trait]
impl Middleware for CsrfMiddleware {
    fn name(&self) -> &str {
        "csrf"
    }

    async fn process(&self, ctx: &mut RequestContext, next: Next<'_>) -> HandlerResult {
        self.tokens.ensure_token(&ctx.session).await;

        if ctx.request.routing_path().starts_with(&self.config.api_prefix) {
            return next.run(ctx).await;
        }

        if Self::is_mutating(ctx.request.method()) {
            let submitted = self.submitted_token(ctx);
            if !self.tokens.is_token_valid(&ctx.session, submitted.as_deref()).await {
                warn!(
                    method = %ctx.request.method(),
                    path = %ctx.request.path(),
                    token_present = submitted.is_some(),
                    "CSRF 토큰 검증 실패"
                );
                return Ok(Some(self.rejection()));
            }
        }

        next.run(ctx).await
    }
}
