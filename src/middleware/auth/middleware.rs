use std::sync::Arc;
use async_trait::async_trait;
use tracing::debug;
use crate::http::{HandlerResult, RequestContext};
use crate::middleware::{Middleware, Next};
use super::config::AuthConfig;
use super::guard::{AuthGuard, AuthOutcome, EnvironmentBootstrap};

/// 인증 게이트
pub struct AuthMiddleware {
    config: AuthConfig,
    bootstrap: Arc<dyn EnvironmentBootstrap>,
    guard: Arc<dyn AuthGuard>,
}

impl AuthMiddleware {
    pub fn new(
        config: AuthConfig,
        bootstrap: Arc<dyn EnvironmentBootstrap>,
        guard: Arc<dyn AuthGuard>,
    ) -> Self {
        Self {
            config,
            bootstrap,
            guard,
        }
    }
}

#[async_trait]
impl Middleware for AuthMiddleware {
    fn name(&self) -> &str {
        "auth"
    }

    async fn process(&self, ctx: &mut RequestContext, next: Next<'_>) -> HandlerResult {
        self.bootstrap.bootstrap(ctx).await?;

        let path = ctx.request.routing_path();
        if path.starts_with(&self.config.api_prefix) {
            return next.run(ctx).await;
        }

        if self.config.is_public(&path) {
            debug!(path = %path, "공개 경로, 인증 생략");
            return next.run(ctx).await;
        }

        match self.guard.require(ctx).await? {
            AuthOutcome::Authenticated => next.run(ctx).await,
            AuthOutcome::Rejected(response) => Ok(response),
        }
    }
}
