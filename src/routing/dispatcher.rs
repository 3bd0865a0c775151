use async_trait::async_trait;
use tracing::debug;
use crate::http::{HandlerResult, HttpError, RequestContext, Response};
use crate::legacy::LegacyExecutor;
use super::resolver::{LegacyResolver, Resolution};

/// 라우터가 위임하는 해석/실행 단계
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(&self, ctx: &mut RequestContext) -> HandlerResult;
}

/// 경로 해석기와 레거시 실행기를 묶은 기본 디스패처
#[derive(Clone)]
pub struct LegacyDispatcher {
    resolver: LegacyResolver,
    executor: LegacyExecutor,
}

impl LegacyDispatcher {
    pub fn new(resolver: LegacyResolver, executor: LegacyExecutor) -> Self {
        Self { resolver, executor }
    }
}

#[async_trait]
impl Dispatch for LegacyDispatcher {
    async fn dispatch(&self, ctx: &mut RequestContext) -> HandlerResult {
        let resolution = self
            .resolver
            .resolve(ctx.request.path())
            .ok_or_else(HttpError::not_found)?;

        match resolution {
            Resolution::Redirect { target, status } => {
                let target = append_query(&target, ctx.request.query_string());
                debug!(path = %ctx.request.path(), target = %target, "정규화 리다이렉트");
                Ok(Some(Response::redirect(&target, status)))
            }
            Resolution::Script(path) => self.executor.execute(&path, ctx).await,
        }
    }
}

/// 리다이렉트 대상에 원래 쿼리 문자열을 다시 붙입니다.
pub fn append_query(target: &str, query: &str) -> String {
    if query.is_empty() {
        return target.to_string();
    }
    let separator = if target.contains('?') { '&' } else { '?' };
    format!("{}{}{}", target, separator, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_query() {
        assert_eq!(append_query("/login/", ""), "/login/");
        assert_eq!(append_query("/login/", "a=1"), "/login/?a=1");
        assert_eq!(append_query("/login/?x=2", "a=1"), "/login/?x=2&a=1");
    }
}
