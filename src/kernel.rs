use std::sync::Arc;
use hyper::Method;
use tracing::{debug, warn};
use crate::http::{HandlerResult, HttpError, RequestContext};
use crate::middleware::{Handler, MiddlewareChain};

/// 미들웨어 체인과 터미널 핸들러를 묶은 요청 파이프라인
///
/// 시작 시 한 번 조립되며 이후에는 변경되지 않습니다.
#[derive(Clone)]
pub struct Kernel {
    chain: MiddlewareChain,
    terminal: Arc<dyn Handler>,
}

impl Kernel {
    pub fn new(terminal: Arc<dyn Handler>, chain: MiddlewareChain) -> Self {
        Self { chain, terminal }
    }

    pub fn middleware_names(&self) -> Vec<&str> {
        self.chain.names()
    }

    /// 전체 파이프라인을 실행하고 결과를 그대로 돌려줍니다.
    pub async fn dispatch(&self, ctx: &mut RequestContext) -> HandlerResult {
        self.chain.execute(ctx, self.terminal.as_ref()).await
    }

    /// 파이프라인을 실행하고 생성된 응답을 출력 버퍼에 씁니다.
    ///
    /// 응답이 없으면 레거시 경로가 이미 출력한 것으로 보고 아무것도 하지
    /// 않습니다.
    pub async fn handle(&self, ctx: &mut RequestContext) -> Result<(), HttpError> {
        match self.dispatch(ctx).await? {
            Some(response) => {
                let head_only = ctx.request.method() == Method::HEAD;
                ctx.output.send(&response, head_only);
            }
            None => {
                if !ctx.output.is_started() {
                    warn!(path = %ctx.request.path(), "응답도 레거시 출력도 없음");
                } else {
                    debug!(path = %ctx.request.path(), "레거시 핸들러가 출력을 작성함");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hyper::StatusCode;
    use crate::http::{Request, Response};
    use crate::session::{MemorySessionStore, Session};

    struct Hello;

    #[async_trait]
    impl Handler for Hello {
        async fn handle(&self, _ctx: &mut RequestContext) -> HandlerResult {
            Ok(Some(Response::html(StatusCode::OK, "hello")))
        }
    }

    struct Writes;

    #[async_trait]
    impl Handler for Writes {
        async fn handle(&self, ctx: &mut RequestContext) -> HandlerResult {
            ctx.output.write(b"legacy");
            Ok(None)
        }
    }

    fn context(method: &str) -> RequestContext {
        RequestContext::new(
            Request::new(method, "/"),
            Session::new("s", Arc::new(MemorySessionStore::new())),
        )
    }

    #[tokio::test]
    async fn test_response_is_written() {
        let kernel = Kernel::new(Arc::new(Hello), MiddlewareChain::new());
        let mut ctx = context("GET");

        kernel.handle(&mut ctx).await.unwrap();

        assert_eq!(ctx.output.status(), StatusCode::OK);
        assert_eq!(ctx.output.body(), b"hello");
    }

    #[tokio::test]
    async fn test_head_suppresses_body() {
        let kernel = Kernel::new(Arc::new(Hello), MiddlewareChain::new());
        let mut ctx = context("HEAD");

        kernel.handle(&mut ctx).await.unwrap();

        assert!(ctx.output.is_started());
        assert!(ctx.output.headers().contains_key("content-type"));
        assert!(ctx.output.body().is_empty());
    }

    #[tokio::test]
    async fn test_no_response_leaves_output_alone() {
        let kernel = Kernel::new(Arc::new(Writes), MiddlewareChain::new());
        let mut ctx = context("GET");

        kernel.handle(&mut ctx).await.unwrap();

        assert_eq!(ctx.output.body(), b"legacy");
    }
}
