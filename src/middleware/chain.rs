use std::sync::Arc;
use crate::http::{HandlerResult, RequestContext};
use super::{Handler, Middleware, Next};

/// 시작 시 한 번 고정되는 미들웨어 목록
///
/// 첫 번째 요소가 가장 바깥쪽, 마지막 요소가 터미널 핸들러 바로 바깥입니다.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    pub fn add<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Arc::new(middleware));
    }

    pub fn add_shared(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    pub fn names(&self) -> Vec<&str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// 양파 순서로 체인을 실행합니다.
    pub async fn execute(&self, ctx: &mut RequestContext, terminal: &dyn Handler) -> HandlerResult {
        Next::new(&self.middlewares, terminal).run(ctx).await
    }
}
