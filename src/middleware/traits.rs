use std::sync::Arc;
use async_trait::async_trait;
use crate::http::{HandlerResult, RequestContext};

/// 미들웨어 트레이트
///
/// 요청과 continuation을 받아 선택적 응답을 만듭니다. continuation은 0번
/// 또는 1번 호출할 수 있고, 결과를 바꾸거나 버리거나 아예 건너뛸 수
/// 있습니다.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// 미들웨어의 고유 이름을 반환합니다.
    fn name(&self) -> &str;

    async fn process(&self, ctx: &mut RequestContext, next: Next<'_>) -> HandlerResult;
}

/// 파이프라인 가장 안쪽의 터미널 핸들러
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut RequestContext) -> HandlerResult;
}

/// 남은 미들웨어와 터미널 핸들러를 가리키는 continuation
///
/// 인덱스 기반으로 동작하므로 요청마다 체인을 다시 조립하지 않습니다.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    middlewares: &'a [Arc<dyn Middleware>],
    terminal: &'a dyn Handler,
}

impl<'a> Next<'a> {
    pub fn new(middlewares: &'a [Arc<dyn Middleware>], terminal: &'a dyn Handler) -> Self {
        Self {
            middlewares,
            terminal,
        }
    }

    /// 다음 미들웨어(없으면 터미널 핸들러)를 실행합니다.
    pub async fn run(self, ctx: &mut RequestContext) -> HandlerResult {
        match self.middlewares.split_first() {
            Some((current, rest)) => {
                current
                    .process(ctx, Next::new(rest, self.terminal))
                    .await
            }
            None => self.terminal.handle(ctx).await,
        }
    }
}
