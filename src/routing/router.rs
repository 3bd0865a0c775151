use std::sync::Arc;
use async_trait::async_trait;
use hyper::header::{HeaderValue, ALLOW};
use hyper::{Method, StatusCode};
use tracing::debug;
use crate::http::{allow_header_value, HandlerResult, HttpError, RequestContext, Response, ALLOWED_METHODS};
use crate::middleware::Handler;
use super::dispatcher::Dispatch;

/// 모든 경로를 받는 단일 라우트
///
/// `GET`, `POST`, `HEAD`, `OPTIONS`만 바인딩되어 있으며 다른 메서드는
/// 경로 해석 전에 405로 실패합니다.
pub struct Router {
    dispatcher: Arc<dyn Dispatch>,
    allow: HeaderValue,
}

impl Router {
    pub fn new(dispatcher: Arc<dyn Dispatch>) -> Self {
        Self {
            dispatcher,
            allow: HeaderValue::from_static("GET, POST, HEAD, OPTIONS"),
        }
    }

    pub async fn dispatch(&self, ctx: &mut RequestContext) -> HandlerResult {
        let method = ctx.request.method().clone();

        if !ALLOWED_METHODS.contains(&method) {
            debug!(method = %method, allow = %allow_header_value(&ALLOWED_METHODS), "허용되지 않은 메서드");
            return Err(HttpError::method_not_allowed(&ALLOWED_METHODS));
        }

        if method == Method::OPTIONS {
            return Ok(Some(
                Response::empty(StatusCode::NO_CONTENT).with_header(ALLOW, self.allow.clone()),
            ));
        }

        self.dispatcher.dispatch(ctx).await
    }
}

#[async_trait]
impl Handler for Router {
    async fn handle(&self, ctx: &mut RequestContext) -> HandlerResult {
        self.dispatch(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use crate::http::Request;
    use crate::session::{MemorySessionStore, Session};

    #[derive(Default)]
    struct CountingDispatch {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Dispatch for CountingDispatch {
        async fn dispatch(&self, _ctx: &mut RequestContext) -> HandlerResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Response::html(StatusCode::OK, "legacy")))
        }
    }

    fn context(method: &str, path: &str) -> RequestContext {
        RequestContext::new(
            Request::new(method, path),
            Session::new("s", Arc::new(MemorySessionStore::new())),
        )
    }

    #[tokio::test]
    async fn test_options_short_circuits() {
        let dispatch = Arc::new(CountingDispatch::default());
        let router = Router::new(dispatch.clone());

        for path in ["/any/path", "/../nope", "/"] {
            let response = router.dispatch(&mut context("OPTIONS", path)).await.unwrap().unwrap();
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
            assert_eq!(response.header("allow"), Some("GET, POST, HEAD, OPTIONS"));
            assert!(response.body().is_empty());
        }
        assert_eq!(dispatch.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unlisted_methods_are_rejected() {
        let dispatch = Arc::new(CountingDispatch::default());
        let router = Router::new(dispatch.clone());

        for method in ["PUT", "DELETE", "PATCH", "TRACE"] {
            let err = router.dispatch(&mut context(method, "/index.php")).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(err.headers().get(ALLOW).unwrap(), "GET, POST, HEAD, OPTIONS");
        }
        assert_eq!(dispatch.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_allowed_methods_are_delegated() {
        let dispatch = Arc::new(CountingDispatch::default());
        let router = Router::new(dispatch.clone());

        for method in ["GET", "POST", "HEAD"] {
            router.dispatch(&mut context(method, "/")).await.unwrap();
        }
        assert_eq!(dispatch.calls.load(Ordering::SeqCst), 3);
    }
}
