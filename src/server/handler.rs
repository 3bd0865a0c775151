use std::convert::Infallible;
use std::sync::Arc;
use hyper::{Request as HyperRequest, Response as HyperResponse, StatusCode};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, COOKIE, SET_COOKIE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use http_body_util::{BodyExt, Full};
use tracing::{debug, error, warn};
use uuid::Uuid;
use crate::http::{Request, RequestContext};
use crate::kernel::Kernel;
use crate::logging::{log_request, RequestLog};
use crate::session::{Session, SessionStore};

/// hyper 요청을 파이프라인 요청으로 변환해 커널에 넘깁니다.
pub struct RequestHandler {
    kernel: Arc<Kernel>,
    sessions: Arc<dyn SessionStore>,
    cookie_name: String,
}

impl RequestHandler {
    pub fn new(kernel: Arc<Kernel>, sessions: Arc<dyn SessionStore>, cookie_name: impl Into<String>) -> Self {
        Self {
            kernel,
            sessions,
            cookie_name: cookie_name.into(),
        }
    }

    /// 쿠키에서 세션 ID를 찾습니다.
    fn session_id<B>(&self, req: &HyperRequest<B>) -> Option<String> {
        req.headers()
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == self.cookie_name && !value.is_empty())
            .map(|(_, value)| value.to_string())
    }

    fn session_cookie(&self, session_id: &str) -> Option<HeaderValue> {
        HeaderValue::from_str(&format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            self.cookie_name, session_id
        ))
        .ok()
    }

    fn internal_error() -> HyperResponse<Full<Bytes>> {
        let mut response = HyperResponse::new(Full::new(Bytes::from_static(b"Internal Server Error")));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
    }

    pub async fn handle_request<B>(
        &self,
        req: HyperRequest<B>,
    ) -> Result<HyperResponse<Full<Bytes>>, Infallible>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        let mut log = RequestLog::new(Uuid::new_v4().to_string());
        log.with_request(req.method(), req.uri().path());

        let existing = self.session_id(&req);
        let session_id = existing.clone().unwrap_or_else(|| Uuid::new_v4().to_string());

        let (parts, body) = req.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!(error = %e, "요청 본문 읽기 실패");
                log.with_response(StatusCode::BAD_REQUEST);
                log.finish();
                log_request(&log);
                let mut response = HyperResponse::new(Full::new(Bytes::new()));
                *response.status_mut() = StatusCode::BAD_REQUEST;
                return Ok(response);
            }
        };

        let uri = parts.uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        let request = Request::new(parts.method.as_str(), uri)
            .with_headers(parts.headers)
            .with_body(body);
        let session = Session::new(session_id.clone(), self.sessions.clone());
        let mut ctx = RequestContext::new(request, session);

        if let Err(e) = self.kernel.handle(&mut ctx).await {
            error!(error = %e, "파이프라인 밖으로 에러가 전파됨");
            log.with_error(&e);
            log.with_response(StatusCode::INTERNAL_SERVER_ERROR);
            log.finish();
            log_request(&log);
            return Ok(Self::internal_error());
        }

        let mut output = std::mem::take(&mut ctx.output);
        if existing.is_none() {
            if let Some(cookie) = self.session_cookie(&session_id) {
                debug!(session_id = %session_id, "새 세션 쿠키 발급");
                output.headers_mut().append(SET_COOKIE, cookie);
            }
        }

        log.with_response(output.status());
        log.finish();
        log_request(&log);

        Ok(output.into_hyper())
    }

    pub async fn handle_connection<I>(&self, io: I) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        I: hyper::rt::Read + hyper::rt::Write + Send + Unpin + 'static,
    {
        http1::Builder::new()
            .serve_connection(
                io,
                service_fn(|req| self.handle_request(req)),
            )
            .await
            .map_err(|e| e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::http::{HandlerResult, Response};
    use crate::middleware::{Handler, MiddlewareChain};
    use crate::session::MemorySessionStore;

    struct Counter;

    #[async_trait]
    impl Handler for Counter {
        async fn handle(&self, ctx: &mut RequestContext) -> HandlerResult {
            let visits: u32 = ctx.session.get("visits").await.and_then(|v| v.parse().ok()).unwrap_or(0) + 1;
            ctx.session.set("visits", visits.to_string()).await;
            Ok(Some(Response::html(StatusCode::OK, visits.to_string())))
        }
    }

    fn handler() -> RequestHandler {
        let kernel = Kernel::new(Arc::new(Counter), MiddlewareChain::new());
        RequestHandler::new(Arc::new(kernel), Arc::new(MemorySessionStore::new()), "SID")
    }

    async fn body_of(response: HyperResponse<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_new_session_sets_cookie() {
        let handler = handler();
        let req = HyperRequest::get("/").body(Full::new(Bytes::new())).unwrap();

        let response = handler.handle_request(req).await.unwrap();

        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap().to_string();
        assert!(cookie.starts_with("SID="));
        assert!(cookie.ends_with("; Path=/; HttpOnly; SameSite=Lax"));
        assert_eq!(body_of(response).await, "1");
    }

    #[tokio::test]
    async fn test_existing_session_is_reused() {
        let handler = handler();
        let first = handler
            .handle_request(HyperRequest::get("/").body(Full::new(Bytes::new())).unwrap())
            .await
            .unwrap();
        let cookie = first.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        let pair = cookie.split(';').next().unwrap().to_string();

        let req = HyperRequest::get("/")
            .header(COOKIE, format!("other=1; {}", pair))
            .body(Full::new(Bytes::new()))
            .unwrap();
        let second = handler.handle_request(req).await.unwrap();

        assert!(second.headers().get(SET_COOKIE).is_none());
        assert_eq!(body_of(second).await, "2");
    }

    #[tokio::test]
    async fn test_cookieless_sessions_expire() {
        let store = Arc::new(MemorySessionStore::with_idle_ttl(std::time::Duration::from_millis(50)));
        let kernel = Kernel::new(Arc::new(Counter), MiddlewareChain::new());
        let handler = RequestHandler::new(Arc::new(kernel), store.clone(), "SID");

        for _ in 0..200 {
            let req = HyperRequest::get("/").body(Full::new(Bytes::new())).unwrap();
            handler.handle_request(req).await.unwrap();
        }
        assert_eq!(store.session_count().await, 200);

        tokio::time::sleep(std::time::Duration::from_millis(80)).await;
        let req = HyperRequest::get("/").body(Full::new(Bytes::new())).unwrap();
        handler.handle_request(req).await.unwrap();

        assert_eq!(store.session_count().await, 1);
    }
}
