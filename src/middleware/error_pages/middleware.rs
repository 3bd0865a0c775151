use std::sync::Arc;
use async_trait::async_trait;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::StatusCode;
use tracing::error;
use crate::http::{HandlerResult, HttpError, RequestContext, Response, HTML_CONTENT_TYPE};
use crate::middleware::{Middleware, Next};
use super::page::render_page;
use super::report::DiagnosticsReporter;

const METHOD_NOT_ALLOWED_TITLE: &str = "Method Not Allowed";
const METHOD_NOT_ALLOWED_MESSAGE: &str = "The requested method is not allowed for this resource.";
const NOT_FOUND_TITLE: &str = "Page Not Found";
const NOT_FOUND_MESSAGE: &str = "Sorry, we could not find the page you were looking for.";
const REQUEST_ERROR_TITLE: &str = "Request Error";
const REQUEST_ERROR_MESSAGE: &str = "An unexpected error occurred.";
const SERVER_ERROR_TITLE: &str = "Server Error";
const SERVER_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// 가장 바깥쪽 에러 렌더링 게이트
///
/// 실패만 응답으로 바꿉니다. 정상 응답과 "응답 없음"은 그대로
/// 통과시킵니다.
pub struct ErrorPagesMiddleware {
    home_link: String,
    reporter: Arc<dyn DiagnosticsReporter>,
}

impl ErrorPagesMiddleware {
    pub fn new(home_link: impl Into<String>, reporter: Arc<dyn DiagnosticsReporter>) -> Self {
        Self {
            home_link: home_link.into(),
            reporter,
        }
    }

    /// 실패를 렌더링된 응답으로 변환합니다.
    pub fn render(&self, failure: &HttpError) -> Response {
        let (title, message) = match failure {
            HttpError::MethodNotAllowed { .. } => (METHOD_NOT_ALLOWED_TITLE, METHOD_NOT_ALLOWED_MESSAGE),
            HttpError::NotFound { .. } => (NOT_FOUND_TITLE, NOT_FOUND_MESSAGE),
            HttpError::Status { message, .. } if !message.is_empty() => (REQUEST_ERROR_TITLE, message.as_str()),
            HttpError::Status { .. } => (REQUEST_ERROR_TITLE, REQUEST_ERROR_MESSAGE),
            HttpError::Unclassified(_) => (SERVER_ERROR_TITLE, SERVER_ERROR_MESSAGE),
        };

        let status = if failure.is_typed() {
            failure.status_code()
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let mut headers = failure.headers();
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
        }

        Response::new(render_page(title, message, &self.home_link), status, headers)
    }
}

#[async_trait]
impl Middleware for ErrorPagesMiddleware {
    fn name(&self) -> &str {
        "error-pages"
    }

    async fn process(&self, ctx: &mut RequestContext, next: Next<'_>) -> HandlerResult {
        match next.run(ctx).await {
            Ok(result) => Ok(result),
            Err(failure) => {
                if let HttpError::Unclassified(source) = &failure {
                    error!(
                        method = %ctx.request.method(),
                        path = %ctx.request.path(),
                        error = %source,
                        "요청 처리 중 예기치 않은 오류"
                    );
                    self.reporter.report(source.as_ref());
                }
                Ok(Some(self.render(&failure)))
            }
        }
    }
}
