use bytes::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, LOCATION};
use hyper::StatusCode;

/// 렌더링 페이지의 기본 Content-Type
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// 이 코어가 완전히 처리한 요청의 아웃바운드 응답
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    body: Bytes,
    status: StatusCode,
    headers: HeaderMap,
}

impl Response {
    pub fn new(body: impl Into<Bytes>, status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            body: body.into(),
            status,
            headers,
        }
    }

    /// 본문 없는 응답
    pub fn empty(status: StatusCode) -> Self {
        Self::new(Bytes::new(), status, HeaderMap::new())
    }

    pub fn html(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::new(body, status, HeaderMap::new())
            .with_header(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE))
    }

    /// `Location` 헤더를 가진 리다이렉트 응답
    pub fn redirect(target: &str, status: StatusCode) -> Self {
        let mut response = Self::empty(status);
        match HeaderValue::from_str(target) {
            Ok(value) => {
                response.headers.insert(LOCATION, value);
            }
            Err(e) => {
                tracing::warn!(target = %target, error = %e, "리다이렉트 대상이 헤더 값으로 유효하지 않음");
            }
        }
        response
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_response() {
        let response = Response::redirect("/login/?a=1", StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.header("location"), Some("/login/?a=1"));
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_html_response() {
        let response = Response::html(StatusCode::OK, "<p>hi</p>");
        assert_eq!(response.header("content-type"), Some(HTML_CONTENT_TYPE));
        assert_eq!(response.body().as_ref(), b"<p>hi</p>");
    }
}
