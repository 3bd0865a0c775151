use bytes::{Bytes, BytesMut};
use hyper::header::HeaderMap;
use hyper::StatusCode;
use http_body_util::Full;
use tracing::warn;
use super::Response;

/// 아웃바운드 전송 버퍼
///
/// 커널은 `Response`를 여기에 쓰고, 레거시 핸들러는 직접 출력할 수
/// 있습니다. 한 번 시작되면 상태 코드와 헤더는 이미 전송된 것으로
/// 취급합니다.
#[derive(Debug)]
pub struct Output {
    status: StatusCode,
    headers: HeaderMap,
    body: BytesMut,
    started: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: BytesMut::new(),
            started: false,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// 상태 줄과 헤더를 씁니다. 이미 시작된 출력이면 무시됩니다.
    pub fn write_head(&mut self, status: StatusCode, headers: &HeaderMap) {
        if self.started {
            warn!(status = %status, "출력이 이미 시작되어 헤더를 보낼 수 없음");
            return;
        }
        self.status = status;
        for (name, value) in headers {
            self.headers.append(name.clone(), value.clone());
        }
        self.started = true;
    }

    pub fn write(&mut self, chunk: &[u8]) {
        self.started = true;
        self.body.extend_from_slice(chunk);
    }

    /// 응답 전체를 보냅니다. `head_only`이면 본문을 생략합니다.
    pub fn send(&mut self, response: &Response, head_only: bool) {
        if self.started {
            warn!(
                status = %response.status(),
                "레거시 출력 이후에 응답이 생성됨; 이미 보낸 상태와 헤더를 유지"
            );
        } else {
            self.write_head(response.status(), response.headers());
        }
        if !head_only {
            self.write(response.body());
        }
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

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// hyper 응답으로 변환합니다.
    pub fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        let mut response = hyper::Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::{HeaderValue, CONTENT_TYPE};

    #[test]
    fn test_send_suppresses_body_on_head() {
        let mut output = Output::new();
        let response = Response::html(StatusCode::NOT_FOUND, "missing");
        output.send(&response, true);

        assert!(output.is_started());
        assert_eq!(output.status(), StatusCode::NOT_FOUND);
        assert!(output.headers().contains_key(CONTENT_TYPE));
        assert!(output.body().is_empty());
    }

    #[test]
    fn test_send_after_partial_output_keeps_head() {
        let mut output = Output::new();
        let mut headers = HeaderMap::new();
        headers.insert("x-legacy", HeaderValue::from_static("1"));
        output.write_head(StatusCode::OK, &headers);
        output.write(b"partial");

        output.send(&Response::html(StatusCode::INTERNAL_SERVER_ERROR, "error"), false);

        assert_eq!(output.status(), StatusCode::OK);
        assert!(!output.headers().contains_key(CONTENT_TYPE));
        assert_eq!(output.body(), b"partialerror");
    }

    #[test]
    fn test_untouched_output_is_empty_ok() {
        let response = Output::new().into_hyper();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
