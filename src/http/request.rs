use std::collections::HashMap;
use bytes::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::Method;
use percent_encoding::percent_decode_str;

/// 인바운드 HTTP 요청 하나
///
/// 경로는 항상 `/`로 시작하며 비어 있지 않습니다. `params`는 레거시 엔트리
/// 포인트를 위한 호환 변수를 주입하는 가변 파라미터 백입니다.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: String,
    path: String,
    query: String,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    /// 메서드와 원본 URI로 요청을 만듭니다. 메서드는 대문자로 정규화됩니다.
    pub fn new(method: &str, uri: &str) -> Self {
        let method = Method::from_bytes(method.trim().to_uppercase().as_bytes())
            .unwrap_or(Method::GET);

        let (raw_path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, query),
            None => (uri, ""),
        };
        // fragment는 서버로 오지 않지만 방어적으로 잘라냄
        let raw_path = raw_path.split('#').next().unwrap_or_default();

        Self {
            method,
            uri: uri.to_string(),
            path: normalize_path(raw_path),
            query: query.to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// 디코딩되지 않은 요청 경로
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 퍼센트 디코딩된 라우팅용 경로
    pub fn routing_path(&self) -> String {
        decode_path(&self.path)
    }

    pub fn query_string(&self) -> &str {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// `application/x-www-form-urlencoded` 본문에서 필드 값을 찾습니다.
    pub fn form_field(&self, name: &str) -> Option<String> {
        let is_form = self
            .header(CONTENT_TYPE.as_str())
            .map(|ct| ct.to_ascii_lowercase().starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);
        if !is_form {
            return None;
        }

        url::form_urlencoded::parse(&self.body)
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }
}

/// 빈 경로는 `/`로, 선행 슬래시는 정확히 하나만 남깁니다.
pub(crate) fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// 퍼센트 디코딩 (`+`는 공백으로 바꾸지 않음)
pub fn decode_path(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
