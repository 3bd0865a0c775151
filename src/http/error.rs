use hyper::header::{HeaderMap, HeaderValue, ALLOW};
use hyper::{Method, StatusCode};

/// 라우터가 허용하는 고정 메서드 목록
pub static ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::HEAD, Method::OPTIONS];

/// `Allow` 헤더 값 (`GET, POST, HEAD, OPTIONS`)
pub fn allow_header_value(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// 파이프라인 전체에서 사용하는 HTTP 실패 타입
///
/// 에러 페이지 미들웨어만 이 값을 응답으로 변환합니다. 나머지 계층은
/// 그대로 전파합니다.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// 경로 해석 결과가 없음 (404)
    #[error("{message}")]
    NotFound { message: String },

    /// 허용되지 않은 메서드 (405, `Allow` 헤더 포함)
    #[error("{message}")]
    MethodNotAllowed {
        allowed: Vec<Method>,
        message: String,
    },

    /// 그 밖의 의도된 HTTP 실패
    #[error("{message}")]
    Status {
        status: StatusCode,
        message: String,
        headers: HeaderMap,
    },

    /// 분류되지 않은 실패 (레거시 핸들러나 협력 객체가 던진 에러)
    #[error(transparent)]
    Unclassified(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HttpError {
    pub fn not_found() -> Self {
        Self::NotFound {
            message: "Page not found".to_string(),
        }
    }

    pub fn method_not_allowed(allowed: &[Method]) -> Self {
        Self::MethodNotAllowed {
            allowed: allowed.to_vec(),
            message: "Method not allowed".to_string(),
        }
    }

    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
            headers: HeaderMap::new(),
        }
    }

    /// 문자열 메시지만 가진 분류되지 않은 실패를 만듭니다.
    pub fn unclassified(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Unclassified(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Status { status, .. } => *status,
            Self::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 실패가 운반하는 헤더. 405는 `Allow` 헤더를 항상 포함합니다.
    pub fn headers(&self) -> HeaderMap {
        match self {
            Self::MethodNotAllowed { allowed, .. } => {
                let mut headers = HeaderMap::new();
                if let Ok(value) = HeaderValue::from_str(&allow_header_value(allowed)) {
                    headers.insert(ALLOW, value);
                }
                headers
            }
            Self::Status { headers, .. } => headers.clone(),
            Self::NotFound { .. } | Self::Unclassified(_) => HeaderMap::new(),
        }
    }

    pub fn is_typed(&self) -> bool {
        !matches!(self, Self::Unclassified(_))
    }
}

impl From<std::io::Error> for HttpError {
    fn from(err: std::io::Error) -> Self {
        Self::Unclassified(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_header_value() {
        assert_eq!(allow_header_value(&ALLOWED_METHODS), "GET, POST, HEAD, OPTIONS");
    }

    #[test]
    fn test_method_not_allowed_carries_allow_header() {
        let err = HttpError::method_not_allowed(&ALLOWED_METHODS);
        assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            err.headers().get(ALLOW).unwrap(),
            "GET, POST, HEAD, OPTIONS"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(HttpError::not_found().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            HttpError::status(StatusCode::FORBIDDEN, "nope").status_code(),
            StatusCode::FORBIDDEN
        );
        let err = HttpError::unclassified("boom");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_typed());
        assert_eq!(err.to_string(), "boom");
    }
}
