//! 요청/응답 값 타입과 HTTP 실패 분류

pub mod context;
pub mod error;
pub mod output;
pub mod request;
pub mod response;

pub use context::RequestContext;
pub use error::{allow_header_value, HttpError, ALLOWED_METHODS};
pub use output::Output;
pub use request::Request;
pub use response::{Response, HTML_CONTENT_TYPE};

/// 파이프라인 각 계층의 반환 타입
///
/// `Ok(None)`은 레거시 엔트리 포인트가 이미 출력을 썼다는 뜻입니다.
pub type HandlerResult = Result<Option<Response>, HttpError>;
