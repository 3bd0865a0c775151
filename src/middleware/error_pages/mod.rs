//! 에러 렌더링 게이트
//!
//! 파이프라인에서 올라온 실패를 고정 HTML 페이지로 변환합니다.

mod middleware;
mod page;
mod report;

pub use middleware::ErrorPagesMiddleware;
pub use page::render_page;
pub use report::{DiagnosticsReporter, TracingReporter};
