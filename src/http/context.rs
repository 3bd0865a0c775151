use crate::session::Session;
use super::{Output, Request};

/// 파이프라인을 따라 전달되는 요청 범위 컨텍스트
///
/// 전역 상태 대신 요청, 세션 핸들, 아웃바운드 전송을 한 곳에 묶습니다.
#[derive(Debug)]
pub struct RequestContext {
    pub request: Request,
    pub session: Session,
    pub output: Output,
}

impl RequestContext {
    pub fn new(request: Request, session: Session) -> Self {
        Self {
            request,
            session,
            output: Output::new(),
        }
    }
}
