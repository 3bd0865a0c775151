use std::error::Error;
use tracing::error;

/// 분류되지 않은 실패를 받는 진단 협력자
pub trait DiagnosticsReporter: Send + Sync {
    fn report(&self, failure: &(dyn Error + Send + Sync));
}

/// tracing 로그로 보고하는 기본 구현
#[derive(Debug, Default, Clone)]
pub struct TracingReporter;

impl DiagnosticsReporter for TracingReporter {
    fn report(&self, failure: &(dyn Error + Send + Sync)) {
        let mut chain = Vec::new();
        let mut source = failure.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        error!(
            target: "diagnostics",
            error = %failure,
            causes = ?chain,
            "처리되지 않은 실패 보고"
        );
    }
}
