#[derive(Debug, thiserror::Error)]
pub enum MiddlewareError {
    #[error("미들웨어 {middleware} 설정 오류: {message}")]
    Config {
        middleware: String,
        message: String,
    },

    #[error("미들웨어 설정 형식 오류: {0}")]
    InvalidFormat(#[from] serde_json::Error),
}
