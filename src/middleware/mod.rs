//! 요청 파이프라인 미들웨어
//!
//! 첫 번째로 추가된 미들웨어가 가장 바깥쪽에서 실행됩니다.

pub mod auth;
pub mod chain;
pub mod config;
pub mod csrf;
pub mod error;
pub mod error_pages;
pub mod manager;
pub mod traits;

pub use chain::MiddlewareChain;
pub use config::{MiddlewareConfig, MiddlewareType};
pub use error::MiddlewareError;
pub use manager::{create_middleware, Collaborators, MiddlewareManager};
pub use traits::{Handler, Middleware, Next};
