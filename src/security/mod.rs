//! 세션 보안 토큰

pub mod token;

pub use token::{TokenManager, SESSION_KEY};
