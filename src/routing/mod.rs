//! 레거시 경로 라우팅
//!
//! 단일 catch-all 라우트가 메서드를 검사한 뒤 모든 결정을 레거시 경로
//! 해석기에 맡깁니다.

mod dispatcher;
mod resolver;
mod router;

pub use dispatcher::{append_query, Dispatch, LegacyDispatcher};
pub use resolver::{LegacyResolver, Resolution, INDEX_SCRIPT, SCRIPT_EXTENSION};
pub use router::Router;
