//! 레거시 엔트리 포인트 실행
//!
//! 해석된 스크립트 경로를 등록된 핸들러에 연결하고, 호환 파라미터를
//! 주입하며, 실행 동안 작업 디렉터리를 스크립트 디렉터리로 바꿉니다.

mod cgi;
mod executor;
mod handler;
mod workdir;

pub use cgi::{parse_cgi_output, CgiHandler};
pub use executor::{LegacyExecutor, PHP_SELF, SCRIPT_FILENAME, SCRIPT_NAME};
pub use handler::{LegacyHandler, LegacyOutcome, LegacyRegistry, LegacyScript};
pub use workdir::WorkingDirGuard;
