//! Legacy Front는 파일 단위 레거시 스크립트 앞에 놓이는 요청 수명주기
//! 엔진입니다.
//!
//! # 주요 기능
//!
//! - 양파 구조의 미들웨어 파이프라인 (에러 페이지 → CSRF → 인증 → 라우터)
//! - URL 경로를 레거시 진입점으로 매핑하는 경로 해석과 정규화 리다이렉트
//! - 레거시 스크립트 실행 (작업 디렉토리 전환, 호환 파라미터 주입, CGI)
//!
//! # 예제
//!
//! ```no_run
//! use legacy_front::routing::{LegacyResolver, Resolution};
//!
//! let resolver = LegacyResolver::new("/srv/app/src");
//!
//! match resolver.resolve("/reports") {
//!     Some(Resolution::Redirect { target, .. }) => assert_eq!(target, "/reports/"),
//!     Some(Resolution::Script(path)) => println!("실행: {}", path.display()),
//!     None => println!("찾을 수 없음"),
//! }
//! ```

pub mod http;
pub mod kernel;
pub mod legacy;
pub mod logging;
pub mod middleware;
pub mod routing;
pub mod security;
pub mod server;
pub mod session;
pub mod settings;
