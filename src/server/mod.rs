//! HTTP 서버와 파이프라인 조립

pub mod handler;
pub mod listener;
pub mod error;

use std::sync::Arc;
use tracing::info;
use crate::kernel::Kernel;
use crate::legacy::{CgiHandler, LegacyExecutor, LegacyRegistry};
use crate::middleware::{Collaborators, MiddlewareManager};
use crate::routing::{LegacyDispatcher, LegacyResolver, Router};
use crate::session::SessionStore;
use crate::settings::Settings;

pub use error::Error;
pub use handler::RequestHandler;
pub use listener::ServerListener;

pub type Result<T> = std::result::Result<T, Error>;

/// 설정과 레지스트리로 커널을 조립합니다.
///
/// 인터프리터가 설정되어 있고 레지스트리에 대체 핸들러가 없으면 CGI
/// 핸들러를 대체 핸들러로 사용합니다.
pub fn build_kernel(
    settings: &Settings,
    registry: LegacyRegistry,
    collaborators: &Collaborators,
) -> Result<Kernel> {
    let registry = match (&settings.legacy.interpreter, registry.has_fallback()) {
        (Some(interpreter), false) => {
            info!(interpreter = %interpreter.display(), "CGI 대체 핸들러 사용");
            registry.with_fallback(Arc::new(CgiHandler::new(interpreter.to_string_lossy().into_owned())))
        }
        _ => registry,
    };

    let resolver = LegacyResolver::new(settings.legacy.root.clone());
    let executor = LegacyExecutor::new(&settings.legacy.root, registry)?;
    let router = Router::new(Arc::new(LegacyDispatcher::new(resolver, executor)));
    let chain = MiddlewareManager::build(&settings.middleware_configs(), collaborators)?;

    Ok(Kernel::new(Arc::new(router), chain))
}

/// 리스너를 열고 요청 처리를 시작합니다.
pub async fn serve(
    settings: &Settings,
    kernel: Kernel,
    sessions: Arc<dyn SessionStore>,
) -> Result<()> {
    let listener = ServerListener::new(&settings.server).await?;
    let handler = Arc::new(RequestHandler::new(
        Arc::new(kernel),
        sessions,
        settings.session.cookie_name.clone(),
    ));
    listener.run(handler).await
}
