use std::sync::Arc;
use legacy_front::{
    legacy::LegacyRegistry,
    logging::init_logging,
    middleware::Collaborators,
    server,
    session::MemorySessionStore,
    settings::Settings,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let settings = match Settings::load().await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("설정 로드 실패: {}", e);
            std::process::exit(1);
        }
    };

    let _log_guard = init_logging(&settings.logging);

    let kernel = match server::build_kernel(&settings, LegacyRegistry::new(), &Collaborators::default()) {
        Ok(kernel) => kernel,
        Err(e) => {
            error!(error = %e, "파이프라인 구성 실패");
            std::process::exit(1);
        }
    };

    info!(
        root = %settings.legacy.root.display(),
        middlewares = ?kernel.middleware_names(),
        "Legacy Front 시작"
    );

    let sessions = Arc::new(MemorySessionStore::with_idle_ttl(settings.session.idle_ttl()));
    if let Err(e) = server::serve(&settings, kernel, sessions).await {
        error!(error = %e, "서버 실행 실패");
        std::process::exit(1);
    }
}
