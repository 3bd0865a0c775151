use std::collections::HashMap;
use std::sync::Arc;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use crate::middleware::auth::{
    AuthConfig, AuthGuard, AuthMiddleware, EnvironmentBootstrap, SessionAuthGuard, TemplateGlobals,
};
use crate::middleware::csrf::{CsrfConfig, CsrfMiddleware};
use crate::middleware::error_pages::{DiagnosticsReporter, ErrorPagesMiddleware, TracingReporter};
use crate::security::TokenManager;
use super::config::MiddlewareType;
use super::{Middleware, MiddlewareChain, MiddlewareConfig, MiddlewareError};

/// 게이트들이 공유하는 외부 협력 객체
///
/// `None`인 항목은 설정에서 만든 기본 구현으로 채워집니다.
#[derive(Clone, Default)]
pub struct Collaborators {
    pub tokens: TokenManager,
    pub bootstrap: Option<Arc<dyn EnvironmentBootstrap>>,
    pub guard: Option<Arc<dyn AuthGuard>>,
    pub reporter: Option<Arc<dyn DiagnosticsReporter>>,
}

impl Collaborators {
    pub fn with_bootstrap(mut self, bootstrap: Arc<dyn EnvironmentBootstrap>) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    pub fn with_guard(mut self, guard: Arc<dyn AuthGuard>) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn DiagnosticsReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }
}

fn parse_settings<T: DeserializeOwned>(config: &MiddlewareConfig) -> Result<T, MiddlewareError> {
    Ok(serde_json::from_value(serde_json::to_value(&config.settings)?)?)
}

/// 미들웨어 설정으로부터 미들웨어 인스턴스를 생성합니다.
pub fn create_middleware(
    config: &MiddlewareConfig,
    collaborators: &Collaborators,
) -> Result<Arc<dyn Middleware>, MiddlewareError> {
    debug!("미들웨어 생성 시작: type={:?}, settings={:?}", config.middleware_type, config.settings);

    match config.middleware_type {
        MiddlewareType::ErrorPages => {
            let home_link = match config.settings.get("home_link") {
                None => "/".to_string(),
                Some(value) => value.as_str().map(str::to_string).ok_or_else(|| MiddlewareError::Config {
                    middleware: MiddlewareType::ErrorPages.as_str().to_string(),
                    message: "home_link는 문자열이어야 합니다".to_string(),
                })?,
            };
            let reporter = collaborators
                .reporter
                .clone()
                .unwrap_or_else(|| Arc::new(TracingReporter));
            Ok(Arc::new(ErrorPagesMiddleware::new(home_link, reporter)))
        }
        MiddlewareType::Csrf => {
            let csrf_config: CsrfConfig = parse_settings(config)?;
            Ok(Arc::new(CsrfMiddleware::new(csrf_config, collaborators.tokens.clone())))
        }
        MiddlewareType::Auth => {
            let auth_config: AuthConfig = parse_settings(config)?;
            let bootstrap = collaborators.bootstrap.clone().unwrap_or_else(|| {
                Arc::new(TemplateGlobals::new(
                    collaborators.tokens.clone(),
                    auth_config.field_name.clone(),
                ))
            });
            let guard = collaborators.guard.clone().unwrap_or_else(|| {
                Arc::new(SessionAuthGuard::new(
                    auth_config.session_key.clone(),
                    auth_config.login_path.clone(),
                ))
            });
            Ok(Arc::new(AuthMiddleware::new(auth_config, bootstrap, guard)))
        }
    }
}

pub struct MiddlewareManager;

impl MiddlewareManager {
    /// 활성화된 설정을 순서대로 생성해 체인을 조립합니다.
    ///
    /// 하나라도 생성에 실패하면 전체가 실패합니다.
    pub fn build(
        configs: &HashMap<String, MiddlewareConfig>,
        collaborators: &Collaborators,
    ) -> Result<MiddlewareChain, MiddlewareError> {
        let mut chain = MiddlewareChain::new();

        for (name, config) in MiddlewareConfig::ordered(configs) {
            let middleware = create_middleware(config, collaborators).map_err(|e| match e {
                MiddlewareError::InvalidFormat(source) => MiddlewareError::Config {
                    middleware: name.clone(),
                    message: source.to_string(),
                },
                other => other,
            })?;
            chain.add_shared(middleware);
        }

        info!(middlewares = ?chain.names(), "미들웨어 체인 구성 완료");
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_default_chain() {
        let chain = MiddlewareManager::build(&MiddlewareConfig::defaults(), &Collaborators::default()).unwrap();
        assert_eq!(chain.names(), vec!["error-pages", "csrf", "auth"]);
    }

    #[test]
    fn test_disabled_middleware_is_skipped() {
        let mut configs = MiddlewareConfig::defaults();
        configs.get_mut("auth").unwrap().enabled = false;

        let chain = MiddlewareManager::build(&configs, &Collaborators::default()).unwrap();
        assert_eq!(chain.names(), vec!["error-pages", "csrf"]);
    }

    #[test]
    fn test_invalid_settings_fail_build() {
        let mut configs = MiddlewareConfig::defaults();
        configs
            .get_mut("csrf")
            .unwrap()
            .settings
            .insert("header_name".to_string(), json!(42));

        let err = MiddlewareManager::build(&configs, &Collaborators::default()).err().unwrap();
        assert!(matches!(err, MiddlewareError::Config { ref middleware, .. } if middleware == "csrf"));
    }
}
