use std::{collections::{HashMap, HashSet}, env, fs, path::Path};
use serde::Deserialize;
use tracing::{debug, info};
use crate::middleware::config::{MiddlewareConfig, MiddlewareType};
use crate::middleware::csrf::default_field_name;

mod server;
pub mod logging;
mod legacy;
mod error;

pub use server::ServerSettings;
pub use logging::LogSettings;
pub use legacy::{LegacySettings, SessionSettings};
pub use error::SettingsError;

pub type Result<T> = std::result::Result<T, SettingsError>;
pub use server::parse_env_var;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    // 서버 설정
    #[serde(default)]
    pub server: ServerSettings,

    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,

    // 레거시 스크립트 트리
    #[serde(default)]
    pub legacy: LegacySettings,

    #[serde(default)]
    pub session: SessionSettings,

    /// 미들웨어 설정
    #[serde(default)]
    pub middleware: HashMap<String, MiddlewareConfig>,
}

impl Settings {
    pub async fn load() -> Result<Self> {
        if let Ok(config_path) = env::var("FRONT_CONFIG_FILE") {
            Self::from_toml_file(&config_path).await
        } else {
            Self::from_env().await
        }
    }

    pub async fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| SettingsError::FileError {
            path: path.as_ref().to_string_lossy().to_string(),
            error: e,
        })?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| SettingsError::ParseError { source: e })?;
        debug!(path = %path.as_ref().display(), "TOML 설정 파일 로드");

        settings.validate().await?;
        Ok(settings)
    }

    pub async fn from_env() -> Result<Self> {
        let settings = Self {
            server: ServerSettings::from_env()?,
            logging: LogSettings::from_env()?,
            legacy: LegacySettings::from_env(),
            session: SessionSettings::from_env()?,
            middleware: HashMap::new(),
        };

        // 설정 생성 시점에 바로 검증
        settings.validate().await?;
        Ok(settings)
    }

    /// 설정 유효성 검증
    pub async fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.legacy.validate()?;
        self.session.validate()?;

        let mut orders = HashSet::new();
        let mut field_names = Vec::new();
        for (name, middleware) in &self.middleware {
            if !middleware.enabled {
                continue;
            }
            if !orders.insert(middleware.order) {
                return Err(SettingsError::InvalidConfig(format!(
                    "미들웨어 {}의 순서 {}가 중복됩니다",
                    name, middleware.order
                )));
            }
            if let Some(prefix) = middleware.settings.get("api_prefix") {
                if !prefix.as_str().is_some_and(|p| p.starts_with('/')) {
                    return Err(SettingsError::InvalidConfig(format!(
                        "미들웨어 {}의 api_prefix는 '/'로 시작해야 합니다: {}",
                        name, prefix
                    )));
                }
            }
            if matches!(middleware.middleware_type, MiddlewareType::Csrf | MiddlewareType::Auth) {
                let field_name = match middleware.settings.get("field_name") {
                    Some(value) => value.as_str().map(str::to_string).ok_or_else(|| {
                        SettingsError::InvalidConfig(format!("미들웨어 {}의 field_name은 문자열이어야 합니다", name))
                    })?,
                    None => default_field_name(),
                };
                field_names.push((name, field_name));
            }
        }

        // CSRF 게이트가 검사하는 필드와 템플릿에 노출되는 필드는 같아야 함
        if let Some((first, expected)) = field_names.first() {
            if let Some((name, actual)) = field_names.iter().find(|(_, f)| f != expected) {
                return Err(SettingsError::InvalidConfig(format!(
                    "CSRF 필드 이름이 일치하지 않습니다: {}={}, {}={}",
                    first, expected, name, actual
                )));
            }
        }

        Ok(())
    }

    /// 파이프라인에 사용할 미들웨어 설정. 비어 있으면 기본 구성을 반환합니다.
    pub fn middleware_configs(&self) -> HashMap<String, MiddlewareConfig> {
        if self.middleware.is_empty() {
            info!("미들웨어 설정이 없어 기본 파이프라인 사용");
            MiddlewareConfig::defaults()
        } else {
            self.middleware.clone()
        }
    }
}
