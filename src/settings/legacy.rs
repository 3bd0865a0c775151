use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use super::server::parse_env_var;
use super::SettingsError;

/// 레거시 스크립트 트리 설정
#[derive(Clone, Debug, Deserialize)]
pub struct LegacySettings {
    /// 레거시 루트 디렉토리 (기본값: src)
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// 등록되지 않은 스크립트를 실행할 CGI 인터프리터
    #[serde(default)]
    pub interpreter: Option<PathBuf>,
}

fn default_root() -> PathBuf {
    PathBuf::from("src")
}

impl LegacySettings {
    pub fn from_env() -> Self {
        Self {
            root: env::var_os("FRONT_LEGACY_ROOT").map(PathBuf::from).unwrap_or_else(default_root),
            interpreter: env::var_os("FRONT_LEGACY_INTERPRETER").map(PathBuf::from),
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.root.is_dir() {
            return Err(SettingsError::InvalidConfig(format!(
                "레거시 루트가 디렉토리가 아닙니다: {}",
                self.root.display()
            )));
        }
        Ok(())
    }
}

impl Default for LegacySettings {
    fn default() -> Self {
        Self {
            root: default_root(),
            interpreter: None,
        }
    }
}

/// 세션 쿠키와 메모리 저장소 설정
#[derive(Clone, Debug, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// 유휴 세션 만료 시간(초) (기본값: 1800)
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
}

fn default_cookie_name() -> String {
    "LEGACYSESSID".to_string()
}

fn default_idle_ttl_secs() -> u64 { 1800 }

impl SessionSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Ok(Self {
            cookie_name: env::var("FRONT_SESSION_COOKIE").unwrap_or_else(|_| default_cookie_name()),
            idle_ttl_secs: parse_env_var("FRONT_SESSION_IDLE_TTL", default_idle_ttl_secs)?,
        })
    }

    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.cookie_name.is_empty() {
            return Err(SettingsError::InvalidConfig("세션 쿠키 이름이 비어 있습니다".to_string()));
        }
        if self.idle_ttl_secs == 0 {
            return Err(SettingsError::InvalidConfig("세션 만료 시간은 0이 될 수 없습니다".to_string()));
        }
        Ok(())
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            idle_ttl_secs: default_idle_ttl_secs(),
        }
    }
}
