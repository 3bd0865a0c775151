use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 미들웨어 종류
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MiddlewareType {
    /// 가장 바깥쪽 에러 렌더링 게이트
    ErrorPages,
    /// CSRF 게이트
    Csrf,
    /// 인증 게이트
    Auth,
}

impl MiddlewareType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ErrorPages => "error-pages",
            Self::Csrf => "csrf",
            Self::Auth => "auth",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// 미들웨어 타입
    pub middleware_type: MiddlewareType,

    /// 미들웨어 활성화 여부
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 실행 순서 (낮은 숫자가 바깥쪽)
    #[serde(default)]
    pub order: i32,

    /// 미들웨어별 설정
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

fn default_enabled() -> bool {
    true
}

impl MiddlewareConfig {
    pub fn new(middleware_type: MiddlewareType, order: i32) -> Self {
        Self {
            middleware_type,
            enabled: true,
            order,
            settings: HashMap::new(),
        }
    }

    /// 설정이 없을 때 사용하는 기본 파이프라인: error-pages → csrf → auth
    pub fn defaults() -> HashMap<String, Self> {
        [
            (MiddlewareType::ErrorPages, 0),
            (MiddlewareType::Csrf, 1),
            (MiddlewareType::Auth, 2),
        ]
        .into_iter()
        .map(|(kind, order)| (kind.as_str().to_string(), Self::new(kind, order)))
        .collect()
    }

    /// 활성화된 설정을 실행 순서대로 정렬합니다.
    pub fn ordered(configs: &HashMap<String, Self>) -> Vec<(&String, &Self)> {
        let mut ordered: Vec<_> = configs.iter()
            .filter(|(_, config)| config.enabled)
            .collect();
        ordered.sort_by(|(a_name, a), (b_name, b)| a.order.cmp(&b.order).then(a_name.cmp(b_name)));
        ordered
    }

    /// TOML 설정에서 미들웨어 설정을 파싱합니다.
    pub fn from_toml(config: &str) -> Result<HashMap<String, Self>, toml::de::Error> {
        #[derive(Deserialize)]
        struct Config {
            middleware: HashMap<String, MiddlewareConfig>,
        }

        let config: Config = toml::from_str(config)?;
        Ok(config.middleware)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_order() {
        let defaults = MiddlewareConfig::defaults();
        let names: Vec<_> = MiddlewareConfig::ordered(&defaults)
            .into_iter()
            .map(|(_, config)| config.middleware_type)
            .collect();

        assert_eq!(
            names,
            vec![MiddlewareType::ErrorPages, MiddlewareType::Csrf, MiddlewareType::Auth]
        );
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_str = r#"
            [middleware.csrf]
            middleware_type = "csrf"
            order = 1

            [middleware.csrf.settings]
            header_name = "X-Token"

            [middleware.auth]
            middleware_type = "auth"
            enabled = false
        "#;

        let configs = MiddlewareConfig::from_toml(toml_str).unwrap();
        assert_eq!(configs.len(), 2);

        let csrf = configs.get("csrf").unwrap();
        assert_eq!(csrf.middleware_type, MiddlewareType::Csrf);
        assert!(csrf.enabled);
        assert_eq!(csrf.order, 1);
        assert_eq!(csrf.settings.get("header_name").unwrap(), "X-Token");

        let ordered = MiddlewareConfig::ordered(&configs);
        assert_eq!(ordered.len(), 1);
    }
}
