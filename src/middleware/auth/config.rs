use serde::{Deserialize, Serialize};
use crate::middleware::csrf::{default_api_prefix, default_field_name};

/// 인증 게이트 설정
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    /// 인증 검사를 건너뛰는 API 경로 접두사
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// 인증 없이 접근 가능한 경로 접두사
    #[serde(default = "default_public_prefixes")]
    pub public_prefixes: Vec<String>,

    /// 로그인 사용자를 담는 세션 키
    #[serde(default = "default_session_key")]
    pub session_key: String,

    /// 미인증 요청이 이동할 로그인 경로
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// 템플릿 전역에 노출할 CSRF 폼 필드 이름
    #[serde(default = "default_field_name")]
    pub field_name: String,
}

fn default_public_prefixes() -> Vec<String> {
    vec!["/login".to_string(), "/setup".to_string(), "/public".to_string()]
}

fn default_session_key() -> String {
    "user_id".to_string()
}

fn default_login_path() -> String {
    "/login/".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_prefix: default_api_prefix(),
            public_prefixes: default_public_prefixes(),
            session_key: default_session_key(),
            login_path: default_login_path(),
            field_name: default_field_name(),
        }
    }
}

impl AuthConfig {
    /// 경로가 공개 접두사와 같거나 그 하위 세그먼트인지 확인합니다.
    pub fn is_public(&self, path: &str) -> bool {
        self.public_prefixes.iter().any(|prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_prefix_matching() {
        let config = AuthConfig::default();

        assert!(config.is_public("/login"));
        assert!(config.is_public("/login/"));
        assert!(config.is_public("/public/css/site.css"));
        assert!(!config.is_public("/loginx"));
        assert!(!config.is_public("/setupwizard"));
        assert!(!config.is_public("/"));
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let config: AuthConfig = serde_json::from_value(serde_json::json!({
            "public_prefixes": ["/docs"]
        }))
        .unwrap();

        assert_eq!(config.public_prefixes, vec!["/docs".to_string()]);
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.login_path, "/login/");
    }
}
