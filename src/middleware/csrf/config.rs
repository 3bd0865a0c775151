use serde::{Deserialize, Serialize};

/// CSRF 게이트 설정
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CsrfConfig {
    /// 검사를 건너뛰는 API 경로 접두사
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// 토큰을 담는 요청 헤더
    #[serde(default = "default_header_name")]
    pub header_name: String,

    /// 토큰을 담는 폼 필드
    #[serde(default = "default_field_name")]
    pub field_name: String,
}

pub(crate) fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_header_name() -> String {
    "X-CSRF-Token".to_string()
}

pub(crate) fn default_field_name() -> String {
    "_csrf_token".to_string()
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            api_prefix: default_api_prefix(),
            header_name: default_header_name(),
            field_name: default_field_name(),
        }
    }
}
