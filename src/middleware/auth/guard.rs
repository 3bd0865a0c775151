use async_trait::async_trait;
use html_escape::encode_double_quoted_attribute;
use hyper::StatusCode;
use tracing::debug;
use crate::http::{HttpError, RequestContext, Response};
use crate::security::TokenManager;

/// 요청마다 레거시 실행 환경을 준비하는 협력자
///
/// 같은 요청에서 여러 번 호출되어도 결과가 같아야 합니다.
#[async_trait]
pub trait EnvironmentBootstrap: Send + Sync {
    async fn bootstrap(&self, ctx: &mut RequestContext) -> Result<(), HttpError>;
}

/// 인증 검사 결과
#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated,
    /// 요청 중단. `None`이면 가드가 이미 출력을 작성함
    Rejected(Option<Response>),
}

/// 인증된 세션을 요구하는 협력자
#[async_trait]
pub trait AuthGuard: Send + Sync {
    async fn require(&self, ctx: &mut RequestContext) -> Result<AuthOutcome, HttpError>;
}

pub const CSRF_TOKEN_PARAM: &str = "csrf_token";
pub const CSRF_FIELD_PARAM: &str = "csrf_field";

/// 템플릿 전역 변수(`csrf_token`, `csrf_field`)를 요청 파라미터에 주입합니다.
#[derive(Debug, Clone)]
pub struct TemplateGlobals {
    tokens: TokenManager,
    field_name: String,
}

impl TemplateGlobals {
    pub fn new(tokens: TokenManager, field_name: impl Into<String>) -> Self {
        Self {
            tokens,
            field_name: field_name.into(),
        }
    }

    fn hidden_field(&self, token: &str) -> String {
        format!(
            r#"<input type="hidden" name="{}" value="{}">"#,
            encode_double_quoted_attribute(&self.field_name),
            encode_double_quoted_attribute(token)
        )
    }
}

#[async_trait]
impl EnvironmentBootstrap for TemplateGlobals {
    async fn bootstrap(&self, ctx: &mut RequestContext) -> Result<(), HttpError> {
        if ctx.request.param(CSRF_TOKEN_PARAM).is_some() {
            return Ok(());
        }

        let token = self.tokens.ensure_token(&ctx.session).await;
        let field = self.hidden_field(&token);
        ctx.request.set_param(CSRF_TOKEN_PARAM, token);
        ctx.request.set_param(CSRF_FIELD_PARAM, field);
        Ok(())
    }
}

/// 세션 키 존재 여부로 인증을 판단하는 기본 가드
#[derive(Debug, Clone)]
pub struct SessionAuthGuard {
    session_key: String,
    login_path: String,
}

impl SessionAuthGuard {
    pub fn new(session_key: impl Into<String>, login_path: impl Into<String>) -> Self {
        Self {
            session_key: session_key.into(),
            login_path: login_path.into(),
        }
    }

    fn login_redirect(&self, ctx: &RequestContext) -> Response {
        let mut original = ctx.request.path().to_string();
        if !ctx.request.query_string().is_empty() {
            original.push('?');
            original.push_str(ctx.request.query_string());
        }
        let encoded: String = url::form_urlencoded::byte_serialize(original.as_bytes()).collect();
        let separator = if self.login_path.contains('?') { '&' } else { '?' };

        Response::redirect(
            &format!("{}{}return={}", self.login_path, separator, encoded),
            StatusCode::FOUND,
        )
    }
}

#[async_trait]
impl AuthGuard for SessionAuthGuard {
    async fn require(&self, ctx: &mut RequestContext) -> Result<AuthOutcome, HttpError> {
        match ctx.session.get(&self.session_key).await {
            Some(value) if !value.is_empty() => Ok(AuthOutcome::Authenticated),
            _ => {
                debug!(path = %ctx.request.path(), "미인증 요청, 로그인 페이지로 이동");
                Ok(AuthOutcome::Rejected(Some(self.login_redirect(ctx))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::http::Request;
    use crate::session::{MemorySessionStore, Session};

    fn context(uri: &str) -> RequestContext {
        RequestContext::new(
            Request::new("GET", uri),
            Session::new("s", Arc::new(MemorySessionStore::new())),
        )
    }

    #[tokio::test]
    async fn test_template_globals_injects_token_once() {
        let globals = TemplateGlobals::new(TokenManager::new(), "_csrf_token");
        let mut ctx = context("/");

        globals.bootstrap(&mut ctx).await.unwrap();
        let token = ctx.request.param(CSRF_TOKEN_PARAM).unwrap().to_string();
        let field = ctx.request.param(CSRF_FIELD_PARAM).unwrap().to_string();

        assert_eq!(token.len(), 64);
        assert!(field.contains(r#"name="_csrf_token""#));
        assert!(field.contains(&token));

        globals.bootstrap(&mut ctx).await.unwrap();
        assert_eq!(ctx.request.param(CSRF_TOKEN_PARAM), Some(token.as_str()));
    }

    #[test]
    fn test_hidden_field_escapes_attribute_values() {
        let globals = TemplateGlobals::new(TokenManager::new(), r#"a"><script>"#);

        let field = globals.hidden_field(r#"t" autofocus x="&"#);

        assert!(field.starts_with(r#"<input type="hidden" name="a&quot;"#), "{}", field);
        assert!(field.contains(r#"value="t&quot; autofocus x=&quot;&amp;">"#), "{}", field);
        assert!(!field.contains(r#"a">"#));
    }

    #[tokio::test]
    async fn test_guard_rejects_without_user() {
        let guard = SessionAuthGuard::new("user_id", "/login/");
        let mut ctx = context("/reports/view.php?id=7");

        let outcome = guard.require(&mut ctx).await.unwrap();
        let AuthOutcome::Rejected(Some(response)) = outcome else {
            panic!("expected redirect");
        };

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.header("location"),
            Some("/login/?return=%2Freports%2Fview.php%3Fid%3D7")
        );
    }

    #[tokio::test]
    async fn test_guard_accepts_logged_in_session() {
        let guard = SessionAuthGuard::new("user_id", "/login/");
        let mut ctx = context("/reports/");
        ctx.session.set("user_id", "42").await;

        let outcome = guard.require(&mut ctx).await.unwrap();
        assert!(matches!(outcome, AuthOutcome::Authenticated));
    }
}
