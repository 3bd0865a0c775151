use std::process::Stdio;
use async_trait::async_trait;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, LOCATION};
use hyper::StatusCode;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};
use crate::http::{HttpError, RequestContext};
use super::handler::{LegacyHandler, LegacyOutcome, LegacyScript};

/// 서버 환경에서 자식 프로세스로 넘겨주는 변수
const INHERITED_ENV: [&str; 6] = ["PATH", "LANG", "LC_ALL", "TZ", "TMPDIR", "SYSTEMROOT"];

/// 외부 인터프리터(예: `php-cgi`)로 스크립트를 실행하는 CGI 핸들러
///
/// 출력은 컨텍스트의 전송 버퍼에 직접 기록되므로 항상
/// `LegacyOutcome::Written`을 반환합니다.
#[derive(Debug, Clone)]
pub struct CgiHandler {
    interpreter: String,
}

impl CgiHandler {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    fn command(&self, script: &LegacyScript, ctx: &RequestContext) -> Command {
        let request = &ctx.request;
        let mut command = Command::new(&self.interpreter);
        command
            .arg(&script.path)
            .current_dir(&script.directory)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .env_clear();

        for key in INHERITED_ENV {
            if let Some(value) = std::env::var_os(key) {
                command.env(key, value);
            }
        }

        command
            .env("GATEWAY_INTERFACE", "CGI/1.1")
            .env("SERVER_PROTOCOL", "HTTP/1.1")
            .env("REDIRECT_STATUS", "200")
            .env("REQUEST_METHOD", request.method().as_str())
            .env("REQUEST_URI", request.uri())
            .env("QUERY_STRING", request.query_string())
            .env("CONTENT_LENGTH", request.body().len().to_string());

        if let Some(content_type) = request.header("content-type") {
            command.env("CONTENT_TYPE", content_type);
        }

        for (name, value) in request.headers() {
            // httpoxy: 클라이언트 `Proxy` 헤더가 HTTP_PROXY가 되면 안 됨
            if name.as_str().eq_ignore_ascii_case("proxy") {
                continue;
            }
            if let Ok(value) = value.to_str() {
                let key = format!("HTTP_{}", name.as_str().to_ascii_uppercase().replace('-', "_"));
                command.env(key, value);
            }
        }

        // 호환 파라미터와 템플릿 전역 변수
        for (key, value) in request.params() {
            command.env(key, value);
        }

        command
    }
}

#[async_trait]
impl LegacyHandler for CgiHandler {
    async fn execute(
        &self,
        script: &LegacyScript,
        ctx: &mut RequestContext,
    ) -> Result<LegacyOutcome, HttpError> {
        let mut child = self.command(script, ctx).spawn()?;

        let body = ctx.request.body().clone();
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                if let Err(e) = stdin.write_all(&body).await {
                    debug!(error = %e, "CGI 표준 입력 쓰기 실패");
                }
            }
        };
        let (_, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.stderr.is_empty() {
            warn!(
                script = %script.name,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "CGI 스크립트가 표준 에러에 출력함"
            );
        }

        if !output.status.success() && output.stdout.is_empty() {
            return Err(HttpError::unclassified(format!(
                "cgi interpreter exited with {} for {}",
                output.status, script.name
            )));
        }

        let (status, headers, body) = parse_cgi_output(&output.stdout);
        ctx.output.write_head(status, &headers);
        ctx.output.write(body);

        Ok(LegacyOutcome::Written)
    }
}

/// CGI 헤더 블록과 본문을 분리합니다.
///
/// `Status:` 헤더가 상태 코드를 정하고, 상태 없이 `Location`만 있으면 302입니다.
pub fn parse_cgi_output(raw: &[u8]) -> (StatusCode, HeaderMap, &[u8]) {
    let (head, body) = split_head(raw);
    let mut headers = HeaderMap::new();
    let mut status = None;

    for line in String::from_utf8_lossy(head).lines() {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let (name, value) = (name.trim(), value.trim());

        if name.eq_ignore_ascii_case("status") {
            status = value
                .split_whitespace()
                .next()
                .and_then(|code| code.parse::<u16>().ok())
                .and_then(|code| StatusCode::from_u16(code).ok());
            continue;
        }

        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.append(name, value);
        }
    }

    let status = status.unwrap_or(if headers.contains_key(LOCATION) {
        StatusCode::FOUND
    } else {
        StatusCode::OK
    });

    (status, headers, body)
}

fn split_head(raw: &[u8]) -> (&[u8], &[u8]) {
    for (separator, len) in [(&b"\r\n\r\n"[..], 4), (&b"\n\n"[..], 2)] {
        if let Some(pos) = raw.windows(len).position(|w| w == separator) {
            return (&raw[..pos], &raw[pos + len..]);
        }
    }
    (&[], raw)
}
