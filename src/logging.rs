use std::path::Path;
use std::time::Instant;
use tracing::{info, warn, error, Level, span};
use tracing_appender::non_blocking::WorkerGuard;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::{fmt, fmt::time::UtcTime, EnvFilter};
use crate::settings::LogSettings;
use crate::settings::logging::{LogFormat, LogOutput};

fn build_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// 전역 tracing 구독자를 설정합니다.
///
/// 파일 출력이면 non-blocking writer의 guard를 돌려주며, 프로세스가
/// 끝날 때까지 유지해야 로그가 유실되지 않습니다.
pub fn init_logging(settings: &LogSettings) -> Option<WorkerGuard> {
    let (writer, guard) = match &settings.output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::File(path) => {
            let path = Path::new(path);
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let file_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "legacy_front.log".into());
            let appender = tracing_appender::rolling::daily(directory, file_name);
            tracing_appender::non_blocking(appender)
        }
    };

    let builder = fmt()
        .with_env_filter(build_filter(settings.level))
        .with_writer(writer)
        .with_timer(UtcTime::new(Rfc3339))
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let result = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    if let Err(e) = result {
        eprintln!("로깅 초기화 실패: {}", e);
        return None;
    }

    Some(guard)
}

/// 요청 하나에 대한 접근 로그
#[derive(Debug)]
pub struct RequestLog {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub duration_ms: u64,
    pub error: Option<String>,
    started: Instant,
}

impl RequestLog {
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            method: String::new(),
            path: String::new(),
            status_code: 0,
            duration_ms: 0,
            error: None,
            started: Instant::now(),
        }
    }

    pub fn with_request(&mut self, method: &hyper::Method, path: &str) {
        self.method = method.to_string();
        self.path = path.to_string();
    }

    pub fn with_response(&mut self, status: hyper::StatusCode) {
        self.status_code = status.as_u16();
    }

    pub fn with_error(&mut self, error: impl std::fmt::Display) {
        self.error = Some(error.to_string());
    }

    pub fn finish(&mut self) {
        self.duration_ms = self.started.elapsed().as_millis() as u64;
    }
}

pub fn log_request(log: &RequestLog) {
    let level = if log.error.is_some() {
        Level::ERROR
    } else if log.status_code >= 400 {
        Level::WARN
    } else {
        Level::INFO
    };

    let span = span!(
        Level::INFO,
        "request",
        request_id = %log.request_id,
        method = %log.method,
        path = %log.path,
        status = %log.status_code,
        duration_ms = %log.duration_ms
    );
    let _enter = span.enter();

    match level {
        Level::ERROR => error!(error = ?log.error, "요청 처리 실패"),
        Level::WARN => warn!("요청 완료 (오류 상태)"),
        _ => info!("요청 완료"),
    }
}
