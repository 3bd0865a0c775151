use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::http::{HandlerResult, HttpError, RequestContext};
use super::handler::{LegacyOutcome, LegacyRegistry, LegacyScript};
use super::workdir::WorkingDirGuard;

/// 레거시 엔트리 포인트가 자신을 찾는 데 쓰는 호환 파라미터
pub const SCRIPT_FILENAME: &str = "SCRIPT_FILENAME";
pub const SCRIPT_NAME: &str = "SCRIPT_NAME";
pub const PHP_SELF: &str = "PHP_SELF";

/// 해석된 스크립트를 등록된 레거시 핸들러로 실행합니다.
#[derive(Clone)]
pub struct LegacyExecutor {
    root: PathBuf,
    registry: LegacyRegistry,
}

impl LegacyExecutor {
    /// 레거시 루트는 실제 경로로 정규화되어 저장됩니다.
    pub fn new(root: impl AsRef<Path>, registry: LegacyRegistry) -> io::Result<Self> {
        Ok(Self {
            root: std::fs::canonicalize(root.as_ref())?,
            registry,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 스크립트를 실행합니다. `Ok(None)`은 핸들러가 출력을 직접 썼다는 뜻입니다.
    pub async fn execute(&self, script_path: &Path, ctx: &mut RequestContext) -> HandlerResult {
        let script = self.locate(script_path).await?;

        ctx.request.set_param(SCRIPT_FILENAME, script.path.to_string_lossy());
        ctx.request.set_param(SCRIPT_NAME, script.name.clone());
        ctx.request.set_param(PHP_SELF, script.name.clone());

        let handler = self.registry.lookup(&script.path).ok_or_else(|| {
            HttpError::unclassified(format!(
                "no legacy handler registered for {}",
                script.path.display()
            ))
        })?;

        debug!(script = %script.name, directory = %script.directory.display(), "레거시 엔트리 포인트 실행");

        let outcome = {
            let _cwd = WorkingDirGuard::enter(&script.directory).await?;
            handler.execute(&script, ctx).await
        }?;

        match outcome {
            LegacyOutcome::Response(response) => Ok(Some(response)),
            LegacyOutcome::Written => Ok(None),
        }
    }

    async fn locate(&self, script_path: &Path) -> Result<LegacyScript, HttpError> {
        let real = match tokio::fs::canonicalize(script_path).await {
            Ok(real) => real,
            Err(e) => {
                debug!(script = %script_path.display(), error = %e, "스크립트가 더 이상 존재하지 않음");
                return Err(HttpError::not_found());
            }
        };

        let relative = match real.strip_prefix(&self.root) {
            Ok(relative) => relative,
            Err(_) => {
                warn!(script = %real.display(), root = %self.root.display(), "레거시 루트 밖의 스크립트 거부");
                return Err(HttpError::not_found());
            }
        };

        let name = format!(
            "/{}",
            relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        );
        let directory = real
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        Ok(LegacyScript {
            path: real,
            directory,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use async_trait::async_trait;
    use hyper::StatusCode;
    use serial_test::serial;
    use crate::http::{Request, Response};
    use crate::legacy::LegacyHandler;
    use crate::session::{MemorySessionStore, Session};

    struct EchoCwd;

    #[async_trait]
    impl LegacyHandler for EchoCwd {
        async fn execute(
            &self,
            script: &LegacyScript,
            ctx: &mut RequestContext,
        ) -> Result<LegacyOutcome, HttpError> {
            let cwd = std::env::current_dir()?;
            assert_eq!(cwd, script.directory);
            ctx.output.write(script.name.as_bytes());
            Ok(LegacyOutcome::Written)
        }
    }

    struct Failing;

    #[async_trait]
    impl LegacyHandler for Failing {
        async fn execute(
            &self,
            _script: &LegacyScript,
            _ctx: &mut RequestContext,
        ) -> Result<LegacyOutcome, HttpError> {
            Err(HttpError::unclassified("legacy crash"))
        }
    }

    struct Fixed;

    #[async_trait]
    impl LegacyHandler for Fixed {
        async fn execute(
            &self,
            _script: &LegacyScript,
            _ctx: &mut RequestContext,
        ) -> Result<LegacyOutcome, HttpError> {
            Ok(LegacyOutcome::Response(Response::html(StatusCode::OK, "fixed")))
        }
    }

    fn context(path: &str) -> RequestContext {
        RequestContext::new(
            Request::new("GET", path),
            Session::new("s", Arc::new(MemorySessionStore::new())),
        )
    }

    fn script_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("login")).unwrap();
        std::fs::write(dir.path().join("login/index.php"), "<?php").unwrap();
        std::fs::write(dir.path().join("index.php"), "<?php").unwrap();
        dir
    }

    #[tokio::test]
    #[serial]
    async fn test_injects_compat_params_and_restores_cwd() {
        let dir = script_tree();
        let mut registry = LegacyRegistry::new();
        registry.register(dir.path().join("login/index.php"), EchoCwd).unwrap();
        let executor = LegacyExecutor::new(dir.path(), registry).unwrap();
        let before = std::env::current_dir().unwrap();

        let mut ctx = context("/login/");
        let result = executor.execute(&dir.path().join("login/index.php"), &mut ctx).await.unwrap();

        assert!(result.is_none());
        assert_eq!(ctx.request.param(SCRIPT_NAME), Some("/login/index.php"));
        assert_eq!(ctx.request.param(PHP_SELF), Some("/login/index.php"));
        let real = std::fs::canonicalize(dir.path().join("login/index.php")).unwrap();
        assert_eq!(ctx.request.param(SCRIPT_FILENAME), Some(&*real.to_string_lossy()));
        assert_eq!(ctx.output.body(), b"/login/index.php");
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[tokio::test]
    #[serial]
    async fn test_failure_propagates_and_restores_cwd() {
        let dir = script_tree();
        let registry = LegacyRegistry::new().with_fallback(Arc::new(Failing));
        let executor = LegacyExecutor::new(dir.path(), registry).unwrap();
        let before = std::env::current_dir().unwrap();

        let mut ctx = context("/");
        let err = executor.execute(&dir.path().join("index.php"), &mut ctx).await.unwrap_err();

        assert!(!err.is_typed());
        assert_eq!(err.to_string(), "legacy crash");
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[tokio::test]
    #[serial]
    async fn test_response_outcome() {
        let dir = script_tree();
        let registry = LegacyRegistry::new().with_fallback(Arc::new(Fixed));
        let executor = LegacyExecutor::new(dir.path(), registry).unwrap();

        let mut ctx = context("/");
        let response = executor.execute(&dir.path().join("index.php"), &mut ctx).await.unwrap();

        assert_eq!(response.unwrap().body().as_ref(), b"fixed");
    }

    #[tokio::test]
    async fn test_missing_script_is_not_found() {
        let dir = script_tree();
        let executor = LegacyExecutor::new(dir.path(), LegacyRegistry::new()).unwrap();

        let mut ctx = context("/gone");
        let err = executor.execute(&dir.path().join("gone.php"), &mut ctx).await.unwrap_err();

        assert!(matches!(err, HttpError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_unregistered_script_is_unclassified() {
        let dir = script_tree();
        let executor = LegacyExecutor::new(dir.path(), LegacyRegistry::new()).unwrap();

        let mut ctx = context("/");
        let err = executor.execute(&dir.path().join("index.php"), &mut ctx).await.unwrap_err();

        assert!(matches!(err, HttpError::Unclassified(_)));
    }
}
