use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use async_trait::async_trait;
use crate::http::{HttpError, RequestContext, Response};

/// 실행 대상 레거시 엔트리 포인트
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyScript {
    /// 심볼릭 링크가 풀린 실제 경로
    pub path: PathBuf,
    /// 엔트리 포인트가 있는 디렉터리
    pub directory: PathBuf,
    /// 레거시 루트 기준 논리 이름 (예: `/login/index.php`)
    pub name: String,
}

/// 레거시 핸들러 실행 결과
#[derive(Debug)]
pub enum LegacyOutcome {
    /// 완성된 응답
    Response(Response),
    /// 핸들러가 출력을 직접 씀
    Written,
}

/// 해석된 경로에 등록되는 레거시 엔트리 포인트
///
/// 작업 디렉터리는 실행 동안 `script.directory`로 바뀌어 있습니다.
#[async_trait]
pub trait LegacyHandler: Send + Sync {
    async fn execute(
        &self,
        script: &LegacyScript,
        ctx: &mut RequestContext,
    ) -> Result<LegacyOutcome, HttpError>;
}

/// 실제 경로로 키가 매겨진 핸들러 레지스트리
#[derive(Clone, Default)]
pub struct LegacyRegistry {
    handlers: HashMap<PathBuf, Arc<dyn LegacyHandler>>,
    fallback: Option<Arc<dyn LegacyHandler>>,
}

impl LegacyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 스크립트 파일에 핸들러를 등록합니다. 경로는 실제 경로로 정규화됩니다.
    pub fn register<P, H>(&mut self, script: P, handler: H) -> io::Result<()>
    where
        P: AsRef<Path>,
        H: LegacyHandler + 'static,
    {
        let real = std::fs::canonicalize(script.as_ref())?;
        self.handlers.insert(real, Arc::new(handler));
        Ok(())
    }

    /// 등록되지 않은 스크립트에 사용할 핸들러
    pub fn with_fallback(mut self, handler: Arc<dyn LegacyHandler>) -> Self {
        self.fallback = Some(handler);
        self
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn lookup(&self, real_path: &Path) -> Option<Arc<dyn LegacyHandler>> {
        self.handlers
            .get(real_path)
            .or(self.fallback.as_ref())
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
