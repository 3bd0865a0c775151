use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::sync::{Mutex, MutexGuard};
use tracing::error;

static CWD_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// 프로세스 작업 디렉터리 변경을 범위로 묶는 가드
///
/// 작업 디렉터리는 프로세스 전역이므로 가드가 살아 있는 동안 다른 요청은
/// 디렉터리를 바꿀 수 없습니다. drop 시 이전 디렉터리로 복원합니다.
pub struct WorkingDirGuard {
    previous: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl WorkingDirGuard {
    pub async fn enter(directory: &Path) -> io::Result<Self> {
        let lock = CWD_LOCK.get_or_init(|| Mutex::new(())).lock().await;
        let previous = std::env::current_dir()?;
        std::env::set_current_dir(directory)?;

        Ok(Self {
            previous,
            _lock: lock,
        })
    }

    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            error!(
                directory = %self.previous.display(),
                error = %e,
                "작업 디렉터리 복원 실패"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_directory_is_restored_on_drop() {
        let before = std::env::current_dir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let target = std::fs::canonicalize(dir.path()).unwrap();

        {
            let guard = WorkingDirGuard::enter(&target).await.unwrap();
            assert_eq!(guard.previous(), before.as_path());
            assert_eq!(std::env::current_dir().unwrap(), target);
        }

        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_directory_fails_without_change() {
        let before = std::env::current_dir().unwrap();
        let result = WorkingDirGuard::enter(Path::new("/definitely/not/here")).await;

        assert!(result.is_err());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }
}
