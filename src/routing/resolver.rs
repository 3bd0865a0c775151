use std::ffi::OsString;
use std::path::{Path, PathBuf};
use hyper::StatusCode;
use crate::http::request::{decode_path, normalize_path};

/// 레거시 엔트리 포인트 확장자
pub const SCRIPT_EXTENSION: &str = ".php";

/// 디렉터리 엔트리 포인트 이름
pub const INDEX_SCRIPT: &str = "/index.php";

/// 경로 해석 결과
///
/// 해석 실패(not found)는 `Option::None`으로 표현합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 엔트리 포인트 실행
    Script(PathBuf),
    /// 정규화 리다이렉트
    Redirect { target: String, status: StatusCode },
}

impl Resolution {
    pub fn redirect(target: impl Into<String>) -> Self {
        Self::Redirect {
            target: target.into(),
            status: StatusCode::MOVED_PERMANENTLY,
        }
    }
}

/// URL 경로를 레거시 스크립트 트리에 매핑하는 순수 해석기
///
/// 우선순위:
/// 1. `..` 포함 시 실패
/// 2. `/`, `/index.php` → 루트 엔트리 포인트
/// 3. 후행 슬래시 + 같은 이름의 스크립트 존재 → 슬래시 제거 리다이렉트
/// 4. `.php`로 끝나면 정확히 그 파일만 (폴백 없음)
/// 5. `경로.php` 존재 → 스크립트
/// 6. 디렉터리 + index → 슬래시가 있으면 스크립트, 없으면 슬래시 추가 리다이렉트
/// 7. `경로/index.php` 존재 → 슬래시 추가 리다이렉트
#[derive(Debug, Clone)]
pub struct LegacyResolver {
    root: PathBuf,
}

impl LegacyResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root: PathBuf = root.into();
        // 문자열 결합을 위해 후행 슬래시 제거
        let trimmed = root.to_string_lossy().trim_end_matches('/').to_string();
        let root = if trimmed.is_empty() { PathBuf::from("/") } else { PathBuf::from(trimmed) };
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, raw_path: &str) -> Option<Resolution> {
        let path = normalize_path(&decode_path(raw_path));

        if path.contains("..") {
            return None;
        }

        if path == "/" || path == INDEX_SCRIPT {
            return Some(Resolution::Script(self.candidate(&[INDEX_SCRIPT])));
        }

        let trimmed = path.trim_end_matches('/');

        if path.ends_with('/') && self.candidate(&[trimmed, SCRIPT_EXTENSION]).is_file() {
            return Some(Resolution::redirect(trimmed));
        }

        if path.ends_with(SCRIPT_EXTENSION) {
            let file = self.candidate(&[&path]);
            return file.is_file().then_some(Resolution::Script(file));
        }

        let script = self.candidate(&[&path, SCRIPT_EXTENSION]);
        if script.is_file() {
            return Some(Resolution::Script(script));
        }

        let directory = self.candidate(&[&path]);
        if directory.is_dir() {
            let index = self.candidate(&[&path, INDEX_SCRIPT]);
            if index.is_file() {
                if !path.ends_with('/') {
                    return Some(Resolution::redirect(format!("{}/", path)));
                }
                return Some(Resolution::Script(index));
            }
        }

        if self.candidate(&[trimmed, INDEX_SCRIPT]).is_file() {
            return Some(Resolution::redirect(format!("{}/", trimmed)));
        }

        None
    }

    /// 루트 뒤에 조각들을 문자 그대로 이어 붙입니다.
    fn candidate(&self, parts: &[&str]) -> PathBuf {
        let mut joined = OsString::from(self.root.as_os_str());
        for part in parts {
            joined.push(part);
        }
        PathBuf::from(joined)
    }
}
