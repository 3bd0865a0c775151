//! 세션 저장소 추상화
//!
//! 요청 간에 공유되는 유일한 상태는 외부 세션 저장소에 있습니다. 이 코어는
//! 저장소를 `get`/`set` 능력으로만 사용합니다.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// 기본 유휴 만료 시간 (30분)
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// 세션 키-값 저장소
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str, key: &str) -> Option<String>;

    async fn set(&self, session_id: &str, key: &str, value: String);
}

struct SessionEntry {
    values: HashMap<String, String>,
    last_access: Instant,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant, idle_ttl: Duration) -> bool {
        now.duration_since(self.last_access) >= idle_ttl
    }
}

/// 프로세스 메모리 기반 세션 저장소
///
/// `idle_ttl` 동안 접근이 없던 세션은 없는 것으로 취급되고, 새 세션이
/// 만들어질 때 한꺼번에 제거됩니다.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    idle_ttl: Duration,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// 만료되지 않은 세션 수
    pub async fn session_count(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .values()
            .filter(|entry| !entry.is_expired(now, self.idle_ttl))
            .count()
    }

    fn purge_expired(sessions: &mut HashMap<String, SessionEntry>, now: Instant, idle_ttl: Duration) {
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(now, idle_ttl));
        let purged = before - sessions.len();
        if purged > 0 {
            debug!(purged, remaining = sessions.len(), "만료된 세션 정리");
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str, key: &str) -> Option<String> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(session_id)?;
        if entry.is_expired(now, self.idle_ttl) {
            sessions.remove(session_id);
            return None;
        }
        entry.last_access = now;
        entry.values.get(key).cloned()
    }

    async fn set(&self, session_id: &str, key: &str, value: String) {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let expired = sessions
            .get(session_id)
            .map(|entry| entry.is_expired(now, self.idle_ttl));
        match expired {
            Some(false) => {}
            Some(true) => {
                sessions.remove(session_id);
            }
            None => Self::purge_expired(&mut sessions, now, self.idle_ttl),
        }

        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                values: HashMap::new(),
                last_access: now,
            });
        entry.last_access = now;
        entry.values.insert(key.to_string(), value);
    }
}

/// 요청 범위의 세션 핸들
#[derive(Clone)]
pub struct Session {
    id: String,
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(id: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            id: id.into(),
            store,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.store.get(&self.id, key).await
    }

    pub async fn set(&self, key: &str, value: impl Into<String>) {
        self.store.set(&self.id, key, value.into()).await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("id", &self.id).finish()
    }
}
