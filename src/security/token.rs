use rand::RngCore;
use subtle::ConstantTimeEq;
use crate::session::Session;

/// 세션에 토큰을 저장하는 키
pub const SESSION_KEY: &str = "_csrf_token";

const TOKEN_BYTES: usize = 32;

/// 세션당 하나의 보안 토큰을 발급하고 검증합니다.
///
/// 토큰은 없을 때만 발급되며 세션 도중 교체하지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct TokenManager;

impl TokenManager {
    pub fn new() -> Self {
        Self
    }

    /// 세션 토큰을 반환하고, 없으면 새로 발급합니다. 여러 번 호출해도 안전합니다.
    pub async fn ensure_token(&self, session: &Session) -> String {
        if let Some(token) = session.get(SESSION_KEY).await {
            if !token.is_empty() {
                return token;
            }
        }

        let token = generate_token();
        session.set(SESSION_KEY, token.clone()).await;
        tracing::debug!(session = %session.id(), "새 CSRF 토큰 발급");
        token
    }

    /// 제출된 토큰을 세션 토큰과 상수 시간으로 비교합니다.
    pub async fn is_token_valid(&self, session: &Session, submitted: Option<&str>) -> bool {
        let submitted = match submitted {
            Some(token) if !token.is_empty() => token,
            _ => return false,
        };

        match session.get(SESSION_KEY).await {
            Some(current) if !current.is_empty() => {
                bool::from(current.as_bytes().ct_eq(submitted.as_bytes()))
            }
            _ => false,
        }
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::session::MemorySessionStore;

    fn session() -> Session {
        Session::new("test-session", Arc::new(MemorySessionStore::new()))
    }

    #[tokio::test]
    async fn test_ensure_token_is_idempotent() {
        let manager = TokenManager::new();
        let session = session();

        let first = manager.ensure_token(&session).await;
        let second = manager.ensure_token(&session).await;

        assert_eq!(first, second);
        assert_eq!(first.len(), TOKEN_BYTES * 2);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_token_validation() {
        let manager = TokenManager::new();
        let session = session();

        assert!(!manager.is_token_valid(&session, Some("anything")).await);

        let token = manager.ensure_token(&session).await;
        assert!(manager.is_token_valid(&session, Some(&token)).await);
        assert!(!manager.is_token_valid(&session, Some("wrong")).await);
        assert!(!manager.is_token_valid(&session, Some("")).await);
        assert!(!manager.is_token_valid(&session, None).await);
    }
}
