//! 세션 저장소.
//!
//! 로그인 시도 횟수와 인증 상태를 세션 토큰별로 보관합니다.
//! 저장소는 [`crate::Authenticator`]에 주입되며 전역 상태를 두지 않습니다.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::AuthResult;

/// 세션 하나의 로그인 상태.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRecord {
    /// 연속 실패 횟수
    pub failed_attempts: u32,
    /// 잠금 해제 시각
    pub locked_until: Option<DateTime<Utc>>,
    /// 인증 완료 여부
    pub authenticated: bool,
}

impl SessionRecord {
    /// `now` 시점에 잠겨 있는지 확인합니다.
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }
}

/// 세션 상태 저장소.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 세션 상태를 조회합니다.
    async fn get(&self, token: &str) -> AuthResult<Option<SessionRecord>>;

    /// 세션 상태를 저장합니다.
    async fn put(&self, token: &str, record: SessionRecord) -> AuthResult<()>;

    /// 세션을 삭제합니다.
    async fn remove(&self, token: &str) -> AuthResult<()>;
}

/// 프로세스 메모리 기반 저장소.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    /// 빈 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 추적 중인 세션 수.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// 추적 중인 세션이 없는지 확인합니다.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, token: &str) -> AuthResult<Option<SessionRecord>> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn put(&self, token: &str, record: SessionRecord) -> AuthResult<()> {
        self.sessions.write().await.insert(token.to_string(), record);
        Ok(())
    }

    async fn remove(&self, token: &str) -> AuthResult<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn get(&self, token: &str) -> AuthResult<Option<SessionRecord>> {
        (**self).get(token).await
    }

    async fn put(&self, token: &str, record: SessionRecord) -> AuthResult<()> {
        (**self).put(token, record).await
    }

    async fn remove(&self, token: &str) -> AuthResult<()> {
        (**self).remove(token).await
    }
}
