use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use docforge_application::{WorkflowSession, WorkflowSessionStore};
use docforge_core::{AppError, AppResult, SessionId};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::info;

#[derive(Debug)]
struct StoredSession {
    session: Arc<WorkflowSession>,
    last_access: Instant,
}

/// In-memory registry of live generation sessions.
///
/// With an idle TTL, sessions untouched for longer than the TTL are no longer
/// found and are dropped by [`InMemorySessionStore::evict_idle`].
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, StoredSession>>,
    idle_ttl: Option<Duration>,
}

impl InMemorySessionStore {
    /// Creates an empty session store that keeps sessions until removed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session store that expires sessions idle for `idle_ttl`.
    #[must_use]
    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::default(),
            idle_ttl: Some(idle_ttl),
        }
    }

    /// Drops every idle session, cancelling its running export. Returns how
    /// many sessions were evicted.
    pub async fn evict_idle(&self) -> usize {
        if self.idle_ttl.is_none() {
            return 0;
        }

        let now = Instant::now();
        let evicted: Vec<Arc<WorkflowSession>> = {
            let mut sessions = self.sessions.write().await;
            let expired: Vec<SessionId> = sessions
                .iter()
                .filter(|(_, stored)| self.is_expired(stored, now))
                .map(|(session_id, _)| *session_id)
                .collect();
            expired
                .iter()
                .filter_map(|session_id| sessions.remove(session_id))
                .map(|stored| stored.session)
                .collect()
        };

        for session in &evicted {
            session.cancel_export().await;
        }
        if !evicted.is_empty() {
            info!(evicted = evicted.len(), "idle sessions evicted");
        }
        evicted.len()
    }

    /// Runs [`Self::evict_idle`] every `period` until the task is dropped.
    pub async fn run_eviction(self: Arc<Self>, period: Duration) {
        loop {
            tokio::time::sleep(period).await;
            self.evict_idle().await;
        }
    }

    fn is_expired(&self, stored: &StoredSession, now: Instant) -> bool {
        self.idle_ttl
            .is_some_and(|idle_ttl| now.duration_since(stored.last_access) > idle_ttl)
    }
}

#[async_trait]
impl WorkflowSessionStore for InMemorySessionStore {
    async fn insert(&self, session: Arc<WorkflowSession>) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id()) {
            return Err(AppError::Conflict(format!(
                "session '{}' already exists",
                session.id()
            )));
        }

        sessions.insert(
            session.id(),
            StoredSession {
                session,
                last_access: Instant::now(),
            },
        );
        Ok(())
    }

    async fn find(&self, session_id: SessionId) -> AppResult<Option<Arc<WorkflowSession>>> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session_id) {
            Some(stored) if !self.is_expired(stored, now) => {
                stored.last_access = now;
                Ok(Some(stored.session.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn remove(&self, session_id: SessionId) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(&session_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("session '{session_id}' does not exist")))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use docforge_application::{WorkflowSession, WorkflowSessionStore};
    use docforge_core::{AppError, OperatorIdentity};

    use super::InMemorySessionStore;

    fn session() -> Arc<WorkflowSession> {
        Arc::new(WorkflowSession::new(
            OperatorIdentity::new("user-1", "Casey Morgan"),
            None,
        ))
    }

    #[tokio::test]
    async fn stores_finds_and_removes_sessions() {
        let store = InMemorySessionStore::new();
        let session = session();
        let session_id = session.id();

        store
            .insert(session.clone())
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(matches!(
            store.insert(session).await,
            Err(AppError::Conflict(_))
        ));

        let found = store.find(session_id).await.unwrap_or_else(|_| unreachable!());
        assert!(found.is_some_and(|found| found.id() == session_id));

        store
            .remove(session_id)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(matches!(
            store.remove(session_id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(
            store
                .find(session_id)
                .await
                .unwrap_or_else(|_| unreachable!())
                .is_none()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_are_evicted_after_the_ttl() {
        let store = InMemorySessionStore::with_idle_ttl(Duration::from_secs(60));
        let idle = session();
        let active = session();
        let (idle_id, active_id) = (idle.id(), active.id());
        store.insert(idle).await.unwrap_or_else(|_| unreachable!());
        store.insert(active).await.unwrap_or_else(|_| unreachable!());

        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(
            store
                .find(active_id)
                .await
                .unwrap_or_else(|_| unreachable!())
                .is_some()
        );

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(
            store
                .find(idle_id)
                .await
                .unwrap_or_else(|_| unreachable!())
                .is_none()
        );
        assert_eq!(store.evict_idle().await, 1);
        assert!(matches!(
            store.remove(idle_id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(
            store
                .find(active_id)
                .await
                .unwrap_or_else(|_| unreachable!())
                .is_some()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn eviction_cancels_a_running_export() {
        let store = InMemorySessionStore::with_idle_ttl(Duration::from_secs(60));
        let session = session();
        store
            .insert(session.clone())
            .await
            .unwrap_or_else(|_| unreachable!());
        let ticket = session.start_export().await;

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(store.evict_idle().await, 1);
        assert!(ticket.token().is_cancelled());
        assert!(!session.is_exporting().await);
    }

    #[tokio::test(start_paused = true)]
    async fn store_without_ttl_keeps_sessions() {
        let store = InMemorySessionStore::new();
        let session = session();
        let session_id = session.id();
        store.insert(session).await.unwrap_or_else(|_| unreachable!());

        tokio::time::advance(Duration::from_secs(365 * 24 * 60 * 60)).await;
        assert_eq!(store.evict_idle().await, 0);
        assert!(
            store
                .find(session_id)
                .await
                .unwrap_or_else(|_| unreachable!())
                .is_some()
        );
    }
}
