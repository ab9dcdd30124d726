//! In-memory session store with TTL eviction of finished sessions.

use advisor_domain::{DomainError, Session, SessionId, SessionRepository, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

struct Entry {
    session: Session,
    /// When the session became terminal.
    finished_at: Option<Instant>,
}

impl Entry {
    fn new(session: Session) -> Self {
        let finished_at = session.is_terminal().then(Instant::now);
        Self {
            session,
            finished_at,
        }
    }
}

/// Sessions kept in process memory.
///
/// The outer map lock is only held to find or insert an entry; each session
/// has its own lock, so writers to different sessions never contend.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Entry>>>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drop terminal sessions that finished at least `ttl` ago.
    ///
    /// Returns the number of sessions removed.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, entry| {
            lock(entry)
                .finished_at
                .is_none_or(|finished| now.duration_since(finished) < self.ttl)
        });
        before - sessions.len()
    }

    /// Run [`Self::evict_expired`] every `interval` until the store is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let Some(live) = store.upgrade() else {
                    break;
                };
                let evicted = live.evict_expired();
                if evicted > 0 {
                    debug!(evicted, remaining = live.len(), "Evicted expired sessions");
                }
            }
        })
    }

    fn entry(&self, id: &SessionId) -> Option<Arc<Mutex<Entry>>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

fn lock(entry: &Mutex<Entry>) -> MutexGuard<'_, Entry> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionRepository for InMemorySessionStore {
    fn put(&self, session: Session) {
        let id = session.id();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(Entry::new(session))));
    }

    fn get(&self, id: &SessionId) -> Option<Session> {
        let entry = self.entry(id)?;
        let snapshot = lock(&entry).session.clone();
        Some(snapshot)
    }

    fn delete(&self, id: &SessionId) -> Option<Session> {
        let entry = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)?;
        let session = lock(&entry).session.clone();
        Some(session)
    }

    fn update(
        &self,
        id: &SessionId,
        apply: &mut dyn FnMut(&mut Session) -> Result<(), DomainError>,
    ) -> Result<Session, StoreError> {
        let entry = self.entry(id).ok_or(StoreError::NotFound(*id))?;
        let mut guard = lock(&entry);

        let mut draft = guard.session.clone();
        apply(&mut draft)?;

        if guard.finished_at.is_none() && draft.is_terminal() {
            guard.finished_at = Some(Instant::now());
        }
        guard.session = draft.clone();
        Ok(draft)
    }

    fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_domain::{AgentResult, AgentRole, AgentSpec, AnalysisInput, SessionState};

    fn analyzing() -> Session {
        let mut session = Session::new("provisioning", AnalysisInput::default());
        session.transition(SessionState::Analyzing).unwrap();
        session
    }

    fn failed() -> Session {
        let mut session = Session::new("provisioning", AnalysisInput::default());
        session.fail("test").unwrap();
        session
    }

    #[test]
    fn test_put_get_delete() {
        let store = InMemorySessionStore::default();
        let session = analyzing();
        let id = session.id();

        store.put(session.clone());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id), Some(session.clone()));
        assert_eq!(store.delete(&id), Some(session));
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_rejected_update_leaves_session_unchanged() {
        let store = InMemorySessionStore::default();
        let session = analyzing();
        let id = session.id();
        store.put(session.clone());

        let err = store
            .update(&id, &mut |s| {
                s.fail("half-applied")?;
                s.transition(SessionState::Completed)
            })
            .unwrap_err();

        assert!(matches!(err, StoreError::Rejected(DomainError::InvalidTransition { .. })));
        assert_eq!(store.get(&id), Some(session));
    }

    #[test]
    fn test_update_unknown_session() {
        let store = InMemorySessionStore::default();
        let id = SessionId::new();
        let err = store.update(&id, &mut |_| Ok(())).unwrap_err();
        assert_eq!(err, StoreError::NotFound(id));
    }

    #[test]
    fn test_concurrent_updates_are_serialized() {
        let store = InMemorySessionStore::default();
        let session = analyzing();
        let id = session.id();
        store.put(session);

        std::thread::scope(|scope| {
            for i in 0..32 {
                let store = &store;
                scope.spawn(move || {
                    let spec = AgentSpec::new(format!("agent-{}", i), AgentRole::Metrics);
                    store
                        .update(&id, &mut |s| {
                            s.record_results([AgentResult::error(&spec, 0, "x")])
                        })
                        .unwrap();
                });
            }
        });

        assert_eq!(store.get(&id).unwrap().agent_results().len(), 32);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_expired_terminal_sessions_are_evicted() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let running = analyzing();
        let done = failed();
        let (running_id, done_id) = (running.id(), done.id());
        store.put(running);
        store.put(done);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(store.evict_expired(), 0);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(store.evict_expired(), 1);
        assert!(store.get(&done_id).is_none());
        assert!(store.get(&running_id).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_counts_from_completion() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let session = analyzing();
        let id = session.id();
        store.put(session);

        tokio::time::advance(Duration::from_secs(600)).await;
        store.update(&id, &mut |s| s.fail("late")).unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(store.evict_expired(), 0);
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.evict_expired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_in_background() {
        let store = Arc::new(InMemorySessionStore::new(Duration::from_secs(60)));
        store.put(failed());
        let sweeper = store.spawn_sweeper(Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(75)).await;
        assert!(store.is_empty());

        drop(store);
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(sweeper.is_finished());
    }
}
