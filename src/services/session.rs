//! Session storage and the per-request session handle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures_util::future::BoxFuture;

use crate::error::ServiceError;

/// Session key holding the id of the logged-in user.
pub const USER_ID_KEY: &str = "userId";

/// Backend keeping session data between requests.
///
/// Implementations backed by a remote service enforce their own timeout.
pub trait SessionStore: Send + Sync {
    /// Allocate a fresh session id.
    fn generate(&self) -> BoxFuture<'_, Result<u64, ServiceError>>;

    fn load(&self, id: u64) -> BoxFuture<'_, Result<HashMap<String, String>, ServiceError>>;

    fn save(&self, id: u64, data: HashMap<String, String>) -> BoxFuture<'_, Result<(), ServiceError>>;
}

/// Idle time after which the memory store forgets a session.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(1200);

#[derive(Debug)]
struct StoredSession {
    values: HashMap<String, String>,
    last_access: Instant,
}

impl StoredSession {
    fn new(values: HashMap<String, String>) -> Self {
        Self {
            values,
            last_access: Instant::now(),
        }
    }

    fn expired(&self, ttl: Duration) -> bool {
        self.last_access.elapsed() >= ttl
    }
}

/// Process-local session store.
///
/// Entries idle for longer than the TTL are dropped when looked up, and all of
/// them are swept at most once per TTL when a new session is generated.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: DashMap<u64, StoredSession>,
    ttl: Duration,
    last_sweep: Mutex<Instant>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every expired session, returning how many were removed.
    pub fn sweep(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, stored| !stored.expired(self.ttl));
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            tracing::debug!(removed, remaining = self.sessions.len(), "Expired sessions swept");
        }
        removed
    }

    fn sweep_if_due(&self) {
        let mut last_sweep = self.last_sweep.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if last_sweep.elapsed() < self.ttl {
            return;
        }
        *last_sweep = Instant::now();
        drop(last_sweep);
        self.sweep();
    }
}

impl SessionStore for MemorySessionStore {
    fn generate(&self) -> BoxFuture<'_, Result<u64, ServiceError>> {
        Box::pin(async move {
            self.sweep_if_due();
            loop {
                let id = rand::random::<u64>();
                // 0 never names a session
                if id == 0 || self.sessions.contains_key(&id) {
                    continue;
                }
                self.sessions.insert(id, StoredSession::new(HashMap::new()));
                return Ok(id);
            }
        })
    }

    fn load(&self, id: u64) -> BoxFuture<'_, Result<HashMap<String, String>, ServiceError>> {
        Box::pin(async move {
            let unknown = || ServiceError::backend("ErrorUnknownSession");
            let values = {
                let mut stored = self.sessions.get_mut(&id).ok_or_else(unknown)?;
                if stored.expired(self.ttl) {
                    None
                } else {
                    stored.last_access = Instant::now();
                    Some(stored.values.clone())
                }
            };
            match values {
                Some(values) => Ok(values),
                None => {
                    self.sessions.remove_if(&id, |_, stored| stored.expired(self.ttl));
                    Err(unknown())
                }
            }
        })
    }

    fn save(&self, id: u64, data: HashMap<String, String>) -> BoxFuture<'_, Result<(), ServiceError>> {
        Box::pin(async move {
            self.sessions.insert(id, StoredSession::new(data));
            Ok(())
        })
    }
}

#[derive(Debug, Default)]
struct SessionData {
    values: HashMap<String, String>,
    changed: bool,
}

/// Handle on the session of the current request.
///
/// Clones share the same data; the session middleware saves it once the handler
/// returns if anything changed.
#[derive(Debug, Clone, Default)]
pub struct Session {
    id: u64,
    data: Arc<Mutex<SessionData>>,
}

impl Session {
    pub fn new(id: u64, values: HashMap<String, String>) -> Self {
        Self {
            id,
            data: Arc::new(Mutex::new(SessionData {
                values,
                changed: false,
            })),
        }
    }

    /// Session whose content must be written back even if untouched.
    pub fn dirty(id: u64) -> Self {
        let session = Self::new(id, HashMap::new());
        session.lock().changed = true;
        session
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    fn lock(&self) -> MutexGuard<'_, SessionData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Value stored under `key`, empty when absent.
    pub fn load(&self, key: &str) -> String {
        self.lock().values.get(key).cloned().unwrap_or_default()
    }

    pub fn store(&self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let mut data = self.lock();
        if data.values.get(key) != Some(&value) {
            data.values.insert(key.to_string(), value);
            data.changed = true;
        }
    }

    pub fn delete(&self, key: &str) {
        let mut data = self.lock();
        if data.values.remove(key).is_some() {
            data.changed = true;
        }
    }

    pub fn changed(&self) -> bool {
        self.lock().changed
    }

    /// Snapshot of the stored values.
    pub fn values(&self) -> HashMap<String, String> {
        self.lock().values.clone()
    }

    /// Id of the logged-in user, 0 when anonymous.
    pub fn user_id(&self) -> u64 {
        self.load(USER_ID_KEY).parse().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_tracking() {
        let session = Session::new(1, HashMap::from([("a".to_string(), "1".to_string())]));
        assert!(!session.changed());

        session.store("a", "1");
        assert!(!session.changed());

        session.store("a", "2");
        assert!(session.changed());
        assert_eq!(session.load("a"), "2");
    }

    #[test]
    fn test_delete_missing_key_is_not_a_change() {
        let session = Session::new(1, HashMap::new());
        session.delete("missing");
        assert!(!session.changed());
        assert_eq!(session.load("missing"), "");
    }

    #[test]
    fn test_user_id() {
        let session = Session::new(1, HashMap::new());
        assert_eq!(session.user_id(), 0);
        session.store(USER_ID_KEY, "42");
        assert_eq!(session.user_id(), 42);
        assert!(Session::dirty(3).changed());
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySessionStore::default();
        let id = store.generate().await.unwrap();
        assert_ne!(id, 0);
        assert!(store.load(id).await.unwrap().is_empty());

        store
            .save(id, HashMap::from([(USER_ID_KEY.to_string(), "5".to_string())]))
            .await
            .unwrap();
        assert_eq!(store.load(id).await.unwrap()[USER_ID_KEY], "5");
        assert!(store.load(id.wrapping_add(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_memory_store_expires_idle_sessions() {
        let store = MemorySessionStore::new(Duration::from_millis(100));
        let idle = store.generate().await.unwrap();
        let active = store.generate().await.unwrap();
        assert_eq!(store.len(), 2);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(store.load(active).await.is_ok());
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(store.load(idle).await.is_err());
        assert_eq!(store.len(), 1);
        assert!(store.load(active).await.is_ok());
    }

    #[tokio::test]
    async fn test_memory_store_sweeps_on_generate() {
        let store = MemorySessionStore::new(Duration::from_millis(50));
        for _ in 0..10 {
            store.generate().await.unwrap();
        }
        assert_eq!(store.len(), 10);

        tokio::time::sleep(Duration::from_millis(80)).await;
        let fresh = store.generate().await.unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.load(fresh).await.is_ok());
        assert_eq!(store.sweep(), 0);
    }
}
