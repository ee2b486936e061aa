use crate::SessionCredentialStore;
use crate::error::SessionError;
use async_trait::async_trait;
use moka::future::Cache;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Upper bound on concurrently cached sessions.
const DEFAULT_CAPACITY: u64 = 1_000;
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(3600);

#[derive(Zeroize, ZeroizeOnDrop)]
struct StoredCredentials {
    username: String,
    password: String,
}

#[derive(Debug)]
pub struct SessionCacheInner {
    cache: Cache<String, Arc<StoredCredentials>>,
}

/// Process-wide credential cache, keyed by session id.
#[derive(Debug, Clone)]
pub struct SessionCache {
    inner: Arc<SessionCacheInner>,
}

impl Deref for SessionCache {
    type Target = SessionCacheInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SessionCache {
    pub fn builder() -> SessionCacheBuilder {
        SessionCacheBuilder::new()
    }

    /// A handle on an existing (or future) session.
    #[must_use]
    pub fn open(&self, id: impl Into<String>) -> SessionHandle {
        SessionHandle { id: id.into(), cache: self.clone() }
    }

    /// Forgets the credentials of one session.
    pub async fn invalidate(&self, id: &str) {
        self.cache.invalidate(id).await;
    }
}

/// A fluent builder for [`SessionCache`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct SessionCacheBuilder {
    capacity: u64,
    idle_timeout: Duration,
}

impl Default for SessionCacheBuilder {
    fn default() -> Self {
        Self { capacity: DEFAULT_CAPACITY, idle_timeout: DEFAULT_IDLE_TIMEOUT }
    }
}

impl SessionCacheBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sessions untouched for this long are dropped.
    pub const fn idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    #[must_use]
    pub fn build(self) -> SessionCache {
        let cache =
            Cache::builder().max_capacity(self.capacity).time_to_idle(self.idle_timeout).build();
        SessionCache { inner: Arc::new(SessionCacheInner { cache }) }
    }
}

/// One session's credential store.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: String,
    cache: SessionCache,
}

impl SessionHandle {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl SessionCredentialStore for SessionHandle {
    async fn retrieve_username(&self) -> Result<Option<String>, SessionError> {
        Ok(self.cache.cache.get(&self.id).await.map(|c| c.username.clone()))
    }

    async fn retrieve_password(&self) -> Result<Option<String>, SessionError> {
        Ok(self.cache.cache.get(&self.id).await.map(|c| c.password.clone()))
    }

    async fn store(&self, username: &str, password: &str) -> Result<(), SessionError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(SessionError::Rejected {
                message: "username and password must not be blank".into(),
                context: Some(format!("session {}", self.id).into()),
            });
        }
        let entry =
            StoredCredentials { username: username.to_owned(), password: password.to_owned() };
        self.cache.cache.insert(self.id.clone(), Arc::new(entry)).await;
        debug!(session = %self.id, username, "Session credentials stored");
        Ok(())
    }
}
