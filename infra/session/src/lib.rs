//! # Session Credentials
//!
//! Keeps the management credentials a user entered for the lifetime of an
//! interactive session, so that later commands in the same session do not
//! prompt again.
//!
//! [`SessionCache`] is a bounded, idle-expiring cache shared by every session
//! of the process; [`SessionHandle`] is one session's view of it and the
//! implementation of [`SessionCredentialStore`].
//!
//! ```rust
//! use mqf_session::{SessionCache, SessionCredentialStore, SessionError};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), SessionError> {
//! let cache = SessionCache::builder().capacity(16).build();
//! let session = cache.open("7mKp2xQa9Rzc");
//! session.store("admin", "secret").await?;
//!
//! let same = cache.open(session.id());
//! assert_eq!(same.retrieve_username().await?.as_deref(), Some("admin"));
//! # Ok(())
//! # }
//! ```

mod error;
mod store;

pub use error::{SessionError, SessionErrorExt};
pub use store::{SessionCache, SessionCacheBuilder, SessionHandle};

use async_trait::async_trait;
use std::fmt::Debug;

/// Session-scoped storage for the management credential pair.
#[async_trait]
pub trait SessionCredentialStore: Debug + Send + Sync {
    async fn retrieve_username(&self) -> Result<Option<String>, SessionError>;

    async fn retrieve_password(&self) -> Result<Option<String>, SessionError>;

    /// Replaces both halves of the stored pair.
    async fn store(&self, username: &str, password: &str) -> Result<(), SessionError>;
}
