//! Session repository trait

use crate::core::error::DomainError;
use crate::session::entities::{Session, SessionId};
use thiserror::Error;

/// Errors returned by a [`SessionRepository`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error(transparent)]
    Rejected(#[from] DomainError),
}

/// Storage for in-flight and completed sessions.
///
/// Reads return snapshots. Writes go through [`SessionRepository::update`],
/// which serializes writers per session: the closure runs against a copy that
/// is committed only if it returns `Ok`, so a rejected mutation leaves the
/// stored session unchanged. Implementations live in the infrastructure layer.
pub trait SessionRepository: Send + Sync {
    /// Insert or replace a session.
    fn put(&self, session: Session);

    /// Snapshot of a session.
    fn get(&self, id: &SessionId) -> Option<Session>;

    /// Remove a session, returning it if it existed.
    fn delete(&self, id: &SessionId) -> Option<Session>;

    /// Atomically apply `apply` to a session and return the committed snapshot.
    fn update(
        &self,
        id: &SessionId,
        apply: &mut dyn FnMut(&mut Session) -> Result<(), DomainError>,
    ) -> Result<Session, StoreError>;

    /// Number of stored sessions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
