//! Per-session state: the list of wines the user marked as good.
//!
//! Every browser session owns an independent [`SessionWineList`]. Sessions
//! live in a [`SessionStore`] keyed by a random UUID and are evicted after a
//! period of inactivity.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::models::QualityLabel;

/// Ordered, duplicate-free list of wine names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SessionWineList {
    wines: Vec<String>,
}

impl SessionWineList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name` at the end unless it is empty or already present.
    ///
    /// Returns true if the list changed. Rejected names are ignored silently.
    pub fn append(&mut self, name: &str) -> bool {
        if name.is_empty() || self.wines.iter().any(|w| w == name) {
            return false;
        }
        self.wines.push(name.to_string());
        true
    }

    /// Removes every wine.
    pub fn clear(&mut self) {
        self.wines.clear();
    }

    /// Snapshot of the current names in insertion order.
    pub fn list(&self) -> Vec<String> {
        self.wines.clone()
    }

    /// Number of saved wines.
    pub fn len(&self) -> usize {
        self.wines.len()
    }

    /// Returns true if nothing has been saved.
    pub fn is_empty(&self) -> bool {
        self.wines.is_empty()
    }
}

/// Identifier handed to the client when a session starts.
pub type SessionId = Uuid;

/// State kept for one interactive session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Wines marked good in this session
    pub wines: SessionWineList,
    /// Label of the most recent prediction, if any
    pub last_label: Option<QualityLabel>,
    last_seen: Instant,
}

impl Session {
    fn new(now: Instant) -> Self {
        Self {
            wines: SessionWineList::new(),
            last_label: None,
            last_seen: now,
        }
    }
}

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No live session has this id
    NotFound(SessionId),
    /// A wine can only be named right after a good prediction
    NotGood(SessionId),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "Session not found: {id}"),
            Self::NotGood(id) => write!(
                f,
                "Session {id} has no good prediction to attach a wine name to"
            ),
        }
    }
}

impl std::error::Error for SessionError {}

/// Limits applied by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Sessions unused for this long are dropped
    pub idle_timeout: Duration,
    /// Upper bound on live sessions
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(3600),
            max_sessions: 1024,
        }
    }
}

/// All live sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
    limits: SessionLimits,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new(limits: SessionLimits) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            limits,
        }
    }

    /// Starts a new session with an empty wine list.
    pub fn create(&self) -> SessionId {
        self.create_at(Instant::now())
    }

    fn create_at(&self, now: Instant) -> SessionId {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);

        let before = sessions.len();
        sessions.retain(|_, s| now.saturating_duration_since(s.last_seen) < self.limits.idle_timeout);
        if sessions.len() < before {
            debug!("Pruned {} idle sessions", before - sessions.len());
        }

        while sessions.len() >= self.limits.max_sessions.max(1) {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, s)| s.last_seen)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
            debug!("Evicted least recently used session {oldest}");
        }

        let id = Uuid::new_v4();
        sessions.insert(id, Session::new(now));
        debug!("Created session {id}");
        id
    }

    /// Runs `f` against a live session and marks it as recently used.
    pub fn with_session<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, SessionError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        session.last_seen = Instant::now();
        Ok(f(session))
    }

    /// Records the label of the latest prediction.
    pub fn record_prediction(&self, id: SessionId, label: QualityLabel) -> Result<(), SessionError> {
        self.with_session(id, |s| s.last_label = Some(label))
    }

    /// Appends a wine name, only allowed after a good prediction.
    ///
    /// Returns whether the name was added and the resulting list.
    pub fn save_wine(
        &self,
        id: SessionId,
        name: &str,
    ) -> Result<(bool, Vec<String>), SessionError> {
        self.with_session(id, |s| {
            if s.last_label != Some(QualityLabel::Good) {
                return Err(SessionError::NotGood(id));
            }
            let added = s.wines.append(name);
            Ok((added, s.wines.list()))
        })?
    }

    /// Current wine list of a session.
    pub fn wines(&self, id: SessionId) -> Result<Vec<String>, SessionError> {
        self.with_session(id, |s| s.wines.list())
    }

    /// Empties the wine list of a session.
    pub fn clear_wines(&self, id: SessionId) -> Result<(), SessionError> {
        self.with_session(id, |s| s.wines.clear())
    }

    /// Ends a session. Returns false if it did not exist.
    pub fn remove(&self, id: SessionId) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if there are no live sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_dedups() {
        let mut list = SessionWineList::new();
        assert!(list.append("A"));
        assert!(!list.append("A"));
        assert!(list.append("B"));
        assert_eq!(list.list(), vec!["A", "B"]);
    }

    #[test]
    fn test_append_ignores_empty() {
        let mut list = SessionWineList::new();
        assert!(!list.append(""));
        assert!(list.is_empty());
    }

    #[test]
    fn test_append_is_case_sensitive() {
        let mut list = SessionWineList::new();
        list.append("Reserve");
        list.append("reserve");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut list = SessionWineList::new();
        list.append("X");
        list.clear();
        assert!(list.list().is_empty());

        // Clearing an empty list is fine too
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = SessionStore::default();
        let a = store.create();
        let b = store.create();

        store.record_prediction(a, QualityLabel::Good).unwrap();
        store.save_wine(a, "Only In A").unwrap();

        assert_eq!(store.wines(a).unwrap(), vec!["Only In A"]);
        assert!(store.wines(b).unwrap().is_empty());
    }

    #[test]
    fn test_save_requires_good_prediction() {
        let store = SessionStore::default();
        let id = store.create();

        assert_eq!(store.save_wine(id, "Nope"), Err(SessionError::NotGood(id)));

        store.record_prediction(id, QualityLabel::NotGood).unwrap();
        assert_eq!(store.save_wine(id, "Nope"), Err(SessionError::NotGood(id)));

        store.record_prediction(id, QualityLabel::Good).unwrap();
        assert_eq!(
            store.save_wine(id, "Yes").unwrap(),
            (true, vec!["Yes".to_string()])
        );
    }

    #[test]
    fn test_unknown_session() {
        let store = SessionStore::default();
        let id = Uuid::new_v4();
        assert_eq!(store.wines(id), Err(SessionError::NotFound(id)));
        assert!(!store.remove(id));
    }

    #[test]
    fn test_idle_sessions_are_pruned() {
        let store = SessionStore::new(SessionLimits {
            idle_timeout: Duration::from_secs(60),
            max_sessions: 10,
        });
        let start = Instant::now();
        let old = store.create_at(start);
        let fresh = store.create_at(start + Duration::from_secs(120));

        assert_eq!(store.wines(old), Err(SessionError::NotFound(old)));
        assert!(store.wines(fresh).is_ok());
    }

    #[test]
    fn test_max_sessions_evicts_least_recently_used() {
        let store = SessionStore::new(SessionLimits {
            idle_timeout: Duration::from_secs(3600),
            max_sessions: 2,
        });
        let start = Instant::now();
        let first = store.create_at(start);
        let second = store.create_at(start + Duration::from_secs(1));
        let third = store.create_at(start + Duration::from_secs(2));

        assert_eq!(store.len(), 2);
        assert!(store.wines(first).is_err());
        assert!(store.wines(second).is_ok());
        assert!(store.wines(third).is_ok());
    }
}
