//! Registry of live sessions.
//!
//! Each accepted session is entered under a fresh id and removed when its
//! guard drops, giving the listener a cheap concurrent-session cap and an
//! inventory for logging.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use protocol::SessionKind;

/// Information about one live session.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Target container name.
    pub container: String,
    /// Session kind.
    pub kind: SessionKind,
}

/// Thread-safe registry of live sessions.
pub struct SessionRegistry {
    sessions: DashMap<Uuid, SessionInfo>,
    max_sessions: usize,
}

impl SessionRegistry {
    /// Creates a registry capped at `max_sessions` concurrent entries.
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_sessions,
        }
    }

    /// Registers a new session, unless the cap is reached.
    ///
    /// The returned guard removes the entry when dropped.
    pub fn try_register(
        self: &Arc<Self>,
        container: &str,
        kind: SessionKind,
    ) -> Option<SessionGuard> {
        if self.sessions.len() >= self.max_sessions {
            tracing::warn!(
                container,
                max_sessions = self.max_sessions,
                "Session limit reached; rejecting connection"
            );
            return None;
        }

        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            SessionInfo {
                container: container.to_string(),
                kind,
            },
        );
        tracing::debug!(session_id = %id, container, kind = %kind, "Session registered");

        Some(SessionGuard {
            id,
            registry: Arc::clone(self),
        })
    }

    /// Returns the number of live sessions.
    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Returns a snapshot of all live sessions.
    pub fn list(&self) -> Vec<(Uuid, SessionInfo)> {
        self.sessions
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }
}

/// RAII guard for a registered session.
pub struct SessionGuard {
    id: Uuid,
    registry: Arc<SessionRegistry>,
}

impl SessionGuard {
    /// Returns the session id.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.registry.sessions.remove(&self.id).is_some() {
            tracing::debug!(session_id = %self.id, "Session removed from registry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_drop() {
        let registry = Arc::new(SessionRegistry::new(10));
        assert_eq!(registry.count(), 0);

        let guard = registry.try_register("web-1", SessionKind::Interactive);
        assert!(guard.is_some());
        assert_eq!(registry.count(), 1);

        let listed = registry.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].1.container, "web-1");

        drop(guard);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_cap_enforced() {
        let registry = Arc::new(SessionRegistry::new(2));

        let _a = registry.try_register("a", SessionKind::Interactive).unwrap();
        let _b = registry.try_register("b", SessionKind::LogFollow).unwrap();
        assert!(registry.try_register("c", SessionKind::Interactive).is_none());

        drop(_b);
        assert!(registry.try_register("c", SessionKind::Interactive).is_some());
    }

    #[test]
    fn test_guard_ids_are_unique() {
        let registry = Arc::new(SessionRegistry::new(10));
        let a = registry.try_register("a", SessionKind::Interactive).unwrap();
        let b = registry.try_register("b", SessionKind::Interactive).unwrap();
        assert_ne!(a.id(), b.id());
    }
}
