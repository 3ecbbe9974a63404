//! Per-message context bundle
//!
//! Built fresh for every inbound message and dropped once the envelope is
//! produced. Long-lived dependencies do not live here; handlers receive
//! those at construction (see [`crate::handlers::HandlerServices`]).

use crate::store::TripStore;

/// Identifiers and the borrowed persistence handle for one message cycle
pub struct ContextBundle<'a> {
    pub user_id: String,
    pub session_id: String,
    /// Owned by the caller; the bundle never commits or closes it
    store: Option<&'a dyn TripStore>,
}

impl<'a> ContextBundle<'a> {
    pub fn new(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        store: Option<&'a dyn TripStore>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
            store,
        }
    }

    /// Bundle with no persistence handle
    #[cfg(test)]
    pub fn detached(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self::new(user_id, session_id, None)
    }

    pub fn store(&self) -> Option<&'a dyn TripStore> {
        self.store
    }
}

impl std::fmt::Debug for ContextBundle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextBundle")
            .field("user_id", &self.user_id)
            .field("session_id", &self.session_id)
            .field("has_store", &self.store.is_some())
            .finish()
    }
}
