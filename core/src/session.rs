//! Access-token sources.
//!
//! The client only ever reads the token; whoever owns the login flow writes
//! it. `SessionStore` is the shared holder a UI keeps for that purpose.

use std::sync::Arc;

use parking_lot::RwLock;

/// Read-only view of the current bearer token.
pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

impl TokenSource for Option<String> {
    fn access_token(&self) -> Option<String> {
        self.clone()
    }
}

/// A token fixed at construction time.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn access_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Shared, mutable session state. Clones observe the same token.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    token: Arc<RwLock<Option<String>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_token(token);
        store
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }
}

impl TokenSource for SessionStore {
    fn access_token(&self) -> Option<String> {
        self.token.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_token() {
        let store = SessionStore::new();
        let view = store.clone();
        assert!(view.access_token().is_none());

        store.set_token("abc");
        assert_eq!(view.access_token().as_deref(), Some("abc"));
        assert!(view.is_authenticated());

        store.clear();
        assert!(view.access_token().is_none());
    }

    #[test]
    fn static_and_optional_sources() {
        assert_eq!(StaticToken("t".to_string()).access_token().as_deref(), Some("t"));
        assert!(None::<String>.access_token().is_none());
    }
}
