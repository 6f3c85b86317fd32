// ── Session state ──
//
// The in-memory credential + identity pair and its durable mirror. Every
// write goes through here: storage first, then one `watch` send, so a
// reader never sees half of a pair.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use scribly_api::{CredentialSource, Identity};
use secrecy::SecretString;
use tokio::sync::watch;
use tracing::debug;

use crate::error::StoreError;
use crate::store::CredentialStore;

/// Immutable view of the session at one point in time.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub token: Option<SecretString>,
    pub identity: Option<Identity>,
}

impl SessionSnapshot {
    /// Session state is derived from credential presence alone.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Owner of the session pair.
pub struct SessionState {
    /// Serializes writers so storage and memory change in the same order.
    store: Mutex<CredentialStore>,
    snapshot: watch::Sender<Arc<SessionSnapshot>>,
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionState {
    /// Seed memory from durable storage. Storage is read exactly once.
    pub fn restore(store: CredentialStore) -> Result<Self, StoreError> {
        let persisted = store.load()?;
        debug!(
            authenticated = persisted.token.is_some(),
            has_identity = persisted.identity.is_some(),
            "session restored"
        );
        let (snapshot, _) = watch::channel(Arc::new(SessionSnapshot {
            token: persisted.token,
            identity: persisted.identity,
        }));
        Ok(Self {
            store: Mutex::new(store),
            snapshot,
        })
    }

    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot.borrow().is_authenticated()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.snapshot.borrow().identity.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionSnapshot>> {
        self.snapshot.subscribe()
    }

    /// Replace the whole pair. Last writer wins.
    pub fn establish(&self, token: SecretString, identity: Identity) -> Result<(), StoreError> {
        let store = self.lock_store();
        store.save(&token, &identity)?;
        self.snapshot.send_replace(Arc::new(SessionSnapshot {
            token: Some(token),
            identity: Some(identity),
        }));
        Ok(())
    }

    /// Drop the pair from memory and storage.
    ///
    /// Memory is cleared even if storage fails. Returns `false` when there
    /// was nothing to clear, which makes concurrent clears harmless.
    pub fn clear(&self) -> Result<bool, StoreError> {
        let store = self.lock_store();
        let current = self.snapshot();
        if current.token.is_none() && current.identity.is_none() {
            return Ok(false);
        }
        self.snapshot
            .send_replace(Arc::new(SessionSnapshot::default()));
        store.clear()?;
        Ok(true)
    }

    /// Overlay `patch` onto the identity snapshot; returns the result.
    pub fn merge_identity(&self, patch: Identity) -> Result<Identity, StoreError> {
        let store = self.lock_store();
        let current = self.snapshot();
        let mut identity = current.identity.clone().unwrap_or_default();
        identity.merge(patch);
        self.commit_identity(&store, &current, identity)
    }

    /// Replace the identity snapshot wholesale (explicit refresh).
    pub fn replace_identity(&self, identity: Identity) -> Result<Identity, StoreError> {
        let store = self.lock_store();
        let current = self.snapshot();
        self.commit_identity(&store, &current, identity)
    }

    fn commit_identity(
        &self,
        store: &CredentialStore,
        current: &SessionSnapshot,
        identity: Identity,
    ) -> Result<Identity, StoreError> {
        store.save_identity(&identity)?;
        self.snapshot.send_replace(Arc::new(SessionSnapshot {
            token: current.token.clone(),
            identity: Some(identity.clone()),
        }));
        Ok(identity)
    }

    fn lock_store(&self) -> std::sync::MutexGuard<'_, CredentialStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialSource for SessionState {
    fn credential(&self) -> Option<SecretString> {
        self.snapshot.borrow().token.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;
    use crate::store::{IDENTITY_KEY, KeyValueStore, MemoryStore, TOKEN_KEY};

    fn state_over(memory: &MemoryStore) -> SessionState {
        SessionState::restore(CredentialStore::new(Box::new(memory.clone()))).unwrap()
    }

    #[test]
    fn restore_reflects_storage_before_any_call() {
        let memory = MemoryStore::with_entries([
            (TOKEN_KEY, "abc"),
            (IDENTITY_KEY, r#"{"id":1,"username":"alice"}"#),
        ]);
        let state = state_over(&memory);

        assert!(state.is_authenticated());
        assert_eq!(state.credential().unwrap().expose_secret(), "abc");
        assert_eq!(state.identity().unwrap().username.as_deref(), Some("alice"));
    }

    #[test]
    fn clear_on_empty_state_is_a_no_op() {
        let memory = MemoryStore::new();
        let state = state_over(&memory);
        assert!(!state.clear().unwrap());
        assert!(!state.clear().unwrap());
    }

    #[test]
    fn establish_then_clear_round_trips_storage() {
        let memory = MemoryStore::new();
        let state = state_over(&memory);
        state
            .establish(
                SecretString::from("abc".to_owned()),
                Identity {
                    id: Some(1),
                    ..Identity::default()
                },
            )
            .unwrap();
        assert_eq!(memory.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));

        assert!(state.clear().unwrap());
        assert!(!state.is_authenticated());
        assert!(memory.entries().is_empty());
    }

    #[test]
    fn subscribers_see_each_write() {
        let memory = MemoryStore::new();
        let state = state_over(&memory);
        let mut rx = state.subscribe();

        state
            .merge_identity(Identity {
                nickname: Some("Al".into()),
                ..Identity::default()
            })
            .unwrap();

        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(
            seen.identity.as_ref().unwrap().nickname.as_deref(),
            Some("Al")
        );
        assert!(!seen.is_authenticated());
    }
}
