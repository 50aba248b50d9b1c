//! Durable key-value storage.
//!
//! Models the browser local-storage partition that owns all session state:
//! string keys, string payloads, and the whole value read-then-overwritten on
//! every mutation. A missing or unreadable payload is always treated as
//! absent, never as an error.

use std::sync::{Mutex, MutexGuard, PoisonError};

use mockall::automock;
use rustc_hash::FxHashMap;

/// Storage key for the serialized cart.
pub const CART_KEY: &str = "cinema_cart";

/// Storage key for the serialized registered-user list.
pub const REGISTERED_USERS_KEY: &str = "cinema_registered_users";

/// Storage key for the serialized current session user.
pub const CURRENT_USER_KEY: &str = "cinema_user";

/// Durable key-value storage collaborator.
///
/// Payloads are opaque strings; callers serialize with `serde_json`.
#[automock]
pub trait KeyValueStore: Send + Sync {
    /// Read the payload stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrite the payload stored under `key`.
    fn set(&self, key: &str, value: &str);

    /// Remove the payload stored under `key`, if present.
    fn remove(&self, key: &str);
}

/// In-memory [`KeyValueStore`] standing in for a single tab's local storage.
///
/// There is no optimistic-concurrency check: two owners of the same store can
/// clobber each other's writes, exactly like two tabs sharing one partition.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<FxHashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, FxHashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }
}
