//! # Client-Side Card State
//!
//! The registration flow leaves a profile id and a stored token behind; the
//! reuse flow reads them back. Browser `localStorage` in production,
//! [`MemoryStore`] in tests and the CLI.

use crate::error::{CheckoutError, CheckoutResult};
use crate::model::{CardStorageIntent, StoredToken};
use std::cell::RefCell;
use std::collections::HashMap;

/// Key of the long-lived stored token
pub const TOKEN_KEY: &str = "token";

/// Key of the card-profile identifier
pub const PROFILE_ID_KEY: &str = "userCardProfileId";

/// Synchronous string key/value storage shared by all page loads
pub trait ClientStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Profile id and token of a previously registered card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCard {
    pub profile_id: String,
    pub token: StoredToken,
}

/// Forget any previously registered card
pub fn reset_card_state(store: &dyn ClientStore) {
    store.remove(TOKEN_KEY);
    store.remove(PROFILE_ID_KEY);
}

pub fn save_profile_id(store: &dyn ClientStore, intent: &CardStorageIntent) {
    store.set(PROFILE_ID_KEY, intent.profile_id());
}

pub fn save_token(store: &dyn ClientStore, token: &StoredToken) {
    store.set(TOKEN_KEY, token.as_str());
}

/// Both halves of the stored card; empty values count as missing
pub fn load_stored_card(store: &dyn ClientStore) -> CheckoutResult<StoredCard> {
    let profile_id = non_empty(store.get(PROFILE_ID_KEY)).ok_or(CheckoutError::MissingStoredCard {
        missing: PROFILE_ID_KEY,
    })?;
    let token = non_empty(store.get(TOKEN_KEY)).ok_or(CheckoutError::MissingStoredCard {
        missing: TOKEN_KEY,
    })?;
    Ok(StoredCard {
        profile_id,
        token: StoredToken::new(token),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }
}

impl ClientStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}
