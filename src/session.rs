//! Session
//!
//! Holds the signed-in user record, persisted alongside the cart.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::{Storage, load_state, save_state};

/// Storage key the session snapshot is kept under.
pub const SESSION_STORAGE_KEY: &str = "auth-storage";

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identifier
    pub id: String,

    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Mobile number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Whether the user completed sign-in
    #[serde(default)]
    pub is_authenticated: bool,

    /// Role, e.g. `admin`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Opaque session token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Persisted session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Current user, if any
    #[serde(default)]
    pub user: Option<User>,
}

/// Session store
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
    state: SessionState,
}

impl<S: Storage> SessionStore<S> {
    /// Rehydrate the session from `storage`. Corrupt snapshots yield no user.
    pub fn open(storage: S) -> Self {
        let state: SessionState = load_state(&storage, SESSION_STORAGE_KEY);

        debug!(signed_in = state.user.is_some(), "session rehydrated");

        Self { storage, state }
    }

    /// Replace the current user.
    pub fn set_user(&mut self, user: User) {
        debug!(user_id = %user.id, "session user set");

        self.state.user = Some(user);
        self.persist();
    }

    /// Forget the current user.
    pub fn logout(&mut self) {
        self.state.user = None;
        self.persist();
    }

    /// The current user.
    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    /// Whether a user is present and marked authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.state
            .user
            .as_ref()
            .is_some_and(|user| user.is_authenticated)
    }

    fn persist(&self) {
        if let Err(err) = save_state(&self.storage, SESSION_STORAGE_KEY, &self.state) {
            warn!(error = %err, "failed to persist session");
        }
    }
}
