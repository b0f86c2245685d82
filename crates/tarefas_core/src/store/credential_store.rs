//! Registered users and the active session.
//!
//! # Responsibility
//! - Register users and check login credentials.
//! - Persist the session identity under `currentUser` so it can be resumed.
//!
//! # Invariants
//! - Usernames are unique across the whole store.
//! - The session identity is stored apart from the user collection.
//! - Credentials are trimmed before validation and checksumming.

use crate::model::user::User;
use crate::model::validation::validate_credentials;
use crate::repo::collection::{load_collection, save_collection};
use crate::repo::keys::{CURRENT_USER_KEY, USERS_KEY};
use crate::repo::kv_repo::KeyValueStore;
use crate::store::error::{StoreError, StoreResult};
use log::{info, warn};

/// Authenticated identity handed to the caller after login or resume.
///
/// Group and task stores are scoped from [`Session::username`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: User,
}

impl Session {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }
}

/// User collection plus the active session.
pub struct CredentialStore<S: KeyValueStore> {
    kv: S,
    users: Vec<User>,
    session: Option<Session>,
}

impl<S: KeyValueStore> CredentialStore<S> {
    /// Creates an empty store. Call [`CredentialStore::load`] before use, or
    /// use [`CredentialStore::open`].
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            users: Vec::new(),
            session: None,
        }
    }

    /// Creates a store and loads the persisted user collection.
    pub fn open(kv: S) -> StoreResult<Self> {
        let mut store = Self::new(kv);
        store.load()?;
        Ok(store)
    }

    /// Replaces the in-memory users with the persisted collection.
    pub fn load(&mut self) -> StoreResult<()> {
        self.users = load_collection(&self.kv, USERS_KEY)?;
        Ok(())
    }

    /// Registers a new user.
    ///
    /// # Errors
    /// - `Validation` for a malformed username or short password.
    /// - `DuplicateUsername` when the username is taken.
    pub fn register(&mut self, username: &str, password: &str) -> StoreResult<User> {
        let (username, password) = (username.trim(), password.trim());
        validate_credentials(username, password)?;

        if self.find(username).is_some() {
            warn!("event=user_register module=credentials status=error error_code=duplicate_username");
            return Err(StoreError::DuplicateUsername(username.to_string()));
        }

        let user = User::new(username, password);
        let mut next = self.users.clone();
        next.push(user.clone());
        save_collection(&self.kv, USERS_KEY, &next)?;
        self.users = next;

        info!(
            "event=user_register module=credentials status=ok users_count={}",
            self.users.len()
        );
        Ok(user)
    }

    /// Checks credentials and starts a session.
    ///
    /// # Errors
    /// - `Validation` when the pair is malformed (checked before lookup).
    /// - `InvalidCredentials` for an unknown user or wrong password.
    pub fn login(&mut self, username: &str, password: &str) -> StoreResult<Session> {
        let (username, password) = (username.trim(), password.trim());
        validate_credentials(username, password)?;

        let user = match self.find(username) {
            Some(user) if user.verify_password(password) => user.clone(),
            _ => {
                warn!("event=user_login module=credentials status=error error_code=invalid_credentials");
                return Err(StoreError::InvalidCredentials);
            }
        };

        self.kv.set(CURRENT_USER_KEY, &user.username)?;
        let session = Session { user };
        self.session = Some(session.clone());

        info!("event=user_login module=credentials status=ok");
        Ok(session)
    }

    /// Ends the session in memory and in storage.
    pub fn logout(&mut self) -> StoreResult<()> {
        self.kv.remove(CURRENT_USER_KEY)?;
        self.session = None;
        info!("event=user_logout module=credentials status=ok");
        Ok(())
    }

    /// Restores the persisted session if it names a registered user.
    ///
    /// A stale or missing identity yields `None`, not an error.
    pub fn resume_session(&mut self) -> StoreResult<Option<Session>> {
        let Some(saved) = self.kv.get(CURRENT_USER_KEY)? else {
            return Ok(None);
        };

        let Some(user) = self.find(&saved).cloned() else {
            info!("event=session_resume module=credentials status=skipped reason=unknown_user");
            return Ok(None);
        };

        let session = Session { user };
        self.session = Some(session.clone());
        info!("event=session_resume module=credentials status=ok");
        Ok(Some(session))
    }

    /// Registered users in registration order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn users_count(&self) -> usize {
        self.users.len()
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    fn find(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }
}
