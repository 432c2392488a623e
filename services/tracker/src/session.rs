//! services/tracker/src/session.rs
//!
//! Owns the authenticated session: the token and user profile, mirrored
//! between memory and durable storage. The two storage keys are always
//! written and cleared together; a half-present record reads as logged
//! out.

use expense_tracker_core::domain::{Session, User};
use expense_tracker_core::ports::{GatewayError, SessionStorage, StorageError, StorageResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key for the bearer token.
const TOKEN_KEY: &str = "token";
/// Storage key for the serialized user profile.
const USER_KEY: &str = "user";

/// What `initialize` found in durable storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StartupState {
    pub authenticated: bool,
    pub user: Option<User>,
}

/// The single owner of session state. Pages read the token through
/// `require_token` instead of touching storage themselves.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    session: Option<Session>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            session: None,
        }
    }

    /// Reads durable storage once at startup. A token without a user
    /// record, the reverse, or an unparseable user all clear both keys
    /// and come up logged out, restoring the both-or-neither invariant.
    pub async fn initialize(&mut self) -> StorageResult<StartupState> {
        let token = self.storage.get(TOKEN_KEY).await?;
        let stored_user = self.storage.get(USER_KEY).await?;
        match (token, stored_user) {
            (Some(token), Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    debug!("restored session from storage");
                    self.session = Some(Session {
                        token,
                        user: user.clone(),
                    });
                    Ok(StartupState {
                        authenticated: true,
                        user: Some(user),
                    })
                }
                Err(err) => {
                    warn!("stored user record is unreadable, clearing the session: {err}");
                    self.clear_storage().await?;
                    Ok(StartupState {
                        authenticated: false,
                        user: None,
                    })
                }
            },
            (None, None) => Ok(StartupState {
                authenticated: false,
                user: None,
            }),
            _ => {
                warn!("half-present session record, clearing both keys");
                self.clear_storage().await?;
                Ok(StartupState {
                    authenticated: false,
                    user: None,
                })
            }
        }
    }

    /// Persists both keys, then opens the in-memory session.
    pub async fn login(&mut self, token: String, user: User) -> StorageResult<()> {
        let serialized =
            serde_json::to_string(&user).map_err(|err| StorageError(err.to_string()))?;
        self.storage.set(TOKEN_KEY, &token).await?;
        self.storage.set(USER_KEY, &serialized).await?;
        self.session = Some(Session { token, user });
        Ok(())
    }

    /// Clears both keys and the in-memory session.
    pub async fn logout(&mut self) -> StorageResult<()> {
        self.clear_storage().await?;
        self.session = None;
        Ok(())
    }

    async fn clear_storage(&self) -> StorageResult<()> {
        self.storage.remove(TOKEN_KEY).await?;
        self.storage.remove(USER_KEY).await
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|session| &session.user)
    }

    /// Every network path obtains the token here. Absence is an
    /// authentication error raised locally, never a request sent without
    /// a token.
    pub fn require_token(&self) -> Result<&str, GatewayError> {
        self.session
            .as_ref()
            .map(|session| session.token.as_str())
            .ok_or(GatewayError::Unauthorized)
    }
}
