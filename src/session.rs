//! Session collaborator
//!
//! Keeps the visitor's tokens and cached profile in persistent key/value
//! storage (the browser's `localStorage` in production). The navigator never
//! reads it directly; guards and page factories do.

use crate::{debug_log, error_log, warn_log};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

// ============================================================================
// Storage
// ============================================================================

/// Persistent string storage, shaped like `window.localStorage`
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory [`Storage`]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Profile as returned by `/accounts/profile/` and embedded in the login response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    /// Fields this crate does not model, kept so the cache round-trips
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// "First Last" when both are set, otherwise the username
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                format!("{} {}", first, last)
            }
            (Some(first), _) if !first.is_empty() => first.to_string(),
            _ => self.username.clone(),
        }
    }
}

/// Body of a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while reading or refreshing the session
#[derive(Debug)]
pub enum SessionError {
    /// Stored or received JSON did not parse
    Json(serde_json::Error),
    /// The profile endpoint failed
    Profile { message: String },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Json(err) => write!(f, "Invalid session data: {}", err),
            SessionError::Profile { message } => write!(f, "Profile request failed: {}", message),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Json(err) => Some(err),
            SessionError::Profile { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Json(err)
    }
}

// ============================================================================
// Profile source
// ============================================================================

/// Deferred profile fetch
pub type ProfileFuture = Pin<Box<dyn Future<Output = Result<User, SessionError>>>>;

/// Fetches the signed-in user's profile from the backend
pub trait ProfileSource {
    /// `access_token` is `None` when no token is stored; the request is still
    /// made and the backend answers with an error.
    fn fetch_profile(&self, access_token: Option<String>) -> ProfileFuture;
}

// ============================================================================
// Session
// ============================================================================

/// Auth state persisted in [`Storage`]
#[derive(Debug, Default)]
pub struct Session<S: Storage> {
    storage: S,
}

impl<S: Storage> Session<S> {
    pub const ACCESS_TOKEN_KEY: &'static str = "access_token";
    pub const REFRESH_TOKEN_KEY: &'static str = "refresh_token";
    pub const USER_KEY: &'static str = "user";

    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// An access token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.storage
            .get(Self::ACCESS_TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    /// `Authorization` header for API calls, if signed in.
    pub fn auth_header(&self) -> Option<(&'static str, String)> {
        self.access_token()
            .map(|token| ("Authorization", format!("Bearer {}", token)))
    }

    /// Last stored profile. Unreadable JSON is logged and treated as absent.
    pub fn cached_user(&self) -> Option<User> {
        let raw = self.storage.get(Self::USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn_log!("Ignoring unreadable cached user: {}", err);
                None
            }
        }
    }

    /// Persist tokens and profile from a login response.
    pub fn sign_in(&self, response: &LoginResponse) -> Result<(), SessionError> {
        let user = serde_json::to_string(&response.user)?;
        self.storage.set(Self::ACCESS_TOKEN_KEY, &response.access);
        self.storage.set(Self::REFRESH_TOKEN_KEY, &response.refresh);
        self.storage.set(Self::USER_KEY, &user);
        debug_log!("Signed in as '{}'", response.user.username);
        Ok(())
    }

    /// Drop tokens and the cached profile.
    pub fn sign_out(&self) {
        self.storage.remove(Self::ACCESS_TOKEN_KEY);
        self.storage.remove(Self::REFRESH_TOKEN_KEY);
        self.storage.remove(Self::USER_KEY);
        debug_log!("Signed out");
    }

    /// Fetch a fresh profile and update the cache.
    ///
    /// On failure the error is logged and the cached profile (if any) is
    /// returned instead.
    pub async fn refresh_profile<P: ProfileSource + ?Sized>(&self, source: &P) -> Option<User> {
        match source.fetch_profile(self.access_token()).await {
            Ok(user) => {
                match serde_json::to_string(&user) {
                    Ok(json) => self.storage.set(Self::USER_KEY, &json),
                    Err(err) => {
                        warn_log!("Could not cache profile: {}", err);
                    }
                }
                Some(user)
            }
            Err(err) => {
                error_log!("Profile refresh failed: {}", err);
                self.cached_user()
            }
        }
    }
}
